use std::path::PathBuf;

use clap::ArgMatches;
use gboilerplate_core::{config::ScaffoldConfig, templates::TemplateRegistry, Result};
use log::debug;

pub struct NameCommandHandler {}

impl NameCommandHandler {
    pub fn config(subcommand_match: &ArgMatches) -> Result<ScaffoldConfig> {
        // An empty target is rejected by the scaffolder before touching disk
        let target = subcommand_match
            .get_one::<PathBuf>("folder")
            .cloned()
            .unwrap_or_default();

        let registry = match subcommand_match.get_one::<PathBuf>("templates") {
            Some(path) => TemplateRegistry::from_file(path)?,
            None => TemplateRegistry::builtin(),
        };

        let template_name = subcommand_match
            .get_one::<String>("template")
            .map(String::as_str);
        let template = registry.get(template_name)?.clone();
        debug!("Using template {} ({})", template.name, template.url);

        let skip_install = subcommand_match.get_flag("skip_install");

        Ok(ScaffoldConfig::new(target, template).skip_install(skip_install))
    }
}
