use std::{collections::HashSet, fs, path::Path};

use log::debug;
use serde::Deserialize;

use crate::{
    clone::is_valid_repo_url,
    error::{Error, Result},
    install::InstallCommand,
};

pub const DEFAULT_TEMPLATE: &str = "react-router";
const REACT_ROUTER_URL: &str = "https://github.com/gfriesen98/react-router-boilerplate";

fn default_manifest() -> String {
    "package.json".to_string()
}

fn default_history_dir() -> String {
    ".git".to_string()
}

/// A boilerplate repository and how to finish it once cloned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Template {
    pub name: String,
    pub url: String,
    /// Manifest file, relative to the project root, whose `name` gets rewritten.
    #[serde(default = "default_manifest")]
    pub manifest: String,
    #[serde(default = "default_history_dir")]
    pub history_dir: String,
    #[serde(default)]
    pub install: InstallCommand,
}

impl Template {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            manifest: default_manifest(),
            history_dir: default_history_dir(),
            install: InstallCommand::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    default: Option<String>,
    templates: Vec<Template>,
}

#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    default: String,
    templates: Vec<Template>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateRegistry {
    pub fn builtin() -> Self {
        Self {
            default: DEFAULT_TEMPLATE.to_string(),
            templates: vec![Template::new(DEFAULT_TEMPLATE, REACT_ROUTER_URL)],
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::template_config(path, e.to_string()))?;
        let registry = Self::from_json(path, &raw)?;
        debug!(
            "Loaded {} template(s) from {}",
            registry.templates.len(),
            path.display()
        );
        Ok(registry)
    }

    /// `origin` only names the source in error messages.
    pub fn from_json(origin: &Path, raw: &str) -> Result<Self> {
        let file: RegistryFile =
            serde_json::from_str(raw).map_err(|e| Error::template_config(origin, e.to_string()))?;

        let first = file
            .templates
            .first()
            .ok_or_else(|| Error::template_config(origin, "no templates defined"))?;
        let default = file.default.unwrap_or_else(|| first.name.clone());

        let mut seen = HashSet::new();
        for template in &file.templates {
            if !seen.insert(template.name.as_str()) {
                return Err(Error::template_config(
                    origin,
                    format!("duplicate template name `{}`", template.name),
                ));
            }
            if !is_valid_repo_url(&template.url) {
                return Err(Error::invalid_repo_url(&template.url));
            }
        }
        if !seen.contains(default.as_str()) {
            return Err(Error::template_config(
                origin,
                format!("default template `{default}` is not defined"),
            ));
        }

        Ok(Self {
            default,
            templates: file.templates,
        })
    }

    pub fn default_name(&self) -> &str {
        &self.default
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name.as_str()).collect()
    }

    /// Look up `name`, or the registry default when `None`.
    pub fn get(&self, name: Option<&str>) -> Result<&Template> {
        let name = name.unwrap_or(self.default.as_str());
        self.templates
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| Error::unknown_template(name, self.names().join(", ")))
    }
}
