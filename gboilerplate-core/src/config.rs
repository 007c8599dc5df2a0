use std::path::PathBuf;

use crate::templates::Template;

#[derive(Debug, Clone)]
pub struct GlobalConfig {
    pub verbose: bool,
    pub clear_screen: bool,
}

#[derive(Debug, Clone)]
pub struct ScaffoldConfig {
    pub target: PathBuf,
    pub template: Template,
    pub skip_install: bool,
}

impl ScaffoldConfig {
    pub fn new(target: impl Into<PathBuf>, template: Template) -> Self {
        Self {
            target: target.into(),
            template,
            skip_install: false,
        }
    }

    pub fn skip_install(mut self, skip_install: bool) -> Self {
        self.skip_install = skip_install;
        self
    }
}
