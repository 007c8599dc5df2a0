use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Folder name already exists: {}", path.display())]
    TargetExists { path: PathBuf },

    #[error("Invalid target folder: {}", path.display())]
    InvalidTarget { path: PathBuf },

    #[error("Unknown template: {name}. Available templates: {available}")]
    UnknownTemplate { name: String, available: String },

    #[error("Invalid repository URL: {url}")]
    InvalidRepoUrl { url: String },

    #[error("Invalid template registry {}: {message}", path.display())]
    TemplateConfig { path: PathBuf, message: String },

    #[error("Network error while cloning {url}: {message}")]
    Network { url: String, message: String },

    #[error("Failed to clone {url}: {message}")]
    Repository { url: String, message: String },

    #[error("Failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read manifest {}: {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed manifest {}: {source}", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Manifest {} is not a JSON object", path.display())]
    ManifestShape { path: PathBuf },

    #[error("Failed to write manifest {}: {source}", path.display())]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run `{program}`: {source}")]
    Install {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn target_exists(path: impl AsRef<Path>) -> Self {
        Self::TargetExists {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn invalid_target(path: impl AsRef<Path>) -> Self {
        Self::InvalidTarget {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn unknown_template(name: impl Into<String>, available: impl Into<String>) -> Self {
        Self::UnknownTemplate {
            name: name.into(),
            available: available.into(),
        }
    }

    pub fn invalid_repo_url(url: impl Into<String>) -> Self {
        Self::InvalidRepoUrl { url: url.into() }
    }

    pub fn template_config(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::TemplateConfig {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    pub fn remove(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Remove {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// True for failures that happen after the target directory may exist on disk.
    pub fn needs_rollback(&self) -> bool {
        !matches!(
            self,
            Self::TargetExists { .. }
                | Self::InvalidTarget { .. }
                | Self::UnknownTemplate { .. }
                | Self::InvalidRepoUrl { .. }
                | Self::TemplateConfig { .. }
        )
    }
}
