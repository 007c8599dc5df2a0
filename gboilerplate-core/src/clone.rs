use std::path::{Path, PathBuf};

use async_trait::async_trait;
use git2::{build::RepoBuilder, ErrorClass, ErrorCode};
use log::{debug, info};

use crate::error::{Error, Result};

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Materialize the repository at `url` into `destination`, which must not exist yet.
    async fn fetch(&self, url: &str, destination: &Path) -> Result<()>;
}

// Cloned repository on local filesystem, through libgit2
#[derive(Debug, Default, Clone, Copy)]
pub struct GitFetcher;

impl GitFetcher {
    fn clone_repository(
        url: &str,
        path: &Path,
    ) -> std::result::Result<git2::Repository, git2::Error> {
        RepoBuilder::new().clone(url, path)
    }
}

#[async_trait]
impl Fetcher for GitFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<()> {
        if !is_valid_repo_url(url) {
            return Err(Error::invalid_repo_url(url));
        }

        info!("Cloning {} into {}", url, destination.display());
        let owned_url = url.to_string();
        let path: PathBuf = destination.to_path_buf();

        let cloned =
            tokio::task::spawn_blocking(move || Self::clone_repository(&owned_url, &path))
                .await
                .map_err(|e| Error::Repository {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        match cloned {
            Ok(repo) => {
                debug!("Cloned into {}", repo.path().display());
                Ok(())
            }
            Err(e) => Err(classify(url, destination, &e)),
        }
    }
}

fn classify(url: &str, destination: &Path, err: &git2::Error) -> Error {
    // Someone else populated the destination; it is not ours to clean up
    if err.code() == ErrorCode::Exists {
        return Error::target_exists(destination);
    }

    let message = err.message().to_string();
    match err.class() {
        ErrorClass::Net | ErrorClass::Http | ErrorClass::Ssh | ErrorClass::Ssl => Error::Network {
            url: url.to_string(),
            message,
        },
        _ => Error::Repository {
            url: url.to_string(),
            message,
        },
    }
}

/// Remote URLs libgit2 understands, or a local repository path.
pub fn is_valid_repo_url(url: &str) -> bool {
    const SCHEMES: [&str; 5] = ["https://", "http://", "ssh://", "git://", "file://"];

    SCHEMES.iter().any(|scheme| url.starts_with(scheme))
        || url.starts_with("git@")
        || (!url.is_empty() && Path::new(url).is_dir())
}
