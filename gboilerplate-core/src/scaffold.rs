use std::path::PathBuf;

use log::{debug, info, warn};

use crate::{
    clone::{Fetcher, GitFetcher},
    config::ScaffoldConfig,
    error::{Error, Result},
    filesystem, manifest,
    install::{InstallReport, Installer, ProcessInstaller},
    progress::{Phase, Progress, Reporter},
    types::ProjectName,
};

#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    pub target: PathBuf,
    pub project_name: ProjectName,
    pub template: String,
    /// `None` when installation was skipped.
    pub install: Option<InstallReport>,
}

// Tracks the current phase and pushes every change to the reporter
struct Run<'a> {
    progress: Progress,
    reporter: &'a dyn Reporter,
}

impl<'a> Run<'a> {
    fn new(reporter: &'a dyn Reporter) -> Self {
        Self {
            progress: Progress::new(Phase::Idle, ""),
            reporter,
        }
    }

    fn advance(&mut self, phase: Phase, message: impl Into<String>) {
        debug_assert!(
            self.progress.phase.can_transition_to(phase),
            "illegal transition {} -> {}",
            self.progress.phase,
            phase
        );
        self.progress = Progress::new(phase, message);
        self.reporter.transition(&self.progress);
    }

    fn completed(&self, message: &str) {
        self.reporter.completed(self.progress.phase, message);
    }

    fn abort(&mut self, err: &Error) {
        self.advance(Phase::Aborted, err.to_string());
    }
}

/// Clones a template into a fresh folder and turns it into a new project.
pub struct Scaffolder<F = GitFetcher, I = ProcessInstaller> {
    config: ScaffoldConfig,
    fetcher: F,
    installer: I,
}

impl Scaffolder {
    pub fn with_config(config: ScaffoldConfig) -> Self {
        Scaffolder {
            config,
            fetcher: GitFetcher,
            installer: ProcessInstaller,
        }
    }
}

impl<F: Fetcher, I: Installer> Scaffolder<F, I> {
    pub fn fetcher<G: Fetcher>(self, fetcher: G) -> Scaffolder<G, I> {
        Scaffolder {
            config: self.config,
            fetcher,
            installer: self.installer,
        }
    }

    pub fn installer<J: Installer>(self, installer: J) -> Scaffolder<F, J> {
        Scaffolder {
            config: self.config,
            fetcher: self.fetcher,
            installer,
        }
    }

    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    pub async fn run(&self, reporter: &dyn Reporter) -> Result<ScaffoldReport> {
        let target = &self.config.target;
        let mut run = Run::new(reporter);

        run.advance(
            Phase::CheckingTarget,
            format!("Checking {}...", target.display()),
        );

        let project_name = match ProjectName::from_target(target) {
            Ok(name) => name,
            Err(e) => {
                run.abort(&e);
                return Err(e);
            }
        };

        if filesystem::exists(target) {
            let e = Error::target_exists(target);
            run.abort(&e);
            return Err(e);
        }

        match self.build(&mut run, &project_name).await {
            Ok(install) => {
                run.advance(Phase::Done, "Finished");
                info!("Scaffolded {} into {}", project_name, target.display());

                Ok(ScaffoldReport {
                    target: target.clone(),
                    project_name,
                    template: self.config.template.name.clone(),
                    install,
                })
            }
            Err(e) => {
                debug!("Scaffolding {} failed: {}", target.display(), e);
                self.rollback(&e);
                run.abort(&e);
                Err(e)
            }
        }
    }

    async fn build(
        &self,
        run: &mut Run<'_>,
        project_name: &ProjectName,
    ) -> Result<Option<InstallReport>> {
        let target = &self.config.target;
        let template = &self.config.template;

        run.advance(
            Phase::Cloning,
            format!("Cloning repository into {}...", target.display()),
        );
        self.fetcher.fetch(&template.url, target).await?;
        run.completed("Finished");

        run.advance(
            Phase::RemovingHistory,
            format!("Removing {}...", template.history_dir),
        );
        let history = target.join(&template.history_dir);
        if filesystem::exists(&history) {
            filesystem::remove_tree(&history)?;
            run.completed(&format!("Removed {}", template.history_dir));
        } else {
            debug!(
                "{} has no {}, nothing to remove",
                template.name, template.history_dir
            );
        }

        run.advance(
            Phase::EditingManifest,
            format!("Updating {}...", template.manifest),
        );
        manifest::set_name(&target.join(&template.manifest), project_name.as_str())?;
        run.completed(&format!("Updated {}", template.manifest));

        run.advance(
            Phase::InstallingDeps,
            format!("Installing dependencies w/{}...", template.install.program),
        );
        if self.config.skip_install {
            run.completed("Skipped dependency installation");
            return Ok(None);
        }

        let report = match self.installer.install(&template.install, target).await {
            Ok(report) => report,
            Err(e) => {
                info!("{}", e);
                InstallReport {
                    success: false,
                    code: None,
                    diagnostics: e.to_string(),
                }
            }
        };

        if !report.diagnostics.is_empty() {
            run.reporter.diagnostic(&report.diagnostics);
        }
        if report.success {
            run.completed("Installed dependencies");
        } else {
            info!(
                "`{}` did not succeed (exit code {:?}), continuing",
                template.install, report.code
            );
        }

        Ok(Some(report))
    }

    fn rollback(&self, err: &Error) {
        let target = &self.config.target;
        if !err.needs_rollback() || !filesystem::exists(target) {
            return;
        }

        match filesystem::remove_tree(target) {
            Ok(()) => info!("Removed partially created {}", target.display()),
            Err(e) => warn!("Could not clean up {}: {}", target.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::Template;
    use async_trait::async_trait;
    use std::{
        fs,
        path::Path,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };
    use tempfile::TempDir;

    const PACKAGE: &str = r#"{"name":"react-router-boilerplate","version":"0.1.0"}"#;

    #[derive(Default)]
    struct FakeFetcher {
        calls: AtomicUsize,
        fail: bool,
        lose_race: bool,
        manifest: Option<&'static str>,
    }

    #[async_trait]
    impl Fetcher for FakeFetcher {
        async fn fetch(&self, url: &str, destination: &Path) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.lose_race {
                // Another run created the folder between the check and the clone
                fs::create_dir_all(destination)?;
                fs::write(destination.join("theirs.txt"), "theirs")?;
                return Err(Error::target_exists(destination));
            }
            fs::create_dir_all(destination.join(".git/objects"))?;
            fs::write(destination.join(".git/HEAD"), "ref: refs/heads/main")?;
            if self.fail {
                return Err(Error::Network {
                    url: url.to_string(),
                    message: "connection reset".to_string(),
                });
            }
            fs::write(destination.join("README.md"), "# boilerplate")?;
            if let Some(manifest) = self.manifest {
                fs::write(destination.join("package.json"), manifest)?;
            }
            Ok(())
        }
    }

    fn fetcher() -> FakeFetcher {
        FakeFetcher {
            manifest: Some(PACKAGE),
            ..Default::default()
        }
    }

    struct FakeInstaller {
        result: fn() -> Result<InstallReport>,
    }

    #[async_trait]
    impl Installer for FakeInstaller {
        async fn install(
            &self,
            _command: &crate::install::InstallCommand,
            cwd: &Path,
        ) -> Result<InstallReport> {
            assert!(cwd.join("package.json").exists());
            (self.result)()
        }
    }

    fn installs_ok() -> FakeInstaller {
        FakeInstaller {
            result: || {
                Ok(InstallReport {
                    success: true,
                    code: Some(0),
                    diagnostics: String::new(),
                })
            },
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        phases: Mutex<Vec<Phase>>,
        diagnostics: Mutex<Vec<String>>,
    }

    impl Reporter for RecordingReporter {
        fn transition(&self, progress: &Progress) {
            self.phases.lock().unwrap().push(progress.phase);
        }

        fn completed(&self, _phase: Phase, _message: &str) {}

        fn diagnostic(&self, text: &str) {
            self.diagnostics.lock().unwrap().push(text.to_string());
        }
    }

    fn config(tmp: &TempDir, name: &str) -> ScaffoldConfig {
        ScaffoldConfig::new(
            tmp.path().join(name),
            Template::new("test", "https://example.com/boilerplate.git"),
        )
    }

    #[tokio::test]
    async fn test_run_scaffolds_project() {
        let tmp = TempDir::new().unwrap();
        let reporter = RecordingReporter::default();
        let scaffolder = Scaffolder::with_config(config(&tmp, "demo-app"))
            .fetcher(fetcher())
            .installer(installs_ok());

        let report = scaffolder.run(&reporter).await.unwrap();

        let target = tmp.path().join("demo-app");
        assert_eq!(report.target, target);
        assert_eq!(report.project_name.as_str(), "demo-app");
        assert!(report.install.unwrap().success);
        assert!(target.join("README.md").exists());
        assert!(!target.join(".git").exists());
        assert_eq!(
            manifest::read_name(&target.join("package.json"))
                .unwrap()
                .as_deref(),
            Some("demo-app")
        );
        assert_eq!(
            *reporter.phases.lock().unwrap(),
            vec![
                Phase::CheckingTarget,
                Phase::Cloning,
                Phase::RemovingHistory,
                Phase::EditingManifest,
                Phase::InstallingDeps,
                Phase::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_existing_target_aborts_before_clone() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("demo-app");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "mine").unwrap();

        let reporter = RecordingReporter::default();
        let scaffolder = Scaffolder::with_config(config(&tmp, "demo-app"))
            .fetcher(fetcher())
            .installer(installs_ok());

        let err = scaffolder.run(&reporter).await.unwrap_err();

        assert!(matches!(err, Error::TargetExists { .. }));
        assert_eq!(scaffolder.fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fs::read_to_string(target.join("keep.txt")).unwrap(), "mine");
        assert_eq!(
            *reporter.phases.lock().unwrap(),
            vec![Phase::CheckingTarget, Phase::Aborted]
        );
    }

    #[tokio::test]
    async fn test_clone_failure_rolls_back() {
        let tmp = TempDir::new().unwrap();
        let reporter = RecordingReporter::default();
        let scaffolder = Scaffolder::with_config(config(&tmp, "demo-app"))
            .fetcher(FakeFetcher {
                fail: true,
                ..fetcher()
            })
            .installer(installs_ok());

        let err = scaffolder.run(&reporter).await.unwrap_err();

        assert!(matches!(err, Error::Network { .. }));
        assert!(!tmp.path().join("demo-app").exists());
        assert_eq!(
            reporter.phases.lock().unwrap().last(),
            Some(&Phase::Aborted)
        );
    }

    #[tokio::test]
    async fn test_clone_into_folder_created_concurrently_keeps_it() {
        let tmp = TempDir::new().unwrap();
        let reporter = RecordingReporter::default();
        let scaffolder = Scaffolder::with_config(config(&tmp, "demo-app"))
            .fetcher(FakeFetcher {
                lose_race: true,
                ..fetcher()
            })
            .installer(installs_ok());

        let err = scaffolder.run(&reporter).await.unwrap_err();

        assert!(matches!(err, Error::TargetExists { .. }));
        assert!(tmp.path().join("demo-app/theirs.txt").exists());
        assert_eq!(
            reporter.phases.lock().unwrap().last(),
            Some(&Phase::Aborted)
        );
    }

    #[tokio::test]
    async fn test_manifest_failure_rolls_back() {
        let tmp = TempDir::new().unwrap();
        let reporter = RecordingReporter::default();
        let scaffolder = Scaffolder::with_config(config(&tmp, "demo-app"))
            .fetcher(FakeFetcher {
                manifest: Some("{ broken"),
                ..Default::default()
            })
            .installer(installs_ok());

        let err = scaffolder.run(&reporter).await.unwrap_err();

        assert!(matches!(err, Error::ManifestParse { .. }));
        assert!(!tmp.path().join("demo-app").exists());
    }

    #[tokio::test]
    async fn test_install_failure_is_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let reporter = RecordingReporter::default();
        let scaffolder = Scaffolder::with_config(config(&tmp, "demo-app"))
            .fetcher(fetcher())
            .installer(FakeInstaller {
                result: || {
                    Ok(InstallReport {
                        success: false,
                        code: Some(1),
                        diagnostics: "error An unexpected error occurred".to_string(),
                    })
                },
            });

        let report = scaffolder.run(&reporter).await.unwrap();

        let install = report.install.unwrap();
        assert!(!install.success);
        assert_eq!(install.code, Some(1));
        assert!(tmp.path().join("demo-app/package.json").exists());
        assert_eq!(
            *reporter.diagnostics.lock().unwrap(),
            vec!["error An unexpected error occurred".to_string()]
        );
        assert_eq!(reporter.phases.lock().unwrap().last(), Some(&Phase::Done));
    }

    #[tokio::test]
    async fn test_install_spawn_error_is_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let reporter = RecordingReporter::default();
        let scaffolder = Scaffolder::with_config(config(&tmp, "demo-app"))
            .fetcher(fetcher())
            .installer(FakeInstaller {
                result: || {
                    Err(Error::Install {
                        program: "yarn".to_string(),
                        source: std::io::Error::from(std::io::ErrorKind::NotFound),
                    })
                },
            });

        let report = scaffolder.run(&reporter).await.unwrap();

        let install = report.install.unwrap();
        assert!(!install.success);
        assert_eq!(install.code, None);
        assert_eq!(reporter.diagnostics.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_skip_install() {
        let tmp = TempDir::new().unwrap();
        let scaffolder =
            Scaffolder::with_config(config(&tmp, "demo-app").skip_install(true))
                .fetcher(fetcher())
                .installer(FakeInstaller {
                    result: || panic!("installer must not run"),
                });

        let report = scaffolder.run(&RecordingReporter::default()).await.unwrap();

        assert!(report.install.is_none());
    }

    #[tokio::test]
    async fn test_invalid_target_aborts() {
        let scaffolder = Scaffolder::with_config(ScaffoldConfig::new(
            "..",
            Template::new("test", "https://example.com/boilerplate.git"),
        ))
        .fetcher(fetcher())
        .installer(installs_ok());

        let err = scaffolder
            .run(&RecordingReporter::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidTarget { .. }));
        assert_eq!(scaffolder.fetcher.calls.load(Ordering::SeqCst), 0);
    }
}
