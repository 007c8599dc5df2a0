//! Scaffold a new project from a boilerplate git repository.
//!
//! A run clones the template into a folder that must not exist yet, strips the
//! template's git history, renames the project in its manifest and installs
//! dependencies:
//!
//! ```no_run
//! use gboilerplate_core::{
//!     config::ScaffoldConfig, progress::LogReporter, scaffold::Scaffolder,
//!     templates::TemplateRegistry,
//! };
//!
//! # async fn example() -> gboilerplate_core::Result<()> {
//! let registry = TemplateRegistry::builtin();
//! let config = ScaffoldConfig::new("demo-app", registry.get(None)?.clone());
//! let report = Scaffolder::with_config(config).run(&LogReporter).await?;
//! println!("created {}", report.project_name);
//! # Ok(())
//! # }
//! ```

pub mod clone;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod install;
pub mod manifest;
pub mod progress;
pub mod scaffold;
pub mod templates;
pub mod types;

pub use error::{Error, Result};
