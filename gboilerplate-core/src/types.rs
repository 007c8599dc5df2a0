use std::{fmt, path::Path};

use crate::error::{Error, Result};

/// Base name of the target folder; becomes the manifest `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(pub String);

impl ProjectName {
    pub fn from_target(target: &Path) -> Result<Self> {
        target
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.trim().is_empty())
            .map(|name| ProjectName(name.to_string()))
            .ok_or_else(|| Error::invalid_target(target))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_name_is_base_name() {
        let name = ProjectName::from_target(Path::new("projects/demo-app")).unwrap();
        assert_eq!(name.as_str(), "demo-app");

        let trailing = ProjectName::from_target(Path::new("demo-app/")).unwrap();
        assert_eq!(trailing.to_string(), "demo-app");
    }

    #[test]
    fn test_project_name_rejects_unnamed_targets() {
        for target in ["", ".", "..", "/"] {
            assert!(
                matches!(
                    ProjectName::from_target(Path::new(target)),
                    Err(Error::InvalidTarget { .. })
                ),
                "{target:?} should be rejected"
            );
        }
    }
}
