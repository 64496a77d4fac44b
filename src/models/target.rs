//! Test assembly targets
//!
//! Resolves declared assembly paths into existence-checked targets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One existence-verified test assembly
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    path: PathBuf,
}

impl Target {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// A declared target that does not exist on disk
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingTarget {
    pub path: PathBuf,
}

impl fmt::Display for MissingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Source file \"{}\" not found.", self.path.display())
    }
}

/// Split declared paths into runnable targets and missing ones.
///
/// Order of the declared paths is preserved. Missing paths are logged as
/// warnings and never abort the batch.
pub fn resolve_targets<I, P>(paths: I) -> (Vec<Target>, Vec<MissingTarget>)
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut targets = Vec::new();
    let mut missing = Vec::new();

    for path in paths {
        let path = path.into();
        if path.exists() {
            targets.push(Target { path });
        } else {
            let entry = MissingTarget { path };
            warn!("{}", entry);
            missing.push(entry);
        }
    }

    (targets, missing)
}

#[cfg(test)]
pub(crate) fn target_for_test(path: impl Into<PathBuf>) -> Target {
    Target { path: path.into() }
}
