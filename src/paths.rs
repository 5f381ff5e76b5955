//! Home-directory expansion for configured wallpaper references.

use std::path::{Path, PathBuf};

/// Expands a leading `~`, `$HOME` or `${HOME}` against a fixed home
/// directory.
///
/// Only the start of the reference is considered; everything else is
/// returned unchanged.  The raw reference is what the reconciler stores and
/// compares, this expansion happens just before the applier runs.
#[derive(Debug, Clone)]
pub struct PathResolver {
    home: Option<String>,
}

impl PathResolver {
    /// Resolve against the current user's home directory.
    pub fn from_env() -> Self {
        Self {
            home: dirs::home_dir().map(|h| h.to_string_lossy().into_owned()),
        }
    }

    /// Resolve against an explicit home directory.
    pub fn with_home(home: impl AsRef<Path>) -> Self {
        Self {
            home: Some(home.as_ref().to_string_lossy().into_owned()),
        }
    }

    pub fn expand(&self, reference: &str) -> PathBuf {
        let Some(home) = self.home.as_deref() else {
            return PathBuf::from(reference);
        };

        for var in ["${HOME}", "$HOME"] {
            if let Some(rest) = reference.strip_prefix(var) {
                if rest.is_empty() || rest.starts_with('/') {
                    return PathBuf::from(format!("{}{}", home, rest));
                }
            }
        }

        PathBuf::from(shellexpand::tilde_with_context(reference, || Some(home)).into_owned())
    }
}
