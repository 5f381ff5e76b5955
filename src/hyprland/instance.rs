//! Location of a running Hyprland instance's IPC sockets.

use std::path::PathBuf;

/// The two environment-provided identifiers that locate a Hyprland
/// instance.
///
/// Hyprland ≥ 0.40 stores its sockets under
/// `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyprlandInstance {
    runtime_dir: PathBuf,
    signature: String,
}

/// A required environment variable is missing.
#[derive(Debug, thiserror::Error)]
#[error("{0} not set")]
pub struct InstanceError(&'static str);

impl HyprlandInstance {
    /// Build an instance from explicit values.
    pub fn new(runtime_dir: impl Into<PathBuf>, signature: impl Into<String>) -> Self {
        Self {
            runtime_dir: runtime_dir.into(),
            signature: signature.into(),
        }
    }

    /// Read `XDG_RUNTIME_DIR` and `HYPRLAND_INSTANCE_SIGNATURE`.
    pub fn from_env() -> Result<Self, InstanceError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable lookup.
    /// Empty values count as unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, InstanceError> {
        let get = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(InstanceError(key))
        };
        let runtime_dir = get("XDG_RUNTIME_DIR")?;
        let signature = get("HYPRLAND_INSTANCE_SIGNATURE")?;
        Ok(Self::new(runtime_dir, signature))
    }

    fn dir(&self) -> PathBuf {
        self.runtime_dir.join("hypr").join(&self.signature)
    }

    /// Request socket (`.socket.sock`), used for `j/monitors` queries.
    pub fn socket_path(&self) -> PathBuf {
        self.dir().join(".socket.sock")
    }

    /// Event socket (`.socket2.sock`).
    pub fn socket2_path(&self) -> PathBuf {
        self.dir().join(".socket2.sock")
    }
}
