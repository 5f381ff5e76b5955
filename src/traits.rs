//! Core traits that decouple hyprwall from the compositor, the wallpaper
//! applier and the process table.
//!
//! The [`Reconciler`](crate::reconcile::Reconciler) only depends on these
//! abstractions.  Concrete backends live in [`hyprland`](crate::hyprland)
//! and [`applier`](crate::applier); tests plug in recording doubles.

use std::path::Path;

/// Compositor-assigned workspace identifier.
pub type WorkspaceId = i32;

/// One output as reported by the compositor.
///
/// Displays are rediscovered on every query and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    /// Stable output name, e.g. `DP-1`.
    pub name: String,
    /// Id of the workspace currently shown on this output, or `None` when
    /// the compositor did not report one.
    pub active_workspace: Option<WorkspaceId>,
}

/// Read-only view of the compositor's outputs.
pub trait Compositor {
    /// The error type produced by this compositor backend.
    type Error: std::error::Error + Send + 'static;

    /// Return every output the compositor currently knows about.
    ///
    /// An empty list is a valid answer (the compositor may be transiently
    /// unreachable or headless).
    fn displays(&self) -> Result<Vec<Display>, Self::Error>;

    /// Return the active workspace of `display`, or `None` if the display is
    /// unknown or has no active workspace.
    fn active_workspace(&self, display: &str) -> Result<Option<WorkspaceId>, Self::Error> {
        Ok(self
            .displays()?
            .into_iter()
            .find(|d| d.name == display)
            .and_then(|d| d.active_workspace))
    }
}

/// Something that can put a wallpaper on a display.
///
/// Implementations must not block on the rendering program; a successful
/// return only means the request was issued.
pub trait Applier {
    /// The error type produced by this applier.
    type Error: std::error::Error + Send + 'static;

    /// Show the image at `path` on `display`.
    fn apply(&mut self, display: &str, path: &Path) -> Result<(), Self::Error>;
}

/// Liveness check for the external wallpaper service.
pub trait ServiceProbe {
    /// `true` once the service process is running.
    fn is_running(&mut self) -> bool;
}
