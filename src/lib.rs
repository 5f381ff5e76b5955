//! **hyprwall** keeps each monitor's wallpaper in sync with its active
//! Hyprland workspace.
//!
//! Every monitor has a small mapping file that assigns a wallpaper to each
//! workspace id.  The daemon listens to Hyprland's event socket and, on
//! every workspace or monitor-focus change, runs a reconciliation pass that
//! re-applies a wallpaper only where it actually changed.
//!
//! # Architecture
//!
//! The decision logic in [`reconcile::Reconciler`] depends on three traits:
//!
//! * [`traits::Compositor`]: lists outputs and their active workspaces.
//! * [`traits::Applier`]: puts a wallpaper on an output.
//! * [`traits::ServiceProbe`]: tells whether the wallpaper service is up.
//!
//! Concrete implementations live in [`hyprland`] (Hyprland IPC and the
//! event listener) and [`applier`] (the external script and the process
//! table).

pub mod applier;
pub mod config;
pub mod hyprland;
pub mod mapping;
pub mod paths;
pub mod reconcile;
pub mod state;
pub mod traits;
