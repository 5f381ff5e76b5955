//! Hyprland-specific implementations.
//!
//! This module provides the [`Compositor`](crate::traits::Compositor)
//! backend and the event listener, both powered by Hyprland's IPC sockets.
//!
//! Nothing outside this module should reference Hyprland's socket layout
//! directly.

pub mod events;
pub mod instance;
pub mod query;
