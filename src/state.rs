//! Per-display record of what was last applied.

use crate::traits::WorkspaceId;
use log::warn;
use std::collections::HashMap;

/// What the daemon last did for one display.
///
/// Entries are created lazily on first sight and never removed; an entry
/// for a disconnected display simply stops being looked at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorState {
    pub name: String,
    /// `None` until a workspace has been recorded.
    pub last_workspace: Option<WorkspaceId>,
    /// Raw (unexpanded) mapping value last applied; empty if none.
    pub last_wallpaper: String,
    /// `false` until a wallpaper has been applied to this display at least
    /// once.  While `false` any resolvable wallpaper is applied.
    pub initialized: bool,
}

impl MonitorState {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// Registry of [`MonitorState`]s keyed by display name, with a fixed
/// capacity.
#[derive(Debug)]
pub struct MonitorTable {
    entries: HashMap<String, MonitorState>,
    capacity: usize,
}

impl MonitorTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
        }
    }

    /// Return the entry for `name`, creating a fresh one if needed.
    ///
    /// Returns `None` when `name` is new and the table is already full; the
    /// caller should skip that display.
    pub fn get_or_create(&mut self, name: &str) -> Option<&mut MonitorState> {
        if !self.entries.contains_key(name) {
            if self.entries.len() >= self.capacity {
                warn!(
                    "not tracking display {}: already tracking {} displays",
                    name, self.capacity
                );
                return None;
            }
            self.entries.insert(name.to_string(), MonitorState::new(name));
        }
        self.entries.get_mut(name)
    }

    /// Record an applied wallpaper for `name` and mark it initialized.
    ///
    /// No-op for displays the table is not tracking.
    pub fn update(&mut self, name: &str, workspace: WorkspaceId, wallpaper: &str) {
        if let Some(state) = self.entries.get_mut(name) {
            state.last_workspace = Some(workspace);
            state.last_wallpaper = wallpaper.to_string();
            state.initialized = true;
        }
    }

    pub fn get(&self, name: &str) -> Option<&MonitorState> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
