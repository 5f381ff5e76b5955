//! The reconciliation pass: bring every display's wallpaper in line with
//! its active workspace.
//!
//! [`Reconciler`] owns all mutable daemon state (the [`MonitorTable`]) and
//! is the only caller of [`Applier::apply`].  It is driven synchronously
//! from the event loop, so passes never overlap.

use crate::mapping::MappingReader;
use crate::paths::PathResolver;
use crate::state::MonitorTable;
use crate::traits::{Applier, Compositor, Display};
use log::{debug, info, warn};

/// Outcome counts of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Displays the applier was invoked for (successfully).
    pub applied: usize,
    /// Displays whose state was already current.
    pub unchanged: usize,
    /// Displays skipped: no workspace, no mapping, untracked, or a failed
    /// apply.
    pub skipped: usize,
}

/// Per-display decision, kept separate from the side effects for logging.
enum Outcome {
    Applied,
    Unchanged,
    Skipped,
}

pub struct Reconciler<C: Compositor, A: Applier> {
    compositor: C,
    applier: A,
    mappings: MappingReader,
    resolver: PathResolver,
    table: MonitorTable,
}

impl<C: Compositor, A: Applier> Reconciler<C, A> {
    pub fn new(
        compositor: C,
        applier: A,
        mappings: MappingReader,
        resolver: PathResolver,
        table: MonitorTable,
    ) -> Self {
        Self {
            compositor,
            applier,
            mappings,
            resolver,
            table,
        }
    }

    pub fn table(&self) -> &MonitorTable {
        &self.table
    }

    pub fn compositor(&self) -> &C {
        &self.compositor
    }

    pub fn mappings(&self) -> &MappingReader {
        &self.mappings
    }

    /// Run one full pass over the compositor's current displays.
    ///
    /// A failed compositor query is logged and treated as an empty round.
    pub fn reconcile(&mut self) -> PassReport {
        let displays = match self.compositor.displays() {
            Ok(d) => d,
            Err(e) => {
                warn!("display query failed, skipping this round: {}", e);
                return PassReport::default();
            }
        };

        let mut report = PassReport::default();
        for display in &displays {
            match self.reconcile_display(display) {
                Outcome::Applied => report.applied += 1,
                Outcome::Unchanged => report.unchanged += 1,
                Outcome::Skipped => report.skipped += 1,
            }
        }
        debug!("reconciliation pass: {:?}", report);
        report
    }

    fn reconcile_display(&mut self, display: &Display) -> Outcome {
        let name = display.name.as_str();
        let Some(state) = self.table.get_or_create(name) else {
            return Outcome::Skipped;
        };

        let Some(workspace) = display.active_workspace else {
            debug!("{}: no active workspace reported", name);
            return Outcome::Skipped;
        };

        if state.initialized && state.last_workspace == Some(workspace) {
            return Outcome::Unchanged;
        }

        let reference = match self.mappings.lookup(name, workspace) {
            Ok(Some(r)) => r,
            Ok(None) => {
                debug!("{}: no wallpaper mapped for workspace {}", name, workspace);
                return Outcome::Skipped;
            }
            Err(e) => {
                warn!("{}: {}", name, e);
                return Outcome::Skipped;
            }
        };

        if state.initialized && reference == state.last_wallpaper {
            debug!(
                "{}: workspace {} uses the current wallpaper, not reapplying",
                name, workspace
            );
            state.last_workspace = Some(workspace);
            return Outcome::Unchanged;
        }

        let path = self.resolver.expand(&reference);
        match self.applier.apply(name, &path) {
            Ok(()) => {
                info!("{}: workspace {} -> {}", name, workspace, path.display());
                self.table.update(name, workspace, &reference);
                Outcome::Applied
            }
            Err(e) => {
                warn!("{}: failed to apply {}: {}", name, path.display(), e);
                Outcome::Skipped
            }
        }
    }
}
