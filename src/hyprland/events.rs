//! Listens to Hyprland's event socket and reports workspace changes.
//!
//! Hyprland writes one `EVENT>>DATA\n` line per event to
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket2.sock`.
//! Only two kinds of line matter here:
//!
//! | Substring       | Meaning                                        |
//! |-----------------|------------------------------------------------|
//! | `workspace>>`   | the focused monitor switched workspace         |
//! | `focusedmon>>`  | focus moved to another monitor                 |
//!
//! The match is a plain substring test on the raw line, so names such as
//! `createworkspace>>` also qualify.  A spurious trigger only costs a
//! reconciliation pass that finds nothing to do.
//!
//! # Lifecycle
//!
//! ```text
//! WaitingForService ──service up──▶ Connecting ──connected──▶ Listening
//!                                        │                        │
//!                                        └──── error ──▶ Failed ◀─┘ eof / read error
//! ```
//!
//! There is no reconnect: once the stream ends the caller is expected to
//! exit and let a supervisor restart the daemon.

use crate::traits::ServiceProbe;
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Event kinds that warrant a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Workspace,
    FocusedMonitor,
}

/// Where the listener is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    WaitingForService,
    Connecting,
    Listening,
    Failed,
}

/// Error from the event listener.  Every variant is terminal.
#[derive(Debug, thiserror::Error)]
pub enum EventListenerError {
    #[error("connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("event socket read error: {0}")]
    Read(#[from] std::io::Error),
    #[error("event socket closed")]
    Closed,
}

/// Classify a single raw event line.
pub fn classify(line: &str) -> Option<Trigger> {
    if line.contains("workspace>>") {
        Some(Trigger::Workspace)
    } else if line.contains("focusedmon>>") {
        Some(Trigger::FocusedMonitor)
    } else {
        None
    }
}

/// Blocking reader over Hyprland's event socket.
pub struct EventListener {
    path: PathBuf,
    poll_interval: Duration,
    state: ListenerState,
}

impl EventListener {
    /// Create a listener for the event socket at `path`.
    ///
    /// `poll_interval` is the pause between service liveness checks while
    /// waiting for the wallpaper service.
    pub fn new(path: impl AsRef<Path>, poll_interval: Duration) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            poll_interval,
            state: ListenerState::WaitingForService,
        }
    }

    pub fn state(&self) -> ListenerState {
        self.state
    }

    /// Block until `probe` reports the service as running, then pause one
    /// more poll interval so the service can finish setting up its IPC.
    ///
    /// There is no timeout; the daemon is meant to be started early and
    /// wait for its dependency.
    pub fn wait_for_service(&mut self, probe: &mut impl ServiceProbe) {
        self.state = ListenerState::WaitingForService;
        let mut logged = false;
        while !probe.is_running() {
            if !logged {
                info!("waiting for wallpaper service");
                logged = true;
            }
            std::thread::sleep(self.poll_interval);
        }
        info!("wallpaper service is running");
        std::thread::sleep(self.poll_interval);
        self.state = ListenerState::Connecting;
    }

    /// Connect to the event socket.
    pub fn connect(&mut self) -> Result<UnixStream, EventListenerError> {
        self.state = ListenerState::Connecting;
        info!("connecting to socket2: {}", self.path.display());
        match UnixStream::connect(&self.path) {
            Ok(stream) => {
                info!("connected to {}", self.path.display());
                self.state = ListenerState::Listening;
                Ok(stream)
            }
            Err(source) => {
                self.state = ListenerState::Failed;
                Err(EventListenerError::Connect {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }

    /// Read events from `stream` until it ends, calling `on_trigger`
    /// synchronously for every qualifying line.
    ///
    /// The next line is not read until `on_trigger` returns.  This method
    /// only returns on end-of-stream or a read error, both of which leave
    /// the listener in [`ListenerState::Failed`].
    pub fn listen<F>(&mut self, stream: UnixStream, mut on_trigger: F) -> EventListenerError
    where
        F: FnMut(Trigger),
    {
        self.state = ListenerState::Listening;
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    // Window titles are not guaranteed to be UTF-8.
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches('\n');
                    if line.is_empty() {
                        continue;
                    }
                    debug!("event: {}", line);
                    if let Some(trigger) = classify(line) {
                        on_trigger(trigger);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    error!("socket2 read error: {}", e);
                    self.state = ListenerState::Failed;
                    return EventListenerError::Read(e);
                }
            }
        }

        warn!("socket2 stream ended");
        self.state = ListenerState::Failed;
        EventListenerError::Closed
    }
}

//  Tests
