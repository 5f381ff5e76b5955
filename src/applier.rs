//! Script-driven wallpaper applier and process-table probe.
//!
//! Applying a wallpaper is three ordered side effects:
//!
//! 1. overwrite the pointer file (`current.conf`) with the expanded path
//!    and flush it, since the script reads it;
//! 2. send SIGTERM to every running instance of the applier script,
//!    matched by process name because an earlier daemon (or the user) may
//!    have started it;
//! 3. launch a fresh instance as a detached child.

use crate::traits::{Applier, ServiceProbe};
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use sysinfo::{ProcessesToUpdate, Signal, System};

/// Errors from [`ScriptApplier::apply`].
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("failed to write pointer file {path}: {source}")]
    PointerFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to launch {path}: {source}")]
    Spawn {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Send SIGTERM to every process whose name is exactly `name`, so the
/// script's own `trap` cleanup runs.  Returns how many were signalled; zero
/// is a normal outcome.
fn terminate_by_name(system: &mut System, name: &OsString) -> usize {
    system.refresh_processes(ProcessesToUpdate::All, true);
    let own_pid = sysinfo::Pid::from(std::process::id() as usize);
    system
        .processes_by_exact_name(name)
        .filter(|p| p.pid() != own_pid)
        .filter(|p| p.kill_with(Signal::Term).unwrap_or_else(|| p.kill()))
        .count()
}

/// [`Applier`] that runs `<script> <display> <path>`.
pub struct ScriptApplier {
    script: PathBuf,
    process_name: OsString,
    pointer_file: PathBuf,
    system: System,
}

impl ScriptApplier {
    /// `script` is launched for every apply; its file name is the process
    /// name terminated beforehand.  `pointer_file` receives the expanded
    /// path.
    pub fn new(script: impl AsRef<Path>, pointer_file: impl AsRef<Path>) -> Self {
        let script = script.as_ref().to_path_buf();
        let process_name = script.file_name().map(OsString::from).unwrap_or_default();
        Self {
            script,
            process_name,
            pointer_file: pointer_file.as_ref().to_path_buf(),
            system: System::new(),
        }
    }

    fn write_pointer(&self, path: &Path) -> Result<(), ApplyError> {
        let map_err = |source| ApplyError::PointerFile {
            path: self.pointer_file.clone(),
            source,
        };
        let mut file = File::create(&self.pointer_file).map_err(map_err)?;
        writeln!(file, "{}", path.display()).map_err(map_err)?;
        file.sync_all().map_err(map_err)
    }

    fn launch(&self, display: &str, path: &Path) -> Result<(), ApplyError> {
        let mut child = Command::new(&self.script)
            .arg(display)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            // Own process group: signals aimed at the daemon's group
            // (Ctrl-C, supervisor stop) do not reach the script.
            .process_group(0)
            .spawn()
            .map_err(|source| ApplyError::Spawn {
                path: self.script.clone(),
                source,
            })?;

        let pid = child.id();
        std::thread::spawn(move || match child.wait() {
            Ok(status) => debug!("applier {} exited: {}", pid, status),
            Err(e) => warn!("failed to reap applier {}: {}", pid, e),
        });
        Ok(())
    }
}

impl Applier for ScriptApplier {
    type Error = ApplyError;

    fn apply(&mut self, display: &str, path: &Path) -> Result<(), ApplyError> {
        self.write_pointer(path)?;

        let killed = terminate_by_name(&mut self.system, &self.process_name);
        if killed > 0 {
            debug!(
                "terminated {} running {:?} instance(s)",
                killed, self.process_name
            );
        }

        self.launch(display, path)?;
        info!("applied {} on {}", path.display(), display);
        Ok(())
    }
}

/// [`ServiceProbe`] that looks for a process by exact name.
pub struct ProcessProbe {
    name: OsString,
    system: System,
}

impl ProcessProbe {
    pub fn new(name: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            system: System::new(),
        }
    }
}

impl ServiceProbe for ProcessProbe {
    fn is_running(&mut self) -> bool {
        self.system.refresh_processes(ProcessesToUpdate::All, true);
        self.system.processes_by_exact_name(&self.name).next().is_some()
    }
}
