//! [`Compositor`] implementation backed by Hyprland IPC.
//!
//! Talks directly to Hyprland's request socket at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock` and
//! sends `j/monitors`, which returns the same document `hyprctl monitors -j`
//! prints.  Only `name` and `activeWorkspace.id` are decoded.

use crate::traits::{Compositor, Display, WorkspaceId};
use log::debug;
use serde::Deserialize;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Hyprland-backed compositor query client.
///
/// No connection is held open; every query opens a short-lived request
/// socket with the configured read/write timeout.
pub struct HyprlandClient {
    socket: PathBuf,
    timeout: Duration,
}

/// Errors that can occur when querying Hyprland.
///
/// The reconciler treats every variant as "skip this round".
#[derive(Debug, thiserror::Error)]
#[error("hyprland IPC error: {0}")]
pub struct HyprlandQueryError(String);

impl HyprlandClient {
    /// Create a client for the request socket at `socket`.
    pub fn new(socket: impl AsRef<Path>, timeout: Duration) -> Self {
        Self {
            socket: socket.as_ref().to_path_buf(),
            timeout,
        }
    }

    /// Send a raw request and return the response as a string.
    fn request(&self, command: &str) -> Result<String, HyprlandQueryError> {
        let mut stream = UnixStream::connect(&self.socket).map_err(|e| {
            HyprlandQueryError(format!("connect to {}: {}", self.socket.display(), e))
        })?;

        let timeout = Some(self.timeout).filter(|t| !t.is_zero());
        stream
            .set_read_timeout(timeout)
            .and_then(|_| stream.set_write_timeout(timeout))
            .map_err(|e| HyprlandQueryError(format!("set timeout: {}", e)))?;

        stream
            .write_all(command.as_bytes())
            .map_err(|e| HyprlandQueryError(format!("write: {}", e)))?;

        let mut response = Vec::new();
        stream
            .read_to_end(&mut response)
            .map_err(|e| HyprlandQueryError(format!("read: {}", e)))?;

        String::from_utf8(response).map_err(|e| HyprlandQueryError(format!("utf-8: {}", e)))
    }
}

//  Minimal serde structs for the JSON we care about

/// Subset of one record returned by `j/monitors`.
#[derive(Deserialize)]
struct MonitorJson {
    name: String,
    #[serde(rename = "activeWorkspace", default)]
    active_workspace: Option<WorkspaceJson>,
}

/// Subset of the nested `activeWorkspace` object.
#[derive(Deserialize)]
struct WorkspaceJson {
    #[serde(default)]
    id: Option<WorkspaceId>,
}

/// Decode a `j/monitors` response.
///
/// The document must be a JSON array.  Records are decoded one at a time so
/// a single malformed record (no `name`, wrong types) is dropped instead of
/// failing the whole list.  A record without `activeWorkspace.id` is kept
/// with `active_workspace: None`.
pub(crate) fn parse_monitors(json: &str) -> Result<Vec<Display>, HyprlandQueryError> {
    let records: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| HyprlandQueryError(format!("parse: {}", e)))?;

    Ok(records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<MonitorJson>(record) {
            Ok(m) => Some(Display {
                name: m.name,
                active_workspace: m.active_workspace.and_then(|w| w.id),
            }),
            Err(e) => {
                debug!("ignoring monitor record: {}", e);
                None
            }
        })
        .collect())
}

impl Compositor for HyprlandClient {
    type Error = HyprlandQueryError;

    fn displays(&self) -> Result<Vec<Display>, Self::Error> {
        let json = self.request("j/monitors")?;
        parse_monitors(&json)
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::net::UnixListener;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    fn tmp_socket_path() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "hyprwall-query-test-{}-{}.sock",
            std::process::id(),
            id
        ))
    }

    const MONITORS: &str = r#"[
        {
            "id": 0,
            "name": "DP-1",
            "description": "Dell Inc. U2720Q",
            "width": 3840,
            "height": 2160,
            "activeWorkspace": { "id": 1, "name": "1" },
            "specialWorkspace": { "id": 0, "name": "" },
            "focused": true
        },
        {"id":1,"name":"HDMI-A-1","activeWorkspace":{"id":7,"name":"7"},"focused":false}
    ]"#;

    #[test]
    fn parses_names_and_active_workspaces() {
        let displays = parse_monitors(MONITORS).unwrap();
        assert_eq!(
            displays,
            vec![
                Display {
                    name: "DP-1".into(),
                    active_workspace: Some(1),
                },
                Display {
                    name: "HDMI-A-1".into(),
                    active_workspace: Some(7),
                },
            ]
        );
    }

    #[test]
    fn missing_active_workspace_is_none_not_error() {
        let json = r#"[{"name":"DP-1"},{"name":"DP-2","activeWorkspace":{"name":"x"}}]"#;
        let displays = parse_monitors(json).unwrap();
        assert_eq!(displays.len(), 2);
        assert!(displays.iter().all(|d| d.active_workspace.is_none()));
    }

    #[test]
    fn record_without_name_is_dropped() {
        let json = r#"[{"id":0,"activeWorkspace":{"id":1}},{"name":"DP-2","activeWorkspace":{"id":2}}]"#;
        let displays = parse_monitors(json).unwrap();
        assert_eq!(displays.len(), 1);
        assert_eq!(displays[0].name, "DP-2");
    }

    #[test]
    fn empty_list_is_fine() {
        assert!(parse_monitors("[]").unwrap().is_empty());
    }

    #[test]
    fn non_array_response_is_an_error() {
        assert!(parse_monitors("unknown request").is_err());
    }

    #[test]
    fn queries_over_socket() {
        let path = tmp_socket_path();
        let listener = UnixListener::bind(&path).expect("bind");

        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut buf = [0u8; 64];
            let n = stream.read(&mut buf).expect("read");
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            stream.write_all(MONITORS.as_bytes()).expect("write");
            request
        });

        let client = HyprlandClient::new(&path, Duration::from_secs(2));
        let displays = client.displays().unwrap();
        assert_eq!(server.join().unwrap(), "j/monitors");
        assert_eq!(displays.len(), 2);
        assert_eq!(displays[1].active_workspace, Some(7));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unreachable_socket_is_an_error() {
        let client = HyprlandClient::new(tmp_socket_path(), Duration::from_millis(100));
        assert!(client.displays().is_err());
    }

    #[test]
    fn silent_compositor_times_out() {
        let path = tmp_socket_path();
        let listener = UnixListener::bind(&path).expect("bind");

        // Accept and hold the connection open without answering.
        let _server = std::thread::spawn(move || {
            let conn = listener.accept();
            std::thread::sleep(Duration::from_millis(500));
            drop(conn);
        });

        let client = HyprlandClient::new(&path, Duration::from_millis(100));
        assert!(client.displays().is_err());

        let _ = std::fs::remove_file(&path);
    }
}
