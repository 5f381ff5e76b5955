//! Per-display workspace → wallpaper lookup.
//!
//! Each display has a plain-text file at
//! `<hypr_dir>/hyprpaper/config/<display>/defaults.conf` with one mapping
//! per line:
//!
//! ```text
//! w-1=~/Pictures/walls/forest.png
//! w-2=$HOME/Pictures/walls/sea.jpg
//! ```
//!
//! There is no quoting or escaping.  The value is everything after the
//! first `=` of the matching line.  The file belongs to the user and is
//! never written.

use crate::traits::WorkspaceId;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Reads mapping files under a configuration root.
#[derive(Debug, Clone)]
pub struct MappingReader {
    root: PathBuf,
}

/// The mapping file exists but could not be read.
#[derive(Debug, thiserror::Error)]
#[error("failed to read {path}: {source}")]
pub struct MappingError {
    path: PathBuf,
    source: std::io::Error,
}

impl MappingReader {
    /// `root` is the directory holding one sub-directory per display
    /// (`<hypr_dir>/hyprpaper/config`).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path of the mapping file for `display`.
    pub fn file_for(&self, display: &str) -> PathBuf {
        self.root.join(display).join("defaults.conf")
    }

    /// Return the raw wallpaper reference configured for `workspace` on
    /// `display`.
    ///
    /// A missing file or a missing line is `Ok(None)`.  When several lines
    /// match, the first one wins.
    pub fn lookup(
        &self,
        display: &str,
        workspace: WorkspaceId,
    ) -> Result<Option<String>, MappingError> {
        let path = self.file_for(display);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(MappingError { path, source }),
        };

        let prefix = format!("w-{}=", workspace);
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| MappingError {
                path: path.clone(),
                source,
            })?;
            if let Some(reference) = line.strip_prefix(&prefix) {
                return Ok(Some(reference.to_string()));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    fn tmp_root() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "hyprwall-mapping-test-{}-{}",
            std::process::id(),
            id
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_mapping(root: &Path, display: &str, contents: &str) {
        let dir = root.join(display);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("defaults.conf"), contents).unwrap();
    }

    #[test]
    fn finds_exact_workspace() {
        let root = tmp_root();
        write_mapping(&root, "DP-1", "w-1=~/wall/a.png\nw-2=~/wall/b.png\n");
        let reader = MappingReader::new(&root);

        assert_eq!(reader.lookup("DP-1", 1).unwrap().as_deref(), Some("~/wall/a.png"));
        assert_eq!(reader.lookup("DP-1", 2).unwrap().as_deref(), Some("~/wall/b.png"));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn id_prefix_does_not_match_longer_id() {
        let root = tmp_root();
        write_mapping(&root, "DP-1", "w-10=/ten.png\nw-1=/one.png\n");
        let reader = MappingReader::new(&root);

        assert_eq!(reader.lookup("DP-1", 1).unwrap().as_deref(), Some("/one.png"));
        assert_eq!(reader.lookup("DP-1", 10).unwrap().as_deref(), Some("/ten.png"));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn first_match_wins() {
        let root = tmp_root();
        write_mapping(&root, "DP-1", "w-3=/first.png\nw-3=/second.png\n");
        let reader = MappingReader::new(&root);

        assert_eq!(reader.lookup("DP-1", 3).unwrap().as_deref(), Some("/first.png"));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn value_is_kept_verbatim() {
        let root = tmp_root();
        write_mapping(&root, "DP-1", "w-4= /spaced name.png=x\n");
        let reader = MappingReader::new(&root);

        assert_eq!(
            reader.lookup("DP-1", 4).unwrap().as_deref(),
            Some(" /spaced name.png=x")
        );
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_line_is_none() {
        let root = tmp_root();
        write_mapping(&root, "DP-1", "w-1=/a.png\n");
        let reader = MappingReader::new(&root);

        assert_eq!(reader.lookup("DP-1", 5).unwrap(), None);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_file_is_none() {
        let root = tmp_root();
        let reader = MappingReader::new(&root);

        assert_eq!(reader.lookup("HDMI-A-1", 1).unwrap(), None);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn negative_special_workspace_ids() {
        let root = tmp_root();
        write_mapping(&root, "DP-1", "w-1=/one.png\nw--98=/special.png\n");
        let reader = MappingReader::new(&root);

        assert_eq!(
            reader.lookup("DP-1", -98).unwrap().as_deref(),
            Some("/special.png")
        );
        let _ = std::fs::remove_dir_all(&root);
    }
}
