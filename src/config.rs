//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/hyprwall/config.json`.
//! Every field is optional; a missing file means "all defaults".
//!
//! # Example
//!
//! ```json
//! {
//!   "hypr_dir": "/home/ada/.config/hypr",
//!   "service_process": "hyprpaper",
//!   "applier_script": "w.sh",
//!   "service_poll_ms": 1000,
//!   "query_timeout_ms": 1000,
//!   "max_displays": 16
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hyprland configuration directory.  `None` resolves to
    /// `$XDG_CONFIG_HOME/hypr` (or `~/.config/hypr`).
    pub hypr_dir: Option<PathBuf>,
    /// Process name of the wallpaper service to wait for at startup.
    pub service_process: String,
    /// File name of the applier script inside `<hypr_dir>/hyprpaper/`.
    pub applier_script: String,
    /// Pause between service liveness checks (ms).
    pub service_poll_ms: u64,
    /// Read/write timeout on compositor queries (ms).  `0` disables it.
    pub query_timeout_ms: u64,
    /// Maximum number of displays tracked at once.
    pub max_displays: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hypr_dir: None,
            service_process: "hyprpaper".into(),
            applier_script: "w.sh".into(),
            service_poll_ms: 1000,
            query_timeout_ms: 1000,
            max_displays: 16,
        }
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

/// Pick `$XDG_CONFIG_HOME` when set and non-empty, else `fallback`.
fn config_home_from(xdg: Option<OsString>, fallback: Option<PathBuf>) -> Option<PathBuf> {
    xdg.filter(|v| !v.is_empty()).map(PathBuf::from).or(fallback)
}

/// `$XDG_CONFIG_HOME`, falling back to `$HOME/.config`.  `None` when
/// neither can be resolved.
pub fn xdg_config_home() -> Option<PathBuf> {
    config_home_from(std::env::var_os("XDG_CONFIG_HOME"), dirs::config_dir())
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        xdg_config_home().map(|dir| dir.join("hyprwall").join("config.json"))
    }

    /// The configured `hypr_dir`, or `<config home>/hypr`.
    ///
    /// Fails when nothing is configured and no config home can be resolved.
    pub fn hypr_dir(&self) -> Result<PathBuf, ConfigError> {
        self.hypr_dir_with(xdg_config_home())
    }

    fn hypr_dir_with(&self, config_home: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        self.hypr_dir
            .clone()
            .or_else(|| config_home.map(|home| home.join("hypr")))
            .ok_or_else(|| {
                ConfigError(
                    "cannot locate the Hyprland config directory \
                     (set HOME, XDG_CONFIG_HOME or hypr_dir)"
                        .into(),
                )
            })
    }

    /// `<hypr_dir>/hyprpaper`.
    fn hyprpaper_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.hypr_dir()?.join("hyprpaper"))
    }

    /// Directory holding one `<display>/defaults.conf` per display.
    pub fn mapping_root(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.hyprpaper_dir()?.join("config"))
    }

    /// Pointer file read by the applier script.
    pub fn pointer_file(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.mapping_root()?.join("current.conf"))
    }

    pub fn applier_script(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.hyprpaper_dir()?.join(&self.applier_script))
    }

    pub fn service_poll_interval(&self) -> Duration {
        Duration::from_millis(self.service_poll_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "hypr_dir": "/etc/hypr",
            "service_process": "swww-daemon",
            "applier_script": "apply.sh",
            "service_poll_ms": 250,
            "query_timeout_ms": 500,
            "max_displays": 4
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.hypr_dir().unwrap(), PathBuf::from("/etc/hypr"));
        assert_eq!(cfg.service_process, "swww-daemon");
        assert_eq!(cfg.service_poll_interval(), Duration::from_millis(250));
        assert_eq!(cfg.query_timeout(), Duration::from_millis(500));
        assert_eq!(cfg.max_displays, 4);
        assert_eq!(
            cfg.applier_script().unwrap(),
            PathBuf::from("/etc/hypr/hyprpaper/apply.sh")
        );
    }

    #[test]
    fn derived_paths() {
        let cfg = Config {
            hypr_dir: Some("/h".into()),
            ..Config::default()
        };
        assert_eq!(cfg.mapping_root().unwrap(), PathBuf::from("/h/hyprpaper/config"));
        assert_eq!(
            cfg.pointer_file().unwrap(),
            PathBuf::from("/h/hyprpaper/config/current.conf")
        );
        assert_eq!(cfg.applier_script().unwrap(), PathBuf::from("/h/hyprpaper/w.sh"));
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        let d = Config::default();
        assert_eq!(cfg.hypr_dir, None);
        assert_eq!(cfg.service_process, d.service_process);
        assert_eq!(cfg.applier_script, d.applier_script);
        assert_eq!(cfg.service_poll_ms, 1000);
        assert_eq!(cfg.query_timeout_ms, 1000);
        assert_eq!(cfg.max_displays, 16);
    }

    #[test]
    fn unknown_keys_ignored() {
        let json = r#"{ "max_displays": 2, "future_section": { "key": 42 } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.max_displays, 2);
    }

    #[test]
    fn config_home_prefers_xdg_variable() {
        assert_eq!(
            config_home_from(Some("/xdg".into()), Some("/home/ada/.config".into())),
            Some(PathBuf::from("/xdg"))
        );
        assert_eq!(
            config_home_from(Some("".into()), Some("/home/ada/.config".into())),
            Some(PathBuf::from("/home/ada/.config"))
        );
        assert_eq!(config_home_from(None, None), None);
    }

    #[test]
    fn hypr_dir_defaults_under_config_home() {
        let cfg = Config::default();
        assert_eq!(
            cfg.hypr_dir_with(Some("/home/ada/.config".into())).unwrap(),
            PathBuf::from("/home/ada/.config/hypr")
        );
    }

    #[test]
    fn unresolvable_hypr_dir_is_an_error() {
        let cfg = Config::default();
        assert!(cfg.hypr_dir_with(None).is_err());

        let explicit = Config {
            hypr_dir: Some("/h".into()),
            ..Config::default()
        };
        assert_eq!(explicit.hypr_dir_with(None).unwrap(), PathBuf::from("/h"));
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "hyprwall-no-config-{}.json",
            std::process::id()
        ));
        assert!(Config::load(&path).is_err());
    }
}
