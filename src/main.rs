//! Entry point for the **hyprwall** daemon.
//!
//! Resolves the Hyprland instance, waits for the wallpaper service, runs an
//! initial reconciliation pass and then reconciles on every relevant
//! compositor event until the event socket closes.
//!
//! Flags:
//!
//! * `--once`: run a single pass (no service wait, no event socket) and exit.
//! * `--list`: print every display, its workspace and mapped wallpaper.
//!
//! Exit status is 1 for a missing `XDG_RUNTIME_DIR` /
//! `HYPRLAND_INSTANCE_SIGNATURE`, an unresolvable Hyprland config
//! directory, a failed event-socket connect, and also when the event socket
//! closes.  The daemon does not reconnect, so a closed socket is reported
//! as a failure for `Restart=on-failure` style supervisors to act on.

use hyprwall::applier::{ProcessProbe, ScriptApplier};
use hyprwall::config::{Config, ConfigError};
use hyprwall::hyprland::events::EventListener;
use hyprwall::hyprland::instance::HyprlandInstance;
use hyprwall::hyprland::query::HyprlandClient;
use hyprwall::mapping::MappingReader;
use hyprwall::paths::PathResolver;
use hyprwall::reconcile::Reconciler;
use hyprwall::state::MonitorTable;
use hyprwall::traits::Compositor;
use log::{debug, error, info};

/// Try to load the config from `$XDG_CONFIG_HOME/hyprwall/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let Some(path) = Config::default_path() else {
        info!("no config directory, using defaults");
        return Config::default();
    };
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let once = std::env::args().any(|a| a == "--once");
    let list = std::env::args().any(|a| a == "--list");

    let instance = match HyprlandInstance::from_env() {
        Ok(i) => i,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let config = load_config();
    let mut reconciler = match build_reconciler(&instance, &config) {
        Ok(r) => r,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if list {
        list_displays(&reconciler);
    } else if once {
        let report = reconciler.reconcile();
        info!(
            "applied {}, unchanged {}, skipped {}",
            report.applied, report.unchanged, report.skipped
        );
    } else {
        run_daemon(&instance, &config, reconciler);
    }
}

fn build_reconciler(
    instance: &HyprlandInstance,
    config: &Config,
) -> Result<Reconciler<HyprlandClient, ScriptApplier>, ConfigError> {
    let compositor = HyprlandClient::new(instance.socket_path(), config.query_timeout());
    let applier = ScriptApplier::new(config.applier_script()?, config.pointer_file()?);
    Ok(Reconciler::new(
        compositor,
        applier,
        MappingReader::new(config.mapping_root()?),
        PathResolver::from_env(),
        MonitorTable::new(config.max_displays),
    ))
}

/// Normal daemon mode.  Never returns.
fn run_daemon(
    instance: &HyprlandInstance,
    config: &Config,
    mut reconciler: Reconciler<HyprlandClient, ScriptApplier>,
) {
    let mut probe = ProcessProbe::new(&config.service_process);
    let mut listener = EventListener::new(instance.socket2_path(), config.service_poll_interval());

    listener.wait_for_service(&mut probe);
    reconciler.reconcile();

    let stream = match listener.connect() {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("hyprwall running");
    let err = listener.listen(stream, |trigger| {
        debug!("{:?} event, reconciling", trigger);
        reconciler.reconcile();
    });
    // End-of-stream is a failure too: there is no reconnect.
    error!("{}", err);
    std::process::exit(1);
}

/// `--list`: show what a pass would consider, without applying anything.
fn list_displays(reconciler: &Reconciler<HyprlandClient, ScriptApplier>) {
    let displays = match reconciler.compositor().displays() {
        Ok(d) => d,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    for display in displays {
        let workspace = display
            .active_workspace
            .map(|w| w.to_string())
            .unwrap_or_else(|| "-".into());
        let wallpaper = display
            .active_workspace
            .and_then(|w| reconciler.mappings().lookup(&display.name, w).ok().flatten())
            .unwrap_or_else(|| "-".into());
        println!("{}\t{}\t{}", display.name, workspace, wallpaper);
    }
}
