//! curfew - time-based domain blocking through the hosts file
//!
//! Entry point. Wires together:
//! - Settings loading
//! - The JSON policy store
//! - The group policy engine and hosts synthesis
//! - Hosts file lifecycle, resolver cache flushing and prompts

mod app;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use curfew_api::FieldKind;
use curfew_config::{load_config, load_config_or_default, Settings};
use curfew_host_unix::{is_privileged, SystemCacheFlusher, TerminalConfirmer};
use curfew_store::JsonStore;
use curfew_util::{
    config_path_from_env, config_path_without_env, is_mock_time_active, CurfewError, GroupName,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::{Action, App, Request};
use crate::output::Palette;

/// curfew - Block domains through the hosts file on a schedule
#[derive(Parser, Debug)]
#[command(name = "curfew", version)]
#[command(
    about = "Block domains through the hosts file according to time-based group rules",
    long_about = None,
    after_help = "Time-based rules need curfew to run every hour; see --print-crontab."
)]
struct Args {
    /// Display groups, their fields and status
    #[arg(short, long, visible_alias = "status")]
    list: bool,

    /// Regenerate the hosts file
    #[arg(short, long)]
    update: bool,

    /// Show the new hosts file and ask before writing it
    #[arg(long)]
    confirm: bool,

    /// Put a group on the active list
    #[arg(short = 'A', long)]
    activate: bool,

    /// Take a group off the active list
    #[arg(short = 'D', long)]
    deactivate: bool,

    /// Remove a group, or the given domain/hour/day from it
    #[arg(short, long)]
    remove: bool,

    /// Group to act on
    #[arg(short, long, value_name = "GROUP")]
    group: Option<String>,

    /// Add a group or group field value (group defaults to "default")
    #[arg(short, long)]
    add: bool,

    /// Empty a group field: hours, days or domains
    #[arg(short, long, value_name = "FIELD")]
    empty: Option<FieldKind>,

    /// Domain, e.g. example.com
    #[arg(short, long, visible_alias = "domains", value_name = "DOMAIN")]
    domain: Option<String>,

    /// Hour (8) or hour range (9-17) on a 24 hour clock, or *
    #[arg(short = 'H', long, visible_alias = "hours", value_name = "HOURS")]
    hour: Option<String>,

    /// Full day name (Monday), or *
    #[arg(short = 'y', long, visible_alias = "days", value_name = "DAY")]
    day: Option<String>,

    /// Do not colour output
    #[arg(long)]
    no_color: bool,

    /// Print the crontab line that runs curfew hourly
    #[arg(long)]
    print_crontab: bool,

    /// Run as the hourly cron job: no colour, no prompts, always update
    #[arg(long)]
    cron: bool,

    /// Policy store file (default: ~/.local/share/curfew/curfew.json)
    #[arg(short = 'f', long = "file", env = "CURFEW_STORE", value_name = "PATH")]
    store_file: Option<PathBuf>,

    /// Log file used in the crontab line
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Configuration file path (or set CURFEW_CONFIG; default: ~/.config/curfew/config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Remove groups without asking
    #[arg(long)]
    yes: bool,

    /// Interactive mode (not supported yet)
    #[arg(short, long)]
    interactive: bool,
}

impl Args {
    /// Resolve flags into a request; `bare` is true when no arguments were passed.
    fn request(&self, bare: bool) -> Request {
        let action = if self.remove {
            Some(Action::Remove)
        } else if let Some(field) = self.empty {
            Some(Action::Empty(field))
        } else if self.add {
            Some(Action::Add)
        } else if self.activate {
            Some(Action::Activate)
        } else if self.deactivate {
            Some(Action::Deactivate)
        } else {
            None
        };

        Request {
            action,
            group: self.group.as_deref().map(GroupName::new),
            domain: self.domain.clone(),
            hour: self.hour.clone(),
            day: self.day.clone(),
            list: self.list,
            print_crontab: self.print_crontab,
            update: self.update || self.cron || bare,
            confirm: self.confirm && !self.cron,
            assume_yes: self.yes,
            cron: self.cron,
            interactive: self.interactive,
        }
    }

    fn colorless(&self) -> bool {
        self.no_color || self.cron
    }
}

/// Settings from the config file, with command-line overrides applied
fn load_settings(args: &Args) -> Result<Settings> {
    let explicit = args.config.clone().or_else(config_path_from_env);
    let mut settings = match &explicit {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            let path = config_path_without_env();
            load_config_or_default(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
    };

    if let Some(path) = &args.store_file {
        settings.store_path = path.clone();
    }
    if let Some(path) = &args.log_file {
        settings.log_file = path.clone();
    }
    Ok(settings)
}

fn run(args: Args, bare: bool) -> Result<()> {
    let settings = load_settings(&args)?;
    debug!(
        store = %settings.store_path.display(),
        hosts = %settings.hosts.live.display(),
        blackhole = %settings.hosts.blackhole,
        "Settings loaded"
    );

    if is_mock_time_active() {
        warn!("Mock time is active, schedules are evaluated against a shifted clock");
    }

    let request = args.request(bare);
    if request.update && !is_privileged() {
        warn!("Not running as root, writing the hosts file will probably fail");
    }

    let store = JsonStore::new(&settings.store_path);
    let mut app = App::new(
        settings,
        Box::new(store),
        Box::new(SystemCacheFlusher::detect()),
        Box::new(TerminalConfirmer::new()),
        Palette::detect(args.colorless()),
        std::io::stdout().lock(),
    );
    app.run(&request, &curfew_util::now())
}

fn main() -> ExitCode {
    let bare = std::env::args_os().len() <= 1;
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!args.colorless())
        .with_target(false)
        .init();

    debug!(version = env!("CARGO_PKG_VERSION"), "curfew starting");

    match run(args, bare) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<CurfewError>() {
            Some(CurfewError::UserAbort) => {
                info!("Quit, nothing written");
                ExitCode::SUCCESS
            }
            _ => {
                error!(error = format!("{:#}", err), "curfew failed");
                ExitCode::FAILURE
            }
        },
    }
}
