//! wacom-ff entry point.
//!
//! Parses the command line, merges it with the optional configuration file,
//! sets up logging and runs the [`ServiceController`] until it is interrupted.
//!
//! # Usage
//!
//! ```text
//! wacom-ff --device "Wacom Intuos Pro M Pen stylus" --every 2
//! ```
//!
//! Once running, the daemon is controlled with signals:
//!
//! | Signal    | Effect                                          |
//! |-----------|-------------------------------------------------|
//! | `SIGALRM` | poll now                                        |
//! | `SIGPOLL` | reload the monitor layout, then poll            |
//! | `SIGUSR1` | pause a running service, resume a paused one    |
//! | `SIGINT`  | stop and exit (also `SIGTERM`)                  |
//!
//! # Precedence
//!
//! Command-line flags beat environment variables, which beat the config file
//! (`~/.config/wacom-ff/config.toml`), which beats the built-in defaults.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use wacom_ff::application::{ServiceController, ServiceSettings};
use wacom_ff::infrastructure::storage::config::{
    load_config, load_config_from, AppConfig, CommandsConfig, ConfigError,
};
use wacom_ff::infrastructure::{
    spawn_signal_bridge, ExternalTool, XdotoolCursorLocator, XrandrMonitorEnumerator,
    XsetwacomMapper,
};

/// Capacity of the signal → controller event queue.
const EVENT_QUEUE_DEPTH: usize = 64;

/// Longest accepted poll interval, in seconds (one day).
const MAX_POLL_INTERVAL_SECS: u64 = 24 * 60 * 60;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Keep a graphics tablet mapped to the monitor under the mouse cursor.
#[derive(Debug, Parser)]
#[command(name = "wacom-ff", version)]
struct Cli {
    /// Input device to remap, as listed by `xsetwacom list devices`.
    #[arg(short, long, env = "WACOM_FF_DEVICE")]
    device: Option<String>,

    /// Poll every N seconds.  `0` only polls on SIGALRM/SIGPOLL.
    #[arg(
        short,
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(0..=MAX_POLL_INTERVAL_SECS)
    )]
    every: Option<u64>,

    /// Reload the monitor layout on every poll, not only on SIGPOLL.
    #[arg(short, long)]
    always_poll: bool,

    /// Log level or `tracing` filter directive.  `RUST_LOG` takes precedence.
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Append logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Configuration file to use instead of the default location.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seconds before a hung external tool is killed.  `0` waits forever.
    #[arg(long, value_name = "SECS")]
    command_timeout: Option<u64>,
}

/// Everything `main` needs after merging the CLI with the config file.
#[derive(Debug)]
struct RuntimeOptions {
    settings: ServiceSettings,
    log_level: String,
    log_file: Option<PathBuf>,
    command_timeout: Option<Duration>,
    tools: CommandsConfig,
}

impl Cli {
    /// Loads the config file named by `--config`, or the default one.
    ///
    /// An explicit path must exist; the default location may be absent.
    fn load_file_config(&self) -> anyhow::Result<AppConfig> {
        match &self.config {
            Some(path) => {
                if !path.exists() {
                    bail!("config file {} does not exist", path.display());
                }
                load_config_from(path)
                    .with_context(|| format!("failed to load {}", path.display()))
            }
            None => match load_config() {
                Err(ConfigError::NoConfigDir) => Ok(AppConfig::default()),
                other => other.context("failed to load the config file"),
            },
        }
    }

    /// Applies the CLI on top of `file`.
    ///
    /// # Errors
    ///
    /// Fails if no device is configured anywhere or the poll interval is out
    /// of range.
    fn into_runtime_options(self, file: AppConfig) -> anyhow::Result<RuntimeOptions> {
        let Some(device) = self.device.or(file.service.device) else {
            bail!("no input device given; pass --device, set WACOM_FF_DEVICE or add it to the config file");
        };

        let every = self.every.unwrap_or(file.service.every);
        if every > MAX_POLL_INTERVAL_SECS {
            bail!("poll interval of {every} s exceeds the maximum of {MAX_POLL_INTERVAL_SECS} s");
        }

        let mut settings = ServiceSettings::new(device);
        settings.poll_interval = Duration::from_secs(every);
        settings.always_refresh_on_poll = self.always_poll || file.service.always_poll;

        let timeout_secs = self.command_timeout.unwrap_or(file.commands.timeout_secs);
        let command_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        Ok(RuntimeOptions {
            settings,
            log_level: self.log_level.unwrap_or(file.logging.level),
            log_file: self.log_file.or(file.logging.file),
            command_timeout,
            tools: file.commands,
        })
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer on drop and must live until the
/// process exits.
fn init_logging(level: &str, file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level {level:?}"))?;

    let Some(path) = file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("log file {} has no file name", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(dir)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let file_config = cli.load_file_config()?;
    let options = cli.into_runtime_options(file_config)?;

    let _log_guard = init_logging(&options.log_level, options.log_file.as_deref())?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        device = %options.settings.device_id,
        every = ?options.settings.poll_interval,
        always_poll = options.settings.always_refresh_on_poll,
        "wacom-ff starting"
    );

    // Handlers go in first so an early signal is queued instead of killing
    // the process.
    let (tx, rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
    let _bridge = spawn_signal_bridge(tx).context("failed to install signal handlers")?;

    let tool = |program: &str| ExternalTool::new(program, options.command_timeout);
    let cursor = Arc::new(XdotoolCursorLocator::new(tool(&options.tools.xdotool)));
    let monitors = Arc::new(XrandrMonitorEnumerator::new(tool(&options.tools.xrandr)));
    let mapper = Arc::new(XsetwacomMapper::new(tool(&options.tools.xsetwacom)));

    let mut controller = ServiceController::new(options.settings, cursor, monitors, mapper)
        .await
        .context("wacom-ff could not start")?;

    controller.start();
    controller.run(rx).await;

    info!("wacom-ff stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
