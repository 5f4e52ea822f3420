//! rogui - terminal demo
//!
//! Header, a status body and a log region. `l` or Enter appends a log
//! entry, resizing the terminal relayouts, `q` quits.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use rogui::config::{Config, DEFAULT_CONFIG_PATH};
use rogui::input::{log_channel, CrosstermEvents, LogSender};
use rogui::terminal::{CrosstermSurface, TerminalGuard};
use rogui::LoopHandle;

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    // Config first so log_file applies to the subscriber
    let config = Config::load(&config_path)?;
    init_tracing(&config)?;
    info!(path = %config_path.display(), "starting rogui");

    let (sender, queue) = log_channel();
    if config.heartbeat_secs > 0 {
        spawn_heartbeat(sender.clone(), Duration::from_secs(config.heartbeat_secs));
    }

    let guard = TerminalGuard::enter().context("failed to set up terminal")?;
    let surface = CrosstermSurface::stdout().context("failed to open terminal surface")?;
    let mut handle =
        LoopHandle::initialize(surface, &config).context("failed to initialize display")?;
    handle.append_log_entry(format!("config: {}", config_path.display()));

    let mut events = CrosstermEvents::new(queue, Duration::from_millis(config.poll_interval_ms));
    let mut dispatch = |action: &str| debug!(action, "unbound key");
    let outcome = handle.run_loop(&mut events, &mut dispatch);

    drop(guard);
    outcome.context("event loop failed")?;

    info!(
        entries = handle.scrollback().total_appended(),
        "rogui exiting"
    );
    Ok(())
}

fn init_tracing(config: &Config) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("rogui=info".parse()?);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false);

    // The terminal belongs to the UI, so logs go to a file or nowhere
    match &config.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

/// Host thread appending an entry every `every`, until the loop goes away
fn spawn_heartbeat(sender: LogSender, every: Duration) {
    thread::spawn(move || {
        let mut beat = 0u64;
        loop {
            thread::sleep(every);
            beat += 1;
            if !sender.append(format!("heartbeat #{}", beat)) {
                break;
            }
        }
    });
}
