//! textrange entrypoint: load a text file into an in-memory console buffer
//! and run one text range query against it.
use anyhow::{Context, Result};
use clap::Parser;
use core_buffer::CircularBuffer;
use core_config::{ConfigContext, load_from};
use core_range::TextProvider;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod commands;

use commands::Command;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "textrange", version, about = "Console text range inspector")]
struct Args {
    /// UTF-8 text file loaded into the buffer, one line per row.
    pub path: PathBuf,
    /// Optional configuration file path (overrides discovery of `textrange.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Total rows of the circular buffer.
    #[arg(long)]
    pub rows: Option<u32>,
    /// Row width in columns.
    #[arg(long)]
    pub width: Option<u32>,
    /// Visible rows.
    #[arg(long)]
    pub viewport_rows: Option<u32>,
    /// First visible row.
    #[arg(long, default_value_t = 0)]
    pub viewport_top: i32,
    #[command(subcommand)]
    pub command: Command,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let file_appender = tracing_appender::rolling::never(log_dir, "textrange.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; dropping the guard shuts the writer down.
        Err(_err) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn load_provider(args: &Args) -> Result<TextProvider<CircularBuffer>> {
    let mut config = load_from(args.config.clone())?;
    let effective =
        config.apply_context(ConfigContext::new(args.rows, args.width, args.viewport_rows));

    let content = std::fs::read_to_string(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;
    tracing::debug!(
        target: "io",
        file = %args.path.display(),
        size_bytes = content.len(),
        line_count = content.lines().count(),
        "file_read_ok"
    );

    let buffer = CircularBuffer::from_text(
        effective.rows,
        effective.width,
        effective.viewport_rows,
        &content,
    );
    buffer.set_cell_metrics(config.cell_metrics());
    buffer.set_viewport_top(args.viewport_top);

    info!(
        target: "runtime.startup",
        path = %args.path.display(),
        config_override = args.config.is_some(),
        rows = effective.rows,
        width = effective.width,
        viewport_rows = effective.viewport_rows,
        "bootstrap_complete"
    );
    Ok(TextProvider::with_options(
        Arc::new(buffer),
        config.range_options(),
    ))
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();

    let args = Args::parse();
    let provider = load_provider(&args)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&args.command, &provider, &mut out)?;
    out.flush()?;
    info!(target: "runtime", "shutdown");
    Ok(())
}
