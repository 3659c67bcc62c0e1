use clap::Parser;
use std::fs;
use std::io;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "emoji-language-server.log";

#[derive(Debug, Parser)]
#[command(name = "emoji-language-server", version, about)]
struct Args {
    /// use std io for lang server (the only supported transport)
    #[arg(long)]
    stdio: bool,

    /// Write logs to emoji-language-server.log instead of stderr
    #[arg(long)]
    log: bool,

    /// Default log level, overridden by RUST_LOG
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    setup_logging(args.log, args.log_level);

    emoji_language_server::run_server()
}

fn setup_logging(file: bool, level: LevelFilter) {
    let file = if file {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(LOG_FILE)
            .ok()
    } else {
        None
    };

    let writer = match file {
        Some(file) => BoxMakeWriter::new(Arc::new(file)),
        None => BoxMakeWriter::new(io::stderr),
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
}
