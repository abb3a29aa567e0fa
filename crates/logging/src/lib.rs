// crates/logging/src/lib.rs
//! `tracing` subscriber setup for programs embedding the compression core.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{
    EnvFilter, Layer, fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

mod flags;
mod formatter;
mod json_format;

pub use flags::{LogFormat, SubscriberConfig, SubscriberConfigBuilder};
pub use formatter::StreamFormatter;
pub use json_format::JsonFormatter;

/// Maps `-v` style verbosity to the default level filter.
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

fn build_filter(level: LevelFilter, directives: &[String]) -> io::Result<EnvFilter> {
    let mut filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    for raw in directives {
        let directive: Directive = raw
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

pub fn subscriber(cfg: SubscriberConfig) -> io::Result<Box<dyn tracing::Subscriber + Send + Sync>> {
    let SubscriberConfig {
        format,
        verbose,
        quiet,
        directives,
        log_file,
        colored,
        timestamps,
    } = cfg;
    let filter = build_filter(level_for(verbose, quiet), &directives)?;

    let base = tracing_fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(colored);
    let stderr_layer = match format {
        LogFormat::Json => base.event_format(JsonFormatter).boxed(),
        LogFormat::Text => base.event_format(StreamFormatter::new(timestamps)).boxed(),
    };

    let file_layer = if let Some((path, fmt)) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let base = tracing_fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false);
        let layer = match fmt {
            LogFormat::Json => base.event_format(JsonFormatter).boxed(),
            LogFormat::Text => base.event_format(StreamFormatter::new(true)).boxed(),
        };
        Some(layer)
    } else {
        None
    };

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer);
    Ok(Box::new(registry))
}

/// Installs the subscriber as the global default.
pub fn init(cfg: SubscriberConfig) -> io::Result<()> {
    subscriber(cfg)?.try_init().map_err(io::Error::other)
}
