// src/config.rs

use compress::{Compressor, Decompressor, DeflateParams, InflateParams, ProcessorConfig};
use logging::{LogFormat, SubscriberConfig};
use std::io;
use std::path::PathBuf;

/// Logging and codec settings for a compression session.
#[derive(Clone, Debug)]
pub struct StreamConfig {
    pub log_format: LogFormat,
    pub verbose: u8,
    pub quiet: bool,
    pub log_directives: Vec<String>,
    pub log_file: Option<(PathBuf, LogFormat)>,
    pub colored: bool,
    pub timestamps: bool,
    pub deflate: DeflateParams,
    pub inflate: InflateParams,
    pub processor: ProcessorConfig,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Text,
            verbose: 0,
            quiet: false,
            log_directives: Vec::new(),
            log_file: None,
            colored: true,
            timestamps: false,
            deflate: DeflateParams::default(),
            inflate: InflateParams::default(),
            processor: ProcessorConfig::default(),
        }
    }
}

impl StreamConfig {
    /// Create a new builder for [`StreamConfig`].
    pub fn builder() -> StreamConfigBuilder {
        StreamConfigBuilder::default()
    }

    pub fn subscriber_config(&self) -> SubscriberConfig {
        SubscriberConfig::builder()
            .format(self.log_format)
            .verbose(self.verbose)
            .quiet(self.quiet)
            .directives(self.log_directives.iter().cloned())
            .log_file(self.log_file.clone())
            .colored(self.colored)
            .timestamps(self.timestamps)
            .build()
    }

    /// Installs the global `tracing` subscriber described by this config.
    pub fn init_logging(&self) -> io::Result<()> {
        logging::init(self.subscriber_config())
    }

    pub fn compressor(&self) -> compress::Result<Compressor> {
        Compressor::with_config(self.deflate, self.processor)
    }

    pub fn decompressor(&self) -> compress::Result<Decompressor> {
        Decompressor::with_config(self.inflate, self.processor)
    }
}

/// Builder for [`StreamConfig`].
#[derive(Debug, Default)]
#[must_use]
pub struct StreamConfigBuilder {
    cfg: StreamConfig,
}

impl StreamConfigBuilder {
    pub fn log_format(mut self, log_format: LogFormat) -> Self {
        self.cfg.log_format = log_format;
        self
    }

    pub fn verbose(mut self, verbose: u8) -> Self {
        self.cfg.verbose = verbose;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.cfg.quiet = quiet;
        self
    }

    pub fn log_directives<I>(mut self, directives: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut directives = directives.into_iter().map(Into::into).collect::<Vec<_>>();
        directives.dedup();
        self.cfg.log_directives = directives;
        self
    }

    pub fn log_file(mut self, log_file: Option<(PathBuf, LogFormat)>) -> Self {
        self.cfg.log_file = log_file;
        self
    }

    pub fn colored(mut self, enable: bool) -> Self {
        self.cfg.colored = enable;
        self
    }

    pub fn timestamps(mut self, enable: bool) -> Self {
        self.cfg.timestamps = enable;
        self
    }

    pub fn level(mut self, level: i32) -> Self {
        self.cfg.deflate.level = level;
        self
    }

    pub fn strategy(mut self, strategy: i32) -> Self {
        self.cfg.deflate.strategy = strategy;
        self
    }

    /// Window bits for the compressor; negative for raw deflate, `+16` for
    /// gzip.
    pub fn window_bits(mut self, window_bits: i32) -> Self {
        self.cfg.deflate.window_bits = window_bits;
        self
    }

    pub fn mem_level(mut self, mem_level: i32) -> Self {
        self.cfg.deflate.mem_level = mem_level;
        self
    }

    /// Window bits for the decompressor; `0` reads the window from the
    /// zlib header.
    pub fn inflate_window_bits(mut self, window_bits: i32) -> Self {
        self.cfg.inflate.window_bits = window_bits;
        self
    }

    pub fn min_growth(mut self, min_growth: usize) -> Self {
        self.cfg.processor.min_growth = min_growth;
        self
    }

    pub fn build(self) -> StreamConfig {
        self.cfg
    }
}
