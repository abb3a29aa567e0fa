// crates/compress/src/params.rs
use crate::error::{Error, Result};

pub const Z_NO_COMPRESSION: i32 = 0;
pub const Z_BEST_SPEED: i32 = 1;
pub const Z_BEST_COMPRESSION: i32 = 9;
pub const Z_DEFAULT_COMPRESSION: i32 = -1;

pub const Z_DEFAULT_STRATEGY: i32 = 0;
pub const Z_FILTERED: i32 = 1;
pub const Z_HUFFMAN_ONLY: i32 = 2;
pub const Z_RLE: i32 = 3;
pub const Z_FIXED: i32 = 4;

pub const Z_DEFLATED: i32 = 8;

pub const DEFAULT_WINDOW_BITS: i32 = 15;
pub const DEFAULT_MEM_LEVEL: i32 = 8;

/// Stream wrapper and window size selected by a `window_bits` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowFormat {
    /// zlib wrapper, window size taken from the stream header.
    Header,
    Zlib(u8),
    Raw(u8),
    Gzip(u8),
    Invalid,
}

fn clamp_bits(bits: i32) -> u8 {
    bits.max(9) as u8
}

/// Parameters captured when a deflate stream is initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeflateParams {
    pub level: i32,
    pub method: i32,
    pub window_bits: i32,
    pub mem_level: i32,
    pub strategy: i32,
}

impl Default for DeflateParams {
    fn default() -> Self {
        Self {
            level: Z_DEFAULT_COMPRESSION,
            method: Z_DEFLATED,
            window_bits: DEFAULT_WINDOW_BITS,
            mem_level: DEFAULT_MEM_LEVEL,
            strategy: Z_DEFAULT_STRATEGY,
        }
    }
}

impl DeflateParams {
    pub fn builder() -> DeflateParamsBuilder {
        DeflateParamsBuilder::default()
    }

    pub fn window(&self) -> WindowFormat {
        match self.window_bits {
            8..=15 => WindowFormat::Zlib(clamp_bits(self.window_bits)),
            -15..=-8 => WindowFormat::Raw(clamp_bits(-self.window_bits)),
            24..=31 => WindowFormat::Gzip(clamp_bits(self.window_bits - 16)),
            _ => WindowFormat::Invalid,
        }
    }

    /// Checks every parameter against the ranges the deflate engine accepts.
    pub fn validate(&self) -> Result<()> {
        let ok = (Z_DEFAULT_COMPRESSION..=Z_BEST_COMPRESSION).contains(&self.level)
            && self.method == Z_DEFLATED
            && self.window() != WindowFormat::Invalid
            && (1..=9).contains(&self.mem_level)
            && (Z_DEFAULT_STRATEGY..=Z_FIXED).contains(&self.strategy);
        if ok {
            Ok(())
        } else {
            tracing::debug!(target: "compress::params", params = ?self, "rejected deflate parameters");
            Err(Error::init_failed())
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeflateParamsBuilder {
    params: DeflateParams,
}

impl DeflateParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: i32) -> Self {
        self.params.level = level;
        self
    }

    pub fn method(mut self, method: i32) -> Self {
        self.params.method = method;
        self
    }

    pub fn window_bits(mut self, window_bits: i32) -> Self {
        self.params.window_bits = window_bits;
        self
    }

    pub fn mem_level(mut self, mem_level: i32) -> Self {
        self.params.mem_level = mem_level;
        self
    }

    pub fn strategy(mut self, strategy: i32) -> Self {
        self.params.strategy = strategy;
        self
    }

    pub fn build(self) -> DeflateParams {
        self.params
    }
}

/// Parameters captured when an inflate stream is initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflateParams {
    pub window_bits: i32,
}

impl Default for InflateParams {
    fn default() -> Self {
        Self {
            window_bits: DEFAULT_WINDOW_BITS,
        }
    }
}

impl InflateParams {
    pub fn new(window_bits: i32) -> Self {
        Self { window_bits }
    }

    pub fn window(&self) -> WindowFormat {
        match self.window_bits {
            0 => WindowFormat::Header,
            8..=15 => WindowFormat::Zlib(clamp_bits(self.window_bits)),
            -15..=-8 => WindowFormat::Raw(clamp_bits(-self.window_bits)),
            16 => WindowFormat::Gzip(15),
            24..=31 => WindowFormat::Gzip(clamp_bits(self.window_bits - 16)),
            _ => WindowFormat::Invalid,
        }
    }
}
