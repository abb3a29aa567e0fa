// crates/compress/src/compressor.rs
use crate::closer::{StreamCloser, check_closed};
use crate::engine::Deflate;
use crate::error::Result;
use crate::params::{DEFAULT_WINDOW_BITS, DeflateParams, Z_DEFAULT_STRATEGY};
use crate::processor::{
    ASSUMED_COMPRESSION_FACTOR, Operation, Processor, ProcessorConfig, with_estimate,
};

/// Memory level used by [`Compressor::new`] and [`Compressor::with_strategy`].
pub const STRATEGY_MEM_LEVEL: i32 = 6;

/// Deflate compressor driving a single engine session.
///
/// One-shot calls ([`Compressor::compress`]) and streaming calls
/// ([`Compressor::compress_stream`], [`Compressor::flush`],
/// [`Compressor::close`]) share the same session. Output buffers are grown
/// on demand, so callers never size them exactly.
#[derive(Debug)]
pub struct Compressor {
    p: Processor<Deflate>,
    params: DeflateParams,
}

impl Compressor {
    /// Creates a compressor with the default strategy and window.
    pub fn new(level: i32) -> Result<Self> {
        Self::with_strategy(level, Z_DEFAULT_STRATEGY)
    }

    /// Zlib wrapper with a 15-bit window and memory level
    /// [`STRATEGY_MEM_LEVEL`].
    pub fn with_strategy(level: i32, strategy: i32) -> Result<Self> {
        Self::raw(level, strategy, DEFAULT_WINDOW_BITS, STRATEGY_MEM_LEVEL)
    }

    /// Creates a compressor with every engine parameter spelled out.
    /// Negative `window_bits` select raw deflate, `window_bits + 16` gzip.
    pub fn raw(level: i32, strategy: i32, window_bits: i32, mem_level: i32) -> Result<Self> {
        let params = DeflateParams::builder()
            .level(level)
            .strategy(strategy)
            .window_bits(window_bits)
            .mem_level(mem_level)
            .build();
        Self::with_params(params)
    }

    pub fn with_params(params: DeflateParams) -> Result<Self> {
        Self::with_config(params, ProcessorConfig::default())
    }

    pub fn with_config(params: DeflateParams, config: ProcessorConfig) -> Result<Self> {
        let engine = Deflate::new(&params)?;
        Ok(Self {
            p: Processor::with_config(engine, config),
            params,
        })
    }

    pub fn level(&self) -> i32 {
        self.params.level
    }

    pub fn params(&self) -> &DeflateParams {
        &self.params
    }

    pub fn total_in(&self) -> u64 {
        self.p.total_in()
    }

    pub fn total_out(&self) -> u64 {
        self.p.total_out()
    }

    /// Compresses `input` into a complete stream appended to `out`, then
    /// resets the session so the next call starts an independent stream.
    ///
    /// Anything short of the engine's end-of-stream signal is an error.
    pub fn compress(&mut self, input: &[u8], out: Vec<u8>) -> Result<Vec<u8>> {
        check_closed(self)?;
        let out = with_estimate(out, input.len() / ASSUMED_COMPRESSION_FACTOR);
        Ok(self.p.process(input, out, &Operation::one_shot())?.output)
    }

    /// Feeds `input` into the current stream and returns whatever the engine
    /// chose to emit. Call repeatedly, then [`Compressor::close`].
    pub fn compress_stream(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        check_closed(self)?;
        let out = Vec::with_capacity(input.len() / ASSUMED_COMPRESSION_FACTOR);
        Ok(self.p.process(input, out, &Operation::stream())?.output)
    }

    /// Forces out all buffered output without ending the stream.
    pub fn flush(&mut self) -> Result<Vec<u8>> {
        check_closed(self)?;
        Ok(self.p.process(&[], Vec::new(), &Operation::flush())?.output)
    }

    /// Ends the current stream and starts a fresh one on the same session.
    /// Returns the tail of the stream that was ended.
    pub fn reset(&mut self) -> Result<Vec<u8>> {
        check_closed(self)?;
        Ok(self
            .p
            .process(&[], Vec::new(), &Operation::finish_and_reset())?
            .output)
    }

    /// Ends the stream and releases the session. The session is released
    /// even if finishing the stream fails.
    pub fn close(&mut self) -> Result<Vec<u8>> {
        self.p.close(&Operation::close())
    }
}

impl StreamCloser for Compressor {
    fn is_closed(&self) -> bool {
        self.p.is_closed()
    }
}
