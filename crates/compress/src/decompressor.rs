// crates/compress/src/decompressor.rs
use crate::closer::{StreamCloser, check_closed};
use crate::engine::Inflate;
use crate::error::Result;
use crate::params::InflateParams;
use crate::processor::{
    ASSUMED_COMPRESSION_FACTOR, Operation, Processor, ProcessorConfig, with_estimate,
};

/// Inflate counterpart of [`crate::Compressor`].
#[derive(Debug)]
pub struct Decompressor {
    p: Processor<Inflate>,
    params: InflateParams,
}

impl Decompressor {
    pub fn new() -> Result<Self> {
        Self::with_params(InflateParams::default())
    }

    pub fn with_window_bits(window_bits: i32) -> Result<Self> {
        Self::with_params(InflateParams::new(window_bits))
    }

    pub fn with_params(params: InflateParams) -> Result<Self> {
        Self::with_config(params, ProcessorConfig::default())
    }

    pub fn with_config(params: InflateParams, config: ProcessorConfig) -> Result<Self> {
        let engine = Inflate::new(&params)?;
        Ok(Self {
            p: Processor::with_config(engine, config),
            params,
        })
    }

    pub fn params(&self) -> &InflateParams {
        &self.params
    }

    pub fn total_in(&self) -> u64 {
        self.p.total_in()
    }

    pub fn total_out(&self) -> u64 {
        self.p.total_out()
    }

    /// Whether the last call reached the end of the compressed stream.
    pub fn is_completed(&self) -> bool {
        self.p.is_completed()
    }

    /// Decompresses a complete stream held in `input`, appending to `out`.
    /// A truncated stream is an error. Bytes after the end of the stream are
    /// ignored. The session is reset afterwards.
    pub fn decompress(&mut self, input: &[u8], out: Vec<u8>) -> Result<Vec<u8>> {
        check_closed(self)?;
        let out = with_estimate(out, input.len().saturating_mul(ASSUMED_COMPRESSION_FACTOR));
        Ok(self.p.process(input, out, &Operation::one_shot())?.output)
    }

    /// Feeds the next piece of a compressed stream.
    ///
    /// Returns how many bytes of `input` the engine consumed together with
    /// the output. Once [`Decompressor::is_completed`] is true, unconsumed
    /// input belongs to whatever follows the stream.
    pub fn decompress_stream(&mut self, input: &[u8]) -> Result<(usize, Vec<u8>)> {
        check_closed(self)?;
        let out = Vec::with_capacity(input.len().saturating_mul(ASSUMED_COMPRESSION_FACTOR));
        let done = self.p.process(input, out, &Operation::stream())?;
        Ok((done.consumed, done.output))
    }

    pub fn flush(&mut self) -> Result<Vec<u8>> {
        check_closed(self)?;
        Ok(self.p.process(&[], Vec::new(), &Operation::flush())?.output)
    }

    /// Prepares the session for a new compressed stream.
    pub fn reset(&mut self) -> Result<Vec<u8>> {
        self.p.reset()?;
        Ok(Vec::new())
    }

    /// Drains pending output and releases the session.
    pub fn close(&mut self) -> Result<Vec<u8>> {
        self.p.close(&Operation::flush())
    }
}

impl StreamCloser for Decompressor {
    fn is_closed(&self) -> bool {
        self.p.is_closed()
    }
}
