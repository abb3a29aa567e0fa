// crates/compress/src/engine.rs
//! The boundary between the processor and the codec doing the actual work.
//!
//! An [`Engine`] is driven one bounded call at a time. Every call reports an
//! [`EngineStatus`] together with the number of bytes it consumed and
//! produced; the engine keeps its own input and output cursors between calls.

use std::fmt;

use flate2::{Decompress, FlushDecompress, Status};
use zlib_rs::{DeflateConfig, DeflateFlush, Method, Strategy};

use crate::error::{Error, Result};
use crate::params::{DeflateParams, InflateParams, WindowFormat};

pub const Z_OK: i32 = 0;
pub const Z_STREAM_END: i32 = 1;
pub const Z_NEED_DICT: i32 = 2;
pub const Z_STREAM_ERROR: i32 = -2;
pub const Z_DATA_ERROR: i32 = -3;
pub const Z_BUF_ERROR: i32 = -5;

/// Flush mode passed with every engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flush {
    /// Keep buffering; emit output only when the engine decides to.
    None,
    /// Emit all pending output aligned to a byte boundary.
    Sync,
    /// Like [`Flush::Sync`] but also resets the compression dictionary.
    Full,
    /// Terminate the logical stream.
    Finish,
}

impl From<Flush> for DeflateFlush {
    fn from(flush: Flush) -> Self {
        match flush {
            Flush::None => DeflateFlush::NoFlush,
            Flush::Sync => DeflateFlush::SyncFlush,
            Flush::Full => DeflateFlush::FullFlush,
            Flush::Finish => DeflateFlush::Finish,
        }
    }
}

impl From<Flush> for FlushDecompress {
    fn from(flush: Flush) -> Self {
        match flush {
            Flush::None => FlushDecompress::None,
            Flush::Sync | Flush::Full => FlushDecompress::Sync,
            Flush::Finish => FlushDecompress::Finish,
        }
    }
}

/// Raw status reported by a single engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Ok,
    StreamEnd,
    BufError,
    Error(i32),
}

impl EngineStatus {
    pub fn code(self) -> i32 {
        match self {
            EngineStatus::Ok => Z_OK,
            EngineStatus::StreamEnd => Z_STREAM_END,
            EngineStatus::BufError => Z_BUF_ERROR,
            EngineStatus::Error(code) => code,
        }
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            Z_OK => EngineStatus::Ok,
            Z_STREAM_END => EngineStatus::StreamEnd,
            Z_BUF_ERROR => EngineStatus::BufError,
            other => EngineStatus::Error(other),
        }
    }
}

impl From<Status> for EngineStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => EngineStatus::Ok,
            Status::BufError => EngineStatus::BufError,
            Status::StreamEnd => EngineStatus::StreamEnd,
        }
    }
}

impl From<zlib_rs::Status> for EngineStatus {
    fn from(status: zlib_rs::Status) -> Self {
        match status {
            zlib_rs::Status::Ok => EngineStatus::Ok,
            zlib_rs::Status::BufError => EngineStatus::BufError,
            zlib_rs::Status::StreamEnd => EngineStatus::StreamEnd,
        }
    }
}

/// Outcome of one engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub status: EngineStatus,
    pub consumed: usize,
    pub produced: usize,
}

impl Step {
    pub fn made_progress(&self) -> bool {
        self.consumed > 0 || self.produced > 0
    }
}

/// An incremental codec session.
///
/// `process` appends into the spare capacity of `output` and must never
/// reallocate it; growing the buffer is the caller's job.
pub trait Engine {
    fn process(&mut self, input: &[u8], output: &mut Vec<u8>, flush: Flush) -> Step;

    fn reset(&mut self) -> EngineStatus;

    /// Releases the session. Called at most once by [`crate::StreamHandle`].
    fn end(&mut self) -> EngineStatus;
}

fn delta(before: u64, after: u64) -> usize {
    usize::try_from(after.saturating_sub(before)).unwrap_or(usize::MAX)
}

/// Deflate engine backed by `zlib-rs`, configured with every
/// `deflateInit2` parameter.
pub struct Deflate {
    inner: zlib_rs::Deflate,
}

impl fmt::Debug for Deflate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deflate")
            .field("total_in", &self.inner.total_in())
            .field("total_out", &self.inner.total_out())
            .finish_non_exhaustive()
    }
}

impl Deflate {
    pub fn new(params: &DeflateParams) -> Result<Self> {
        params.validate()?;
        let window_bits = match params.window() {
            WindowFormat::Zlib(bits) => i32::from(bits),
            WindowFormat::Raw(bits) => -i32::from(bits),
            WindowFormat::Gzip(bits) => i32::from(bits) + 16,
            WindowFormat::Header | WindowFormat::Invalid => {
                return Err(Error::init_failed());
            }
        };
        let method = Method::try_from(params.method).map_err(|()| Error::init_failed())?;
        let strategy = Strategy::try_from(params.strategy).map_err(|()| Error::init_failed())?;
        let config = DeflateConfig {
            level: params.level,
            method,
            window_bits,
            mem_level: params.mem_level,
            strategy,
        };
        tracing::debug!(
            target: "compress::engine",
            level = params.level,
            window_bits,
            mem_level = params.mem_level,
            strategy = params.strategy,
            "deflate engine initialized"
        );
        Ok(Self {
            inner: zlib_rs::Deflate::new_with_config(config),
        })
    }
}

impl Engine for Deflate {
    fn process(&mut self, input: &[u8], output: &mut Vec<u8>, flush: Flush) -> Step {
        let before_in = self.inner.total_in();
        let before_out = self.inner.total_out();
        let len = output.len();
        let result = self
            .inner
            .compress_uninit(input, output.spare_capacity_mut(), flush.into());
        let consumed = delta(before_in, self.inner.total_in());
        let produced = delta(before_out, self.inner.total_out()).min(output.capacity() - len);
        // SAFETY: the engine initialized `produced` bytes at the start of the
        // spare capacity, and `produced` never exceeds that capacity.
        unsafe { output.set_len(len + produced) };
        let status = match result {
            Ok(status) => status.into(),
            Err(e) => EngineStatus::Error(e as i32),
        };
        Step {
            status,
            consumed,
            produced,
        }
    }

    fn reset(&mut self) -> EngineStatus {
        self.inner.reset();
        EngineStatus::Ok
    }

    fn end(&mut self) -> EngineStatus {
        EngineStatus::Ok
    }
}

/// Inflate engine backed by `flate2`.
#[derive(Debug)]
pub struct Inflate {
    inner: Decompress,
    window: WindowFormat,
}

fn open_inflate(window: WindowFormat) -> Option<Decompress> {
    match window {
        WindowFormat::Header => Some(Decompress::new(true)),
        WindowFormat::Zlib(bits) => Some(Decompress::new_with_window_bits(true, bits)),
        WindowFormat::Raw(bits) => Some(Decompress::new_with_window_bits(false, bits)),
        WindowFormat::Gzip(bits) => Some(Decompress::new_gzip(bits)),
        WindowFormat::Invalid => None,
    }
}

impl Inflate {
    pub fn new(params: &InflateParams) -> Result<Self> {
        let window = params.window();
        let inner = open_inflate(window).ok_or_else(Error::init_failed)?;
        tracing::debug!(
            target: "compress::engine",
            window_bits = params.window_bits,
            "inflate engine initialized"
        );
        Ok(Self { inner, window })
    }
}

impl Engine for Inflate {
    fn process(&mut self, input: &[u8], output: &mut Vec<u8>, flush: Flush) -> Step {
        let before_in = self.inner.total_in();
        let before_out = self.inner.total_out();
        let status = match self.inner.decompress_vec(input, output, flush.into()) {
            Ok(status) => status.into(),
            Err(e) if e.needs_dictionary().is_some() => EngineStatus::Error(Z_NEED_DICT),
            Err(_) => EngineStatus::Error(Z_DATA_ERROR),
        };
        Step {
            status,
            consumed: delta(before_in, self.inner.total_in()),
            produced: delta(before_out, self.inner.total_out()),
        }
    }

    fn reset(&mut self) -> EngineStatus {
        match self.window {
            // flate2 resets to a full 15-bit zlib or raw window only
            WindowFormat::Header | WindowFormat::Zlib(15) => self.inner.reset(true),
            WindowFormat::Raw(15) => self.inner.reset(false),
            window => match open_inflate(window) {
                Some(inner) => self.inner = inner,
                None => return EngineStatus::Error(Z_STREAM_ERROR),
            },
        }
        EngineStatus::Ok
    }

    fn end(&mut self) -> EngineStatus {
        EngineStatus::Ok
    }
}
