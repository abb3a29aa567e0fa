// src/lib.rs
//! Streaming deflate/inflate.
//!
//! The engine loop lives in the `compress` crate and the `tracing` setup in
//! `logging`; this crate ties both together behind [`StreamConfig`] and a few
//! convenience helpers.

use std::io::{self, BufRead, Read, Write};

use thiserror::Error;

mod config;

pub use compress;
pub use compress::{
    Compressor, Decompressor, DeflateParams, InflateParams, ProcessorConfig, Reader, StreamCloser,
    Writer, Z_BEST_COMPRESSION, Z_BEST_SPEED, Z_DEFAULT_COMPRESSION, Z_NO_COMPRESSION,
};
pub use config::{StreamConfig, StreamConfigBuilder};
pub use logging::LogFormat;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Compress(#[from] compress::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Compresses `data` into a single zlib stream.
///
/// # Examples
///
/// ```
/// let packed = zstream::compress_bytes(b"hello hello hello", 6).unwrap();
/// assert_eq!(zstream::decompress_bytes(&packed).unwrap(), b"hello hello hello");
/// ```
pub fn compress_bytes(data: &[u8], level: i32) -> Result<Vec<u8>> {
    let mut c = Compressor::new(level)?;
    Ok(c.compress(data, Vec::new())?)
}

/// Decompresses one complete zlib stream. Bytes after the end of the stream
/// are ignored.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut d = Decompressor::new()?;
    Ok(d.decompress(data, Vec::new())?)
}

/// Streams everything from `reader` into `writer` as one compressed stream
/// and returns the number of uncompressed bytes read.
pub fn compress_reader<R: Read, W: Write>(
    mut reader: R,
    writer: W,
    cfg: &StreamConfig,
) -> Result<u64> {
    let mut w = Writer::with_compressor(writer, cfg.compressor()?);
    let copied = io::copy(&mut reader, &mut w)?;
    let total_out = w.compressor().total_out();
    w.finish()?;
    tracing::info!(target: "zstream", copied, total_out, "stream compressed");
    Ok(copied)
}

/// Decompresses one stream from `reader` into `writer` and returns the number
/// of bytes written. `reader` is left positioned after the stream.
pub fn decompress_reader<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    cfg: &StreamConfig,
) -> Result<u64> {
    let mut r = Reader::with_decompressor(reader, cfg.decompressor()?);
    let copied = io::copy(&mut r, &mut writer)?;
    writer.flush()?;
    tracing::info!(target: "zstream", copied, "stream decompressed");
    Ok(copied)
}
