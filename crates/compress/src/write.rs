// crates/compress/src/write.rs
use std::io::{self, Write};

use crate::Compressor;
use crate::error::Result;

/// Compresses everything written to it into an inner writer.
///
/// Call [`Writer::finish`] to end the stream; dropping the writer releases
/// the engine without writing the stream trailer.
#[derive(Debug)]
pub struct Writer<W: Write> {
    inner: W,
    compressor: Compressor,
}

impl<W: Write> Writer<W> {
    pub fn new(inner: W, level: i32) -> Result<Self> {
        Ok(Self::with_compressor(inner, Compressor::new(level)?))
    }

    pub fn with_compressor(inner: W, compressor: Compressor) -> Self {
        Self { inner, compressor }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn compressor(&self) -> &Compressor {
        &self.compressor
    }

    /// Compresses `data` as one complete stream, bypassing the streaming
    /// state. Must not be interleaved with an unfinished stream.
    pub fn write_buffer(&mut self, data: &[u8]) -> io::Result<()> {
        let out = self.compressor.compress(data, Vec::new())?;
        self.inner.write_all(&out)
    }

    /// Ends the stream, writes the trailer and hands back the inner writer.
    pub fn finish(self) -> io::Result<W> {
        let Writer {
            mut inner,
            mut compressor,
        } = self;
        let tail = compressor.close()?;
        inner.write_all(&tail)?;
        inner.flush()?;
        Ok(inner)
    }
}

impl<W: Write> Write for Writer<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let out = self.compressor.compress_stream(buf)?;
        self.inner.write_all(&out)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let out = self.compressor.flush()?;
        self.inner.write_all(&out)?;
        self.inner.flush()
    }
}
