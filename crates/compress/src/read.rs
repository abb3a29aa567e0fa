// crates/compress/src/read.rs
use std::io::{self, BufRead, Read};

use crate::Decompressor;
use crate::error::Result;

/// Decompresses a single stream read from an inner buffered reader.
///
/// Only the bytes belonging to the compressed stream are consumed from the
/// inner reader, so [`Reader::into_inner`] leaves it positioned right after
/// the stream.
#[derive(Debug)]
pub struct Reader<R: BufRead> {
    inner: R,
    decompressor: Decompressor,
    pending: Vec<u8>,
    pos: usize,
    done: bool,
}

impl<R: BufRead> Reader<R> {
    pub fn new(inner: R) -> Result<Self> {
        Ok(Self::with_decompressor(inner, Decompressor::new()?))
    }

    pub fn with_decompressor(inner: R, decompressor: Decompressor) -> Self {
        Self {
            inner,
            decompressor,
            pending: Vec::new(),
            pos: 0,
            done: false,
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self) -> io::Result<()> {
        let input = self.inner.fill_buf()?;
        let eof = input.is_empty();
        let (consumed, out) = self.decompressor.decompress_stream(input)?;
        self.inner.consume(consumed);
        self.pending = out;
        self.pos = 0;
        if self.decompressor.is_completed() {
            self.done = true;
        } else if eof && self.pending.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "compressed stream ended early",
            ));
        }
        Ok(())
    }
}

impl<R: BufRead> Read for Reader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.pos == self.pending.len() {
            if self.done {
                return Ok(0);
            }
            self.fill()?;
        }
        let n = buf.len().min(self.pending.len() - self.pos);
        buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
