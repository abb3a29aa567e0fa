// crates/compress/src/lib.rs
//! Streaming deflate/inflate driven through an incremental engine.
//!
//! [`Compressor`] and [`Decompressor`] wrap one engine session each and run
//! every operation through the [`Processor`] loop, which feeds input, grows
//! the output buffer on demand and maps engine status codes to [`Error`]s.
//! [`Writer`] and [`Reader`] adapt the two facades to `std::io`.

mod closer;
mod compressor;
mod decompressor;
pub mod engine;
mod error;
mod handle;
mod params;
pub mod processor;
mod read;
mod write;

pub use closer::{StreamCloser, check_closed};
pub use compressor::{Compressor, STRATEGY_MEM_LEVEL};
pub use decompressor::Decompressor;
pub use engine::{Deflate, Engine, EngineStatus, Flush, Inflate, Step};
pub use error::{Error, Result};
pub use handle::StreamHandle;
pub use params::{
    DEFAULT_MEM_LEVEL, DEFAULT_WINDOW_BITS, DeflateParams, DeflateParamsBuilder, InflateParams,
    WindowFormat, Z_BEST_COMPRESSION, Z_BEST_SPEED, Z_DEFAULT_COMPRESSION, Z_DEFAULT_STRATEGY,
    Z_DEFLATED, Z_FILTERED, Z_FIXED, Z_HUFFMAN_ONLY, Z_NO_COMPRESSION, Z_RLE,
};
pub use processor::{Operation, Outcome, Processed, Processor, ProcessorConfig, Until, classify};
pub use read::Reader;
pub use write::Writer;
