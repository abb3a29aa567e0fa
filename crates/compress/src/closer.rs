// crates/compress/src/closer.rs
use crate::error::{Error, Result};

/// Anything owning a stream that can be released.
pub trait StreamCloser {
    fn is_closed(&self) -> bool;
}

/// Guard run before every stream operation.
pub fn check_closed<C: StreamCloser + ?Sized>(closer: &C) -> Result<()> {
    if closer.is_closed() {
        return Err(Error::AlreadyClosed);
    }
    Ok(())
}
