// crates/compress/src/handle.rs
use crate::engine::{Engine, EngineStatus, Flush, Step, Z_STREAM_ERROR};

/// Owned engine session.
///
/// The handle is move-only. [`StreamHandle::end`] takes the engine out, so a
/// released session can never be released again, and a handle dropped without
/// an explicit `end` releases its engine on the way out.
#[derive(Debug)]
pub struct StreamHandle<E: Engine> {
    engine: Option<E>,
}

impl<E: Engine> StreamHandle<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    pub fn is_released(&self) -> bool {
        self.engine.is_none()
    }

    /// Runs one engine call. A released handle reports a stream error
    /// without consuming or producing anything.
    pub fn process(&mut self, input: &[u8], output: &mut Vec<u8>, flush: Flush) -> Step {
        match self.engine.as_mut() {
            Some(engine) => engine.process(input, output, flush),
            None => Step {
                status: EngineStatus::Error(Z_STREAM_ERROR),
                consumed: 0,
                produced: 0,
            },
        }
    }

    pub fn reset(&mut self) -> EngineStatus {
        match self.engine.as_mut() {
            Some(engine) => {
                let status = engine.reset();
                tracing::debug!(target: "compress::handle", ?status, "stream reset");
                status
            }
            None => EngineStatus::Error(Z_STREAM_ERROR),
        }
    }

    pub fn end(&mut self) -> EngineStatus {
        match self.engine.take() {
            Some(mut engine) => {
                let status = engine.end();
                tracing::debug!(target: "compress::handle", ?status, "stream released");
                status
            }
            None => EngineStatus::Error(Z_STREAM_ERROR),
        }
    }
}

impl<E: Engine> Drop for StreamHandle<E> {
    fn drop(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            let status = engine.end();
            if status != EngineStatus::Ok {
                tracing::warn!(target: "compress::handle", ?status, "stream released on drop with error");
            }
        }
    }
}
