// crates/compress/src/processor.rs
//! The loop that drives an [`Engine`] through one logical operation.
//!
//! A [`Processor`] owns its [`StreamHandle`] exclusively. Every operation
//! takes `&mut self`, so at most one operation is in flight per handle; the
//! `closed` and `completed` flags are plain fields for that reason. Sharing a
//! processor across threads without that exclusivity would corrupt the
//! engine's internal cursors.

use crate::closer::{StreamCloser, check_closed};
use crate::engine::{Engine, EngineStatus, Flush, Step, Z_BUF_ERROR};
use crate::error::{Error, Result};
use crate::handle::StreamHandle;

/// Ratio used to guess the output size from the input size.
pub const ASSUMED_COMPRESSION_FACTOR: usize = 7;

/// Smallest number of bytes added to an output buffer when it runs full.
pub const MIN_GROWTH: usize = 16 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorConfig {
    pub min_growth: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            min_growth: MIN_GROWTH,
        }
    }
}

/// Reserves `estimate` bytes in `out` unless the caller already left room.
pub(crate) fn with_estimate(mut out: Vec<u8>, estimate: usize) -> Vec<u8> {
    if out.len() == out.capacity() {
        out.reserve(estimate);
    }
    out
}

/// How long the loop keeps calling the engine after an `Ok` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Until {
    /// One call, apart from retries caused by a full output buffer.
    Once,
    /// While input remains or the last call filled the output buffer.
    OutputPending,
    /// Until the engine signals the end of the stream.
    Completed,
}

/// Per-operation behaviour of the processor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub flush: Flush,
    /// Any terminal status other than stream end counts as a buffer error.
    pub strict: bool,
    pub until: Until,
    /// Reset the handle after a successful run.
    pub reset_after: bool,
}

impl Operation {
    /// Complete a whole stream in one call, then reset for the next one.
    pub const fn one_shot() -> Self {
        Self {
            flush: Flush::Finish,
            strict: true,
            until: Until::Once,
            reset_after: true,
        }
    }

    pub const fn stream() -> Self {
        Self {
            flush: Flush::None,
            strict: false,
            until: Until::OutputPending,
            reset_after: false,
        }
    }

    pub const fn flush() -> Self {
        Self {
            flush: Flush::Sync,
            strict: false,
            until: Until::OutputPending,
            reset_after: false,
        }
    }

    pub const fn close() -> Self {
        Self {
            flush: Flush::Finish,
            strict: false,
            until: Until::Completed,
            reset_after: false,
        }
    }

    pub const fn finish_and_reset() -> Self {
        Self {
            flush: Flush::Finish,
            strict: false,
            until: Until::Completed,
            reset_after: true,
        }
    }

    fn must_complete(&self) -> bool {
        self.strict || self.until == Until::Completed
    }

    fn should_continue(&self, remaining: usize, buffer_full: bool, completed: bool) -> bool {
        match self.until {
            Until::Once => false,
            Until::OutputPending => remaining > 0 || buffer_full,
            Until::Completed => !completed,
        }
    }
}

/// Classified engine status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Complete,
    BufferInsufficient,
    Failed(i32),
}

/// Maps a raw engine status to what the loop should do next.
pub fn classify(status: EngineStatus, strict: bool) -> Outcome {
    match status {
        EngineStatus::StreamEnd => Outcome::Complete,
        EngineStatus::Ok if strict => Outcome::BufferInsufficient,
        EngineStatus::Ok => Outcome::Continue,
        EngineStatus::BufError => Outcome::BufferInsufficient,
        EngineStatus::Error(code) => Outcome::Failed(code),
    }
}

/// Result of one processor run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    /// Bytes taken from the input slice.
    pub consumed: usize,
    pub output: Vec<u8>,
}

#[derive(Debug)]
pub struct Processor<E: Engine> {
    handle: StreamHandle<E>,
    closed: bool,
    completed: bool,
    total_in: u64,
    total_out: u64,
    config: ProcessorConfig,
}

impl<E: Engine> Processor<E> {
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, ProcessorConfig::default())
    }

    pub fn with_config(engine: E, config: ProcessorConfig) -> Self {
        Self {
            handle: StreamHandle::new(engine),
            closed: false,
            completed: false,
            total_in: 0,
            total_out: 0,
            config,
        }
    }

    /// Whether the last operation reached the end of the stream.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    pub fn total_out(&self) -> u64 {
        self.total_out
    }

    pub fn handle(&self) -> &StreamHandle<E> {
        &self.handle
    }

    fn grow(&self, output: &mut Vec<u8>) {
        let additional = output.capacity().max(self.config.min_growth.max(1));
        output.reserve(additional);
        tracing::debug!(
            target: "compress::processor",
            len = output.len(),
            capacity = output.capacity(),
            "grew output buffer"
        );
    }

    /// Feeds `input` to the engine and appends everything it produces to
    /// `output`, following the rules of `op`.
    pub fn process(
        &mut self,
        input: &[u8],
        mut output: Vec<u8>,
        op: &Operation,
    ) -> Result<Processed> {
        check_closed(self)?;
        self.completed = false;
        let mut consumed = 0usize;

        loop {
            if output.len() == output.capacity() {
                self.grow(&mut output);
            }
            let step: Step = self.handle.process(&input[consumed..], &mut output, op.flush);
            consumed += step.consumed;
            self.total_in += step.consumed as u64;
            self.total_out += step.produced as u64;
            tracing::trace!(
                target: "compress::processor",
                status = ?step.status,
                consumed = step.consumed,
                produced = step.produced,
                capacity = output.capacity(),
                "engine call"
            );

            let buffer_full = output.len() == output.capacity();
            match classify(step.status, op.strict) {
                Outcome::Complete => {
                    self.completed = true;
                    break;
                }
                Outcome::Failed(code) => {
                    tracing::debug!(target: "compress::processor", code, "engine failure");
                    return Err(Error::EngineFailure { code });
                }
                Outcome::Continue | Outcome::BufferInsufficient if !step.made_progress() => {
                    if op.must_complete() {
                        tracing::debug!(
                            target: "compress::processor",
                            "engine stalled before stream end"
                        );
                        return Err(Error::EngineFailure { code: Z_BUF_ERROR });
                    }
                    break;
                }
                Outcome::BufferInsufficient => {
                    if buffer_full {
                        self.grow(&mut output);
                    }
                }
                Outcome::Continue => {
                    if !op.should_continue(input.len() - consumed, buffer_full, self.completed) {
                        break;
                    }
                }
            }
        }

        if op.reset_after {
            let status = self.handle.reset();
            if status != EngineStatus::Ok {
                tracing::warn!(target: "compress::processor", ?status, "reset after finish failed");
                return Err(Error::ResetFailed {
                    code: status.code(),
                    output,
                });
            }
        }

        tracing::debug!(
            target: "compress::processor",
            op = ?op.flush,
            consumed,
            len = output.len(),
            completed = self.completed,
            "operation finished"
        );
        Ok(Processed { consumed, output })
    }

    /// Resets the handle without running the engine.
    pub fn reset(&mut self) -> Result<()> {
        check_closed(self)?;
        self.completed = false;
        match self.handle.reset() {
            EngineStatus::Ok => Ok(()),
            status => Err(Error::ResetFailed {
                code: status.code(),
                output: Vec::new(),
            }),
        }
    }

    /// Runs `op` over empty input, then releases the handle. The handle is
    /// released and the processor marked closed even when `op` fails.
    pub fn close(&mut self, op: &Operation) -> Result<Vec<u8>> {
        check_closed(self)?;
        let result = self.process(&[], Vec::new(), op);
        let status = self.handle.end();
        self.closed = true;

        let processed = result?;
        if status != EngineStatus::Ok {
            tracing::warn!(target: "compress::processor", ?status, "stream release failed");
            return Err(Error::CloseFailed {
                code: status.code(),
                output: processed.output,
            });
        }
        Ok(processed.output)
    }
}

impl<E: Engine> StreamCloser for Processor<E> {
    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Z_DATA_ERROR, Z_STREAM_ERROR};
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Engine replaying a fixed list of `(status, consume, produce)` steps.
    struct ScriptedEngine {
        script: VecDeque<(EngineStatus, usize, usize)>,
        calls: Rc<Cell<usize>>,
        ends: Rc<Cell<usize>>,
        reset_status: EngineStatus,
        end_status: EngineStatus,
    }

    impl ScriptedEngine {
        fn new(script: &[(EngineStatus, usize, usize)]) -> Self {
            Self {
                script: script.iter().copied().collect(),
                calls: Rc::new(Cell::new(0)),
                ends: Rc::new(Cell::new(0)),
                reset_status: EngineStatus::Ok,
                end_status: EngineStatus::Ok,
            }
        }
    }

    impl Engine for ScriptedEngine {
        fn process(&mut self, input: &[u8], output: &mut Vec<u8>, _flush: Flush) -> Step {
            self.calls.set(self.calls.get() + 1);
            let (status, consume, produce) = self
                .script
                .pop_front()
                .unwrap_or((EngineStatus::StreamEnd, 0, 0));
            let consumed = consume.min(input.len());
            let produced = produce.min(output.capacity() - output.len());
            output.extend(std::iter::repeat_n(0xab, produced));
            Step {
                status,
                consumed,
                produced,
            }
        }

        fn reset(&mut self) -> EngineStatus {
            self.reset_status
        }

        fn end(&mut self) -> EngineStatus {
            self.ends.set(self.ends.get() + 1);
            self.end_status
        }
    }

    #[test]
    fn classify_maps_every_status() {
        assert_eq!(classify(EngineStatus::StreamEnd, false), Outcome::Complete);
        assert_eq!(classify(EngineStatus::StreamEnd, true), Outcome::Complete);
        assert_eq!(classify(EngineStatus::Ok, false), Outcome::Continue);
        assert_eq!(classify(EngineStatus::Ok, true), Outcome::BufferInsufficient);
        assert_eq!(classify(EngineStatus::BufError, false), Outcome::BufferInsufficient);
        assert_eq!(
            classify(EngineStatus::Error(Z_DATA_ERROR), false),
            Outcome::Failed(Z_DATA_ERROR)
        );
    }

    #[test]
    fn grows_buffer_until_stream_end() {
        let engine = ScriptedEngine::new(&[
            (EngineStatus::BufError, 2, 4),
            (EngineStatus::BufError, 1, 4),
            (EngineStatus::StreamEnd, 0, 3),
        ]);
        let calls = engine.calls.clone();
        let mut p = Processor::with_config(engine, ProcessorConfig { min_growth: 4 });
        let done = p
            .process(b"abc", Vec::with_capacity(0), &Operation::one_shot())
            .unwrap();
        assert_eq!(done.consumed, 3);
        assert_eq!(done.output.len(), 11);
        assert_eq!(calls.get(), 3);
        assert!(p.is_completed());
        assert_eq!(p.total_in(), 3);
        assert_eq!(p.total_out(), 11);
    }

    #[test]
    fn keeps_existing_output_bytes() {
        let engine = ScriptedEngine::new(&[(EngineStatus::StreamEnd, 1, 2)]);
        let mut p = Processor::new(engine);
        let done = p
            .process(b"x", b"head".to_vec(), &Operation::one_shot())
            .unwrap();
        assert_eq!(&done.output[..4], b"head");
        assert_eq!(done.output.len(), 6);
    }

    #[test]
    fn once_runs_a_single_call() {
        let engine = ScriptedEngine::new(&[(EngineStatus::Ok, 1, 1), (EngineStatus::Ok, 1, 1)]);
        let calls = engine.calls.clone();
        let mut p = Processor::new(engine);
        let op = Operation {
            flush: Flush::None,
            strict: false,
            until: Until::Once,
            reset_after: false,
        };
        let done = p.process(b"abcd", Vec::new(), &op).unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(done.consumed, 1);
    }

    #[test]
    fn stream_continues_while_input_remains() {
        let engine = ScriptedEngine::new(&[
            (EngineStatus::Ok, 2, 1),
            (EngineStatus::Ok, 2, 1),
            (EngineStatus::Ok, 2, 0),
        ]);
        let calls = engine.calls.clone();
        let mut p = Processor::new(engine);
        let done = p.process(b"abcdef", Vec::new(), &Operation::stream()).unwrap();
        assert_eq!(calls.get(), 3);
        assert_eq!(done.consumed, 6);
        assert_eq!(done.output.len(), 2);
        assert!(!p.is_completed());
    }

    #[test]
    fn empty_input_still_calls_engine() {
        let engine = ScriptedEngine::new(&[(EngineStatus::BufError, 0, 0)]);
        let calls = engine.calls.clone();
        let mut p = Processor::new(engine);
        let done = p.process(&[], Vec::new(), &Operation::flush()).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(done.output.is_empty());
    }

    #[test]
    fn strict_stall_is_a_buffer_error() {
        let engine = ScriptedEngine::new(&[(EngineStatus::Ok, 0, 0)]);
        let mut p = Processor::new(engine);
        let err = p
            .process(b"abc", Vec::new(), &Operation::one_shot())
            .unwrap_err();
        assert_eq!(err, Error::EngineFailure { code: Z_BUF_ERROR });
    }

    #[test]
    fn engine_errors_are_surfaced() {
        let engine = ScriptedEngine::new(&[(EngineStatus::Error(Z_DATA_ERROR), 0, 0)]);
        let mut p = Processor::new(engine);
        let err = p.process(b"abc", Vec::new(), &Operation::stream()).unwrap_err();
        assert_eq!(err, Error::EngineFailure { code: Z_DATA_ERROR });
        assert_eq!(err.code(), Some(Z_DATA_ERROR));
    }

    #[test]
    fn reset_failure_keeps_output() {
        let mut engine = ScriptedEngine::new(&[(EngineStatus::StreamEnd, 3, 4)]);
        engine.reset_status = EngineStatus::Error(Z_STREAM_ERROR);
        let mut p = Processor::new(engine);
        let err = p
            .process(b"abc", Vec::new(), &Operation::one_shot())
            .unwrap_err();
        assert_eq!(err.code(), Some(Z_STREAM_ERROR));
        assert_eq!(err.into_output(), vec![0xab; 4]);
    }

    #[test]
    fn close_releases_once_and_rejects_later_use() {
        let engine = ScriptedEngine::new(&[(EngineStatus::StreamEnd, 0, 2)]);
        let calls = engine.calls.clone();
        let ends = engine.ends.clone();
        let mut p = Processor::new(engine);
        assert_eq!(p.close(&Operation::close()).unwrap(), vec![0xab; 2]);
        assert!(p.is_closed());
        assert_eq!(p.close(&Operation::close()), Err(Error::AlreadyClosed));
        assert_eq!(
            p.process(b"abc", Vec::new(), &Operation::stream()),
            Err(Error::AlreadyClosed)
        );
        assert_eq!(p.reset(), Err(Error::AlreadyClosed));
        assert_eq!(ends.get(), 1);
        assert_eq!(calls.get(), 1);
        assert!(p.handle().is_released());
    }

    #[test]
    fn close_releases_even_when_finish_fails() {
        let engine = ScriptedEngine::new(&[(EngineStatus::Error(Z_STREAM_ERROR), 0, 0)]);
        let ends = engine.ends.clone();
        let mut p = Processor::new(engine);
        let err = p.close(&Operation::close()).unwrap_err();
        assert_eq!(err, Error::EngineFailure { code: Z_STREAM_ERROR });
        assert!(p.is_closed());
        assert_eq!(ends.get(), 1);
    }

    #[test]
    fn close_failure_is_reported_with_output() {
        let mut engine = ScriptedEngine::new(&[(EngineStatus::StreamEnd, 0, 5)]);
        engine.end_status = EngineStatus::Error(Z_STREAM_ERROR);
        let ends = engine.ends.clone();
        let mut p = Processor::new(engine);
        let err = p.close(&Operation::close()).unwrap_err();
        assert_eq!(
            err,
            Error::CloseFailed {
                code: Z_STREAM_ERROR,
                output: vec![0xab; 5]
            }
        );
        assert!(p.is_closed());
        drop(p);
        assert_eq!(ends.get(), 1);
    }
}
