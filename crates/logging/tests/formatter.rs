// crates/logging/tests/formatter.rs
use logging::StreamFormatter;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, registry};

#[derive(Clone, Default)]
struct VecWriter(Arc<Mutex<Vec<u8>>>);

struct VecWriterGuard(Arc<Mutex<Vec<u8>>>);

impl Write for VecWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> fmt::writer::MakeWriter<'a> for VecWriter {
    type Writer = VecWriterGuard;
    fn make_writer(&'a self) -> Self::Writer {
        VecWriterGuard(self.0.clone())
    }
}

fn capture(timestamps: bool, f: impl FnOnce()) -> String {
    let writer = VecWriter::default();
    let layer = fmt::layer()
        .event_format(StreamFormatter::new(timestamps))
        .with_ansi(false)
        .with_writer(writer.clone());
    let subscriber = registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    String::from_utf8(writer.0.lock().unwrap().clone()).unwrap()
}

#[test]
fn message_then_fields() {
    let out = capture(false, || {
        debug!(target: "compress::processor", len = 42, completed = true, "operation finished");
    });
    assert_eq!(
        out,
        "DEBUG compress::processor: operation finished len=42 completed=true\n"
    );
}

#[test]
fn fields_without_message() {
    let out = capture(false, || {
        warn!(target: "compress::handle", code = -2);
    });
    assert_eq!(out, " WARN compress::handle: code=-2\n");
}

#[test]
fn timestamps_prefix_the_line() {
    let out = capture(true, || {
        warn!(target: "t", "x");
    });
    let (ts, rest) = out.split_at(19);
    assert_eq!(rest, "  WARN t: x\n");
    assert_eq!(ts.as_bytes()[4], b'/');
    assert_eq!(ts.as_bytes()[13], b':');
}
