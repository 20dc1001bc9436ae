//! Routes core `tracing` warnings to the browser console.
//!
//! Installed once from [`crate::init`]. Only `WARN` and `ERROR` events are
//! forwarded; geometry `debug!` output stays silent in the browser.

use std::io;

use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;

use crate::console_warn;

/// Buffers one formatted event and hands it to the sink when dropped.
pub(crate) struct ConsoleWriter {
    buf: Vec<u8>,
    sink: fn(&str),
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if !line.is_empty() {
            (self.sink)(line);
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct MakeConsoleWriter {
    sink: fn(&str),
}

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            buf: Vec::new(),
            sink: self.sink,
        }
    }
}

/// A `fmt` subscriber writing warnings, one line per event, to `sink`.
///
/// No timestamps: `SystemTime::now` is unavailable on `wasm32-unknown-unknown`.
pub(crate) fn console_subscriber(sink: fn(&str)) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_writer(MakeConsoleWriter { sink })
        .with_ansi(false)
        .without_time()
        .finish()
}

/// Install the console subscriber as the global default.
pub(crate) fn install() {
    // A subscriber installed by the host page wins.
    let _ = tracing::subscriber::set_global_default(console_subscriber(console_warn));
}
