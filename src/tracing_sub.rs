use std::io::{self, Write};

use tracing::Level;

use crate::components::debug_log::{DebugLogWriter, global_debug_log};

/// Writes to the in-app log buffer once one is installed, else to stderr.
///
/// The decision is made per event, so lines emitted before the buffer
/// exists still reach the terminal.
pub enum DelegatingWriter {
    Buffer(DebugLogWriter),
    Stderr(io::Stderr),
}

impl DelegatingWriter {
    fn current() -> Self {
        match global_debug_log() {
            Some(handle) => DelegatingWriter::Buffer(handle.writer()),
            None => DelegatingWriter::Stderr(io::stderr()),
        }
    }
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            DelegatingWriter::Buffer(w) => w.write(buf),
            DelegatingWriter::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            DelegatingWriter::Buffer(w) => w.flush(),
            DelegatingWriter::Stderr(s) => s.flush(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SubscriberMakeWriter;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DelegatingWriter::current()
    }
}

/// Install the global fmt subscriber at `level`. Later calls are no-ops.
pub fn init(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(SubscriberMakeWriter)
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(false)
        .try_init();
}

pub fn init_default() {
    init(Level::DEBUG);
}
