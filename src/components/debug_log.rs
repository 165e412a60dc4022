//! In-process log buffer.
//!
//! The tracing subscriber writes formatted lines here when a handle has been
//! installed globally, and the Log Viewer module reads them back. The buffer
//! is a bounded ring: old lines fall off the front.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

pub const DEFAULT_MAX_LINES: usize = 2000;

static GLOBAL_LOG: OnceLock<DebugLogHandle> = OnceLock::new();
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();
static PANIC_PENDING: AtomicBool = AtomicBool::new(false);

pub fn set_global_debug_log(handle: DebugLogHandle) -> bool {
    GLOBAL_LOG.set(handle).is_ok()
}

pub fn global_debug_log() -> Option<DebugLogHandle> {
    GLOBAL_LOG.get().cloned()
}

/// Records panics in the log buffer before handing over to the previous hook,
/// so the report survives the alternate screen being torn down.
pub fn install_panic_hook() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }
    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Some(handle) = GLOBAL_LOG.get() {
            handle.push("=== PANIC ===");
            if let Some(location) = info.location() {
                handle.push(format!("{}:{}:{}", location.file(), location.line(), location.column()));
            }
            let message = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "<non-string panic>".to_string());
            handle.push(format!("message: {message}"));
        }
        PANIC_PENDING.store(true, Ordering::SeqCst);
        prev(info);
    }));
}

pub fn take_panic_pending() -> bool {
    PANIC_PENDING.swap(false, Ordering::SeqCst)
}

#[derive(Debug)]
struct LogRing {
    lines: VecDeque<String>,
    max_lines: usize,
    /// Lines ever pushed, including evicted ones.
    total: u64,
}

impl LogRing {
    fn push(&mut self, line: String) {
        self.lines.push_back(line);
        self.total += 1;
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

#[derive(Clone, Debug)]
pub struct DebugLogHandle {
    inner: Arc<Mutex<LogRing>>,
}

impl Default for DebugLogHandle {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl DebugLogHandle {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LogRing {
                lines: VecDeque::new(),
                max_lines: max_lines.max(1),
                total: 0,
            })),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut ring) = self.inner.lock() {
            ring.push(line.into());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|ring| ring.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Monotonic count of pushed lines. Pollers compare it to notice new
    /// output without copying the buffer.
    pub fn generation(&self) -> u64 {
        self.inner.lock().map(|ring| ring.total).unwrap_or(0)
    }

    /// Up to `count` lines ending `from_end` lines before the newest one.
    pub fn tail(&self, count: usize, from_end: usize) -> Vec<String> {
        let Ok(ring) = self.inner.lock() else {
            return Vec::new();
        };
        let end = ring.lines.len().saturating_sub(from_end);
        let start = end.saturating_sub(count);
        ring.lines.range(start..end).cloned().collect()
    }

    pub fn writer(&self) -> DebugLogWriter {
        DebugLogWriter {
            handle: self.clone(),
            pending: Vec::new(),
        }
    }
}

/// `io::Write` adapter that splits output into lines.
#[derive(Debug)]
pub struct DebugLogWriter {
    handle: DebugLogHandle,
    pending: Vec<u8>,
}

impl DebugLogWriter {
    fn drain_lines(&mut self, force: bool) {
        let end = if force {
            self.pending.len()
        } else {
            match self.pending.iter().rposition(|b| *b == b'\n') {
                Some(pos) => pos + 1,
                None => return,
            }
        };
        let drained: Vec<u8> = self.pending.drain(..end).collect();
        for line in String::from_utf8_lossy(&drained).split('\n') {
            if !line.is_empty() {
                self.handle.push(line.trim_end_matches('\r'));
            }
        }
    }
}

impl Write for DebugLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.drain_lines(false);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain_lines(true);
        Ok(())
    }
}

impl Drop for DebugLogWriter {
    fn drop(&mut self) {
        self.drain_lines(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_evicts_oldest() {
        let handle = DebugLogHandle::new(2);
        handle.push("a");
        handle.push("b");
        handle.push("c");
        assert_eq!(handle.tail(10, 0), vec!["b", "c"]);
        assert_eq!(handle.generation(), 3);
    }

    #[test]
    fn tail_honours_offset_from_end() {
        let handle = DebugLogHandle::new(10);
        for i in 0..5 {
            handle.push(format!("{i}"));
        }
        assert_eq!(handle.tail(2, 0), vec!["3", "4"]);
        assert_eq!(handle.tail(2, 1), vec!["2", "3"]);
        assert_eq!(handle.tail(2, 9), Vec::<String>::new());
    }

    #[test]
    fn writer_splits_lines_and_flushes_partial() {
        let handle = DebugLogHandle::new(10);
        let mut writer = handle.writer();
        writer.write_all(b"one\ntw").unwrap();
        assert_eq!(handle.tail(10, 0), vec!["one"]);
        writer.write_all(b"o\r\nthree").unwrap();
        assert_eq!(handle.tail(10, 0), vec!["one", "two"]);
        drop(writer);
        assert_eq!(handle.tail(10, 0), vec!["one", "two", "three"]);
    }
}
