//! Logging setup, including deferred output for raw-mode terminal sessions.
//!
//! # Why defer log output? (for beginners)
//!
//! While the terminal is in raw mode, a `\n` moves the cursor down without
//! returning it to column 0, so ordinary log lines would smear across the
//! screen and mix with what the user is typing.  The [`DeferredWriter`] is a
//! `tracing_subscriber` writer that, while an [`OutputSuppression`] guard is
//! alive, collects formatted log lines in memory.  When the guard drops
//! (normal exit, error return, or panic unwinding), it first runs its
//! restore action (leaving raw mode), then writes the buffered lines to
//! stderr.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct DeferredState {
    suppressed: bool,
    buffer: Vec<u8>,
}

/// A log sink that can hold output back while the terminal is in raw mode.
#[derive(Debug, Clone, Default)]
pub struct DeferredWriter {
    state: Arc<Mutex<DeferredState>>,
}

impl DeferredWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts buffering.  `restore` runs when the returned guard drops,
    /// before the buffer is flushed.
    pub fn suppress(&self, restore: impl FnOnce() + Send + 'static) -> OutputSuppression {
        self.lock().suppressed = true;
        OutputSuppression {
            writer: self.clone(),
            restore: Some(Box::new(restore)),
        }
    }

    /// Bytes currently held back.
    pub fn buffered_len(&self) -> usize {
        self.lock().buffer.len()
    }

    fn lock(&self) -> MutexGuard<'_, DeferredState> {
        // A panic while logging must not stop later log output.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn release_into(&self, out: &mut dyn Write) -> io::Result<()> {
        let pending = {
            let mut state = self.lock();
            state.suppressed = false;
            std::mem::take(&mut state.buffer)
        };
        out.write_all(&pending)?;
        out.flush()
    }
}

/// Handle returned by [`DeferredWriter::make_writer`].
#[derive(Debug)]
pub struct DeferredHandle {
    writer: DeferredWriter,
}

impl Write for DeferredHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.writer.lock();
        if state.suppressed {
            state.buffer.extend_from_slice(buf);
            Ok(buf.len())
        } else {
            drop(state);
            io::stderr().write(buf)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.writer.lock().suppressed {
            Ok(())
        } else {
            io::stderr().flush()
        }
    }
}

impl<'a> MakeWriter<'a> for DeferredWriter {
    type Writer = DeferredHandle;

    fn make_writer(&'a self) -> Self::Writer {
        DeferredHandle {
            writer: self.clone(),
        }
    }
}

/// Guard that keeps log output buffered while alive.
pub struct OutputSuppression {
    writer: DeferredWriter,
    restore: Option<Box<dyn FnOnce() + Send>>,
}

impl std::fmt::Debug for OutputSuppression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSuppression")
            .field("buffered", &self.writer.buffered_len())
            .finish()
    }
}

impl Drop for OutputSuppression {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
        // Nowhere left to report a failing stderr.
        let _ = self.writer.release_into(&mut io::stderr());
    }
}

/// Builds the filter: `RUST_LOG` when set, else `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Installs the global subscriber writing straight to stderr.
pub fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(io::stderr)
        .init();
}

/// Installs the global subscriber behind a [`DeferredWriter`] and returns it.
pub fn init_deferred_logging(default_level: &str) -> DeferredWriter {
    let writer = DeferredWriter::new();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(writer.clone())
        .init();
    writer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_writes_are_buffered_while_suppressed() {
        // Arrange
        let writer = DeferredWriter::new();
        let _guard = writer.suppress(|| {});

        // Act
        writer.make_writer().write_all(b"held back\n").expect("write");

        // Assert
        assert_eq!(writer.buffered_len(), 10);
    }

    #[test]
    fn test_release_flushes_buffer_in_order() {
        let writer = DeferredWriter::new();
        writer.lock().suppressed = true;
        writer.make_writer().write_all(b"one\n").expect("write");
        writer.make_writer().write_all(b"two\n").expect("write");

        let mut out = Vec::new();
        writer.release_into(&mut out).expect("release");

        assert_eq!(out, b"one\ntwo\n");
        assert_eq!(writer.buffered_len(), 0);
    }

    #[test]
    fn test_guard_drop_runs_restore_and_clears_buffer() {
        // Arrange
        let writer = DeferredWriter::new();
        let restored = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&restored);
        let guard = writer.suppress(move || flag.store(true, Ordering::SeqCst));
        writer.make_writer().write_all(b"x").expect("write");

        // Act
        drop(guard);

        // Assert
        assert!(restored.load(Ordering::SeqCst));
        assert_eq!(writer.buffered_len(), 0);
        assert!(!writer.lock().suppressed);
    }

    #[test]
    fn test_guard_releases_on_panic_unwind() {
        let writer = DeferredWriter::new();
        let inner = writer.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = inner.suppress(|| {});
            panic!("session crashed");
        });
        assert!(result.is_err());
        assert!(!writer.lock().suppressed);
    }
}
