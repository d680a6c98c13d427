//! Raw-mode terminal key capture.
//!
//! # Why a thread? (for beginners)
//!
//! Reading a key from the terminal blocks until one is typed, but the poll
//! callback must never block.  The capture therefore runs on its own thread:
//! it waits for key events with a short timeout (so it can notice a stop
//! request), translates them, and sends them down an `mpsc` channel.  The
//! poll callback picks them up with `try_recv`, which returns immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::terminal;
use hidinject_core::InputKey;
use tracing::{debug, warn};

use super::{translate, CaptureError, KeySource};

/// How long the capture thread waits for an event before rechecking `running`.
const EVENT_WAIT: Duration = Duration::from_millis(50);

/// Captures keys from the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalKeySource {
    running: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl TerminalKeySource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeySource for TerminalKeySource {
    fn start(&self) -> Result<mpsc::Receiver<InputKey>, CaptureError> {
        let mut worker = self.worker.lock().map_err(|_| CaptureError::AlreadyStarted)?;
        if worker.is_some() {
            return Err(CaptureError::AlreadyStarted);
        }

        terminal::enable_raw_mode().map_err(CaptureError::RawMode)?;
        self.running.store(true, Ordering::SeqCst);

        let (tx, rx) = mpsc::channel();
        let running = Arc::clone(&self.running);
        let spawned = std::thread::Builder::new()
            .name("key-capture".into())
            .spawn(move || capture_loop(&running, &tx));

        match spawned {
            Ok(handle) => {
                *worker = Some(handle);
                debug!("terminal key capture started");
                Ok(rx)
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                let _ = terminal::disable_raw_mode();
                Err(CaptureError::Spawn(e))
            }
        }
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        let handle = match self.worker.lock() {
            Ok(mut worker) => worker.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("key capture thread panicked");
            }
            if let Err(e) = terminal::disable_raw_mode() {
                warn!(error = %e, "failed to leave raw mode");
            }
            debug!("terminal key capture stopped");
        }
    }
}

impl Drop for TerminalKeySource {
    fn drop(&mut self) {
        self.stop();
    }
}

fn capture_loop(running: &AtomicBool, tx: &mpsc::Sender<InputKey>) {
    while running.load(Ordering::SeqCst) {
        match event::poll(EVENT_WAIT) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => {
                warn!(error = %e, "terminal event poll failed; capture ending");
                break;
            }
        }
        let key = match event::read() {
            Ok(Event::Key(key)) => key,
            Ok(_) => continue,
            Err(e) => {
                warn!(error = %e, "terminal read failed; capture ending");
                break;
            }
        };
        if let Some(input) = translate(key) {
            if tx.send(input).is_err() {
                // Receiver gone: the session is over.
                break;
            }
        }
    }
}
