//! Mock key source for unit testing.
//!
//! Allows tests to inject [`InputKey`]s without a terminal.

use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};

use hidinject_core::InputKey;

use super::{CaptureError, KeySource};

/// A mock implementation of [`KeySource`] that allows tests to inject keys.
#[derive(Debug, Default)]
pub struct MockKeySource {
    sender: Arc<Mutex<Option<Sender<InputKey>>>>,
}

impl MockKeySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Injects a key, as if typed at the terminal.
    ///
    /// Panics if `start()` has not been called or `stop()` has been called.
    pub fn inject_key(&self, key: InputKey) {
        let guard = self.sender.lock().expect("lock poisoned");
        match guard.as_ref() {
            Some(sender) => sender
                .send(key)
                .expect("receiver has been dropped; call start() first"),
            None => panic!("MockKeySource::inject_key called before start()"),
        }
    }

    /// Injects every byte of `text` as an ASCII key.
    pub fn inject_text(&self, text: &str) {
        for byte in text.bytes() {
            self.inject_key(InputKey::Ascii(byte));
        }
    }
}

impl KeySource for MockKeySource {
    fn start(&self) -> Result<mpsc::Receiver<InputKey>, CaptureError> {
        let mut guard = self.sender.lock().expect("lock poisoned");
        if guard.is_some() {
            return Err(CaptureError::AlreadyStarted);
        }
        let (tx, rx) = mpsc::channel();
        *guard = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        // Dropping the sender closes the channel.
        *self.sender.lock().expect("lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_key_source_delivers_injected_keys_in_order() {
        // Arrange
        let source = MockKeySource::new();
        let rx = source.start().expect("start should succeed");

        // Act
        source.inject_text("ok");

        // Assert
        assert_eq!(rx.recv().expect("first"), InputKey::Ascii(b'o'));
        assert_eq!(rx.recv().expect("second"), InputKey::Ascii(b'k'));
    }

    #[test]
    fn test_mock_key_source_stop_closes_channel() {
        let source = MockKeySource::new();
        let rx = source.start().expect("start should succeed");
        source.stop();
        assert!(rx.recv().is_err(), "channel should be closed after stop()");
    }

    #[test]
    fn test_second_start_is_rejected() {
        let source = MockKeySource::new();
        let _rx = source.start().expect("start should succeed");
        assert!(matches!(source.start(), Err(CaptureError::AlreadyStarted)));
    }
}
