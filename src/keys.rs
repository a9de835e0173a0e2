//! Keyboard input for the player and recorder.
//!
//! Uses rdev for global key listening so key presses reach us while the
//! ffplay window has focus, plus a Ctrl+C handler that injects
//! [`KeyPress::Interrupt`].

use rdev::{listen, Event, EventType, Key};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::backend::{KeyPress, Keys, Wait};

/// Keys that end playback and recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    /// Ends playback
    pub quit: char,
    /// Ends recording
    pub stop: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: 'q',
            stop: 's',
        }
    }
}

impl KeyBindings {
    /// True if `key` should end playback. Ctrl+C always does.
    pub fn is_quit(&self, key: Option<KeyPress>) -> bool {
        matches_binding(key, self.quit)
    }

    /// True if `key` should end recording. Ctrl+C always does.
    pub fn is_stop(&self, key: Option<KeyPress>) -> bool {
        matches_binding(key, self.stop)
    }
}

fn matches_binding(key: Option<KeyPress>, bound: char) -> bool {
    match key {
        Some(KeyPress::Interrupt) => true,
        Some(KeyPress::Char(c)) => c == bound,
        None => false,
    }
}

/// Global keyboard listener feeding a channel of key presses.
pub struct KeyListener {
    tx: Sender<KeyPress>,
    rx: Receiver<KeyPress>,
    /// Flag to stop forwarding events
    stop_flag: Arc<AtomicBool>,
    /// Handle to the listener thread
    listener_thread: Option<JoinHandle<()>>,
}

impl Default for KeyListener {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyListener {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            stop_flag: Arc::new(AtomicBool::new(false)),
            listener_thread: None,
        }
    }

    /// Start listening for global key presses.
    ///
    /// Spawns a background thread. Returns an error if already running.
    pub fn start(&mut self) -> Result<(), String> {
        if self.listener_thread.is_some() {
            return Err("Key listener already running".to_string());
        }

        let tx = self.tx.clone();
        let stop_flag = self.stop_flag.clone();

        let handle = thread::spawn(move || {
            let callback = move |event: Event| {
                if stop_flag.load(Ordering::SeqCst) {
                    return;
                }
                if let EventType::KeyPress(key) = event.event_type {
                    if let Some(c) = event_char(event.name.as_deref(), key) {
                        let _ = tx.send(KeyPress::Char(c));
                    }
                }
            };

            // Blocks until error; on macOS this needs Accessibility permission
            if let Err(e) = listen(callback) {
                log::warn!("Key listener error: {:?}", e);
            }
        });

        self.listener_thread = Some(handle);
        Ok(())
    }

    /// Route Ctrl+C into the key channel. Can only be installed once per process.
    pub fn install_interrupt_handler(&self) -> Result<(), ctrlc::Error> {
        let tx = self.tx.clone();
        ctrlc::set_handler(move || {
            log::info!("Received Ctrl+C, stopping");
            let _ = tx.send(KeyPress::Interrupt);
        })
    }

    /// A sender that injects key presses, as the listener thread does.
    pub fn sender(&self) -> Sender<KeyPress> {
        self.tx.clone()
    }

    /// Stop forwarding key presses.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        // rdev's listen() cannot be cancelled; the thread lives until exit
        self.listener_thread = None;
    }
}

impl Keys for KeyListener {
    fn wait_key(&mut self, wait: Wait) -> Option<KeyPress> {
        match wait {
            Wait::Forever => self.rx.recv().ok(),
            Wait::For(d) if d.is_zero() => self.rx.try_recv().ok(),
            Wait::For(d) => self.rx.recv_timeout(d).ok(),
        }
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Character for a key press, preferring the platform's typed name.
fn event_char(name: Option<&str>, key: Key) -> Option<char> {
    if let Some(name) = name {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if !c.is_control() || c == '\u{1b}' {
                return Some(c);
            }
        }
    }
    key_to_char(key)
}

/// Lowercase character for a physical key, if it has one.
fn key_to_char(key: Key) -> Option<char> {
    let c = match key {
        Key::KeyA => 'a',
        Key::KeyB => 'b',
        Key::KeyC => 'c',
        Key::KeyD => 'd',
        Key::KeyE => 'e',
        Key::KeyF => 'f',
        Key::KeyG => 'g',
        Key::KeyH => 'h',
        Key::KeyI => 'i',
        Key::KeyJ => 'j',
        Key::KeyK => 'k',
        Key::KeyL => 'l',
        Key::KeyM => 'm',
        Key::KeyN => 'n',
        Key::KeyO => 'o',
        Key::KeyP => 'p',
        Key::KeyQ => 'q',
        Key::KeyR => 'r',
        Key::KeyS => 's',
        Key::KeyT => 't',
        Key::KeyU => 'u',
        Key::KeyV => 'v',
        Key::KeyW => 'w',
        Key::KeyX => 'x',
        Key::KeyY => 'y',
        Key::KeyZ => 'z',
        Key::Num0 | Key::Kp0 => '0',
        Key::Num1 | Key::Kp1 => '1',
        Key::Num2 | Key::Kp2 => '2',
        Key::Num3 | Key::Kp3 => '3',
        Key::Num4 | Key::Kp4 => '4',
        Key::Num5 | Key::Kp5 => '5',
        Key::Num6 | Key::Kp6 => '6',
        Key::Num7 | Key::Kp7 => '7',
        Key::Num8 | Key::Kp8 => '8',
        Key::Num9 | Key::Kp9 => '9',
        Key::Space => ' ',
        Key::Escape => '\u{1b}',
        Key::Return | Key::KpReturn => '\r',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_bindings() {
        let keys = KeyBindings::default();
        assert_eq!(keys.quit, 'q');
        assert_eq!(keys.stop, 's');
    }

    #[test]
    fn test_quit_and_stop_are_distinct() {
        let keys = KeyBindings::default();
        assert!(keys.is_quit(Some(KeyPress::Char('q'))));
        assert!(!keys.is_quit(Some(KeyPress::Char('s'))));
        assert!(keys.is_stop(Some(KeyPress::Char('s'))));
        assert!(!keys.is_stop(Some(KeyPress::Char('q'))));
    }

    #[test]
    fn test_binding_is_case_sensitive() {
        let keys = KeyBindings::default();
        assert!(!keys.is_quit(Some(KeyPress::Char('Q'))));
    }

    #[test]
    fn test_interrupt_ends_both() {
        let keys = KeyBindings::default();
        assert!(keys.is_quit(Some(KeyPress::Interrupt)));
        assert!(keys.is_stop(Some(KeyPress::Interrupt)));
    }

    #[test]
    fn test_elapsed_wait_ends_neither() {
        let keys = KeyBindings::default();
        assert!(!keys.is_quit(None));
        assert!(!keys.is_stop(None));
    }

    #[test]
    fn test_key_to_char() {
        assert_eq!(key_to_char(Key::KeyQ), Some('q'));
        assert_eq!(key_to_char(Key::KeyS), Some('s'));
        assert_eq!(key_to_char(Key::Num7), Some('7'));
        assert_eq!(key_to_char(Key::Kp3), Some('3'));
        assert_eq!(key_to_char(Key::Escape), Some('\u{1b}'));
        assert_eq!(key_to_char(Key::ShiftLeft), None);
    }

    #[test]
    fn test_event_char_prefers_typed_name() {
        assert_eq!(event_char(Some("Q"), Key::KeyQ), Some('Q'));
        assert_eq!(event_char(Some("é"), Key::KeyE), Some('é'));
    }

    #[test]
    fn test_event_char_falls_back_to_key() {
        assert_eq!(event_char(None, Key::KeyQ), Some('q'));
        assert_eq!(event_char(Some(""), Key::KeyS), Some('s'));
        assert_eq!(event_char(Some("\u{11}"), Key::KeyQ), Some('q'));
    }

    #[test]
    fn test_wait_key_receives_injected_key() {
        let mut listener = KeyListener::new();
        listener.sender().send(KeyPress::Char('q')).unwrap();
        assert_eq!(
            listener.wait_key(Wait::For(Duration::from_millis(10))),
            Some(KeyPress::Char('q'))
        );
    }

    #[test]
    fn test_wait_key_times_out() {
        let mut listener = KeyListener::new();
        assert_eq!(listener.wait_key(Wait::For(Duration::from_millis(5))), None);
    }

    #[test]
    fn test_zero_wait_polls() {
        let mut listener = KeyListener::new();
        assert_eq!(listener.wait_key(Wait::For(Duration::ZERO)), None);
        listener.sender().send(KeyPress::Char('x')).unwrap();
        assert_eq!(
            listener.wait_key(Wait::For(Duration::ZERO)),
            Some(KeyPress::Char('x'))
        );
    }

    #[test]
    fn test_wait_forever_returns_queued_key() {
        let mut listener = KeyListener::new();
        listener.sender().send(KeyPress::Interrupt).unwrap();
        assert_eq!(listener.wait_key(Wait::Forever), Some(KeyPress::Interrupt));
    }
}
