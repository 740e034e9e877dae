//! Non-blocking sources of operator commands

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::warn;

use super::Command;
use crate::utils::install_terminal_panic_hook;

/// Polled by the search loop before every candidate. Must never block.
pub trait ControlSource {
    fn poll(&mut self) -> Option<Command>;
}

impl<S: ControlSource + ?Sized> ControlSource for Box<S> {
    fn poll(&mut self) -> Option<Command> {
        (**self).poll()
    }
}

/// Commands delivered over a channel, for embedding the search in other
/// programs and for tests.
#[derive(Debug)]
pub struct ChannelControl {
    receiver: Receiver<Command>,
}

/// Sending half of a [`ChannelControl`].
#[derive(Debug, Clone)]
pub struct ControlHandle {
    sender: Sender<Command>,
}

impl ChannelControl {
    pub fn new() -> (Self, ControlHandle) {
        let (sender, receiver) = mpsc::channel();
        (Self { receiver }, ControlHandle { sender })
    }
}

impl ControlSource for ChannelControl {
    fn poll(&mut self) -> Option<Command> {
        self.receiver.try_recv().ok()
    }
}

impl ControlHandle {
    /// Queue a command. Ignored once the search has finished.
    pub fn send(&self, command: Command) {
        let _ = self.sender.send(command);
    }

    pub fn request_status(&self) {
        self.send(Command::Status);
    }

    pub fn request_checkpoint(&self) {
        self.send(Command::Checkpoint);
    }

    pub fn request_exit(&self) {
        self.send(Command::Exit);
    }
}

/// Turns SIGINT/SIGTERM into a checkpoint-and-exit request. Used when stdin is
/// not a terminal.
#[derive(Debug)]
pub struct SignalControl {
    pending: Arc<AtomicBool>,
}

impl SignalControl {
    /// Install the process-wide signal handler. Only one may exist.
    pub fn install() -> Result<Self, ctrlc::Error> {
        let pending = Arc::new(AtomicBool::new(false));
        let flag = pending.clone();
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })?;
        Ok(Self { pending })
    }
}

impl ControlSource for SignalControl {
    fn poll(&mut self) -> Option<Command> {
        self.pending
            .swap(false, Ordering::SeqCst)
            .then_some(Command::Exit)
    }
}

/// Reads single key presses from the terminal in raw mode.
///
/// Ctrl+C arrives as a key event in raw mode and is treated as `X`.
#[derive(Debug)]
pub struct KeyboardControl {
    _raw: (),
}

impl KeyboardControl {
    pub fn enable() -> io::Result<Self> {
        install_terminal_panic_hook();
        enable_raw_mode()?;
        Ok(Self { _raw: () })
    }
}

impl Drop for KeyboardControl {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

impl ControlSource for KeyboardControl {
    fn poll(&mut self) -> Option<Command> {
        match event::poll(Duration::ZERO) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(err) => {
                warn!(error = %err, "keyboard poll failed");
                return None;
            }
        }

        let key = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
            Ok(_) => return None,
            Err(err) => {
                warn!(error = %err, "keyboard read failed");
                return None;
            }
        };

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::Exit)
            }
            KeyCode::Char(ch) => Some(Command::from_key(ch)),
            KeyCode::Enter => None,
            _ => Some(Command::Help),
        }
    }
}

/// Adds a checkpoint request every `interval` on top of another source.
#[derive(Debug)]
pub struct Autosave<S> {
    inner: S,
    interval: Duration,
    last: Instant,
}

impl<S: ControlSource> Autosave<S> {
    pub fn new(inner: S, interval: Duration) -> Self {
        Self {
            inner,
            interval,
            last: Instant::now(),
        }
    }
}

impl<S: ControlSource> ControlSource for Autosave<S> {
    fn poll(&mut self) -> Option<Command> {
        if let Some(command) = self.inner.poll() {
            if command == Command::Checkpoint {
                self.last = Instant::now();
            }
            return Some(command);
        }
        if self.last.elapsed() >= self.interval {
            self.last = Instant::now();
            return Some(Command::Checkpoint);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_delivers_in_order() {
        let (mut control, handle) = ChannelControl::new();
        assert_eq!(control.poll(), None);

        handle.request_status();
        handle.request_checkpoint();
        handle.request_exit();

        assert_eq!(control.poll(), Some(Command::Status));
        assert_eq!(control.poll(), Some(Command::Checkpoint));
        assert_eq!(control.poll(), Some(Command::Exit));
        assert_eq!(control.poll(), None);
    }

    #[test]
    fn test_channel_survives_dropped_handle() {
        let (mut control, handle) = ChannelControl::new();
        drop(handle);
        assert_eq!(control.poll(), None);
    }

    #[test]
    fn test_autosave_fires_after_interval() {
        let (control, _handle) = ChannelControl::new();
        let mut autosave = Autosave::new(control, Duration::ZERO);
        assert_eq!(autosave.poll(), Some(Command::Checkpoint));
    }

    #[test]
    fn test_autosave_defers_to_inner_source() {
        let (control, handle) = ChannelControl::new();
        let mut autosave = Autosave::new(control, Duration::from_secs(3_600));
        assert_eq!(autosave.poll(), None);

        handle.request_exit();
        assert_eq!(autosave.poll(), Some(Command::Exit));
        assert_eq!(autosave.poll(), None);
    }

    #[test]
    fn test_boxed_source_forwards() {
        let (control, handle) = ChannelControl::new();
        let mut boxed: Box<dyn ControlSource> = Box::new(control);
        handle.request_status();
        assert_eq!(boxed.poll(), Some(Command::Status));
    }
}
