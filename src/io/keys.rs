//! Keyboard control while listening.
//!
//! The terminal is put in raw mode so single key presses arrive without
//! Enter. In raw mode Ctrl+C is a key event, not a signal, so it is mapped
//! to [`StopReason::Interrupted`] here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How long the watcher thread waits for a key before re-checking shutdown.
const KEY_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopReason {
    /// ESC pressed
    EscapePressed,
    /// Ctrl+C
    Interrupted,
}

/// Commands sent to the listening loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Stop(StopReason),
    ToggleChords,
}

/// Anything that can hand the listening loop a stream of [`Control`]s.
pub trait ControlSource {
    fn controls(&self) -> &Receiver<Control>;
}

impl ControlSource for Receiver<Control> {
    fn controls(&self) -> &Receiver<Control> {
        self
    }
}

/// Maps a key event to a control command.
pub fn control_for(key: KeyEvent) -> Option<Control> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Esc => Some(Control::Stop(StopReason::EscapePressed)),
        KeyCode::Char('c') | KeyCode::Char('C')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            Some(Control::Stop(StopReason::Interrupted))
        }
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Control::ToggleChords),
        _ => None,
    }
}

/// Enables terminal raw mode, restoring the previous mode on drop.
pub struct RawModeGuard(());

impl RawModeGuard {
    pub fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self(()))
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::warn!("Failed to restore terminal mode: {}", e);
        }
    }
}

/// Background thread turning key presses into [`Control`]s.
///
/// Dropping the watcher stops the thread and restores the terminal.
pub struct KeyWatcher {
    controls: Receiver<Control>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    _raw_mode: RawModeGuard,
}

impl KeyWatcher {
    pub fn spawn() -> Result<Self> {
        let raw_mode = RawModeGuard::enable()?;
        let (sender, controls) = unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));

        let shutdown_clone = Arc::clone(&shutdown);
        let handle = thread::Builder::new()
            .name("key-watcher".into())
            .spawn(move || Self::watch(sender, shutdown_clone))
            .map_err(|e| Error::Keyboard(e.to_string()))?;

        Ok(Self {
            controls,
            shutdown,
            handle: Some(handle),
            _raw_mode: raw_mode,
        })
    }

    fn watch(sender: Sender<Control>, shutdown: Arc<AtomicBool>) {
        while !shutdown.load(Ordering::Acquire) {
            let key = match event::poll(KEY_POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => key,
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::warn!("Keyboard read failed: {}", e);
                        return;
                    }
                },
                Err(e) => {
                    tracing::warn!("Keyboard poll failed: {}", e);
                    return;
                }
            };

            if let Some(control) = control_for(key) {
                tracing::debug!(?control, "key control");
                if sender.send(control).is_err() {
                    return;
                }
            }
        }
    }
}

impl ControlSource for KeyWatcher {
    fn controls(&self) -> &Receiver<Control> {
        &self.controls
    }
}

impl Drop for KeyWatcher {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
