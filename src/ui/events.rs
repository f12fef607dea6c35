//! Terminal input adapter.
//!
//! A blocking thread polls crossterm and turns key, mouse and resize events
//! into messages on the shared channel. It never touches state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use tracing::{debug, warn};

use crate::executor::MsgSender;
use crate::msg::{MouseKind, Msg};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Normalise a key press to the lowercase names the key router expects.
/// Releases and repeats are dropped.
pub fn key_event_to_msg(key: KeyEvent) -> Option<Msg> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let name = match key.code {
        KeyCode::Char(ch) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            format!("ctrl+{}", ch.to_ascii_lowercase())
        }
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "backtab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::F(n) => format!("f{n}"),
        _ => return None,
    };
    Some(Msg::key(name))
}

pub fn mouse_event_to_msg(mouse: MouseEvent) -> Option<Msg> {
    let kind = match mouse.kind {
        MouseEventKind::Down(_) => MouseKind::Click,
        MouseEventKind::ScrollUp => MouseKind::ScrollUp,
        MouseEventKind::ScrollDown => MouseKind::ScrollDown,
        _ => return None,
    };
    Some(Msg::Mouse {
        kind,
        column: mouse.column,
        row: mouse.row,
    })
}

pub fn event_to_msg(event: Event) -> Option<Msg> {
    match event {
        Event::Key(key) => key_event_to_msg(key),
        Event::Mouse(mouse) => mouse_event_to_msg(mouse),
        Event::Resize(cols, rows) => Some(Msg::Resized { cols, rows }),
        _ => None,
    }
}

/// The running input thread.
pub struct InputAdapter {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputAdapter {
    pub fn spawn(tx: MsgSender) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            // Report the starting size so the first layout is right.
            if let Ok((cols, rows)) = crossterm::terminal::size() {
                let _ = tx.send(Msg::Resized { cols, rows });
            }
            while !flag.load(Ordering::Relaxed) {
                match event::poll(POLL_INTERVAL) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(err) => {
                        warn!("input poll failed: {err}");
                        break;
                    }
                }
                let event = match event::read() {
                    Ok(event) => event,
                    Err(err) => {
                        warn!("input read failed: {err}");
                        break;
                    }
                };
                if let Some(msg) = event_to_msg(event) {
                    if tx.send(msg).is_err() {
                        break;
                    }
                }
            }
            debug!("input thread stopped");
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Ask the thread to stop and wait for it. Returns within one poll
    /// interval.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for InputAdapter {
    fn drop(&mut self) {
        self.stop();
    }
}
