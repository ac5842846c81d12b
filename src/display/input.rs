//! Keyboard input from the terminal.
//!
//! A dedicated thread blocks on `event::read` and forwards everything
//! through a channel, so the frame loop never blocks on I/O.
//!
//! Works on two classes of terminal:
//! * **Keyboard-enhancement capable** (kitty protocol): real `Release`
//!   events end a held direction key.
//! * **Classic terminals**: only `Press` events arrive, with OS key-repeat
//!   showing up as more presses. A direction key counts as held until its
//!   hold window passes without another press, then a `KeyUp` is made up.

use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::backend::{InputEvent, InputSource, Key};
use crate::error::StartupError;

/// Covers the OS delay before key-repeat starts.
pub const FIRST_HOLD: Duration = Duration::from_millis(600);
/// Covers the gap between two repeats.
pub const REPEAT_HOLD: Duration = Duration::from_millis(150);

/// Start the reader thread. It ends when the receiver is dropped.
pub fn spawn_event_reader() -> Result<Receiver<Event>, StartupError> {
    let (tx, rx) = mpsc::channel::<Event>();
    thread::Builder::new()
        .name("terminal-input".into())
        .spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    log::warn!("terminal input stopped: {}", err);
                    break;
                }
            }
        })
        .map_err(|source| StartupError::ResourceCreation {
            what: "input thread",
            source,
        })?;
    Ok(rx)
}

pub fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up | KeyCode::Char(' ') => Key::Fire,
        KeyCode::Char('p') | KeyCode::Char('P') => Key::Pause,
        KeyCode::Char('n') | KeyCode::Char('N') => Key::NewGame,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Key::Quit,
        _ => Key::Other,
    }
}

fn is_direction(key: Key) -> bool {
    matches!(key, Key::Left | Key::Right)
}

pub struct TerminalInput {
    rx: Receiver<Event>,
    keyboard_enhanced: bool,
    /// Direction keys considered down, with the instant their hold ends.
    held: HashMap<Key, Instant>,
    pending: VecDeque<InputEvent>,
    disconnected: bool,
}

impl TerminalInput {
    pub fn new(rx: Receiver<Event>, keyboard_enhanced: bool) -> Self {
        Self {
            rx,
            keyboard_enhanced,
            held: HashMap::new(),
            pending: VecDeque::new(),
            disconnected: false,
        }
    }

    /// `poll_input_event` as seen at `now`.
    pub fn poll_at(&mut self, now: Instant) -> Option<InputEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(Event::Key(key)) => self.on_key(key, now),
                Ok(_) => {}
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        self.disconnected = true;
                        self.pending.push_back(InputEvent::Quit);
                    }
                    break;
                }
            }
        }

        if !self.keyboard_enhanced {
            self.expire_holds(now);
        }

        self.pending.pop_front()
    }

    fn on_key(&mut self, event: KeyEvent, now: Instant) {
        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            self.pending.push_back(InputEvent::Quit);
            return;
        }

        let key = map_key(event.code);
        match event.kind {
            KeyEventKind::Press if is_direction(key) && !self.keyboard_enhanced => {
                // A repeat only stretches the hold; the intent is already set.
                let window = if self.held.contains_key(&key) {
                    REPEAT_HOLD
                } else {
                    self.pending.push_back(InputEvent::KeyDown(key));
                    FIRST_HOLD
                };
                self.held.insert(key, now + window);
            }
            KeyEventKind::Press => self.pending.push_back(InputEvent::KeyDown(key)),
            KeyEventKind::Repeat => {}
            KeyEventKind::Release => {
                self.held.remove(&key);
                self.pending.push_back(InputEvent::KeyUp(key));
            }
        }
    }

    fn expire_holds(&mut self, now: Instant) {
        let mut expired: Vec<Key> = self
            .held
            .iter()
            .filter(|(_, &until)| until <= now)
            .map(|(&key, _)| key)
            .collect();
        expired.sort_by_key(|key| *key as u8);

        for key in expired {
            self.held.remove(&key);
            self.pending.push_back(InputEvent::KeyUp(key));
        }
    }
}

impl InputSource for TerminalInput {
    fn poll_input_event(&mut self) -> Option<InputEvent> {
        self.poll_at(Instant::now())
    }
}
