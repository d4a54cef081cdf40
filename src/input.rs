//! Keyboard → intent mapping.
//!
//! The listener keeps one small `Intent` record between frames instead of a
//! queue: the latest direction wins and fire is a single flag.  The frame
//! driver takes the record exactly once per frame, before stepping.
//!
//! Fire works on two classes of terminal:
//! * **Keyboard-enhancement capable** (kitty protocol): real `Release`
//!   events re-arm the trigger.
//! * **Classic terminals**: only `Press` events, with OS autorepeat showing
//!   up as more presses.  The trigger re-arms once the key has been silent
//!   for longer than `RELEASE_SILENCE`, which outlasts the OS autorepeat
//!   delay, so a held key fires once.

use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::Deserialize;

use crate::entities::Direction;

/// Silence after which a fire key counts as released when the terminal
/// sends no release events.  Typical autorepeat delays are 250 to 600 ms.
pub const RELEASE_SILENCE: Duration = Duration::from_millis(700);

/// Frame interval assumed until `with_frame_interval` says otherwise.
const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Number of frames spanning `RELEASE_SILENCE` at `frame_interval`.
pub fn hold_window(frame_interval: Duration) -> u64 {
    let frame_ms = frame_interval.as_millis().max(1);
    RELEASE_SILENCE.as_millis().div_ceil(frame_ms) as u64
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FireMode {
    /// One shot per discrete press.
    #[default]
    Edge,
    /// Every press and autorepeat event fires, so the rate follows the
    /// host's autorepeat timing.
    Repeat,
}

/// The most recent input, consumed at the start of the next step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Intent {
    pub direction: Option<Direction>,
    pub fire: bool,
}

/// Session-level requests that bypass the intent record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Stop,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    Fire,
    Command(Command),
}

/// Arrows / WASD steer, Space fires, Esc stops, Q or Ctrl-C quits.
pub fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<KeyAction> {
    let action = match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            KeyAction::Command(Command::Quit)
        }
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Steer(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
            KeyAction::Steer(Direction::Down)
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
            KeyAction::Steer(Direction::Left)
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            KeyAction::Steer(Direction::Right)
        }
        KeyCode::Char(' ') => KeyAction::Fire,
        KeyCode::Esc => KeyAction::Command(Command::Stop),
        KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Command(Command::Quit),
        _ => return None,
    };
    Some(action)
}

#[derive(Debug)]
pub struct InputListener {
    fire_mode: FireMode,
    hold_window: u64,
    intent: Intent,
    frame: u64,
    fire_armed: bool,
    fire_last_seen: Option<u64>,
}

impl InputListener {
    pub fn new(fire_mode: FireMode) -> Self {
        InputListener {
            fire_mode,
            hold_window: hold_window(DEFAULT_FRAME_INTERVAL),
            intent: Intent::default(),
            frame: 0,
            fire_armed: true,
            fire_last_seen: None,
        }
    }

    /// Size the release-by-silence window for frames of `frame_interval`.
    pub fn with_frame_interval(self, frame_interval: Duration) -> Self {
        InputListener {
            hold_window: hold_window(frame_interval),
            ..self
        }
    }

    pub fn fire_mode(&self) -> FireMode {
        self.fire_mode
    }

    pub fn hold_window(&self) -> u64 {
        self.hold_window
    }

    /// Fold one terminal event into the pending intent.
    pub fn handle(&mut self, event: &Event) -> Option<Command> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event
        else {
            return None;
        };

        match map_key(*code, *modifiers)? {
            KeyAction::Command(command) => {
                if *kind == KeyEventKind::Press {
                    return Some(command);
                }
            }
            KeyAction::Steer(direction) => {
                if *kind != KeyEventKind::Release {
                    self.intent.direction = Some(direction);
                }
            }
            KeyAction::Fire => self.handle_fire(*kind),
        }
        None
    }

    fn handle_fire(&mut self, kind: KeyEventKind) {
        match (self.fire_mode, kind) {
            (_, KeyEventKind::Release) => {
                self.fire_armed = true;
                self.fire_last_seen = None;
            }
            (FireMode::Repeat, _) => self.intent.fire = true,
            (FireMode::Edge, KeyEventKind::Repeat) => {
                self.fire_last_seen = Some(self.frame);
            }
            (FireMode::Edge, KeyEventKind::Press) => {
                if self.fire_armed || self.fire_released_by_silence() {
                    self.intent.fire = true;
                    self.fire_armed = false;
                }
                self.fire_last_seen = Some(self.frame);
            }
        }
    }

    fn fire_released_by_silence(&self) -> bool {
        self.fire_last_seen
            .map(|last| self.frame.saturating_sub(last) > self.hold_window)
            .unwrap_or(true)
    }

    /// Hand over the intent gathered since the previous frame and start a
    /// new frame.
    pub fn take_intent(&mut self) -> Intent {
        self.frame += 1;
        std::mem::take(&mut self.intent)
    }
}
