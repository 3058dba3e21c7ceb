//! Input state
//!
//! Hosts feed raw key codes and touch-button presses in; the engine samples one
//! `TickInput` snapshot per frame and then calls `end_frame` so edge-triggered
//! flags last exactly one frame.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Logical keys the game reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Jump,
    Sprint,
    Projectile,
    Dash,
    Pause,
    Restart,
}

impl Key {
    /// Map a DOM-style key code to a logical key
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Key::Left),
            "ArrowRight" | "KeyD" => Some(Key::Right),
            "Space" | "ArrowUp" | "KeyW" => Some(Key::Jump),
            "ShiftLeft" | "ShiftRight" => Some(Key::Sprint),
            "KeyE" => Some(Key::Projectile),
            "KeyQ" => Some(Key::Dash),
            "Escape" | "KeyP" => Some(Key::Pause),
            "KeyR" => Some(Key::Restart),
            _ => None,
        }
    }
}

/// Anything that can hand the engine a per-frame snapshot
pub trait InputSource {
    /// Current held keys plus this frame's edge triggers
    fn snapshot(&self) -> TickInput;

    /// Called once after every frame
    fn end_frame(&mut self);
}

/// Frames a touch button stays held after a tap
pub const TOUCH_HOLD_FRAMES: u32 = 6;

/// On-screen buttons for touch devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchButton {
    Left,
    Right,
    Sprint,
    Jump,
    Projectile,
    Dash,
    Pause,
}

impl TouchButton {
    fn key(self) -> Key {
        match self {
            TouchButton::Left => Key::Left,
            TouchButton::Right => Key::Right,
            TouchButton::Sprint => Key::Sprint,
            TouchButton::Jump => Key::Jump,
            TouchButton::Projectile => Key::Projectile,
            TouchButton::Dash => Key::Dash,
            TouchButton::Pause => Key::Pause,
        }
    }
}

/// Keyboard and touch state with previous-frame bookkeeping
#[derive(Debug, Clone, Default)]
pub struct KeyboardInput {
    held: HashSet<Key>,
    previous: HashSet<Key>,
    /// Touch-held keys and the frames left on each
    touch_held: Vec<(Key, u32)>,
    /// Taps not yet seen by a snapshot
    touch_pressed: HashSet<Key>,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Raw key code variant; unknown codes are ignored
    pub fn code_down(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.key_down(key);
        }
    }

    pub fn code_up(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.key_up(key);
        }
    }

    /// Focus lost: drop everything held
    pub fn clear(&mut self) {
        self.held.clear();
        self.touch_held.clear();
    }

    /// A tap counts as pressed this frame and held for a few frames
    pub fn touch(&mut self, button: TouchButton) {
        let key = button.key();
        self.touch_pressed.insert(key);
        match self.touch_held.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = TOUCH_HOLD_FRAMES,
            None => self.touch_held.push((key, TOUCH_HOLD_FRAMES)),
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key) || self.touch_held.iter().any(|(k, _)| *k == key)
    }

    pub fn just_pressed(&self, key: Key) -> bool {
        (self.held.contains(&key) && !self.previous.contains(&key))
            || self.touch_pressed.contains(&key)
    }
}

impl InputSource for KeyboardInput {
    fn snapshot(&self) -> TickInput {
        TickInput {
            left: self.is_held(Key::Left),
            right: self.is_held(Key::Right),
            sprint: self.is_held(Key::Sprint),
            jump: self.just_pressed(Key::Jump),
            projectile: self.just_pressed(Key::Projectile),
            dash: self.just_pressed(Key::Dash),
            pause: self.just_pressed(Key::Pause),
            restart: self.just_pressed(Key::Restart),
        }
    }

    fn end_frame(&mut self) {
        self.previous.clone_from(&self.held);
        self.touch_pressed.clear();
        self.touch_held.retain_mut(|(_, frames)| {
            *frames -= 1;
            *frames > 0
        });
    }
}
