//! Keyboard input.
//!
//! Systems read keys through [`InputProvider`]. The headless demo has no
//! keyboard, so a [`KeyboardState`] is fed by an [`Autopilot`] system that
//! replays a fixed steering and firing pattern.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use tracing::trace;

use engine_component::{EcsError, Query};
use engine_system::{System, SystemContext};

/// Keys the demos react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Steer left.
    ArrowLeft,
    /// Steer right.
    ArrowRight,
    /// Fire.
    Space,
}

/// Read-only key state for the current tick.
pub trait InputProvider {
    /// Returns `true` while `key` is held.
    fn is_key_pressed(&self, key: Key) -> bool;

    /// Returns `true` on the tick `key` went down.
    fn is_key_just_pressed(&self, key: Key) -> bool;
}

#[derive(Debug, Default)]
struct Keys {
    pressed: BTreeSet<Key>,
    just_pressed: BTreeSet<Key>,
    just_released: BTreeSet<Key>,
}

/// Tracks which keys are held, just pressed or just released.
#[derive(Debug, Default)]
pub struct KeyboardState {
    keys: RefCell<Keys>,
}

impl KeyboardState {
    /// Nothing held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Press `key`. Pressing a held key does nothing.
    pub fn press(&self, key: Key) {
        let mut keys = self.keys.borrow_mut();
        if keys.pressed.insert(key) {
            keys.just_pressed.insert(key);
        }
    }

    /// Release `key`.
    pub fn release(&self, key: Key) {
        let mut keys = self.keys.borrow_mut();
        if keys.pressed.remove(&key) {
            keys.just_released.insert(key);
        }
    }

    /// Forget the per-tick edges. Call once per tick, before new events.
    pub fn clear_just(&self) {
        let mut keys = self.keys.borrow_mut();
        keys.just_pressed.clear();
        keys.just_released.clear();
    }

    /// Make exactly `held` the set of pressed keys, recording the edges.
    pub fn set_held(&self, held: &BTreeSet<Key>) {
        self.clear_just();
        let current = self.keys.borrow().pressed.clone();
        for &key in current.difference(held) {
            self.release(key);
        }
        for &key in held.difference(&current) {
            self.press(key);
        }
    }

    /// Returns `true` on the tick `key` went up.
    #[must_use]
    pub fn is_key_just_released(&self, key: Key) -> bool {
        self.keys.borrow().just_released.contains(&key)
    }
}

impl InputProvider for KeyboardState {
    fn is_key_pressed(&self, key: Key) -> bool {
        self.keys.borrow().pressed.contains(&key)
    }

    fn is_key_just_pressed(&self, key: Key) -> bool {
        self.keys.borrow().just_pressed.contains(&key)
    }
}

/// Plays a repeating input pattern into a [`KeyboardState`].
///
/// Steers left for `steer_ticks` ticks, then right for as long, and so on,
/// while tapping fire every `fire_every` ticks. Register it before the systems
/// that read the keyboard.
pub struct Autopilot {
    keyboard: Rc<KeyboardState>,
    query: Query,
    steer_ticks: u64,
    fire_every: u64,
}

impl Autopilot {
    /// Drive `keyboard` with the default pattern.
    #[must_use]
    pub fn new(keyboard: Rc<KeyboardState>) -> Self {
        Self {
            keyboard,
            query: Query::none(),
            steer_ticks: 45,
            fire_every: 20,
        }
    }

    /// Change how long each steering phase lasts.
    #[must_use]
    pub fn steer_ticks(mut self, ticks: u64) -> Self {
        self.steer_ticks = ticks.max(1);
        self
    }

    /// Change how often fire is tapped.
    #[must_use]
    pub fn fire_every(mut self, ticks: u64) -> Self {
        self.fire_every = ticks.max(1);
        self
    }

    /// Keys held on tick `tick_id`.
    #[must_use]
    pub fn held_at(&self, tick_id: u64) -> BTreeSet<Key> {
        let mut held = BTreeSet::new();
        let phase = tick_id.saturating_sub(1) / self.steer_ticks;
        held.insert(if phase % 2 == 0 {
            Key::ArrowLeft
        } else {
            Key::ArrowRight
        });
        if tick_id % self.fire_every == 0 {
            held.insert(Key::Space);
        }
        held
    }
}

impl System for Autopilot {
    fn name(&self) -> &str {
        "autopilot"
    }

    fn query(&self) -> &Query {
        &self.query
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), EcsError> {
        let held = self.held_at(ctx.tick_id());
        trace!(tick_id = ctx.tick_id(), ?held, "autopilot input");
        self.keyboard.set_held(&held);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_edges() {
        let keyboard = KeyboardState::new();
        keyboard.press(Key::Space);
        assert!(keyboard.is_key_pressed(Key::Space));
        assert!(keyboard.is_key_just_pressed(Key::Space));

        keyboard.clear_just();
        keyboard.press(Key::Space);
        assert!(keyboard.is_key_pressed(Key::Space));
        assert!(!keyboard.is_key_just_pressed(Key::Space));

        keyboard.release(Key::Space);
        assert!(!keyboard.is_key_pressed(Key::Space));
        assert!(keyboard.is_key_just_released(Key::Space));
    }

    #[test]
    fn test_set_held_computes_transitions() {
        let keyboard = KeyboardState::new();
        keyboard.set_held(&BTreeSet::from([Key::ArrowLeft]));
        keyboard.set_held(&BTreeSet::from([Key::ArrowLeft, Key::Space]));
        assert!(!keyboard.is_key_just_pressed(Key::ArrowLeft));
        assert!(keyboard.is_key_just_pressed(Key::Space));

        keyboard.set_held(&BTreeSet::from([Key::ArrowRight]));
        assert!(keyboard.is_key_just_released(Key::ArrowLeft));
        assert!(keyboard.is_key_just_released(Key::Space));
        assert!(keyboard.is_key_pressed(Key::ArrowRight));
    }

    #[test]
    fn test_autopilot_pattern() {
        let pilot = Autopilot::new(Rc::new(KeyboardState::new()))
            .steer_ticks(10)
            .fire_every(4);
        assert!(pilot.held_at(1).contains(&Key::ArrowLeft));
        assert!(pilot.held_at(10).contains(&Key::ArrowLeft));
        assert!(pilot.held_at(11).contains(&Key::ArrowRight));
        assert!(pilot.held_at(21).contains(&Key::ArrowLeft));
        assert!(pilot.held_at(8).contains(&Key::Space));
        assert!(!pilot.held_at(9).contains(&Key::Space));
    }
}
