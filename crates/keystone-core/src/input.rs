use serde::{Deserialize, Serialize};

/// The keys the games care about. The windowing shell translates whatever
/// raw keycodes it receives into these before each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Jump,
    /// Interact with the world (open locks). Edge-triggered: the game samples
    /// it once per tick and then clears it.
    Action,
    Pause,
    Quit,
}

const KEY_COUNT: usize = 6;

fn key_index(key: Key) -> usize {
    match key {
        Key::Left => 0,
        Key::Right => 1,
        Key::Jump => 2,
        Key::Action => 3,
        Key::Pause => 4,
        Key::Quit => 5,
    }
}

/// Held-key state, updated by the shell from platform events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputState {
    down: [bool; KEY_COUNT],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key-press event.
    pub fn press(&mut self, key: Key) {
        self.down[key_index(key)] = true;
    }

    /// Register a key-release event.
    pub fn release(&mut self, key: Key) {
        self.down[key_index(key)] = false;
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down[key_index(key)]
    }

    /// Force a key up so a single press is consumed exactly once. Used for
    /// edge-triggered keys like [`Key::Action`] and [`Key::Pause`].
    pub fn clear(&mut self, key: Key) {
        self.down[key_index(key)] = false;
    }

    /// Horizontal direction in {-1, 0, +1}. Right wins when both directions
    /// are held.
    pub fn move_dir(&self) -> f32 {
        let mut dir = 0.0;
        if self.is_down(Key::Left) {
            dir = -1.0;
        }
        if self.is_down(Key::Right) {
            dir = 1.0;
        }
        dir
    }
}
