use serde::{Deserialize, Serialize};

use crate::blocks::KeyColor;

/// Whether the player is still in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Health {
    Alive,
    Dead,
}

/// Score and pickups. Only the special-tile handler writes here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    pub score: u32,
    pub health: Health,
    key_blue: bool,
    key_green: bool,
    key_red: bool,
    key_yellow: bool,
}

impl Progress {
    pub fn new() -> Self {
        Self {
            score: 0,
            health: Health::Alive,
            key_blue: false,
            key_green: false,
            key_red: false,
            key_yellow: false,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health == Health::Dead
    }

    pub fn has_key(&self, color: KeyColor) -> bool {
        match color {
            KeyColor::Blue => self.key_blue,
            KeyColor::Green => self.key_green,
            KeyColor::Red => self.key_red,
            KeyColor::Yellow => self.key_yellow,
        }
    }

    pub fn grant_key(&mut self, color: KeyColor) {
        match color {
            KeyColor::Blue => self.key_blue = true,
            KeyColor::Green => self.key_green = true,
            KeyColor::Red => self.key_red = true,
            KeyColor::Yellow => self.key_yellow = true,
        }
    }

    /// Back to a fresh level start: alive, no keys. The score survives level
    /// transitions; only lava wipes it.
    pub fn reset_for_level(&mut self) {
        self.health = Health::Alive;
        self.key_blue = false;
        self.key_green = false;
        self.key_red = false;
        self.key_yellow = false;
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}
