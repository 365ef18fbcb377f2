use serde::{Deserialize, Serialize};

/// One cell of the level grid, identified by its sprite-sheet code.
///
/// The code doubles as the frame index into the world sprite sheet, so the
/// grid stores raw codes rather than a closed enum; codes nobody recognizes
/// still flow through the classification predicates below (and come out
/// solid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block(pub i32);

impl Block {
    /// Empty space.
    pub const EMPTY: Block = Block(-1);

    // Top-level layers.
    pub const GRASS: Block = Block(1);
    pub const SPACE: Block = Block(10);
    pub const SAND: Block = Block(14);

    // Filler layers.
    pub const DIRT: Block = Block(0);
    pub const DEFAULT: Block = Block(11);
    pub const ROCK: Block = Block(13);

    // Bridge and plank.
    pub const BRIDGE: Block = Block(2);
    pub const PLANK: Block = Block(12);

    // Bonus block, before and after a lock is opened against it.
    pub const BONUS: Block = Block(3);
    pub const BONUS_USED: Block = Block(4);

    // Coins.
    pub const COIN_BRONZE: Block = Block(5);
    pub const COIN_GOLD: Block = Block(6);
    pub const COIN_RARE: Block = Block(7);
    pub const COIN_SILVER: Block = Block(8);
    pub const COIN_SPECIAL: Block = Block(9);

    // Keys.
    pub const KEY_BLUE: Block = Block(15);
    pub const KEY_GREEN: Block = Block(16);
    pub const KEY_RED: Block = Block(17);
    pub const KEY_YELLOW: Block = Block(18);

    // Locks.
    pub const LOCK_BLUE: Block = Block(20);
    pub const LOCK_GREEN: Block = Block(21);
    pub const LOCK_RED: Block = Block(22);
    pub const LOCK_YELLOW: Block = Block(23);

    // Liquids.
    pub const LAVA: Block = Block(19);
    pub const WATER: Block = Block(24);

    /// Raw sprite/code value.
    pub fn code(self) -> i32 {
        self.0
    }

    /// Whether the block stops a body. Liquids are sink-through (contact is
    /// what makes lava lethal). Unrecognized codes are solid.
    pub fn is_solid(self) -> bool {
        !matches!(
            self,
            Block::EMPTY
                | Block::KEY_BLUE
                | Block::KEY_GREEN
                | Block::KEY_RED
                | Block::KEY_YELLOW
                | Block::COIN_BRONZE
                | Block::COIN_GOLD
                | Block::COIN_RARE
                | Block::COIN_SILVER
                | Block::COIN_SPECIAL
                | Block::PLANK
                | Block::LAVA
                | Block::WATER
        )
    }

    /// Whether a body can move through the block.
    pub fn is_passable(self) -> bool {
        !self.is_solid()
    }

    /// Whether the block cannot be passed through at all.
    pub fn is_impassable(self) -> bool {
        !self.is_passable()
    }

    /// Planks carry bodies that land from above but never block from the
    /// side or below.
    pub fn is_platform(self) -> bool {
        self == Block::PLANK
    }

    /// Whether the block counts toward level completion. Coins and locks do;
    /// keys do not (picking one up nets out to zero on the balance).
    pub fn is_objective(self) -> bool {
        matches!(
            self,
            Block::LOCK_BLUE
                | Block::LOCK_GREEN
                | Block::LOCK_RED
                | Block::LOCK_YELLOW
                | Block::COIN_BRONZE
                | Block::COIN_GOLD
                | Block::COIN_RARE
                | Block::COIN_SILVER
                | Block::COIN_SPECIAL
        )
    }
}

/// The four key/lock colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyColor {
    Blue,
    Green,
    Red,
    Yellow,
}
