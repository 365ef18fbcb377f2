use serde::{Deserialize, Serialize};

use crate::blocks::Block;
use crate::world::{World, WorldError};

/// Number of playable levels; indices wrap back to 1 past this.
pub const LEVEL_COUNT: u32 = 3;

/// Backdrop the render collaborator should put behind a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Background {
    Castle,
    Desert,
    Grasslands,
    Shroom,
}

impl Background {
    /// Image path for the resource collaborator.
    pub fn asset_path(self) -> &'static str {
        match self {
            Background::Castle => "assets/bg_castle.png",
            Background::Desert => "assets/bg_desert.png",
            Background::Grasslands => "assets/bg_grasslands.png",
            Background::Shroom => "assets/bg_shroom.png",
        }
    }
}

/// Clear the grid and build the requested level. Unknown indices fall back
/// to level one.
pub fn load_level(world: &mut World, index: u32) -> Result<Background, WorldError> {
    world.clear();
    match index {
        2 => level_two(world),
        3 => level_three(world),
        _ => level_one(world),
    }
}

/// A grass field broken by a water gap: a bridge crosses it at ground level
/// with a plank walkway floating above, coins either side of a red key, and
/// the red lock further along.
fn level_one(world: &mut World) -> Result<Background, WorldError> {
    for x in 0..world.width() as i32 {
        if (3..=7).contains(&x) {
            world.set_block(x, 1, Block::BRIDGE)?;
            world.set_block(x, 0, Block::WATER)?;

            world.set_block(x, 4, Block::PLANK)?;
        } else {
            world.set_block(x, 1, Block::GRASS)?;
            world.set_block(x, 0, Block::DEFAULT)?;
        }
    }

    world.set_block(3, 2, Block::COIN_GOLD)?;
    world.set_block(7, 2, Block::COIN_GOLD)?;

    world.set_block(5, 2, Block::KEY_RED)?;
    world.set_block(9, 2, Block::LOCK_RED)?;

    Ok(Background::Grasslands)
}

/// A walled pit of lava with rock pillars at both ends and the coins tucked
/// past a gap in the upper floor.
fn level_two(world: &mut World) -> Result<Background, WorldError> {
    let width = world.width() as i32;
    let top = 3;

    for row in 0..top {
        world.set_block(0, row, Block::ROCK)?;
        world.set_block(1, row, Block::ROCK)?;

        world.set_block(width - 1, row, Block::ROCK)?;
        world.set_block(width - 2, row, Block::ROCK)?;
    }

    for x in 0..width {
        if x > 1 && x < width - 2 {
            world.set_block(x, 0, Block::ROCK)?;
            world.set_block(x, 1, Block::LAVA)?;
        }

        if x < 4 || x > 6 {
            world.set_block(x, top, Block::ROCK)?;
        }
    }

    world.set_block(width - 3, top + 1, Block::COIN_GOLD)?;
    world.set_block(5, 3, Block::COIN_GOLD)?;

    Ok(Background::Castle)
}

/// Sand terraces: a tower on the left, a raised ledge in the middle, and a
/// stepped column on the right, with the blue/green key-and-lock chain
/// threaded across them.
fn level_three(world: &mut World) -> Result<Background, WorldError> {
    for x in 0..world.width() as i32 {
        world.set_block(x, 0, Block::DEFAULT)?;
        world.set_block(x, 1, Block::SAND)?;
    }

    let tower_top = 5;
    for row in 0..tower_top {
        world.set_block(0, row, Block::DEFAULT)?;
    }
    world.set_block(0, tower_top, Block::SAND)?;

    let ledge_len = 5;
    for x in 0..ledge_len {
        world.set_block(x + 4, tower_top, Block::SAND)?;
    }

    for x in 0..2 {
        world.set_block(x + 8, 2, Block::SAND)?;
        world.set_block(x + 8, 1, Block::DEFAULT)?;
    }

    for row in 0..3 {
        world.set_block(10, row, Block::DEFAULT)?;
        world.set_block(11, row, Block::DEFAULT)?;
    }
    world.set_block(10, 3, Block::SAND)?;
    world.set_block(11, 3, Block::SAND)?;

    world.set_block(5, tower_top + 1, Block::KEY_BLUE)?;
    world.set_block(5, tower_top, Block::LOCK_GREEN)?;

    world.set_block(5, 3, Block::KEY_GREEN)?;
    world.set_block(5, 2, Block::LOCK_BLUE)?;

    Ok(Background::Desert)
}
