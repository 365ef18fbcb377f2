use serde::{Deserialize, Serialize};

use crate::blocks::Block;
use crate::collision::Bounds;

/// Errors from grid construction and access.
#[derive(Debug, PartialEq)]
pub enum WorldError {
    /// A cell index fell outside the grid. Sweep code is expected to clamp
    /// its ranges before indexing, so seeing this means a caller skipped the
    /// clamp.
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    /// The grid was constructed with a non-positive dimension or tile size.
    InvalidDimensions { width: u32, height: u32 },
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => {
                write!(f, "block ({x}, {y}) outside {width}x{height} grid")
            },
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions {width}x{height}")
            },
        }
    }
}

impl std::error::Error for WorldError {}

/// The level grid.
///
/// Row-major, with row 0 at the *bottom* of the screen; [`World::world_y`]
/// flips rows into pixel space. The grid owns its cells outright and is
/// replaced wholesale on level transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    width: u32,
    height: u32,
    tile_size: f32,
    grid: Vec<Block>,
    objective_balance: i32,
}

impl World {
    /// Create an all-empty grid. Fails fast on degenerate dimensions.
    pub fn new(width: u32, height: u32, tile_size: f32) -> Result<Self, WorldError> {
        if width == 0 || height == 0 || tile_size <= 0.0 {
            return Err(WorldError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            tile_size,
            grid: vec![Block::EMPTY; (width * height) as usize],
            objective_balance: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Edge length of one square cell, in pixels.
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    fn checked_index(&self, x: i32, y: i32) -> Result<usize, WorldError> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return Err(WorldError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    /// Block at grid coordinates.
    pub fn block(&self, x: i32, y: i32) -> Result<Block, WorldError> {
        Ok(self.grid[self.checked_index(x, y)?])
    }

    /// Replace a cell and keep the objective balance current.
    ///
    /// The balance ticks down when the outgoing block was not an objective
    /// and up when the incoming block is not one, in that order. Loading a
    /// level therefore drives the balance to minus the number of objective
    /// cells, and every consumed objective walks it back toward zero — the
    /// level-completion check is `objective_count() == 0`. The two steps
    /// cancel whenever a set does not change the cell's objective-ness.
    pub fn set_block(&mut self, x: i32, y: i32, block: Block) -> Result<(), WorldError> {
        let index = self.checked_index(x, y)?;
        let current = self.grid[index];

        if !current.is_objective() {
            self.objective_balance -= 1;
        }
        if !block.is_objective() {
            self.objective_balance += 1;
        }

        self.grid[index] = block;
        Ok(())
    }

    /// Remaining-objective balance; zero means the level is complete.
    pub fn objective_count(&self) -> i32 {
        self.objective_balance
    }

    /// Fill every cell with empty space and re-zero the objective balance,
    /// ready for a loader to repopulate.
    pub fn clear(&mut self) {
        self.grid.fill(Block::EMPTY);
        self.objective_balance = 0;
    }

    /// Pixel x of a column's left edge.
    pub fn world_x(&self, x: i32) -> f32 {
        x as f32 * self.tile_size
    }

    /// Pixel y of a row's top edge. Row 0 sits at the bottom of the screen.
    pub fn world_y(&self, y: i32) -> f32 {
        (self.height as i32 - 1 - y) as f32 * self.tile_size
    }

    /// Pixel rectangle of one cell.
    pub fn block_bounds(&self, x: i32, y: i32) -> Bounds {
        Bounds::new(
            self.world_x(x),
            self.world_y(y),
            self.tile_size,
            self.tile_size,
        )
    }
}
