pub mod blocks;
pub mod collision;
pub mod levels;
pub mod physics;
pub mod player;
pub mod progress;
pub mod world;

use serde::{Deserialize, Serialize};

use keystone_core::component::{Assets, Component, SheetId, Surface};
use keystone_core::error::CoreError;
use keystone_core::input::{InputState, Key};
use keystone_core::time::GameTime;

use levels::{Background, LEVEL_COUNT, load_level};
use physics::{ConfigError, TuningConfig};
use player::Player;
use world::{World, WorldError};

/// Grid dimensions shared by all three levels.
pub const WORLD_WIDTH: u32 = 12;
pub const WORLD_HEIGHT: u32 = 9;

/// Sprite sheet with one frame per block code, 5x5.
pub const WORLD_SHEET_PATH: &str = "assets/blocks.png";
/// Player sheet: 27 frames in a row (stand/run/jump, both directions).
pub const PLAYER_SHEET_PATH: &str = "assets/player.png";

/// Anything that can go wrong while building or ticking the game.
#[derive(Debug)]
pub enum GameError {
    Config(ConfigError),
    World(WorldError),
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::World(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for GameError {}

impl From<ConfigError> for GameError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<WorldError> for GameError {
    fn from(e: WorldError) -> Self {
        Self::World(e)
    }
}

impl From<GameError> for CoreError {
    fn from(e: GameError) -> Self {
        CoreError::Fatal(e.to_string())
    }
}

/// Things the shell may want to react to (sound, overlays, logging).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u32 },
    LevelComplete { level: u32 },
    PlayerDied,
}

/// The whole game: grid, player, and level flow.
///
/// Owns its state outright; the shell drives it through the [`Component`]
/// passes and reads position, animation frame, and score back out for
/// display.
pub struct Platformer {
    config: TuningConfig,
    world: World,
    player: Player,
    level: u32,
    background: Background,
    paused: bool,
    events: Vec<GameEvent>,
    world_sheet: Option<SheetId>,
    background_sheets: Vec<(Background, SheetId)>,
}

impl Platformer {
    /// Validate tuning, build the grid, and load level one.
    pub fn new(config: TuningConfig) -> Result<Self, GameError> {
        config.validate()?;
        let mut world = World::new(WORLD_WIDTH, WORLD_HEIGHT, config.tile_size)?;
        let background = load_level(&mut world, 1)?;
        let player = Player::new(&config);
        Ok(Self {
            config,
            world,
            player,
            level: 1,
            background,
            paused: false,
            events: Vec::new(),
            world_sheet: None,
            background_sheets: Vec::new(),
        })
    }

    pub fn config(&self) -> &TuningConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// The level loader seam: external collaborators repopulate the grid
    /// through this.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn background(&self) -> Background {
        self.background
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Drain the events accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// One frame of gameplay. The action key is consumed here so a single
    /// press interacts exactly once.
    pub fn tick(&mut self, time: &GameTime, input: &mut InputState) -> Result<(), GameError> {
        if self.paused {
            return Ok(());
        }

        let score_before = self.player.progress().score;
        self.player
            .update(time, input, &mut self.world, &self.config)?;
        input.clear(Key::Action);

        let score = self.player.progress().score;
        if score != score_before {
            self.events.push(GameEvent::ScoreChanged { score });
        }

        if self.world.objective_count() == 0 || self.player.is_dead() {
            if self.player.is_dead() {
                tracing::info!(level = self.level, "player died, restarting");
                self.events.push(GameEvent::PlayerDied);
            } else {
                tracing::info!(level = self.level, "level complete");
                self.events.push(GameEvent::LevelComplete { level: self.level });
            }
            self.advance_level()?;
        }
        Ok(())
    }

    fn advance_level(&mut self) -> Result<(), GameError> {
        self.level += 1;
        if self.level > LEVEL_COUNT {
            self.level = 1;
        }

        self.player.reset(&self.config);
        self.background = load_level(&mut self.world, self.level)?;
        tracing::info!(level = self.level, "level loaded");
        Ok(())
    }

    fn background_sheet(&self) -> Option<SheetId> {
        self.background_sheets
            .iter()
            .find(|(bg, _)| *bg == self.background)
            .map(|&(_, sheet)| sheet)
    }
}

impl Component for Platformer {
    fn load(&mut self, assets: &mut dyn Assets) -> Result<(), CoreError> {
        self.world_sheet = Some(assets.load_sheet(WORLD_SHEET_PATH, 5, 5)?);
        self.player
            .attach_sheet(assets.load_sheet(PLAYER_SHEET_PATH, 27, 1)?);

        self.background_sheets.clear();
        for bg in [
            Background::Castle,
            Background::Desert,
            Background::Grasslands,
            Background::Shroom,
        ] {
            let sheet = assets.load_sheet(bg.asset_path(), 1, 1)?;
            self.background_sheets.push((bg, sheet));
        }
        Ok(())
    }

    fn update(&mut self, time: &GameTime, input: &mut InputState) -> Result<(), CoreError> {
        self.tick(time, input).map_err(CoreError::from)
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if let Some(sheet) = self.background_sheet() {
            surface.draw_sprite(sheet, 0, 0, 0);
        }

        if let Some(sheet) = self.world_sheet {
            for x in 0..self.world.width() as i32 {
                for y in 0..self.world.height() as i32 {
                    let Ok(block) = self.world.block(x, y) else {
                        continue;
                    };
                    if block.code() < 0 {
                        continue;
                    }
                    surface.draw_sprite(
                        sheet,
                        block.code() as u32,
                        self.world.world_x(x) as i32,
                        self.world.world_y(y) as i32,
                    );
                }
            }
        }

        self.player.draw(surface, &self.config);
    }

    fn unload(&mut self, _assets: &mut dyn Assets) {
        self.world_sheet = None;
        self.background_sheets.clear();
        self.player.detach_sheet();
    }
}
