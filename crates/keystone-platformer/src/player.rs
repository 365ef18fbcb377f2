use serde::{Deserialize, Serialize};

use keystone_core::component::{SheetId, Surface};
use keystone_core::input::{InputState, Key};
use keystone_core::time::GameTime;

use crate::physics::{Body, StepInput, TuningConfig, step};
use crate::progress::Progress;
use crate::world::{World, WorldError};

/// What the player is doing, for animation selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Jump,
    Walk,
    Idle,
}

/// Which way the player faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Front,
}

/// Inclusive frame range on the player sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub start: u32,
    pub end: u32,
}

const ANIM_CENTER: Animation = Animation { start: 0, end: 0 };
const ANIM_STAND_LEFT: Animation = Animation { start: 1, end: 1 };
const ANIM_STAND_RIGHT: Animation = Animation { start: 2, end: 2 };
const ANIM_RUN_LEFT: Animation = Animation { start: 3, end: 13 };
const ANIM_RUN_RIGHT: Animation = Animation { start: 14, end: 23 };
const ANIM_JUMP_LEFT: Animation = Animation { start: 25, end: 25 };
const ANIM_JUMP_RIGHT: Animation = Animation { start: 26, end: 26 };

/// Seconds per animation frame (~12 fps walk cycle).
const FRAME_DELAY: f32 = 1.0 / 12.0;

/// Gold, for the score readout.
const SCORE_COLOR: u32 = 0xFFD700;

/// Spawn corner for a fresh level.
const SPAWN_X: f32 = 10.0;
const SPAWN_Y: f32 = 10.0;

/// The player entity: kinematics, pickups, and animation state.
pub struct Player {
    body: Body,
    progress: Progress,
    action: Action,
    direction: Direction,
    /// Horizontal drive; only re-sampled while grounded, so a jump carries
    /// its launch direction.
    movement: f32,
    /// Jump key state last tick; a held key does not re-launch on landing.
    was_jumping: bool,
    frame: u32,
    frame_elapsed: f32,
    sheet: Option<SheetId>,
}

impl Player {
    pub fn new(config: &TuningConfig) -> Self {
        Self {
            body: Body::new(SPAWN_X, SPAWN_Y, config),
            progress: Progress::new(),
            action: Action::Idle,
            direction: Direction::Front,
            movement: 0.0,
            was_jumping: false,
            frame: 0,
            frame_elapsed: 0.0,
            sheet: None,
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Sprite-sheet frame for the render collaborator.
    pub fn animation_frame(&self) -> u32 {
        self.frame
    }

    pub fn is_dead(&self) -> bool {
        self.progress.is_dead()
    }

    /// Hand over the sheet handle acquired by the game's load pass.
    pub fn attach_sheet(&mut self, sheet: SheetId) {
        self.sheet = Some(sheet);
    }

    pub fn detach_sheet(&mut self) {
        self.sheet = None;
    }

    /// Back to the spawn corner for a fresh level. Keys and health reset;
    /// the score rides along.
    pub fn reset(&mut self, config: &TuningConfig) {
        self.body = Body::new(SPAWN_X, SPAWN_Y, config);
        self.progress.reset_for_level();
        self.action = Action::Idle;
        self.direction = Direction::Front;
        self.movement = 0.0;
        self.was_jumping = false;
        self.frame = 0;
        self.frame_elapsed = 0.0;
    }

    /// One tick: sample input, run physics against the grid, then settle the
    /// animation state from the resolved motion.
    pub fn update(
        &mut self,
        time: &GameTime,
        input: &InputState,
        world: &mut World,
        config: &TuningConfig,
    ) -> Result<(), WorldError> {
        let dt = time.delta();

        let mut new_action = Action::Idle;
        let mut new_direction = Direction::Front;
        let mut action_pressed = false;

        if self.body.on_ground {
            self.movement = 0.0;
            action_pressed = input.is_down(Key::Action);

            if input.is_down(Key::Left) {
                self.movement = -1.0;
                new_action = Action::Walk;
                new_direction = Direction::Left;
            }
            if input.is_down(Key::Right) {
                self.movement = 1.0;
                new_action = Action::Walk;
                new_direction = Direction::Right;
            }
        }

        // Launch only from the ground on a fresh press; keep sustaining an
        // in-flight jump while the key stays down.
        let jump_held = input.is_down(Key::Jump);
        let jumping = jump_held
            && ((self.body.on_ground && !self.was_jumping) || self.body.jump_time > 0.0);
        if jumping {
            new_action = Action::Jump;
            if new_direction == Direction::Front {
                new_direction = self.direction;
            }
        }
        self.was_jumping = jump_held;

        step(
            &mut self.body,
            &StepInput {
                movement: self.movement,
                jumping,
                action: action_pressed,
            },
            world,
            &mut self.progress,
            config,
            dt,
        )?;

        self.handle_animation(new_action, new_direction, dt);
        Ok(())
    }

    fn animation(&self) -> Animation {
        if self.direction == Direction::Front {
            return ANIM_CENTER;
        }
        match (self.action, self.direction) {
            (Action::Jump, Direction::Left) => ANIM_JUMP_LEFT,
            (Action::Jump, _) => ANIM_JUMP_RIGHT,
            (Action::Walk, Direction::Left) => ANIM_RUN_LEFT,
            (Action::Walk, _) => ANIM_RUN_RIGHT,
            (Action::Idle, Direction::Left) => ANIM_STAND_LEFT,
            (Action::Idle, _) => ANIM_STAND_RIGHT,
        }
    }

    fn handle_animation(&mut self, new_action: Action, new_direction: Direction, dt: f32) {
        if new_action != self.action || new_direction != self.direction {
            self.action = new_action;
            self.direction = new_direction;
            self.frame = self.animation().start;
            self.frame_elapsed = 0.0;
        }

        self.frame_elapsed += dt;
        if self.frame_elapsed > FRAME_DELAY {
            self.frame_elapsed %= FRAME_DELAY;
            self.frame += 1;
        }

        let animation = self.animation();
        if self.frame > animation.end || self.frame < animation.start {
            self.frame = animation.start;
        }
    }

    /// Sprite plus the score readout in the corner.
    pub fn draw(&self, surface: &mut dyn Surface, config: &TuningConfig) {
        if let Some(sheet) = self.sheet {
            surface.draw_sprite(
                sheet,
                self.frame,
                self.body.x.floor() as i32,
                self.body.y.floor() as i32,
            );
        }
        surface.draw_text(
            &self.progress.score.to_string(),
            (config.screen_width - 100.0) as i32,
            (config.screen_height - 50.0) as i32,
            SCORE_COLOR,
        );
    }
}
