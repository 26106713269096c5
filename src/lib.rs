//! Flappy Quiz - A Flappy Bird clone gated by a true/false quiz
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, quiz gate, state machine)
//! - `view`: Pure view model derived from the world each tick
//! - `driver`: Per-refresh step loop wiring the sim to its collaborators
//! - `renderer`: Presentation surface (canvas 2D in the browser)
//! - `platform`: Viewport scaling and analytics collaborators
//! - `persistence`: JSON storage in LocalStorage
//! - `audio`: Sound effects for game events

pub mod audio;
pub mod config;
pub mod driver;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod view;

pub use config::{AttemptBudget, GameConfig, PhysicsTuning, RestartPolicy};
pub use driver::GameDriver;
pub use highscores::HighScores;

/// Game configuration constants
pub mod consts {
    /// Logical play field (simulation space, independent of the canvas size)
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Top of the ground strip; the bird fails when its bottom edge passes it
    pub const GROUND_Y: f32 = 550.0;

    /// Bird defaults
    pub const BIRD_X: f32 = 50.0;
    pub const BIRD_START_Y: f32 = 300.0;
    pub const BIRD_SIZE: f32 = 20.0;
    /// Tilt limits in degrees
    pub const BIRD_MAX_TILT: f32 = 20.0;
    /// Degrees of tilt per unit of vertical velocity
    pub const TILT_PER_VELOCITY: f32 = 2.0;

    /// Physics defaults (per tick, not per second)
    pub const GRAVITY: f32 = 0.6;
    pub const LIFT: f32 = -12.0;

    /// Obstacle defaults
    pub const PIPE_GAP: f32 = 150.0;
    pub const PIPE_WIDTH: f32 = 50.0;
    pub const PIPE_SPEED: f32 = 2.0;
    pub const PIPE_SPAWN_INTERVAL: u64 = 90;
    /// Minimum distance from the top of the field to the gap
    pub const PIPE_TOP_MARGIN: f32 = 50.0;
    /// Space reserved below the gap (ground + bottom pipe stub)
    pub const PIPE_BOTTOM_RESERVE: f32 = 100.0;

    /// Resume timings (3 seconds at 60 Hz)
    pub const INVINCIBILITY_TICKS: u32 = 180;
    pub const COUNTDOWN_TICKS: u32 = 180;
    /// Nominal refresh rate, only used to turn ticks into displayed seconds
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Default attempt budget for the quiz-gated game
    pub const DEFAULT_ATTEMPTS: u32 = 3;
}
