//! World state and core simulation types
//!
//! Everything a run needs lives in one `World`; the physics step and the
//! state machine borrow it mutably, the view borrows it immutably.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::quiz::QuizGate;
use crate::config::GameConfig;
use crate::consts::*;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle, waiting for an explicit start
    Start,
    /// Timed resume after a correct answer; input is ignored
    Countdown,
    /// Live simulation
    Playing,
    /// A failure happened and the quiz gate is about to open
    Over,
    /// Waiting for a yes/no answer
    Question,
    /// Showing feedback for a wrong answer
    WrongAnswer,
    /// Run ended, waiting for restart
    FinalOver,
}

/// What consumed an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCause {
    /// Bird left the field through the ceiling or the ground
    Boundary,
    /// Bird touched a pipe
    Collision,
    /// Quiz answered incorrectly
    WrongAnswer,
}

/// Things that happened during a tick or an intent, drained by the driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A run was reset (start or restart)
    Reset,
    Flapped,
    ObstacleSpawned { id: u32 },
    ObstaclePassed { score: u32 },
    Failure { cause: FailureCause, attempts_left: u32 },
    QuestionShown { index: usize },
    AnswerCorrect,
    AnswerWrong,
    /// Countdown finished, play resumed
    Resumed,
    /// Emitted once per entry into `FinalOver`
    FinalScore { score: u32 },
}

/// The player-controlled bird
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    /// Top-left corner; x never changes
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (positive is down)
    pub velocity: f32,
    /// Visual tilt in degrees, clamped to [-20, 20]
    pub tilt: f32,
    /// Collision suppression after a resume
    pub invincible: bool,
    pub invincible_ticks: u32,
    /// Blink state; the bird is drawn only when set
    pub flash: bool,
}

impl Default for Bird {
    fn default() -> Self {
        Self {
            pos: Vec2::new(BIRD_X, BIRD_START_Y),
            size: Vec2::splat(BIRD_SIZE),
            velocity: 0.0,
            tilt: 0.0,
            invincible: false,
            invincible_ticks: 0,
            flash: true,
        }
    }
}

impl Bird {
    /// Back to the starting height with no motion and no invincibility
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn flap(&mut self, lift: f32) {
        self.velocity = lift;
        self.tilt = -BIRD_MAX_TILT;
    }

    /// Apply one tick of gravity and update the tilt
    pub fn integrate(&mut self, gravity: f32) {
        self.velocity += gravity;
        self.pos.y += self.velocity;
        self.tilt = (self.velocity * TILT_PER_VELOCITY).clamp(-BIRD_MAX_TILT, BIRD_MAX_TILT);
    }

    pub fn arm_invincibility(&mut self, ticks: u32) {
        self.invincible = ticks > 0;
        self.invincible_ticks = ticks;
    }

    /// Count down the invincibility window, blinking while it lasts
    pub fn tick_invincibility(&mut self) {
        if !self.invincible {
            return;
        }
        self.invincible_ticks = self.invincible_ticks.saturating_sub(1);
        self.flash = !self.flash;
        if self.invincible_ticks == 0 {
            self.invincible = false;
            self.flash = true;
        }
    }

    /// Whether the bird should be drawn this tick
    pub fn visible(&self) -> bool {
        !self.invincible || self.flash
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}

/// A pipe pair with a vertical gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub speed: f32,
    /// Bottom of the upper pipe
    pub gap_top: f32,
    /// Top of the lower pipe
    pub gap_bottom: f32,
    /// Set once the bird has cleared it; scored exactly once
    pub passed: bool,
}

impl Obstacle {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn advance(&mut self) {
        self.x -= self.speed;
    }

    /// Fully past the left edge of the field
    pub fn is_offscreen(&self) -> bool {
        self.right() < 0.0
    }
}

/// Number of distinct gap positions for a given gap height.
///
/// Never zero, so a gap can always be placed even on a field too short for it.
pub fn gap_top_span(gap: f32) -> u32 {
    (FIELD_HEIGHT - gap - PIPE_BOTTOM_RESERVE).floor().max(1.0) as u32
}

/// Complete world state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gap placement RNG
    pub rng: Pcg32,
    /// Rules this world was built with
    pub config: GameConfig,
    pub phase: GamePhase,
    pub bird: Bird,
    /// Active pipes in creation order
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    /// Attempts left; `u32::MAX` stands in for an unlimited budget
    pub attempts: u32,
    /// Ticks of play since the last reset; drives spawn cadence
    pub frame: u64,
    /// Resume countdown (ticks remaining)
    pub countdown: u32,
    pub quiz: QuizGate,
    /// Feedback for the last wrong answer
    pub feedback: Option<String>,
    /// Questions answered correctly this run
    pub questions_answered: u32,
    /// Latch for the one-shot final-score event, cleared on reset
    pub final_reported: bool,
    /// Events since the last drain (not part of the snapshot)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next obstacle ID
    next_id: u32,
}

impl World {
    /// Create a world sitting on the start screen
    pub fn new(seed: u64, config: GameConfig, quiz: QuizGate) -> Self {
        let attempts = config.attempt_budget.initial();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            phase: GamePhase::Start,
            bird: Bird::default(),
            obstacles: Vec::new(),
            score: 0,
            attempts,
            frame: 0,
            countdown: 0,
            quiz,
            feedback: None,
            questions_answered: 0,
            final_reported: false,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new obstacle ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Full reset to a fresh run, without choosing the phase.
    ///
    /// The quiz cursor is kept so questions keep rotating across runs.
    pub fn reset_run(&mut self) {
        self.bird.reset();
        self.obstacles.clear();
        self.frame = 0;
        self.score = 0;
        self.countdown = 0;
        self.attempts = self.config.attempt_budget.initial();
        self.feedback = None;
        self.questions_answered = 0;
        self.final_reported = false;
        self.emit(GameEvent::Reset);
    }

    /// Spawn a pipe at the right edge with a random gap height
    pub fn spawn_obstacle(&mut self) {
        let physics = &self.config.physics;
        let (gap, width, speed) = (physics.pipe_gap, physics.pipe_width, physics.pipe_speed);
        let gap_top = self.rng.random_range(0..gap_top_span(gap)) as f32 + PIPE_TOP_MARGIN;
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle {
            id,
            x: FIELD_WIDTH,
            width,
            speed,
            gap_top,
            gap_bottom: gap_top + gap,
            passed: false,
        });
        self.emit(GameEvent::ObstacleSpawned { id });
    }

    /// Spend one attempt. Returns whether any remain afterwards.
    pub fn consume_attempt(&mut self) -> bool {
        if self.config.attempt_budget.is_unlimited() {
            return true;
        }
        self.attempts = self.attempts.saturating_sub(1);
        self.attempts > 0
    }

    /// Put the bird back at the start with invincibility and the countdown armed
    pub fn arm_resume(&mut self) {
        let (invincible, countdown) = (
            self.config.physics.invincibility_ticks,
            self.config.physics.countdown_ticks,
        );
        self.bird.reset();
        self.bird.arm_invincibility(invincible);
        self.countdown = countdown;
        self.feedback = None;
    }

    /// Whole seconds left on the countdown, for display
    pub fn countdown_seconds(&self) -> u32 {
        self.countdown.div_ceil(TICKS_PER_SECOND)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
