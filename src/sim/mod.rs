//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-count based motion only (no wall clock)
//! - Seeded RNG only
//! - Obstacles kept in creation order
//! - No rendering or platform dependencies

pub mod collision;
pub mod quiz;
pub mod state;
pub mod tick;

pub use collision::{Aabb, has_cleared, hits_obstacle, out_of_bounds};
pub use quiz::{DEFAULT_QUESTIONS, Question, QuizGate, Verdict};
pub use state::{Bird, FailureCause, GameEvent, GamePhase, Obstacle, World, gap_top_span};
pub use tick::{Intent, apply_intent, tick};
