//! View model derived from the world each tick
//!
//! The presentation surface never looks at phases directly; it applies a
//! `ViewModel`: which overlay panel is visible and what text goes on it.

use crate::sim::{GamePhase, World};

/// Overlay panels; at most one is visible at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Start,
    GameOver,
    Question,
    WrongAnswer,
}

impl Panel {
    pub const ALL: [Panel; 4] = [
        Panel::Start,
        Panel::GameOver,
        Panel::Question,
        Panel::WrongAnswer,
    ];

    /// DOM element ID of the panel
    pub fn element_id(&self) -> &'static str {
        match self {
            Panel::Start => "startScreen",
            Panel::GameOver => "gameOverScreen",
            Panel::Question => "questionScreen",
            Panel::WrongAnswer => "wrongAnswerScreen",
        }
    }
}

/// Everything the presentation surface needs beyond the raw world
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub active_panel: Option<Panel>,
    /// Text for the active panel, or the large centered text on the canvas
    pub overlay_text: Option<String>,
    pub score_text: String,
    /// Hidden for an unlimited budget
    pub attempts_text: Option<String>,
    /// Big digit shown during the resume countdown
    pub countdown: Option<u32>,
    /// Best score on record, filled in by the driver
    pub best_score: Option<u32>,
}

/// Map the world to what should be on screen
pub fn render_view(world: &World) -> ViewModel {
    let (active_panel, overlay_text, countdown) = match world.phase {
        GamePhase::Start => (Some(Panel::Start), None, None),
        GamePhase::Countdown => (None, None, Some(world.countdown_seconds())),
        GamePhase::Playing => (None, None, None),
        GamePhase::Over => (None, Some(format!("Score: {}", world.score)), None),
        GamePhase::Question => (
            Some(Panel::Question),
            world.quiz.current().map(|q| q.prompt.clone()),
            None,
        ),
        GamePhase::WrongAnswer => (Some(Panel::WrongAnswer), world.feedback.clone(), None),
        GamePhase::FinalOver => (
            Some(Panel::GameOver),
            Some(format!("Final score: {}", world.score)),
            None,
        ),
    };

    let attempts_text = if world.config.attempt_budget.is_unlimited() {
        None
    } else {
        Some(format!("Attempts: {}", world.attempts))
    };

    ViewModel {
        active_panel,
        overlay_text,
        score_text: format!("Score: {}", world.score),
        attempts_text,
        countdown,
        best_score: None,
    }
}

/// Greedy word wrap.
///
/// Words are added to the current line while `measure` of the line stays
/// within `max_width`. A single word wider than the limit gets its own line.
pub fn wrap_text(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut words = text.split(' ');
    let mut lines = Vec::new();
    let mut current = words.next().unwrap_or_default().to_string();

    for word in words {
        let candidate = format!("{} {}", current, word);
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);
    lines
}
