//! Per-refresh driver
//!
//! Owns the world and its collaborators. The platform calls `handle` for each
//! input intent and `step` once per display refresh, forever.

use crate::highscores::HighScores;
use crate::platform::analytics::{Analytics, AnalyticsEvent, report_quietly};
use crate::renderer::PresentationSurface;
use crate::sim::{GameEvent, Intent, World, apply_intent, tick};
use crate::view::render_view;

fn no_clock() -> f64 {
    0.0
}

/// The game loop body, independent of any browser API
pub struct GameDriver<S: PresentationSurface, A: Analytics> {
    world: World,
    surface: S,
    analytics: A,
    high_scores: HighScores,
    /// Wall clock (ms) for high score timestamps only
    clock: fn() -> f64,
}

impl<S: PresentationSurface, A: Analytics> GameDriver<S, A> {
    pub fn new(world: World, surface: S, analytics: A) -> Self {
        Self {
            world,
            surface,
            analytics,
            high_scores: HighScores::new(),
            clock: no_clock,
        }
    }

    pub fn with_high_scores(mut self, high_scores: HighScores) -> Self {
        self.high_scores = high_scores;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> f64) -> Self {
        self.clock = clock;
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Apply an input intent immediately. Returns whether it was accepted.
    pub fn handle(&mut self, intent: Intent) -> bool {
        let accepted = apply_intent(&mut self.world, intent);
        if !accepted {
            log::trace!("Ignored {:?} in {:?}", intent, self.world.phase);
        }
        accepted
    }

    /// Tick, dispatch side effects, then draw.
    ///
    /// Returns the events since the previous step (including those raised by
    /// intents in between) so the platform can attach sounds to them.
    pub fn step(&mut self) -> Vec<GameEvent> {
        tick(&mut self.world);
        let events = self.world.drain_events();

        for event in &events {
            if let GameEvent::FinalScore { score } = *event {
                self.finish_run(score);
            }
        }

        let mut view = render_view(&self.world);
        view.best_score = self.high_scores.top_score();
        self.surface.present(&self.world, &view);

        events
    }

    fn finish_run(&mut self, score: u32) {
        report_quietly(&mut self.analytics, &AnalyticsEvent::final_score(score));

        let answered = self.world.questions_answered;
        if let Some(rank) = self.high_scores.add_score(score, answered, (self.clock)()) {
            log::info!("New high score #{}: {}", rank, score);
            self.high_scores.save();
        }
    }
}
