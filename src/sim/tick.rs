//! Per-tick simulation and the game state machine
//!
//! `tick` runs once per display refresh. `apply_intent` runs whenever input
//! arrives and takes effect immediately; intents the current phase does not
//! accept are ignored.

use super::collision::{has_cleared, hits_obstacle, out_of_bounds};
use super::quiz::Verdict;
use super::state::{FailureCause, GameEvent, GamePhase, World};
use crate::config::RestartPolicy;

/// Discrete player intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Flap,
    Start,
    Restart,
    AnswerYes,
    AnswerNo,
    /// Dismiss wrong-answer feedback and move to the next question
    AcknowledgeWrong,
}

/// Apply an intent. Returns whether the current phase accepted it.
pub fn apply_intent(world: &mut World, intent: Intent) -> bool {
    match (world.phase, intent) {
        (GamePhase::Playing, Intent::Flap) => {
            let lift = world.config.physics.lift;
            world.bird.flap(lift);
            world.emit(GameEvent::Flapped);
        }
        (GamePhase::Start, Intent::Start) => begin_run(world),
        (GamePhase::FinalOver, Intent::Restart) => match world.config.restart_policy {
            RestartPolicy::ReturnToStart => {
                world.reset_run();
                set_phase(world, GamePhase::Start);
            }
            RestartPolicy::PlayImmediately => begin_run(world),
        },
        (GamePhase::Question, Intent::AnswerYes) => answer(world, true),
        (GamePhase::Question, Intent::AnswerNo) => answer(world, false),
        (GamePhase::WrongAnswer, Intent::AcknowledgeWrong) => show_next_question(world),
        _ => return false,
    }
    true
}

/// Advance the world by one tick
pub fn tick(world: &mut World) {
    match world.phase {
        // Waiting on input
        GamePhase::Start | GamePhase::Question | GamePhase::WrongAnswer => {}

        // Entering FinalOver already latches; this only guards a world
        // whose phase was set without going through record_failure
        GamePhase::FinalOver => latch_final_score(world),

        GamePhase::Over => show_next_question(world),

        GamePhase::Countdown => {
            world.bird.flash = !world.bird.flash;
            world.countdown = world.countdown.saturating_sub(1);
            if world.countdown == 0 {
                set_phase(world, GamePhase::Playing);
                world.emit(GameEvent::Resumed);
            }
        }

        GamePhase::Playing => {
            if let Some(cause) = step_physics(world) {
                on_play_failure(world, cause);
            }
        }
    }
}

/// One tick of live play: bird, spawning, pipes, scoring and collisions.
///
/// Returns the failure detected this tick, if any. The whole tick always
/// runs, so a pipe cleared on the same tick as a crash still scores.
fn step_physics(world: &mut World) -> Option<FailureCause> {
    let gravity = world.config.physics.gravity;
    let spawn_interval = world.config.physics.spawn_interval;

    world.bird.integrate(gravity);
    world.bird.tick_invincibility();

    let mut failure = out_of_bounds(&world.bird).then_some(FailureCause::Boundary);

    world.frame += 1;
    if world.frame.is_multiple_of(spawn_interval) {
        world.spawn_obstacle();
    }

    // Reverse order so removal never skips an entry
    let bird = &world.bird;
    let mut newly_passed = 0;
    for i in (0..world.obstacles.len()).rev() {
        let obstacle = &mut world.obstacles[i];
        obstacle.advance();

        if !obstacle.passed && has_cleared(bird, obstacle) {
            obstacle.passed = true;
            newly_passed += 1;
        }

        if hits_obstacle(bird, obstacle) {
            failure.get_or_insert(FailureCause::Collision);
        }

        if obstacle.is_offscreen() {
            world.obstacles.remove(i);
        }
    }

    for _ in 0..newly_passed {
        world.score += 1;
        let score = world.score;
        world.emit(GameEvent::ObstaclePassed { score });
    }

    failure
}

fn set_phase(world: &mut World, phase: GamePhase) {
    if world.phase != phase {
        log::debug!("Phase {:?} -> {:?}", world.phase, phase);
        world.phase = phase;
    }
}

/// Fresh run straight into play, with the first pipe already on screen
fn begin_run(world: &mut World) {
    world.reset_run();
    set_phase(world, GamePhase::Playing);
    world.spawn_obstacle();
    log::info!("Run started (seed {})", world.seed);
}

/// Spend an attempt; ends the run when none are left.
///
/// Returns whether the run continues.
fn record_failure(world: &mut World, cause: FailureCause) -> bool {
    let alive = world.consume_attempt();
    let attempts_left = world.attempts;
    world.emit(GameEvent::Failure {
        cause,
        attempts_left,
    });
    if !alive {
        set_phase(world, GamePhase::FinalOver);
        latch_final_score(world);
    }
    alive
}

fn on_play_failure(world: &mut World, cause: FailureCause) {
    if !record_failure(world, cause) {
        return;
    }
    if world.config.has_quiz_gate && !world.quiz.is_empty() {
        set_phase(world, GamePhase::Over);
    } else {
        resume(world);
    }
}

fn answer(world: &mut World, answer: bool) {
    match world.quiz.evaluate(answer) {
        Verdict::Pass => {
            world.questions_answered += 1;
            world.emit(GameEvent::AnswerCorrect);
            resume(world);
        }
        Verdict::Fail { feedback } => {
            world.emit(GameEvent::AnswerWrong);
            if record_failure(world, FailureCause::WrongAnswer) {
                world.feedback = Some(feedback);
                set_phase(world, GamePhase::WrongAnswer);
            }
        }
    }
}

fn show_next_question(world: &mut World) {
    world.quiz.advance();
    world.feedback = None;
    let index = world.quiz.cursor();
    world.emit(GameEvent::QuestionShown { index });
    set_phase(world, GamePhase::Question);
}

fn resume(world: &mut World) {
    world.arm_resume();
    set_phase(world, GamePhase::Countdown);
}

/// Emit the final score once per entry into `FinalOver`
fn latch_final_score(world: &mut World) {
    if world.final_reported {
        return;
    }
    world.final_reported = true;
    let score = world.score;
    log::info!("Final score: {}", score);
    world.emit(GameEvent::FinalScore { score });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AttemptBudget, GameConfig};
    use crate::consts::*;
    use crate::sim::quiz::{Question, QuizGate};
    use crate::sim::state::Obstacle;
    use proptest::prelude::*;

    /// Pool whose answers alternate yes/no starting at index 0
    fn alternating_quiz() -> QuizGate {
        QuizGate::new(
            (0..4)
                .map(|i| Question::new(format!("q{}?", i), i % 2 == 0))
                .collect(),
        )
    }

    fn world_with(config: GameConfig) -> World {
        World::new(12345, config, alternating_quiz())
    }

    fn playing_world(config: GameConfig) -> World {
        let mut world = world_with(config);
        assert!(apply_intent(&mut world, Intent::Start));
        world.drain_events();
        world
    }

    /// Drive the bird into the ceiling until the run leaves `Playing`
    fn crash(world: &mut World) {
        world.bird.pos.y = -1.0;
        world.bird.velocity = -5.0;
        tick(world);
    }

    /// Correct answer for the question currently shown
    fn correct_intent(world: &World) -> Intent {
        match world.quiz.current() {
            Some(q) if q.answer => Intent::AnswerYes,
            _ => Intent::AnswerNo,
        }
    }

    fn wrong_intent(world: &World) -> Intent {
        match correct_intent(world) {
            Intent::AnswerYes => Intent::AnswerNo,
            _ => Intent::AnswerYes,
        }
    }

    #[test]
    fn test_start_resets_and_spawns_first_pipe() {
        let mut world = world_with(GameConfig::default());
        assert_eq!(world.phase, GamePhase::Start);

        tick(&mut world);
        assert_eq!(world.phase, GamePhase::Start);
        assert_eq!(world.frame, 0);

        assert!(apply_intent(&mut world, Intent::Start));
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.obstacles.len(), 1);
        assert_eq!(world.score, 0);
        assert_eq!(world.attempts, DEFAULT_ATTEMPTS);
    }

    #[test]
    fn test_intents_ignored_outside_their_phase() {
        let mut world = world_with(GameConfig::default());
        assert!(!apply_intent(&mut world, Intent::Flap));
        assert!(!apply_intent(&mut world, Intent::AnswerYes));
        assert!(!apply_intent(&mut world, Intent::AcknowledgeWrong));
        assert!(!apply_intent(&mut world, Intent::Restart));
        assert_eq!(world.phase, GamePhase::Start);

        let mut world = playing_world(GameConfig::default());
        assert!(!apply_intent(&mut world, Intent::Start));
        assert!(!apply_intent(&mut world, Intent::AnswerNo));
        assert_eq!(world.phase, GamePhase::Playing);
    }

    #[test]
    fn test_flap_sets_lift() {
        let mut world = playing_world(GameConfig::default());
        assert!(apply_intent(&mut world, Intent::Flap));
        assert!(apply_intent(&mut world, Intent::Flap));
        assert_eq!(world.bird.velocity, LIFT);
        assert_eq!(world.bird.tilt, -BIRD_MAX_TILT);
    }

    #[test]
    fn test_first_tick_physics() {
        let mut world = playing_world(GameConfig::default());
        tick(&mut world);
        assert!((world.bird.pos.y - 300.6).abs() < 1e-4);
        assert!((world.bird.velocity - 0.6).abs() < 1e-6);
        assert!((world.bird.tilt - 1.2).abs() < 1e-6);
        assert_eq!(world.obstacles[0].x, FIELD_WIDTH - PIPE_SPEED);
    }

    #[test]
    fn test_spawn_cadence() {
        let mut world = playing_world(GameConfig::default());
        world.bird.arm_invincibility(u32::MAX);
        for _ in 0..PIPE_SPAWN_INTERVAL - 1 {
            world.bird.pos.y = 300.0;
            world.bird.velocity = 0.0;
            tick(&mut world);
        }
        assert_eq!(world.obstacles.len(), 1);
        world.bird.pos.y = 300.0;
        tick(&mut world);
        assert_eq!(world.obstacles.len(), 2);
        assert_eq!(world.obstacles[1].x, FIELD_WIDTH - PIPE_SPEED);
    }

    #[test]
    fn test_pipe_scores_once_and_is_removed() {
        let mut world = playing_world(GameConfig::default());
        world.bird.arm_invincibility(u32::MAX);
        world.obstacles[0].x = 0.5 - PIPE_WIDTH + PIPE_SPEED;

        world.bird.velocity = 0.0;
        tick(&mut world);
        assert_eq!(world.score, 1);
        assert!(world.obstacles[0].passed);
        assert!(
            world
                .drain_events()
                .contains(&GameEvent::ObstaclePassed { score: 1 })
        );

        for _ in 0..5 {
            world.bird.pos.y = 300.0;
            world.bird.velocity = 0.0;
            tick(&mut world);
        }
        assert_eq!(world.score, 1);
        assert!(world.obstacles.is_empty());
    }

    #[test]
    fn test_removal_keeps_other_pipes() {
        let mut world = playing_world(GameConfig::default());
        world.bird.arm_invincibility(u32::MAX);
        world.obstacles.clear();
        for (id, x) in [(10, -60.0), (11, -55.0), (12, 200.0)] {
            world.obstacles.push(Obstacle {
                id,
                x,
                width: PIPE_WIDTH,
                speed: PIPE_SPEED,
                gap_top: 250.0,
                gap_bottom: 400.0,
                passed: true,
            });
        }
        tick(&mut world);
        let ids: Vec<u32> = world.obstacles.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![12]);
        assert_eq!(world.obstacles[0].x, 198.0);
    }

    #[test]
    fn test_ceiling_failure_opens_quiz() {
        let mut world = playing_world(GameConfig::default());
        crash(&mut world);
        assert_eq!(world.phase, GamePhase::Over);
        assert_eq!(world.attempts, DEFAULT_ATTEMPTS - 1);

        tick(&mut world);
        assert_eq!(world.phase, GamePhase::Question);
        assert_eq!(world.quiz.cursor(), 1);
        let events = world.drain_events();
        assert!(events.contains(&GameEvent::Failure {
            cause: FailureCause::Boundary,
            attempts_left: DEFAULT_ATTEMPTS - 1,
        }));
        assert!(events.contains(&GameEvent::QuestionShown { index: 1 }));
    }

    #[test]
    fn test_collision_failure() {
        let mut world = playing_world(GameConfig::default());
        world.obstacles[0].x = BIRD_X;
        world.obstacles[0].gap_top = 400.0;
        world.obstacles[0].gap_bottom = 550.0;
        tick(&mut world);
        assert_eq!(world.phase, GamePhase::Over);
        assert!(world.drain_events().iter().any(|e| matches!(
            e,
            GameEvent::Failure {
                cause: FailureCause::Collision,
                ..
            }
        )));
    }

    #[test]
    fn test_correct_answer_counts_down_then_plays() {
        let mut world = playing_world(GameConfig::default());
        crash(&mut world);
        tick(&mut world);

        let intent = correct_intent(&world);
        assert!(apply_intent(&mut world, intent));
        assert_eq!(world.phase, GamePhase::Countdown);
        assert_eq!(world.countdown, 180);
        assert_eq!(world.bird.invincible_ticks, 180);
        assert_eq!(world.bird.pos.y, BIRD_START_Y);
        assert_eq!(world.questions_answered, 1);

        for _ in 0..179 {
            assert!(!apply_intent(&mut world, Intent::Flap));
            tick(&mut world);
            assert_eq!(world.phase, GamePhase::Countdown);
        }
        tick(&mut world);
        assert_eq!(world.phase, GamePhase::Playing);
        assert!(world.bird.invincible);
        assert_eq!(world.bird.pos.y, BIRD_START_Y);
    }

    #[test]
    fn test_invincible_resume_ignores_pipes() {
        let mut world = playing_world(GameConfig::default());
        crash(&mut world);
        tick(&mut world);
        let intent = correct_intent(&world);
        apply_intent(&mut world, intent);
        for _ in 0..180 {
            tick(&mut world);
        }
        world.obstacles[0].x = BIRD_X;
        world.obstacles[0].gap_top = 500.0;
        world.obstacles[0].gap_bottom = 520.0;
        tick(&mut world);
        assert_eq!(world.phase, GamePhase::Playing);
    }

    #[test]
    fn test_wrong_answer_shows_feedback_then_next_question() {
        let mut world = playing_world(GameConfig::default());
        crash(&mut world);
        tick(&mut world);

        let intent = wrong_intent(&world);
        assert!(apply_intent(&mut world, intent));
        assert_eq!(world.phase, GamePhase::WrongAnswer);
        assert_eq!(world.attempts, DEFAULT_ATTEMPTS - 2);
        assert_eq!(world.feedback.as_deref(), Some("Wrong! Correct answer: No"));

        tick(&mut world);
        assert_eq!(world.phase, GamePhase::WrongAnswer);

        assert!(apply_intent(&mut world, Intent::AcknowledgeWrong));
        assert_eq!(world.phase, GamePhase::Question);
        assert_eq!(world.quiz.cursor(), 2);
        assert!(world.feedback.is_none());
    }

    #[test]
    fn test_last_wrong_answer_ends_run_and_reports_once() {
        let config = GameConfig {
            attempt_budget: AttemptBudget::Limited(2),
            ..GameConfig::default()
        };
        let mut world = playing_world(config);
        crash(&mut world);
        tick(&mut world);
        assert_eq!(world.attempts, 1);
        world.score = 7;
        world.drain_events();

        let intent = wrong_intent(&world);
        apply_intent(&mut world, intent);
        assert_eq!(world.attempts, 0);
        assert_eq!(world.phase, GamePhase::FinalOver);

        for _ in 0..10 {
            tick(&mut world);
        }
        let finals = world
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::FinalScore { .. }))
            .count();
        assert_eq!(finals, 1);
        assert!(world.final_reported);
    }

    #[test]
    fn test_restart_returns_to_start() {
        let mut world = playing_world(GameConfig::classic());
        crash(&mut world);
        assert_eq!(world.phase, GamePhase::FinalOver);

        assert!(apply_intent(&mut world, Intent::Restart));
        assert_eq!(world.phase, GamePhase::Start);
        assert!(world.obstacles.is_empty());
        assert!(!world.final_reported);
        assert_eq!(world.attempts, 1);
    }

    #[test]
    fn test_restart_can_play_immediately() {
        let config = GameConfig {
            restart_policy: RestartPolicy::PlayImmediately,
            ..GameConfig::classic()
        };
        let mut world = playing_world(config);
        crash(&mut world);
        assert!(apply_intent(&mut world, Intent::Restart));
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.obstacles.len(), 1);
    }

    #[test]
    fn test_final_over_tick_latches_once_when_entered_directly() {
        let mut world = world_with(GameConfig::default());
        world.phase = GamePhase::FinalOver;
        world.score = 3;
        for _ in 0..5 {
            tick(&mut world);
        }
        assert_eq!(world.drain_events(), vec![GameEvent::FinalScore { score: 3 }]);
        assert!(world.final_reported);
    }

    #[test]
    fn test_zero_budget_ends_on_first_failure() {
        let config = GameConfig {
            attempt_budget: AttemptBudget::Limited(0),
            ..GameConfig::default()
        };
        let mut world = playing_world(config);
        assert_eq!(world.attempts, 1);
        tick(&mut world);
        assert_eq!(world.phase, GamePhase::Playing);

        crash(&mut world);
        assert_eq!(world.attempts, 0);
        assert_eq!(world.phase, GamePhase::FinalOver);
    }

    #[test]
    fn test_no_quiz_gate_resumes_with_countdown() {
        let config = GameConfig {
            has_quiz_gate: false,
            ..GameConfig::default()
        };
        let mut world = playing_world(config);
        crash(&mut world);
        assert_eq!(world.phase, GamePhase::Countdown);
        assert_eq!(world.attempts, DEFAULT_ATTEMPTS - 1);
    }

    #[test]
    fn test_unlimited_budget_never_ends() {
        let mut world = playing_world(GameConfig::endless_quiz());
        for _ in 0..20 {
            crash(&mut world);
            tick(&mut world);
            assert_eq!(world.phase, GamePhase::Question);
            let intent = wrong_intent(&world);
            apply_intent(&mut world, intent);
            assert_eq!(world.phase, GamePhase::WrongAnswer);
            apply_intent(&mut world, Intent::AcknowledgeWrong);
            let intent = correct_intent(&world);
            apply_intent(&mut world, intent);
            for _ in 0..COUNTDOWN_TICKS {
                tick(&mut world);
            }
            assert_eq!(world.phase, GamePhase::Playing);
        }
    }

    #[test]
    fn test_determinism() {
        let mut a = playing_world(GameConfig::default());
        let mut b = playing_world(GameConfig::default());
        for i in 0..600 {
            if i % 20 == 0 {
                apply_intent(&mut a, Intent::Flap);
                apply_intent(&mut b, Intent::Flap);
            }
            tick(&mut a);
            tick(&mut b);
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.score, b.score);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.bird.pos, b.bird.pos);
    }

    fn any_intent() -> impl Strategy<Value = Option<Intent>> {
        prop_oneof![
            3 => Just(None),
            2 => Just(Some(Intent::Flap)),
            1 => Just(Some(Intent::Start)),
            1 => Just(Some(Intent::Restart)),
            1 => Just(Some(Intent::AnswerYes)),
            1 => Just(Some(Intent::AnswerNo)),
            1 => Just(Some(Intent::AcknowledgeWrong)),
        ]
    }

    proptest! {
        #[test]
        fn prop_counters_stay_in_bounds(
            seed in any::<u64>(),
            inputs in prop::collection::vec(any_intent(), 1..1500),
        ) {
            let mut world = World::new(seed, GameConfig::default(), alternating_quiz());
            let mut last_score = 0;
            let mut last_phase = world.phase;
            for input in inputs {
                if let Some(intent) = input {
                    apply_intent(&mut world, intent);
                }
                tick(&mut world);

                let reset = world.drain_events().contains(&GameEvent::Reset);
                if !reset {
                    prop_assert!(world.score >= last_score);
                    prop_assert!(world.score <= last_score + 1);
                }
                prop_assert!(world.attempts <= DEFAULT_ATTEMPTS);
                if world.attempts == 0 {
                    prop_assert_eq!(world.phase, GamePhase::FinalOver);
                }
                if last_phase == GamePhase::FinalOver && !reset {
                    prop_assert_eq!(world.phase, GamePhase::FinalOver);
                }
                last_score = world.score;
                last_phase = world.phase;
            }
        }
    }
}
