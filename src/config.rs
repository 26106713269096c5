//! Game rules and tuning
//!
//! One state machine covers every variant of the game; the differences live
//! here. Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence;

/// How many failures a run can absorb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptBudget {
    /// Failures never end the run
    Unlimited,
    /// Run ends when this many failures have been consumed
    Limited(u32),
}

impl AttemptBudget {
    /// Attempts a fresh run starts with.
    ///
    /// A run always gets at least one; `Limited(0)` plays like `Limited(1)`.
    pub fn initial(&self) -> u32 {
        match self {
            AttemptBudget::Unlimited => u32::MAX,
            AttemptBudget::Limited(n) => (*n).max(1),
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, AttemptBudget::Unlimited)
    }
}

impl Default for AttemptBudget {
    fn default() -> Self {
        AttemptBudget::Limited(DEFAULT_ATTEMPTS)
    }
}

/// Where a restart from the final game-over screen lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RestartPolicy {
    /// Back to the start screen; the player starts the run explicitly
    #[default]
    ReturnToStart,
    /// Straight into a fresh run
    PlayImmediately,
}

/// Per-tick physics and timing constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f32,
    /// Velocity assigned on flap (negative is up)
    pub lift: f32,
    pub pipe_gap: f32,
    pub pipe_width: f32,
    pub pipe_speed: f32,
    /// Ticks between obstacle spawns
    pub spawn_interval: u64,
    pub invincibility_ticks: u32,
    pub countdown_ticks: u32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            lift: LIFT,
            pipe_gap: PIPE_GAP,
            pipe_width: PIPE_WIDTH,
            pipe_speed: PIPE_SPEED,
            spawn_interval: PIPE_SPAWN_INTERVAL,
            invincibility_ticks: INVINCIBILITY_TICKS,
            countdown_ticks: COUNTDOWN_TICKS,
        }
    }
}

/// Complete rule set for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub attempt_budget: AttemptBudget,
    /// Whether a failure goes through a quiz question before resuming
    pub has_quiz_gate: bool,
    pub restart_policy: RestartPolicy,
    pub physics: PhysicsTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            attempt_budget: AttemptBudget::default(),
            has_quiz_gate: true,
            restart_policy: RestartPolicy::default(),
            physics: PhysicsTuning::default(),
        }
    }
}

impl GameConfig {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "flappy_quiz_config";

    /// Plain flappy bird: first failure ends the run
    pub fn classic() -> Self {
        Self {
            attempt_budget: AttemptBudget::Limited(1),
            has_quiz_gate: false,
            ..Self::default()
        }
    }

    /// Quiz-gated with no attempt limit; only correct answers matter
    pub fn endless_quiz() -> Self {
        Self {
            attempt_budget: AttemptBudget::Unlimited,
            ..Self::default()
        }
    }

    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load config from storage, falling back to defaults
    pub fn load() -> Self {
        match persistence::load_json::<Self>(Self::STORAGE_KEY) {
            Some(config) => {
                log::info!("Loaded game config");
                config
            }
            None => {
                log::info!("Using default game config");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if persistence::save_json(Self::STORAGE_KEY, self) {
            log::info!("Game config saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "has_quiz_gate": false }"#).unwrap();
        assert!(!config.has_quiz_gate);
        assert_eq!(config.attempt_budget, AttemptBudget::Limited(DEFAULT_ATTEMPTS));
        assert_eq!(config.physics, PhysicsTuning::default());
    }

    #[test]
    fn test_budget_variants_parse() {
        let config = GameConfig::from_json(
            r#"{ "attempt_budget": "Unlimited", "restart_policy": "PlayImmediately" }"#,
        )
        .unwrap();
        assert!(config.attempt_budget.is_unlimited());
        assert_eq!(config.restart_policy, RestartPolicy::PlayImmediately);

        let config = GameConfig::from_json(r#"{ "attempt_budget": { "Limited": 5 } }"#).unwrap();
        assert_eq!(config.attempt_budget.initial(), 5);
    }

    #[test]
    fn test_zero_budget_still_gets_one_attempt() {
        let config = GameConfig::from_json(r#"{ "attempt_budget": { "Limited": 0 } }"#).unwrap();
        assert_eq!(config.attempt_budget.initial(), 1);
        assert!(!config.attempt_budget.is_unlimited());
    }

    #[test]
    fn test_presets() {
        let classic = GameConfig::classic();
        assert!(!classic.has_quiz_gate);
        assert_eq!(classic.attempt_budget, AttemptBudget::Limited(1));
        assert!(GameConfig::endless_quiz().attempt_budget.is_unlimited());
    }

    #[test]
    fn test_written_config_lists_every_field() {
        let config = GameConfig::endless_quiz();
        let json = config.to_json().unwrap();
        for field in ["attempt_budget", "has_quiz_gate", "restart_policy", "spawn_interval"] {
            assert!(json.contains(field), "missing {} in {}", field, json);
        }
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(GameConfig::from_json("{ not json").is_err());
    }
}
