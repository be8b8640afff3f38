//! Tuning parameters. Every field has a default matching the shipped game
//! balance, so a partial config file only overrides what it names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key the pet record is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "tartaruguinha_save";

/// Stat decay and health rules applied on every tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Simulated minutes that pass per real second.
    pub sim_minutes_per_second: f64,
    /// Upper bound on real seconds consumed by a single tick.
    pub max_tick_seconds: f64,
    /// Hunger loss per simulated minute; other needs scale from it.
    pub base_rate_per_minute: f64,
    pub thirst_factor: f64,
    pub energy_factor: f64,
    pub hygiene_factor: f64,
    pub happy_factor: f64,
    /// Needs strictly below this value count against health.
    pub low_need_threshold: f64,
    /// Health gained per simulated minute when no need is low.
    pub health_regen_per_minute: f64,
    /// Health lost per simulated minute for each low need.
    pub health_penalty_per_low_need: f64,
    /// Chance of a random event per real second of tick time.
    pub event_chance_per_second: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            sim_minutes_per_second: 2.0,
            max_tick_seconds: 1.2,
            base_rate_per_minute: 0.06,
            thirst_factor: 1.10,
            energy_factor: 0.70,
            hygiene_factor: 0.50,
            happy_factor: 0.40,
            low_need_threshold: 25.0,
            health_regen_per_minute: 0.20,
            health_penalty_per_low_need: 0.15,
            event_chance_per_second: 0.003,
        }
    }
}

/// Periods of the cooperative timers, in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub tick_ms: u64,
    pub autosave_ms: u64,
    pub nap_step_ms: u64,
    pub nap_steps: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1_000,
            autosave_ms: 30_000,
            nap_step_ms: 600,
            nap_steps: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinigameConfig {
    /// Session length in spawner seconds.
    pub duration_secs: u32,
    pub spawn_every_ms: u64,
    /// How long a target stays clickable.
    pub target_lifetime_ms: u64,
}

impl Default for MinigameConfig {
    fn default() -> Self {
        Self {
            duration_secs: 30,
            spawn_every_ms: 1_000,
            target_lifetime_ms: 1_200,
        }
    }
}

/// Top-level configuration for a pet controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetConfig {
    pub decay: DecayConfig,
    pub timing: TimingConfig,
    pub minigame: MinigameConfig,
    /// Seed for the event RNG. `None` seeds from the clock.
    pub rng_seed: Option<u64>,
    pub storage_key: String,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            decay: DecayConfig::default(),
            timing: TimingConfig::default(),
            minigame: MinigameConfig::default(),
            rng_seed: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A timer period or count is zero.
    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),
    /// A rate is negative or not finite.
    #[error("{0} must be finite and non-negative")]
    InvalidRate(&'static str),
    #[error("storage key must not be empty")]
    EmptyStorageKey,
}

/// Validate a configuration before handing it to a controller.
pub fn validate_config(cfg: &PetConfig) -> Result<(), ConfigError> {
    let d = &cfg.decay;
    let rates = [
        ("decay.sim_minutes_per_second", d.sim_minutes_per_second),
        ("decay.max_tick_seconds", d.max_tick_seconds),
        ("decay.base_rate_per_minute", d.base_rate_per_minute),
        ("decay.thirst_factor", d.thirst_factor),
        ("decay.energy_factor", d.energy_factor),
        ("decay.hygiene_factor", d.hygiene_factor),
        ("decay.happy_factor", d.happy_factor),
        ("decay.low_need_threshold", d.low_need_threshold),
        ("decay.health_regen_per_minute", d.health_regen_per_minute),
        ("decay.health_penalty_per_low_need", d.health_penalty_per_low_need),
        ("decay.event_chance_per_second", d.event_chance_per_second),
    ];
    for (name, value) in rates {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidRate(name));
        }
    }
    let periods = [
        ("timing.tick_ms", cfg.timing.tick_ms),
        ("timing.autosave_ms", cfg.timing.autosave_ms),
        ("timing.nap_step_ms", cfg.timing.nap_step_ms),
        ("minigame.spawn_every_ms", cfg.minigame.spawn_every_ms),
        ("minigame.target_lifetime_ms", cfg.minigame.target_lifetime_ms),
    ];
    for (name, value) in periods {
        if value == 0 {
            return Err(ConfigError::NonPositive(name));
        }
    }
    if cfg.timing.nap_steps == 0 {
        return Err(ConfigError::NonPositive("timing.nap_steps"));
    }
    if cfg.minigame.duration_secs == 0 {
        return Err(ConfigError::NonPositive("minigame.duration_secs"));
    }
    if cfg.storage_key.trim().is_empty() {
        return Err(ConfigError::EmptyStorageKey);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&PetConfig::default()), Ok(()));
    }

    #[test]
    fn default_tuning_matches_the_game() {
        let cfg = PetConfig::default();
        assert_eq!(cfg.decay.sim_minutes_per_second, 2.0);
        assert_eq!(cfg.decay.max_tick_seconds, 1.2);
        assert_eq!(cfg.decay.base_rate_per_minute, 0.06);
        assert_eq!(cfg.decay.low_need_threshold, 25.0);
        assert_eq!(cfg.decay.event_chance_per_second, 0.003);
        assert_eq!(cfg.timing.autosave_ms, 30_000);
        assert_eq!(cfg.timing.nap_steps, 10);
        assert_eq!(cfg.minigame.duration_secs, 30);
        assert_eq!(cfg.minigame.target_lifetime_ms, 1_200);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: PetConfig =
            serde_json::from_str(r#"{"decay":{"base_rate_per_minute":0.1},"rng_seed":7}"#).unwrap();
        assert_eq!(cfg.decay.base_rate_per_minute, 0.1);
        assert_eq!(cfg.decay.thirst_factor, 1.10);
        assert_eq!(cfg.timing, TimingConfig::default());
        assert_eq!(cfg.rng_seed, Some(7));
        assert_eq!(cfg.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn rejects_zero_periods_and_bad_rates() {
        let mut cfg = PetConfig::default();
        cfg.timing.tick_ms = 0;
        assert_eq!(
            validate_config(&cfg),
            Err(ConfigError::NonPositive("timing.tick_ms"))
        );

        let mut cfg = PetConfig::default();
        cfg.decay.event_chance_per_second = f64::NAN;
        assert!(matches!(
            validate_config(&cfg),
            Err(ConfigError::InvalidRate(_))
        ));

        let mut cfg = PetConfig::default();
        cfg.storage_key = "  ".into();
        assert_eq!(validate_config(&cfg), Err(ConfigError::EmptyStorageKey));
    }
}
