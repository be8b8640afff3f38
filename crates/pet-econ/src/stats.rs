//! Stat decay, derived health, XP and coins.

use std::collections::BTreeMap;

use pet_core::{need_xp, DecayConfig, PetState, StatKind, Stats};
use rand::Rng;
use tracing::{debug, info};

use crate::events::{self, RandomEvent};

/// A level reached by [`add_xp`], with the coins granted for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    pub bonus_coins: u64,
}

/// What a single [`tick`] did.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    /// Real seconds consumed after clamping.
    pub seconds: f64,
    /// Simulated minutes applied.
    pub minutes: f64,
    /// Needs below the low threshold after decay.
    pub low_needs: usize,
    pub event: Option<RandomEvent>,
    /// Health has bottomed out (<= 1).
    pub critical: bool,
}

/// Clamp real elapsed seconds into `[0, max_tick_seconds]`.
/// Negative, NaN or infinite input from clock skew counts as zero.
pub fn clamp_elapsed(cfg: &DecayConfig, seconds: f64) -> f64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0.0;
    }
    seconds.min(cfg.max_tick_seconds)
}

/// Advance the pet by `elapsed_seconds` of real time.
///
/// Elapsed time is clamped, converted to simulated minutes and applied by
/// [`advance_minutes`]. Afterwards one random event may fire with
/// probability `event_chance_per_second * seconds`.
pub fn tick<R: Rng + ?Sized>(
    state: &mut PetState,
    cfg: &DecayConfig,
    elapsed_seconds: f64,
    rng: &mut R,
) -> TickReport {
    let seconds = clamp_elapsed(cfg, elapsed_seconds);
    if seconds == 0.0 {
        return TickReport {
            seconds,
            minutes: 0.0,
            low_needs: state.stats.low_needs(cfg.low_need_threshold),
            event: None,
            critical: state.stats.get(StatKind::Health) <= 1.0,
        };
    }

    let minutes = seconds * cfg.sim_minutes_per_second;
    let low_needs = advance_minutes(state, cfg, minutes);

    let event = events::roll(rng, cfg.event_chance_per_second * seconds);
    if let Some(ev) = event {
        events::apply(state, ev);
    }

    let health = state.stats.get(StatKind::Health);
    debug!(seconds, minutes, low_needs, health, "tick");
    TickReport {
        seconds,
        minutes,
        low_needs,
        event,
        critical: health <= 1.0,
    }
}

/// Apply `minutes` of simulated time: age, linear need decay, then the
/// health drift derived from how many needs are low. Returns the low count.
pub fn advance_minutes(state: &mut PetState, cfg: &DecayConfig, minutes: f64) -> usize {
    if !minutes.is_finite() || minutes <= 0.0 {
        return state.stats.low_needs(cfg.low_need_threshold);
    }
    state.age_minutes += minutes;

    let decay = minutes * cfg.base_rate_per_minute;
    let rates = [
        (StatKind::Hunger, 1.0),
        (StatKind::Thirst, cfg.thirst_factor),
        (StatKind::Energy, cfg.energy_factor),
        (StatKind::Hygiene, cfg.hygiene_factor),
        (StatKind::Happy, cfg.happy_factor),
    ];
    for (kind, factor) in rates {
        state.stats.add(kind, -decay * factor);
    }

    let low = state.stats.low_needs(cfg.low_need_threshold);
    let per_minute = if low == 0 {
        cfg.health_regen_per_minute
    } else {
        -cfg.health_penalty_per_low_need * low as f64
    };
    state.stats.add(StatKind::Health, per_minute * minutes);
    low
}

/// Add XP, carrying any overflow into level-ups. Each new level grants
/// `10 * level` coins.
pub fn add_xp(state: &mut PetState, amount: u64) -> Vec<LevelUp> {
    state.xp = state.xp.saturating_add(amount);
    let mut ups = Vec::new();
    while state.level < u32::MAX && state.xp >= need_xp(state.level) {
        state.xp -= need_xp(state.level);
        state.level += 1;
        let bonus_coins = 10 * u64::from(state.level);
        earn(state, bonus_coins);
        info!(level = state.level, bonus_coins, "level up");
        ups.push(LevelUp {
            level: state.level,
            bonus_coins,
        });
    }
    ups
}

/// Credit coins, saturating at the top of the range.
pub fn earn(state: &mut PetState, amount: u64) {
    state.coins = state.coins.saturating_add(amount);
}

/// Add each delta to its stat and clamp.
pub fn apply_effects(stats: &mut Stats, effects: &[(StatKind, f64)]) {
    for (kind, delta) in effects {
        stats.add(*kind, *delta);
    }
}

/// Like [`apply_effects`] with stat names as keys. Unknown names are
/// skipped. Returns how many deltas were applied.
pub fn apply_named_effects(stats: &mut Stats, effects: &BTreeMap<String, f64>) -> usize {
    let mut applied = 0;
    for (key, delta) in effects {
        match StatKind::from_key(key) {
            Some(kind) => {
                stats.add(kind, *delta);
                applied += 1;
            }
            None => debug!(key = key.as_str(), "ignoring unknown stat"),
        }
    }
    applied
}
