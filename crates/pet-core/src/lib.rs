#![deny(warnings)]

//! Core domain model for the Tartaruguinha pet simulation.
//!
//! This crate defines the persisted pet state, the static shop catalog and
//! tuning config, with validation helpers that guard the state invariants.

mod catalog;
mod config;
mod rejection;

pub use catalog::{find_item, ShopItem, BALL, CATALOG};
pub use config::{
    validate_config, ConfigError, DecayConfig, MinigameConfig, PetConfig, TimingConfig,
    DEFAULT_STORAGE_KEY,
};
pub use rejection::Rejection;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

pub const STAT_MIN: f64 = 0.0;
pub const STAT_MAX: f64 = 100.0;
/// Longest pet name accepted, in characters.
pub const NAME_MAX_CHARS: usize = 16;

/// Clamp a stat value into `[0, 100]`. NaN collapses to the lower bound.
pub fn clamp_stat(value: f64) -> f64 {
    if value.is_nan() {
        return STAT_MIN;
    }
    value.clamp(STAT_MIN, STAT_MAX)
}

/// XP needed to leave `level`.
pub fn need_xp(level: u32) -> u64 {
    25 + u64::from(level) * 10
}

/// Trim a requested pet name and cut it to [`NAME_MAX_CHARS`].
/// Returns `None` when nothing is left after trimming.
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(NAME_MAX_CHARS).collect())
}

/// The six bounded stats of the pet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Hunger,
    Thirst,
    Energy,
    Hygiene,
    Happy,
    Health,
}

impl StatKind {
    pub const ALL: [StatKind; 6] = [
        StatKind::Hunger,
        StatKind::Thirst,
        StatKind::Energy,
        StatKind::Hygiene,
        StatKind::Happy,
        StatKind::Health,
    ];

    /// Stats that decay on their own. Health is derived from these.
    pub const NEEDS: [StatKind; 5] = [
        StatKind::Hunger,
        StatKind::Thirst,
        StatKind::Energy,
        StatKind::Hygiene,
        StatKind::Happy,
    ];

    /// Serialized key, e.g. `"hunger"`.
    pub fn key(self) -> &'static str {
        match self {
            StatKind::Hunger => "hunger",
            StatKind::Thirst => "thirst",
            StatKind::Energy => "energy",
            StatKind::Hygiene => "hygiene",
            StatKind::Happy => "happy",
            StatKind::Health => "health",
        }
    }

    /// Player-facing label.
    pub fn label(self) -> &'static str {
        match self {
            StatKind::Hunger => "fome",
            StatKind::Thirst => "sede",
            StatKind::Energy => "energia",
            StatKind::Hygiene => "higiene",
            StatKind::Happy => "felicidade",
            StatKind::Health => "saúde",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }
}

/// Bounded pet stats. Every setter clamps into `[0, 100]`, so the fields are
/// private to keep callers from bypassing it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    hunger: f64,
    thirst: f64,
    energy: f64,
    hygiene: f64,
    happy: f64,
    health: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            hunger: 80.0,
            thirst: 80.0,
            energy: 70.0,
            hygiene: 70.0,
            happy: 75.0,
            health: 80.0,
        }
    }
}

impl Stats {
    /// Stats with every value set to `value` (clamped).
    pub fn uniform(value: f64) -> Self {
        let v = clamp_stat(value);
        Self {
            hunger: v,
            thirst: v,
            energy: v,
            hygiene: v,
            happy: v,
            health: v,
        }
    }

    /// Builder-style setter, mostly for fixtures.
    pub fn with(mut self, kind: StatKind, value: f64) -> Self {
        self.set(kind, value);
        self
    }

    /// Current value of `kind`.
    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Hunger => self.hunger,
            StatKind::Thirst => self.thirst,
            StatKind::Energy => self.energy,
            StatKind::Hygiene => self.hygiene,
            StatKind::Happy => self.happy,
            StatKind::Health => self.health,
        }
    }

    /// Set `kind`, clamping into the stat range.
    pub fn set(&mut self, kind: StatKind, value: f64) {
        *self.slot_mut(kind) = clamp_stat(value);
    }

    /// Add `delta` and clamp. Returns the new value.
    pub fn add(&mut self, kind: StatKind, delta: f64) -> f64 {
        let slot = self.slot_mut(kind);
        *slot = clamp_stat(*slot + delta);
        *slot
    }

    /// Number of needs strictly below `threshold`.
    pub fn low_needs(&self, threshold: f64) -> usize {
        StatKind::NEEDS
            .iter()
            .filter(|k| self.get(**k) < threshold)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, f64)> + '_ {
        StatKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    fn slot_mut(&mut self, kind: StatKind) -> &mut f64 {
        match kind {
            StatKind::Hunger => &mut self.hunger,
            StatKind::Thirst => &mut self.thirst,
            StatKind::Energy => &mut self.energy,
            StatKind::Hygiene => &mut self.hygiene,
            StatKind::Happy => &mut self.happy,
            StatKind::Health => &mut self.health,
        }
    }
}

/// Owned quantity of one item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub qty: u32,
}

/// Item name to owned quantity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(BTreeMap<String, ItemStack>);

impl Default for Inventory {
    fn default() -> Self {
        let mut inv = Self::empty();
        for (name, qty) in catalog::STARTING_STOCK {
            inv.0.insert((*name).to_string(), ItemStack { qty: *qty });
        }
        inv
    }
}

impl Inventory {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Units held of `name`; zero when never stocked.
    pub fn qty(&self, name: &str) -> u32 {
        self.0.get(name).map_or(0, |s| s.qty)
    }

    /// Increment (or create) the stack for `name`.
    pub fn add(&mut self, name: &str, n: u32) {
        let stack = self.0.entry(name.to_string()).or_default();
        stack.qty = stack.qty.saturating_add(n);
    }

    /// Remove one unit. Returns `false` and leaves the stack untouched when
    /// nothing is owned.
    pub fn take_one(&mut self, name: &str) -> bool {
        match self.0.get_mut(name) {
            Some(stack) if stack.qty > 0 => {
                stack.qty -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.qty))
    }
}

/// Unlocked achievement names in unlock order, without duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Achievements(Vec<String>);

impl Achievements {
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|a| a == name)
    }

    /// Append `name` unless present. Returns whether it was newly added.
    pub fn unlock(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.0.push(name.to_string());
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What a quest counts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestGoal {
    /// Uses of any of the listed items.
    UseItem { items: Vec<String> },
    /// Petting the turtle.
    Pet,
}

/// What claiming a finished quest pays out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub xp: u64,
    pub coins: u64,
}

/// A daily objective.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub text: String,
    pub goal: QuestGoal,
    /// Target count (> 0).
    pub need: u32,
    /// Current count, never above `need`.
    pub progress: u32,
    /// Set once, when the reward is claimed.
    pub done: bool,
    pub reward: Reward,
}

impl Quest {
    pub fn is_complete(&self) -> bool {
        self.progress >= self.need
    }

    /// Advance progress, saturating at `need`. Done quests do not move.
    /// Returns whether progress changed.
    pub fn advance(&mut self, amount: u32) -> bool {
        if self.done {
            return false;
        }
        let next = self.progress.saturating_add(amount).min(self.need);
        let changed = next != self.progress;
        self.progress = next;
        changed
    }
}

/// The quest set together with the calendar day it was generated for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestBoard {
    pub date: Option<NaiveDate>,
    pub quests: Vec<Quest>,
}

impl QuestBoard {
    pub fn get(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Quest> {
        self.quests.iter_mut().find(|q| q.id == id)
    }
}

/// The complete persisted pet record.
///
/// Missing fields take their defaults when deserializing, so saves written
/// by older builds keep loading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetState {
    pub name: String,
    /// Whether the first-run naming prompt was completed.
    pub seen_name_prompt: bool,
    pub coins: u64,
    pub xp: u64,
    /// Starts at 1 and never decreases.
    pub level: u32,
    /// Simulated minutes lived.
    pub age_minutes: f64,
    pub stats: Stats,
    pub inventory: Inventory,
    pub achievements: Achievements,
    pub quests: QuestBoard,
    /// Unix millis of the last tick.
    pub last_tick_ms: i64,
    pub muted: bool,
}

impl Default for PetState {
    fn default() -> Self {
        Self {
            name: "Tuca".to_string(),
            seen_name_prompt: false,
            coins: 50,
            xp: 0,
            level: 1,
            age_minutes: 0.0,
            stats: Stats::default(),
            inventory: Inventory::default(),
            achievements: Achievements::default(),
            quests: QuestBoard::default(),
            last_tick_ms: 0,
            muted: false,
        }
    }
}

/// Validation errors for a (usually freshly loaded) pet record.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("stat {0} is out of range [0,100] or not finite")]
    StatOutOfRange(&'static str),
    #[error("level must be >= 1")]
    ZeroLevel,
    #[error("xp {xp} must be below {need} at level {level}")]
    XpNotCarried { xp: u64, need: u64, level: u32 },
    #[error("age must be finite and >= 0")]
    InvalidAge,
    #[error("name is longer than 16 characters")]
    NameTooLong,
    #[error("quest {0} has an invalid need or progress")]
    InvalidQuest(String),
    #[error("duplicate quest id: {0}")]
    DuplicateQuest(String),
    #[error("duplicate achievement: {0}")]
    DuplicateAchievement(String),
}

/// Validate every invariant of a pet record.
pub fn validate_state(state: &PetState) -> Result<(), ValidationError> {
    for (kind, value) in state.stats.iter() {
        if !value.is_finite() || !(STAT_MIN..=STAT_MAX).contains(&value) {
            return Err(ValidationError::StatOutOfRange(kind.key()));
        }
    }
    if state.level == 0 {
        return Err(ValidationError::ZeroLevel);
    }
    let need = need_xp(state.level);
    if state.xp >= need {
        return Err(ValidationError::XpNotCarried {
            xp: state.xp,
            need,
            level: state.level,
        });
    }
    if !state.age_minutes.is_finite() || state.age_minutes < 0.0 {
        return Err(ValidationError::InvalidAge);
    }
    if state.name.chars().count() > NAME_MAX_CHARS {
        return Err(ValidationError::NameTooLong);
    }

    let mut ids = BTreeSet::new();
    for q in &state.quests.quests {
        if q.need == 0 || q.progress > q.need {
            return Err(ValidationError::InvalidQuest(q.id.clone()));
        }
        if !ids.insert(q.id.as_str()) {
            return Err(ValidationError::DuplicateQuest(q.id.clone()));
        }
    }

    let mut seen = BTreeSet::new();
    for a in state.achievements.iter() {
        if !seen.insert(a) {
            return Err(ValidationError::DuplicateAchievement(a.to_string()));
        }
    }
    Ok(())
}
