//! Read-only view handed to renderers, with the derived display fields.

use std::collections::BTreeMap;

use pet_core::{need_xp, PetState, ShopItem, StatKind, Stats, CATALOG};
use pet_econ::achievements::RULES;
use serde::Serialize;

use crate::minigame::MinigameView;
use crate::notice::{LogEntry, Notice};

/// Below this a stat is in danger and counts against the mood.
const LOW: f64 = 30.0;
const WARN: f64 = 60.0;
const CHEERFUL: f64 = 80.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Sad,
    Neutral,
    Happy,
}

/// Colour band of a stat bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatBand {
    Ok,
    Warn,
    Danger,
}

pub fn stat_band(value: f64) -> StatBand {
    if value < LOW {
        StatBand::Danger
    } else if value < WARN {
        StatBand::Warn
    } else {
        StatBand::Ok
    }
}

/// Sad with two or more needs (health included) in danger or when unhappy,
/// happy when cheerful, neutral otherwise.
pub fn mood(stats: &Stats) -> Mood {
    let low = [
        StatKind::Hunger,
        StatKind::Thirst,
        StatKind::Energy,
        StatKind::Hygiene,
        StatKind::Health,
    ]
    .into_iter()
    .filter(|k| stats.get(*k) < LOW)
    .count();
    let happy = stats.get(StatKind::Happy);
    if low >= 2 || happy < LOW {
        Mood::Sad
    } else if happy > CHEERFUL {
        Mood::Happy
    } else {
        Mood::Neutral
    }
}

/// Age as whole days and hours, e.g. `"2d 5h"`.
pub fn age_label(age_minutes: f64) -> String {
    let total_hours = (age_minutes.max(0.0) / 60.0).floor() as u64;
    format!("{}d {}h", total_hours / 24, total_hours % 24)
}

/// Simulated clock `"HH:MM"` and whether it is daytime (06:00 to 18:59).
pub fn time_of_day(age_minutes: f64) -> (String, bool) {
    let minute_of_day = (age_minutes.max(0.0).floor() as u64) % (24 * 60);
    let (h, m) = (minute_of_day / 60, minute_of_day % 60);
    (format!("{h:02}:{m:02}"), (6..=18).contains(&h))
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShopEntry {
    pub item: &'static ShopItem,
    pub effects: String,
    pub owned: u32,
    pub affordable: bool,
}

/// A badge as the trophy shelf shows it, locked or not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AchievementEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PetSnapshot {
    pub state: PetState,
    pub need_xp: u64,
    pub age_label: String,
    pub clock_label: String,
    pub is_day: bool,
    pub mood: Mood,
    pub bands: BTreeMap<StatKind, StatBand>,
    pub sick: bool,
    pub asleep: bool,
    pub needs_name: bool,
    pub minigame: Option<MinigameView>,
    pub notice: Option<Notice>,
    pub log: Vec<LogEntry>,
    pub shop: Vec<ShopEntry>,
    pub achievements: Vec<AchievementEntry>,
}

/// Runtime flags the state alone cannot tell.
#[derive(Clone, Debug, Default)]
pub struct Extras {
    pub asleep: bool,
    pub needs_name: bool,
    pub minigame: Option<MinigameView>,
    pub notice: Option<Notice>,
    pub log: Vec<LogEntry>,
}

impl PetSnapshot {
    pub fn build(state: &PetState, extras: Extras) -> Self {
        let (clock_label, is_day) = time_of_day(state.age_minutes);
        let shop = CATALOG
            .iter()
            .map(|item| ShopEntry {
                item,
                effects: item.describe_effects(),
                owned: state.inventory.qty(item.name),
                affordable: state.coins >= item.price,
            })
            .collect();
        let achievements = RULES
            .iter()
            .map(|rule| AchievementEntry {
                name: rule.name,
                description: rule.description,
                unlocked: state.achievements.contains(rule.name),
            })
            .collect();
        Self {
            need_xp: need_xp(state.level),
            age_label: age_label(state.age_minutes),
            clock_label,
            is_day,
            mood: mood(&state.stats),
            bands: state.stats.iter().map(|(k, v)| (k, stat_band(v))).collect(),
            sick: state.stats.get(StatKind::Health) <= 1.0,
            asleep: extras.asleep,
            needs_name: extras.needs_name,
            minigame: extras.minigame,
            notice: extras.notice,
            log: extras.log,
            shop,
            achievements,
            state: state.clone(),
        }
    }
}
