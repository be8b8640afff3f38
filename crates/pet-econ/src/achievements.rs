//! Badges unlocked from the current state. Each one is granted at most once.

use pet_core::{PetState, StatKind, CATALOG};
use tracing::info;

pub struct AchievementRule {
    pub name: &'static str,
    pub description: &'static str,
    check: fn(&PetState) -> bool,
}

impl AchievementRule {
    pub fn is_met(&self, state: &PetState) -> bool {
        (self.check)(state)
    }
}

pub const RULES: &[AchievementRule] = &[
    AchievementRule {
        name: "Felicidade máxima",
        description: "Felicidade em 95 ou mais",
        check: |s| s.stats.get(StatKind::Happy) >= 95.0,
    },
    AchievementRule {
        name: "Coração forte",
        description: "Saúde em 95 ou mais",
        check: |s| s.stats.get(StatKind::Health) >= 95.0,
    },
    AchievementRule {
        name: "Cofrinho recheado",
        description: "Juntar 200 moedas",
        check: |s| s.coins >= 200,
    },
    AchievementRule {
        name: "Colecionadora",
        description: "Ter ao menos um de cada item da loja",
        check: |s| CATALOG.iter().all(|item| s.inventory.qty(item.name) >= 1),
    },
];

/// Names whose rule currently holds but which are not unlocked yet.
pub fn pending_unlocks(state: &PetState) -> Vec<&'static str> {
    RULES
        .iter()
        .filter(|rule| !state.achievements.contains(rule.name) && rule.is_met(state))
        .map(|rule| rule.name)
        .collect()
}

/// Unlock every pending achievement and return the new names in rule order.
pub fn evaluate(state: &mut PetState) -> Vec<&'static str> {
    let unlocked = pending_unlocks(state);
    for name in &unlocked {
        state.achievements.unlock(name);
        info!(achievement = *name, "achievement unlocked");
    }
    unlocked
}
