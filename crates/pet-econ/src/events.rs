//! Random events that may fire during a tick.

use pet_core::{PetState, StatKind};
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::stats::{apply_effects, earn};

/// One of the surprises a tick can roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomEvent {
    ShinyCoin,
    FishFriend,
    Overate,
    Rain,
}

impl RandomEvent {
    pub const ALL: [RandomEvent; 4] = [
        RandomEvent::ShinyCoin,
        RandomEvent::FishFriend,
        RandomEvent::Overate,
        RandomEvent::Rain,
    ];

    pub fn text(self) -> &'static str {
        match self {
            RandomEvent::ShinyCoin => "Encontrou uma moeda brilhante!",
            RandomEvent::FishFriend => "Fez amizade com um peixinho. +felicidade",
            RandomEvent::Overate => "Comeu demais e ficou com sede!",
            RandomEvent::Rain => "Tomou chuva — ficou limpinha!",
        }
    }

    fn effects(self) -> &'static [(StatKind, f64)] {
        match self {
            RandomEvent::ShinyCoin => &[],
            RandomEvent::FishFriend => &[(StatKind::Happy, 6.0)],
            RandomEvent::Overate => &[(StatKind::Thirst, -8.0), (StatKind::Hunger, 6.0)],
            RandomEvent::Rain => &[(StatKind::Hygiene, 10.0)],
        }
    }

    fn coins(self) -> u64 {
        match self {
            RandomEvent::ShinyCoin => 3,
            _ => 0,
        }
    }
}

/// Fire with probability `chance`, then pick uniformly from the catalog.
pub fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> Option<RandomEvent> {
    if chance.is_nan() || chance <= 0.0 {
        return None;
    }
    if rng.gen::<f64>() < chance {
        Some(RandomEvent::ALL[rng.gen_range(0..RandomEvent::ALL.len())])
    } else {
        None
    }
}

pub fn apply(state: &mut PetState, event: RandomEvent) {
    apply_effects(&mut state.stats, event.effects());
    earn(state, event.coins());
    info!(?event, "random event");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn event_texts_are_player_facing() {
        assert_eq!(RandomEvent::ShinyCoin.text(), "Encontrou uma moeda brilhante!");
        assert_eq!(RandomEvent::Rain.text(), "Tomou chuva — ficou limpinha!");
    }

    #[test]
    fn zero_chance_never_fires() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        assert!((0..1_000).all(|_| roll(&mut rng, 0.0).is_none()));
        assert!(roll(&mut rng, f64::NAN).is_none());
    }

    #[test]
    fn selection_covers_the_whole_catalog() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut seen = [0usize; 4];
        for _ in 0..4_000 {
            let ev = roll(&mut rng, 1.0).unwrap();
            let idx = RandomEvent::ALL.iter().position(|e| *e == ev).unwrap();
            seen[idx] += 1;
        }
        // Uniform: each bucket near 1000.
        assert!(seen.iter().all(|n| (800..1200).contains(n)), "{seen:?}");
    }

    #[test]
    fn events_apply_their_effects() {
        let mut state = PetState::default();
        apply(&mut state, RandomEvent::ShinyCoin);
        assert_eq!(state.coins, 53);

        apply(&mut state, RandomEvent::Overate);
        assert_eq!(state.stats.get(StatKind::Thirst), 72.0);
        assert_eq!(state.stats.get(StatKind::Hunger), 86.0);

        apply(&mut state, RandomEvent::Rain);
        assert_eq!(state.stats.get(StatKind::Hygiene), 80.0);
    }
}
