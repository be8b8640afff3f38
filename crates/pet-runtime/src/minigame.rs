//! Ladybug-catching mini-game.
//!
//! A session lives only while the game runs and is dropped when it ends;
//! only its rewards reach the pet.

use pet_core::{MinigameConfig, PetState, Rejection, StatKind};
use pet_econ::{add_xp, apply_effects, earn, LevelUp};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

const HIT_EFFECTS: &[(StatKind, f64)] = &[(StatKind::Happy, 1.0)];
const END_EFFECTS: &[(StatKind, f64)] = &[(StatKind::Energy, -10.0)];
const END_XP: u64 = 5;

/// A clickable target. Position is a fraction of the arena size.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Target {
    /// Unique within a session; what `MinigameHit` names.
    pub id: u32,
    /// Horizontal position, 0 at the left edge.
    pub x: f32,
    /// Vertical position, 0 at the top edge.
    pub y: f32,
    /// The target can no longer be hit at or after this instant.
    pub expires_at_ms: i64,
}

/// What the renderer needs to draw a running session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MinigameView {
    pub score: u32,
    pub remaining_secs: u32,
    pub targets: Vec<Target>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecondOutcome {
    Running,
    Finished { score: u32 },
}

#[derive(Clone, Debug)]
pub struct MinigameSession {
    score: u32,
    remaining_secs: u32,
    targets: Vec<Target>,
    next_id: u32,
    lifetime_ms: i64,
}

impl MinigameSession {
    pub fn new(cfg: &MinigameConfig) -> Self {
        Self {
            score: 0,
            remaining_secs: cfg.duration_secs,
            targets: Vec::new(),
            next_id: 1,
            lifetime_ms: i64::try_from(cfg.target_lifetime_ms).unwrap_or(i64::MAX),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Drop targets whose window has closed. Returns how many went.
    pub fn expire(&mut self, now_ms: i64) -> usize {
        let before = self.targets.len();
        self.targets.retain(|t| t.expires_at_ms > now_ms);
        before - self.targets.len()
    }

    /// One spawner second: count down, spawn a target, and finish the
    /// session when time runs out.
    pub fn on_second<R: Rng + ?Sized>(&mut self, now_ms: i64, rng: &mut R) -> SecondOutcome {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.expire(now_ms);
        let target = Target {
            id: self.next_id,
            x: rng.gen_range(0.0..1.0),
            y: rng.gen_range(0.0..1.0),
            expires_at_ms: now_ms.saturating_add(self.lifetime_ms),
        };
        self.next_id = self.next_id.wrapping_add(1);
        debug!(target = target.id, remaining = self.remaining_secs, "target spawned");
        self.targets.push(target);

        if self.remaining_secs == 0 {
            self.targets.clear();
            return SecondOutcome::Finished { score: self.score };
        }
        SecondOutcome::Running
    }

    /// Claim a live target.
    pub fn hit(&mut self, target_id: u32, now_ms: i64) -> Result<(), Rejection> {
        self.expire(now_ms);
        let idx = self
            .targets
            .iter()
            .position(|t| t.id == target_id)
            .ok_or(Rejection::TargetUnavailable(target_id))?;
        self.targets.remove(idx);
        self.score += 1;
        Ok(())
    }

    pub fn view(&self) -> MinigameView {
        MinigameView {
            score: self.score,
            remaining_secs: self.remaining_secs,
            targets: self.targets.clone(),
        }
    }
}

/// Per-hit reward: one coin, one happiness, one XP.
pub fn reward_hit(state: &mut PetState) -> Vec<LevelUp> {
    earn(state, 1);
    apply_effects(&mut state.stats, HIT_EFFECTS);
    add_xp(state, 1)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub score: u32,
    pub coins: u64,
    pub level_ups: Vec<LevelUp>,
}

/// End-of-session payout: half the score in coins (rounded down), an
/// energy cost and a flat XP bonus.
pub fn settle(state: &mut PetState, score: u32) -> SessionSummary {
    let coins = u64::from(score / 2);
    earn(state, coins);
    apply_effects(&mut state.stats, END_EFFECTS);
    let level_ups = add_xp(state, END_XP);
    info!(score, coins, "mini-game finished");
    SessionSummary {
        score,
        coins,
        level_ups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn session() -> MinigameSession {
        MinigameSession::new(&MinigameConfig::default())
    }

    #[test]
    fn runs_for_the_configured_seconds() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut s = session();
        for sec in 1..30 {
            assert_eq!(s.on_second(sec * 1_000, &mut rng), SecondOutcome::Running);
        }
        assert_eq!(
            s.on_second(30_000, &mut rng),
            SecondOutcome::Finished { score: 0 }
        );
        assert!(s.targets().is_empty());
    }

    #[test]
    fn targets_expire_after_their_window() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut s = session();
        s.on_second(1_000, &mut rng);
        let id = s.targets()[0].id;
        let t = &s.targets()[0];
        assert!((0.0..1.0).contains(&t.x) && (0.0..1.0).contains(&t.y));
        assert_eq!(s.hit(id, 2_200), Err(Rejection::TargetUnavailable(id)));
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn hits_score_once_per_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut s = session();
        s.on_second(1_000, &mut rng);
        s.on_second(2_000, &mut rng);
        // The first target is still alive until 2_200.
        assert_eq!(s.targets().len(), 2);
        let ids: Vec<u32> = s.targets().iter().map(|t| t.id).collect();
        for id in &ids {
            s.hit(*id, 2_100).unwrap();
        }
        assert_eq!(s.score(), 2);
        assert!(s.hit(ids[0], 2_100).is_err());
    }

    #[test]
    fn settle_pays_half_the_score_rounded_down() {
        let mut state = PetState::default();
        let summary = settle(&mut state, 7);
        assert_eq!(summary.coins, 3);
        assert_eq!(state.coins, 53);
        assert_eq!(state.stats.get(StatKind::Energy), 60.0);
        assert_eq!(state.xp, END_XP);
    }

    #[test]
    fn hit_reward_touches_coins_happiness_and_xp() {
        let mut state = PetState::default();
        reward_hit(&mut state);
        assert_eq!(state.coins, 51);
        assert_eq!(state.stats.get(StatKind::Happy), 76.0);
        assert_eq!(state.xp, 1);
    }
}
