//! Daily quests: one fixed set per calendar day, advanced by item use and
//! petting, with a one-time reward claim.

use chrono::NaiveDate;
use pet_core::{PetState, Quest, QuestBoard, QuestGoal, Rejection, Reward};
use tracing::info;

use crate::stats::{add_xp, earn, LevelUp};

/// The quest set handed out each day, all at zero progress.
pub fn daily_template() -> Vec<Quest> {
    let quest = |id: &str, text: &str, goal: QuestGoal, need: u32, xp: u64, coins: u64| Quest {
        id: id.to_string(),
        text: text.to_string(),
        goal,
        need,
        progress: 0,
        done: false,
        reward: Reward { xp, coins },
    };
    vec![
        quest(
            "eat3",
            "Usar 3 comidas hoje",
            QuestGoal::UseItem {
                items: vec!["Folha crocante".to_string(), "Fruta do mar".to_string()],
            },
            3,
            15,
            15,
        ),
        quest(
            "wash2",
            "Dar 2 banhos",
            QuestGoal::UseItem {
                items: vec!["Sabonete".to_string()],
            },
            2,
            10,
            10,
        ),
        quest("play10", "Fazer carinho 10x", QuestGoal::Pet, 10, 12, 12),
    ]
}

/// Replace the board with a fresh set unless it was already generated for
/// `today`. Returns whether a new set was created.
pub fn generate_quests(board: &mut QuestBoard, today: NaiveDate) -> bool {
    if board.date == Some(today) && !board.quests.is_empty() {
        return false;
    }
    board.quests = daily_template();
    board.date = Some(today);
    info!(%today, "daily quests generated");
    true
}

/// Advance quest `id` by `amount`, capped at its need. Unknown ids and
/// finished quests are left alone.
pub fn advance(board: &mut QuestBoard, id: &str, amount: u32) -> bool {
    board.get_mut(id).is_some_and(|q| q.advance(amount))
}

/// Count one use of `item` toward every quest tracking it. Returns the ids
/// whose progress moved.
pub fn record_item_use(board: &mut QuestBoard, item: &str) -> Vec<String> {
    advance_matching(board, |goal| match goal {
        QuestGoal::UseItem { items } => items.iter().any(|i| i == item),
        QuestGoal::Pet => false,
    })
}

pub fn record_pet(board: &mut QuestBoard) -> Vec<String> {
    advance_matching(board, |goal| matches!(goal, QuestGoal::Pet))
}

fn advance_matching(board: &mut QuestBoard, tracks: impl Fn(&QuestGoal) -> bool) -> Vec<String> {
    board
        .quests
        .iter_mut()
        .filter(|q| tracks(&q.goal))
        .filter_map(|q| q.advance(1).then(|| q.id.clone()))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimReport {
    pub reward: Reward,
    pub level_ups: Vec<LevelUp>,
}

/// Grant the reward of a completed quest once.
pub fn claim(state: &mut PetState, id: &str) -> Result<ClaimReport, Rejection> {
    let quest = state
        .quests
        .get(id)
        .ok_or_else(|| Rejection::UnknownQuest(id.to_string()))?;
    if quest.done {
        return Err(Rejection::AlreadyClaimed(id.to_string()));
    }
    if !quest.is_complete() {
        return Err(Rejection::QuestIncomplete {
            id: id.to_string(),
            progress: quest.progress,
            need: quest.need,
        });
    }
    let reward = quest.reward;

    let level_ups = add_xp(state, reward.xp);
    earn(state, reward.coins);
    if let Some(q) = state.quests.get_mut(id) {
        q.done = true;
    }
    info!(quest = id, xp = reward.xp, coins = reward.coins, "quest claimed");
    Ok(ClaimReport { reward, level_ups })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn state_with_quests() -> PetState {
        let mut state = PetState::default();
        generate_quests(&mut state.quests, day(1));
        state
    }

    #[test]
    fn generates_once_per_day() {
        let mut board = QuestBoard::default();
        assert!(generate_quests(&mut board, day(1)));
        assert_eq!(board.quests.len(), 3);
        advance(&mut board, "eat3", 2);
        assert!(!generate_quests(&mut board, day(1)));
        assert_eq!(board.get("eat3").unwrap().progress, 2);

        assert!(generate_quests(&mut board, day(2)));
        assert_eq!(board.get("eat3").unwrap().progress, 0);
        assert_eq!(board.date, Some(day(2)));
    }

    #[test]
    fn advance_caps_at_need_and_ignores_unknown() {
        let mut board = state_with_quests().quests;
        assert!(advance(&mut board, "wash2", 5));
        assert_eq!(board.get("wash2").unwrap().progress, 2);
        assert!(!advance(&mut board, "wash2", 1));
        assert!(!advance(&mut board, "swim", 1));
    }

    #[test]
    fn item_use_advances_every_tracking_quest() {
        let mut board = state_with_quests().quests;
        assert_eq!(record_item_use(&mut board, "Fruta do mar"), vec!["eat3"]);
        assert_eq!(record_item_use(&mut board, "Folha crocante"), vec!["eat3"]);
        assert!(record_item_use(&mut board, "Água fresca").is_empty());
        assert_eq!(board.get("eat3").unwrap().progress, 2);
        assert_eq!(record_pet(&mut board), vec!["play10"]);
    }

    #[test]
    fn claim_requires_completion() {
        let mut state = state_with_quests();
        let before = state.clone();
        assert!(matches!(
            claim(&mut state, "wash2"),
            Err(Rejection::QuestIncomplete { progress: 0, need: 2, .. })
        ));
        assert_eq!(state, before);
        assert_eq!(
            claim(&mut state, "nope"),
            Err(Rejection::UnknownQuest("nope".into()))
        );
    }

    #[test]
    fn claim_is_idempotent() {
        let mut state = state_with_quests();
        advance(&mut state.quests, "wash2", 2);
        let report = claim(&mut state, "wash2").unwrap();
        assert_eq!(report.reward, Reward { xp: 10, coins: 10 });
        assert_eq!(state.coins, 60);
        assert_eq!(state.xp, 10);
        assert!(state.quests.get("wash2").unwrap().done);

        let after_first = state.clone();
        assert_eq!(
            claim(&mut state, "wash2"),
            Err(Rejection::AlreadyClaimed("wash2".into()))
        );
        assert_eq!(state, after_first);
    }

    #[test]
    fn claim_reward_can_level_up() {
        let mut state = state_with_quests();
        state.xp = 30;
        advance(&mut state.quests, "eat3", 3);
        let report = claim(&mut state, "eat3").unwrap();
        assert_eq!(report.level_ups.len(), 1);
        assert_eq!(state.level, 2);
        assert_eq!(state.xp, 10);
        // 50 + 20 level bonus + 15 reward
        assert_eq!(state.coins, 85);
    }
}
