//! Buying items and using them on the pet.

use pet_core::{find_item, PetState, Rejection, ShopItem};
use tracing::info;

use crate::quests;
use crate::stats::{add_xp, apply_effects, LevelUp};

/// XP granted for every item used.
pub const USE_ITEM_XP: u64 = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct UseReport {
    pub item: &'static ShopItem,
    pub level_ups: Vec<LevelUp>,
    /// Quests whose progress moved.
    pub quests_advanced: Vec<String>,
}

/// Consume one `name` from the inventory and apply its effects.
///
/// Unknown items and empty stacks are rejected before anything changes.
pub fn use_item(state: &mut PetState, name: &str) -> Result<UseReport, Rejection> {
    let item = find_item(name).ok_or_else(|| Rejection::UnknownItem(name.to_string()))?;
    if !state.inventory.take_one(item.name) {
        return Err(Rejection::OutOfStock(name.to_string()));
    }
    apply_effects(&mut state.stats, item.effects);
    let level_ups = add_xp(state, USE_ITEM_XP);
    let quests_advanced = quests::record_item_use(&mut state.quests, item.name);
    info!(item = item.name, left = state.inventory.qty(item.name), "item used");
    Ok(UseReport {
        item,
        level_ups,
        quests_advanced,
    })
}

/// Buy one unit of `item`. Coins are deducted exactly, or not at all.
pub fn buy(state: &mut PetState, item: &ShopItem) -> Result<(), Rejection> {
    if state.coins < item.price {
        return Err(Rejection::InsufficientCoins {
            price: item.price,
            balance: state.coins,
        });
    }
    state.coins -= item.price;
    state.inventory.add(item.name, 1);
    info!(item = item.name, price = item.price, coins = state.coins, "item bought");
    Ok(())
}

/// [`buy`] by catalog name.
pub fn buy_by_name(state: &mut PetState, name: &str) -> Result<&'static ShopItem, Rejection> {
    let item = find_item(name).ok_or_else(|| Rejection::UnknownItem(name.to_string()))?;
    buy(state, item)?;
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pet_core::{StatKind, BALL, CATALOG};
    use proptest::prelude::*;

    #[test]
    fn buying_deducts_exact_price_or_nothing() {
        let mut state = PetState::default();
        let medicine = find_item("Remédio").unwrap();
        buy(&mut state, medicine).unwrap();
        assert_eq!(state.coins, 28);
        assert_eq!(state.inventory.qty("Remédio"), 1);

        let shell = ShopItem {
            name: "Concha",
            icon: "🐚",
            price: 30,
            effects: &[],
        };
        assert_eq!(
            buy(&mut state, &shell),
            Err(Rejection::InsufficientCoins {
                price: 30,
                balance: 28
            })
        );
        assert_eq!(state.coins, 28);
        assert_eq!(state.inventory.qty("Concha"), 0);
    }

    #[test]
    fn buying_initialises_missing_stack() {
        let mut state = PetState::default();
        state.inventory = pet_core::Inventory::empty();
        buy_by_name(&mut state, BALL).unwrap();
        assert_eq!(state.inventory.qty(BALL), 1);
        assert_eq!(
            buy_by_name(&mut state, "Pedra"),
            Err(Rejection::UnknownItem("Pedra".into()))
        );
    }

    #[test]
    fn using_applies_effects_xp_and_quests() {
        let mut state = PetState::default();
        crate::generate_quests(
            &mut state.quests,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        let report = use_item(&mut state, "Fruta do mar").unwrap();
        assert_eq!(report.item.name, "Fruta do mar");
        assert_eq!(report.quests_advanced, vec!["eat3".to_string()]);
        assert_eq!(state.inventory.qty("Fruta do mar"), 0);
        assert_eq!(state.stats.get(StatKind::Hunger), 100.0);
        assert_eq!(state.stats.get(StatKind::Happy), 81.0);
        assert_eq!(state.xp, USE_ITEM_XP);
    }

    #[test]
    fn using_empty_or_unknown_item_changes_nothing() {
        let mut state = PetState::default();
        let before = state.clone();
        assert_eq!(
            use_item(&mut state, "Remédio"),
            Err(Rejection::OutOfStock("Remédio".into()))
        );
        assert_eq!(
            use_item(&mut state, "Pedra"),
            Err(Rejection::UnknownItem("Pedra".into()))
        );
        assert_eq!(state, before);
    }

    proptest! {
        #[test]
        fn inventory_and_coins_never_underflow(
            ops in proptest::collection::vec((any::<bool>(), 0usize..6), 0..200)
        ) {
            let mut state = PetState::default();
            for (is_buy, idx) in ops {
                let item = &CATALOG[idx];
                let coins = state.coins;
                let qty = state.inventory.qty(item.name);
                if is_buy {
                    match buy(&mut state, item) {
                        Ok(()) => {
                            prop_assert_eq!(state.coins, coins - item.price);
                            prop_assert_eq!(state.inventory.qty(item.name), qty + 1);
                        }
                        Err(_) => {
                            prop_assert!(coins < item.price);
                            prop_assert_eq!(state.coins, coins);
                        }
                    }
                } else {
                    match use_item(&mut state, item.name) {
                        Ok(_) => {
                            prop_assert_eq!(state.inventory.qty(item.name), qty - 1);
                        }
                        Err(_) => {
                            prop_assert_eq!(qty, 0);
                            prop_assert_eq!(state.inventory.qty(item.name), 0);
                        }
                    }
                }
            }
        }
    }
}
