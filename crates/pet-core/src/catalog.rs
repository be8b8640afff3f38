//! Static shop catalog. Prices and effects are reference data and never
//! change during play.

use crate::StatKind;
use serde::Serialize;

/// Name of the toy used by the "play" action when owned.
pub const BALL: &str = "Bola divertida";

/// An item that can be bought in the shop and used on the pet.
#[derive(Debug, PartialEq, Serialize)]
pub struct ShopItem {
    /// Display name, also the inventory key.
    pub name: &'static str,
    /// Emoji shown next to the name.
    pub icon: &'static str,
    /// Price in coins (> 0).
    pub price: u64,
    /// Stat deltas applied when the item is used.
    pub effects: &'static [(StatKind, f64)],
}

impl ShopItem {
    /// Human-readable effect summary, e.g. "fome +28, felicidade +6".
    pub fn describe_effects(&self) -> String {
        self.effects
            .iter()
            .map(|(stat, delta)| {
                let sign = if *delta > 0.0 { "+" } else { "" };
                format!("{} {sign}{delta}", stat.label())
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub const CATALOG: &[ShopItem] = &[
    ShopItem {
        name: "Folha crocante",
        icon: "🥬",
        price: 6,
        effects: &[(StatKind::Hunger, 18.0)],
    },
    ShopItem {
        name: "Fruta do mar",
        icon: "🍓",
        price: 10,
        effects: &[(StatKind::Hunger, 28.0), (StatKind::Happy, 6.0)],
    },
    ShopItem {
        name: "Água fresca",
        icon: "💧",
        price: 5,
        effects: &[(StatKind::Thirst, 25.0)],
    },
    ShopItem {
        name: BALL,
        icon: "🎾",
        price: 18,
        effects: &[(StatKind::Happy, 20.0), (StatKind::Energy, -5.0)],
    },
    ShopItem {
        name: "Sabonete",
        icon: "🧼",
        price: 12,
        effects: &[(StatKind::Hygiene, 30.0)],
    },
    ShopItem {
        name: "Remédio",
        icon: "💊",
        price: 22,
        effects: &[(StatKind::Health, 30.0)],
    },
];

/// Quantities a fresh pet starts with.
pub(crate) const STARTING_STOCK: &[(&str, u32)] = &[
    ("Folha crocante", 3),
    ("Fruta do mar", 1),
    ("Água fresca", 2),
    (BALL, 0),
    ("Sabonete", 1),
    ("Remédio", 0),
];

/// Look up a catalog entry by its exact name.
pub fn find_item(name: &str) -> Option<&'static ShopItem> {
    CATALOG.iter().find(|item| item.name == name)
}
