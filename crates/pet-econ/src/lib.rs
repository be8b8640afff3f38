#![deny(warnings)]

//! Economy rules for the pet: stat decay and health, XP and levels, coins,
//! random events, the shop, daily quests and achievements.
//!
//! Every function mutates a [`pet_core::PetState`] passed in by the caller;
//! nothing here holds state of its own. Randomness is always injected.

pub mod achievements;
pub mod events;
pub mod quests;
pub mod shop;
pub mod stats;

pub use achievements::{evaluate, pending_unlocks};
pub use events::RandomEvent;
pub use quests::{claim, generate_quests, ClaimReport};
pub use shop::{buy, buy_by_name, use_item, UseReport};
pub use stats::{
    add_xp, advance_minutes, apply_effects, apply_named_effects, earn, tick, LevelUp, TickReport,
};
