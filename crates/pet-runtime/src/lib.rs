#![deny(warnings)]

//! Runtime for a single pet: the controller that owns the state, typed
//! commands, cooperative timers, the mini-game session, notices and the
//! activity log, and the snapshot handed to renderers.
//!
//! Everything runs on one thread. The host calls [`PetController::pump`]
//! regularly and [`PetController::dispatch`] for each user intent; time comes
//! from an injected [`Clock`].

pub mod clock;
pub mod command;
pub mod controller;
pub mod minigame;
pub mod notice;
pub mod schedule;
pub mod snapshot;

pub use clock::{Clock, ManualClock, SystemClock};
pub use command::Command;
pub use controller::{Outcome, PetController};
pub use minigame::{MinigameSession, MinigameView, Target};
pub use notice::{ActivityLog, Emote, LogEntry, Notice};
pub use snapshot::{AchievementEntry, Mood, PetSnapshot, StatBand};
