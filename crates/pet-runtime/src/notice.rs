//! Transient notifications and the activity log.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Emoji flashed next to the pet with a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emote {
    Silent,
    Sparkles,
    Coins,
    Sleepy,
    Leaf,
    Heart,
}

impl Emote {
    /// Pick an emote from the wording of a notice.
    pub fn classify(text: &str) -> Self {
        let t = text.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| t.contains(w));
        if has(&["salv"]) {
            Emote::Silent
        } else if has(&["nivel", "nível", "subiu"]) {
            Emote::Sparkles
        } else if has(&["comprou", "ganhou"]) {
            Emote::Coins
        } else if has(&["dorm", "descans"]) {
            Emote::Sleepy
        } else if has(&["usou", "aliment", "água", "banho", "curou"]) {
            Emote::Leaf
        } else {
            Emote::Heart
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Emote::Silent => "",
            Emote::Sparkles => "✨",
            Emote::Coins => "💰",
            Emote::Sleepy => "😴",
            Emote::Leaf => "🍃",
            Emote::Heart => "💚",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub text: String,
    pub emote: Emote,
}

impl Notice {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let emote = Emote::classify(&text);
        Self { text, emote }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub text: String,
}

/// Append-only activity log, newest first, keeping the last `capacity`
/// entries.
#[derive(Clone, Debug)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::with_capacity(100)
    }
}

impl ActivityLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, at: DateTime<Utc>, text: impl Into<String>) {
        self.entries.push_front(LogEntry {
            at,
            text: text.into(),
        });
        self.entries.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
