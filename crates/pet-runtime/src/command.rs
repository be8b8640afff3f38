//! The typed command surface a host drives the controller with.

use serde::{Deserialize, Serialize};

/// A user or host intent. Serialized as `{"cmd": "use_item", "name": ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Run a decay tick right away using the real delta since the last one.
    Tick,
    /// The host became visible again; forget the time spent hidden.
    Resume,
    UseItem {
        name: String,
    },
    Buy {
        item: String,
    },
    Pet,
    Play,
    Sleep,
    ClaimQuest {
        id: String,
    },
    StartMinigame,
    MinigameHit {
        target: u32,
    },
    SetName {
        name: String,
    },
    ToggleMute,
    Save,
}

impl Command {
    /// Whether a successful run mutates the pet and must be followed by an
    /// achievement check and a save.
    pub fn changes_state(&self) -> bool {
        !matches!(self, Command::Resume | Command::StartMinigame | Command::Save)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_json() {
        let cmd: Command = serde_json::from_str(r#"{"cmd":"use_item","name":"Sabonete"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::UseItem {
                name: "Sabonete".into()
            }
        );
        let cmd: Command = serde_json::from_str(r#"{"cmd":"minigame_hit","target":4}"#).unwrap();
        assert_eq!(cmd, Command::MinigameHit { target: 4 });
        let cmd: Command = serde_json::from_str(r#"{"cmd":"pet"}"#).unwrap();
        assert_eq!(cmd, Command::Pet);
    }

    #[test]
    fn unknown_commands_are_rejected() {
        assert!(serde_json::from_str::<Command>(r#"{"cmd":"fly"}"#).is_err());
    }

    #[test]
    fn save_and_resume_do_not_count_as_changes() {
        assert!(!Command::Save.changes_state());
        assert!(!Command::Resume.changes_state());
        assert!(Command::Pet.changes_state());
    }
}
