//! Refusals returned by commands that could not run.

use thiserror::Error;

/// Why a user intent was refused. Rejections never change state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("insufficient coins: price {price}, balance {balance}")]
    InsufficientCoins { price: u64, balance: u64 },
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("item out of stock: {0}")]
    OutOfStock(String),
    #[error("unknown quest: {0}")]
    UnknownQuest(String),
    #[error("quest {id} is incomplete ({progress}/{need})")]
    QuestIncomplete { id: String, progress: u32, need: u32 },
    #[error("quest {0} was already claimed")]
    AlreadyClaimed(String),
    #[error("name must not be empty")]
    EmptyName,
    #[error("pet is asleep")]
    Asleep,
    #[error("no mini-game session is running")]
    NoSession,
    #[error("target {0} is not available")]
    TargetUnavailable(u32),
}

impl Rejection {
    /// Message shown to the player.
    pub fn message(&self) -> &'static str {
        match self {
            Self::InsufficientCoins { .. } => "Moedas insuficientes.",
            Self::UnknownItem(_) | Self::OutOfStock(_) => "Você não tem esse item.",
            Self::UnknownQuest(_) => "Missão não encontrada.",
            Self::QuestIncomplete { .. } => "Missão ainda não concluída.",
            Self::AlreadyClaimed(_) => "Recompensa já coletada.",
            Self::EmptyName => "Escolha um nome para a tartaruguinha.",
            Self::Asleep => "Shhh… ela está dormindo.",
            Self::NoSession => "Nenhum mini-jogo em andamento.",
            Self::TargetUnavailable(_) => "Essa joaninha já fugiu!",
        }
    }
}
