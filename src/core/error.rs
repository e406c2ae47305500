use thiserror::Error;

use crate::world::catalog::UnitType;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, BotError>;

/// Why a sub-policy did nothing this tick
///
/// None of these are faults: the next tick re-evaluates from a fresh snapshot.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Skip {
    #[error("cannot afford")]
    Unaffordable,

    #[error("not enough supply left")]
    SupplyBlocked,

    #[error("prerequisite {0:?} missing")]
    PrerequisiteMissing(UnitType),

    #[error("no eligible target")]
    NoEligibleTarget,

    #[error("no available worker")]
    NoAvailableWorker,

    #[error("request already pending")]
    AlreadyPending,
}
