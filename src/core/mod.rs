pub mod config;
pub mod error;
pub mod types;

pub use config::{BotConfig, PolicyWeights};
pub use error::{BotError, Result, Skip};
pub use types::{Cost, EntityId, Tick, Vec2};
