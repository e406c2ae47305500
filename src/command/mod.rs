//! Command intents handed back to the host
//!
//! The core never executes anything itself. A tick's commands are collected
//! into one batch and the host drains it after the sub-policy chain finishes.

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Vec2};
use crate::world::catalog::{AbilityId, UnitType, UpgradeId};

/// What an attack or ability is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Target {
    Unit(EntityId),
    Position(Vec2),
}

/// Where the host should place a structure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    /// Anywhere valid near this point
    Near(Vec2),
    /// On a resource node (extractors)
    OnNode(EntityId),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Train {
        producer: EntityId,
        unit: UnitType,
    },
    Build {
        worker: EntityId,
        structure: UnitType,
        placement: Placement,
    },
    Research {
        structure: EntityId,
        upgrade: UpgradeId,
    },
    Cast {
        caster: EntityId,
        ability: AbilityId,
        target: Target,
    },
    Move {
        unit: EntityId,
        destination: Vec2,
    },
    Attack {
        unit: EntityId,
        target: Target,
    },
    Gather {
        unit: EntityId,
        node: EntityId,
    },
    /// Instant reinforcement from a warp gate
    WarpIn {
        gate: EntityId,
        unit: UnitType,
        near: Vec2,
    },
}

impl Command {
    /// The unit or structure that carries out the command
    pub fn actor(&self) -> EntityId {
        match *self {
            Command::Train { producer, .. } => producer,
            Command::Build { worker, .. } => worker,
            Command::Research { structure, .. } => structure,
            Command::Cast { caster, .. } => caster,
            Command::Move { unit, .. } => unit,
            Command::Attack { unit, .. } => unit,
            Command::Gather { unit, .. } => unit,
            Command::WarpIn { gate, .. } => gate,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Command::Train { .. } => "train",
            Command::Build { .. } => "build",
            Command::Research { .. } => "research",
            Command::Cast { .. } => "cast",
            Command::Move { .. } => "move",
            Command::Attack { .. } => "attack",
            Command::Gather { .. } => "gather",
            Command::WarpIn { .. } => "warp_in",
        }
    }
}
