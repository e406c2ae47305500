//! Entity kinds the bot builds, trains, and researches
//!
//! Costs and roles are fixed game data, so they live on the enum instead of
//! in config.

use serde::{Deserialize, Serialize};

use crate::core::types::Cost;

/// Kind of an owned unit or structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitType {
    // Structures
    Nexus,           // Base, trains workers, casts the boost
    Pylon,           // Supply
    Assimilator,     // Extractor on a geyser
    Gateway,         // Tier-1 production
    WarpGate,        // Tier-1 production, instant-reinforcement form
    CyberneticsCore, // Tier-2 tech
    Stargate,        // Tier-3 production

    // Units
    Probe,   // Worker
    Zealot,  // Standard army unit
    Stalker, // Tier-2 army unit
    VoidRay, // Tier-3 army unit
}

impl UnitType {
    pub const fn cost(self) -> Cost {
        match self {
            UnitType::Nexus => Cost::new(400, 0, 0),
            UnitType::Pylon => Cost::new(100, 0, 0),
            UnitType::Assimilator => Cost::new(75, 0, 0),
            UnitType::Gateway => Cost::new(150, 0, 0),
            UnitType::WarpGate => Cost::free(),
            UnitType::CyberneticsCore => Cost::new(150, 0, 0),
            UnitType::Stargate => Cost::new(150, 150, 0),
            UnitType::Probe => Cost::new(50, 0, 1),
            UnitType::Zealot => Cost::new(100, 0, 2),
            UnitType::Stalker => Cost::new(125, 50, 2),
            UnitType::VoidRay => Cost::new(250, 150, 4),
        }
    }

    /// The kind a structure was built as, before any in-place morph
    pub const fn base_form(self) -> UnitType {
        match self {
            UnitType::WarpGate => UnitType::Gateway,
            other => other,
        }
    }

    pub const fn is_structure(self) -> bool {
        matches!(
            self,
            UnitType::Nexus
                | UnitType::Pylon
                | UnitType::Assimilator
                | UnitType::Gateway
                | UnitType::WarpGate
                | UnitType::CyberneticsCore
                | UnitType::Stargate
        )
    }

    pub const fn is_worker(self) -> bool {
        matches!(self, UnitType::Probe)
    }

    pub const fn is_army(self) -> bool {
        matches!(self, UnitType::Zealot | UnitType::Stalker | UnitType::VoidRay)
    }

    /// Structures that train army units
    pub const fn is_production(self) -> bool {
        matches!(self, UnitType::Gateway | UnitType::WarpGate | UnitType::Stargate)
    }

    /// Structures that store energy for the production boost
    pub const fn is_caster(self) -> bool {
        matches!(self, UnitType::Nexus)
    }
}

/// Researchable upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UpgradeId {
    WarpGateResearch,
}

impl UpgradeId {
    pub const fn cost(self) -> Cost {
        match self {
            UpgradeId::WarpGateResearch => Cost::new(50, 50, 0),
        }
    }

    /// Structure kind that researches this upgrade
    pub const fn researched_at(self) -> UnitType {
        match self {
            UpgradeId::WarpGateResearch => UnitType::CyberneticsCore,
        }
    }
}

/// Castable ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityId {
    /// Energy-gated production/research speed boost
    ChronoBoost,
    /// Convert a tier-1 production structure into its instant form
    MorphWarpGate,
    /// Instant reinforcement from a warp gate
    WarpIn,
}

/// Timed effect on a unit or structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuffId {
    ChronoBoosted,
}

/// Kind of a neutral resource node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Primary resource patch
    Mineral,
    /// Secondary resource geyser, needs an extractor
    Geyser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_are_disjoint() {
        let all = [
            UnitType::Nexus,
            UnitType::Pylon,
            UnitType::Assimilator,
            UnitType::Gateway,
            UnitType::WarpGate,
            UnitType::CyberneticsCore,
            UnitType::Stargate,
            UnitType::Probe,
            UnitType::Zealot,
            UnitType::Stalker,
            UnitType::VoidRay,
        ];
        for kind in all {
            let roles = [kind.is_structure(), kind.is_worker(), kind.is_army()];
            assert_eq!(roles.iter().filter(|r| **r).count(), 1, "{:?}", kind);
        }
    }

    #[test]
    fn test_only_units_cost_supply() {
        assert_eq!(UnitType::Pylon.cost().supply, 0);
        assert_eq!(UnitType::Probe.cost().supply, 1);
        assert_eq!(UnitType::Zealot.cost().supply, 2);
    }

    #[test]
    fn test_warp_gate_built_as_gateway() {
        assert_eq!(UnitType::WarpGate.base_form(), UnitType::Gateway);
        assert_eq!(UnitType::Gateway.base_form(), UnitType::Gateway);
        assert_eq!(UnitType::Stargate.base_form(), UnitType::Stargate);
    }

    #[test]
    fn test_warp_gate_research_location() {
        assert_eq!(
            UpgradeId::WarpGateResearch.researched_at(),
            UnitType::CyberneticsCore
        );
    }
}
