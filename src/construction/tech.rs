//! Tech tiers and their prerequisite chain
//!
//! Tier-1 production -> tier-2 tech -> tier-3 production. Each tier knows
//! its structure, what unlocks it, and how many of it the bot wants, so a new
//! tier is one more variant rather than another nested conditional.

use crate::core::config::BotConfig;
use crate::core::types::Tick;
use crate::world::catalog::UnitType;
use crate::world::snapshot::WorldSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TechTier {
    Production,
    Tech,
    Advanced,
}

/// What a tier needs before it can be built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisite {
    /// At least one structure of the tier exists, finished or not
    Present(TechTier),
    /// At least one structure of the tier is finished
    Ready(TechTier),
}

/// Where a tier stands this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierStatus {
    /// Prerequisite structure missing
    Locked(UnitType),
    /// At or above the wanted count
    Satisfied,
    /// Another structure is wanted
    Wanted,
}

impl TechTier {
    pub const ALL: [TechTier; 3] = [TechTier::Production, TechTier::Tech, TechTier::Advanced];

    /// The structure built to advance this tier
    pub fn structure(self) -> UnitType {
        match self {
            TechTier::Production => UnitType::Gateway,
            TechTier::Tech => UnitType::CyberneticsCore,
            TechTier::Advanced => UnitType::Stargate,
        }
    }

    /// Every structure kind that counts toward the tier
    pub fn members(self) -> &'static [UnitType] {
        match self {
            TechTier::Production => &[UnitType::Gateway, UnitType::WarpGate],
            TechTier::Tech => &[UnitType::CyberneticsCore],
            TechTier::Advanced => &[UnitType::Stargate],
        }
    }

    pub fn prerequisite(self) -> Option<Prerequisite> {
        match self {
            TechTier::Production => None,
            TechTier::Tech => Some(Prerequisite::Present(TechTier::Production)),
            TechTier::Advanced => Some(Prerequisite::Ready(TechTier::Tech)),
        }
    }

    pub fn count(self, snapshot: &WorldSnapshot, ready_only: bool) -> usize {
        snapshot
            .units()
            .filter(|u| self.members().contains(&u.kind))
            .filter(|u| !ready_only || u.is_ready())
            .count()
    }

    /// How many of this tier the bot wants at `tick`
    ///
    /// Tier-1 grows with match time; the others are fixed.
    pub fn target(self, tick: Tick, config: &BotConfig) -> f64 {
        match self {
            TechTier::Production => {
                let ticks_per_step = config.ticks_per_minute as f64 * config.production_scaling_k;
                tick as f64 / ticks_per_step
            }
            TechTier::Tech => 1.0,
            TechTier::Advanced => config.advanced_target as f64,
        }
    }

    pub fn status(self, snapshot: &WorldSnapshot, config: &BotConfig) -> TierStatus {
        if let Some(prerequisite) = self.prerequisite() {
            let met = match prerequisite {
                Prerequisite::Present(tier) => tier.count(snapshot, false) > 0,
                Prerequisite::Ready(tier) => tier.count(snapshot, true) > 0,
            };
            if !met {
                let missing = match prerequisite {
                    Prerequisite::Present(tier) | Prerequisite::Ready(tier) => tier.structure(),
                };
                return TierStatus::Locked(missing);
            }
        }

        if (self.count(snapshot, false) as f64) < self.target(snapshot.tick, config) {
            TierStatus::Wanted
        } else {
            TierStatus::Satisfied
        }
    }
}
