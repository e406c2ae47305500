//! Construction planner - the ordered build checks
//!
//! Runs supply, extractor, expansion, tech, and army production in that
//! order. Each check is gated on its own pending flag and on what the
//! ledger has left after everything ahead of it this tick.

use crate::command::{Command, Placement};
use crate::construction::army;
use crate::construction::pending::RequestKey;
use crate::construction::tech::{TechTier, TierStatus};
use crate::core::error::Skip;
use crate::core::types::Vec2;
use crate::scheduler::context::TickContext;
use crate::scheduler::SubPolicy;
use crate::world::catalog::{UnitType, UpgradeId};
use crate::world::query::{SpatialQuery, UnitQuery};
use crate::world::snapshot::{UnitView, WorldSnapshot};

const SUPPLY: &str = "construction.supply";
const EXTRACTOR: &str = "construction.extractor";
const EXPANSION: &str = "construction.expansion";
const TECH: &str = "construction.tech";

#[derive(Debug, Clone, Copy, Default)]
pub struct ConstructionPlanner;

impl ConstructionPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Keep supply ahead of usage
    pub fn build_supply(&self, cx: &mut TickContext<'_>) -> Result<(), Skip> {
        let config = cx.config;
        if cx.ledger.supply_left() >= config.supply_low_water {
            return Ok(());
        }
        if cx.ledger.balance().supply_cap >= config.max_supply {
            return Ok(());
        }
        if cx.in_progress(UnitType::Pylon) {
            return Err(Skip::AlreadyPending);
        }

        let snapshot = cx.snapshot;
        let base = snapshot
            .of_type(UnitType::Nexus)
            .ready()
            .next()
            .ok_or(Skip::NoEligibleTarget)?;
        // Off the mineral line, toward the middle of the map
        let spot = base.position.towards(&snapshot.map.center, config.supply_offset);

        cx.request_structure(
            SUPPLY,
            UnitType::Pylon,
            RequestKey::Structure(UnitType::Pylon),
            Placement::Near(spot),
            spot,
        )
    }

    /// Claim every free geyser near a ready base
    pub fn build_extractors(&self, cx: &mut TickContext<'_>) -> Result<(), Skip> {
        let snapshot = cx.snapshot;
        let config = cx.config;
        let cost = UnitType::Assimilator.cost();

        for base in snapshot.of_type(UnitType::Nexus).ready() {
            for geyser in snapshot.geysers().closer_than(config.geyser_radius, base.position) {
                let key = RequestKey::Extractor(geyser.id);
                let claimed = snapshot
                    .of_type(UnitType::Assimilator)
                    .closer_than(config.extractor_claim_radius, geyser.position)
                    .next()
                    .is_some();
                if claimed || cx.pending.is_pending(key) {
                    continue;
                }
                // Stop here so the rest of this tick keeps what is left
                if !cx.ledger.can_afford(cost) {
                    return Err(Skip::Unaffordable);
                }
                if let Err(reason) = cx.request_structure(
                    EXTRACTOR,
                    UnitType::Assimilator,
                    key,
                    Placement::OnNode(geyser.id),
                    geyser.position,
                ) {
                    cx.skip(EXTRACTOR, reason);
                }
            }
        }
        Ok(())
    }

    /// Take the next free expansion site while below the base ceiling
    pub fn expand(&self, cx: &mut TickContext<'_>) -> Result<(), Skip> {
        let snapshot = cx.snapshot;
        let config = cx.config;

        if snapshot.count_all(UnitType::Nexus) as u32 >= config.max_bases {
            return Ok(());
        }
        if cx.in_progress(UnitType::Nexus) {
            return Err(Skip::AlreadyPending);
        }
        if !cx.ledger.can_afford(UnitType::Nexus.cost()) {
            return Err(Skip::Unaffordable);
        }

        let site = next_expansion(snapshot, config.expansion_clearance)
            .ok_or(Skip::NoEligibleTarget)?;
        cx.request_structure(
            EXPANSION,
            UnitType::Nexus,
            RequestKey::Structure(UnitType::Nexus),
            Placement::Near(site),
            site,
        )
    }

    /// Advance the tier chain, then research the instant-reinforcement upgrade
    pub fn advance_tech(&self, cx: &mut TickContext<'_>) -> Result<(), Skip> {
        let snapshot = cx.snapshot;
        let home = snapshot
            .of_type(UnitType::Nexus)
            .ready()
            .next()
            .map(|b| b.position)
            .unwrap_or(snapshot.map.center);
        let pylon = snapshot
            .of_type(UnitType::Pylon)
            .ready()
            .closest_to(home)
            .ok_or(Skip::PrerequisiteMissing(UnitType::Pylon))?;

        for tier in TechTier::ALL {
            match tier.status(snapshot, cx.config) {
                TierStatus::Locked(missing) => {
                    cx.skip(TECH, Skip::PrerequisiteMissing(missing));
                }
                TierStatus::Satisfied => {}
                TierStatus::Wanted => {
                    let structure = tier.structure();
                    if let Err(reason) = cx.request_structure(
                        TECH,
                        structure,
                        RequestKey::Structure(structure),
                        Placement::Near(pylon.position),
                        pylon.position,
                    ) {
                        cx.skip(TECH, reason);
                    }
                }
            }
        }

        self.research(cx, UpgradeId::WarpGateResearch)
    }

    fn research(&self, cx: &mut TickContext<'_>, upgrade: UpgradeId) -> Result<(), Skip> {
        let snapshot = cx.snapshot;
        let key = RequestKey::Research(upgrade);
        if snapshot.has_upgrade(upgrade) {
            return Ok(());
        }
        if cx.pending.is_pending(key) || snapshot.units().any(|u| u.is_researching(upgrade)) {
            return Err(Skip::AlreadyPending);
        }

        let site = upgrade.researched_at();
        let structure: &UnitView = snapshot
            .of_type(site)
            .ready()
            .idle()
            .next()
            .ok_or(Skip::PrerequisiteMissing(site))?;
        cx.ledger.reserve(upgrade.cost())?;
        cx.pending.insert(key, cx.tick(), 0);
        cx.issue(
            TECH,
            Command::Research {
                structure: structure.id,
                upgrade,
            },
        );
        Ok(())
    }
}

/// First listed site with no known base within `clearance`
fn next_expansion(snapshot: &WorldSnapshot, clearance: f32) -> Option<Vec2> {
    snapshot.map.expansion_sites.iter().copied().find(|site| {
        let own = snapshot
            .of_type(UnitType::Nexus)
            .closer_than(clearance, *site)
            .next()
            .is_some();
        let enemy = snapshot
            .enemy
            .structures
            .iter()
            .filter(|s| s.main_base)
            .closer_than(clearance, *site)
            .next()
            .is_some();
        !own && !enemy
    })
}

impl SubPolicy for ConstructionPlanner {
    fn name(&self) -> &'static str {
        "construction"
    }

    fn run(&mut self, cx: &mut TickContext<'_>) {
        if let Err(reason) = self.build_supply(cx) {
            cx.skip(SUPPLY, reason);
        }
        if let Err(reason) = self.build_extractors(cx) {
            cx.skip(EXTRACTOR, reason);
        }
        if let Err(reason) = self.expand(cx) {
            cx.skip(EXPANSION, reason);
        }
        if let Err(reason) = self.advance_tech(cx) {
            cx.skip(TECH, reason);
        }
        if let Err(reason) = army::produce_army(cx) {
            cx.skip(army::POLICY, reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::builder::SnapshotBuilder;

    #[test]
    fn test_next_expansion_skips_taken_sites() {
        let mut builder = SnapshotBuilder::new();
        builder.unit(UnitType::Nexus, Vec2::new(20.0, 20.0));
        builder.enemy_structure(Vec2::new(180.0, 180.0), true);
        builder
            .expansion_site(Vec2::new(21.0, 20.0))
            .expansion_site(Vec2::new(178.0, 180.0))
            .expansion_site(Vec2::new(60.0, 40.0));
        assert_eq!(next_expansion(&builder.build(), 6.0), Some(Vec2::new(60.0, 40.0)));
    }

    #[test]
    fn test_next_expansion_none_when_all_taken() {
        let mut builder = SnapshotBuilder::new();
        builder.unit(UnitType::Nexus, Vec2::new(20.0, 20.0));
        builder.expansion_site(Vec2::new(20.0, 20.0));
        assert_eq!(next_expansion(&builder.build(), 6.0), None);
    }
}
