//! Production boost allocation
//!
//! Each caster with enough energy boosts one target per tick, picked in
//! priority order: tier-2 tech first, then production, then itself.

use ahash::AHashSet;

use crate::command::{Command, Target};
use crate::core::error::Skip;
use crate::core::types::EntityId;
use crate::construction::tech::TechTier;
use crate::scheduler::context::TickContext;
use crate::scheduler::SubPolicy;
use crate::world::catalog::{AbilityId, BuffId};
use crate::world::query::UnitQuery;
use crate::world::snapshot::{UnitView, WorldSnapshot};

const POLICY: &str = "ability";

#[derive(Debug, Clone, Copy, Default)]
pub struct AbilityAllocator;

impl AbilityAllocator {
    pub fn new() -> Self {
        Self
    }
}

/// Highest-priority target for `caster` that is not already boosted
///
/// `boosted` holds targets picked earlier this tick; the host has not applied
/// those casts yet, so the snapshot still shows them unbuffed.
pub fn pick_target<'a>(
    snapshot: &'a WorldSnapshot,
    caster: &'a UnitView,
    boosted: &AHashSet<EntityId>,
) -> Option<&'a UnitView> {
    let eligible =
        |u: &&UnitView| !u.has_buff(BuffId::ChronoBoosted) && !boosted.contains(&u.id);

    let tech = TechTier::Tech.structure();
    snapshot
        .of_type(tech)
        .ready()
        .find(eligible)
        .or_else(|| {
            snapshot
                .units()
                .ready()
                .filter(|u| u.kind.is_production())
                .find(eligible)
        })
        .or_else(|| Some(caster).filter(eligible))
}

impl SubPolicy for AbilityAllocator {
    fn name(&self) -> &'static str {
        POLICY
    }

    fn run(&mut self, cx: &mut TickContext<'_>) {
        let snapshot = cx.snapshot;
        let threshold = cx.config.boost_energy;
        let mut boosted = AHashSet::new();

        let casters = snapshot
            .units()
            .ready()
            .filter(|u| u.kind.is_caster() && u.energy >= threshold);
        for caster in casters {
            match pick_target(snapshot, caster, &boosted) {
                Some(target) => {
                    boosted.insert(target.id);
                    cx.issue(
                        POLICY,
                        Command::Cast {
                            caster: caster.id,
                            ability: AbilityId::ChronoBoost,
                            target: Target::Unit(target.id),
                        },
                    );
                }
                None => cx.skip(POLICY, Skip::NoEligibleTarget),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::world::builder::SnapshotBuilder;
    use crate::world::catalog::UnitType;

    #[test]
    fn test_tech_before_production() {
        let mut builder = SnapshotBuilder::new();
        builder.unit(UnitType::Nexus, Vec2::new(0.0, 0.0)).energy = 50.0;
        builder.unit(UnitType::Gateway, Vec2::new(5.0, 0.0));
        let core = builder.unit(UnitType::CyberneticsCore, Vec2::new(8.0, 0.0)).id;
        let snapshot = builder.build();

        let target = pick_target(&snapshot, &snapshot.units[0], &AHashSet::new()).unwrap();
        assert_eq!(target.id, core);
    }

    #[test]
    fn test_boosted_targets_skipped() {
        let mut builder = SnapshotBuilder::new();
        let nexus = builder.unit(UnitType::Nexus, Vec2::new(0.0, 0.0)).id;
        builder
            .unit(UnitType::CyberneticsCore, Vec2::new(8.0, 0.0))
            .buffs
            .push(BuffId::ChronoBoosted);
        let gateway = builder.unit(UnitType::Gateway, Vec2::new(5.0, 0.0)).id;
        let snapshot = builder.build();

        let caster = snapshot.unit(nexus).unwrap();
        let target = pick_target(&snapshot, caster, &AHashSet::new()).unwrap();
        assert_eq!(target.id, gateway);

        let mut boosted = AHashSet::new();
        boosted.insert(gateway);
        let target = pick_target(&snapshot, caster, &boosted).unwrap();
        assert_eq!(target.id, nexus);
    }

    #[test]
    fn test_unfinished_structures_not_boosted() {
        let mut builder = SnapshotBuilder::new();
        let nexus = builder.unit(UnitType::Nexus, Vec2::new(0.0, 0.0)).id;
        builder.unit(UnitType::CyberneticsCore, Vec2::new(8.0, 0.0)).build_progress = 0.4;
        let snapshot = builder.build();

        let caster = snapshot.unit(nexus).unwrap();
        assert_eq!(pick_target(&snapshot, caster, &AHashSet::new()).unwrap().id, nexus);
    }
}
