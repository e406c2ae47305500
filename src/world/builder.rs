//! Fluent construction of snapshots for scenario files and tests

use crate::core::types::{EntityId, Tick, Vec2};
use crate::economy::ledger::ResourceState;
use crate::world::catalog::{NodeKind, UnitType, UpgradeId};
use crate::world::snapshot::{KnownEnemy, MatchOutcome, ResourceNode, UnitView, WorldSnapshot};

/// Builds a [`WorldSnapshot`], handing out sequential entity ids
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    snapshot: WorldSnapshot,
    next_id: u64,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        let mut snapshot = WorldSnapshot::default();
        snapshot.resources = ResourceState::new(50, 0, 12, 15);
        snapshot.map.center = Vec2::new(100.0, 100.0);
        snapshot.map.width = 200.0;
        snapshot.map.height = 200.0;
        Self {
            snapshot,
            next_id: 1,
        }
    }

    fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn tick(&mut self, tick: Tick) -> &mut Self {
        self.snapshot.tick = tick;
        self
    }

    pub fn resources(&mut self, primary: u32, secondary: u32) -> &mut Self {
        self.snapshot.resources.primary = primary;
        self.snapshot.resources.secondary = secondary;
        self
    }

    pub fn supply(&mut self, used: u32, cap: u32) -> &mut Self {
        self.snapshot.resources.supply_used = used;
        self.snapshot.resources.supply_cap = cap;
        self
    }

    pub fn center(&mut self, center: Vec2) -> &mut Self {
        self.snapshot.map.center = center;
        self
    }

    pub fn upgrade(&mut self, upgrade: UpgradeId) -> &mut Self {
        self.snapshot.upgrades.push(upgrade);
        self
    }

    pub fn outcome(&mut self, outcome: MatchOutcome) -> &mut Self {
        self.snapshot.outcome = Some(outcome);
        self
    }

    /// Add a ready, idle owned unit; tweak it through the returned reference
    pub fn unit(&mut self, kind: UnitType, position: Vec2) -> &mut UnitView {
        let id = self.allocate();
        self.snapshot.units.push(UnitView::new(id, kind, position));
        let last = self.snapshot.units.len() - 1;
        &mut self.snapshot.units[last]
    }

    pub fn units(&mut self, kind: UnitType, position: Vec2, count: usize) -> Vec<EntityId> {
        (0..count).map(|_| self.unit(kind, position).id).collect()
    }

    pub fn mineral(&mut self, position: Vec2) -> EntityId {
        self.node(NodeKind::Mineral, position, 1500)
    }

    pub fn geyser(&mut self, position: Vec2) -> EntityId {
        self.node(NodeKind::Geyser, position, 2250)
    }

    fn node(&mut self, kind: NodeKind, position: Vec2, remaining: u32) -> EntityId {
        let id = self.allocate();
        self.snapshot.nodes.push(ResourceNode {
            id,
            kind,
            position,
            remaining,
        });
        id
    }

    pub fn enemy_unit(&mut self, position: Vec2) -> EntityId {
        let id = self.allocate();
        self.snapshot.enemy.units.push(KnownEnemy {
            id,
            position,
            flying: false,
            main_base: false,
        });
        id
    }

    pub fn enemy_flyer(&mut self, position: Vec2) -> EntityId {
        let id = self.allocate();
        self.snapshot.enemy.units.push(KnownEnemy {
            id,
            position,
            flying: true,
            main_base: false,
        });
        id
    }

    pub fn enemy_structure(&mut self, position: Vec2, main_base: bool) -> EntityId {
        let id = self.allocate();
        self.snapshot.enemy.structures.push(KnownEnemy {
            id,
            position,
            flying: false,
            main_base,
        });
        id
    }

    pub fn enemy_start(&mut self, position: Vec2) -> &mut Self {
        self.snapshot.enemy.start_locations.push(position);
        self
    }

    pub fn expansion_site(&mut self, position: Vec2) -> &mut Self {
        self.snapshot.map.expansion_sites.push(position);
        self
    }

    pub fn build(&self) -> WorldSnapshot {
        self.snapshot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential_across_kinds() {
        let mut builder = SnapshotBuilder::new();
        let nexus = builder.unit(UnitType::Nexus, Vec2::new(0.0, 0.0)).id;
        let mineral = builder.mineral(Vec2::new(5.0, 0.0));
        let enemy = builder.enemy_unit(Vec2::new(50.0, 0.0));
        assert_eq!(nexus, EntityId(1));
        assert_eq!(mineral, EntityId(2));
        assert_eq!(enemy, EntityId(3));
    }

    #[test]
    fn test_unit_reference_is_editable() {
        let mut builder = SnapshotBuilder::new();
        builder.unit(UnitType::Nexus, Vec2::new(0.0, 0.0)).energy = 75.0;
        let snapshot = builder.build();
        assert_eq!(snapshot.units[0].energy, 75.0);
    }
}
