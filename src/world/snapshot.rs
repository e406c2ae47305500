//! Read-only per-tick view of the match, produced by the host
//!
//! The core never mutates a snapshot. Every accessor hands out a fresh
//! iterator, so a query can be restarted as often as a sub-policy likes.

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Tick, Vec2};
use crate::economy::ledger::ResourceState;
use crate::world::catalog::{AbilityId, BuffId, NodeKind, UnitType, UpgradeId};
use crate::world::query::{Positioned, UnitQuery};

/// One entry of a unit's order queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    Gather(EntityId),
    ReturnCargo,
    Attack,
    Move,
    Build(UnitType),
    Train(UnitType),
    Research(UpgradeId),
}

fn fully_built() -> f32 {
    1.0
}

/// An owned unit or structure as seen this tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitView {
    pub id: EntityId,
    pub kind: UnitType,
    pub position: Vec2,
    /// 0.0 just placed, 1.0 ready
    #[serde(default = "fully_built")]
    pub build_progress: f32,
    /// Empty means idle
    #[serde(default)]
    pub orders: Vec<OrderKind>,
    /// Harvesters currently working this base or extractor
    #[serde(default)]
    pub assigned_harvesters: u32,
    /// Harvesters this base or extractor saturates at
    #[serde(default)]
    pub ideal_harvesters: u32,
    #[serde(default)]
    pub energy: f32,
    #[serde(default)]
    pub buffs: Vec<BuffId>,
    /// Abilities castable right now (off cooldown)
    #[serde(default)]
    pub abilities: Vec<AbilityId>,
}

impl UnitView {
    /// A ready, idle unit with nothing assigned
    pub fn new(id: EntityId, kind: UnitType, position: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            build_progress: 1.0,
            orders: Vec::new(),
            assigned_harvesters: 0,
            ideal_harvesters: 0,
            energy: 0.0,
            buffs: Vec::new(),
            abilities: Vec::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.build_progress >= 1.0
    }

    pub fn is_idle(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn has_buff(&self, buff: BuffId) -> bool {
        self.buffs.contains(&buff)
    }

    pub fn can_cast(&self, ability: AbilityId) -> bool {
        self.abilities.contains(&ability)
    }

    /// Mining or carrying a load back
    pub fn is_gathering(&self) -> bool {
        matches!(
            self.orders.first(),
            Some(OrderKind::Gather(_)) | Some(OrderKind::ReturnCargo)
        )
    }

    /// The only thing queued is an attack
    pub fn is_only_attacking(&self) -> bool {
        self.orders.as_slice() == [OrderKind::Attack]
    }

    pub fn is_training(&self, unit: UnitType) -> bool {
        self.orders.contains(&OrderKind::Train(unit))
    }

    pub fn is_researching(&self, upgrade: UpgradeId) -> bool {
        self.orders.contains(&OrderKind::Research(upgrade))
    }
}

impl Positioned for UnitView {
    fn position(&self) -> Vec2 {
        self.position
    }
    fn id(&self) -> EntityId {
        self.id
    }
}

/// A neutral mineral patch or geyser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: EntityId,
    pub kind: NodeKind,
    pub position: Vec2,
    #[serde(default)]
    pub remaining: u32,
}

impl Positioned for ResourceNode {
    fn position(&self) -> Vec2 {
        self.position
    }
    fn id(&self) -> EntityId {
        self.id
    }
}

/// A last-known enemy unit or structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownEnemy {
    pub id: EntityId,
    pub position: Vec2,
    #[serde(default)]
    pub flying: bool,
    /// Structure that anchors an enemy base
    #[serde(default)]
    pub main_base: bool,
}

impl Positioned for KnownEnemy {
    fn position(&self) -> Vec2 {
        self.position
    }
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Everything known about the opponent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyIntel {
    /// Non-structure units
    pub units: Vec<KnownEnemy>,
    pub structures: Vec<KnownEnemy>,
    /// Fixed at match start
    pub start_locations: Vec<Vec2>,
}

/// Static map geometry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapInfo {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
    /// Candidate base locations, best first
    pub expansion_sites: Vec<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Victory,
    Defeat,
    Tie,
}

/// Complete host-provided state for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSnapshot {
    pub tick: Tick,
    pub resources: ResourceState,
    pub units: Vec<UnitView>,
    pub nodes: Vec<ResourceNode>,
    pub enemy: EnemyIntel,
    pub map: MapInfo,
    /// Finished upgrades
    pub upgrades: Vec<UpgradeId>,
    /// Set by the host once the match is decided
    pub outcome: Option<MatchOutcome>,
}

impl WorldSnapshot {
    pub fn units(&self) -> impl Iterator<Item = &UnitView> {
        self.units.iter()
    }

    pub fn of_type(&self, kind: UnitType) -> impl Iterator<Item = &UnitView> {
        self.units().of_type(kind)
    }

    pub fn workers(&self) -> impl Iterator<Item = &UnitView> {
        self.units().filter(|u| u.kind.is_worker())
    }

    pub fn army(&self) -> impl Iterator<Item = &UnitView> {
        self.units().filter(|u| u.kind.is_army())
    }

    pub fn unit(&self, id: EntityId) -> Option<&UnitView> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn minerals(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Mineral)
    }

    pub fn geysers(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Geyser)
    }

    pub fn is_mineral(&self, id: EntityId) -> bool {
        self.minerals().any(|n| n.id == id)
    }

    pub fn has_upgrade(&self, upgrade: UpgradeId) -> bool {
        self.upgrades.contains(&upgrade)
    }

    /// Units built as `kind` in any state of construction, morphed ones included
    pub fn count_all(&self, kind: UnitType) -> usize {
        let built_as = kind.base_form();
        self.units().filter(|u| u.kind.base_form() == built_as).count()
    }

    /// A structure of this kind has been placed but is not finished
    pub fn is_under_construction(&self, kind: UnitType) -> bool {
        self.of_type(kind).any(|u| !u.is_ready())
    }

    /// Workers gathering from a mineral patch, or standing idle
    pub fn is_free_worker(&self, unit: &UnitView) -> bool {
        if !unit.kind.is_worker() {
            return false;
        }
        match unit.orders.as_slice() {
            [] => true,
            [OrderKind::Gather(node), ..] => self.is_mineral(*node),
            [OrderKind::ReturnCargo, ..] => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(id: u64, orders: Vec<OrderKind>) -> UnitView {
        let mut unit = UnitView::new(EntityId(id), UnitType::Probe, Vec2::new(0.0, 0.0));
        unit.orders = orders;
        unit
    }

    #[test]
    fn test_unit_defaults_from_json() {
        let json = r#"{"id": 4, "kind": "Gateway", "position": {"x": 1.0, "y": 2.0}}"#;
        let unit: UnitView = serde_json::from_str(json).unwrap();
        assert!(unit.is_ready());
        assert!(unit.is_idle());
        assert_eq!(unit.energy, 0.0);
    }

    #[test]
    fn test_only_attacking() {
        assert!(probe(1, vec![OrderKind::Attack]).is_only_attacking());
        assert!(!probe(1, vec![OrderKind::Attack, OrderKind::Move]).is_only_attacking());
        assert!(!probe(1, vec![]).is_only_attacking());
    }

    #[test]
    fn test_free_worker_excludes_gas_and_builders() {
        let mut snapshot = WorldSnapshot::default();
        snapshot.nodes.push(ResourceNode {
            id: EntityId(100),
            kind: NodeKind::Mineral,
            position: Vec2::default(),
            remaining: 1500,
        });
        assert!(snapshot.is_free_worker(&probe(1, vec![])));
        assert!(snapshot.is_free_worker(&probe(2, vec![OrderKind::Gather(EntityId(100))])));
        assert!(!snapshot.is_free_worker(&probe(3, vec![OrderKind::Gather(EntityId(200))])));
        assert!(!snapshot.is_free_worker(&probe(4, vec![OrderKind::Build(UnitType::Pylon)])));
    }

    #[test]
    fn test_under_construction() {
        let mut snapshot = WorldSnapshot::default();
        let mut pylon = UnitView::new(EntityId(1), UnitType::Pylon, Vec2::default());
        pylon.build_progress = 0.3;
        snapshot.units.push(pylon);
        assert!(snapshot.is_under_construction(UnitType::Pylon));
        assert!(!snapshot.is_under_construction(UnitType::Gateway));
        assert_eq!(snapshot.count_all(UnitType::Pylon), 1);
    }

    #[test]
    fn test_count_all_includes_morphed_gateways() {
        let mut snapshot = WorldSnapshot::default();
        snapshot
            .units
            .push(UnitView::new(EntityId(1), UnitType::WarpGate, Vec2::default()));
        let mut gateway = UnitView::new(EntityId(2), UnitType::Gateway, Vec2::default());
        gateway.build_progress = 0.1;
        snapshot.units.push(gateway);
        assert_eq!(snapshot.count_all(UnitType::Gateway), 2);
        assert_eq!(snapshot.count_all(UnitType::WarpGate), 2);
    }
}
