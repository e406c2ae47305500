//! Host-provided world state and the query layer over it

pub mod builder;
pub mod catalog;
pub mod query;
pub mod snapshot;

pub use builder::SnapshotBuilder;
pub use catalog::{AbilityId, BuffId, NodeKind, UnitType, UpgradeId};
pub use query::{Positioned, SpatialQuery, UnitQuery};
pub use snapshot::{
    EnemyIntel, KnownEnemy, MapInfo, MatchOutcome, OrderKind, ResourceNode, UnitView,
    WorldSnapshot,
};
