//! Requests issued to the host but not yet confirmed
//!
//! A build command takes a few ticks to show up in the snapshot (the worker
//! walks over first). Without this set the planner would reissue it every
//! tick in between.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Tick};
use crate::world::catalog::{UnitType, UpgradeId};
use crate::world::query::SpatialQuery;
use crate::world::snapshot::WorldSnapshot;

/// What a pending request is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKey {
    /// One structure of this kind
    Structure(UnitType),
    /// An extractor on this geyser
    Extractor(EntityId),
    Research(UpgradeId),
}

#[derive(Debug, Clone, Copy)]
struct PendingEntry {
    issued_at: Tick,
    /// Units of the kind that existed when the request went out
    baseline: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PendingRequestSet {
    entries: AHashMap<RequestKey, PendingEntry>,
}

impl PendingRequestSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self, key: RequestKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Mark a request in flight; false if one already was
    pub fn insert(&mut self, key: RequestKey, issued_at: Tick, baseline: usize) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, PendingEntry { issued_at, baseline });
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop requests the snapshot confirms, and ones the host never acted on
    pub fn reconcile(&mut self, snapshot: &WorldSnapshot, timeout: Tick, claim_radius: f32) {
        self.entries.retain(|key, entry| {
            let confirmed = match *key {
                RequestKey::Structure(kind) => snapshot.count_all(kind) > entry.baseline,
                RequestKey::Extractor(node) => match snapshot.nodes.iter().find(|n| n.id == node) {
                    Some(geyser) => snapshot
                        .of_type(UnitType::Assimilator)
                        .closer_than(claim_radius, geyser.position)
                        .next()
                        .is_some(),
                    // Geyser gone from view; nothing left to wait for
                    None => true,
                },
                RequestKey::Research(upgrade) => {
                    snapshot.has_upgrade(upgrade)
                        || snapshot.units().any(|u| u.is_researching(upgrade))
                }
            };

            if confirmed {
                tracing::trace!(tick = snapshot.tick, ?key, "pending request confirmed");
                return false;
            }

            let expired = snapshot.tick.saturating_sub(entry.issued_at) >= timeout;
            if expired {
                tracing::debug!(
                    tick = snapshot.tick,
                    ?key,
                    issued_at = entry.issued_at,
                    "pending request timed out"
                );
            }
            !expired
        });
    }
}
