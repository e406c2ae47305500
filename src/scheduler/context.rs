//! Per-tick working state shared by the sub-policy chain

use ahash::AHashSet;
use rand_chacha::ChaCha8Rng;

use crate::command::{Command, Placement};
use crate::construction::pending::{PendingRequestSet, RequestKey};
use crate::core::config::BotConfig;
use crate::core::error::Skip;
use crate::core::types::{EntityId, Tick, Vec2};
use crate::economy::ledger::ResourceLedger;
use crate::scheduler::log::DecisionLog;
use crate::world::catalog::UnitType;
use crate::world::query::SpatialQuery;
use crate::world::snapshot::{UnitView, WorldSnapshot};

/// Everything a sub-policy may read or touch during one tick
///
/// Borrowed from the match context for the length of the tick; the only
/// output is the command batch returned by [`TickContext::finish`].
pub struct TickContext<'a> {
    pub snapshot: &'a WorldSnapshot,
    pub config: &'a BotConfig,
    pub ledger: ResourceLedger,
    pub pending: &'a mut PendingRequestSet,
    pub rng: &'a mut ChaCha8Rng,
    log: &'a mut DecisionLog,
    commands: Vec<Command>,
    /// Units that already received a command this tick
    claimed: AHashSet<EntityId>,
}

impl<'a> TickContext<'a> {
    pub fn new(
        snapshot: &'a WorldSnapshot,
        config: &'a BotConfig,
        pending: &'a mut PendingRequestSet,
        rng: &'a mut ChaCha8Rng,
        log: &'a mut DecisionLog,
    ) -> Self {
        Self {
            snapshot,
            config,
            ledger: ResourceLedger::open(snapshot.resources),
            pending,
            rng,
            log,
            commands: Vec::new(),
            claimed: AHashSet::new(),
        }
    }

    pub fn tick(&self) -> Tick {
        self.snapshot.tick
    }

    pub fn is_claimed(&self, id: EntityId) -> bool {
        self.claimed.contains(&id)
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Queue a command and claim its actor for the rest of the tick
    pub fn issue(&mut self, policy: &'static str, command: Command) {
        tracing::debug!(tick = self.tick(), policy, ?command, "issue");
        self.claimed.insert(command.actor());
        self.log.issued(self.tick(), policy, command);
        self.commands.push(command);
    }

    /// Record a silent no-op
    pub fn skip(&mut self, policy: &'static str, reason: Skip) {
        tracing::trace!(tick = self.tick(), policy, %reason, "skip");
        self.log.skipped(self.tick(), policy, reason);
    }

    /// A pending request or an unfinished structure of this kind exists
    pub fn in_progress(&self, kind: UnitType) -> bool {
        self.pending.is_pending(RequestKey::Structure(kind))
            || self.snapshot.is_under_construction(kind)
    }

    /// Nearest worker that is idle or mining minerals and not yet claimed
    pub fn select_build_worker(&self, near: Vec2) -> Option<&'a UnitView> {
        let snapshot = self.snapshot;
        snapshot
            .workers()
            .filter(|w| snapshot.is_free_worker(w) && !self.is_claimed(w.id))
            .closest_to(near)
    }

    /// Reserve, pick a builder, mark pending, and issue a build
    ///
    /// Nothing is reserved or marked unless the command is actually issued.
    pub fn request_structure(
        &mut self,
        policy: &'static str,
        structure: UnitType,
        key: RequestKey,
        placement: Placement,
        worker_near: Vec2,
    ) -> Result<(), Skip> {
        if self.pending.is_pending(key) {
            return Err(Skip::AlreadyPending);
        }
        let cost = structure.cost();
        if !self.ledger.can_afford(cost) {
            return Err(Skip::Unaffordable);
        }
        let worker = self
            .select_build_worker(worker_near)
            .ok_or(Skip::NoAvailableWorker)?;
        self.ledger.reserve(cost)?;

        let baseline = self.snapshot.count_all(structure);
        self.pending.insert(key, self.tick(), baseline);
        self.issue(
            policy,
            Command::Build {
                worker: worker.id,
                structure,
                placement,
            },
        );
        Ok(())
    }

    /// Hand the batch to the caller
    pub fn finish(self) -> Vec<Command> {
        tracing::trace!(
            tick = self.tick(),
            commands = self.commands.len(),
            reserved = ?self.ledger.reserved(),
            "tick finished"
        );
        self.commands
    }
}
