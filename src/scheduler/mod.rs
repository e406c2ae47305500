//! Action scheduler - runs the sub-policy chain once per tick
//!
//! Architecture: trait + explicit context
//! - `SubPolicy` is the interface every decision component implements
//! - `MatchContext` owns everything that persists between ticks
//! - `TickContext` borrows it for one tick and collects the command batch

pub mod context;
pub mod log;

pub use context::TickContext;
pub use log::{DecisionLog, DecisionOutcome, DecisionRecord};

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::ability::AbilityAllocator;
use crate::combat::{CombatDirector, CombatState, StrikePolicy};
use crate::command::Command;
use crate::construction::{ConstructionPlanner, PendingRequestSet};
use crate::core::config::BotConfig;
use crate::core::error::{BotError, Result};
use crate::core::types::Tick;
use crate::economy::EconomyManager;
use crate::world::snapshot::{MatchOutcome, WorldSnapshot};

/// One decision component in the per-tick chain
pub trait SubPolicy {
    fn name(&self) -> &'static str;

    /// Read the snapshot, reserve through the ledger, issue commands
    fn run(&mut self, cx: &mut TickContext<'_>);
}

/// Everything that outlives a single tick
#[derive(Debug, Clone)]
pub struct MatchContext {
    config: BotConfig,
    pending: PendingRequestSet,
    rng: ChaCha8Rng,
    log: DecisionLog,
    economy: EconomyManager,
    abilities: AbilityAllocator,
    combat: CombatDirector,
    construction: ConstructionPlanner,
    ticks_seen: u64,
    last_tick: Option<Tick>,
    issued: AHashMap<&'static str, u64>,
    outcome: Option<MatchOutcome>,
    ended: bool,
}

impl MatchContext {
    fn new(config: BotConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            pending: PendingRequestSet::new(),
            rng,
            log: DecisionLog::new(),
            economy: EconomyManager::new(),
            abilities: AbilityAllocator::new(),
            combat: CombatDirector::new(),
            construction: ConstructionPlanner::new(),
            ticks_seen: 0,
            last_tick: None,
            issued: AHashMap::new(),
            outcome: None,
            ended: false,
        }
    }

    fn run_tick(&mut self, snapshot: &WorldSnapshot) -> Vec<Command> {
        if self.ended {
            return Vec::new();
        }
        if let Some(outcome) = snapshot.outcome {
            self.finish(Some(outcome));
            return Vec::new();
        }

        self.pending.reconcile(
            snapshot,
            self.config.pending_timeout_ticks,
            self.config.extractor_claim_radius,
        );

        let mut cx = TickContext::new(
            snapshot,
            &self.config,
            &mut self.pending,
            &mut self.rng,
            &mut self.log,
        );
        let chain: [&mut dyn SubPolicy; 4] = [
            &mut self.economy,
            &mut self.abilities,
            &mut self.combat,
            &mut self.construction,
        ];
        for policy in chain {
            tracing::trace!(tick = snapshot.tick, policy = policy.name(), "run");
            policy.run(&mut cx);
        }
        let commands = cx.finish();

        if self.last_tick != Some(snapshot.tick) {
            self.ticks_seen += 1;
            self.last_tick = Some(snapshot.tick);
        }
        for command in &commands {
            *self.issued.entry(command.kind_name()).or_insert(0) += 1;
        }
        commands
    }

    fn finish(&mut self, outcome: Option<MatchOutcome>) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.outcome = outcome;
        let total: u64 = self.issued.values().sum();
        tracing::info!(
            ?outcome,
            ticks = self.ticks_seen,
            commands = total,
            "match ended"
        );
    }

    fn report(&self) -> MatchReport {
        let mut issued: Vec<(String, u64)> = self
            .issued
            .iter()
            .map(|(kind, count)| (kind.to_string(), *count))
            .collect();
        issued.sort();
        MatchReport {
            outcome: self.outcome,
            ticks_seen: self.ticks_seen,
            issued,
            strikes: self.combat.history().to_vec(),
            decisions: self.log.clone(),
        }
    }
}

/// Final bookkeeping handed to whoever records match outcomes
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub outcome: Option<MatchOutcome>,
    pub ticks_seen: u64,
    /// Commands issued per kind, sorted by kind
    pub issued: Vec<(String, u64)>,
    pub strikes: Vec<(Tick, StrikePolicy)>,
    pub decisions: DecisionLog,
}

/// Entry point the host calls once per simulation tick
#[derive(Debug, Clone)]
pub struct ActionScheduler {
    context: MatchContext,
}

impl ActionScheduler {
    pub fn new(config: BotConfig) -> Result<Self> {
        config.validate().map_err(BotError::InvalidConfig)?;
        Ok(Self {
            context: MatchContext::new(config),
        })
    }

    /// Run the full chain and commit its state changes
    pub fn step(&mut self, snapshot: &WorldSnapshot) -> Vec<Command> {
        self.context.run_tick(snapshot)
    }

    /// Commands `step` would return right now, without committing anything
    pub fn preview(&self, snapshot: &WorldSnapshot) -> Vec<Command> {
        self.context.clone().run_tick(snapshot)
    }

    /// Stop issuing commands and export what was decided
    pub fn end_match(&mut self, outcome: Option<MatchOutcome>) -> MatchReport {
        self.context.finish(outcome);
        self.context.report()
    }

    pub fn is_finished(&self) -> bool {
        self.context.ended
    }

    pub fn config(&self) -> &BotConfig {
        &self.context.config
    }

    pub fn pending(&self) -> &PendingRequestSet {
        &self.context.pending
    }

    pub fn combat_state(&self) -> CombatState {
        self.context.combat.state()
    }

    pub fn strike_history(&self) -> &[(Tick, StrikePolicy)] {
        self.context.combat.history()
    }

    pub fn log(&self) -> &DecisionLog {
        &self.context.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::world::builder::SnapshotBuilder;
    use crate::world::catalog::UnitType;

    #[test]
    fn test_invalid_config_rejected() {
        let config = BotConfig {
            cooldown_min: 10,
            cooldown_max: 5,
            ..BotConfig::default()
        };
        assert!(matches!(
            ActionScheduler::new(config),
            Err(BotError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_outcome_stops_commands() {
        let mut scheduler = ActionScheduler::new(BotConfig::default()).unwrap();
        let mut builder = SnapshotBuilder::new();
        builder.resources(1000, 0);
        builder.unit(UnitType::Nexus, Vec2::new(20.0, 20.0));
        assert!(!scheduler.step(&builder.build()).is_empty());

        builder.tick(1).outcome(MatchOutcome::Victory);
        assert!(scheduler.step(&builder.build()).is_empty());
        assert!(scheduler.is_finished());

        let report = scheduler.end_match(None);
        assert_eq!(report.outcome, Some(MatchOutcome::Victory));
        assert_eq!(report.ticks_seen, 1);
    }

    #[test]
    fn test_report_counts_by_kind() {
        let mut scheduler = ActionScheduler::new(BotConfig::default()).unwrap();
        let mut builder = SnapshotBuilder::new();
        builder.resources(1000, 0);
        builder.unit(UnitType::Nexus, Vec2::new(20.0, 20.0));
        builder.unit(UnitType::Nexus, Vec2::new(80.0, 20.0));
        scheduler.step(&builder.build());

        let report = scheduler.end_match(Some(MatchOutcome::Tie));
        assert!(report.issued.contains(&("train".to_string(), 2)));
        assert!(!report.decisions.is_empty());
    }
}
