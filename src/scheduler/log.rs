//! Decision log - what each sub-policy did, tick by tick

use serde::Serialize;

use crate::command::Command;
use crate::core::error::Skip;
use crate::core::types::Tick;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DecisionOutcome {
    Issued(Command),
    Skipped(Skip),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecisionRecord {
    pub tick: Tick,
    pub policy: &'static str,
    pub outcome: DecisionOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DecisionLog {
    records: Vec<DecisionRecord>,
}

impl DecisionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issued(&mut self, tick: Tick, policy: &'static str, command: Command) {
        self.records.push(DecisionRecord {
            tick,
            policy,
            outcome: DecisionOutcome::Issued(command),
        });
    }

    pub fn skipped(&mut self, tick: Tick, policy: &'static str, reason: Skip) {
        self.records.push(DecisionRecord {
            tick,
            policy,
            outcome: DecisionOutcome::Skipped(reason),
        });
    }

    pub fn records(&self) -> &[DecisionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records for a single tick, in issue order
    pub fn for_tick(&self, tick: Tick) -> impl Iterator<Item = &DecisionRecord> {
        self.records.iter().filter(move |r| r.tick == tick)
    }

    /// Skips a policy recorded on a tick
    pub fn skips(&self, tick: Tick, policy: &str) -> Vec<Skip> {
        self.for_tick(tick)
            .filter(|r| r.policy == policy)
            .filter_map(|r| match r.outcome {
                DecisionOutcome::Skipped(skip) => Some(skip),
                DecisionOutcome::Issued(_) => None,
            })
            .collect()
    }
}
