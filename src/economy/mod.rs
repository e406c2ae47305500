//! Economy - resource ledger, worker production, harvester allocation

pub mod defense;
pub mod ledger;
pub mod workers;

pub use ledger::{ResourceLedger, ResourceState};

use crate::scheduler::context::TickContext;
use crate::scheduler::SubPolicy;

/// Keeps workers trained, mining, and defending the mineral line
///
/// Defense runs first so a worker pulled to fight is claimed before the
/// idle-worker pass could send it back to mining.
#[derive(Debug, Clone, Copy, Default)]
pub struct EconomyManager;

impl EconomyManager {
    pub fn new() -> Self {
        Self
    }
}

impl SubPolicy for EconomyManager {
    fn name(&self) -> &'static str {
        workers::POLICY
    }

    fn run(&mut self, cx: &mut TickContext<'_>) {
        defense::defend_bases(cx);
        workers::train_workers(cx);
        workers::distribute_workers(cx);
    }
}
