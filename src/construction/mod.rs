//! Construction - build triggers, tech chain, and army production

pub mod army;
pub mod pending;
pub mod planner;
pub mod tech;

pub use pending::{PendingRequestSet, RequestKey};
pub use planner::ConstructionPlanner;
pub use tech::{Prerequisite, TechTier, TierStatus};
