//! Combat - idle-army policy selection and targeting

pub mod director;

pub use director::{select_target, CombatDirector, CombatState, StrikePolicy};
