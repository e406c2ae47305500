//! Megladon - Tick-bounded decision core for a real-time strategy bot

pub mod ability;
pub mod combat;
pub mod command;
pub mod construction;
pub mod core;
pub mod economy;
pub mod scheduler;
pub mod world;
