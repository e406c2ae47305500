//! Caster abilities

pub mod allocator;

pub use allocator::AbilityAllocator;
