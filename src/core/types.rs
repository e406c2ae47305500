//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Host-assigned identifier for a unit, structure, or resource node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// 2D position in map coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self { x: self.x / len, y: self.y / len }
        } else {
            Self::default()
        }
    }

    /// Step `distance` units from `self` toward `target`.
    ///
    /// Returns `self` unchanged when the two points coincide.
    pub fn towards(&self, target: &Self, distance: f32) -> Self {
        *self + (*target - *self).normalize() * distance
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

/// Price of a producible entity or action
///
/// `supply` is population consumed, checked separately from the two currencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub primary: u32,
    pub secondary: u32,
    pub supply: u32,
}

impl Cost {
    pub const fn new(primary: u32, secondary: u32, supply: u32) -> Self {
        Self {
            primary,
            secondary,
            supply,
        }
    }

    pub const fn free() -> Self {
        Self::new(0, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_towards_moves_fixed_distance() {
        let base = Vec2::new(10.0, 10.0);
        let center = Vec2::new(10.0, 50.0);
        let p = base.towards(&center, 6.0);
        assert!((p.x - 10.0).abs() < 0.001);
        assert!((p.y - 16.0).abs() < 0.001);
    }

    #[test]
    fn test_towards_same_point_is_identity() {
        let p = Vec2::new(5.0, 5.0);
        assert_eq!(p.towards(&p, 6.0), p);
    }

    #[test]
    fn test_entity_id_ordering() {
        assert!(EntityId(1) < EntityId(2));
        assert_eq!(EntityId(7), EntityId(7));
    }
}
