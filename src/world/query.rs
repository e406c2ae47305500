//! Lazy query adapters over snapshot iterators
//!
//! `snapshot.of_type(Nexus).ready().idle()` reads like the host's own query
//! API but is just a chain of iterator filters over borrowed data.

use ordered_float::OrderedFloat;

use crate::core::types::{EntityId, Vec2};
use crate::world::catalog::UnitType;
use crate::world::snapshot::UnitView;

/// Anything with a map position and a stable id
pub trait Positioned {
    fn position(&self) -> Vec2;
    fn id(&self) -> EntityId;
}

impl<T: Positioned + ?Sized> Positioned for &T {
    fn position(&self) -> Vec2 {
        (**self).position()
    }
    fn id(&self) -> EntityId {
        (**self).id()
    }
}

/// Distance filters for any iterator of positioned things
pub trait SpatialQuery: Iterator + Sized
where
    Self::Item: Positioned,
{
    /// Strictly inside `radius` of `point`
    fn closer_than(self, radius: f32, point: Vec2) -> impl Iterator<Item = Self::Item> {
        self.filter(move |e| e.position().distance(&point) < radius)
    }

    /// Nearest to `point`; equal distances go to the lower id
    fn closest_to(self, point: Vec2) -> Option<Self::Item> {
        self.min_by_key(|e| (OrderedFloat(e.position().distance(&point)), e.id()))
    }

    /// Everything, nearest first, with the same tie-break as `closest_to`
    fn sorted_by_distance(self, point: Vec2) -> Vec<Self::Item> {
        let mut items: Vec<Self::Item> = self.collect();
        items.sort_by_key(|e| (OrderedFloat(e.position().distance(&point)), e.id()));
        items
    }
}

impl<I> SpatialQuery for I
where
    I: Iterator,
    I::Item: Positioned,
{
}

/// State filters for owned units
pub trait UnitQuery<'a>: Iterator<Item = &'a UnitView> + Sized {
    fn of_type(self, kind: UnitType) -> impl Iterator<Item = &'a UnitView> {
        self.filter(move |u| u.kind == kind)
    }

    fn ready(self) -> impl Iterator<Item = &'a UnitView> {
        self.filter(|u| u.is_ready())
    }

    fn idle(self) -> impl Iterator<Item = &'a UnitView> {
        self.filter(|u| u.is_idle())
    }
}

impl<'a, I> UnitQuery<'a> for I where I: Iterator<Item = &'a UnitView> {}
