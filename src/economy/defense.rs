//! Worker self-defense against small raids
//!
//! When a handful of ground enemies walk into a mineral line, the nearest
//! workers are pulled to fight. Past `threat_band_max` enemies the workers
//! keep mining; pulling them against a real army only loses the economy.

use crate::command::{Command, Target};
use crate::core::error::Skip;
use crate::scheduler::context::TickContext;
use crate::world::catalog::UnitType;
use crate::world::query::{SpatialQuery, UnitQuery};
use crate::world::snapshot::{KnownEnemy, UnitView};

use super::workers::POLICY;

/// Threat classification for one base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatLevel {
    Clear,
    /// Inside the band: workers fight
    Raid(u32),
    /// Enemies present but fewer than the band minimum
    Minor(u32),
    /// Above the band: workers are left alone
    Overwhelming(u32),
}

pub fn classify(enemies: u32, band_min: u32, band_max: u32) -> ThreatLevel {
    if enemies == 0 {
        ThreatLevel::Clear
    } else if enemies > band_max {
        ThreatLevel::Overwhelming(enemies)
    } else if enemies >= band_min {
        ThreatLevel::Raid(enemies)
    } else {
        ThreatLevel::Minor(enemies)
    }
}

/// Pull or release defending workers at every ready base
pub fn defend_bases(cx: &mut TickContext<'_>) {
    let snapshot = cx.snapshot;
    let config = cx.config;

    for base in snapshot.of_type(UnitType::Nexus).ready() {
        let threats: Vec<&KnownEnemy> = snapshot
            .enemy
            .units
            .iter()
            .filter(|e| !e.flying)
            .closer_than(config.threat_radius, base.position)
            .collect();

        let level = classify(
            threats.len() as u32,
            config.threat_band_min,
            config.threat_band_max,
        );
        match level {
            ThreatLevel::Clear => release_defenders(cx, base),
            ThreatLevel::Raid(count) => pull_defenders(cx, base, &threats, count),
            ThreatLevel::Minor(_) => {}
            ThreatLevel::Overwhelming(count) => {
                tracing::debug!(
                    tick = cx.tick(),
                    base = ?base.id,
                    count,
                    "threat above band, workers keep mining"
                );
            }
        }
    }
}

fn pull_defenders(
    cx: &mut TickContext<'_>,
    base: &UnitView,
    threats: &[&KnownEnemy],
    count: u32,
) {
    let snapshot = cx.snapshot;
    let radius = cx.config.threat_radius;

    let near_base: Vec<&UnitView> = snapshot
        .workers()
        .closer_than(radius, base.position)
        .collect();
    let already = near_base.iter().filter(|w| w.is_only_attacking()).count() as u32;
    let wanted = count.saturating_mul(cx.config.defenders_per_enemy);
    let needed = wanted.saturating_sub(already) as usize;
    if needed == 0 {
        return;
    }

    // Nearest to the raid first
    let Some(raid_center) = threats.iter().copied().closest_to(base.position) else {
        return;
    };
    let candidates: Vec<&UnitView> = near_base
        .into_iter()
        .filter(|w| (w.is_idle() || w.is_gathering()) && !cx.is_claimed(w.id))
        .sorted_by_distance(raid_center.position);

    if candidates.is_empty() {
        cx.skip(POLICY, Skip::NoAvailableWorker);
        return;
    }

    for worker in candidates.into_iter().take(needed) {
        if let Some(enemy) = threats.iter().copied().closest_to(worker.position) {
            cx.issue(
                POLICY,
                Command::Attack {
                    unit: worker.id,
                    target: Target::Unit(enemy.id),
                },
            );
        }
    }
}

/// Workers whose only order is an attack go back to mining
fn release_defenders(cx: &mut TickContext<'_>, base: &UnitView) {
    let snapshot = cx.snapshot;
    let config = cx.config;

    let fighters: Vec<&UnitView> = snapshot
        .workers()
        .closer_than(config.threat_radius, base.position)
        .filter(|w| w.is_only_attacking() && !cx.is_claimed(w.id))
        .collect();
    if fighters.is_empty() {
        return;
    }

    let minerals: Vec<_> = snapshot
        .minerals()
        .closer_than(config.mineral_radius, base.position)
        .collect();
    for worker in fighters {
        match minerals.iter().copied().closest_to(worker.position) {
            Some(node) => cx.issue(
                POLICY,
                Command::Gather {
                    unit: worker.id,
                    node: node.id,
                },
            ),
            None => cx.skip(POLICY, Skip::NoEligibleTarget),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_band_edges() {
        assert_eq!(classify(0, 1, 8), ThreatLevel::Clear);
        assert_eq!(classify(1, 1, 8), ThreatLevel::Raid(1));
        assert_eq!(classify(8, 1, 8), ThreatLevel::Raid(8));
        assert_eq!(classify(9, 1, 8), ThreatLevel::Overwhelming(9));
    }

    #[test]
    fn test_below_band_min_is_ignored() {
        assert_eq!(classify(1, 2, 8), ThreatLevel::Minor(1));
    }
}
