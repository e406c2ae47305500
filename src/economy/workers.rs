//! Worker production and harvester distribution

use rand::seq::SliceRandom;

use crate::command::Command;
use crate::core::error::Skip;
use crate::scheduler::context::TickContext;
use crate::world::catalog::UnitType;
use crate::world::query::{SpatialQuery, UnitQuery};
use crate::world::snapshot::{OrderKind, UnitView};

pub(crate) const POLICY: &str = "economy";

/// Workers the economy is aiming for with the current base count
pub fn worker_target(ready_bases: usize, per_base: u32, max_workers: u32) -> u32 {
    let wanted = (ready_bases as u32).saturating_mul(per_base);
    wanted.min(max_workers)
}

/// Train workers from ready idle bases until the target is met
pub fn train_workers(cx: &mut TickContext<'_>) {
    let snapshot = cx.snapshot;
    let config = cx.config;

    let ready_bases = snapshot.of_type(UnitType::Nexus).ready().count();
    let target = worker_target(ready_bases, config.workers_per_base, config.max_workers);
    let in_training = snapshot
        .of_type(UnitType::Nexus)
        .filter(|b| b.is_training(UnitType::Probe))
        .count() as u32;
    let mut workers = snapshot.workers().count() as u32 + in_training;

    for base in snapshot.of_type(UnitType::Nexus).ready().idle() {
        if workers >= target {
            return;
        }
        if base.assigned_harvesters >= base.ideal_harvesters + config.harvester_slack {
            continue;
        }
        if let Err(reason) = cx.ledger.reserve(UnitType::Probe.cost()) {
            cx.skip(POLICY, reason);
            return;
        }
        cx.issue(
            POLICY,
            Command::Train {
                producer: base.id,
                unit: UnitType::Probe,
            },
        );
        workers += 1;
    }
}

/// Put idle workers back on minerals and top up extractors
pub fn distribute_workers(cx: &mut TickContext<'_>) {
    fill_extractors(cx);
    send_idle_to_minerals(cx);
}

/// Extractors under their ideal count pull free workers from nearby
///
/// Idle workers go first; mineral gatherers are used only when no idle
/// worker is in range.
fn fill_extractors(cx: &mut TickContext<'_>) {
    let snapshot = cx.snapshot;
    let range = cx.config.geyser_radius;

    for extractor in snapshot.of_type(UnitType::Assimilator).ready() {
        let deficit = extractor
            .ideal_harvesters
            .saturating_sub(extractor.assigned_harvesters) as usize;
        if deficit == 0 {
            continue;
        }

        let nearby: Vec<&UnitView> = snapshot
            .workers()
            .closer_than(range, extractor.position)
            .filter(|w| !cx.is_claimed(w.id))
            .collect();
        let idle: Vec<&UnitView> = nearby.iter().copied().filter(|w| w.is_idle()).collect();
        let pool: Vec<&UnitView> = if idle.is_empty() {
            nearby
                .into_iter()
                .filter(|w| match w.orders.first() {
                    Some(OrderKind::Gather(node)) => snapshot.is_mineral(*node),
                    _ => false,
                })
                .collect()
        } else {
            idle
        };

        let picked: Vec<&UnitView> = pool.choose_multiple(&mut *cx.rng, deficit).copied().collect();
        if picked.is_empty() {
            cx.skip(POLICY, Skip::NoAvailableWorker);
            continue;
        }
        for worker in picked {
            cx.issue(
                POLICY,
                Command::Gather {
                    unit: worker.id,
                    node: extractor.id,
                },
            );
        }
    }
}

/// Idle workers near a base mine the closest mineral of that base
fn send_idle_to_minerals(cx: &mut TickContext<'_>) {
    let snapshot = cx.snapshot;
    let config = cx.config;

    for base in snapshot.of_type(UnitType::Nexus).ready() {
        let minerals: Vec<_> = snapshot
            .minerals()
            .closer_than(config.mineral_radius, base.position)
            .collect();
        if minerals.is_empty() {
            continue;
        }

        let idle: Vec<&UnitView> = snapshot
            .workers()
            .idle()
            .closer_than(config.distribute_radius, base.position)
            .collect();
        for worker in idle {
            if cx.is_claimed(worker.id) {
                continue;
            }
            if let Some(node) = minerals.iter().copied().closest_to(worker.position) {
                cx.issue(
                    POLICY,
                    Command::Gather {
                        unit: worker.id,
                        node: node.id,
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_target_capped() {
        assert_eq!(worker_target(1, 15, 80), 15);
        assert_eq!(worker_target(2, 15, 80), 30);
        assert_eq!(worker_target(6, 15, 80), 80);
        assert_eq!(worker_target(0, 15, 80), 0);
    }
}
