//! Army production from idle production structures
//!
//! Once the warp upgrade lands, idle gateways convert instead of training,
//! and warp gates reinforce at a powered spot whenever their warp-in is off
//! cooldown.

use crate::command::{Command, Target};
use crate::core::error::Skip;
use crate::core::types::EntityId;
use crate::scheduler::context::TickContext;
use crate::world::catalog::{AbilityId, UnitType, UpgradeId};
use crate::world::query::{SpatialQuery, UnitQuery};

pub(crate) const POLICY: &str = "construction.army";

/// Train, convert, or warp in from every eligible production structure
///
/// Stops at the first structure that runs into supply or cost, so the
/// remaining balance carries over to the next tick untouched.
pub fn produce_army(cx: &mut TickContext<'_>) -> Result<(), Skip> {
    let snapshot = cx.snapshot;
    let warp_ready = snapshot.has_upgrade(UpgradeId::WarpGateResearch);

    for gateway in snapshot.of_type(UnitType::Gateway).ready().idle() {
        if cx.is_claimed(gateway.id) {
            continue;
        }
        if warp_ready {
            cx.issue(
                POLICY,
                Command::Cast {
                    caster: gateway.id,
                    ability: AbilityId::MorphWarpGate,
                    target: Target::Unit(gateway.id),
                },
            );
            continue;
        }
        train(cx, gateway.id, UnitType::Zealot)?;
    }

    let warp_gates: Vec<_> = snapshot
        .of_type(UnitType::WarpGate)
        .ready()
        .filter(|g| g.can_cast(AbilityId::WarpIn))
        .collect();
    for gate in warp_gates {
        if cx.is_claimed(gate.id) {
            continue;
        }
        let pylon = snapshot
            .of_type(UnitType::Pylon)
            .ready()
            .closest_to(gate.position)
            .ok_or(Skip::PrerequisiteMissing(UnitType::Pylon))?;
        reserve_army_unit(cx, UnitType::Zealot)?;
        cx.issue(
            POLICY,
            Command::WarpIn {
                gate: gate.id,
                unit: UnitType::Zealot,
                near: pylon.position,
            },
        );
    }

    for stargate in snapshot.of_type(UnitType::Stargate).ready().idle() {
        if cx.is_claimed(stargate.id) {
            continue;
        }
        train(cx, stargate.id, UnitType::VoidRay)?;
    }

    Ok(())
}

fn train(cx: &mut TickContext<'_>, producer: EntityId, unit: UnitType) -> Result<(), Skip> {
    reserve_army_unit(cx, unit)?;
    cx.issue(POLICY, Command::Train { producer, unit });
    Ok(())
}

fn reserve_army_unit(cx: &mut TickContext<'_>, unit: UnitType) -> Result<(), Skip> {
    if !cx.ledger.has_supply(cx.config.army_supply_headroom) {
        return Err(Skip::SupplyBlocked);
    }
    cx.ledger.reserve(unit.cost())
}
