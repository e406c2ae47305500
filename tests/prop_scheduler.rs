//! Property-based tests for the ledger and the per-tick scheduler.
//!
//! Random snapshots go through a full tick; whatever the chain decides has
//! to fit inside the balance it started with, and no structure request may
//! be in flight twice.

use proptest::prelude::*;

use megladon::command::{Command, Placement};
use megladon::core::config::BotConfig;
use megladon::core::types::{Cost, Vec2};
use megladon::economy::ledger::{ResourceLedger, ResourceState};
use megladon::scheduler::ActionScheduler;
use megladon::world::builder::SnapshotBuilder;
use megladon::world::catalog::{AbilityId, UnitType, UpgradeId};
use megladon::world::snapshot::{OrderKind, WorldSnapshot};

#[derive(Debug, Clone)]
struct Scenario {
    tick: u64,
    primary: u32,
    secondary: u32,
    supply_cap: u32,
    supply_used: u32,
    bases: usize,
    probes: usize,
    gateways: usize,
    warp_gates: usize,
    stargates: usize,
    zealots: usize,
    geysers: usize,
    sites: usize,
    enemies: usize,
    pylon: bool,
    core: bool,
    warp: bool,
    seed: u64,
}

fn scenario() -> impl Strategy<Value = Scenario> {
    (
        (0u64..3000, 0u32..2000, 0u32..800, 10u32..=200),
        (0usize..4, 0usize..20, 0usize..4, 0usize..3, 0usize..2, 0usize..6),
        (0usize..3, 0usize..3, 0usize..12),
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<u64>()),
        0.0f64..=1.0,
    )
        .prop_map(
            |(
                (tick, primary, secondary, supply_cap),
                (bases, probes, gateways, warp_gates, stargates, zealots),
                (geysers, sites, enemies),
                (pylon, core, warp, seed),
                used_frac,
            )| Scenario {
                tick,
                primary,
                secondary,
                supply_cap,
                supply_used: (supply_cap as f64 * used_frac) as u32,
                bases,
                probes,
                gateways,
                warp_gates,
                stargates,
                zealots,
                geysers,
                sites,
                enemies,
                pylon,
                core,
                warp,
                seed,
            },
        )
}

fn build(s: &Scenario) -> WorldSnapshot {
    let mut builder = SnapshotBuilder::new();
    builder
        .tick(s.tick)
        .resources(s.primary, s.secondary)
        .supply(s.supply_used, s.supply_cap);
    if s.warp {
        builder.upgrade(UpgradeId::WarpGateResearch);
    }

    let mut mineral = None;
    for i in 0..s.bases {
        let base = Vec2::new(20.0 + 50.0 * i as f32, 20.0);
        let nexus = builder.unit(UnitType::Nexus, base);
        nexus.energy = 60.0;
        nexus.ideal_harvesters = 16;
        nexus.assigned_harvesters = (s.probes / s.bases) as u32;
        mineral = Some(builder.mineral(base + Vec2::new(0.0, 7.0)));
    }
    for i in 0..s.geysers {
        builder.geyser(Vec2::new(27.0, 14.0 + 6.0 * i as f32));
    }
    for i in 0..s.sites {
        builder.expansion_site(Vec2::new(60.0 + 40.0 * i as f32, 80.0));
    }

    for i in 0..s.probes {
        let probe = builder.unit(UnitType::Probe, Vec2::new(20.0 + i as f32 * 0.5, 24.0));
        if let (Some(node), true) = (mineral, i % 2 == 0) {
            probe.orders.push(OrderKind::Gather(node));
        }
    }
    if s.pylon {
        builder.unit(UnitType::Pylon, Vec2::new(30.0, 30.0));
    }
    if s.core {
        builder.unit(UnitType::CyberneticsCore, Vec2::new(34.0, 30.0));
    }
    builder.units(UnitType::Gateway, Vec2::new(34.0, 34.0), s.gateways);
    for _ in 0..s.warp_gates {
        builder
            .unit(UnitType::WarpGate, Vec2::new(38.0, 34.0))
            .abilities
            .push(AbilityId::WarpIn);
    }
    builder.units(UnitType::Stargate, Vec2::new(42.0, 34.0), s.stargates);
    builder.units(UnitType::Zealot, Vec2::new(50.0, 50.0), s.zealots);
    for i in 0..s.enemies {
        builder.enemy_unit(Vec2::new(24.0 + i as f32, 18.0));
    }
    builder.enemy_start(Vec2::new(180.0, 180.0));
    builder.build()
}

fn spent(commands: &[Command]) -> Cost {
    let mut total = Cost::free();
    for command in commands {
        let cost = match command {
            Command::Train { unit, .. } | Command::WarpIn { unit, .. } => unit.cost(),
            Command::Build { structure, .. } => structure.cost(),
            Command::Research { upgrade, .. } => upgrade.cost(),
            _ => Cost::free(),
        };
        total.primary += cost.primary;
        total.secondary += cost.secondary;
        total.supply += cost.supply;
    }
    total
}

/// Build requests as (structure, node for extractors)
fn requests(commands: &[Command]) -> Vec<(UnitType, Option<u64>)> {
    commands
        .iter()
        .filter_map(|c| match c {
            Command::Build {
                structure,
                placement,
                ..
            } => {
                let node = match placement {
                    Placement::OnNode(id) => Some(id.0),
                    Placement::Near(_) => None,
                };
                Some((*structure, node))
            }
            _ => None,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Reservations never take more than the balance holds.
    #[test]
    fn prop_ledger_never_overdraws(
        primary in 0u32..2000,
        secondary in 0u32..800,
        cap in 0u32..=200,
        used_frac in 0.0f64..=1.0,
        costs in prop::collection::vec((0u32..500, 0u32..300, 0u32..6), 0..30)
    ) {
        let used = (cap as f64 * used_frac) as u32;
        let mut ledger = ResourceLedger::open(ResourceState::new(primary, secondary, used, cap));

        for (p, s, supply) in costs {
            let before = ledger.balance();
            let cost = Cost::new(p, s, supply);
            match ledger.reserve(cost) {
                Ok(()) => {
                    prop_assert_eq!(ledger.balance().primary, before.primary - p);
                    prop_assert_eq!(ledger.balance().secondary, before.secondary - s);
                }
                Err(_) => prop_assert_eq!(ledger.balance(), before),
            }
            prop_assert!(ledger.balance().supply_used <= cap);
        }

        let reserved = ledger.reserved();
        prop_assert_eq!(reserved.primary + ledger.balance().primary, primary);
        prop_assert_eq!(reserved.secondary + ledger.balance().secondary, secondary);
    }

    /// One tick never commits more than the snapshot's balance.
    #[test]
    fn prop_tick_spends_within_balance(s in scenario()) {
        let snapshot = build(&s);
        let config = BotConfig { seed: s.seed, ..BotConfig::default() };
        let mut bot = ActionScheduler::new(config).unwrap();

        let commands = bot.step(&snapshot);
        let cost = spent(&commands);
        prop_assert!(cost.primary <= s.primary);
        prop_assert!(cost.secondary <= s.secondary);
        prop_assert!(cost.supply <= snapshot.resources.supply_left());
    }

    /// No structure is requested twice while the host has not acted on it.
    #[test]
    fn prop_no_duplicate_requests(s in scenario()) {
        let first = build(&s);
        let mut second = first.clone();
        second.tick += 1;

        let config = BotConfig { seed: s.seed, ..BotConfig::default() };
        let mut bot = ActionScheduler::new(config).unwrap();
        let mut seen = requests(&bot.step(&first));

        let mut within = seen.clone();
        within.sort();
        within.dedup();
        prop_assert_eq!(within.len(), seen.len());

        for request in requests(&bot.step(&second)) {
            prop_assert!(!seen.contains(&request), "reissued {:?}", request);
            seen.push(request);
        }
    }

    /// The dry run always agrees with the committed step.
    #[test]
    fn prop_preview_matches_step(s in scenario()) {
        let snapshot = build(&s);
        let config = BotConfig { seed: s.seed, ..BotConfig::default() };
        let mut bot = ActionScheduler::new(config).unwrap();

        let preview = bot.preview(&snapshot);
        prop_assert_eq!(bot.preview(&snapshot), preview.clone());
        prop_assert_eq!(bot.step(&snapshot), preview);
    }
}
