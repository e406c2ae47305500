//! Combat director - what the idle army does next
//!
//! Holds for a random cooldown, then draws one of four policies each tick
//! until a Hold comes up again. A strike sends every idle army unit at a
//! single shared target.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::command::{Command, Target};
use crate::core::config::BotConfig;
use crate::core::error::Skip;
use crate::core::types::Tick;
use crate::scheduler::context::TickContext;
use crate::scheduler::SubPolicy;
use crate::world::catalog::UnitType;
use crate::world::query::{SpatialQuery, UnitQuery};
use crate::world::snapshot::{UnitView, WorldSnapshot};

const POLICY: &str = "combat";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrikePolicy {
    Hold,
    StrikeNearBase,
    StrikeStructure,
    StrikeEnemyStart,
}

impl StrikePolicy {
    /// Draw order, matching `PolicyWeights::as_array`
    pub const ALL: [StrikePolicy; 4] = [
        StrikePolicy::Hold,
        StrikePolicy::StrikeNearBase,
        StrikePolicy::StrikeStructure,
        StrikePolicy::StrikeEnemyStart,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatState {
    /// Do nothing until the tick passes `until`
    Holding { until: Tick },
    /// Draw a policy this tick
    Deciding,
}

#[derive(Debug, Clone)]
pub struct CombatDirector {
    state: CombatState,
    /// Policy drawn on the most recent deciding tick
    last_draw: Option<(Tick, StrikePolicy)>,
    history: Vec<(Tick, StrikePolicy)>,
}

impl Default for CombatDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatDirector {
    pub fn new() -> Self {
        Self {
            state: CombatState::Holding { until: 0 },
            last_draw: None,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    /// Every policy drawn so far, oldest first
    pub fn history(&self) -> &[(Tick, StrikePolicy)] {
        &self.history
    }

    /// Advance the state machine; `Some` when a policy is in force this tick
    ///
    /// Calling twice on the same tick returns the first draw instead of
    /// drawing again.
    pub fn decide(
        &mut self,
        tick: Tick,
        config: &BotConfig,
        rng: &mut ChaCha8Rng,
    ) -> Option<StrikePolicy> {
        if let Some((drawn_at, policy)) = self.last_draw {
            if drawn_at == tick {
                return Some(policy);
            }
        }

        if let CombatState::Holding { until } = self.state {
            if tick <= until {
                return None;
            }
            self.state = CombatState::Deciding;
        }

        let policy = draw_policy(config, rng);
        self.last_draw = Some((tick, policy));
        self.history.push((tick, policy));

        if policy == StrikePolicy::Hold {
            let wait = rng.gen_range(config.cooldown_min..=config.cooldown_max);
            self.state = CombatState::Holding { until: tick + wait };
            tracing::debug!(tick, until = tick + wait, "army holding");
        }
        Some(policy)
    }
}

fn draw_policy(config: &BotConfig, rng: &mut ChaCha8Rng) -> StrikePolicy {
    match WeightedIndex::new(config.policy_weights.as_array()) {
        Ok(dist) => StrikePolicy::ALL[dist.sample(rng)],
        // Rejected by config validation; hold rather than panic
        Err(_) => StrikePolicy::Hold,
    }
}

/// The single target a strike policy points the army at
pub fn select_target(
    policy: StrikePolicy,
    snapshot: &WorldSnapshot,
    rng: &mut ChaCha8Rng,
) -> Result<Target, Skip> {
    let enemy = &snapshot.enemy;
    match policy {
        StrikePolicy::Hold => Err(Skip::NoEligibleTarget),
        StrikePolicy::StrikeNearBase => {
            if enemy.units.is_empty() {
                return Err(Skip::NoEligibleTarget);
            }
            let bases: Vec<&UnitView> = snapshot.of_type(UnitType::Nexus).collect();
            let base = bases.choose(rng).ok_or(Skip::NoEligibleTarget)?;
            enemy
                .units
                .iter()
                .closest_to(base.position)
                .map(|e| Target::Unit(e.id))
                .ok_or(Skip::NoEligibleTarget)
        }
        StrikePolicy::StrikeStructure => enemy
            .structures
            .choose(rng)
            .map(|s| Target::Unit(s.id))
            .ok_or(Skip::NoEligibleTarget),
        StrikePolicy::StrikeEnemyStart => enemy
            .start_locations
            .first()
            .map(|p| Target::Position(*p))
            .ok_or(Skip::NoEligibleTarget),
    }
}

impl SubPolicy for CombatDirector {
    fn name(&self) -> &'static str {
        POLICY
    }

    fn run(&mut self, cx: &mut TickContext<'_>) {
        let snapshot = cx.snapshot;
        let idle_army: Vec<&UnitView> = snapshot
            .army()
            .ready()
            .idle()
            .filter(|u| !cx.is_claimed(u.id))
            .collect();
        if idle_army.is_empty() {
            return;
        }

        let Some(policy) = self.decide(cx.tick(), cx.config, cx.rng) else {
            return;
        };
        if policy == StrikePolicy::Hold {
            return;
        }

        match select_target(policy, snapshot, cx.rng) {
            Ok(target) => {
                tracing::debug!(
                    tick = cx.tick(),
                    ?policy,
                    ?target,
                    units = idle_army.len(),
                    "strike"
                );
                for unit in idle_army {
                    cx.issue(POLICY, Command::Attack { unit: unit.id, target });
                }
            }
            Err(reason) => cx.skip(POLICY, reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PolicyWeights;
    use rand::SeedableRng;

    fn only(policy: StrikePolicy) -> BotConfig {
        let mut weights = PolicyWeights {
            hold: 0,
            strike_near_base: 0,
            strike_structure: 0,
            strike_enemy_start: 0,
        };
        match policy {
            StrikePolicy::Hold => weights.hold = 1,
            StrikePolicy::StrikeNearBase => weights.strike_near_base = 1,
            StrikePolicy::StrikeStructure => weights.strike_structure = 1,
            StrikePolicy::StrikeEnemyStart => weights.strike_enemy_start = 1,
        }
        BotConfig {
            policy_weights: weights,
            ..BotConfig::default()
        }
    }

    #[test]
    fn test_holding_until_cooldown_passes() {
        let config = only(StrikePolicy::StrikeEnemyStart);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut director = CombatDirector::new();
        director.state = CombatState::Holding { until: 50 };

        assert_eq!(director.decide(50, &config, &mut rng), None);
        assert_eq!(
            director.decide(51, &config, &mut rng),
            Some(StrikePolicy::StrikeEnemyStart)
        );
        assert_eq!(director.state(), CombatState::Deciding);
    }

    #[test]
    fn test_hold_sets_cooldown_in_range() {
        let config = only(StrikePolicy::Hold);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut director = CombatDirector::new();

        assert_eq!(director.decide(10, &config, &mut rng), Some(StrikePolicy::Hold));
        match director.state() {
            CombatState::Holding { until } => {
                assert!(until >= 10 + config.cooldown_min);
                assert!(until <= 10 + config.cooldown_max);
            }
            CombatState::Deciding => panic!("hold should start a cooldown"),
        }
    }

    #[test]
    fn test_same_tick_does_not_redraw() {
        let config = BotConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut director = CombatDirector::new();

        let first = director.decide(5, &config, &mut rng);
        let second = director.decide(5, &config, &mut rng);
        assert_eq!(first, second);
        assert_eq!(director.history().len(), 1);
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let config = BotConfig {
            cooldown_min: 0,
            cooldown_max: 0,
            ..BotConfig::default()
        };
        let run = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut director = CombatDirector::new();
            (1..40)
                .filter_map(|t| director.decide(t, &config, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(77), run(77));
        assert!(!run(77).is_empty());
    }

    #[test]
    fn test_enemy_start_needs_no_intel_beyond_start() {
        let mut snapshot = WorldSnapshot::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            select_target(StrikePolicy::StrikeEnemyStart, &snapshot, &mut rng),
            Err(Skip::NoEligibleTarget)
        );
        snapshot.enemy.start_locations.push(crate::core::types::Vec2::new(150.0, 150.0));
        assert!(matches!(
            select_target(StrikePolicy::StrikeEnemyStart, &snapshot, &mut rng),
            Ok(Target::Position(_))
        ));
    }
}
