//! Bot configuration with documented constants
//!
//! Every threshold the decision core uses lives here. A config is fixed at
//! match start and owned by the match context; nothing reads it globally.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{BotError, Result};
use crate::core::types::Tick;

/// Relative weights of the four idle-army policies
///
/// Equal weights give the uniform draw. A zero weight disables a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyWeights {
    pub hold: u32,
    pub strike_near_base: u32,
    pub strike_structure: u32,
    pub strike_enemy_start: u32,
}

impl Default for PolicyWeights {
    fn default() -> Self {
        Self {
            hold: 1,
            strike_near_base: 1,
            strike_structure: 1,
            strike_enemy_start: 1,
        }
    }
}

impl PolicyWeights {
    pub fn as_array(&self) -> [u32; 4] {
        [
            self.hold,
            self.strike_near_base,
            self.strike_structure,
            self.strike_enemy_start,
        ]
    }
}

/// Configuration for the decision core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Seed for the match random source (combat draws, gas-worker picks)
    pub seed: u64,

    // === ECONOMY ===
    /// Hard ceiling on worker count regardless of base count
    pub max_workers: u32,

    /// Workers wanted per owned base
    ///
    /// Target worker count is `min(max_workers, bases * workers_per_base)`.
    pub workers_per_base: u32,

    /// Extra workers a base keeps training past its ideal harvester count
    pub harvester_slack: u32,

    /// Idle workers within this distance of a base are put back to work there
    pub distribute_radius: f32,

    /// Mineral nodes within this distance belong to a base
    pub mineral_radius: f32,

    // === DEFENSE ===
    /// Enemies within this distance of a base count as a threat
    pub threat_radius: f32,

    /// Smallest enemy count that pulls workers off the line
    pub threat_band_min: u32,

    /// Largest enemy count workers still fight
    ///
    /// Above this the workers keep mining. That cutoff is kept on purpose.
    pub threat_band_max: u32,

    /// Workers pulled per threatening enemy
    pub defenders_per_enemy: u32,

    // === CONSTRUCTION ===
    /// Build a supply structure once supply left drops below this
    pub supply_low_water: u32,

    /// Population ceiling of the game; no supply structures past this cap
    pub max_supply: u32,

    /// Supply structures are placed this far from the base, toward map center
    pub supply_offset: f32,

    /// Geysers within this distance of a ready base are extractor candidates
    pub geyser_radius: f32,

    /// An extractor this close to a geyser claims it
    pub extractor_claim_radius: f32,

    /// Owned base count the expansion check stops at
    pub max_bases: u32,

    /// A site with any known base this close is not a free expansion
    pub expansion_clearance: f32,

    /// Host ticks per game minute, used for production scaling
    pub ticks_per_minute: u64,

    /// Minutes per additional tier-1 production structure
    ///
    /// `count_target = elapsed_ticks / (ticks_per_minute * k)`
    pub production_scaling_k: f64,

    /// How many tier-3 structures to keep
    pub advanced_target: u32,

    /// Army production needs at least this much supply left
    pub army_supply_headroom: u32,

    /// A request the host never confirms is forgotten after this many ticks
    pub pending_timeout_ticks: Tick,

    // === ABILITIES ===
    /// Energy a caster needs to cast the production boost
    pub boost_energy: f32,

    // === COMBAT ===
    /// Fewest ticks a Hold decision waits
    pub cooldown_min: Tick,

    /// Most ticks a Hold decision waits (inclusive)
    pub cooldown_max: Tick,

    /// Weights for the idle-army policy draw
    pub policy_weights: PolicyWeights,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            seed: 42,

            max_workers: 80,
            workers_per_base: 15,
            harvester_slack: 2,
            distribute_radius: 10.0,
            mineral_radius: 10.0,

            threat_radius: 15.0,
            threat_band_min: 1,
            threat_band_max: 8,
            defenders_per_enemy: 2,

            supply_low_water: 10,
            max_supply: 200,
            supply_offset: 6.0,
            geyser_radius: 25.0,
            extractor_claim_radius: 1.0,
            max_bases: 3,
            expansion_clearance: 6.0,
            ticks_per_minute: 165,
            production_scaling_k: 2.0,
            advanced_target: 1,
            army_supply_headroom: 2,
            pending_timeout_ticks: 400,

            boost_energy: 50.0,

            cooldown_min: 20,
            cooldown_max: 165,
            policy_weights: PolicyWeights::default(),
        }
    }
}

impl BotConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys take their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: BotConfig = toml::from_str(contents)?;
        config.validate().map_err(BotError::InvalidConfig)?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.threat_band_min == 0 {
            return Err("threat_band_min must be at least 1".into());
        }

        if self.threat_band_min > self.threat_band_max {
            return Err(format!(
                "threat_band_min ({}) should be <= threat_band_max ({})",
                self.threat_band_min, self.threat_band_max
            ));
        }

        if self.cooldown_min > self.cooldown_max {
            return Err(format!(
                "cooldown_min ({}) should be <= cooldown_max ({})",
                self.cooldown_min, self.cooldown_max
            ));
        }

        if self.policy_weights.as_array().iter().all(|w| *w == 0) {
            return Err("policy_weights must not all be zero".into());
        }

        let radii = [
            self.distribute_radius,
            self.mineral_radius,
            self.threat_radius,
            self.geyser_radius,
            self.extractor_claim_radius,
        ];
        if radii.iter().any(|r| *r <= 0.0) {
            return Err("Radii must be positive".into());
        }

        if self.ticks_per_minute == 0 || self.production_scaling_k <= 0.0 {
            return Err("ticks_per_minute and production_scaling_k must be positive".into());
        }

        Ok(())
    }
}
