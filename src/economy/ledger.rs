//! Resource ledger - the in-tick working balance
//!
//! Opened from the snapshot's resource totals at tick start. Each sub-policy
//! reserves through it before emitting a command, so later sub-policies in
//! the same tick see what is actually left.

use serde::{Deserialize, Serialize};

use crate::core::error::Skip;
use crate::core::types::Cost;

/// Resource totals and supply as reported by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    pub primary: u32,
    pub secondary: u32,
    pub supply_used: u32,
    pub supply_cap: u32,
}

impl ResourceState {
    pub fn new(primary: u32, secondary: u32, supply_used: u32, supply_cap: u32) -> Self {
        Self {
            primary,
            secondary,
            supply_used,
            supply_cap,
        }
    }

    pub fn supply_left(&self) -> u32 {
        self.supply_cap.saturating_sub(self.supply_used)
    }
}

/// Working balance for one tick
///
/// Reservations are all-or-nothing and are never rolled back within the tick.
#[derive(Debug, Clone)]
pub struct ResourceLedger {
    balance: ResourceState,
    reserved: Cost,
}

impl ResourceLedger {
    pub fn open(state: ResourceState) -> Self {
        Self {
            balance: state,
            reserved: Cost::free(),
        }
    }

    /// Both currencies cover the cost; supply is checked separately
    pub fn can_afford(&self, cost: Cost) -> bool {
        self.balance.primary >= cost.primary && self.balance.secondary >= cost.secondary
    }

    pub fn has_supply(&self, supply: u32) -> bool {
        self.supply_left() >= supply
    }

    pub fn supply_left(&self) -> u32 {
        self.balance.supply_left()
    }

    /// Take the full cost out of the working balance, or nothing at all
    pub fn reserve(&mut self, cost: Cost) -> Result<(), Skip> {
        if !self.can_afford(cost) {
            return Err(Skip::Unaffordable);
        }
        if !self.has_supply(cost.supply) {
            return Err(Skip::SupplyBlocked);
        }

        self.balance.primary -= cost.primary;
        self.balance.secondary -= cost.secondary;
        self.balance.supply_used += cost.supply;

        self.reserved.primary += cost.primary;
        self.reserved.secondary += cost.secondary;
        self.reserved.supply += cost.supply;
        Ok(())
    }

    /// What is left after this tick's reservations
    pub fn balance(&self) -> ResourceState {
        self.balance
    }

    /// Sum of this tick's reservations
    pub fn reserved(&self) -> Cost {
        self.reserved
    }
}
