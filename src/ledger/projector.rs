use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::accrual::CycleWindow;
use crate::decimal::Money;
use crate::ledger::LedgerEntry;

/// summed ledger figures for one loan
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub collected: Money,
    pub asal: Money,
    pub interest: Money,
    pub entries: u32,
}

/// folds a loan's ledger over its principal
///
/// this fold is the single source of truth for the remaining balance:
/// `principal − Σ asal_amount`. every derived figure is recomputed from
/// here, never adjusted in place.
pub struct Projector<'a> {
    principal: Money,
    entries: &'a [LedgerEntry],
}

impl<'a> Projector<'a> {
    pub fn new(principal: Money, entries: &'a [LedgerEntry]) -> Self {
        Self { principal, entries }
    }

    /// remaining balance over the whole ledger, never negative
    pub fn balance(&self) -> Money {
        let mut asal = Money::ZERO;
        for entry in self.entries {
            asal += entry.asal_amount;
        }
        (self.principal - asal).max(Money::ZERO)
    }

    /// remaining balance considering only entries dated before `day`
    pub fn balance_before(&self, day: NaiveDate) -> Money {
        let mut asal = Money::ZERO;
        for entry in self.entries {
            if entry.recorded_on() < day {
                asal += entry.asal_amount;
            }
        }
        (self.principal - asal).max(Money::ZERO)
    }

    /// principal collected on or before `day`
    pub fn collected_through(&self, day: NaiveDate) -> Money {
        let mut asal = Money::ZERO;
        for entry in self.entries {
            if entry.recorded_on() <= day {
                asal += entry.asal_amount;
            }
        }
        asal
    }

    pub fn totals(&self) -> LedgerTotals {
        let mut totals = LedgerTotals::default();
        for entry in self.entries {
            totals.collected += entry.amount;
            totals.asal += entry.asal_amount;
            totals.interest += entry.interest_amount;
            totals.entries += 1;
        }
        totals
    }

    /// whether an interest-bearing entry sits inside the cycle window
    pub fn interest_collected_in(&self, window: &CycleWindow) -> bool {
        self.entries
            .iter()
            .any(|e| e.carries_interest() && window.contains(e.recorded_on()))
    }

    /// most recent entry by record time
    pub fn last_entry(&self) -> Option<&LedgerEntry> {
        self.entries.iter().max_by_key(|e| e.recorded_at)
    }

    pub fn is_cleared(&self) -> bool {
        self.balance().is_zero()
    }
}
