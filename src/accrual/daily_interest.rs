use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accrual::calendar::elapsed_days;
use crate::decimal::{Money, Rate};

/// accrual position of a daily-interest loan as of a reference date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyInterestStatus {
    /// calendar days accruing since the last ledger entry re-anchored
    /// the clock (or since the start date on an untouched loan)
    pub days_accruing: u32,
    /// interest accrued over those days on the remaining principal
    pub accrued_interest: Money,
    /// carried shortfall from earlier underpayments plus fresh accrual
    pub total_pending_interest: Money,
    pub days_since_start: u32,
    /// loan life exceeded max_days with principal still outstanding
    pub is_overdue: bool,
    pub days_overdue: u32,
}

/// per-day accrual arithmetic for a daily-interest loan
pub struct DailyInterestEngine {
    rate: Rate,
    max_days: Option<u32>,
}

impl DailyInterestEngine {
    pub fn new(rate: Rate, max_days: Option<u32>) -> Self {
        Self { rate, max_days }
    }

    /// interest accrued on `remaining` over `days` calendar days
    pub fn accrued(&self, remaining: Money, days: u32) -> Money {
        Money::from_decimal(remaining.as_decimal() * self.rate.as_decimal() * Decimal::from(days))
    }

    /// `accrued_through` is the date of the latest ledger entry; each
    /// entry converts accrual to date into the carried figure, so every
    /// calendar day is charged exactly once
    pub fn status(
        &self,
        remaining: Money,
        carried_pending: Money,
        accrued_through: Option<NaiveDate>,
        start_date: NaiveDate,
        as_of: NaiveDate,
    ) -> DailyInterestStatus {
        let accrual_anchor = accrued_through.unwrap_or(start_date);
        let days_accruing = elapsed_days(accrual_anchor, as_of);
        let accrued_interest = self.accrued(remaining, days_accruing);
        let days_since_start = elapsed_days(start_date, as_of);

        let days_overdue = match self.max_days {
            Some(max) if remaining.is_positive() && days_since_start > max => {
                days_since_start - max
            }
            _ => 0,
        };

        DailyInterestStatus {
            days_accruing,
            accrued_interest,
            total_pending_interest: carried_pending + accrued_interest,
            days_since_start,
            is_overdue: days_overdue > 0,
            days_overdue,
        }
    }
}
