use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::accrual::calendar::{cycle_containing, elapsed_days, is_charge_day, CycleWindow};
use crate::decimal::{Money, Rate};

/// billing position of a monthly-interest loan within its current cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyInterestStatus {
    pub cycle: CycleWindow,
    /// the one charge expected this cycle: remaining principal at cycle
    /// start x monthly rate
    pub expected_interest: Money,
    /// an interest-bearing entry already sits inside the cycle window
    pub is_collected: bool,
    pub is_due_today: bool,
    /// charge day has passed this cycle with no interest entry
    pub is_overdue: bool,
    pub days_overdue: u32,
    pub days_since_start: u32,
}

/// cycle arithmetic for a monthly-interest loan
///
/// exactly one interest charge is expected per cycle. the charge is
/// computed once per cycle from the principal remaining at cycle start,
/// so asking again before the next anchor never double-charges.
pub struct MonthlyInterestEngine {
    rate: Rate,
    cycle_day: u8,
}

impl MonthlyInterestEngine {
    pub fn new(rate: Rate, cycle_day: u8) -> Self {
        Self { rate, cycle_day }
    }

    /// the cycle window containing `as_of`
    pub fn cycle_window(&self, as_of: NaiveDate) -> CycleWindow {
        cycle_containing(self.cycle_day, as_of)
    }

    /// interest owed for a cycle, given the principal remaining when it opened
    pub fn interest_due(&self, remaining_at_cycle_start: Money) -> Money {
        self.rate.interest_on(remaining_at_cycle_start)
    }

    /// true when `as_of` is the anchored charge day of its month
    pub fn is_charge_day(&self, as_of: NaiveDate) -> bool {
        is_charge_day(self.cycle_day, as_of)
    }

    pub fn status(
        &self,
        remaining_at_cycle_start: Money,
        interest_collected_in_cycle: bool,
        start_date: NaiveDate,
        as_of: NaiveDate,
    ) -> MonthlyInterestStatus {
        let cycle = self.cycle_window(as_of);

        // a cycle that opened before the loan existed carries no charge
        let charge_scheduled = cycle.start >= start_date;

        let expected_interest = if charge_scheduled && !interest_collected_in_cycle {
            self.interest_due(remaining_at_cycle_start)
        } else {
            Money::ZERO
        };

        let is_overdue =
            charge_scheduled && !interest_collected_in_cycle && as_of > cycle.start;

        MonthlyInterestStatus {
            cycle,
            expected_interest,
            is_collected: interest_collected_in_cycle,
            is_due_today: charge_scheduled
                && !interest_collected_in_cycle
                && self.is_charge_day(as_of),
            is_overdue,
            days_overdue: if is_overdue {
                elapsed_days(cycle.start, as_of)
            } else {
                0
            },
            days_since_start: elapsed_days(start_date, as_of),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn engine() -> MonthlyInterestEngine {
        MonthlyInterestEngine::new(Rate::from_percentage(5), 5)
    }

    #[test]
    fn test_five_percent_of_fifty_thousand() {
        assert_eq!(
            engine().interest_due(Money::from_major(50_000)),
            Money::from_major(2_500)
        );
    }

    #[test]
    fn test_charge_due_on_cycle_day() {
        let start = ymd(2024, 1, 5);
        let status = engine().status(Money::from_major(50_000), false, start, ymd(2024, 3, 5));
        assert_eq!(status.expected_interest, Money::from_major(2_500));
        assert!(status.is_due_today);
        assert!(!status.is_overdue);
        assert_eq!(status.cycle.start, ymd(2024, 3, 5));
    }

    #[test]
    fn test_collected_charge_is_idempotent() {
        // once the cycle's interest is recorded, asking again inside the
        // same cycle expects nothing more
        let start = ymd(2024, 1, 5);
        let status = engine().status(Money::from_major(50_000), true, start, ymd(2024, 3, 20));
        assert!(status.is_collected);
        assert!(status.expected_interest.is_zero());
        assert!(!status.is_overdue);
        assert!(!status.is_due_today);
    }

    #[test]
    fn test_uncollected_charge_goes_overdue() {
        let start = ymd(2024, 1, 5);
        let status = engine().status(Money::from_major(50_000), false, start, ymd(2024, 3, 12));
        assert!(status.is_overdue);
        assert_eq!(status.days_overdue, 7);
        assert_eq!(status.expected_interest, Money::from_major(2_500));
    }

    #[test]
    fn test_next_cycle_expects_again() {
        // collected in march says nothing about april's cycle
        let start = ymd(2024, 1, 5);
        let march = engine().status(Money::from_major(50_000), true, start, ymd(2024, 3, 20));
        assert!(march.expected_interest.is_zero());

        let april = engine().status(Money::from_major(50_000), false, start, ymd(2024, 4, 5));
        assert_eq!(april.expected_interest, Money::from_major(2_500));
        assert_eq!(april.cycle.start, ymd(2024, 4, 5));
    }

    #[test]
    fn test_first_partial_cycle_carries_no_charge() {
        // loan opened jan 10 with anchor day 5: the jan 5 cycle predates
        // the loan, the first charge lands feb 5
        let start = ymd(2024, 1, 10);
        let mid_january = engine().status(Money::from_major(50_000), false, start, ymd(2024, 1, 20));
        assert!(mid_january.expected_interest.is_zero());
        assert!(!mid_january.is_overdue);

        let feb_charge_day = engine().status(Money::from_major(50_000), false, start, ymd(2024, 2, 5));
        assert_eq!(feb_charge_day.expected_interest, Money::from_major(2_500));
        assert!(feb_charge_day.is_due_today);
    }

    #[test]
    fn test_charge_on_reduced_principal() {
        // principal paid down before the cycle opened shrinks the charge
        let status = engine().status(Money::from_major(20_000), false, ymd(2024, 1, 5), ymd(2024, 6, 5));
        assert_eq!(status.expected_interest, Money::from_major(1_000));
    }

    #[test]
    fn test_clamped_anchor_end_of_month() {
        let engine = MonthlyInterestEngine::new(Rate::from_percentage(3), 31);
        assert!(engine.is_charge_day(ymd(2024, 4, 30)));
        assert!(engine.is_charge_day(ymd(2024, 2, 29)));
        assert!(!engine.is_charge_day(ymd(2024, 4, 29)));

        let status = engine.status(Money::from_major(10_000), false, ymd(2024, 1, 31), ymd(2024, 4, 30));
        assert!(status.is_due_today);
        assert_eq!(status.cycle.start, ymd(2024, 4, 30));
        assert_eq!(status.cycle.end, ymd(2024, 5, 31));
    }
}
