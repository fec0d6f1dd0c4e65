use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::accrual::calendar::elapsed_days;
use crate::decimal::Money;

/// collection position of a daily-collection loan as of a reference date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCollectionStatus {
    pub days_since_start: u32,
    /// daily amount x days elapsed, capped at the principal
    pub expected_to_date: Money,
    pub collected_to_date: Money,
    /// how far collections trail the schedule, floored at zero
    pub shortfall: Money,
    /// behind by strictly more than one day's installment
    pub is_overdue: bool,
    /// whole missed installments, floor(shortfall / daily amount)
    pub days_overdue: u32,
}

/// schedule arithmetic for a daily-collection loan
///
/// no interest concept: every installment is principal. day 0 is the
/// start date, the first installment is expected on day 1.
pub struct DailyCollectionEngine {
    principal: Money,
    daily_amount: Money,
    start_date: NaiveDate,
}

impl DailyCollectionEngine {
    pub fn new(principal: Money, daily_amount: Money, start_date: NaiveDate) -> Self {
        Self {
            principal,
            daily_amount,
            start_date,
        }
    }

    /// what the schedule expects collected by `as_of`; a finished book
    /// stops expecting, so the figure never exceeds the principal
    pub fn expected_to_date(&self, as_of: NaiveDate) -> Money {
        let days = elapsed_days(self.start_date, as_of);
        (self.daily_amount * rust_decimal::Decimal::from(days)).min(self.principal)
    }

    pub fn status(&self, collected_to_date: Money, as_of: NaiveDate) -> DailyCollectionStatus {
        let days_since_start = elapsed_days(self.start_date, as_of);
        let expected_to_date = self.expected_to_date(as_of);
        let shortfall = (expected_to_date - collected_to_date).max(Money::ZERO);

        let days_overdue = if self.daily_amount.is_positive() {
            (shortfall.as_decimal() / self.daily_amount.as_decimal())
                .floor()
                .to_u32()
                .unwrap_or(0)
        } else {
            0
        };

        DailyCollectionStatus {
            days_since_start,
            expected_to_date,
            collected_to_date,
            shortfall,
            is_overdue: shortfall > self.daily_amount,
            days_overdue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn engine() -> DailyCollectionEngine {
        DailyCollectionEngine::new(
            Money::from_major(10_000),
            Money::from_major(100),
            ymd(2024, 1, 1),
        )
    }

    #[test]
    fn test_four_missed_days() {
        // 100/day from jan 1; by jan 5 four installments are expected
        let status = engine().status(Money::ZERO, ymd(2024, 1, 5));
        assert_eq!(status.days_since_start, 4);
        assert_eq!(status.expected_to_date, Money::from_major(400));
        assert_eq!(status.shortfall, Money::from_major(400));
        assert_eq!(status.days_overdue, 4);
        assert!(status.is_overdue);
    }

    #[test]
    fn test_one_day_grace() {
        // trailing by exactly one installment is not yet overdue
        let status = engine().status(Money::ZERO, ymd(2024, 1, 2));
        assert_eq!(status.shortfall, Money::from_major(100));
        assert!(!status.is_overdue);
        assert_eq!(status.days_overdue, 1);
    }

    #[test]
    fn test_on_schedule() {
        let status = engine().status(Money::from_major(400), ymd(2024, 1, 5));
        assert!(status.shortfall.is_zero());
        assert!(!status.is_overdue);
        assert_eq!(status.days_overdue, 0);
    }

    #[test]
    fn test_ahead_of_schedule_has_no_negative_shortfall() {
        let status = engine().status(Money::from_major(1_000), ymd(2024, 1, 5));
        assert_eq!(status.shortfall, Money::ZERO);
        assert!(!status.is_overdue);
    }

    #[test]
    fn test_partial_installments_floor() {
        // 250 behind at 100/day is two whole missed days
        let status = engine().status(Money::from_major(150), ymd(2024, 1, 5));
        assert_eq!(status.shortfall, Money::from_major(250));
        assert_eq!(status.days_overdue, 2);
        assert!(status.is_overdue);
    }

    #[test]
    fn test_expected_caps_at_principal() {
        // 200 days after start the schedule would ask for 20000; the
        // book only ever expects the principal
        let status = engine().status(Money::from_major(9_000), ymd(2024, 7, 19));
        assert_eq!(status.expected_to_date, Money::from_major(10_000));
        assert_eq!(status.shortfall, Money::from_major(1_000));
    }

    #[test]
    fn test_before_start_expects_nothing() {
        let status = engine().status(Money::ZERO, ymd(2023, 12, 25));
        assert_eq!(status.days_since_start, 0);
        assert!(status.expected_to_date.is_zero());
        assert!(!status.is_overdue);
    }
}
