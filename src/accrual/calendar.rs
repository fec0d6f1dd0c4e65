use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// whole days from `from` to `to`, negative when `to` precedes `from`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// whole days elapsed, floored at zero for reference dates before the start
pub fn elapsed_days(from: NaiveDate, to: NaiveDate) -> u32 {
    days_between(from, to).max(0) as u32
}

/// the given day-of-month within a month, clamped to the month's length
/// (day 31 lands on apr 30, feb 29 or 28)
pub fn clamped_date(year: i32, month: u32, day: u8) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day as u32)
        .or_else(|| NaiveDate::from_ymd_opt(year, month, 30))
        .or_else(|| NaiveDate::from_ymd_opt(year, month, 29))
        .or_else(|| NaiveDate::from_ymd_opt(year, month, 28))
        .unwrap_or_default()
}

/// true when `date` is the anchored charge day of its month
pub fn is_charge_day(cycle_day: u8, date: NaiveDate) -> bool {
    clamped_date(date.year(), date.month(), cycle_day) == date
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// one monthly billing interval: starts on the anchored charge day,
/// ends the day before the next anchor (`end` is exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CycleWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// the cycle window containing `as_of` for the given anchor day
pub fn cycle_containing(cycle_day: u8, as_of: NaiveDate) -> CycleWindow {
    let anchor_this_month = clamped_date(as_of.year(), as_of.month(), cycle_day);
    let start = if anchor_this_month <= as_of {
        anchor_this_month
    } else {
        let (y, m) = previous_month(as_of.year(), as_of.month());
        clamped_date(y, m, cycle_day)
    };

    let (ny, nm) = next_month(start.year(), start.month());
    let end = clamped_date(ny, nm, cycle_day);

    CycleWindow { start, end }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_elapsed_days_floors_at_zero() {
        assert_eq!(elapsed_days(ymd(2024, 1, 1), ymd(2024, 1, 5)), 4);
        assert_eq!(elapsed_days(ymd(2024, 1, 5), ymd(2024, 1, 1)), 0);
        assert_eq!(elapsed_days(ymd(2024, 1, 1), ymd(2024, 1, 1)), 0);
    }

    #[test]
    fn test_clamping_short_months() {
        assert_eq!(clamped_date(2024, 4, 31), ymd(2024, 4, 30));
        assert_eq!(clamped_date(2024, 2, 31), ymd(2024, 2, 29)); // leap year
        assert_eq!(clamped_date(2023, 2, 31), ymd(2023, 2, 28));
        assert_eq!(clamped_date(2024, 1, 31), ymd(2024, 1, 31));
        assert_eq!(clamped_date(2024, 6, 15), ymd(2024, 6, 15));
    }

    #[test]
    fn test_cycle_window_mid_month_anchor() {
        let cycle = cycle_containing(5, ymd(2024, 3, 10));
        assert_eq!(cycle.start, ymd(2024, 3, 5));
        assert_eq!(cycle.end, ymd(2024, 4, 5));
        assert!(cycle.contains(ymd(2024, 3, 5)));
        assert!(cycle.contains(ymd(2024, 4, 4)));
        assert!(!cycle.contains(ymd(2024, 4, 5)));
    }

    #[test]
    fn test_cycle_window_before_anchor_falls_in_previous_cycle() {
        let cycle = cycle_containing(5, ymd(2024, 3, 3));
        assert_eq!(cycle.start, ymd(2024, 2, 5));
        assert_eq!(cycle.end, ymd(2024, 3, 5));
    }

    #[test]
    fn test_cycle_window_clamped_anchor() {
        // anchor day 31 across short months
        let cycle = cycle_containing(31, ymd(2024, 3, 1));
        assert_eq!(cycle.start, ymd(2024, 2, 29));
        assert_eq!(cycle.end, ymd(2024, 3, 31));

        let cycle = cycle_containing(31, ymd(2024, 4, 30));
        assert_eq!(cycle.start, ymd(2024, 4, 30));
        assert_eq!(cycle.end, ymd(2024, 5, 31));
    }

    #[test]
    fn test_cycle_window_year_boundary() {
        let cycle = cycle_containing(15, ymd(2024, 1, 3));
        assert_eq!(cycle.start, ymd(2023, 12, 15));
        assert_eq!(cycle.end, ymd(2024, 1, 15));
    }

    #[test]
    fn test_charge_day_detection() {
        assert!(is_charge_day(5, ymd(2024, 3, 5)));
        assert!(!is_charge_day(5, ymd(2024, 3, 6)));
        // clamped anchors count as the charge day
        assert!(is_charge_day(31, ymd(2024, 4, 30)));
        assert!(is_charge_day(31, ymd(2023, 2, 28)));
        assert!(!is_charge_day(31, ymd(2024, 4, 29)));
    }
}
