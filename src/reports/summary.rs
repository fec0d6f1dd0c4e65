use serde::{Deserialize, Serialize};

use crate::book::LoanBook;
use crate::decimal::Money;
use crate::directory::CustomerDirectory;
use crate::loan::Loan;
use crate::types::LoanType;

use super::ReportPeriod;

const UNKNOWN_AREA: &str = "Unknown";

/// optional report scoping; matching is case-insensitive for areas
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilters {
    pub area: Option<String>,
    pub loan_type: Option<LoanType>,
}

impl ReportFilters {
    fn matches(&self, loan: &Loan, directory: &dyn CustomerDirectory) -> bool {
        if let Some(wanted) = &self.loan_type {
            if loan.loan_type() != *wanted {
                return false;
            }
        }
        if let Some(wanted) = &self.area {
            let area = directory
                .area_of(loan.customer_id())
                .unwrap_or(UNKNOWN_AREA);
            if !area.eq_ignore_ascii_case(wanted) {
                return false;
            }
        }
        true
    }
}

/// period totals for the whole book: what went out, what came back,
/// and what the interest earned after expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub period: ReportPeriod,
    pub total_disbursed: Money,
    pub total_loans_count: u32,
    pub total_collected: Money,
    pub total_principal_collected: Money,
    pub total_interest_collected: Money,
    pub total_transactions: u32,
    pub total_expenses: Money,
    pub net_income: Money,
    pub available_areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaBreakdownRow {
    pub area: String,
    pub customers: u32,
    pub loans: u32,
    pub total_collected: Money,
    pub principal_collected: Money,
    pub interest_collected: Money,
    pub transactions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTypeBreakdownRow {
    pub loan_type: LoanType,
    pub loans: u32,
    pub total_collected: Money,
    pub principal_collected: Money,
    pub interest_collected: Money,
    pub transactions: u32,
}

/// totals over the period: disbursement from loans opened in range,
/// collections from ledger entries in range, net income from interest
/// earned minus expenses incurred
pub fn collection_summary(
    book: &LoanBook,
    directory: &dyn CustomerDirectory,
    period: ReportPeriod,
    filters: &ReportFilters,
) -> CollectionSummary {
    let mut total_disbursed = Money::ZERO;
    let mut total_loans_count = 0u32;
    let mut total_collected = Money::ZERO;
    let mut total_principal_collected = Money::ZERO;
    let mut total_interest_collected = Money::ZERO;
    let mut total_transactions = 0u32;

    for loan in &book.loans {
        if !filters.matches(loan, directory) {
            continue;
        }

        if period.contains(loan.config.start_date) {
            total_disbursed += loan.config.principal_amount;
            total_loans_count += 1;
        }

        for entry in &loan.entries {
            if period.contains(entry.recorded_on()) {
                total_collected += entry.amount;
                total_principal_collected += entry.asal_amount;
                total_interest_collected += entry.interest_amount;
                total_transactions += 1;
            }
        }
    }

    let total_expenses = book
        .expenses
        .iter()
        .filter(|e| period.contains(e.incurred_on))
        .fold(Money::ZERO, |sum, e| sum + e.amount);

    let mut available_areas = directory.areas();
    available_areas.sort();

    CollectionSummary {
        period,
        total_disbursed,
        total_loans_count,
        total_collected,
        total_principal_collected,
        total_interest_collected,
        total_transactions,
        total_expenses,
        net_income: total_interest_collected - total_expenses,
        available_areas,
    }
}

/// collections grouped by customer area, busiest areas first
pub fn area_breakdown(
    book: &LoanBook,
    directory: &dyn CustomerDirectory,
    period: ReportPeriod,
    filters: &ReportFilters,
) -> Vec<AreaBreakdownRow> {
    let mut rows: Vec<AreaBreakdownRow> = Vec::new();
    let mut customers_per_area: Vec<Vec<crate::types::CustomerId>> = Vec::new();

    for loan in &book.loans {
        if !filters.matches(loan, directory) {
            continue;
        }

        let in_range: Vec<_> = loan
            .entries
            .iter()
            .filter(|e| period.contains(e.recorded_on()))
            .collect();
        if in_range.is_empty() {
            continue;
        }

        let area = directory
            .area_of(loan.customer_id())
            .unwrap_or(UNKNOWN_AREA)
            .to_string();

        let index = match rows.iter().position(|r| r.area.eq_ignore_ascii_case(&area)) {
            Some(i) => i,
            None => {
                rows.push(AreaBreakdownRow {
                    area,
                    customers: 0,
                    loans: 0,
                    total_collected: Money::ZERO,
                    principal_collected: Money::ZERO,
                    interest_collected: Money::ZERO,
                    transactions: 0,
                });
                customers_per_area.push(Vec::new());
                rows.len() - 1
            }
        };

        let row = &mut rows[index];
        row.loans += 1;
        for entry in &in_range {
            row.total_collected += entry.amount;
            row.principal_collected += entry.asal_amount;
            row.interest_collected += entry.interest_amount;
            row.transactions += 1;
        }
        if !customers_per_area[index].contains(&loan.customer_id()) {
            customers_per_area[index].push(loan.customer_id());
        }
    }

    for (index, row) in rows.iter_mut().enumerate() {
        row.customers = customers_per_area[index].len() as u32;
    }
    rows.sort_by(|a, b| b.total_collected.cmp(&a.total_collected));
    rows
}

/// collections grouped by loan product, busiest products first
pub fn loan_type_breakdown(
    book: &LoanBook,
    directory: &dyn CustomerDirectory,
    period: ReportPeriod,
    filters: &ReportFilters,
) -> Vec<LoanTypeBreakdownRow> {
    let mut rows: Vec<LoanTypeBreakdownRow> = Vec::new();

    for loan in &book.loans {
        if !filters.matches(loan, directory) {
            continue;
        }

        let in_range: Vec<_> = loan
            .entries
            .iter()
            .filter(|e| period.contains(e.recorded_on()))
            .collect();
        if in_range.is_empty() {
            continue;
        }

        let loan_type = loan.loan_type();
        let index = match rows.iter().position(|r| r.loan_type == loan_type) {
            Some(i) => i,
            None => {
                rows.push(LoanTypeBreakdownRow {
                    loan_type,
                    loans: 0,
                    total_collected: Money::ZERO,
                    principal_collected: Money::ZERO,
                    interest_collected: Money::ZERO,
                    transactions: 0,
                });
                rows.len() - 1
            }
        };

        let row = &mut rows[index];
        row.loans += 1;
        for entry in &in_range {
            row.total_collected += entry.amount;
            row.principal_collected += entry.asal_amount;
            row.interest_collected += entry.interest_amount;
            row.transactions += 1;
        }
    }

    rows.sort_by(|a, b| b.total_collected.cmp(&a.total_collected));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};
    use uuid::Uuid;

    use crate::config::LoanConfig;
    use crate::decimal::Rate;
    use crate::directory::{CustomerProfile, InMemoryDirectory};
    use crate::ledger::EntryDraft;
    use crate::types::Actor;

    fn provider() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap(),
        ))
    }

    fn seed_book() -> (LoanBook, InMemoryDirectory, SafeTimeProvider) {
        let time = provider();
        let mut book = LoanBook::new();
        let mut directory = InMemoryDirectory::new();
        let admin = Actor::owner("admin");
        let today = time.now().date_naive();

        let meena = Uuid::new_v4();
        directory.add(CustomerProfile::new(meena, "meena", "98", "road", "north"));
        let suresh = Uuid::new_v4();
        directory.add(CustomerProfile::new(suresh, "suresh", "97", "lane", "south"));

        let dc = book
            .open_loan(
                LoanConfig::daily_collection(
                    meena,
                    Money::from_major(10_000),
                    Money::from_major(100),
                    today,
                ),
                &time,
            )
            .unwrap();
        book.record_entry(&admin, dc, EntryDraft::collection(Money::from_major(100)), &time)
            .unwrap();
        book.record_entry(&admin, dc, EntryDraft::collection(Money::from_major(100)), &time)
            .unwrap();

        let dl = book
            .open_loan(
                LoanConfig::daily_interest(
                    suresh,
                    Money::from_major(20_000),
                    Rate::from_percentage(1),
                    today,
                ),
                &time,
            )
            .unwrap();
        book.record_entry(
            &admin,
            dl,
            EntryDraft::split(
                Money::from_major(700),
                Money::from_major(500),
                Money::from_major(200),
            ),
            &time,
        )
        .unwrap();

        book.record_expense(&admin, "fuel", Money::from_major(150), today)
            .unwrap();

        (book, directory, time)
    }

    fn january() -> ReportPeriod {
        ReportPeriod::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
    }

    #[test]
    fn test_summary_totals_reconcile_with_ledger() {
        let (book, directory, _time) = seed_book();

        let summary =
            collection_summary(&book, &directory, january(), &ReportFilters::default());

        assert_eq!(summary.total_disbursed, Money::from_major(30_000));
        assert_eq!(summary.total_loans_count, 2);
        assert_eq!(summary.total_collected, Money::from_major(900));
        assert_eq!(summary.total_principal_collected, Money::from_major(700));
        assert_eq!(summary.total_interest_collected, Money::from_major(200));
        assert_eq!(summary.total_transactions, 3);
        assert_eq!(summary.total_expenses, Money::from_major(150));
        assert_eq!(summary.net_income, Money::from_major(50));
        assert_eq!(summary.available_areas, vec!["north", "south"]);
    }

    #[test]
    fn test_summary_respects_filters() {
        let (book, directory, _time) = seed_book();

        let north_only = ReportFilters {
            area: Some("NORTH".to_string()),
            loan_type: None,
        };
        let summary = collection_summary(&book, &directory, january(), &north_only);
        assert_eq!(summary.total_collected, Money::from_major(200));
        assert_eq!(summary.total_loans_count, 1);

        let dl_only = ReportFilters {
            area: None,
            loan_type: Some(LoanType::DailyInterest),
        };
        let summary = collection_summary(&book, &directory, january(), &dl_only);
        assert_eq!(summary.total_collected, Money::from_major(700));
        assert_eq!(summary.total_interest_collected, Money::from_major(200));
    }

    #[test]
    fn test_area_breakdown_sorted_by_collections() {
        let (book, directory, _time) = seed_book();

        let rows = area_breakdown(&book, &directory, january(), &ReportFilters::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].area, "south");
        assert_eq!(rows[0].total_collected, Money::from_major(700));
        assert_eq!(rows[0].customers, 1);
        assert_eq!(rows[0].loans, 1);
        assert_eq!(rows[1].area, "north");
        assert_eq!(rows[1].transactions, 2);
    }

    #[test]
    fn test_loan_type_breakdown() {
        let (book, directory, _time) = seed_book();

        let rows = loan_type_breakdown(&book, &directory, january(), &ReportFilters::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].loan_type, LoanType::DailyInterest);
        assert_eq!(rows[0].interest_collected, Money::from_major(200));
        assert_eq!(rows[1].loan_type, LoanType::DailyCollection);
        assert_eq!(rows[1].principal_collected, Money::from_major(200));
    }

    #[test]
    fn test_out_of_range_entries_excluded() {
        let (book, directory, _time) = seed_book();

        let february = ReportPeriod::new(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
        );
        let summary =
            collection_summary(&book, &directory, february, &ReportFilters::default());
        assert_eq!(summary.total_collected, Money::ZERO);
        assert_eq!(summary.total_loans_count, 0);
        assert!(area_breakdown(&book, &directory, february, &ReportFilters::default()).is_empty());
    }
}
