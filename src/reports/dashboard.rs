use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accrual::MonthlyInterestEngine;
use crate::book::LoanBook;
use crate::config::LoanTerms;
use crate::decimal::{Money, Rate};
use crate::directory::CustomerDirectory;
use crate::ledger::Projector;
use crate::loan::AccrualStatus;
use crate::types::{CustomerId, LoanId, LoanStatus, LoanType};
use crate::views::EntryView;

use super::percentage_of;

/// a monthly-interest loan whose cycle day is today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestDueRow {
    pub loan_id: LoanId,
    pub customer_id: CustomerId,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub principal_amount: Money,
    pub remaining_amount: Money,
    pub interest_rate: Rate,
    pub interest_due: Money,
    pub is_collected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueAlert {
    pub loan_id: LoanId,
    pub customer_id: CustomerId,
    pub customer_name: Option<String>,
    pub loan_type: LoanType,
    pub days_overdue: u32,
    pub expected_amount: Money,
    pub remaining_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowBalanceWarning {
    pub loan_id: LoanId,
    pub customer_id: CustomerId,
    pub customer_name: Option<String>,
    pub loan_type: LoanType,
    pub principal_amount: Money,
    pub remaining_amount: Money,
    pub percentage_remaining: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickStats {
    pub total_active_loans: u32,
    pub total_active_customers: u32,
    pub avg_collection_per_day: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLoanRow {
    pub loan_id: LoanId,
    pub customer_id: CustomerId,
    pub customer_name: Option<String>,
    pub loan_type: LoanType,
    pub principal_amount: Money,
    pub start_date: NaiveDate,
}

/// the morning screen: what is due, what is late, what is almost paid
/// off, and how collections have been running
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub as_of: NaiveDate,
    pub interest_due_today: Vec<InterestDueRow>,
    pub overdue_alerts: Vec<OverdueAlert>,
    pub low_balance_warnings: Vec<LowBalanceWarning>,
    pub total_outstanding: Money,
    pub recent_activity: Vec<EntryView>,
    pub quick_stats: QuickStats,
    pub new_loans_this_month: Vec<NewLoanRow>,
}

pub fn dashboard(
    book: &LoanBook,
    directory: &dyn CustomerDirectory,
    as_of: NaiveDate,
) -> DashboardSnapshot {
    let name_of = |id: CustomerId| directory.name_of(id).map(str::to_string);

    let mut interest_due_today = Vec::new();
    let mut overdue_alerts = Vec::new();
    let mut low_balance_warnings = Vec::new();
    let mut active_customers: Vec<CustomerId> = Vec::new();
    let mut total_active_loans = 0u32;

    for loan in &book.loans {
        if loan.state.status == LoanStatus::Settled {
            continue;
        }
        total_active_loans += 1;
        if !active_customers.contains(&loan.customer_id()) {
            active_customers.push(loan.customer_id());
        }

        let status = loan.accrual_status(as_of);

        if let (
            LoanTerms::MonthlyInterest {
                monthly_interest_rate,
                interest_cycle_day,
            },
            AccrualStatus::MonthlyInterest(monthly),
        ) = (&loan.config.terms, &status)
        {
            let engine = MonthlyInterestEngine::new(*monthly_interest_rate, *interest_cycle_day);
            if engine.is_charge_day(as_of) {
                // show the cycle charge even once collected
                let interest_due = if monthly.is_collected {
                    let projector = Projector::new(loan.config.principal_amount, &loan.entries);
                    engine.interest_due(projector.balance_before(monthly.cycle.start))
                } else {
                    monthly.expected_interest
                };

                let profile = directory.profile(loan.customer_id());
                interest_due_today.push(InterestDueRow {
                    loan_id: loan.id,
                    customer_id: loan.customer_id(),
                    customer_name: profile.map(|p| p.name.clone()),
                    customer_phone: profile.map(|p| p.phone_number.clone()),
                    principal_amount: loan.config.principal_amount,
                    remaining_amount: loan.state.remaining_amount,
                    interest_rate: *monthly_interest_rate,
                    interest_due,
                    is_collected: monthly.is_collected,
                });
            }
        }

        if status.is_overdue() {
            let expected_amount = match &status {
                AccrualStatus::DailyCollection(s) => s.shortfall,
                AccrualStatus::MonthlyInterest(s) => s.expected_interest,
                AccrualStatus::DailyInterest(s) => s.total_pending_interest,
            };
            overdue_alerts.push(OverdueAlert {
                loan_id: loan.id,
                customer_id: loan.customer_id(),
                customer_name: name_of(loan.customer_id()),
                loan_type: loan.loan_type(),
                days_overdue: status.days_overdue(),
                expected_amount,
                remaining_amount: loan.state.remaining_amount,
            });
        }

        if loan.is_low_balance() {
            low_balance_warnings.push(LowBalanceWarning {
                loan_id: loan.id,
                customer_id: loan.customer_id(),
                customer_name: name_of(loan.customer_id()),
                loan_type: loan.loan_type(),
                principal_amount: loan.config.principal_amount,
                remaining_amount: loan.state.remaining_amount,
                percentage_remaining: percentage_of(
                    loan.state.remaining_amount,
                    loan.config.principal_amount,
                ),
            });
        }
    }

    overdue_alerts.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue));

    let mut recent: Vec<(&crate::ledger::LedgerEntry, CustomerId)> = book
        .loans
        .iter()
        .flat_map(|l| l.entries.iter().map(move |e| (e, l.customer_id())))
        .collect();
    recent.sort_by(|a, b| b.0.recorded_at.cmp(&a.0.recorded_at));
    let recent_activity = recent
        .into_iter()
        .take(10)
        .map(|(entry, customer)| EntryView::from_entry(entry, name_of(customer)))
        .collect();

    let window_start = as_of - Duration::days(30);
    let collected_30d = book
        .loans
        .iter()
        .flat_map(|l| l.entries.iter())
        .filter(|e| e.recorded_on() > window_start && e.recorded_on() <= as_of)
        .fold(Money::ZERO, |sum, e| sum + e.amount);

    let month_start = as_of.with_day(1).unwrap_or(as_of);
    let mut new_loans: Vec<NewLoanRow> = book
        .loans
        .iter()
        .filter(|l| l.config.start_date >= month_start && l.config.start_date <= as_of)
        .map(|l| NewLoanRow {
            loan_id: l.id,
            customer_id: l.customer_id(),
            customer_name: name_of(l.customer_id()),
            loan_type: l.loan_type(),
            principal_amount: l.config.principal_amount,
            start_date: l.config.start_date,
        })
        .collect();
    new_loans.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    new_loans.truncate(10);

    DashboardSnapshot {
        as_of,
        interest_due_today,
        overdue_alerts,
        low_balance_warnings,
        total_outstanding: book.total_outstanding(),
        recent_activity,
        quick_stats: QuickStats {
            total_active_loans,
            total_active_customers: active_customers.len() as u32,
            avg_collection_per_day: collected_30d / Decimal::from(30),
        },
        new_loans_this_month: new_loans,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::config::LoanConfig;
    use crate::directory::{CustomerProfile, InMemoryDirectory};
    use crate::ledger::EntryDraft;
    use crate::types::Actor;

    fn provider(y: i32, m: u32, d: u32) -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap(),
        ))
    }

    fn customer(directory: &mut InMemoryDirectory, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        directory.add(CustomerProfile::new(id, name, "9800000000", "road", "north"));
        id
    }

    #[test]
    fn test_interest_due_today_shows_charge_and_collection_state() {
        let time = provider(2024, 1, 5);
        let mut book = LoanBook::new();
        let mut directory = InMemoryDirectory::new();
        let admin = Actor::owner("admin");
        let today = time.now().date_naive();

        let meena = customer(&mut directory, "meena");
        let due_id = book
            .open_loan(
                LoanConfig::monthly_interest(
                    meena,
                    Money::from_major(50_000),
                    Rate::from_percentage(5),
                    5,
                    NaiveDate::from_ymd_opt(2023, 12, 5).unwrap(),
                ),
                &time,
            )
            .unwrap();

        let suresh = customer(&mut directory, "suresh");
        let paid_id = book
            .open_loan(
                LoanConfig::monthly_interest(
                    suresh,
                    Money::from_major(20_000),
                    Rate::from_percentage(5),
                    5,
                    NaiveDate::from_ymd_opt(2023, 12, 5).unwrap(),
                ),
                &time,
            )
            .unwrap();
        book.record_entry(
            &admin,
            paid_id,
            EntryDraft::interest_only(Money::from_major(1_000)),
            &time,
        )
        .unwrap();

        let snapshot = dashboard(&book, &directory, today);
        assert_eq!(snapshot.interest_due_today.len(), 2);

        let due = snapshot
            .interest_due_today
            .iter()
            .find(|r| r.loan_id == due_id)
            .unwrap();
        assert_eq!(due.interest_due, Money::from_major(2_500));
        assert!(!due.is_collected);
        assert_eq!(due.customer_name.as_deref(), Some("meena"));

        let paid = snapshot
            .interest_due_today
            .iter()
            .find(|r| r.loan_id == paid_id)
            .unwrap();
        assert!(paid.is_collected);
        assert_eq!(paid.interest_due, Money::from_major(1_000));
    }

    #[test]
    fn test_overdue_alerts_sorted_by_days() {
        let time = provider(2024, 1, 1);
        let mut book = LoanBook::new();
        let mut directory = InMemoryDirectory::new();
        let today = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();

        let slow = customer(&mut directory, "slow payer");
        book.open_loan(
            LoanConfig::daily_collection(
                slow,
                Money::from_major(10_000),
                Money::from_major(100),
                time.now().date_naive(),
            ),
            &time,
        )
        .unwrap();

        let slower = customer(&mut directory, "slower payer");
        book.open_loan(
            LoanConfig::daily_collection(
                slower,
                Money::from_major(10_000),
                Money::from_major(200),
                time.now().date_naive(),
            ),
            &time,
        )
        .unwrap();

        // ten days in with nothing collected on either loan
        let snapshot = dashboard(&book, &directory, today);
        assert_eq!(snapshot.overdue_alerts.len(), 2);
        assert_eq!(snapshot.overdue_alerts[0].days_overdue, 10);
        assert_eq!(snapshot.overdue_alerts[0].expected_amount, Money::from_major(1_000));
        assert!(snapshot.overdue_alerts[0].days_overdue >= snapshot.overdue_alerts[1].days_overdue);
    }

    #[test]
    fn test_low_balance_and_outstanding() {
        let time = provider(2024, 1, 5);
        let mut book = LoanBook::new();
        let mut directory = InMemoryDirectory::new();
        let admin = Actor::owner("admin");
        let today = time.now().date_naive();

        let meena = customer(&mut directory, "meena");
        let id = book
            .open_loan(
                LoanConfig::daily_collection(
                    meena,
                    Money::from_major(1_000),
                    Money::from_major(100),
                    today,
                ),
                &time,
            )
            .unwrap();
        book.record_entry(&admin, id, EntryDraft::collection(Money::from_major(850)), &time)
            .unwrap();

        let snapshot = dashboard(&book, &directory, today);
        assert_eq!(snapshot.low_balance_warnings.len(), 1);
        assert_eq!(
            snapshot.low_balance_warnings[0].percentage_remaining,
            dec!(15.0)
        );
        assert_eq!(snapshot.total_outstanding, Money::from_major(150));
        assert_eq!(snapshot.quick_stats.total_active_loans, 1);
        assert_eq!(snapshot.quick_stats.total_active_customers, 1);
    }

    #[test]
    fn test_recent_activity_newest_first_capped_at_ten() {
        let time = provider(2024, 1, 5);
        let control = time.test_control().unwrap();
        let mut book = LoanBook::new();
        let mut directory = InMemoryDirectory::new();
        let admin = Actor::owner("admin");

        let meena = customer(&mut directory, "meena");
        let id = book
            .open_loan(
                LoanConfig::daily_collection(
                    meena,
                    Money::from_major(10_000),
                    Money::from_major(100),
                    time.now().date_naive(),
                ),
                &time,
            )
            .unwrap();

        for _ in 0..12 {
            book.record_entry(&admin, id, EntryDraft::collection(Money::from_major(100)), &time)
                .unwrap();
            control.advance(Duration::days(1));
        }

        let today = time.now().date_naive();
        let snapshot = dashboard(&book, &directory, today);
        assert_eq!(snapshot.recent_activity.len(), 10);
        assert!(snapshot.recent_activity[0].recorded_at >= snapshot.recent_activity[9].recorded_at);

        // 1200 collected across the trailing month
        assert_eq!(
            snapshot.quick_stats.avg_collection_per_day,
            Money::from_major(40)
        );
    }

    #[test]
    fn test_new_loans_this_month_excludes_older() {
        let time = provider(2024, 2, 10);
        let mut book = LoanBook::new();
        let mut directory = InMemoryDirectory::new();

        let meena = customer(&mut directory, "meena");
        book.open_loan(
            LoanConfig::daily_collection(
                meena,
                Money::from_major(5_000),
                Money::from_major(100),
                NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
            ),
            &time,
        )
        .unwrap();

        let suresh = customer(&mut directory, "suresh");
        book.open_loan(
            LoanConfig::daily_collection(
                suresh,
                Money::from_major(5_000),
                Money::from_major(100),
                NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            ),
            &time,
        )
        .unwrap();

        let snapshot = dashboard(&book, &directory, time.now().date_naive());
        assert_eq!(snapshot.new_loans_this_month.len(), 1);
        assert_eq!(
            snapshot.new_loans_this_month[0].start_date,
            NaiveDate::from_ymd_opt(2024, 2, 3).unwrap()
        );
    }
}
