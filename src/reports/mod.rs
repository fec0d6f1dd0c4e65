//! read-side aggregation over the loan book
//!
//! every figure re-derives from the ledgers; nothing here owns state
//! or applies business rules of its own.

pub mod dashboard;
pub mod payment_flow;
pub mod summary;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;

pub use dashboard::{
    dashboard, DashboardSnapshot, InterestDueRow, LowBalanceWarning, NewLoanRow, OverdueAlert,
    QuickStats,
};
pub use payment_flow::{payment_flow, DailyFlow, MethodSplit, PaymentFlowReport};
pub use summary::{
    area_breakdown, collection_summary, loan_type_breakdown, AreaBreakdownRow, CollectionSummary,
    LoanTypeBreakdownRow, ReportFilters,
};

/// inclusive date range a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// share of a whole as a percentage, one decimal place
pub(crate) fn percentage_of(part: Money, whole: Money) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        (part.as_decimal() / whole.as_decimal() * Decimal::from(100)).round_dp(1)
    }
}
