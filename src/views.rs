/// serializable views of loans and ledger entries
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::directory::CustomerDirectory;
use crate::ledger::LedgerEntry;
use crate::loan::Loan;
use crate::types::{CustomerId, EntryId, LoanId, LoanStatus, LoanType, PaymentMethod};

/// everything a detail screen shows about one loan
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub customer_id: CustomerId,
    pub customer_name: Option<String>,
    pub area: Option<String>,
    pub loan_type: LoanType,
    pub status: LoanStatus,
    pub start_date: NaiveDate,
    pub disbursement_method: PaymentMethod,
    pub financial: FinancialView,
    pub collection: CollectionView,
    pub accrual: AccrualView,
    pub terms: TermsView,
    pub version: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FinancialView {
    pub principal_amount: Money,
    pub remaining_amount: Money,
    pub pending_interest: Money,
    pub total_collected: Money,
    pub total_asal_paid: Money,
    pub total_interest_paid: Money,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionView {
    pub entry_count: u32,
    pub last_payment_amount: Option<Money>,
    pub last_payment_at: Option<DateTime<Utc>>,
    pub last_interest_settled_on: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccrualView {
    pub as_of: NaiveDate,
    pub days_since_start: u32,
    pub expected_interest: Money,
    pub is_overdue: bool,
    pub days_overdue: u32,
    pub is_low_balance: bool,
}

/// per-product terms; fields that do not apply to the type are null
#[derive(Debug, Serialize, Deserialize)]
pub struct TermsView {
    pub daily_collection_amount: Option<Money>,
    pub expected_completion_days: Option<u32>,
    pub monthly_interest_rate: Option<Rate>,
    pub interest_cycle_day: Option<u8>,
    pub daily_interest_rate: Option<Rate>,
    pub max_days: Option<u32>,
    pub allow_asal_payment_anytime: Option<bool>,
}

impl LoanView {
    pub fn from_loan(
        loan: &Loan,
        directory: &dyn CustomerDirectory,
        as_of: NaiveDate,
    ) -> Self {
        use crate::config::LoanTerms;

        let status = loan.accrual_status(as_of);
        let customer_id = loan.customer_id();

        let terms = match &loan.config.terms {
            LoanTerms::DailyCollection {
                daily_collection_amount,
                ..
            } => TermsView {
                daily_collection_amount: Some(*daily_collection_amount),
                expected_completion_days: loan.config.expected_completion_days(),
                monthly_interest_rate: None,
                interest_cycle_day: None,
                daily_interest_rate: None,
                max_days: None,
                allow_asal_payment_anytime: None,
            },
            LoanTerms::MonthlyInterest {
                monthly_interest_rate,
                interest_cycle_day,
            } => TermsView {
                daily_collection_amount: None,
                expected_completion_days: None,
                monthly_interest_rate: Some(*monthly_interest_rate),
                interest_cycle_day: Some(*interest_cycle_day),
                daily_interest_rate: None,
                max_days: None,
                allow_asal_payment_anytime: None,
            },
            LoanTerms::DailyInterest {
                daily_interest_rate,
                max_days,
                allow_asal_payment_anytime,
            } => TermsView {
                daily_collection_amount: None,
                expected_completion_days: None,
                monthly_interest_rate: None,
                interest_cycle_day: None,
                daily_interest_rate: Some(*daily_interest_rate),
                max_days: *max_days,
                allow_asal_payment_anytime: Some(*allow_asal_payment_anytime),
            },
        };

        LoanView {
            id: loan.id,
            customer_id,
            customer_name: directory.name_of(customer_id).map(str::to_string),
            area: directory.area_of(customer_id).map(str::to_string),
            loan_type: loan.loan_type(),
            status: loan.state.status,
            start_date: loan.config.start_date,
            disbursement_method: loan.config.disbursement_method,
            financial: FinancialView {
                principal_amount: loan.config.principal_amount,
                remaining_amount: loan.state.remaining_amount,
                pending_interest: loan.state.pending_interest,
                total_collected: loan.state.total_collected,
                total_asal_paid: loan.state.total_asal_paid,
                total_interest_paid: loan.state.total_interest_paid,
            },
            collection: CollectionView {
                entry_count: loan.state.entry_count,
                last_payment_amount: loan.state.last_payment_amount,
                last_payment_at: loan.state.last_payment_at,
                last_interest_settled_on: loan.state.last_interest_settled_on,
            },
            accrual: AccrualView {
                as_of,
                days_since_start: status.days_since_start(),
                expected_interest: status.expected_interest(),
                is_overdue: status.is_overdue(),
                days_overdue: status.days_overdue(),
                is_low_balance: loan.is_low_balance(),
            },
            terms,
            version: loan.state.version,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// one ledger entry as listing screens show it
#[derive(Debug, Serialize, Deserialize)]
pub struct EntryView {
    pub id: EntryId,
    pub loan_id: LoanId,
    pub customer_name: Option<String>,
    pub amount: Money,
    pub asal_amount: Money,
    pub interest_amount: Money,
    pub payment_method: PaymentMethod,
    pub collected_by: String,
    pub recorded_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl EntryView {
    pub fn from_entry(entry: &LedgerEntry, customer_name: Option<String>) -> Self {
        EntryView {
            id: entry.id,
            loan_id: entry.loan_id,
            customer_name,
            amount: entry.amount,
            asal_amount: entry.asal_amount,
            interest_amount: entry.interest_amount,
            payment_method: entry.payment_method,
            collected_by: entry.collected_by.clone(),
            recorded_at: entry.recorded_at,
            note: entry.note.clone(),
        }
    }
}
