//! the transaction ledger: append-only collection entries per loan
//!
//! every balance in the crate is a fold over these rows. the projector
//! rebuilds derived state from scratch on each write so a stored figure
//! can never drift from its ledger.

pub mod allocation;
pub mod projector;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{EntryId, LoanId, PaymentMethod};

pub use allocation::{validate_interest_first, validate_split};
pub use projector::{LedgerTotals, Projector};

/// one collection entry against a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub loan_id: LoanId,
    pub recorded_at: DateTime<Utc>,
    /// total handed over by the customer
    pub amount: Money,
    /// principal portion
    pub asal_amount: Money,
    /// interest portion
    pub interest_amount: Money,
    pub payment_method: PaymentMethod,
    pub collected_by: String,
    pub note: Option<String>,
}

impl LedgerEntry {
    /// calendar day the entry belongs to
    pub fn recorded_on(&self) -> NaiveDate {
        self.recorded_at.date_naive()
    }

    pub fn carries_interest(&self) -> bool {
        self.interest_amount.is_positive()
    }
}

/// a collection entry as submitted, before validation and attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub amount: Money,
    pub asal_amount: Money,
    pub interest_amount: Money,
    pub payment_method: PaymentMethod,
    pub note: Option<String>,
}

impl EntryDraft {
    /// a daily-collection installment: all principal, no interest
    pub fn collection(amount: Money) -> Self {
        Self {
            amount,
            asal_amount: amount,
            interest_amount: Money::ZERO,
            payment_method: PaymentMethod::Cash,
            note: None,
        }
    }

    /// a compound payment split into principal and interest portions
    pub fn split(amount: Money, asal: Money, interest: Money) -> Self {
        Self {
            amount,
            asal_amount: asal,
            interest_amount: interest,
            payment_method: PaymentMethod::Cash,
            note: None,
        }
    }

    /// a payment covering interest only
    pub fn interest_only(amount: Money) -> Self {
        Self {
            amount,
            asal_amount: Money::ZERO,
            interest_amount: amount,
            payment_method: PaymentMethod::Cash,
            note: None,
        }
    }

    pub fn with_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// materialize into a ledger row
    pub fn into_entry(
        self,
        loan_id: LoanId,
        collected_by: String,
        recorded_at: DateTime<Utc>,
    ) -> LedgerEntry {
        LedgerEntry {
            id: Uuid::new_v4(),
            loan_id,
            recorded_at,
            amount: self.amount,
            asal_amount: self.asal_amount,
            interest_amount: self.interest_amount,
            payment_method: self.payment_method,
            collected_by,
            note: self.note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_constructors() {
        let dc = EntryDraft::collection(Money::from_major(100));
        assert_eq!(dc.asal_amount, dc.amount);
        assert!(dc.interest_amount.is_zero());

        let split = EntryDraft::split(
            Money::from_major(600),
            Money::from_major(500),
            Money::from_major(100),
        );
        assert_eq!(split.asal_amount + split.interest_amount, split.amount);

        let interest = EntryDraft::interest_only(Money::from_major(250));
        assert!(interest.asal_amount.is_zero());
        assert_eq!(interest.interest_amount, Money::from_major(250));
    }

    #[test]
    fn test_into_entry_attributes_collector() {
        let loan_id = Uuid::new_v4();
        let entry = EntryDraft::collection(Money::from_major(100))
            .with_method(PaymentMethod::Online)
            .with_note("upi transfer")
            .into_entry(loan_id, "ravi".to_string(), Utc::now());

        assert_eq!(entry.loan_id, loan_id);
        assert_eq!(entry.collected_by, "ravi");
        assert_eq!(entry.payment_method, PaymentMethod::Online);
        assert_eq!(entry.note.as_deref(), Some("upi transfer"));
    }
}
