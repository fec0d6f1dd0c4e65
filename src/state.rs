use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{LoanId, LoanStatus};

/// derived loan state, recomputed from the ledger on every write
///
/// `remaining_amount` is a denormalized projection of
/// `principal − Σ asal` over the loan's ledger entries. It is never
/// adjusted incrementally; any ledger mutation rebuilds it from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanState {
    // identification
    pub loan_id: LoanId,

    // core balances
    pub remaining_amount: Money,
    pub pending_interest: Money,

    // collection totals
    pub total_collected: Money,
    pub total_asal_paid: Money,
    pub total_interest_paid: Money,
    pub entry_count: u32,

    // payment tracking
    pub last_payment_amount: Option<Money>,
    pub last_payment_at: Option<DateTime<Utc>>,
    pub last_interest_settled_on: Option<NaiveDate>,

    // status
    pub status: LoanStatus,
    pub last_status_change: DateTime<Utc>,

    // optimistic concurrency token, bumped on every ledger write
    pub version: u64,
}

impl LoanState {
    /// fresh state for a newly opened loan
    pub fn new(loan_id: LoanId, principal: Money, opened_at: DateTime<Utc>) -> Self {
        Self {
            loan_id,
            remaining_amount: principal,
            pending_interest: Money::ZERO,
            total_collected: Money::ZERO,
            total_asal_paid: Money::ZERO,
            total_interest_paid: Money::ZERO,
            entry_count: 0,
            last_payment_amount: None,
            last_payment_at: None,
            last_interest_settled_on: None,
            status: LoanStatus::Active,
            last_status_change: opened_at,
            version: 0,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.status == LoanStatus::Settled
    }

    pub fn is_overdue(&self) -> bool {
        self.status == LoanStatus::Overdue
    }

    /// update status, keeping the transition timestamp
    pub fn update_status(&mut self, new_status: LoanStatus, timestamp: DateTime<Utc>) {
        if self.status != new_status {
            self.status = new_status;
            self.last_status_change = timestamp;
        }
    }

    pub fn bump_version(&mut self) {
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_new_state_starts_active_at_principal() {
        let state = LoanState::new(Uuid::new_v4(), Money::from_major(10_000), Utc::now());
        assert_eq!(state.remaining_amount, Money::from_major(10_000));
        assert_eq!(state.status, LoanStatus::Active);
        assert_eq!(state.version, 0);
        assert!(state.pending_interest.is_zero());
    }

    #[test]
    fn test_status_change_stamps_timestamp() {
        let opened = Utc::now();
        let mut state = LoanState::new(Uuid::new_v4(), Money::from_major(100), opened);
        let later = opened + chrono::Duration::hours(3);

        state.update_status(LoanStatus::Settled, later);
        assert!(state.is_settled());
        assert_eq!(state.last_status_change, later);

        // same status again leaves the timestamp alone
        let even_later = later + chrono::Duration::hours(1);
        state.update_status(LoanStatus::Settled, even_later);
        assert_eq!(state.last_status_change, later);
    }
}
