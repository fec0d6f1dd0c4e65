use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{EntryId, LoanId, LoanStatus, LoanType, PaymentMethod};

/// all events that can be emitted while servicing a loan book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    LoanOpened {
        loan_id: LoanId,
        loan_type: LoanType,
        principal: Money,
        start_date: NaiveDate,
        disbursement_method: PaymentMethod,
    },
    LoanUpdated {
        loan_id: LoanId,
        old_principal: Money,
        new_principal: Money,
        timestamp: DateTime<Utc>,
    },
    LoanRemoved {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },
    LoanSettled {
        loan_id: LoanId,
        total_collected: Money,
        timestamp: DateTime<Utc>,
    },
    LoanReactivated {
        loan_id: LoanId,
        restored_balance: Money,
        timestamp: DateTime<Utc>,
    },

    // ledger events
    EntryRecorded {
        loan_id: LoanId,
        entry_id: EntryId,
        amount: Money,
        asal: Money,
        interest: Money,
        method: PaymentMethod,
        collected_by: String,
        timestamp: DateTime<Utc>,
    },
    EntryAmended {
        loan_id: LoanId,
        entry_id: EntryId,
        old_amount: Money,
        new_amount: Money,
        amended_by: String,
        timestamp: DateTime<Utc>,
    },
    EntryReversed {
        loan_id: LoanId,
        entry_id: EntryId,
        amount: Money,
        asal_restored: Money,
        reversed_by: String,
        timestamp: DateTime<Utc>,
    },

    // interest events
    InterestCarried {
        loan_id: LoanId,
        shortfall: Money,
        total_pending: Money,
        timestamp: DateTime<Utc>,
    },
    InterestSettled {
        loan_id: LoanId,
        amount: Money,
        settled_on: NaiveDate,
        timestamp: DateTime<Utc>,
    },

    // status change events
    StatusChanged {
        loan_id: LoanId,
        old_status: LoanStatus,
        new_status: LoanStatus,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    // expense events
    ExpenseRecorded {
        description: String,
        amount: Money,
        incurred_on: NaiveDate,
        recorded_by: String,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
