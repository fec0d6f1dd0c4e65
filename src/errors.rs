use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::types::ActorRole;

/// coarse classification of an error, mirroring the status class an
/// embedding http layer would answer with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// bad input: rejected before any state change (400)
    Validation,
    /// referenced entity does not exist (404)
    NotFound,
    /// state moved underneath the caller, re-fetch and retry (409)
    Conflict,
    /// actor lacks the required role (403)
    Authorization,
}

impl ErrorKind {
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Authorization => 403,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServicingError {
    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("payment split mismatch: amount {amount}, principal {asal}, interest {interest}")]
    SplitMismatch {
        amount: Money,
        asal: Money,
        interest: Money,
    },

    #[error("principal portion exceeds balance: remaining {remaining}, requested {requested}")]
    ExceedsRemainingBalance {
        remaining: Money,
        requested: Money,
    },

    #[error("daily collection entries carry no interest: got {interest}")]
    UnexpectedInterest {
        interest: Money,
    },

    #[error("interest must be settled before principal: outstanding {outstanding}, offered {offered}")]
    InterestSettlementRequired {
        outstanding: Money,
        offered: Money,
    },

    #[error("entry dated {entry_date} predates loan start {start_date}")]
    EntryBeforeStart {
        entry_date: NaiveDate,
        start_date: NaiveDate,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("interest cycle day must be 1-31: got {day}")]
    InvalidCycleDay {
        day: u8,
    },

    #[error("loan has {entries} ledger entries and can no longer be edited or deleted")]
    LoanHasEntries {
        entries: usize,
    },

    #[error("loan not found: {id}")]
    LoanNotFound {
        id: Uuid,
    },

    #[error("ledger entry not found: {id}")]
    EntryNotFound {
        id: Uuid,
    },

    #[error("customer not found: {id}")]
    CustomerNotFound {
        id: Uuid,
    },

    #[error("expense not found: {id}")]
    ExpenseNotFound {
        id: Uuid,
    },

    #[error("version conflict: expected {expected}, current {current}")]
    VersionConflict {
        expected: u64,
        current: u64,
    },

    #[error("{action} requires {required:?} role, actor is {actual:?}")]
    NotAuthorized {
        action: String,
        required: ActorRole,
        actual: ActorRole,
    },
}

impl ServicingError {
    /// which transport-level class this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServicingError::InvalidPaymentAmount { .. }
            | ServicingError::SplitMismatch { .. }
            | ServicingError::ExceedsRemainingBalance { .. }
            | ServicingError::UnexpectedInterest { .. }
            | ServicingError::InterestSettlementRequired { .. }
            | ServicingError::EntryBeforeStart { .. }
            | ServicingError::InvalidConfiguration { .. }
            | ServicingError::InvalidInterestRate { .. }
            | ServicingError::InvalidCycleDay { .. }
            | ServicingError::LoanHasEntries { .. } => ErrorKind::Validation,
            ServicingError::LoanNotFound { .. }
            | ServicingError::EntryNotFound { .. }
            | ServicingError::CustomerNotFound { .. }
            | ServicingError::ExpenseNotFound { .. } => ErrorKind::NotFound,
            ServicingError::VersionConflict { .. } => ErrorKind::Conflict,
            ServicingError::NotAuthorized { .. } => ErrorKind::Authorization,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServicingError>;
