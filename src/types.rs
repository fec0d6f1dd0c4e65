use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a customer
pub type CustomerId = Uuid;

/// unique identifier for a ledger entry
pub type EntryId = Uuid;

/// unique identifier for an expense row
pub type ExpenseId = Uuid;

/// loan product family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanType {
    /// fixed daily principal installment, no interest
    DailyCollection,
    /// interest charged once per monthly cycle on remaining principal
    MonthlyInterest,
    /// interest accrues every calendar day on remaining principal
    DailyInterest,
}

impl LoanType {
    pub fn label(&self) -> &'static str {
        match self {
            LoanType::DailyCollection => "daily collection",
            LoanType::MonthlyInterest => "monthly interest",
            LoanType::DailyInterest => "daily interest",
        }
    }
}

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// loan disbursed and collecting
    Active,
    /// fully repaid, balance at zero
    Settled,
    /// collections behind the product's schedule
    Overdue,
}

/// how money moved for a ledger entry or a disbursement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Online,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Online => "online",
        }
    }
}

/// role of the person performing an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorRole {
    /// full administrative access, may reverse ledger entries
    Owner,
    /// field staff recording collections
    Collector,
}

/// the person performing an operation, attributed on every ledger write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub role: ActorRole,
}

impl Actor {
    pub fn owner(name: impl Into<String>) -> Self {
        Actor {
            name: name.into(),
            role: ActorRole::Owner,
        }
    }

    pub fn collector(name: impl Into<String>) -> Self {
        Actor {
            name: name.into(),
            role: ActorRole::Collector,
        }
    }

    pub fn is_owner(&self) -> bool {
        self.role == ActorRole::Owner
    }
}
