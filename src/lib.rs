pub mod accrual;
pub mod book;
pub mod config;
pub mod decimal;
pub mod directory;
pub mod errors;
pub mod events;
pub mod expense;
pub mod ledger;
pub mod loan;
pub mod reports;
pub mod state;
pub mod telemetry;
pub mod types;
pub mod views;

// re-export key types
pub use decimal::{Money, Rate};
pub use errors::{ErrorKind, Result, ServicingError};
pub use events::{Event, EventStore};
pub use accrual::{
    DailyCollectionEngine, DailyCollectionStatus, DailyInterestEngine, DailyInterestStatus,
    MonthlyInterestEngine, MonthlyInterestStatus,
};
pub use book::LoanBook;
pub use config::{LoanConfig, LoanTerms};
pub use directory::{CustomerDirectory, CustomerProfile, InMemoryDirectory};
pub use expense::Expense;
pub use ledger::{EntryDraft, LedgerEntry, LedgerTotals, Projector};
pub use loan::{AccrualStatus, Loan};
pub use state::LoanState;
pub use types::{
    Actor, ActorRole, CustomerId, EntryId, ExpenseId, LoanId, LoanStatus, LoanType, PaymentMethod,
};
pub use views::{EntryView, LoanView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
