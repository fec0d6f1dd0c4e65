//! interest accrual and collection-schedule arithmetic
//!
//! one engine per loan product, all pure over scalar inputs and a
//! reference date. callers supply balances derived from the ledger;
//! nothing here reads or mutates state.

pub mod calendar;
pub mod daily_collection;
pub mod daily_interest;
pub mod monthly_interest;

pub use calendar::{
    clamped_date, cycle_containing, days_between, elapsed_days, is_charge_day, CycleWindow,
};
pub use daily_collection::{DailyCollectionEngine, DailyCollectionStatus};
pub use daily_interest::{DailyInterestEngine, DailyInterestStatus};
pub use monthly_interest::{MonthlyInterestEngine, MonthlyInterestStatus};
