use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{Result, ServicingError};
use crate::types::ExpenseId;

/// an operating expense, kept apart from the loan ledgers and used
/// only when netting interest income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: Money,
    pub incurred_on: NaiveDate,
    pub recorded_by: String,
}

impl Expense {
    pub fn new(
        description: impl Into<String>,
        amount: Money,
        incurred_on: NaiveDate,
        recorded_by: impl Into<String>,
    ) -> Result<Self> {
        if !amount.is_positive() {
            return Err(ServicingError::InvalidPaymentAmount { amount });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            incurred_on,
            recorded_by: recorded_by.into(),
        })
    }
}
