use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{Result, ServicingError};
use crate::types::{CustomerId, LoanType, PaymentMethod};

/// loan configuration fixed at origination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanConfig {
    pub customer_id: CustomerId,
    pub principal_amount: Money,
    pub start_date: NaiveDate,
    pub disbursement_method: PaymentMethod,
    pub terms: LoanTerms,
}

/// product terms, one variant per loan type carrying only its own fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoanTerms {
    /// fixed daily principal installment, no interest
    DailyCollection {
        daily_collection_amount: Money,
        expected_total_days: Option<u32>,
    },
    /// one interest charge per monthly cycle anchored to a day of month
    MonthlyInterest {
        monthly_interest_rate: Rate,
        interest_cycle_day: u8,
    },
    /// interest accrues per calendar day on the outstanding principal
    DailyInterest {
        daily_interest_rate: Rate,
        max_days: Option<u32>,
        allow_asal_payment_anytime: bool,
    },
}

impl LoanTerms {
    pub fn loan_type(&self) -> LoanType {
        match self {
            LoanTerms::DailyCollection { .. } => LoanType::DailyCollection,
            LoanTerms::MonthlyInterest { .. } => LoanType::MonthlyInterest,
            LoanTerms::DailyInterest { .. } => LoanType::DailyInterest,
        }
    }
}

impl LoanConfig {
    /// create a daily-collection loan configuration
    pub fn daily_collection(
        customer_id: CustomerId,
        principal_amount: Money,
        daily_collection_amount: Money,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            customer_id,
            principal_amount,
            start_date,
            disbursement_method: PaymentMethod::Cash,
            terms: LoanTerms::DailyCollection {
                daily_collection_amount,
                expected_total_days: None,
            },
        }
    }

    /// create a monthly-interest loan configuration
    pub fn monthly_interest(
        customer_id: CustomerId,
        principal_amount: Money,
        monthly_interest_rate: Rate,
        interest_cycle_day: u8,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            customer_id,
            principal_amount,
            start_date,
            disbursement_method: PaymentMethod::Cash,
            terms: LoanTerms::MonthlyInterest {
                monthly_interest_rate,
                interest_cycle_day,
            },
        }
    }

    /// create a daily-interest loan configuration
    pub fn daily_interest(
        customer_id: CustomerId,
        principal_amount: Money,
        daily_interest_rate: Rate,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            customer_id,
            principal_amount,
            start_date,
            disbursement_method: PaymentMethod::Cash,
            terms: LoanTerms::DailyInterest {
                daily_interest_rate,
                max_days: None,
                allow_asal_payment_anytime: true,
            },
        }
    }

    /// set how the principal was handed out
    pub fn with_disbursement_method(mut self, method: PaymentMethod) -> Self {
        self.disbursement_method = method;
        self
    }

    /// override the expected collection span of a daily-collection loan
    pub fn with_expected_total_days(mut self, days: u32) -> Self {
        if let LoanTerms::DailyCollection {
            ref mut expected_total_days,
            ..
        } = self.terms
        {
            *expected_total_days = Some(days);
        }
        self
    }

    /// cap the life of a daily-interest loan
    pub fn with_max_days(mut self, days: u32) -> Self {
        if let LoanTerms::DailyInterest {
            ref mut max_days, ..
        } = self.terms
        {
            *max_days = Some(days);
        }
        self
    }

    /// require interest to be settled before principal payments (daily-interest only)
    pub fn with_interest_settled_first(mut self) -> Self {
        if let LoanTerms::DailyInterest {
            ref mut allow_asal_payment_anytime,
            ..
        } = self.terms
        {
            *allow_asal_payment_anytime = false;
        }
        self
    }

    pub fn loan_type(&self) -> LoanType {
        self.terms.loan_type()
    }

    /// days a daily-collection book is expected to run: the configured span,
    /// or ceil(principal / daily amount) when none was set
    pub fn expected_completion_days(&self) -> Option<u32> {
        match &self.terms {
            LoanTerms::DailyCollection {
                daily_collection_amount,
                expected_total_days,
            } => expected_total_days.or_else(|| {
                (self.principal_amount.as_decimal() / daily_collection_amount.as_decimal())
                    .ceil()
                    .to_u32()
            }),
            _ => None,
        }
    }

    /// boundary validation before the configuration enters the book
    pub fn validate(&self) -> Result<()> {
        if !self.principal_amount.is_positive() {
            return Err(ServicingError::InvalidConfiguration {
                message: format!("principal must be positive, got {}", self.principal_amount),
            });
        }

        match &self.terms {
            LoanTerms::DailyCollection {
                daily_collection_amount,
                expected_total_days,
            } => {
                if !daily_collection_amount.is_positive() {
                    return Err(ServicingError::InvalidConfiguration {
                        message: format!(
                            "daily collection amount must be positive, got {}",
                            daily_collection_amount
                        ),
                    });
                }
                if *daily_collection_amount > self.principal_amount {
                    return Err(ServicingError::InvalidConfiguration {
                        message: format!(
                            "daily collection amount {} exceeds principal {}",
                            daily_collection_amount, self.principal_amount
                        ),
                    });
                }
                if expected_total_days == &Some(0) {
                    return Err(ServicingError::InvalidConfiguration {
                        message: "expected total days must be at least 1".to_string(),
                    });
                }
            }
            LoanTerms::MonthlyInterest {
                monthly_interest_rate,
                interest_cycle_day,
            } => {
                if monthly_interest_rate.as_decimal().is_sign_negative()
                    || monthly_interest_rate.as_decimal().is_zero()
                {
                    return Err(ServicingError::InvalidInterestRate {
                        rate: *monthly_interest_rate,
                    });
                }
                if !(1..=31).contains(interest_cycle_day) {
                    return Err(ServicingError::InvalidCycleDay {
                        day: *interest_cycle_day,
                    });
                }
            }
            LoanTerms::DailyInterest {
                daily_interest_rate,
                max_days,
                ..
            } => {
                if daily_interest_rate.as_decimal().is_sign_negative()
                    || daily_interest_rate.as_decimal().is_zero()
                {
                    return Err(ServicingError::InvalidInterestRate {
                        rate: *daily_interest_rate,
                    });
                }
                if max_days == &Some(0) {
                    return Err(ServicingError::InvalidConfiguration {
                        message: "max days must be at least 1".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}
