use rust_decimal_macros::dec;

use crate::config::LoanTerms;
use crate::decimal::Money;
use crate::errors::{Result, ServicingError};
use crate::ledger::EntryDraft;

/// split drift tolerated on compound entries, one minor unit
fn split_tolerance() -> Money {
    Money::from_decimal(dec!(0.01))
}

/// validate a draft's amount and principal/interest split against the
/// loan's product rules
pub fn validate_split(terms: &LoanTerms, draft: &EntryDraft) -> Result<()> {
    if !draft.amount.is_positive() {
        return Err(ServicingError::InvalidPaymentAmount {
            amount: draft.amount,
        });
    }
    if draft.asal_amount.is_negative() {
        return Err(ServicingError::InvalidPaymentAmount {
            amount: draft.asal_amount,
        });
    }
    if draft.interest_amount.is_negative() {
        return Err(ServicingError::InvalidPaymentAmount {
            amount: draft.interest_amount,
        });
    }

    match terms {
        LoanTerms::DailyCollection { .. } => {
            // installments are all principal, exactly
            if draft.interest_amount.is_positive() {
                return Err(ServicingError::UnexpectedInterest {
                    interest: draft.interest_amount,
                });
            }
            if draft.asal_amount != draft.amount {
                return Err(ServicingError::SplitMismatch {
                    amount: draft.amount,
                    asal: draft.asal_amount,
                    interest: draft.interest_amount,
                });
            }
        }
        LoanTerms::MonthlyInterest { .. } | LoanTerms::DailyInterest { .. } => {
            let split = draft.asal_amount + draft.interest_amount;
            if (draft.amount - split).abs() > split_tolerance() {
                return Err(ServicingError::SplitMismatch {
                    amount: draft.amount,
                    asal: draft.asal_amount,
                    interest: draft.interest_amount,
                });
            }
        }
    }

    Ok(())
}

/// principal payments on an interest-first loan must clear outstanding
/// interest in the same entry
pub fn validate_interest_first(outstanding_interest: Money, draft: &EntryDraft) -> Result<()> {
    if draft.asal_amount.is_positive() && draft.interest_amount < outstanding_interest {
        return Err(ServicingError::InterestSettlementRequired {
            outstanding: outstanding_interest,
            offered: draft.interest_amount,
        });
    }
    Ok(())
}
