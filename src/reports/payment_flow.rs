use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::book::LoanBook;
use crate::decimal::Money;
use crate::types::PaymentMethod;

use super::{percentage_of, ReportPeriod};

/// money moved through one channel pair, with the cash/online shares
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodSplit {
    pub count: u32,
    pub total: Money,
    pub cash: Money,
    pub online: Money,
    pub cash_percentage: Decimal,
    pub online_percentage: Decimal,
}

impl MethodSplit {
    fn from_parts(count: u32, cash: Money, online: Money) -> Self {
        let total = cash + online;
        MethodSplit {
            count,
            total,
            cash,
            online,
            cash_percentage: percentage_of(cash, total),
            online_percentage: percentage_of(online, total),
        }
    }
}

/// one day of channel activity inside the report window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyFlow {
    pub day: NaiveDate,
    pub cash_disbursed: Money,
    pub online_disbursed: Money,
    pub cash_collected: Money,
    pub online_collected: Money,
}

impl DailyFlow {
    fn empty(day: NaiveDate) -> Self {
        DailyFlow {
            day,
            cash_disbursed: Money::ZERO,
            online_disbursed: Money::ZERO,
            cash_collected: Money::ZERO,
            online_collected: Money::ZERO,
        }
    }
}

/// cash-versus-online movement over a period: what went out as new
/// principal, what came back in collections, and the net per channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentFlowReport {
    pub period: ReportPeriod,
    pub disbursement: MethodSplit,
    pub repayment: MethodSplit,
    pub net_cash_flow: Money,
    pub net_online_flow: Money,
    pub total_flow: Money,
    pub daily: Vec<DailyFlow>,
}

pub fn payment_flow(book: &LoanBook, period: ReportPeriod) -> PaymentFlowReport {
    let mut loans_opened = 0u32;
    let mut cash_disbursed = Money::ZERO;
    let mut online_disbursed = Money::ZERO;
    let mut entry_count = 0u32;
    let mut cash_collected = Money::ZERO;
    let mut online_collected = Money::ZERO;
    let mut daily: Vec<DailyFlow> = Vec::new();

    fn day_slot(daily: &mut Vec<DailyFlow>, day: NaiveDate) -> &mut DailyFlow {
        let index = match daily.iter().position(|d| d.day == day) {
            Some(i) => i,
            None => {
                daily.push(DailyFlow::empty(day));
                daily.len() - 1
            }
        };
        &mut daily[index]
    }

    for loan in &book.loans {
        if period.contains(loan.config.start_date) {
            loans_opened += 1;
            let principal = loan.config.principal_amount;
            let slot = day_slot(&mut daily, loan.config.start_date);
            match loan.config.disbursement_method {
                PaymentMethod::Cash => {
                    cash_disbursed += principal;
                    slot.cash_disbursed += principal;
                }
                PaymentMethod::Online => {
                    online_disbursed += principal;
                    slot.online_disbursed += principal;
                }
            }
        }

        for entry in &loan.entries {
            let day = entry.recorded_on();
            if !period.contains(day) {
                continue;
            }
            entry_count += 1;
            let slot = day_slot(&mut daily, day);
            match entry.payment_method {
                PaymentMethod::Cash => {
                    cash_collected += entry.amount;
                    slot.cash_collected += entry.amount;
                }
                PaymentMethod::Online => {
                    online_collected += entry.amount;
                    slot.online_collected += entry.amount;
                }
            }
        }
    }

    daily.sort_by_key(|d| d.day);

    let net_cash_flow = cash_collected - cash_disbursed;
    let net_online_flow = online_collected - online_disbursed;

    PaymentFlowReport {
        period,
        disbursement: MethodSplit::from_parts(loans_opened, cash_disbursed, online_disbursed),
        repayment: MethodSplit::from_parts(entry_count, cash_collected, online_collected),
        net_cash_flow,
        net_online_flow,
        total_flow: net_cash_flow + net_online_flow,
        daily,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::config::LoanConfig;
    use crate::ledger::EntryDraft;
    use crate::types::Actor;

    fn january() -> ReportPeriod {
        ReportPeriod::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
    }

    #[test]
    fn test_channel_splits_and_net_flow() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap(),
        ));
        let control = time.test_control().unwrap();
        let mut book = LoanBook::new();
        let admin = Actor::owner("admin");
        let today = time.now().date_naive();

        let cash_loan = book
            .open_loan(
                LoanConfig::daily_collection(
                    Uuid::new_v4(),
                    Money::from_major(6_000),
                    Money::from_major(100),
                    today,
                ),
                &time,
            )
            .unwrap();
        let online_loan = book
            .open_loan(
                LoanConfig::daily_collection(
                    Uuid::new_v4(),
                    Money::from_major(4_000),
                    Money::from_major(100),
                    today,
                )
                .with_disbursement_method(PaymentMethod::Online),
                &time,
            )
            .unwrap();

        book.record_entry(
            &admin,
            cash_loan,
            EntryDraft::collection(Money::from_major(300)),
            &time,
        )
        .unwrap();
        control.advance(chrono::Duration::days(1));
        book.record_entry(
            &admin,
            online_loan,
            EntryDraft::collection(Money::from_major(200))
                .with_method(PaymentMethod::Online),
            &time,
        )
        .unwrap();

        let report = payment_flow(&book, january());

        assert_eq!(report.disbursement.count, 2);
        assert_eq!(report.disbursement.total, Money::from_major(10_000));
        assert_eq!(report.disbursement.cash, Money::from_major(6_000));
        assert_eq!(report.disbursement.cash_percentage, dec!(60.0));

        assert_eq!(report.repayment.count, 2);
        assert_eq!(report.repayment.cash, Money::from_major(300));
        assert_eq!(report.repayment.online, Money::from_major(200));

        assert_eq!(report.net_cash_flow, Money::from_major(300 - 6_000));
        assert_eq!(report.net_online_flow, Money::from_major(200 - 4_000));
        assert_eq!(report.total_flow, Money::from_major(500 - 10_000));

        assert_eq!(report.daily.len(), 2);
        assert_eq!(report.daily[0].day, today);
        assert_eq!(report.daily[0].cash_disbursed, Money::from_major(6_000));
        assert_eq!(report.daily[0].cash_collected, Money::from_major(300));
        assert_eq!(report.daily[1].online_collected, Money::from_major(200));
    }

    #[test]
    fn test_empty_period_has_zero_percentages() {
        let book = LoanBook::new();
        let report = payment_flow(&book, january());

        assert_eq!(report.disbursement.total, Money::ZERO);
        assert_eq!(report.disbursement.cash_percentage, Decimal::ZERO);
        assert_eq!(report.repayment.count, 0);
        assert!(report.daily.is_empty());
        assert_eq!(report.total_flow, Money::ZERO);
    }
}
