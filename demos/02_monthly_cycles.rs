/// monthly cycles - interest charges, partial payment carry, and settlement
use chrono::{Duration, TimeZone, Utc};
use loan_servicing_rs::ledger::EntryDraft;
use loan_servicing_rs::loan::AccrualStatus;
use loan_servicing_rs::types::Actor;
use loan_servicing_rs::{LoanBook, LoanConfig, Money, Rate, SafeTimeProvider, TimeSource, Uuid};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== monthly interest cycles ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();
    let admin = Actor::owner("admin");

    // 50,000 at 5% per month, charged on the 5th
    let mut book = LoanBook::new();
    let loan_id = book.open_loan(
        LoanConfig::monthly_interest(
            Uuid::new_v4(),
            Money::from_major(50_000),
            Rate::from_percentage(5),
            5,
            time.now().date_naive(),
        ),
        &time,
    )?;
    println!("loan opened {}, first charge due on the next 5th", time.now().format("%Y-%m-%d"));

    // first cycle anchor arrives
    controller.advance(Duration::days(31));
    let today = time.now().date_naive();
    let loan = book.loan(loan_id)?;
    if let AccrualStatus::MonthlyInterest(s) = loan.accrual_status(today) {
        println!(
            "\n{}: charge of {} due today (cycle {} to {})",
            today, s.expected_interest, s.cycle.start, s.cycle.end
        );
    }

    // the customer can only manage part of it; the rest carries forward
    book.record_entry(
        &admin,
        loan_id,
        EntryDraft::interest_only(Money::from_major(1_000)),
        &time,
    )?;
    let loan = book.loan(loan_id)?;
    println!(
        "paid 1,000 of the charge, pending interest now {}",
        loan.state.pending_interest
    );

    // ten days later the balance of the charge is cleared
    controller.advance(Duration::days(10));
    book.record_entry(
        &admin,
        loan_id,
        EntryDraft::interest_only(Money::from_major(1_500)),
        &time,
    )?;
    let loan = book.loan(loan_id)?;
    println!(
        "{}: remaining 1,500 paid, pending {}, interest settled on {:?}",
        time.now().format("%Y-%m-%d"),
        loan.state.pending_interest,
        loan.state.last_interest_settled_on,
    );

    // next anchor: a fresh charge on the unchanged principal
    controller.advance(Duration::days(19));
    let today = time.now().date_naive();
    let loan = book.loan(loan_id)?;
    if let AccrualStatus::MonthlyInterest(s) = loan.accrual_status(today) {
        println!(
            "\n{}: new cycle, charge {} due again",
            today, s.expected_interest
        );
    }

    // this month the customer pays the interest and 10,000 of principal
    book.record_entry(
        &admin,
        loan_id,
        EntryDraft::split(
            Money::from_major(12_500),
            Money::from_major(10_000),
            Money::from_major(2_500),
        ),
        &time,
    )?;
    let loan = book.loan(loan_id)?;
    println!(
        "split payment recorded, remaining principal {}",
        loan.current_balance()
    );

    // the following charge shrinks with the principal
    controller.advance(Duration::days(31));
    let today = time.now().date_naive();
    let loan = book.loan(loan_id)?;
    if let AccrualStatus::MonthlyInterest(s) = loan.accrual_status(today) {
        println!(
            "\n{}: charge on the reduced principal is {}",
            today, s.expected_interest
        );
    }

    Ok(())
}
