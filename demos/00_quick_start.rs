/// quick start - minimal example to get started
use loan_servicing_rs::directory::{CustomerProfile, InMemoryDirectory};
use loan_servicing_rs::ledger::EntryDraft;
use loan_servicing_rs::types::Actor;
use loan_servicing_rs::views::LoanView;
use loan_servicing_rs::{LoanBook, LoanConfig, Money, SafeTimeProvider, TimeSource, Uuid};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);

    // a customer the reports can name
    let mut directory = InMemoryDirectory::new();
    let customer = directory.add(CustomerProfile::new(
        Uuid::new_v4(),
        "meena devi",
        "9800000001",
        "ward 4, main road",
        "north",
    ));

    // open a 10,000 daily-collection loan at 100 per day
    let mut book = LoanBook::new();
    let loan_id = book.open_loan(
        LoanConfig::daily_collection(
            customer,
            Money::from_major(10_000),
            Money::from_major(100),
            time.now().date_naive(),
        ),
        &time,
    )?;

    // record the first installment
    let admin = Actor::owner("admin");
    book.record_entry(
        &admin,
        loan_id,
        EntryDraft::collection(Money::from_major(100)),
        &time,
    )?;

    // print current state
    let view = LoanView::from_loan(book.loan(loan_id)?, &directory, time.now().date_naive());
    println!("{}", view.to_json_pretty()?);

    Ok(())
}
