/// collection day - recording a field collector's rounds with controlled time
use chrono::{Duration, TimeZone, Utc};
use loan_servicing_rs::directory::{CustomerProfile, InMemoryDirectory};
use loan_servicing_rs::ledger::EntryDraft;
use loan_servicing_rs::loan::AccrualStatus;
use loan_servicing_rs::telemetry::init_tracing;
use loan_servicing_rs::types::{Actor, PaymentMethod};
use loan_servicing_rs::{LoanBook, LoanConfig, Money, SafeTimeProvider, TimeSource, Uuid};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    println!("=== collection day ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();

    // three customers with running daily-collection books
    let mut directory = InMemoryDirectory::new();
    let meena = directory.add(CustomerProfile::new(
        Uuid::new_v4(),
        "meena devi",
        "9800000001",
        "ward 4, main road",
        "north",
    ));
    let suresh = directory.add(CustomerProfile::new(
        Uuid::new_v4(),
        "suresh yadav",
        "9800000002",
        "station road",
        "south",
    ));
    let kamala = directory.add(CustomerProfile::new(
        Uuid::new_v4(),
        "kamala kumari",
        "9800000003",
        "ward 7",
        "north",
    ));

    let mut book = LoanBook::new();
    let start = time.now().date_naive();
    let meena_loan = book.open_loan(
        LoanConfig::daily_collection(meena, Money::from_major(10_000), Money::from_major(100), start),
        &time,
    )?;
    let suresh_loan = book.open_loan(
        LoanConfig::daily_collection(suresh, Money::from_major(15_000), Money::from_major(150), start),
        &time,
    )?;
    let kamala_loan = book.open_loan(
        LoanConfig::daily_collection(kamala, Money::from_major(6_000), Money::from_major(100), start),
        &time,
    )?;
    println!("three books opened on {}", start);

    // five days pass before the collector gets back to this street
    controller.advance(Duration::days(5));
    let today = time.now().date_naive();
    println!("\ncollector ramesh does the rounds on {}:\n", today);

    let ramesh = Actor::collector("ramesh");
    let admin = Actor::owner("admin");

    book.record_entry(
        &admin,
        meena_loan,
        EntryDraft::collection(Money::from_major(500)).with_note("paid at the office"),
        &time,
    )?;
    println!("  meena pays 500 in cash at the office, fully caught up");

    book.record_entry(
        &ramesh,
        suresh_loan,
        EntryDraft::collection(Money::from_major(300)).with_method(PaymentMethod::Online),
        &time,
    )?;
    println!("  suresh transfers 300 online to ramesh, still behind");
    println!("  kamala is not home, nothing collected\n");

    // the evening sweep re-checks every book against its schedule
    book.refresh_statuses(&time);

    println!("end of day positions:");
    for (name, id) in [
        ("meena", meena_loan),
        ("suresh", suresh_loan),
        ("kamala", kamala_loan),
    ] {
        let loan = book.loan(id)?;
        if let AccrualStatus::DailyCollection(s) = loan.accrual_status(today) {
            println!(
                "  {:<8} {:?}: collected {} of {} expected, {} behind, {} days overdue",
                name,
                loan.state.status,
                s.collected_to_date,
                s.expected_to_date,
                s.shortfall,
                s.days_overdue,
            );
        }
    }

    println!("\ntotal outstanding: {}", book.total_outstanding());

    // the collector only ever sees entries they recorded themselves
    println!(
        "entries visible to ramesh: {}",
        book.entries_visible_to(&ramesh).len()
    );
    println!(
        "entries visible to the owner: {}",
        book.entries_visible_to(&admin).len()
    );

    Ok(())
}
