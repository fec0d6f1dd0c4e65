/// reports - month-end summaries, breakdowns, channel flow, and the dashboard
use chrono::{Duration, TimeZone, Utc};
use loan_servicing_rs::directory::{CustomerProfile, InMemoryDirectory};
use loan_servicing_rs::ledger::EntryDraft;
use loan_servicing_rs::reports::{
    area_breakdown, collection_summary, dashboard, payment_flow, ReportFilters, ReportPeriod,
};
use loan_servicing_rs::telemetry::init_tracing;
use loan_servicing_rs::types::{Actor, PaymentMethod};
use loan_servicing_rs::{LoanBook, LoanConfig, Money, Rate, SafeTimeProvider, TimeSource, Uuid};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    println!("=== month-end reports ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();
    let admin = Actor::owner("admin");
    let ramesh = Actor::collector("ramesh");

    let mut directory = InMemoryDirectory::new();
    let meena = directory.add(CustomerProfile::new(
        Uuid::new_v4(),
        "meena devi",
        "9800000001",
        "ward 4",
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
    let binod = directory.add(CustomerProfile::new(
        Uuid::new_v4(),
        "binod thapa",
        "9800000004",
        "river side",
        "east",
    ));

    // one book, every product type, all opened on new year's day
    let mut book = LoanBook::new();
    let start = time.now().date_naive();
    let meena_loan = book.open_loan(
        LoanConfig::daily_collection(meena, Money::from_major(10_000), Money::from_major(100), start),
        &time,
    )?;
    let suresh_loan = book.open_loan(
        LoanConfig::daily_interest(suresh, Money::from_major(20_000), Rate::from_percent(dec!(0.5)), start)
            .with_disbursement_method(PaymentMethod::Online),
        &time,
    )?;
    let kamala_loan = book.open_loan(
        LoanConfig::monthly_interest(kamala, Money::from_major(50_000), Rate::from_percentage(5), 15, start),
        &time,
    )?;
    let binod_loan = book.open_loan(
        LoanConfig::daily_collection(binod, Money::from_major(5_000), Money::from_major(100), start),
        &time,
    )?;

    // a january of collections
    controller.advance(Duration::days(5));
    book.record_entry(&ramesh, meena_loan, EntryDraft::collection(Money::from_major(500)), &time)?;
    book.record_entry(&ramesh, binod_loan, EntryDraft::collection(Money::from_major(300)), &time)?;

    controller.advance(Duration::days(4));
    book.record_entry(
        &admin,
        suresh_loan,
        EntryDraft::split(
            Money::from_major(1_900),
            Money::from_major(1_000),
            Money::from_major(900),
        )
        .with_method(PaymentMethod::Online),
        &time,
    )?;

    controller.advance(Duration::days(5));
    book.record_entry(
        &admin,
        kamala_loan,
        EntryDraft::interest_only(Money::from_major(2_500)),
        &time,
    )?;
    book.record_expense(&admin, "office rent", Money::from_major(1_000), time.now().date_naive())?;

    controller.advance(Duration::days(16));
    let month_end = time.now().date_naive();

    // whole-book summary for january
    let january = ReportPeriod::new(start, month_end);
    let summary = collection_summary(&book, &directory, january, &ReportFilters::default());
    println!("january summary:");
    println!("  disbursed      {} across {} loans", summary.total_disbursed, summary.total_loans_count);
    println!("  collected      {} in {} transactions", summary.total_collected, summary.total_transactions);
    println!("  principal      {}", summary.total_principal_collected);
    println!("  interest       {}", summary.total_interest_collected);
    println!("  expenses       {}", summary.total_expenses);
    println!("  net income     {}", summary.net_income);
    println!("  areas          {:?}", summary.available_areas);

    // the same summary scoped to one area
    let north_only = ReportFilters {
        area: Some("north".to_string()),
        loan_type: None,
    };
    let north = collection_summary(&book, &directory, january, &north_only);
    println!("\nnorth area alone collected {}", north.total_collected);

    // busiest areas first
    println!("\narea breakdown:");
    for row in area_breakdown(&book, &directory, january, &ReportFilters::default()) {
        println!(
            "  {:<8} {} collected from {} loans ({} customers)",
            row.area, row.total_collected, row.loans, row.customers
        );
    }

    // cash against online, in and out
    let flow = payment_flow(&book, january);
    println!("\npayment channels:");
    println!(
        "  disbursed: cash {} ({}%), online {} ({}%)",
        flow.disbursement.cash,
        flow.disbursement.cash_percentage,
        flow.disbursement.online,
        flow.disbursement.online_percentage,
    );
    println!(
        "  repaid:    cash {}, online {}",
        flow.repayment.cash, flow.repayment.online
    );
    println!(
        "  net flow:  cash {}, online {}, total {}",
        flow.net_cash_flow, flow.net_online_flow, flow.total_flow
    );

    // the morning screen
    let snapshot = dashboard(&book, &directory, month_end);
    println!("\ndashboard on {}:", month_end);
    println!(
        "  {} active loans over {} customers, {} outstanding",
        snapshot.quick_stats.total_active_loans,
        snapshot.quick_stats.total_active_customers,
        snapshot.total_outstanding,
    );
    println!(
        "  avg collected per day over the last month: {}",
        snapshot.quick_stats.avg_collection_per_day
    );
    for alert in &snapshot.overdue_alerts {
        println!(
            "  overdue: {} ({:?}) {} days behind, {} expected",
            alert.customer_name.as_deref().unwrap_or("?"),
            alert.loan_type,
            alert.days_overdue,
            alert.expected_amount,
        );
    }

    println!("\nsummary as json:\n{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
