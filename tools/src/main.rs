//! crm-report: headless analytics runner for the salon CRM.
//!
//! Usage:
//!   crm-report --seed 12345 --customers 60 --today 2026-10-18
//!   crm-report --data customers.json --config analytics.json --json
//!   crm-report --seed 7 --dump-dataset > mock.json

use anyhow::{Context, Result};
use salon_core::{
    clock::ReferenceClock,
    config::AnalyticsConfig,
    dataset::Dataset,
    engine::{CustomerAnalytics, CustomerProfile},
    history::ReservationSignal,
    mock::MockDataGenerator,
    report::{self, DashboardSummary, MonthlyTrendPoint, StatusDistribution},
    segments::SegmentCounts,
};
use std::env;

#[derive(serde::Serialize)]
struct FullReport {
    dashboard:    DashboardSummary,
    distribution: StatusDistribution,
    trend:        Vec<MonthlyTrendPoint>,
    at_risk:      Vec<CustomerProfile>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let customer_count = parse_arg(&args, "--customers", 60usize);
    let months = parse_arg(&args, "--months", 6u32);
    let top = parse_arg(&args, "--top", 10usize);
    let json = has_flag(&args, "--json");
    let dump_dataset = has_flag(&args, "--dump-dataset");
    let use_appointments = has_flag(&args, "--use-appointments");
    let undeclared = has_flag(&args, "--derive-statuses");

    let clock = match arg_value(&args, "--today") {
        Some(raw) => ReferenceClock::parse(raw).context("--today expects YYYY-MM-DD")?,
        None => ReferenceClock::system(),
    };

    let config = match arg_value(&args, "--config") {
        Some(path) => AnalyticsConfig::load(path)?,
        None => AnalyticsConfig::default(),
    };

    let dataset = match arg_value(&args, "--data") {
        Some(path) => Dataset::load(path)?,
        None => {
            let generator = MockDataGenerator::new(seed, clock);
            let generator = if undeclared {
                generator.without_declared_statuses()
            } else {
                generator
            };
            generator.generate(customer_count)
        }
    };

    log::info!(
        "crm-report: today={} customers={} visits={}",
        clock.today,
        dataset.customers.len(),
        dataset.visits.len(),
    );

    if dump_dataset {
        println!("{}", dataset.to_json_pretty()?);
        return Ok(());
    }

    let analytics = CustomerAnalytics::new(&config, clock, &dataset.visits);
    let analytics = if use_appointments {
        analytics.with_reservations(ReservationSignal::Appointments(&dataset.appointments))
    } else {
        analytics
    };

    let full = FullReport {
        dashboard:    report::dashboard(&analytics, &dataset.customers, &dataset.appointments),
        distribution: report::status_distribution(&analytics, &dataset.customers),
        trend:        report::monthly_trend(&analytics, &dataset.customers, months),
        at_risk:      report::at_risk_customers(&analytics, &dataset.customers),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&full)?);
    } else {
        print_report(&full, top);
    }
    Ok(())
}

fn print_report(full: &FullReport, top: usize) {
    let d = &full.dashboard;
    println!("Salon CRM: customer analytics");
    println!("  as of:              {}", d.as_of);
    println!("  customers:          {}", d.total_customers);
    println!("  follow-ups needed:  {}", d.follow_up_count);
    println!("  monthly loss:       {}", d.monthly_loss);
    println!("  today's bookings:   {}", d.today_appointments);
    println!();

    print_segments(&d.segments);

    println!("=== STATUS DISTRIBUTION ===");
    for (status, count) in &full.distribution.counts {
        println!("  {:<28} {count:>4}", status.as_str());
    }
    println!("  active revenue / month: {}", full.distribution.active_revenue);
    println!("  lapsed loss / month:    {}", full.distribution.lapsed_loss);
    println!();

    println!("=== MONTHLY TREND ===");
    for point in &full.trend {
        println!(
            "  {} | active: {:>4} | revenue: {:>10} | lapsed value: {:>10}",
            point.month, point.active_total, point.revenue, point.lapsed_value
        );
    }
    println!();

    println!("=== FOLLOW-UP LIST (top {top}) ===");
    if full.at_risk.is_empty() {
        println!("  (nobody needs a follow-up)");
    }
    for p in full.at_risk.iter().take(top) {
        println!(
            "  {} {:<20} {:<22} risk {:>3} ({}) loss {:>8} -> {}",
            p.customer_id,
            p.name,
            p.status.as_str(),
            p.risk.score,
            p.priority.as_str(),
            p.monthly_loss,
            p.follow_up.description(),
        );
    }
}

fn print_segments(s: &SegmentCounts) {
    println!("=== SEGMENTS ===");
    println!("  two months, no visit since:     {}", s.two_months_no_visit);
    println!("  last month, nothing booked:     {}", s.last_month_no_follow);
    println!("  repeating, nothing booked:      {}", s.repeating_no_reservation);
    println!();
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
