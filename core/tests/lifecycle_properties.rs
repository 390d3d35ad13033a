//! Properties every customer classification must satisfy, whatever the
//! visit history looks like.

use chrono::{Duration, NaiveDate};
use salon_core::{
    clock::ReferenceClock,
    config::AnalyticsConfig,
    customer::{Appointment, AppointmentStatus, Customer, CustomerStatus, Visit},
    engine::CustomerAnalytics,
    history::ReservationSignal,
    interval::{average_interval, frequency_change},
    loss::estimated_monthly_loss,
    risk::{risk_score, score_risk},
    history::VisitHistory,
    status::classify_status,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn clock() -> ReferenceClock {
    ReferenceClock::fixed(today())
}

/// Visits for `customer` at the given numbers of days before today.
fn visits_days_ago(customer: &str, days_ago: &[i64]) -> Vec<Visit> {
    days_ago
        .iter()
        .enumerate()
        .map(|(i, n)| {
            Visit::new(format!("{customer}-v{i}"), customer, today() - Duration::days(*n))
                .with_amount(15_000.0)
        })
        .collect()
}

/// A spread of histories: empty, recent, old, dense, sparse, future-dated.
fn histories() -> Vec<Vec<i64>> {
    vec![
        vec![],
        vec![3],
        vec![45],
        vec![70],
        vec![200],
        vec![10, 31, 52, 73],
        vec![-10, 5, 26],
        vec![100, 121, 142, 163, 184],
        vec![0, 0, 0, 0],
    ]
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// remaining_visits == 0 always graduates, whatever the visit history.
#[test]
fn no_remaining_visits_always_graduates() {
    for days in histories() {
        let c = Customer::new("c", 150_000.0, 0);
        let visits = visits_days_ago("c", &days);
        assert_eq!(
            classify_status(&c, &visits, &clock()),
            CustomerStatus::Graduated,
            "history {days:?}"
        );
        assert_eq!(estimated_monthly_loss(&c, &visits, &clock()), 0);
    }
}

/// A declared status comes back unchanged.
#[test]
fn declared_status_is_returned_verbatim() {
    for declared in CustomerStatus::ALL {
        for days in histories() {
            let c = Customer::new("c", 150_000.0, 4).with_declared_status(declared);
            let visits = visits_days_ago("c", &days);
            assert_eq!(classify_status(&c, &visits, &clock()), declared);
        }
    }
}

/// No visits, no declared status, visits remaining: lapsed.
#[test]
fn no_visits_is_three_months_no_visit() {
    for remaining in [1, 5, 20] {
        let c = Customer::new("c", 150_000.0, remaining);
        assert_eq!(classify_status(&c, &[], &clock()), CustomerStatus::ThreeMonthsNoVisit);
    }
}

/// Scenario: no visits, 5 remaining.
#[test]
fn new_customer_without_history() {
    let config = AnalyticsConfig::default();
    let c = Customer::new("c", 150_000.0, 5);
    let history = VisitHistory::default();

    assert_eq!(average_interval(&c, &[]), 30);
    let b = score_risk(&c, CustomerStatus::ThreeMonthsNoVisit, &history, &clock(), &config);
    assert_eq!(b.recency_component, 30);
    assert_eq!(b.status_component, 40);
}

/// Scenario: remaining 0 gives graduated, zero loss and zero status weight.
#[test]
fn graduated_customer_scores_no_status_risk() {
    let config = AnalyticsConfig::default();
    let visits = visits_days_ago("c", &[5, 26, 47]);
    let c = Customer::new("c", 150_000.0, 0);
    let analytics = CustomerAnalytics::new(&config, clock(), &visits);

    assert_eq!(analytics.status(&c), CustomerStatus::Graduated);
    assert_eq!(analytics.loss(&c).amount, 0);
    assert_eq!(analytics.risk(&c).status_component, 0);
}

#[test]
fn average_interval_boundaries() {
    let c = Customer::new("c", 150_000.0, 5);
    assert_eq!(average_interval(&c, &visits_days_ago("c", &[20, 30])), 10);
    assert_eq!(average_interval(&c, &visits_days_ago("c", &[20])), 30);
    assert_eq!(average_interval(&c, &[]), 30);
}

#[test]
fn frequency_change_needs_four_visits() {
    let c = Customer::new("c", 150_000.0, 5);
    for days in [vec![], vec![1], vec![1, 40], vec![1, 40, 90]] {
        assert_eq!(frequency_change(&c, &visits_days_ago("c", &days)), 0);
    }
}

/// Healthy and closed statuses never carry a loss.
#[test]
fn no_loss_for_repeating_or_graduated() {
    for status in [
        CustomerStatus::RepeatingWithReservation,
        CustomerStatus::RepeatingNoReservation,
        CustomerStatus::Graduated,
    ] {
        for days in histories() {
            let c = Customer::new("c", 150_000.0, 3).with_declared_status(status);
            let visits = visits_days_ago("c", &days);
            assert_eq!(estimated_monthly_loss(&c, &visits, &clock()), 0);
        }
    }
}

/// Holding everything else fixed, a later last visit never lowers the score,
/// and every score stays in [0, 100].
#[test]
fn risk_is_monotone_in_recency_and_bounded() {
    let config = AnalyticsConfig::default();
    for status in CustomerStatus::ALL {
        for remaining in [0, 3, 12] {
            let mut previous = 0u8;
            for days in -30..=400 {
                let c = Customer::new("c", 150_000.0, remaining)
                    .with_last_visit_date(today() - Duration::days(days));
                let b = score_risk(&c, status, &VisitHistory::default(), &clock(), &config);
                assert!(b.score <= 100);
                assert!(
                    b.score >= previous,
                    "score fell from {previous} to {} at {days} days ({status})",
                    b.score
                );
                previous = b.score;
            }
        }
    }
}

#[test]
fn risk_score_bounded_for_every_history() {
    for remaining in [0, 1, 5, 15] {
        for days in histories() {
            let c = Customer::new("c", 150_000.0, remaining);
            let visits = visits_days_ago("c", &days);
            assert!(risk_score(&c, &visits, &clock()) <= 100);
        }
    }
}

fn booking(customer: &str, date: NaiveDate, status: AppointmentStatus) -> Appointment {
    Appointment {
        id: format!("{customer}-a"),
        customer_id: customer.into(),
        start_time: date.and_hms_opt(13, 0, 0).unwrap(),
        end_time: date.and_hms_opt(14, 30, 0).unwrap(),
        status,
        menu: None,
        price: None,
        staff_name: None,
    }
}

/// Only a scheduled upcoming appointment counts as a follow-up booking.
#[test]
fn scheduled_appointment_clears_last_month_segment() {
    let d = |m: u32, day: u32| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
    let customers = vec![
        Customer::new("booked", 150_000.0, 6),
        Customer::new("cancelled", 150_000.0, 6),
        Customer::new("past-only", 150_000.0, 6),
    ];
    let visits = vec![
        Visit::new("v1", "booked", d(9, 20)),
        Visit::new("v2", "cancelled", d(9, 22)),
        Visit::new("v3", "past-only", d(9, 25)),
    ];
    let appointments = vec![
        booking("booked", d(10, 25), AppointmentStatus::Scheduled),
        booking("cancelled", d(10, 26), AppointmentStatus::Cancelled),
        booking("past-only", d(10, 1), AppointmentStatus::Completed),
    ];
    let config = AnalyticsConfig::default();

    let ids = |list: &[&Customer]| list.iter().map(|c| c.id.clone()).collect::<Vec<_>>();

    let by_visits = CustomerAnalytics::new(&config, clock(), &visits);
    let segments = by_visits.segments(&customers);
    assert_eq!(ids(&segments.last_month_no_follow), ["booked", "cancelled", "past-only"]);

    let by_appointments = CustomerAnalytics::new(&config, clock(), &visits)
        .with_reservations(ReservationSignal::Appointments(&appointments));
    let segments = by_appointments.segments(&customers);
    assert_eq!(ids(&segments.last_month_no_follow), ["cancelled", "past-only"]);
    assert!(segments.repeating_no_reservation.is_empty());
    assert_eq!(
        by_appointments.status(&customers[0]),
        CustomerStatus::RepeatingWithReservation
    );
    assert_eq!(
        by_appointments.status(&customers[1]),
        CustomerStatus::LastMonthVisited
    );
}
