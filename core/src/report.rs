//! Population reports: dashboard headline figures, status distribution,
//! month-by-month trend and the follow-up work list.

use crate::{
    customer::{Appointment, Customer, CustomerStatus},
    engine::{CustomerAnalytics, CustomerProfile},
    history::ReservationSignal,
    segments::SegmentCounts,
    status::derive_status,
    types::{round_half_up, Money},
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

// ── Dashboard ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardSummary {
    pub as_of:              NaiveDate,
    pub total_customers:    usize,
    /// Customers in a lapsing status that need a contact.
    pub follow_up_count:    usize,
    /// Sum of every customer's estimated monthly loss.
    pub monthly_loss:       Money,
    pub segments:           SegmentCounts,
    pub today_appointments: usize,
}

pub fn dashboard(
    analytics: &CustomerAnalytics<'_>,
    customers: &[Customer],
    appointments: &[Appointment],
) -> DashboardSummary {
    let today = analytics.clock().today;

    let mut follow_up_count = 0;
    let mut monthly_loss = 0;
    for customer in customers {
        let loss = analytics.loss(customer);
        if loss.status.is_lapsing() {
            follow_up_count += 1;
        }
        monthly_loss += loss.amount;
    }

    let today_appointments = appointments
        .iter()
        .filter(|a| a.is_scheduled() && a.date() == today)
        .count();

    let summary = DashboardSummary {
        as_of: today,
        total_customers: customers.len(),
        follow_up_count,
        monthly_loss,
        segments: analytics.segments(customers).counts(),
        today_appointments,
    };
    log::info!(
        "dashboard {}: customers={} follow_up={} loss={}",
        today, summary.total_customers, summary.follow_up_count, summary.monthly_loss,
    );
    summary
}

// ── Status distribution ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusDistribution {
    pub total:          usize,
    pub counts:         BTreeMap<CustomerStatus, usize>,
    /// Monthly contract revenue from customers still active.
    pub active_revenue: Money,
    /// Estimated loss from customers lapsed three months or more.
    pub lapsed_loss:    Money,
}

impl StatusDistribution {
    pub fn count(&self, status: CustomerStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }
}

fn empty_counts() -> BTreeMap<CustomerStatus, usize> {
    CustomerStatus::ALL.iter().map(|s| (*s, 0)).collect()
}

pub fn status_distribution(analytics: &CustomerAnalytics<'_>, customers: &[Customer]) -> StatusDistribution {
    let months = analytics.config().loss.fallback_contract_months;
    let mut counts = empty_counts();
    let mut revenue = 0.0;
    let mut lapsed_loss = 0;

    for customer in customers {
        let status = analytics.status(customer);
        *counts.entry(status).or_insert(0) += 1;

        if status == CustomerStatus::ThreeMonthsNoVisit {
            lapsed_loss += analytics.loss(customer).amount;
        }
        if status.is_active() {
            revenue += customer.contract.amount / months;
        }
    }

    StatusDistribution {
        total: customers.len(),
        counts,
        active_revenue: round_half_up(revenue),
        lapsed_loss,
    }
}

// ── Monthly trend ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyTrendPoint {
    /// `YYYY-MM`
    pub month:        String,
    pub as_of:        NaiveDate,
    pub counts:       BTreeMap<CustomerStatus, usize>,
    pub active_total: usize,
    pub revenue:      Money,
    /// Monthly contract value of customers lapsed at month end.
    pub lapsed_value: Money,
}

/// Replay every customer's status as of the last day of each of the last
/// `months` months (oldest first).
///
/// History is always derived: declared statuses are ignored, only visits
/// on or before the month end are considered and customers created after
/// it are skipped.
pub fn monthly_trend(
    analytics: &CustomerAnalytics<'_>,
    customers: &[Customer],
    months: u32,
) -> Vec<MonthlyTrendPoint> {
    let per_month = analytics.config().loss.fallback_contract_months;

    (0..months)
        .rev()
        .map(|offset| {
            let month = analytics.clock().month(offset);
            let as_of = analytics.clock().at_month_end(offset);

            let mut counts = empty_counts();
            let mut active_total = 0;
            let mut revenue = 0.0;
            let mut lapsed_value = 0.0;

            for customer in customers {
                if customer.created_at.is_some_and(|created| created > month.last) {
                    continue;
                }
                let history = analytics.history(customer).until(month.last);
                let status = derive_status(
                    customer,
                    &history,
                    &as_of,
                    ReservationSignal::FutureVisits,
                    &analytics.config().status,
                );
                *counts.entry(status).or_insert(0) += 1;

                let monthly_value = customer.contract.amount / per_month;
                if status.is_active() {
                    active_total += 1;
                    revenue += monthly_value;
                } else if status == CustomerStatus::ThreeMonthsNoVisit {
                    lapsed_value += monthly_value;
                }
            }

            MonthlyTrendPoint {
                month: month.label(),
                as_of: month.last,
                counts,
                active_total,
                revenue: round_half_up(revenue),
                lapsed_value: round_half_up(lapsed_value),
            }
        })
        .collect()
}

// ── Follow-up work list ──────────────────────────────────────────────────────

fn lapse_rank(status: CustomerStatus) -> u8 {
    match status {
        CustomerStatus::ThreeMonthsNoVisit => 0,
        CustomerStatus::TwoMonthsNoVisit   => 1,
        CustomerStatus::LastMonthVisited   => 2,
        _ => 3,
    }
}

/// Lapsing customers, longest-lapsed first, then highest risk.
pub fn at_risk_customers(analytics: &CustomerAnalytics<'_>, customers: &[Customer]) -> Vec<CustomerProfile> {
    let mut profiles: Vec<CustomerProfile> = customers
        .iter()
        .map(|c| analytics.profile(c))
        .filter(|p| p.status.is_lapsing())
        .collect();

    profiles.sort_by(|a, b| {
        lapse_rank(a.status)
            .cmp(&lapse_rank(b.status))
            .then(b.risk.score.cmp(&a.risk.score))
            .then_with(|| a.customer_id.cmp(&b.customer_id))
    });
    profiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ReferenceClock,
        config::AnalyticsConfig,
        customer::{AppointmentStatus, Visit},
    };

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    fn population() -> (Vec<Customer>, Vec<Visit>) {
        let customers = vec![
            Customer::new("lapsed", 120_000.0, 2),
            Customer::new("two-months", 240_000.0, 4),
            Customer::new("regular", 360_000.0, 8),
            Customer::new("done", 120_000.0, 0),
            Customer::new("new", 120_000.0, 6).with_created_at(d(10, 1)),
        ];
        let visits = vec![
            Visit::new("v1", "lapsed", d(5, 2)).with_amount(10_000.0),
            Visit::new("v2", "two-months", d(8, 12)).with_amount(20_000.0),
            Visit::new("v3", "regular", d(9, 20)).with_amount(30_000.0),
            Visit::new("v4", "regular", d(10, 11)).with_amount(30_000.0),
            Visit::new("v5", "done", d(10, 1)).with_amount(30_000.0),
            Visit::new("v6", "new", d(10, 3)).with_amount(15_000.0),
        ];
        (customers, visits)
    }

    #[test]
    fn distribution_counts_every_status() {
        let (customers, visits) = population();
        let config = AnalyticsConfig::default();
        let analytics = CustomerAnalytics::new(&config, ReferenceClock::fixed(d(10, 18)), &visits);
        let dist = status_distribution(&analytics, &customers);

        assert_eq!(dist.total, 5);
        assert_eq!(dist.count(CustomerStatus::ThreeMonthsNoVisit), 1);
        assert_eq!(dist.count(CustomerStatus::TwoMonthsNoVisit), 1);
        assert_eq!(dist.count(CustomerStatus::RepeatingNoReservation), 2);
        assert_eq!(dist.count(CustomerStatus::Graduated), 1);
        assert_eq!(dist.count(CustomerStatus::LastMonthVisited), 0);
        // (240000 + 360000 + 120000) / 12
        assert_eq!(dist.active_revenue, 60_000);
        // one visit: 30-day default interval, 10000 * 1 * 0.9
        assert_eq!(dist.lapsed_loss, 9_000);
    }

    #[test]
    fn trend_skips_customers_created_later() {
        let (customers, visits) = population();
        let config = AnalyticsConfig::default();
        let analytics = CustomerAnalytics::new(&config, ReferenceClock::fixed(d(10, 18)), &visits);
        let trend = monthly_trend(&analytics, &customers, 3);

        assert_eq!(trend.len(), 3);
        assert_eq!(trend[0].month, "2026-08");
        assert_eq!(trend[2].month, "2026-10");

        let august_total: usize = trend[0].counts.values().sum();
        let october_total: usize = trend[2].counts.values().sum();
        assert_eq!(august_total, 4);
        assert_eq!(october_total, 5);
    }

    #[test]
    fn trend_replays_history_as_of_month_end() {
        let (customers, visits) = population();
        let config = AnalyticsConfig::default();
        let analytics = CustomerAnalytics::new(&config, ReferenceClock::fixed(d(10, 18)), &visits);
        let trend = monthly_trend(&analytics, &customers, 3);

        // At Aug 31 "regular" had no visits yet.
        assert_eq!(trend[0].counts[&CustomerStatus::ThreeMonthsNoVisit], 2);
        // At Aug 31 "two-months" had visited that same month.
        assert_eq!(trend[0].counts[&CustomerStatus::RepeatingNoReservation], 1);
    }

    #[test]
    fn at_risk_list_orders_longest_lapsed_first() {
        let (customers, visits) = population();
        let config = AnalyticsConfig::default();
        let analytics = CustomerAnalytics::new(&config, ReferenceClock::fixed(d(10, 18)), &visits);
        let ids: Vec<String> = at_risk_customers(&analytics, &customers)
            .into_iter()
            .map(|p| p.customer_id)
            .collect();
        assert_eq!(ids, ["lapsed", "two-months"]);
    }

    #[test]
    fn dashboard_totals_follow_ups_and_loss() {
        let (customers, visits) = population();
        let config = AnalyticsConfig::default();
        let analytics = CustomerAnalytics::new(&config, ReferenceClock::fixed(d(10, 18)), &visits);
        let summary = dashboard(&analytics, &customers, &[]);

        assert_eq!(summary.follow_up_count, 2);
        // lapsed 9000 + two-months 20000 * 1 * 0.6
        assert_eq!(summary.monthly_loss, 21_000);
        assert_eq!(summary.segments.two_months_no_visit, 1);
        assert_eq!(summary.today_appointments, 0);
    }

    fn booking(id: &str, customer: &str, day: NaiveDate, hour: u32, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: id.into(),
            customer_id: customer.into(),
            start_time: day.and_hms_opt(hour, 0, 0).unwrap(),
            end_time: day.and_hms_opt(hour + 1, 0, 0).unwrap(),
            status,
            menu: None,
            price: None,
            staff_name: None,
        }
    }

    #[test]
    fn dashboard_counts_only_scheduled_bookings_for_today() {
        let (customers, visits) = population();
        let config = AnalyticsConfig::default();
        let analytics = CustomerAnalytics::new(&config, ReferenceClock::fixed(d(10, 18)), &visits);
        let appointments = vec![
            booking("a1", "regular", d(10, 18), 10, AppointmentStatus::Scheduled),
            booking("a2", "new", d(10, 18), 14, AppointmentStatus::Scheduled),
            booking("a3", "lapsed", d(10, 18), 9, AppointmentStatus::Completed),
            booking("a4", "done", d(10, 18), 16, AppointmentStatus::Cancelled),
            booking("a5", "regular", d(10, 17), 10, AppointmentStatus::Scheduled),
            booking("a6", "two-months", d(10, 19), 11, AppointmentStatus::Scheduled),
        ];

        let summary = dashboard(&analytics, &customers, &appointments);
        assert_eq!(summary.today_appointments, 2);
    }
}
