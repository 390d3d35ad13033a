//! Lifecycle status classification.
//!
//! Decision order (first match wins, never reordered):
//!   1. Declared status on the customer record
//!   2. No remaining contracted visits          -> graduated
//!   3. No visits at all                        -> three-months-no-visit
//!   4. Lapsed for `lapse_months` or more       -> three-months-no-visit
//!   5. Came two months ago, nothing since      -> two-months-no-visit
//!   6. Came last month, nothing since, no booking -> last-month-visited
//!   7. Within the lapse window                 -> repeating (with/without reservation)

use crate::{
    clock::ReferenceClock,
    config::StatusConfig,
    customer::{Customer, CustomerStatus, Visit},
    history::{MonthSignals, ReservationSignal, VisitHistory},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusOrigin {
    /// Pinned on the customer record.
    Declared,
    /// Computed from the visit history.
    Derived,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedStatus {
    pub status: CustomerStatus,
    pub origin: StatusOrigin,
}

/// Classify from visit history alone. The declared status is ignored.
pub fn derive_status(
    customer: &Customer,
    history: &VisitHistory<'_>,
    clock: &ReferenceClock,
    reservations: ReservationSignal<'_>,
    config: &StatusConfig,
) -> CustomerStatus {
    if customer.contract.remaining_visits == 0 {
        return CustomerStatus::Graduated;
    }
    let Some(last_visit) = history.latest() else {
        return CustomerStatus::ThreeMonthsNoVisit;
    };

    let months_since_last_visit = clock.months_since(last_visit);
    let signals = MonthSignals::observe(&customer.id, history, clock, reservations);

    if months_since_last_visit >= config.lapse_months {
        return CustomerStatus::ThreeMonthsNoVisit;
    }
    if signals.dropped_off_two_months_ago() {
        return CustomerStatus::TwoMonthsNoVisit;
    }
    if signals.dropped_off_last_month() {
        return CustomerStatus::LastMonthVisited;
    }
    if signals.has_reservation {
        CustomerStatus::RepeatingWithReservation
    } else {
        CustomerStatus::RepeatingNoReservation
    }
}

/// Declared status if present, otherwise the derived one.
pub fn resolve_status(
    customer: &Customer,
    history: &VisitHistory<'_>,
    clock: &ReferenceClock,
    reservations: ReservationSignal<'_>,
    config: &StatusConfig,
) -> ResolvedStatus {
    match customer.status {
        Some(status) => ResolvedStatus { status, origin: StatusOrigin::Declared },
        None => ResolvedStatus {
            status: derive_status(customer, history, clock, reservations, config),
            origin: StatusOrigin::Derived,
        },
    }
}

/// Classify one customer against the full visit collection using the
/// default configuration and future-dated visits as the reservation signal.
pub fn classify_status(customer: &Customer, visits: &[Visit], clock: &ReferenceClock) -> CustomerStatus {
    let history = VisitHistory::for_customer(&customer.id, visits);
    resolve_status(
        customer,
        &history,
        clock,
        ReservationSignal::FutureVisits,
        &StatusConfig::default(),
    )
    .status
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn clock() -> ReferenceClock {
        ReferenceClock::fixed(today())
    }

    fn visits_on(customer: &str, dates: &[NaiveDate]) -> Vec<Visit> {
        dates
            .iter()
            .enumerate()
            .map(|(i, d)| Visit::new(format!("v{i}"), customer, *d))
            .collect()
    }

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    #[test]
    fn declared_status_wins_over_history() {
        let c = Customer::new("c", 100_000.0, 0).with_declared_status(CustomerStatus::RepeatingWithReservation);
        let visits = visits_on("c", &[d(1, 5)]);
        let history = VisitHistory::for_customer("c", &visits);
        let resolved = resolve_status(&c, &history, &clock(), ReservationSignal::FutureVisits, &StatusConfig::default());
        assert_eq!(resolved.status, CustomerStatus::RepeatingWithReservation);
        assert_eq!(resolved.origin, StatusOrigin::Declared);
    }

    #[test]
    fn no_remaining_visits_graduates() {
        let c = Customer::new("c", 100_000.0, 0);
        let visits = visits_on("c", &[d(10, 1), d(10, 30)]);
        assert_eq!(classify_status(&c, &visits, &clock()), CustomerStatus::Graduated);
    }

    #[test]
    fn no_visits_is_lapsed() {
        let c = Customer::new("c", 100_000.0, 5);
        assert_eq!(classify_status(&c, &[], &clock()), CustomerStatus::ThreeMonthsNoVisit);
    }

    #[test]
    fn three_calendar_months_is_lapsed() {
        let c = Customer::new("c", 100_000.0, 5);
        let visits = visits_on("c", &[d(7, 18)]);
        assert_eq!(classify_status(&c, &visits, &clock()), CustomerStatus::ThreeMonthsNoVisit);
    }

    #[test]
    fn two_months_ago_only() {
        let c = Customer::new("c", 100_000.0, 5);
        let visits = visits_on("c", &[d(8, 25)]);
        assert_eq!(classify_status(&c, &visits, &clock()), CustomerStatus::TwoMonthsNoVisit);
    }

    #[test]
    fn forty_five_days_ago_lands_in_last_month() {
        let c = Customer::new("c", 100_000.0, 3);
        let visits = visits_on("c", &[today() - Duration::days(45)]);
        assert_eq!(classify_status(&c, &visits, &clock()), CustomerStatus::LastMonthVisited);
    }

    #[test]
    fn last_month_with_booking_is_repeating_with_reservation() {
        let c = Customer::new("c", 100_000.0, 3);
        let visits = visits_on("c", &[d(9, 20), d(11, 2)]);
        assert_eq!(classify_status(&c, &visits, &clock()), CustomerStatus::RepeatingWithReservation);
    }

    #[test]
    fn visited_this_month_without_booking() {
        let c = Customer::new("c", 100_000.0, 3);
        let visits = visits_on("c", &[d(9, 20), d(10, 5)]);
        assert_eq!(classify_status(&c, &visits, &clock()), CustomerStatus::RepeatingNoReservation);
    }

    #[test]
    fn other_customers_visits_are_ignored() {
        let c = Customer::new("c", 100_000.0, 3);
        let mut visits = visits_on("someone-else", &[d(10, 5)]);
        visits.extend(visits_on("c", &[d(8, 25)]));
        assert_eq!(classify_status(&c, &visits, &clock()), CustomerStatus::TwoMonthsNoVisit);
    }
}
