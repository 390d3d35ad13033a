//! Per-customer visit history and the month-boundary predicates shared by
//! status classification and segment extraction.
//!
//! RULE: Month and reservation checks are only ever made through
//! `MonthSignals`, so the classifier and the segment filters cannot drift.

use crate::{
    clock::{days_between, MonthWindow, ReferenceClock},
    customer::{Appointment, Visit},
    types::Days,
};
use chrono::NaiveDate;
use std::collections::HashMap;

/// One customer's visits, sorted oldest first.
#[derive(Debug, Clone, Default)]
pub struct VisitHistory<'a> {
    visits: Vec<&'a Visit>,
}

impl<'a> VisitHistory<'a> {
    /// Filter the full visit collection down to one customer.
    pub fn for_customer(customer_id: &str, visits: &'a [Visit]) -> Self {
        Self::from_visits(visits.iter().filter(|v| v.customer_id == customer_id))
    }

    pub fn from_visits(visits: impl IntoIterator<Item = &'a Visit>) -> Self {
        let mut visits: Vec<&'a Visit> = visits.into_iter().collect();
        visits.sort_by_key(|v| v.date);
        Self { visits }
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    pub fn visits(&self) -> &[&'a Visit] {
        &self.visits
    }

    /// Date of the most recent visit record (future-dated records included).
    pub fn latest(&self) -> Option<NaiveDate> {
        self.visits.last().map(|v| v.date)
    }

    pub fn visited_in(&self, window: MonthWindow) -> bool {
        self.visits.iter().any(|v| window.contains(v.date))
    }

    pub fn has_visit_after(&self, date: NaiveDate) -> bool {
        self.visits.iter().any(|v| v.date > date)
    }

    /// Only the visits on or before `date`.
    pub fn until(&self, date: NaiveDate) -> VisitHistory<'a> {
        Self {
            visits: self.visits.iter().copied().filter(|v| v.date <= date).collect(),
        }
    }

    /// Day gaps between consecutive visits.
    pub fn gaps(&self) -> Vec<Days> {
        self.visits
            .windows(2)
            .map(|pair| days_between(pair[0].date, pair[1].date))
            .collect()
    }

    pub fn recorded_amounts(&self) -> impl Iterator<Item = f64> + '_ {
        self.visits.iter().filter_map(|v| v.recorded_amount())
    }
}

/// Every customer's history, built in one pass over the visit collection.
#[derive(Debug, Clone, Default)]
pub struct VisitIndex<'a> {
    by_customer: HashMap<&'a str, VisitHistory<'a>>,
    empty:       VisitHistory<'a>,
}

impl<'a> VisitIndex<'a> {
    pub fn build(visits: &'a [Visit]) -> Self {
        let mut grouped: HashMap<&'a str, Vec<&'a Visit>> = HashMap::new();
        for visit in visits {
            grouped.entry(visit.customer_id.as_str()).or_default().push(visit);
        }
        let by_customer = grouped
            .into_iter()
            .map(|(id, vs)| (id, VisitHistory::from_visits(vs)))
            .collect();
        Self { by_customer, empty: VisitHistory::default() }
    }

    pub fn history(&self, customer_id: &str) -> &VisitHistory<'a> {
        self.by_customer.get(customer_id).unwrap_or(&self.empty)
    }

    pub fn customer_count(&self) -> usize {
        self.by_customer.len()
    }
}

// ── Reservations ─────────────────────────────────────────────────────────────

/// Where "has an upcoming reservation" is read from.
#[derive(Debug, Clone, Copy, Default)]
pub enum ReservationSignal<'a> {
    /// A visit record dated after today counts as a reservation.
    #[default]
    FutureVisits,
    /// A scheduled appointment starting after today.
    Appointments(&'a [Appointment]),
}

impl ReservationSignal<'_> {
    pub fn has_upcoming(
        &self,
        customer_id: &str,
        history: &VisitHistory<'_>,
        clock: &ReferenceClock,
    ) -> bool {
        match self {
            Self::FutureVisits => history.has_visit_after(clock.today),
            Self::Appointments(appointments) => {
                has_upcoming_appointment(customer_id, appointments, clock)
            }
        }
    }
}

pub fn has_upcoming_appointment(
    customer_id: &str,
    appointments: &[Appointment],
    clock: &ReferenceClock,
) -> bool {
    appointments
        .iter()
        .any(|a| a.customer_id == customer_id && a.is_scheduled() && a.date() > clock.today)
}

// ── Month signals ────────────────────────────────────────────────────────────

/// The calendar facts status and segment logic are decided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSignals {
    pub visited_this_month:     bool,
    pub visited_last_month:     bool,
    pub visited_two_months_ago: bool,
    pub has_reservation:        bool,
}

impl MonthSignals {
    pub fn observe(
        customer_id: &str,
        history: &VisitHistory<'_>,
        clock: &ReferenceClock,
        reservations: ReservationSignal<'_>,
    ) -> Self {
        Self {
            visited_this_month:     history.visited_in(clock.this_month()),
            visited_last_month:     history.visited_in(clock.last_month()),
            visited_two_months_ago: history.visited_in(clock.two_months_ago()),
            has_reservation:        reservations.has_upcoming(customer_id, history, clock),
        }
    }

    /// Came two months ago, then nothing last month or this month.
    pub fn dropped_off_two_months_ago(&self) -> bool {
        self.visited_two_months_ago && !self.visited_last_month && !self.visited_this_month
    }

    /// Came last month, nothing this month and nothing booked.
    pub fn dropped_off_last_month(&self) -> bool {
        self.visited_last_month && !self.visited_this_month && !self.has_reservation
    }
}
