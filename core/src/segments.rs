//! Alerting segments over the whole customer population.
//!
//! Segments use the same `MonthSignals` predicates as the status
//! classifier and are recomputed from scratch on every call.

use crate::{
    clock::ReferenceClock,
    config::StatusConfig,
    customer::{Customer, Visit},
    history::{MonthSignals, ReservationSignal, VisitIndex},
    status::resolve_status,
};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportantSegments<'a> {
    /// Came two months ago, nothing last month or this month.
    pub two_months_no_visit:      Vec<&'a Customer>,
    /// Came last month, nothing this month and nothing booked.
    pub last_month_no_follow:     Vec<&'a Customer>,
    /// Repeating status but nothing booked.
    pub repeating_no_reservation: Vec<&'a Customer>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SegmentCounts {
    pub two_months_no_visit:      usize,
    pub last_month_no_follow:     usize,
    pub repeating_no_reservation: usize,
}

impl ImportantSegments<'_> {
    pub fn counts(&self) -> SegmentCounts {
        SegmentCounts {
            two_months_no_visit:      self.two_months_no_visit.len(),
            last_month_no_follow:     self.last_month_no_follow.len(),
            repeating_no_reservation: self.repeating_no_reservation.len(),
        }
    }
}

pub fn extract_segments<'a>(
    customers: &'a [Customer],
    index: &VisitIndex<'_>,
    clock: &ReferenceClock,
    reservations: ReservationSignal<'_>,
    config: &StatusConfig,
) -> ImportantSegments<'a> {
    let mut segments = ImportantSegments::default();

    for customer in customers {
        let history = index.history(&customer.id);
        let signals = MonthSignals::observe(&customer.id, history, clock, reservations);

        if signals.dropped_off_two_months_ago() {
            segments.two_months_no_visit.push(customer);
        }
        if signals.dropped_off_last_month() {
            segments.last_month_no_follow.push(customer);
        }
        if !signals.has_reservation {
            let status = resolve_status(customer, history, clock, reservations, config).status;
            if status.is_repeating() {
                segments.repeating_no_reservation.push(customer);
            }
        }
    }

    log::debug!(
        "segments: two_months={} last_month={} repeating_no_res={}",
        segments.two_months_no_visit.len(),
        segments.last_month_no_follow.len(),
        segments.repeating_no_reservation.len(),
    );
    segments
}

/// Segments with the default configuration and future-dated visits as the
/// reservation signal.
pub fn important_segments<'a>(
    customers: &'a [Customer],
    visits: &[Visit],
    clock: &ReferenceClock,
) -> ImportantSegments<'a> {
    let index = VisitIndex::build(visits);
    extract_segments(
        customers,
        &index,
        clock,
        ReservationSignal::FutureVisits,
        &StatusConfig::default(),
    )
}
