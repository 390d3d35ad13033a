//! The analytics facade: one configured view over a visit collection.
//!
//! `CustomerAnalytics` indexes the visits once, then answers every
//! per-customer question (status, cadence, loss, risk) and the population
//! questions (segments, profiles) against the same clock and config.
//! It holds no mutable state; every answer is recomputed on request.

use crate::{
    clock::ReferenceClock,
    config::AnalyticsConfig,
    customer::{Customer, CustomerStatus, Visit},
    history::{ReservationSignal, VisitHistory, VisitIndex},
    interval::{average_interval_of, frequency_change_of},
    loss::{estimate_loss, LossEstimate},
    risk::{score_risk, FollowUpAction, FollowUpPriority, RiskBreakdown},
    segments::{extract_segments, ImportantSegments},
    status::{resolve_status, ResolvedStatus, StatusOrigin},
    types::{Days, EntityId, Money},
};
use serde::Serialize;

/// Everything the engine derives for one customer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomerProfile {
    pub customer_id:           EntityId,
    pub name:                  String,
    pub status:                CustomerStatus,
    pub status_origin:         StatusOrigin,
    pub visit_count:           usize,
    pub average_interval:      Days,
    pub frequency_change:      i64,
    pub days_since_last_visit: Days,
    pub monthly_loss:          Money,
    pub risk:                  RiskBreakdown,
    pub priority:              FollowUpPriority,
    pub follow_up:             FollowUpAction,
}

pub struct CustomerAnalytics<'a> {
    config:       &'a AnalyticsConfig,
    clock:        ReferenceClock,
    index:        VisitIndex<'a>,
    reservations: ReservationSignal<'a>,
}

impl<'a> CustomerAnalytics<'a> {
    pub fn new(config: &'a AnalyticsConfig, clock: ReferenceClock, visits: &'a [Visit]) -> Self {
        let index = VisitIndex::build(visits);
        log::debug!(
            "analytics: indexed {} visits for {} customers as of {}",
            visits.len(),
            index.customer_count(),
            clock.today,
        );
        Self {
            config,
            clock,
            index,
            reservations: ReservationSignal::FutureVisits,
        }
    }

    /// Read reservations from somewhere other than future-dated visits.
    pub fn with_reservations(mut self, reservations: ReservationSignal<'a>) -> Self {
        self.reservations = reservations;
        self
    }

    pub fn clock(&self) -> &ReferenceClock { &self.clock }
    pub fn config(&self) -> &AnalyticsConfig { self.config }
    pub fn reservations(&self) -> ReservationSignal<'a> { self.reservations }

    pub fn history(&self, customer: &Customer) -> &VisitHistory<'a> {
        self.index.history(&customer.id)
    }

    pub fn resolve_status(&self, customer: &Customer) -> ResolvedStatus {
        resolve_status(
            customer,
            self.history(customer),
            &self.clock,
            self.reservations,
            &self.config.status,
        )
    }

    pub fn status(&self, customer: &Customer) -> CustomerStatus {
        self.resolve_status(customer).status
    }

    pub fn average_interval(&self, customer: &Customer) -> Days {
        average_interval_of(self.history(customer), &self.config.interval)
    }

    pub fn frequency_change(&self, customer: &Customer) -> i64 {
        frequency_change_of(self.history(customer), &self.config.interval)
    }

    pub fn loss(&self, customer: &Customer) -> LossEstimate {
        estimate_loss(customer, self.status(customer), self.history(customer), self.config)
    }

    pub fn risk(&self, customer: &Customer) -> RiskBreakdown {
        score_risk(
            customer,
            self.status(customer),
            self.history(customer),
            &self.clock,
            self.config,
        )
    }

    pub fn profile(&self, customer: &Customer) -> CustomerProfile {
        let resolved = self.resolve_status(customer);
        let history = self.history(customer);
        let loss = estimate_loss(customer, resolved.status, history, self.config);
        let risk = score_risk(customer, resolved.status, history, &self.clock, self.config);
        let thresholds = &self.config.follow_up;

        let profile = CustomerProfile {
            customer_id:           customer.id.clone(),
            name:                  customer.name.clone(),
            status:                resolved.status,
            status_origin:         resolved.origin,
            visit_count:           history.len(),
            average_interval:      average_interval_of(history, &self.config.interval),
            frequency_change:      risk.frequency_change,
            days_since_last_visit: risk.days_since_last_visit,
            monthly_loss:          loss.amount,
            priority:              FollowUpPriority::from_score(risk.score, thresholds),
            follow_up:             FollowUpAction::from_score(risk.score, thresholds),
            risk,
        };

        log::debug!(
            "profile {}: status={} risk={} loss={}",
            profile.customer_id,
            profile.status,
            profile.risk.score,
            profile.monthly_loss,
        );
        profile
    }

    pub fn profiles(&self, customers: &[Customer]) -> Vec<CustomerProfile> {
        let profiles: Vec<CustomerProfile> = customers.iter().map(|c| self.profile(c)).collect();
        let high = profiles
            .iter()
            .filter(|p| p.priority == FollowUpPriority::High)
            .count();
        log::info!(
            "analytics: profiled {} customers ({} high priority)",
            profiles.len(),
            high,
        );
        profiles
    }

    pub fn segments<'c>(&self, customers: &'c [Customer]) -> ImportantSegments<'c> {
        extract_segments(
            customers,
            &self.index,
            &self.clock,
            self.reservations,
            &self.config.status,
        )
    }
}
