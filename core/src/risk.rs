//! Churn risk score (0–100) and follow-up recommendation.
//!
//! The score is additive over four independently capped components:
//!   status     (0–40)  fixed weight per lifecycle status
//!   recency    (0–30)  days since last visit against a 90-day horizon
//!   frequency  (0–20)  only slowing-down visit cadence is penalised
//!   remaining  (0–10)  fewer contracted visits left scores higher
//! and the sum is clamped to `max_score`.

use crate::{
    clock::ReferenceClock,
    config::{AnalyticsConfig, FollowUpThresholds, RiskWeights},
    customer::{Customer, CustomerStatus, Visit},
    history::{ReservationSignal, VisitHistory},
    interval::frequency_change_of,
    status::resolve_status,
    types::{round_half_up, Days},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskBreakdown {
    pub status:                CustomerStatus,
    pub days_since_last_visit: Days,
    pub frequency_change:      i64,
    // Components
    pub status_component:      i64,
    pub recency_component:     i64,
    pub frequency_component:   i64,
    pub remaining_component:   i64,
    pub score:                 u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpPriority {
    Low,
    Medium,
    High,
}

impl FollowUpPriority {
    pub fn from_score(score: u8, t: &FollowUpThresholds) -> Self {
        if score >= t.high_priority {
            Self::High
        } else if score >= t.medium_priority {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low    => "low",
            Self::Medium => "medium",
            Self::High   => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpAction {
    UrgentCall,
    MessageThenCall,
    Message,
}

impl FollowUpAction {
    pub fn from_score(score: u8, t: &FollowUpThresholds) -> Self {
        if score >= t.urgent_call {
            Self::UrgentCall
        } else if score >= t.message_then_call {
            Self::MessageThenCall
        } else {
            Self::Message
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::UrgentCall      => "urgent phone contact",
            Self::MessageThenCall => "message first, escalate to phone if no response",
            Self::Message         => "message contact",
        }
    }
}

/// Days since the last visit: the customer's recorded last-visit date if
/// set, else the newest visit record, else `recency_default_days`.
pub fn days_since_last_visit(
    customer: &Customer,
    history: &VisitHistory<'_>,
    clock: &ReferenceClock,
    weights: &RiskWeights,
) -> Days {
    customer
        .last_visit_date
        .or_else(|| history.latest())
        .map(|date| clock.days_since(date))
        .unwrap_or(weights.recency_default_days)
}

pub fn score_risk(
    customer: &Customer,
    status: CustomerStatus,
    history: &VisitHistory<'_>,
    clock: &ReferenceClock,
    config: &AnalyticsConfig,
) -> RiskBreakdown {
    let w = &config.risk;

    let days = days_since_last_visit(customer, history, clock, w);
    let frequency_change = frequency_change_of(history, &config.interval);

    let status_component = w.status_weight(status);

    let recency_component = round_half_up(days as f64 / w.recency_horizon_days as f64 * w.recency_cap as f64)
        .clamp(0, w.recency_cap.max(0));

    let frequency_component = round_half_up(frequency_change as f64 * w.frequency_weight)
        .clamp(0, w.frequency_cap.max(0));

    let remaining = i64::from(customer.contract.remaining_visits);
    let remaining_cap = w.remaining_visits_cap.max(0);
    let remaining_component = remaining_cap - remaining.min(remaining_cap);

    let total = status_component + recency_component + frequency_component + remaining_component;
    let score = total.clamp(0, w.max_score.clamp(0, 100)) as u8;

    RiskBreakdown {
        status,
        days_since_last_visit: days,
        frequency_change,
        status_component,
        recency_component,
        frequency_component,
        remaining_component,
        score,
    }
}

/// Risk score for one customer with the default configuration.
pub fn risk_score(customer: &Customer, visits: &[Visit], clock: &ReferenceClock) -> u8 {
    let config = AnalyticsConfig::default();
    let history = VisitHistory::for_customer(&customer.id, visits);
    let status = resolve_status(customer, &history, clock, ReservationSignal::FutureVisits, &config.status).status;
    score_risk(customer, status, &history, clock, &config).score
}

pub fn follow_up_priority(score: u8) -> FollowUpPriority {
    FollowUpPriority::from_score(score, &FollowUpThresholds::default())
}

pub fn recommended_follow_up(score: u8) -> FollowUpAction {
    FollowUpAction::from_score(score, &FollowUpThresholds::default())
}
