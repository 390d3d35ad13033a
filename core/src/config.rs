//! Tunable constants for status, loss and risk calculations.
//!
//! `AnalyticsConfig::default()` reproduces the production constants.
//! `AnalyticsConfig::load(path)` reads a JSON file; any omitted field
//! keeps its default, so a file only needs to name what it overrides.

use crate::{
    customer::CustomerStatus,
    error::{AnalyticsError, AnalyticsResult},
    types::Days,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub interval:  IntervalConfig,
    pub status:    StatusConfig,
    pub loss:      LossConfig,
    pub risk:      RiskWeights,
    pub follow_up: FollowUpThresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IntervalConfig {
    /// Returned when fewer than two visits exist.
    pub default_interval_days:   Days,
    pub frequency_min_visits:    usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatusConfig {
    /// Whole months without a visit before a customer is lapsed.
    pub lapse_months: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LossConfig {
    pub days_per_month:              f64,
    /// Contract amount is spread over this many months when no visit
    /// amounts were recorded.
    pub fallback_contract_months:    f64,
    pub last_month_visited:          f64,
    pub two_months_no_visit:         f64,
    pub three_months_no_visit:       f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskWeights {
    pub repeating_with_reservation: i64,
    pub repeating_no_reservation:   i64,
    pub last_month_visited:         i64,
    pub two_months_no_visit:        i64,
    pub three_months_no_visit:      i64,
    pub graduated:                  i64,
    pub recency_horizon_days:       Days,
    pub recency_cap:                i64,
    /// Days assumed when the customer has never visited.
    pub recency_default_days:       Days,
    pub frequency_weight:           f64,
    pub frequency_cap:              i64,
    pub remaining_visits_cap:       i64,
    pub max_score:                  i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FollowUpThresholds {
    pub high_priority:   u8,
    pub medium_priority: u8,
    pub urgent_call:     u8,
    pub message_then_call: u8,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self { default_interval_days: 30, frequency_min_visits: 4 }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self { lapse_months: 3 }
    }
}

impl Default for LossConfig {
    fn default() -> Self {
        Self {
            days_per_month:           30.0,
            fallback_contract_months: 12.0,
            last_month_visited:       0.3,
            two_months_no_visit:      0.6,
            three_months_no_visit:    0.9,
        }
    }
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            repeating_with_reservation: 0,
            repeating_no_reservation:   10,
            last_month_visited:         20,
            two_months_no_visit:        30,
            three_months_no_visit:      40,
            graduated:                  0,
            recency_horizon_days:       90,
            recency_cap:                30,
            recency_default_days:       90,
            frequency_weight:           0.2,
            frequency_cap:              20,
            remaining_visits_cap:       10,
            max_score:                  100,
        }
    }
}

impl Default for FollowUpThresholds {
    fn default() -> Self {
        Self {
            high_priority:     70,
            medium_priority:   40,
            urgent_call:       70,
            message_then_call: 50,
        }
    }
}

impl LossConfig {
    pub fn probability(&self, status: CustomerStatus) -> f64 {
        match status {
            CustomerStatus::LastMonthVisited  => self.last_month_visited,
            CustomerStatus::TwoMonthsNoVisit  => self.two_months_no_visit,
            CustomerStatus::ThreeMonthsNoVisit => self.three_months_no_visit,
            _ => 0.0,
        }
    }
}

impl RiskWeights {
    pub fn status_weight(&self, status: CustomerStatus) -> i64 {
        match status {
            CustomerStatus::RepeatingWithReservation => self.repeating_with_reservation,
            CustomerStatus::RepeatingNoReservation   => self.repeating_no_reservation,
            CustomerStatus::LastMonthVisited         => self.last_month_visited,
            CustomerStatus::TwoMonthsNoVisit         => self.two_months_no_visit,
            CustomerStatus::ThreeMonthsNoVisit       => self.three_months_no_visit,
            CustomerStatus::Graduated                => self.graduated,
        }
    }
}

impl AnalyticsConfig {
    /// Load from a JSON file. In tests, use `AnalyticsConfig::default()`.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: AnalyticsConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        log::debug!("loaded analytics config from {path}");
        Ok(config)
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        let invalid = |reason: String| Err(AnalyticsError::InvalidConfig { reason });

        if self.interval.default_interval_days <= 0 {
            return invalid("interval.default_interval_days must be > 0".into());
        }
        if self.interval.frequency_min_visits < 4 {
            // Each half needs at least one interval of its own.
            return invalid("interval.frequency_min_visits must be >= 4".into());
        }
        if self.status.lapse_months <= 0 {
            return invalid("status.lapse_months must be > 0".into());
        }
        if self.loss.days_per_month <= 0.0 || self.loss.fallback_contract_months <= 0.0 {
            return invalid("loss.days_per_month and loss.fallback_contract_months must be > 0".into());
        }
        for (name, p) in [
            ("last_month_visited", self.loss.last_month_visited),
            ("two_months_no_visit", self.loss.two_months_no_visit),
            ("three_months_no_visit", self.loss.three_months_no_visit),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return invalid(format!("loss.{name} probability {p} outside [0, 1]"));
            }
        }
        if self.risk.recency_horizon_days <= 0 {
            return invalid("risk.recency_horizon_days must be > 0".into());
        }
        for (name, cap) in [
            ("recency_cap", self.risk.recency_cap),
            ("frequency_cap", self.risk.frequency_cap),
            ("remaining_visits_cap", self.risk.remaining_visits_cap),
        ] {
            if cap < 0 {
                return invalid(format!("risk.{name} ({cap}) must be >= 0"));
            }
        }
        if !(0..=100).contains(&self.risk.max_score) {
            return invalid(format!("risk.max_score ({}) outside 0..=100", self.risk.max_score));
        }
        let f = &self.follow_up;
        if f.medium_priority > f.high_priority {
            return invalid(format!(
                "follow_up.medium_priority ({}) above high_priority ({})",
                f.medium_priority, f.high_priority
            ));
        }
        if f.message_then_call > f.urgent_call {
            return invalid(format!(
                "follow_up.message_then_call ({}) above urgent_call ({})",
                f.message_then_call, f.urgent_call
            ));
        }
        Ok(())
    }
}
