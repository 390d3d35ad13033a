//! Estimated monthly revenue at risk for a disengaging customer.
//!
//!   loss = average spend per visit × visits per month × loss probability
//!
//! Average spend comes from recorded visit amounts, falling back to the
//! contract amount spread over `fallback_contract_months`. This is a
//! reproducible heuristic, not an accounting figure.

use crate::{
    clock::ReferenceClock,
    config::{AnalyticsConfig, StatusConfig},
    customer::{Customer, CustomerStatus, Visit},
    history::{ReservationSignal, VisitHistory},
    interval::average_interval_of,
    status::resolve_status,
    types::{round_half_up, Money},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LossEstimate {
    pub status:           CustomerStatus,
    pub average_amount:   f64,
    pub monthly_visits:   f64,
    pub loss_probability: f64,
    pub amount:           Money,
}

impl LossEstimate {
    fn none(status: CustomerStatus) -> Self {
        Self {
            status,
            average_amount: 0.0,
            monthly_visits: 0.0,
            loss_probability: 0.0,
            amount: 0,
        }
    }
}

pub fn estimate_loss(
    customer: &Customer,
    status: CustomerStatus,
    history: &VisitHistory<'_>,
    config: &AnalyticsConfig,
) -> LossEstimate {
    if status.is_repeating() || status == CustomerStatus::Graduated {
        return LossEstimate::none(status);
    }

    let amounts: Vec<f64> = history.recorded_amounts().collect();
    let average_amount = if amounts.is_empty() {
        customer.contract.amount / config.loss.fallback_contract_months
    } else {
        amounts.iter().sum::<f64>() / amounts.len() as f64
    };

    let interval = average_interval_of(history, &config.interval);
    let monthly_visits = if interval > 0 {
        config.loss.days_per_month / interval as f64
    } else {
        1.0
    };

    let loss_probability = config.loss.probability(status);
    let amount = round_half_up(average_amount * monthly_visits * loss_probability).max(0);

    LossEstimate {
        status,
        average_amount,
        monthly_visits,
        loss_probability,
        amount,
    }
}

/// Monthly loss for one customer with the default configuration.
pub fn estimated_monthly_loss(customer: &Customer, visits: &[Visit], clock: &ReferenceClock) -> Money {
    let config = AnalyticsConfig::default();
    let history = VisitHistory::for_customer(&customer.id, visits);
    let status = resolve_status(
        customer,
        &history,
        clock,
        ReservationSignal::FutureVisits,
        &StatusConfig::default(),
    )
    .status;
    estimate_loss(customer, status, &history, &config).amount
}
