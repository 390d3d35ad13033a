//! Visit cadence: average interval and frequency change.

use crate::{
    config::IntervalConfig,
    customer::{Customer, Visit},
    history::VisitHistory,
    types::{round_half_up, Days},
};

/// Mean days between consecutive visits, rounded.
/// Fewer than two visits gives the configured default.
pub fn average_interval_of(history: &VisitHistory<'_>, config: &IntervalConfig) -> Days {
    if history.len() <= 1 {
        return config.default_interval_days;
    }
    let gaps = history.gaps();
    let total: Days = gaps.iter().sum();
    round_half_up(total as f64 / gaps.len() as f64)
}

/// Percent change of the mean visit interval between the older and the newer
/// half of the history. Positive means visits are slowing down.
///
/// The history is split at `len / 2`; each half's mean only uses the gaps
/// inside that half, so the gap across the split is not counted.
pub fn frequency_change_of(history: &VisitHistory<'_>, config: &IntervalConfig) -> i64 {
    if history.len() < config.frequency_min_visits.max(4) {
        return 0;
    }
    let gaps = history.gaps();
    let half = history.len() / 2;

    // gaps[i] is the gap between visit i and i + 1.
    let first = &gaps[..half - 1];
    let second = &gaps[half..];

    let first_avg = mean(first);
    let second_avg = mean(second);

    if first_avg == 0.0 {
        return 0;
    }
    round_half_up((second_avg - first_avg) / first_avg * 100.0)
}

fn mean(gaps: &[Days]) -> f64 {
    if gaps.is_empty() {
        return 0.0;
    }
    gaps.iter().sum::<Days>() as f64 / gaps.len() as f64
}

pub fn average_interval(customer: &Customer, visits: &[Visit]) -> Days {
    average_interval_of(&VisitHistory::for_customer(&customer.id, visits), &IntervalConfig::default())
}

pub fn frequency_change(customer: &Customer, visits: &[Visit]) -> i64 {
    frequency_change_of(&VisitHistory::for_customer(&customer.id, visits), &IntervalConfig::default())
}
