//! Dataset boundary: loading and validating customer, visit and
//! appointment collections before they reach the engine.
//!
//! RULE: Validation happens here, once. The analytics functions assume
//! well-formed input and never re-check it.

use crate::{
    customer::{Appointment, Customer, Visit},
    error::{AnalyticsError, AnalyticsResult},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub customers:    Vec<Customer>,
    #[serde(default)]
    pub visits:       Vec<Visit>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

impl Dataset {
    pub fn from_json_str(json: &str) -> AnalyticsResult<Self> {
        let dataset: Dataset = serde_json::from_str(json)?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn load(path: &str) -> AnalyticsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let dataset = Self::from_json_str(&content)?;
        log::info!(
            "loaded dataset from {path}: {} customers, {} visits, {} appointments",
            dataset.customers.len(),
            dataset.visits.len(),
            dataset.appointments.len(),
        );
        Ok(dataset)
    }

    pub fn to_json_pretty(&self) -> AnalyticsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        let mut ids = HashSet::with_capacity(self.customers.len());
        for c in &self.customers {
            if !ids.insert(c.id.as_str()) {
                return Err(AnalyticsError::DuplicateCustomer { customer_id: c.id.clone() });
            }
            if c.contract.amount < 0.0 {
                return Err(AnalyticsError::NegativeAmount {
                    entity: "customer",
                    id: c.id.clone(),
                    amount: c.contract.amount,
                });
            }
        }

        for v in &self.visits {
            if !ids.contains(v.customer_id.as_str()) {
                return Err(AnalyticsError::UnknownCustomer {
                    visit_id: v.id.clone(),
                    customer_id: v.customer_id.clone(),
                });
            }
            if let Some(amount) = v.amount.filter(|a| *a < 0.0) {
                return Err(AnalyticsError::NegativeAmount {
                    entity: "visit",
                    id: v.id.clone(),
                    amount,
                });
            }
        }

        let dangling = self
            .appointments
            .iter()
            .filter(|a| !ids.contains(a.customer_id.as_str()))
            .count();
        if dangling > 0 {
            log::warn!("dataset: {dangling} appointments reference unknown customers");
        }
        Ok(())
    }
}
