use crate::types::EntityId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Duplicate customer id '{customer_id}'")]
    DuplicateCustomer { customer_id: EntityId },

    #[error("Visit '{visit_id}' references unknown customer '{customer_id}'")]
    UnknownCustomer { visit_id: EntityId, customer_id: EntityId },

    #[error("Negative amount {amount} on {entity} '{id}'")]
    NegativeAmount { entity: &'static str, id: EntityId, amount: f64 },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Invalid date '{value}'")]
    InvalidDate { value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
