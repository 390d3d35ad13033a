//! Customer lifecycle and churn-risk analytics for a salon CRM.
//!
//! Pure functions over two collections, customers and visits, evaluated
//! against an injected `ReferenceClock`. `engine::CustomerAnalytics` is the
//! usual entry point; the per-module free functions exist for one-off
//! questions about a single customer.

pub mod clock;
pub mod config;
pub mod customer;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod history;
pub mod interval;
pub mod loss;
pub mod mock;
pub mod name_generator;
pub mod report;
pub mod risk;
pub mod rng;
pub mod segments;
pub mod status;
pub mod types;
