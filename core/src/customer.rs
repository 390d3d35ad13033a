//! Customer, visit and appointment records consumed by the engine.
//!
//! These are plain data. The engine reads them and never mutates them;
//! creation and editing belong to whoever owns the dataset.

use crate::types::EntityId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ── Lifecycle status ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum CustomerStatus {
    LastMonthVisited,
    TwoMonthsNoVisit,
    RepeatingWithReservation,
    RepeatingNoReservation,
    ThreeMonthsNoVisit,
    Graduated,
}

impl CustomerStatus {
    pub const ALL: [CustomerStatus; 6] = [
        CustomerStatus::LastMonthVisited,
        CustomerStatus::TwoMonthsNoVisit,
        CustomerStatus::RepeatingWithReservation,
        CustomerStatus::RepeatingNoReservation,
        CustomerStatus::ThreeMonthsNoVisit,
        CustomerStatus::Graduated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastMonthVisited         => "last-month-visited",
            Self::TwoMonthsNoVisit         => "two-months-no-visit",
            Self::RepeatingWithReservation => "repeating-with-reservation",
            Self::RepeatingNoReservation   => "repeating-no-reservation",
            Self::ThreeMonthsNoVisit       => "three-months-no-visit",
            Self::Graduated                => "graduated",
        }
    }

    pub fn is_repeating(&self) -> bool {
        matches!(self, Self::RepeatingWithReservation | Self::RepeatingNoReservation)
    }

    /// Statuses that need a follow-up contact.
    pub fn is_lapsing(&self) -> bool {
        matches!(
            self,
            Self::LastMonthVisited | Self::TwoMonthsNoVisit | Self::ThreeMonthsNoVisit
        )
    }

    /// Still counted as an active, revenue-generating customer.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::ThreeMonthsNoVisit | Self::Graduated)
    }
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Customer ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contract {
    #[serde(default)]
    pub course:           String,
    pub amount:           f64,
    pub remaining_visits: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id:       EntityId,
    #[serde(default)]
    pub name:     String,
    pub contract: Contract,
    #[serde(default, with = "flexible_date::option")]
    pub last_visit_date: Option<NaiveDate>,
    /// Declared status. Pins the customer regardless of visit history.
    #[serde(default)]
    pub status:   Option<CustomerStatus>,
    #[serde(default, with = "flexible_date::option")]
    pub created_at: Option<NaiveDate>,
}

impl Customer {
    pub fn new(id: impl Into<EntityId>, contract_amount: f64, remaining_visits: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            contract: Contract {
                course: String::new(),
                amount: contract_amount,
                remaining_visits,
            },
            last_visit_date: None,
            status: None,
            created_at: None,
        }
    }

    pub fn with_declared_status(mut self, status: CustomerStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_last_visit_date(mut self, date: NaiveDate) -> Self {
        self.last_visit_date = Some(date);
        self
    }

    pub fn with_created_at(mut self, date: NaiveDate) -> Self {
        self.created_at = Some(date);
        self
    }
}

// ── Visit ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    pub id:          EntityId,
    pub customer_id: EntityId,
    #[serde(with = "flexible_date")]
    pub date:        NaiveDate,
    #[serde(default)]
    pub amount:      Option<f64>,
    #[serde(default)]
    pub staff_name:  Option<String>,
    #[serde(default)]
    pub treatment:   Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl Visit {
    pub fn new(id: impl Into<EntityId>, customer_id: impl Into<EntityId>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            customer_id: customer_id.into(),
            date,
            amount: None,
            staff_name: None,
            treatment: None,
            payment_method: None,
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// The amount when it was recorded and is positive.
    pub fn recorded_amount(&self) -> Option<f64> {
        self.amount.filter(|a| *a > 0.0)
    }
}

// ── Appointment ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id:          EntityId,
    pub customer_id: EntityId,
    pub start_time:  NaiveDateTime,
    pub end_time:    NaiveDateTime,
    pub status:      AppointmentStatus,
    #[serde(default)]
    pub menu:        Option<String>,
    #[serde(default)]
    pub price:       Option<f64>,
    #[serde(default)]
    pub staff_name:  Option<String>,
}

impl Appointment {
    pub fn date(&self) -> NaiveDate {
        self.start_time.date()
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }
}

// ── Date parsing ─────────────────────────────────────────────────────────────

/// Accepts `YYYY-MM-DD` or a full timestamp and keeps the calendar date.
/// Always serializes as `YYYY-MM-DD`.
pub(crate) mod flexible_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, FORMAT)
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|dt| dt.date())
            })
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
    }

    pub mod option {
        use super::{parse, FORMAT};
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => s.serialize_some(&d.format(FORMAT).to_string()),
                None    => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(d)? {
                None => Ok(None),
                Some(raw) => parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'"))),
            }
        }
    }
}
