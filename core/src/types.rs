//! Shared primitive types used across the analytics engine.

/// A whole number of days.
pub type Days = i64;

/// A stable, unique identifier for a customer, visit or appointment.
pub type EntityId = String;

/// A rounded money figure in the salon's currency unit.
pub type Money = i64;

/// Round to the nearest integer, with halves rounded towards positive
/// infinity (-2.5 -> -2, 2.5 -> 3). `f64::round` rounds halves away from
/// zero, which would shift negative frequency changes by one.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
