//! Deterministic random number generation for mock datasets.
//!
//! RULE: Mock data never calls a platform RNG.
//! Each part of the generated dataset draws from its own stream, seeded
//! from (master_seed XOR stream_index). Adding a stream never changes the
//! data produced by existing ones.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG stream.
pub struct SeededRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SeededRng {
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn for_stream(master_seed: u64, stream: MockStream) -> Self {
        Self::new(master_seed, stream as u64).with_name(stream.name())
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n). `n` must be > 0.
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an integer in [low, high] inclusive.
    pub fn range(&mut self, low: i64, high: i64) -> i64 {
        assert!(low <= high, "empty range {low}..={high}");
        low + self.next_u64_below((high - low + 1) as u64) as i64
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick one element of a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.next_u64_below(items.len() as u64) as usize]
    }
}

/// Stable stream assignments.
/// NEVER reorder or remove entries. Append only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum MockStream {
    Customers    = 0,
    Visits       = 1,
    Appointments = 2,
    Names        = 3,
}

impl MockStream {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Customers    => "customers",
            Self::Visits       => "visits",
            Self::Appointments => "appointments",
            Self::Names        => "names",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeededRng::for_stream(7, MockStream::Visits);
        let mut b = SeededRng::for_stream(7, MockStream::Visits);
        for _ in 0..100 {
            assert_eq!(a.next_u64_below(1000), b.next_u64_below(1000));
        }
    }

    #[test]
    fn streams_are_independent() {
        let mut a = SeededRng::for_stream(7, MockStream::Visits);
        let mut b = SeededRng::for_stream(7, MockStream::Customers);
        let xs: Vec<u64> = (0..8).map(|_| a.next_u64_below(u64::MAX)).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.next_u64_below(u64::MAX)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn range_is_inclusive_and_bounded() {
        let mut rng = SeededRng::new(1, 0);
        let mut seen_low = false;
        let mut seen_high = false;
        for _ in 0..1000 {
            let x = rng.range(2, 4);
            assert!((2..=4).contains(&x));
            seen_low |= x == 2;
            seen_high |= x == 4;
        }
        assert!(seen_low && seen_high);
    }
}
