//! # Randomness
//!
//! Injectable uniform random source used for surge variance and ETA jitter.

use parking_lot::Mutex;
use rand::Rng;
use std::fmt;

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource: Send + Sync + fmt::Debug {
    /// Returns the next sample in `[0, 1)`.
    fn next_unit(&self) -> f64;
}

/// Thread-local OS-seeded generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl ThreadRandom {
    /// Creates the thread-local random source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Always returns the same sample.
///
/// `FixedRandom::new(0.5)` makes surge variance and ETA jitter land on their
/// midpoints, which removes all randomness from an aggregation.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(f64);

impl FixedRandom {
    /// Creates a fixed source. Values are clamped into `[0, 1)`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        let value = if value.is_nan() { 0.0 } else { value };
        Self(value.max(0.0).min(1.0 - f64::EPSILON))
    }
}

impl RandomSource for FixedRandom {
    fn next_unit(&self) -> f64 {
        self.0
    }
}

/// Cycles through a fixed list of samples.
#[derive(Debug)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: Mutex<usize>,
}

impl SequenceRandom {
    /// Creates a cycling source. An empty list behaves like `FixedRandom::new(0.0)`.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|v| FixedRandom::new(v).next_unit())
                .collect(),
            cursor: Mutex::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&self) -> f64 {
        let mut cursor = self.cursor.lock();
        let value = self.values.get(*cursor).copied().unwrap_or(0.0);
        *cursor = if self.values.is_empty() {
            0
        } else {
            (*cursor + 1) % self.values.len()
        };
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_random_stays_in_unit_interval() {
        let source = ThreadRandom::new();
        for _ in 0..1000 {
            let v = source.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn fixed_random_clamps() {
        assert!(FixedRandom::new(1.0).next_unit() < 1.0);
        assert_eq!(FixedRandom::new(-3.0).next_unit(), 0.0);
        assert_eq!(FixedRandom::new(f64::NAN).next_unit(), 0.0);
    }

    #[test]
    fn sequence_random_cycles() {
        let source = SequenceRandom::new(vec![0.1, 0.9]);
        assert_eq!(source.next_unit(), 0.1);
        assert_eq!(source.next_unit(), 0.9);
        assert_eq!(source.next_unit(), 0.1);
        assert_eq!(SequenceRandom::new(vec![]).next_unit(), 0.0);
    }
}
