//! Uniform random helpers.
//!
//! The free functions draw from a thread-local `StdRng` seeded once from OS
//! entropy. [`RandomSource`] owns its own generator and can be seeded for
//! reproducible runs.

use std::cell::RefCell;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RandomError {
    #[error("empty sampling range [{min}, {max}]")]
    EmptyRange { min: f64, max: f64 },
    #[error("sampling range [{min}, {max}) is wider than f64 can represent")]
    RangeOverflow { min: f64, max: f64 },
}

thread_local! {
    static THREAD_RNG: RefCell<StdRng> = RefCell::new(StdRng::from_entropy());
}

/// Owned uniform sampler.
#[derive(Clone, Debug)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests and replays.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform sample in `[min, max)`; returns `min` when the bounds coincide.
    pub fn double(&mut self, min: f64, max: f64) -> Result<f64, RandomError> {
        sample_double(&mut self.rng, min, max)
    }

    /// Uniform sample in `[min, max]`.
    pub fn int(&mut self, min: i32, max: i32) -> Result<i32, RandomError> {
        sample_int(&mut self.rng, min, max)
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Uniform real sample in `[min, max)` from the thread-local generator.
pub fn random_double(min: f64, max: f64) -> Result<f64, RandomError> {
    THREAD_RNG.with(|rng| sample_double(&mut *rng.borrow_mut(), min, max))
}

/// Uniform integer sample in `[min, max]` from the thread-local generator.
pub fn random_int(min: i32, max: i32) -> Result<i32, RandomError> {
    THREAD_RNG.with(|rng| sample_int(&mut *rng.borrow_mut(), min, max))
}

fn sample_double<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> Result<f64, RandomError> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(RandomError::EmptyRange { min, max });
    }
    if min == max {
        return Ok(min);
    }
    if !(max - min).is_finite() {
        return Err(RandomError::RangeOverflow { min, max });
    }
    Ok(rng.gen_range(min..max))
}

fn sample_int<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> Result<i32, RandomError> {
    if min > max {
        return Err(RandomError::EmptyRange {
            min: min as f64,
            max: max as f64,
        });
    }
    Ok(rng.gen_range(min..=max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dice_rolls_stay_in_range() {
        let mut seen = [false; 6];
        for _ in 0..10_000 {
            let v = random_int(1, 6).expect("valid range");
            assert!((1..=6).contains(&v), "out of range: {v}");
            seen[(v - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "every face should appear");
    }

    #[test]
    fn unit_doubles_stay_in_range() {
        for _ in 0..10_000 {
            let v = random_double(0.0, 1.0).expect("valid range");
            assert!((0.0..=1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn degenerate_ranges() {
        assert_eq!(random_double(2.5, 2.5), Ok(2.5));
        assert_eq!(random_int(4, 4), Ok(4));
        assert!(random_int(5, 1).is_err());
        assert!(random_double(1.0, 0.0).is_err());
        assert!(random_double(f64::NAN, 1.0).is_err());
        assert_eq!(
            random_double(-f64::MAX, f64::MAX),
            Err(RandomError::RangeOverflow {
                min: -f64::MAX,
                max: f64::MAX
            })
        );
        let mut src = RandomSource::from_seed(1);
        assert!(src.double(-f64::MAX / 2.0, f64::MAX / 2.0).is_ok());
    }

    #[test]
    fn seeded_sources_repeat() {
        let mut a = RandomSource::from_seed(42);
        let mut b = RandomSource::from_seed(42);
        for _ in 0..32 {
            assert_eq!(a.int(-10, 10), b.int(-10, 10));
            assert_eq!(a.double(-1.0, 1.0), b.double(-1.0, 1.0));
        }
    }

    #[test]
    fn successive_draws_differ() {
        let mut src = RandomSource::from_seed(7);
        let draws: Vec<f64> = (0..16)
            .map(|_| src.double(0.0, 1.0).expect("valid range"))
            .collect();
        assert!(draws.windows(2).any(|w| w[0] != w[1]));
    }
}
