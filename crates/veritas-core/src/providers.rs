//! Injectable randomness and wall-clock providers.
//!
//! Everything nondeterministic in the matcher and the reply generator goes
//! through these two traits. Production code shares one [`StdRandom`] and one
//! [`SystemClock`] per process; tests seed the random source and drive a
//! [`ManualClock`] so every synthesized record and template choice is
//! reproducible.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// =============================================================================
// RandomSource
// =============================================================================

/// Source of uniform random integers.
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `[low, high]`, both inclusive.
    ///
    /// Implementations return `low` when `high <= low`.
    fn int_in_range(&self, low: u64, high: u64) -> u64;

    /// Uniform index into a collection of `len` items. Returns 0 for empty
    /// collections so callers can index slices that are known non-empty.
    fn index(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.int_in_range(0, len as u64 - 1) as usize
    }
}

/// [`RandomSource`] backed by a mutex-guarded `StdRng`.
pub struct StdRandom {
    rng: Mutex<StdRng>,
}

impl StdRandom {
    /// Seed from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic stream for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        // Poisoning leaves the generator state valid.
        self.rng.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for StdRandom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdRandom").finish_non_exhaustive()
    }
}

impl RandomSource for StdRandom {
    fn int_in_range(&self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        self.rng().random_range(low..=high)
    }
}

// =============================================================================
// Clock
// =============================================================================

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward (or backward, for a negative duration).
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// =============================================================================
// Tests
// =============================================================================
