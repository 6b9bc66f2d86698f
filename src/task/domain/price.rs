//! Task price value object.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound used when a task is priced without an explicit range.
pub const DEFAULT_MIN_PRICE: i32 = 5;

/// Upper bound used when a task is priced without an explicit range.
pub const DEFAULT_MAX_PRICE: i32 = 50;

/// Price assigned to a task once, at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u32);

impl Price {
    /// Wraps a persisted price value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Draws a price uniformly from `[min, max]`.
    ///
    /// `min` is clamped to zero and `max` is clamped to at least `min`, so
    /// inverted or negative bounds still yield a valid price.
    #[must_use]
    pub fn random_in(min: i32, max: i32, rng: &mut impl Rng) -> Self {
        let lower = min.max(0);
        let upper = max.max(lower);
        let value = rng.random_range(lower..=upper);
        Self(value.unsigned_abs())
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
