//! Semantic time type for the simulation clock
//!
//! Every timestamp and duration in the arena is a whole number of milliseconds
//! on the simulation clock. Wrapping it in a newtype keeps timestamps from
//! being mixed up with grid coordinates, counters or speed multipliers.
//!
//! # Usage
//! ```
//! use blast_arena_core::core_types::units::Millis;
//!
//! let planted = Millis::new(1_000);
//! let fuse = Millis::new(2_000);
//! assert_eq!(planted + fuse, Millis::new(3_000));
//! assert_eq!(Millis::new(100) - Millis::new(250), Millis::ZERO);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Sub};

/// Milliseconds on the simulation clock (timestamp or duration)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Millis(u64);

impl Millis {
    /// The start of the simulation clock, and the empty duration
    pub const ZERO: Millis = Millis(0);

    /// Create a new millisecond value
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Millis(value)
    }

    /// Raw millisecond count
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Seconds as f32 (display only)
    #[inline]
    #[must_use]
    pub fn as_secs_f32(self) -> f32 {
        self.0 as f32 / 1000.0
    }

    /// Divide a duration by a positive multiplier, rounding up.
    ///
    /// Rounding up keeps integer comparisons equivalent to comparing against
    /// the exact quotient: `elapsed < ceil(d / m)` iff `elapsed < d / m`.
    #[must_use]
    pub fn div_ceil_f32(self, divisor: f32) -> Self {
        debug_assert!(divisor > 0.0 && divisor.is_finite(), "divisor must be positive");
        let scaled = (self.0 as f64 / f64::from(divisor)).ceil();
        Millis(scaled.max(0.0) as u64)
    }
}

impl Deref for Millis {
    type Target = u64;
    #[inline]
    fn deref(&self) -> &u64 {
        &self.0
    }
}

impl From<u64> for Millis {
    #[inline]
    fn from(value: u64) -> Self {
        Millis(value)
    }
}

impl Add for Millis {
    type Output = Millis;
    #[inline]
    fn add(self, rhs: Millis) -> Millis {
        Millis(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Millis {
    #[inline]
    fn add_assign(&mut self, rhs: Millis) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

/// Saturating: an earlier timestamp minus a later one is zero
impl Sub for Millis {
    type Output = Millis;
    #[inline]
    fn sub(self, rhs: Millis) -> Millis {
        Millis(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
