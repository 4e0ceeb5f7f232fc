//! Price value object.
//!
//! Prices are kept in the smallest currency unit (e.g. cents) to avoid
//! floating-point drift. Compared by value.

use serde::{Deserialize, Serialize};

/// A price in minor currency units.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Convenience constructor: `Price::from_major_minor(12, 50)` is 12.50.
    pub fn from_major_minor(major: i64, minor: i64) -> Self {
        Self(major * 100 + minor)
    }

    pub fn minor(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
