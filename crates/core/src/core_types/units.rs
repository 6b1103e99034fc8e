//! Semantic unit types for the quantities that cross module boundaries
//!
//! Newtype wrappers keep absolute temperatures and chamber pressures from being
//! mixed up with the many bare `f64` rates used inside the physics kernels.
//!
//! # Design Philosophy
//! - All types use f64 (T^3 radiation terms and 1e-15 m² areas need the headroom)
//! - Total ordering via `Ord` (NaN handled as greater than all values)
//! - Private inner fields with validated constructors
//! - Serde support for serialization
//!
//! # Usage
//! ```
//! use flash_window_core::core_types::units::{Kelvin, Torr};
//!
//! let t = Kelvin::new(1941.0);
//! assert!((*(t - Kelvin::AMBIENT) - 1641.0).abs() < 1e-9);
//!
//! let p = Torr::new(760.0);
//! assert!((p.to_pascals() - 101_325.0).abs() < 1.0);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Sub};

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// TEMPERATURE TYPES
// ============================================================================

/// Absolute temperature in Kelvin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kelvin(f64);

impl Eq for Kelvin {}

impl PartialOrd for Kelvin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Kelvin {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Kelvin {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Kelvin {
    /// Absolute zero
    pub const ABSOLUTE_ZERO: Kelvin = Kelvin(0.0);

    /// Room / chamber wall temperature every model is referenced to
    pub const AMBIENT: Kelvin = Kelvin(300.0);

    /// Create a new Kelvin temperature. Asserts value >= absolute zero (0 K).
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Kelvin::new: value is below absolute zero (0 K)");
        Kelvin(value)
    }

    /// Arithmetic mean of two temperatures (film temperature)
    #[inline]
    #[must_use]
    pub fn midpoint(self, other: Kelvin) -> Kelvin {
        Kelvin(0.5 * (self.0 + other.0))
    }
}

impl From<Kelvin> for f64 {
    fn from(k: Kelvin) -> f64 {
        k.0
    }
}

impl fmt::Display for Kelvin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} K", self.0)
    }
}

/// Temperature difference in Kelvin (any sign)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KelvinDelta(f64);

impl KelvinDelta {
    /// Create a temperature delta
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        KelvinDelta(value)
    }
}

impl Deref for KelvinDelta {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Sub for Kelvin {
    type Output = KelvinDelta;

    fn sub(self, rhs: Kelvin) -> KelvinDelta {
        KelvinDelta(self.0 - rhs.0)
    }
}

impl Add<KelvinDelta> for Kelvin {
    type Output = Kelvin;

    /// Shift a temperature. Results below absolute zero are floored at 0 K.
    fn add(self, rhs: KelvinDelta) -> Kelvin {
        Kelvin((self.0 + rhs.0).max(0.0))
    }
}

impl fmt::Display for KelvinDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} K", self.0)
    }
}

// ============================================================================
// PRESSURE TYPES
// ============================================================================

/// Chamber pressure in torr (mmHg)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Torr(f64);

impl Eq for Torr {}

impl PartialOrd for Torr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Torr {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Torr {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Torr {
    /// Pascals per torr (101325 / 760)
    pub const PASCALS_PER_TORR: f64 = 133.322_368;

    /// One standard atmosphere
    pub const ATMOSPHERE: Torr = Torr(760.0);

    /// Create a new pressure. Asserts value is non-negative.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Torr::new: negative pressure is invalid");
        Torr(value)
    }

    /// Convert to pascals
    #[inline]
    #[must_use]
    pub fn to_pascals(self) -> f64 {
        self.0 * Self::PASCALS_PER_TORR
    }
}

impl fmt::Display for Torr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 1e-2 {
            write!(f, "{:.1e} Torr", self.0)
        } else {
            write!(f, "{:.2} Torr", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kelvin_delta_and_shift() {
        let melt = Kelvin::new(933.0);
        let dt = melt - Kelvin::AMBIENT;
        assert_eq!(*dt, 633.0);
        assert_eq!(Kelvin::AMBIENT + dt, melt);

        // Shifting below absolute zero saturates
        let cold = Kelvin::new(10.0) + KelvinDelta::new(-50.0);
        assert_eq!(cold, Kelvin::ABSOLUTE_ZERO);
    }

    #[test]
    fn test_kelvin_total_ordering() {
        let a = Kelvin::new(300.0);
        let b = Kelvin::new(1941.0);
        assert!(a < b);
        assert_eq!(a.max(b), b);
        assert_eq!(a.midpoint(b), Kelvin::new(1120.5));
    }

    #[test]
    fn test_torr_conversion() {
        assert!((Torr::ATMOSPHERE.to_pascals() - 101_325.0).abs() < 0.5);
        assert!((Torr::new(1.0).to_pascals() - 133.322).abs() < 1e-3);
    }

    #[test]
    #[should_panic(expected = "below absolute zero")]
    fn test_kelvin_rejects_negative() {
        let _ = Kelvin::new(-1.0);
    }
}
