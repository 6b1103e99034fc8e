//! Quasi-static E(J) curve
//!
//! Resistivity is interpolated between its room-temperature and melt values as a
//! function of how close the current density is to loss of cohesion:
//!
//! ```text
//! ρ(J) = ρ₀ + (ρₘ − ρ₀) · min(1, (J/J_LOC)^1.5)
//! E(J) = ρ(J) · J
//! ```
//!
//! The 1.5 exponent is a calibration constant chosen to reproduce the super-linear
//! resistance rise seen approaching LOC; it is not derived from a transport model.
//! Any exponent > 0 keeps E(J) monotone, which the onset bisection relies on.

use serde::{Deserialize, Serialize};

use crate::core_types::material::MaterialProperties;

/// Exponent of the (J/J_LOC) resistivity interpolation
pub const RESISTIVITY_EXPONENT: f64 = 1.5;

/// The curve is sampled up to this multiple of J_LOC
pub const CURVE_EXTENT: f64 = 1.05;

/// Smallest sampling step (A/mm²)
pub const MIN_CURVE_STEP: f64 = 0.3;

/// Sample count used by chart consumers
pub const DEFAULT_CURVE_SAMPLES: usize = 100;

/// Interpolated resistivity at current density `j` (Ω·m)
///
/// `j` and `j_loc` share units (A/mm²). With `j_loc` ≤ 0 the melt resistivity is used.
#[inline]
pub fn interpolated_resistivity(material: &MaterialProperties, j: f64, j_loc: f64) -> f64 {
    let frac = if j_loc > 0.0 {
        (j.max(0.0) / j_loc).powf(RESISTIVITY_EXPONENT).min(1.0)
    } else {
        1.0
    };
    material.resistivity_room + (material.resistivity_melt - material.resistivity_room) * frac
}

/// Field at current density `j` (A/mm²) in V/cm
#[inline]
pub fn field_at(material: &MaterialProperties, j: f64, j_loc: f64) -> f64 {
    // Ω·m × A/mm² × 1e6 → V/m, / 100 → V/cm
    interpolated_resistivity(material, j, j_loc) * j * 1e6 / 100.0
}

/// One (J, E) point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSample {
    /// Current density (A/mm²)
    pub j: f64,
    /// Electric field (V/cm)
    pub e: f64,
}

/// Sampled E(J) curve of one material
///
/// Cheap to hold; iterate it as many times as needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldCurve<'a> {
    material: &'a MaterialProperties,
    j_loc: f64,
    step: f64,
    len: usize,
}

impl<'a> FieldCurve<'a> {
    /// Samples from `step` to 1.05·J_LOC with step = max(0.3, 1.05·J_LOC/`samples`)
    ///
    /// Non-positive J_LOC yields an empty curve.
    pub fn new(material: &'a MaterialProperties, j_loc: f64, samples: usize) -> Self {
        if j_loc <= 0.0 || !j_loc.is_finite() {
            return Self {
                material,
                j_loc,
                step: MIN_CURVE_STEP,
                len: 0,
            };
        }
        let extent = j_loc * CURVE_EXTENT;
        let step = (extent / samples.max(1) as f64).max(MIN_CURVE_STEP);
        // Tolerance absorbs the rounding of extent/step when samples divides evenly
        let len = (extent / step + 1e-9).floor() as usize;
        Self {
            material,
            j_loc,
            step,
            len,
        }
    }

    pub fn j_loc(&self) -> f64 {
        self.j_loc
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> FieldCurveIter<'a> {
        FieldCurveIter {
            curve: *self,
            index: 0,
        }
    }

    /// Field at the curve's end point J_LOC (V/cm)
    pub fn field_at_loc(&self) -> f64 {
        field_at(self.material, self.j_loc, self.j_loc)
    }
}

impl<'a> IntoIterator for &FieldCurve<'a> {
    type Item = FieldSample;
    type IntoIter = FieldCurveIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the samples of a [`FieldCurve`]
#[derive(Debug, Clone)]
pub struct FieldCurveIter<'a> {
    curve: FieldCurve<'a>,
    index: usize,
}

impl Iterator for FieldCurveIter<'_> {
    type Item = FieldSample;

    fn next(&mut self) -> Option<FieldSample> {
        if self.index >= self.curve.len {
            return None;
        }
        self.index += 1;
        let j = self.curve.step * self.index as f64;
        Some(FieldSample {
            j,
            e: field_at(self.curve.material, j, self.curve.j_loc),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.curve.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FieldCurveIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resistivity_endpoints() {
        let ti = MaterialProperties::titanium();
        assert_relative_eq!(interpolated_resistivity(&ti, 0.0, 68.0), ti.resistivity_room);
        assert_relative_eq!(interpolated_resistivity(&ti, 68.0, 68.0), ti.resistivity_melt);
        // Saturates past LOC
        assert_relative_eq!(interpolated_resistivity(&ti, 90.0, 68.0), ti.resistivity_melt);
    }

    #[test]
    fn test_field_at_loc_units() {
        let ti = MaterialProperties::titanium();
        // 1.78e-6 Ω·m × 68e6 A/m² = 121 V/m = 1.21 V/cm
        assert_relative_eq!(field_at(&ti, 68.0, 68.0), 1.2104, max_relative = 1e-4);
    }

    #[test]
    fn test_curve_covers_extent_and_is_monotone() {
        let cu = MaterialProperties::copper();
        let curve = FieldCurve::new(&cu, 229.0, DEFAULT_CURVE_SAMPLES);
        assert_eq!(curve.len(), DEFAULT_CURVE_SAMPLES);

        let samples: Vec<FieldSample> = curve.iter().collect();
        let last = samples.last().expect("non-empty curve");
        assert_relative_eq!(last.j, 229.0 * CURVE_EXTENT, max_relative = 1e-9);
        assert!(samples.windows(2).all(|w| w[1].e >= w[0].e && w[1].j > w[0].j));
    }

    #[test]
    fn test_curve_is_restartable() {
        let ni = MaterialProperties::nickel();
        let curve = FieldCurve::new(&ni, 39.0, 50);
        let first: Vec<FieldSample> = curve.iter().collect();
        let second: Vec<FieldSample> = (&curve).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(curve.iter().len(), curve.len());
    }

    #[test]
    fn test_small_loc_uses_minimum_step() {
        let w = MaterialProperties::tungsten();
        let curve = FieldCurve::new(&w, 3.0, 100);
        // 1.05·3 / 0.3 = 10.5 → 10 samples at 0.3 A/mm² spacing
        assert_eq!(curve.len(), 10);
        let first = curve.iter().next().expect("first sample");
        assert_relative_eq!(first.j, MIN_CURVE_STEP);
    }

    #[test]
    fn test_non_positive_loc_gives_empty_curve() {
        let al = MaterialProperties::aluminum();
        assert!(FieldCurve::new(&al, 0.0, 100).is_empty());
        assert_eq!(FieldCurve::new(&al, -5.0, 100).iter().count(), 0);
    }
}
