//! Voltivity flash threshold and onset current density
//!
//! The field needed to trigger flash is the voltivity spread over a coherence
//! length tied to the gauge length:
//!
//! ```text
//! r       = max(0.0834 · L_gauge[µm], 1 µm)
//! E_flash = λ / r
//! ```
//!
//! R_FACTOR = 0.0834 was fitted to the titanium reference runs.
//! The onset current density is where the analytic E(J) crosses E_flash, found
//! by fixed-iteration bisection.

use serde::{Deserialize, Serialize};

use crate::core_types::material::MaterialProperties;

use super::field_curve::field_at;

/// Coherence length per micrometre of gauge length
pub const R_FACTOR: f64 = 0.0834;

/// Smallest coherence length (µm)
pub const MIN_COHERENCE_LENGTH_UM: f64 = 1.0;

/// Bisection iterations; the bracket shrinks by 2⁶⁰, past f64 resolution
pub const BISECTION_ITERATIONS: usize = 60;

/// Lower end of the bisection bracket (A/mm²)
pub const BISECTION_LOWER_BOUND: f64 = 0.1;

/// Margins of the threshold assessment, as multiples of E_flash
const EXPECTED_MARGIN: f64 = 1.2;
const BORDERLINE_MARGIN: f64 = 0.8;

/// Coherence length r (µm) for a gauge length in mm
pub fn coherence_length_um(gauge_length_mm: f64) -> f64 {
    (R_FACTOR * gauge_length_mm * 1000.0).max(MIN_COHERENCE_LENGTH_UM)
}

/// Flash threshold field E_flash = λ/r (V/cm)
pub fn flash_threshold(voltivity: f64, gauge_length_mm: f64) -> f64 {
    voltivity / coherence_length_um(gauge_length_mm)
}

/// Current density (A/mm²) at which E(J) reaches `e_flash`
///
/// Returns 0 when the field at J_LOC stays below the threshold: the specimen
/// loses cohesion without flashing. E(J) is monotone for the resistivity
/// interpolation used, so checking the upper end is the only bracket test needed.
/// The result always lies in [0, J_LOC]; a non-finite J_LOC or E_flash gives 0.
pub fn find_onset_current_density(
    material: &MaterialProperties,
    j_loc: f64,
    e_flash: f64,
) -> f64 {
    if !j_loc.is_finite() || !e_flash.is_finite() || j_loc <= 0.0 {
        return 0.0;
    }
    if field_at(material, j_loc, j_loc) < e_flash {
        return 0.0;
    }

    let mut lo = BISECTION_LOWER_BOUND;
    let mut hi = j_loc;
    for _ in 0..BISECTION_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if field_at(material, mid, j_loc) < e_flash {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    (0.5 * (lo + hi)).clamp(0.0, j_loc)
}

/// Share of the ramp between flash onset and LOC (%)
///
/// Zero when the specimen never flashes.
pub fn flash_window_percent(j_loc: f64, j_flash: f64) -> f64 {
    if j_loc <= 0.0 || j_flash <= 0.0 {
        return 0.0;
    }
    (j_loc - j_flash) / j_loc * 100.0
}

/// What happens to the specimen as the ramp proceeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashOutcome {
    /// Flash onset is reached below J_LOC
    FlashThenLoc,
    /// LOC comes first
    MeltsWithoutFlash,
}

impl FlashOutcome {
    pub fn classify(j_flash: f64, j_loc: f64) -> Self {
        if j_flash > 0.0 && j_flash < j_loc {
            FlashOutcome::FlashThenLoc
        } else {
            FlashOutcome::MeltsWithoutFlash
        }
    }

    pub fn reaches_flash(self) -> bool {
        matches!(self, FlashOutcome::FlashThenLoc)
    }

    pub fn label(self) -> &'static str {
        match self {
            FlashOutcome::FlashThenLoc => "reaches flash, then LOC",
            FlashOutcome::MeltsWithoutFlash => "melts without flash",
        }
    }
}

/// Peak achievable field compared with the threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThresholdAssessment {
    /// E > 1.2·E_flash
    Expected,
    /// 0.8·E_flash < E ≤ 1.2·E_flash
    Borderline,
    /// E ≤ 0.8·E_flash; `needed_factor` is E_flash/E
    Below { needed_factor: f64 },
}

impl ThresholdAssessment {
    /// Compare the best field `e_best` (V/cm) against `e_flash`
    pub fn assess(e_best: f64, e_flash: f64) -> Self {
        if e_best > e_flash * EXPECTED_MARGIN {
            ThresholdAssessment::Expected
        } else if e_best > e_flash * BORDERLINE_MARGIN {
            ThresholdAssessment::Borderline
        } else {
            ThresholdAssessment::Below {
                needed_factor: e_flash / e_best.max(1e-3),
            }
        }
    }

    /// Whether the design point plots as flashing on the process map
    pub fn plausible_flash(self) -> bool {
        !matches!(self, ThresholdAssessment::Below { .. })
    }

    pub fn describe(self, e_best: f64, e_flash: f64) -> String {
        match self {
            ThresholdAssessment::Expected => {
                format!("{e_best:.3} > {e_flash:.2} V/cm. Flash expected.")
            }
            ThresholdAssessment::Borderline => {
                format!("{e_best:.3} ~ {e_flash:.2} V/cm. Borderline.")
            }
            ThresholdAssessment::Below { needed_factor } => {
                format!("{e_best:.3} < {e_flash:.2} V/cm. Need {needed_factor:.1}x more.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_titanium_threshold_at_20mm() {
        // r = 0.0834 · 20000 µm = 1668 µm
        assert_relative_eq!(coherence_length_um(20.0), 1668.0, max_relative = 1e-12);
        assert_relative_eq!(flash_threshold(1168.0, 20.0), 0.7002, max_relative = 1e-3);
    }

    #[test]
    fn test_coherence_length_floor() {
        assert_eq!(coherence_length_um(0.001), MIN_COHERENCE_LENGTH_UM);
        assert_eq!(flash_threshold(500.0, 0.0), 500.0);
    }

    #[test]
    fn test_bisection_hits_threshold() {
        let ti = MaterialProperties::titanium();
        let e_flash = flash_threshold(ti.voltivity, 20.0);
        let j = find_onset_current_density(&ti, 68.0, e_flash);
        assert!(j > 0.0 && j < 68.0);
        assert!((field_at(&ti, j, 68.0) - e_flash).abs() < 1e-3);
        assert_relative_eq!(j, 52.0, max_relative = 0.05);
    }

    #[test]
    fn test_no_flash_when_loc_field_is_short() {
        let cu = MaterialProperties::copper();
        let e_flash = flash_threshold(cu.voltivity, 20.0);
        // Copper at its reference LOC reaches only ~0.23 V/cm
        assert!(field_at(&cu, 229.0, 229.0) < e_flash);
        assert_eq!(find_onset_current_density(&cu, 229.0, e_flash), 0.0);
        assert_eq!(find_onset_current_density(&cu, 0.0, e_flash), 0.0);
    }

    #[test]
    fn test_non_finite_loc_has_no_onset() {
        let ti = MaterialProperties::titanium();
        let e_flash = flash_threshold(ti.voltivity, 20.0);
        assert_eq!(find_onset_current_density(&ti, f64::NAN, e_flash), 0.0);
        assert_eq!(find_onset_current_density(&ti, f64::INFINITY, e_flash), 0.0);
        assert_eq!(find_onset_current_density(&ti, 68.0, f64::NAN), 0.0);
    }

    #[test]
    fn test_window_and_outcome() {
        assert_relative_eq!(
            flash_window_percent(68.0, 52.0),
            23.53,
            max_relative = 1e-3
        );
        assert_eq!(flash_window_percent(68.0, 0.0), 0.0);
        assert_eq!(
            FlashOutcome::classify(52.0, 68.0),
            FlashOutcome::FlashThenLoc
        );
        assert_eq!(
            FlashOutcome::classify(0.0, 68.0),
            FlashOutcome::MeltsWithoutFlash
        );
        assert_eq!(
            FlashOutcome::classify(68.0, 68.0),
            FlashOutcome::MeltsWithoutFlash
        );
        assert!(FlashOutcome::FlashThenLoc.reaches_flash());
    }

    #[test]
    fn test_threshold_assessment_bands() {
        assert_eq!(
            ThresholdAssessment::assess(1.0, 0.7),
            ThresholdAssessment::Expected
        );
        assert_eq!(
            ThresholdAssessment::assess(0.7, 0.7),
            ThresholdAssessment::Borderline
        );
        match ThresholdAssessment::assess(0.2, 0.7) {
            ThresholdAssessment::Below { needed_factor } => {
                assert_relative_eq!(needed_factor, 3.5, max_relative = 1e-12);
            }
            other => panic!("expected Below, got {other:?}"),
        }
        assert!(!ThresholdAssessment::assess(0.0, 0.7).plausible_flash());
    }
}
