//! Steady-state melt current and the empirical loss-of-cohesion law
//!
//! At steady state Joule heating at melt balances the total loss rate:
//!
//! ```text
//! ρₘ·J² = q_tot·(Tₘ − 300 K)   →   J_ss = √(q_tot·ΔT / ρₘ)
//! ```
//!
//! Specimens do not fail at J_ss; they fail above it. The overshoot is anchored on
//! a measured reference run per metal and scaled to the requested geometry and
//! ramp rate:
//!
//! ```text
//! J_LOC = J_ss_ref · (J_LOC_ref / J_ss_ref) · (J_ss / J_ss_ref) · (max(ramp, 50) / ramp_ref)^0.1
//! ```
//!
//! floored at J_ss. Metals without a reference run use a flat 2.8× overshoot.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core_types::geometry::{GeometrySpec, Specimen};
use crate::core_types::material::{CalibrationReference, MaterialDatabase, MaterialProperties};
use crate::core_types::process::ProcessParameters;

use super::cooling::CoolingModel;
use super::fin_cooling::FinCooling;

/// J_LOC / J_ss for metals without a calibration reference
pub const DEFAULT_OVERSHOOT: f64 = 2.8;

/// Exponent of the ramp-rate correction
pub const RAMP_SCALE_EXPONENT: f64 = 0.1;

/// Ramp rates below this are treated as this value in the ramp correction (A/mm²/min)
pub const MIN_SCALING_RAMP: f64 = 50.0;

/// Steady-state branch output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteadyState {
    /// Steady-state melt current density (A/mm²)
    pub j_ss: f64,
    /// Loss-of-cohesion current density (A/mm²)
    pub j_loc: f64,
    /// J_ss of the calibration specimen when the calibration law was applied (A/mm²)
    pub j_ss_reference: Option<f64>,
    /// Convective coefficient that fed the fin model (W/(m²·K))
    pub h_effective: f64,
    /// Fin + clip model of the requested specimen
    pub cooling: FinCooling,
}

impl SteadyState {
    /// Whether J_LOC came from the calibration law rather than the default factor
    pub fn is_calibrated(&self) -> bool {
        self.j_ss_reference.is_some()
    }

    /// J_LOC / J_ss
    pub fn overshoot(&self) -> f64 {
        if self.j_ss > 0.0 {
            self.j_loc / self.j_ss
        } else {
            0.0
        }
    }
}

/// J_ss = √(q_tot·ΔT/ρₘ), converted from A/m² to A/mm²
pub fn steady_state_current_density(material: &MaterialProperties, cooling: &FinCooling) -> f64 {
    (cooling.q_total * material.melt_rise() / material.resistivity_melt).sqrt() / 1e6
}

/// Weak ramp-rate correction (max(ramp, 50) / ramp_ref)^0.1
pub fn ramp_scale(ramp_rate: f64, reference_ramp: f64) -> f64 {
    (ramp_rate.max(MIN_SCALING_RAMP) / reference_ramp).powf(RAMP_SCALE_EXPONENT)
}

/// The foil the calibration run was measured on
pub fn reference_specimen(reference: &CalibrationReference) -> Specimen {
    Specimen::new(
        GeometrySpec::Foil {
            thickness_um: reference.thickness_um,
            width_mm: reference.width_mm,
        },
        reference.gauge_length_mm,
    )
}

/// Solve the steady-state branch for `material` mounted as `specimen`
///
/// `cooling` must be the model resolved for this material and specimen; the
/// reference specimen gets its own model resolved from the same environment.
pub fn solve_steady_state(
    db: &MaterialDatabase,
    material: &MaterialProperties,
    specimen: &Specimen,
    params: &ProcessParameters,
    cooling: &CoolingModel,
) -> SteadyState {
    let h_effective = cooling.steady_h();
    let fin = cooling.steady_fin(material, specimen);
    let j_ss = steady_state_current_density(material, &fin);

    let mut state = SteadyState {
        j_ss,
        j_loc: j_ss * DEFAULT_OVERSHOOT,
        j_ss_reference: None,
        h_effective,
        cooling: fin,
    };

    if let Some(reference) = &material.calibration {
        let ref_specimen = reference_specimen(reference);
        let ref_cooling = CoolingModel::resolve(db, material, &ref_specimen, &params.environment);
        let ref_fin = ref_cooling.steady_fin(material, &ref_specimen);
        let j_ss_ref = steady_state_current_density(material, &ref_fin);

        if j_ss_ref > 0.0 {
            let reference_overshoot = reference.j_loc / j_ss_ref;
            let geometry_scale = j_ss / j_ss_ref;
            let ramp = ramp_scale(params.ramp_rate, reference.ramp_rate);
            let j_loc = j_ss_ref * reference_overshoot * geometry_scale * ramp;

            state.j_loc = j_loc.max(j_ss);
            state.j_ss_reference = Some(j_ss_ref);
        }
    }

    debug!(
        "{}: h_eff={:.2} W/m²K, J_ss={:.2} A/mm², J_LOC={:.2} A/mm² ({:.2}x, calibrated: {})",
        material.key,
        h_effective,
        state.j_ss,
        state.j_loc,
        state.overshoot(),
        state.is_calibrated()
    );

    state
}
