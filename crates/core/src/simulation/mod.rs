//! Result aggregation
//!
//! Merges the steady-state branch (cooling → J_ss/J_LOC → E(J) → flash onset) and
//! the transient branch (E_peak, melt event) into one [`SimulationResult`].
//! Results are recomputed from scratch on every call and never mutated.

pub mod batch;
pub mod experiments;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core_types::geometry::Specimen;
use crate::core_types::material::{MaterialDatabase, MaterialProperties};
use crate::core_types::process::ProcessParameters;
use crate::physics::cooling::CoolingModel;
use crate::physics::field_curve::{FieldCurve, DEFAULT_CURVE_SAMPLES};
use crate::physics::flash_threshold::{
    coherence_length_um, find_onset_current_density, flash_threshold, flash_window_percent,
    FlashOutcome, ThresholdAssessment,
};
use crate::physics::steady_state::solve_steady_state;
use crate::physics::transient::{simulate_transient, MeltEvent};

pub use batch::{comparison_table, evaluate_all, ComparisonRow};
pub use experiments::{process_map, ProcessMapPoint, ReferenceRun, REFERENCE_RUNS};

/// Floor on the ramp rate (A/mm²/s) and τ (s) in the normalized-ramp ratio
const MIN_RATE_FLOOR: f64 = 0.001;

/// Sensitivity ratio reported when the 10%-J_LOC voltage drop is zero
const SENSITIVITY_SENTINEL: f64 = 99.0;

/// Thermal regime of a ramp, split at N_R = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoolingRegime {
    /// N_R < 1: the ramp outruns the cooling response
    Adiabatic,
    /// N_R ≥ 1: cooling keeps up with the ramp
    CoolingLimited,
}

impl CoolingRegime {
    pub fn from_normalized_ramp(n_r: f64) -> Self {
        if n_r < 1.0 {
            CoolingRegime::Adiabatic
        } else {
            CoolingRegime::CoolingLimited
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CoolingRegime::Adiabatic => "adiabatic",
            CoolingRegime::CoolingLimited => "cooling-limited",
        }
    }
}

/// Decision record for one (material, specimen, process) triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub material: String,

    /// Steady-state melt current density (A/mm²)
    pub j_ss: f64,
    /// Loss-of-cohesion current density (A/mm²)
    pub j_loc: f64,
    /// Whether J_LOC came from a calibration reference
    pub calibrated: bool,
    /// Steady-state field at LOC, ρₘ·J_LOC (V/cm)
    pub e_max: f64,

    /// Coherence length (µm)
    pub coherence_length_um: f64,
    /// Flash threshold field (V/cm)
    pub e_flash: f64,
    /// Flash onset current density, 0 when flash is never reached (A/mm²)
    pub j_flash: f64,
    /// Current at flash onset (A)
    pub i_onset: f64,
    /// Current at LOC (A)
    pub i_loc: f64,
    /// (J_LOC − J_flash)/J_LOC (%)
    pub flash_window_percent: f64,
    pub outcome: FlashOutcome,
    pub reaches_flash: bool,

    /// Convective coefficient used by the steady-state branch (W/(m²·K))
    pub h_effective: f64,
    /// Cooling time constant (s)
    pub tau: f64,
    /// Applied ramp rate (A/mm²/min)
    pub ramp_rate: f64,
    /// Time for the ramp to reach J_LOC (s)
    pub ramp_time: f64,
    /// Normalized ramp N_R = t_ramp/τ
    pub normalized_ramp: f64,
    pub regime: CoolingRegime,
    /// Share of cooling carried by the clips (%)
    pub clip_percent: f64,

    /// Peak field during the transient ramp (V/cm)
    pub e_peak: f64,
    /// Transient melt point, `None` when the specimen did not melt within 20 s
    pub melt: Option<MeltEvent>,
    /// Applied current ramp (A/s)
    pub current_ramp: f64,

    /// Cross-section (mm²)
    pub area_mm2: f64,
    /// Room-temperature resistance ρ₀·L/A (Ω)
    pub base_resistance: f64,
    /// Voltage offset over the 10%-J_LOC voltage drop
    pub sensitivity_ratio: f64,
    pub assessment: ThresholdAssessment,
}

impl SimulationResult {
    /// Larger of the steady-state and transient fields (V/cm)
    pub fn e_best(&self) -> f64 {
        self.e_max.max(self.e_peak)
    }

    /// Time to melt in the transient run, if it melted (s)
    pub fn time_to_melt(&self) -> Option<f64> {
        self.melt.map(|m| m.time_s)
    }
}

/// Evaluate the material stored under `key`; `None` when the key is unknown
pub fn evaluate(
    db: &MaterialDatabase,
    key: &str,
    specimen: &Specimen,
    params: &ProcessParameters,
) -> Option<SimulationResult> {
    db.get(key)
        .map(|material| evaluate_material(db, material, specimen, params))
}

/// Evaluate one material
pub fn evaluate_material(
    db: &MaterialDatabase,
    material: &MaterialProperties,
    specimen: &Specimen,
    params: &ProcessParameters,
) -> SimulationResult {
    let cooling = CoolingModel::resolve(db, material, specimen, &params.environment);
    let steady = solve_steady_state(db, material, specimen, params, &cooling);
    let j_loc = steady.j_loc;

    // Flash branch
    let r_um = coherence_length_um(specimen.gauge_length_mm);
    let e_flash = flash_threshold(material.voltivity, specimen.gauge_length_mm);
    let j_flash = find_onset_current_density(material, j_loc, e_flash);
    let outcome = FlashOutcome::classify(j_flash, j_loc);

    // Transient branch
    let transient = simulate_transient(
        material,
        specimen,
        params.ramp_rate,
        params.max_current,
        cooling.profile(),
    );

    let area_mm2 = specimen.area_mm2();
    let length_m = specimen.gauge_length_m();
    let e_max = material.resistivity_melt * j_loc * 1e6 / 100.0;

    let ramp_time = j_loc / params.ramp_rate_per_second().max(MIN_RATE_FLOOR);
    let tau = steady.cooling.tau;
    let normalized_ramp = ramp_time / tau.max(MIN_RATE_FLOOR);

    let v10 = material.resistivity_room * (j_loc * 0.1 * 1e6) * length_m;
    let sensitivity_ratio = if v10 > 0.0 {
        (params.voltage_offset_mv / 1000.0) / v10
    } else {
        SENSITIVITY_SENTINEL
    };

    let e_best = e_max.max(transient.e_peak);

    debug!(
        "{}: E_flash={:.3} V/cm, J_flash={:.2} A/mm², N_R={:.3}, E_peak={:.3} V/cm, melt={:?}",
        material.key,
        e_flash,
        j_flash,
        normalized_ramp,
        transient.e_peak,
        transient.melt.map(|m| m.time_s)
    );

    SimulationResult {
        material: material.key.clone(),
        j_ss: steady.j_ss,
        j_loc,
        calibrated: steady.is_calibrated(),
        e_max,
        coherence_length_um: r_um,
        e_flash,
        j_flash,
        i_onset: j_flash * area_mm2,
        i_loc: j_loc * area_mm2,
        flash_window_percent: flash_window_percent(j_loc, j_flash),
        outcome,
        reaches_flash: outcome.reaches_flash(),
        h_effective: steady.h_effective,
        tau,
        ramp_rate: params.ramp_rate,
        ramp_time,
        normalized_ramp,
        regime: CoolingRegime::from_normalized_ramp(normalized_ramp),
        clip_percent: steady.cooling.clip_percent(),
        e_peak: transient.e_peak,
        melt: transient.melt,
        current_ramp: transient.current_ramp,
        area_mm2,
        base_resistance: material.resistivity_room * length_m / specimen.area_m2(),
        sensitivity_ratio,
        assessment: ThresholdAssessment::assess(e_best, e_flash),
    }
}

/// Sampled E(J) curve of `material` for plotting, using the J_LOC of this
/// specimen and process
pub fn field_curve<'a>(
    db: &MaterialDatabase,
    material: &'a MaterialProperties,
    specimen: &Specimen,
    params: &ProcessParameters,
    samples: Option<usize>,
) -> FieldCurve<'a> {
    let cooling = CoolingModel::resolve(db, material, specimen, &params.environment);
    let steady = solve_steady_state(db, material, specimen, params, &cooling);
    FieldCurve::new(material, steady.j_loc, samples.unwrap_or(DEFAULT_CURVE_SAMPLES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unknown_material_is_none() {
        let db = MaterialDatabase::builtin();
        let spec = Specimen::reference_foil();
        assert!(evaluate(&db, "Xx", &spec, &ProcessParameters::default()).is_none());
    }

    #[test]
    fn test_regime_boundary() {
        assert_eq!(CoolingRegime::from_normalized_ramp(0.5), CoolingRegime::Adiabatic);
        assert_eq!(CoolingRegime::from_normalized_ramp(1.0), CoolingRegime::CoolingLimited);
        assert_eq!(CoolingRegime::from_normalized_ramp(4.0), CoolingRegime::CoolingLimited);
    }

    #[test]
    fn test_derived_display_values() {
        let db = MaterialDatabase::builtin();
        let spec = Specimen::reference_foil();
        let params = ProcessParameters::default();
        let r = evaluate(&db, "Ti", &spec, &params).expect("Ti is built in");

        // R₀ = 4.2e-7 · 0.02 / 6e-7 = 0.014 Ω
        assert_relative_eq!(r.base_resistance, 0.014, max_relative = 1e-9);
        // V₁₀ = 4.2e-7 · 6.8e6 · 0.02 = 57.1 mV → s₁₀ = 10/57.1
        assert_relative_eq!(r.sensitivity_ratio, 0.01 / 0.05712, max_relative = 1e-3);
        assert_relative_eq!(r.i_loc, 68.0 * 0.6, max_relative = 1e-9);
        // t_ramp = 68 / (500/60) = 8.16 s
        assert_relative_eq!(r.ramp_time, 8.16, max_relative = 1e-9);
    }

    #[test]
    fn test_field_curve_ends_past_loc() {
        let db = MaterialDatabase::builtin();
        let ti = MaterialProperties::titanium();
        let curve = field_curve(
            &db,
            &ti,
            &Specimen::reference_foil(),
            &ProcessParameters::default(),
            None,
        );
        assert_relative_eq!(curve.j_loc(), 68.0, max_relative = 1e-9);
        assert_eq!(curve.len(), DEFAULT_CURVE_SAMPLES);
    }
}
