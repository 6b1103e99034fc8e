//! Electro-thermal process physics
//!
//! Leaves first: cooling (fin + clip, gas convection/radiation), the steady-state
//! melt/LOC balance, the quasi-static E(J) curve, the voltivity flash threshold and
//! the explicit transient integrator. Everything here is a pure function of its
//! inputs.

pub mod cooling;
pub mod field_curve;
pub mod fin_cooling;
pub mod flash_threshold;
pub mod gas_cooling;
pub mod steady_state;
pub mod transient;

pub use cooling::CoolingModel;
pub use field_curve::{
    field_at, interpolated_resistivity, FieldCurve, FieldSample, DEFAULT_CURVE_SAMPLES,
    RESISTIVITY_EXPONENT,
};
pub use fin_cooling::{fin_cooling, FinCooling};
pub use flash_threshold::{
    coherence_length_um, find_onset_current_density, flash_threshold, flash_window_percent,
    FlashOutcome, ThresholdAssessment, R_FACTOR,
};
pub use gas_cooling::{
    churchill_chu_nusselt, convection_state, knudsen_number, radiation_coefficient, CoolingProfile,
    GasRegime, HeatTransferCoefficients,
};
pub use steady_state::{
    solve_steady_state, steady_state_current_density, SteadyState, DEFAULT_OVERSHOOT,
};
pub use transient::{simulate_transient, MeltEvent, TransientResult};
