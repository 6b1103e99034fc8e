//! Flash Process Window Core Library
//!
//! Electro-thermal process physics for current-ramped metal specimens. Predicts
//! whether a foil, wire or tube reaches the electro-phonon flash threshold before
//! it loses cohesion (LOC), given its geometry, material constants and the
//! cooling environment.
//!
//! ## Models
//!
//! - Fin + clip conduction cooling and a time constant τ
//! - Gas convection (Churchill–Chu with Knudsen slip / free-molecular cut-off)
//!   plus grey-body radiation
//! - Steady-state melt current J_ss and the calibrated LOC scaling law
//! - Quasi-static E(J) curve and the voltivity flash threshold
//! - Explicit transient integrator for the peak field and time to melt
//!
//! All entry points are pure functions over an injected, immutable
//! [`MaterialDatabase`]; nothing here holds mutable state.

// Core types and utilities
pub mod core_types;

// Process physics
pub mod physics;

// Result aggregation, batch evaluation and the process map
pub mod simulation;

// TOML scenarios and material tables
pub mod config;

// Re-export core types
pub use core_types::{
    CalibrationReference, Environment, GasAtmosphere, GasMixture, GasSpecies, GeometrySpec, Kelvin,
    MaterialDatabase, MaterialProperties, ProcessParameters, Specimen, Torr,
};

// Re-export the evaluation surface
pub use config::{ConfigError, Scenario};
pub use physics::{CoolingProfile, FieldCurve, FieldSample, FlashOutcome, ThresholdAssessment};
pub use simulation::{
    comparison_table, evaluate, evaluate_all, evaluate_material, field_curve, process_map,
    ComparisonRow, CoolingRegime, ProcessMapPoint, SimulationResult,
};
