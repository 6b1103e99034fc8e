//! Parallel evaluation of every material in a database
//!
//! Each material is independent, so the batch is a plain rayon map over the
//! database with no shared mutable state.

use rayon::prelude::*;
use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core_types::geometry::Specimen;
use crate::core_types::material::MaterialDatabase;
use crate::core_types::process::ProcessParameters;
use crate::physics::flash_threshold::FlashOutcome;

use super::{evaluate_material, SimulationResult};

/// Evaluate every material in `db` in parallel, keyed by material key
///
/// The map carries no ordering; use [`comparison_table`] for display order.
pub fn evaluate_all(
    db: &MaterialDatabase,
    specimen: &Specimen,
    params: &ProcessParameters,
) -> FxHashMap<String, SimulationResult> {
    let materials: Vec<_> = db.iter().collect();

    let mut results: FxHashMap<String, SimulationResult> =
        FxHashMap::with_capacity_and_hasher(materials.len(), FxBuildHasher);
    results.par_extend(materials.par_iter().map(|material| {
        (
            material.key.clone(),
            evaluate_material(db, material, specimen, params),
        )
    }));

    info!(
        "Evaluated {} materials for {} at {} A/mm²/min",
        results.len(),
        specimen.describe(),
        params.ramp_rate
    );
    results
}

/// One line of the material comparison table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub key: String,
    pub name: String,
    /// A/mm²
    pub j_ss: f64,
    /// A/mm²
    pub j_loc: f64,
    /// V/cm
    pub e_flash: f64,
    /// V/cm
    pub e_max: f64,
    /// A/mm²
    pub j_flash: f64,
    pub flash_window_percent: f64,
    pub outcome: FlashOutcome,
    pub calibrated: bool,
}

/// Comparison rows in database order
pub fn comparison_table(
    db: &MaterialDatabase,
    specimen: &Specimen,
    params: &ProcessParameters,
) -> Vec<ComparisonRow> {
    let mut results = evaluate_all(db, specimen, params);

    db.iter()
        .filter_map(|material| {
            results.remove(&material.key).map(|r| ComparisonRow {
                key: material.key.clone(),
                name: material.name.clone(),
                j_ss: r.j_ss,
                j_loc: r.j_loc,
                e_flash: r.e_flash,
                e_max: r.e_max,
                j_flash: r.j_flash,
                flash_window_percent: r.flash_window_percent,
                outcome: r.outcome,
                calibrated: r.calibrated,
            })
        })
        .collect()
}
