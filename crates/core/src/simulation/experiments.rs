//! Reference flash experiments and the (N_R, E_max) process map
//!
//! The eleven foil runs below are the measurements the LOC scaling law was
//! calibrated against. Placing them on the normalized-ramp / peak-field plane next
//! to a design point shows which side of the flash boundary the design sits on.

use serde::{Deserialize, Serialize};

use crate::core_types::geometry::{GeometrySpec, Specimen};
use crate::core_types::material::MaterialDatabase;
use crate::physics::fin_cooling::fin_cooling;

use super::SimulationResult;

/// Share of E_flash above which a design point plots as flashing
const MAP_FLASH_MARGIN: f64 = 0.8;

/// Fallback field (V/cm) for the flash flag when no threshold is available
const MAP_FALLBACK_FIELD: f64 = 0.5;

/// One measured loss-of-cohesion run on a foil specimen
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceRun {
    pub label: &'static str,
    pub material: &'static str,
    /// A/mm²/min
    pub ramp_rate: f64,
    /// Foil thickness (µm)
    pub thickness_um: f64,
    /// Foil width (mm)
    pub width_mm: f64,
    /// Gauge length (mm)
    pub gauge_length_mm: f64,
    /// Measured J_LOC (A/mm²)
    pub j_loc: f64,
    /// Whether flash was observed
    pub flash: bool,
}

impl ReferenceRun {
    const fn foil(
        label: &'static str,
        material: &'static str,
        ramp_rate: f64,
        thickness_um: f64,
        j_loc: f64,
        flash: bool,
    ) -> Self {
        Self {
            label,
            material,
            ramp_rate,
            thickness_um,
            width_mm: 6.0,
            gauge_length_mm: 20.0,
            j_loc,
            flash,
        }
    }

    pub fn specimen(&self) -> Specimen {
        Specimen::new(
            GeometrySpec::Foil {
                thickness_um: self.thickness_um,
                width_mm: self.width_mm,
            },
            self.gauge_length_mm,
        )
    }
}

pub const REFERENCE_RUNS: [ReferenceRun; 11] = [
    ReferenceRun::foil("Ti R14", "Ti", 1000.0, 100.0, 70.3, true),
    ReferenceRun::foil("Ti R12", "Ti", 500.0, 100.0, 67.6, true),
    ReferenceRun::foil("Ti R13", "Ti", 244.0, 100.0, 65.1, true),
    ReferenceRun::foil("Cu R21", "Cu", 244.0, 50.0, 229.0, false),
    ReferenceRun::foil("Ni R1", "Ni", 5000.0, 200.0, 64.8, false),
    ReferenceRun::foil("Ni R2", "Ni", 1000.0, 200.0, 38.9, false),
    ReferenceRun::foil("Ni R3", "Ni", 500.0, 200.0, 33.1, false),
    ReferenceRun::foil("Al R1", "Al", 667.0, 25.0, 167.0, false),
    ReferenceRun::foil("Al R2", "Al", 244.0, 25.0, 150.0, false),
    ReferenceRun::foil("Al R3", "Al", 160.0, 25.0, 156.0, false),
    ReferenceRun::foil("Al R4", "Al", 107.0, 25.0, 145.0, false),
];

/// One point on the process map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessMapPoint {
    pub label: String,
    pub material: String,
    /// A/mm²/min
    pub ramp_rate: f64,
    /// A/mm²
    pub j_loc: f64,
    /// Normalized ramp t_ramp/τ
    pub normalized_ramp: f64,
    /// Peak field (V/cm)
    pub e_max: f64,
    pub flash: bool,
    /// The caller's design point rather than a reference run
    pub is_design: bool,
}

/// Place the reference runs on the (N_R, E_max) plane using fin cooling at `h`
///
/// Runs whose material is missing from `db` are skipped. When `design` is given
/// its point is appended last, using max(E_max, E_peak) and flagged as flashing
/// above 0.8·E_flash.
pub fn process_map(
    db: &MaterialDatabase,
    h: f64,
    design: Option<&SimulationResult>,
) -> Vec<ProcessMapPoint> {
    let mut points: Vec<ProcessMapPoint> = REFERENCE_RUNS
        .iter()
        .filter_map(|run| {
            let material = db.get(run.material)?;
            let cooling = fin_cooling(material, &run.specimen(), h);
            let ramp_time = run.j_loc / (run.ramp_rate / 60.0);
            Some(ProcessMapPoint {
                label: run.label.to_string(),
                material: run.material.to_string(),
                ramp_rate: run.ramp_rate,
                j_loc: run.j_loc,
                normalized_ramp: ramp_time / cooling.tau,
                e_max: material.resistivity_melt * run.j_loc * 1e6 / 100.0,
                flash: run.flash,
                is_design: false,
            })
        })
        .collect();

    if let Some(result) = design {
        let e_best = result.e_best();
        let flash = if result.e_flash > 0.0 {
            e_best > result.e_flash * MAP_FLASH_MARGIN
        } else {
            e_best > MAP_FALLBACK_FIELD
        };
        points.push(ProcessMapPoint {
            label: "Your design".to_string(),
            material: result.material.clone(),
            ramp_rate: result.ramp_rate,
            j_loc: result.j_loc,
            normalized_ramp: result.normalized_ramp,
            e_max: e_best,
            flash,
            is_design: true,
        });
    }

    points
}
