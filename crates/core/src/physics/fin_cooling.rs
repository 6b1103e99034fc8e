//! Fin + clip steady conduction model
//!
//! The specimen is a fin clamped at both ends by water-cooled current clips. Heat
//! leaves through the lateral surface (convection, h·P/A) and axially into the
//! clips. The axial term is the classical fin solution for a fin of half-length
//! L/2 with both ends held at ambient:
//!
//! ```text
//! m      = √(h·P / (k·A))
//! q_clip = 2·k·m·tanh(m·L/2) / L
//! q_conv = h·P / A
//! τ      = ρ·Cp / (q_conv + q_clip)
//! ```
//!
//! All rates are volumetric per kelvin of overheat (W/(m³·K)).
//!
//! # References
//! - Incropera & DeWitt, "Fundamentals of Heat and Mass Transfer", §3.6 (extended surfaces)

use serde::{Deserialize, Serialize};

use crate::core_types::geometry::{area_and_perimeter, Specimen};
use crate::core_types::material::MaterialProperties;

/// Upper bound on the fin argument m·L/2 passed to `tanh`
const MAX_FIN_ARGUMENT: f64 = 20.0;

/// Smallest gauge length used in the clip term (m)
const MIN_GAUGE_LENGTH_M: f64 = 1e-6;

/// Result of the fin + clip model for one specimen and one h
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinCooling {
    /// Lateral-surface loss rate h·P/A (W/(m³·K))
    pub q_conv: f64,
    /// Axial conduction loss into the clips (W/(m³·K))
    pub q_clip: f64,
    /// q_conv + q_clip (W/(m³·K))
    pub q_total: f64,
    /// Cooling time constant ρ·Cp/q_total (s)
    pub tau: f64,
    /// Fin parameter m (1/m)
    pub fin_parameter: f64,
    /// Surface-to-volume ratio P/A (1/m)
    pub surface_to_volume: f64,
    /// Cross-section area (m²), already floored
    pub area: f64,
    /// Wetted perimeter (m)
    pub perimeter: f64,
}

impl FinCooling {
    /// Share of the total loss carried by the clips (%)
    pub fn clip_percent(&self) -> f64 {
        if self.q_total > 0.0 {
            self.q_clip / self.q_total * 100.0
        } else {
            0.0
        }
    }
}

/// Evaluate the fin + clip model at convective coefficient `h` (W/(m²·K))
///
/// With h = 0 every loss term is zero and τ is infinite.
pub fn fin_cooling(material: &MaterialProperties, specimen: &Specimen, h: f64) -> FinCooling {
    let (area, perimeter) = area_and_perimeter(&specimen.shape);
    let length = specimen.gauge_length_m().max(MIN_GAUGE_LENGTH_M);
    let k = material.thermal_conductivity;

    let surface_to_volume = perimeter / area;
    let m = (h * perimeter / (k * area)).sqrt();
    let fin_arg = (m * length / 2.0).min(MAX_FIN_ARGUMENT);

    let q_conv = h * surface_to_volume;
    let q_clip = 2.0 * k * m * fin_arg.tanh() / length;
    let q_total = q_conv + q_clip;
    let tau = material.volumetric_heat_capacity() / q_total;

    FinCooling {
        q_conv,
        q_clip,
        q_total,
        tau,
        fin_parameter: m,
        surface_to_volume,
        area,
        perimeter,
    }
}
