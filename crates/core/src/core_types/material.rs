//! Metal property records and the material database
//!
//! Constants are room-temperature / melting-point handbook values; the calibration
//! references are the measured loss-of-cohesion points from the reference foil runs
//! (see [`crate::simulation::experiments`]).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::units::Kelvin;

/// Emissivity used for any material missing from the emissivity table
pub const DEFAULT_EMISSIVITY: f64 = 0.40;

/// Materials drawn on multi-curve charts, in legend order (Re has no calibration
/// and its E(J) curve dwarfs the rest)
pub const CHART_KEYS: [&str; 7] = ["Ti", "Cu", "Ni", "Al", "W", "Pt", "Fe"];

/// Measured LOC point that anchors the empirical LOC scaling law for one metal
///
/// Reference specimens are always foils.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReference {
    /// Ramp rate of the reference run (A/mm²/min)
    pub ramp_rate: f64,
    /// Measured loss-of-cohesion current density (A/mm²)
    pub j_loc: f64,
    /// Foil thickness (µm)
    pub thickness_um: f64,
    /// Foil width (mm)
    pub width_mm: f64,
    /// Gauge length (mm)
    pub gauge_length_mm: f64,
}

/// Physical constants of one metal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Short lookup key ("Ti", "Cu", ...)
    pub key: String,
    pub name: String,

    // Electrical
    pub resistivity_room: f64, // Ω·m at 300 K (ρ₀)
    pub resistivity_melt: f64, // Ω·m at the melting point (ρₘ)

    // Thermal
    pub melting_point: f64,        // K
    pub specific_heat: f64,        // J/(kg·K)
    pub density: f64,              // kg/m³
    pub thermal_conductivity: f64, // W/(m·K)

    /// Voltivity λ (V·µm)
    pub voltivity: f64,

    #[serde(default)]
    pub calibration: Option<CalibrationReference>,
}

impl MaterialProperties {
    /// Melting point as an absolute temperature
    #[inline]
    pub fn melting_temperature(&self) -> Kelvin {
        Kelvin::new(self.melting_point.max(0.0))
    }

    /// Temperature rise from ambient to the melting point (K)
    #[inline]
    pub fn melt_rise(&self) -> f64 {
        *(self.melting_temperature() - Kelvin::AMBIENT)
    }

    /// Volumetric heat capacity ρ·Cp (J/(m³·K))
    #[inline]
    pub fn volumetric_heat_capacity(&self) -> f64 {
        self.density * self.specific_heat
    }

    /// Check the invariants every model relies on: ρₘ > ρ₀ > 0, Tₘ > 300 K and
    /// strictly positive thermal constants.
    ///
    /// # Errors
    /// Returns a short description of the first violated constraint.
    pub fn check_physical(&self) -> Result<(), &'static str> {
        let finite = [
            self.resistivity_room,
            self.resistivity_melt,
            self.melting_point,
            self.specific_heat,
            self.density,
            self.thermal_conductivity,
            self.voltivity,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err("all constants must be finite");
        }
        if self.resistivity_room <= 0.0 {
            return Err("room-temperature resistivity must be positive");
        }
        if self.resistivity_melt <= self.resistivity_room {
            return Err("resistivity at melt must exceed room-temperature resistivity");
        }
        if self.melting_point <= *Kelvin::AMBIENT {
            return Err("melting point must be above 300 K");
        }
        if self.specific_heat <= 0.0 || self.density <= 0.0 || self.thermal_conductivity <= 0.0 {
            return Err("specific heat, density and thermal conductivity must be positive");
        }
        if self.voltivity <= 0.0 {
            return Err("voltivity must be positive");
        }
        if let Some(cal) = &self.calibration {
            if cal.ramp_rate <= 0.0
                || cal.j_loc <= 0.0
                || cal.thickness_um <= 0.0
                || cal.width_mm <= 0.0
                || cal.gauge_length_mm <= 0.0
            {
                return Err("calibration reference values must be positive");
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn builtin(
        key: &str,
        name: &str,
        resistivity_room: f64,
        resistivity_melt: f64,
        melting_point: f64,
        specific_heat: f64,
        density: f64,
        thermal_conductivity: f64,
        voltivity: f64,
        calibration: Option<CalibrationReference>,
    ) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            resistivity_room,
            resistivity_melt,
            melting_point,
            specific_heat,
            density,
            thermal_conductivity,
            voltivity,
            calibration,
        }
    }

    /// Titanium, calibrated on run R12 (500 A/mm²/min, 100 µm × 6 mm foil)
    #[rustfmt::skip]
    pub fn titanium() -> Self {
        Self::builtin(
            "Ti", "Titanium", 4.2e-7, 1.78e-6, 1941.0, 523.0, 4510.0, 21.9, 1168.0,
            Some(foil_reference(500.0, 68.0, 100.0)),
        )
    }

    /// Nickel, calibrated on run R2 (1000 A/mm²/min, 200 µm foil)
    #[rustfmt::skip]
    pub fn nickel() -> Self {
        Self::builtin(
            "Ni", "Nickel", 6.99e-8, 3.5e-7, 1728.0, 444.0, 8908.0, 90.9, 1090.0,
            Some(foil_reference(1000.0, 39.0, 200.0)),
        )
    }

    /// Copper, calibrated on run R21 (244 A/mm²/min, 50 µm foil)
    #[rustfmt::skip]
    pub fn copper() -> Self {
        Self::builtin(
            "Cu", "Copper", 1.68e-8, 1.0e-7, 1358.0, 385.0, 8960.0, 401.0, 818.0,
            Some(foil_reference(244.0, 229.0, 50.0)),
        )
    }

    /// Aluminum, calibrated on run R2 (244 A/mm²/min, 25 µm foil)
    #[rustfmt::skip]
    pub fn aluminum() -> Self {
        Self::builtin(
            "Al", "Aluminum", 2.65e-8, 1.2e-7, 933.0, 897.0, 2700.0, 237.0, 970.0,
            Some(foil_reference(244.0, 150.0, 25.0)),
        )
    }

    #[rustfmt::skip]
    pub fn iron() -> Self {
        Self::builtin(
            "Fe", "Iron", 9.71e-8, 1.3e-6, 1811.0, 449.0, 7874.0, 80.4, 1192.0, None,
        )
    }

    #[rustfmt::skip]
    pub fn tungsten() -> Self {
        Self::builtin(
            "W", "Tungsten", 5.28e-8, 2.5e-7, 3695.0, 132.0, 19300.0, 173.0, 1026.0, None,
        )
    }

    #[rustfmt::skip]
    pub fn platinum() -> Self {
        Self::builtin(
            "Pt", "Platinum", 1.06e-7, 3.8e-7, 2041.0, 133.0, 21450.0, 71.6, 493.0, None,
        )
    }

    #[rustfmt::skip]
    pub fn rhenium() -> Self {
        Self::builtin(
            "Re", "Rhenium", 1.93e-7, 9.0e-7, 3459.0, 137.0, 21020.0, 47.9, 1337.0, None,
        )
    }
}

/// Reference foils are all 6 mm wide with a 20 mm gauge
fn foil_reference(ramp_rate: f64, j_loc: f64, thickness_um: f64) -> CalibrationReference {
    CalibrationReference {
        ramp_rate,
        j_loc,
        thickness_um,
        width_mm: 6.0,
        gauge_length_mm: 20.0,
    }
}

/// Immutable, keyed collection of materials plus the emissivity table
///
/// Built once and passed by reference to every evaluation; sharing it between
/// rayon workers needs no synchronization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialDatabase {
    materials: Vec<MaterialProperties>,
    #[serde(default)]
    emissivity: FxHashMap<String, f64>,
}

impl MaterialDatabase {
    /// Create a database from records and an emissivity table
    pub fn new(materials: Vec<MaterialProperties>, emissivity: FxHashMap<String, f64>) -> Self {
        Self {
            materials,
            emissivity,
        }
    }

    /// The eight built-in metals in comparison-table order
    pub fn builtin() -> Self {
        let materials = vec![
            MaterialProperties::titanium(),
            MaterialProperties::nickel(),
            MaterialProperties::platinum(),
            MaterialProperties::iron(),
            MaterialProperties::tungsten(),
            MaterialProperties::copper(),
            MaterialProperties::aluminum(),
            MaterialProperties::rhenium(),
        ];

        // Oxide-free surfaces near the melting point. Re is intentionally absent.
        let emissivity = [
            ("Ti", 0.47),
            ("Ni", 0.36),
            ("Pt", 0.18),
            ("Fe", 0.35),
            ("W", 0.30),
            ("Cu", 0.15),
            ("Al", 0.12),
        ]
        .into_iter()
        .map(|(k, e)| (k.to_string(), e))
        .collect();

        Self::new(materials, emissivity)
    }

    /// Look up a material by key
    pub fn get(&self, key: &str) -> Option<&MaterialProperties> {
        self.materials.iter().find(|m| m.key == key)
    }

    /// Emissivity for a material, [`DEFAULT_EMISSIVITY`] when the table has no entry
    pub fn emissivity(&self, key: &str) -> f64 {
        self.emissivity
            .get(key)
            .copied()
            .unwrap_or(DEFAULT_EMISSIVITY)
    }

    /// Material keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.materials.iter().map(|m| m.key.as_str())
    }

    /// Keys from [`CHART_KEYS`] that exist in this database
    pub fn chart_keys(&self) -> Vec<&str> {
        CHART_KEYS
            .iter()
            .copied()
            .filter(|k| self.get(k).is_some())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterialProperties> {
        self.materials.iter()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl<'a> IntoIterator for &'a MaterialDatabase {
    type Item = &'a MaterialProperties;
    type IntoIter = std::slice::Iter<'a, MaterialProperties>;

    fn into_iter(self) -> Self::IntoIter {
        self.materials.iter()
    }
}
