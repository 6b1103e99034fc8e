//! Specimen cross-sections
//!
//! Every shape reduces to a cross-section area A and a wetted perimeter P. The
//! area floor lives here, in one place, so every downstream `1/A` is safe.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Smallest cross-section area handed to any model (m²)
pub const MIN_AREA_M2: f64 = 1e-15;

/// Cross-section shape with its dimensions in the units used on the bench
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum GeometrySpec {
    /// Rectangular strip
    Foil { thickness_um: f64, width_mm: f64 },
    /// Round wire
    Wire { diameter_um: f64 },
    /// Thin-walled tube; both inner and outer surfaces are wetted
    Tube {
        inner_diameter_mm: f64,
        wall_thickness_um: f64,
    },
}

impl GeometrySpec {
    /// Human-readable description ("100um x 6mm foil")
    pub fn describe(&self) -> String {
        match *self {
            GeometrySpec::Foil {
                thickness_um,
                width_mm,
            } => format!("{thickness_um}um x {width_mm}mm foil"),
            GeometrySpec::Wire { diameter_um } => format!("d{diameter_um}um wire"),
            GeometrySpec::Tube {
                inner_diameter_mm,
                wall_thickness_um,
            } => format!("ID{inner_diameter_mm}mm x {wall_thickness_um}um wall tube"),
        }
    }
}

/// A shape plus the free length between the current clips
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Specimen {
    pub shape: GeometrySpec,
    pub gauge_length_mm: f64,
}

impl Specimen {
    pub fn new(shape: GeometrySpec, gauge_length_mm: f64) -> Self {
        Self {
            shape,
            gauge_length_mm,
        }
    }

    /// 100 µm × 6 mm foil with a 20 mm gauge, the geometry of every reference run
    pub fn reference_foil() -> Self {
        Self::new(
            GeometrySpec::Foil {
                thickness_um: 100.0,
                width_mm: 6.0,
            },
            20.0,
        )
    }

    /// Gauge length (m)
    #[inline]
    pub fn gauge_length_m(&self) -> f64 {
        self.gauge_length_mm / 1000.0
    }

    /// Cross-section area (m²), floored at [`MIN_AREA_M2`]
    #[inline]
    pub fn area_m2(&self) -> f64 {
        area_and_perimeter(&self.shape).0
    }

    /// Cross-section area (mm²)
    #[inline]
    pub fn area_mm2(&self) -> f64 {
        self.area_m2() * 1e6
    }

    pub fn describe(&self) -> String {
        format!("{}, L={}mm", self.shape.describe(), self.gauge_length_mm)
    }
}

/// Cross-section area A (m²) and wetted perimeter P (m)
///
/// - Foil: A = t·w, P = 2(t + w)
/// - Wire: A = π/4·d², P = π·d
/// - Tube: OD = ID + 2·wall, A = π/4·(OD² − ID²), P = π·(OD + ID)
///
/// A is floored at [`MIN_AREA_M2`]; this never fails. P is positive only for
/// positive dimensions: a zero-size foil or wire has P = 0.
pub fn area_and_perimeter(spec: &GeometrySpec) -> (f64, f64) {
    let (area, perimeter) = match *spec {
        GeometrySpec::Foil {
            thickness_um,
            width_mm,
        } => {
            let t = thickness_um * 1e-6;
            let w = width_mm / 1000.0;
            (t * w, 2.0 * (t + w))
        }
        GeometrySpec::Wire { diameter_um } => {
            let d = diameter_um * 1e-6;
            (PI / 4.0 * d * d, PI * d)
        }
        GeometrySpec::Tube {
            inner_diameter_mm,
            wall_thickness_um,
        } => {
            let id = inner_diameter_mm / 1000.0;
            let od = id + 2.0 * wall_thickness_um * 1e-6;
            (PI / 4.0 * (od * od - id * id), PI * (od + id))
        }
    };
    (area.max(MIN_AREA_M2), perimeter)
}

/// Length scale for the natural-convection correlation and the Knudsen number (m)
///
/// Wires use their diameter and tubes their outer diameter. A foil is treated as
/// the cylinder with the same perimeter, D = P/π.
pub fn characteristic_diameter(spec: &GeometrySpec) -> f64 {
    match *spec {
        GeometrySpec::Foil { .. } => area_and_perimeter(spec).1 / PI,
        GeometrySpec::Wire { diameter_um } => diameter_um * 1e-6,
        GeometrySpec::Tube {
            inner_diameter_mm,
            wall_thickness_um,
        } => inner_diameter_mm / 1000.0 + 2.0 * wall_thickness_um * 1e-6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_foil_area_and_perimeter() {
        let (a, p) = area_and_perimeter(&GeometrySpec::Foil {
            thickness_um: 100.0,
            width_mm: 6.0,
        });
        assert_relative_eq!(a, 6e-7, max_relative = 1e-12);
        assert_relative_eq!(p, 0.0122, max_relative = 1e-12);
    }

    #[test]
    fn test_wire_area_and_perimeter() {
        let (a, p) = area_and_perimeter(&GeometrySpec::Wire { diameter_um: 250.0 });
        assert_relative_eq!(a, PI / 4.0 * 250e-6 * 250e-6, max_relative = 1e-12);
        assert_relative_eq!(p, PI * 250e-6, max_relative = 1e-12);
    }

    #[test]
    fn test_tube_is_annulus_with_both_surfaces_wetted() {
        let spec = GeometrySpec::Tube {
            inner_diameter_mm: 1.0,
            wall_thickness_um: 100.0,
        };
        let (a, p) = area_and_perimeter(&spec);
        let (id, od) = (1e-3, 1.2e-3);
        assert_relative_eq!(a, PI / 4.0 * (od * od - id * id), max_relative = 1e-12);
        assert_relative_eq!(p, PI * (od + id), max_relative = 1e-12);
        assert_relative_eq!(characteristic_diameter(&spec), od, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_area_is_floored() {
        let (a, p) = area_and_perimeter(&GeometrySpec::Foil {
            thickness_um: 0.0,
            width_mm: 6.0,
        });
        assert_eq!(a, MIN_AREA_M2);
        assert!(p > 0.0);

        let (a, _) = area_and_perimeter(&GeometrySpec::Tube {
            inner_diameter_mm: 2.0,
            wall_thickness_um: 0.0,
        });
        assert_eq!(a, MIN_AREA_M2);
    }

    #[test]
    fn test_specimen_unit_conversions() {
        let s = Specimen::reference_foil();
        assert_relative_eq!(s.area_mm2(), 0.6, max_relative = 1e-12);
        assert_relative_eq!(s.gauge_length_m(), 0.02, max_relative = 1e-12);
        assert_eq!(s.describe(), "100um x 6mm foil, L=20mm");
    }
}
