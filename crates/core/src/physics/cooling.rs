//! Environment → cooling model resolution
//!
//! A fixed-h environment feeds h straight into the fin model and leaves the
//! transient integrator adiabatic. A gas environment builds a [`CoolingProfile`]
//! for the specimen: its h_avg drives the steady-state branch and its lookup
//! table drives the transient one.

use crate::core_types::geometry::{characteristic_diameter, Specimen};
use crate::core_types::material::{MaterialDatabase, MaterialProperties};
use crate::core_types::process::Environment;

use super::fin_cooling::{fin_cooling, FinCooling};
use super::gas_cooling::CoolingProfile;

/// Cooling resolved for one (material, specimen, environment) triple
#[derive(Debug, Clone, PartialEq)]
pub enum CoolingModel {
    Fixed { h: f64 },
    Profile(Box<CoolingProfile>),
}

impl CoolingModel {
    /// Resolve `environment` for `material` mounted as `specimen`
    ///
    /// Gas atmospheres take their emissivity override when present, otherwise the
    /// database value (which has its own default).
    pub fn resolve(
        db: &MaterialDatabase,
        material: &MaterialProperties,
        specimen: &Specimen,
        environment: &Environment,
    ) -> Self {
        match environment {
            Environment::Fixed { h } => CoolingModel::Fixed { h: h.max(0.0) },
            Environment::Gas(atmosphere) => {
                let emissivity = atmosphere
                    .emissivity
                    .unwrap_or_else(|| db.emissivity(&material.key));
                CoolingModel::Profile(Box::new(CoolingProfile::new(
                    atmosphere,
                    emissivity,
                    characteristic_diameter(&specimen.shape),
                    material.melting_temperature(),
                )))
            }
        }
    }

    /// Effective h for the steady-state balance (W/(m²·K))
    pub fn steady_h(&self) -> f64 {
        match self {
            CoolingModel::Fixed { h } => *h,
            CoolingModel::Profile(profile) => profile.h_avg(),
        }
    }

    /// Temperature-resolved profile for the transient integrator, if any
    pub fn profile(&self) -> Option<&CoolingProfile> {
        match self {
            CoolingModel::Fixed { .. } => None,
            CoolingModel::Profile(profile) => Some(profile.as_ref()),
        }
    }

    /// Fin + clip model at the steady-state h
    pub fn steady_fin(&self, material: &MaterialProperties, specimen: &Specimen) -> FinCooling {
        fin_cooling(material, specimen, self.steady_h())
    }
}
