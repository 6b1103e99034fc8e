//! Operating conditions of a current-ramp run

use serde::{Deserialize, Serialize};

use super::gas::GasMixture;
use super::units::Torr;

/// Gas-filled chamber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasAtmosphere {
    pub mixture: GasMixture,
    pub pressure: Torr,
    /// Overrides the material's tabulated emissivity when set
    #[serde(default)]
    pub emissivity: Option<f64>,
}

impl GasAtmosphere {
    pub fn new(mixture: GasMixture, pressure: Torr) -> Self {
        Self {
            mixture,
            pressure,
            emissivity: None,
        }
    }

    /// Stagnant argon at one atmosphere
    pub fn argon_atmospheric() -> Self {
        Self::new(GasMixture::argon(), Torr::ATMOSPHERE)
    }

    pub fn with_emissivity(mut self, emissivity: f64) -> Self {
        self.emissivity = Some(emissivity);
        self
    }
}

/// How the specimen sheds heat to its surroundings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Environment {
    /// Fixed convective coefficient h (W/(m²·K)); no radiation term
    Fixed { h: f64 },
    /// Temperature- and pressure-dependent convection plus radiation
    Gas(GasAtmosphere),
}

impl Default for Environment {
    /// Stagnant inert gas, h = 8 W/(m²·K)
    fn default() -> Self {
        Environment::Fixed { h: 8.0 }
    }
}

/// Ramp and supply settings
///
/// Missing fields deserialize to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessParameters {
    /// Current density ramp rate (A/mm²/min)
    pub ramp_rate: f64,
    /// Supply current limit (A)
    pub max_current: f64,
    /// Voltage-offset calibration term (mV), diagnostic only
    pub voltage_offset_mv: f64,
    pub environment: Environment,
}

impl Default for ProcessParameters {
    fn default() -> Self {
        Self {
            ramp_rate: 500.0,
            max_current: 100.0,
            voltage_offset_mv: 10.0,
            environment: Environment::default(),
        }
    }
}

impl ProcessParameters {
    /// Ramp rate in A/mm²/s
    #[inline]
    pub fn ramp_rate_per_second(&self) -> f64 {
        self.ramp_rate / 60.0
    }

    pub fn with_ramp_rate(mut self, ramp_rate: f64) -> Self {
        self.ramp_rate = ramp_rate;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }
}
