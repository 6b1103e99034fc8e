//! Explicit transient Joule-heating integrator
//!
//! Forward-Euler march of a lumped specimen temperature under a linearly ramped
//! current:
//!
//! ```text
//! I(t)  = min(dI/dt · t, I_max)
//! ρ(T)  = ρ₀ + (ρₘ − ρ₀) · clamp((T − 300)/(Tₘ − 300), 0, 1)
//! dT/dt = ρ(T)·J² / (ρ_mass·Cp) − q_tot(h(T))·(T − 300) / (ρ_mass·Cp)
//! ```
//!
//! The cooling term is present only when a [`CoolingProfile`] is attached; h(T)
//! comes from its 25 K lookup table and q_tot from the fin + clip model at that h.
//! Because resistivity lags the current, the peak field seen during the ramp can
//! exceed the steady-state estimate.

use serde::{Deserialize, Serialize};

use crate::core_types::geometry::Specimen;
use crate::core_types::material::MaterialProperties;
use crate::core_types::units::Kelvin;

use super::fin_cooling::fin_cooling;
use super::gas_cooling::CoolingProfile;

/// Integrator time step (s)
pub const TIME_STEP_S: f64 = 0.002;

/// Step cap
pub const MAX_STEPS: usize = 10_000;

/// Simulated-time horizon (s)
pub const TIME_HORIZON_S: f64 = 20.0;

/// Smallest current ramp (A/s)
pub const MIN_CURRENT_RAMP: f64 = 0.01;

/// State at the step where the specimen reached its melting point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeltEvent {
    /// Simulated time (s)
    pub time_s: f64,
    /// Current (A)
    pub current_a: f64,
    /// Current density (A/mm²)
    pub current_density: f64,
}

/// Outcome of one transient run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransientResult {
    /// Highest instantaneous field (V/cm)
    pub e_peak: f64,
    /// `None` when the specimen did not melt within the horizon
    pub melt: Option<MeltEvent>,
    /// Current ramp actually applied (A/s)
    pub current_ramp: f64,
    /// Temperature when the run stopped
    pub final_temperature: Kelvin,
    /// Steps taken
    pub steps: usize,
}

impl TransientResult {
    pub fn melted(&self) -> bool {
        self.melt.is_some()
    }
}

/// Temperature-dependent resistivity used by the integrator (Ω·m)
#[inline]
pub fn resistivity_at(material: &MaterialProperties, temperature: Kelvin) -> f64 {
    let frac = ((*temperature - *Kelvin::AMBIENT) / material.melt_rise()).clamp(0.0, 1.0);
    material.resistivity_room + (material.resistivity_melt - material.resistivity_room) * frac
}

/// Run the transient for `specimen` ramped at `ramp_rate` (A/mm²/min) up to
/// `max_current` (A)
///
/// Pass `cooling = None` for an adiabatic run.
pub fn simulate_transient(
    material: &MaterialProperties,
    specimen: &Specimen,
    ramp_rate: f64,
    max_current: f64,
    cooling: Option<&CoolingProfile>,
) -> TransientResult {
    let area_m2 = specimen.area_m2();
    let area_mm2 = area_m2 * 1e6;
    let current_ramp = (ramp_rate * area_mm2 / 60.0).max(MIN_CURRENT_RAMP);
    let heat_capacity = material.volumetric_heat_capacity();
    let melt = material.melting_temperature();
    let ambient = *Kelvin::AMBIENT;

    let mut temperature = ambient;
    let mut e_peak: f64 = 0.0;
    let mut result_melt = None;
    let mut steps = 0;

    for step in 0..MAX_STEPS {
        steps = step + 1;
        let t = step as f64 * TIME_STEP_S;
        let current = (current_ramp * t).min(max_current);
        let j = current / area_m2;

        let rho = resistivity_at(material, Kelvin::new(temperature));
        // Ω·m × A/m² → V/m, / 100 → V/cm
        e_peak = e_peak.max(rho * j / 100.0);

        let heating = rho * j * j / heat_capacity;
        let cooling_rate = cooling.map_or(0.0, |profile| {
            let h = profile.lookup(Kelvin::new(temperature));
            fin_cooling(material, specimen, h).q_total * (temperature - ambient) / heat_capacity
        });

        temperature = (temperature + (heating - cooling_rate) * TIME_STEP_S).max(ambient);

        if temperature >= *melt {
            result_melt = Some(MeltEvent {
                time_s: t,
                current_a: current,
                current_density: j / 1e6,
            });
            break;
        }
        if t > TIME_HORIZON_S {
            break;
        }
    }

    TransientResult {
        e_peak,
        melt: result_melt,
        current_ramp,
        final_temperature: Kelvin::new(temperature),
        steps,
    }
}
