//! Gas-dependent natural convection and radiation
//!
//! Convective coefficient from the Churchill–Chu horizontal-cylinder correlation,
//! evaluated with mixture properties at the film temperature and corrected for
//! rarefaction through the Knudsen number:
//!
//! | Kn            | Regime          | Treatment                         |
//! |---------------|-----------------|-----------------------------------|
//! | Kn ≤ 0.01     | continuum       | Churchill–Chu as is               |
//! | 0.01 < Kn ≤ 0.1 | slip          | k_eff = k / (1 + 2·Kn)            |
//! | Kn > 0.1      | free molecular  | h_conv = 0                        |
//!
//! Radiation uses the linearized Stefan–Boltzmann coefficient
//! h_rad = ε·σ·(T_s² + T_w²)·(T_s + T_w).
//!
//! # References
//! - Churchill, S.W. & Chu, H.H.S. (1975). "Correlating equations for laminar and
//!   turbulent free convection from a horizontal cylinder", Int. J. Heat Mass
//!   Transfer, 18(9), 1049-1053
//! - Springer, G.S. (1971). "Heat transfer in rarefied gases", Adv. Heat Transfer 7

use std::f64::consts::{PI, SQRT_2};

use serde::{Deserialize, Serialize};

use crate::core_types::gas::GasMixture;
use crate::core_types::process::GasAtmosphere;
use crate::core_types::units::{Kelvin, Torr};

/// Stefan-Boltzmann constant (W/(m²·K⁴))
pub const STEFAN_BOLTZMANN: f64 = 5.670_374e-8;

/// Boltzmann constant (J/K)
pub const BOLTZMANN: f64 = 1.380_649e-23;

/// Standard gravity (m/s²)
const GRAVITY: f64 = 9.806_65;

/// Chamber wall temperature
pub const WALL_TEMPERATURE: Kelvin = Kelvin::AMBIENT;

/// Pressure floor applied before the mean-free-path formula (Pa)
pub const MIN_PRESSURE_PA: f64 = 1e-4;

/// Upper Knudsen bound of the continuum regime
pub const KN_CONTINUUM_MAX: f64 = 0.01;

/// Upper Knudsen bound of the slip regime; above it convection is dropped
pub const KN_SLIP_MAX: f64 = 0.1;

/// Below this Rayleigh number the correlation is replaced by the conduction limit
const MIN_RAYLEIGH: f64 = 1.0;

/// Conduction-limit Nusselt number used below [`MIN_RAYLEIGH`]
const CONDUCTION_NUSSELT: f64 = 2.0;

/// Temperature step of the h_avg trapezoid (K)
pub const AVERAGING_STEP_K: f64 = 50.0;

/// Temperature spacing of the transient lookup table (K)
pub const LOOKUP_STEP_K: f64 = 25.0;

/// Gas flow regime selected by the Knudsen number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GasRegime {
    Continuum,
    Slip,
    FreeMolecular,
}

impl GasRegime {
    pub fn from_knudsen(kn: f64) -> Self {
        if kn > KN_SLIP_MAX {
            GasRegime::FreeMolecular
        } else if kn > KN_CONTINUUM_MAX {
            GasRegime::Slip
        } else {
            GasRegime::Continuum
        }
    }
}

/// Intermediate values of one convection evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvectionState {
    pub h_conv: f64,
    pub knudsen: f64,
    pub rayleigh: f64,
    pub nusselt: f64,
    pub regime: GasRegime,
}

impl ConvectionState {
    fn inactive() -> Self {
        Self {
            h_conv: 0.0,
            knudsen: 0.0,
            rayleigh: 0.0,
            nusselt: 0.0,
            regime: GasRegime::Continuum,
        }
    }
}

/// Kinetic-theory mean free path λ = k_B·T / (√2·π·d²·p) (m)
///
/// `pressure_pa` is floored at [`MIN_PRESSURE_PA`].
pub fn mean_free_path(diameter: f64, temperature: Kelvin, pressure_pa: f64) -> f64 {
    let p = pressure_pa.max(MIN_PRESSURE_PA);
    BOLTZMANN * *temperature / (SQRT_2 * PI * diameter * diameter * p)
}

/// Knudsen number of the gas around a body of size `length` (m)
pub fn knudsen_number(
    mixture: &GasMixture,
    pressure: Torr,
    temperature: Kelvin,
    length: f64,
) -> f64 {
    let props = mixture.properties_at(temperature);
    mean_free_path(props.diameter, temperature, pressure.to_pascals()) / length
}

/// Churchill–Chu Nusselt number for a horizontal cylinder
///
/// Nu = {0.60 + 0.387·[Ra·f(Pr)]^(1/6)}², f(Pr) = [1 + (0.559/Pr)^(9/16)]^(-16/9).
/// Ra < 1 returns the conduction limit Nu = 2.
pub fn churchill_chu_nusselt(rayleigh: f64, prandtl: f64) -> f64 {
    if rayleigh < MIN_RAYLEIGH {
        return CONDUCTION_NUSSELT;
    }
    let f_pr = (1.0 + (0.559 / prandtl).powf(9.0 / 16.0)).powf(-16.0 / 9.0);
    let root = 0.60 + 0.387 * (rayleigh * f_pr).powf(1.0 / 6.0);
    root * root
}

/// Natural-convection coefficient of a cylinder of diameter `diameter` (m) at
/// surface temperature `surface`
pub fn convection_state(
    atmosphere: &GasAtmosphere,
    surface: Kelvin,
    diameter: f64,
) -> ConvectionState {
    let delta_t = *(surface - WALL_TEMPERATURE);
    if delta_t <= 0.0 || diameter <= 0.0 {
        return ConvectionState::inactive();
    }

    let film = surface.midpoint(WALL_TEMPERATURE);
    let props = atmosphere.mixture.properties_at(film);
    let pressure_pa = atmosphere.pressure.to_pascals().max(MIN_PRESSURE_PA);

    let knudsen = knudsen_number(&atmosphere.mixture, atmosphere.pressure, film, diameter);
    let regime = GasRegime::from_knudsen(knudsen);

    let rho = props.density(pressure_pa, film);
    let nu = props.viscosity / rho;
    let alpha = props.conductivity / (rho * props.cp);
    let beta = 1.0 / *film;
    let rayleigh = GRAVITY * beta * delta_t * diameter.powi(3) / (nu * alpha);
    let nusselt = churchill_chu_nusselt(rayleigh, props.prandtl());

    let k_eff = match regime {
        GasRegime::Continuum => props.conductivity,
        GasRegime::Slip => props.conductivity / (1.0 + 2.0 * knudsen),
        GasRegime::FreeMolecular => 0.0,
    };

    ConvectionState {
        h_conv: nusselt * k_eff / diameter,
        knudsen,
        rayleigh,
        nusselt,
        regime,
    }
}

/// Linearized radiative coefficient ε·σ·(T_s² + T_w²)·(T_s + T_w) (W/(m²·K))
///
/// Zero when the surface is not hotter than the wall.
pub fn radiation_coefficient(emissivity: f64, surface: Kelvin) -> f64 {
    if surface <= WALL_TEMPERATURE {
        return 0.0;
    }
    let ts = *surface;
    let tw = *WALL_TEMPERATURE;
    emissivity * STEFAN_BOLTZMANN * (ts * ts + tw * tw) * (ts + tw)
}

/// Convective, radiative and total h at one surface temperature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatTransferCoefficients {
    pub h_conv: f64,
    pub h_rad: f64,
    pub h_total: f64,
}

/// Temperature-resolved cooling of one specimen in one atmosphere
///
/// Holds the 25 K lookup table consumed by the transient integrator and the
/// 300 K → Tₘ average consumed by the steady-state branch.
#[derive(Debug, Clone, PartialEq)]
pub struct CoolingProfile {
    atmosphere: GasAtmosphere,
    emissivity: f64,
    diameter: f64,
    /// (T, h_total) samples every [`LOOKUP_STEP_K`], ending exactly at the melting point
    table: Vec<(f64, f64)>,
    h_avg: f64,
}

impl CoolingProfile {
    /// Build the profile between the wall temperature and `melting_point`
    pub fn new(
        atmosphere: &GasAtmosphere,
        emissivity: f64,
        diameter: f64,
        melting_point: Kelvin,
    ) -> Self {
        let mut profile = Self {
            atmosphere: atmosphere.clone(),
            emissivity,
            diameter,
            table: Vec::new(),
            h_avg: 0.0,
        };

        let t_wall = *WALL_TEMPERATURE;
        let t_melt = (*melting_point).max(t_wall);

        let mut table = Vec::new();
        for t in temperature_grid(t_wall, t_melt, LOOKUP_STEP_K) {
            table.push((t, profile.h_total(Kelvin::new(t))));
        }
        profile.table = table;

        // Trapezoid over 50 K steps; the last step is truncated at Tₘ
        let span = t_melt - t_wall;
        if span > 0.0 {
            let grid: Vec<f64> = temperature_grid(t_wall, t_melt, AVERAGING_STEP_K).collect();
            let integral: f64 = grid
                .windows(2)
                .map(|w| {
                    let h0 = profile.h_total(Kelvin::new(w[0]));
                    let h1 = profile.h_total(Kelvin::new(w[1]));
                    0.5 * (h0 + h1) * (w[1] - w[0])
                })
                .sum();
            profile.h_avg = integral / span;
        }

        profile
    }

    /// Convective and radiative coefficients evaluated directly at `surface`
    pub fn coefficients(&self, surface: Kelvin) -> HeatTransferCoefficients {
        let h_conv = convection_state(&self.atmosphere, surface, self.diameter).h_conv;
        let h_rad = radiation_coefficient(self.emissivity, surface);
        HeatTransferCoefficients {
            h_conv,
            h_rad,
            h_total: h_conv + h_rad,
        }
    }

    /// h_conv + h_rad evaluated directly at `surface`
    pub fn h_total(&self, surface: Kelvin) -> f64 {
        self.coefficients(surface).h_total
    }

    /// Temperature-averaged h over wall → melt (W/(m²·K))
    pub fn h_avg(&self) -> f64 {
        self.h_avg
    }

    /// h_total linearly interpolated from the lookup table, clamped at both ends
    pub fn lookup(&self, surface: Kelvin) -> f64 {
        let t = *surface;
        let Some(&(t_first, h_first)) = self.table.first() else {
            return 0.0;
        };
        if t <= t_first {
            return h_first;
        }
        let idx = self.table.partition_point(|&(ti, _)| ti <= t);
        if idx >= self.table.len() {
            return self.table[self.table.len() - 1].1;
        }
        let (t0, h0) = self.table[idx - 1];
        let (t1, h1) = self.table[idx];
        h0 + (h1 - h0) * (t - t0) / (t1 - t0)
    }

    /// The (T, h_total) lookup samples
    pub fn table(&self) -> &[(f64, f64)] {
        &self.table
    }

    pub fn emissivity(&self) -> f64 {
        self.emissivity
    }
}

/// `start, start+step, ...` strictly below `end`, then `end` itself
fn temperature_grid(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let full_steps = ((end - start) / step).ceil().max(0.0) as usize;
    (0..full_steps)
        .map(move |i| start + step * i as f64)
        .filter(move |&t| t < end)
        .chain(std::iter::once(end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn argon(torr: f64) -> GasAtmosphere {
        GasAtmosphere::new(GasMixture::argon(), Torr::new(torr))
    }

    #[test]
    fn test_no_heat_flow_at_or_below_wall_temperature() {
        let atm = argon(760.0);
        let state = convection_state(&atm, Kelvin::new(300.0), 4e-3);
        assert_eq!(state.h_conv, 0.0);
        assert_eq!(radiation_coefficient(0.5, Kelvin::new(300.0)), 0.0);
        assert_eq!(radiation_coefficient(0.5, Kelvin::new(250.0)), 0.0);
    }

    #[test]
    fn test_atmospheric_argon_is_continuum() {
        let state = convection_state(&argon(760.0), Kelvin::new(600.0), 3.9e-3);
        assert_eq!(state.regime, GasRegime::Continuum);
        assert!(state.knudsen < 1e-3);
        // Stagnant argon around a mm-scale body: h ≈ 5-20 W/(m²·K)
        assert!(state.h_conv > 5.0 && state.h_conv < 25.0, "h = {}", state.h_conv);
    }

    #[test]
    fn test_continuum_matches_plain_churchill_chu() {
        let atm = argon(760.0);
        let surface = Kelvin::new(900.0);
        let d = 2e-3;
        let state = convection_state(&atm, surface, d);
        assert!(state.knudsen <= KN_CONTINUUM_MAX);

        let film = surface.midpoint(WALL_TEMPERATURE);
        let props = atm.mixture.properties_at(film);
        let expected =
            churchill_chu_nusselt(state.rayleigh, props.prandtl()) * props.conductivity / d;
        assert_relative_eq!(state.h_conv, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_free_molecular_regime_drops_convection() {
        // 25 µm wire at 10 Torr: mean free path ~10 µm
        let state = convection_state(&argon(10.0), Kelvin::new(800.0), 25e-6);
        assert!(state.knudsen > KN_SLIP_MAX, "Kn = {}", state.knudsen);
        assert_eq!(state.regime, GasRegime::FreeMolecular);
        assert_eq!(state.h_conv, 0.0);
    }

    #[test]
    fn test_slip_regime_derates_conductivity() {
        let atm = argon(1.0);
        let surface = Kelvin::new(700.0);
        let d = 3.9e-3;
        let state = convection_state(&atm, surface, d);
        assert_eq!(state.regime, GasRegime::Slip);

        let props = atm.mixture.properties_at(surface.midpoint(WALL_TEMPERATURE));
        let undamped = state.nusselt * props.conductivity / d;
        assert_relative_eq!(
            state.h_conv,
            undamped / (1.0 + 2.0 * state.knudsen),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_low_rayleigh_uses_conduction_limit() {
        assert_eq!(churchill_chu_nusselt(0.5, 0.67), 2.0);
        assert!(churchill_chu_nusselt(1e4, 0.67) > 2.0);
    }

    #[test]
    fn test_pressure_floor_keeps_mean_free_path_finite() {
        let mfp = mean_free_path(3.4e-10, Kelvin::AMBIENT, 0.0);
        assert!(mfp.is_finite() && mfp > 0.0);
        assert_eq!(mfp, mean_free_path(3.4e-10, Kelvin::AMBIENT, MIN_PRESSURE_PA));
    }

    #[test]
    fn test_radiation_coefficient_value() {
        // ε=1 at 1000 K: σ·(1000² + 300²)·1300 ≈ 80.3 W/(m²·K)
        let h = radiation_coefficient(1.0, Kelvin::new(1000.0));
        assert_relative_eq!(h, 80.3, max_relative = 2e-3);
    }

    #[test]
    fn test_profile_lookup_interpolates_table() {
        let profile = CoolingProfile::new(&argon(760.0), 0.4, 3.9e-3, Kelvin::new(933.0));
        let table = profile.table();
        assert_eq!(table.first().map(|s| s.0), Some(300.0));
        assert_eq!(table.last().map(|s| s.0), Some(933.0));
        assert!(table.windows(2).all(|w| (w[1].0 - w[0].0) <= LOOKUP_STEP_K + 1e-9));

        // Exact at nodes, between neighbours elsewhere
        assert_relative_eq!(
            profile.lookup(Kelvin::new(600.0)),
            profile.h_total(Kelvin::new(600.0))
        );
        let mid = profile.lookup(Kelvin::new(612.5));
        let (lo, hi) = (
            profile.lookup(Kelvin::new(600.0)),
            profile.lookup(Kelvin::new(625.0)),
        );
        assert!(mid >= lo.min(hi) && mid <= lo.max(hi));

        // Clamped past the melting point
        assert_eq!(profile.lookup(Kelvin::new(2000.0)), table[table.len() - 1].1);
    }

    #[test]
    fn test_h_avg_between_extremes() {
        let profile = CoolingProfile::new(&argon(760.0), 0.47, 3.9e-3, Kelvin::new(1941.0));
        let h_melt = profile.h_total(Kelvin::new(1941.0));
        assert!(profile.h_avg() > 0.0);
        assert!(profile.h_avg() < h_melt);
    }

    #[test]
    fn test_vacuum_leaves_only_radiation() {
        let profile = CoolingProfile::new(&argon(1e-5), 0.3, 3.9e-3, Kelvin::new(1500.0));
        let c = profile.coefficients(Kelvin::new(1200.0));
        assert_eq!(c.h_conv, 0.0);
        assert_relative_eq!(c.h_total, radiation_coefficient(0.3, Kelvin::new(1200.0)));
    }
}
