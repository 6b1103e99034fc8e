//! Chamber gas species and mixtures
//!
//! Transport properties use linear-in-temperature fits over 300-1500 K:
//! k(T) = k₀ + k₁·T and μ(T) = μ₀ + μ₁·T. Mixture rules are deliberately simple
//! (mole-fraction weighting), which is adequate for the dilute, mostly-inert
//! atmospheres used on the bench.
//!
//! # References
//! - Incropera & DeWitt, "Fundamentals of Heat and Mass Transfer", Table A.4
//! - Hirschfelder, Curtiss & Bird (1954) - kinetic diameters

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::units::Kelvin;

/// Universal gas constant (J/(mol·K))
pub const GAS_CONSTANT: f64 = 8.314_462;

/// Gas species available in a chamber atmosphere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GasSpecies {
    Argon,
    Helium,
    Nitrogen,
    Hydrogen,
    Oxygen,
}

/// Per-species constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesProperties {
    /// Thermal conductivity intercept (W/(m·K))
    pub k0: f64,
    /// Thermal conductivity slope (W/(m·K²))
    pub k1: f64,
    /// Dynamic viscosity intercept (Pa·s)
    pub mu0: f64,
    /// Dynamic viscosity slope (Pa·s/K)
    pub mu1: f64,
    /// Molar mass (kg/mol)
    pub molar_mass: f64,
    /// Isobaric specific heat (J/(kg·K))
    pub cp: f64,
    /// Kinetic (hard-sphere) diameter (m)
    pub diameter: f64,
}

impl GasSpecies {
    pub fn properties(self) -> SpeciesProperties {
        match self {
            GasSpecies::Argon => SpeciesProperties {
                k0: 6.99e-3,
                k1: 3.57e-5,
                mu0: 8.87e-6,
                mu1: 4.61e-8,
                molar_mass: 39.948e-3,
                cp: 520.3,
                diameter: 3.40e-10,
            },
            GasSpecies::Helium => SpeciesProperties {
                k0: 6.98e-2,
                k1: 2.84e-4,
                mu0: 9.31e-6,
                mu1: 3.53e-8,
                molar_mass: 4.0026e-3,
                cp: 5193.0,
                diameter: 2.60e-10,
            },
            GasSpecies::Nitrogen => SpeciesProperties {
                k0: 9.28e-3,
                k1: 5.54e-5,
                mu0: 7.66e-6,
                mu1: 3.41e-8,
                molar_mass: 28.013e-3,
                cp: 1040.0,
                diameter: 3.64e-10,
            },
            GasSpecies::Hydrogen => SpeciesProperties {
                k0: 7.53e-2,
                k1: 3.59e-4,
                mu0: 4.22e-6,
                mu1: 1.58e-8,
                molar_mass: 2.016e-3,
                cp: 14310.0,
                diameter: 2.89e-10,
            },
            GasSpecies::Oxygen => SpeciesProperties {
                k0: 7.71e-3,
                k1: 6.33e-5,
                mu0: 8.58e-6,
                mu1: 4.04e-8,
                molar_mass: 31.999e-3,
                cp: 918.0,
                diameter: 3.46e-10,
            },
        }
    }
}

/// Mixture properties evaluated at one temperature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixtureProperties {
    /// Thermal conductivity (W/(m·K))
    pub conductivity: f64,
    /// Dynamic viscosity (Pa·s)
    pub viscosity: f64,
    /// Molar mass (kg/mol)
    pub molar_mass: f64,
    /// Isobaric specific heat, mass-weighted (J/(kg·K))
    pub cp: f64,
    /// Mole-weighted kinetic diameter (m)
    pub diameter: f64,
}

impl MixtureProperties {
    /// Prandtl number μ·cp/k
    #[inline]
    pub fn prandtl(&self) -> f64 {
        self.viscosity * self.cp / self.conductivity
    }

    /// Ideal-gas density at `pressure_pa` and `temperature` (kg/m³)
    #[inline]
    pub fn density(&self, pressure_pa: f64, temperature: Kelvin) -> f64 {
        pressure_pa * self.molar_mass / (GAS_CONSTANT * *temperature)
    }
}

/// Named gas mixture with mole fractions
///
/// Deserialized mixtures go through the same normalization as
/// [`GasMixture::new`]; a document whose fractions do not add up to a positive
/// total is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MixtureDocument")]
pub struct GasMixture {
    pub name: String,
    pub components: Vec<(GasSpecies, f64)>,
}

/// On-disk form of a mixture, before normalization
#[derive(Deserialize)]
struct MixtureDocument {
    name: String,
    components: Vec<(GasSpecies, f64)>,
}

impl TryFrom<MixtureDocument> for GasMixture {
    type Error = String;

    fn try_from(doc: MixtureDocument) -> Result<Self, Self::Error> {
        if doc.components.iter().any(|(_, x)| !x.is_finite() || *x < 0.0) {
            return Err(format!(
                "gas mixture '{}' has a negative or non-finite mole fraction",
                doc.name
            ));
        }
        let total: f64 = doc.components.iter().map(|(_, x)| x).sum();
        if total <= 0.0 {
            return Err(format!(
                "gas mixture '{}' needs at least one component with a positive fraction",
                doc.name
            ));
        }
        Ok(Self::new(&doc.name, doc.components))
    }
}

impl Default for GasMixture {
    fn default() -> Self {
        Self::argon()
    }
}

impl GasMixture {
    /// Build a mixture; fractions are renormalized to sum to one
    pub fn new(name: &str, components: Vec<(GasSpecies, f64)>) -> Self {
        let total: f64 = components.iter().map(|(_, x)| x.max(0.0)).sum();
        let components = if total > 0.0 {
            components
                .into_iter()
                .map(|(s, x)| (s, x.max(0.0) / total))
                .collect()
        } else {
            vec![(GasSpecies::Argon, 1.0)]
        };
        Self {
            name: name.to_string(),
            components,
        }
    }

    /// 99.999% argon, the standard flash atmosphere
    pub fn argon() -> Self {
        Self::new("argon", vec![(GasSpecies::Argon, 1.0)])
    }

    pub fn helium() -> Self {
        Self::new("helium", vec![(GasSpecies::Helium, 1.0)])
    }

    pub fn nitrogen() -> Self {
        Self::new("nitrogen", vec![(GasSpecies::Nitrogen, 1.0)])
    }

    /// Dry air (79% N₂ / 21% O₂)
    pub fn air() -> Self {
        Self::new(
            "air",
            vec![(GasSpecies::Nitrogen, 0.79), (GasSpecies::Oxygen, 0.21)],
        )
    }

    /// Forming gas (95% Ar / 5% H₂)
    pub fn forming_gas() -> Self {
        Self::new(
            "forming_gas",
            vec![(GasSpecies::Argon, 0.95), (GasSpecies::Hydrogen, 0.05)],
        )
    }

    /// Look up a preset by name; unknown names fall back to argon
    pub fn named(name: &str) -> Self {
        match name.to_lowercase().replace(['-', ' '], "_").as_str() {
            "argon" | "ar" => Self::argon(),
            "helium" | "he" => Self::helium(),
            "nitrogen" | "n2" => Self::nitrogen(),
            "air" => Self::air(),
            "forming_gas" | "forming" | "ar_h2" => Self::forming_gas(),
            _ => {
                warn!("Unknown gas mixture '{}', substituting argon", name);
                Self::argon()
            }
        }
    }

    /// Mixture transport properties at `temperature`
    ///
    /// k, μ, M and the kinetic diameter are mole-fraction weighted; cp is
    /// mass-weighted so that ρ·cp stays consistent with the mixture molar mass.
    pub fn properties_at(&self, temperature: Kelvin) -> MixtureProperties {
        let t = *temperature;
        let mut conductivity = 0.0;
        let mut viscosity = 0.0;
        let mut molar_mass = 0.0;
        let mut cp_mass = 0.0;
        let mut diameter = 0.0;

        for &(species, x) in &self.components {
            let p = species.properties();
            conductivity += x * (p.k0 + p.k1 * t);
            viscosity += x * (p.mu0 + p.mu1 * t);
            molar_mass += x * p.molar_mass;
            cp_mass += x * p.molar_mass * p.cp;
            diameter += x * p.diameter;
        }

        MixtureProperties {
            conductivity,
            viscosity,
            molar_mass,
            cp: cp_mass / molar_mass,
            diameter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_argon_room_temperature_properties() {
        let props = GasMixture::argon().properties_at(Kelvin::AMBIENT);
        // Incropera Table A.4: k = 0.0177 W/(m·K), μ = 22.7 µPa·s at 300 K
        assert_relative_eq!(props.conductivity, 0.0177, max_relative = 0.02);
        assert_relative_eq!(props.viscosity, 2.27e-5, max_relative = 0.02);
        // Monatomic gas Pr ≈ 2/3
        assert_relative_eq!(props.prandtl(), 0.667, max_relative = 0.05);
    }

    #[test]
    fn test_argon_density_at_one_atmosphere() {
        let props = GasMixture::argon().properties_at(Kelvin::AMBIENT);
        let rho = props.density(101_325.0, Kelvin::AMBIENT);
        assert_relative_eq!(rho, 1.62, max_relative = 0.01);
    }

    #[test]
    fn test_helium_conducts_better_than_argon() {
        let t = Kelvin::new(800.0);
        let ar = GasMixture::argon().properties_at(t);
        let he = GasMixture::helium().properties_at(t);
        assert!(he.conductivity > 5.0 * ar.conductivity);
    }

    #[test]
    fn test_forming_gas_weighting() {
        let fg = GasMixture::forming_gas();
        let props = fg.properties_at(Kelvin::AMBIENT);
        let expected_m = 0.95 * 39.948e-3 + 0.05 * 2.016e-3;
        assert_relative_eq!(props.molar_mass, expected_m, max_relative = 1e-12);
        let sum: f64 = fg.components.iter().map(|(_, x)| x).sum();
        assert_relative_eq!(sum, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_unknown_mixture_falls_back_to_argon() {
        assert_eq!(GasMixture::named("xenon-krypton"), GasMixture::argon());
        assert_eq!(GasMixture::named("Forming-Gas"), GasMixture::forming_gas());
    }

    #[test]
    fn test_fractions_are_normalized() {
        let mix = GasMixture::new(
            "test",
            vec![(GasSpecies::Argon, 3.0), (GasSpecies::Helium, 1.0)],
        );
        assert_relative_eq!(mix.components[0].1, 0.75, max_relative = 1e-12);
        assert_relative_eq!(mix.components[1].1, 0.25, max_relative = 1e-12);
    }

    #[test]
    fn test_deserialized_fractions_are_normalized() {
        let doc = MixtureDocument {
            name: "argon".to_string(),
            components: vec![(GasSpecies::Argon, 2.0)],
        };
        let mix = GasMixture::try_from(doc).expect("positive fractions");
        assert_eq!(mix, GasMixture::argon());
    }

    #[test]
    fn test_deserialized_mixture_without_gas_is_rejected() {
        let empty = MixtureDocument {
            name: "nothing".to_string(),
            components: Vec::new(),
        };
        assert!(GasMixture::try_from(empty).is_err());

        let negative = MixtureDocument {
            name: "odd".to_string(),
            components: vec![(GasSpecies::Argon, 1.0), (GasSpecies::Helium, -0.5)],
        };
        assert!(GasMixture::try_from(negative).is_err());
    }
}
