//! Core types: units, materials, geometry, gases and process settings

pub mod gas;
pub mod geometry;
pub mod material;
pub mod process;
pub mod units;

pub use gas::{GasMixture, GasSpecies, MixtureProperties};
pub use geometry::{
    area_and_perimeter, characteristic_diameter, GeometrySpec, Specimen, MIN_AREA_M2,
};
pub use material::{
    CalibrationReference, MaterialDatabase, MaterialProperties, CHART_KEYS, DEFAULT_EMISSIVITY,
};
pub use process::{Environment, GasAtmosphere, ProcessParameters};
pub use units::{Kelvin, KelvinDelta, Torr};
