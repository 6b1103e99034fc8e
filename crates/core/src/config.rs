//! TOML scenarios and material tables
//!
//! A scenario names a material, a specimen and the process settings:
//!
//! ```toml
//! material = "Ti"
//!
//! [specimen]
//! gauge_length_mm = 20.0
//! shape = { shape = "foil", thickness_um = 100.0, width_mm = 6.0 }
//!
//! [process]
//! ramp_rate = 500.0
//! environment = { kind = "fixed", h = 8.0 }
//! ```
//!
//! Material tables are validated as they load so that an unphysical record never
//! reaches the solvers.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core_types::geometry::Specimen;
use crate::core_types::material::{MaterialDatabase, MaterialProperties};
use crate::core_types::process::ProcessParameters;
use crate::simulation::{evaluate, SimulationResult};

/// Failure to load or validate a configuration document
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid material '{key}': {reason}")]
    InvalidMaterial { key: String, reason: &'static str },

    #[error("Material '{0}' is defined more than once")]
    DuplicateMaterial(String),

    #[error("Unknown material '{0}'")]
    UnknownMaterial(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn read_file(path: &Path) -> ConfigResult<String> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// One material / specimen / process combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub material: String,
    pub specimen: Specimen,
    #[serde(default)]
    pub process: ProcessParameters,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::quick_start()
    }
}

impl Scenario {
    /// Titanium reference foil at 500 A/mm²/min with h = 8 W/(m²·K)
    pub fn quick_start() -> Self {
        Self {
            material: "Ti".to_string(),
            specimen: Specimen::reference_foil(),
            process: ProcessParameters::default(),
        }
    }

    /// Parse a scenario document
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed TOML or missing fields.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a scenario file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Scenario::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let scenario = Self::from_toml_str(&read_file(path)?)?;
        info!(
            "Loaded scenario from {}: {} {}",
            path.display(),
            scenario.material,
            scenario.specimen.describe()
        );
        Ok(scenario)
    }

    /// Serialize back to TOML
    ///
    /// # Errors
    /// Returns [`ConfigError::Serialize`] if the document cannot be rendered.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Evaluate this scenario against `db`
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownMaterial`] when the material key is not in `db`.
    pub fn evaluate(&self, db: &MaterialDatabase) -> ConfigResult<SimulationResult> {
        evaluate(db, &self.material, &self.specimen, &self.process)
            .ok_or_else(|| ConfigError::UnknownMaterial(self.material.clone()))
    }
}

impl MaterialDatabase {
    /// Parse and validate a material table
    ///
    /// The document holds a `[[materials]]` array and an optional `[emissivity]`
    /// table keyed by material.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed TOML and
    /// [`ConfigError::InvalidMaterial`] for the first record that fails
    /// [`MaterialProperties::check_physical`], or
    /// [`ConfigError::DuplicateMaterial`] when two records share a key.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let db: MaterialDatabase = toml::from_str(content)?;
        db.validate()?;
        Ok(db)
    }

    /// Read, parse and validate a material table file
    ///
    /// # Errors
    /// As [`MaterialDatabase::from_toml_str`], plus [`ConfigError::Io`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let db = Self::from_toml_str(&read_file(path)?)?;
        info!("Loaded {} materials from {}", db.len(), path.display());
        Ok(db)
    }

    /// Reject unphysical records and repeated keys
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidMaterial`] or
    /// [`ConfigError::DuplicateMaterial`] naming the first offending key.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = FxHashSet::default();
        self.iter().try_for_each(|m: &MaterialProperties| {
            if !seen.insert(m.key.as_str()) {
                return Err(ConfigError::DuplicateMaterial(m.key.clone()));
            }
            m.check_physical()
                .map_err(|reason| ConfigError::InvalidMaterial {
                    key: m.key.clone(),
                    reason,
                })
        })
    }
}
