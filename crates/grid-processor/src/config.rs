//! Configuration for binning and gap filling.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::binning::Statistic;
use crate::error::{GridProcessorError, Result};

/// Top-level configuration shared by the geotoolz processing steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeoToolzConfig {
    /// Statistic used when binning onto a grid.
    pub statistic: Statistic,

    /// Gauss-Seidel gap filling parameters.
    pub fill: FillConfig,

    /// Directory with Natural Earth GeoJSON boundary files.
    pub natural_earth_dir: Option<PathBuf>,
}

impl GeoToolzConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GEOTOOLZ_STATISTIC") {
            config.statistic = val.parse()?;
        }

        if let Ok(val) = std::env::var("GEOTOOLZ_FILL_EPSILON") {
            config.fill.epsilon = val.parse().map_err(|_| {
                GridProcessorError::config_error(format!("GEOTOOLZ_FILL_EPSILON: invalid number '{}'", val))
            })?;
        }

        if let Ok(val) = std::env::var("GEOTOOLZ_FILL_MAX_ITERATIONS") {
            let iterations = val.parse().map_err(|_| {
                GridProcessorError::config_error(format!(
                    "GEOTOOLZ_FILL_MAX_ITERATIONS: invalid integer '{}'",
                    val
                ))
            })?;
            config.fill.max_iterations = Some(iterations);
        }

        if let Ok(val) = std::env::var("GEOTOOLZ_FILL_RELAXATION") {
            let relaxation = val.parse().map_err(|_| {
                GridProcessorError::config_error(format!(
                    "GEOTOOLZ_FILL_RELAXATION: invalid number '{}'",
                    val
                ))
            })?;
            config.fill.relaxation = Some(relaxation);
        }

        if let Some(dir) = std::env::var_os("GEOTOOLZ_NATURAL_EARTH_DIR") {
            config.natural_earth_dir = Some(PathBuf::from(dir));
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.fill.validate()
    }
}

/// Initial values given to missing cells before relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FirstGuess {
    /// Mean of the defined values along each latitude row.
    #[default]
    ZonalAverage,
    Zero,
}

/// Parameters of the Gauss-Seidel NaN fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    /// Iteration cap. `None` means `nx * ny`.
    pub max_iterations: Option<usize>,

    /// Stop once the largest residual drops below this value.
    pub epsilon: f64,

    /// Over-relaxation factor in (0, 2). `None` means the optimal factor for the grid size.
    pub relaxation: Option<f64>,

    pub first_guess: FirstGuess,

    /// Treat longitude as periodic.
    pub is_circle: bool,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            max_iterations: None,
            epsilon: 1e-4,
            relaxation: None,
            first_guess: FirstGuess::ZonalAverage,
            is_circle: true,
        }
    }
}

impl FillConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon > 0.0) {
            return Err(GridProcessorError::config_error("fill.epsilon must be > 0"));
        }
        if self.max_iterations == Some(0) {
            return Err(GridProcessorError::config_error(
                "fill.max_iterations must be > 0",
            ));
        }
        if let Some(r) = self.relaxation {
            if !(r > 0.0 && r < 2.0) {
                return Err(GridProcessorError::config_error(
                    "fill.relaxation must be in (0, 2)",
                ));
            }
        }
        Ok(())
    }
}
