//! Binning and gap filling driven by a [`GeoToolzConfig`].

use geo_common::{DataArray, Dataset};
use tracing::debug;

use crate::config::GeoToolzConfig;
use crate::error::Result;
use crate::fill::fillnan_gauss_seidel;
use crate::grid::{RegularLonLat, RegularLonLatTime};
use crate::regrid::{da_binning_2d, da_binning_2d_time, ds_binning_2d_time};

/// Runs the grid operations with the configured statistic and fill parameters.
#[derive(Debug, Clone, Default)]
pub struct GridProcessor {
    config: GeoToolzConfig,
}

impl GridProcessor {
    /// Create a processor from a validated configuration.
    pub fn new(config: GeoToolzConfig) -> Result<Self> {
        config.validate()?;
        debug!(statistic = %config.statistic, "Created grid processor");
        Ok(Self { config })
    }

    /// Processor configured from `GEOTOOLZ_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(GeoToolzConfig::from_env()?)
    }

    pub fn config(&self) -> &GeoToolzConfig {
        &self.config
    }

    /// [`da_binning_2d`] with the configured statistic.
    pub fn bin(&self, da: &DataArray, grid: &RegularLonLat) -> Result<DataArray> {
        da_binning_2d(da, grid, self.config.statistic)
    }

    /// [`da_binning_2d_time`] with the configured statistic.
    pub fn bin_time(&self, da: &DataArray, grid: &RegularLonLatTime) -> Result<DataArray> {
        da_binning_2d_time(da, grid, self.config.statistic)
    }

    /// [`ds_binning_2d_time`] with the configured statistic.
    pub fn bin_dataset_time(
        &self,
        ds: &Dataset,
        grid: &RegularLonLatTime,
        data_vars: Option<&[&str]>,
    ) -> Result<Dataset> {
        ds_binning_2d_time(ds, grid, self.config.statistic, data_vars)
    }

    /// [`fillnan_gauss_seidel`] with the configured fill parameters.
    pub fn fill(&self, ds: &Dataset, variable: &str) -> Result<Dataset> {
        fillnan_gauss_seidel(ds, variable, &self.config.fill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::Statistic;
    use crate::config::FillConfig;
    use crate::error::GridProcessorError;
    use geo_common::Variable;
    use ndarray::array;

    #[test]
    fn test_configured_statistic_is_used() {
        let config = GeoToolzConfig {
            statistic: Statistic::Count,
            ..GeoToolzConfig::default()
        };
        let processor = GridProcessor::new(config).unwrap();
        let da = DataArray::new(vec!["obs"], array![5.0, 7.0].into_dyn())
            .unwrap()
            .with_coord("lon", Variable::float1("obs", vec![0.2, 0.4]))
            .unwrap()
            .with_coord("lat", Variable::float1("obs", vec![0.5, 0.5]))
            .unwrap();
        let grid = RegularLonLat::init_from_bounds((0.0, 1.0), (0.0, 1.0), 1.0).unwrap();
        let out = processor.bin(&da, &grid).unwrap();
        assert_eq!(out.data[[0, 0]], 2.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GeoToolzConfig {
            fill: FillConfig {
                relaxation: Some(3.0),
                ..FillConfig::default()
            },
            ..GeoToolzConfig::default()
        };
        assert!(matches!(
            GridProcessor::new(config),
            Err(GridProcessorError::ConfigError(_))
        ));
    }
}
