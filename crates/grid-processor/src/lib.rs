//! Regridding and gap filling for gridded geospatial data.
//!
//! This crate bins scattered or gridded observations onto regular north-up
//! lon-lat grids, optionally one grid per time step:
//!
//! - **Grids**: [`RegularLonLat`] and [`RegularLonLatTime`] built from bounds,
//!   a resolution and an optional period
//! - **Binning**: per-cell running moments in [`Binning2D`], reduced by a
//!   [`Statistic`]
//! - **Subsetting**: value ranges and bounding boxes
//! - **Gap filling**: Gauss-Seidel relaxation of NaN cells
//! - **Configuration**: [`GridProcessor`] applies a [`GeoToolzConfig`]
//!
//! # Architecture
//!
//! ```text
//! DataArray (lon/lat coords)
//!      │
//!      ▼
//! apply_binning_2d(da, &mut binning, statistic)
//!      │
//!      ├─► Broadcast lon/lat to the data shape
//!      │
//!      ├─► Drop non-finite values
//!      │
//!      ├─► Binning2D::push (O(1) cell lookup on regular axes)
//!      │
//!      └─► Binning2D::variable(statistic)
//!               │
//!               ▼
//!          DataArray (lat, lon)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::{da_binning_2d, RegularLonLat, Statistic};
//!
//! let grid = RegularLonLat::init_from_bounds((-180.0, 180.0), (-90.0, 90.0), 1.0)?;
//! let gridded = da_binning_2d(&along_track, &grid, Statistic::Mean)?;
//! ```

pub mod binning;
pub mod config;
pub mod error;
pub mod fill;
pub mod grid;
pub mod processor;
pub mod regrid;
pub mod subset;

// Re-export commonly used types at crate root
pub use binning::{Axis, Binning2D, Statistic};
pub use config::{FillConfig, FirstGuess, GeoToolzConfig};
pub use error::{GridProcessorError, Result};
pub use fill::{fillnan_gauss_seidel, optimal_relaxation};
pub use grid::{RegularLonLat, RegularLonLatTime};
pub use processor::GridProcessor;
pub use regrid::{apply_binning_2d, da_binning_2d, da_binning_2d_time, ds_binning_2d_time, to_dim};
pub use subset::{where_slice, where_slice_bbox};

// Re-export from geo-common for convenience
pub use geo_common::{BoundingBox, DataArray, Dataset};
