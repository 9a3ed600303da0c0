//! Gap filling by successive over-relaxation of the Laplace equation.

use geo_common::{Dataset, VarData, Variable};
use ndarray::{Array2, ArrayViewMut2, Axis, IxDyn};
use std::f64::consts::PI;
use tracing::{debug, warn};

use crate::config::{FillConfig, FirstGuess};
use crate::error::Result;

/// Fill the NaNs of every `(lat, lon)` slice of `variable`.
///
/// Defined values are never modified. The variable keeps its dimension order.
pub fn fillnan_gauss_seidel(ds: &Dataset, variable: &str, config: &FillConfig) -> Result<Dataset> {
    config.validate()?;
    let da = ds.data_array(variable)?;
    let lat_ax = da.axis("lat")?;
    let lon_ax = da.axis("lon")?;
    let ny = da.shape()[lat_ax];
    let nx = da.shape()[lon_ax];

    let mut order: Vec<usize> = (0..da.dims.len())
        .filter(|&ax| ax != lat_ax && ax != lon_ax)
        .collect();
    order.push(lat_ax);
    order.push(lon_ax);
    let mut inverse = vec![0; order.len()];
    for (k, &ax) in order.iter().enumerate() {
        inverse[ax] = k;
    }

    let permuted = da
        .data
        .view()
        .permuted_axes(IxDyn(&order))
        .as_standard_layout()
        .into_owned();
    let permuted_shape = permuted.shape().to_vec();
    let outer = if nx * ny == 0 {
        0
    } else {
        permuted.len() / (nx * ny)
    };
    let mut slices = permuted.into_shape_with_order((outer, ny, nx))?;

    let relaxation = config.relaxation.unwrap_or_else(|| optimal_relaxation(nx, ny));
    let max_iterations = config.max_iterations.unwrap_or(nx * ny);

    let mut filled_slices = 0;
    for mut slice in slices.axis_iter_mut(Axis(0)) {
        let missing = slice.mapv(f64::is_nan);
        if !missing.iter().any(|&m| m) {
            continue;
        }
        first_guess(&mut slice, &missing, config.first_guess);
        let (iterations, residual) = relax(
            &mut slice,
            &missing,
            relaxation,
            config.epsilon,
            max_iterations,
            config.is_circle,
        );
        if residual >= config.epsilon {
            warn!(
                variable,
                iterations,
                residual,
                epsilon = config.epsilon,
                "Gap filling did not converge"
            );
        } else {
            debug!(variable, iterations, residual, "Gap filling converged");
        }
        filled_slices += 1;
    }
    debug!(variable, slices = outer, filled_slices, relaxation, "Filled NaNs");

    let data = slices
        .into_shape_with_order(IxDyn(&permuted_shape))?
        .permuted_axes(IxDyn(&inverse))
        .as_standard_layout()
        .into_owned();

    let mut out = ds.clone();
    let var = Variable::new(da.dims.clone(), VarData::Float(data))?.with_attrs(da.attrs.clone());
    out.data_vars.insert(variable.to_string(), var);
    if let Some(lon) = out.coords.get_mut("lon") {
        lon.attrs.insert("units".to_string(), "degrees_east".into());
    }
    if let Some(lat) = out.coords.get_mut("lat") {
        lat.attrs.insert("units".to_string(), "degrees_north".into());
    }
    Ok(out)
}

/// Optimal SOR factor for an `nx` by `ny` grid.
pub fn optimal_relaxation(nx: usize, ny: usize) -> f64 {
    if nx < 2 || ny < 2 {
        return 1.0;
    }
    let p = (PI / (nx - 1) as f64).cos() + (PI / (ny - 1) as f64).cos();
    4.0 / (2.0 + (4.0 - p * p).sqrt())
}

fn first_guess(grid: &mut ArrayViewMut2<'_, f64>, missing: &Array2<bool>, guess: FirstGuess) {
    for (mut row, row_missing) in grid.outer_iter_mut().zip(missing.outer_iter()) {
        let value = match guess {
            FirstGuess::Zero => 0.0,
            FirstGuess::ZonalAverage => {
                let (sum, n) = row
                    .iter()
                    .filter(|v| !v.is_nan())
                    .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
                if n == 0 {
                    0.0
                } else {
                    sum / n as f64
                }
            }
        };
        for (v, &m) in row.iter_mut().zip(row_missing.iter()) {
            if m {
                *v = value;
            }
        }
    }
}

fn reflect(i: isize, n: usize) -> usize {
    if n == 1 {
        0
    } else if i < 0 {
        1
    } else if i as usize >= n {
        n - 2
    } else {
        i as usize
    }
}

fn wrap(i: isize, n: usize) -> usize {
    i.rem_euclid(n as isize) as usize
}

/// Returns the iteration count and the last maximum residual.
fn relax(
    grid: &mut ArrayViewMut2<'_, f64>,
    missing: &Array2<bool>,
    relaxation: f64,
    epsilon: f64,
    max_iterations: usize,
    is_circle: bool,
) -> (usize, f64) {
    let (ny, nx) = grid.dim();
    let x_index = |i: isize| if is_circle { wrap(i, nx) } else { reflect(i, nx) };

    let mut residual = f64::INFINITY;
    let mut iterations = 0;
    while iterations < max_iterations {
        iterations += 1;
        residual = 0.0;
        for j in 0..ny {
            let jn = reflect(j as isize - 1, ny);
            let js = reflect(j as isize + 1, ny);
            for i in 0..nx {
                if !missing[[j, i]] {
                    continue;
                }
                let iw = x_index(i as isize - 1);
                let ie = x_index(i as isize + 1);
                let r = 0.25 * (grid[[jn, i]] + grid[[js, i]] + grid[[j, iw]] + grid[[j, ie]])
                    - grid[[j, i]];
                grid[[j, i]] += relaxation * r;
                residual = residual.max(r.abs());
            }
        }
        if residual < epsilon {
            break;
        }
    }
    (iterations, residual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn ramp_dataset() -> Dataset {
        // dims (lon, time, lat); value equals the lon index
        let mut data = Array3::from_shape_fn((5, 2, 3), |(i, _, _)| i as f64);
        data[[2, 0, 1]] = f64::NAN;
        data[[3, 1, 1]] = f64::NAN;
        let mut ds = Dataset::new();
        ds.assign_coord("lon", Variable::float1("lon", vec![0.0, 1.0, 2.0, 3.0, 4.0]))
            .unwrap();
        ds.assign_coord("lat", Variable::float1("lat", vec![0.0, 1.0, 2.0])).unwrap();
        ds.insert_var(
            "sst",
            Variable::new(vec!["lon", "time", "lat"], VarData::Float(data.into_dyn())).unwrap(),
        )
        .unwrap();
        ds
    }

    #[test]
    fn test_fill_interpolates_linear_field() {
        let config = FillConfig {
            is_circle: false,
            epsilon: 1e-8,
            ..FillConfig::default()
        };
        let out = fillnan_gauss_seidel(&ramp_dataset(), "sst", &config).unwrap();
        let sst = out.data_vars["sst"].as_float("sst").unwrap();
        assert_eq!(out.data_vars["sst"].dims, vec!["lon", "time", "lat"]);
        assert!(sst.iter().all(|v| v.is_finite()));
        assert!((sst[[2, 0, 1]] - 2.0).abs() < 1e-6);
        assert!((sst[[3, 1, 1]] - 3.0).abs() < 1e-6);
        assert_eq!(sst[[4, 1, 2]], 4.0);
        assert_eq!(out.coords["lon"].attrs["units"], "degrees_east");
        assert_eq!(out.coords["lat"].attrs["units"], "degrees_north");
    }

    #[test]
    fn test_fill_leaves_complete_field_alone() {
        let mut ds = ramp_dataset();
        let filled = fillnan_gauss_seidel(&ds, "sst", &FillConfig::default()).unwrap();
        ds.data_vars.insert("sst".to_string(), filled.data_vars["sst"].clone());
        let again = fillnan_gauss_seidel(&ds, "sst", &FillConfig::default()).unwrap();
        assert_eq!(again.data_vars["sst"], ds.data_vars["sst"]);
    }

    #[test]
    fn test_optimal_relaxation() {
        assert_eq!(optimal_relaxation(1, 10), 1.0);
        let w = optimal_relaxation(100, 100);
        assert!(w > 1.9 && w < 2.0);
    }

    #[test]
    fn test_boundary_indices() {
        assert_eq!(reflect(-1, 5), 1);
        assert_eq!(reflect(5, 5), 3);
        assert_eq!(reflect(-1, 1), 0);
        assert_eq!(wrap(-1, 5), 4);
        assert_eq!(wrap(5, 5), 0);
    }
}
