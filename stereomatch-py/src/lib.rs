//! Python bindings for the stereomatch disparity library.
//!
//! Images are 2D `uint8` numpy arrays (height x width); disparity maps are
//! returned as `float32` arrays of the same shape.

use numpy::{PyArray1, PyArray2, PyArrayMethods, PyReadonlyArray2, PyUntypedArrayMethods};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use stereomatch::{
    create_mask as rust_create_mask, BlockMatchConfig, BlockMatcher, DisparityAlgorithm,
    DisparityBand, DisparityMap, DisparityRange, ImageView, Metric, ScanlineConfig,
    ScanlineMatcher, StereoError, StereoPair,
};

/// Convert a StereoError to a Python exception.
fn to_py_err(err: StereoError) -> PyErr {
    match err {
        StereoError::Cancelled
        | StereoError::BacktrackInconsistent { .. }
        | StereoError::ImageIo { .. } => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn view_of<'a>(array: &'a PyReadonlyArray2<'_, u8>) -> PyResult<ImageView<'a, u8>> {
    let shape = array.shape();
    let height = shape[0];
    let width = shape[1];
    let data = array.as_slice()?;
    ImageView::from_slice(data, width, height).map_err(to_py_err)
}

fn map_to_array<'py>(py: Python<'py>, map: DisparityMap) -> PyResult<Bound<'py, PyArray2<f32>>> {
    let (width, height) = (map.width(), map.height());
    PyArray1::from_vec(py, map.as_slice().to_vec()).reshape([height, width])
}

#[allow(clippy::too_many_arguments)]
fn block_disparity<'py>(
    py: Python<'py>,
    left: PyReadonlyArray2<'py, u8>,
    right: PyReadonlyArray2<'py, u8>,
    metric: Metric,
    block_radius: usize,
    min_disparity: usize,
    max_disparity: usize,
    parallel: bool,
) -> PyResult<Bound<'py, PyArray2<f32>>> {
    let pair = StereoPair::new(view_of(&left)?, view_of(&right)?).map_err(to_py_err)?;
    let disparity = DisparityRange::new(min_disparity, max_disparity).map_err(to_py_err)?;
    let matcher = BlockMatcher::new(BlockMatchConfig {
        metric,
        block_radius,
        disparity,
        parallel,
    })
    .map_err(to_py_err)?;
    let map = matcher.compute(pair).map_err(to_py_err)?;
    map_to_array(py, map)
}

/// Dense disparity by normalized SSD block matching.
///
/// Args:
///     left: 2D uint8 numpy array (height x width)
///     right: 2D uint8 numpy array of the same shape
///     block_radius: Window radius (default: 3)
///     min_disparity: Smallest disparity searched (default: 0)
///     max_disparity: Largest disparity searched (default: 64)
///     parallel: Process rows in parallel (default: False)
#[pyfunction]
#[pyo3(signature = (left, right, block_radius = 3, min_disparity = 0, max_disparity = 64, parallel = false))]
fn disparity_ssd<'py>(
    py: Python<'py>,
    left: PyReadonlyArray2<'py, u8>,
    right: PyReadonlyArray2<'py, u8>,
    block_radius: usize,
    min_disparity: usize,
    max_disparity: usize,
    parallel: bool,
) -> PyResult<Bound<'py, PyArray2<f32>>> {
    block_disparity(
        py,
        left,
        right,
        Metric::Ssd,
        block_radius,
        min_disparity,
        max_disparity,
        parallel,
    )
}

/// Dense disparity by normalized cross-correlation block matching.
///
/// Same arguments as `disparity_ssd`.
#[pyfunction]
#[pyo3(signature = (left, right, block_radius = 3, min_disparity = 0, max_disparity = 64, parallel = false))]
fn disparity_ncc<'py>(
    py: Python<'py>,
    left: PyReadonlyArray2<'py, u8>,
    right: PyReadonlyArray2<'py, u8>,
    block_radius: usize,
    min_disparity: usize,
    max_disparity: usize,
    parallel: bool,
) -> PyResult<Bound<'py, PyArray2<f32>>> {
    block_disparity(
        py,
        left,
        right,
        Metric::Ncc,
        block_radius,
        min_disparity,
        max_disparity,
        parallel,
    )
}

/// Scanline dynamic-programming disparity.
///
/// Args:
///     left: 2D uint8 numpy array (height x width)
///     right: 2D uint8 numpy array of the same shape
///     occlusion_cost: Penalty per unmatched pixel (default: 20)
///     parallel: Process rows in parallel (default: False)
///
/// Returns:
///     Tuple (left_aligned, right_aligned) of float32 arrays. Pixels the
///     optimal path never matched are NaN.
#[pyfunction]
#[pyo3(signature = (left, right, occlusion_cost = 20, parallel = false))]
#[allow(clippy::type_complexity)]
fn disparity_dp<'py>(
    py: Python<'py>,
    left: PyReadonlyArray2<'py, u8>,
    right: PyReadonlyArray2<'py, u8>,
    occlusion_cost: u32,
    parallel: bool,
) -> PyResult<(Bound<'py, PyArray2<f32>>, Bound<'py, PyArray2<f32>>)> {
    let pair = StereoPair::new(view_of(&left)?, view_of(&right)?).map_err(to_py_err)?;
    let matcher = ScanlineMatcher::new(ScanlineConfig {
        occlusion_cost,
        parallel,
    });
    let out = matcher.compute(pair).map_err(to_py_err)?;
    Ok((
        map_to_array(py, out.left.to_dense(f32::NAN))?,
        map_to_array(py, out.right.to_dense(f32::NAN))?,
    ))
}

/// Foreground mask from a disparity band.
///
/// Args:
///     disparity: 2D float32 numpy array
///     low: Inclusive lower bound, must be below 255
///     high: Inclusive upper bound
///
/// Returns:
///     uint8 array with 0 inside the band and 255 elsewhere (NaN included).
#[pyfunction]
fn create_mask<'py>(
    py: Python<'py>,
    disparity: PyReadonlyArray2<'py, f32>,
    low: f32,
    high: f32,
) -> PyResult<Bound<'py, PyArray2<u8>>> {
    let shape = disparity.shape();
    let height = shape[0];
    let width = shape[1];
    let data = disparity.as_slice()?.to_vec();
    let map = DisparityMap::from_vec(data, width, height).map_err(to_py_err)?;
    let mask = rust_create_mask(&map, DisparityBand::new(low, high)).map_err(to_py_err)?;
    PyArray1::from_vec(py, mask.into_data()).reshape([height, width])
}

/// Python module for stereo disparity estimation.
#[pymodule]
fn _stereomatch(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(disparity_ssd, m)?)?;
    m.add_function(wrap_pyfunction!(disparity_ncc, m)?)?;
    m.add_function(wrap_pyfunction!(disparity_dp, m)?)?;
    m.add_function(wrap_pyfunction!(create_mask, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
