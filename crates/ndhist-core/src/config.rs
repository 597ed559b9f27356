//! Construction parameters for histograms and profiles
//!
//! These are the only "configuration" a histogram has. They can be built in
//! code with the `with_*` methods or deserialized from JSON, and are always
//! validated before any accumulator is allocated.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Largest number of cells a histogram may allocate
pub const MAX_CELLS: usize = 1 << 28;

/// Product of per-axis bin counts, rejecting overflow and grids above
/// [`MAX_CELLS`]
pub fn checked_cells(bins: impl IntoIterator<Item = usize>) -> Result<usize> {
    let cells = bins.into_iter().try_fold(1usize, |acc, n| {
        acc.checked_mul(n).ok_or_else(|| {
            Error::InvalidParameter("Total number of cells overflows usize".to_string())
        })
    })?;
    if cells > MAX_CELLS {
        return Err(Error::InvalidParameter(format!(
            "Grid of {cells} cells exceeds the limit of {MAX_CELLS}"
        )));
    }
    Ok(cells)
}

/// Uniform binning of a single axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// Number of bins
    pub bins: usize,
    /// Lower edge of the first bin
    pub min: f64,
    /// Upper edge of the last bin
    pub max: f64,
    /// Axis title
    #[serde(default)]
    pub title: String,
}

impl AxisSpec {
    pub fn new(bins: usize, min: f64, max: f64) -> Self {
        Self {
            bins,
            min,
            max,
            title: String::new(),
        }
    }

    /// Set the axis title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Check the axis parameters; `index` is only used for error reporting
    pub fn validate(&self, index: usize) -> Result<()> {
        if self.bins == 0 {
            return Err(Error::zero_bins(index));
        }
        checked_cells([self.bins])?;
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(Error::DegenerateAxis {
                axis: index,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Binning of a full N-dimensional grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Histogram title
    #[serde(default)]
    pub title: String,
    /// One entry per dimension, in axis order
    pub axes: Vec<AxisSpec>,
}

impl GridSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            axes: Vec::new(),
        }
    }

    /// Build a spec from the per-axis parameter arrays
    ///
    /// All three arrays must have exactly `dim` entries.
    pub fn from_arrays(
        dim: usize,
        min_bins: &[f64],
        max_bins: &[f64],
        n_bins: &[usize],
        title: impl Into<String>,
    ) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidParameter(
                "Histogram must have at least one dimension".to_string(),
            ));
        }
        if min_bins.len() != dim {
            return Err(Error::size_mismatch(dim, min_bins.len(), "minimum edges"));
        }
        if max_bins.len() != dim {
            return Err(Error::size_mismatch(dim, max_bins.len(), "maximum edges"));
        }
        if n_bins.len() != dim {
            return Err(Error::size_mismatch(dim, n_bins.len(), "bin counts"));
        }

        let axes = (0..dim)
            .map(|d| AxisSpec::new(n_bins[d], min_bins[d], max_bins[d]))
            .collect();
        Ok(Self {
            title: title.into(),
            axes,
        })
    }

    /// Append an untitled axis
    pub fn with_axis(mut self, bins: usize, min: f64, max: f64) -> Self {
        self.axes.push(AxisSpec::new(bins, min, max));
        self
    }

    /// Append a fully specified axis
    pub fn with_axis_spec(mut self, axis: AxisSpec) -> Self {
        self.axes.push(axis);
        self
    }

    /// Parse a spec from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: Self = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    /// Total number of cells, checked against overflow and [`MAX_CELLS`]
    pub fn cells(&self) -> Result<usize> {
        checked_cells(self.axes.iter().map(|axis| axis.bins))
    }

    pub fn validate(&self) -> Result<()> {
        if self.axes.is_empty() {
            return Err(Error::InvalidParameter(
                "Histogram must have at least one dimension".to_string(),
            ));
        }
        for (i, axis) in self.axes.iter().enumerate() {
            axis.validate(i)?;
        }
        let cells = self.cells()?;
        trace!(dimension = self.dimension(), cells, "validated grid spec");
        Ok(())
    }
}

/// Optional accept-range for the values filled into a profile
///
/// A missing bound disables filtering on that side. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl ValueRange {
    /// Accept every (non-NaN) value
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Whether `value` passes the filter. NaN never does.
    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        if matches!(self.min, Some(min) if value < min) {
            return false;
        }
        !matches!(self.max, Some(max) if value > max)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min.is_some_and(f64::is_nan) || self.max.is_some_and(f64::is_nan) {
            return Err(Error::non_finite("value range"));
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(Error::InvalidParameter(format!(
                    "Value range minimum {min} exceeds maximum {max}"
                )));
            }
        }
        Ok(())
    }
}

/// Construction parameters of a profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSpec {
    pub grid: GridSpec,
    #[serde(default)]
    pub value_range: ValueRange,
}

impl ProfileSpec {
    pub fn new(grid: GridSpec) -> Self {
        Self {
            grid,
            value_range: ValueRange::unbounded(),
        }
    }

    pub fn with_value_range(mut self, range: ValueRange) -> Self {
        self.value_range = range;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let spec: Self = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.value_range.validate()
    }
}
