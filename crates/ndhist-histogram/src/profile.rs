//! Profiles: mean of a value per cell
//!
//! A [`ProfileND`] bins points exactly like a [`HistND`] but every fill also
//! carries a value. The cell content reported by a profile is the weighted
//! mean of the values that landed in the cell, and its error is the standard
//! error of that mean.
//!
//! Values outside the profile's [`ValueRange`] (and NaN values) are rejected
//! before anything is counted, so they show up neither in the cell statistics
//! nor in the underflow/overflow counters.

use crate::axis::Axis;
use crate::grid::HistND;
use crate::types::{Fill, ProfileStats};
use ndhist_core::{Error, GridSpec, ProfileSpec, Result, ValueRange};
use std::fmt;
use std::ops::Deref;

/// An N-dimensional profile
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileND {
    hist: HistND,
    value_range: ValueRange,
    /// Sum of weight * value per cell
    bins_values: Vec<f64>,
    /// Sum of weight * value^2 per cell
    bins_values2: Vec<f64>,
    sum_weighted_values: f64,
    sum_weighted_values2: f64,
}

impl ProfileND {
    pub fn new(
        dim: usize,
        min_bins: &[f64],
        max_bins: &[f64],
        n_bins: &[usize],
        title: impl Into<String>,
        value_range: ValueRange,
    ) -> Result<Self> {
        let grid = GridSpec::from_arrays(dim, min_bins, max_bins, n_bins, title)?;
        Self::from_spec(&ProfileSpec::new(grid).with_value_range(value_range))
    }

    pub fn from_spec(spec: &ProfileSpec) -> Result<Self> {
        spec.value_range.validate()?;
        let hist = HistND::from_spec(&spec.grid)?;
        Ok(Self::from_hist(hist, spec.value_range))
    }

    fn from_hist(hist: HistND, value_range: ValueRange) -> Self {
        let cells = hist.cells();
        Self {
            hist,
            value_range,
            bins_values: vec![0.0; cells],
            bins_values2: vec![0.0; cells],
            sum_weighted_values: 0.0,
            sum_weighted_values2: 0.0,
        }
    }

    /// The underlying histogram of weights
    pub fn hist(&self) -> &HistND {
        &self.hist
    }

    pub fn value_range(&self) -> ValueRange {
        self.value_range
    }

    pub fn dimension(&self) -> usize {
        self.hist.dimension()
    }

    pub fn title(&self) -> &str {
        self.hist.title()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.hist.set_title(title);
    }

    pub fn axis(&self, i: usize) -> &Axis {
        self.hist.axis(i)
    }

    pub fn set_axis_title(&mut self, i: usize, title: impl Into<String>) {
        self.hist.axis_mut(i).set_title(title);
    }

    pub fn cells(&self) -> usize {
        self.hist.cells()
    }

    pub fn entries(&self) -> u64 {
        self.hist.entries()
    }

    pub fn pos_to_cell(&self, x: &[f64]) -> Option<usize> {
        self.hist.pos_to_cell(x)
    }

    fn check_arity(&self, len: usize) -> Result<()> {
        if len != self.dimension() {
            return Err(Error::DimensionMismatch {
                expected: self.dimension(),
                actual: len,
            });
        }
        Ok(())
    }

    fn accumulate(&mut self, fill: Fill, value: f64, w: f64) -> Fill {
        if let Some(cell) = fill.cell() {
            let wv = w * value;
            let wv2 = wv * value;
            self.bins_values[cell] += wv;
            self.bins_values2[cell] += wv2;
            self.sum_weighted_values += wv;
            self.sum_weighted_values2 += wv2;
        }
        fill
    }

    // ----- fill protocol -----

    pub fn fill_cell(&mut self, cell: usize, value: f64) -> Fill {
        self.fill_cell_w(cell, value, 1.0)
    }

    pub fn fill_cell_w(&mut self, cell: usize, value: f64, w: f64) -> Fill {
        if !self.value_range.contains(value) {
            return Fill::Rejected;
        }
        let fill = self.hist.fill_cell_w(cell, w);
        self.accumulate(fill, value, w)
    }

    pub fn fill_bins(&mut self, bins: &[usize], value: f64) -> Result<Fill> {
        self.fill_bins_w(bins, value, 1.0)
    }

    pub fn fill_bins_w(&mut self, bins: &[usize], value: f64, w: f64) -> Result<Fill> {
        self.check_arity(bins.len())?;
        Ok(self.fill_bins_point(bins, value, w))
    }

    pub(crate) fn fill_bins_point(&mut self, bins: &[usize], value: f64, w: f64) -> Fill {
        if !self.value_range.contains(value) {
            return Fill::Rejected;
        }
        let fill = self.hist.fill_bins_point(bins, w);
        self.accumulate(fill, value, w)
    }

    pub fn fill_pos(&mut self, x: &[f64], value: f64) -> Result<Fill> {
        self.fill_pos_w(x, value, 1.0)
    }

    /// Fill `value` with weight `w` at coordinates `x`
    ///
    /// A wrong number of coordinates is an error. A value outside the accept
    /// range gives [`Fill::Rejected`] and leaves every accumulator untouched.
    pub fn fill_pos_w(&mut self, x: &[f64], value: f64, w: f64) -> Result<Fill> {
        self.check_arity(x.len())?;
        Ok(self.fill_point(x, value, w))
    }

    pub(crate) fn fill_point(&mut self, x: &[f64], value: f64, w: f64) -> Fill {
        if !self.value_range.contains(value) {
            return Fill::Rejected;
        }
        let fill = self.hist.fill_point(x, w);
        self.accumulate(fill, value, w)
    }

    // ----- per-cell statistics -----

    /// Sum of weights in cell `i`; 0 outside the grid
    pub fn cell_entries(&self, i: usize) -> f64 {
        if i >= self.cells() {
            return 0.0;
        }
        self.hist.cell_content(i)
    }

    /// Weighted mean of the values in cell `i`; 0 for empty cells
    pub fn cell_content(&self, i: usize) -> f64 {
        let l = self.cell_entries(i);
        if l == 0.0 {
            return 0.0;
        }
        self.bins_values[i] / l
    }

    /// Weighted standard deviation of the values in cell `i`
    pub fn std_dev(&self, i: usize) -> f64 {
        let l = self.cell_entries(i);
        if l <= 0.0 {
            return 0.0;
        }
        let h = self.bins_values[i];
        let e = self.bins_values2[i];
        (e * l - h * h).max(0.0).sqrt() / l
    }

    /// Standard error of the mean of cell `i`
    pub fn cell_content_error(&self, i: usize) -> f64 {
        let l = self.cell_entries(i);
        if l <= 0.0 {
            return 0.0;
        }
        self.std_dev(i) / l.sqrt()
    }

    fn non_empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.cells()).filter(move |&i| self.cell_entries(i) != 0.0)
    }

    pub fn cells_contents(&self, include_empty: bool) -> Vec<f64> {
        if include_empty {
            return (0..self.cells()).map(|i| self.cell_content(i)).collect();
        }
        self.non_empty_cells().map(|i| self.cell_content(i)).collect()
    }

    pub fn cells_contents_errors(&self, include_empty: bool) -> Vec<f64> {
        if include_empty {
            return (0..self.cells()).map(|i| self.cell_content_error(i)).collect();
        }
        self.non_empty_cells()
            .map(|i| self.cell_content_error(i))
            .collect()
    }

    pub fn bins_edges(&self, include_empty: bool) -> Vec<Vec<f64>> {
        self.hist.bins_edges(include_empty)
    }

    pub fn bins_centers(&self, include_empty: bool) -> Vec<Vec<f64>> {
        self.hist.bins_centers(include_empty)
    }

    pub fn stats(&self) -> ProfileStats {
        ProfileStats {
            histogram: self.hist.stats(),
            sum_weighted_values: self.sum_weighted_values,
            sum_weighted_values2: self.sum_weighted_values2,
        }
    }

    /// Add the accumulators of a profile with identical binning
    ///
    /// Both profiles must also filter values with the same range.
    pub fn merge(&mut self, other: &ProfileND) -> Result<()> {
        if self.value_range != other.value_range {
            return Err(Error::IncompatibleValueRange(format!(
                "{:?} vs {:?}",
                self.value_range, other.value_range
            )));
        }
        self.hist.merge(&other.hist)?;
        for (a, b) in self.bins_values.iter_mut().zip(&other.bins_values) {
            *a += b;
        }
        for (a, b) in self.bins_values2.iter_mut().zip(&other.bins_values2) {
            *a += b;
        }
        self.sum_weighted_values += other.sum_weighted_values;
        self.sum_weighted_values2 += other.sum_weighted_values2;
        Ok(())
    }
}

impl fmt::Display for ProfileND {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProfileND(\"{}\", dim={}, cells={}, entries={})",
            self.title(),
            self.dimension(),
            self.cells(),
            self.entries()
        )
    }
}

macro_rules! profile_facade {
    ($name:ident, $dim:literal) => {
        impl $name {
            pub fn into_inner(self) -> ProfileND {
                self.inner
            }

            pub fn set_title(&mut self, title: impl Into<String>) {
                self.inner.set_title(title);
            }

            pub fn set_axis_title(&mut self, i: usize, title: impl Into<String>) {
                self.inner.set_axis_title(i, title);
            }

            pub fn merge(&mut self, other: &$name) -> Result<()> {
                self.inner.merge(&other.inner)
            }

            pub fn fill_cell(&mut self, cell: usize, value: f64) -> Fill {
                self.inner.fill_cell(cell, value)
            }

            pub fn fill_cell_w(&mut self, cell: usize, value: f64, w: f64) -> Fill {
                self.inner.fill_cell_w(cell, value, w)
            }

            /// Fill by per-axis bin indices; an index past its axis is overflow
            pub fn fill_bins(&mut self, bins: [usize; $dim], value: f64) -> Fill {
                self.fill_bins_w(bins, value, 1.0)
            }

            pub fn fill_bins_w(&mut self, bins: [usize; $dim], value: f64, w: f64) -> Fill {
                self.inner.fill_bins_point(&bins, value, w)
            }
        }

        impl Deref for $name {
            type Target = ProfileND;

            fn deref(&self) -> &ProfileND {
                &self.inner
            }
        }

        impl From<$name> for ProfileND {
            fn from(profile: $name) -> ProfileND {
                profile.inner
            }
        }

        impl TryFrom<ProfileND> for $name {
            type Error = Error;

            fn try_from(inner: ProfileND) -> Result<Self> {
                inner.check_arity($dim)?;
                Ok(Self { inner })
            }
        }
    };
}

/// A profile over one dimension
#[derive(Debug, Clone, PartialEq)]
pub struct Profile1D {
    inner: ProfileND,
}

impl Profile1D {
    pub fn new(
        n: usize,
        min: f64,
        max: f64,
        value_range: ValueRange,
        title: impl Into<String>,
    ) -> Result<Self> {
        let spec = ProfileSpec::new(GridSpec::new(title).with_axis(n, min, max))
            .with_value_range(value_range);
        Ok(Self {
            inner: ProfileND::from_spec(&spec)?,
        })
    }

    pub fn fill(&mut self, x: f64, value: f64) -> Fill {
        self.fill_w(x, value, 1.0)
    }

    pub fn fill_w(&mut self, x: f64, value: f64, w: f64) -> Fill {
        self.inner.fill_point(&[x], value, w)
    }
}

profile_facade!(Profile1D, 1);

/// A profile over two dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct Profile2D {
    inner: ProfileND,
}

impl Profile2D {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        nx: usize,
        xmin: f64,
        xmax: f64,
        ny: usize,
        ymin: f64,
        ymax: f64,
        value_range: ValueRange,
        title: impl Into<String>,
    ) -> Result<Self> {
        let grid = GridSpec::new(title)
            .with_axis(nx, xmin, xmax)
            .with_axis(ny, ymin, ymax);
        let spec = ProfileSpec::new(grid).with_value_range(value_range);
        Ok(Self {
            inner: ProfileND::from_spec(&spec)?,
        })
    }

    pub fn fill(&mut self, x: f64, y: f64, value: f64) -> Fill {
        self.fill_w(x, y, value, 1.0)
    }

    pub fn fill_w(&mut self, x: f64, y: f64, value: f64, w: f64) -> Fill {
        self.inner.fill_point(&[x, y], value, w)
    }
}

profile_facade!(Profile2D, 2);

/// A profile over three dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct Profile3D {
    inner: ProfileND,
}

impl Profile3D {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        nx: usize,
        xmin: f64,
        xmax: f64,
        ny: usize,
        ymin: f64,
        ymax: f64,
        nz: usize,
        zmin: f64,
        zmax: f64,
        value_range: ValueRange,
        title: impl Into<String>,
    ) -> Result<Self> {
        let grid = GridSpec::new(title)
            .with_axis(nx, xmin, xmax)
            .with_axis(ny, ymin, ymax)
            .with_axis(nz, zmin, zmax);
        let spec = ProfileSpec::new(grid).with_value_range(value_range);
        Ok(Self {
            inner: ProfileND::from_spec(&spec)?,
        })
    }

    pub fn fill(&mut self, x: f64, y: f64, z: f64, value: f64) -> Fill {
        self.fill_w(x, y, z, value, 1.0)
    }

    pub fn fill_w(&mut self, x: f64, y: f64, z: f64, value: f64, w: f64) -> Fill {
        self.inner.fill_point(&[x, y, z], value, w)
    }
}

profile_facade!(Profile3D, 3);
