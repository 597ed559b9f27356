//! N-dimensional histogram core
//!
//! A [`HistND`] owns one [`Axis`] per dimension and a flat array of cells.
//! A cell is addressed by a single index; the mapping to per-axis bin indices
//! is a mixed-radix decomposition with precomputed strides, so the first axis
//! varies fastest.
//!
//! Three fill paths share one primitive:
//!
//! - [`HistND::fill_cell`] takes a cell index and derives the axis moments
//!   from the bin centers of that cell,
//! - [`HistND::fill_bins`] takes per-axis bin indices and uses their centers,
//! - [`HistND::fill_pos`] takes coordinates and uses them exactly.

use crate::axis::Axis;
use crate::types::{Fill, Location, Stats};
use ndhist_core::{checked_cells, Error, GridSpec, Result};
use std::fmt;
use tracing::{debug, trace};

/// An N-dimensional histogram
#[derive(Debug, Clone, PartialEq)]
pub struct HistND {
    title: String,
    axes: Vec<Axis>,
    /// `strides[k]` is the product of the bin counts of the axes before `k`
    strides: Vec<usize>,
    cells: usize,
    /// Sum of weights per cell
    bins_entries: Vec<f64>,
    /// Sum of squared weights per cell
    bin_sum_weights2: Vec<f64>,
    entries: u64,
    underflow: u64,
    overflow: u64,
    sum_weights: f64,
    sum_weights2: f64,
    sum_weights_x: Vec<f64>,
    sum_weights_x2: Vec<f64>,
}

impl HistND {
    /// Create a histogram with uniform binning on every axis
    ///
    /// `min_bins`, `max_bins` and `n_bins` must each have `dim` entries.
    pub fn new(
        dim: usize,
        min_bins: &[f64],
        max_bins: &[f64],
        n_bins: &[usize],
        title: impl Into<String>,
    ) -> Result<Self> {
        let spec = GridSpec::from_arrays(dim, min_bins, max_bins, n_bins, title)?;
        Self::from_spec(&spec)
    }

    /// Create a histogram from a grid spec
    pub fn from_spec(spec: &GridSpec) -> Result<Self> {
        spec.validate()?;
        let axes = spec
            .axes
            .iter()
            .enumerate()
            .map(|(i, axis)| Axis::from_spec(axis, i))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_validated_axes(axes, spec.title.clone()))
    }

    /// Create a histogram from prebuilt (possibly variable-width) axes
    pub fn from_axes(axes: Vec<Axis>, title: impl Into<String>) -> Result<Self> {
        if axes.is_empty() {
            return Err(Error::InvalidParameter(
                "Histogram must have at least one dimension".to_string(),
            ));
        }
        checked_cells(axes.iter().map(Axis::nbins))?;
        Ok(Self::from_validated_axes(axes, title.into()))
    }

    /// Allocate the accumulators for axes whose cell count already passed
    /// [`checked_cells`]
    pub(crate) fn from_validated_axes(axes: Vec<Axis>, title: String) -> Self {
        let dim = axes.len();
        let mut strides = Vec::with_capacity(dim);
        let mut cells = 1usize;
        for axis in &axes {
            strides.push(cells);
            cells *= axis.nbins();
        }
        trace!(dim, cells, "allocating histogram");

        Self {
            title,
            axes,
            strides,
            cells,
            bins_entries: vec![0.0; cells],
            bin_sum_weights2: vec![0.0; cells],
            entries: 0,
            underflow: 0,
            overflow: 0,
            sum_weights: 0.0,
            sum_weights2: 0.0,
            sum_weights_x: vec![0.0; dim],
            sum_weights_x2: vec![0.0; dim],
        }
    }

    /// An empty histogram with the same binning and titles
    pub fn empty_like(&self) -> Self {
        Self::from_validated_axes(self.axes.clone(), self.title.clone())
    }

    // ----- accessors -----

    /// Number of dimensions
    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Axis of dimension `i`
    ///
    /// # Panics
    ///
    /// Panics if `i >= dimension()`.
    pub fn axis(&self, i: usize) -> &Axis {
        &self.axes[i]
    }

    /// Mutable access to an axis; only its title can change
    pub fn axis_mut(&mut self, i: usize) -> &mut Axis {
        &mut self.axes[i]
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Total number of cells
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Number of accepted fills
    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn underflow(&self) -> u64 {
        self.underflow
    }

    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    pub fn sum_of_weights(&self) -> f64 {
        self.sum_weights
    }

    pub fn sum_of_weights2(&self) -> f64 {
        self.sum_weights2
    }

    pub fn sum_of_weights_x(&self) -> &[f64] {
        &self.sum_weights_x
    }

    pub fn sum_of_weights_x2(&self) -> &[f64] {
        &self.sum_weights_x2
    }

    /// Weighted mean of the filled coordinates along axis `d`
    pub fn mean(&self, d: usize) -> f64 {
        if self.sum_weights == 0.0 {
            return 0.0;
        }
        self.sum_weights_x[d] / self.sum_weights
    }

    /// Weighted standard deviation of the filled coordinates along axis `d`
    pub fn std_dev(&self, d: usize) -> f64 {
        if self.sum_weights == 0.0 {
            return 0.0;
        }
        let mean = self.mean(d);
        (self.sum_weights_x2[d] / self.sum_weights - mean * mean)
            .max(0.0)
            .sqrt()
    }

    // ----- index mapping -----

    /// Bin index along axis `d` of an in-range cell
    #[inline]
    pub(crate) fn bin_of(&self, cell: usize, d: usize) -> usize {
        (cell / self.strides[d]) % self.axes[d].nbins()
    }

    /// Per-axis bin indices of a cell, or `None` if the cell is out of range
    pub fn cell_to_bins(&self, cell: usize) -> Option<Vec<usize>> {
        if cell >= self.cells {
            return None;
        }
        Some((0..self.dimension()).map(|d| self.bin_of(cell, d)).collect())
    }

    /// Cell index of the given per-axis bin indices
    ///
    /// This is the plain stride sum; bin indices are not checked against the
    /// axes, and missing trailing indices count as 0. The sum saturates, so
    /// huge indices give a cell past the end instead of wrapping around.
    pub fn bins_to_cell(&self, bins: &[usize]) -> usize {
        self.strides
            .iter()
            .zip(bins)
            .fold(0usize, |cell, (stride, bin)| {
                cell.saturating_add(stride.saturating_mul(*bin))
            })
    }

    /// Resolve a point to a cell, or to the side of the grid it falls off
    ///
    /// The first axis on which the coordinate is out of range decides between
    /// underflow and overflow. Missing trailing coordinates resolve to bin 0
    /// and extra coordinates are ignored.
    pub fn locate_pos(&self, x: &[f64]) -> Location {
        let mut cell = 0;
        for (d, axis) in self.axes.iter().enumerate() {
            let Some(&coordinate) = x.get(d) else {
                continue;
            };
            match axis.locate(coordinate) {
                Location::Inside(bin) => cell += self.strides[d] * bin,
                outside => return outside,
            }
        }
        Location::Inside(cell)
    }

    /// Cell containing the point `x`, or `None` if it is outside the grid
    pub fn pos_to_cell(&self, x: &[f64]) -> Option<usize> {
        self.locate_pos(x).inside()
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

    // ----- fill protocol -----

    /// The fill primitive
    ///
    /// Out-of-range cells only bump the overflow counter. When
    /// `axis_moments` is set, the moments are taken from the bin centers of
    /// the cell.
    fn fill_cell_inner(&mut self, cell: usize, weight: f64, axis_moments: bool) -> Fill {
        if cell >= self.cells {
            self.overflow += 1;
            return Fill::Overflow;
        }

        let weight2 = weight * weight;
        self.bins_entries[cell] += weight;
        self.bin_sum_weights2[cell] += weight2;
        self.entries += 1;
        self.sum_weights += weight;
        self.sum_weights2 += weight2;

        if axis_moments {
            for d in 0..self.dimension() {
                let center = self.axes[d].bin_center(self.bin_of(cell, d));
                self.add_axis_moment(d, weight, center);
            }
        }
        Fill::Filled(cell)
    }

    #[inline]
    fn add_axis_moment(&mut self, d: usize, weight: f64, x: f64) {
        self.sum_weights_x[d] += weight * x;
        self.sum_weights_x2[d] += weight * x * x;
    }

    /// Fill cell `cell` with weight 1
    pub fn fill_cell(&mut self, cell: usize) -> Fill {
        self.fill_cell_w(cell, 1.0)
    }

    /// Fill cell `cell` with weight `w`
    ///
    /// Decomposes the cell index to get the axis moments; prefer
    /// [`fill_bins_w`](Self::fill_bins_w) or [`fill_pos_w`](Self::fill_pos_w)
    /// when the bins or coordinates are already known.
    pub fn fill_cell_w(&mut self, cell: usize, w: f64) -> Fill {
        self.fill_cell_inner(cell, w, true)
    }

    /// Fill by per-axis bin indices with weight 1
    pub fn fill_bins(&mut self, bins: &[usize]) -> Result<Fill> {
        self.fill_bins_w(bins, 1.0)
    }

    /// Fill by per-axis bin indices with weight `w`
    ///
    /// A bin index past the end of its axis counts as overflow.
    pub fn fill_bins_w(&mut self, bins: &[usize], w: f64) -> Result<Fill> {
        self.check_arity(bins.len())?;
        Ok(self.fill_bins_point(bins, w))
    }

    /// Fill by bin indices whose length matches the dimension
    pub(crate) fn fill_bins_point(&mut self, bins: &[usize], w: f64) -> Fill {
        debug_assert_eq!(bins.len(), self.dimension());
        if bins.iter().zip(&self.axes).any(|(&bin, axis)| bin >= axis.nbins()) {
            self.overflow += 1;
            return Fill::Overflow;
        }

        let fill = self.fill_cell_inner(self.bins_to_cell(bins), w, false);
        if fill.is_filled() {
            for (d, &bin) in bins.iter().enumerate() {
                let center = self.axes[d].bin_center(bin);
                self.add_axis_moment(d, w, center);
            }
        }
        fill
    }

    /// Fill at coordinates `x` with weight 1
    pub fn fill_pos(&mut self, x: &[f64]) -> Result<Fill> {
        self.fill_pos_w(x, 1.0)
    }

    /// Fill at coordinates `x` with weight `w`
    ///
    /// Returns an error if `x` does not have one coordinate per dimension.
    pub fn fill_pos_w(&mut self, x: &[f64], w: f64) -> Result<Fill> {
        self.check_arity(x.len())?;
        Ok(self.fill_point(x, w))
    }

    /// Fill at coordinates whose length matches the dimension
    pub(crate) fn fill_point(&mut self, x: &[f64], w: f64) -> Fill {
        debug_assert_eq!(x.len(), self.dimension());
        let fill = match self.locate_pos(x) {
            Location::Underflow => {
                self.underflow += 1;
                Fill::Underflow
            }
            Location::Overflow => {
                self.overflow += 1;
                Fill::Overflow
            }
            Location::Inside(cell) => self.fill_cell_inner(cell, w, false),
        };
        if fill.is_filled() {
            for (d, &coordinate) in x.iter().enumerate() {
                self.add_axis_moment(d, w, coordinate);
            }
        }
        fill
    }

    // ----- content queries -----

    /// Content (sum of weights) of cell `i`
    ///
    /// Indices past the last cell return the overflow count.
    pub fn cell_content(&self, i: usize) -> f64 {
        match self.bins_entries.get(i) {
            Some(&content) => content,
            None => self.overflow as f64,
        }
    }

    /// Error of cell `i`: square root of its sum of squared weights
    ///
    /// Equals `sqrt(content)` for unweighted fills. Zero for out-of-range cells.
    pub fn cell_content_error(&self, i: usize) -> f64 {
        self.bin_sum_weights2.get(i).map_or(0.0, |w2| w2.sqrt())
    }

    /// Content of the cell containing `x`; 0 if `x` is outside the grid
    pub fn pos_content(&self, x: &[f64]) -> f64 {
        self.pos_to_cell(x).map_or(0.0, |cell| self.bins_entries[cell])
    }

    fn non_empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.cells).filter(move |&cell| self.bins_entries[cell] != 0.0)
    }

    /// Contents of all cells, or only the non-empty ones
    pub fn cells_contents(&self, include_empty: bool) -> Vec<f64> {
        if include_empty {
            return self.bins_entries.clone();
        }
        self.non_empty_cells().map(|cell| self.bins_entries[cell]).collect()
    }

    /// Errors of all cells, or only of the non-empty ones
    pub fn cells_contents_errors(&self, include_empty: bool) -> Vec<f64> {
        if include_empty {
            return (0..self.cells).map(|cell| self.cell_content_error(cell)).collect();
        }
        self.non_empty_cells()
            .map(|cell| self.cell_content_error(cell))
            .collect()
    }

    /// Bin edges per dimension
    ///
    /// With `include_empty` this is each axis's full edge table. Otherwise it
    /// lists, per dimension, the lower edge of every non-empty cell, aligned
    /// with [`cells_contents(false)`](Self::cells_contents).
    pub fn bins_edges(&self, include_empty: bool) -> Vec<Vec<f64>> {
        if include_empty {
            return self.axes.iter().map(|axis| axis.edges().to_vec()).collect();
        }
        self.per_cell_columns(|axis, bin| axis.bin_lower_edge(bin))
    }

    /// Bin centers per dimension
    ///
    /// With `include_empty` this is each axis's centers. Otherwise it lists,
    /// per dimension, the bin center of every non-empty cell.
    pub fn bins_centers(&self, include_empty: bool) -> Vec<Vec<f64>> {
        if include_empty {
            return self.axes.iter().map(Axis::centers).collect();
        }
        self.per_cell_columns(|axis, bin| axis.bin_center(bin))
    }

    fn per_cell_columns(&self, value: impl Fn(&Axis, usize) -> f64) -> Vec<Vec<f64>> {
        let mut columns = vec![Vec::new(); self.dimension()];
        for cell in self.non_empty_cells() {
            for (d, column) in columns.iter_mut().enumerate() {
                column.push(value(&self.axes[d], self.bin_of(cell, d)));
            }
        }
        columns
    }

    /// Snapshot of the global accumulators
    pub fn stats(&self) -> Stats {
        Stats {
            entries: self.entries,
            underflow: self.underflow,
            overflow: self.overflow,
            sum_weights: self.sum_weights,
            sum_weights2: self.sum_weights2,
            sum_weights_x: self.sum_weights_x.clone(),
            sum_weights_x2: self.sum_weights_x2.clone(),
        }
    }

    // ----- integrals -----

    /// Product of the bin widths of a cell
    pub fn cell_volume(&self, cell: usize) -> f64 {
        if cell >= self.cells {
            return 0.0;
        }
        (0..self.dimension())
            .map(|d| self.axes[d].bin_width(self.bin_of(cell, d)))
            .product()
    }

    /// Sum of `content * volume` over the cells in `[min_cell, max_cell)`
    ///
    /// Returns 0 for empty or out-of-range intervals.
    pub fn integral(&self, min_cell: usize, max_cell: usize) -> f64 {
        if min_cell >= max_cell || max_cell > self.cells {
            return 0.0;
        }
        (min_cell..max_cell)
            .map(|cell| self.bins_entries[cell] * self.cell_volume(cell))
            .sum()
    }

    /// Integral over every cell
    pub fn integral_all(&self) -> f64 {
        self.integral(0, self.cells)
    }

    /// Integral over the cell-id range spanned by two sets of bin indices
    ///
    /// Each index may be at most the bin count of its axis, so the end of the
    /// grid can be named as an exclusive upper bound. Larger indices are an
    /// error.
    pub fn integral_over_bins(&self, min_bins: &[usize], max_bins: &[usize]) -> Result<f64> {
        self.check_bounds(min_bins)?;
        self.check_bounds(max_bins)?;
        Ok(self.integral(self.bins_to_cell(min_bins), self.bins_to_cell(max_bins)))
    }

    fn check_bounds(&self, bins: &[usize]) -> Result<()> {
        self.check_arity(bins.len())?;
        for (d, (&bin, axis)) in bins.iter().zip(&self.axes).enumerate() {
            if bin > axis.nbins() {
                return Err(Error::InvalidInput(format!(
                    "Bin index {bin} is out of range for axis {d} with {} bins",
                    axis.nbins()
                )));
            }
        }
        Ok(())
    }

    /// Integral over the cell-id range spanned by two points
    ///
    /// Returns 0 if either point is outside the grid.
    pub fn integral_over_pos(&self, min_pos: &[f64], max_pos: &[f64]) -> Result<f64> {
        self.check_arity(min_pos.len())?;
        self.check_arity(max_pos.len())?;
        match (self.pos_to_cell(min_pos), self.pos_to_cell(max_pos)) {
            (Some(min_cell), Some(max_cell)) => Ok(self.integral(min_cell, max_cell)),
            _ => Ok(0.0),
        }
    }

    // ----- scaling and merging -----

    /// Multiply every cell content by `factor`, in place
    ///
    /// Squared weights scale by `factor^2`; the entry count is unchanged.
    /// With `scale_errors` the per-axis moments are scaled too.
    pub fn scale_mut(&mut self, factor: f64, scale_errors: bool) -> &mut Self {
        let factor2 = factor * factor;
        for content in &mut self.bins_entries {
            *content *= factor;
        }
        for w2 in &mut self.bin_sum_weights2 {
            *w2 *= factor2;
        }
        self.sum_weights *= factor;
        self.sum_weights2 *= factor2;

        if scale_errors {
            for d in 0..self.dimension() {
                self.sum_weights_x[d] *= factor;
                self.sum_weights_x2[d] *= factor;
            }
        }
        self
    }

    /// A scaled copy; `self` is left untouched
    pub fn scaled(&self, factor: f64, scale_errors: bool) -> Self {
        let mut result = self.clone();
        result.scale_mut(factor, scale_errors);
        result
    }

    /// Whether both histograms have the same dimension and identical edges
    pub fn same_binning(&self, other: &HistND) -> bool {
        self.dimension() == other.dimension()
            && self
                .axes
                .iter()
                .zip(&other.axes)
                .all(|(a, b)| a.same_binning(b))
    }

    /// Add the accumulators of `other` into `self`
    ///
    /// Unlike the `+` operator this is exact, and it requires identical
    /// binning. Typical use is combining histograms filled on separate
    /// threads.
    pub fn merge(&mut self, other: &HistND) -> Result<()> {
        if !self.same_binning(other) {
            return Err(Error::IncompatibleBinning(format!(
                "cannot merge '{}' into '{}'",
                other.title, self.title
            )));
        }
        debug!(cells = self.cells, entries = other.entries, "merging histogram");
        self.accumulate(other);
        Ok(())
    }

    fn accumulate(&mut self, other: &HistND) {
        for (a, b) in self.bins_entries.iter_mut().zip(&other.bins_entries) {
            *a += b;
        }
        for (a, b) in self.bin_sum_weights2.iter_mut().zip(&other.bin_sum_weights2) {
            *a += b;
        }
        for (a, b) in self.sum_weights_x.iter_mut().zip(&other.sum_weights_x) {
            *a += b;
        }
        for (a, b) in self.sum_weights_x2.iter_mut().zip(&other.sum_weights_x2) {
            *a += b;
        }
        self.entries += other.entries;
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.sum_weights += other.sum_weights;
        self.sum_weights2 += other.sum_weights2;
    }

    /// Fill many points in parallel
    ///
    /// Points are split across rayon workers, each filling its own empty copy
    /// of this histogram; the partial histograms are then merged. `weights`,
    /// when given, must have one entry per point.
    #[cfg(feature = "parallel")]
    pub fn par_fill_pos(&mut self, points: &[Vec<f64>], weights: Option<&[f64]>) -> Result<()> {
        use rayon::prelude::*;

        if let Some(weights) = weights {
            if weights.len() != points.len() {
                return Err(Error::size_mismatch(points.len(), weights.len(), "weights"));
            }
        }
        for point in points {
            self.check_arity(point.len())?;
        }

        debug!(points = points.len(), "parallel fill");
        let partial = points
            .par_iter()
            .enumerate()
            .fold(
                || self.empty_like(),
                |mut hist, (i, point)| {
                    let w = weights.map_or(1.0, |weights| weights[i]);
                    hist.fill_point(point, w);
                    hist
                },
            )
            .reduce(
                || self.empty_like(),
                |mut a, b| {
                    a.accumulate(&b);
                    a
                },
            );
        self.accumulate(&partial);
        Ok(())
    }
}

impl fmt::Display for HistND {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HistND(\"{}\", dim={}, cells={}, entries={})",
            self.title,
            self.dimension(),
            self.cells,
            self.entries
        )
    }
}
