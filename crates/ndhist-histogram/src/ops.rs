//! Operations on histograms: resampling arithmetic and projection
//!
//! Binary operators do not require matching binning. The result covers the
//! union of both operand ranges on every shared dimension; its bin count is
//! derived from a bin density (`nbins / width`) so the result keeps the
//! resolution of the left operand (or the finest of both, for
//! [`HistND::intersect`]). Every result cell then samples both operands at its
//! bin center. This is a resampling approximation: contents are not
//! redistributed proportionally across partially overlapping bins, so mass is
//! only conserved when the binnings line up.
//!
//! A result grid larger than [`MAX_CELLS`](ndhist_core::MAX_CELLS) is refused
//! before anything is allocated. [`HistND::try_combine`] reports that as an
//! error; the operator traits panic.

use crate::axis::Axis;
use crate::grid::HistND;
use ndhist_core::{checked_cells, Error, Result};
use num_traits::ToPrimitive;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use tracing::debug;

/// Cell-wise operation applied by [`HistND::try_combine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// Division; empty denominators give 0 instead of inf/NaN
    Div,
}

impl BinaryOp {
    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div if b == 0.0 => 0.0,
            BinaryOp::Div => a / b,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
        };
        f.write_str(name)
    }
}

/// How the bin density of a shared result axis is chosen
#[derive(Debug, Clone, Copy)]
enum Resolution {
    /// Density of the left operand
    Left,
    /// Larger density of the two operands
    Finest,
}

/// Bin count of a resampled axis: `floor(density * width)`, at least 1
///
/// Products that land within rounding noise of an integer are taken as that
/// integer, so an operand combined with itself keeps its bin count.
fn resampled_bins(density: f64, width: f64) -> usize {
    let raw = density * width;
    let nearest = raw.round();
    let bins = if (raw - nearest).abs() <= 1e-9 * nearest.max(1.0) {
        nearest
    } else {
        raw.floor()
    };
    // counts beyond usize saturate and are refused by the cell check
    bins.to_usize().unwrap_or(usize::MAX).max(1)
}

/// Synthesize a new histogram cell by cell from two operands
fn combine(
    lhs: &HistND,
    rhs: &HistND,
    resolution: Resolution,
    name: &str,
    op: impl Fn(f64, f64) -> f64,
) -> Result<HistND> {
    let shared = lhs.dimension().min(rhs.dimension());

    // (bins, min, max) per shared axis, sized before any edge is allocated
    let layout: Vec<(usize, f64, f64)> = (0..shared)
        .map(|d| {
            let (left, right) = (lhs.axis(d), rhs.axis(d));
            let min = left.min_bin().min(right.min_bin());
            let max = left.max_bin().max(right.max_bin());
            let density = match resolution {
                Resolution::Left => left.density(),
                Resolution::Finest => left.density().max(right.density()),
            };
            (resampled_bins(density, max - min), min, max)
        })
        .collect();
    let kept = lhs.axes()[shared..].iter().map(Axis::nbins);
    checked_cells(layout.iter().map(|&(bins, _, _)| bins).chain(kept))?;

    let mut axes = Vec::with_capacity(lhs.dimension());
    for (d, &(bins, min, max)) in layout.iter().enumerate() {
        axes.push(Axis::uniform(bins, min, max)?.with_title(lhs.axis(d).title()));
    }
    axes.extend(lhs.axes()[shared..].iter().cloned());

    let mut result = HistND::from_validated_axes(axes, String::new());
    debug!(
        op = name,
        dim = result.dimension(),
        cells = result.cells(),
        "resampling histograms"
    );

    let mut center = vec![0.0; result.dimension()];
    for cell in 0..result.cells() {
        for (d, x) in center.iter_mut().enumerate() {
            *x = result.axis(d).bin_center(result.bin_of(cell, d));
        }
        let value = op(lhs.pos_content(&center), rhs.pos_content(&center));
        result.fill_cell_w(cell, value);
    }
    Ok(result)
}

impl HistND {
    /// Combine two histograms cell by cell at the resolution of `self`
    ///
    /// Same result as the `+ - * /` operators, but a result grid above the
    /// cell limit is returned as an error instead of a panic.
    pub fn try_combine(&self, other: &HistND, op: BinaryOp) -> Result<HistND> {
        let name = op.to_string();
        combine(self, other, Resolution::Left, &name, |a, b| op.apply(a, b))
    }

    /// Sum of two histograms, resampled at the finer resolution of the two
    pub fn intersect(&self, other: &HistND) -> Result<HistND> {
        combine(self, other, Resolution::Finest, "intersect", |a, b| a + b)
    }
    /// Marginal histogram over the dimensions listed in `keep`
    ///
    /// The kept axes appear in the order given. Every source cell, empty or
    /// not, is filled into the projection with its content as weight, so the
    /// entry count of the result is the number of source cells.
    pub fn projection(&self, keep: &[usize]) -> Result<HistND> {
        if keep.is_empty() {
            return Err(Error::InvalidParameter(
                "Projection must keep at least one dimension".to_string(),
            ));
        }
        for (i, &d) in keep.iter().enumerate() {
            if d >= self.dimension() {
                return Err(Error::dimension_out_of_range(d, self.dimension()));
            }
            if keep[..i].contains(&d) {
                return Err(Error::InvalidParameter(format!(
                    "Dimension {d} is kept more than once"
                )));
            }
        }
        Ok(self.project(keep))
    }

    /// Projection onto dimensions that are known to be valid and distinct
    pub(crate) fn project(&self, keep: &[usize]) -> HistND {
        let axes = keep.iter().map(|&d| self.axis(d).clone()).collect();
        let mut result =
            HistND::from_validated_axes(axes, format!("Projection of {}", self.title()));
        debug!(from = self.dimension(), to = keep.len(), "projecting histogram");

        let mut bins = vec![0; keep.len()];
        for cell in 0..self.cells() {
            for (slot, &d) in bins.iter_mut().zip(keep) {
                *slot = self.bin_of(cell, d);
            }
            result.fill_bins_point(&bins, self.cell_content(cell));
        }
        result
    }
}

macro_rules! impl_resampling_op {
    ($trait:ident, $method:ident, $op:expr) => {
        /// # Panics
        ///
        /// Panics if the resampled grid would exceed the cell limit; use
        /// [`HistND::try_combine`] to get an error instead.
        impl $trait<&HistND> for &HistND {
            type Output = HistND;

            fn $method(self, rhs: &HistND) -> HistND {
                match self.try_combine(rhs, $op) {
                    Ok(result) => result,
                    Err(err) => panic!("cannot {} histograms: {err}", $op),
                }
            }
        }

        impl $trait for HistND {
            type Output = HistND;

            fn $method(self, rhs: HistND) -> HistND {
                (&self).$method(&rhs)
            }
        }
    };
}

impl_resampling_op!(Add, add, BinaryOp::Add);
impl_resampling_op!(Sub, sub, BinaryOp::Sub);
impl_resampling_op!(Mul, mul, BinaryOp::Mul);
impl_resampling_op!(Div, div, BinaryOp::Div);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn hist_1d(n: usize, min: f64, max: f64) -> HistND {
        HistND::new(1, &[min], &[max], &[n], "h").unwrap()
    }

    #[test]
    fn test_resampled_bins() {
        assert_eq!(resampled_bins(1.0, 15.0), 15);
        assert_eq!(resampled_bins(2.5, 1.1), 2);
        assert_eq!(resampled_bins(0.1, 1.0), 1);
        // 10 / 0.3 * 0.3 is not exactly 10
        assert_eq!(resampled_bins(10.0 / 0.3, 0.3), 10);
    }

    #[test]
    fn test_add_same_binning() {
        let mut a = hist_1d(4, 0.0, 4.0);
        let mut b = hist_1d(4, 0.0, 4.0);
        a.fill_pos(&[0.5]).unwrap();
        b.fill_pos_w(&[0.5], 2.0).unwrap();
        b.fill_pos(&[3.5]).unwrap();

        let sum = &a + &b;
        assert_eq!(sum.cells(), 4);
        assert_eq!(sum.cells_contents(true), vec![3.0, 0.0, 0.0, 1.0]);
        assert_eq!(sum.title(), "");
        assert_eq!(sum.axis(0).title(), "");
    }

    #[test]
    fn test_add_different_ranges() {
        let mut a = hist_1d(10, 0.0, 10.0);
        let mut b = hist_1d(10, 5.0, 15.0);
        a.fill_pos(&[2.5]).unwrap();
        b.fill_pos(&[12.5]).unwrap();

        let sum = a + b;
        assert_eq!(sum.cells(), 15);
        assert_eq!(sum.axis(0).min_bin(), 0.0);
        assert_eq!(sum.axis(0).max_bin(), 15.0);
        assert_eq!(sum.cell_content(2), 1.0);
        assert_eq!(sum.cell_content(12), 1.0);
        assert_relative_eq!(sum.cells_contents(true).iter().sum::<f64>(), 2.0);
    }

    #[test]
    fn test_sub_and_mul() {
        let mut a = hist_1d(2, 0.0, 2.0);
        let mut b = hist_1d(2, 0.0, 2.0);
        a.fill_pos_w(&[0.5], 5.0).unwrap();
        a.fill_pos_w(&[1.5], 2.0).unwrap();
        b.fill_pos_w(&[0.5], 3.0).unwrap();

        assert_eq!((&a - &b).cells_contents(true), vec![2.0, 2.0]);
        assert_eq!((&a * &b).cells_contents(true), vec![15.0, 0.0]);
    }

    #[test]
    fn test_division_by_empty_content_is_zero() {
        let mut a = hist_1d(3, 0.0, 3.0);
        let mut b = hist_1d(3, 0.0, 3.0);
        a.fill_pos_w(&[0.5], 6.0).unwrap();
        a.fill_pos_w(&[1.5], 4.0).unwrap();
        b.fill_pos_w(&[0.5], 3.0).unwrap();

        let ratio = &a / &b;
        assert_eq!(ratio.cells_contents(true), vec![2.0, 0.0, 0.0]);
        assert!(ratio.cells_contents(true).iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_intersect_uses_finest_resolution() {
        let mut a = hist_1d(10, 0.0, 10.0);
        let mut b = hist_1d(20, 0.0, 10.0);
        a.fill_pos(&[2.5]).unwrap();
        b.fill_pos(&[2.25]).unwrap();

        let both = a.intersect(&b).unwrap();
        assert_eq!(both.cells(), 20);
        assert_eq!(both.cell_content(4), 2.0);
        assert_eq!(both.cell_content(5), 1.0);
    }

    #[test]
    fn test_extreme_ranges_are_refused() {
        let fine = HistND::new(2, &[0.0, 0.0], &[1.0, 1.0], &[1000, 1000], "fine").unwrap();
        let wide = HistND::new(2, &[0.0, 0.0], &[1e12, 1e12], &[1, 1], "wide").unwrap();

        for op in [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul, BinaryOp::Div] {
            assert!(matches!(
                fine.try_combine(&wide, op),
                Err(Error::InvalidParameter(_))
            ));
        }
        assert!(wide.intersect(&fine).is_err());
        // at the coarse resolution the union grid stays small
        assert_eq!(wide.try_combine(&fine, BinaryOp::Add).unwrap().cells(), 1);
    }

    #[test]
    #[should_panic(expected = "cannot add histograms")]
    fn test_operator_panics_on_oversized_grid() {
        let fine = HistND::new(2, &[0.0, 0.0], &[1.0, 1.0], &[1000, 1000], "").unwrap();
        let wide = HistND::new(2, &[0.0, 0.0], &[1e12, 1e12], &[1, 1], "").unwrap();
        let _ = &fine + &wide;
    }

    #[test]
    fn test_try_combine_matches_operators() {
        let mut a = hist_1d(3, 0.0, 3.0);
        let mut b = hist_1d(3, 0.0, 3.0);
        a.fill_pos_w(&[0.5], 6.0).unwrap();
        b.fill_pos_w(&[0.5], 2.0).unwrap();
        assert_eq!(a.try_combine(&b, BinaryOp::Div).unwrap(), &a / &b);
        assert_eq!(a.try_combine(&b, BinaryOp::Sub).unwrap(), &a - &b);
    }

    #[test]
    fn test_extra_left_dimensions_are_copied() {
        let mut a = HistND::new(2, &[0.0, 0.0], &[2.0, 3.0], &[2, 3], "a").unwrap();
        a.axis_mut(1).set_title("y");
        let b = hist_1d(2, 0.0, 2.0);
        a.fill_pos(&[0.5, 2.5]).unwrap();

        let sum = &a + &b;
        assert_eq!(sum.dimension(), 2);
        assert!(sum.axis(1).same_binning(a.axis(1)));
        assert_eq!(sum.axis(1).title(), "y");
        assert_eq!(sum.cell_content(4), 1.0);
    }

    #[test]
    fn test_projection_marginal_sum() {
        let mut h = HistND::new(2, &[0.0, 0.0], &[3.0, 2.0], &[3, 2], "xy").unwrap();
        h.fill_pos(&[0.5, 0.5]).unwrap();
        h.fill_pos(&[0.5, 1.5]).unwrap();
        h.fill_pos_w(&[2.5, 1.5], 2.0).unwrap();
        h.fill_pos(&[2.5, 9.0]).unwrap();

        let px = h.projection(&[0]).unwrap();
        assert_eq!(px.title(), "Projection of xy");
        assert_eq!(px.cells_contents(true), vec![2.0, 0.0, 2.0]);
        assert_eq!(px.entries(), h.cells() as u64);

        let py = h.projection(&[1]).unwrap();
        assert_eq!(py.cells_contents(true), vec![1.0, 3.0]);

        let total: f64 = h.cells_contents(true).iter().sum();
        assert_relative_eq!(px.cells_contents(true).iter().sum::<f64>(), total);
    }

    #[test]
    fn test_projection_reorders_axes() {
        let h = HistND::new(3, &[0.0; 3], &[1.0; 3], &[2, 3, 4], "").unwrap();
        let p = h.projection(&[2, 0]).unwrap();
        assert_eq!(p.axis(0).nbins(), 4);
        assert_eq!(p.axis(1).nbins(), 2);
    }

    #[test]
    fn test_projection_errors() {
        let h = hist_1d(4, 0.0, 4.0);
        assert!(h.projection(&[]).is_err());
        assert!(h.projection(&[1]).is_err());
        assert!(h.projection(&[0, 0]).is_err());
    }
}
