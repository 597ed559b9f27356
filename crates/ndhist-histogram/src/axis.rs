//! A single histogram dimension: bin-edge table, lookup and bin geometry

use crate::types::Location;
use ndhist_core::{AxisSpec, Error, Result};
use std::fmt;

/// Bin edges of one histogram dimension
///
/// Holds `nbins + 1` strictly ascending edges. Bin `i` covers
/// `[edges[i], edges[i + 1])`, except the last bin which also contains the
/// upper edge of the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    edges: Vec<f64>,
    title: String,
}

impl Axis {
    /// Create an axis with `nbins` equal-width bins covering `[min, max]`
    ///
    /// Fails if the bins are too narrow to be told apart at the magnitude of
    /// the range, i.e. if subdivision does not give strictly ascending edges.
    pub fn uniform(nbins: usize, min: f64, max: f64) -> Result<Self> {
        AxisSpec::new(nbins, min, max).validate(0)?;
        Self::subdivide(nbins, min, max, 0)
    }

    /// Create an axis from a validated spec, keeping its title
    pub fn from_spec(spec: &AxisSpec, index: usize) -> Result<Self> {
        spec.validate(index)?;
        Ok(Self::subdivide(spec.bins, spec.min, spec.max, index)?.with_title(spec.title.clone()))
    }

    /// Create an axis with variable-width bins from an explicit edge table
    pub fn from_edges(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(Error::InvalidParameter(format!(
                "An axis needs at least 2 edges, got {}",
                edges.len()
            )));
        }
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(Error::non_finite("bin edges"));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidInput(
                "Bin edges must be strictly ascending".to_string(),
            ));
        }
        Ok(Self {
            edges,
            title: String::new(),
        })
    }

    /// Lower edges from uniform subdivision, then the exact upper edge
    fn subdivide(nbins: usize, min: f64, max: f64, index: usize) -> Result<Self> {
        let width = (max - min) / nbins as f64;
        let mut edges: Vec<f64> = (0..nbins).map(|i| min + i as f64 * width).collect();
        edges.push(max);
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidParameter(format!(
                "Axis {index}: {nbins} bins on [{min}, {max}] are narrower than the float resolution"
            )));
        }
        Ok(Self {
            edges,
            title: String::new(),
        })
    }

    /// Set the title, builder style
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Lower edge of the first bin
    pub fn min_bin(&self) -> f64 {
        self.edges[0]
    }

    /// Upper edge of the last bin
    pub fn max_bin(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// Number of bins
    pub fn nbins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Bins per unit length: `nbins / (max_bin - min_bin)`
    ///
    /// Always finite and positive, since construction rejects empty ranges.
    pub fn density(&self) -> f64 {
        self.nbins() as f64 / (self.max_bin() - self.min_bin())
    }

    /// Resolve a coordinate to its bin, or to the side of the axis it falls off
    ///
    /// NaN is reported as [`Location::Overflow`].
    pub fn locate(&self, x: f64) -> Location {
        if x.is_nan() || x > self.max_bin() {
            return Location::Overflow;
        }
        if x < self.min_bin() {
            return Location::Underflow;
        }
        // edges[0] <= x here, so the partition point is at least 1
        let upper = self.edges.partition_point(|&edge| edge <= x);
        Location::Inside((upper - 1).min(self.nbins() - 1))
    }

    /// Index of the bin containing `x`, or `None` outside `[min_bin, max_bin]`
    ///
    /// `x == max_bin` resolves to the last bin.
    pub fn bin(&self, x: f64) -> Option<usize> {
        self.locate(x).inside()
    }

    /// Width of bin `i`
    ///
    /// The last bin reports the width of the one before it (its own width on
    /// a single-bin axis). Indices past the axis have zero width.
    pub fn bin_width(&self, i: usize) -> f64 {
        let n = self.nbins();
        if i + 1 < n {
            self.edges[i + 1] - self.edges[i]
        } else if i + 1 == n {
            if n > 1 {
                self.bin_width(i - 1)
            } else {
                self.edges[1] - self.edges[0]
            }
        } else {
            0.0
        }
    }

    /// Center of bin `i`
    ///
    /// # Panics
    ///
    /// Panics if `i > nbins`.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.edges[i] + 0.5 * self.bin_width(i)
    }

    /// Lower edge of bin `i`
    pub fn bin_lower_edge(&self, i: usize) -> f64 {
        self.edges[i]
    }

    /// Upper edge of bin `i`
    pub fn bin_upper_edge(&self, i: usize) -> f64 {
        self.edges[i + 1]
    }

    /// All `nbins + 1` edges
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Centers of all bins
    pub fn centers(&self) -> Vec<f64> {
        (0..self.nbins()).map(|i| self.bin_center(i)).collect()
    }

    /// Whether both axes have exactly the same edges (titles are ignored)
    pub fn same_binning(&self, other: &Axis) -> bool {
        self.edges == other.edges
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Axis(\"{}\", {} bins, [{:.3}, {:.3}])",
            self.title,
            self.nbins(),
            self.min_bin(),
            self.max_bin()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_axis() {
        let axis = Axis::uniform(10, -1.0, 1.0).unwrap();
        assert_eq!(axis.nbins(), 10);
        assert_eq!(axis.edges().len(), 11);
        assert_eq!(axis.min_bin(), -1.0);
        assert_eq!(axis.max_bin(), 1.0);
        assert_relative_eq!(axis.density(), 5.0);
        assert_relative_eq!(axis.bin_width(3), 0.2, epsilon = 1e-12);
        assert_relative_eq!(axis.bin_center(0), -0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_axes() {
        assert!(Axis::uniform(0, 0.0, 1.0).is_err());
        assert!(matches!(
            Axis::uniform(5, 1.0, 1.0),
            Err(Error::DegenerateAxis { .. })
        ));
        assert!(Axis::uniform(5, 1.0, f64::NAN).is_err());
        assert!(Axis::from_edges(vec![0.0]).is_err());
        assert!(Axis::from_edges(vec![0.0, 1.0, 1.0]).is_err());
        assert!(Axis::from_edges(vec![0.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn test_unresolvable_bins_rejected() {
        // the float spacing at 1e16 is 2, so unit-width bins collapse
        assert!(matches!(
            Axis::uniform(8, 1e16, 1e16 + 8.0),
            Err(Error::InvalidParameter(_))
        ));
        let spec = AxisSpec::new(8, 1e16, 1e16 + 8.0);
        assert!(Axis::from_spec(&spec, 2).is_err());

        let coarse = Axis::uniform(4, 1e16, 1e16 + 8.0).unwrap();
        assert!(coarse.edges().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_bin_lookup() {
        let axis = Axis::uniform(10, -1.0, 1.0).unwrap();
        assert_eq!(axis.bin(-1.0), Some(0));
        assert_eq!(axis.bin(0.05), Some(5));
        assert_eq!(axis.bin(0.0), Some(5));
        assert_eq!(axis.bin(1.0), Some(9));
        assert_eq!(axis.bin(-1.000001), None);
        assert_eq!(axis.bin(1.000001), None);
        assert_eq!(axis.bin(f64::NAN), None);

        assert_eq!(axis.locate(-2.0), Location::Underflow);
        assert_eq!(axis.locate(2.0), Location::Overflow);
        assert_eq!(axis.locate(f64::NAN), Location::Overflow);
    }

    #[test]
    fn test_interior_edges_belong_to_upper_bin() {
        let axis = Axis::from_edges(vec![0.0, 1.0, 3.0, 6.0]).unwrap();
        assert_eq!(axis.bin(1.0), Some(1));
        assert_eq!(axis.bin(2.999), Some(1));
        assert_eq!(axis.bin(3.0), Some(2));
        assert_eq!(axis.bin(6.0), Some(2));
    }

    #[test]
    fn test_last_bin_width_fallback() {
        let axis = Axis::from_edges(vec![0.0, 1.0, 3.0, 6.0]).unwrap();
        assert_eq!(axis.bin_width(0), 1.0);
        assert_eq!(axis.bin_width(1), 2.0);
        // last bin reports the width of the second-to-last bin
        assert_eq!(axis.bin_width(2), 2.0);
        assert_eq!(axis.bin_width(3), 0.0);
        assert_eq!(axis.bin_center(2), 4.0);

        let single = Axis::uniform(1, 0.0, 10.0).unwrap();
        assert_eq!(single.bin_width(0), 10.0);
        assert_eq!(single.bin_center(0), 5.0);
    }

    #[test]
    fn test_centers_and_edges() {
        let axis = Axis::uniform(4, 0.0, 4.0).unwrap().with_title("x");
        assert_eq!(axis.centers(), vec![0.5, 1.5, 2.5, 3.5]);
        assert_eq!(axis.bin_lower_edge(1), 1.0);
        assert_eq!(axis.bin_upper_edge(1), 2.0);
        assert_eq!(axis.title(), "x");
        assert_eq!(axis.to_string(), "Axis(\"x\", 4 bins, [0.000, 4.000])");
    }

    #[test]
    fn test_same_binning_ignores_title() {
        let a = Axis::uniform(4, 0.0, 4.0).unwrap().with_title("a");
        let b = Axis::uniform(4, 0.0, 4.0).unwrap();
        let c = Axis::uniform(5, 0.0, 4.0).unwrap();
        assert!(a.same_binning(&b));
        assert!(!a.same_binning(&c));
    }

    mod properties {
        use crate::axis::Axis;
        use proptest::prelude::*;

        proptest! {
            // Property: the located bin brackets the coordinate
            #[test]
            fn prop_bin_brackets_coordinate(
                n in 1usize..100,
                min in -1e3f64..1e3,
                width in 1e-3f64..1e3,
                t in 0.0f64..1.0
            ) {
                let axis = Axis::uniform(n, min, min + width).unwrap();
                let x = (min + t * (axis.max_bin() - min)).min(axis.max_bin());
                let bin = axis.bin(x).unwrap();
                prop_assert!(axis.bin_lower_edge(bin) <= x);
                prop_assert!(bin == n - 1 || x < axis.bin_upper_edge(bin));
            }
        }
    }
}
