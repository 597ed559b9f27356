//! Fixed-dimension histograms
//!
//! [`Hist1D`], [`Hist2D`] and [`Hist3D`] wrap a [`HistND`] of the matching
//! dimension and take coordinates as separate arguments, so the arity of a
//! fill is checked by the compiler. All read-only queries are available
//! through `Deref<Target = HistND>`. Mutation goes through the facade, which
//! keeps the dimension fixed.

use crate::grid::HistND;
use crate::ops::BinaryOp;
use crate::types::Fill;
use ndhist_core::{Error, GridSpec, Result};
use std::fmt;
use std::ops::{Add, Deref, Div, Mul, Sub};

macro_rules! facade_common {
    ($name:ident, $dim:literal) => {
        impl $name {
            /// Number of dimensions of this histogram type
            pub const DIMENSION: usize = $dim;

            /// Unwrap into the underlying N-dimensional histogram
            pub fn into_inner(self) -> HistND {
                self.inner
            }

            pub fn set_title(&mut self, title: impl Into<String>) {
                self.inner.set_title(title);
            }

            /// Set the title of axis `i`
            pub fn set_axis_title(&mut self, i: usize, title: impl Into<String>) {
                self.inner.axis_mut(i).set_title(title);
            }

            /// Multiply every cell content by `factor`, in place
            pub fn scale_mut(&mut self, factor: f64, scale_errors: bool) -> &mut Self {
                self.inner.scale_mut(factor, scale_errors);
                self
            }

            /// A scaled copy
            pub fn scaled(&self, factor: f64, scale_errors: bool) -> Self {
                Self {
                    inner: self.inner.scaled(factor, scale_errors),
                }
            }

            /// Add the accumulators of a histogram with identical binning
            pub fn merge(&mut self, other: &$name) -> Result<()> {
                self.inner.merge(&other.inner)
            }

            /// Fill cell `cell` with weight 1
            pub fn fill_cell(&mut self, cell: usize) -> Fill {
                self.inner.fill_cell(cell)
            }

            pub fn fill_cell_w(&mut self, cell: usize, w: f64) -> Fill {
                self.inner.fill_cell_w(cell, w)
            }

            /// Fill by per-axis bin indices; an index past its axis is overflow
            pub fn fill_bins(&mut self, bins: [usize; $dim]) -> Fill {
                self.fill_bins_w(bins, 1.0)
            }

            pub fn fill_bins_w(&mut self, bins: [usize; $dim], w: f64) -> Fill {
                self.inner.fill_bins_point(&bins, w)
            }

            /// Fallible form of the `+ - * /` operators
            pub fn try_combine(&self, other: &$name, op: BinaryOp) -> Result<Self> {
                Ok(Self {
                    inner: self.inner.try_combine(&other.inner, op)?,
                })
            }

            /// Sum of two histograms at the finer resolution of the two
            pub fn intersect(&self, other: &$name) -> Result<Self> {
                Ok(Self {
                    inner: self.inner.intersect(&other.inner)?,
                })
            }
        }

        impl Deref for $name {
            type Target = HistND;

            fn deref(&self) -> &HistND {
                &self.inner
            }
        }

        impl From<$name> for HistND {
            fn from(hist: $name) -> HistND {
                hist.inner
            }
        }

        impl TryFrom<HistND> for $name {
            type Error = Error;

            fn try_from(inner: HistND) -> Result<Self> {
                if inner.dimension() != $dim {
                    return Err(Error::DimensionMismatch {
                        expected: $dim,
                        actual: inner.dimension(),
                    });
                }
                Ok(Self { inner })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "{}(\"{}\", cells={}, entries={})",
                    stringify!($name),
                    self.inner.title(),
                    self.inner.cells(),
                    self.inner.entries()
                )
            }
        }

        facade_op!($name, Add, add);
        facade_op!($name, Sub, sub);
        facade_op!($name, Mul, mul);
        facade_op!($name, Div, div);
    };
}

// Both operands have the facade's dimension, so the result does too.
macro_rules! facade_op {
    ($name:ident, $trait:ident, $method:ident) => {
        /// # Panics
        ///
        /// Panics if the resampled grid would exceed the cell limit; the
        /// facade's `try_combine` returns an error instead.
        impl $trait<&$name> for &$name {
            type Output = $name;

            fn $method(self, rhs: &$name) -> $name {
                $name {
                    inner: (&self.inner).$method(&rhs.inner),
                }
            }
        }

        impl $trait for $name {
            type Output = $name;

            fn $method(self, rhs: $name) -> $name {
                (&self).$method(&rhs)
            }
        }
    };
}

/// A one-dimensional histogram
#[derive(Debug, Clone, PartialEq)]
pub struct Hist1D {
    inner: HistND,
}

impl Hist1D {
    /// `n` uniform bins on `[min, max]`
    pub fn new(n: usize, min: f64, max: f64, title: impl Into<String>) -> Result<Self> {
        let spec = GridSpec::new(title).with_axis(n, min, max);
        Ok(Self {
            inner: HistND::from_spec(&spec)?,
        })
    }

    pub fn fill(&mut self, x: f64) -> Fill {
        self.fill_w(x, 1.0)
    }

    pub fn fill_w(&mut self, x: f64, w: f64) -> Fill {
        self.inner.fill_point(&[x], w)
    }
}

facade_common!(Hist1D, 1);

/// A two-dimensional histogram
#[derive(Debug, Clone, PartialEq)]
pub struct Hist2D {
    inner: HistND,
}

impl Hist2D {
    /// `nx` by `ny` uniform bins on `[xmin, xmax] x [ymin, ymax]`
    pub fn new(
        nx: usize,
        xmin: f64,
        xmax: f64,
        ny: usize,
        ymin: f64,
        ymax: f64,
        title: impl Into<String>,
    ) -> Result<Self> {
        let spec = GridSpec::new(title)
            .with_axis(nx, xmin, xmax)
            .with_axis(ny, ymin, ymax);
        Ok(Self {
            inner: HistND::from_spec(&spec)?,
        })
    }

    pub fn fill(&mut self, x: f64, y: f64) -> Fill {
        self.fill_w(x, y, 1.0)
    }

    pub fn fill_w(&mut self, x: f64, y: f64, w: f64) -> Fill {
        self.inner.fill_point(&[x, y], w)
    }

    /// Marginal over y
    pub fn projection_x(&self) -> Hist1D {
        Hist1D {
            inner: self.inner.project(&[0]),
        }
    }

    /// Marginal over x
    pub fn projection_y(&self) -> Hist1D {
        Hist1D {
            inner: self.inner.project(&[1]),
        }
    }
}

facade_common!(Hist2D, 2);

/// A three-dimensional histogram
#[derive(Debug, Clone, PartialEq)]
pub struct Hist3D {
    inner: HistND,
}

impl Hist3D {
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
        title: impl Into<String>,
    ) -> Result<Self> {
        let spec = GridSpec::new(title)
            .with_axis(nx, xmin, xmax)
            .with_axis(ny, ymin, ymax)
            .with_axis(nz, zmin, zmax);
        Ok(Self {
            inner: HistND::from_spec(&spec)?,
        })
    }

    pub fn fill(&mut self, x: f64, y: f64, z: f64) -> Fill {
        self.fill_w(x, y, z, 1.0)
    }

    pub fn fill_w(&mut self, x: f64, y: f64, z: f64, w: f64) -> Fill {
        self.inner.fill_point(&[x, y, z], w)
    }

    pub fn projection_x(&self) -> Hist1D {
        self.project_1d(0)
    }

    pub fn projection_y(&self) -> Hist1D {
        self.project_1d(1)
    }

    pub fn projection_z(&self) -> Hist1D {
        self.project_1d(2)
    }

    pub fn projection_xy(&self) -> Hist2D {
        self.project_2d(0, 1)
    }

    pub fn projection_xz(&self) -> Hist2D {
        self.project_2d(0, 2)
    }

    pub fn projection_yz(&self) -> Hist2D {
        self.project_2d(1, 2)
    }

    fn project_1d(&self, d: usize) -> Hist1D {
        Hist1D {
            inner: self.inner.project(&[d]),
        }
    }

    fn project_2d(&self, a: usize, b: usize) -> Hist2D {
        Hist2D {
            inner: self.inner.project(&[a, b]),
        }
    }
}

facade_common!(Hist3D, 3);
