//! N-dimensional binned grids: histograms and profiles
//!
//! This crate implements a rectangular histogram of any dimension, stored as
//! one flat array of cells, together with the fill protocol, per-cell
//! queries, integrals and the operators that derive new histograms from
//! existing ones.
//!
//! # Key Features
//!
//! - **Any dimension**: [`HistND`] with uniform or variable-width [`Axis`]
//! - **Fixed-dimension facades**: [`Hist1D`], [`Hist2D`], [`Hist3D`] with
//!   compile-time fill arity
//! - **Profiles**: [`ProfileND`] and its facades report the mean value per cell
//! - **Arithmetic**: `+ - * /` resample both operands onto a common grid
//! - **Projection**: marginal histograms over any subset of dimensions
//! - **Parallel filling** (feature `parallel`): shard points across rayon
//!   workers and merge the partial histograms
//!
//! # Examples
//!
//! ## Filling and querying
//!
//! ```rust
//! use ndhist_histogram::{Fill, Hist1D};
//!
//! let mut h = Hist1D::new(10, -1.0, 1.0, "residuals").unwrap();
//! assert_eq!(h.fill(0.05), Fill::Filled(5));
//! assert_eq!(h.fill(3.0), Fill::Overflow);
//!
//! assert_eq!(h.cell_content(5), 1.0);
//! assert_eq!(h.cell_content_error(5), 1.0);
//! assert_eq!(h.overflow(), 1);
//! ```
//!
//! ## Projections
//!
//! ```rust
//! use ndhist_histogram::Hist2D;
//!
//! let mut h = Hist2D::new(4, 0.0, 4.0, 2, 0.0, 2.0, "xy").unwrap();
//! h.fill(0.5, 0.5);
//! h.fill(0.5, 1.5);
//! h.fill(3.5, 1.5);
//!
//! let px = h.projection_x();
//! assert_eq!(px.cells_contents(true), vec![2.0, 0.0, 0.0, 1.0]);
//! assert_eq!(px.title(), "Projection of xy");
//! ```
//!
//! ## Profiles
//!
//! ```rust
//! use ndhist_histogram::{Profile1D, ValueRange};
//!
//! let mut p = Profile1D::new(1, 0.0, 10.0, ValueRange::unbounded(), "mean").unwrap();
//! for value in [2.0, 4.0, 6.0] {
//!     p.fill(5.0, value);
//! }
//! assert_eq!(p.cell_content(0), 4.0);
//! ```

pub mod axis;
pub mod facades;
pub mod grid;
pub mod ops;
pub mod profile;
pub mod traits;
pub mod types;

pub use axis::Axis;
pub use facades::{Hist1D, Hist2D, Hist3D};
pub use grid::HistND;
pub use ops::BinaryOp;
pub use profile::{Profile1D, Profile2D, Profile3D, ProfileND};
pub use traits::BinnedData;
pub use types::{Fill, Location, ProfileStats, Stats};

// Re-export core types for convenience
pub use ndhist_core::{AxisSpec, Error, GridSpec, ProfileSpec, Result, ValueRange, MAX_CELLS};
