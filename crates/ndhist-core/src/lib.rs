//! Core types shared by the ndhist crates
//!
//! This crate holds what every histogram flavour needs before it can be
//! allocated: a unified [`Error`] type and the validated construction
//! parameters ([`GridSpec`], [`AxisSpec`], [`ValueRange`], [`ProfileSpec`]).
//!
//! # Example
//!
//! ```rust
//! use ndhist_core::{GridSpec, AxisSpec};
//!
//! let spec = GridSpec::new("hits")
//!     .with_axis(10, -1.0, 1.0)
//!     .with_axis_spec(AxisSpec::new(5, 0.0, 5.0).with_title("layer"));
//!
//! spec.validate().unwrap();
//! assert_eq!(spec.cells().unwrap(), 50);
//! ```

pub mod config;
pub mod error;

pub use config::{checked_cells, AxisSpec, GridSpec, ProfileSpec, ValueRange, MAX_CELLS};
pub use error::{Error, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
