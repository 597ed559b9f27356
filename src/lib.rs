//! N-dimensional histograms and profile statistics
//!
//! This crate re-exports the ndhist workspace crates:
//!
//! - [`ndhist_core`]: error type and construction parameters
//! - [`ndhist_histogram`]: axes, histograms, profiles and their operators
//!
//! Most users only need the [`prelude`].
//!
//! # Example
//!
//! ```rust
//! use ndhist::prelude::*;
//!
//! let spec = GridSpec::new("hits").with_axis(4, 0.0, 4.0).with_axis(2, 0.0, 2.0);
//! let mut h = HistND::from_spec(&spec)?;
//! h.fill_pos(&[1.5, 0.5])?;
//! h.fill_pos_w(&[1.5, 1.5], 2.0)?;
//!
//! let px = h.projection(&[0])?;
//! assert_eq!(px.cell_content(1), 3.0);
//! # Ok::<(), ndhist::Error>(())
//! ```

pub use ndhist_core;
pub use ndhist_histogram;

pub use ndhist_core::{Error, Result};

/// Commonly used types
pub mod prelude {
    pub use ndhist_core::{AxisSpec, Error, GridSpec, ProfileSpec, Result, ValueRange};
    pub use ndhist_histogram::{
        Axis, BinaryOp, BinnedData, Fill, Hist1D, Hist2D, Hist3D, HistND, Location, Profile1D,
        Profile2D, Profile3D, ProfileND, ProfileStats, Stats,
    };
}

/// Version of the ndhist crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
