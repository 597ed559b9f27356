//! Core value types: lookup results, fill outcomes and summary statistics

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a coordinate (or a point) lands relative to a binned range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// Below the lower edge
    Underflow,
    /// Inside the range: a bin index on an axis, a cell index on a grid
    Inside(usize),
    /// Above the upper edge, or not comparable (NaN)
    Overflow,
}

impl Location {
    /// The bin or cell index, if inside
    pub fn inside(self) -> Option<usize> {
        match self {
            Location::Inside(i) => Some(i),
            _ => None,
        }
    }
}

/// Outcome of a single fill call
///
/// Every fill path reports what happened to the entry instead of a sentinel
/// index. Only [`Fill::Filled`] means the weight accumulators changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fill {
    /// Accumulated into the given cell
    Filled(usize),
    /// Outside the grid, below the range of some axis; counted as underflow
    Underflow,
    /// Outside the grid, above the range of some axis or past the last cell;
    /// counted as overflow
    Overflow,
    /// Refused by a profile value filter; nothing was counted
    Rejected,
}

impl Fill {
    /// The affected cell, if the entry was accumulated
    pub fn cell(self) -> Option<usize> {
        match self {
            Fill::Filled(cell) => Some(cell),
            _ => None,
        }
    }

    pub fn is_filled(self) -> bool {
        matches!(self, Fill::Filled(_))
    }
}

impl From<Location> for Fill {
    fn from(location: Location) -> Self {
        match location {
            Location::Underflow => Fill::Underflow,
            Location::Inside(cell) => Fill::Filled(cell),
            Location::Overflow => Fill::Overflow,
        }
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fill::Filled(cell) => write!(f, "filled cell {cell}"),
            Fill::Underflow => write!(f, "underflow"),
            Fill::Overflow => write!(f, "overflow"),
            Fill::Rejected => write!(f, "rejected"),
        }
    }
}

/// Global accumulators of a histogram
///
/// Serializes with the keys `Entries`, `Underflow`, `Overflow`, `SumWeights`,
/// `SumWeights2`, `SumWeightsX` and `SumWeightsX2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Stats {
    /// Number of accepted fills
    pub entries: u64,
    pub underflow: u64,
    pub overflow: u64,
    /// Sum of weights
    pub sum_weights: f64,
    /// Sum of squared weights
    pub sum_weights2: f64,
    /// Per-axis sum of weight * coordinate
    pub sum_weights_x: Vec<f64>,
    /// Per-axis sum of weight * coordinate^2
    pub sum_weights_x2: Vec<f64>,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entries={}, underflow={}, overflow={}, sum_w={:.3}, sum_w2={:.3}",
            self.entries, self.underflow, self.overflow, self.sum_weights, self.sum_weights2
        )
    }
}

/// Global accumulators of a profile: the histogram ones plus the value sums
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileStats {
    #[serde(flatten)]
    pub histogram: Stats,
    /// Sum of weight * value
    pub sum_weighted_values: f64,
    /// Sum of weight * value^2
    pub sum_weighted_values2: f64,
}
