//! Read-only view shared by histograms and profiles

use crate::axis::Axis;
use crate::facades::{Hist1D, Hist2D, Hist3D};
use crate::grid::HistND;
use crate::profile::{Profile1D, Profile2D, Profile3D, ProfileND};

/// Everything a consumer such as a plotting backend needs to draw binned data
///
/// For histograms the contents are sums of weights; for profiles they are the
/// per-cell means. With `include_empty == false`, edges, centers, contents and
/// errors all list the non-empty cells in the same order.
pub trait BinnedData {
    fn dimension(&self) -> usize;

    fn title(&self) -> &str;

    fn axis(&self, i: usize) -> &Axis;

    fn bins_edges(&self, include_empty: bool) -> Vec<Vec<f64>>;

    fn bins_centers(&self, include_empty: bool) -> Vec<Vec<f64>>;

    fn cells_contents(&self, include_empty: bool) -> Vec<f64>;

    fn cells_contents_errors(&self, include_empty: bool) -> Vec<f64>;

    /// Largest cell content, or `None` if there are no non-empty cells
    fn max_content(&self) -> Option<f64> {
        self.cells_contents(false).into_iter().reduce(f64::max)
    }
}

macro_rules! impl_binned_data {
    ($ty:ty => $inner:ty) => {
        impl BinnedData for $ty {
            fn dimension(&self) -> usize {
                <$inner>::dimension(self)
            }

            fn title(&self) -> &str {
                <$inner>::title(self)
            }

            fn axis(&self, i: usize) -> &Axis {
                <$inner>::axis(self, i)
            }

            fn bins_edges(&self, include_empty: bool) -> Vec<Vec<f64>> {
                <$inner>::bins_edges(self, include_empty)
            }

            fn bins_centers(&self, include_empty: bool) -> Vec<Vec<f64>> {
                <$inner>::bins_centers(self, include_empty)
            }

            fn cells_contents(&self, include_empty: bool) -> Vec<f64> {
                <$inner>::cells_contents(self, include_empty)
            }

            fn cells_contents_errors(&self, include_empty: bool) -> Vec<f64> {
                <$inner>::cells_contents_errors(self, include_empty)
            }
        }
    };
}

// Facades deref to their inner type; the qualified calls pick its inherent
// methods instead of recursing into the trait.
impl_binned_data!(HistND => HistND);
impl_binned_data!(Hist1D => HistND);
impl_binned_data!(Hist2D => HistND);
impl_binned_data!(Hist3D => HistND);
impl_binned_data!(ProfileND => ProfileND);
impl_binned_data!(Profile1D => ProfileND);
impl_binned_data!(Profile2D => ProfileND);
impl_binned_data!(Profile3D => ProfileND);
