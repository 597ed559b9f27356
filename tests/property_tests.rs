//! Property-based tests for binning, filling and derived histograms

use ndhist::prelude::*;
use proptest::prelude::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

fn arb_axis() -> impl Strategy<Value = (usize, f64, f64)> {
    (1usize..50, -100.0f64..100.0, 0.1f64..100.0).prop_map(|(n, min, width)| (n, min, min + width))
}

proptest! {
    // Property: lookup is monotonic and always lands on a valid bin
    #[test]
    fn prop_axis_lookup_monotonic((n, min, max) in arb_axis(), a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let axis = Axis::uniform(n, min, max).unwrap();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let x1 = (min + lo * (max - min)).clamp(min, max);
        let x2 = (min + hi * (max - min)).clamp(min, max);

        let b1 = axis.bin(x1).unwrap();
        let b2 = axis.bin(x2).unwrap();
        prop_assert!(b1 <= b2);
        prop_assert!(b2 < n);
        prop_assert_eq!(axis.bin(max), Some(n - 1));
        prop_assert_eq!(axis.bin(min), Some(0));
    }

    // Property: cell -> bins -> cell is the identity
    #[test]
    fn prop_cell_index_round_trip(nbins in prop::collection::vec(1usize..7, 1..4)) {
        let dim = nbins.len();
        let h = HistND::new(dim, &vec![0.0; dim], &vec![1.0; dim], &nbins, "").unwrap();
        prop_assert_eq!(h.cells(), nbins.iter().product::<usize>());
        for cell in 0..h.cells() {
            let bins = h.cell_to_bins(cell).unwrap();
            for (bin, n) in bins.iter().zip(&nbins) {
                prop_assert!(bin < n);
            }
            prop_assert_eq!(h.bins_to_cell(&bins), cell);
        }
        prop_assert_eq!(h.cell_to_bins(h.cells()), None);
    }

    // Property: the cell contents add up to the global sum of weights
    #[test]
    fn prop_contents_sum_to_sum_of_weights(
        points in prop::collection::vec((-2.0f64..2.0, -2.0f64..2.0, 0.0f64..5.0), 0..200)
    ) {
        let mut h = Hist2D::new(7, -1.0, 1.0, 5, -1.0, 1.0, "").unwrap();
        let mut accepted = 0u64;
        for &(x, y, w) in &points {
            if h.fill_w(x, y, w).is_filled() {
                accepted += 1;
            }
        }
        let total: f64 = h.cells_contents(true).iter().sum();
        prop_assert!(close(total, h.sum_of_weights()));
        prop_assert_eq!(h.entries(), accepted);
        prop_assert_eq!(h.entries() + h.underflow() + h.overflow(), points.len() as u64);
    }

    // Property: scaling multiplies contents by k and errors by |k|
    #[test]
    fn prop_scale_law(
        xs in prop::collection::vec(0.0f64..10.0, 1..100),
        k in -5.0f64..5.0
    ) {
        let mut h = Hist1D::new(10, 0.0, 10.0, "").unwrap();
        for &x in &xs {
            h.fill(x);
        }
        let scaled = h.scaled(k, false);
        prop_assert_eq!(scaled.entries(), h.entries());
        for i in 0..h.cells() {
            prop_assert!(close(scaled.cell_content(i), k * h.cell_content(i)));
            prop_assert!(close(scaled.cell_content_error(i), k.abs() * h.cell_content_error(i)));
        }
    }

    // Property: a projection keeps the total content
    #[test]
    fn prop_projection_marginal_sum(
        points in prop::collection::vec((0.0f64..3.0, -1.0f64..5.0), 0..200)
    ) {
        let mut h = Hist2D::new(6, 0.0, 3.0, 4, 0.0, 4.0, "").unwrap();
        for &(x, y) in &points {
            h.fill(x, y);
        }
        let total: f64 = h.cells_contents(true).iter().sum();
        for projected in [h.projection_x(), h.projection_y()] {
            let sum: f64 = projected.cells_contents(true).iter().sum();
            prop_assert!(close(sum, total));
        }
    }

    // Property: dividing by an empty histogram gives zeros, never inf or NaN
    #[test]
    fn prop_division_by_empty_is_zero(xs in prop::collection::vec(0.0f64..1.0, 0..50)) {
        let mut numerator = Hist1D::new(5, 0.0, 1.0, "").unwrap();
        for &x in &xs {
            numerator.fill(x);
        }
        let denominator = Hist1D::new(5, 0.0, 1.0, "").unwrap();
        let ratio = &numerator / &denominator;
        prop_assert!(ratio.cells_contents(true).iter().all(|&v| v == 0.0));
    }
}
