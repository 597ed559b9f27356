//! Demonstrates filling, arithmetic, projection and profiles on sampled data

use ndhist_histogram::{BinnedData, Hist1D, Hist2D, Profile1D, ValueRange};
use rand::prelude::*;
use rand_distr::Normal;

fn main() {
    let mut rng = StdRng::seed_from_u64(42);
    let signal = Normal::new(0.0, 0.5).unwrap();
    let background = Normal::new(1.0, 2.0).unwrap();

    // Example 1: two 1D histograms with different ranges and resolutions
    println!("=== Arithmetic ===");
    let mut narrow = Hist1D::new(20, -2.0, 2.0, "signal").unwrap();
    let mut wide = Hist1D::new(12, -4.0, 8.0, "background").unwrap();
    for _ in 0..5000 {
        narrow.fill(signal.sample(&mut rng));
        wide.fill(background.sample(&mut rng));
    }
    println!("{narrow}");
    println!("{wide}");

    let sum = &narrow + &wide;
    println!(
        "sum: {} bins over [{:.1}, {:.1}], entries={}",
        sum.axis(0).nbins(),
        sum.axis(0).min_bin(),
        sum.axis(0).max_bin(),
        sum.entries()
    );
    match narrow.intersect(&wide) {
        Ok(finest) => println!("intersect: {} bins", finest.axis(0).nbins()),
        Err(err) => println!("intersect failed: {err}"),
    }

    let ratio = &narrow / &wide;
    for (x, r) in ratio.bins_centers(true)[0].iter().zip(ratio.cells_contents(true)) {
        if r != 0.0 {
            println!("  x={x:>5.2}  signal/background={r:.3}");
        }
    }

    // Example 2: a 2D histogram and its marginals
    println!("\n=== Projection ===");
    let mut xy = Hist2D::new(8, -2.0, 2.0, 8, -2.0, 2.0, "xy").unwrap();
    for _ in 0..10000 {
        let x = signal.sample(&mut rng);
        let y = 0.5 * x + signal.sample(&mut rng);
        xy.fill(x, y);
    }
    let px = xy.projection_x();
    println!(
        "{}: mean x = {:.3}, std x = {:.3}, underflow={}, overflow={}",
        px.title(),
        xy.mean(0),
        xy.std_dev(0),
        xy.underflow(),
        xy.overflow()
    );
    println!("integral of projection: {:.1}", px.integral_all());

    // Example 3: profile of y against x with a value filter
    println!("\n=== Profile ===");
    let mut profile = Profile1D::new(8, -2.0, 2.0, ValueRange::new(-3.0, 3.0), "<y>(x)").unwrap();
    let mut rejected = 0;
    for _ in 0..10000 {
        let x = signal.sample(&mut rng);
        let y = 0.5 * x + background.sample(&mut rng);
        if profile.fill(x, y) == ndhist_histogram::Fill::Rejected {
            rejected += 1;
        }
    }
    println!("rejected {rejected} values outside [-3, 3]");
    let centers = &profile.bins_centers(true)[0];
    for (i, x) in centers.iter().enumerate() {
        println!(
            "  x={x:>5.2}  <y>={:.3} +- {:.3}",
            profile.cell_content(i),
            profile.cell_content_error(i)
        );
    }
    println!("largest mean: {:?}", profile.max_content());
}
