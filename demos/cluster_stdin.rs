//! Cluster a dataset piped in on stdin.
//!
//! Expects the `N D K max_iterations has_names` header format, e.g.:
//! `cargo run --example cluster_stdin < dataset.txt`

use kmeans_par::*;
use std::io;

fn main() -> Result<()> {
    let stdin = io::stdin();
    let Dataset { header, points } = read_dataset::<f64, _>(stdin.lock())?;

    let mut kmeans = KMeans::new(points);
    let result = kmeans.kmeans_lloyd(
        header.k,
        header.max_iterations,
        KMeans::init_random_seeds,
        &KMeansConfig::default(),
    )?;

    println!("Break in iteration {}\n", result.iterations);
    for cluster in 0..result.k {
        print!("Cluster {}: ", cluster + 1);
        for value in result.centroid(cluster) {
            print!("{value} ");
        }
        println!("({} points)\n", result.centroid_counts[cluster]);
    }
    Ok(())
}
