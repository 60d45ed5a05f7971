use kmeans_par::*;
use rand::prelude::*;

fn main() {
    let (blob_cnt, points_per_blob, dims, max_iterations) = (4, 5000, 8, 100);

    // Generate some well-separated random blobs
    let mut rnd = rand::rngs::StdRng::seed_from_u64(1337);
    let mut values = Vec::with_capacity(blob_cnt * points_per_blob * dims);
    for blob in 0..blob_cnt {
        let center = (blob * 10) as f64;
        for _ in 0..points_per_blob * dims {
            values.push(center + rnd.gen_range(-1.0..1.0));
        }
    }

    let store = PointStore::new(values, blob_cnt * points_per_blob, dims).unwrap();
    let mut kmeans = KMeans::new(store);
    let config = KMeansConfig::build().random_generator(rnd).build();
    let result = kmeans
        .kmeans_lloyd(blob_cnt, max_iterations, KMeans::init_random_seeds, &config)
        .unwrap();

    println!("Terminated after {} iterations: {:?}", result.iterations, result.termination);
    for cluster in 0..result.k {
        println!(
            "Cluster {} ({} points): {:?}",
            cluster,
            result.centroid_counts[cluster],
            result.centroid(cluster)
        );
    }
    println!("Error: {}", result.distsum);
}
