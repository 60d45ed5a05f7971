use kmeans_par::*;

fn main() {
    let (point_cnt, dims, k, max_iterations) = (20000, 200, 4, 2500);

    // Generate some random data
    let mut values = vec![0.0f64; point_cnt * dims];
    values.iter_mut().for_each(|v| *v = rand::random());

    let conf = KMeansConfig::build()
        .init_done(&|_| println!("Initialization completed."))
        .iteration_done(&|_, update| {
            println!(
                "Iteration {} - Reassigned: {} | Error: {:.2}",
                update.iteration, update.reassigned, update.distsum
            )
        })
        .build();

    let store = PointStore::new(values, point_cnt, dims).unwrap();
    let mut kmeans = KMeans::new(store);
    let result = kmeans
        .kmeans_lloyd(k, max_iterations, KMeans::init_random_seeds, &conf)
        .unwrap();

    println!("Centroids: {:?}", result.centroids);
    println!("Cluster-Assignments: {:?}", result.assignments);
    println!("Error: {}", result.distsum);
}
