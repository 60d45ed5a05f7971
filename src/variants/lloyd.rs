use crate::api::{IterationUpdate, KMeans, KMeansConfig, KMeansState};
use crate::centroids::CentroidState;
use crate::convergence::{preflight, ControlFlow, ConvergenceController};
use crate::error::Result;
use crate::merge::merge_partials;
use crate::points::PointStore;
use crate::primitive::Primitive;
use crate::reduction::assign_points;
use tracing::debug;

pub(crate) struct Lloyd<T> {
    _p: std::marker::PhantomData<T>,
}

impl<T: Primitive> Lloyd<T> {
    /// Full Lloyd iteration: parallel assignment scan, ordered merge of
    /// the partial accumulators, convergence check; repeated until no
    /// point changes cluster or the iteration cap is reached.
    ///
    /// Iterations are strictly sequential: pass i+1 only starts after
    /// pass i's merge finished and the centroid state is stable. The
    /// parallel-iterator collect inside [`assign_points`] is the barrier
    /// between reduction and merge.
    pub fn calculate<'a, F>(
        data: &mut KMeans<T>,
        k: usize,
        max_iterations: usize,
        init: F,
        config: &KMeansConfig<'a, T>,
    ) -> Result<KMeansState<T>>
    where
        F: FnOnce(&mut PointStore<T>, &mut CentroidState<T>, &KMeansConfig<'_, T>) -> Result<()>,
    {
        let store = &mut data.store;
        preflight(store.len(), store.dims(), k, max_iterations)?;

        let pool = match config.num_threads {
            Some(num_threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build()?,
            ),
            None => None,
        };

        let mut centroids = CentroidState::new(k, store.dims());
        store.clear_assignments();
        init(store, &mut centroids, config)?;
        (config.init_done)(&centroids);
        debug!(
            points = store.len(),
            dims = store.dims(),
            k,
            max_iterations,
            "starting lloyd iteration"
        );

        let mut controller = ConvergenceController::new(max_iterations);
        let mut distsum = T::zero();
        let termination = loop {
            let partials = match &pool {
                Some(pool) => pool.install(|| assign_points(store, &centroids)),
                None => assign_points(store, &centroids),
            };
            let outcome = merge_partials(&mut centroids, &partials);
            debug_assert_eq!(centroids.counts().iter().sum::<usize>(), store.len());
            distsum = outcome.distsum;

            let update = IterationUpdate {
                iteration: controller.iterations() + 1,
                reassigned: outcome.reassigned,
                distsum,
            };
            (config.iteration_done)(&centroids, &update);
            debug!(
                iteration = update.iteration,
                reassigned = outcome.reassigned,
                "pass merged"
            );

            match controller.observe(outcome.reassigned) {
                ControlFlow::Continue => {}
                ControlFlow::Stop(termination) => break termination,
            }
        };
        debug!(iterations = controller.iterations(), ?termination, "run finished");

        // The first pass assigns every point, so the sentinel is gone here.
        let assignments = store
            .assignments()
            .iter()
            .map(|a| a.unwrap_or(0))
            .collect();

        Ok(KMeansState {
            k,
            dims: store.dims(),
            centroids: centroids.values,
            centroid_counts: centroids.counts,
            assignments,
            iterations: controller.iterations(),
            termination,
            distsum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KMeansError;
    use crate::helpers::testing::brute_force_centroids;
    use crate::Termination;
    use rand::prelude::*;

    #[test]
    fn two_blobs_converge_to_their_means() {
        let values = vec![
            0.0, 0.0, //
            0.0, 1.0, //
            1.0, 0.0, //
            10.0, 10.0, //
            10.0, 11.0, //
            11.0, 10.0,
        ];
        let store = PointStore::new(values, 6, 2).unwrap();
        let mut kmeans = KMeans::new(store);
        // One seed per blob.
        let result = kmeans
            .kmeans_lloyd(
                2,
                10,
                KMeans::init_precomputed(vec![0.0, 0.0, 10.0, 10.0]),
                &KMeansConfig::default(),
            )
            .unwrap();

        assert_eq!(result.termination, Termination::Converged);
        assert!(result.iterations <= 3);
        assert_eq!(result.centroid_counts, vec![3, 3]);
        assert_eq!(result.assignments, vec![0, 0, 0, 1, 1, 1]);
        assert_eq!(result.centroid(0), &[1.0 / 3.0, 1.0 / 3.0]);
        assert_eq!(result.centroid(1), &[31.0 / 3.0, 31.0 / 3.0]);
    }

    #[test]
    fn identical_points_collapse_onto_one_centroid() {
        let store = PointStore::new(vec![5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0], 4, 2).unwrap();
        let mut kmeans = KMeans::new(store);
        let rnd = rand::rngs::StdRng::seed_from_u64(1);
        let config = KMeansConfig::build().random_generator(rnd).build();
        let result = kmeans
            .kmeans_lloyd(1, 10, KMeans::init_random_seeds, &config)
            .unwrap();

        assert_eq!(result.termination, Termination::Converged);
        // The non-seed points still need their first assignment, which
        // counts as a change, so one confirming pass follows.
        assert!(result.iterations <= 2);
        assert_eq!(result.centroid_counts, vec![4]);
        assert_eq!(result.centroid(0), &[5.0, 5.0]);
        assert_eq!(result.distsum, 0.0);
    }

    #[test]
    fn k_equals_n_yields_singletons_in_one_pass() {
        let store = PointStore::new(vec![0.0, 0.0, 4.0, 0.0, 0.0, 4.0], 3, 2).unwrap();
        let mut kmeans = KMeans::new(store);
        let rnd = rand::rngs::StdRng::seed_from_u64(7);
        let config = KMeansConfig::build().random_generator(rnd).build();
        let result = kmeans
            .kmeans_lloyd(3, 10, KMeans::init_random_seeds, &config)
            .unwrap();

        // Every point was its own pre-assigned seed: zero reassignments.
        assert_eq!(result.termination, Termination::Converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.centroid_counts, vec![1, 1, 1]);
        assert_eq!(result.distsum, 0.0);
    }

    #[test]
    fn more_clusters_than_points_is_rejected_without_state() {
        let store = PointStore::new(vec![1.0, 2.0], 2, 1).unwrap();
        let mut kmeans = KMeans::new(store);
        let err = kmeans
            .kmeans_lloyd(3, 10, KMeans::init_random_seeds, &KMeansConfig::default())
            .unwrap_err();
        assert!(matches!(err, KMeansError::InvalidConfiguration(_)));
        // Nothing ran: the points are still untagged.
        assert!(kmeans.store().assignments().iter().all(Option::is_none));
    }

    #[test]
    fn results_are_bit_identical_for_any_worker_count() {
        let mut rnd = rand::rngs::StdRng::seed_from_u64(1337);
        let point_cnt = 3000;
        let dims = 3;
        let mut values = vec![0.0f64; point_cnt * dims];
        values.iter_mut().for_each(|v| *v = rnd.gen_range(0.0..1.0));
        let store = PointStore::new(values, point_cnt, dims).unwrap();
        let seeds: Vec<f64> = store.values()[..4 * dims].to_vec();

        let mut results = Vec::new();
        for num_threads in [1usize, 2, 5] {
            let mut kmeans = KMeans::new(store.clone());
            let config = KMeansConfig::build().num_threads(num_threads).build();
            let result = kmeans
                .kmeans_lloyd(4, 50, KMeans::init_precomputed(seeds.clone()), &config)
                .unwrap();
            results.push(result);
        }

        for other in &results[1..] {
            assert_eq!(results[0].centroids, other.centroids);
            assert_eq!(results[0].assignments, other.assignments);
            assert_eq!(results[0].centroid_counts, other.centroid_counts);
            assert_eq!(results[0].iterations, other.iterations);
            assert_eq!(results[0].distsum, other.distsum);
        }
    }

    #[test]
    fn centroids_match_a_brute_force_recomputation() {
        let mut rnd = rand::rngs::StdRng::seed_from_u64(42);
        let point_cnt = 2500;
        let dims = 4;
        let mut values = vec![0.0f64; point_cnt * dims];
        values.iter_mut().for_each(|v| *v = rnd.gen_range(-5.0..5.0));
        let store = PointStore::new(values, point_cnt, dims).unwrap();
        let seeds: Vec<f64> = store.values()[..5 * dims].to_vec();

        let mut kmeans = KMeans::new(store);
        let result = kmeans
            .kmeans_lloyd(
                5,
                100,
                KMeans::init_precomputed(seeds),
                &KMeansConfig::default(),
            )
            .unwrap();

        assert_eq!(result.centroid_counts.iter().sum::<usize>(), point_cnt);
        let (should_centroids, should_counts) = brute_force_centroids(
            kmeans.store().values(),
            &result.assignments,
            5,
            dims,
        );
        assert_eq!(result.centroid_counts, should_counts);
        for (actual, should) in result.centroids.iter().zip(&should_centroids) {
            assert_approx_eq!(*actual, *should, 1e-9);
        }
    }

    #[test]
    fn one_more_pass_after_convergence_changes_nothing() {
        let values = vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 10.0, 10.0, 10.0, 11.0, 11.0, 10.0];
        let store = PointStore::new(values, 6, 2).unwrap();
        let mut kmeans = KMeans::new(store);
        let result = kmeans
            .kmeans_lloyd(
                2,
                10,
                KMeans::init_precomputed(vec![0.0, 0.0, 10.0, 10.0]),
                &KMeansConfig::default(),
            )
            .unwrap();
        assert_eq!(result.termination, Termination::Converged);

        // Rebuild the converged state and run a single extra pass by hand.
        let mut centroids = CentroidState::new(2, 2);
        for (cluster, row) in result.centroids.chunks_exact(2).enumerate() {
            centroids.set_centroid_from_iter(cluster, row.iter().cloned());
            centroids.set_count(cluster, result.centroid_counts[cluster]);
        }
        let partials = assign_points(&mut kmeans.store, &centroids);
        let outcome = merge_partials(&mut centroids, &partials);

        assert_eq!(outcome.reassigned, 0);
        assert_eq!(centroids.as_slice(), result.centroids.as_slice());
        assert_eq!(centroids.counts(), result.centroid_counts.as_slice());
    }

    #[test]
    fn max_iterations_cap_stops_the_run() {
        // The first pass always books every unassigned point, so a cap of
        // one is reached before convergence can be confirmed.
        let mut rnd = rand::rngs::StdRng::seed_from_u64(3);
        let mut values = vec![0.0f64; 400];
        values.iter_mut().for_each(|v| *v = rnd.gen_range(0.0..100.0));
        let store = PointStore::new(values, 400, 1).unwrap();
        let seeds: Vec<f64> = store.values()[..4].to_vec();

        let mut kmeans = KMeans::new(store);
        let result = kmeans
            .kmeans_lloyd(
                4,
                1,
                KMeans::init_precomputed(seeds),
                &KMeansConfig::default(),
            )
            .unwrap();

        assert_eq!(result.termination, Termination::MaxIterationsReached);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.centroid_counts.iter().sum::<usize>(), 400);
    }
}
