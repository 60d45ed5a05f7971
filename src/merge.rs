//! Fold of per-block partial results into the global centroid state.

use crate::centroids::CentroidState;
use crate::primitive::Primitive;
use crate::reduction::PartialAccumulator;

/// Merged view of one iteration, handed to the convergence controller.
pub(crate) struct MergeOutcome<T: Primitive> {
    pub(crate) reassigned: usize,
    pub(crate) distsum: T,
}

/// Fold all of an iteration's accumulators into `centroids` and recompute
/// the centroid matrix.
///
/// The fold visits accumulators in ascending block order. Counts are
/// merged before any attribute work so the divisions in the final step see
/// the true membership of every cluster, even when a cluster both gained
/// and lost points within the same pass. Clusters that end the pass empty
/// keep their previous centroid untouched.
pub(crate) fn merge_partials<T: Primitive>(
    centroids: &mut CentroidState<T>,
    partials: &[PartialAccumulator<T>],
) -> MergeOutcome<T> {
    let k = centroids.k();
    let dims = centroids.dims();

    // Step 1: membership counts from the signed deltas.
    let mut reassigned = 0;
    for acc in partials {
        reassigned += acc.reassigned;
        centroids
            .counts
            .iter_mut()
            .zip(&acc.count_deltas)
            .for_each(|(count, delta)| {
                let updated = *count as i64 + delta;
                debug_assert!(updated >= 0, "cluster count went negative");
                *count = updated as usize;
            });
    }

    // Step 2: this iteration's attribute totals, same fixed order.
    let mut totals = vec![T::zero(); k * dims];
    let mut distsum = T::zero();
    for acc in partials {
        totals
            .iter_mut()
            .zip(&acc.sums)
            .for_each(|(total, sum)| *total += *sum);
        distsum += acc.distsum;
    }

    // Step 3: attribute-sum / count for every populated cluster.
    for cluster in 0..k {
        let count = centroids.counts[cluster];
        if count == 0 {
            continue;
        }
        let denom = T::from(count).unwrap();
        centroids.values[cluster * dims..(cluster + 1) * dims]
            .iter_mut()
            .zip(&totals[cluster * dims..(cluster + 1) * dims])
            .for_each(|(cv, total)| *cv = *total / denom);
    }

    MergeOutcome { reassigned, distsum }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::PointStore;
    use crate::reduction::assign_points;

    #[test]
    fn counts_fold_signed_deltas_onto_previous_counts() {
        let mut store = PointStore::new(vec![0.5, 9.5], 2, 1).unwrap();
        // Both points currently booked on cluster 0.
        store.assign(0, 0);
        store.assign(1, 0);
        let mut centroids = CentroidState::new(2, 1);
        centroids.set_centroid_from_iter(0, [0.0].into_iter());
        centroids.set_centroid_from_iter(1, [10.0].into_iter());
        centroids.set_count(0, 2);

        let partials = assign_points(&mut store, &centroids);
        let outcome = merge_partials(&mut centroids, &partials);

        assert_eq!(outcome.reassigned, 1);
        assert_eq!(centroids.counts(), &[1, 1]);
        assert_eq!(centroids.centroid(0), &[0.5]);
        assert_eq!(centroids.centroid(1), &[9.5]);
    }

    #[test]
    fn empty_clusters_keep_their_previous_centroid() {
        let mut store = PointStore::new(vec![1.0, 2.0, 3.0], 3, 1).unwrap();
        let mut centroids = CentroidState::new(2, 1);
        centroids.set_centroid_from_iter(0, [2.0].into_iter());
        // Far-off centroid that attracts nothing.
        centroids.set_centroid_from_iter(1, [1337.0].into_iter());

        let partials = assign_points(&mut store, &centroids);
        merge_partials(&mut centroids, &partials);

        assert_eq!(centroids.counts(), &[3, 0]);
        assert_eq!(centroids.centroid(0), &[2.0]);
        assert_eq!(centroids.centroid(1), &[1337.0]);
    }

    #[test]
    fn counts_sum_to_the_point_count_after_every_merge() {
        let values: Vec<f64> = (0..500).map(|i| (i % 37) as f64).collect();
        let mut store = PointStore::new(values, 500, 1).unwrap();
        let mut centroids = CentroidState::new(3, 1);
        centroids.set_centroid_from_iter(0, [0.0].into_iter());
        centroids.set_centroid_from_iter(1, [18.0].into_iter());
        centroids.set_centroid_from_iter(2, [36.0].into_iter());

        for _ in 0..4 {
            let partials = assign_points(&mut store, &centroids);
            merge_partials(&mut centroids, &partials);
            assert_eq!(centroids.counts().iter().sum::<usize>(), 500);
        }
    }

    #[test]
    fn populated_centroids_equal_the_member_mean() {
        let mut store = PointStore::new(vec![0.0, 1.0, 1.0, 0.0, 10.0, 10.0], 3, 2).unwrap();
        let mut centroids = CentroidState::new(2, 2);
        centroids.set_centroid_from_iter(0, [0.0, 0.0].into_iter());
        centroids.set_centroid_from_iter(1, [10.0, 10.0].into_iter());

        let partials = assign_points(&mut store, &centroids);
        merge_partials(&mut centroids, &partials);

        assert_eq!(centroids.counts(), &[2, 1]);
        assert_eq!(centroids.centroid(0), &[0.5, 0.5]);
        assert_eq!(centroids.centroid(1), &[10.0, 10.0]);
    }
}
