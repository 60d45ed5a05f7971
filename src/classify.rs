use crate::primitive::Primitive;

/// Squared euclidean distance between two equal-length attribute slices.
///
/// Differences are accumulated in ascending attribute order; the addition
/// order is part of the contract because it fixes the rounding behavior
/// that the reproducibility guarantees rest on. No square root: the
/// transform is monotonic and irrelevant for the argmin.
#[inline]
pub(crate) fn squared_distance<T: Primitive>(a: &[T], b: &[T]) -> T {
    a.iter().zip(b.iter()).fold(T::zero(), |sum, (&av, &bv)| {
        let diff = av - bv;
        sum + diff * diff
    })
}

/// Index of the centroid nearest to `point`, plus its squared distance.
///
/// Centroids are scanned in increasing index order and the incumbent is
/// only replaced on strict improvement, so the lowest index wins ties.
/// Reads shared state, writes nothing; safe to call concurrently for
/// different points.
#[inline]
pub(crate) fn nearest_centroid<T: Primitive>(point: &[T], centroids: &[T], dims: usize) -> (usize, T) {
    let mut best_idx = 0;
    let mut best_dist = T::infinity();
    for (idx, centroid) in centroids.chunks_exact(dims).enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < best_dist {
            best_idx = idx;
            best_dist = dist;
        }
    }
    (best_idx, best_dist)
}
