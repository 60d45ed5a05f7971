//! Parallel assignment scan with thread-local accumulation.
//!
//! The point indices are split into contiguous fixed-size blocks, one
//! reduction task per block. Every task owns its block's slice of the
//! assignment array exclusively (split via `par_chunks_mut`, so the
//! mutual exclusion is by construction, not by locking) and accumulates
//! into its own [`PartialAccumulator`]. The centroid state is read-only
//! for the whole pass; nothing in the hot loop touches shared mutable
//! state.

use crate::centroids::CentroidState;
use crate::classify::nearest_centroid;
use crate::points::PointStore;
use crate::primitive::Primitive;
use rayon::prelude::*;

/// Points per reduction block.
///
/// Blocks are fixed-size rather than one-per-thread: the block boundaries
/// determine the floating-point summation tree, and keeping them
/// independent of the executing pool keeps results bit-identical for any
/// worker-thread count.
pub(crate) const BLOCK_POINTS: usize = 1024;

/// Accumulation buffer owned by exactly one reduction task for exactly
/// one iteration; created zeroed at iteration start, consumed by the
/// merge stage, never shared.
#[derive(Clone, Debug)]
pub(crate) struct PartialAccumulator<T: Primitive> {
    /// K x D attribute sums, row-major like the centroid matrix.
    pub(crate) sums: Vec<T>,
    /// Signed membership changes per cluster. A point entering cluster
    /// `c` adds +1, a point leaving it adds -1; summation commutes, so
    /// merge order cannot skew the counts.
    pub(crate) count_deltas: Vec<i64>,
    /// Points in this block whose assignment changed. Kept as a count
    /// (not derived from `count_deltas`, which cancel when two points
    /// trade clusters) so convergence never needs a second scan.
    pub(crate) reassigned: usize,
    /// Squared distances of this block's points to their chosen centroids.
    pub(crate) distsum: T,
}

impl<T: Primitive> PartialAccumulator<T> {
    fn new(k: usize, dims: usize) -> Self {
        Self {
            sums: vec![T::zero(); k * dims],
            count_deltas: vec![0; k],
            reassigned: 0,
            distsum: T::zero(),
        }
    }

    fn record(&mut self, point: &[T], old: Option<usize>, new: usize, dist: T, dims: usize) {
        if old != Some(new) {
            self.reassigned += 1;
            if let Some(prev) = old {
                self.count_deltas[prev] -= 1;
            }
            self.count_deltas[new] += 1;
        }
        self.sums[new * dims..(new + 1) * dims]
            .iter_mut()
            .zip(point)
            .for_each(|(sum, v)| *sum += *v);
        self.distsum += dist;
    }
}

/// One full assignment pass: classify every point exactly once, rewrite
/// its assignment in place, and return the per-block accumulators in
/// block order (rayon's indexed `collect` preserves it).
pub(crate) fn assign_points<T: Primitive>(
    store: &mut PointStore<T>,
    centroids: &CentroidState<T>,
) -> Vec<PartialAccumulator<T>> {
    let dims = store.dims();
    let k = centroids.k();
    let (values, assignments) = store.parts_mut();

    values
        .par_chunks(BLOCK_POINTS * dims)
        .zip(assignments.par_chunks_mut(BLOCK_POINTS))
        .map(|(block_values, block_assignments)| {
            let mut acc = PartialAccumulator::new(k, dims);
            block_values
                .chunks_exact(dims)
                .zip(block_assignments.iter_mut())
                .for_each(|(point, slot)| {
                    let (nearest, dist) = nearest_centroid(point, centroids.as_slice(), dims);
                    acc.record(point, *slot, nearest, dist, dims);
                    *slot = Some(nearest);
                });
            acc
        })
        .collect()
}
