use crate::api::KMeansConfig;
use crate::centroids::CentroidState;
use crate::error::Result;
use crate::points::PointStore;
use crate::primitive::Primitive;
use std::ops::DerefMut;

/// Seed every cluster with one distinct, randomly drawn point.
///
/// The chosen points are copied as initial centroids and pre-assigned to
/// their cluster, so each seeded cluster starts with count 1. The
/// preflight check guarantees k distinct points exist.
pub(crate) fn calculate<T: Primitive>(
    store: &mut PointStore<T>,
    centroids: &mut CentroidState<T>,
    config: &KMeansConfig<'_, T>,
) -> Result<()> {
    let mut rnd = config.rnd.borrow_mut();
    let seeds = rand::seq::index::sample(rnd.deref_mut(), store.len(), centroids.k());
    for (cluster, point_idx) in seeds.into_iter().enumerate() {
        centroids.set_centroid_from_iter(cluster, store.point(point_idx).iter().cloned());
        centroids.set_count(cluster, 1);
        store.assign(point_idx, cluster);
    }
    Ok(())
}
