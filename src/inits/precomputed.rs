use crate::centroids::CentroidState;
use crate::error::{KMeansError, Result};
use crate::primitive::Primitive;

/// Install an externally supplied, flattened k x D centroid matrix.
///
/// Counts stay zero and no point is pre-assigned; the first pass books
/// every point onto its nearest given centroid.
pub(crate) fn calculate<T: Primitive>(
    centroids: &mut CentroidState<T>,
    centroid_values: Vec<T>,
) -> Result<()> {
    let expected = centroids.k() * centroids.dims();
    if centroid_values.len() != expected {
        return Err(KMeansError::DimensionMismatch {
            expected,
            actual: centroid_values.len(),
        });
    }
    for (cluster, row) in centroid_values.chunks_exact(centroids.dims()).enumerate() {
        centroids.set_centroid_from_iter(cluster, row.iter().cloned());
    }
    Ok(())
}
