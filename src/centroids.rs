use crate::primitive::Primitive;

/// K centroids of D attributes each, plus per-cluster membership counts.
///
/// The centroid matrix is flattened row-major like the point table:
/// cluster `c`, attribute `a` lives at index `c * dims + a`. During a
/// reduction pass this structure is read-only; the merge stage is its only
/// writer, so readers and the writer never overlap.
#[derive(Clone, Debug)]
pub struct CentroidState<T: Primitive> {
    k: usize,
    dims: usize,
    pub(crate) values: Vec<T>,
    pub(crate) counts: Vec<usize>,
}

impl<T: Primitive> CentroidState<T> {
    pub(crate) fn new(k: usize, dims: usize) -> Self {
        Self {
            k,
            dims,
            values: vec![T::zero(); k * dims],
            counts: vec![0; k],
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Attribute vector of one centroid.
    pub fn centroid(&self, cluster: usize) -> &[T] {
        &self.values[cluster * self.dims..(cluster + 1) * self.dims]
    }

    /// The whole flattened centroid matrix.
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Current number of points in each cluster.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub(crate) fn set_centroid_from_iter(&mut self, idx: usize, src: impl Iterator<Item = T>) {
        self.values
            .iter_mut()
            .skip(self.dims * idx)
            .take(self.dims)
            .zip(src)
            .for_each(|(c, s)| *c = s);
    }

    pub(crate) fn set_count(&mut self, cluster: usize, count: usize) {
        self.counts[cluster] = count;
    }
}
