use crate::error::{KMeansError, Result};
use crate::primitive::Primitive;

/// Dense table of N points with D attributes each.
///
/// Attribute values are stored row-major in one flat buffer
/// \[point0-attrs, point1-attrs, ...\], never resized after a point was
/// pushed. A point's identifier is its index in the store. The cluster
/// assignment is the only mutable part of a point: the reduction engine
/// rewrites it through disjoint per-block borrows of the assignment array,
/// so no lock is involved. `None` means the point was not assigned yet.
///
/// Optional display names are carried along for reporting and never enter
/// the computation.
#[derive(Clone, Debug)]
pub struct PointStore<T: Primitive> {
    dims: usize,
    values: Vec<T>,
    names: Option<Vec<String>>,
    assignments: Vec<Option<usize>>,
}

impl<T: Primitive> PointStore<T> {
    /// Create a store from a pre-filled row-major buffer.
    ///
    /// `values.len()` must equal `point_cnt * dims`.
    pub fn new(values: Vec<T>, point_cnt: usize, dims: usize) -> Result<Self> {
        if values.len() != point_cnt * dims {
            return Err(KMeansError::DimensionMismatch {
                expected: point_cnt * dims,
                actual: values.len(),
            });
        }
        Ok(Self {
            dims,
            values,
            names: None,
            assignments: vec![None; point_cnt],
        })
    }

    /// Create an empty store for incremental insertion via [`PointStore::push`].
    pub fn with_dims(dims: usize) -> Self {
        Self {
            dims,
            values: Vec::new(),
            names: None,
            assignments: Vec::new(),
        }
    }

    /// Append one point. The attribute count is checked here so that a
    /// mis-sized row can never reach the reduction engine.
    pub fn push(&mut self, attributes: &[T]) -> Result<()> {
        if attributes.len() != self.dims {
            return Err(KMeansError::DimensionMismatch {
                expected: self.dims,
                actual: attributes.len(),
            });
        }
        self.values.extend_from_slice(attributes);
        self.assignments.push(None);
        Ok(())
    }

    /// Attach display names, one per point.
    pub fn set_names(&mut self, names: Vec<String>) -> Result<()> {
        if names.len() != self.len() {
            return Err(KMeansError::DimensionMismatch {
                expected: self.len(),
                actual: names.len(),
            });
        }
        self.names = Some(names);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    /// The whole row-major attribute buffer.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Attribute slice of one point.
    pub fn point(&self, idx: usize) -> &[T] {
        &self.values[idx * self.dims..(idx + 1) * self.dims]
    }

    pub fn name(&self, idx: usize) -> Option<&str> {
        self.names.as_ref().map(|names| names[idx].as_str())
    }

    /// Current cluster assignment of one point.
    pub fn assignment(&self, idx: usize) -> Option<usize> {
        self.assignments[idx]
    }

    pub fn assignments(&self) -> &[Option<usize>] {
        &self.assignments
    }

    pub(crate) fn assign(&mut self, idx: usize, cluster: usize) {
        self.assignments[idx] = Some(cluster);
    }

    pub(crate) fn clear_assignments(&mut self) {
        self.assignments.iter_mut().for_each(|a| *a = None);
    }

    /// Split borrow for the reduction engine: shared attribute buffer,
    /// exclusive assignment array.
    pub(crate) fn parts_mut(&mut self) -> (&[T], &mut [Option<usize>]) {
        (&self.values, &mut self.assignments)
    }
}
