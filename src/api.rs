use crate::centroids::CentroidState;
use crate::convergence::Termination;
use crate::error::Result;
use crate::points::PointStore;
use crate::primitive::Primitive;
use rand::prelude::*;
use std::cell::RefCell;

pub type InitDoneCallbackFn<'a, T> = &'a dyn Fn(&CentroidState<T>);
pub type IterationDoneCallbackFn<'a, T> = &'a dyn Fn(&CentroidState<T>, &IterationUpdate<T>);

/// Progress report handed to the `iteration_done` callback after each
/// merge completed.
#[derive(Clone, Copy, Debug)]
pub struct IterationUpdate<T: Primitive> {
    /// 1-based number of the finished pass.
    pub iteration: usize,
    /// Points that changed cluster during the pass.
    pub reassigned: usize,
    /// Squared-distance sum from the pass's assignment scan.
    pub distsum: T,
}

/// Configuration options for a k-means calculation: status callbacks, the
/// random number generator to use, and the worker-thread count.
///
/// Built through [`KMeansConfigBuilder`].
pub struct KMeansConfig<'a, T: Primitive> {
    /// Called once the initialization strategy populated the centroids,
    /// before the first pass.
    pub(crate) init_done: InitDoneCallbackFn<'a, T>,
    /// Called after each merged pass.
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, T>,
    /// Random number generator used by the initialization strategies.
    /// Pass a seeded one for reproducible runs.
    pub(crate) rnd: Box<RefCell<dyn RngCore>>,
    /// Worker threads for the reduction pool. `None` uses the global
    /// rayon pool (one worker per hardware thread).
    pub(crate) num_threads: Option<usize>,
}

impl<'a, T: Primitive> Default for KMeansConfig<'a, T> {
    fn default() -> Self {
        Self {
            init_done: &|_| {},
            iteration_done: &|_, _| {},
            rnd: Box::new(RefCell::new(rand::thread_rng())),
            num_threads: None,
        }
    }
}

impl<'a, T: Primitive> KMeansConfig<'a, T> {
    pub fn build() -> KMeansConfigBuilder<'a, T> {
        KMeansConfigBuilder {
            config: KMeansConfig::default(),
        }
    }
}

impl<'a, T: Primitive> std::fmt::Debug for KMeansConfig<'a, T> {
    fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}

pub struct KMeansConfigBuilder<'a, T: Primitive> {
    config: KMeansConfig<'a, T>,
}

impl<'a, T: Primitive> KMeansConfigBuilder<'a, T> {
    /// Set the callback invoked after centroid initialization, before the
    /// first pass.
    pub fn init_done(mut self, init_done: InitDoneCallbackFn<'a, T>) -> Self {
        self.config.init_done = init_done;
        self
    }

    /// Set the callback invoked after each merged pass.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a, T>) -> Self {
        self.config.iteration_done = iteration_done;
        self
    }

    /// Set the random number generator used for centroid seeding. Use a
    /// seeded generator for deterministically repeatable runs.
    pub fn random_generator<R: RngCore + 'static>(mut self, rnd: R) -> Self {
        self.config.rnd = Box::new(RefCell::new(rnd));
        self
    }

    /// Run the reduction on a dedicated pool with this many worker
    /// threads instead of the global one.
    pub fn num_threads(mut self, num_threads: usize) -> Self {
        self.config.num_threads = Some(num_threads);
        self
    }

    pub fn build(self) -> KMeansConfig<'a, T> {
        self.config
    }
}

/// Final state of an accepted run.
///
/// ## Fields
/// - **k**: requested cluster count
/// - **centroids**: final cluster centers \[row-major\] = \[centroid0, centroid1, ...\]
/// - **centroid_counts**: number of points in each cluster
/// - **assignments**: cluster index of every point, by point index
/// - **iterations**: completed Reduction + Merge passes
/// - **termination**: why the run stopped; both terminal states expose
///   the same data
/// - **distsum**: squared-distance sum from the final assignment pass
#[derive(Clone, Debug)]
pub struct KMeansState<T: Primitive> {
    pub k: usize,
    pub centroids: Vec<T>,
    pub centroid_counts: Vec<usize>,
    pub assignments: Vec<usize>,
    pub iterations: usize,
    pub termination: Termination,
    pub distsum: T,

    pub(crate) dims: usize,
}

impl<T: Primitive> KMeansState<T> {
    /// Attribute vector of one final centroid.
    pub fn centroid(&self, cluster: usize) -> &[T] {
        &self.centroids[cluster * self.dims..(cluster + 1) * self.dims]
    }
}

/// Entrypoint of this crate's API surface.
///
/// Owns the [`PointStore`] to cluster. The reduction engine tags the
/// stored points in place, so running a calculation takes `&mut self`;
/// the attribute table itself is never copied or modified.
pub struct KMeans<T: Primitive> {
    pub(crate) store: PointStore<T>,
}

impl<T: Primitive> KMeans<T> {
    pub fn new(store: PointStore<T>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &PointStore<T> {
        &self.store
    }

    pub fn into_store(self) -> PointStore<T> {
        self.store
    }

    /// Run Lloyd's algorithm: alternate a parallel nearest-centroid
    /// assignment pass with a deterministic merge of the per-block
    /// partial sums, until no point changes cluster or `max_iterations`
    /// passes completed.
    ///
    /// ## Arguments
    /// - **k**: number of clusters to search for
    /// - **max_iterations**: iteration cap
    /// - **init**: initialization strategy populating the first centroids
    ///   (e.g. [`KMeans::init_random_seeds`])
    /// - **config**: see [`KMeansConfig`]
    ///
    /// ## Example
    /// ```rust
    /// use kmeans_par::*;
    ///
    /// let (point_cnt, dims, k, max_iterations) = (3000, 8, 4, 100);
    /// let mut values = vec![0.0f64; point_cnt * dims];
    /// values.iter_mut().for_each(|v| *v = rand::random());
    ///
    /// let store = PointStore::new(values, point_cnt, dims).unwrap();
    /// let mut kmeans = KMeans::new(store);
    /// let result = kmeans
    ///     .kmeans_lloyd(k, max_iterations, KMeans::init_random_seeds, &KMeansConfig::default())
    ///     .unwrap();
    ///
    /// assert_eq!(result.assignments.len(), point_cnt);
    /// println!("Centroids: {:?}", result.centroids);
    /// println!("Iterations: {}", result.iterations);
    /// ```
    pub fn kmeans_lloyd<'a, F>(
        &mut self,
        k: usize,
        max_iterations: usize,
        init: F,
        config: &KMeansConfig<'a, T>,
    ) -> Result<KMeansState<T>>
    where
        F: FnOnce(&mut PointStore<T>, &mut CentroidState<T>, &KMeansConfig<'_, T>) -> Result<()>,
    {
        crate::variants::Lloyd::calculate(self, k, max_iterations, init, config)
    }

    /// Random-seed initialization: k distinct points are drawn from the
    /// store, copied as initial centroids, and pre-assigned to their
    /// cluster (count 1).
    ///
    /// ## Note
    /// Not meant for direct invocation; pass a reference to it to
    /// [`KMeans::kmeans_lloyd`].
    pub fn init_random_seeds(
        store: &mut PointStore<T>,
        centroids: &mut CentroidState<T>,
        config: &KMeansConfig<'_, T>,
    ) -> Result<()> {
        crate::inits::randomseeds::calculate(store, centroids, config)
    }

    /// Fixed-list initialization: the given flattened k x D matrix becomes
    /// the initial centroids; counts stay zero and no point is
    /// pre-assigned.
    pub fn init_precomputed(
        centroid_values: Vec<T>,
    ) -> impl FnOnce(&mut PointStore<T>, &mut CentroidState<T>, &KMeansConfig<'_, T>) -> Result<()>
    {
        move |_store, centroids, _config| {
            crate::inits::precomputed::calculate(centroids, centroid_values)
        }
    }
}
