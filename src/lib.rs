//! # kmeans-par - API documentation
//!
//! A parallel implementation of Lloyd's k-means algorithm.
//!
//! ## Design target
//! The interesting part of parallel k-means is not the math but the
//! reduction design: worker tasks classify disjoint blocks of points and
//! accumulate per-cluster sums into private buffers, which are then folded
//! into the global centroid state in a fixed order. There is no lock and
//! no shared counter anywhere on the hot path, and because the fold order
//! never depends on the executing thread pool, results are bit-identical
//! for any worker count.
//!
//! ## Scope
//! One variant (full-batch Lloyd), one metric (squared euclidean distance
//! over dense fixed-length vectors). Clusters that run empty keep their
//! previous centroid; they are not reseeded.
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use kmeans_par::*;
//!
//! let (point_cnt, dims, k, max_iterations) = (10_000, 16, 8, 100);
//!
//! // Generate some random data
//! let mut values = vec![0.0f64; point_cnt * dims];
//! values.iter_mut().for_each(|v| *v = rand::random());
//!
//! let store = PointStore::new(values, point_cnt, dims).unwrap();
//! let mut kmeans = KMeans::new(store);
//! let result = kmeans
//!     .kmeans_lloyd(k, max_iterations, KMeans::init_random_seeds, &KMeansConfig::default())
//!     .unwrap();
//!
//! println!("Centroids: {:?}", result.centroids);
//! println!("Cluster-Assignments: {:?}", result.assignments);
//! println!("Iterations: {}", result.iterations);
//! ```
//!
//! ## Short API-Overview / Description
//! Entry-point of the library is the [`KMeans`] struct, which owns the
//! [`PointStore`] to cluster. [`KMeans::kmeans_lloyd`] runs the iteration
//! and returns a [`KMeansState`] with the final centroids, per-cluster
//! counts, per-point assignments and the iteration count. Centroid
//! initialization is pluggable: pass one of the `KMeans::init_*` methods.
//! Runs are configured through [`KMeansConfig`] (status callbacks, seeded
//! RNG, worker-thread count); preconditions such as `k` exceeding the
//! point count are rejected with a [`KMeansError`] before any worker
//! starts. Datasets in the `N D K max_iterations has_names` header format
//! can be ingested with [`read_dataset`].

#[macro_use]
mod helpers;
mod api;
mod centroids;
mod classify;
mod convergence;
mod dataset;
mod error;
mod inits;
mod merge;
mod points;
mod primitive;
mod reduction;
mod variants;

pub use api::{
    InitDoneCallbackFn, IterationDoneCallbackFn, IterationUpdate, KMeans, KMeansConfig,
    KMeansConfigBuilder, KMeansState,
};
pub use centroids::CentroidState;
pub use convergence::Termination;
pub use dataset::{read_dataset, Dataset, DatasetHeader};
pub use error::{KMeansError, Result};
pub use points::PointStore;
pub use primitive::Primitive;
