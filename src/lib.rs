#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Client-side data layer for optimization-study dashboards. It keeps an
//! incrementally synchronized view of each study's trials, classifies
//! multi-objective results by Pareto dominance, and turns raw trials into
//! axis-ready series for an objective-vs-objective scatter and a
//! parameter-vs-objective "slice" scatter.
//!
//! # Getting Started
//!
//! ```
//! use trialview::prelude::*;
//! use trialview::service::MemoryStudyService;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let service = MemoryStudyService::new();
//! let id = service.insert_study("demo", vec![Direction::Minimize, Direction::Minimize]);
//! service.push_trial(id, Trial::new(0, TrialState::Complete).with_values(vec![1.0, 2.0]).with_param("x", "0.5"));
//! service.push_trial(id, Trial::new(1, TrialState::Complete).with_values(vec![1.0, 1.0]).with_param("x", "0.7"));
//!
//! let cache = StudyCache::builder(service).build();
//! cache.refresh(id).await.unwrap();
//! let study = cache.snapshot(id).unwrap();
//!
//! let front = front_series(&study, 0, 1).unwrap();
//! assert_eq!(front.classes, vec![ParetoClass::Dominated, ParetoClass::Optimal]);
//!
//! let slice = slice_series(&study, &SliceOptions::new("x"));
//! assert_eq!(slice.series.x, vec![0.5, 0.7]);
//! # });
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`StudyCache`](cache::StudyCache) | Incremental per-study cache; only re-requests trials that may still change. |
//! | [`StudyService`](service::StudyService) | The backing service the cache synchronizes from. |
//! | [`classify`](pareto::classify) | Weak-dominance Pareto labels for the front panel. |
//! | [`transform`](slice::transform) | Numeric or categorical slice series for one parameter. |
//! | [`ObjectiveNameStore`](naming::ObjectiveNameStore) | Persisted objective display names. |
//! | [`KeyValueStore`](storage::KeyValueStore) | Client-local persisted store. |
//! | [`Notifier`](notify::Notifier) | Sink for user-facing success/failure messages. |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `file-store` | `FileStore`: JSON key-value file with `fs2` locking | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) for refreshes, failures, and stale responses | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::warn!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($($arg:tt)*) => {};
}

pub mod cache;
mod config;
mod distribution;
mod error;
pub mod filter;
pub mod naming;
pub mod notify;
pub mod pareto;
pub mod series;
pub mod service;
pub mod slice;
pub mod storage;
mod study;
mod trial;
mod types;
pub mod visualization;
pub mod wire;

pub use cache::{CacheEvent, RefreshOutcome, StudyCache, StudyCacheBuilder};
pub use config::{CacheConfig, DEFAULT_EVENT_CAPACITY};
pub use distribution::{Distribution, SearchSpaceEntry};
pub use error::{Error, Result};
pub use study::{Note, StudyDetail, StudySummary, default_objective_names};
pub use trial::{Trial, TrialParam};
pub use types::{Direction, TrialState};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use trialview::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cache::{CacheEvent, RefreshOutcome, StudyCache, StudyCacheBuilder};
    pub use crate::config::CacheConfig;
    pub use crate::distribution::{Distribution, SearchSpaceEntry};
    pub use crate::error::{Error, Result};
    pub use crate::naming::{ObjectiveNameOverride, ObjectiveNameStore};
    pub use crate::notify::{Notifier, Severity};
    pub use crate::pareto::{FrontSeries, ParetoClass, classify, front_series};
    pub use crate::series::{Axis, AxisKind, AxisScale, ScatterSeries};
    pub use crate::service::StudyService;
    pub use crate::slice::{SliceOptions, SliceSeries, slice_series};
    pub use crate::storage::KeyValueStore;
    pub use crate::study::{Note, StudyDetail, StudySummary};
    pub use crate::trial::{Trial, TrialParam};
    pub use crate::types::{Direction, TrialState};
}
