//! Relationship loading strategies for the Folio catalog.
//!
//! Three strategies load the same authors-with-books result at very
//! different fetch costs:
//!
//! - [`NaiveFetch`] — 1 + N fetches, the N+1 anti-pattern.
//! - [`EagerFetch`] — 2 fetches, parents then batched children.
//! - [`JoinedFetch`] — 1 fetch, one outer join coalesced in memory.
//!
//! [`LoaderService`] runs all three against one store and records their
//! costs in a [`QueryTracker`], which warns on the `folio::n1` tracing
//! target when a run's fetch count scales with its parent count.

pub mod service;
pub mod strategy;
pub mod tracker;

pub use service::{LoaderService, Phase};
pub use strategy::{EagerFetch, FetchStrategy, JoinedFetch, NaiveFetch};
pub use tracker::{QueryTracker, StrategyRun, TrackerStats};
