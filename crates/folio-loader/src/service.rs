//! The loader service: all three strategies, back to back.

use crate::strategy::{EagerFetch, FetchStrategy, JoinedFetch, NaiveFetch};
use crate::tracker::QueryTracker;
use folio_core::{Author, Result};
use folio_store::EntityStore;

/// Where a [`LoaderService`] run currently stands.
///
/// A failing strategy leaves the phase where it failed; `Done` means all
/// three strategies completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Naive,
    Eager,
    Joined,
    Done,
}

/// Runs the loading strategies against one store and keeps the
/// per-strategy fetch accounting.
///
/// [`LoaderService::list_authors_with_books`] is the demonstration entry
/// point: it runs naive, eager, and joined in sequence over the same data
/// set so their fetch costs can be compared side by side. For loading the
/// catalog once with a single strategy, use [`LoaderService::run_strategy`].
#[derive(Debug)]
pub struct LoaderService<S: EntityStore> {
    store: S,
    tracker: QueryTracker,
    phase: Phase,
}

impl<S: EntityStore> LoaderService<S> {
    /// Create a service over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            tracker: QueryTracker::new(),
            phase: Phase::Idle,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The recorded strategy runs.
    pub fn tracker(&self) -> &QueryTracker {
        &self.tracker
    }

    /// Mutable tracker access, for thresholds and resets.
    pub fn tracker_mut(&mut self) -> &mut QueryTracker {
        &mut self.tracker
    }

    /// The current run phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Load all authors with books using every strategy in turn, returning
    /// the last (joined) result.
    ///
    /// The `author_id` parameter is accepted for interface compatibility
    /// and ignored: every strategy loads the whole catalog. Each strategy's
    /// result is fully materialized (every author's book collection is
    /// read) before its fetch cost is recorded, so no cost can hide behind
    /// an unread placeholder. A strategy failure aborts the run; the phase
    /// is left where it failed and no further fetches are issued.
    pub fn list_authors_with_books(&mut self, author_id: Option<i64>) -> Result<Vec<Author>> {
        if let Some(id) = author_id {
            tracing::debug!(
                target: "folio::loader",
                author_id = id,
                "author id accepted for interface compatibility and ignored"
            );
        }
        tracing::info!(target: "folio::loader", "fetch authors with books - N+1 problem");

        self.phase = Phase::Naive;
        self.execute(&NaiveFetch)?;

        self.phase = Phase::Eager;
        self.execute(&EagerFetch)?;

        self.phase = Phase::Joined;
        let authors = self.execute(&JoinedFetch)?;

        self.phase = Phase::Done;
        let costs = self.tracker.cost_by_strategy();
        tracing::info!(
            target: "folio::loader",
            naive = costs.get("naive").copied().unwrap_or(0),
            eager = costs.get("eager").copied().unwrap_or(0),
            joined = costs.get("joined").copied().unwrap_or(0),
            "strategy comparison complete"
        );
        Ok(authors)
    }

    /// Run exactly one strategy, with the same materialization and fetch
    /// accounting as the full comparison. Leaves the phase untouched.
    pub fn run_strategy(&mut self, strategy: &dyn FetchStrategy) -> Result<Vec<Author>> {
        self.execute(strategy)
    }

    fn execute(&mut self, strategy: &dyn FetchStrategy) -> Result<Vec<Author>> {
        tracing::info!(target: "folio::loader", strategy = strategy.name(), "running strategy");
        let before = self.store.fetches();
        let authors = strategy.load(&self.store)?;
        let fetches = self.store.fetches() - before;

        // Force materialization: every collection is read, so an unloaded
        // placeholder surfaces as an error here, not at the caller.
        let mut books = 0usize;
        for author in &authors {
            books += author.books.try_get()?.len();
        }

        tracing::info!(
            target: "folio::loader",
            strategy = strategy.name(),
            authors = authors.len(),
            books = books,
            fetches = fetches,
            "strategy completed"
        );
        self.tracker.record_run(strategy.name(), authors.len(), fetches);
        Ok(authors)
    }
}
