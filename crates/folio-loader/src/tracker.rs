//! N+1 detection over strategy runs.
//!
//! The N+1 anti-pattern loads N parents and then issues one follow-up fetch
//! per parent, costing N+1 round-trips where a batched load would cost one
//! or two. The tracker records the fetch cost of every strategy run and
//! warns when a run's cost scales with its parent count.

use std::collections::HashMap;

/// One recorded strategy run.
#[derive(Debug, Clone)]
pub struct StrategyRun {
    /// Strategy name ("naive", "eager", "joined").
    pub strategy: &'static str,
    /// Number of parent entities the run returned.
    pub parents: usize,
    /// Fetch operations the run cost.
    pub fetches: u64,
    /// Whether the run was flagged as N+1-shaped.
    pub flagged: bool,
}

/// Aggregate statistics over all recorded runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerStats {
    /// Total runs recorded.
    pub runs: usize,
    /// Runs flagged as N+1-shaped.
    pub flagged: usize,
    /// Total fetch operations across all runs.
    pub total_fetches: u64,
}

/// Records strategy runs and flags N+1-shaped fetch costs.
#[derive(Debug)]
pub struct QueryTracker {
    runs: Vec<StrategyRun>,
    /// Minimum fetch count before a run can be flagged.
    threshold: u64,
    enabled: bool,
}

impl Default for QueryTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryTracker {
    /// Create a tracker with the default threshold (3 fetches).
    #[must_use]
    pub fn new() -> Self {
        Self {
            runs: Vec::new(),
            threshold: 3,
            enabled: true,
        }
    }

    /// Set the minimum fetch count before a run is flagged.
    ///
    /// Keeps one-author data sets, where 1 + N is just 2, from warning.
    #[must_use]
    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Get the current threshold.
    #[must_use]
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Check if detection is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disable detection. Runs are still recorded, never flagged.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Enable detection.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Record one strategy run.
    ///
    /// A run is N+1-shaped when its fetch cost grew with its parent count:
    /// at least one fetch per parent on top of the initial parent fetch.
    /// Flagged runs emit a warning on the `folio::n1` target.
    pub fn record_run(&mut self, strategy: &'static str, parents: usize, fetches: u64) {
        let n_plus_one = fetches >= parents as u64 + 1 && fetches >= self.threshold;
        let flagged = self.enabled && n_plus_one;
        if flagged {
            tracing::warn!(
                target: "folio::n1",
                strategy = strategy,
                parents = parents,
                fetches = fetches,
                threshold = self.threshold,
                "N+1 QUERY PATTERN DETECTED! One fetch per parent; batch or join instead."
            );
        }
        self.runs.push(StrategyRun {
            strategy,
            parents,
            fetches,
            flagged,
        });
    }

    /// All recorded runs, in order.
    #[must_use]
    pub fn runs(&self) -> &[StrategyRun] {
        &self.runs
    }

    /// Total fetch cost recorded for one strategy across all its runs.
    #[must_use]
    pub fn fetches_for(&self, strategy: &str) -> u64 {
        self.runs
            .iter()
            .filter(|r| r.strategy == strategy)
            .map(|r| r.fetches)
            .sum()
    }

    /// Aggregate statistics over all recorded runs.
    #[must_use]
    pub fn stats(&self) -> TrackerStats {
        TrackerStats {
            runs: self.runs.len(),
            flagged: self.runs.iter().filter(|r| r.flagged).count(),
            total_fetches: self.runs.iter().map(|r| r.fetches).sum(),
        }
    }

    /// Per-strategy fetch totals, for the end-of-run comparison log.
    #[must_use]
    pub fn cost_by_strategy(&self) -> HashMap<&'static str, u64> {
        let mut costs = HashMap::new();
        for run in &self.runs {
            *costs.entry(run.strategy).or_insert(0) += run.fetches;
        }
        costs
    }

    /// Clear all recorded runs.
    pub fn reset(&mut self) {
        self.runs.clear();
    }
}
