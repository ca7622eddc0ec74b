//! `BuildQueue` — deployments waiting for their build step.
//!
//! Institutions (and the input deck) schedule facility builds for future
//! steps.  Rather than scanning every pending request each step, requests
//! are keyed by build step and the scheduler drains only the batch that is
//! due — O(due) work per step.

use std::collections::BTreeMap;

use rf_agent::BuildRequest;
use rf_core::Step;

/// Pending build requests keyed by the step at which they construct.
#[derive(Default)]
pub struct BuildQueue {
    inner: BTreeMap<Step, Vec<BuildRequest>>,
    /// Cached total request count for O(1) `len()`.
    total: usize,
}

impl BuildQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `request` for its build step.
    pub fn push(&mut self, request: BuildRequest) {
        self.inner.entry(request.build_step).or_default().push(request);
        self.total += 1;
    }

    /// Remove and return every request due at or before `now`, in
    /// (step, insertion) order.  "Or before" only matters for requests
    /// scheduled in the past, which construct immediately.
    pub fn drain_due(&mut self, now: Step) -> Vec<BuildRequest> {
        let mut due = Vec::new();
        while let Some((&step, _)) = self.inner.iter().next() {
            if step > now {
                break;
            }
            let (_, mut batch) = self.inner.remove_entry(&step).expect("key just observed");
            self.total -= batch.len();
            due.append(&mut batch);
        }
        due
    }

    /// The earliest step with at least one pending request.
    pub fn next_step(&self) -> Option<Step> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
