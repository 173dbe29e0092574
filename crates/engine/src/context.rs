//! Scoped container for the dashboard state shared by the table and the
//! statistics panel.
//!
//! The context owns the source list and the filter store. Every write
//! recomputes the view and publishes it on a `watch` channel, so readers
//! either take a snapshot or hold a receiver and check for changes.
use std::{collections::HashSet, sync::Arc};

use tokio::sync::watch;

use crate::{Entry, FilterStore, FilteredView};

#[derive(Debug)]
pub struct EntryContext {
    source: Arc<[Entry]>,
    filters: FilterStore,
    view: watch::Sender<FilteredView>,
}

impl EntryContext {
    pub fn new() -> Self {
        let (view, _) = watch::channel(FilteredView::default());
        Self {
            source: Arc::from(Vec::new()),
            filters: FilterStore::new(),
            view,
        }
    }

    /// Current filtered view.
    pub fn snapshot(&self) -> FilteredView {
        self.view.borrow().clone()
    }

    /// Receiver notified after every recomputation.
    pub fn subscribe(&self) -> watch::Receiver<FilteredView> {
        self.view.subscribe()
    }

    /// Replaces the source list, keeping the filters.
    pub fn set_source(&mut self, entries: Vec<Entry>) {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(&entry.id) {
                tracing::warn!(id = %entry.id, "duplicate entry id in source list");
            }
        }
        self.source = Arc::from(entries);
        self.publish();
    }

    /// Runs `f` against the filter store, then republishes the view.
    pub fn update_filters<R>(&mut self, f: impl FnOnce(&mut FilterStore) -> R) -> R {
        let result = f(&mut self.filters);
        self.publish();
        result
    }

    pub fn clear_filters(&mut self) {
        self.update_filters(FilterStore::clear_all);
    }

    pub fn filters(&self) -> &FilterStore {
        &self.filters
    }

    pub fn source(&self) -> &[Entry] {
        &self.source
    }

    fn publish(&self) {
        let view = FilteredView::compute(Arc::clone(&self.source), &self.filters);
        tracing::debug!(
            visible = view.len(),
            total = view.source_len(),
            "filtered view recomputed"
        );
        self.view.send_replace(view);
    }
}

impl Default for EntryContext {
    fn default() -> Self {
        Self::new()
    }
}
