//! Filtered view engine.
//!
//! The view is recomputed from scratch on every change. It stores positions
//! into the shared source list, so the rows keep their source order and are
//! never copied.
use std::sync::Arc;

use crate::{Entry, EntryId, FilterStore, predicate::passes_all};

/// Records of `source` that pass every active spec, in source order.
#[must_use]
pub fn compute_view<'a>(source: &'a [Entry], store: &FilterStore) -> Vec<&'a Entry> {
    source
        .iter()
        .filter(|entry| passes_all(entry, store))
        .collect()
}

/// The visible subset of a source list.
#[derive(Clone, Debug)]
pub struct FilteredView {
    source: Arc<[Entry]>,
    visible: Vec<usize>,
}

impl FilteredView {
    pub fn compute(source: Arc<[Entry]>, store: &FilterStore) -> Self {
        let visible = source
            .iter()
            .enumerate()
            .filter(|(_, entry)| passes_all(entry, store))
            .map(|(index, _)| index)
            .collect();
        Self { source, visible }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.visible.iter().filter_map(|&index| self.source.get(index))
    }

    /// Visible row `row`, counting from the top of the view.
    pub fn get(&self, row: usize) -> Option<&Entry> {
        self.visible
            .get(row)
            .and_then(|&index| self.source.get(index))
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Size of the unfiltered list.
    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    pub fn source(&self) -> &[Entry] {
        &self.source
    }

    pub fn ids(&self) -> Vec<&EntryId> {
        self.iter().map(|entry| &entry.id).collect()
    }
}

impl Default for FilteredView {
    fn default() -> Self {
        Self {
            source: Arc::from(Vec::new()),
            visible: Vec::new(),
        }
    }
}

impl PartialEq for FilteredView {
    fn eq(&self, other: &Self) -> bool {
        self.visible == other.visible && self.source == other.source
    }
}
