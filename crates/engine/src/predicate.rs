//! Predicate evaluator: one record against one spec, and against the whole
//! store.
//!
//! Evaluation is total. A value that does not parse fails any active spec on
//! its column; nothing here panics or returns an error.
use crate::{
    Entry, FilterStore,
    columns::{Field, FieldValue},
    filter::FilterSpec,
};

/// Returns `true` if `entry` satisfies `spec` on `field`.
#[must_use]
pub fn passes(entry: &Entry, field: Field, spec: &FilterSpec) -> bool {
    if !spec.is_active() {
        return true;
    }
    match (spec, field.extract(entry)) {
        (FilterSpec::Compare(cmp), FieldValue::Number(value)) => {
            value.is_some_and(|value| cmp.op.matches(value, cmp.value))
        }
        (FilterSpec::Range(range), FieldValue::Date(date)) => {
            date.is_some_and(|date| range.contains(date))
        }
        (FilterSpec::Values(selected), value) => selected.contains(&value.into_text()),
        _ => false,
    }
}

/// AND over every spec in the store.
#[must_use]
pub fn passes_all(entry: &Entry, store: &FilterStore) -> bool {
    store.active().all(|(field, spec)| passes(entry, field, spec))
}
