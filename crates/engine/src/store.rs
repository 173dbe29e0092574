//! Filter state store: at most one spec per column plus the editor
//! visibility flag.
//!
//! Visibility and activity are independent. Closing a column's editor leaves
//! its filter in force; only [`FilterStore::clear`] and
//! [`FilterStore::clear_all`] remove filters.
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    EngineError, ResultEngine,
    columns::Field,
    filter::{FilterSpec, FilterUpdate},
};

#[derive(Clone, Debug, Default, PartialEq)]
struct ColumnFilter {
    spec: Option<FilterSpec>,
    visible: bool,
}

impl ColumnFilter {
    fn is_blank(&self) -> bool {
        self.spec.is_none() && !self.visible
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterStore {
    columns: BTreeMap<Field, ColumnFilter>,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces or merges the spec of `field`.
    ///
    /// Fails without touching the store if the update does not fit the
    /// column (e.g. a value set for `Amount`).
    pub fn set_filter(&mut self, field: Field, update: FilterUpdate) -> ResultEngine<()> {
        if update.kind() != field.kind() {
            return Err(EngineError::KindMismatch(format!(
                "{field} takes a {:?} filter, got {:?}",
                field.kind(),
                update.kind()
            )));
        }
        let column = self.columns.entry(field).or_default();
        column.spec = Some(update.merge(column.spec.take()));
        Ok(())
    }

    /// Flips one value in a checklist filter.
    pub fn toggle_value(&mut self, field: Field, value: &str) -> ResultEngine<()> {
        let mut values = match self.get(field) {
            Some(FilterSpec::Values(values)) => values.clone(),
            _ => BTreeSet::new(),
        };
        if !values.remove(value) {
            values.insert(value.to_string());
        }
        self.set_filter(field, FilterUpdate::Values(values))
    }

    pub fn get(&self, field: Field) -> Option<&FilterSpec> {
        self.columns.get(&field).and_then(|column| column.spec.as_ref())
    }

    /// Every spec in the store, in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FilterSpec)> {
        self.columns
            .iter()
            .filter_map(|(field, column)| column.spec.as_ref().map(|spec| (*field, spec)))
    }

    /// Specs that can actually exclude records.
    pub fn active(&self) -> impl Iterator<Item = (Field, &FilterSpec)> {
        self.iter().filter(|(_, spec)| spec.is_active())
    }

    pub fn is_active(&self, field: Field) -> bool {
        self.get(field).is_some_and(FilterSpec::is_active)
    }

    /// `true` if no column is filtered.
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    pub fn is_visible(&self, field: Field) -> bool {
        self.columns.get(&field).is_some_and(|column| column.visible)
    }

    pub fn set_visible(&mut self, field: Field, visible: bool) {
        let column = self.columns.entry(field).or_default();
        column.visible = visible;
        if column.is_blank() {
            self.columns.remove(&field);
        }
    }

    pub fn toggle_visibility(&mut self, field: Field) {
        let visible = self.is_visible(field);
        self.set_visible(field, !visible);
    }

    /// Removes the spec of `field`; its visibility is kept.
    pub fn clear(&mut self, field: Field) {
        if let Some(column) = self.columns.get_mut(&field) {
            column.spec = None;
            if column.is_blank() {
                self.columns.remove(&field);
            }
        }
    }

    /// Removes every spec and visibility flag.
    pub fn clear_all(&mut self) {
        self.columns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{CompareOp, Comparison};

    #[test]
    fn wrong_kind_is_rejected_and_store_untouched() {
        let mut store = FilterStore::new();
        store
            .set_filter(Field::Amount, FilterUpdate::Threshold(10.0))
            .unwrap();
        let before = store.clone();

        let err = store
            .set_filter(Field::Amount, FilterUpdate::Values(BTreeSet::new()))
            .unwrap_err();
        assert!(matches!(err, EngineError::KindMismatch(_)));
        assert_eq!(store, before);
    }

    #[test]
    fn partial_updates_preserve_siblings_and_visibility() {
        let mut store = FilterStore::new();
        store.toggle_visibility(Field::Amount);
        store
            .set_filter(Field::Amount, FilterUpdate::Threshold(15.0))
            .unwrap();
        store
            .set_filter(Field::Amount, FilterUpdate::CompareOp(CompareOp::Gt))
            .unwrap();

        assert!(store.is_visible(Field::Amount));
        assert_eq!(
            store.get(Field::Amount),
            Some(&FilterSpec::Compare(Comparison {
                op: CompareOp::Gt,
                value: 15.0
            }))
        );
    }

    #[test]
    fn toggle_value_adds_then_removes() {
        let mut store = FilterStore::new();
        store.toggle_value(Field::Category, "Gas").unwrap();
        store.toggle_value(Field::Category, "Car").unwrap();
        assert!(store.is_active(Field::Category));

        store.toggle_value(Field::Category, "Gas").unwrap();
        store.toggle_value(Field::Category, "Car").unwrap();
        assert_eq!(
            store.get(Field::Category),
            Some(&FilterSpec::Values(BTreeSet::new()))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn hiding_editor_keeps_filter() {
        let mut store = FilterStore::new();
        store.set_visible(Field::Category, true);
        store.toggle_value(Field::Category, "Gas").unwrap();
        store.set_visible(Field::Category, false);

        assert!(!store.is_visible(Field::Category));
        assert!(store.is_active(Field::Category));
    }

    #[test]
    fn clear_keeps_visibility_and_clear_all_resets() {
        let mut store = FilterStore::new();
        store.set_visible(Field::Fixed, true);
        store.toggle_value(Field::Fixed, "yes").unwrap();
        store
            .set_filter(Field::Amount, FilterUpdate::Threshold(1.0))
            .unwrap();

        store.clear(Field::Fixed);
        assert!(store.get(Field::Fixed).is_none());
        assert!(store.is_visible(Field::Fixed));
        assert!(!store.is_empty());

        store.clear_all();
        assert!(store.is_empty());
        assert!(!store.is_visible(Field::Fixed));
        assert_eq!(store.iter().count(), 0);
    }
}
