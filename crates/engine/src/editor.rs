//! Filter editor: which column's editor is open, and what it shows.
//!
//! The state machine has no knowledge of rendering. The host feeds it events
//! and reports where the open editor was drawn; a pointer press outside
//! those bounds closes it.
use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::{
    Entry, FilterStore,
    columns::{Field, FieldKind},
    filter::{CompareOp, FilterSpec},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditorState {
    #[default]
    Closed,
    Open(Field),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorEvent {
    OpenRequest(Field),
    /// Opens `field`, or closes it if it is the open one.
    ToggleRequest(Field),
    CloseRequest,
    PointerDown { x: u16, y: u16 },
}

/// Screen rectangle the open editor occupies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bounds {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Bounds {
    #[must_use]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && y >= self.y
            && u32::from(x) < u32::from(self.x) + u32::from(self.width)
            && u32::from(y) < u32::from(self.y) + u32::from(self.height)
    }
}

#[derive(Clone, Debug, Default)]
pub struct FilterEditor {
    state: EditorState,
    bounds: Option<Bounds>,
}

impl FilterEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn open_field(&self) -> Option<Field> {
        match self.state {
            EditorState::Open(field) => Some(field),
            EditorState::Closed => None,
        }
    }

    /// Records where the open editor was rendered.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = Some(bounds);
    }

    /// Applies `event` and mirrors the result into the store's visibility
    /// flags. Returns the new state.
    pub fn handle(&mut self, event: EditorEvent, store: &mut FilterStore) -> EditorState {
        let next = match (self.state, event) {
            (_, EditorEvent::OpenRequest(field)) => EditorState::Open(field),
            (EditorState::Open(open), EditorEvent::ToggleRequest(field)) if open == field => {
                EditorState::Closed
            }
            (_, EditorEvent::ToggleRequest(field)) => EditorState::Open(field),
            (_, EditorEvent::CloseRequest) => EditorState::Closed,
            (EditorState::Open(field), EditorEvent::PointerDown { x, y }) => {
                if self.bounds.is_some_and(|bounds| bounds.contains(x, y)) {
                    EditorState::Open(field)
                } else {
                    EditorState::Closed
                }
            }
            (EditorState::Closed, EditorEvent::PointerDown { .. }) => EditorState::Closed,
        };

        if next != self.state {
            if let EditorState::Open(previous) = self.state {
                store.set_visible(previous, false);
            }
            if let EditorState::Open(field) = next {
                store.set_visible(field, true);
            }
            self.bounds = None;
            tracing::debug!(from = ?self.state, to = ?next, "filter editor transition");
            self.state = next;
        }
        next
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecklistOption {
    pub value: String,
    pub checked: bool,
}

/// The controls shown by an open editor, with their current values.
#[derive(Clone, Debug, PartialEq)]
pub enum EditorControls {
    Checklist { options: Vec<ChecklistOption> },
    Comparison { op: CompareOp, value: f64 },
    DateRange {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl EditorControls {
    /// Builds the controls for `field` from the full source list and the
    /// current spec.
    pub fn for_field(field: Field, source: &[Entry], store: &FilterStore) -> Self {
        let spec = store.get(field);
        match field.kind() {
            FieldKind::Categorical => {
                let selected = match spec {
                    Some(FilterSpec::Values(values)) => values.clone(),
                    _ => BTreeSet::new(),
                };
                let options = distinct_values(field, source)
                    .into_iter()
                    .map(|value| ChecklistOption {
                        checked: selected.contains(&value),
                        value,
                    })
                    .collect();
                Self::Checklist { options }
            }
            FieldKind::Numeric => {
                let cmp = match spec {
                    Some(FilterSpec::Compare(cmp)) => *cmp,
                    _ => Default::default(),
                };
                Self::Comparison {
                    op: cmp.op,
                    value: cmp.value,
                }
            }
            FieldKind::Date => {
                let range = match spec {
                    Some(FilterSpec::Range(range)) => *range,
                    _ => Default::default(),
                };
                Self::DateRange {
                    start: range.start,
                    end: range.end,
                }
            }
        }
    }
}

/// Sorted distinct string forms of `field` across `source`.
pub fn distinct_values(field: Field, source: &[Entry]) -> Vec<String> {
    source
        .iter()
        .map(|entry| field.extract(entry).into_text())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
