//! Filter specifications: what a single column narrows the table to.
use std::{collections::BTreeSet, fmt};

use chrono::NaiveDate;

use crate::columns::FieldKind;

/// Comparison operator of a numeric filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Lt,
    #[default]
    Eq,
}

impl CompareOp {
    pub const ALL: [CompareOp; 3] = [CompareOp::Gt, CompareOp::Lt, CompareOp::Eq];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Eq => "eq",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gt => "Greater than",
            Self::Lt => "Less than",
            Self::Eq => "Equal to",
        }
    }

    /// Next operator in selector order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Gt => Self::Lt,
            Self::Lt => Self::Eq,
            Self::Eq => Self::Gt,
        }
    }

    #[must_use]
    pub fn matches(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Gt => value > threshold,
            Self::Lt => value < threshold,
            Self::Eq => value == threshold,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Numeric filter. A fresh one is `Eq 0` until edited.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Comparison {
    pub op: CompareOp,
    pub value: f64,
}

/// Inclusive date range; either bound may be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// The full filter configuration of one column.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterSpec {
    /// Selected values; an empty set filters nothing.
    Values(BTreeSet<String>),
    Compare(Comparison),
    Range(DateRange),
}

impl FilterSpec {
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Values(_) => FieldKind::Categorical,
            Self::Compare(_) => FieldKind::Numeric,
            Self::Range(_) => FieldKind::Date,
        }
    }

    /// `true` if the spec can exclude at least one record.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::Values(values) => !values.is_empty(),
            Self::Compare(_) => true,
            Self::Range(range) => !range.is_unbounded(),
        }
    }
}

/// A change to one column's filter, as emitted by its editor.
///
/// Comparison and range updates carry a single sub-field and are merged into
/// the existing spec, so editing the operator keeps the threshold and editing
/// one bound keeps the other.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterUpdate {
    Values(BTreeSet<String>),
    CompareOp(CompareOp),
    Threshold(f64),
    RangeStart(Option<NaiveDate>),
    RangeEnd(Option<NaiveDate>),
}

impl FilterUpdate {
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Values(_) => FieldKind::Categorical,
            Self::CompareOp(_) | Self::Threshold(_) => FieldKind::Numeric,
            Self::RangeStart(_) | Self::RangeEnd(_) => FieldKind::Date,
        }
    }

    /// Applies the update on top of `current`, which must be of the same kind
    /// (or absent).
    pub(crate) fn merge(self, current: Option<FilterSpec>) -> FilterSpec {
        match (self, current) {
            (Self::Values(values), _) => FilterSpec::Values(values),
            (Self::CompareOp(op), Some(FilterSpec::Compare(cmp))) => {
                FilterSpec::Compare(Comparison { op, ..cmp })
            }
            (Self::CompareOp(op), _) => FilterSpec::Compare(Comparison { op, value: 0.0 }),
            (Self::Threshold(value), Some(FilterSpec::Compare(cmp))) => {
                FilterSpec::Compare(Comparison { value, ..cmp })
            }
            (Self::Threshold(value), _) => FilterSpec::Compare(Comparison {
                op: CompareOp::default(),
                value,
            }),
            (Self::RangeStart(start), Some(FilterSpec::Range(range))) => {
                FilterSpec::Range(DateRange { start, ..range })
            }
            (Self::RangeStart(start), _) => FilterSpec::Range(DateRange { start, end: None }),
            (Self::RangeEnd(end), Some(FilterSpec::Range(range))) => {
                FilterSpec::Range(DateRange { end, ..range })
            }
            (Self::RangeEnd(end), _) => FilterSpec::Range(DateRange { start: None, end }),
        }
    }
}

/// Reads a threshold typed in a numeric filter box.
///
/// Filters are advisory: anything that is not a finite number becomes `0`
/// instead of an error. Accepts `,` as decimal separator.
#[must_use]
pub fn parse_threshold(input: &str) -> f64 {
    input
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Reads a date typed in a range box; empty or invalid input clears the bound.
#[must_use]
pub fn parse_bound(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}
