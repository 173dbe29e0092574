//! Column registry: display labels, record keys, display order and the kind
//! of filter each column takes.
use std::{fmt, str::FromStr};

use chrono::NaiveDate;

use crate::{Entry, EngineError, Lenient};

/// A filterable column of the entries table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    CreatedAt,
    Amount,
    PaymentMethod,
    Category,
    Source,
    Description,
    Installments,
    Fixed,
    EntryType,
}

/// Which predicate family applies to a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Comparison against a threshold.
    Numeric,
    /// Inclusive date range.
    Date,
    /// Membership in a set of selected string values.
    Categorical,
}

/// Columns in display order.
pub const COLUMNS: [Field; 9] = [
    Field::CreatedAt,
    Field::Amount,
    Field::PaymentMethod,
    Field::Category,
    Field::Source,
    Field::Description,
    Field::Installments,
    Field::Fixed,
    Field::EntryType,
];

impl Field {
    /// Header shown in the table.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreatedAt => "Date",
            Self::Amount => "Amount",
            Self::PaymentMethod => "Payment Method",
            Self::Category => "Category",
            Self::Source => "Card Owner",
            Self::Description => "Description",
            Self::Installments => "Installments",
            Self::Fixed => "Fixed",
            Self::EntryType => "Type",
        }
    }

    /// Record key on the wire.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Amount => "amount",
            Self::PaymentMethod => "payment_method",
            Self::Category => "category",
            Self::Source => "card_owner",
            Self::Description => "description",
            Self::Installments => "installments",
            Self::Fixed => "fixed",
            Self::EntryType => "entry_type",
        }
    }

    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Amount | Self::Installments => FieldKind::Numeric,
            Self::CreatedAt => FieldKind::Date,
            Self::PaymentMethod
            | Self::Category
            | Self::Source
            | Self::Description
            | Self::Fixed
            | Self::EntryType => FieldKind::Categorical,
        }
    }

    /// Looks up a column by its header label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        COLUMNS.into_iter().find(|field| field.label() == label)
    }

    /// Reads this column out of an entry.
    ///
    /// This is the only place that maps a column to a record field.
    #[must_use]
    pub fn extract(self, entry: &Entry) -> FieldValue {
        match self {
            Self::Amount => FieldValue::Number(entry.amount.valid().map(|amount| amount.major())),
            Self::Installments => {
                FieldValue::Number(entry.installments.valid().map(|n| f64::from(*n)))
            }
            Self::CreatedAt => FieldValue::Date(entry.created_at.date()),
            Self::PaymentMethod => FieldValue::Text(lenient_text(&entry.payment_method)),
            Self::Category => FieldValue::Text(lenient_text(&entry.category)),
            Self::Source => FieldValue::Text(lenient_text(&entry.source)),
            Self::EntryType => FieldValue::Text(lenient_text(&entry.entry_type)),
            Self::Description => {
                FieldValue::Text(entry.description.clone().unwrap_or_default())
            }
            Self::Fixed => FieldValue::Text(yes_no(entry.fixed).to_string()),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Field {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| EngineError::UnknownColumn(s.to_string()))
    }
}

/// A column value, normalized for filtering.
///
/// `None` inside `Number`/`Date` means the record carried something that did
/// not parse.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Number(Option<f64>),
    Date(Option<NaiveDate>),
    Text(String),
}

impl FieldValue {
    /// String form used by the checklist editor.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Number(Some(value)) => value.to_string(),
            Self::Date(Some(date)) => date.to_string(),
            Self::Number(None) | Self::Date(None) => String::new(),
            Self::Text(text) => text,
        }
    }
}

/// Booleans are filtered and shown as `yes`/`no`.
#[must_use]
pub const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn lenient_text<T: fmt::Display>(value: &Lenient<T>) -> String {
    value.to_string()
}
