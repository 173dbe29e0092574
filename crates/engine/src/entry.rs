//! The module contains the `Entry` type representing one income or expense
//! row of the dashboard, and the fixed value sets its columns draw from.
use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

/// Declares a closed set of labelled values.
///
/// The label is both what the backend sends and what the table shows, so
/// `as_str`, `Display` and `FromStr` all go through it. Parsing ignores
/// ASCII case.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = EngineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| {
                        EngineError::InvalidValue(format!(
                            "{trimmed:?} is not a valid {}",
                            stringify!($name)
                        ))
                    })
            }
        }
    };
}

labelled_enum! {
    /// How an entry was paid.
    PaymentMethod {
        Nu => "NU",
        Porto => "Porto",
        Santander => "Santander",
        Pix => "Pix",
    }
}

labelled_enum! {
    Category {
        Apps => "Apps",
        House => "House",
        Gas => "Gas",
        Internet => "Internet",
        Energy => "Energy",
        HouseInstallment => "House Installment",
        Car => "Car",
        Education => "Education",
        Entertainment => "Entertainment",
        Health => "Health",
        Supermarket => "Supermarket",
        Clothes => "Clothes",
        Pharmacy => "Pharmacy",
        Phone => "Phone",
        Rent => "Rent",
        Gift => "Gift",
        Other => "Other",
        Kids => "Kids",
    }
}

labelled_enum! {
    /// Owner of the card or account the entry was charged to.
    Source {
        Marcelo => "Marcelo",
        Marilia => "Marilia",
        Other => "Other",
    }
}

labelled_enum! {
    EntryType {
        Income => "Income",
        Expense => "Expense",
    }
}

/// A value read from the backend that either parsed or kept its raw text.
///
/// Records are never rejected as a whole because one field is odd; the raw
/// text is kept for display and the filters on that field exclude it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lenient<T> {
    Valid(T),
    Malformed(String),
}

impl<T> Lenient<T> {
    /// Returns the parsed value, if any.
    pub fn valid(&self) -> Option<&T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Malformed(_) => None,
        }
    }
}

impl<T: FromStr> Lenient<T> {
    /// Parses `raw` with `FromStr`, keeping the text on failure.
    pub fn parse(raw: &str) -> Self {
        match raw.parse() {
            Ok(value) => Self::Valid(value),
            Err(_) => Self::Malformed(raw.to_string()),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Lenient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(value) => value.fmt(f),
            Self::Malformed(raw) => f.write_str(raw),
        }
    }
}

/// Stable identifier of an entry, unique within one fetched list.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The creation timestamp exactly as the backend sent it.
///
/// Parsing is deferred to the predicate that needs it; an unparseable value
/// only matters when a date filter is active.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawDate(String);

impl RawDate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Calendar day of the timestamp, in the offset it was written with.
    ///
    /// Accepts RFC 3339 (`2024-01-15T10:00:00Z`), naive timestamps
    /// (`2024-01-15T10:00:00.123456`, `2024-01-15 10:00:00`) and plain dates.
    pub fn date(&self) -> Option<NaiveDate> {
        let raw = self.0.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(dt.date());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

/// Represent a movement: one income or expense.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub amount: Lenient<MoneyCents>,
    pub entry_type: Lenient<EntryType>,
    pub category: Lenient<Category>,
    pub payment_method: Lenient<PaymentMethod>,
    pub source: Lenient<Source>,
    pub installments: Lenient<u32>,
    pub fixed: bool,
    pub description: Option<String>,
    pub created_at: RawDate,
}

impl Entry {
    /// Return a builder for `Entry`, starting from the form defaults.
    pub fn builder(id: impl Into<String>) -> EntryBuilder {
        EntryBuilder::new(id)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} {}",
            self.id, self.amount, self.category, self.created_at.as_str()
        )
    }
}

/// Builder for [`Entry`].
///
/// Unset fields take the defaults of the entry form: an expense paid with
/// Santander by Marcelo, category Supermarket, one installment, not fixed.
#[derive(Debug)]
pub struct EntryBuilder {
    entry: Entry,
}

impl EntryBuilder {
    fn new(id: impl Into<String>) -> Self {
        Self {
            entry: Entry {
                id: EntryId::new(id),
                amount: Lenient::Valid(MoneyCents::ZERO),
                entry_type: Lenient::Valid(EntryType::Expense),
                category: Lenient::Valid(Category::Supermarket),
                payment_method: Lenient::Valid(PaymentMethod::Santander),
                source: Lenient::Valid(Source::Marcelo),
                installments: Lenient::Valid(1),
                fixed: false,
                description: None,
                created_at: RawDate::default(),
            },
        }
    }

    pub fn amount(mut self, amount: Lenient<MoneyCents>) -> Self {
        self.entry.amount = amount;
        self
    }

    /// Shorthand for a valid amount in cents.
    pub fn cents(self, cents: i64) -> Self {
        self.amount(Lenient::Valid(MoneyCents::new(cents)))
    }

    pub fn entry_type(mut self, entry_type: Lenient<EntryType>) -> Self {
        self.entry.entry_type = entry_type;
        self
    }

    pub fn category(mut self, category: Lenient<Category>) -> Self {
        self.entry.category = category;
        self
    }

    pub fn payment_method(mut self, payment_method: Lenient<PaymentMethod>) -> Self {
        self.entry.payment_method = payment_method;
        self
    }

    pub fn source(mut self, source: Lenient<Source>) -> Self {
        self.entry.source = source;
        self
    }

    pub fn installments(mut self, installments: Lenient<u32>) -> Self {
        self.entry.installments = installments;
        self
    }

    pub fn fixed(mut self, fixed: bool) -> Self {
        self.entry.fixed = fixed;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.entry.description = description;
        self
    }

    pub fn created_at(mut self, created_at: impl Into<String>) -> Self {
        self.entry.created_at = RawDate::new(created_at);
        self
    }

    pub fn build(self) -> Entry {
        self.entry
    }
}
