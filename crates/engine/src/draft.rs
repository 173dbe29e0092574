//! The new-entry form: raw text as typed, and its validation into a
//! [`NewEntry`].
use std::{collections::BTreeMap, fmt};

use chrono::{Local, NaiveDate};

use crate::{Category, EntryType, MoneyCents, PaymentMethod, Source};

/// Longest description the backend accepts, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Form fields, in the order the form shows them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DraftField {
    EntryType,
    Amount,
    Installments,
    CreatedAt,
    Category,
    Source,
    PaymentMethod,
    Description,
    Fixed,
}

impl DraftField {
    pub const ALL: [DraftField; 9] = [
        DraftField::EntryType,
        DraftField::Amount,
        DraftField::Installments,
        DraftField::CreatedAt,
        DraftField::Category,
        DraftField::Source,
        DraftField::PaymentMethod,
        DraftField::Description,
        DraftField::Fixed,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EntryType => "Type",
            Self::Amount => "Amount",
            Self::Installments => "Installments",
            Self::CreatedAt => "Date",
            Self::Category => "Category",
            Self::Source => "Source",
            Self::PaymentMethod => "Payment Method",
            Self::Description => "Description",
            Self::Fixed => "Fixed",
        }
    }
}

/// Form state before validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryDraft {
    pub entry_type: EntryType,
    pub amount: String,
    pub installments: String,
    pub created_at: String,
    pub category: Option<Category>,
    pub source: Option<Source>,
    pub payment_method: Option<PaymentMethod>,
    pub description: String,
    pub fixed: bool,
}

/// A validated entry, ready to be sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEntry {
    pub entry_type: EntryType,
    pub amount: MoneyCents,
    pub installments: u32,
    pub created_at: NaiveDate,
    pub category: Category,
    pub source: Source,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
    pub fixed: bool,
}

/// Validation messages keyed by field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DraftErrors(BTreeMap<DraftField, &'static str>);

impl DraftErrors {
    pub fn get(&self, field: DraftField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DraftField, &'static str)> + '_ {
        self.0.iter().map(|(field, msg)| (*field, *msg))
    }

    fn push(&mut self, field: DraftField, msg: &'static str) {
        self.0.entry(field).or_insert(msg);
    }
}

impl fmt::Display for DraftErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, msg)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {msg}", field.label())?;
        }
        Ok(())
    }
}

impl std::error::Error for DraftErrors {}

impl EntryDraft {
    /// A blank form dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            entry_type: EntryType::Expense,
            amount: String::new(),
            installments: "1".to_string(),
            created_at: today.format("%Y-%m-%d").to_string(),
            category: Some(Category::Supermarket),
            source: Some(Source::Marcelo),
            payment_method: Some(PaymentMethod::Santander),
            description: String::new(),
            fixed: false,
        }
    }

    /// Checks every field and collects all messages at once.
    pub fn validate(&self) -> Result<NewEntry, DraftErrors> {
        let mut errors = DraftErrors::default();

        let amount = match self.amount.parse::<MoneyCents>() {
            Ok(amount) if amount.is_positive() => Some(amount),
            Ok(_) => {
                errors.push(DraftField::Amount, "Must be greater than zero");
                None
            }
            Err(_) => {
                errors.push(DraftField::Amount, "Enter a valid amount");
                None
            }
        };

        let installments = match self.installments.trim() {
            "" => Some(1),
            raw => match raw.parse::<i64>() {
                Ok(n) if n >= 1 => match u32::try_from(n) {
                    Ok(n) => Some(n),
                    Err(_) => {
                        errors.push(DraftField::Installments, "Enter a valid integer");
                        None
                    }
                },
                Ok(_) => {
                    errors.push(DraftField::Installments, "Must be at least 1");
                    None
                }
                Err(_) => {
                    errors.push(DraftField::Installments, "Enter a valid integer");
                    None
                }
            },
        };

        let created_at = NaiveDate::parse_from_str(self.created_at.trim(), "%Y-%m-%d").ok();
        if created_at.is_none() {
            errors.push(DraftField::CreatedAt, "Pick a date");
        }
        if self.category.is_none() {
            errors.push(DraftField::Category, "Pick a category");
        }
        if self.source.is_none() {
            errors.push(DraftField::Source, "Pick a source");
        }
        if self.payment_method.is_none() {
            errors.push(DraftField::PaymentMethod, "Pick a method");
        }
        if self.description.chars().count() > DESCRIPTION_MAX_CHARS {
            errors.push(DraftField::Description, "Max 200 characters");
        }

        match (
            amount,
            installments,
            created_at,
            self.category,
            self.source,
            self.payment_method,
        ) {
            (
                Some(amount),
                Some(installments),
                Some(created_at),
                Some(category),
                Some(source),
                Some(payment_method),
            ) if errors.is_empty() => {
                let description = self.description.trim();
                Ok(NewEntry {
                    entry_type: self.entry_type,
                    amount,
                    installments,
                    created_at,
                    category,
                    source,
                    payment_method,
                    description: (!description.is_empty()).then(|| description.to_string()),
                    fixed: self.fixed,
                })
            }
            _ => Err(errors),
        }
    }
}

impl Default for EntryDraft {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}
