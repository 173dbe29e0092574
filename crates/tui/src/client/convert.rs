//! Wire shapes to engine types and back.
use api_types::entry::{self as wire, EntryKey, EntryNew, EntryView, NumberOrText};
use engine::{Entry, EntryType, Lenient, MoneyCents, NewEntry};

/// Maps one listed row into an engine entry. Never fails: fields that do not
/// parse are kept as raw text.
pub fn entry_from_view(view: EntryView) -> Entry {
    let id = match view.id {
        EntryKey::Number(id) => id.to_string(),
        EntryKey::Text(id) => id,
    };

    let entry_type = view
        .entry_type
        .as_deref()
        .map_or(Lenient::Valid(EntryType::Expense), Lenient::parse);

    Entry::builder(id)
        .amount(amount(view.amount))
        .entry_type(entry_type)
        .category(required_label(view.category))
        .payment_method(required_label(view.payment_method))
        .source(required_label(view.source))
        .installments(installments(view.installments))
        .fixed(view.fixed.unwrap_or(false))
        .description(view.description)
        .created_at(view.created_at.unwrap_or_default())
        .build()
}

/// Body for the create endpoint.
pub fn payload_from_new(entry: &NewEntry) -> EntryNew {
    EntryNew {
        entry_type: match entry.entry_type {
            EntryType::Income => wire::EntryType::Income,
            EntryType::Expense => wire::EntryType::Expense,
        },
        amount: entry.amount.major(),
        installments: entry.installments,
        created_at: entry.created_at,
        category: entry.category.as_str().to_string(),
        source: entry.source.as_str().to_string(),
        description: entry.description.clone(),
        fixed: entry.fixed,
        payment_method: entry.payment_method.as_str().to_string(),
    }
}

fn amount(raw: Option<NumberOrText>) -> Lenient<MoneyCents> {
    match raw {
        None => Lenient::Malformed(String::new()),
        Some(NumberOrText::Number(value)) => MoneyCents::from_major(value)
            .map_or_else(|| Lenient::Malformed(value.to_string()), Lenient::Valid),
        Some(NumberOrText::Text(text)) => text
            .parse::<MoneyCents>()
            .ok()
            .or_else(|| text.trim().parse::<f64>().ok().and_then(MoneyCents::from_major))
            .map_or(Lenient::Malformed(text), Lenient::Valid),
    }
}

fn installments(raw: Option<NumberOrText>) -> Lenient<u32> {
    match raw {
        None => Lenient::Valid(1),
        Some(NumberOrText::Number(value)) => {
            if value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX) {
                Lenient::Valid(value as u32)
            } else {
                Lenient::Malformed(value.to_string())
            }
        }
        Some(NumberOrText::Text(text)) => Lenient::parse(text.trim()),
    }
}

fn required_label<T: std::str::FromStr>(raw: Option<String>) -> Lenient<T> {
    raw.as_deref()
        .map_or_else(|| Lenient::Malformed(String::new()), Lenient::parse)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use engine::{Category, PaymentMethod, Source};

    use super::*;

    fn view(json: &str) -> EntryView {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn well_formed_row() {
        let entry = entry_from_view(view(
            r#"{"id": 7, "amount": 49.9, "entry_type": "Income", "category": "Gas",
                "payment_method": "NU", "card_owner": "Marilia", "installments": 3,
                "fixed": true, "description": "fuel", "createdAt": "2024-01-15T10:00:00Z"}"#,
        ));
        assert_eq!(entry.id.as_str(), "7");
        assert_eq!(entry.amount, Lenient::Valid(MoneyCents::new(4990)));
        assert_eq!(entry.entry_type, Lenient::Valid(EntryType::Income));
        assert_eq!(entry.category, Lenient::Valid(Category::Gas));
        assert_eq!(entry.payment_method, Lenient::Valid(PaymentMethod::Nu));
        assert_eq!(entry.source, Lenient::Valid(Source::Marilia));
        assert_eq!(entry.installments, Lenient::Valid(3));
        assert!(entry.fixed);
        assert_eq!(entry.created_at.date(), NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn odd_values_are_kept_as_text() {
        let entry = entry_from_view(view(
            r#"{"id": "a1", "amount": "lots", "category": "Food", "installments": 1.5}"#,
        ));
        assert_eq!(entry.amount, Lenient::Malformed("lots".to_string()));
        assert_eq!(entry.category, Lenient::Malformed("Food".to_string()));
        assert_eq!(entry.payment_method, Lenient::Malformed(String::new()));
        assert_eq!(entry.installments, Lenient::Malformed("1.5".to_string()));
        assert_eq!(entry.entry_type, Lenient::Valid(EntryType::Expense));
        assert!(!entry.fixed);
        assert_eq!(entry.created_at.date(), None);
    }

    #[test]
    fn decimal_strings_are_amounts() {
        let entry = entry_from_view(view(r#"{"id": 1, "amount": "1e2"}"#));
        assert_eq!(entry.amount, Lenient::Valid(MoneyCents::new(10_000)));
        let entry = entry_from_view(view(r#"{"id": 1, "amount": "10,50"}"#));
        assert_eq!(entry.amount, Lenient::Valid(MoneyCents::new(1050)));
    }

    #[test]
    fn payload_uses_labels() {
        let new = NewEntry {
            entry_type: EntryType::Expense,
            amount: MoneyCents::new(1999),
            installments: 2,
            created_at: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            category: Category::HouseInstallment,
            source: Source::Other,
            payment_method: PaymentMethod::Nu,
            description: None,
            fixed: false,
        };
        let json = serde_json::to_value(payload_from_new(&new)).unwrap();
        assert_eq!(json["amount"], 19.99);
        assert_eq!(json["category"], "House Installment");
        assert_eq!(json["payment_method"], "NU");
        assert_eq!(json["entry_type"], "Expense");
        assert_eq!(json["created_at"], "2024-03-01");
    }
}
