use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod entry {
    use super::*;

    /// Entry identifier as sent by the backend.
    ///
    /// Depending on the backend this is either an integer primary key or a
    /// string id, both are accepted.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum EntryKey {
        Number(i64),
        Text(String),
    }

    /// A numeric field that may arrive as a JSON number or as a decimal
    /// string (e.g. `"12.50"`).
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum NumberOrText {
        Number(f64),
        Text(String),
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub enum EntryType {
        Income,
        #[default]
        Expense,
    }

    /// One row of `GET /expenses/`.
    ///
    /// Every field except `id` is read leniently: missing or oddly typed
    /// values are kept as text and rejected later by the filters that look at
    /// them, never by deserialization.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct EntryView {
        pub id: EntryKey,
        pub amount: Option<NumberOrText>,
        #[serde(default)]
        pub entry_type: Option<String>,
        #[serde(default)]
        pub category: Option<String>,
        #[serde(default)]
        pub payment_method: Option<String>,
        /// Card/account owner. Older backends call it `card_owner`.
        #[serde(default, alias = "card_owner")]
        pub source: Option<String>,
        #[serde(default)]
        pub installments: Option<NumberOrText>,
        #[serde(default)]
        pub fixed: Option<bool>,
        #[serde(default)]
        pub description: Option<String>,
        /// ISO-8601 date or timestamp.
        #[serde(default, alias = "createdAt")]
        pub created_at: Option<String>,
    }

    /// Body of `POST /entries/`, keys in snake_case.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryNew {
        pub entry_type: EntryType,
        pub amount: f64,
        pub installments: u32,
        pub created_at: NaiveDate,
        pub category: String,
        pub source: String,
        pub description: Option<String>,
        pub fixed: bool,
        pub payment_method: String,
    }
}

pub mod error {
    use super::*;

    /// Error body returned by the backend.
    ///
    /// Handlers answer either `{"error": "..."}` or `{"detail": "..."}`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ErrorResponse {
        #[serde(default)]
        pub error: Option<String>,
        #[serde(default)]
        pub detail: Option<Detail>,
    }

    impl ErrorResponse {
        pub fn message(self) -> Option<String> {
            self.error.or_else(|| self.detail.map(|d| d.to_string()))
        }
    }

    /// `detail` is a plain string for most errors and a list of field
    /// errors for validation failures.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum Detail {
        Message(String),
        Fields(Vec<FieldError>),
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FieldError {
        #[serde(default)]
        pub loc: Vec<LocPart>,
        pub msg: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum LocPart {
        Index(u64),
        Name(String),
    }

    impl std::fmt::Display for LocPart {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Index(i) => write!(f, "{i}"),
                Self::Name(name) => f.write_str(name),
            }
        }
    }

    impl std::fmt::Display for Detail {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Message(msg) => f.write_str(msg),
                Self::Fields(fields) => {
                    let parts = fields
                        .iter()
                        .map(|field| {
                            let loc = field
                                .loc
                                .iter()
                                .map(ToString::to_string)
                                .collect::<Vec<_>>()
                                .join(".");
                            if loc.is_empty() {
                                field.msg.clone()
                            } else {
                                format!("{loc}: {}", field.msg)
                            }
                        })
                        .collect::<Vec<_>>();
                    f.write_str(&parts.join("; "))
                }
            }
        }
    }
}
