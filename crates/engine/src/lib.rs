pub use columns::{COLUMNS, Field, FieldKind, FieldValue, yes_no};
pub use context::EntryContext;
pub use currency::Currency;
pub use draft::{DESCRIPTION_MAX_CHARS, DraftErrors, DraftField, EntryDraft, NewEntry};
pub use editor::{
    Bounds, ChecklistOption, EditorControls, EditorEvent, EditorState, FilterEditor,
    distinct_values,
};
pub use entry::{
    Category, Entry, EntryBuilder, EntryId, EntryType, Lenient, PaymentMethod, RawDate, Source,
};
pub use error::EngineError;
pub use filter::{
    CompareOp, Comparison, DateRange, FilterSpec, FilterUpdate, parse_bound, parse_threshold,
};
pub use money::MoneyCents;
pub use predicate::{passes, passes_all};
pub use statistics::Statistic;
pub use store::FilterStore;
pub use view::{FilteredView, compute_view};

mod columns;
mod context;
mod currency;
mod draft;
mod editor;
mod entry;
mod error;
mod filter;
mod money;
mod predicate;
mod statistics;
mod store;
mod view;

pub type ResultEngine<T> = Result<T, EngineError>;
