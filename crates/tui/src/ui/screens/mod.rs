pub mod entry_form;
pub mod filter_editor;
pub mod stats;
pub mod table;
