use engine::{
    Category, DraftErrors, DraftField, EntryDraft, EntryType, NewEntry, PaymentMethod, Source,
};

use crate::ui::keymap::AppAction;

/// The new-entry popup.
#[derive(Debug)]
pub struct FormState {
    pub draft: EntryDraft,
    pub focus: DraftField,
    pub errors: DraftErrors,
    /// Last create failure reported by the backend.
    pub message: Option<String>,
    pub submitting: bool,
}

impl FormState {
    pub fn new(draft: EntryDraft) -> Self {
        Self {
            draft,
            focus: DraftField::ALL[0],
            errors: DraftErrors::default(),
            message: None,
            submitting: false,
        }
    }

    /// Validates the draft. Returns the entry to send, or keeps the errors
    /// for display.
    pub fn submit(&mut self) -> Option<NewEntry> {
        match self.draft.validate() {
            Ok(entry) => {
                self.errors = DraftErrors::default();
                self.message = None;
                self.submitting = true;
                Some(entry)
            }
            Err(errors) => {
                tracing::debug!(%errors, "entry draft rejected");
                self.errors = errors;
                None
            }
        }
    }

    pub fn handle(&mut self, action: AppAction) {
        match action {
            AppAction::NextField => self.focus = step(self.focus, 1),
            AppAction::PrevField => self.focus = step(self.focus, DraftField::ALL.len() - 1),
            AppAction::Down => self.focus = step(self.focus, 1),
            AppAction::Up => self.focus = step(self.focus, DraftField::ALL.len() - 1),
            AppAction::Right => self.cycle(true),
            AppAction::Left => self.cycle(false),
            AppAction::Backspace => {
                if let Some(text) = self.text_mut() {
                    text.pop();
                }
            }
            AppAction::Input(' ') if self.focus == DraftField::Fixed => {
                self.draft.fixed = !self.draft.fixed;
            }
            AppAction::Input(ch) => {
                if let Some(text) = self.text_mut() {
                    text.push(ch);
                }
            }
            _ => {}
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            DraftField::Amount => Some(&mut self.draft.amount),
            DraftField::Installments => Some(&mut self.draft.installments),
            DraftField::CreatedAt => Some(&mut self.draft.created_at),
            DraftField::Description => Some(&mut self.draft.description),
            _ => None,
        }
    }

    fn cycle(&mut self, forward: bool) {
        let draft = &mut self.draft;
        match self.focus {
            DraftField::EntryType => {
                draft.entry_type = next_of(EntryType::ALL, Some(draft.entry_type), forward)
                    .unwrap_or(draft.entry_type);
            }
            DraftField::Category => {
                draft.category = next_of(Category::ALL, draft.category, forward);
            }
            DraftField::Source => draft.source = next_of(Source::ALL, draft.source, forward),
            DraftField::PaymentMethod => {
                draft.payment_method = next_of(PaymentMethod::ALL, draft.payment_method, forward);
            }
            DraftField::Fixed => draft.fixed = !draft.fixed,
            _ => {}
        }
    }
}

fn step(field: DraftField, by: usize) -> DraftField {
    let all = DraftField::ALL;
    let index = all.iter().position(|f| *f == field).unwrap_or(0);
    all[(index + by) % all.len()]
}

/// Neighbour of `current` in `all`, wrapping. An unset value starts at the
/// first option.
fn next_of<T: Copy + PartialEq>(all: &[T], current: Option<T>, forward: bool) -> Option<T> {
    let Some(current) = current else {
        return all.first().copied();
    };
    let index = all.iter().position(|value| *value == current)?;
    let next = if forward {
        (index + 1) % all.len()
    } else {
        (index + all.len() - 1) % all.len()
    };
    all.get(next).copied()
}
