mod form;

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use crossterm::event::{self, Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use engine::{
    COLUMNS, ChecklistOption, CompareOp, Currency, EditorControls, EditorEvent, Entry,
    EntryContext, EntryDraft, Field, FieldKind, FilterEditor, FilterSpec, FilterUpdate,
    FilteredView, NewEntry, Statistic, parse_bound, parse_threshold,
};
use tokio::sync::watch;

use crate::{
    client::Client,
    config::AppConfig,
    error::{AppError, Result},
    ui::{self, keymap::AppAction},
};

pub use form::FormState;

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Table,
    Filter,
    Form,
}

/// Work the event loop has to do outside the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Load,
    Create(NewEntry),
    Quit,
}

#[derive(Debug, Default)]
pub struct DashboardState {
    pub loading: bool,
    pub error: Option<String>,
    pub last_refresh: Option<DateTime<Tz>>,
}

#[derive(Debug, Default)]
pub struct TableState {
    /// Index into `COLUMNS`.
    pub column: usize,
    pub selected: usize,
}

impl TableState {
    pub fn focused_field(&self) -> Field {
        COLUMNS[self.column.min(COLUMNS.len() - 1)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorFocus {
    #[default]
    Options,
    Operator,
    Threshold,
    Start,
    End,
}

/// Cursor and text buffers of the open filter editor.
#[derive(Debug, Default)]
pub struct EditorUi {
    pub focus: EditorFocus,
    pub cursor: usize,
    pub threshold: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    pub created_at: Instant,
}

#[derive(Debug)]
pub struct AppState {
    pub entries: EntryContext,
    pub editor: FilterEditor,
    pub editor_ui: EditorUi,
    pub dashboard: DashboardState,
    pub table: TableState,
    pub form: Option<FormState>,
    pub view: FilteredView,
    pub stats: Statistic,
    pub toast: Option<ToastState>,
    pub currency: Currency,
    pub timezone: Tz,
    pub base_url: String,
    view_rx: watch::Receiver<FilteredView>,
}

impl AppState {
    pub fn new(currency: Currency, timezone: Tz, base_url: String) -> Self {
        let entries = EntryContext::new();
        let view_rx = entries.subscribe();
        Self {
            entries,
            editor: FilterEditor::new(),
            editor_ui: EditorUi::default(),
            dashboard: DashboardState::default(),
            table: TableState::default(),
            form: None,
            view: FilteredView::default(),
            stats: Statistic::default(),
            toast: None,
            currency,
            timezone,
            base_url,
            view_rx,
        }
    }

    pub fn mode(&self) -> Mode {
        if self.form.is_some() {
            Mode::Form
        } else if self.editor.open_field().is_some() {
            Mode::Filter
        } else {
            Mode::Table
        }
    }

    /// Controls of the open editor, rebuilt from the current source.
    pub fn open_controls(&self) -> Option<(Field, EditorControls)> {
        let field = self.editor.open_field()?;
        let controls =
            EditorControls::for_field(field, self.entries.source(), self.entries.filters());
        Some((field, controls))
    }

    pub fn handle(&mut self, action: AppAction) -> Option<Request> {
        let request = match self.mode() {
            Mode::Form => self.handle_form(action),
            Mode::Filter => self.handle_filter(action),
            Mode::Table => self.handle_table(action),
        };
        self.sync_view();
        request
    }

    /// A mouse press anywhere on screen.
    pub fn handle_pointer(&mut self, x: u16, y: u16) {
        if self.form.is_some() {
            return;
        }
        let editor = &mut self.editor;
        self.entries
            .update_filters(|store| editor.handle(EditorEvent::PointerDown { x, y }, store));
        self.sync_view();
    }

    pub fn begin_load(&mut self) {
        self.dashboard.loading = true;
    }

    pub fn finish_load(&mut self, result: std::result::Result<Vec<Entry>, String>) {
        self.dashboard.loading = false;
        match result {
            Ok(entries) => {
                tracing::info!(count = entries.len(), "entries loaded");
                self.entries.set_source(entries);
                self.dashboard.error = None;
                self.dashboard.last_refresh = Some(Utc::now().with_timezone(&self.timezone));
            }
            Err(message) => {
                tracing::error!(%message, "failed to load entries");
                self.dashboard.error = Some(message);
                self.show_toast("Failed to load entries", ToastLevel::Error);
            }
        }
        self.sync_view();
    }

    /// Applies the outcome of a create; a success reloads the list.
    pub fn finish_create(&mut self, result: std::result::Result<(), String>) -> Option<Request> {
        match result {
            Ok(()) => {
                tracing::info!("entry created");
                self.form = None;
                self.show_toast("Entry created", ToastLevel::Success);
                Some(Request::Load)
            }
            Err(message) => {
                tracing::warn!(%message, "failed to create entry");
                if let Some(form) = self.form.as_mut() {
                    form.submitting = false;
                    form.message = Some(message);
                }
                None
            }
        }
    }

    pub fn show_toast(&mut self, message: impl Into<String>, level: ToastLevel) {
        self.toast = Some(ToastState {
            message: message.into(),
            level,
            created_at: Instant::now(),
        });
    }

    pub fn expire_toast(&mut self) {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.created_at.elapsed() >= TOAST_TTL)
        {
            self.toast = None;
        }
    }

    /// Pulls the latest view published by the entry context. The selection
    /// follows the selected entry while it stays visible.
    fn sync_view(&mut self) {
        if !self.view_rx.has_changed().unwrap_or(false) {
            return;
        }
        let selected = self
            .view
            .get(self.table.selected)
            .map(|entry| entry.id.clone());
        self.view = self.view_rx.borrow_and_update().clone();
        self.stats = Statistic::from_view(&self.view);

        let kept = selected.and_then(|id| self.view.ids().iter().position(|other| **other == id));
        self.table.selected = kept.unwrap_or_else(|| {
            self.table
                .selected
                .min(self.view.len().saturating_sub(1))
        });
    }

    fn handle_table(&mut self, action: AppAction) -> Option<Request> {
        match action {
            AppAction::Quit | AppAction::Input('q') => return Some(Request::Quit),
            AppAction::Left | AppAction::Input('h') => {
                self.table.column = self.table.column.saturating_sub(1);
            }
            AppAction::Right | AppAction::Input('l') => {
                self.table.column = (self.table.column + 1).min(COLUMNS.len() - 1);
            }
            AppAction::Up | AppAction::Input('k') => {
                self.table.selected = self.table.selected.saturating_sub(1);
            }
            AppAction::Down | AppAction::Input('j') => {
                if !self.view.is_empty() {
                    self.table.selected = (self.table.selected + 1).min(self.view.len() - 1);
                }
            }
            AppAction::Submit | AppAction::Input('f') => {
                let field = self.table.focused_field();
                self.send_editor_event(EditorEvent::ToggleRequest(field));
            }
            AppAction::Input('x') => {
                let field = self.table.focused_field();
                self.entries.update_filters(|store| store.clear(field));
            }
            AppAction::Input('c') => {
                self.entries.clear_filters();
                self.show_toast("Filters cleared", ToastLevel::Info);
            }
            AppAction::Input('r') => return Some(Request::Load),
            AppAction::Input('a') => {
                let today = Utc::now().with_timezone(&self.timezone).date_naive();
                self.form = Some(FormState::new(EntryDraft::new(today)));
            }
            _ => {}
        }
        None
    }

    fn handle_filter(&mut self, action: AppAction) -> Option<Request> {
        let Some((field, controls)) = self.open_controls() else {
            return None;
        };

        match action {
            AppAction::Quit => return Some(Request::Quit),
            AppAction::Cancel => {
                self.send_editor_event(EditorEvent::CloseRequest);
                return None;
            }
            AppAction::Input('x') => {
                self.entries.update_filters(|store| store.clear(field));
                self.reset_editor_ui(field);
                return None;
            }
            _ => {}
        }

        match controls {
            EditorControls::Checklist { options } => self.handle_checklist(field, &options, action),
            EditorControls::Comparison { op, .. } => self.handle_comparison(field, op, action),
            EditorControls::DateRange { .. } => self.handle_date_range(field, action),
        }
        None
    }

    fn handle_checklist(&mut self, field: Field, options: &[ChecklistOption], action: AppAction) {
        match action {
            AppAction::Up => self.editor_ui.cursor = self.editor_ui.cursor.saturating_sub(1),
            AppAction::Down => {
                if !options.is_empty() {
                    self.editor_ui.cursor = (self.editor_ui.cursor + 1).min(options.len() - 1);
                }
            }
            AppAction::Submit | AppAction::Input(' ') => {
                if let Some(option) = options.get(self.editor_ui.cursor) {
                    let value = option.value.clone();
                    if let Err(err) = self
                        .entries
                        .update_filters(|store| store.toggle_value(field, &value))
                    {
                        tracing::error!(%err, field = field.key(), "checklist toggle rejected");
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_comparison(&mut self, field: Field, op: CompareOp, action: AppAction) {
        let ui = &mut self.editor_ui;
        let update = match (ui.focus, action) {
            (_, AppAction::NextField | AppAction::PrevField) => {
                ui.focus = match ui.focus {
                    EditorFocus::Operator => EditorFocus::Threshold,
                    _ => EditorFocus::Operator,
                };
                None
            }
            (_, AppAction::Submit) => {
                self.send_editor_event(EditorEvent::CloseRequest);
                return;
            }
            (EditorFocus::Operator, AppAction::Right | AppAction::Input(' ')) => {
                Some(FilterUpdate::CompareOp(op.next()))
            }
            (EditorFocus::Operator, AppAction::Left) => {
                Some(FilterUpdate::CompareOp(op.next().next()))
            }
            (EditorFocus::Threshold, AppAction::Input(ch)) if is_number_char(ch) => {
                ui.threshold.push(ch);
                Some(FilterUpdate::Threshold(parse_threshold(&ui.threshold)))
            }
            (EditorFocus::Threshold, AppAction::Backspace) => ui
                .threshold
                .pop()
                .map(|_| FilterUpdate::Threshold(parse_threshold(&ui.threshold))),
            _ => None,
        };
        if let Some(update) = update {
            self.apply_update(field, update);
        }
    }

    fn handle_date_range(&mut self, field: Field, action: AppAction) {
        let ui = &mut self.editor_ui;
        let update = match (ui.focus, action) {
            (_, AppAction::NextField | AppAction::PrevField) => {
                ui.focus = match ui.focus {
                    EditorFocus::Start => EditorFocus::End,
                    _ => EditorFocus::Start,
                };
                None
            }
            (_, AppAction::Submit) => {
                self.send_editor_event(EditorEvent::CloseRequest);
                return;
            }
            (EditorFocus::End, AppAction::Input(ch)) if is_date_char(ch) => {
                ui.end.push(ch);
                Some(FilterUpdate::RangeEnd(parse_bound(&ui.end)))
            }
            (EditorFocus::End, AppAction::Backspace) => {
                ui.end.pop();
                Some(FilterUpdate::RangeEnd(parse_bound(&ui.end)))
            }
            (_, AppAction::Input(ch)) if is_date_char(ch) => {
                ui.start.push(ch);
                Some(FilterUpdate::RangeStart(parse_bound(&ui.start)))
            }
            (_, AppAction::Backspace) => {
                ui.start.pop();
                Some(FilterUpdate::RangeStart(parse_bound(&ui.start)))
            }
            _ => None,
        };
        if let Some(update) = update {
            self.apply_update(field, update);
        }
    }

    fn handle_form(&mut self, action: AppAction) -> Option<Request> {
        let form = self.form.as_mut()?;
        if form.submitting {
            return None;
        }
        match action {
            AppAction::Quit => Some(Request::Quit),
            AppAction::Cancel => {
                self.form = None;
                None
            }
            AppAction::Submit => form.submit().map(Request::Create),
            other => {
                form.handle(other);
                None
            }
        }
    }

    fn apply_update(&mut self, field: Field, update: FilterUpdate) {
        if let Err(err) = self
            .entries
            .update_filters(|store| store.set_filter(field, update))
        {
            tracing::error!(%err, field = field.key(), "filter update rejected");
        }
    }

    fn send_editor_event(&mut self, event: EditorEvent) {
        let editor = &mut self.editor;
        let state = self.entries.update_filters(|store| editor.handle(event, store));
        if let engine::EditorState::Open(field) = state {
            self.reset_editor_ui(field);
        }
    }

    /// Seeds the editor buffers from the stored spec of `field`.
    fn reset_editor_ui(&mut self, field: Field) {
        let spec = self.entries.filters().get(field);
        self.editor_ui = match (field.kind(), spec) {
            (FieldKind::Categorical, _) => EditorUi::default(),
            (FieldKind::Numeric, Some(FilterSpec::Compare(cmp))) => EditorUi {
                focus: EditorFocus::Threshold,
                threshold: cmp.value.to_string(),
                ..EditorUi::default()
            },
            (FieldKind::Numeric, _) => EditorUi {
                focus: EditorFocus::Threshold,
                ..EditorUi::default()
            },
            (FieldKind::Date, Some(FilterSpec::Range(range))) => EditorUi {
                focus: EditorFocus::Start,
                start: range.start.map(|d| d.to_string()).unwrap_or_default(),
                end: range.end.map(|d| d.to_string()).unwrap_or_default(),
                ..EditorUi::default()
            },
            (FieldKind::Date, _) => EditorUi {
                focus: EditorFocus::Start,
                ..EditorUi::default()
            },
        };
    }
}

fn is_number_char(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '.' | ',' | '-')
}

fn is_date_char(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '-'
}

pub struct App {
    client: Client,
    pub state: AppState,
    pending: Option<Request>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config)?;
        let state = AppState::new(config.currency()?, config.timezone()?, config.base_url);

        Ok(Self {
            client,
            state,
            pending: Some(Request::Load),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            self.state.expire_toast();
            let mut bounds = None;
            terminal
                .draw(|frame| bounds = ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;
            if let Some(bounds) = bounds {
                self.state.editor.set_bounds(bounds);
            }

            if let Some(request) = self.pending.take() {
                self.execute(request).await;
                continue;
            }

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = ui::keymap::map_key(key);
        self.pending = self.state.handle(action);
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            self.state.handle_pointer(mouse.column, mouse.row);
        }
    }

    async fn execute(&mut self, request: Request) {
        match request {
            Request::Quit => self.should_quit = true,
            Request::Load => {
                self.state.begin_load();
                let result = self
                    .client
                    .list_entries()
                    .await
                    .map_err(|err| err.to_string());
                self.state.finish_load(result);
            }
            Request::Create(entry) => {
                let result = self
                    .client
                    .create_entry(&entry)
                    .await
                    .map_err(|err| err.to_string());
                self.pending = self.state.finish_create(result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use engine::{Category, DraftField, Lenient};

    use super::*;

    fn state() -> AppState {
        let mut state = AppState::new(Currency::Usd, Tz::UTC, "http://test".to_string());
        state.finish_load(Ok(vec![
            Entry::builder("1")
                .cents(1000)
                .category(Lenient::Valid(Category::Gas))
                .created_at("2024-01-01")
                .build(),
            Entry::builder("2")
                .cents(2000)
                .category(Lenient::Valid(Category::Car))
                .created_at("2024-01-15")
                .build(),
            Entry::builder("3")
                .cents(3000)
                .category(Lenient::Valid(Category::Gas))
                .created_at("2024-02-01")
                .build(),
        ]));
        state
    }

    fn focus(state: &mut AppState, field: Field) {
        state.table.column = COLUMNS.iter().position(|f| *f == field).unwrap();
    }

    fn visible_ids(state: &AppState) -> Vec<&str> {
        state.view.iter().map(|entry| entry.id.as_str()).collect()
    }

    #[test]
    fn load_publishes_view_and_stats() {
        let state = state();
        assert_eq!(state.view.len(), 3);
        assert_eq!(state.stats.total.cents(), 6000);
        assert!(state.dashboard.last_refresh.is_some());
        assert!(!state.dashboard.loading);
    }

    #[test]
    fn failed_load_sets_error() {
        let mut state = state();
        state.begin_load();
        state.finish_load(Err("Server unreachable".to_string()));
        assert_eq!(state.dashboard.error.as_deref(), Some("Server unreachable"));
        assert!(!state.dashboard.loading);
        assert_eq!(state.handle(AppAction::Input('r')), Some(Request::Load));
    }

    #[test]
    fn checklist_filters_and_survives_close() {
        let mut state = state();
        focus(&mut state, Field::Category);
        state.handle(AppAction::Submit);
        assert_eq!(state.mode(), Mode::Filter);

        // Options are Car, Gas.
        state.handle(AppAction::Down);
        state.handle(AppAction::Input(' '));
        assert_eq!(visible_ids(&state), ["1", "3"]);
        assert_eq!(state.stats.total.cents(), 4000);

        state.handle(AppAction::Cancel);
        assert_eq!(state.mode(), Mode::Table);
        assert_eq!(visible_ids(&state), ["1", "3"]);

        state.handle(AppAction::Input('c'));
        assert_eq!(state.view.len(), 3);
    }

    #[test]
    fn comparison_editor_types_threshold() {
        let mut state = state();
        focus(&mut state, Field::Amount);
        state.handle(AppAction::Input('f'));
        state.handle(AppAction::Input('1'));
        state.handle(AppAction::Input('5'));
        // Eq 15 matches nothing.
        assert!(state.view.is_empty());

        state.handle(AppAction::NextField);
        state.handle(AppAction::Right);
        assert_eq!(visible_ids(&state), ["2", "3"]);

        state.handle(AppAction::Input('x'));
        assert_eq!(state.view.len(), 3);
        assert!(state.editor_ui.threshold.is_empty());
    }

    #[test]
    fn backspace_on_empty_threshold_adds_no_filter() {
        let mut state = state();
        focus(&mut state, Field::Amount);
        state.handle(AppAction::Submit);
        state.handle(AppAction::Backspace);
        assert!(!state.entries.filters().is_active(Field::Amount));
        assert_eq!(state.view.len(), 3);

        state.handle(AppAction::Input('2'));
        state.handle(AppAction::Backspace);
        // The buffer was not empty, so the edit applies: Eq 0.
        assert!(state.view.is_empty());
    }

    #[test]
    fn selection_follows_the_selected_entry() {
        let mut state = state();
        state.handle(AppAction::Down);
        state.handle(AppAction::Down);
        assert_eq!(state.view.get(state.table.selected).unwrap().id.as_str(), "3");

        // Hiding entry 2 moves entry 3 up one row.
        focus(&mut state, Field::Category);
        state.handle(AppAction::Submit);
        state.handle(AppAction::Down);
        state.handle(AppAction::Input(' '));
        state.handle(AppAction::Cancel);
        assert_eq!(visible_ids(&state), ["1", "3"]);
        assert_eq!(state.table.selected, 1);
        assert_eq!(state.view.get(state.table.selected).unwrap().id.as_str(), "3");
    }

    #[test]
    fn date_editor_sets_both_bounds() {
        let mut state = state();
        focus(&mut state, Field::CreatedAt);
        state.handle(AppAction::Submit);
        for ch in "2024-01-01".chars() {
            state.handle(AppAction::Input(ch));
        }
        state.handle(AppAction::NextField);
        for ch in "2024-01-31".chars() {
            state.handle(AppAction::Input(ch));
        }
        assert_eq!(visible_ids(&state), ["1", "2"]);

        state.handle(AppAction::Submit);
        assert_eq!(state.mode(), Mode::Table);
        assert_eq!(visible_ids(&state), ["1", "2"]);
    }

    #[test]
    fn click_outside_editor_closes_it() {
        let mut state = state();
        state.handle(AppAction::Submit);
        state.editor.set_bounds(engine::Bounds {
            x: 0,
            y: 0,
            width: 10,
            height: 10,
        });
        state.handle_pointer(5, 5);
        assert_eq!(state.mode(), Mode::Filter);
        state.handle_pointer(50, 5);
        assert_eq!(state.mode(), Mode::Table);
    }

    #[test]
    fn form_submit_and_failure_keep_form_open() {
        let mut state = state();
        state.handle(AppAction::Input('a'));
        assert_eq!(state.mode(), Mode::Form);

        assert_eq!(state.handle(AppAction::Submit), None);
        let form = state.form.as_ref().unwrap();
        assert_eq!(form.errors.get(DraftField::Amount), Some("Enter a valid amount"));

        state.handle(AppAction::NextField);
        for ch in "42".chars() {
            state.handle(AppAction::Input(ch));
        }
        let Some(Request::Create(entry)) = state.handle(AppAction::Submit) else {
            panic!("valid form should request a create");
        };
        assert_eq!(entry.amount.cents(), 4200);

        assert_eq!(state.finish_create(Err("Server error: boom".to_string())), None);
        let form = state.form.as_ref().unwrap();
        assert_eq!(form.message.as_deref(), Some("Server error: boom"));

        state.handle(AppAction::Submit);
        assert_eq!(state.finish_create(Ok(())), Some(Request::Load));
        assert!(state.form.is_none());
        assert!(state.toast.is_some());
    }

    #[test]
    fn quit_from_table_only_on_q() {
        let mut state = state();
        assert_eq!(state.handle(AppAction::Input('q')), Some(Request::Quit));
        state.handle(AppAction::Input('a'));
        assert_eq!(state.handle(AppAction::Input('q')), None);
    }
}
