//! Configuration editor overlay.
//!
//! The editor works on a draft copy of the widget configuration; nothing
//! touches the live state until the draft is saved. Its two background
//! actions, the connection test and the item-list fetch for the selection
//! picker, report back through [`EditorEvent`]s.

use crossterm::event::{KeyCode, KeyEvent};
use homedash_core::{Item, MAX_COLUMNS, MIN_COLUMNS, WidgetConfig};

use crate::events::EditorEvent;

/// Fields the editor focus can land on, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Widget title.
    Title,
    /// Base URL of the catalog server.
    ServerUrl,
    /// Optional bearer token.
    ApiKey,
    /// Grid column count.
    Columns,
    /// Poll interval in seconds.
    PollInterval,
    /// Search bar toggle.
    ShowSearch,
    /// Category grouping toggle.
    ShowCategories,
    /// Status dot toggle.
    ShowStatus,
    /// Open-in-new-tab toggle.
    OpenInNewTab,
    /// Item selection picker.
    Items,
}

const FIELD_ORDER: [Field; 10] = [
    Field::Title,
    Field::ServerUrl,
    Field::ApiKey,
    Field::Columns,
    Field::PollInterval,
    Field::ShowSearch,
    Field::ShowCategories,
    Field::ShowStatus,
    Field::OpenInNewTab,
    Field::Items,
];

/// Outcome of the latest connection test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestState {
    /// No test has run against the current draft.
    Idle,
    /// A test is in flight.
    Testing,
    /// The health endpoint answered.
    Success,
    /// The test failed with the given reason.
    Failed(String),
}

/// What the app should do after an editor key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// Nothing beyond internal state changes.
    None,
    /// Close the editor, dropping the draft.
    Discard,
    /// Validate, persist and apply the draft.
    Save,
    /// Run the connection test against the draft.
    Test,
    /// Fetch the item list for the picker using the draft.
    Fetch,
}

/// State of the open editor overlay.
pub struct EditorState {
    draft: WidgetConfig,
    focus: Field,
    editing: bool,
    items: Vec<Item>,
    item_cursor: usize,
    test: TestState,
    message: Option<String>,
}

impl EditorState {
    /// Opens the editor on a draft copy of the active configuration.
    #[must_use]
    pub fn open(config: &WidgetConfig) -> Self {
        Self {
            draft: config.clone(),
            focus: Field::Title,
            editing: false,
            items: Vec::new(),
            item_cursor: 0,
            test: TestState::Idle,
            message: None,
        }
    }

    /// The draft configuration being edited.
    #[must_use]
    pub fn draft(&self) -> &WidgetConfig {
        &self.draft
    }

    /// The focused field.
    #[must_use]
    pub fn focus(&self) -> Field {
        self.focus
    }

    /// True while a text field is accepting keystrokes.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Items fetched for the selection picker.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Picker cursor position.
    #[must_use]
    pub fn item_cursor(&self) -> usize {
        self.item_cursor
    }

    /// Latest connection-test outcome.
    #[must_use]
    pub fn test(&self) -> &TestState {
        &self.test
    }

    /// Status line content, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Sets the status line, replacing any previous message.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Applies a background result to the editor.
    pub fn apply_event(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::TestFinished(Ok(())) => {
                self.test = TestState::Success;
            }
            EditorEvent::TestFinished(Err(reason)) => {
                self.test = TestState::Failed(reason);
            }
            EditorEvent::ItemsFetched(items) => {
                self.items = items;
                self.item_cursor = self.item_cursor.min(self.items.len().saturating_sub(1));
            }
        }
    }

    /// Handles one key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        if self.editing {
            self.handle_text_key(key);
            return EditorAction::None;
        }
        match key.code {
            KeyCode::Esc => EditorAction::Discard,
            KeyCode::Char('s') => EditorAction::Save,
            KeyCode::Char('t') => {
                self.test = TestState::Testing;
                EditorAction::Test
            }
            KeyCode::Char('f') => EditorAction::Fetch,
            KeyCode::Tab | KeyCode::Down if self.focus != Field::Items => {
                self.focus_next();
                EditorAction::None
            }
            KeyCode::BackTab | KeyCode::Up if self.focus != Field::Items => {
                self.focus_prev();
                EditorAction::None
            }
            _ => {
                self.handle_field_key(key);
                EditorAction::None
            }
        }
    }

    fn focus_index(&self) -> usize {
        FIELD_ORDER
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0)
    }

    fn focus_next(&mut self) {
        let idx = self.focus_index();
        self.focus = FIELD_ORDER[(idx + 1) % FIELD_ORDER.len()];
    }

    fn focus_prev(&mut self) {
        let idx = self.focus_index();
        self.focus = FIELD_ORDER[(idx + FIELD_ORDER.len() - 1) % FIELD_ORDER.len()];
    }

    fn handle_field_key(&mut self, key: KeyEvent) {
        match self.focus {
            Field::Title | Field::ServerUrl | Field::ApiKey => {
                if key.code == KeyCode::Enter {
                    self.editing = true;
                }
            }
            Field::Columns => match key.code {
                KeyCode::Left | KeyCode::Char('-') => {
                    self.draft.columns = self.draft.columns.saturating_sub(1).max(MIN_COLUMNS);
                }
                KeyCode::Right | KeyCode::Char('+') => {
                    self.draft.columns = (self.draft.columns + 1).min(MAX_COLUMNS);
                }
                _ => {}
            },
            Field::PollInterval => match key.code {
                KeyCode::Left | KeyCode::Char('-') => {
                    self.draft.poll_interval = self.draft.poll_interval.saturating_sub(5);
                }
                KeyCode::Right | KeyCode::Char('+') => {
                    self.draft.poll_interval = self.draft.poll_interval.saturating_add(5);
                }
                _ => {}
            },
            Field::ShowSearch => {
                if key.code == KeyCode::Char(' ') || key.code == KeyCode::Enter {
                    self.draft.show_search = !self.draft.show_search;
                }
            }
            Field::ShowCategories => {
                if key.code == KeyCode::Char(' ') || key.code == KeyCode::Enter {
                    self.draft.show_categories = !self.draft.show_categories;
                }
            }
            Field::ShowStatus => {
                if key.code == KeyCode::Char(' ') || key.code == KeyCode::Enter {
                    self.draft.show_status = !self.draft.show_status;
                }
            }
            Field::OpenInNewTab => {
                if key.code == KeyCode::Char(' ') || key.code == KeyCode::Enter {
                    self.draft.open_in_new_tab = !self.draft.open_in_new_tab;
                }
            }
            Field::Items => self.handle_picker_key(key),
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => {
                if self.item_cursor == 0 {
                    self.focus_prev();
                } else {
                    self.item_cursor -= 1;
                }
            }
            KeyCode::Down => {
                if self.item_cursor + 1 < self.items.len() {
                    self.item_cursor += 1;
                }
            }
            KeyCode::Tab => self.focus_next(),
            KeyCode::BackTab => self.focus_prev(),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(item) = self.items.get(self.item_cursor) {
                    let id = item.id.clone();
                    if let Some(pos) =
                        self.draft.selected_items.iter().position(|s| *s == id)
                    {
                        self.draft.selected_items.remove(pos);
                    } else {
                        self.draft.selected_items.push(id);
                    }
                }
            }
            KeyCode::Char('a') => {
                self.draft.selected_items =
                    self.items.iter().map(|item| item.id.clone()).collect();
            }
            KeyCode::Char('x') => {
                self.draft.selected_items.clear();
            }
            _ => {}
        }
    }

    fn handle_text_key(&mut self, key: KeyEvent) {
        let buffer = match self.focus {
            Field::Title => &mut self.draft.title,
            Field::ServerUrl => &mut self.draft.server_url,
            Field::ApiKey => {
                // The key is optional: an emptied buffer means "no token".
                match key.code {
                    KeyCode::Enter | KeyCode::Esc => self.editing = false,
                    KeyCode::Backspace => {
                        if let Some(token) = &mut self.draft.api_key {
                            token.pop();
                            if token.is_empty() {
                                self.draft.api_key = None;
                            }
                        }
                    }
                    KeyCode::Char(c) => {
                        self.draft.api_key.get_or_insert_with(String::new).push(c);
                    }
                    _ => {}
                }
                return;
            }
            _ => {
                self.editing = false;
                return;
            }
        };
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.editing = false,
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => {}
        }
        // Editing the target server invalidates the last test verdict.
        if matches!(self.focus, Field::ServerUrl) {
            self.test = TestState::Idle;
        }
    }
}
