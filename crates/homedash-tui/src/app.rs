//! Application state for the Homedash widget.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use homedash_core::{
    Arrangement, Catalog, ConnectionState, Item, ViewState, WidgetConfig, arrange,
};

use crate::editor::{EditorAction, EditorState};
use crate::events::{EditorEvent, PollEvent};

/// Input mode of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigating the tile grid.
    Browse,
    /// Typing into the search bar.
    Search,
    /// The configuration editor overlay is open.
    Editor,
}

/// Side effects the main loop must carry out after a key press.
#[derive(Debug, PartialEq)]
pub enum Command {
    /// Nothing to do.
    None,
    /// Quit the widget.
    Quit,
    /// Trigger one extra poll cycle.
    Retry,
    /// Open a service link with the platform opener.
    OpenUrl(String),
    /// The configuration changed; restart the poller with it.
    RestartPoller,
    /// Run a connection test against the draft configuration.
    TestConnection(WidgetConfig),
    /// Fetch the item list for the editor picker.
    FetchItems(WidgetConfig),
}

/// Main application state.
pub struct App {
    /// Main loop keeps running while true.
    pub running: bool,
    /// Active (persisted) configuration.
    pub config: WidgetConfig,
    /// Where the configuration is persisted, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Reconciled items and statuses.
    pub catalog: Catalog,
    /// Outcome of the most recent poll cycle.
    pub connection: ConnectionState,
    /// Message from the last failed cycle, cleared on success.
    pub error: Option<String>,
    /// Per-mount view state.
    pub view: ViewState,
    /// Current input mode.
    pub mode: Mode,
    /// Editor overlay state while open.
    pub editor: Option<EditorState>,
}

impl App {
    /// Creates the widget state for a validated configuration.
    #[must_use]
    pub fn new(config: WidgetConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            running: true,
            config,
            config_path,
            catalog: Catalog::new(),
            connection: ConnectionState::Loading,
            error: None,
            view: ViewState::new(),
            mode: Mode::Browse,
            editor: None,
        }
    }

    /// Applies one poll-cycle outcome.
    ///
    /// A finished cycle always transitions to connected and clears the
    /// stored error, even when both fetches failed individually; only a
    /// failed cycle disconnects.
    pub fn apply_poll_event(&mut self, event: PollEvent) {
        match event {
            PollEvent::CycleStarted => {
                self.connection = ConnectionState::Loading;
            }
            PollEvent::CycleFinished { items, statuses } => {
                if let Some(payload) = items {
                    self.catalog.apply_items(payload);
                }
                if let Some(payload) = statuses {
                    self.catalog.apply_statuses(payload);
                }
                self.connection = ConnectionState::Connected;
                self.error = None;
                let len = self.visible_items().len();
                self.view.clamp_cursor(len);
            }
            PollEvent::CycleFailed(message) => {
                self.connection = ConnectionState::Disconnected;
                self.error = Some(message);
            }
        }
    }

    /// Routes a background editor result to the open editor, if any.
    pub fn apply_editor_event(&mut self, event: EditorEvent) {
        if let Some(editor) = &mut self.editor {
            editor.apply_event(event);
        }
    }

    /// The filtered, optionally grouped item view for rendering.
    #[must_use]
    pub fn arrangement(&self) -> Arrangement<'_> {
        arrange(
            self.catalog.items(),
            &self.config.selected_items,
            &self.view.search_term,
            self.config.show_categories,
        )
    }

    /// Visible items in display order, skipping collapsed categories.
    ///
    /// This is the sequence the tile cursor moves over.
    #[must_use]
    pub fn visible_items(&self) -> Vec<&Item> {
        match self.arrangement() {
            Arrangement::Flat(items) => items,
            Arrangement::Grouped(groups) => groups
                .into_iter()
                .filter(|(name, _)| !self.view.is_collapsed(name))
                .flat_map(|(_, items)| items)
                .collect(),
        }
    }

    /// True when the full-area loading screen should be shown.
    #[must_use]
    pub fn show_loading_screen(&self) -> bool {
        self.connection == ConnectionState::Loading && !self.catalog.has_items()
    }

    /// True when the disconnect screen with the retry hint should be
    /// shown. With stale data on screen, failures stay invisible apart
    /// from the header badge.
    #[must_use]
    pub fn show_error_screen(&self) -> bool {
        self.error.is_some() && !self.catalog.has_items()
    }

    /// Handles a key press in the current mode.
    pub fn handle_key(&mut self, key: KeyEvent) -> Command {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return Command::Quit;
        }
        match self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Search => self.handle_search_key(key),
            Mode::Editor => self.handle_editor_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Command {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.running = false;
                Command::Quit
            }
            KeyCode::Char('r') => Command::Retry,
            KeyCode::Char('e') => {
                self.editor = Some(EditorState::open(&self.config));
                self.mode = Mode::Editor;
                Command::None
            }
            KeyCode::Char('/') if self.config.show_search => {
                self.mode = Mode::Search;
                Command::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.view.cursor_up();
                Command::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.visible_items().len();
                self.view.cursor_down(len);
                Command::None
            }
            KeyCode::Char('c') if self.config.show_categories => {
                let category = self
                    .visible_items()
                    .get(self.view.cursor)
                    .map(|item| item.category_key().to_string());
                if let Some(category) = category {
                    self.view.toggle_category(&category);
                    let len = self.visible_items().len();
                    self.view.clamp_cursor(len);
                }
                Command::None
            }
            KeyCode::Enter => self
                .visible_items()
                .get(self.view.cursor)
                .and_then(|item| item.url.clone())
                .map_or(Command::None, Command::OpenUrl),
            _ => Command::None,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Command {
        match key.code {
            KeyCode::Esc => {
                self.view.search_term.clear();
                self.mode = Mode::Browse;
            }
            KeyCode::Enter => {
                self.mode = Mode::Browse;
            }
            KeyCode::Backspace => {
                self.view.search_term.pop();
            }
            KeyCode::Char(c) => {
                self.view.search_term.push(c);
            }
            _ => {}
        }
        let len = self.visible_items().len();
        self.view.clamp_cursor(len);
        Command::None
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Command {
        let Some(editor) = &mut self.editor else {
            self.mode = Mode::Browse;
            return Command::None;
        };
        match editor.handle_key(key) {
            EditorAction::None => Command::None,
            EditorAction::Discard => {
                self.close_editor();
                Command::None
            }
            EditorAction::Test => Command::TestConnection(editor.draft().clone()),
            EditorAction::Fetch => Command::FetchItems(editor.draft().clone()),
            EditorAction::Save => self.save_editor(),
        }
    }

    fn close_editor(&mut self) {
        self.editor = None;
        self.mode = Mode::Browse;
    }

    /// Replaces the active configuration with the editor draft, persists
    /// it and asks the main loop to restart the poller.
    fn save_editor(&mut self) -> Command {
        let Some(editor) = &mut self.editor else {
            return Command::None;
        };
        let draft = editor.draft().clone();
        if let Err(err) = draft.validate() {
            editor.set_message(err.to_string());
            return Command::None;
        }
        if let Some(path) = &self.config_path {
            if let Err(err) = draft.save(path) {
                tracing::warn!(error = %err, "failed to persist configuration");
                editor.set_message(err.to_string());
                return Command::None;
            }
        }
        self.config = draft;
        self.close_editor();
        let len = self.visible_items().len();
        self.view.clamp_cursor(len);
        Command::RestartPoller
    }
}
