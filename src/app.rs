//! App state and core application logic
//!
//! Owns the search term, result cards, favorites, active tab and overlays.
//! Key handling mutates state and queues [`Action`]s; completed background
//! work comes back through [`App::apply_event`].

use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, error, info};

use crate::api::TrailerOutcome;
use crate::launch::LaunchTarget;
use crate::models::{MovieDetail, MovieSummary, Tab};
use crate::storage::{FavoritesStore, FeedbackStore, KeyValueStore, Toggle};
use crate::tasks::{Action, AppEvent};

/// Cards per grid row
pub const GRID_COLUMNS: usize = 3;

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
    /// Typing into the open card's feedback box
    Feedback,
}

// =============================================================================
// Loading State
// =============================================================================

/// Loading state of the search grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingState {
    /// Idle - no loading in progress
    #[default]
    Idle,
    /// Search request in flight
    Searching,
    /// Summaries in, detail lookups in flight
    Details,
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        !matches!(self, LoadingState::Idle)
    }

    pub fn is_searching(&self) -> bool {
        matches!(self, LoadingState::Searching)
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            LoadingState::Idle => None,
            LoadingState::Searching => Some("Searching..."),
            LoadingState::Details => Some("Loading details..."),
        }
    }
}

// =============================================================================
// Selection State
// =============================================================================

/// Selection state for list and grid views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    /// Move selection up
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Move selection up by a page (a grid row, for the card grid)
    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
    }

    /// Move selection down by a page
    pub fn page_down(&mut self, page_size: usize) {
        if self.len > 0 {
            self.selected = (self.selected + page_size).min(self.len - 1);
        }
    }

    /// Jump to first item
    pub fn first(&mut self) {
        self.selected = 0;
    }

    /// Jump to last item
    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Reset selection
    pub fn reset(&mut self) {
        self.selected = 0;
    }

    /// Update length (e.g., when new results come in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// Text Input
// =============================================================================

/// Single-line text buffer with a cursor counted in characters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    fn byte_index(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.value.insert(idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index(self.cursor);
            self.value.remove(idx);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let idx = self.byte_index(self.cursor);
            self.value.remove(idx);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.char_len();
    }

    /// Text before and after the cursor
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.value.split_at(self.byte_index(self.cursor))
    }

    /// Apply an editing key; returns false for keys this buffer ignores
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor_left(),
            KeyCode::Right => self.cursor_right(),
            KeyCode::Home => self.cursor_home(),
            KeyCode::End => self.cursor_end(),
            _ => return false,
        }
        true
    }
}

// =============================================================================
// View-Specific State
// =============================================================================

/// Search view state
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Search box contents
    pub input: TextInput,
    /// Term of the most recent search
    pub term: String,
    /// Summaries from the most recent applied search
    pub summaries: Vec<MovieSummary>,
    /// Cards to render, one per summary, in summary order
    pub cards: Vec<MovieDetail>,
    /// Grid selection
    pub list: ListState,
    /// Searching or enriching
    pub loading: LoadingState,
    /// Generation of the search currently in flight or applied
    pub generation: u64,
}

impl SearchState {
    /// Replace summaries; cards start as the bare summaries until details arrive
    pub fn set_summaries(&mut self, summaries: Vec<MovieSummary>) {
        self.cards = summaries.iter().cloned().map(MovieDetail::from).collect();
        self.summaries = summaries;
        self.list.set_len(self.cards.len());
        self.list.reset();
        self.loading = if self.summaries.is_empty() {
            LoadingState::Idle
        } else {
            LoadingState::Details
        };
    }

    /// Install enriched cards
    pub fn set_cards(&mut self, cards: Vec<MovieDetail>) {
        self.list.set_len(cards.len());
        self.cards = cards;
        self.loading = LoadingState::Idle;
    }
}

/// Expanded card overlay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardState {
    pub imdb_id: String,
    /// Feedback box visible
    pub feedback_open: bool,
    pub feedback: TextInput,
    /// Waiting for y/n on deleting saved feedback
    pub confirm_delete: bool,
}

impl CardState {
    pub fn new(imdb_id: impl Into<String>) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            ..Default::default()
        }
    }
}

/// Trailer overlay contents
#[derive(Debug, Clone, PartialEq)]
pub struct TrailerView {
    pub imdb_id: String,
    pub title: String,
    pub outcome: TrailerOutcome,
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
pub struct App {
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Active tab
    pub tab: Tab,
    /// Transient message for the status bar
    pub status: Option<String>,

    pub search: SearchState,
    pub favorites: FavoritesStore,
    pub favorites_list: ListState,
    pub card: Option<CardState>,
    pub trailer: Option<TrailerView>,
    /// Cards with a trailer lookup in flight
    pub pending_trailers: HashSet<String>,

    store: Box<dyn KeyValueStore>,
    default_search: String,
    actions: Vec<Action>,
}

impl App {
    /// Create the app over `store`, restoring favorites from it
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let favorites = FavoritesStore::load(store.as_ref());
        let favorites_list = ListState::new(favorites.len());

        Self {
            running: true,
            input_mode: InputMode::Normal,
            tab: Tab::Search,
            status: None,
            search: SearchState::default(),
            favorites,
            favorites_list,
            card: None,
            trailer: None,
            pending_trailers: HashSet::new(),
            store,
            default_search: crate::config::DEFAULT_SEARCH.to_string(),
            actions: Vec::new(),
        }
    }

    /// Term searched by [`App::startup`]
    pub fn with_default_search(mut self, term: impl Into<String>) -> Self {
        self.default_search = term.into();
        self
    }

    /// Kick off the initial search
    pub fn startup(&mut self) {
        let term = self.default_search.clone();
        self.search.input.set(term.clone());
        self.begin_search(&term);
    }

    /// Take every queued action
    pub fn drain_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Start a search for `term`. Blank terms are ignored.
    pub fn begin_search(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            return;
        }

        self.search.generation += 1;
        self.search.term = term.to_string();
        self.search.loading = LoadingState::Searching;
        info!(term, generation = self.search.generation, "search started");

        self.actions.push(Action::Search {
            generation: self.search.generation,
            term: term.to_string(),
        });
    }

    /// Apply a finished search. Failures clear the results.
    pub fn apply_search(&mut self, generation: u64, result: Result<Vec<MovieSummary>, String>) {
        if generation != self.search.generation {
            debug!(generation, current = self.search.generation, "stale search ignored");
            return;
        }

        let summaries = match result {
            Ok(summaries) => summaries,
            Err(e) => {
                error!(term = %self.search.term, error = %e, "search failed, clearing results");
                Vec::new()
            }
        };

        self.search.set_summaries(summaries);
        if !self.search.summaries.is_empty() {
            self.actions.push(Action::Enrich {
                generation,
                summaries: self.search.summaries.clone(),
            });
        }
    }

    /// Apply a finished detail batch
    pub fn apply_details(&mut self, generation: u64, details: Vec<MovieDetail>) {
        if generation != self.search.generation {
            debug!(generation, current = self.search.generation, "stale details ignored");
            return;
        }
        self.search.set_cards(details);
    }

    /// Route a completed background task
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchFinished { generation, result } => self.apply_search(generation, result),
            AppEvent::DetailsFinished {
                generation,
                details,
            } => self.apply_details(generation, details),
            AppEvent::TrailerResolved { imdb_id, outcome } => {
                self.apply_trailer(imdb_id, outcome)
            }
            AppEvent::FavoriteEnriched(detail) => {
                let id = detail.imdb_id.clone();
                let previous = self.favorites.clone();
                if self.favorites.upgrade(detail) && self.persist_favorites(previous) {
                    debug!(imdb_id = %id, "favorite upgraded to detail record");
                }
            }
            AppEvent::LaunchFailed(msg) => self.set_status(msg),
        }
    }

    // -------------------------------------------------------------------------
    // Favorites
    // -------------------------------------------------------------------------

    pub fn is_favorite(&self, imdb_id: &str) -> bool {
        self.favorites.contains(imdb_id)
    }

    /// Add or remove `movie` and persist the list
    pub fn toggle_favorite(&mut self, movie: MovieDetail) {
        let needs_detail = !movie.is_enriched();
        let title = movie.title.clone();
        let previous = self.favorites.clone();

        let toggled = self.favorites.toggle(movie.clone());
        if !self.persist_favorites(previous) {
            return;
        }

        match toggled {
            Toggle::Added => {
                if needs_detail {
                    self.actions.push(Action::EnrichFavorite(movie));
                }
                self.set_status(format!("Added \"{}\" to favorites", title));
            }
            Toggle::Removed => self.set_status(format!("Removed \"{}\" from favorites", title)),
        }
    }

    /// Save the favorites list, restoring `previous` if the write fails
    fn persist_favorites(&mut self, previous: FavoritesStore) -> bool {
        let saved = match self.favorites.persist(self.store.as_mut()) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "saving favorites failed");
                self.set_status(format!("Could not save favorites: {}", e));
                self.favorites = previous;
                false
            }
        };
        self.favorites_list.set_len(self.favorites.len());
        saved
    }

    // -------------------------------------------------------------------------
    // Feedback
    // -------------------------------------------------------------------------

    pub fn saved_feedback(&self, imdb_id: &str) -> Option<String> {
        FeedbackStore::get(self.store.as_ref(), imdb_id)
    }

    /// Save the open card's feedback box. Blank text keeps the box open.
    pub fn submit_feedback(&mut self) {
        let Some(card) = self.card.as_mut() else {
            return;
        };

        match FeedbackStore::submit(self.store.as_mut(), &card.imdb_id, &card.feedback.value) {
            Ok(true) => {
                card.feedback.clear();
                card.feedback_open = false;
                self.input_mode = InputMode::Normal;
                self.set_status("Feedback saved");
            }
            Ok(false) => {}
            Err(e) => {
                error!(error = %e, "saving feedback failed");
                self.set_status(format!("Could not save feedback: {}", e));
            }
        }
    }

    /// Ask for confirmation before deleting the open card's saved feedback
    pub fn request_delete_feedback(&mut self) {
        let has_saved = self
            .card
            .as_ref()
            .map(|c| self.saved_feedback(&c.imdb_id).is_some())
            .unwrap_or(false);
        if let (true, Some(card)) = (has_saved, self.card.as_mut()) {
            card.confirm_delete = true;
        }
    }

    /// Answer the delete confirmation
    pub fn confirm_delete_feedback(&mut self, confirmed: bool) {
        let Some(card) = self.card.as_mut() else {
            return;
        };
        card.confirm_delete = false;
        if !confirmed {
            return;
        }

        let id = card.imdb_id.clone();
        match FeedbackStore::delete(self.store.as_mut(), &id) {
            Ok(()) => self.set_status("Feedback deleted"),
            Err(e) => {
                error!(error = %e, "deleting feedback failed");
                self.set_status(format!("Could not delete feedback: {}", e));
            }
        }
    }

    // -------------------------------------------------------------------------
    // Trailer
    // -------------------------------------------------------------------------

    /// Start a trailer lookup for `movie` unless one is already running
    pub fn request_trailer(&mut self, movie: &MovieDetail) {
        if !self.pending_trailers.insert(movie.imdb_id.clone()) {
            debug!(imdb_id = %movie.imdb_id, "trailer lookup already running");
            return;
        }
        self.set_status(format!("Finding trailer for \"{}\"...", movie.title));
        self.actions.push(Action::ResolveTrailer {
            imdb_id: movie.imdb_id.clone(),
            query: movie.trailer_query(),
        });
    }

    pub fn trailer_pending(&self, imdb_id: &str) -> bool {
        self.pending_trailers.contains(imdb_id)
    }

    fn apply_trailer(&mut self, imdb_id: String, outcome: TrailerOutcome) {
        self.pending_trailers.remove(&imdb_id);
        let title = self
            .find_movie(&imdb_id)
            .map(|m| m.title.clone())
            .unwrap_or_else(|| imdb_id.clone());

        match outcome {
            TrailerOutcome::Found { .. } => {
                self.status = None;
                self.trailer = Some(TrailerView {
                    imdb_id,
                    title,
                    outcome,
                });
            }
            TrailerOutcome::External { .. } => {
                self.set_status("No embeddable trailer found, opening search page");
                self.actions.push(Action::Launch {
                    outcome,
                    target: LaunchTarget::Browser,
                });
            }
        }
    }

    fn launch_trailer(&mut self, target: LaunchTarget) {
        if let Some(view) = &self.trailer {
            self.actions.push(Action::Launch {
                outcome: view.outcome.clone(),
                target,
            });
        }
    }

    // -------------------------------------------------------------------------
    // Views
    // -------------------------------------------------------------------------

    /// Cards shown by the active tab
    pub fn visible_cards(&self) -> &[MovieDetail] {
        match self.tab {
            Tab::Search => &self.search.cards,
            Tab::Favorites => self.favorites.items(),
        }
    }

    /// Selection of the active tab
    pub fn list(&self) -> &ListState {
        match self.tab {
            Tab::Search => &self.search.list,
            Tab::Favorites => &self.favorites_list,
        }
    }

    fn list_mut(&mut self) -> &mut ListState {
        match self.tab {
            Tab::Search => &mut self.search.list,
            Tab::Favorites => &mut self.favorites_list,
        }
    }

    pub fn selected_movie(&self) -> Option<&MovieDetail> {
        self.visible_cards().get(self.list().selected)
    }

    /// Best known record for an id: current results first, then favorites
    pub fn find_movie(&self, imdb_id: &str) -> Option<&MovieDetail> {
        self.search
            .cards
            .iter()
            .find(|m| m.imdb_id == imdb_id)
            .or_else(|| self.favorites.get(imdb_id))
    }

    /// Movie shown in the card overlay
    pub fn card_movie(&self) -> Option<&MovieDetail> {
        self.card.as_ref().and_then(|c| self.find_movie(&c.imdb_id))
    }

    pub fn switch_tab(&mut self) {
        self.tab = self.tab.toggle();
        self.card = None;
        self.favorites_list.set_len(self.favorites.len());
    }

    pub fn open_card(&mut self) {
        if let Some(movie) = self.selected_movie() {
            self.card = Some(CardState::new(movie.imdb_id.clone()));
        }
    }

    /// Focus search input
    pub fn focus_search(&mut self) {
        self.card = None;
        self.trailer = None;
        self.input_mode = InputMode::Editing;
        self.search.input.cursor_end();
    }

    /// Close the topmost overlay; false if nothing was open
    pub fn back(&mut self) -> bool {
        if self.input_mode != InputMode::Normal {
            self.input_mode = InputMode::Normal;
            if let Some(card) = self.card.as_mut() {
                card.feedback_open = false;
            }
            return true;
        }
        if self.trailer.take().is_some() {
            return true;
        }
        self.card.take().is_some()
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Clear status on any keypress
        self.status = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        match self.input_mode {
            InputMode::Editing => self.handle_editing_key(key),
            InputMode::Feedback => self.handle_feedback_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    /// Handle keys in the search box
    fn handle_editing_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                true
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.tab = Tab::Search;
                let term = self.search.input.value.clone();
                self.begin_search(&term);
                true
            }
            code => self.search.input.handle_key(code),
        }
    }

    /// Handle keys in the feedback box
    fn handle_feedback_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => self.back(),
            KeyCode::Enter => {
                self.submit_feedback();
                true
            }
            code => match self.card.as_mut() {
                Some(card) => card.feedback.handle_key(code),
                None => {
                    self.input_mode = InputMode::Normal;
                    false
                }
            },
        }
    }

    /// Handle keys in normal navigation mode
    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        if self.card.as_ref().map(|c| c.confirm_delete).unwrap_or(false) {
            return self.handle_confirm_key(key);
        }

        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return true;
            }
            KeyCode::Char('/') | KeyCode::Char('s') => {
                self.focus_search();
                return true;
            }
            KeyCode::Tab => {
                self.trailer = None;
                self.switch_tab();
                return true;
            }
            KeyCode::Esc => return self.back(),
            _ => {}
        }

        if self.trailer.is_some() {
            self.handle_trailer_key(key)
        } else if self.card.is_some() {
            self.handle_card_key(key)
        } else {
            self.handle_grid_key(key)
        }
    }

    fn handle_grid_key(&mut self, key: KeyEvent) -> bool {
        // The grid shows only the loading line until the new cards are in
        if self.tab == Tab::Search && self.search.loading.is_loading() {
            return false;
        }

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.list_mut().up(),
            KeyCode::Right | KeyCode::Char('l') => self.list_mut().down(),
            KeyCode::Up | KeyCode::Char('k') => self.list_mut().page_up(GRID_COLUMNS),
            KeyCode::Down | KeyCode::Char('j') => self.list_mut().page_down(GRID_COLUMNS),
            KeyCode::Home => self.list_mut().first(),
            KeyCode::End => self.list_mut().last(),
            KeyCode::Enter => self.open_card(),
            KeyCode::Char('f') => {
                if let Some(movie) = self.selected_movie().cloned() {
                    self.toggle_favorite(movie);
                }
            }
            KeyCode::Char('t') => {
                if let Some(movie) = self.selected_movie().cloned() {
                    self.open_card();
                    self.request_trailer(&movie);
                }
            }
            _ => return false,
        }
        true
    }

    fn handle_card_key(&mut self, key: KeyEvent) -> bool {
        let Some(movie) = self.card_movie().cloned() else {
            self.card = None;
            return false;
        };

        match key.code {
            KeyCode::Enter => {
                self.card = None;
            }
            KeyCode::Char('f') => {
                self.toggle_favorite(movie);
                if self.card_movie().is_none() {
                    self.card = None;
                }
            }
            KeyCode::Char('t') => self.request_trailer(&movie),
            KeyCode::Char('b') => {
                if let Some(card) = self.card.as_mut() {
                    card.feedback_open = true;
                }
                self.input_mode = InputMode::Feedback;
            }
            KeyCode::Char('x') => self.request_delete_feedback(),
            _ => return false,
        }
        true
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_delete_feedback(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_delete_feedback(false)
            }
            _ => return false,
        }
        true
    }

    fn handle_trailer_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter | KeyCode::Char('o') => self.launch_trailer(LaunchTarget::Browser),
            KeyCode::Char('m') => self.launch_trailer(LaunchTarget::Mpv),
            _ => return false,
        }
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
