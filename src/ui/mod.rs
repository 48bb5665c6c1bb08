//! Terminal UI components
//!
//! Built with ratatui. Keyboard-first navigation throughout.
//! [`render`] draws the whole screen from an [`App`] borrowed read-only.

pub mod card;
pub mod grid;
pub mod search;
pub mod theme;
pub mod trailer;

pub use card::CardOverlay;
pub use grid::{CardGrid, EmptyState};
pub use search::SearchBar;
pub use theme::Theme;
pub use trailer::TrailerOverlay;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::app::{App, InputMode};
use crate::models::Tab;

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(Theme::BACKGROUND)), area);

    // Main layout: header, tabs, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Tabs
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    render_content(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);

    if let (Some(state), Some(movie)) = (app.card.as_ref(), app.card_movie()) {
        CardOverlay {
            movie,
            state,
            is_favorite: app.is_favorite(&movie.imdb_id),
            trailer_pending: app.trailer_pending(&movie.imdb_id),
            saved_feedback: app.saved_feedback(&movie.imdb_id),
        }
        .render(frame, chunks[2]);
    }

    if let Some(view) = &app.trailer {
        TrailerOverlay::new(view).render(frame, area);
    }
}

/// Logo and search box
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14), // Logo
            Constraint::Min(1),     // Search box
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::styled("🎬 ", Theme::accent()),
        Span::styled("Cinezy", Theme::title()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, header_chunks[0]);

    let searching = app.search.loading.is_searching();
    SearchBar::new(&app.search.input)
        .focused(app.input_mode == InputMode::Editing)
        .searching(searching)
        .render(frame, header_chunks[1]);
}

fn tab_label(tab: Tab, favorites: usize) -> String {
    match tab {
        Tab::Search => " 🔍 Search ".to_string(),
        Tab::Favorites => format!(" ❤ Favorites ({}) ", favorites),
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    for tab in [Tab::Search, Tab::Favorites] {
        let style = if tab == app.tab {
            Theme::highlighted()
        } else {
            Theme::dimmed()
        };
        spans.push(Span::styled(tab_label(tab, app.favorites.len()), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(" Tab switch", Theme::dimmed()));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    let (title, empty, loading) = match app.tab {
        Tab::Search => {
            let title = if app.search.term.is_empty() {
                " RESULTS ".to_string()
            } else {
                format!(" RESULTS for \"{}\" ({}) ", app.search.term, app.search.cards.len())
            };
            let loading = app.search.loading.message();
            (title, EmptyState::Results, loading)
        }
        Tab::Favorites => (
            format!(" FAVORITES ({}) ", app.favorites.len()),
            EmptyState::Favorites,
            None,
        ),
    };

    CardGrid {
        cards: app.visible_cards(),
        selected: app.list().selected,
        favorites: &app.favorites,
        loading,
        empty,
        title,
    }
    .render(frame, area);
}

/// Render status bar at bottom
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let (label, bg) = match app.input_mode {
        InputMode::Normal => (" NORMAL ", Theme::PRIMARY),
        InputMode::Editing => (" SEARCH ", Theme::ACCENT),
        InputMode::Feedback => (" FEEDBACK ", Theme::SUCCESS),
    };
    let mode_indicator = Span::styled(label, Style::default().fg(Theme::BACKGROUND).bg(bg));

    let message = match &app.status {
        Some(status) => Span::styled(format!(" {} ", status), Theme::accent()),
        None => Span::styled(
            " q:quit  /:search  ←↑↓→:move  ↵:open  f:favorite  t:trailer  ESC:back ",
            Theme::dimmed(),
        ),
    };

    let status = Paragraph::new(Line::from(vec![mode_indicator, message])).style(Theme::status_bar());
    frame.render_widget(status, area);
}

/// Rect of `percent_x` by `percent_y` centered in `area`
pub fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = (area.width as u32 * percent_x.min(100) as u32 / 100) as u16;
    let height = (area.height as u32 * percent_y.min(100) as u32 / 100) as u16;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(area, 50, 50);
        assert_eq!(rect, Rect::new(25, 10, 50, 20));
    }

    #[test]
    fn test_tab_label_shows_count() {
        assert_eq!(tab_label(Tab::Favorites, 3), " ❤ Favorites (3) ");
        assert!(tab_label(Tab::Search, 3).contains("Search"));
    }
}
