//! Card grid
//!
//! Renders search results or favorites as a grid of compact cards with
//! keyboard selection. Shows a loading line or an empty-state message
//! instead of cards when there is nothing to draw.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::GRID_COLUMNS;
use crate::models::MovieDetail;
use crate::storage::FavoritesStore;
use crate::ui::Theme;

/// Height of one card cell including borders
pub const CARD_HEIGHT: u16 = 7;

pub const NO_RESULTS: &str = "No movies found.";
pub const NO_FAVORITES: &str = "No favorite movies yet.";
pub const FAVORITES_HINT: &str = "Press f on any movie card to add it here.";

/// What to show when there are no cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    Results,
    Favorites,
}

/// Grid of movie cards
pub struct CardGrid<'a> {
    pub cards: &'a [MovieDetail],
    pub selected: usize,
    pub favorites: &'a FavoritesStore,
    /// Loading message; replaces the cards while set
    pub loading: Option<&'a str>,
    pub empty: EmptyState,
    pub title: String,
}

impl<'a> CardGrid<'a> {
    /// Index of the first grid row to draw so the selected card is visible
    pub fn first_row(selected: usize, visible_rows: usize) -> usize {
        let row = selected / GRID_COLUMNS;
        if visible_rows == 0 {
            row
        } else {
            row.saturating_sub(visible_rows - 1)
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border())
            .title(Span::styled(self.title.clone(), Theme::title()));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if let Some(message) = self.loading {
            let loading = Paragraph::new(format!("⟳ {}", message))
                .style(Theme::loading())
                .alignment(Alignment::Center);
            frame.render_widget(loading, inner);
            return;
        }

        if self.cards.is_empty() {
            self.render_empty(frame, inner);
            return;
        }

        let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
        let first_row = Self::first_row(self.selected, visible_rows);

        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
            .split(inner);

        for (row_offset, row_area) in row_areas.iter().enumerate() {
            let start = (first_row + row_offset) * GRID_COLUMNS;
            if start >= self.cards.len() {
                break;
            }

            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![
                    Constraint::Ratio(1, GRID_COLUMNS as u32);
                    GRID_COLUMNS
                ])
                .split(*row_area);

            for (col, cell) in cells.iter().enumerate() {
                let index = start + col;
                if let Some(movie) = self.cards.get(index) {
                    self.render_card(frame, *cell, movie, index == self.selected);
                }
            }
        }
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, movie: &MovieDetail, selected: bool) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if selected {
                BorderType::Thick
            } else {
                BorderType::Rounded
            })
            .border_style(Theme::card_border(selected));

        let title_style = if selected {
            Theme::highlighted()
        } else {
            Theme::title()
        };

        let mut badge_line = Vec::new();
        if let (Some(tier), Some(rating)) = (movie.rating_tier(), movie.imdb_rating.as_deref()) {
            badge_line.push(Span::styled(format!(" ⭐ {} ", rating), Theme::rating(tier)));
            badge_line.push(Span::raw(" "));
        }
        if self.favorites.contains(&movie.imdb_id) {
            badge_line.push(Span::styled("♥", Theme::favorite()));
        }

        let lines = vec![
            Line::from(Span::styled(movie.title.clone(), title_style)),
            Line::from(vec![
                Span::styled(movie.year.clone(), Theme::year()),
                Span::styled(" · ", Theme::dimmed()),
                Span::styled(movie.media_type.to_string(), Theme::secondary()),
            ]),
            Line::from(badge_line),
            Line::from(Span::styled(movie.genre_label(), Theme::dimmed())),
            Line::from(Span::styled(movie.runtime_label().to_string(), Theme::dimmed())),
        ];

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect) {
        let lines = match self.empty {
            EmptyState::Results => vec![
                Line::from(""),
                Line::from(Span::styled(NO_RESULTS, Theme::dimmed())),
            ],
            EmptyState::Favorites => vec![
                Line::from(""),
                Line::from(Span::styled(NO_FAVORITES, Theme::dimmed())),
                Line::from(Span::styled(FAVORITES_HINT, Theme::keybind())),
            ],
        };

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_row_keeps_selection_visible() {
        assert_eq!(CardGrid::first_row(0, 2), 0);
        assert_eq!(CardGrid::first_row(GRID_COLUMNS * 2, 2), 1);
        assert_eq!(CardGrid::first_row(GRID_COLUMNS * 5 + 1, 3), 3);
    }

    #[test]
    fn test_first_row_without_space() {
        assert_eq!(CardGrid::first_row(GRID_COLUMNS * 4, 0), 4);
    }
}
