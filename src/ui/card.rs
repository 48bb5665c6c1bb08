//! Expanded movie card
//!
//! Overlay with the full record, the three card actions, the feedback box
//! and any saved feedback.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::app::CardState;
use crate::models::MovieDetail;
use crate::ui::Theme;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete your feedback?";

/// Card overlay view
pub struct CardOverlay<'a> {
    pub movie: &'a MovieDetail,
    pub state: &'a CardState,
    pub is_favorite: bool,
    pub trailer_pending: bool,
    pub saved_feedback: Option<String>,
}

impl<'a> CardOverlay<'a> {
    /// Label of the favorite action
    pub fn favorite_label(is_favorite: bool) -> &'static str {
        if is_favorite {
            "♥ Favorited"
        } else {
            "♡ Add to Favorites"
        }
    }

    /// Label of the trailer action
    pub fn trailer_label(pending: bool) -> &'static str {
        if pending {
            "🎬 Loading..."
        } else {
            "🎬 Watch Trailer"
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let movie = self.movie;
        let mut lines = Vec::new();

        lines.push(Line::from(vec![
            Span::styled("▶ ", Theme::accent()),
            Span::styled(movie.title.clone(), Theme::title()),
            Span::styled(format!(" ({})", movie.year), Theme::year()),
        ]));

        let mut meta = Vec::new();
        if let (Some(tier), Some(rating)) = (movie.rating_tier(), movie.imdb_rating.as_deref()) {
            meta.push(Span::styled(format!(" ⭐ {} ", rating), Theme::rating(tier)));
            meta.push(Span::raw(" "));
        }
        meta.push(Span::styled(movie.media_type.to_string(), Theme::secondary()));
        meta.push(Span::styled(format!("  {}", movie.imdb_id), Theme::dimmed()));
        lines.push(Line::from(meta));

        lines.push(Line::from(vec![
            Span::styled("Poster: ", Theme::dimmed()),
            Span::styled(movie.poster_or_placeholder().to_string(), Theme::dimmed()),
        ]));
        lines.push(Line::from(""));

        lines.push(Line::from(vec![
            Span::styled("🎭 Genre: ", Theme::accent()),
            Span::styled(movie.genre_label(), Theme::text()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("⏱ Duration: ", Theme::accent()),
            Span::styled(movie.runtime_label().to_string(), Theme::text()),
        ]));
        for (label, value) in [
            ("Released: ", &movie.released),
            ("Director: ", &movie.director),
            ("Cast: ", &movie.actors),
        ] {
            if let Some(value) = value {
                lines.push(Line::from(vec![
                    Span::styled(label, Theme::accent()),
                    Span::styled(value.clone(), Theme::text()),
                ]));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            movie.plot_or_default().to_string(),
            Theme::plot(),
        )));
        lines.push(Line::from(""));

        let favorite_style = if self.is_favorite {
            Theme::favorite()
        } else {
            Theme::text()
        };
        lines.push(Line::from(vec![
            Span::styled(" t ", Theme::keybind()),
            Span::styled(Self::trailer_label(self.trailer_pending), Theme::text()),
            Span::raw("   "),
            Span::styled(" f ", Theme::keybind()),
            Span::styled(Self::favorite_label(self.is_favorite), favorite_style),
            Span::raw("   "),
            Span::styled(" b ", Theme::keybind()),
            Span::styled(
                if self.state.feedback_open {
                    "Cancel Feedback (Esc)"
                } else {
                    "💬 Leave Feedback"
                },
                Theme::text(),
            ),
        ]));

        if self.state.feedback_open {
            let (before, after) = self.state.feedback.split_at_cursor();
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("> ", Theme::accent()),
                Span::styled(format!("{}│{}", before, after), Theme::input()),
            ]));
            if self.state.feedback.value.is_empty() {
                lines.push(Line::from(Span::styled(
                    "Write your feedback... (Enter to submit)",
                    Theme::dimmed(),
                )));
            }
        }

        if let Some(saved) = &self.saved_feedback {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("💬 Your feedback: ", Theme::accent()),
                Span::styled(saved.clone(), Theme::text()),
            ]));
            if self.state.confirm_delete {
                lines.push(Line::from(vec![
                    Span::styled(DELETE_PROMPT, Theme::error()),
                    Span::styled(" (y/n)", Theme::keybind()),
                ]));
            } else {
                lines.push(Line::from(vec![
                    Span::styled(" x ", Theme::keybind()),
                    Span::styled("Delete", Theme::error()),
                ]));
            }
        }

        lines
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = super::centered_rect(area, 80, 85);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_focused())
            .title(Span::styled(" MOVIE ", Theme::title()))
            .title_bottom(Line::from(Span::styled(" Esc close ", Theme::dimmed())))
            .style(Style::default().bg(Theme::BACKGROUND_LIGHT));

        let paragraph = Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup);
    }
}
