//! Search bar component

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::TextInput;
use crate::ui::Theme;

pub const PLACEHOLDER: &str = "Search for movies...";

/// Search input box
pub struct SearchBar<'a> {
    pub input: &'a TextInput,
    /// Search box has keyboard focus
    pub focused: bool,
    /// A search is in flight
    pub searching: bool,
}

impl<'a> SearchBar<'a> {
    pub fn new(input: &'a TextInput) -> Self {
        Self {
            input,
            focused: false,
            searching: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn searching(mut self, searching: bool) -> Self {
        self.searching = searching;
        self
    }

    /// Text shown in the box (cursor drawn as │ while focused)
    pub fn display_text(&self) -> String {
        if self.focused {
            let (before, after) = self.input.split_at_cursor();
            format!("⌕ {}│{}", before, after)
        } else if self.input.value.is_empty() {
            format!("⌕ {}  (press /)", PLACEHOLDER)
        } else {
            format!("⌕ {}", self.input.value)
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        let title = if self.searching {
            Span::styled(" ⟳ Searching... ", Theme::loading())
        } else {
            Span::styled(" SEARCH ", Theme::title())
        };

        let style = if self.focused {
            Theme::input().fg(Theme::PRIMARY)
        } else if self.input.value.is_empty() {
            Theme::input().fg(Theme::DIM)
        } else {
            Theme::input()
        };

        let paragraph = Paragraph::new(self.display_text()).style(style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style)
                .title(title),
        );
        frame.render_widget(paragraph, area);
    }
}
