//! Trailer overlay
//!
//! A terminal can't embed video, so the overlay shows the resolved video
//! and offers to open it in the browser or a local player.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::api::trailer::embed_url;
use crate::api::{TrailerOutcome, TrailerSource};
use crate::app::TrailerView;
use crate::ui::Theme;

pub struct TrailerOverlay<'a> {
    pub view: &'a TrailerView,
}

impl<'a> TrailerOverlay<'a> {
    pub fn new(view: &'a TrailerView) -> Self {
        Self { view }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = super::centered_rect(area, 70, 50);
        frame.render_widget(Clear, popup);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(self.view.title.clone(), Theme::title())),
            Line::from(""),
        ];

        match &self.view.outcome {
            TrailerOutcome::Found { video_id, source } => {
                let source = match source {
                    TrailerSource::Scrape => "YouTube",
                    TrailerSource::Invidious => "Invidious",
                };
                lines.push(Line::from(vec![
                    Span::styled("Video: ", Theme::accent()),
                    Span::styled(video_id.clone(), Theme::text()),
                    Span::styled(format!("  via {}", source), Theme::dimmed()),
                ]));
                lines.push(Line::from(Span::styled(embed_url(video_id), Theme::secondary())));
            }
            TrailerOutcome::External { url } => {
                lines.push(Line::from(Span::styled(url.clone(), Theme::secondary())));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" ↵ ", Theme::keybind()),
            Span::styled("Open in browser   ", Theme::dimmed()),
            Span::styled(" m ", Theme::keybind()),
            Span::styled("Play in mpv   ", Theme::dimmed()),
            Span::styled(" ESC ", Theme::keybind()),
            Span::styled("Close", Theme::dimmed()),
        ]));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Theme::border_focused())
                    .title(Span::styled(" ▶ TRAILER ", Theme::success()))
                    .style(Style::default().bg(Theme::BACKGROUND)),
            );
        frame.render_widget(paragraph, popup);
    }
}
