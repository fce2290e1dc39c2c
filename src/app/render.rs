use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::state::App;
use crate::fuzzy::MatchResult;
use crate::quick_open::{OpenState, PanelState};

const PANEL_WIDTH: u16 = 80;
const INPUT_HEIGHT: u16 = 3;
const BORDER_HEIGHT: u16 = 2;
const PATH_GAP: &str = "  ";
const ELLIPSIS: char = '…';

impl App {
    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let [main_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

        self.render_background(frame, main_area);
        self.render_status_line(frame, status_area);

        if self.session.is_open() {
            self.render_panel(frame, main_area);
        }
    }

    fn render_background(&self, frame: &mut Frame, area: Rect) {
        let root = self
            .session
            .root()
            .map(|root| root.display().to_string())
            .unwrap_or_default();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" quickopen ")
            .border_style(Style::default().fg(Color::DarkGray));

        let text = vec![
            Line::from(Span::styled(root, Style::default().fg(Color::Gray))),
            Line::default(),
            Line::from(vec![
                Span::styled("Ctrl-P", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" quick open   "),
                Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" quit"),
            ]),
        ];

        frame.render_widget(Paragraph::new(text).block(block), area);
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let line = match (&self.status, self.session.state()) {
            (Some(status), _) => Span::styled(status.as_str(), Style::default().fg(Color::Yellow)),
            (None, PanelState::Open(OpenState::AwaitingResponse)) => {
                Span::styled("searching...", Style::default().fg(Color::DarkGray))
            }
            (None, PanelState::Open(OpenState::Idle)) => Span::styled(
                format!("{} matches", self.session.presenter().match_count()),
                Style::default().fg(Color::DarkGray),
            ),
            (None, PanelState::Closed) => Span::raw(""),
        };

        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_panel(&self, frame: &mut Frame, area: Rect) {
        let results = self.session.store().map_or(&[][..], |store| store.results());
        let window = self
            .session
            .cursor()
            .map(|cursor| cursor.visible_window(results.len(), self.max_visible_rows))
            .unwrap_or_default();

        let list_height = if window.is_empty() {
            0
        } else {
            u16::try_from(window.len())
                .unwrap_or(u16::MAX)
                .saturating_add(BORDER_HEIGHT)
        };
        let panel_area = panel_rect(area, PANEL_WIDTH, INPUT_HEIGHT.saturating_add(list_height));
        frame.render_widget(Clear, panel_area);

        let [input_area, list_area] =
            Layout::vertical([Constraint::Length(INPUT_HEIGHT), Constraint::Min(0)]).areas(panel_area);

        if !window.is_empty() {
            let selected = self.session.selected_index();
            let row_width = list_area.width.saturating_sub(BORDER_HEIGHT) as usize;
            let items: Vec<ListItem> = results[window.clone()]
                .iter()
                .enumerate()
                .map(|(offset, result)| {
                    let is_selected = selected == Some(window.start + offset);
                    ListItem::new(suggestion_line(result, is_selected, row_width))
                })
                .collect();

            let list = List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
            frame.render_widget(list, list_area);
        }

        frame.render_widget(self.session.presenter().textarea(), input_area);
    }
}

/// Horizontally centered, in the upper part of `area`
fn panel_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + (area.height.saturating_sub(height) / 5);

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Filename with matched characters in bold, followed by the dimmed full path
fn suggestion_line(result: &MatchResult, selected: bool, width: usize) -> Line<'_> {
    let base = if selected {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    } else {
        Style::default()
    };

    let mut spans: Vec<Span> = result
        .filename_segments()
        .into_iter()
        .map(|segment| {
            let style = if segment.matched {
                base.fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                base
            };
            Span::styled(segment.text, style)
        })
        .collect();

    let used = result.filename().width() + PATH_GAP.width();
    let remaining = width.saturating_sub(used);
    if remaining > 1 {
        spans.push(Span::styled(PATH_GAP, base));
        spans.push(Span::styled(
            truncate_left(result.path(), remaining),
            base.add_modifier(Modifier::DIM),
        ));
    }

    Line::from(spans)
}

/// Keep the tail of `text` within `max_width` columns, marking the cut with an ellipsis
fn truncate_left(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut width = 0;
    let mut start = text.len();
    for (idx, ch) in text.char_indices().rev() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > budget {
            break;
        }
        width += ch_width;
        start = idx;
    }

    format!("{}{}", ELLIPSIS, &text[start..])
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
