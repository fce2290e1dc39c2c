use std::time::Instant;

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::state::App;
use crate::quick_open::Direction;

impl App {
    pub fn handle_event(&mut self, event: Event) {
        self.handle_event_at(event, Instant::now());
    }

    pub fn handle_event_at(&mut self, event: Event, now: Instant) {
        match event {
            // Check that it's a key press event to avoid duplicates
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key, now),
            Event::FocusLost => {
                if self.session.is_open() {
                    log::debug!("Terminal lost focus, closing quick open");
                    self.session.close_panel();
                }
            }
            Event::Paste(text) if self.session.is_open() => {
                let line = text.lines().next().unwrap_or_default();
                self.session.presenter_mut().textarea_mut().insert_str(line);
                self.query_changed(now);
            }
            _ => {}
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Ctrl+C: Exit application
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if !self.session.is_open() {
            self.handle_closed_key(key);
            return;
        }

        match key.code {
            KeyCode::Esc => self.session.cancel(),
            KeyCode::Enter => self.confirm(),
            KeyCode::Up => self.session.navigate(Direction::Up),
            KeyCode::Down => self.session.navigate(Direction::Down),
            // Keep the query on one line and ignore the open shortcut
            KeyCode::Tab | KeyCode::BackTab => {}
            KeyCode::Char('p' | 'j' | 'm') if ctrl => {}
            _ => {
                if self.session.presenter_mut().textarea_mut().input(key) {
                    self.query_changed(now);
                }
            }
        }
    }

    fn handle_closed_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.status = None;
                self.session.open_panel();
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn confirm(&mut self) {
        let Some(path) = self.session.confirm_selection() else {
            return;
        };

        if self.picked().is_some() {
            self.should_quit = true;
        } else {
            self.status = Some(format!("Could not open {}", path.display()));
        }
    }

    fn query_changed(&mut self, now: Instant) {
        let text = self.session.presenter().query().to_string();
        self.session.on_query_text_changed_at(&text, now);
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod events_tests;
