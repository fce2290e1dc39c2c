//! Quick-open panel session
//!
//! The state machine governing one quick-open interaction:
//!
//! ```text
//! Closed --open_panel--> Open(Idle) <--> Open(AwaitingResponse)
//!   ^                        |
//!   +-- cancel / close_panel / confirm_selection
//! ```
//!
//! Each open panel owns a fresh suggestion store and selection cursor; both
//! are dropped when the panel closes.

use std::path::{Path, PathBuf};
use std::time::Instant;

use super::collaborators::{FileOpener, PanelPresenter};
use super::dispatcher::{DispatchEvent, QueryDispatcher, Submission};
use super::selection::{Direction, SelectionCursor};
use super::suggestion_store::SuggestionStore;
use crate::fuzzy::MatchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenState {
    Idle,
    AwaitingResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Open(OpenState),
}

impl PanelState {
    pub fn is_open(self) -> bool {
        matches!(self, PanelState::Open(_))
    }
}

/// Per-open state, dropped on close
#[derive(Debug, Default)]
struct OpenPanel {
    store: SuggestionStore,
    cursor: SelectionCursor,
    input: String,
    awaiting: bool,
}

pub struct PanelSession<P, O> {
    presenter: P,
    opener: O,
    dispatcher: QueryDispatcher,
    /// Relative result paths are resolved against this before opening
    root: Option<PathBuf>,
    open: Option<OpenPanel>,
}

impl<P, O> PanelSession<P, O>
where
    P: PanelPresenter,
    O: FileOpener,
{
    pub fn new(presenter: P, opener: O, dispatcher: QueryDispatcher) -> Self {
        Self {
            presenter,
            opener,
            dispatcher,
            root: None,
            open: None,
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn state(&self) -> PanelState {
        match &self.open {
            None => PanelState::Closed,
            Some(panel) if panel.awaiting => PanelState::Open(OpenState::AwaitingResponse),
            Some(_) => PanelState::Open(OpenState::Idle),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Suggestions of the open panel
    pub fn store(&self) -> Option<&SuggestionStore> {
        self.open.as_ref().map(|panel| &panel.store)
    }

    /// Selected row of the open panel
    pub fn selected_index(&self) -> Option<usize> {
        self.open.as_ref().and_then(|panel| panel.cursor.index())
    }

    pub fn selected(&self) -> Option<&MatchResult> {
        let panel = self.open.as_ref()?;
        panel.cursor.current(&panel.store)
    }

    pub fn cursor(&self) -> Option<&SelectionCursor> {
        self.open.as_ref().map(|panel| &panel.cursor)
    }

    pub fn input(&self) -> &str {
        self.open.as_ref().map_or("", |panel| panel.input.as_str())
    }

    /// When the pending query will be sent, so the event loop can wake up
    pub fn next_deadline(&self) -> Option<Instant> {
        self.open.as_ref()?;
        self.dispatcher.next_deadline()
    }

    /// `Closed -> Open(Idle)` with an empty store and no selection
    pub fn open_panel(&mut self) {
        if self.open.is_some() {
            log::debug!("Quick open already showing");
            return;
        }

        self.open = Some(OpenPanel::default());
        self.presenter.present();
        log::debug!("Quick open panel opened");
    }

    pub fn on_query_text_changed(&mut self, text: &str) {
        self.on_query_text_changed_at(text, Instant::now());
    }

    /// Forward new input text to the dispatcher
    ///
    /// Non-empty text moves to `AwaitingResponse`; empty text clears the
    /// suggestions and returns to `Idle` immediately.
    pub fn on_query_text_changed_at(&mut self, text: &str, now: Instant) {
        let Some(panel) = self.open.as_mut() else {
            return;
        };

        panel.input = text.to_string();
        match self.dispatcher.submit(text, now, &mut panel.store) {
            Submission::Cleared => {
                panel.awaiting = false;
                panel.cursor.reset();
                self.presenter.suggestions_changed(&panel.store);
            }
            Submission::Scheduled => panel.awaiting = true,
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Send the debounced query if its window has passed
    pub fn tick_at(&mut self, now: Instant) {
        let Some(panel) = self.open.as_mut() else {
            return;
        };

        if let Some(DispatchEvent::Failed(..)) = self.dispatcher.tick(now, &mut panel.store) {
            self.on_results_applied();
        }
    }

    /// Apply responses that arrived since the last call
    ///
    /// A dropped stale response leaves the panel in `AwaitingResponse`; only
    /// the current generation ends loading.
    pub fn poll_responses(&mut self) {
        let Some(panel) = self.open.as_mut() else {
            self.dispatcher.discard_responses();
            return;
        };

        let mut finished = false;
        for event in self.dispatcher.poll(&mut panel.store) {
            match event {
                DispatchEvent::Applied(_) => {
                    panel.cursor.reset();
                    self.presenter.suggestions_changed(&panel.store);
                    finished = true;
                }
                DispatchEvent::Failed(..) => finished = true,
                DispatchEvent::Sent(_) | DispatchEvent::Stale(_) => {}
            }
        }

        if finished {
            self.on_results_applied();
        }
    }

    /// `Open(AwaitingResponse) -> Open(Idle)` once the current query resolved
    ///
    /// Stays awaiting while newer text is still waiting in the debounce window.
    fn on_results_applied(&mut self) {
        if self.dispatcher.has_pending_query() {
            return;
        }
        if let Some(panel) = self.open.as_mut() {
            panel.awaiting = false;
        }
    }

    pub fn navigate(&mut self, direction: Direction) {
        let Some(panel) = self.open.as_mut() else {
            return;
        };

        panel.cursor.move_by(direction, panel.store.len());
        self.presenter.selection_changed(panel.cursor.index());
    }

    /// Open the selected result and close the panel
    ///
    /// Without a selected row this does nothing and the panel stays open.
    /// Returns the path handed to the file opener.
    pub fn confirm_selection(&mut self) -> Option<PathBuf> {
        let panel = self.open.as_ref()?;
        let index = panel.cursor.index()?;

        let result = match panel.store.get(index) {
            Ok(result) => result,
            Err(e) => {
                log::error!("Selection out of sync with suggestions: {}", e);
                debug_assert!(false, "{}", e);
                return None;
            }
        };

        let path = self.resolve(result.path());
        if let Err(e) = self.opener.open_path(&path) {
            log::error!("Failed to open {}: {}", path.display(), e);
        }

        self.close_panel();
        Some(path)
    }

    /// `Open(*) -> Closed`, clearing input and suggestions
    ///
    /// Calling it on a closed panel does nothing.
    pub fn cancel(&mut self) {
        let Some(mut panel) = self.open.take() else {
            return;
        };

        self.dispatcher.reset();
        panel.input.clear();
        // Bumps the generation so in-flight responses can never apply
        panel.store.clear();
        self.presenter.dismiss();
        log::debug!("Quick open panel closed");
    }

    /// Close because the panel lost focus; same effect as `cancel`
    pub fn close_panel(&mut self) {
        self.cancel();
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
