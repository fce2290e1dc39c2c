//! Terminal front-end for the quick-open panel
//!
//! A thin rendering layer: every decision is made by `PanelSession`, the app
//! only translates terminal events into session calls and draws its state.

mod events;
mod presenter;
mod render;
mod state;

pub use presenter::{PickOpener, TerminalPresenter};
pub use state::App;
