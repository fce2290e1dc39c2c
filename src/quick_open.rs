//! Quick-open suggestion subsystem
//!
//! Keystrokes go through the `QueryDispatcher` (debounce, generation tagging),
//! accepted responses land in the `SuggestionStore`, the `SelectionCursor`
//! tracks the highlighted row, and `PanelSession` ties them together as the
//! open/closed state machine.

pub mod collaborators;
pub mod debouncer;
pub mod dispatcher;
pub mod selection;
pub mod session;
pub mod suggestion_store;

// Re-export public types
pub use collaborators::{FileOpener, PanelPresenter};
pub use debouncer::Debouncer;
pub use dispatcher::{DispatchEvent, QueryDispatcher, Submission};
pub use selection::{Direction, SelectionCursor};
pub use session::{OpenState, PanelSession, PanelState};
pub use suggestion_store::{IndexOutOfRange, StoreUpdate, SuggestionStore};
