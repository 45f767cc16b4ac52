//! Admin console view navigator.
//!
//! A session's console is one [`ConsoleState`]: the active view, sub-filters, the selection
//! and the collections mirrored from the platform backend. [`Navigator`] applies [`Action`]s
//! to it and [`Snapshot`] projects it for rendering.

pub mod action;
pub mod aggregate;
mod controller;
pub mod snapshot;
pub mod state;
pub mod view;

pub use action::Action;
pub use controller::Navigator;
pub use snapshot::Snapshot;
pub use state::ConsoleState;
pub use view::ViewMode;
