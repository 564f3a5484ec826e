//! Panel module orchestrator.
//!
//! Downstream code imports panel types from here while the layouts live in
//! their own files.

mod confirm;
mod core;
pub mod paginated;

pub use confirm::{ConfirmPrompt, PromptCallback};
pub use self::core::{CloseHook, Layout, Panel, PanelId, PanelState, RenderedPanel, SharedPanel};
pub use paginated::{NAV_TOOLBAR_SLOT, PAGE_SIZE, Pagination, PaginationSettings, TOOLBAR_SIZE};
