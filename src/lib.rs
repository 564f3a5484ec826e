//! Paginated grid panels with click routing.
//!
//! A [`Panel`] is a titled grid of slots holding [`Button`]s. Paginated
//! panels spread an unbounded content list over 45-slot pages and keep a
//! toolbar row with page navigation. The [`ClickRouter`] opens panels through
//! a [`ContainerHost`], remembers which container shows which panel, and
//! turns the host's raw click/close events into handler calls.
//!
//! ```
//! use slot_panels::{Button, ClickGesture, ClickRouter, ItemBuilder, MemoryHost, Panel};
//!
//! let mut panel = Panel::paginated("&6Shop");
//! for idx in 0..100 {
//!     panel.add_button(Button::new(ItemBuilder::start("emerald").name(&format!("Offer {idx}"))));
//! }
//! let panel = panel.into_shared();
//!
//! let mut router = ClickRouter::new(MemoryHost::new());
//! let viewer = "alex".to_string();
//! router.activate(&panel, &viewer)?;
//!
//! // Right click on the page indicator turns the page.
//! let mut click = router.host().click("alex", 49, ClickGesture::Right).unwrap();
//! router.handle_click(&mut click)?;
//! assert_eq!(panel.lock().unwrap().pagination().unwrap().current_page(), 1);
//! # Ok::<(), slot_panels::PanelError>(())
//! ```

pub mod button;
pub mod error;
pub mod host;
pub mod item;
pub mod logging;
pub mod metrics;
pub mod panel;
pub mod router;
pub mod text;
pub mod width;

pub use button::{Button, ClickHandler};
pub use error::{PanelError, Result};
pub use host::{
    ClickEvent, ClickGesture, CloseEvent, ContainerHost, ContainerId, MemoryContainer, MemoryHost,
    SlotIndex, TerminalHost, ViewerId,
};
pub use item::{Item, ItemBuilder};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{MetricSnapshot, RouterMetrics};
pub use panel::{
    CloseHook, ConfirmPrompt, Layout, NAV_TOOLBAR_SLOT, PAGE_SIZE, Pagination, PaginationSettings,
    Panel, PanelId, PanelState, PromptCallback, RenderedPanel, SharedPanel, TOOLBAR_SIZE,
};
pub use router::{ClickContext, ClickDisposition, ClickRouter, CloseDisposition, RouterConfig};
pub use width::display_width;
