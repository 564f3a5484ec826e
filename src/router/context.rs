use crate::host::{ClickEvent, ClickGesture, SlotIndex, ViewerId};
use crate::panel::{Panel, SharedPanel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CloseRequest {
    Notify,
    Quiet,
}

/// Context passed to click handlers so they can act on the panel and viewer safely.
///
/// Panel changes happen in place. Host-facing requests are queued and the
/// router applies them after the handler returns: opening another panel
/// wins over closing, and closing wins over refreshing.
pub struct ClickContext<'a> {
    panel: &'a mut Panel,
    event: &'a mut ClickEvent,
    refresh_requested: bool,
    close_request: Option<CloseRequest>,
    open_request: Option<SharedPanel>,
}

impl<'a> ClickContext<'a> {
    pub(crate) fn new(panel: &'a mut Panel, event: &'a mut ClickEvent) -> Self {
        Self {
            panel,
            event,
            refresh_requested: false,
            close_request: None,
            open_request: None,
        }
    }

    pub fn event(&self) -> &ClickEvent {
        self.event
    }

    pub fn viewer(&self) -> &ViewerId {
        &self.event.viewer
    }

    pub fn slot(&self) -> SlotIndex {
        self.event.slot
    }

    pub fn gesture(&self) -> ClickGesture {
        self.event.gesture
    }

    /// Tell the host not to apply its default click behaviour.
    pub fn cancel(&mut self) {
        self.event.set_cancelled(true);
    }

    /// The panel that owns the clicked button.
    pub fn panel(&self) -> &Panel {
        self.panel
    }

    pub fn panel_mut(&mut self) -> &mut Panel {
        self.panel
    }

    /// Re-render the panel for this viewer once the handler returns.
    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }

    /// Close the viewer's container; the panel's close hook runs when the host reports it.
    pub fn close(&mut self) {
        self.close_request = Some(CloseRequest::Notify);
    }

    /// Close the viewer's container without running the close hook.
    pub fn close_quietly(&mut self) {
        self.close_request = Some(CloseRequest::Quiet);
    }

    /// Show another panel to this viewer in place of the current one.
    pub fn open(&mut self, panel: SharedPanel) {
        self.open_request = Some(panel);
    }

    pub(crate) fn into_outcome(self) -> ClickOutcome {
        ClickOutcome {
            refresh_requested: self.refresh_requested,
            close_request: self.close_request,
            open_request: self.open_request,
        }
    }
}

pub(crate) struct ClickOutcome {
    pub(crate) refresh_requested: bool,
    pub(crate) close_request: Option<CloseRequest>,
    pub(crate) open_request: Option<SharedPanel>,
}
