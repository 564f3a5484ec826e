//! Buttons: an item plus what happens when it is clicked.

use std::fmt;
use std::sync::Arc;

use crate::item::Item;
use crate::router::ClickContext;

/// Click callback attached to a [`Button`].
///
/// Handlers receive a [`ClickContext`] giving access to the raw event and
/// the panel that owns the button. Anything that touches the host (refresh,
/// close, opening another panel) is queued on the context and applied by the
/// router once the handler returns.
pub type ClickHandler = Arc<dyn Fn(&mut ClickContext<'_>) + Send + Sync>;

/// An item bound to a slot, optionally clickable.
#[derive(Clone)]
pub struct Button {
    item: Item,
    handler: Option<ClickHandler>,
}

impl Button {
    /// Display-only button. Clicks on it reach no handler.
    pub fn new(item: impl Into<Item>) -> Self {
        Self {
            item: item.into(),
            handler: None,
        }
    }

    pub fn with_handler<F>(item: impl Into<Item>, handler: F) -> Self
    where
        F: Fn(&mut ClickContext<'_>) + Send + Sync + 'static,
    {
        Self {
            item: item.into(),
            handler: Some(Arc::new(handler)),
        }
    }

    /// Button whose only behaviour is cancelling the host's default click handling.
    pub fn inert(item: impl Into<Item>) -> Self {
        Self::with_handler(item, |ctx| ctx.cancel())
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn set_item(&mut self, item: impl Into<Item>) {
        self.item = item.into();
    }

    pub fn handler(&self) -> Option<&ClickHandler> {
        self.handler.as_ref()
    }

    pub fn set_handler<F>(&mut self, handler: F)
    where
        F: Fn(&mut ClickContext<'_>) + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
    }

    pub fn clear_handler(&mut self) {
        self.handler = None;
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("item", &self.item)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}
