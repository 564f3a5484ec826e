//! Yes/no prompt panels built on a single grid row.

use std::sync::Arc;

use crate::button::Button;
use crate::host::{SlotIndex, ViewerId};
use crate::item::{Item, ItemBuilder};

use super::core::Panel;

/// Callback run with the viewer who answered the prompt.
pub type PromptCallback = Arc<dyn Fn(&ViewerId) + Send + Sync>;

/// One-row yes/no prompt.
///
/// Answering closes the prompt quietly, so the close hook (which treats a
/// dismissed prompt as a cancel) only runs when the viewer walks away
/// without answering.
pub struct ConfirmPrompt {
    title: String,
    confirm_item: Item,
    cancel_item: Item,
    description: Option<Item>,
    on_confirm: Option<PromptCallback>,
    on_cancel: Option<PromptCallback>,
}

impl ConfirmPrompt {
    pub const CONFIRM_SLOT: SlotIndex = 2;
    pub const DESCRIPTION_SLOT: SlotIndex = 4;
    pub const CANCEL_SLOT: SlotIndex = 6;

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            confirm_item: ItemBuilder::start("lime_wool").name("&a&lConfirm").build(),
            cancel_item: ItemBuilder::start("red_wool").name("&c&lCancel").build(),
            description: None,
            on_confirm: None,
            on_cancel: None,
        }
    }

    pub fn confirm_item(mut self, item: impl Into<Item>) -> Self {
        self.confirm_item = item.into();
        self
    }

    pub fn cancel_item(mut self, item: impl Into<Item>) -> Self {
        self.cancel_item = item.into();
        self
    }

    pub fn description(mut self, item: impl Into<Item>) -> Self {
        self.description = Some(item.into());
        self
    }

    pub fn on_confirm<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ViewerId) + Send + Sync + 'static,
    {
        self.on_confirm = Some(Arc::new(callback));
        self
    }

    pub fn on_cancel<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ViewerId) + Send + Sync + 'static,
    {
        self.on_cancel = Some(Arc::new(callback));
        self
    }

    pub fn build(self) -> Panel {
        let mut panel = Panel::single_row(&self.title);

        panel.set_button(
            Self::CONFIRM_SLOT,
            answer_button(self.confirm_item, self.on_confirm),
        );
        panel.set_button(
            Self::CANCEL_SLOT,
            answer_button(self.cancel_item, self.on_cancel.clone()),
        );
        if let Some(description) = self.description {
            panel.set_button(Self::DESCRIPTION_SLOT, Button::inert(description));
        }

        if let Some(on_cancel) = self.on_cancel {
            panel.set_on_close(move |_panel, event| on_cancel(&event.viewer));
        }

        panel
    }
}

fn answer_button(item: Item, callback: Option<PromptCallback>) -> Button {
    Button::with_handler(item, move |ctx| {
        ctx.cancel();
        ctx.close_quietly();
        if let Some(callback) = &callback {
            callback(ctx.viewer());
        }
    })
}
