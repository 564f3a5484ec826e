//! Panels, their layouts and the rendered slot projection.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::button::Button;
use crate::error::{PanelError, Result};
use crate::host::{CloseEvent, ROW_WIDTH, SlotIndex};
use crate::item::Item;
use crate::text;

use super::paginated::{PAGINATED_ROWS, Pagination, PaginationSettings};

/// Panels are shared between the application and the router's weak registry.
pub type SharedPanel = Arc<Mutex<Panel>>;

/// Hook run when a viewer's container for this panel closes.
pub type CloseHook = Arc<dyn Fn(&mut Panel, &CloseEvent) + Send + Sync>;

static NEXT_PANEL_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a panel instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(u64);

impl PanelId {
    fn next() -> Self {
        Self(NEXT_PANEL_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Where a panel is in its open/close cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    /// Shown to at least one viewer.
    Active,
    /// Being closed by the framework; the close hook must not run.
    ClosingProgrammatically,
    /// Not shown to anyone.
    #[default]
    Closed,
}

/// How a panel maps slots to buttons.
#[derive(Debug)]
pub enum Layout {
    /// Fixed grid, every slot addressed directly.
    Grid {
        rows: u8,
        slots: BTreeMap<SlotIndex, Button>,
    },
    /// Six rows: five rows of paged content and a toolbar row.
    Paginated(Pagination),
}

/// Concrete slot→item projection handed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPanel {
    pub title: String,
    pub size: usize,
    pub slots: BTreeMap<usize, Item>,
}

impl RenderedPanel {
    pub fn item(&self, slot: usize) -> Option<&Item> {
        self.slots.get(&slot)
    }

    /// Number of filled slots.
    pub fn filled(&self) -> usize {
        self.slots.len()
    }
}

/// A titled grid of slot→button bindings.
pub struct Panel {
    id: PanelId,
    title: String,
    layout: Layout,
    on_close: Option<CloseHook>,
    state: PanelState,
}

impl Panel {
    /// Plain grid panel of `rows` rows (1-6).
    pub fn new(title: &str, rows: u8) -> Result<Self> {
        if !(1..=PAGINATED_ROWS).contains(&rows) {
            return Err(PanelError::InvalidRows(rows));
        }
        Ok(Self::from_layout(
            title,
            Layout::Grid {
                rows,
                slots: BTreeMap::new(),
            },
        ))
    }

    /// Single-row grid panel.
    pub fn single_row(title: &str) -> Self {
        Self::from_layout(
            title,
            Layout::Grid {
                rows: 1,
                slots: BTreeMap::new(),
            },
        )
    }

    pub fn paginated(title: &str) -> Self {
        Self::paginated_with(title, PaginationSettings::default())
    }

    pub fn paginated_with(title: &str, settings: PaginationSettings) -> Self {
        Self::from_layout(title, Layout::Paginated(Pagination::new(settings)))
    }

    fn from_layout(title: &str, layout: Layout) -> Self {
        Self {
            id: PanelId::next(),
            title: text::color(title),
            layout,
            on_close: None,
            state: PanelState::Closed,
        }
    }

    pub fn into_shared(self) -> SharedPanel {
        Arc::new(Mutex::new(self))
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the title; formatting codes are translated. Visible after the next refresh.
    pub fn set_title(&mut self, title: &str) {
        self.title = text::color(title);
    }

    pub fn rows(&self) -> u8 {
        match &self.layout {
            Layout::Grid { rows, .. } => *rows,
            Layout::Paginated(_) => PAGINATED_ROWS,
        }
    }

    pub fn size(&self) -> usize {
        self.rows() as usize * ROW_WIDTH
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: PanelState) {
        self.state = state;
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn is_paginated(&self) -> bool {
        matches!(self.layout, Layout::Paginated(_))
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        match &self.layout {
            Layout::Paginated(pages) => Some(pages),
            Layout::Grid { .. } => None,
        }
    }

    pub fn pagination_mut(&mut self) -> Option<&mut Pagination> {
        match &mut self.layout {
            Layout::Paginated(pages) => Some(pages),
            Layout::Grid { .. } => None,
        }
    }

    /// Buttons addressed by `add_button`/`set_button`: grid slots, or the
    /// virtual content list of a paginated panel.
    pub fn buttons(&self) -> &BTreeMap<SlotIndex, Button> {
        match &self.layout {
            Layout::Grid { slots, .. } => slots,
            Layout::Paginated(pages) => pages.content(),
        }
    }

    /// Append after the highest occupied slot and return the slot used.
    ///
    /// Never overwrites. On a full grid the slot lands past the end and is
    /// never rendered. Returns `None` and drops `button` when the highest key
    /// is already `SlotIndex::MAX`.
    pub fn add_button(&mut self, button: Button) -> Option<SlotIndex> {
        match &mut self.layout {
            Layout::Grid { slots, .. } => {
                let slot = next_free_slot(slots)?;
                slots.insert(slot, button);
                Some(slot)
            }
            Layout::Paginated(pages) => pages.add_content(button),
        }
    }

    /// Bind `button` at `slot`, replacing whatever was there.
    pub fn set_button(&mut self, slot: SlotIndex, button: Button) {
        match &mut self.layout {
            Layout::Grid { slots, .. } => {
                slots.insert(slot, button);
            }
            Layout::Paginated(pages) => pages.set_content(slot, button),
        }
    }

    pub fn remove_button(&mut self, slot: SlotIndex) -> Option<Button> {
        match &mut self.layout {
            Layout::Grid { slots, .. } => slots.remove(&slot),
            Layout::Paginated(pages) => pages.remove_content(slot),
        }
    }

    pub fn clear_buttons(&mut self) {
        match &mut self.layout {
            Layout::Grid { slots, .. } => slots.clear(),
            Layout::Paginated(pages) => pages.clear_content(),
        }
    }

    /// Button shown at a visible slot, if any.
    pub fn get_button(&self, slot: SlotIndex) -> Option<&Button> {
        match &self.layout {
            Layout::Grid { slots, .. } => {
                if slot < 0 || slot as usize >= self.size() {
                    return None;
                }
                slots.get(&slot)
            }
            Layout::Paginated(pages) => pages.get_button(slot),
        }
    }

    /// Project the current bindings onto a fresh slot→item map.
    ///
    /// Paginated panels also install their navigation controls here, which
    /// is why rendering needs `&mut self`.
    pub fn render(&mut self) -> RenderedPanel {
        let size = self.size();
        let slots = match &mut self.layout {
            Layout::Grid { slots, .. } => slots
                .iter()
                .filter(|(slot, _)| **slot >= 0 && (**slot as usize) < size)
                .map(|(slot, button)| (*slot as usize, button.item().clone()))
                .collect(),
            Layout::Paginated(pages) => pages.render(),
        };

        RenderedPanel {
            title: self.title.clone(),
            size,
            slots,
        }
    }

    pub fn set_on_close<F>(&mut self, hook: F)
    where
        F: Fn(&mut Panel, &CloseEvent) + Send + Sync + 'static,
    {
        self.on_close = Some(Arc::new(hook));
    }

    pub fn clear_on_close(&mut self) {
        self.on_close = None;
    }

    pub fn on_close(&self) -> Option<&CloseHook> {
        self.on_close.as_ref()
    }
}

impl std::fmt::Debug for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("layout", &self.layout)
            .field("state", &self.state)
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

/// One past the highest key, or 0 when nothing non-negative is bound.
pub(crate) fn next_free_slot(slots: &BTreeMap<SlotIndex, Button>) -> Option<SlotIndex> {
    let highest = slots.keys().next_back().copied().unwrap_or(-1).max(-1);
    highest.checked_add(1)
}
