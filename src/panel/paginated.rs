//! Paged content with a persistent toolbar row.
//!
//! Slots 0-44 show a 45-slot window of an unbounded content list, slots 45-53
//! show the toolbar. Whenever the content spans more than one page a
//! navigation button is installed at toolbar slot 4: left click goes back,
//! right click goes forward, and both wrap around at the ends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::button::Button;
use crate::error::{PanelError, Result};
use crate::host::{ROW_WIDTH, SlotIndex};
use crate::item::{Item, ItemBuilder};
use crate::router::ClickContext;
use crate::text;

use super::core::next_free_slot;

/// Content slots per page.
pub const PAGE_SIZE: usize = 45;

/// Slots in the toolbar row.
pub const TOOLBAR_SIZE: usize = ROW_WIDTH;

/// Toolbar slot reserved for page navigation.
pub const NAV_TOOLBAR_SLOT: SlotIndex = 4;

pub(crate) const PAGINATED_ROWS: u8 = 6;

const NAV_RENDERED_SLOT: usize = PAGE_SIZE + NAV_TOOLBAR_SLOT as usize;

/// Label templates for the navigation button.
///
/// `$currentPage` and `$maxPage` are replaced with 1-based page numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    pub nav_name_format: String,
    pub nav_lore_format: Vec<String>,
    pub nav_item_kind: String,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            nav_name_format: "&7Page &e$currentPage&8/&e$maxPage".to_string(),
            nav_lore_format: vec![
                "&8> &6Left-click &7to go to the previous page".to_string(),
                "&8> &6Right-click &7to go to the next page".to_string(),
            ],
            nav_item_kind: "name_tag".to_string(),
        }
    }
}

impl PaginationSettings {
    /// Parse settings from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Paged layout state: content, toolbar, and the current page.
#[derive(Debug, Default)]
pub struct Pagination {
    content: BTreeMap<SlotIndex, Button>,
    toolbar: BTreeMap<SlotIndex, Button>,
    current_page: usize,
    settings: PaginationSettings,
    // Toolbar slot 4 currently holds a generated navigation button or label.
    auto_nav: bool,
}

impl Pagination {
    pub fn new(settings: PaginationSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &PaginationSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut PaginationSettings {
        &mut self.settings
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn content(&self) -> &BTreeMap<SlotIndex, Button> {
        &self.content
    }

    pub fn content_len(&self) -> usize {
        self.content.len()
    }

    pub fn toolbar(&self) -> &BTreeMap<SlotIndex, Button> {
        &self.toolbar
    }

    /// Last page index, derived from the highest content key.
    pub fn max_page(&self) -> usize {
        let highest = self
            .content
            .keys()
            .next_back()
            .copied()
            .unwrap_or(0)
            .max(0) as usize;
        (highest + 1).div_ceil(PAGE_SIZE) - 1
    }

    /// Advance one page. Returns `false` and stays put on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.current_page < self.max_page() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. Returns `false` and stays put on the first page.
    pub fn previous_page(&mut self) -> bool {
        if self.current_page > 0 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn set_page(&mut self, page: usize) -> Result<()> {
        let max_page = self.max_page();
        if page > max_page {
            return Err(PanelError::PageOutOfRange { page, max_page });
        }
        self.current_page = page;
        Ok(())
    }

    /// Back to the first page with no content.
    pub fn reset_page(&mut self) {
        self.current_page = 0;
        self.content.clear();
    }

    pub fn set_toolbar_item(&mut self, slot: SlotIndex, button: Button) -> Result<()> {
        check_toolbar_slot(slot)?;
        if slot == NAV_TOOLBAR_SLOT {
            self.auto_nav = false;
        }
        self.toolbar.insert(slot, button);
        Ok(())
    }

    pub fn remove_toolbar_item(&mut self, slot: SlotIndex) -> Result<Option<Button>> {
        check_toolbar_slot(slot)?;
        if slot == NAV_TOOLBAR_SLOT {
            self.auto_nav = false;
        }
        Ok(self.toolbar.remove(&slot))
    }

    pub fn toolbar_item(&self, slot: SlotIndex) -> Option<&Button> {
        self.toolbar.get(&slot)
    }

    pub fn clear_toolbar(&mut self) {
        self.toolbar.clear();
        self.auto_nav = false;
    }

    pub(crate) fn add_content(&mut self, button: Button) -> Option<SlotIndex> {
        let slot = next_free_slot(&self.content)?;
        self.content.insert(slot, button);
        Some(slot)
    }

    pub(crate) fn set_content(&mut self, slot: SlotIndex, button: Button) {
        self.content.insert(slot, button);
    }

    pub(crate) fn remove_content(&mut self, slot: SlotIndex) -> Option<Button> {
        let removed = self.content.remove(&slot);
        self.clamp_page();
        removed
    }

    pub(crate) fn clear_content(&mut self) {
        self.content.clear();
        self.clamp_page();
    }

    /// Button at a visible slot of the current page.
    pub fn get_button(&self, slot: SlotIndex) -> Option<&Button> {
        if slot < 0 {
            return None;
        }
        let slot = slot as usize;
        if slot < PAGE_SIZE {
            let key = SlotIndex::try_from(self.current_page * PAGE_SIZE + slot).ok()?;
            self.content.get(&key)
        } else if slot < PAGE_SIZE + TOOLBAR_SIZE {
            self.toolbar.get(&((slot - PAGE_SIZE) as SlotIndex))
        } else {
            None
        }
    }

    /// Navigation label for the given 1-based page numbers.
    pub fn navigation_item(&self, current: usize, max: usize, controls: bool) -> Item {
        let pairs = [
            ("$currentPage", current.to_string()),
            ("$maxPage", max.to_string()),
        ];
        let name = text::replace(&self.settings.nav_name_format, &pairs);
        let builder = ItemBuilder::start(self.settings.nav_item_kind.as_str()).name(&name);
        if controls {
            builder
                .lore(text::replace_lines(&self.settings.nav_lore_format, &pairs))
                .build()
        } else {
            builder.build()
        }
    }

    pub(crate) fn render(&mut self) -> BTreeMap<usize, Item> {
        self.clamp_page();
        let max_page = self.max_page();

        if max_page > 0 {
            let nav = self.navigation_item(self.current_page + 1, max_page + 1, true);
            self.toolbar
                .insert(NAV_TOOLBAR_SLOT, Button::with_handler(nav, navigate));
            self.auto_nav = true;
        } else if self.auto_nav {
            self.toolbar.remove(&NAV_TOOLBAR_SLOT);
            self.auto_nav = false;
        }

        let mut slots = BTreeMap::new();

        // Content keys map positionally onto the window, so gaps stay empty.
        let start = (self.current_page * PAGE_SIZE) as SlotIndex;
        let end = start.saturating_add(PAGE_SIZE as SlotIndex);
        for (key, button) in self.content.range(start..end) {
            slots.insert((key - start) as usize, button.item().clone());
        }

        for (slot, button) in &self.toolbar {
            slots.insert(PAGE_SIZE + *slot as usize, button.item().clone());
        }

        if self.current_page == 0 && !slots.contains_key(&NAV_RENDERED_SLOT) {
            let label = self.navigation_item(1, 1, false);
            slots.insert(NAV_RENDERED_SLOT, label.clone());
            self.toolbar.insert(NAV_TOOLBAR_SLOT, Button::inert(label));
            self.auto_nav = true;
        }

        slots
    }

    fn clamp_page(&mut self) {
        let max_page = self.max_page();
        if self.current_page > max_page {
            self.current_page = max_page;
        }
    }
}

fn check_toolbar_slot(slot: SlotIndex) -> Result<()> {
    if !(0..TOOLBAR_SIZE as SlotIndex).contains(&slot) {
        return Err(PanelError::ToolbarSlotOutOfRange(slot));
    }
    Ok(())
}

// Navigation button handler. Wraparound lives here, not in next/previous.
fn navigate(ctx: &mut ClickContext<'_>) {
    ctx.cancel();
    let gesture = ctx.gesture();

    if let Some(pages) = ctx.panel_mut().pagination_mut() {
        if gesture.is_back() {
            if !pages.previous_page() {
                pages.current_page = pages.max_page();
            }
        } else if gesture.is_forward() && !pages.next_page() {
            pages.current_page = 0;
        }
    }

    ctx.request_refresh();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::Panel;

    fn filled(count: usize) -> Pagination {
        let mut pages = Pagination::default();
        for idx in 0..count {
            pages.add_content(Button::new(Item::new(format!("item{idx}"))));
        }
        pages
    }

    fn kind(item: Option<&Item>) -> Option<&str> {
        item.map(|i| i.kind.as_str())
    }

    #[test]
    fn max_page_boundaries() {
        assert_eq!(Pagination::default().max_page(), 0);
        assert_eq!(filled(1).max_page(), 0);
        assert_eq!(filled(45).max_page(), 0);
        assert_eq!(filled(46).max_page(), 1);
        assert_eq!(filled(90).max_page(), 1);
        assert_eq!(filled(91).max_page(), 2);
    }

    #[test]
    fn max_page_never_decreases_as_content_grows() {
        let mut pages = Pagination::default();
        let mut last = pages.max_page();
        for idx in 0..200 {
            pages.add_content(Button::new(Item::new(format!("item{idx}"))));
            let now = pages.max_page();
            assert!(now >= last);
            last = now;
        }
        pages.set_content(1000, Button::new(Item::new("far")));
        assert_eq!(pages.max_page(), 22);
    }

    #[test]
    fn page_transitions_stop_at_the_ends() {
        let mut pages = filled(100);
        assert_eq!(pages.max_page(), 2);

        assert!(!pages.previous_page());
        assert_eq!(pages.current_page(), 0);
        assert!(pages.next_page());
        assert!(pages.next_page());
        assert_eq!(pages.current_page(), 2);
        assert!(!pages.next_page());
        assert_eq!(pages.current_page(), 2);
        assert!(pages.previous_page());
        assert_eq!(pages.current_page(), 1);
    }

    #[test]
    fn set_page_is_bounded() {
        let mut pages = filled(50);
        pages.set_page(1).unwrap();
        assert_eq!(pages.current_page(), 1);
        assert!(matches!(
            pages.set_page(2),
            Err(PanelError::PageOutOfRange {
                page: 2,
                max_page: 1
            })
        ));
    }

    #[test]
    fn toolbar_slots_are_validated() {
        let mut pages = Pagination::default();
        for slot in 0..9 {
            pages
                .set_toolbar_item(slot, Button::new(Item::new("tool")))
                .unwrap();
        }
        assert!(matches!(
            pages.set_toolbar_item(9, Button::new(Item::new("tool"))),
            Err(PanelError::ToolbarSlotOutOfRange(9))
        ));
        assert!(matches!(
            pages.set_toolbar_item(-1, Button::new(Item::new("tool"))),
            Err(PanelError::ToolbarSlotOutOfRange(-1))
        ));
        assert!(pages.remove_toolbar_item(9).is_err());
        assert!(pages.remove_toolbar_item(-1).is_err());
        assert!(pages.remove_toolbar_item(3).unwrap().is_some());
    }

    #[test]
    fn pages_split_content_without_loss_or_duplication() {
        let mut pages = filled(51);

        let first = pages.render();
        for slot in 0..45 {
            assert_eq!(kind(first.get(&slot)), Some(format!("item{slot}").as_str()));
        }

        assert!(pages.next_page());
        let second = pages.render();
        for slot in 0..6 {
            assert_eq!(
                kind(second.get(&slot)),
                Some(format!("item{}", slot + 45).as_str())
            );
        }
        for slot in 6..45 {
            assert!(second.get(&slot).is_none());
        }

        let mut seen: Vec<String> = first
            .range(0..45)
            .chain(second.range(0..45))
            .map(|(_, item)| item.kind.clone())
            .collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 51);
    }

    #[test]
    fn navigation_installed_only_with_several_pages() {
        let mut pages = filled(46);
        let rendered = pages.render();
        let nav = rendered.get(&49).unwrap();
        assert_eq!(text::strip(nav.label()), "Page 1/2");
        assert_eq!(nav.lore.len(), 2);
        assert!(pages.toolbar_item(NAV_TOOLBAR_SLOT).is_some());

        pages.set_page(1).unwrap();
        let rendered = pages.render();
        assert_eq!(text::strip(rendered.get(&49).unwrap().label()), "Page 2/2");
    }

    #[test]
    fn single_page_gets_static_label() {
        let mut pages = filled(3);
        let rendered = pages.render();
        let label = rendered.get(&49).unwrap();
        assert_eq!(text::strip(label.label()), "Page 1/1");
        assert!(label.lore.is_empty());
        let registered = pages.toolbar_item(NAV_TOOLBAR_SLOT).unwrap();
        assert!(registered.handler().is_some());
    }

    #[test]
    fn user_toolbar_item_at_nav_slot_suppresses_label() {
        let mut pages = filled(3);
        pages
            .set_toolbar_item(NAV_TOOLBAR_SLOT, Button::new(Item::new("compass")))
            .unwrap();
        let rendered = pages.render();
        assert_eq!(kind(rendered.get(&49)), Some("compass"));
    }

    #[test]
    fn shrinking_content_swaps_nav_for_label_and_clamps_page() {
        let mut panel = Panel::paginated("Shop");
        for idx in 0..60 {
            panel.add_button(Button::new(Item::new(format!("item{idx}"))));
        }
        let pages = panel.pagination_mut().unwrap();
        pages.set_page(1).unwrap();
        pages.render();

        for slot in 45..60 {
            panel.remove_button(slot);
        }
        let pages = panel.pagination_mut().unwrap();
        assert_eq!(pages.current_page(), 0);
        let rendered = pages.render();
        let label = rendered.get(&49).unwrap();
        assert_eq!(text::strip(label.label()), "Page 1/1");
        assert!(label.lore.is_empty());
    }

    #[test]
    fn sparse_keys_render_positionally() {
        let mut pages = Pagination::default();
        pages.set_content(3, Button::new(Item::new("three")));
        pages.set_content(50, Button::new(Item::new("fifty")));

        let first = pages.render();
        assert_eq!(kind(first.get(&3)), Some("three"));
        assert!(first.get(&0).is_none());

        pages.next_page();
        let second = pages.render();
        assert_eq!(kind(second.get(&5)), Some("fifty"));
        assert_eq!(second.range(0..45).count(), 1);
    }

    #[test]
    fn get_button_follows_current_page_and_toolbar() {
        let mut pages = filled(50);
        pages
            .set_toolbar_item(0, Button::new(Item::new("back")))
            .unwrap();
        assert_eq!(pages.get_button(2).map(|b| b.item().kind.as_str()), Some("item2"));
        pages.next_page();
        assert_eq!(pages.get_button(2).map(|b| b.item().kind.as_str()), Some("item47"));
        assert!(pages.get_button(10).is_none());
        assert_eq!(pages.get_button(45).map(|b| b.item().kind.as_str()), Some("back"));
        assert!(pages.get_button(54).is_none());
        assert!(pages.get_button(-999).is_none());
    }

    #[test]
    fn reset_clears_content_and_page() {
        let mut pages = filled(100);
        pages.next_page();
        pages.reset_page();
        assert_eq!(pages.current_page(), 0);
        assert_eq!(pages.content_len(), 0);
    }

    #[test]
    fn settings_from_json_fall_back_to_defaults() {
        let settings =
            PaginationSettings::from_json(r#"{"nav_name_format": "$currentPage of $maxPage"}"#)
                .unwrap();
        assert_eq!(settings.nav_name_format, "$currentPage of $maxPage");
        assert_eq!(settings.nav_item_kind, "name_tag");
        assert_eq!(settings.nav_lore_format.len(), 2);

        assert!(matches!(
            PaginationSettings::from_json("{not json"),
            Err(PanelError::Settings(_))
        ));

        let mut pages = Pagination::new(settings);
        assert_eq!(pages.navigation_item(2, 5, false).label(), "2 of 5");
        pages.settings_mut().nav_item_kind = "paper".to_string();
        assert_eq!(pages.navigation_item(1, 1, false).kind, "paper");
    }
}
