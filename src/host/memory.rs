use std::collections::{BTreeMap, HashMap};

use crate::error::{PanelError, Result};
use crate::item::Item;

use super::{
    ClickEvent, ClickGesture, CloseEvent, ContainerHost, ContainerId, SlotIndex, ViewerId,
    validate_size,
};

/// Snapshot of a container created through [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryContainer {
    pub title: String,
    pub size: usize,
    pub items: BTreeMap<usize, Item>,
}

impl MemoryContainer {
    pub fn item(&self, slot: usize) -> Option<&Item> {
        self.items.get(&slot)
    }
}

/// In-process host that records everything it is asked to do.
///
/// Closing a container (programmatically or via [`MemoryHost::dismiss`])
/// queues a [`CloseEvent`] the way a real host would report it; callers feed
/// those back to the router with [`MemoryHost::take_close_events`].
#[derive(Debug, Default)]
pub struct MemoryHost {
    next_id: u64,
    containers: HashMap<ContainerId, MemoryContainer>,
    open: HashMap<ViewerId, ContainerId>,
    pending_closes: Vec<CloseEvent>,
    opened: u64,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container(&self, id: ContainerId) -> Option<&MemoryContainer> {
        self.containers.get(&id)
    }

    /// Container currently shown to the viewer.
    pub fn open_container(&self, viewer: &str) -> Option<(ContainerId, &MemoryContainer)> {
        let id = *self.open.get(viewer)?;
        self.containers.get(&id).map(|container| (id, container))
    }

    /// Build the click event the host would raise for the viewer's open container.
    pub fn click(&self, viewer: &str, slot: SlotIndex, gesture: ClickGesture) -> Option<ClickEvent> {
        let id = *self.open.get(viewer)?;
        Some(ClickEvent::new(id, viewer, slot, gesture))
    }

    /// The viewer closes their container themselves.
    pub fn dismiss(&mut self, viewer: &str) -> Option<CloseEvent> {
        let id = self.open.remove(viewer)?;
        self.forget(id);
        let event = CloseEvent::new(id, viewer);
        self.pending_closes.push(event.clone());
        Some(event)
    }

    pub fn take_close_events(&mut self) -> Vec<CloseEvent> {
        std::mem::take(&mut self.pending_closes)
    }

    /// Total number of `open` calls served.
    pub fn opened_count(&self) -> u64 {
        self.opened
    }

    /// Containers created and not yet closed.
    pub fn live_count(&self) -> usize {
        self.containers.len()
    }

    // Drop a container once no viewer has it open.
    fn forget(&mut self, id: ContainerId) {
        if !self.open.values().any(|open| *open == id) {
            self.containers.remove(&id);
        }
    }
}

impl ContainerHost for MemoryHost {
    fn create_container(&mut self, title: &str, size: usize) -> Result<ContainerId> {
        validate_size(size)?;
        self.next_id += 1;
        let id = ContainerId(self.next_id);
        self.containers.insert(
            id,
            MemoryContainer {
                title: title.to_string(),
                size,
                items: BTreeMap::new(),
            },
        );
        Ok(id)
    }

    fn set_slot_item(&mut self, container: ContainerId, slot: usize, item: &Item) -> Result<()> {
        let entry = self
            .containers
            .get_mut(&container)
            .ok_or(PanelError::UnknownContainer(container))?;
        if slot >= entry.size {
            return Err(PanelError::Host(format!(
                "slot {slot} outside {container} of size {}",
                entry.size
            )));
        }
        entry.items.insert(slot, item.clone());
        Ok(())
    }

    fn open(&mut self, container: ContainerId, viewer: &ViewerId) -> Result<()> {
        if !self.containers.contains_key(&container) {
            return Err(PanelError::UnknownContainer(container));
        }
        if let Some(previous) = self.open.insert(viewer.clone(), container) {
            if previous != container {
                self.pending_closes.push(CloseEvent::new(previous, viewer.clone()));
                self.forget(previous);
            }
        }
        self.opened += 1;
        Ok(())
    }

    fn close(&mut self, viewer: &ViewerId) -> Result<()> {
        if let Some(id) = self.open.remove(viewer) {
            self.forget(id);
            self.pending_closes.push(CloseEvent::new(id, viewer.clone()));
        }
        Ok(())
    }
}
