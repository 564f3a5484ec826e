//! Boundary with the host's container primitive.
//!
//! A host creates visual containers, fills their slots, opens them for a
//! viewer and reports raw click/close events back. The framework only ever
//! talks to it through [`ContainerHost`].

use std::fmt;

use crate::error::{PanelError, Result};
use crate::item::Item;

pub mod memory;
pub mod terminal;

pub use memory::{MemoryContainer, MemoryHost};
pub use terminal::TerminalHost;

/// Slot index as reported by hosts. Negative values mean "outside the grid".
pub type SlotIndex = i32;

/// Identifies whoever a container is opened for.
pub type ViewerId = String;

/// Number of slots in one container row.
pub const ROW_WIDTH: usize = 9;

/// Largest container the host can show.
pub const MAX_CONTAINER_SIZE: usize = 54;

/// Host-assigned token identifying one opened container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub u64);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container#{}", self.0)
    }
}

/// Kind of click the viewer performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickGesture {
    Left,
    Right,
    ShiftLeft,
    ShiftRight,
    Middle,
    Other,
}

impl ClickGesture {
    /// Gesture that turns a page backwards.
    pub fn is_back(self) -> bool {
        matches!(self, ClickGesture::Left)
    }

    /// Gesture that turns a page forwards.
    pub fn is_forward(self) -> bool {
        matches!(self, ClickGesture::Right)
    }
}

/// Raw click reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub container: ContainerId,
    pub viewer: ViewerId,
    pub slot: SlotIndex,
    pub gesture: ClickGesture,
    cancelled: bool,
}

impl ClickEvent {
    pub fn new(
        container: ContainerId,
        viewer: impl Into<ViewerId>,
        slot: SlotIndex,
        gesture: ClickGesture,
    ) -> Self {
        Self {
            container,
            viewer: viewer.into(),
            slot,
            gesture,
            cancelled: false,
        }
    }

    /// Ask the host to skip its default handling (e.g. picking the item up).
    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Raw close reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseEvent {
    pub container: ContainerId,
    pub viewer: ViewerId,
}

impl CloseEvent {
    pub fn new(container: ContainerId, viewer: impl Into<ViewerId>) -> Self {
        Self {
            container,
            viewer: viewer.into(),
        }
    }
}

/// Container primitive provided by the host environment.
pub trait ContainerHost {
    /// Create an empty container. `size` is a multiple of 9 in `[9, 54]`.
    fn create_container(&mut self, title: &str, size: usize) -> Result<ContainerId>;

    fn set_slot_item(&mut self, container: ContainerId, slot: usize, item: &Item) -> Result<()>;

    /// Show the container to the viewer, replacing whatever they had open.
    fn open(&mut self, container: ContainerId, viewer: &ViewerId) -> Result<()>;

    /// Close whatever container the viewer has open. No-op if none.
    fn close(&mut self, viewer: &ViewerId) -> Result<()>;
}

/// Reject sizes the container primitive cannot show.
pub fn validate_size(size: usize) -> Result<()> {
    if size == 0 || size > MAX_CONTAINER_SIZE || size % ROW_WIDTH != 0 {
        return Err(PanelError::InvalidSize(size));
    }
    Ok(())
}
