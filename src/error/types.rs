use thiserror::Error;

use crate::host::ContainerId;

/// Unified result type for the panel framework.
pub type Result<T> = std::result::Result<T, PanelError>;

/// Errors surfaced by panels, the router, and the reference hosts.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("toolbar slot {0} out of range, must be between 0-8")]
    ToolbarSlotOutOfRange(i32),
    #[error("panel rows must be between 1-6, got {0}")]
    InvalidRows(u8),
    #[error("container size must be a multiple of 9 between 9-54, got {0}")]
    InvalidSize(usize),
    #[error("page {page} out of range, last page is {max_page}")]
    PageOutOfRange { page: usize, max_page: usize },
    #[error("container `{0}` not known to the host")]
    UnknownContainer(ContainerId),
    #[error("panel lock poisoned")]
    Poisoned,
    #[error("host error: {0}")]
    Host(String),
    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
