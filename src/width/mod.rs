//! Terminal display width helpers.
//!
//! Item names and titles carry ANSI colour sequences once translated, so any
//! padding done by a terminal host has to measure the visible text only.

mod utils;

pub use utils::{display_width, truncate_to_width};
