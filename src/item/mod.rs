//! Display items placed into container slots.
//!
//! The framework never looks inside an [`Item`]; it only clones it into the
//! rendered projection handed to the host.

use serde::{Deserialize, Serialize};

use crate::text;

/// Renderable payload of a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub kind: String,
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lore: Vec<String>,
    pub amount: u8,
    #[serde(default)]
    pub glow: bool,
}

impl Item {
    /// Plain single item of the given kind with no name or lore.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            lore: Vec::new(),
            amount: 1,
            glow: false,
        }
    }

    /// Name if set, otherwise the kind.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.kind)
    }
}

/// Builds [`Item`]s.
///
/// Every configuring call consumes the builder and returns a new one, so a
/// partially configured builder can be cloned and reused as a template
/// without later calls leaking into earlier items.
#[derive(Debug, Clone)]
pub struct ItemBuilder {
    item: Item,
}

impl ItemBuilder {
    pub fn start(kind: impl Into<String>) -> Self {
        Self {
            item: Item::new(kind),
        }
    }

    pub fn of(item: Item) -> Self {
        Self { item }
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.item.kind = kind.into();
        self
    }

    /// Display name; formatting codes are translated.
    pub fn name(mut self, name: &str) -> Self {
        self.item.name = Some(text::color(name));
        self
    }

    /// Replace the lore; formatting codes are translated.
    pub fn lore<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.item.lore = lines.into_iter().map(|l| text::color(l.as_ref())).collect();
        self
    }

    pub fn add_lore(mut self, line: &str) -> Self {
        self.item.lore.push(text::color(line));
        self
    }

    /// Stack size, clamped to 1-64.
    pub fn amount(mut self, amount: u8) -> Self {
        self.item.amount = amount.clamp(1, 64);
        self
    }

    pub fn glow(mut self, glow: bool) -> Self {
        self.item.glow = glow;
        self
    }

    pub fn build(self) -> Item {
        self.item
    }
}

impl From<ItemBuilder> for Item {
    fn from(builder: ItemBuilder) -> Self {
        builder.build()
    }
}
