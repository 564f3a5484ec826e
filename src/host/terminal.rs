use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType};

use crate::error::{PanelError, Result};
use crate::item::Item;
use crate::width::{display_width, truncate_to_width};

use super::{
    ClickEvent, ClickGesture, CloseEvent, ContainerHost, ContainerId, ROW_WIDTH, ViewerId,
    validate_size,
};

const DEFAULT_CELL_WIDTH: u16 = 12;

struct Sheet {
    title: String,
    size: usize,
    items: BTreeMap<usize, Item>,
}

/// Draws the open container as a 9-column grid on an ANSI terminal.
///
/// A terminal serves exactly one viewer. The host keeps a cursor cell that
/// the driver moves around; [`TerminalHost::click`] turns the cursor
/// position into a click event.
pub struct TerminalHost<W: Write> {
    writer: W,
    viewer: ViewerId,
    cell_width: u16,
    next_id: u64,
    sheets: HashMap<ContainerId, Sheet>,
    open: Option<ContainerId>,
    cursor: usize,
    pending_closes: Vec<CloseEvent>,
}

impl<W: Write> TerminalHost<W> {
    pub fn new(writer: W, viewer: impl Into<ViewerId>) -> Self {
        Self {
            writer,
            viewer: viewer.into(),
            cell_width: DEFAULT_CELL_WIDTH,
            next_id: 0,
            sheets: HashMap::new(),
            open: None,
            cursor: 0,
            pending_closes: Vec::new(),
        }
    }

    pub fn with_cell_width(mut self, width: u16) -> Self {
        self.cell_width = width.max(3);
        self
    }

    pub fn viewer(&self) -> &ViewerId {
        &self.viewer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Move the cursor by whole cells, clamped to the open container.
    pub fn move_cursor(&mut self, dx: i32, dy: i32) -> Result<()> {
        let Some(size) = self.open_size() else {
            return Ok(());
        };
        let rows = (size / ROW_WIDTH) as i32;
        let col = (self.cursor % ROW_WIDTH) as i32 + dx;
        let row = (self.cursor / ROW_WIDTH) as i32 + dy;
        let col = col.clamp(0, ROW_WIDTH as i32 - 1);
        let row = row.clamp(0, rows - 1);
        self.cursor = row as usize * ROW_WIDTH + col as usize;
        self.draw()
    }

    /// Click event for the cell under the cursor.
    pub fn click(&self, gesture: ClickGesture) -> Option<ClickEvent> {
        let id = self.open?;
        Some(ClickEvent::new(
            id,
            self.viewer.clone(),
            self.cursor as i32,
            gesture,
        ))
    }

    /// The viewer closes the container themselves.
    pub fn dismiss(&mut self) -> Result<Option<CloseEvent>> {
        let Some(id) = self.open.take() else {
            return Ok(None);
        };
        self.sheets.remove(&id);
        let event = CloseEvent::new(id, self.viewer.clone());
        self.pending_closes.push(event.clone());
        self.draw()?;
        Ok(Some(event))
    }

    pub fn take_close_events(&mut self) -> Vec<CloseEvent> {
        std::mem::take(&mut self.pending_closes)
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    fn open_size(&self) -> Option<usize> {
        self.open
            .and_then(|id| self.sheets.get(&id))
            .map(|sheet| sheet.size)
    }

    /// Redraw the whole screen.
    pub fn draw(&mut self) -> Result<()> {
        queue!(self.writer, MoveTo(0, 0), Clear(ClearType::All))?;

        let Some(sheet) = self.open.and_then(|id| self.sheets.get(&id)) else {
            queue!(self.writer, Print("(no container open)"))?;
            self.writer.flush()?;
            return Ok(());
        };

        let cell = self.cell_width as usize;
        queue!(
            self.writer,
            Print(&sheet.title),
            SetAttribute(Attribute::Reset)
        )?;

        let rows = sheet.size / ROW_WIDTH;
        for row in 0..rows {
            queue!(self.writer, MoveTo(0, row as u16 + 2))?;
            for col in 0..ROW_WIDTH {
                let slot = row * ROW_WIDTH + col;
                let label = sheet
                    .items
                    .get(&slot)
                    .map(|item| truncate_to_width(item.label(), cell - 2))
                    .unwrap_or_else(|| "·".to_string());
                let mut padded = format!(" {label}");
                while display_width(&padded) < cell {
                    padded.push(' ');
                }
                if slot == self.cursor {
                    queue!(
                        self.writer,
                        SetAttribute(Attribute::Reverse),
                        Print(padded),
                        SetAttribute(Attribute::Reset)
                    )?;
                } else {
                    queue!(self.writer, Print(padded))?;
                }
            }
        }

        let footer_row = rows as u16 + 3;
        if let Some(item) = sheet.items.get(&self.cursor) {
            queue!(
                self.writer,
                MoveTo(0, footer_row),
                Print(item.label()),
                SetAttribute(Attribute::Reset)
            )?;
            for (offset, line) in item.lore.iter().enumerate() {
                queue!(
                    self.writer,
                    MoveTo(2, footer_row + 1 + offset as u16),
                    Print(line),
                    SetAttribute(Attribute::Reset)
                )?;
            }
        }

        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> ContainerHost for TerminalHost<W> {
    fn create_container(&mut self, title: &str, size: usize) -> Result<ContainerId> {
        validate_size(size)?;
        self.next_id += 1;
        let id = ContainerId(self.next_id);
        self.sheets.insert(
            id,
            Sheet {
                title: title.to_string(),
                size,
                items: BTreeMap::new(),
            },
        );
        Ok(id)
    }

    fn set_slot_item(&mut self, container: ContainerId, slot: usize, item: &Item) -> Result<()> {
        let sheet = self
            .sheets
            .get_mut(&container)
            .ok_or(PanelError::UnknownContainer(container))?;
        if slot >= sheet.size {
            return Err(PanelError::Host(format!("slot {slot} outside {container}")));
        }
        sheet.items.insert(slot, item.clone());
        Ok(())
    }

    fn open(&mut self, container: ContainerId, viewer: &ViewerId) -> Result<()> {
        if *viewer != self.viewer {
            return Err(PanelError::Host(format!(
                "terminal serves `{}`, not `{viewer}`",
                self.viewer
            )));
        }
        let size = self
            .sheets
            .get(&container)
            .map(|sheet| sheet.size)
            .ok_or(PanelError::UnknownContainer(container))?;
        if let Some(previous) = self.open.replace(container) {
            if previous != container {
                self.pending_closes
                    .push(CloseEvent::new(previous, self.viewer.clone()));
                self.sheets.remove(&previous);
            }
        }
        if self.cursor >= size {
            self.cursor = size - 1;
        }
        self.draw()
    }

    fn close(&mut self, viewer: &ViewerId) -> Result<()> {
        if *viewer != self.viewer {
            return Ok(());
        }
        if let Some(id) = self.open.take() {
            self.sheets.remove(&id);
            self.pending_closes
                .push(CloseEvent::new(id, self.viewer.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> TerminalHost<Vec<u8>> {
        TerminalHost::new(Vec::new(), "alex").with_cell_width(8)
    }

    #[test]
    fn draws_items_and_title() {
        let mut host = host();
        let id = host.create_container("Shop", 9).unwrap();
        host.set_slot_item(id, 0, &Item::new("apple")).unwrap();
        host.open(id, &"alex".to_string()).unwrap();

        let out = String::from_utf8_lossy(host.writer()).into_owned();
        assert!(out.contains("Shop"));
        assert!(out.contains(" apple"));
    }

    #[test]
    fn cursor_is_clamped_to_grid() {
        let mut host = host();
        let id = host.create_container("Shop", 18).unwrap();
        host.open(id, &"alex".to_string()).unwrap();
        host.move_cursor(20, 5).unwrap();
        assert_eq!(host.cursor(), 17);
        host.move_cursor(-3, -1).unwrap();
        assert_eq!(host.cursor(), 5);

        let event = host.click(ClickGesture::Right).unwrap();
        assert_eq!(event.slot, 5);
        assert_eq!(event.container, id);
    }

    #[test]
    fn rejects_other_viewers() {
        let mut host = host();
        let id = host.create_container("Shop", 9).unwrap();
        assert!(host.open(id, &"sam".to_string()).is_err());
    }

    #[test]
    fn close_and_dismiss_queue_events() {
        let mut host = host();
        let viewer = "alex".to_string();
        let id = host.create_container("Shop", 9).unwrap();
        host.open(id, &viewer).unwrap();
        host.close(&viewer).unwrap();
        assert!(!host.is_open());
        assert_eq!(host.take_close_events(), vec![CloseEvent::new(id, "alex")]);

        let next = host.create_container("Shop", 9).unwrap();
        host.open(next, &viewer).unwrap();
        assert_eq!(host.dismiss().unwrap(), Some(CloseEvent::new(next, "alex")));
        assert!(host.click(ClickGesture::Left).is_none());
        assert!(host.sheets.is_empty());
    }

    #[test]
    fn reopening_the_shown_container_keeps_it() {
        let mut host = host();
        let viewer = "alex".to_string();
        let id = host.create_container("Shop", 9).unwrap();
        host.open(id, &viewer).unwrap();
        host.open(id, &viewer).unwrap();

        assert!(host.take_close_events().is_empty());
        assert!(host.sheets.contains_key(&id));
        host.move_cursor(1, 0).unwrap();
        assert_eq!(host.click(ClickGesture::Left).map(|e| e.slot), Some(1));
    }
}
