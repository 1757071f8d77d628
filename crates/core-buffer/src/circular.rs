//! In-memory circular row store.
//!
//! Rows live in a fixed number of storage slots. `first_row` names the slot
//! that currently holds screen row 0; once every slot has been written the
//! next line recycles the oldest slot and `first_row` advances, so the
//! content behind a given screen row index changes while the index itself
//! stays put.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use core_coords::{
    BufferGeometry, CellMetrics, PixelPoint, ScreenCoord, ScreenInfoRow, TextBufferRow, Viewport,
};
use tracing::debug;

use crate::{BufferError, FontInfo, ScreenBuffer, SelectionRect, SelectionSpan};

#[derive(Debug)]
struct Inner {
    slots: Vec<String>,
    first_row: usize,
    used_rows: u32,
    row_width: u32,
    viewport: Viewport,
    cursor: ScreenCoord,
    selection: Vec<SelectionRect>,
    metrics: CellMetrics,
    origin: PixelPoint,
    font: FontInfo,
}

impl Inner {
    fn total_rows(&self) -> u32 {
        self.slots.len() as u32
    }

    fn slot(&self, row: TextBufferRow) -> usize {
        (self.first_row + row as usize) % self.slots.len()
    }

    fn truncate(&self, text: &str) -> String {
        text.chars().take(self.row_width as usize).collect()
    }

    fn push_row(&mut self, text: String) {
        let total = self.total_rows();
        let cursor_column = text.chars().count().min(self.row_width as usize - 1) as i32;
        let cursor_row = if self.used_rows < total {
            let slot = self.slot(self.used_rows);
            self.slots[slot] = text;
            self.used_rows += 1;
            self.used_rows - 1
        } else {
            let slot = self.first_row;
            self.slots[slot] = text;
            self.first_row = (self.first_row + 1) % self.slots.len();
            total - 1
        };
        self.cursor = ScreenCoord::new(cursor_row as i32, cursor_column);
        if self.cursor.row > self.viewport.bottom {
            let top = self.cursor.row - self.viewport.height() as i32 + 1;
            self.viewport = self.viewport.scrolled_to(top.max(0));
        }
    }

    fn clamp_viewport(&self, viewport: Viewport) -> Viewport {
        let total = self.total_rows() as i32;
        let height = (viewport.height() as i32).clamp(1, total);
        let top = viewport.top.clamp(0, total - height);
        Viewport::with_size(top, viewport.left, height as u32, viewport.width())
    }
}

/// Fixed-capacity circular buffer of rows.
#[derive(Debug)]
pub struct CircularBuffer {
    inner: RwLock<Inner>,
}

impl CircularBuffer {
    /// Empty buffer of `total_rows` rows, `row_width` columns, showing
    /// `viewport_rows` rows from the top.
    pub fn new(total_rows: u32, row_width: u32, viewport_rows: u32) -> Self {
        let total_rows = total_rows.max(1);
        let row_width = row_width.max(1);
        let viewport_rows = viewport_rows.clamp(1, total_rows);
        Self {
            inner: RwLock::new(Inner {
                slots: vec![String::new(); total_rows as usize],
                first_row: 0,
                used_rows: 0,
                row_width,
                viewport: Viewport::with_size(0, 0, viewport_rows, row_width),
                cursor: ScreenCoord::default(),
                selection: Vec::new(),
                metrics: CellMetrics::default(),
                origin: PixelPoint::default(),
                font: FontInfo::default(),
            }),
        }
    }

    /// Buffer pre-filled with `text`, written line by line.
    pub fn from_text(total_rows: u32, row_width: u32, viewport_rows: u32, text: &str) -> Self {
        let buffer = Self::new(total_rows, row_width, viewport_rows);
        buffer.write_text(text);
        buffer
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append each line of `text`. Lines longer than the row width wrap onto
    /// following rows; once the buffer is full the oldest rows are recycled.
    pub fn write_text(&self, text: &str) {
        let mut inner = self.write();
        let width = inner.row_width as usize;
        let mut written = 0usize;
        for line in text.lines() {
            let chars: Vec<char> = line.chars().collect();
            if chars.is_empty() {
                inner.push_row(String::new());
                written += 1;
                continue;
            }
            for chunk in chars.chunks(width) {
                inner.push_row(chunk.iter().collect());
                written += 1;
            }
        }
        debug!(
            target: "buffer",
            rows_written = written,
            first_row = inner.first_row,
            cursor_row = inner.cursor.row,
            viewport_top = inner.viewport.top,
            "write_text"
        );
    }

    /// Overwrite the content of a single screen row (truncated to the row
    /// width). Rows outside the buffer are ignored.
    pub fn set_row(&self, row: ScreenInfoRow, text: &str) {
        let mut inner = self.write();
        if row >= inner.total_rows() {
            return;
        }
        let slot = inner.slot(row);
        let text = inner.truncate(text);
        inner.slots[slot] = text;
        inner.used_rows = inner.used_rows.max(row + 1);
    }

    pub fn set_cursor(&self, row: i32, column: i32) {
        self.write().cursor = ScreenCoord::new(row, column);
    }

    /// Scroll so that `top` is the first visible row (clamped into the
    /// buffer).
    pub fn set_viewport_top(&self, top: i32) {
        let mut inner = self.write();
        let moved = inner.viewport.scrolled_to(top);
        inner.viewport = inner.clamp_viewport(moved);
        debug!(target: "buffer", top = inner.viewport.top, "viewport_scrolled");
    }

    pub fn set_cell_metrics(&self, metrics: CellMetrics) {
        self.write().metrics = metrics;
    }

    pub fn set_client_origin(&self, origin: PixelPoint) {
        self.write().origin = origin;
    }

    pub fn set_font(&self, font: FontInfo) {
        self.write().font = font;
    }

    pub fn set_selection_rects(&self, rects: Vec<SelectionRect>) {
        self.write().selection = rects;
    }

    /// Change the buffer dimensions. Screen rows keep their index and their
    /// (truncated) text; rows beyond the new height are dropped.
    pub fn resize(&self, total_rows: u32, row_width: u32) {
        let mut inner = self.write();
        let total_rows = total_rows.max(1);
        let row_width = row_width.max(1);
        let mut slots = vec![String::new(); total_rows as usize];
        for (row, slot) in slots.iter_mut().enumerate() {
            if (row as u32) < inner.total_rows() {
                let old = inner.slot(row as u32);
                *slot = inner.slots[old].chars().take(row_width as usize).collect();
            }
        }
        inner.slots = slots;
        inner.first_row = 0;
        inner.used_rows = inner.used_rows.min(total_rows);
        inner.row_width = row_width;
        let viewport = Viewport::with_size(
            inner.viewport.top,
            0,
            inner.viewport.height().min(total_rows),
            row_width,
        );
        inner.viewport = inner.clamp_viewport(viewport);
        inner.selection.clear();
        debug!(target: "buffer", total_rows, row_width, "resized");
    }
}

impl ScreenBuffer for CircularBuffer {
    fn total_rows(&self) -> u32 {
        self.read().total_rows()
    }

    fn row_width(&self) -> u32 {
        self.read().row_width
    }

    fn viewport(&self) -> Viewport {
        self.read().viewport
    }

    fn cell_metrics(&self) -> CellMetrics {
        self.read().metrics
    }

    fn client_origin(&self) -> PixelPoint {
        self.read().origin
    }

    fn cursor(&self) -> ScreenCoord {
        self.read().cursor
    }

    fn selection_rects(&self) -> Vec<SelectionRect> {
        self.read().selection.clone()
    }

    fn row_text(&self, row: TextBufferRow) -> Option<String> {
        let inner = self.read();
        if row >= inner.total_rows() {
            return None;
        }
        Some(inner.slots[inner.slot(row)].clone())
    }

    fn rows_text(&self, rows: &[TextBufferRow]) -> Vec<Option<String>> {
        let inner = self.read();
        rows.iter()
            .map(|&row| (row < inner.total_rows()).then(|| inner.slots[inner.slot(row)].clone()))
            .collect()
    }

    fn first_row_index(&self) -> u32 {
        self.read().first_row as u32
    }

    fn font(&self) -> FontInfo {
        self.read().font.clone()
    }

    fn geometry(&self) -> BufferGeometry {
        let inner = self.read();
        BufferGeometry::new(inner.total_rows(), inner.row_width, inner.viewport)
    }

    fn set_selection(&self, span: Option<SelectionSpan>) -> Result<(), BufferError> {
        let mut inner = self.write();
        inner.selection = match span {
            Some(span) => span.to_rects(inner.total_rows(), inner.row_width),
            None => Vec::new(),
        };
        debug!(target: "buffer", rects = inner.selection.len(), "selection_set");
        Ok(())
    }

    fn add_selection(&self, span: SelectionSpan) -> Result<(), BufferError> {
        let mut inner = self.write();
        let rects = span.to_rects(inner.total_rows(), inner.row_width);
        for rect in rects {
            if !inner.selection.contains(&rect) {
                inner.selection.push(rect);
            }
        }
        debug!(target: "buffer", rects = inner.selection.len(), "selection_added");
        Ok(())
    }

    fn remove_selection(&self, span: SelectionSpan) -> Result<(), BufferError> {
        let mut inner = self.write();
        let rects = span.to_rects(inner.total_rows(), inner.row_width);
        if !rects.iter().all(|r| inner.selection.contains(r)) {
            return Err(BufferError::SelectionNotFound);
        }
        inner.selection.retain(|r| !rects.contains(r));
        debug!(target: "buffer", rects = inner.selection.len(), "selection_removed");
        Ok(())
    }

    fn scroll_to(&self, viewport: Viewport) -> Result<(), BufferError> {
        let mut inner = self.write();
        inner.viewport = inner.clamp_viewport(viewport);
        debug!(target: "buffer", top = inner.viewport.top, "viewport_scrolled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_rows_in_order() {
        let b = CircularBuffer::from_text(5, 10, 3, "one\ntwo\nthree");
        assert_eq!(b.row_text(0).as_deref(), Some("one"));
        assert_eq!(b.row_text(2).as_deref(), Some("three"));
        assert_eq!(b.row_text(3).as_deref(), Some(""));
        assert_eq!(b.row_text(5), None);
        assert_eq!(b.cursor(), ScreenCoord::new(2, 5));
    }

    #[test]
    fn long_lines_wrap_onto_next_row() {
        let b = CircularBuffer::from_text(5, 4, 5, "abcdefghij");
        assert_eq!(b.row_text(0).as_deref(), Some("abcd"));
        assert_eq!(b.row_text(1).as_deref(), Some("efgh"));
        assert_eq!(b.row_text(2).as_deref(), Some("ij"));
    }

    #[test]
    fn full_buffer_recycles_oldest_row() {
        let b = CircularBuffer::from_text(3, 10, 3, "a\nb\nc\nd");
        assert_eq!(b.first_row_index(), 1);
        assert_eq!(b.row_text(0).as_deref(), Some("b"));
        assert_eq!(b.row_text(2).as_deref(), Some("d"));
        assert_eq!(b.cursor().row, 2);
        assert_eq!(
            b.rows_text(&[2, 0, 3]),
            vec![Some("d".to_string()), Some("b".to_string()), None]
        );
    }

    #[test]
    fn viewport_follows_output() {
        let b = CircularBuffer::from_text(10, 10, 3, "1\n2\n3\n4\n5");
        assert_eq!(b.viewport(), Viewport::new(2, 0, 4, 9));
    }

    #[test]
    fn scroll_to_clamps_inside_buffer() {
        let b = CircularBuffer::new(10, 10, 4);
        b.scroll_to(Viewport::with_size(8, 0, 4, 10)).unwrap();
        assert_eq!(b.viewport().top, 6);
        b.set_viewport_top(-3);
        assert_eq!(b.viewport().top, 0);
    }

    #[test]
    fn remove_missing_selection_fails() {
        let b = CircularBuffer::new(10, 10, 4);
        b.set_selection(Some(SelectionSpan::new((1, 0), (1, 3)))).unwrap();
        let err = b.remove_selection(SelectionSpan::new((2, 0), (2, 3)));
        assert_eq!(err, Err(BufferError::SelectionNotFound));
        b.remove_selection(SelectionSpan::new((1, 0), (1, 3))).unwrap();
        assert!(b.selection_rects().is_empty());
    }

    #[test]
    fn resize_keeps_screen_rows() {
        let b = CircularBuffer::from_text(3, 10, 3, "a\nb\nc\nd");
        b.resize(2, 5);
        assert_eq!(b.total_rows(), 2);
        assert_eq!(b.row_text(0).as_deref(), Some("b"));
        assert_eq!(b.row_text(1).as_deref(), Some("c"));
        assert_eq!(b.viewport().height(), 2);
    }

    #[test]
    fn default_hit_test_snaps_to_viewport() {
        let b = CircularBuffer::new(20, 10, 5);
        b.set_viewport_top(5);
        b.set_cell_metrics(CellMetrics::new(10.0, 20.0));
        b.set_client_origin(PixelPoint::new(100.0, 100.0));
        assert_eq!(b.hit_test(PixelPoint::new(135.0, 145.0)), ScreenCoord::new(7, 3));
        assert_eq!(b.hit_test(PixelPoint::new(50.0, 0.0)), ScreenCoord::new(5, 0));
        assert_eq!(b.hit_test(PixelPoint::new(500.0, 900.0)), ScreenCoord::new(9, 9));
    }
}
