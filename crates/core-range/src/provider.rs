//! Range factory bound to one screen buffer.
//!
//! `TextProvider` is the entry point the host automation framework talks
//! to: it creates ranges (empty, at the cursor, from explicit endpoints, from
//! a screen point, over the whole document, over the visible rows) and
//! enumerates the live selection. Every range it creates keeps a cheap clone
//! of the provider so later operations can read live geometry.

use std::fmt;
use std::sync::Arc;

use core_buffer::{ScreenBuffer, SelectionRect, clamped_cursor};
use core_coords::{BufferGeometry, Endpoint, PixelPoint};
use tracing::debug;

use crate::{Result, TextRange};

/// Text formatting knobs applied by range queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeOptions {
    /// Inserted between rows by `get_text`.
    pub line_separator: String,
    /// Upper bound on rows scanned by `find_text`; 0 means unlimited.
    pub max_search_rows: u32,
}

impl Default for RangeOptions {
    fn default() -> Self {
        Self {
            line_separator: "\r\n".to_string(),
            max_search_rows: 0,
        }
    }
}

pub struct TextProvider<B: ?Sized> {
    buffer: Arc<B>,
    options: Arc<RangeOptions>,
}

impl<B: ?Sized> Clone for TextProvider<B> {
    fn clone(&self) -> Self {
        Self {
            buffer: Arc::clone(&self.buffer),
            options: Arc::clone(&self.options),
        }
    }
}

impl<B: ?Sized> fmt::Debug for TextProvider<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextProvider")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<B: ScreenBuffer + ?Sized> TextProvider<B> {
    pub fn new(buffer: Arc<B>) -> Self {
        Self::with_options(buffer, RangeOptions::default())
    }

    pub fn with_options(buffer: Arc<B>, options: RangeOptions) -> Self {
        Self {
            buffer,
            options: Arc::new(options),
        }
    }

    pub fn buffer(&self) -> &Arc<B> {
        &self.buffer
    }

    pub fn options(&self) -> &RangeOptions {
        &self.options
    }

    /// Fresh geometry snapshot from the buffer.
    pub fn geometry(&self) -> BufferGeometry {
        self.buffer.geometry()
    }

    /// Empty range at endpoint 0.
    pub fn range_degenerate(&self) -> TextRange<B> {
        TextRange::degenerate_at(self.clone(), 0)
    }

    /// Empty range at the current cursor position.
    pub fn range_at_cursor(&self) -> TextRange<B> {
        let geometry = self.geometry();
        let (row, column) = clamped_cursor(self.buffer.as_ref(), &geometry);
        TextRange::degenerate_at(self.clone(), geometry.coord_to_endpoint(row, column))
    }

    /// Range over explicit endpoints. Fails when `degenerate` is set but the
    /// endpoints differ; out-of-range endpoints are clamped.
    pub fn range_from_endpoints(
        &self,
        start: Endpoint,
        end: Endpoint,
        degenerate: bool,
    ) -> Result<TextRange<B>> {
        TextRange::with_endpoints(self.clone(), start, end, degenerate)
    }

    /// Empty range at the character under a screen point. Points outside the
    /// client area snap to the nearest visible row and column.
    pub fn range_from_point(&self, point: PixelPoint) -> TextRange<B> {
        let geometry = self.geometry();
        let (row, column) = self.buffer.hit_test(point).clamp_to(&geometry);
        debug!(target: "uia.provider", x = point.x, y = point.y, row, column, "range_from_point");
        TextRange::degenerate_at(self.clone(), geometry.coord_to_endpoint(row, column))
    }

    /// Range covering every valid endpoint.
    pub fn document_range(&self) -> TextRange<B> {
        let geometry = self.geometry();
        debug!(
            target: "uia.provider",
            rows = geometry.total_rows(),
            width = geometry.row_width(),
            first_row = self.buffer.first_row_index(),
            "document_range"
        );
        self.row_range(&geometry, 0, geometry.last_screen_info_row_index())
    }

    /// One full-width range per visible row, top to bottom.
    pub fn visible_ranges(&self) -> Vec<TextRange<B>> {
        let geometry = self.geometry();
        let viewport = geometry.viewport();
        let last = i64::from(geometry.last_screen_info_row_index());
        let top = i64::from(viewport.top).max(0);
        let bottom = i64::from(viewport.bottom).min(last);
        (top..=bottom)
            .map(|row| self.row_range(&geometry, row as u32, row as u32))
            .collect()
    }

    /// One range per row of every selection rectangle. Empty when nothing is
    /// selected.
    pub fn selection_ranges(&self) -> Vec<TextRange<B>> {
        let geometry = self.geometry();
        let rects = self.buffer.selection_rects();
        let ranges: Vec<_> = rects
            .iter()
            .flat_map(|rect| self.rect_ranges(&geometry, rect))
            .collect();
        debug!(target: "uia.provider", rects = rects.len(), ranges = ranges.len(), "selection_ranges");
        ranges
    }

    /// The live selection, or a single empty range at the cursor when
    /// nothing is selected.
    pub fn selection(&self) -> Vec<TextRange<B>> {
        let ranges = self.selection_ranges();
        if ranges.is_empty() {
            vec![self.range_at_cursor()]
        } else {
            ranges
        }
    }

    fn rect_ranges(&self, geometry: &BufferGeometry, rect: &SelectionRect) -> Vec<TextRange<B>> {
        let (left, right) = if rect.left <= rect.right {
            (rect.left, rect.right)
        } else {
            (rect.right, rect.left)
        };
        rect.rows()
            .take_while(|row| *row <= geometry.last_screen_info_row_index())
            .map(|row| {
                let start = geometry.coord_to_endpoint(row, left);
                let end = geometry.coord_to_endpoint(row, right);
                self.full_range(start, end)
            })
            .collect()
    }

    /// Non-degenerate range from column 0 of `first_row` through the last
    /// column of `last_row`.
    fn row_range(&self, geometry: &BufferGeometry, first_row: u32, last_row: u32) -> TextRange<B> {
        let start = geometry.screen_info_row_to_endpoint(first_row);
        let end = geometry.coord_to_endpoint(last_row, geometry.last_column_index());
        self.full_range(start, end)
    }

    fn full_range(&self, start: Endpoint, end: Endpoint) -> TextRange<B> {
        TextRange::spanning(self.clone(), start, end)
    }
}
