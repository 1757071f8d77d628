//! Coordinate conversion layer for the circular row buffer.
//!
//! Several data structures share similar row semantics, so each gets its own
//! name to keep translation sites explicit:
//!
//! * `Row` is a generic signed row that does not know where it came from.
//!   It only exists as an intermediate before `normalize_row`.
//! * `ViewportRow` is relative to the top visible row: 0 at the top, negative
//!   above the viewport, positive below it.
//! * `ScreenInfoRow` indexes the stable row store. Its position never
//!   changes, but the text held at that index does each time a new line is
//!   written into the circular buffer.
//! * `TextBufferRow` indexes the text buffer. In this scheme it shares the
//!   `ScreenInfoRow` index space; the conversions stay distinct so any future
//!   remapping lands in exactly one place.
//!
//! An `Endpoint` is a linear character position: `row * row_width + column`.
//! Endpoint 0 is the first column of text buffer row 0.
//!
//! Every function here is pure. Geometry is captured once per call into a
//! [`BufferGeometry`] snapshot and passed in; nothing is cached across calls
//! because the owning buffer may scroll or resize between them.

use std::cmp::Ordering;

mod pixel;
mod viewport;

pub use pixel::{CellMetrics, PixelPoint, PixelRect};
pub use viewport::Viewport;

pub type Row = i32;
pub type ViewportRow = i32;
pub type ScreenInfoRow = u32;
pub type TextBufferRow = u32;
pub type Column = u32;
pub type Endpoint = u32;

/// A `(row, column)` pair of unspecified validity, as produced by hit
/// testing. Either component may fall outside the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenCoord {
    pub row: Row,
    pub column: i32,
}

impl ScreenCoord {
    pub fn new(row: Row, column: i32) -> Self {
        Self { row, column }
    }

    /// Clamp into the buffer: the row into `[0, total_rows)` and the column
    /// into `[0, row_width)`. Rows are clamped, not wrapped.
    pub fn clamp_to(&self, geometry: &BufferGeometry) -> (ScreenInfoRow, Column) {
        let last_row = i64::from(geometry.last_screen_info_row_index());
        let last_col = i64::from(geometry.last_column_index());
        let row = i64::from(self.row).clamp(0, last_row) as ScreenInfoRow;
        let column = i64::from(self.column).clamp(0, last_col) as Column;
        (row, column)
    }
}

/// Snapshot of the buffer geometry taken at the start of an operation.
///
/// Both dimensions are forced to at least 1 so that the division and
/// modulo based conversions below are total. The row count is capped so
/// that every cell has an endpoint that fits in `u32`; rows past the cap are
/// not addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferGeometry {
    total_rows: u32,
    row_width: u32,
    viewport: Viewport,
}

impl BufferGeometry {
    pub fn new(total_rows: u32, row_width: u32, viewport: Viewport) -> Self {
        let row_width = row_width.max(1);
        Self {
            total_rows: total_rows.clamp(1, Endpoint::MAX / row_width),
            row_width,
            viewport,
        }
    }

    pub fn total_rows(&self) -> u32 {
        self.total_rows
    }

    pub fn row_width(&self) -> u32 {
        self.row_width
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn first_screen_info_row_index(&self) -> ScreenInfoRow {
        0
    }

    pub fn last_screen_info_row_index(&self) -> ScreenInfoRow {
        self.total_rows - 1
    }

    pub fn first_column_index(&self) -> Column {
        0
    }

    pub fn last_column_index(&self) -> Column {
        self.row_width - 1
    }

    /// Number of addressable character positions.
    pub fn endpoint_count(&self) -> u32 {
        self.total_rows * self.row_width
    }

    /// Last storable endpoint (last column of the last row).
    pub fn max_endpoint(&self) -> Endpoint {
        self.endpoint_count() - 1
    }

    pub fn clamp_endpoint(&self, endpoint: Endpoint) -> Endpoint {
        endpoint.min(self.max_endpoint())
    }

    pub fn clamp_column(&self, column: Column) -> Column {
        column.min(self.last_column_index())
    }

    pub fn endpoint_to_text_buffer_row(&self, endpoint: Endpoint) -> TextBufferRow {
        endpoint / self.row_width
    }

    pub fn endpoint_to_column(&self, endpoint: Endpoint) -> Column {
        endpoint % self.row_width
    }

    pub fn text_buffer_row_to_endpoint(&self, row: TextBufferRow) -> Endpoint {
        row.saturating_mul(self.row_width)
    }

    pub fn text_buffer_row_to_screen_info_row(&self, row: TextBufferRow) -> ScreenInfoRow {
        row
    }

    pub fn screen_info_row_to_text_buffer_row(&self, row: ScreenInfoRow) -> TextBufferRow {
        row
    }

    pub fn endpoint_to_screen_info_row(&self, endpoint: Endpoint) -> ScreenInfoRow {
        self.text_buffer_row_to_screen_info_row(self.endpoint_to_text_buffer_row(endpoint))
    }

    pub fn screen_info_row_to_endpoint(&self, row: ScreenInfoRow) -> Endpoint {
        self.text_buffer_row_to_endpoint(self.screen_info_row_to_text_buffer_row(row))
    }

    /// Endpoint of `(row, column)` with the column clamped into the row.
    pub fn coord_to_endpoint(&self, row: ScreenInfoRow, column: Column) -> Endpoint {
        let row = row.min(self.last_screen_info_row_index());
        self.screen_info_row_to_endpoint(row) + self.clamp_column(column)
    }

    /// Wrap a signed row into `[0, total_rows)`. Negative rows wrap toward
    /// the high end, so `-1` becomes `total_rows - 1`.
    pub fn normalize_row(&self, row: Row) -> ScreenInfoRow {
        i64::from(row).rem_euclid(i64::from(self.total_rows)) as ScreenInfoRow
    }

    /// Viewport-relative row against the snapshot viewport.
    pub fn screen_info_row_to_viewport_row(&self, row: ScreenInfoRow) -> ViewportRow {
        screen_info_row_to_viewport_row(row, &self.viewport)
    }

    /// Visibility against the snapshot viewport.
    pub fn is_screen_info_row_in_viewport(&self, row: ScreenInfoRow) -> bool {
        is_screen_info_row_in_viewport(row, &self.viewport)
    }

    /// Rows covered walking forward from `start_row` to `end_row`, both
    /// inclusive. When `start_row > end_row` the walk wraps through row 0.
    pub fn rows_spanned(&self, start_row: ScreenInfoRow, end_row: ScreenInfoRow) -> u32 {
        if start_row <= end_row {
            end_row - start_row + 1
        } else {
            self.total_rows - start_row + end_row + 1
        }
    }
}

pub fn screen_info_row_to_viewport_row(row: ScreenInfoRow, viewport: &Viewport) -> ViewportRow {
    (i64::from(row) - i64::from(viewport.top)).clamp(i64::from(i32::MIN), i64::from(i32::MAX))
        as ViewportRow
}

pub fn is_screen_info_row_in_viewport(row: ScreenInfoRow, viewport: &Viewport) -> bool {
    let viewport_row = screen_info_row_to_viewport_row(row, viewport);
    viewport_row >= 0 && (viewport_row as u32) < viewport.height()
}

/// Reading-order comparison of two screen coordinates, row first, then
/// column. This is the only ordering used by comparison and search.
pub fn compare_screen_coords(
    row_a: ScreenInfoRow,
    col_a: Column,
    row_b: ScreenInfoRow,
    col_b: Column,
) -> Ordering {
    row_a.cmp(&row_b).then(col_a.cmp(&col_b))
}
