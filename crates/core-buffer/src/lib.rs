//! Screen buffer collaborator boundary.
//!
//! The range core never owns buffer contents. Everything it needs (geometry,
//! row text, cursor, selection, pixel metrics) is read through the
//! [`ScreenBuffer`] trait, and the only writes it ever asks for are selection
//! and viewport changes requested by the host.
//!
//! Implementations are expected to be shared behind an `Arc`, so all
//! methods take `&self`; implementations that accept selection or scroll
//! requests use interior mutability. [`CircularBuffer`] is the in-memory
//! implementation used by tests and the CLI.

use core_coords::{
    BufferGeometry, CellMetrics, Column, PixelPoint, ScreenCoord, ScreenInfoRow, TextBufferRow,
    Viewport,
};
use thiserror::Error;

mod circular;
mod selection;

pub use circular::CircularBuffer;
pub use selection::{SelectionRect, SelectionSpan};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("operation not supported by this buffer: {0}")]
    Unsupported(&'static str),

    #[error("selection span not present")]
    SelectionNotFound,
}

/// Font reported for text attribute queries.
#[derive(Debug, Clone, PartialEq)]
pub struct FontInfo {
    pub name: String,
    pub size_points: f64,
}

impl Default for FontInfo {
    fn default() -> Self {
        Self {
            name: "Consolas".to_string(),
            size_points: 12.0,
        }
    }
}

pub trait ScreenBuffer {
    fn total_rows(&self) -> u32;

    fn row_width(&self) -> u32;

    /// Visible window, inclusive, in row/column units.
    fn viewport(&self) -> Viewport;

    /// Pixel size of one character cell.
    fn cell_metrics(&self) -> CellMetrics;

    /// Screen position of the client area's top-left corner.
    fn client_origin(&self) -> PixelPoint;

    /// Current cursor position. May be stale or out of bounds; callers clamp.
    fn cursor(&self) -> ScreenCoord;

    /// Current selection as rectangles in row/column units. Empty when
    /// nothing is selected.
    fn selection_rects(&self) -> Vec<SelectionRect>;

    /// Text stored in `row`, without padding. `None` for rows outside the
    /// buffer.
    fn row_text(&self, row: TextBufferRow) -> Option<String>;

    /// Text of every row in `rows`, in order, read as one snapshot. The
    /// default reads row by row; implementations that can be written to
    /// concurrently should override this to hold a single lock.
    fn rows_text(&self, rows: &[TextBufferRow]) -> Vec<Option<String>> {
        rows.iter().map(|&row| self.row_text(row)).collect()
    }

    /// Storage slot currently holding row 0 (the circular write position).
    /// `row_text` already takes logical rows, so callers only need this for
    /// diagnostics. Buffers that never recycle rows report 0.
    fn first_row_index(&self) -> u32 {
        0
    }

    fn font(&self) -> FontInfo {
        FontInfo::default()
    }

    /// One consistent snapshot of the geometry. Implementations that can be
    /// resized concurrently should override this to read everything under a
    /// single lock.
    fn geometry(&self) -> BufferGeometry {
        BufferGeometry::new(self.total_rows(), self.row_width(), self.viewport())
    }

    /// Map a screen point onto a `(row, column)`. Points above or below the
    /// client area snap to the first or last visible row, and points left or
    /// right of it snap to the first or last visible column.
    fn hit_test(&self, point: PixelPoint) -> ScreenCoord {
        let viewport = self.viewport();
        let metrics = self.cell_metrics();
        let origin = self.client_origin();
        let x = point.x - origin.x;
        let y = point.y - origin.y;
        let client_height = f64::from(viewport.height()) * metrics.height;
        let client_width = f64::from(viewport.width()) * metrics.width;

        let row = if y < 0.0 {
            viewport.top
        } else if y >= client_height {
            viewport.bottom
        } else {
            viewport.top + (y / metrics.height).floor() as i32
        };
        let column = if x < 0.0 {
            viewport.left
        } else if x >= client_width {
            viewport.right
        } else {
            viewport.left + (x / metrics.width).floor() as i32
        };
        ScreenCoord::new(row, column)
    }

    /// Replace the selection with `span`, or clear it when `span` is `None`.
    fn set_selection(&self, _span: Option<SelectionSpan>) -> Result<(), BufferError> {
        Err(BufferError::Unsupported("set_selection"))
    }

    /// Add `span` to the current selection.
    fn add_selection(&self, _span: SelectionSpan) -> Result<(), BufferError> {
        Err(BufferError::Unsupported("add_selection"))
    }

    /// Remove `span` from the current selection.
    fn remove_selection(&self, _span: SelectionSpan) -> Result<(), BufferError> {
        Err(BufferError::Unsupported("remove_selection"))
    }

    /// Move the visible window.
    fn scroll_to(&self, _viewport: Viewport) -> Result<(), BufferError> {
        Err(BufferError::Unsupported("scroll_to"))
    }
}

/// Cursor position clamped into the buffer.
pub fn clamped_cursor<B: ScreenBuffer + ?Sized>(
    buffer: &B,
    geometry: &BufferGeometry,
) -> (ScreenInfoRow, Column) {
    buffer.cursor().clamp_to(geometry)
}
