//! Viewport: the visible rectangular window into the row store.
//!
//! Stored as an inclusive rectangle in row/column units, the shape console
//! hosts report it in. A viewport with `bottom < top` (or `right < left`) is
//! empty and has zero height (or width).

use crate::ScreenInfoRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Viewport {
    pub fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Viewport of `height` rows and `width` columns whose top-left corner
    /// sits at `(top, left)`.
    pub fn with_size(top: i32, left: i32, height: u32, width: u32) -> Self {
        Self {
            top,
            left,
            bottom: top.saturating_add(height as i32) - 1,
            right: left.saturating_add(width as i32) - 1,
        }
    }

    pub fn height(&self) -> u32 {
        (i64::from(self.bottom) - i64::from(self.top) + 1).max(0) as u32
    }

    pub fn width(&self) -> u32 {
        (i64::from(self.right) - i64::from(self.left) + 1).max(0) as u32
    }

    /// Same size, moved so that `top` is the first visible row.
    pub fn scrolled_to(&self, top: i32) -> Self {
        Self::with_size(top, self.left, self.height(), self.width())
    }

    /// Vertical position that brings the rows `start_row..=end_row` into
    /// view inside a buffer of `total_rows` rows. Horizontal position is
    /// kept.
    ///
    /// * `align_to_top`: the start row becomes the top row when a full
    ///   viewport fits below it; otherwise the viewport is pinned to the
    ///   bottom of the buffer.
    /// * otherwise: the end row becomes the bottom row when enough rows
    ///   exist above it; otherwise the viewport is pinned to the top.
    pub fn scroll_into_view(
        &self,
        start_row: ScreenInfoRow,
        end_row: ScreenInfoRow,
        total_rows: u32,
        align_to_top: bool,
    ) -> Self {
        let height = self.height();
        if height == 0 || height >= total_rows {
            return self.scrolled_to(0);
        }
        let top = if align_to_top {
            if start_row + height <= total_rows {
                start_row
            } else {
                total_rows - height
            }
        } else if end_row + 1 >= height {
            end_row + 1 - height
        } else {
            0
        };
        self.scrolled_to(top as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructs_viewport() {
        let vp = Viewport::with_size(0, 0, 10, 80);
        assert_eq!(vp, Viewport::new(0, 0, 9, 79));
        assert_eq!(vp.height(), 10);
        assert_eq!(vp.width(), 80);
    }

    #[test]
    fn inverted_rectangle_is_empty() {
        let vp = Viewport::new(5, 0, 4, 79);
        assert_eq!(vp.height(), 0);
    }

    #[test]
    fn align_to_top_moves_start_row_to_top() {
        let vp = Viewport::with_size(0, 0, 10, 80);
        let moved = vp.scroll_into_view(30, 32, 100, true);
        assert_eq!(moved.top, 30);
        assert_eq!(moved.bottom, 39);
    }

    #[test]
    fn align_to_top_pins_to_buffer_bottom() {
        let vp = Viewport::with_size(0, 0, 10, 80);
        let moved = vp.scroll_into_view(95, 97, 100, true);
        assert_eq!(moved.top, 90);
        assert_eq!(moved.bottom, 99);
    }

    #[test]
    fn align_to_bottom_moves_end_row_to_bottom() {
        let vp = Viewport::with_size(50, 0, 10, 80);
        let moved = vp.scroll_into_view(20, 25, 100, false);
        assert_eq!(moved.top, 16);
        assert_eq!(moved.bottom, 25);
    }

    #[test]
    fn align_to_bottom_pins_to_buffer_top() {
        let vp = Viewport::with_size(50, 0, 10, 80);
        let moved = vp.scroll_into_view(0, 3, 100, false);
        assert_eq!(moved.top, 0);
    }

    #[test]
    fn horizontal_position_is_kept() {
        let vp = Viewport::with_size(0, 12, 10, 40);
        let moved = vp.scroll_into_view(30, 30, 100, true);
        assert_eq!(moved.left, 12);
        assert_eq!(moved.right, 51);
    }
}
