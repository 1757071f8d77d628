//! Selection shapes exchanged with the buffer.
//!
//! The buffer reports its selection as rectangles (block selection yields
//! one rectangle spanning many rows; a stream selection yields one rectangle
//! per row). Requests coming from the range core are stream spans, which
//! are turned into per-row rectangles here.

use core_coords::{Column, ScreenInfoRow};

/// Inclusive rectangle in row/column units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRect {
    pub top: ScreenInfoRow,
    pub left: Column,
    pub bottom: ScreenInfoRow,
    pub right: Column,
}

impl SelectionRect {
    pub fn new(top: ScreenInfoRow, left: Column, bottom: ScreenInfoRow, right: Column) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn single_row(row: ScreenInfoRow, left: Column, right: Column) -> Self {
        Self::new(row, left, row, right)
    }

    /// Rows covered, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = ScreenInfoRow> {
        self.top..=self.bottom
    }
}

/// Stream selection between two inclusive `(row, column)` positions in
/// reading order. `start` after `end` means the span wraps through the end
/// of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSpan {
    pub start: (ScreenInfoRow, Column),
    pub end: (ScreenInfoRow, Column),
}

impl SelectionSpan {
    pub fn new(start: (ScreenInfoRow, Column), end: (ScreenInfoRow, Column)) -> Self {
        Self { start, end }
    }

    /// One rectangle per row covered, walking forward from `start` and
    /// wrapping through row 0 when needed.
    pub fn to_rects(&self, total_rows: u32, row_width: u32) -> Vec<SelectionRect> {
        let total_rows = total_rows.max(1);
        let last_col = row_width.max(1) - 1;
        let (start_row, start_col) = self.start;
        let (end_row, end_col) = self.end;
        let wraps = (start_row, start_col) > (end_row, end_col);
        let row_count = if !wraps {
            end_row - start_row + 1
        } else {
            total_rows - start_row + end_row + 1
        };

        let mut rects = Vec::with_capacity(row_count as usize);
        for i in 0..row_count {
            let row = (start_row + i) % total_rows;
            let left = if i == 0 { start_col } else { 0 };
            let right = if i == row_count - 1 { end_col } else { last_col };
            rects.push(SelectionRect::single_row(row, left, right));
        }
        rects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_row_span() {
        let span = SelectionSpan::new((3, 2), (3, 4));
        assert_eq!(span.to_rects(10, 80), vec![SelectionRect::single_row(3, 2, 4)]);
    }

    #[test]
    fn multi_row_span_fills_middle_rows() {
        let span = SelectionSpan::new((1, 10), (3, 5));
        assert_eq!(
            span.to_rects(10, 80),
            vec![
                SelectionRect::single_row(1, 10, 79),
                SelectionRect::single_row(2, 0, 79),
                SelectionRect::single_row(3, 0, 5),
            ]
        );
    }

    #[test]
    fn wrapping_span_walks_through_row_zero() {
        let span = SelectionSpan::new((9, 70), (0, 3));
        assert_eq!(
            span.to_rects(10, 80),
            vec![
                SelectionRect::single_row(9, 70, 79),
                SelectionRect::single_row(0, 0, 3),
            ]
        );
    }

    #[test]
    fn block_rect_rows() {
        let rect = SelectionRect::new(2, 5, 4, 9);
        assert_eq!(rect.rows().collect::<Vec<_>>(), vec![2, 3, 4]);
    }
}
