//! Read-only projections of a range: text, search and screen rectangles.

use core_buffer::ScreenBuffer;
use core_coords::{BufferGeometry, PixelPoint, PixelRect, ScreenInfoRow, TextBufferRow};
use tracing::trace;

use crate::range::RowSegment;
use crate::{ApiCall, RangeError, Result, TextRange};

/// Text of each segment's row, read from the buffer in one call so that a
/// query never mixes rows from before and after a concurrent write.
fn segment_rows<B: ScreenBuffer + ?Sized>(
    buffer: &B,
    geometry: &BufferGeometry,
    segments: &[RowSegment],
) -> Vec<String> {
    let rows: Vec<TextBufferRow> = segments
        .iter()
        .map(|segment| geometry.screen_info_row_to_text_buffer_row(segment.row))
        .collect();
    buffer
        .rows_text(&rows)
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect()
}

/// Row content as exactly `width` cells, padded with blanks.
fn row_cells(text: &str, width: usize) -> Vec<char> {
    let mut cells: Vec<char> = text.chars().take(width).collect();
    cells.resize(width, ' ');
    cells
}

fn chars_match(a: char, b: char, ignore_case: bool) -> bool {
    a == b || (ignore_case && a.to_lowercase().eq(b.to_lowercase()))
}

fn matches_at(haystack: &[char], needle: &[char], ignore_case: bool) -> bool {
    haystack
        .iter()
        .zip(needle)
        .all(|(&h, &n)| chars_match(h, n, ignore_case))
}

fn find_in_segment(
    geometry: &BufferGeometry,
    segment: &RowSegment,
    row: &str,
    needle: &[char],
    backward: bool,
    ignore_case: bool,
) -> Option<(u32, u32)> {
    let cells = row_cells(row, geometry.row_width() as usize);
    let window = &cells[segment.first_col as usize..=segment.last_col as usize];
    if window.len() < needle.len() {
        return None;
    }
    let mut candidates = window.windows(needle.len());
    let offset = if backward {
        candidates.rposition(|w| matches_at(w, needle, ignore_case))
    } else {
        candidates.position(|w| matches_at(w, needle, ignore_case))
    }?;
    let column = segment.first_col + offset as u32;
    let start = geometry.coord_to_endpoint(segment.row, column);
    Some((start, start + needle.len() as u32 - 1))
}

impl<B: ScreenBuffer + ?Sized> TextRange<B> {
    /// Text from `start` through `end` in reading order, rows joined by the
    /// provider's line separator. `max_length` of -1 means unlimited; any
    /// other negative value is rejected. Trailing blanks are not produced
    /// for cells the buffer never wrote. Rows are read in a single
    /// `rows_text` call.
    pub fn get_text(&self, max_length: i32) -> Result<String> {
        if max_length < -1 {
            return Err(RangeError::InvalidMaxLength(max_length));
        }
        let geometry = self.provider.geometry();
        let buffer = self.provider.buffer();
        let separator = &self.provider.options().line_separator;

        let segments = self.segments(&geometry);
        let rows = segment_rows(buffer.as_ref(), &geometry, &segments);

        let mut text = String::new();
        for (i, (segment, row)) in segments.iter().zip(&rows).enumerate() {
            if i > 0 {
                text.push_str(separator);
            }
            let len = (segment.last_col - segment.first_col + 1) as usize;
            text.extend(row.chars().skip(segment.first_col as usize).take(len));
        }
        if max_length >= 0 {
            text = text.chars().take(max_length as usize).collect();
        }

        trace!(
            target: "uia.range",
            op = %ApiCall::GetText,
            id = self.id,
            start = self.start,
            end = self.end,
            max_length,
            len = text.chars().count(),
            "range_api"
        );
        Ok(text)
    }

    /// First occurrence of `text` inside the range in the scan direction, as
    /// a new non-degenerate range. Matches never span rows. Scanning
    /// backward returns the occurrence that starts last. The scanned rows are
    /// read in a single `rows_text` call before matching starts.
    pub fn find_text(
        &self,
        text: &str,
        backward: bool,
        ignore_case: bool,
    ) -> Result<Option<TextRange<B>>> {
        let needle: Vec<char> = text.chars().collect();
        if needle.is_empty() {
            return Err(RangeError::EmptySearchText);
        }
        let geometry = self.provider.geometry();
        let mut segments = self.segments(&geometry);
        if backward {
            segments.reverse();
        }
        let max_rows = match self.provider.options().max_search_rows {
            0 => usize::MAX,
            n => n as usize,
        };

        segments.truncate(max_rows);
        let rows = segment_rows(self.provider.buffer().as_ref(), &geometry, &segments);

        let found = segments.iter().zip(&rows).find_map(|(segment, row)| {
            find_in_segment(&geometry, segment, row, &needle, backward, ignore_case)
        });
        let result = found.map(|(start, end)| TextRange::spanning(self.provider.clone(), start, end));

        trace!(
            target: "uia.range",
            op = %ApiCall::FindText,
            id = self.id,
            backward,
            ignore_case,
            found = ?result.as_ref().map(|r| r.id),
            "range_api"
        );
        Ok(result)
    }

    /// Screen rectangles for the visible part of the range, one per visible
    /// row, offset into screen space by the client origin. A degenerate range
    /// on a visible row yields a zero-width caret rectangle.
    pub fn bounding_rectangles(&self) -> Vec<PixelRect> {
        let geometry = self.provider.geometry();
        let buffer = self.provider.buffer();
        let metrics = buffer.cell_metrics();
        let origin = buffer.client_origin();
        let viewport = geometry.viewport();
        let left_of = |column: u32| (f64::from(column) - f64::from(viewport.left)) * metrics.width;
        let top_of = |row: ScreenInfoRow| f64::from(geometry.screen_info_row_to_viewport_row(row)) * metrics.height;

        let rects: Vec<PixelRect> = if self.degenerate {
            let (start, _) = self.clamped(&geometry);
            let row = geometry.endpoint_to_screen_info_row(start);
            if geometry.is_screen_info_row_in_viewport(row) {
                let column = geometry.endpoint_to_column(start);
                vec![PixelRect::new(left_of(column), top_of(row), 0.0, metrics.height)]
            } else {
                Vec::new()
            }
        } else {
            self.segments(&geometry)
                .iter()
                .filter(|segment| geometry.is_screen_info_row_in_viewport(segment.row))
                .map(|segment| {
                    PixelRect::new(
                        left_of(segment.first_col),
                        top_of(segment.row),
                        f64::from(segment.last_col + 1 - segment.first_col) * metrics.width,
                        metrics.height,
                    )
                })
                .collect()
        };
        let rects: Vec<PixelRect> = rects
            .into_iter()
            .map(|r| {
                let corner = PixelPoint::new(r.left, r.top).offset_by(origin);
                PixelRect::new(corner.x, corner.y, r.width, r.height)
            })
            .collect();

        trace!(
            target: "uia.range",
            op = %ApiCall::GetBoundingRectangles,
            id = self.id,
            start = self.start,
            end = self.end,
            count = rects.len(),
            "range_api"
        );
        rects
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use core_buffer::{CircularBuffer, SelectionRect};
    use core_coords::{CellMetrics, ScreenCoord, Viewport};
    use pretty_assertions::assert_eq;

    use crate::{RangeOptions, TextProvider};

    use super::*;

    fn provider_with(rows: &[&str]) -> TextProvider<CircularBuffer> {
        let buffer = CircularBuffer::new(10, 80, 10);
        for (i, text) in rows.iter().enumerate() {
            buffer.set_row(i as u32, text);
        }
        TextProvider::new(Arc::new(buffer))
    }

    #[test]
    fn text_joins_rows_with_separator() {
        let p = provider_with(&["hello", "world"]);
        let r = p.range_from_endpoints(1, 82, false).unwrap();
        assert_eq!(r.get_text(-1).unwrap(), "ello\r\nwor");
    }

    #[test]
    fn text_is_truncated_to_max_length() {
        let p = provider_with(&["hello", "world"]);
        let r = p.range_from_endpoints(0, 84, false).unwrap();
        assert_eq!(r.get_text(3).unwrap(), "hel");
        assert_eq!(r.get_text(0).unwrap(), "");
    }

    #[test]
    fn invalid_max_length_is_rejected() {
        let p = provider_with(&["hello"]);
        let r = p.range_from_endpoints(0, 4, false).unwrap();
        assert_eq!(r.get_text(-2), Err(RangeError::InvalidMaxLength(-2)));
    }

    #[test]
    fn degenerate_text_is_empty() {
        let p = provider_with(&["hello"]);
        assert_eq!(p.range_degenerate().get_text(-1).unwrap(), "");
    }

    #[test]
    fn custom_separator_is_used() {
        let buffer = Arc::new(CircularBuffer::new(4, 10, 4));
        buffer.set_row(0, "ab");
        buffer.set_row(1, "cd");
        let options = RangeOptions {
            line_separator: "\n".to_string(),
            ..RangeOptions::default()
        };
        let p = TextProvider::with_options(buffer, options);
        assert_eq!(p.range_from_endpoints(0, 11, false).unwrap().get_text(-1).unwrap(), "ab\ncd");
    }

    #[test]
    fn find_ignores_case_when_asked() {
        let p = provider_with(&["", "", "", "xxABCyy"]);
        let doc = p.document_range();
        let hit = doc.find_text("abc", false, true).unwrap().unwrap();
        assert_eq!((hit.start(), hit.end(), hit.is_degenerate()), (242, 244, false));
        assert!(doc.find_text("abc", false, false).unwrap().is_none());
    }

    #[test]
    fn backward_find_returns_last_occurrence() {
        let p = provider_with(&["ab ab", "", "ab"]);
        let doc = p.document_range();
        let forward = doc.find_text("ab", false, false).unwrap().unwrap();
        let backward = doc.find_text("ab", true, false).unwrap().unwrap();
        assert_eq!(forward.start(), 0);
        assert_eq!(backward.start(), 160);

        let first_row = p.range_from_endpoints(0, 79, false).unwrap();
        let last_in_row = first_row.find_text("ab", true, false).unwrap().unwrap();
        assert_eq!(last_in_row.start(), 3);
    }

    #[test]
    fn find_stays_inside_range_columns() {
        let p = provider_with(&["abcabc"]);
        let r = p.range_from_endpoints(1, 4, false).unwrap();
        assert!(r.find_text("abc", false, false).unwrap().is_none());
        let hit = r.find_text("bca", false, false).unwrap().unwrap();
        assert_eq!((hit.start(), hit.end()), (1, 3));
    }

    #[test]
    fn empty_search_text_is_rejected() {
        let p = provider_with(&["abc"]);
        let err = p.document_range().find_text("", false, false).unwrap_err();
        assert_eq!(err, RangeError::EmptySearchText);
    }

    #[test]
    fn search_row_limit_is_respected() {
        let buffer = Arc::new(CircularBuffer::new(10, 80, 10));
        buffer.set_row(5, "needle");
        let options = RangeOptions {
            max_search_rows: 3,
            ..RangeOptions::default()
        };
        let p = TextProvider::with_options(buffer, options);
        assert!(p.document_range().find_text("needle", false, false).unwrap().is_none());
    }

    #[test]
    fn rectangles_follow_visible_rows() {
        let buffer = Arc::new(CircularBuffer::new(10, 80, 10));
        buffer.set_cell_metrics(CellMetrics::new(10.0, 20.0));
        buffer.set_client_origin(PixelPoint::new(100.0, 50.0));
        let p = TextProvider::new(buffer);
        let r = p.range_from_endpoints(645, 722, false).unwrap();
        assert_eq!(
            r.bounding_rectangles(),
            vec![
                PixelRect::new(150.0, 210.0, 750.0, 20.0),
                PixelRect::new(100.0, 230.0, 30.0, 20.0),
            ]
        );
    }

    #[test]
    fn rectangles_disappear_when_rows_scroll_out() {
        let buffer = Arc::new(CircularBuffer::new(10, 80, 10));
        buffer.set_cell_metrics(CellMetrics::new(10.0, 20.0));
        buffer.set_client_origin(PixelPoint::new(100.0, 50.0));
        let p = TextProvider::new(Arc::clone(&buffer));
        let r = p.range_from_endpoints(640, 799, false).unwrap();
        assert_eq!(
            r.bounding_rectangles(),
            vec![
                PixelRect::new(100.0, 210.0, 800.0, 20.0),
                PixelRect::new(100.0, 230.0, 800.0, 20.0),
            ]
        );

        buffer.scroll_to(Viewport::with_size(0, 0, 8, 80)).unwrap();
        assert_eq!(buffer.viewport(), Viewport::new(0, 0, 7, 79));
        assert!(r.bounding_rectangles().is_empty());
    }

    /// Delegates to a `CircularBuffer` and counts how rows are read.
    struct CountingReads {
        inner: CircularBuffer,
        single: AtomicUsize,
        batched: AtomicUsize,
    }

    impl ScreenBuffer for CountingReads {
        fn total_rows(&self) -> u32 {
            self.inner.total_rows()
        }
        fn row_width(&self) -> u32 {
            self.inner.row_width()
        }
        fn viewport(&self) -> Viewport {
            self.inner.viewport()
        }
        fn cell_metrics(&self) -> CellMetrics {
            self.inner.cell_metrics()
        }
        fn client_origin(&self) -> PixelPoint {
            self.inner.client_origin()
        }
        fn cursor(&self) -> ScreenCoord {
            self.inner.cursor()
        }
        fn selection_rects(&self) -> Vec<SelectionRect> {
            self.inner.selection_rects()
        }
        fn row_text(&self, row: TextBufferRow) -> Option<String> {
            self.single.fetch_add(1, Ordering::SeqCst);
            self.inner.row_text(row)
        }
        fn rows_text(&self, rows: &[TextBufferRow]) -> Vec<Option<String>> {
            self.batched.fetch_add(1, Ordering::SeqCst);
            self.inner.rows_text(rows)
        }
    }

    #[test]
    fn queries_read_rows_in_one_snapshot() {
        let inner = CircularBuffer::new(10, 80, 10);
        inner.set_row(0, "first row");
        inner.set_row(1, "second row");
        inner.set_row(9, "last row");
        let buffer = Arc::new(CountingReads {
            inner,
            single: AtomicUsize::new(0),
            batched: AtomicUsize::new(0),
        });
        let p = TextProvider::new(Arc::clone(&buffer));

        // wraps from the last row back to row 1
        let r = p.range_from_endpoints(720, 85, false).unwrap();
        assert_eq!(r.get_text(-1).unwrap(), "last row\r\nfirst row\r\nsecond");
        assert_eq!(buffer.batched.load(Ordering::SeqCst), 1);

        let hit = r.find_text("second", false, false).unwrap().unwrap();
        assert_eq!((hit.start(), hit.end()), (80, 85));
        assert_eq!(buffer.batched.load(Ordering::SeqCst), 2);
        assert_eq!(buffer.single.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn degenerate_range_yields_caret_rect() {
        let buffer = Arc::new(CircularBuffer::new(10, 80, 10));
        buffer.set_cell_metrics(CellMetrics::new(10.0, 20.0));
        let p = TextProvider::new(buffer);
        let r = p.range_from_endpoints(83, 83, true).unwrap();
        assert_eq!(r.bounding_rectangles(), vec![PixelRect::new(30.0, 20.0, 0.0, 20.0)]);
    }
}
