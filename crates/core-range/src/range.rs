//! The range entity: two endpoints and a degeneracy flag.
//!
//! Endpoints are inclusive, `[start, end]`. `start` may be numerically larger
//! than `end`, which means the range wraps around the end of the circular
//! buffer:
//!
//! ```text
//! start <= end
//! 0 ............... N   (text buffer row indices)
//!      s-----e          (start to end)
//!
//! start > end
//! 0 ............... N
//!   ---e     s-----     (start to end)
//! ```
//!
//! A degenerate range holds no text but still has a position; both
//! endpoints then carry that position.

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use core_buffer::ScreenBuffer;
use core_coords::{BufferGeometry, Column, Endpoint, ScreenInfoRow, compare_screen_coords};
use tracing::trace;

use crate::{ApiCall, RangeEndpoint, RangeError, Result, TextProvider};

pub type RangeId = u64;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn next_id() -> RangeId {
    NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed)
}

/// One row's worth of a range in reading order: `first_col..=last_col` of
/// `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RowSegment {
    pub row: ScreenInfoRow,
    pub first_col: Column,
    pub last_col: Column,
}

pub struct TextRange<B: ?Sized> {
    pub(crate) provider: TextProvider<B>,
    pub(crate) id: RangeId,
    pub(crate) start: Endpoint,
    pub(crate) end: Endpoint,
    pub(crate) degenerate: bool,
}

impl<B: ScreenBuffer + ?Sized> TextRange<B> {
    pub(crate) fn with_endpoints(
        provider: TextProvider<B>,
        start: Endpoint,
        end: Endpoint,
        degenerate: bool,
    ) -> Result<Self> {
        if degenerate && start != end {
            return Err(RangeError::DegenerateMismatch { start, end });
        }
        let geometry = provider.geometry();
        let range = Self {
            provider,
            id: next_id(),
            start: geometry.clamp_endpoint(start),
            end: geometry.clamp_endpoint(end),
            degenerate,
        };
        range.trace_constructed();
        Ok(range)
    }

    pub(crate) fn degenerate_at(provider: TextProvider<B>, endpoint: Endpoint) -> Self {
        let endpoint = provider.geometry().clamp_endpoint(endpoint);
        let range = Self {
            provider,
            id: next_id(),
            start: endpoint,
            end: endpoint,
            degenerate: true,
        };
        range.trace_constructed();
        range
    }

    /// Non-degenerate range over endpoints already known to be valid.
    pub(crate) fn spanning(provider: TextProvider<B>, start: Endpoint, end: Endpoint) -> Self {
        let range = Self {
            provider,
            id: next_id(),
            start,
            end,
            degenerate: false,
        };
        range.trace_constructed();
        range
    }

    fn trace_constructed(&self) {
        trace!(
            target: "uia.range",
            op = %ApiCall::Constructor,
            id = self.id,
            start = self.start,
            end = self.end,
            degenerate = self.degenerate,
            "range_api"
        );
    }

    /// Diagnostic identifier; never used for equality or ordering.
    pub fn id(&self) -> RangeId {
        self.id
    }

    pub fn start(&self) -> Endpoint {
        self.start
    }

    pub fn end(&self) -> Endpoint {
        self.end
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn provider(&self) -> &TextProvider<B> {
        &self.provider
    }

    /// Stored endpoints re-clamped against `geometry`, in case the buffer
    /// shrank since they were stored.
    pub(crate) fn clamped(&self, geometry: &BufferGeometry) -> (Endpoint, Endpoint) {
        (
            geometry.clamp_endpoint(self.start),
            geometry.clamp_endpoint(self.end),
        )
    }

    pub(crate) fn endpoint_value(&self, geometry: &BufferGeometry, which: RangeEndpoint) -> Endpoint {
        let (start, end) = self.clamped(geometry);
        match which {
            RangeEndpoint::Start => start,
            RangeEndpoint::End => end,
        }
    }

    /// True iff both endpoints and the degeneracy flag match.
    pub fn compare(&self, other: &TextRange<B>) -> bool {
        let equal = self.start == other.start
            && self.end == other.end
            && self.degenerate == other.degenerate;
        trace!(target: "uia.range", op = %ApiCall::Compare, id = self.id, other_id = other.id, equal, "range_api");
        equal
    }

    /// Reading-order comparison of one of our endpoints against one of
    /// `other`'s.
    pub fn compare_endpoints(
        &self,
        endpoint: RangeEndpoint,
        other: &TextRange<B>,
        other_endpoint: RangeEndpoint,
    ) -> Ordering {
        let geometry = self.provider.geometry();
        let ours = self.endpoint_value(&geometry, endpoint);
        let theirs = other.endpoint_value(&geometry, other_endpoint);
        let result = compare_screen_coords(
            geometry.endpoint_to_screen_info_row(ours),
            geometry.endpoint_to_column(ours),
            geometry.endpoint_to_screen_info_row(theirs),
            geometry.endpoint_to_column(theirs),
        );
        trace!(
            target: "uia.range",
            op = %ApiCall::CompareEndpoints,
            id = self.id,
            other_id = other.id,
            endpoint = ?endpoint,
            other_endpoint = ?other_endpoint,
            result = result as i32,
            "range_api"
        );
        result
    }

    /// Whether `endpoint` lies inside the range, following the wrap. A
    /// degenerate range contains nothing.
    pub fn contains_endpoint(&self, endpoint: Endpoint) -> bool {
        if self.degenerate {
            return false;
        }
        let geometry = self.provider.geometry();
        let (start, end) = self.clamped(&geometry);
        let endpoint = geometry.clamp_endpoint(endpoint);
        if start <= end {
            start <= endpoint && endpoint <= end
        } else {
            endpoint >= start || endpoint <= end
        }
    }

    /// Rows visited reading the range from `start` to `end`.
    ///
    /// A degenerate range spans 0 rows. A wrapping range counts the rows
    /// from its start row to the last row plus the rows from row 0 to its
    /// end row; when it wraps all the way back onto its own start row that
    /// row is visited twice and counted twice.
    pub fn row_count_in_range(&self) -> u32 {
        let geometry = self.provider.geometry();
        self.row_count_with(&geometry)
    }

    pub(crate) fn row_count_with(&self, geometry: &BufferGeometry) -> u32 {
        if self.degenerate {
            return 0;
        }
        let (start, end) = self.clamped(geometry);
        let start_row = geometry.endpoint_to_screen_info_row(start);
        let end_row = geometry.endpoint_to_screen_info_row(end);
        if start > end && start_row == end_row {
            geometry.total_rows() + 1
        } else {
            geometry.rows_spanned(start_row, end_row)
        }
    }

    /// Row segments covered by the range in reading order, following the
    /// wrap through row 0. Empty for a degenerate range.
    pub(crate) fn segments(&self, geometry: &BufferGeometry) -> Vec<RowSegment> {
        let count = self.row_count_with(geometry);
        if count == 0 {
            return Vec::new();
        }
        let (start, end) = self.clamped(geometry);
        let start_row = geometry.endpoint_to_screen_info_row(start);
        let total = geometry.total_rows();
        (0..count)
            .map(|i| RowSegment {
                row: (start_row + i) % total,
                first_col: if i == 0 {
                    geometry.endpoint_to_column(start)
                } else {
                    geometry.first_column_index()
                },
                last_col: if i == count - 1 {
                    geometry.endpoint_to_column(end)
                } else {
                    geometry.last_column_index()
                },
            })
            .collect()
    }
}

impl<B: ScreenBuffer + ?Sized> Clone for TextRange<B> {
    /// Independent copy with a fresh id.
    fn clone(&self) -> Self {
        let copy = Self {
            provider: self.provider.clone(),
            id: next_id(),
            start: self.start,
            end: self.end,
            degenerate: self.degenerate,
        };
        trace!(target: "uia.range", op = %ApiCall::Clone, id = self.id, clone_id = copy.id, "range_api");
        copy
    }
}

impl<B: ?Sized> fmt::Debug for TextRange<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextRange")
            .field("id", &self.id)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("degenerate", &self.degenerate)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_buffer::CircularBuffer;
    use std::sync::Arc;

    fn provider() -> TextProvider<CircularBuffer> {
        TextProvider::new(Arc::new(CircularBuffer::new(10, 80, 10)))
    }

    #[test]
    fn degenerate_with_unequal_endpoints_is_rejected() {
        let err = provider().range_from_endpoints(3, 4, true).unwrap_err();
        assert_eq!(err, RangeError::DegenerateMismatch { start: 3, end: 4 });
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn explicit_endpoints_are_clamped() {
        let r = provider().range_from_endpoints(5, 10_000, false).unwrap();
        assert_eq!(r.start(), 5);
        assert_eq!(r.end(), 799);
    }

    #[test]
    fn degenerate_row_count_is_zero() {
        let r = provider().range_degenerate();
        assert!(r.is_degenerate());
        assert_eq!(r.start(), r.end());
        assert_eq!(r.row_count_in_range(), 0);
    }

    #[test]
    fn row_count_plain_and_wrapping() {
        let p = provider();
        assert_eq!(p.range_from_endpoints(0, 79, false).unwrap().row_count_in_range(), 1);
        assert_eq!(p.range_from_endpoints(85, 300, false).unwrap().row_count_in_range(), 3);
        // rows 8, 9, 0, 1
        assert_eq!(p.range_from_endpoints(650, 100, false).unwrap().row_count_in_range(), 4);
        // wraps all the way around onto row 2 again
        assert_eq!(p.range_from_endpoints(170, 165, false).unwrap().row_count_in_range(), 11);
    }

    #[test]
    fn wrapping_segments_follow_reading_order() {
        let p = provider();
        let r = p.range_from_endpoints(725, 83, false).unwrap();
        let geo = p.geometry();
        let segs = r.segments(&geo);
        assert_eq!(
            segs,
            vec![
                RowSegment { row: 9, first_col: 5, last_col: 79 },
                RowSegment { row: 0, first_col: 0, last_col: 79 },
                RowSegment { row: 1, first_col: 0, last_col: 3 },
            ]
        );
    }

    #[test]
    fn containment_follows_wrap() {
        let p = provider();
        let plain = p.range_from_endpoints(10, 20, false).unwrap();
        assert!(plain.contains_endpoint(10));
        assert!(plain.contains_endpoint(20));
        assert!(!plain.contains_endpoint(21));
        let wrapped = p.range_from_endpoints(790, 5, false).unwrap();
        assert!(wrapped.contains_endpoint(799));
        assert!(wrapped.contains_endpoint(0));
        assert!(!wrapped.contains_endpoint(400));
        assert!(!p.range_degenerate().contains_endpoint(0));
    }

    #[test]
    fn clone_gets_fresh_id() {
        let r = provider().range_from_endpoints(1, 2, false).unwrap();
        let c = r.clone();
        assert_ne!(r.id(), c.id());
        assert!(r.compare(&c));
    }

    #[test]
    fn compare_checks_degeneracy() {
        let p = provider();
        let a = p.range_from_endpoints(4, 4, true).unwrap();
        let b = p.range_from_endpoints(4, 4, false).unwrap();
        assert!(!a.compare(&b));
    }

    #[test]
    fn compare_endpoints_is_reading_order() {
        let p = provider();
        let a = p.range_from_endpoints(10, 90, false).unwrap();
        let b = p.range_from_endpoints(85, 200, false).unwrap();
        assert_eq!(
            a.compare_endpoints(RangeEndpoint::Start, &b, RangeEndpoint::Start),
            Ordering::Less
        );
        assert_eq!(
            a.compare_endpoints(RangeEndpoint::End, &b, RangeEndpoint::Start),
            Ordering::Greater
        );
        assert_eq!(
            b.compare_endpoints(RangeEndpoint::Start, &b, RangeEndpoint::Start),
            Ordering::Equal
        );
    }
}
