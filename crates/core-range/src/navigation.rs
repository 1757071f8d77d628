//! Unit-based navigation: Move, MoveEndpointByUnit, MoveEndpointByRange and
//! ExpandToEnclosingUnit.
//!
//! Navigation works on a half-open view of the range, `[start, end_exclusive)`,
//! where positions are boundaries between characters. A degenerate range is
//! the empty span `[p, p)`; a non-degenerate inclusive range `[s, e]` is
//! `[s, e + 1)`. Converting back, an empty span becomes a degenerate range
//! and anything else stores `end_exclusive - 1` as the inclusive end.
//!
//! `start` can land anywhere in `[0, max_endpoint]`, `end_exclusive` anywhere
//! in `[0, endpoint_count]`. Boundaries are row aligned for every unit except
//! Character, which steps one column at a time and rolls over rows.

use core_buffer::ScreenBuffer;
use core_coords::{BufferGeometry, Endpoint};
use tracing::trace;

use crate::unit::Granularity;
use crate::{ApiCall, RangeEndpoint, TextRange, TextUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: u32,
    end_exclusive: u32,
}

fn limit_for(geometry: &BufferGeometry, endpoint: RangeEndpoint) -> u32 {
    match endpoint {
        RangeEndpoint::Start => geometry.max_endpoint(),
        RangeEndpoint::End => geometry.endpoint_count(),
    }
}

/// Step `count` characters from `pos`, clamped to `[0, limit]`.
fn character_boundary(pos: u32, count: i32, limit: u32) -> (u32, i32) {
    let target = (i64::from(pos) + i64::from(count)).clamp(0, i64::from(limit));
    (target as u32, (target - i64::from(pos)) as i32)
}

/// Step `count` line starts from `pos`. Moving backward from the middle of a
/// row first lands on that row's start, which counts as one unit.
fn line_boundary(geometry: &BufferGeometry, pos: u32, count: i32, limit: u32) -> (u32, i32) {
    let width = geometry.row_width();
    let row = i64::from(pos / width);
    let column = pos % width;
    let limit_row = i64::from(limit / width);
    let requested = i64::from(count);

    let (target_row, moved) = if requested > 0 {
        let steps = requested.min((limit_row - row).max(0));
        (row + steps, steps)
    } else {
        let available = if column > 0 { row + 1 } else { row };
        let steps = (-requested).min(available);
        let target = if column > 0 { row - steps + 1 } else { row - steps };
        (target, -steps)
    };
    if moved == 0 {
        return (pos, 0);
    }
    (target_row as u32 * width, moved as i32)
}

/// Jump to either end of the document; at most one unit.
fn document_boundary(pos: u32, count: i32, limit: u32) -> (u32, i32) {
    if count > 0 && pos < limit {
        (limit, 1)
    } else if count < 0 && pos > 0 {
        (0, -1)
    } else {
        (pos, 0)
    }
}

fn boundary(
    geometry: &BufferGeometry,
    granularity: Granularity,
    pos: u32,
    count: i32,
    limit: u32,
) -> (u32, i32) {
    if count == 0 {
        return (pos, 0);
    }
    match granularity {
        Granularity::Character => character_boundary(pos, count, limit),
        Granularity::Line => line_boundary(geometry, pos, count, limit),
        Granularity::Document => document_boundary(pos, count, limit),
    }
}

/// Whether moving `endpoint` from `old` to `new` passes over the other
/// endpoint at `other`, in the direction of travel.
fn crosses(endpoint: RangeEndpoint, old: u32, new: u32, other: u32) -> bool {
    match (endpoint, new > old) {
        (RangeEndpoint::Start, true) => old <= other && new > other,
        (RangeEndpoint::Start, false) => old > other && new < other,
        (RangeEndpoint::End, true) => old < other && new > other,
        (RangeEndpoint::End, false) => old >= other && new < other,
    }
}

impl<B: ScreenBuffer + ?Sized> TextRange<B> {
    fn span(&self, geometry: &BufferGeometry) -> Span {
        let (start, end) = self.clamped(geometry);
        if self.degenerate {
            Span {
                start,
                end_exclusive: start,
            }
        } else {
            Span {
                start,
                end_exclusive: end + 1,
            }
        }
    }

    fn apply_span(&mut self, geometry: &BufferGeometry, span: Span) {
        if span.start == span.end_exclusive {
            self.collapse_at(geometry, span.start);
            return;
        }
        self.start = span.start;
        // An exclusive end of 0 on a range starting later means the range
        // runs to the end of the buffer.
        self.end = span
            .end_exclusive
            .checked_sub(1)
            .unwrap_or_else(|| geometry.max_endpoint());
        self.degenerate = false;
    }

    fn collapse_at(&mut self, geometry: &BufferGeometry, pos: u32) {
        let pos = geometry.clamp_endpoint(pos);
        self.start = pos;
        self.end = pos;
        self.degenerate = true;
    }

    /// Boundary position of `endpoint` in half-open terms.
    fn boundary_value(&self, geometry: &BufferGeometry, endpoint: RangeEndpoint) -> u32 {
        let span = self.span(geometry);
        match endpoint {
            RangeEndpoint::Start => span.start,
            RangeEndpoint::End => span.end_exclusive,
        }
    }

    /// Put `endpoint` at `new`; collapse onto `new` if that passes the other
    /// endpoint.
    fn set_boundary(&mut self, geometry: &BufferGeometry, endpoint: RangeEndpoint, new: u32) {
        let mut span = self.span(geometry);
        let (old, other) = match endpoint {
            RangeEndpoint::Start => (span.start, span.end_exclusive),
            RangeEndpoint::End => (span.end_exclusive, span.start),
        };
        if crosses(endpoint, old, new, other) {
            self.collapse_at(geometry, new);
            return;
        }
        match endpoint {
            RangeEndpoint::Start => span.start = new,
            RangeEndpoint::End => span.end_exclusive = new,
        }
        self.apply_span(geometry, span);
    }

    /// Move the whole range by `count` units, collapsing it to an empty
    /// range at the destination. Returns the number of units actually
    /// moved, which is smaller in magnitude than `count` when the move was
    /// clamped at either end of the buffer. When nothing moves the range is
    /// left untouched.
    pub fn move_by(&mut self, unit: TextUnit, count: i32) -> i32 {
        let geometry = self.provider.geometry();
        let (original_start, original_end) = (self.start, self.end);
        let from = self.span(&geometry).start;
        let limit = limit_for(&geometry, RangeEndpoint::Start);
        let (target, moved) = boundary(&geometry, unit.granularity(), from, count, limit);
        if moved != 0 {
            self.collapse_at(&geometry, target);
        }
        trace!(
            target: "uia.range",
            op = %ApiCall::Move,
            id = self.id,
            unit = ?unit,
            original_start,
            original_end,
            requested = count,
            moved,
            start = self.start,
            end = self.end,
            "range_api"
        );
        moved
    }

    /// Move one endpoint by `count` units. If it passes the other endpoint the
    /// range collapses to an empty range at the new position.
    pub fn move_endpoint_by_unit(
        &mut self,
        endpoint: RangeEndpoint,
        unit: TextUnit,
        count: i32,
    ) -> i32 {
        let geometry = self.provider.geometry();
        let (original_start, original_end) = (self.start, self.end);
        let from = self.boundary_value(&geometry, endpoint);
        let limit = limit_for(&geometry, endpoint);
        let (target, moved) = boundary(&geometry, unit.granularity(), from, count, limit);
        if moved != 0 {
            self.set_boundary(&geometry, endpoint, target);
        }
        trace!(
            target: "uia.range",
            op = %ApiCall::MoveEndpointByUnit,
            id = self.id,
            endpoint = ?endpoint,
            unit = ?unit,
            original_start,
            original_end,
            requested = count,
            moved,
            start = self.start,
            end = self.end,
            "range_api"
        );
        moved
    }

    /// Move `endpoint` onto `other`'s `other_endpoint`.
    pub fn move_endpoint_by_range(
        &mut self,
        endpoint: RangeEndpoint,
        other: &TextRange<B>,
        other_endpoint: RangeEndpoint,
    ) {
        let geometry = self.provider.geometry();
        let (original_start, original_end) = (self.start, self.end);
        let target = other
            .boundary_value(&geometry, other_endpoint)
            .min(limit_for(&geometry, endpoint));
        self.set_boundary(&geometry, endpoint, target);
        trace!(
            target: "uia.range",
            op = %ApiCall::MoveEndpointByRange,
            id = self.id,
            other_id = other.id,
            endpoint = ?endpoint,
            other_endpoint = ?other_endpoint,
            original_start,
            original_end,
            start = self.start,
            end = self.end,
            "range_api"
        );
    }

    /// Grow the range to the unit enclosing its start.
    ///
    /// * Character: the single character at `start`.
    /// * Line: column 0 through the last column of `start`'s row.
    /// * Document: every valid endpoint.
    pub fn expand_to_enclosing_unit(&mut self, unit: TextUnit) {
        let geometry = self.provider.geometry();
        let (original_start, original_end) = (self.start, self.end);
        let (start, _) = self.clamped(&geometry);
        let (new_start, new_end): (Endpoint, Endpoint) = match unit.granularity() {
            Granularity::Character => (start, start),
            Granularity::Line => {
                let row_start =
                    geometry.text_buffer_row_to_endpoint(geometry.endpoint_to_text_buffer_row(start));
                (row_start, row_start + geometry.last_column_index())
            }
            Granularity::Document => (
                geometry.screen_info_row_to_endpoint(geometry.first_screen_info_row_index()),
                geometry.max_endpoint(),
            ),
        };
        self.start = new_start;
        self.end = new_end;
        self.degenerate = false;
        trace!(
            target: "uia.range",
            op = %ApiCall::ExpandToEnclosingUnit,
            id = self.id,
            unit = ?unit,
            original_start,
            original_end,
            start = self.start,
            end = self.end,
            "range_api"
        );
    }
}
