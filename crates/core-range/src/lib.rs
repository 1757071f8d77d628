//! Text ranges over a circular console screen buffer.
//!
//! A [`TextRange`] is a pair of inclusive endpoints into the buffer (a
//! linear index `row * row_width + column`) plus a degeneracy flag. Ranges
//! are created by a [`TextProvider`], which holds the shared
//! [`ScreenBuffer`](core_buffer::ScreenBuffer) collaborator, and support the
//! accessibility text-range operation set:
//!
//! * navigation: `move_by`, `move_endpoint_by_unit`,
//!   `move_endpoint_by_range`, `expand_to_enclosing_unit`
//! * queries: `get_text`, `find_text`, `bounding_rectangles`, attributes
//! * interaction: selection changes and `scroll_into_view`
//!
//! Every operation snapshots the buffer geometry once when it starts and
//! re-clamps stored endpoints against that snapshot, so a buffer that shrank
//! between calls never causes a panic.

mod attribute;
mod error;
mod interaction;
mod navigation;
mod provider;
mod query;
mod range;
mod trace;
mod unit;

pub use attribute::{AttributeValue, TextAttributeId};
pub use error::{RangeError, Result};
pub use provider::{RangeOptions, TextProvider};
pub use range::{RangeId, TextRange};
pub use trace::ApiCall;
pub use unit::{RangeEndpoint, TextUnit};
