//! Operations with side effects on the collaborator: selection and scrolling.
//! Also the structural queries (enclosing element, children).

use std::sync::Arc;

use core_buffer::{ScreenBuffer, SelectionSpan};
use core_coords::BufferGeometry;
use tracing::trace;

use crate::{ApiCall, Result, TextRange};

impl<B: ScreenBuffer + ?Sized> TextRange<B> {
    fn selection_span(&self, geometry: &BufferGeometry) -> SelectionSpan {
        let (start, end) = self.clamped(geometry);
        SelectionSpan::new(
            (
                geometry.endpoint_to_screen_info_row(start),
                geometry.endpoint_to_column(start),
            ),
            (
                geometry.endpoint_to_screen_info_row(end),
                geometry.endpoint_to_column(end),
            ),
        )
    }

    /// Make this range the selection. Selecting a degenerate range clears it.
    pub fn select(&self) -> Result<()> {
        let geometry = self.provider.geometry();
        let span = (!self.degenerate).then(|| self.selection_span(&geometry));
        self.provider.buffer().set_selection(span)?;
        trace!(target: "uia.range", op = %ApiCall::Select, id = self.id, start = self.start, end = self.end, cleared = span.is_none(), "range_api");
        Ok(())
    }

    /// Extend the selection with this range. No-op for a degenerate range.
    pub fn add_to_selection(&self) -> Result<()> {
        if !self.degenerate {
            let geometry = self.provider.geometry();
            self.provider
                .buffer()
                .add_selection(self.selection_span(&geometry))?;
        }
        trace!(target: "uia.range", op = %ApiCall::AddToSelection, id = self.id, start = self.start, end = self.end, "range_api");
        Ok(())
    }

    /// Remove this range from the selection. No-op for a degenerate range.
    pub fn remove_from_selection(&self) -> Result<()> {
        if !self.degenerate {
            let geometry = self.provider.geometry();
            self.provider
                .buffer()
                .remove_selection(self.selection_span(&geometry))?;
        }
        trace!(target: "uia.range", op = %ApiCall::RemoveFromSelection, id = self.id, start = self.start, end = self.end, "range_api");
        Ok(())
    }

    /// Scroll the viewport vertically so the range is visible.
    pub fn scroll_into_view(&self, align_to_top: bool) -> Result<()> {
        let geometry = self.provider.geometry();
        let (start, end) = self.clamped(&geometry);
        let viewport = geometry.viewport();
        let target = viewport.scroll_into_view(
            geometry.endpoint_to_screen_info_row(start),
            geometry.endpoint_to_screen_info_row(end),
            geometry.total_rows(),
            align_to_top,
        );
        if target != viewport {
            self.provider.buffer().scroll_to(target)?;
        }
        trace!(
            target: "uia.range",
            op = %ApiCall::ScrollIntoView,
            id = self.id,
            align_to_top,
            old_top = viewport.top,
            new_top = target.top,
            "range_api"
        );
        Ok(())
    }

    /// The element that owns this range's text: the buffer itself.
    pub fn enclosing_element(&self) -> Arc<B> {
        trace!(target: "uia.range", op = %ApiCall::GetEnclosingElement, id = self.id, "range_api");
        Arc::clone(self.provider.buffer())
    }

    /// Embedded child elements. Console text has none.
    pub fn children(&self) -> Vec<Arc<B>> {
        trace!(target: "uia.range", op = %ApiCall::GetChildren, id = self.id, "range_api");
        Vec::new()
    }
}
