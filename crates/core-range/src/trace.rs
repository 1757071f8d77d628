//! Names for traced range operations.
//!
//! Each public operation emits a single `tracing` event with target
//! `uia.range` once it has finished; `op` carries one of these names.
//! Events never feed back into the operation itself.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCall {
    Constructor,
    Clone,
    Compare,
    CompareEndpoints,
    ExpandToEnclosingUnit,
    FindAttribute,
    FindText,
    GetAttributeValue,
    GetBoundingRectangles,
    GetEnclosingElement,
    GetText,
    Move,
    MoveEndpointByUnit,
    MoveEndpointByRange,
    Select,
    AddToSelection,
    RemoveFromSelection,
    ScrollIntoView,
    GetChildren,
}

impl ApiCall {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiCall::Constructor => "constructor",
            ApiCall::Clone => "clone",
            ApiCall::Compare => "compare",
            ApiCall::CompareEndpoints => "compare_endpoints",
            ApiCall::ExpandToEnclosingUnit => "expand_to_enclosing_unit",
            ApiCall::FindAttribute => "find_attribute",
            ApiCall::FindText => "find_text",
            ApiCall::GetAttributeValue => "get_attribute_value",
            ApiCall::GetBoundingRectangles => "get_bounding_rectangles",
            ApiCall::GetEnclosingElement => "get_enclosing_element",
            ApiCall::GetText => "get_text",
            ApiCall::Move => "move",
            ApiCall::MoveEndpointByUnit => "move_endpoint_by_unit",
            ApiCall::MoveEndpointByRange => "move_endpoint_by_range",
            ApiCall::Select => "select",
            ApiCall::AddToSelection => "add_to_selection",
            ApiCall::RemoveFromSelection => "remove_from_selection",
            ApiCall::ScrollIntoView => "scroll_into_view",
            ApiCall::GetChildren => "get_children",
        }
    }
}

impl fmt::Display for ApiCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
