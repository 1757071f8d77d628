//! Text attributes. Console text is uniformly formatted, so every attribute
//! has a single value across any non-empty range.

use core_buffer::ScreenBuffer;
use tracing::trace;

use crate::{ApiCall, TextRange};

/// Supported attributes, numbered with the host framework's raw ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextAttributeId {
    FontName = 40005,
    FontSize = 40006,
    FontWeight = 40007,
    IsHidden = 40013,
    IsItalic = 40014,
    IsReadOnly = 40015,
}

impl TextAttributeId {
    /// `None` for ids outside the supported set.
    pub fn from_raw(raw: i32) -> Option<Self> {
        Some(match raw {
            40005 => TextAttributeId::FontName,
            40006 => TextAttributeId::FontSize,
            40007 => TextAttributeId::FontWeight,
            40013 => TextAttributeId::IsHidden,
            40014 => TextAttributeId::IsItalic,
            40015 => TextAttributeId::IsReadOnly,
            _ => return None,
        })
    }
}

const NORMAL_FONT_WEIGHT: i32 = 400;

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Int(i32),
    Float(f64),
    Text(String),
    /// Sentinel for attributes the range does not report.
    NotSupported,
}

impl<B: ScreenBuffer + ?Sized> TextRange<B> {
    pub fn get_attribute_value(&self, attribute: TextAttributeId) -> AttributeValue {
        let value = self.attribute_value(attribute);
        trace!(
            target: "uia.range",
            op = %ApiCall::GetAttributeValue,
            id = self.id,
            attribute = ?attribute,
            value = ?value,
            "range_api"
        );
        value
    }

    /// Lookup by raw id; unknown ids read as [`AttributeValue::NotSupported`].
    pub fn get_attribute_value_raw(&self, raw: i32) -> AttributeValue {
        match TextAttributeId::from_raw(raw) {
            Some(attribute) => self.get_attribute_value(attribute),
            None => {
                trace!(target: "uia.range", op = %ApiCall::GetAttributeValue, id = self.id, raw, "range_api");
                AttributeValue::NotSupported
            }
        }
    }

    /// Sub-range with `attribute == value`. Formatting is uniform, so this is
    /// either a copy of the whole range or nothing; direction does not
    /// matter.
    pub fn find_attribute(
        &self,
        attribute: TextAttributeId,
        value: &AttributeValue,
        backward: bool,
    ) -> Option<TextRange<B>> {
        let hit = !self.degenerate
            && *value != AttributeValue::NotSupported
            && self.attribute_value(attribute) == *value;
        let found = hit.then(|| self.clone());
        trace!(
            target: "uia.range",
            op = %ApiCall::FindAttribute,
            id = self.id,
            attribute = ?attribute,
            backward,
            found = ?found.as_ref().map(|r| r.id),
            "range_api"
        );
        found
    }

    fn attribute_value(&self, attribute: TextAttributeId) -> AttributeValue {
        match attribute {
            TextAttributeId::FontName => AttributeValue::Text(self.provider.buffer().font().name),
            TextAttributeId::FontSize => {
                AttributeValue::Float(self.provider.buffer().font().size_points)
            }
            TextAttributeId::FontWeight => AttributeValue::Int(NORMAL_FONT_WEIGHT),
            TextAttributeId::IsHidden | TextAttributeId::IsItalic => AttributeValue::Bool(false),
            TextAttributeId::IsReadOnly => AttributeValue::Bool(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use core_buffer::{CircularBuffer, FontInfo};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::TextProvider;

    fn provider() -> TextProvider<CircularBuffer> {
        let buffer = CircularBuffer::new(4, 20, 4);
        buffer.set_font(FontInfo {
            name: "Cascadia Mono".to_string(),
            size_points: 11.0,
        });
        TextProvider::new(Arc::new(buffer))
    }

    #[test]
    fn reports_font_from_buffer() {
        let r = provider().document_range();
        assert_eq!(
            r.get_attribute_value(TextAttributeId::FontName),
            AttributeValue::Text("Cascadia Mono".to_string())
        );
        assert_eq!(r.get_attribute_value(TextAttributeId::FontSize), AttributeValue::Float(11.0));
        assert_eq!(r.get_attribute_value(TextAttributeId::IsReadOnly), AttributeValue::Bool(true));
    }

    #[test]
    fn unknown_raw_id_is_not_supported() {
        let r = provider().document_range();
        assert_eq!(r.get_attribute_value_raw(40001), AttributeValue::NotSupported);
        assert_eq!(r.get_attribute_value_raw(40014), AttributeValue::Bool(false));
    }

    #[test]
    fn find_attribute_matches_whole_range() {
        let p = provider();
        let r = p.range_from_endpoints(3, 25, false).unwrap();
        let hit = r
            .find_attribute(TextAttributeId::IsItalic, &AttributeValue::Bool(false), false)
            .unwrap();
        assert!(hit.compare(&r));
        assert!(r
            .find_attribute(TextAttributeId::IsItalic, &AttributeValue::Bool(true), true)
            .is_none());
        assert!(p
            .range_degenerate()
            .find_attribute(TextAttributeId::IsItalic, &AttributeValue::Bool(false), false)
            .is_none());
    }
}
