//! Protocol enumerations: text units and range endpoints.
//!
//! Discriminants match the integer ids used by the hosting automation
//! framework so raw ids can be converted with `TryFrom<i32>`.

use crate::RangeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextUnit {
    Character = 0,
    Format = 1,
    Word = 2,
    Line = 3,
    Paragraph = 4,
    Page = 5,
    Document = 6,
}

/// The units navigation actually implements. Every `TextUnit` degrades to
/// the nearest supported unit at least as coarse as itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Granularity {
    Character,
    Line,
    Document,
}

impl TextUnit {
    pub(crate) fn granularity(self) -> Granularity {
        match self {
            TextUnit::Character => Granularity::Character,
            TextUnit::Format | TextUnit::Word | TextUnit::Line => Granularity::Line,
            TextUnit::Paragraph | TextUnit::Page | TextUnit::Document => Granularity::Document,
        }
    }
}

impl TryFrom<i32> for TextUnit {
    type Error = RangeError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        Ok(match raw {
            0 => TextUnit::Character,
            1 => TextUnit::Format,
            2 => TextUnit::Word,
            3 => TextUnit::Line,
            4 => TextUnit::Paragraph,
            5 => TextUnit::Page,
            6 => TextUnit::Document,
            other => return Err(RangeError::UnknownUnit(other)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeEndpoint {
    Start = 0,
    End = 1,
}

impl TryFrom<i32> for RangeEndpoint {
    type Error = RangeError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(RangeEndpoint::Start),
            1 => Ok(RangeEndpoint::End),
            other => Err(RangeError::UnknownEndpoint(other)),
        }
    }
}
