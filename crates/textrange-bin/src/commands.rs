//! Query subcommands run against a loaded buffer.

use std::io::Write;

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use core_buffer::CircularBuffer;
use core_coords::Endpoint;
use core_range::{TextProvider, TextRange, TextUnit};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitArg {
    Character,
    Format,
    Word,
    Line,
    Paragraph,
    Page,
    Document,
}

impl From<UnitArg> for TextUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Character => TextUnit::Character,
            UnitArg::Format => TextUnit::Format,
            UnitArg::Word => TextUnit::Word,
            UnitArg::Line => TextUnit::Line,
            UnitArg::Paragraph => TextUnit::Paragraph,
            UnitArg::Page => TextUnit::Page,
            UnitArg::Document => TextUnit::Document,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the text of a range (the whole document by default).
    Text {
        #[arg(long)]
        start: Option<Endpoint>,
        #[arg(long)]
        end: Option<Endpoint>,
        /// Maximum characters to print; -1 for no limit.
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        max_length: i32,
    },
    /// Search for text and print the matching endpoints.
    Find {
        needle: String,
        #[arg(long)]
        backward: bool,
        #[arg(long)]
        ignore_case: bool,
    },
    /// Print the screen rectangles of a range as `left top width height`.
    Rects {
        #[arg(long)]
        start: Option<Endpoint>,
        #[arg(long)]
        end: Option<Endpoint>,
    },
    /// Move an empty range by units and print where it landed.
    Move {
        #[arg(long, value_enum)]
        unit: UnitArg,
        #[arg(long, allow_negative_numbers = true)]
        count: i32,
        /// Starting endpoint; defaults to the cursor.
        #[arg(long)]
        at: Option<Endpoint>,
    },
    /// Expand an empty range to its enclosing unit and print the endpoints.
    Expand {
        #[arg(long, value_enum)]
        unit: UnitArg,
        #[arg(long, default_value_t = 0)]
        at: Endpoint,
    },
}

fn range_between(
    provider: &TextProvider<CircularBuffer>,
    start: Option<Endpoint>,
    end: Option<Endpoint>,
) -> Result<TextRange<CircularBuffer>> {
    if start.is_none() && end.is_none() {
        return Ok(provider.document_range());
    }
    let max = provider.geometry().max_endpoint();
    Ok(provider.range_from_endpoints(start.unwrap_or(0), end.unwrap_or(max), false)?)
}

pub fn run(
    command: &Command,
    provider: &TextProvider<CircularBuffer>,
    out: &mut impl Write,
) -> Result<()> {
    debug!(target: "runtime", ?command, "command_start");
    match command {
        Command::Text {
            start,
            end,
            max_length,
        } => {
            let range = range_between(provider, *start, *end)?;
            writeln!(out, "{}", range.get_text(*max_length)?)?;
        }
        Command::Find {
            needle,
            backward,
            ignore_case,
        } => match provider
            .document_range()
            .find_text(needle, *backward, *ignore_case)?
        {
            Some(hit) => writeln!(out, "{} {}", hit.start(), hit.end())?,
            None => writeln!(out, "not found")?,
        },
        Command::Rects { start, end } => {
            let range = range_between(provider, *start, *end)?;
            for rect in range.bounding_rectangles() {
                let [left, top, width, height] = rect.to_array();
                writeln!(out, "{left} {top} {width} {height}")?;
            }
        }
        Command::Move { unit, count, at } => {
            let mut range = match at {
                Some(at) => provider.range_from_endpoints(*at, *at, true)?,
                None => provider.range_at_cursor(),
            };
            let moved = range.move_by((*unit).into(), *count);
            writeln!(out, "moved {moved} to {}", range.start())?;
        }
        Command::Expand { unit, at } => {
            let mut range = provider.range_from_endpoints(*at, *at, true)?;
            range.expand_to_enclosing_unit((*unit).into());
            writeln!(out, "{} {}", range.start(), range.end())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn provider() -> TextProvider<CircularBuffer> {
        let buffer = CircularBuffer::from_text(10, 20, 5, "hello world\nsecond line\nxxABCyy\n");
        TextProvider::new(Arc::new(buffer))
    }

    fn output(command: Command) -> String {
        let mut out = Vec::new();
        run(&command, &provider(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_of_explicit_range() {
        let out = output(Command::Text {
            start: Some(6),
            end: Some(25),
            max_length: -1,
        });
        assert_eq!(out, "world\r\nsecond\n");
    }

    #[test]
    fn find_prints_endpoints() {
        let out = output(Command::Find {
            needle: "abc".to_string(),
            backward: false,
            ignore_case: true,
        });
        assert_eq!(out, "42 44\n");
        let out = output(Command::Find {
            needle: "zzz".to_string(),
            backward: false,
            ignore_case: false,
        });
        assert_eq!(out, "not found\n");
    }

    #[test]
    fn move_and_expand() {
        let out = output(Command::Move {
            unit: UnitArg::Line,
            count: 20,
            at: Some(0),
        });
        assert_eq!(out, "moved 9 to 180\n");
        let out = output(Command::Expand {
            unit: UnitArg::Line,
            at: 45,
        });
        assert_eq!(out, "40 59\n");
    }

    #[test]
    fn rects_skip_hidden_rows() {
        let out = output(Command::Rects {
            start: Some(80),
            end: Some(125),
        });
        assert_eq!(out, "0 64 160 16\n");
    }
}
