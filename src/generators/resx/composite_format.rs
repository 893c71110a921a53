//! Composite format strings (`"{0,-8:N2} of {1}"`).
//!
//! Parsing follows the grammar `string.Format` accepts: `{{` and `}}` are
//! escapes, a hole is `{index[,alignment][:format]}` with optional spaces
//! after the index and around the alignment, and the format section may not
//! contain `{`.

use crate::base::PooledBuilder;
use crate::error::{GeneratorError, Result};

/// Exclusive upper bound for hole indexes and alignment widths.
const LIMIT: usize = 1_000_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Hole {
        index: usize,
        alignment: i64,
        format: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeFormat {
    pub format: String,
    pub segments: Vec<Segment>,
}

impl CompositeFormat {
    pub fn parse(format: &str) -> Result<Self> {
        let segments = parse_segments(format)
            .map_err(|message| GeneratorError::format(format, message))?;
        Ok(Self {
            format: format.to_string(),
            segments,
        })
    }

    /// One more than the largest hole index, `0` without holes.
    pub fn minimum_argument_count(&self) -> usize {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Hole { index, .. } => index.checked_add(1),
                Segment::Literal(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    pub fn literal_length(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.chars().count(),
                Segment::Hole { .. } => 0,
            })
            .sum()
    }
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn current(&self) -> char {
        self.chars[self.pos]
    }

    /// Advances and returns the new current character.
    fn next(&mut self) -> std::result::Result<char, &'static str> {
        self.pos += 1;
        self.chars.get(self.pos).copied().ok_or("unexpected end of format string")
    }

    fn skip_spaces(&mut self, mut ch: char) -> std::result::Result<char, &'static str> {
        while ch == ' ' {
            ch = self.next()?;
        }
        Ok(ch)
    }

    /// A decimal number below [`LIMIT`] starting with `first`.
    fn digits(&mut self, first: char) -> std::result::Result<(usize, char), &'static str> {
        let mut value = first.to_digit(10).ok_or("expected a digit")? as usize;
        let mut ch = self.next()?;
        while let Some(digit) = ch.to_digit(10) {
            value = value * 10 + digit as usize;
            if value >= LIMIT {
                return Err("number too large in format item");
            }
            ch = self.next()?;
        }
        Ok((value, ch))
    }
}

fn parse_segments(format: &str) -> std::result::Result<Vec<Segment>, &'static str> {
    let mut cursor = Cursor {
        chars: format.chars().collect(),
        pos: 0,
    };
    let mut segments = Vec::new();
    let mut literal = PooledBuilder::<char>::rent();

    loop {
        // Literal text up to the next unescaped `{`.
        loop {
            let Some(offset) = cursor.chars[cursor.pos..]
                .iter()
                .position(|c| *c == '{' || *c == '}')
            else {
                literal.extend_from_slice(&cursor.chars[cursor.pos..]);
                segments.push(Segment::Literal(literal.to_string()));
                return Ok(segments);
            };
            literal.extend_from_slice(&cursor.chars[cursor.pos..cursor.pos + offset]);
            cursor.pos += offset;

            let brace = cursor.current();
            let ch = cursor.next()?;
            if brace == ch {
                literal.push(ch);
                cursor.pos += 1;
                continue;
            }
            if brace != '{' {
                return Err("unescaped '}'");
            }
            segments.push(Segment::Literal(literal.to_string()));
            literal.clear();
            break;
        }

        let first = cursor.current();
        if !first.is_ascii_digit() {
            return Err("expected an argument index");
        }
        let (index, mut ch) = cursor.digits(first)?;
        let mut alignment = 0;
        let mut item_format = None;

        if ch != '}' {
            ch = cursor.skip_spaces(ch)?;

            if ch == ',' {
                ch = cursor.next()?;
                ch = cursor.skip_spaces(ch)?;
                let sign = if ch == '-' {
                    ch = cursor.next()?;
                    -1
                } else {
                    1
                };
                let (width, after) = cursor.digits(ch)?;
                alignment = width as i64 * sign;
                ch = cursor.skip_spaces(after)?;
            }

            if ch != '}' {
                if ch != ':' {
                    return Err("unexpected character in format item");
                }
                let start = cursor.pos + 1;
                loop {
                    match cursor.next()? {
                        '}' => break,
                        '{' => return Err("'{' inside a format item"),
                        _ => {}
                    }
                }
                item_format = Some(cursor.chars[start..cursor.pos].iter().collect());
            }
        }

        cursor.pos += 1;
        segments.push(Segment::Hole {
            index,
            alignment,
            format: item_format,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plain text", 0)]
    #[case("{0}", 1)]
    #[case("{1} and {0}", 2)]
    #[case("{{0}} escaped", 0)]
    #[case("{2,-8:N2}", 3)]
    #[case("{0 , 5}", 1)]
    #[case("{10:yyyy-MM-dd}", 11)]
    #[case("", 0)]
    #[case("{999999}", 1_000_000)]
    #[case("{0,-999999}", 1)]
    fn test_minimum_argument_count(#[case] format: &str, #[case] expected: usize) {
        assert_eq!(CompositeFormat::parse(format).unwrap().minimum_argument_count(), expected);
    }

    #[rstest]
    #[case("{")]
    #[case("}")]
    #[case("{0")]
    #[case("{a}")]
    #[case("{0:{x}")]
    #[case("{0,}")]
    #[case("{0 x}")]
    #[case("trailing {")]
    #[case("trailing }")]
    #[case("{1000000}")]
    #[case("{99999999999999999999}")]
    #[case("{0,1000000}")]
    fn test_invalid_format(#[case] format: &str) {
        let error = CompositeFormat::parse(format).unwrap_err();
        assert!(matches!(error, GeneratorError::Format { .. }), "{error}");
    }

    #[test]
    fn test_segments() {
        let parsed = CompositeFormat::parse("Hi {0,-3:X}! {{ok}}").unwrap();
        assert_eq!(
            parsed.segments,
            vec![
                Segment::Literal("Hi ".into()),
                Segment::Hole {
                    index: 0,
                    alignment: -3,
                    format: Some("X".into()),
                },
                Segment::Literal("! {ok}".into()),
            ]
        );
        assert_eq!(parsed.literal_length(), 9);
    }
}
