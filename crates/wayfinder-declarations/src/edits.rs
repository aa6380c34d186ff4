//! Applies document synchronisation changes to stored text.
//!
//! Positions use UTF-16 code units, the default LSP position encoding.

use lsp_types::{Position, TextDocumentContentChangeEvent};
use thiserror::Error;

/// A change event that cannot be applied to the current text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeError {
    /// The position names a line past the end of the document.
    #[error("line {line} is beyond the end of the document")]
    LineOutOfRange {
        /// Requested line.
        line: u32,
    },
    /// The position lies past the end of its line.
    #[error("character {character} exceeds the UTF-16 width {width} of line {line}")]
    CharacterOutOfRange {
        /// Requested line.
        line: u32,
        /// Requested character offset.
        character: u32,
        /// Width of the line in UTF-16 code units.
        width: u32,
    },
    /// The position falls inside a surrogate pair.
    #[error("position {line}:{character} splits a UTF-16 surrogate pair")]
    SplitsCharacter {
        /// Requested line.
        line: u32,
        /// Requested character offset.
        character: u32,
    },
    /// The range ends before it starts.
    #[error("change range ends before it starts")]
    ReversedRange,
}

/// Applies `changes` in order; each one sees the result of the previous.
///
/// A change without a range replaces the whole text.
pub(crate) fn apply_changes(
    text: &str,
    changes: Vec<TextDocumentContentChangeEvent>,
) -> Result<String, ChangeError> {
    changes
        .into_iter()
        .try_fold(text.to_owned(), |mut current, change| match change.range {
            None => Ok(change.text),
            Some(range) => {
                let start = byte_offset(&current, range.start)?;
                let end = byte_offset(&current, range.end)?;
                if end < start {
                    return Err(ChangeError::ReversedRange);
                }
                current.replace_range(start..end, &change.text);
                Ok(current)
            }
        })
}

fn byte_offset(text: &str, position: Position) -> Result<usize, ChangeError> {
    let line_start = line_start(text, position.line)?;
    let line = text
        .get(line_start..)
        .and_then(|rest| rest.split('\n').next())
        .unwrap_or_default();

    let mut units = 0_u32;
    for (index, character) in line.char_indices() {
        if units == position.character {
            return Ok(line_start + index);
        }
        units += if character.len_utf16() == 1 { 1 } else { 2 };
        if units > position.character {
            return Err(ChangeError::SplitsCharacter {
                line: position.line,
                character: position.character,
            });
        }
    }

    if units == position.character {
        Ok(line_start + line.len())
    } else {
        Err(ChangeError::CharacterOutOfRange {
            line: position.line,
            character: position.character,
            width: units,
        })
    }
}

fn line_start(text: &str, target: u32) -> Result<usize, ChangeError> {
    if target == 0 {
        return Ok(0);
    }
    let mut line = 0_u32;
    for (index, character) in text.char_indices() {
        if character == '\n' {
            line += 1;
            if line == target {
                return Ok(index + '\n'.len_utf8());
            }
        }
    }
    Err(ChangeError::LineOutOfRange { line: target })
}

#[cfg(test)]
mod tests {
    use lsp_types::Range;
    use rstest::rstest;

    use super::*;

    fn ranged(start: (u32, u32), end: (u32, u32), text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range: Some(Range::new(
                Position::new(start.0, start.1),
                Position::new(end.0, end.1),
            )),
            range_length: None,
            text: text.to_owned(),
        }
    }

    fn full(text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: text.to_owned(),
        }
    }

    #[rstest]
    #[case::replace_word("fn main() {}", ranged((0, 3), (0, 7), "start"), "fn start() {}")]
    #[case::insert_at_end("fn main() {}", ranged((0, 12), (0, 12), "\n"), "fn main() {}\n")]
    #[case::join_lines("a\nb\nc", ranged((0, 1), (2, 0), "-"), "a-c")]
    #[case::start_of_last_line("one\ntwo", ranged((1, 0), (1, 3), "2"), "one\n2")]
    #[case::after_surrogate_pair("let s = \"😀x\";", ranged((0, 11), (0, 12), "y"), "let s = \"😀y\";")]
    #[case::full_replacement("old", full("new"), "new")]
    fn applies_single_change(
        #[case] original: &str,
        #[case] change: TextDocumentContentChangeEvent,
        #[case] expected: &str,
    ) {
        let updated = apply_changes(original, vec![change]).expect("change applies");
        assert_eq!(updated, expected);
    }

    #[test]
    fn later_changes_see_earlier_results() {
        let updated = apply_changes(
            "fn main() {}",
            vec![
                ranged((0, 3), (0, 7), "run"),
                ranged((0, 10), (0, 10), " helper(); "),
            ],
        )
        .expect("changes apply");

        assert_eq!(updated, "fn run() { helper(); }");
    }

    #[rstest]
    #[case::missing_line(ranged((3, 0), (3, 0), "x"), ChangeError::LineOutOfRange { line: 3 })]
    #[case::past_line_end(
        ranged((0, 20), (0, 20), "x"),
        ChangeError::CharacterOutOfRange { line: 0, character: 20, width: 12 }
    )]
    #[case::reversed(ranged((0, 7), (0, 3), "x"), ChangeError::ReversedRange)]
    fn rejects_unusable_ranges(
        #[case] change: TextDocumentContentChangeEvent,
        #[case] expected: ChangeError,
    ) {
        let error = apply_changes("fn main() {}", vec![change]).expect_err("change is invalid");
        assert_eq!(error, expected);
    }

    #[test]
    fn rejects_positions_inside_surrogate_pairs() {
        let error = apply_changes("😀", vec![ranged((0, 1), (0, 2), "")])
            .expect_err("position splits the emoji");
        assert_eq!(
            error,
            ChangeError::SplitsCharacter {
                line: 0,
                character: 1
            }
        );
    }
}
