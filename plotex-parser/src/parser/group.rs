//! Helpers to navigate groups of tokens delimited by `()` and `{}`.

use plotex_error::Error;
use crate::tokenizer::{Token, TokenKind};
use super::error::UnclosedGroup;

/// Returns the index of the token that closes the group opened at `open`.
///
/// Returns [`None`] if the token at `open` does not open a group, if the group is never closed,
/// or if it is closed by the wrong kind of delimiter.
pub fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    let closer = tokens.get(open)?.kind.closer()?;
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.kind.is_open() {
            depth += 1;
        } else if token.kind.is_close() {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return (token.kind == closer).then_some(i);
            }
        }
    }
    None
}

/// Returns true if the group opened at `open` is closed by the last token of the slice.
pub fn closes_at_end(tokens: &[Token], open: usize) -> bool {
    matching_close(tokens, open) == Some(tokens.len().wrapping_sub(1))
}

/// Splits the tokens at every token of the given kind that is not nested inside a group.
///
/// The separators are not included in the returned slices. A slice is returned for every gap, so
/// `n` separators always produce `n + 1` slices, some of which may be empty.
pub fn split_top_level(tokens: &[Token], separator: TokenKind) -> Vec<&[Token]> {
    let mut parts = Vec::new();
    let mut depth = 0isize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        if token.kind.is_open() {
            depth += 1;
        } else if token.kind.is_close() {
            depth -= 1;
        } else if depth == 0 && token.kind == separator {
            parts.push(&tokens[start..i]);
            start = i + 1;
        }
    }
    parts.push(&tokens[start..]);
    parts
}

/// Returns the byte range covered by the given tokens, or [`None`] if there are none.
pub fn span_of(tokens: &[Token]) -> Option<std::ops::Range<usize>> {
    let first = tokens.first()?;
    let last = tokens.last()?;
    Some(first.span.start..last.span.end)
}

/// Checks that every group in the token stream is closed by the matching delimiter.
pub fn check_balanced(tokens: &[Token]) -> Result<(), Error> {
    let mut stack: Vec<&Token> = Vec::new();
    for token in tokens {
        if token.kind.is_open() {
            stack.push(token);
        } else if token.kind.is_close() {
            match stack.pop() {
                Some(open) if open.kind.closer() == Some(token.kind) => (),
                Some(open) => {
                    return Err(Error::new(vec![open.span.clone()], UnclosedGroup {
                        opening: true,
                        delimiter: delimiter(open.kind),
                    }));
                },
                None => {
                    return Err(Error::new(vec![token.span.clone()], UnclosedGroup {
                        opening: false,
                        delimiter: delimiter(token.kind),
                    }));
                },
            }
        }
    }

    match stack.pop() {
        Some(open) => Err(Error::new(vec![open.span.clone()], UnclosedGroup {
            opening: true,
            delimiter: delimiter(open.kind),
        })),
        None => Ok(()),
    }
}

/// Returns the character of a group delimiter.
fn delimiter(kind: TokenKind) -> char {
    match kind {
        TokenKind::OpenParen => '(',
        TokenKind::CloseParen => ')',
        TokenKind::OpenCurly => '{',
        _ => '}',
    }
}
