pub mod token;

use logos::{Lexer, Logos};
use plotex_error::Error;
use crate::parser::error::UnrecognizedToken;
pub use token::{Token, TokenKind};

/// Sizing markers that only scope a delimiter and carry no meaning of their own.
const SIZING_MARKERS: [&str; 2] = [r"\left", r"\right"];

/// Source text with whitespace and sizing markers removed, along with a map from each byte of
/// the cleaned text back to its byte offset in the original text.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessed {
    /// The cleaned text.
    pub text: String,

    /// `offsets[i]` is the byte offset in the original text of byte `i` of [`Self::text`].
    offsets: Vec<usize>,
}

impl Preprocessed {
    /// Maps a byte range of the cleaned text back to the original text.
    pub fn original_span(&self, span: std::ops::Range<usize>) -> std::ops::Range<usize> {
        let Some(&start) = self.offsets.get(span.start) else {
            // points past the end of the cleaned text
            let end = self.offsets.last().map_or(0, |last| last + 1);
            return end..end;
        };
        let end = span.end
            .checked_sub(1)
            .and_then(|last| self.offsets.get(last))
            .map_or(start, |last| last + 1);
        start..end.max(start)
    }
}

/// Strips whitespace and the `\left` / `\right` sizing markers from the input.
pub fn preprocess(input: &str) -> Preprocessed {
    let mut stripped = String::with_capacity(input.len());
    let mut stripped_offsets = Vec::with_capacity(input.len());
    for (offset, c) in input.char_indices() {
        if c.is_whitespace() {
            continue;
        }
        stripped.push(c);
        stripped_offsets.extend(offset..offset + c.len_utf8());
    }

    let mut text = String::with_capacity(stripped.len());
    let mut offsets = Vec::with_capacity(stripped.len());
    let mut i = 0;
    while i < stripped.len() {
        if let Some(marker) = SIZING_MARKERS.iter().find(|m| stripped[i..].starts_with(**m)) {
            i += marker.len();
            continue;
        }

        // `i` is always on a char boundary: markers are ASCII and chars are copied whole
        let Some(c) = stripped[i..].chars().next() else { break };
        text.push(c);
        offsets.extend_from_slice(&stripped_offsets[i..i + c.len_utf8()]);
        i += c.len_utf8();
    }

    Preprocessed { text, offsets }
}

/// Returns an iterator over the token kinds produced by the lexer for already preprocessed text.
pub fn lex(text: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(text)
}

/// Tokenizes the given source text.
///
/// The input is preprocessed first (see [`preprocess`]); the spans of the returned tokens point
/// into the original `input`. If any part of the input cannot be lexed, the whole operation fails
/// with an error pointing at the unrecognized text. No partial token list is ever returned.
pub fn tokenize(input: &str) -> Result<Vec<Token>, Error> {
    let clean = preprocess(input);
    let mut lexer = lex(&clean.text);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = clean.original_span(lexer.span());
        match result {
            Ok(kind) => tokens.push(Token { span, kind }),
            Err(()) => {
                return Err(Error::new(vec![span], UnrecognizedToken {
                    lexeme: lexer.slice().to_string(),
                }));
            },
        }
    }

    log::trace!("tokenized {:?} into {} tokens", input, tokens.len());
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Compares the token kinds produced by the tokenizer to the expected kinds.
    fn compare_kinds<const N: usize>(input: &str, expected: [TokenKind; N]) {
        let kinds = tokenize(input)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect::<Vec<_>>();
        assert_eq!(kinds, expected.to_vec());
    }

    #[test]
    fn basic_expr() {
        compare_kinds("1 + 2", [TokenKind::Number(1.0), TokenKind::Add, TokenKind::Number(2.0)]);
    }

    #[test]
    fn minus_is_always_an_operator() {
        compare_kinds("-3.5-x", [
            TokenKind::Sub,
            TokenKind::Number(3.5),
            TokenKind::Sub,
            TokenKind::Letter('x'),
        ]);
    }

    #[test]
    fn named_signatures() {
        compare_kinds(r"\sin^{-1}x+\sin x+\arccos(\pi)", [
            TokenKind::Arcsin,
            TokenKind::Letter('x'),
            TokenKind::Add,
            TokenKind::Sin,
            TokenKind::Letter('x'),
            TokenKind::Add,
            TokenKind::Arccos,
            TokenKind::OpenParen,
            TokenKind::Pi,
            TokenKind::CloseParen,
        ]);
    }

    #[test]
    fn log_family() {
        compare_kinds(r"\ln x\lg x\log x\log_2x", [
            TokenKind::Ln,
            TokenKind::Letter('x'),
            TokenKind::Lg,
            TokenKind::Letter('x'),
            TokenKind::Lg,
            TokenKind::Letter('x'),
            TokenKind::LogBase,
            TokenKind::Number(2.0),
            TokenKind::Letter('x'),
        ]);
    }

    #[test]
    fn sizing_markers_are_dropped() {
        compare_kinds(r"\left( x \cdot y \right)", [
            TokenKind::OpenParen,
            TokenKind::Letter('x'),
            TokenKind::Mul,
            TokenKind::Letter('y'),
            TokenKind::CloseParen,
        ]);
    }

    #[test]
    fn spans_point_into_original_input() {
        let input = r"\left(1 +  xy\right)";
        let tokens = tokenize(input).unwrap();
        let lexemes = tokens.iter()
            .map(|token| &input[token.span.clone()])
            .collect::<Vec<_>>();
        assert_eq!(lexemes, vec!["(", "1", "+", "x", "y", ")"]);
    }

    #[test]
    fn unrecognized_input() {
        let err = tokenize("1 + $x").unwrap_err();
        assert!(err.is::<UnrecognizedToken>());
        assert_eq!(err.spans, vec![4..5]);
    }

    #[test]
    fn unknown_command() {
        assert!(tokenize(r"\sqrt{2}").is_err());
    }
}
