use logos::Logos;
use std::ops::Range;

/// The different kinds of tokens that can be produced by the tokenizer.
///
/// Whitespace and the `\left` / `\right` sizing markers never reach the lexer; they are removed
/// by [`super::preprocess`] beforehand.
#[derive(Logos, Clone, Copy, Debug, PartialEq)]
pub enum TokenKind {
    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    #[token(r"\cdot")]
    #[token(r"\times")]
    Mul,

    #[token("/")]
    #[token(r"\div")]
    Div,

    #[token("^")]
    Exp,

    /// An unsigned decimal number. A leading `-` is always lexed as [`TokenKind::Sub`].
    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("{")]
    OpenCurly,

    #[token("}")]
    CloseCurly,

    #[token(r"\frac")]
    Frac,

    #[token(r"\ln")]
    Ln,

    #[token(r"\lg")]
    #[token(r"\log")]
    Lg,

    /// The `\log_` marker, followed by the base of the logarithm.
    #[token(r"\log_")]
    LogBase,

    #[token(r"\sin")]
    Sin,

    #[token(r"\sin^{-1}")]
    #[token(r"\arcsin")]
    Arcsin,

    #[token(r"\cos")]
    Cos,

    #[token(r"\cos^{-1}")]
    #[token(r"\arccos")]
    Arccos,

    #[token(r"\tan")]
    Tan,

    #[token(r"\tan^{-1}")]
    #[token(r"\arctan")]
    Arctan,

    #[token(r"\csc")]
    Csc,

    #[token(r"\csc^{-1}")]
    #[token(r"\arccsc")]
    Arccsc,

    #[token(r"\sec")]
    Sec,

    #[token(r"\sec^{-1}")]
    #[token(r"\arcsec")]
    Arcsec,

    #[token(r"\cot")]
    Cot,

    #[token(r"\cot^{-1}")]
    #[token(r"\arccot")]
    Arccot,

    #[token(r"\pi")]
    Pi,

    #[token(",")]
    Comma,

    #[token("=")]
    Assign,

    #[regex("[a-zA-Z]", |lex| lex.slice().chars().next())]
    Letter(char),
}

impl TokenKind {
    /// Returns true if the token opens a group, `(` or `{`.
    pub fn is_open(self) -> bool {
        matches!(self, TokenKind::OpenParen | TokenKind::OpenCurly)
    }

    /// Returns true if the token closes a group, `)` or `}`.
    pub fn is_close(self) -> bool {
        matches!(self, TokenKind::CloseParen | TokenKind::CloseCurly)
    }

    /// Returns the token that closes a group opened by this token.
    pub fn closer(self) -> Option<TokenKind> {
        match self {
            TokenKind::OpenParen => Some(TokenKind::CloseParen),
            TokenKind::OpenCurly => Some(TokenKind::CloseCurly),
            _ => None,
        }
    }

    /// Returns true if the token is an additive operator, `+` or `-`.
    pub fn is_sign(self) -> bool {
        matches!(self, TokenKind::Add | TokenKind::Sub)
    }
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The region of the **original** source text that this token was lexed from. This may
    /// include whitespace that was stripped before lexing.
    pub span: Range<usize>,

    /// The kind of token.
    pub kind: TokenKind,
}
