//! Contains the common [`ErrorKind`] trait used by all errors in `plotex` to display user-facing
//! error messages.
//!
//! Every error is reported against the source text the user typed: the [`Error`] type carries the
//! byte ranges of that text that should be highlighted, and the boxed [`ErrorKind`] decides how
//! the highlighted regions are labelled. Error kinds are usually plain structs that derive
//! [`ErrorKind`] using the `plotex-attrs` crate.

use ariadne::{Color, Report};
use std::{any::Any, fmt::Debug, ops::Range};

#[cfg(test)]
extern crate self as plotex_error;

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send + Sync {
    /// Returns the error as a [`dyn Any`](Any), so that the concrete kind can be inspected.
    fn as_any(&self) -> &dyn Any;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Returns true if the kind of this error is `T`.
    pub fn is<T: ErrorKind + 'static>(&self) -> bool {
        self.kind.as_any().is::<T>()
    }

    /// Returns the kind of this error as `T`, if it is one.
    pub fn downcast_ref<T: ErrorKind + 'static>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }
}

#[cfg(test)]
mod tests {
    use ariadne::{Fmt, Source};
    use plotex_attrs::ErrorKind;
    use super::*;

    #[derive(Debug, ErrorKind)]
    #[error(
        message = "unbalanced group",
        labels = ["this group opens here".to_string(), format!("but no {} closes it", "`}`".fg(EXPR))],
        help = "add the missing brace",
    )]
    struct Unbalanced;

    #[derive(Debug, ErrorKind)]
    #[error(message = format!("unknown letter `{}`", letter), labels = ["here"])]
    struct UnknownLetter {
        letter: char,
    }

    fn render(err: &Error, input: &str) -> String {
        let mut buf = Vec::new();
        err.build_report("input")
            .write(("input", Source::from(input)), &mut buf)
            .unwrap();
        String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap()
    }

    #[test]
    fn report_contains_labels() {
        let input = r"\frac{1}{2";
        let err = Error::new(vec![5..6, 8..10], Unbalanced);
        let out = render(&err, input);

        assert!(out.contains("unbalanced group"));
        assert!(out.contains("this group opens here"));
        assert!(out.contains("but no `}` closes it"));
        assert!(out.contains("add the missing brace"));
    }

    #[test]
    fn report_uses_fields() {
        let err = Error::new(vec![0..1], UnknownLetter { letter: '$' });
        let out = render(&err, "$+1");

        assert!(out.contains("unknown letter `$`"));
    }

    #[test]
    fn downcast_kind() {
        let err = Error::new(vec![0..1], UnknownLetter { letter: '#' });

        assert!(err.is::<UnknownLetter>());
        assert!(!err.is::<Unbalanced>());
        assert_eq!(err.downcast_ref::<UnknownLetter>().map(|k| k.letter), Some('#'));
    }
}
