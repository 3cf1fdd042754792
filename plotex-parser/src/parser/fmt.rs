use std::fmt::{Display, Formatter, Result};

/// A trait for types that can be formatted as the LaTeX-like notation accepted by the parser.
///
/// The output of [`Latex::fmt_latex`] always parses back into a tree that formats to the same
/// text, although it is not necessarily the text that was originally parsed.
pub trait Latex {
    /// Format the value as LaTeX.
    fn fmt_latex(&self, f: &mut Formatter) -> Result;

    /// Wraps the value in a [`LatexFormatter`], which implements [`Display`].
    fn as_display(&self) -> LatexFormatter<'_, Self> {
        LatexFormatter(self)
    }
}

/// A wrapper type that implements [`Display`] for any type that implements [`Latex`].
pub struct LatexFormatter<'a, T: ?Sized>(&'a T);

impl<T: ?Sized> Display for LatexFormatter<'_, T>
where
    T: Latex,
{
    fn fmt(&self, f: &mut Formatter) -> Result {
        self.0.fmt_latex(f)
    }
}

/// Helper to format a group of values, each separated by a separator.
pub fn fmt_separated<T: Latex>(f: &mut Formatter, values: &[T], separator: &str) -> Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", separator)?;
        }
        value.fmt_latex(f)?;
    }
    Ok(())
}

/// Helper to format a value surrounded by parentheses.
pub fn fmt_paren(f: &mut Formatter, value: &impl Latex) -> Result {
    write!(f, "(")?;
    value.fmt_latex(f)?;
    write!(f, ")")
}
