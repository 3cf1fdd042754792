use ariadne::{Fmt, Source};
use plotex_attrs::ErrorKind;
use plotex_error::{Error, EXPR};
use std::io::{self, Write};

/// A command was given arguments it does not understand.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid arguments to `{}`", command),
    labels = ["here"],
    help = format!("usage: {}", usage.fg(EXPR)),
)]
pub struct InvalidArguments {
    /// The name of the command.
    pub command: &'static str,

    /// How the command is used.
    pub usage: &'static str,
}

/// Moves the spans of an error that was reported against `input[offset..]` so that they point
/// into `input` instead.
pub fn shift(mut err: Error, offset: usize) -> Error {
    for span in &mut err.spans {
        *span = span.start + offset..span.end + offset;
    }
    err
}

/// Writes the report for the error to the given writer.
pub fn write_report(err: &Error, input: &str, writer: impl Write) -> io::Result<()> {
    err.build_report("input").write(("input", Source::from(input)), writer)
}

/// Report the error to stderr.
///
/// The `ariadne` crate's [`Report`](ariadne::Report) type does not implement `Display`, so it is
/// written to stderr directly.
pub fn report_to_stderr(err: &Error, input: &str) {
    if let Err(io_err) = write_report(err, input, io::stderr()) {
        eprintln!("could not write error report: {}", io_err);
    }
}

#[cfg(test)]
mod tests {
    use plotex_parser::parser::{ast::Expression, parse};
    use super::*;

    fn render(err: &Error, input: &str) -> String {
        let mut buf = Vec::new();
        write_report(err, input, &mut buf).unwrap();
        String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap()
    }

    #[test]
    fn shifted_report() {
        let line = r":asm \frac{1}{";
        let err = shift(parse::<Expression>(&line[5..]).unwrap_err(), 5);
        assert_eq!(err.spans, vec![13..14]);
        assert!(render(&err, line).contains("unclosed"));
    }

    #[test]
    fn usage_in_report() {
        let err = Error::new(vec![0..5], InvalidArguments { command: "roots", usage: "roots <equation> [min max]" });
        let out = render(&err, "roots");
        assert!(out.contains("invalid arguments to `roots`"));
        assert!(out.contains("usage: roots <equation> [min max]"));
    }
}
