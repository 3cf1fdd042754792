use ariadne::Fmt;
use plotex_attrs::ErrorKind;
use plotex_error::EXPR;

/// The source contained text that is not part of the notation.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unrecognized input `{}`", lexeme),
    labels = ["I don't know what this means"],
    help = format!("only single letters, numbers, operators, and commands like {} are understood", r"\frac".fg(EXPR)),
)]
pub struct UnrecognizedToken {
    /// The text that could not be lexed.
    pub lexeme: String,
}

/// A group delimiter was never matched.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unclosed `{}`", delimiter),
    labels = [if *opening {
        "this delimiter is never closed"
    } else {
        "this delimiter was never opened"
    }],
    help = if *opening {
        "add the matching closing delimiter somewhere after this"
    } else {
        "remove it, or add the matching opening delimiter somewhere before this"
    },
)]
pub struct UnclosedGroup {
    /// Whether the delimiter was an opening delimiter. Otherwise, it was a closing delimiter
    /// with no partner.
    pub opening: bool,

    /// The delimiter itself.
    pub delimiter: char,
}

/// The source, or one side of an equation, was empty.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing expression",
    labels = [format!("add an {} here", "expression".fg(EXPR))],
)]
pub struct EmptyExpression;

/// A term of an expression could not be understood.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "invalid term",
    labels = ["I could not make sense of this term"],
    help = format!(
        "check for a missing operand, or write a group like {} around ambiguous parts",
        "{...}".fg(EXPR),
    ),
)]
pub struct InvalidTerm;

/// An equation was expected, but there is no `=` in the source.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected an equation",
    labels = ["there is no `=` in here"],
    help = format!("write both sides of the equation, like {}", "x^2+y^2=1".fg(EXPR)),
)]
pub struct MissingEquals;

/// The source looked like a definition but was not a valid one.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "invalid definition",
    labels = [reason.clone()],
    help = format!(
        "variables are defined like {}, functions like {}",
        "a=2".fg(EXPR),
        "f(t)=t^2".fg(EXPR),
    ),
)]
pub struct InvalidDefinition {
    /// What is wrong with the definition.
    pub reason: String,
}

/// A function definition calls itself, directly or through other functions.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("function `{}` is defined in terms of itself", name),
    labels = [format!("this call leads back to `{}`", name)],
    help = format!("the chain of calls is {}", chain.fg(EXPR)),
)]
pub struct RecursiveFunction {
    /// The name of the function that recurses.
    pub name: char,

    /// The calls that lead back to the function, such as `f(1) -> g(1) -> f(1)`.
    pub chain: String,
}
