use ariadne::Fmt;
use plotex_attrs::ErrorKind;
use plotex_error::EXPR;

/// Root finding needs exactly one variable to solve for.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = if unbound.is_empty() {
        "there is no variable to solve for".to_string()
    } else {
        format!(
            "cannot solve for {} variables at once",
            unbound.len(),
        )
    },
    labels = ["this equation"],
    help = format!(
        "give a value to every variable except one; the unbound variables are {}",
        format!("{:?}", unbound).fg(EXPR),
    ),
)]
pub struct RootFindingPrecondition {
    /// The variables of the equation that have no value, in order of first appearance.
    pub unbound: Vec<char>,
}

/// The options given to the root finder or the sampling driver cannot be used.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "invalid sampling options",
    help = reason.clone(),
)]
pub struct InvalidSamplingOptions {
    /// What is wrong with the options.
    pub reason: String,
}

/// A curve uses a variable that is neither a coordinate nor defined.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("undefined variable `{}`", name),
    labels = ["this variable has no value"],
    help = format!(
        "curves can only use {} and {}; define it with something like {}",
        "x".fg(EXPR),
        "y".fg(EXPR),
        format!("{}=1", name).fg(EXPR),
    ),
)]
pub struct UnsupportedVariable {
    /// The name of the variable.
    pub name: char,
}

/// A curve written without `=` uses `y`, so it cannot be read as `y=...`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "cannot graph an expression of `y`",
    labels = ["`y` is used here"],
    help = format!("write the curve as an equation instead, like {}", "x=y^2".fg(EXPR)),
)]
pub struct CurveMentionsY;

/// A curve calls a function that has not been defined with that number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("undefined function `{}` with {} argument(s)", name, arity),
    labels = ["this function"],
    help = format!("define it with something like {}", format!("{}(t)=t^2", name).fg(EXPR)),
)]
pub struct UndefinedFunction {
    /// The name of the function.
    pub name: char,

    /// The number of arguments it was called with.
    pub arity: usize,
}
