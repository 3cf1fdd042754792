//! Parser for the LaTeX-like notation understood by the plotex graphing core.
//!
//! Input such as `x^2+\frac{1}{y}=\sin(x)` is split into tokens by the [`tokenizer`], then
//! parsed into an abstract syntax tree by the [`parser`]. The tree can be rendered back to the
//! notation, evaluated against an [`Env`](parser::ast::Env), substituted into, and linked to
//! user-defined functions.
//!
//! ```
//! use plotex_parser::parser::{ast::{Env, Expression}, parse};
//!
//! let expr = parse::<Expression>(r"\frac{x}{2}+1").unwrap();
//! assert_eq!(expr.compute(&Env::new().with('x', 4.0)), 3.0);
//! assert_eq!(expr.to_string(), r"\frac{x}{2}+1");
//! ```

mod link;
pub mod parser;
pub mod tokenizer;
