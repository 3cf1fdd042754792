//! [`Compile`](crate::Compile) implementations for the nodes of the syntax tree.

mod binary;
mod call;
mod equation;
mod expr;
mod factor;
mod literal;
mod unary;
