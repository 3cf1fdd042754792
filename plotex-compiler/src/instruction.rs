use std::fmt;
use plotex_parser::parser::ast::UnaryFunc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A function that can be called with the [`Instruction::Call`] instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Func {
    /// A logarithm or trigonometric function of one argument.
    Unary(UnaryFunc),

    /// A logarithm with an explicit base. The base is the first argument, and the antilog is the
    /// second.
    Log,

    /// A user-defined function, compiled into the chunk with the given index.
    User(usize),
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Unary(func) => write!(f, "{}", func),
            Self::Log => write!(f, "\\log_"),
            Self::User(chunk) => write!(f, "chunk {}", chunk),
        }
    }
}

/// Bytecode instructions emitted by the compiler.
///
/// The instructions operate on a single value stack. Every instruction except
/// [`Instruction::Call`] has a fixed effect on the stack size, so a chunk's instructions always
/// leave exactly one value on the stack when run from an empty stack.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Instruction {
    /// Push a constant value (one known at compile time) onto the stack.
    PushConst(f64),

    /// Push the value bound to the variable in the given slot of the symbol table.
    PushVar(usize),

    /// Push the argument with the given index of the function being executed.
    PushArg(usize),

    /// Pops the right operand, then the left operand, and pushes their sum.
    Add,

    /// Pops the right operand, then the left operand, and pushes their difference.
    Sub,

    /// Pops the right operand, then the left operand, and pushes their product.
    Mul,

    /// Pops the right operand, then the left operand, and pushes their quotient.
    Div,

    /// Pops the exponent, then the base, and pushes the power.
    Pow,

    /// Pops `arity` arguments and pushes the result of calling `func` with them, with the first
    /// argument being the deepest on the stack.
    Call {
        func: Func,
        arity: usize,
    },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::PushConst(value) => write!(f, "push_const {}", value),
            Self::PushVar(slot) => write!(f, "push_var {}", slot),
            Self::PushArg(index) => write!(f, "push_arg {}", index),
            Self::Add => write!(f, "add"),
            Self::Sub => write!(f, "sub"),
            Self::Mul => write!(f, "mul"),
            Self::Div => write!(f, "div"),
            Self::Pow => write!(f, "pow"),
            Self::Call { func, arity } => write!(f, "call {} ({})", func, arity),
        }
    }
}
