//! Stack machine that runs [`Program`]s produced by `plotex-compiler`.
//!
//! A [`Vm`] borrows a program and owns the buffers needed to run it, so the same machine can
//! evaluate the program at many points without allocating. Running a program never fails:
//! numeric anomalies and malformed programs both produce NaN.
//!
//! ```
//! use plotex_compiler::Compiler;
//! use plotex_parser::parser::{ast::{Env, Expression}, parse};
//! use plotex_vm::{Eval, Vm};
//!
//! let expr = parse::<Expression>(r"x^2+\frac{1}{y}").unwrap();
//! let program = Compiler::compile(&expr);
//!
//! let env = Env::new().with('x', 3.0).with('y', 2.0);
//! assert_eq!(program.eval(&env), 9.5);
//!
//! let mut vm = Vm::new(&program);
//! vm.bind(&env);
//! vm.set('x', 1.0);
//! assert_eq!(vm.eval(), 1.5);
//! ```

pub mod frame;

use frame::Frame;
use plotex_compiler::{Func, Instruction, Program};
use plotex_parser::parser::ast::{Env, Log};

/// A virtual machine that evaluates a [`Program`].
#[derive(Debug, Clone)]
pub struct Vm<'a> {
    /// The program to run.
    program: &'a Program,

    /// Values of the program's free variables, indexed by slot. Unbound variables are NaN.
    vars: Vec<f64>,

    /// The value stack.
    stack: Vec<f64>,

    /// The call stack.
    frames: Vec<Frame>,
}

impl<'a> Vm<'a> {
    /// Creates a machine for the given program, with every variable unbound.
    pub fn new(program: &'a Program) -> Self {
        Self {
            program,
            vars: vec![f64::NAN; program.symbols.len()],
            stack: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Binds every variable the program reads to its value in `env`. Variables missing from
    /// `env` become unbound.
    pub fn bind(&mut self, env: &Env) {
        for (slot, name) in self.program.symbols.iter().enumerate() {
            self.vars[slot] = env.get(*name).unwrap_or(f64::NAN);
        }
    }

    /// Sets the value of a single variable. Does nothing if the program does not read it.
    pub fn set(&mut self, name: char, value: f64) {
        if let Some(slot) = self.program.slot(name) {
            self.set_slot(slot, value);
        }
    }

    /// Sets the value of the variable in the given slot. Does nothing if there is no such slot.
    pub fn set_slot(&mut self, slot: usize, value: f64) {
        if let Some(var) = self.vars.get_mut(slot) {
            *var = value;
        }
    }

    /// Runs the program with the current bindings, returning its value.
    pub fn eval(&mut self) -> f64 {
        let program = self.program;
        self.stack.clear();
        self.frames.clear();
        self.frames.push(Frame::new(0, 0));

        loop {
            let Some(&Frame { chunk, pc, base }) = self.frames.last() else {
                return f64::NAN;
            };
            let instr = program.chunks
                .get(chunk)
                .and_then(|chunk| chunk.instructions.get(pc))
                .copied();

            let Some(instr) = instr else {
                // end of the chunk: replace the arguments with the return value
                self.frames.pop();
                let value = self.pop(base);
                self.stack.truncate(base);
                if self.frames.is_empty() {
                    return value;
                }
                self.stack.push(value);
                continue;
            };

            if let Some(frame) = self.frames.last_mut() {
                frame.pc += 1;
            }
            let arity = program.chunks.get(chunk).map_or(0, |chunk| chunk.arity);
            self.exec(instr, base, arity);
        }
    }

    /// Pops a value from the current frame, or returns NaN if the frame has no values left.
    fn pop(&mut self, base: usize) -> f64 {
        if self.stack.len() > base {
            self.stack.pop().unwrap_or(f64::NAN)
        } else {
            f64::NAN
        }
    }

    fn binary(&mut self, base: usize, op: fn(f64, f64) -> f64) {
        let rhs = self.pop(base);
        let lhs = self.pop(base);
        self.stack.push(op(lhs, rhs));
    }

    /// Executes a single instruction in a frame whose arguments start at `base`.
    fn exec(&mut self, instr: Instruction, base: usize, arity: usize) {
        match instr {
            Instruction::PushConst(value) => self.stack.push(value),
            Instruction::PushVar(slot) => {
                let value = self.vars.get(slot).copied().unwrap_or(f64::NAN);
                self.stack.push(value);
            },
            Instruction::PushArg(index) => {
                let value = if index < arity {
                    self.stack.get(base + index).copied().unwrap_or(f64::NAN)
                } else {
                    f64::NAN
                };
                self.stack.push(value);
            },
            Instruction::Add => self.binary(base, |a, b| a + b),
            Instruction::Sub => self.binary(base, |a, b| a - b),
            Instruction::Mul => self.binary(base, |a, b| a * b),
            Instruction::Div => self.binary(base, |a, b| a / b),
            Instruction::Pow => self.binary(base, f64::powf),
            Instruction::Call { func, arity: args } => self.call(func, args, base),
        }
    }

    fn call(&mut self, func: Func, args: usize, base: usize) {
        match (func, args) {
            (Func::Unary(func), 1) => {
                let arg = self.pop(base);
                self.stack.push(func.apply(arg));
            },
            (Func::Log, 2) => self.binary(base, Log::apply),
            (Func::User(chunk), args) => {
                let start = self.stack.len().checked_sub(args).filter(|start| *start >= base);
                let arity = self.program.chunks.get(chunk).map(|chunk| chunk.arity);
                match start {
                    Some(start) if arity == Some(args) => self.frames.push(Frame::new(chunk, start)),
                    _ => {
                        log::trace!("invalid call to chunk {} with {} argument(s)", chunk, args);
                        self.discard(args, base);
                    },
                }
            },
            (_, args) => self.discard(args, base),
        }
    }

    /// Pops the arguments of a call that cannot be made, and pushes NaN in place of its result.
    fn discard(&mut self, args: usize, base: usize) {
        for _ in 0..args {
            self.pop(base);
        }
        self.stack.push(f64::NAN);
    }
}

/// Evaluates a compiled program against an environment.
pub trait Eval {
    /// Runs the program with the bindings in `env`, returning its value.
    fn eval(&self, env: &Env) -> f64;
}

impl Eval for Program {
    fn eval(&self, env: &Env) -> f64 {
        let mut vm = Vm::new(self);
        vm.bind(env);
        vm.eval()
    }
}
