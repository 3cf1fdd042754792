//! Compiles plotex expressions and equations into flat programs for a stack machine.
//!
//! Sampling a curve evaluates the same expression thousands of times with different values of
//! `x` and `y`. Walking the syntax tree for each point repeats the same dispatch over and over, so
//! the tree is compiled once into a [`Program`]: a list of [`Chunk`]s of [`Instruction`]s, where
//! chunk 0 is the expression itself, and each other chunk is the body of a linked user-defined
//! function.
//!
//! Free variables are given slots in a [`SymbolTable`], in order of first appearance. Running a
//! program produces the same value as [`Expression::compute`] with the same bindings, bit for bit.
//!
//! ```
//! use plotex_compiler::{Compiler, Instruction::*};
//! use plotex_parser::parser::{ast::Expression, parse};
//!
//! let expr = parse::<Expression>("x^2+1").unwrap();
//! let program = Compiler::compile(&expr);
//! assert_eq!(program.chunks[0].instructions, vec![
//!     PushVar(0),
//!     PushConst(2.0),
//!     Pow,
//!     PushConst(1.0),
//!     Add,
//! ]);
//! assert_eq!(program.symbols, vec!['x']);
//! ```

mod expr;
pub mod instruction;
pub mod sym_table;

use std::{fmt, sync::Arc};
use plotex_parser::parser::ast::FunctionDefinition;
pub use instruction::{Func, Instruction};
pub use sym_table::SymbolTable;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A chunk of instructions that computes a single value.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chunk {
    /// The instructions in this chunk.
    pub instructions: Vec<Instruction>,

    /// The number of arguments the chunk takes. This is 0 for the main chunk.
    pub arity: usize,
}

impl Chunk {
    /// Creates a new chunk with the given arity.
    pub fn new(arity: usize) -> Self {
        Self {
            instructions: Vec::new(),
            arity,
        }
    }
}

/// The output of the [`Compiler`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Program {
    /// The chunks of the program. Chunk 0 is the entry point.
    pub chunks: Vec<Chunk>,

    /// The names of the free variables, indexed by the slot they are loaded from.
    pub symbols: Vec<char>,
}

impl Program {
    /// Returns the slot the given variable is loaded from, if the program reads it.
    pub fn slot(&self, name: char) -> Option<usize> {
        self.symbols.iter().position(|n| *n == name)
    }
}

/// Prints a disassembly of the program.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, chunk) in self.chunks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "chunk {} (arity {}):", i, chunk.arity)?;
            for (pc, instr) in chunk.instructions.iter().enumerate() {
                write!(f, "  {:04} {}", pc, instr)?;
                match instr {
                    Instruction::PushVar(slot) => match self.symbols.get(*slot) {
                        Some(name) => writeln!(f, "  ; {}", name)?,
                        None => writeln!(f)?,
                    },
                    _ => writeln!(f)?,
                }
            }
        }
        Ok(())
    }
}

/// A compiler that generates [`Program`]s from plotex syntax trees.
///
/// Most users only need [`Compiler::compile`]. The other methods are used by the [`Compile`]
/// implementations of each node.
#[derive(Clone, Debug)]
pub struct Compiler {
    /// The bytecode chunks generated so far. Chunk 0 is the main chunk.
    pub chunks: Vec<Chunk>,

    /// Slots of the free variables read so far.
    pub sym_table: SymbolTable,

    /// Index of the chunk instructions are added to.
    chunk: usize,

    /// Parameters of the function whose body is being compiled. Empty in the main chunk.
    params: Vec<char>,

    /// Linked definitions that already have a chunk, with the index of that chunk.
    functions: Vec<(Arc<FunctionDefinition>, usize)>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self {
            chunks: vec![Chunk::default()], // add main chunk
            sym_table: SymbolTable::default(),
            chunk: 0,
            params: Vec::new(),
            functions: Vec::new(),
        }
    }
}

impl Compiler {
    /// Creates a new compiler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles the given node into a [`Program`].
    pub fn compile<T: Compile>(node: T) -> Program {
        let mut compiler = Self::new();
        node.compile(&mut compiler);
        compiler.finish()
    }

    /// Consumes the compiler, returning the compiled program.
    pub fn finish(self) -> Program {
        log::debug!(
            "compiled {} chunk(s) reading {} variable(s)",
            self.chunks.len(),
            self.sym_table.names().len(),
        );
        Program {
            chunks: self.chunks,
            symbols: self.sym_table.into_names(),
        }
    }

    /// Returns a mutable reference to the current chunk.
    pub fn chunk_mut(&mut self) -> &mut Chunk {
        &mut self.chunks[self.chunk]
    }

    /// Adds an instruction to the current chunk.
    pub fn add_instr(&mut self, instr: Instruction) {
        self.chunk_mut().instructions.push(instr);
    }

    /// Adds the instruction that loads the given variable: [`Instruction::PushArg`] for a
    /// parameter of the function being compiled, or [`Instruction::PushVar`] for anything else.
    pub fn load_var(&mut self, name: char) {
        let instr = match self.params.iter().position(|param| *param == name) {
            Some(index) => Instruction::PushArg(index),
            None => Instruction::PushVar(self.sym_table.resolve_or_insert(name)),
        };
        self.add_instr(instr);
    }

    /// Returns the index of the chunk containing the body of the given definition, compiling it
    /// into a new chunk if it has not been compiled yet.
    pub fn function_chunk(&mut self, def: &Arc<FunctionDefinition>) -> usize {
        if let Some((_, chunk)) = self.functions.iter().find(|(f, _)| Arc::ptr_eq(f, def)) {
            return *chunk;
        }

        self.chunks.push(Chunk::new(def.params.len()));
        let new_chunk = self.chunks.len() - 1;
        self.functions.push((Arc::clone(def), new_chunk));

        let old_chunk = std::mem::replace(&mut self.chunk, new_chunk);
        let old_params = std::mem::replace(&mut self.params, def.params.clone());
        def.body.compile(self);
        self.params = old_params;
        self.chunk = old_chunk;

        new_chunk
    }
}

/// Any node that can be compiled into bytecode.
///
/// Compilation never fails. Calls that are not linked to a definition compile to NaN, matching
/// what they evaluate to.
pub trait Compile {
    /// Adds the instructions that compute the node to the current chunk of the compiler.
    ///
    /// The instructions leave exactly one value on the stack.
    fn compile(&self, compiler: &mut Compiler);
}

impl<T: Compile> Compile for &T {
    fn compile(&self, compiler: &mut Compiler) {
        (*self).compile(compiler)
    }
}
