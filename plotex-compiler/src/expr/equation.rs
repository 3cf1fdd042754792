use plotex_parser::parser::ast::Equation;
use crate::{Compile, Compiler, Instruction};

/// Compiles the difference of the two sides, which is zero wherever the equation holds.
impl Compile for Equation {
    fn compile(&self, compiler: &mut Compiler) {
        self.lhs.compile(compiler);
        self.rhs.compile(compiler);
        compiler.add_instr(Instruction::Sub);
    }
}
