use plotex_parser::parser::ast::{Exponent, Fraction};
use crate::{Compile, Compiler, Instruction};

impl Compile for Fraction {
    fn compile(&self, compiler: &mut Compiler) {
        self.numerator.compile(compiler);
        self.denominator.compile(compiler);
        compiler.add_instr(Instruction::Div);
    }
}

impl Compile for Exponent {
    fn compile(&self, compiler: &mut Compiler) {
        self.base.compile(compiler);
        self.exponent.compile(compiler);
        compiler.add_instr(Instruction::Pow);
    }
}
