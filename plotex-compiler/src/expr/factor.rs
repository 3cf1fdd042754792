use plotex_parser::parser::ast::{Bracket, Factor};
use crate::{Compile, Compiler};

impl Compile for Factor {
    fn compile(&self, compiler: &mut Compiler) {
        match self {
            Factor::Constant(constant) => constant.compile(compiler),
            Factor::Variable(var) => var.compile(compiler),
            Factor::Fraction(frac) => frac.compile(compiler),
            Factor::Exponent(pow) => pow.compile(compiler),
            Factor::Bracket(bracket) => bracket.compile(compiler),
            Factor::Unary(unary) => unary.compile(compiler),
            Factor::Log(log) => log.compile(compiler),
            Factor::Call(call) => call.compile(compiler),
        }
    }
}

impl Compile for Bracket {
    fn compile(&self, compiler: &mut Compiler) {
        self.inner.compile(compiler);
    }
}
