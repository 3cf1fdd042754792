use plotex_parser::parser::ast::{Log, Unary};
use crate::{Compile, Compiler, Func, Instruction};

impl Compile for Unary {
    fn compile(&self, compiler: &mut Compiler) {
        self.arg.compile(compiler);
        compiler.add_instr(Instruction::Call { func: Func::Unary(self.func), arity: 1 });
    }
}

impl Compile for Log {
    fn compile(&self, compiler: &mut Compiler) {
        self.base.compile(compiler);
        self.antilog.compile(compiler);
        compiler.add_instr(Instruction::Call { func: Func::Log, arity: 2 });
    }
}
