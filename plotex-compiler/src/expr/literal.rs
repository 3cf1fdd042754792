use plotex_parser::parser::ast::{Constant, Variable};
use crate::{Compile, Compiler, Instruction};

impl Compile for Constant {
    fn compile(&self, compiler: &mut Compiler) {
        compiler.add_instr(Instruction::PushConst(self.value()));
    }
}

impl Compile for Variable {
    fn compile(&self, compiler: &mut Compiler) {
        // hidden substitution takes priority over parameters and the environment
        match self.bound {
            Some(value) => compiler.add_instr(Instruction::PushConst(value)),
            None => compiler.load_var(self.name),
        }
    }
}
