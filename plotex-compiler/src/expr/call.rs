use plotex_parser::parser::ast::Call;
use crate::{Compile, Compiler, Func, Instruction};

impl Compile for Call {
    fn compile(&self, compiler: &mut Compiler) {
        let Some(def) = &self.definition else {
            log::debug!("call to `{}` is not linked, compiling it as NaN", self.name);
            compiler.add_instr(Instruction::PushConst(f64::NAN));
            return;
        };

        for arg in &self.args {
            arg.compile(compiler);
        }
        let chunk = compiler.function_chunk(def);
        compiler.add_instr(Instruction::Call { func: Func::User(chunk), arity: self.args.len() });
    }
}
