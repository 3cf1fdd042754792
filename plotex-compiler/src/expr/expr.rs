use plotex_parser::parser::ast::{Expression, Item};
use crate::{Compile, Compiler, Instruction};

/// Compiles the product of the factors of an item, ignoring its sign.
fn compile_product(item: &Item, compiler: &mut Compiler) {
    let mut factors = item.factors.iter();
    let Some(first) = factors.next() else {
        compiler.add_instr(Instruction::PushConst(1.0));
        return;
    };

    first.compile(compiler);
    for factor in factors {
        factor.compile(compiler);
        compiler.add_instr(Instruction::Mul);
    }
}

impl Compile for Item {
    fn compile(&self, compiler: &mut Compiler) {
        if self.positive {
            compile_product(self, compiler);
        } else {
            compiler.add_instr(Instruction::PushConst(0.0));
            compile_product(self, compiler);
            compiler.add_instr(Instruction::Sub);
        }
    }
}

impl Compile for Expression {
    fn compile(&self, compiler: &mut Compiler) {
        let mut items = self.items.iter();
        let Some(first) = items.next() else {
            compiler.add_instr(Instruction::PushConst(0.0));
            return;
        };

        first.compile(compiler);
        for item in items {
            compile_product(item, compiler);
            compiler.add_instr(if item.positive { Instruction::Add } else { Instruction::Sub });
        }
    }
}
