//! Linking and inlining of calls to user-defined functions.

use std::{collections::HashMap, sync::Arc};
use plotex_error::Error;
use crate::parser::{
    ast::{
        Bindings,
        Bracket,
        Equation,
        Expression,
        Factor,
        FunctionDefinition,
        FunctionKey,
        FunctionTable,
        Substitute,
    },
    error::RecursiveFunction,
};

/// Builds the error for a call to `key` made while `key` is already being linked or inlined.
fn recursion(stack: &[FunctionKey], key: FunctionKey) -> Error {
    let start = stack.iter().position(|k| *k == key).unwrap_or(0);
    let chain = stack[start..]
        .iter()
        .chain(std::iter::once(&key))
        .map(|(name, arity)| format!("{}({})", name, arity))
        .collect::<Vec<_>>()
        .join(" -> ");
    Error::new(Vec::new(), RecursiveFunction { name: key.0, chain })
}

/// Links calls to the definitions in a [`FunctionTable`].
///
/// Each definition is linked at most once per pass, and the linked copy is shared by every call
/// to it.
struct Linker<'a> {
    table: &'a FunctionTable,

    /// Definitions that have been completely linked.
    cache: HashMap<FunctionKey, Arc<FunctionDefinition>>,

    /// The definitions currently being linked, outermost first.
    stack: Vec<FunctionKey>,
}

impl<'a> Linker<'a> {
    fn new(table: &'a FunctionTable) -> Self {
        Self { table, cache: HashMap::new(), stack: Vec::new() }
    }

    fn link_expr(&mut self, expr: &mut Expression) -> Result<(), Error> {
        for factor in expr.items.iter_mut().flat_map(|item| &mut item.factors) {
            if let Factor::Call(call) = factor {
                call.definition = self.definition(call.key())?;
            }
            for child in factor.children_mut() {
                self.link_expr(child)?;
            }
        }
        Ok(())
    }

    /// Returns the linked copy of the definition with the given key, linking it if needed.
    fn definition(&mut self, key: FunctionKey) -> Result<Option<Arc<FunctionDefinition>>, Error> {
        if let Some(def) = self.cache.get(&key) {
            return Ok(Some(Arc::clone(def)));
        }

        let table = self.table;
        let Some(def) = table.get(key.0, key.1) else {
            return Ok(None);
        };
        if self.stack.contains(&key) {
            return Err(recursion(&self.stack, key));
        }

        self.stack.push(key);
        let mut linked = def.clone();
        self.link_expr(&mut linked.body)?;
        self.stack.pop();

        let linked = Arc::new(linked);
        self.cache.insert(key, Arc::clone(&linked));
        Ok(Some(linked))
    }
}

/// Replaces calls with the bodies of their definitions.
struct Inliner<'a> {
    table: &'a FunctionTable,

    /// The definitions currently being inlined, outermost first.
    stack: Vec<FunctionKey>,
}

impl<'a> Inliner<'a> {
    fn new(table: &'a FunctionTable) -> Self {
        Self { table, stack: Vec::new() }
    }

    fn inline_expr(&mut self, expr: &mut Expression) -> Result<(), Error> {
        for factor in expr.items.iter_mut().flat_map(|item| &mut item.factors) {
            self.inline_factor(factor)?;
        }
        Ok(())
    }

    fn inline_factor(&mut self, factor: &mut Factor) -> Result<(), Error> {
        // arguments first, so that the body receives already inlined expressions
        for child in factor.children_mut() {
            self.inline_expr(child)?;
        }

        let Factor::Call(call) = factor else {
            return Ok(());
        };

        let key = call.key();
        let table = self.table;
        let Some(def) = table.get(key.0, key.1) else {
            log::debug!("no definition for `{}` with {} argument(s), leaving the call", key.0, key.1);
            return Ok(());
        };
        if self.stack.contains(&key) {
            return Err(recursion(&self.stack, key));
        }

        let bindings = def.params.iter()
            .copied()
            .zip(call.args.iter().cloned().map(Substitute::Expr))
            .collect::<Bindings>();
        let mut body = def.body.clone();
        body.substitute(&bindings);

        self.stack.push(key);
        self.inline_expr(&mut body)?;
        self.stack.pop();

        *factor = Factor::Bracket(Bracket::new(body));
        Ok(())
    }
}

fn unlink_expr(expr: &mut Expression) {
    for factor in expr.items.iter_mut().flat_map(|item| &mut item.factors) {
        if let Factor::Call(call) = factor {
            call.definition = None;
        }
        for child in factor.children_mut() {
            unlink_expr(child);
        }
    }
}

impl Expression {
    /// Links every call in the expression to the definition in `table` with the same name and
    /// arity. Calls without a matching definition are left unlinked, and evaluate to NaN.
    ///
    /// Returns an error if a linked definition calls itself, directly or through other
    /// definitions. The expression may be partially linked in that case.
    pub fn link_functions(&mut self, table: &FunctionTable) -> Result<(), Error> {
        let mut linker = Linker::new(table);
        linker.link_expr(self)?;
        log::debug!("linked {} function definition(s)", linker.cache.len());
        Ok(())
    }

    /// Removes the links made by [`Expression::link_functions`].
    pub fn unlink_functions(&mut self) {
        unlink_expr(self);
    }

    /// Replaces every call that has a matching definition in `table` with a group containing the
    /// body of the definition, its parameters substituted with the arguments of the call.
    ///
    /// Calls without a matching definition are left in place. Returns an error if a definition
    /// calls itself, directly or through other definitions.
    pub fn replace_functions(&mut self, table: &FunctionTable) -> Result<(), Error> {
        Inliner::new(table).inline_expr(self)
    }
}

impl Equation {
    /// Links the calls on both sides. See [`Expression::link_functions`].
    pub fn link_functions(&mut self, table: &FunctionTable) -> Result<(), Error> {
        let mut linker = Linker::new(table);
        linker.link_expr(&mut self.lhs)?;
        linker.link_expr(&mut self.rhs)?;
        log::debug!("linked {} function definition(s)", linker.cache.len());
        Ok(())
    }

    /// Removes the links made by [`Equation::link_functions`].
    pub fn unlink_functions(&mut self) {
        unlink_expr(&mut self.lhs);
        unlink_expr(&mut self.rhs);
    }

    /// Inlines the calls on both sides. See [`Expression::replace_functions`].
    pub fn replace_functions(&mut self, table: &FunctionTable) -> Result<(), Error> {
        let mut inliner = Inliner::new(table);
        inliner.inline_expr(&mut self.lhs)?;
        inliner.inline_expr(&mut self.rhs)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::parser::parse;
    use super::*;

    #[test]
    fn linked_definitions_are_shared() {
        let table = ["f(t)=t+1"]
            .into_iter()
            .map(|def| parse::<FunctionDefinition>(def).unwrap())
            .collect::<FunctionTable>();
        let mut eq = parse::<Equation>("f(x)=f(y)").unwrap();
        eq.link_functions(&table).unwrap();

        let def = |expr: &Expression| match &expr.items[0].factors[0] {
            Factor::Call(call) => call.definition.clone(),
            other => panic!("expected a call, got {:?}", other),
        };
        let (lhs, rhs) = (def(&eq.lhs).unwrap(), def(&eq.rhs).unwrap());
        assert!(Arc::ptr_eq(&lhs, &rhs));

        eq.unlink_functions();
        assert!(!eq.link_complete());
        assert_eq!(eq.all_functions(), vec![('f', 1)]);
    }

    #[test]
    fn recursion_chain() {
        let err = recursion(&[('f', 1), ('g', 2)], ('g', 2));
        let kind = err.downcast_ref::<RecursiveFunction>().unwrap();
        assert_eq!(kind.chain, "g(2) -> g(2)");
    }
}
