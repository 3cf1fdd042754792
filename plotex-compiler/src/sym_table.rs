/// A symbol table that maps the names of free variables to the slots they are loaded from.
///
/// Slots are assigned in order of first appearance during compilation, starting at 0. Function
/// parameters never appear in the table; they are loaded with
/// [`Instruction::PushArg`](crate::Instruction::PushArg) instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    names: Vec<char>,
}

impl SymbolTable {
    /// Creates an empty symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot of the given variable, if it has one.
    pub fn resolve(&self, name: char) -> Option<usize> {
        self.names.iter().position(|n| *n == name)
    }

    /// Returns the slot of the given variable, assigning it the next free slot if needed.
    pub fn resolve_or_insert(&mut self, name: char) -> usize {
        self.resolve(name).unwrap_or_else(|| {
            self.names.push(name);
            self.names.len() - 1
        })
    }

    /// Returns the names of the variables, indexed by slot.
    pub fn names(&self) -> &[char] {
        &self.names
    }

    /// Consumes the table, returning the names of the variables indexed by slot.
    pub fn into_names(self) -> Vec<char> {
        self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_in_order() {
        let mut table = SymbolTable::new();
        assert_eq!(table.resolve_or_insert('y'), 0);
        assert_eq!(table.resolve_or_insert('x'), 1);
        assert_eq!(table.resolve_or_insert('y'), 0);
        assert_eq!(table.resolve('x'), Some(1));
        assert_eq!(table.resolve('a'), None);
        assert_eq!(table.names(), &['y', 'x']);
    }
}
