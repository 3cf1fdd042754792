use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An explicit binding environment, mapping variable names to values.
///
/// Evaluation never mutates the tree it evaluates; the values of variables are instead passed
/// in through an [`Env`], so the same tree or compiled program can be evaluated from several
/// threads at once, each with its own environment.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Env {
    vars: HashMap<char, f64>,
}

impl Env {
    /// Creates an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding. Returns an updated [`Env`] for chaining.
    pub fn with(mut self, name: char, value: f64) -> Self {
        self.vars.insert(name, value);
        self
    }

    /// Binds `name` to `value`, returning the previous value.
    pub fn set(&mut self, name: char, value: f64) -> Option<f64> {
        self.vars.insert(name, value)
    }

    /// Removes the binding for `name`.
    pub fn remove(&mut self, name: char) -> Option<f64> {
        self.vars.remove(&name)
    }

    /// Returns the value bound to `name`.
    pub fn get(&self, name: char) -> Option<f64> {
        self.vars.get(&name).copied()
    }

    /// Returns true if `name` is bound.
    pub fn contains(&self, name: char) -> bool {
        self.vars.contains_key(&name)
    }

    /// Returns an iterator over the bindings, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (char, f64)> + '_ {
        self.vars.iter().map(|(name, value)| (*name, *value))
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns true if there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl FromIterator<(char, f64)> for Env {
    fn from_iter<I: IntoIterator<Item = (char, f64)>>(iter: I) -> Self {
        Self { vars: iter.into_iter().collect() }
    }
}

impl Extend<(char, f64)> for Env {
    fn extend<I: IntoIterator<Item = (char, f64)>>(&mut self, iter: I) {
        self.vars.extend(iter);
    }
}

/// The scope a node is evaluated in: the caller's environment, plus the arguments of the user
/// function currently being evaluated, if any.
///
/// Function bodies see their own parameters and the global environment, never the parameters of
/// the function that called them.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope<'a> {
    env: &'a Env,
    locals: &'a [(char, f64)],
}

impl<'a> Scope<'a> {
    /// Creates the outermost scope for the given environment.
    pub fn new(env: &'a Env) -> Self {
        Self { env, locals: &[] }
    }

    /// Creates the scope of a function body with the given parameter bindings.
    pub fn enter<'b>(&self, locals: &'b [(char, f64)]) -> Scope<'b>
    where
        'a: 'b,
    {
        Scope { env: self.env, locals }
    }

    /// Looks up a variable, preferring function parameters over the environment.
    pub fn get(&self, name: char) -> Option<f64> {
        self.locals.iter()
            .find(|(local, _)| *local == name)
            .map(|(_, value)| *value)
            .or_else(|| self.env.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_lookup() {
        let env = Env::new().with('x', 2.0).with('a', -1.5);
        assert_eq!(env.get('x'), Some(2.0));
        assert_eq!(env.get('a'), Some(-1.5));
        assert_eq!(env.get('y'), None);
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn locals_shadow_env() {
        let env = Env::new().with('t', 1.0).with('a', 5.0);
        let locals = [('t', 9.0)];
        let scope = Scope::new(&env).enter(&locals);
        assert_eq!(scope.get('t'), Some(9.0));
        assert_eq!(scope.get('a'), Some(5.0));
    }
}
