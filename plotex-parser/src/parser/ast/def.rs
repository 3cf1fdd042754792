use std::{collections::HashMap, fmt, ops::Range};
use plotex_error::Error;
use crate::{
    parser::{
        error::InvalidDefinition,
        fmt::Latex,
        Parse,
    },
    tokenizer::{Token, TokenKind},
};
use super::Expression;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifies a user-defined function by its name and number of parameters.
pub type FunctionKey = (char, usize);

/// Returns the span of the token at `index`, or of the last token if there is no such token.
fn span_at(tokens: &[Token], index: usize) -> Vec<Range<usize>> {
    tokens.get(index)
        .or_else(|| tokens.last())
        .map(|token| token.span.clone())
        .into_iter()
        .collect()
}

fn invalid(tokens: &[Token], index: usize, reason: impl Into<String>) -> Error {
    Error::new(span_at(tokens, index), InvalidDefinition { reason: reason.into() })
}

/// A definition of a numeric variable, such as `a=2`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VariableDefinition {
    /// The name of the variable.
    pub name: char,

    /// The value of the variable.
    pub value: f64,
}

impl VariableDefinition {
    fn try_parse(tokens: &[Token]) -> Result<Self, Error> {
        let name = match tokens.first().map(|token| token.kind) {
            Some(TokenKind::Letter('x' | 'y')) => {
                return Err(invalid(tokens, 0, "`x` and `y` are coordinates, and cannot be defined"));
            },
            Some(TokenKind::Letter('e')) => {
                return Err(invalid(tokens, 0, "`e` is a constant, and cannot be defined"));
            },
            Some(TokenKind::Letter(name)) => name,
            _ => return Err(invalid(tokens, 0, "expected the name of the variable")),
        };

        if tokens.get(1).map(|token| token.kind) != Some(TokenKind::Assign) {
            return Err(invalid(tokens, 1, "expected `=` after the name"));
        }

        let value = match &tokens[2..] {
            [Token { kind: TokenKind::Number(value), .. }] => *value,
            [sign, Token { kind: TokenKind::Number(value), .. }] if sign.kind.is_sign() => {
                if sign.kind == TokenKind::Sub { -value } else { *value }
            },
            _ => return Err(invalid(tokens, 2, "the value of a variable must be a number")),
        };

        Ok(Self { name, value })
    }
}

impl Parse for VariableDefinition {
    fn parse(tokens: &[Token]) -> Option<Self> {
        Self::try_parse(tokens).ok()
    }

    fn explain(tokens: &[Token]) -> Error {
        match Self::try_parse(tokens) {
            Err(err) => err,
            Ok(_) => invalid(tokens, 0, "this definition is valid"),
        }
    }
}

impl Latex for VariableDefinition {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// The part of a function definition before its body, along with the index of the first token
/// of the body.
struct Header {
    name: char,
    params: Vec<char>,
    body_start: usize,
}

/// Reads the `f(a,b)=` part of a function definition.
fn header(tokens: &[Token]) -> Result<Header, Error> {
    let name = match tokens.first().map(|token| token.kind) {
        Some(TokenKind::Letter(name)) if name != 'e' => name,
        _ => return Err(invalid(tokens, 0, "expected the name of the function")),
    };

    if tokens.get(1).map(|token| token.kind) != Some(TokenKind::OpenParen) {
        return Err(invalid(tokens, 1, "expected `(` after the name"));
    }

    let mut params = Vec::new();
    let mut i = 2;
    loop {
        match tokens.get(i).map(|token| token.kind) {
            Some(TokenKind::Letter(param)) if param != 'e' => {
                if params.contains(&param) {
                    return Err(invalid(tokens, i, format!("`{}` is already a parameter", param)));
                }
                params.push(param);
            },
            _ => return Err(invalid(tokens, i, "expected the name of a parameter")),
        }
        i += 1;

        match tokens.get(i).map(|token| token.kind) {
            Some(TokenKind::Comma) => i += 1,
            Some(TokenKind::CloseParen) => break,
            _ => return Err(invalid(tokens, i, "expected `,` or `)` after the parameter")),
        }
    }
    i += 1;

    if tokens.get(i).map(|token| token.kind) != Some(TokenKind::Assign) {
        return Err(invalid(tokens, i, "expected `=` after the parameters"));
    }
    if i + 1 == tokens.len() {
        return Err(invalid(tokens, i, "the function has no body"));
    }

    Ok(Header { name, params, body_start: i + 1 })
}

/// A definition of a function of one or more parameters, such as `f(t)=t^2+1`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionDefinition {
    /// The name of the function.
    pub name: char,

    /// The names of the parameters, in order. They are distinct.
    pub params: Vec<char>,

    /// The body of the function.
    pub body: Expression,

    /// The free variables of the body that are not parameters, in order of first appearance.
    /// Their values come from the environment the function is called in.
    pub extra_free_vars: Vec<char>,
}

impl FunctionDefinition {
    /// Creates a function definition, computing its extra free variables.
    pub fn new(name: char, params: Vec<char>, body: Expression) -> Self {
        let extra_free_vars = body.free_vars()
            .into_iter()
            .filter(|var| !params.contains(var))
            .collect();
        Self { name, params, body, extra_free_vars }
    }

    /// Returns the `(name, arity)` pair that identifies this function.
    pub fn key(&self) -> FunctionKey {
        (self.name, self.params.len())
    }
}

impl Parse for FunctionDefinition {
    fn parse(tokens: &[Token]) -> Option<Self> {
        let Header { name, params, body_start } = header(tokens).ok()?;
        let body = Expression::parse(&tokens[body_start..])?;
        Some(Self::new(name, params, body))
    }

    fn explain(tokens: &[Token]) -> Error {
        match header(tokens) {
            Ok(Header { body_start, .. }) => Expression::explain(&tokens[body_start..]),
            Err(err) => err,
        }
    }
}

impl Latex for FunctionDefinition {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")=")?;
        self.body.fmt_latex(f)
    }
}

/// The user-defined functions available to a computation, keyed by name and arity.
///
/// Functions with the same name but different arities are distinct.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionTable {
    defs: HashMap<FunctionKey, FunctionDefinition>,
}

impl FunctionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition, returning the definition it replaces, if any.
    pub fn insert(&mut self, def: FunctionDefinition) -> Option<FunctionDefinition> {
        self.defs.insert(def.key(), def)
    }

    /// Returns the definition of the function with the given name and arity.
    pub fn get(&self, name: char, arity: usize) -> Option<&FunctionDefinition> {
        self.defs.get(&(name, arity))
    }

    /// Removes the definition of the function with the given name and arity.
    pub fn remove(&mut self, name: char, arity: usize) -> Option<FunctionDefinition> {
        self.defs.remove(&(name, arity))
    }

    /// Returns an iterator over the definitions, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &FunctionDefinition> + '_ {
        self.defs.values()
    }

    /// Returns the number of definitions in the table.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Returns true if the table has no definitions.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl FromIterator<FunctionDefinition> for FunctionTable {
    fn from_iter<I: IntoIterator<Item = FunctionDefinition>>(iter: I) -> Self {
        Self {
            defs: iter.into_iter().map(|def| (def.key(), def)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::{parser::error::InvalidDefinition, tokenizer::tokenize};
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input).unwrap()
    }

    #[test]
    fn variable_definitions() {
        assert_eq!(
            VariableDefinition::parse(&tokens("a=3")),
            Some(VariableDefinition { name: 'a', value: 3.0 }),
        );
        assert_eq!(
            VariableDefinition::parse(&tokens("b = -2.5")),
            Some(VariableDefinition { name: 'b', value: -2.5 }),
        );
        assert_eq!(
            VariableDefinition::parse(&tokens("c=+1")),
            Some(VariableDefinition { name: 'c', value: 1.0 }),
        );
    }

    #[test]
    fn coordinates_are_not_variables() {
        assert_eq!(VariableDefinition::parse(&tokens("x=3")), None);
        assert_eq!(VariableDefinition::parse(&tokens("y=3")), None);

        let err = VariableDefinition::explain(&tokens("x=3"));
        assert!(err.is::<InvalidDefinition>());
        assert_eq!(err.spans, vec![0..1]);
    }

    #[test]
    fn variable_value_must_be_a_number() {
        assert_eq!(VariableDefinition::parse(&tokens("a=2b")), None);
        assert_eq!(VariableDefinition::parse(&tokens("a=--2")), None);
        let err = VariableDefinition::explain(&tokens("a=2b"));
        assert_eq!(err.spans, vec![2..3]);
    }

    #[test]
    fn function_definition() {
        let def = FunctionDefinition::parse(&tokens("f(a,b)=a^2+bk")).unwrap();
        assert_eq!(def.name, 'f');
        assert_eq!(def.params, vec!['a', 'b']);
        assert_eq!(def.extra_free_vars, vec!['k']);
        assert_eq!(def.key(), ('f', 2));
        assert_eq!(def.as_display().to_string(), "f(a,b)=a^{2}+bk");
    }

    #[test]
    fn repeated_parameter() {
        let tokens = tokens("f(a,a)=a");
        assert_eq!(FunctionDefinition::parse(&tokens), None);

        let err = FunctionDefinition::explain(&tokens);
        let kind = err.downcast_ref::<InvalidDefinition>().unwrap();
        assert_eq!(kind.reason, "`a` is already a parameter");
        assert_eq!(err.spans, vec![4..5]);
    }

    #[test]
    fn malformed_function_headers() {
        for input in ["f()=1", "f(a=1", "f(a,)=a", "f(a)", "f(a)=", "f(2)=2", "(a)=a"] {
            assert_eq!(FunctionDefinition::parse(&tokens(input)), None, "{}", input);
        }
    }

    #[test]
    fn table_lookup_by_arity() {
        let table = ["f(t)=t", "f(a,b)=a+b"]
            .into_iter()
            .map(|input| FunctionDefinition::parse(&tokens(input)).unwrap())
            .collect::<FunctionTable>();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get('f', 1).map(|def| def.params.len()), Some(1));
        assert_eq!(table.get('f', 2).map(|def| def.params.len()), Some(2));
        assert!(table.get('f', 3).is_none());
    }
}
