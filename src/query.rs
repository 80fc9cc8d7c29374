//! Relaxed Mongo-style query compilation and matching.
//!
//! A query like `status:published,id:{$in:[1,2]}` parses into the same
//! document shape as the strict form `{"status": "published", "id":
//! {"$in": [1, 2]}}` and compiles to a predicate tree. Matching is an
//! implicit AND over top-level clauses; equality is structural; nested
//! plain objects constrain the corresponding sub-object field by field.
//!
//! The supported operator set is deliberately minimal: equality, `$in`,
//! and nested sub-matching. Other Mongo-style operators are an extension
//! point and compile to [`QueryError::UnsupportedOperator`].

use indexmap::IndexMap;

use crate::lexer::{Lexer, Token};
use crate::value::Value;

/// Errors raised while compiling a query expression.
///
/// A query that fails to compile is a configuration mistake, not a data
/// condition: callers fail the whole invocation before reading any input.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Character the relaxed syntax cannot start a token with
    UnexpectedChar { ch: char, position: usize },
    /// Quoted string with no closing quote
    UnterminatedString,
    /// Numeric literal out of range or malformed
    InvalidNumber(String),
    /// Token out of place for the grammar
    UnexpectedToken(String),
    /// A `$`-operator outside the supported set
    UnsupportedOperator(String),
    /// An object mixing `$`-operators with plain fields
    MixedConstraint(String),
    /// A supported operator with the wrong operand shape
    InvalidOperand {
        operator: String,
        expected: &'static str,
    },
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::UnexpectedChar { ch, position } => {
                write!(f, "Unexpected character '{}' at position {}", ch, position)
            }
            QueryError::UnterminatedString => write!(f, "Unterminated string in query"),
            QueryError::InvalidNumber(n) => write!(f, "Invalid number '{}' in query", n),
            QueryError::UnexpectedToken(t) => write!(f, "Unexpected {} in query", t),
            QueryError::UnsupportedOperator(op) => {
                write!(f, "Unsupported query operator '{}'", op)
            }
            QueryError::MixedConstraint(field) => {
                write!(
                    f,
                    "Query object cannot mix operators and fields (found '{}')",
                    field
                )
            }
            QueryError::InvalidOperand { operator, expected } => {
                write!(f, "Operator '{}' expects {}", operator, expected)
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// Parses the relaxed query syntax into a query document.
///
/// Outer braces are optional: `id:1,name:x` and `{id:1,name:x}` produce
/// the same document.
struct QueryParser {
    lexer: Lexer,
    current_token: Token,
}

impl QueryParser {
    fn new(mut lexer: Lexer) -> Result<Self, QueryError> {
        let current_token = lexer.next_token()?;
        Ok(QueryParser {
            lexer,
            current_token,
        })
    }

    fn advance(&mut self) -> Result<(), QueryError> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> Result<(), QueryError> {
        if std::mem::discriminant(&self.current_token) != std::mem::discriminant(&expected) {
            return Err(QueryError::UnexpectedToken(format!(
                "{:?} (expected {:?})",
                self.current_token, expected
            )));
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(&self.current_token) == std::mem::discriminant(token)
    }

    /// Parse a whole query text: a braced object, or a brace-less list of
    /// members running to end of input.
    fn parse_document(&mut self) -> Result<Value, QueryError> {
        let doc = if self.check(&Token::LBrace) {
            self.advance()?;
            let doc = self.parse_members(&Token::RBrace)?;
            self.expect(Token::RBrace)?;
            doc
        } else {
            self.parse_members(&Token::Eof)?
        };

        self.expect(Token::Eof)?;
        Ok(doc)
    }

    fn parse_members(&mut self, terminator: &Token) -> Result<Value, QueryError> {
        let mut members = IndexMap::new();

        while !self.check(terminator) {
            let key = self.parse_key()?;
            self.expect(Token::Colon)?;
            let value = self.parse_value()?;
            members.insert(key, value);

            if !self.check(terminator) {
                self.expect(Token::Comma)?;
            }
        }

        Ok(Value::Object(members))
    }

    fn parse_key(&mut self) -> Result<String, QueryError> {
        match std::mem::replace(&mut self.current_token, Token::Eof) {
            Token::Ident(name) | Token::String(name) | Token::Operator(name) => {
                self.advance()?;
                Ok(name)
            }
            token => Err(QueryError::UnexpectedToken(format!(
                "{:?} (expected a key)",
                token
            ))),
        }
    }

    fn parse_value(&mut self) -> Result<Value, QueryError> {
        match std::mem::replace(&mut self.current_token, Token::Eof) {
            // Bare words are string values
            Token::Ident(s) | Token::String(s) => {
                self.advance()?;
                Ok(Value::String(s))
            }
            Token::Integer(n) => {
                self.advance()?;
                Ok(Value::Integer(n))
            }
            Token::Float(n) => {
                self.advance()?;
                Ok(Value::Float(n))
            }
            Token::Boolean(b) => {
                self.advance()?;
                Ok(Value::Boolean(b))
            }
            Token::Null => {
                self.advance()?;
                Ok(Value::Null)
            }
            Token::LBrace => {
                self.advance()?;
                let obj = self.parse_members(&Token::RBrace)?;
                self.expect(Token::RBrace)?;
                Ok(obj)
            }
            Token::LBracket => {
                self.advance()?;
                self.parse_array()
            }
            token => Err(QueryError::UnexpectedToken(format!(
                "{:?} (expected a value)",
                token
            ))),
        }
    }

    fn parse_array(&mut self) -> Result<Value, QueryError> {
        let mut elements = vec![];

        while !self.check(&Token::RBracket) {
            elements.push(self.parse_value()?);

            if !self.check(&Token::RBracket) {
                self.expect(Token::Comma)?;
            }
        }

        self.expect(Token::RBracket)?;
        Ok(Value::Array(elements))
    }
}

/// Parse relaxed query text into its document shape without compiling it.
pub fn parse_relaxed(text: &str) -> Result<Value, QueryError> {
    QueryParser::new(Lexer::new(text))?.parse_document()
}

/// A single field constraint in a compiled query.
#[derive(Debug, Clone, PartialEq)]
enum Constraint {
    /// Structural equality against a literal
    Equals(Value),
    /// Membership in a literal list (`$in`)
    In(Vec<Value>),
    /// Structural sub-match: every inner clause constrains the sub-object
    Fields(Vec<(String, Constraint)>),
}

/// A compiled query expression: an implicit AND over field constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    clauses: Vec<(String, Constraint)>,
}

impl Query {
    /// Compile relaxed query text into a predicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use jove::query::Query;
    /// use jove::parser::parse;
    ///
    /// let q = Query::compile("id:199356").unwrap();
    /// let hit = parse(r#"{"id": 199356}"#).unwrap().unwrap();
    /// let miss = parse(r#"{"id": 199368}"#).unwrap().unwrap();
    /// assert!(q.matches(&hit));
    /// assert!(!q.matches(&miss));
    /// ```
    pub fn compile(text: &str) -> Result<Query, QueryError> {
        let doc = parse_relaxed(text)?;
        let Value::Object(members) = doc else {
            return Err(QueryError::UnexpectedToken(
                "non-object query document".to_string(),
            ));
        };

        Ok(Query {
            clauses: compile_clauses(members)?,
        })
    }

    /// Whether an element satisfies every clause of the query.
    pub fn matches(&self, element: &Value) -> bool {
        self.clauses
            .iter()
            .all(|(key, constraint)| constraint.matches(element.get(key)))
    }

    /// Keep the matching elements, preserving their relative order.
    pub fn filter(&self, items: Vec<Value>) -> Vec<Value> {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

fn compile_clauses(members: IndexMap<String, Value>) -> Result<Vec<(String, Constraint)>, QueryError> {
    members
        .into_iter()
        .map(|(key, value)| {
            if key.starts_with('$') {
                // Operators only make sense inside a field's constraint
                return Err(QueryError::UnsupportedOperator(key));
            }
            Ok((key, compile_constraint(value)?))
        })
        .collect()
}

fn compile_constraint(value: Value) -> Result<Constraint, QueryError> {
    match value {
        Value::Object(members) => {
            if members.keys().any(|k| k.starts_with('$')) {
                compile_operator(members)
            } else {
                Ok(Constraint::Fields(compile_clauses(members)?))
            }
        }
        literal => Ok(Constraint::Equals(literal)),
    }
}

/// Compile an operator object like `{"$in": [...]}`. Exactly one supported
/// operator is accepted; anything else names the offending key.
fn compile_operator(members: IndexMap<String, Value>) -> Result<Constraint, QueryError> {
    let mut compiled = None;

    for (op, operand) in members {
        match op.as_str() {
            "$in" => match operand {
                Value::Array(items) => compiled = Some(Constraint::In(items)),
                _ => {
                    return Err(QueryError::InvalidOperand {
                        operator: op,
                        expected: "an array of values",
                    });
                }
            },
            op if !op.starts_with('$') => return Err(QueryError::MixedConstraint(op.to_string())),
            _ => return Err(QueryError::UnsupportedOperator(op)),
        }
    }

    // Unreachable in practice: callers only get here with at least one $ key
    compiled.ok_or(QueryError::UnexpectedToken("empty operator object".to_string()))
}

impl Constraint {
    fn matches(&self, target: Option<&Value>) -> bool {
        match self {
            // Mongo semantics: equality with null also matches a missing field
            Constraint::Equals(expected) => match target {
                Some(actual) => actual == expected,
                None => *expected == Value::Null,
            },
            Constraint::In(list) => match target {
                Some(actual) => list.contains(actual),
                None => list.contains(&Value::Null),
            },
            Constraint::Fields(fields) => match target {
                Some(sub) => fields
                    .iter()
                    .all(|(key, constraint)| constraint.matches(sub.get(key))),
                None => false,
            },
        }
    }
}
