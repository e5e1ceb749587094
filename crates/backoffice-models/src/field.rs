//! Field expressions used to describe which fields of an entity to fetch.
//!
//! A field expression is either a plain field (`status`) or a related
//! entity with its own sub-fields (`jobOrder(id,title,owner(id,name))`).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced while parsing a field expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldExprError {
    /// Input (or a nested list) was empty.
    #[error("empty field expression at offset {0}")]
    Empty(usize),

    /// A character that cannot appear in a field name.
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    /// Parentheses do not balance.
    #[error("unbalanced parentheses in '{0}'")]
    Unbalanced(String),
}

/// A parsed field expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldExpr {
    name: String,
    children: Vec<FieldExpr>,
}

impl FieldExpr {
    /// Creates a plain field.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Creates a related-entity field with sub-fields.
    pub fn related(name: impl Into<String>, children: Vec<FieldExpr>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[FieldExpr] {
        &self.children
    }

    /// Returns true if this expression selects fields of a related entity.
    pub fn is_related(&self) -> bool {
        !self.children.is_empty()
    }

    /// Parses a comma separated list of expressions, e.g. `id,name,owner(id)`.
    pub fn parse_list(input: &str) -> Result<Vec<FieldExpr>, FieldExprError> {
        let mut parser = Parser::new(input);
        let list = parser.list()?;
        parser.skip_ws();
        match parser.peek() {
            None => Ok(list),
            Some(')') => Err(FieldExprError::Unbalanced(input.to_string())),
            Some(ch) => Err(FieldExprError::UnexpectedChar {
                ch,
                offset: parser.pos,
            }),
        }
    }
}

impl FromStr for FieldExpr {
    type Err = FieldExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut list = FieldExpr::parse_list(s)?;
        if list.len() != 1 {
            let offset = s.find(',').unwrap_or(0);
            return Err(FieldExprError::UnexpectedChar { ch: ',', offset });
        }
        Ok(list.remove(0))
    }
}

impl fmt::Display for FieldExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.children.is_empty() {
            f.write_str("(")?;
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", child)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn list(&mut self) -> Result<Vec<FieldExpr>, FieldExprError> {
        let mut items = vec![self.expr()?];
        loop {
            self.skip_ws();
            if self.peek() == Some(',') {
                self.pos += 1;
                items.push(self.expr()?);
            } else {
                return Ok(items);
            }
        }
    }

    fn expr(&mut self) -> Result<FieldExpr, FieldExprError> {
        self.skip_ws();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }

        if self.pos == start {
            return match self.peek() {
                None | Some(',') | Some(')') => Err(FieldExprError::Empty(start)),
                Some(ch) => Err(FieldExprError::UnexpectedChar { ch, offset: start }),
            };
        }
        if self.chars[start].is_ascii_digit() {
            return Err(FieldExprError::UnexpectedChar {
                ch: self.chars[start],
                offset: start,
            });
        }

        let name: String = self.chars[start..self.pos].iter().collect();
        self.skip_ws();
        if self.peek() != Some('(') {
            return Ok(FieldExpr::field(name));
        }

        self.pos += 1;
        let children = self.list()?;
        self.skip_ws();
        if self.peek() != Some(')') {
            return Err(FieldExprError::Unbalanced(self.input.to_string()));
        }
        self.pos += 1;
        Ok(FieldExpr::related(name, children))
    }
}
