// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::*;
use crate::error::Error;
use crate::lexer::*;
use crate::options::ParserOptions;
use crate::*;

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
}

/// Items collected for one parenthesis level.
#[derive(Debug)]
pub struct Scope {
    nodes: Vec<Expr>,
    labels: Vec<String>,
    operator: Option<Operator>,
    // Offset of the opening parenthesis, 0 for the outermost scope.
    start: usize,
}

impl Scope {
    pub fn new(start: usize) -> Self {
        Self {
            nodes: vec![],
            labels: vec![],
            operator: None,
            start,
        }
    }

    pub fn add_node(&mut self, node: Expr) {
        self.nodes.push(node);
    }

    pub fn add_label(&mut self, label: String) {
        self.labels.push(label);
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    /// Declare the scope's operator. Repeating the same operator is allowed;
    /// mixing operators within one scope is not.
    pub fn set_operator(&mut self, kind: TokenKind, position: usize) -> Result<()> {
        let operator = match kind {
            TokenKind::And => Operator::And,
            TokenKind::Or => Operator::Or,
            _ => return Err(Error::UnexpectedToken { kind, position }),
        };

        match self.operator {
            None => {
                self.operator = Some(operator);
                Ok(())
            }
            Some(op) if op == operator => Ok(()),
            Some(_) => Err(Error::UnexpectedOperator { position }),
        }
    }

    /// Combine the collected items into a single expression.
    pub fn build(mut self) -> Result<Expr> {
        if self.labels.len() == 1 && self.nodes.is_empty() {
            if let Some(label) = self.labels.pop() {
                return Ok(Expr::AccessToken(label));
            }
        }

        if self.nodes.len() == 1 && self.labels.is_empty() {
            if let Some(node) = self.nodes.pop() {
                return Ok(node);
            }
        }

        // Empty groups are rejected even with an operator so that And/Or
        // always have at least two children.
        let operator = match self.operator {
            Some(op) if !(self.nodes.is_empty() && self.labels.is_empty()) => op,
            _ => {
                return Err(Error::MissingOperator {
                    position: self.start,
                })
            }
        };

        let mut children = self.nodes;
        children.extend(self.labels.into_iter().map(Expr::AccessToken));
        Ok(match operator {
            Operator::And => Expr::And(children),
            Operator::Or => Expr::Or(children),
        })
    }
}

/// Builds an [`Expr`] from source text using an explicit stack of scopes,
/// one per open parenthesis.
#[derive(Clone)]
pub struct Parser<'source> {
    source: Source,
    lexer: Lexer<'source>,
    options: ParserOptions,
}

impl<'source> Parser<'source> {
    pub fn new(source: &'source Source) -> Self {
        Self::with_options(source, ParserOptions::default())
    }

    pub fn with_options(source: &'source Source, options: ParserOptions) -> Self {
        Self {
            source: source.clone(),
            lexer: Lexer::with_escape_mode(source, options.escape_mode),
            options,
        }
    }

    fn check_depth(&self, scopes: &[Scope], position: usize) -> Result<()> {
        match self.options.max_depth {
            Some(limit) if scopes.len() > limit as usize => {
                Err(Error::NestingTooDeep { limit, position })
            }
            _ => Ok(()),
        }
    }

    /// Consume the lexer and build the expression tree.
    pub fn parse(mut self) -> Result<Expr> {
        let mut scopes = vec![Scope::new(0)];

        loop {
            let tok = self.lexer.next_token()?;
            let position = tok.1.start;

            match tok.0 {
                TokenKind::Eof => break,
                TokenKind::AccessToken => {
                    if let Some(scope) = scopes.last_mut() {
                        scope.add_label(tok.value().to_owned());
                    }
                }
                TokenKind::OpenParen => {
                    self.check_depth(&scopes, position)?;
                    scopes.push(Scope::new(position));
                }
                TokenKind::And | TokenKind::Or => {
                    if let Some(scope) = scopes.last_mut() {
                        scope.set_operator(tok.0, position)?;
                    }
                }
                TokenKind::CloseParen => {
                    if scopes.len() == 1 {
                        return Err(Error::UnmatchedClosingParen { position });
                    }
                    if let Some(finished) = scopes.pop() {
                        let expr = finished.build()?;
                        if let Some(scope) = scopes.last_mut() {
                            scope.add_node(expr);
                        }
                    }
                }
            }
        }

        if scopes.len() != 1 {
            return Err(Error::MismatchedParentheses {
                position: scopes[1].start,
            });
        }

        let expr = match scopes.pop() {
            Some(root) => root.build()?,
            None => return Err(Error::MismatchedParentheses { position: 0 }),
        };
        debug!("parsed {:?} as `{expr}`", self.source);
        Ok(expr)
    }
}
