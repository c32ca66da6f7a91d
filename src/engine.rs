// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::Expr;
use crate::authorizations::{build_label_set, Authorizations, LabelSet};
use crate::lexer::Source;
use crate::options::ParserOptions;
use crate::parser::Parser;
use crate::Result;

use log::debug;

/// A prepared authorization check.
///
/// Holds a caller's granted labels so that many expressions can be checked
/// against them without rebuilding the label set.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    labels: LabelSet,
    options: ParserOptions,
}

impl Engine {
    /// Create an engine from a comma separated list of granted labels.
    pub fn new(authorizations: &str) -> Self {
        Self::from_labels(build_label_set(authorizations))
    }

    pub fn from_labels(labels: LabelSet) -> Self {
        Self {
            labels,
            options: ParserOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse an expression using this engine's options.
    pub fn parse(&self, expression: &str) -> Result<Expr> {
        parse_with_options(expression, self.options)
    }

    /// Parse `expression` and evaluate it against the granted labels.
    pub fn check(&self, expression: &str) -> Result<bool> {
        let allowed = self.parse(expression)?.evaluate(&self.labels);
        debug!("check `{expression}`: {allowed}");
        Ok(allowed)
    }
}

fn parse_with_options(expression: &str, options: ParserOptions) -> Result<Expr> {
    let source = Source::from_expression(expression);
    Parser::with_options(&source, options).parse()
}

/// Parse an expression with default options. The resulting tree is
/// immutable and may be evaluated any number of times.
pub fn parse_expression(expression: &str) -> Result<Expr> {
    parse_with_options(expression, ParserOptions::default())
}

/// Check whether the comma separated `authorizations` satisfy `expression`.
///
/// Parse failures are returned as errors; callers should treat them as deny.
pub fn check_authorization(expression: &str, authorizations: &str) -> Result<bool> {
    check_authorization_by_map(expression, &build_label_set(authorizations))
}

/// Like [`check_authorization`] with an already built set of labels.
pub fn check_authorization_by_map<A: Authorizations + ?Sized>(
    expression: &str,
    authorizations: &A,
) -> Result<bool> {
    Ok(parse_expression(expression)?.evaluate(authorizations))
}

/// Build the label set once and return a checker that parses and evaluates
/// a fresh expression on every call.
pub fn prepare_authorization_check(
    authorizations: &str,
) -> impl Fn(&str) -> Result<bool> + Clone + Send + Sync {
    let engine = Engine::new(authorizations);
    move |expression: &str| engine.check(expression)
}
