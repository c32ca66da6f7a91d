// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::authorizations::Authorizations;
use crate::lexer::is_label_char;
use crate::*;

use core::fmt;
use core::mem;
use core::slice;

/// A parsed authorization expression.
///
/// `And` and `Or` always hold at least two children; a group with a single
/// item collapses to that item. Children of a parsed tree appear in the order
/// nested groups first, then bare labels of the same group.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
#[cfg_attr(feature = "ast", serde(rename_all = "snake_case"))]
pub enum Expr {
    /// Holds when the label is granted.
    AccessToken(String),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

enum Step<'a> {
    Visit(&'a Expr),
    Return(bool),
}

impl Expr {
    /// Evaluate against a set of granted labels. Unknown labels are simply
    /// not granted; evaluation never fails.
    ///
    /// Walks the tree with an explicit stack, so nesting depth is bounded
    /// only by memory.
    pub fn evaluate<A: Authorizations + ?Sized>(&self, authorizations: &A) -> bool {
        // Open groups: whether the group is an `And`, and its unvisited children.
        let mut groups: Vec<(bool, slice::Iter<'_, Expr>)> = vec![];
        let mut step = Step::Visit(self);
        loop {
            step = match step {
                Step::Visit(Expr::AccessToken(label)) => {
                    Step::Return(authorizations.is_granted(label))
                }
                // Start each group from its identity value.
                Step::Visit(Expr::And(children)) => {
                    groups.push((true, children.iter()));
                    Step::Return(true)
                }
                Step::Visit(Expr::Or(children)) => {
                    groups.push((false, children.iter()));
                    Step::Return(false)
                }
                Step::Return(value) => {
                    let Some((is_and, children)) = groups.last_mut() else {
                        return value;
                    };
                    // `And` stops at the first false child, `Or` at the first true.
                    let next = if value == *is_and { children.next() } else { None };
                    match next {
                        Some(child) => Step::Visit(child),
                        None => {
                            groups.pop();
                            Step::Return(value)
                        }
                    }
                }
            };
        }
    }

    /// Labels referenced by the expression, in evaluation order.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels = vec![];
        let mut pending = vec![self];
        while let Some(expr) = pending.pop() {
            match expr {
                Expr::AccessToken(label) => labels.push(label.as_str()),
                Expr::And(children) | Expr::Or(children) => {
                    pending.extend(children.iter().rev());
                }
            }
        }
        labels
    }

    #[cfg(feature = "ast")]
    pub fn to_json_str(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn fmt_label(f: &mut fmt::Formatter<'_>, label: &str) -> fmt::Result {
    if !label.is_empty() && label.chars().all(is_label_char) {
        f.write_str(label)
    } else {
        write!(f, "\"{label}\"")
    }
}

/// Renders the expression in the expression syntax. Nested groups are
/// parenthesized; the children of the outermost group are not. Quoted labels
/// are written back verbatim between quotes.
///
/// Parsing the output of a tree produced by the parser yields the same tree.
/// A hand-built tree may come back with its children reordered, since the
/// parser places nested groups before labels.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Open groups: separator and unvisited children.
        let mut groups: Vec<(&str, slice::Iter<'_, Expr>)> = vec![];
        let mut next = Some(self);
        loop {
            let group = match next.take() {
                Some(Expr::AccessToken(label)) => {
                    fmt_label(f, label)?;
                    None
                }
                Some(Expr::And(children)) => Some((" & ", children)),
                Some(Expr::Or(children)) => Some((" | ", children)),
                None => None,
            };
            if let Some((op, children)) = group {
                if !groups.is_empty() {
                    f.write_str("(")?;
                }
                let mut children = children.iter();
                next = children.next();
                groups.push((op, children));
                if next.is_some() {
                    continue;
                }
            }

            let Some((op, children)) = groups.last_mut() else {
                return Ok(());
            };
            match children.next() {
                Some(child) => {
                    f.write_str(*op)?;
                    next = Some(child);
                }
                None => {
                    groups.pop();
                    if !groups.is_empty() {
                        f.write_str(")")?;
                    }
                }
            }
        }
    }
}

// Children are detached and dropped one at a time so that dropping a deeply
// nested tree does not recurse.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = match self {
            Expr::And(children) | Expr::Or(children) => mem::take(children),
            Expr::AccessToken(_) => return,
        };
        while let Some(mut expr) = pending.pop() {
            if let Expr::And(children) | Expr::Or(children) = &mut expr {
                pending.append(children);
            }
        }
    }
}
