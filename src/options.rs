// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::{Deserialize, Serialize};

/// How the lexer treats malformed quoted strings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapeMode {
    /// An invalid escape ends the string just before the backslash and lexing
    /// resumes at the escaped character. A missing closing quote runs the
    /// string to the end of input.
    #[default]
    Truncate,

    /// Invalid escapes and missing closing quotes are lex errors.
    Strict,
}

/// Knobs for lexing and parsing expressions.
///
/// Can be deserialized from a config file:
/// ```json
/// { "escape_mode": "strict", "max_depth": 32 }
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserOptions {
    pub escape_mode: EscapeMode,

    /// Maximum parenthesis nesting. `None` means unbounded.
    pub max_depth: Option<u32>,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_escape_mode(mut self, escape_mode: EscapeMode) -> Self {
        self.escape_mode = escape_mode;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<u32>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn strict() -> Self {
        Self::default().with_escape_mode(EscapeMode::Strict)
    }
}
