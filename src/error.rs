// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::lexer::TokenKind;

use thiserror::Error;

/// Errors raised while lexing or parsing an authorization expression.
///
/// Every variant carries the zero-based byte offset into the expression text
/// where the problem was detected. Evaluation itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A character that cannot start any token.
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    /// Backslash followed by something other than `"` or `\` (strict mode only).
    #[error("invalid escape sequence at position {position}")]
    InvalidEscape { position: usize },

    /// Quoted string without a closing quote (strict mode only).
    #[error("unmatched \" at position {position}")]
    UnterminatedString { position: usize },

    /// A scope already declared a different operator.
    #[error("unexpected operator at position {position}")]
    UnexpectedOperator { position: usize },

    /// Several items were grouped without any operator between them.
    #[error("missing operator at position {position}")]
    MissingOperator { position: usize },

    /// `)` without a corresponding `(`.
    #[error("unmatched closing parenthesis at position {position}")]
    UnmatchedClosingParen { position: usize },

    /// Input ended with open parentheses.
    #[error("mismatched parentheses at position {position}")]
    MismatchedParentheses { position: usize },

    /// A token the parser does not expect in context.
    #[error("unexpected token: {kind:?} at position {position}")]
    UnexpectedToken { kind: TokenKind, position: usize },

    /// Parenthesis nesting exceeds the configured limit.
    #[error("nesting depth exceeds limit of {limit} at position {position}")]
    NestingTooDeep { limit: u32, position: usize },
}

impl Error {
    /// Byte offset into the expression text.
    pub fn position(&self) -> usize {
        match self {
            Error::UnexpectedCharacter { position, .. }
            | Error::InvalidEscape { position }
            | Error::UnterminatedString { position }
            | Error::UnexpectedOperator { position }
            | Error::MissingOperator { position }
            | Error::UnmatchedClosingParen { position }
            | Error::MismatchedParentheses { position }
            | Error::UnexpectedToken { position, .. }
            | Error::NestingTooDeep { position, .. } => *position,
        }
    }

    /// Whether the error was raised by the lexer rather than the parser.
    pub fn is_lex_error(&self) -> bool {
        matches!(
            self,
            Error::UnexpectedCharacter { .. }
                | Error::InvalidEscape { .. }
                | Error::UnterminatedString { .. }
        )
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
