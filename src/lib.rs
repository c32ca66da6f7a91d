// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]
#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod ast;
mod authorizations;
mod engine;
mod error;
mod lexer;
mod options;
mod parser;

pub use ast::Expr;
pub use authorizations::{build_label_set, Authorizations, LabelSet};
pub use engine::{
    check_authorization, check_authorization_by_map, parse_expression,
    prepare_authorization_check, Engine,
};
pub use error::{Error, Result};
pub use options::{EscapeMode, ParserOptions};

/// Items in `unstable` are likely to change.
pub mod unstable {
    pub use crate::ast::*;
    pub use crate::lexer::*;
    pub use crate::parser::*;
}

#[cfg(feature = "arc")]
use alloc::sync::Arc as Rc;

#[cfg(not(feature = "arc"))]
use alloc::rc::Rc;

use alloc::{
    borrow::ToOwned,
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};

#[cfg(test)]
mod tests;
