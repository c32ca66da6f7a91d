// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::Error;
use crate::options::EscapeMode;
use crate::*;

use core::cmp;
use core::fmt::{self, Debug, Formatter};
use core::iter::Peekable;
use core::str::CharIndices;

use log::{trace, warn};
use unicode_general_category::{get_general_category, GeneralCategory};

#[derive(Clone)]
struct SourceInternal {
    pub file: String,
    pub contents: String,
    pub lines: Vec<(usize, usize)>,
}

/// Expression text plus a name used in diagnostics.
#[derive(Clone)]
pub struct Source {
    src: Rc<SourceInternal>,
}

impl cmp::PartialEq for Source {
    fn eq(&self, other: &Source) -> bool {
        Rc::as_ptr(&self.src) == Rc::as_ptr(&other.src)
    }
}

impl cmp::Eq for Source {}

impl Debug for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        self.src.file.fmt(f)
    }
}

impl Source {
    pub fn new(file: String, contents: String) -> Source {
        let mut lines = vec![];
        let mut prev_ch = ' ';
        let mut prev_pos = 0;
        let mut start = 0;
        for (i, ch) in contents.char_indices() {
            if ch == '\n' {
                let end = match prev_ch {
                    '\r' => prev_pos,
                    _ => i,
                };
                lines.push((start, end));
                start = i + 1;
            }
            prev_ch = ch;
            prev_pos = i;
        }
        lines.push((start, contents.len()));

        Self {
            src: Rc::new(SourceInternal {
                file,
                contents,
                lines,
            }),
        }
    }

    /// Wrap an inline expression.
    pub fn from_expression(expression: &str) -> Source {
        Self::new("<expression>".to_owned(), expression.to_owned())
    }

    pub fn file(&self) -> &String {
        &self.src.file
    }

    pub fn contents(&self) -> &String {
        &self.src.contents
    }

    /// Text of the given zero-based line, without its terminator.
    pub fn line(&self, idx: usize) -> &str {
        match self.src.lines.get(idx) {
            Some((start, end)) => &self.src.contents[*start..*end],
            None => "",
        }
    }

    /// One-based line and column (in characters) of a byte offset.
    pub fn line_col(&self, position: usize) -> (usize, usize) {
        let position = cmp::min(position, self.src.contents.len());
        let idx = self
            .src
            .lines
            .iter()
            .rposition(|(start, _)| *start <= position)
            .unwrap_or(0);
        let (start, end) = self.src.lines[idx];
        let upto = cmp::min(position, end);
        let col = self.src.contents[start..upto].chars().count() + 1 + (position - upto);
        (idx + 1, col)
    }

    pub fn message(&self, position: usize, kind: &str, msg: &str) -> String {
        let (line, col) = self.line_col(position);

        let line_str = format!("{line}");
        let line_num_width = line_str.len() + 1;
        let col_spaces = col - 1;

        format!(
            "\n--> {}:{}:{}\n{:<line_num_width$}|\n\
		{:<line_num_width$}| {}\n\
		{:<line_num_width$}| {:<col_spaces$}^\n\
		{}: {}",
            self.src.file,
            line,
            col,
            "",
            line,
            self.line(line - 1),
            "",
            "",
            kind,
            msg
        )
    }

    /// Render `err` against this source as an `anyhow::Error`.
    pub fn error(&self, err: &Error) -> anyhow::Error {
        anyhow::anyhow!(self.message(err.position(), "error", &err.to_string()))
    }
}

#[derive(Clone)]
pub struct Span {
    pub source: Source,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn text(&self) -> &str {
        &self.source.contents()[self.start..self.end]
    }

    pub fn line_col(&self) -> (usize, usize) {
        self.source.line_col(self.start)
    }

    pub fn message(&self, kind: &str, msg: &str) -> String {
        self.source.message(self.start, kind, msg)
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        let t = self.text().escape_debug().to_string();
        let max = 32;
        let (txt, trailer) = if t.len() > max {
            (t.chars().take(max).collect::<String>(), "...")
        } else {
            (t, "")
        };

        let (line, col) = self.line_col();
        f.write_fmt(format_args!(
            "{}:{}:{}:{}, \"{}{}\"",
            line, col, self.start, self.end, txt, trailer
        ))
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    /// Bare identifier or quoted string.
    AccessToken,
    OpenParen,
    CloseParen,
    And,
    Or,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token(pub TokenKind, pub Span);

impl Token {
    /// Literal text of the token. For quoted strings this is the raw slice
    /// between the quotes; escapes are not decoded.
    pub fn value(&self) -> &str {
        self.1.text()
    }
}

/// Characters allowed in a bare label: Unicode letters, decimal digits and
/// `_ - . :`. Letter-like numerals (`Ⅷ`), superscripts (`²`) and combining
/// marks are not label characters.
pub fn is_label_char(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':');
    }
    matches!(
        get_general_category(ch),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
    )
}

#[derive(Clone)]
pub struct Lexer<'source> {
    source: Source,
    iter: Peekable<CharIndices<'source>>,
    escape_mode: EscapeMode,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source Source) -> Self {
        Self::with_escape_mode(source, EscapeMode::default())
    }

    pub fn with_escape_mode(source: &'source Source, escape_mode: EscapeMode) -> Self {
        Self {
            source: source.clone(),
            iter: source.contents().char_indices().peekable(),
            escape_mode,
        }
    }

    fn peek(&mut self) -> (usize, Option<char>) {
        match self.iter.peek() {
            Some((index, chr)) => (*index, Some(*chr)),
            _ => (self.source.contents().len(), None),
        }
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span {
            source: self.source.clone(),
            start,
            end,
        }
    }

    fn read_ident(&mut self) -> Token {
        let start = self.peek().0;
        while let (_, Some(ch)) = self.peek() {
            if !is_label_char(ch) {
                break;
            }
            self.iter.next();
        }
        let end = self.peek().0;
        Token(TokenKind::AccessToken, self.span(start, end))
    }

    fn read_string(&mut self) -> Result<Token, Error> {
        let (quote, _) = self.peek();
        self.iter.next();
        let start = quote + 1;
        loop {
            let (offset, ch) = self.peek();
            match ch {
                None => {
                    if self.escape_mode == EscapeMode::Strict {
                        return Err(Error::UnterminatedString { position: quote });
                    }
                    return Ok(Token(TokenKind::AccessToken, self.span(start, offset)));
                }
                Some('"') => {
                    self.iter.next();
                    return Ok(Token(TokenKind::AccessToken, self.span(start, offset)));
                }
                Some('\\') => {
                    self.iter.next();
                    match self.peek().1 {
                        Some('"') | Some('\\') => {
                            self.iter.next();
                        }
                        _ => {
                            if self.escape_mode == EscapeMode::Strict {
                                return Err(Error::InvalidEscape { position: offset });
                            }
                            // Keep what was read so far; lexing resumes after the backslash.
                            warn!("invalid escape at position {offset}, truncating quoted label");
                            return Ok(Token(TokenKind::AccessToken, self.span(start, offset)));
                        }
                    }
                }
                Some(_) => {
                    self.iter.next();
                }
            }
        }
    }

    fn skip_ws(&mut self) {
        while let (_, Some(' ' | '\t' | '\n' | '\r')) = self.peek() {
            self.iter.next();
        }
    }

    fn symbol(&mut self, kind: TokenKind, start: usize) -> Token {
        self.iter.next();
        Token(kind, self.span(start, start + 1))
    }

    /// Produce the next token. Returns `Eof` forever once input is exhausted.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        self.skip_ws();

        let (start, chr) = self.peek();
        let token = match chr {
            None => Token(TokenKind::Eof, self.span(start, start)),
            Some('(') => self.symbol(TokenKind::OpenParen, start),
            Some(')') => self.symbol(TokenKind::CloseParen, start),
            Some('&') => self.symbol(TokenKind::And, start),
            Some('|') => self.symbol(TokenKind::Or, start),
            Some('"') => self.read_string()?,
            Some(ch) if is_label_char(ch) => self.read_ident(),
            Some(ch) => {
                return Err(Error::UnexpectedCharacter {
                    ch,
                    position: start,
                })
            }
        };

        trace!("token {:?}", token);
        Ok(token)
    }
}
