//! Error types and position tracking for route pattern scanning
//!
//! This module provides the coordinate type shared by tokens and diagnostics,
//! the failure kinds a scanner can latch, and the error returned by the trace
//! renderer.

use crate::token::{Lexeme, Lexemes, Tokens};
use crate::unibox;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

/// Represents a position in a route pattern
///
/// Columns count code points and never reset on a line feed, only the line
/// number moves. Values beyond [`Position::MAX_LINE`], [`Position::MAX_COLUMN`]
/// or [`Position::MAX_OFFSET`] are outside the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Byte offset from start of input (0-based)
    pub offset: usize,
}

impl Position {
    /// Largest supported line number
    pub const MAX_LINE: usize = 127;
    /// Largest supported column number
    pub const MAX_COLUMN: usize = 4095;
    /// Largest supported byte offset
    pub const MAX_OFFSET: usize = 4095;

    /// Line 1, column 1, byte 0.
    pub const START: Self = Self::at(1, 1, 0);

    /// The invalid position, rendered as `?`.
    pub const UNKNOWN: Self = Self::at(0, 0, 0);

    /// Creates a new position at the start of input
    pub const fn new() -> Self {
        Self::START
    }

    /// Creates a position from its parts
    pub const fn at(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Returns true if the line and column are non-zero
    pub const fn is_valid(&self) -> bool {
        self.line > 0 && self.column > 0
    }

    /// Returns true if every part fits the supported range
    pub const fn in_bounds(&self) -> bool {
        self.line <= Self::MAX_LINE
            && self.column <= Self::MAX_COLUMN
            && self.offset <= Self::MAX_OFFSET
    }

    /// Moves the position forward by the given number of lines, columns and bytes
    pub fn advance(&mut self, lines: usize, columns: usize, bytes: usize) {
        self.line += lines;
        self.column += columns;
        self.offset += bytes;
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column, self.offset) {
            _ if !self.is_valid() => f.write_str("?"),
            (line, column, offset) if line > 1 && offset > 0 => {
                write!(f, "{line}:{column} (byte {offset})")
            }
            (_, column, offset) if offset > 0 => write!(f, "rune {column} (byte {offset})"),
            (_, column, _) => write!(f, "rune {column}"),
        }
    }
}

/// Failures latched by a scanner
///
/// The first failure recorded by a scanner wins; every later call observes
/// the same value until the scanner is reset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Bytes that do not form a UTF-8 sequence
    #[error("illegal UTF-8 encoding at byte {offset}")]
    IllegalEncoding { offset: usize },

    /// A NUL code point anywhere in the pattern
    #[error("illegal NUL character at byte {offset}")]
    IllegalNul { offset: usize },

    /// A byte order marker anywhere except byte 0
    #[error("illegal byte order marker at byte {offset}")]
    IllegalBom { offset: usize },

    /// The current code point matched none of the acceptable lexemes
    #[error("unexpected {found}, expecting {} at byte {offset}", .expected.join(" or "))]
    Unexpected {
        found: Lexeme,
        expected: Lexemes,
        offset: usize,
    },

    /// A quoted construct ran out of input before its closing delimiter
    #[error("unterminated {opener}, gave up on \"{found}\" at byte {offset}")]
    Unterminated {
        opener: Lexeme,
        found: Lexeme,
        offset: usize,
    },

    /// A balanced construct ran out of input with nonzero nesting depth
    #[error("{}", unbalanced_message(.open, .close, .found, .depth, .offset))]
    Unbalanced {
        open: Lexeme,
        close: Lexeme,
        found: Lexeme,
        depth: isize,
        offset: usize,
    },

    /// An uppercase run that reads as both a method and a path segment
    #[error("ambiguous {found} at byte {offset}{}", suggestion_tail(.suggestions))]
    Ambiguous {
        found: Lexeme,
        suggestions: Vec<String>,
        offset: usize,
    },
}

impl ScanError {
    /// Returns the byte offset the failure was reported at
    pub fn offset(&self) -> usize {
        match self {
            ScanError::IllegalEncoding { offset }
            | ScanError::IllegalNul { offset }
            | ScanError::IllegalBom { offset }
            | ScanError::Unexpected { offset, .. }
            | ScanError::Unterminated { offset, .. }
            | ScanError::Unbalanced { offset, .. }
            | ScanError::Ambiguous { offset, .. } => *offset,
        }
    }

    /// Renders the message above the pattern with a marker under the failing byte
    pub fn annotate(&self, pattern: &str) -> String {
        unibox::mark_expected(pattern, &self.to_string(), self.offset())
    }
}

fn unbalanced_message(
    open: &Lexeme,
    close: &Lexeme,
    found: &Lexeme,
    depth: &isize,
    offset: &usize,
) -> String {
    if *depth < 0 {
        format!("unbalanced {close}, {depth} open {open} remains but got {found} at byte {offset}")
    } else {
        format!(
            "unbalanced {open}, {depth} unclosed {close} remains but got {found} at byte {offset}"
        )
    }
}

fn suggestion_tail(suggestions: &[String]) -> String {
    match suggestions {
        [] => String::new(),
        [only] => format!(", did you mean {only}"),
        [head @ .., last] => format!(", did you mean {} or {last}", head.join(", ")),
    }
}

/// Failure of [`crate::trace`], carrying the tokens scanned before it stopped
#[derive(Debug, Error)]
pub enum TraceError<'a> {
    /// The scanner latched an error
    #[error("{error}")]
    Scan {
        #[source]
        error: ScanError,
        tokens: Tokens<'a>,
    },

    /// The writer rejected a row of the table
    #[error("IO error: {error}")]
    Io {
        #[source]
        error: io::Error,
        tokens: Tokens<'a>,
    },
}

impl<'a> TraceError<'a> {
    /// Returns the tokens produced before the failure
    pub fn tokens(&self) -> &Tokens<'a> {
        match self {
            TraceError::Scan { tokens, .. } | TraceError::Io { tokens, .. } => tokens,
        }
    }

    /// Consumes the error, returning the partial token list
    pub fn into_tokens(self) -> Tokens<'a> {
        match self {
            TraceError::Scan { tokens, .. } | TraceError::Io { tokens, .. } => tokens,
        }
    }

    /// Returns the scan failure, if that is what stopped the trace
    pub fn scan_error(&self) -> Option<&ScanError> {
        match self {
            TraceError::Scan { error, .. } => Some(error),
            TraceError::Io { .. } => None,
        }
    }
}
