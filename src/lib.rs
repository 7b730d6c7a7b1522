//! # Route Lexer
//!
//! A context sensitive, UTF-8 safe scanner for HTTP route patterns.
//!
//! ## Overview
//!
//! This crate turns a route pattern such as `GET /users/:user([a-z]{6,20})`
//! into a stream of classified tokens for a downstream parser. The scanner is
//! a single pass cursor over the pattern bytes that switches lexical mode based
//! on the last token it produced, extracts quoted and balanced substrings
//! without a second pass, and reports failures with precise byte offsets.
//!
//! ## Key Features
//!
//! - **Method Disambiguation**: `GET /` is a method followed by a path, `GET` alone is rejected
//! - **Templates**: short `{name}` and long `{name: value, max: 25}` forms
//! - **Regular Expressions**: balanced `(...)` groups or quoted `("...")` forms
//! - **Zero-Copy Tokens**: literals borrow from the pattern unless an escape was processed
//! - **Fail-Once Errors**: the first failure is latched and returned by every later step
//! - **Serde Integration**: tokens and positions serialize for tooling
//!
//! ## Basic Usage
//!
//! ```rust
//! use route_lexer::{scan, Lexeme};
//!
//! let tokens = scan("GET /users/:user")?;
//! let lexemes: Vec<Lexeme> = tokens.iter().map(|t| t.lexeme).collect();
//! assert_eq!(
//!     lexemes,
//!     vec![
//!         Lexeme::Method,
//!         Lexeme::FSlash,
//!         Lexeme::Segment,
//!         Lexeme::FSlash,
//!         Lexeme::Colon,
//!         Lexeme::Ident,
//!         Lexeme::Eof,
//!     ]
//! );
//! # Ok::<(), route_lexer::ScanError>(())
//! ```
//!
//! ## Stepping
//!
//! ```rust
//! use route_lexer::{Lexeme, Scanner};
//!
//! let mut scanner = Scanner::new("/:id([0-9]+)");
//! while scanner.more() {
//!     let token = scanner.scan();
//!     if token.lexeme == Lexeme::Regexp {
//!         assert_eq!(token.literal, "[0-9]+");
//!     }
//! }
//! assert!(scanner.err().is_none());
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use route_lexer::{scan, ScanError};
//!
//! match scan("/:name(\"unterminated") {
//!     Err(err @ ScanError::Unterminated { .. }) => {
//!         println!("{}", err.annotate("/:name(\"unterminated"));
//!     }
//!     other => panic!("expected an unterminated error, got {other:?}"),
//! }
//! ```
//!
//! ## Tracing
//!
//! [`trace`] renders every scanning step as a row of a box drawn table, which
//! is handy when debugging position bookkeeping:
//!
//! ```rust
//! let mut out = Vec::new();
//! let tokens = route_lexer::trace(&mut out, "/:id([0-9])")?;
//! assert_eq!(tokens.len(), 5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classify;
pub mod error;
pub mod lexer;
mod subscan;
pub mod token;
pub mod trace;
pub mod unibox;


// Re-export main types and functions
pub use error::{Position, ScanError, TraceError};
pub use lexer::{Mode, Scanner};
pub use token::{Lexeme, Lexemes, Token, Tokens};
pub use trace::{TraceConfig, trace, trace_with_config};

/// Scans every token of `pattern`, or returns the first failure
pub fn scan(pattern: &str) -> Result<Tokens<'_>, ScanError> {
    scan_bytes(pattern.as_bytes())
}

/// Like [`scan`] for raw bytes, reporting illegal encodings as errors
pub fn scan_bytes(pattern: &[u8]) -> Result<Tokens<'_>, ScanError> {
    let mut scanner = Scanner::from_bytes(pattern);
    let tokens: Tokens<'_> =
        std::iter::from_fn(|| scanner.more().then(|| scanner.scan())).collect();
    match scanner.err() {
        Some(err) => Err(err.clone()),
        None => Ok(tokens),
    }
}
