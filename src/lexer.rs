//! Route pattern scanner
//!
//! This module provides the context sensitive scanner that turns a route
//! pattern such as `GET /users/:id([0-9]+)` into a stream of tokens. Which
//! lexemes are recognized depends on the lexeme of the previously produced
//! token, see [`Mode`].

use crate::classify::{
    self, BOM, CodePoint, classify, is_digit, is_ident, is_ident_start, is_upper, is_whitespace,
};
use crate::error::{Position, ScanError};
use crate::token::{Lexeme, Lexemes, Quoted, Token};
use std::fmt;
use tracing::{debug, trace};

/// The lexemes a scanner reports as acceptable when it produces an invalid token
const RECOVERY: [Lexeme; 5] = [
    Lexeme::Method,
    Lexeme::FSlash,
    Lexeme::Segment,
    Lexeme::Colon,
    Lexeme::LBrace,
];

/// Scanning context, selected by the lexeme of the previous token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Nothing scanned yet, an http method may appear
    Reset,
    /// At the start of a path segment or continuing a templated one
    Path,
    /// Inside a pattern after a `:` or `{`
    Pattern,
}

impl Mode {
    /// Returns the mode that follows a token of the given lexeme
    pub const fn after(lexeme: Lexeme) -> Mode {
        match lexeme {
            Lexeme::FSlash | Lexeme::Segment | Lexeme::Method | Lexeme::RBrace => Mode::Path,
            _ => Mode::Pattern,
        }
    }
}

/// Scanner producing tokens from route patterns
///
/// Cloning a scanner is cheap and yields an independent cursor over the same
/// pattern, which is how [`Scanner::peek`] looks ahead.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    /// Source pattern
    pattern: &'a [u8],
    /// Mode selected by the last token
    mode: Mode,
    /// Current position
    pos: Position,
    /// Offset of the current code point
    off: usize,
    /// Offset just past the current code point
    rd_off: usize,
    /// Current code point
    ch1: CodePoint,
    /// Cached lookahead
    ch2: Option<CodePoint>,
    /// First failure, sticky until reset
    err: Option<ScanError>,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner over a pattern
    pub fn new(pattern: &'a str) -> Self {
        Self::from_bytes(pattern.as_bytes())
    }

    /// Creates a scanner over raw bytes, which are validated as UTF-8 while scanning
    pub fn from_bytes(pattern: &'a [u8]) -> Self {
        debug!(len = pattern.len(), "scanner reset");
        Self::initial(pattern)
    }

    fn initial(pattern: &'a [u8]) -> Self {
        Self {
            pattern,
            mode: Mode::Reset,
            pos: Position::START,
            off: 0,
            rd_off: 0,
            ch1: CodePoint::Reset,
            ch2: None,
            err: None,
        }
    }

    /// Discards all state and starts over with a new pattern
    pub fn reset(&mut self, pattern: &'a str) {
        self.reset_bytes(pattern.as_bytes());
    }

    /// Like [`Scanner::reset`] for raw bytes
    pub fn reset_bytes(&mut self, pattern: &'a [u8]) {
        *self = Self::from_bytes(pattern);
    }

    /// Returns true while more tokens may be scanned
    pub fn more(&self) -> bool {
        self.err.is_none() && self.ch1 != CodePoint::Eof
    }

    /// Returns the latched failure, if any
    pub fn err(&self) -> Option<&ScanError> {
        self.err.as_ref()
    }

    /// Offset of the current code point
    pub fn offset(&self) -> usize {
        self.off
    }

    /// Offset just past the current code point
    pub fn read_offset(&self) -> usize {
        self.rd_off
    }

    /// Current position
    pub fn position(&self) -> Position {
        self.pos
    }

    /// Mode the next call to [`Scanner::scan`] will use
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The pattern being scanned
    pub fn pattern(&self) -> &'a [u8] {
        self.pattern
    }

    /// Returns the token the next call to [`Scanner::scan`] would produce
    pub fn peek(&self) -> Token<'a> {
        self.clone().scan()
    }

    /// Like [`Scanner::scan`], returning the latched failure instead of a token
    /// once the scanner has failed
    pub fn next_token(&mut self) -> Result<Token<'a>, ScanError> {
        let token = self.scan();
        match &self.err {
            Some(err) => Err(err.clone()),
            None => Ok(token),
        }
    }

    /// Advances and returns the next token
    ///
    /// Once `Eof` is returned, or a failure is latched, every later call returns
    /// an `Eof` token at the same position and [`Scanner::more`] is false.
    pub fn scan(&mut self) -> Token<'a> {
        let begin = self.pos;
        if self.err.is_some() {
            return Token::eof(begin);
        }

        let mut token = Token::new(Lexeme::Bad, "", begin, Position::UNKNOWN);
        self.advance();
        match self.mode {
            Mode::Reset => self.scan_reset(&mut token),
            Mode::Path => self.scan_path(&mut token),
            Mode::Pattern => self.scan_pattern(&mut token),
        }

        token.end = self.pos;
        if !token.is_valid() {
            self.unexpected(self.ch1, Lexemes::from(&RECOVERY[..]));
        }
        self.mode = Mode::after(token.lexeme);

        trace!(
            lexeme = %token.lexeme,
            offset = self.off,
            read_offset = self.rd_off,
            "scanned token"
        );
        token
    }

    /// An http method is only recognized as the first token, and only when a
    /// single space or tab separates it from a `/`.
    fn scan_reset(&mut self, token: &mut Token<'a>) {
        if !is_upper(self.ch1) {
            return self.scan_path(token);
        }

        let literal = self.scan_pred(&[is_upper]);
        if self.peek_char().is_any(&[' ', '\t']) {
            self.advance();
            if self.peek_char().is('/') {
                token.lexeme = Lexeme::Method;
                token.literal = literal.into();
                return;
            }
        }

        self.ambiguous(
            self.ch1,
            vec![
                format!("\"{literal} /\" (METHOD + SEGMENT)"),
                format!("\"/{literal}\" (SEGMENT)"),
            ],
        );
    }

    fn scan_path(&mut self, token: &mut Token<'a>) {
        while self.more() && is_whitespace(self.ch1) {
            token.begin = self.pos;
            self.advance();
        }

        match classify(self.ch1) {
            lexeme @ (Lexeme::Colon | Lexeme::FSlash | Lexeme::LBrace) => {
                token.lexeme = lexeme;
                token.literal = self.current_literal().into();
            }
            Lexeme::Eof => token.lexeme = Lexeme::Eof,
            _ => {
                token.lexeme = Lexeme::Segment;
                token.literal = self
                    .scan_pred(&[|cp: CodePoint| classify::is_segment(cp) && !cp.is('{')])
                    .into();
            }
        }
    }

    fn scan_pattern(&mut self, token: &mut Token<'a>) {
        match classify(self.ch1) {
            lexeme @ (Lexeme::Bad | Lexeme::Eof) => token.lexeme = lexeme,
            Lexeme::LParen => {
                token.lexeme = Lexeme::Regexp;
                match self.peek_char() {
                    CodePoint::Char('`') => {
                        self.take(&['(']);
                        token.literal = self.scan_quoted_raw('`', '`').into();
                        self.take(&['`']);
                        self.expect(&[')']);
                    }
                    CodePoint::Char(quote @ ('\'' | '"')) => {
                        self.take(&['(']);
                        token.literal = self.scan_quoted(quote, quote, &[]);
                        self.take(&[quote]);
                        self.expect(&[')']);
                    }
                    CodePoint::Char('\n') => {
                        let body = self.scan_balanced('(', ')');
                        let ws = |c: char| is_whitespace(CodePoint::Char(c));
                        let lead = body.len() - body.trim_start_matches(ws).len();
                        token.begin.column += lead;
                        token.begin.offset += lead;
                        token.literal = body.trim_matches(ws).into();
                    }
                    _ => token.literal = self.scan_balanced('(', ')').into(),
                }
            }
            Lexeme::BQuote => {
                token.lexeme = Lexeme::String;
                token.literal = self.scan_quoted_raw('`', '`').into();
            }
            Lexeme::SQuote | Lexeme::DQuote => {
                let quote = self.ch1.as_char().unwrap_or('"');
                token.lexeme = Lexeme::String;
                token.literal = self.scan_quoted(quote, quote, &[]);
            }
            Lexeme::Ident => {
                token.lexeme = Lexeme::Ident;
                token.literal = self.scan_pred(&[is_ident_start, is_ident]).into();
            }
            Lexeme::Lit => {
                token.lexeme = Lexeme::Lit;
                token.literal = self
                    .scan_pred(&[|cp: CodePoint| classify(cp) == Lexeme::Lit])
                    .into();
            }
            Lexeme::Digit => {
                token.lexeme = Lexeme::Number;
                token.literal = self.scan_pred(&[is_digit]).into();
            }
            lexeme => {
                token.lexeme = lexeme;
                token.literal = self.current_literal().into();
            }
        }
    }

    /// Decodes the code point at `off`, latching a failure for illegal input
    fn decode(&mut self, off: usize) -> (CodePoint, usize) {
        if self.err.is_some() {
            return (CodePoint::Eof, 0);
        }
        let rest = match self.pattern.get(off..) {
            Some(rest) if !rest.is_empty() => rest,
            _ => return (CodePoint::Eof, 0),
        };

        let window = rest.get(..rest.len().min(4)).unwrap_or(rest);
        let decoded = window
            .utf8_chunks()
            .next()
            .and_then(|chunk| chunk.valid().chars().next());

        match decoded {
            None => self.fail(ScanError::IllegalEncoding { offset: off }),
            Some('\0') => self.fail(ScanError::IllegalNul { offset: off }),
            Some(BOM) if off != 0 => self.fail(ScanError::IllegalBom { offset: off }),
            Some(BOM) => {
                let (cp, width) = self.decode(BOM.len_utf8());
                if self.err.is_none() {
                    return (cp, width + BOM.len_utf8());
                }
            }
            Some(c) => return (CodePoint::Char(c), c.len_utf8()),
        }
        (CodePoint::Eof, 0)
    }

    /// Moves to the next code point and returns it
    pub(crate) fn advance(&mut self) -> CodePoint {
        let (cp, width) = self.decode(self.rd_off);
        let CodePoint::Char(c) = cp else {
            self.off = self.pattern.len();
            self.ch1 = CodePoint::Eof;
            self.ch2 = None;
            return self.ch1;
        };

        // The first code point only moves the offset, columns never reset.
        let lines = usize::from(c == '\n');
        let columns = usize::from(self.ch1 != CodePoint::Reset);
        self.pos.advance(lines, columns, width);

        self.ch1 = cp;
        self.ch2 = None;
        self.off = self.rd_off + width - c.len_utf8();
        self.rd_off += width;
        self.ch1
    }

    /// Returns the code point after the current one without advancing
    pub(crate) fn peek_char(&mut self) -> CodePoint {
        if let Some(cp) = self.ch2 {
            return cp;
        }
        let (cp, _) = self.decode(self.rd_off);
        self.ch2 = Some(cp);
        cp
    }

    /// The current code point
    pub(crate) fn current(&self) -> CodePoint {
        self.ch1
    }

    /// Advances past the current code point if it is one of `expected`
    pub(crate) fn take(&mut self, expected: &[char]) -> CodePoint {
        if self.expect(expected) {
            self.advance()
        } else {
            self.ch1
        }
    }

    /// Checks the current code point is one of `expected`, failing otherwise
    pub(crate) fn expect(&mut self, expected: &[char]) -> bool {
        let ok = self.ch1.is_any(expected);
        if !ok {
            self.unexpected(self.ch1, classify::classify_all(expected));
        }
        ok
    }

    /// Borrows `pattern[from..to]`, truncated to its longest valid prefix
    pub(crate) fn slice(&self, from: usize, to: usize) -> &'a str {
        let Some(bytes) = self.pattern.get(from..to) else {
            return "";
        };
        match std::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => bytes
                .get(..err.valid_up_to())
                .and_then(|valid| std::str::from_utf8(valid).ok())
                .unwrap_or_default(),
        }
    }

    fn current_literal(&self) -> &'a str {
        self.slice(self.off, self.rd_off)
    }

    pub(crate) fn unexpected(&mut self, found: CodePoint, expected: Lexemes) {
        let offset = self.off;
        self.fail(ScanError::Unexpected {
            found: classify(found),
            expected,
            offset,
        });
    }

    pub(crate) fn unterminated(&mut self, opener: char, found: CodePoint) {
        let offset = self.off;
        self.fail(ScanError::Unterminated {
            opener: classify(CodePoint::Char(opener)),
            found: classify(found),
            offset,
        });
    }

    pub(crate) fn unbalanced(&mut self, found: CodePoint, open: char, close: char, depth: isize) {
        let offset = self.off;
        self.fail(ScanError::Unbalanced {
            open: classify(CodePoint::Char(open)),
            close: classify(CodePoint::Char(close)),
            found: classify(found),
            depth,
            offset,
        });
    }

    pub(crate) fn ambiguous(&mut self, found: CodePoint, suggestions: Vec<String>) {
        let offset = self.off;
        self.fail(ScanError::Ambiguous {
            found: classify(found),
            suggestions,
            offset,
        });
    }

    /// Latches `error` unless a failure is already latched, and moves to `Eof`
    pub(crate) fn fail(&mut self, error: ScanError) {
        if self.err.is_some() {
            return;
        }
        debug!(offset = error.offset(), error = %error, "scanner failed");
        self.err = Some(error);
        self.ch1 = CodePoint::Eof;
        self.ch2 = None;
    }
}

impl fmt::Display for Scanner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pattern = String::from_utf8_lossy(self.pattern);
        match &self.err {
            Some(err) => write!(f, "Scanner({pattern}: err {err} at {})", self.off),
            None => write!(f, "Scanner({}: {})", Quoted(&*pattern), self.pos),
        }
    }
}
