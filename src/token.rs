//! Lexemes and tokens produced by the route scanner
//!
//! A [`Lexeme`] is the category tag of a token. A [`Token`] pairs a lexeme with
//! the literal text it covers and the positions it spans.

use crate::error::Position;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::ops::Deref;
use unicode_general_category::{GeneralCategory, get_general_category};

/// Category of one or more code points that compose a token
///
/// Nonterminals aggregate a run of code points, terminals are always exactly
/// one code point long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Lexeme {
    /// Not a lexeme, also the zero value
    Bad,

    // Nonterminals
    /// A valid identifier: letter or `_` followed by letters, digits or `_`
    Ident,
    /// One or more valid code points outside the token and identifier sets
    Lit,
    /// Uppercase A-Z http method such as `GET`
    Method,
    /// `123`
    Number,
    /// `foo` in `(foo)`, ``(`foo`)``, `('foo')`
    Regexp,
    /// `foo` in `` `foo` ``, `"foo"`, `'foo'`
    String,
    /// Literal path segment
    Segment,
    /// Whitespace character
    Whitespace,

    // Terminals
    /// `/`
    FSlash,
    /// `\`
    BSlash,
    /// `:`
    Colon,
    /// `[A-Z]`
    Upper,
    /// `,`
    Comma,
    /// `[0-9]`
    Digit,
    /// `-`
    Minus,
    /// `*`
    Wild,
    /// `` ` ``
    BQuote,
    /// `'`
    SQuote,
    /// `"`
    DQuote,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBrack,
    /// `]`
    RBrack,

    /// End of input
    Eof,
}

impl Lexeme {
    /// Every lexeme in declaration order
    pub const ALL: [Lexeme; 27] = [
        Lexeme::Bad,
        Lexeme::Ident,
        Lexeme::Lit,
        Lexeme::Method,
        Lexeme::Number,
        Lexeme::Regexp,
        Lexeme::String,
        Lexeme::Segment,
        Lexeme::Whitespace,
        Lexeme::FSlash,
        Lexeme::BSlash,
        Lexeme::Colon,
        Lexeme::Upper,
        Lexeme::Comma,
        Lexeme::Digit,
        Lexeme::Minus,
        Lexeme::Wild,
        Lexeme::BQuote,
        Lexeme::SQuote,
        Lexeme::DQuote,
        Lexeme::LParen,
        Lexeme::RParen,
        Lexeme::LBrace,
        Lexeme::RBrace,
        Lexeme::LBrack,
        Lexeme::RBrack,
        Lexeme::Eof,
    ];

    /// Maps an ordinal back to its lexeme, anything out of range is `Bad`
    pub fn from_index(index: usize) -> Lexeme {
        Self::ALL.get(index).copied().unwrap_or(Lexeme::Bad)
    }

    /// Returns true for every lexeme except `Bad`, `Eof` included
    pub const fn is_valid(self) -> bool {
        !matches!(self, Lexeme::Bad)
    }

    /// Returns true for lexemes that are always a single fixed code point or class
    pub const fn is_terminal(self) -> bool {
        (self as u8) >= (Lexeme::FSlash as u8) && (self as u8) <= (Lexeme::RBrack as u8)
    }

    /// Returns true for lexemes whose literal is an aggregated run
    pub const fn is_nonterminal(self) -> bool {
        (self as u8) >= (Lexeme::Ident as u8) && (self as u8) <= (Lexeme::Whitespace as u8)
    }

    /// Returns the stable display name
    pub const fn name(self) -> &'static str {
        match self {
            Lexeme::Bad => "BAD",
            Lexeme::Ident => "IDENT",
            Lexeme::Lit => "LIT",
            Lexeme::Method => "METHOD",
            Lexeme::Number => "NUMBER",
            Lexeme::Regexp => "REGEXP",
            Lexeme::String => "STRING",
            Lexeme::Segment => "SEGMENT",
            Lexeme::Whitespace => "WHITESPACE",
            Lexeme::FSlash => "FSLASH",
            Lexeme::BSlash => "BSLASH",
            Lexeme::Colon => "COLON",
            Lexeme::Upper => "UPPER",
            Lexeme::Comma => "COMMA",
            Lexeme::Digit => "DIGIT",
            Lexeme::Minus => "MINUS",
            Lexeme::Wild => "WILD",
            Lexeme::BQuote => "BQUOTE",
            Lexeme::SQuote => "SQUOTE",
            Lexeme::DQuote => "DQUOTE",
            Lexeme::LParen => "LPAREN",
            Lexeme::RParen => "RPAREN",
            Lexeme::LBrace => "LBRACE",
            Lexeme::RBrace => "RBRACE",
            Lexeme::LBrack => "LBRACK",
            Lexeme::RBrack => "RBRACK",
            Lexeme::Eof => "EOF",
        }
    }
}

impl Default for Lexeme {
    fn default() -> Self {
        Lexeme::Bad
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// An ordered list of lexemes, mostly used to describe expectations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexemes(SmallVec<[Lexeme; 5]>);

impl Lexemes {
    /// Creates an empty list
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Appends a lexeme
    pub fn push(&mut self, lexeme: Lexeme) {
        self.0.push(lexeme);
    }

    /// Renders each name in double quotes, placing `conjunction` before the
    /// final name and `", "` between the others:
    ///
    /// ```
    /// use route_lexer::{Lexeme, Lexemes};
    ///
    /// let lexemes = Lexemes::from(&[Lexeme::FSlash, Lexeme::Colon, Lexeme::Eof][..]);
    /// assert_eq!(lexemes.join(" or "), r#""FSLASH", "COLON" or "EOF""#);
    /// ```
    pub fn join(&self, conjunction: &str) -> String {
        match self.0.as_slice() {
            [] => "(NONE)".to_string(),
            [only] => format!("\"{only}\""),
            [head @ .., last] => {
                let mut out = String::new();
                for (i, lexeme) in head.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push('"');
                    out.push_str(lexeme.name());
                    out.push('"');
                }
                out.push_str(conjunction);
                out.push('"');
                out.push_str(last.name());
                out.push('"');
                out
            }
        }
    }
}

impl Deref for Lexemes {
    type Target = [Lexeme];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&[Lexeme]> for Lexemes {
    fn from(lexemes: &[Lexeme]) -> Self {
        Self(SmallVec::from_slice(lexemes))
    }
}

impl FromIterator<Lexeme> for Lexemes {
    fn from_iter<I: IntoIterator<Item = Lexeme>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Lexemes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(", "))
    }
}

/// A single lexical token in a route pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token<'a> {
    /// Category of the token
    pub lexeme: Lexeme,
    /// Literal text, unescaped for quoted strings
    #[serde(borrow)]
    pub literal: Cow<'a, str>,
    /// Position before the first code point of the token
    pub begin: Position,
    /// Position after the last code point of the token
    pub end: Position,
}

impl<'a> Token<'a> {
    /// Creates a token from its parts
    pub fn new(
        lexeme: Lexeme,
        literal: impl Into<Cow<'a, str>>,
        begin: Position,
        end: Position,
    ) -> Self {
        Self {
            lexeme,
            literal: literal.into(),
            begin,
            end,
        }
    }

    /// Creates an empty `Eof` token at the given position
    pub fn eof(at: Position) -> Self {
        Self::new(Lexeme::Eof, "", at, at)
    }

    /// Returns true if the lexeme and both positions are valid
    pub fn is_valid(&self) -> bool {
        self.lexeme.is_valid() && self.begin.is_valid() && self.end.is_valid()
    }

    /// Detaches the token from the pattern it was scanned from
    pub fn into_owned(self) -> Token<'static> {
        Token {
            lexeme: self.lexeme,
            literal: Cow::Owned(self.literal.into_owned()),
            begin: self.begin,
            end: self.end,
        }
    }
}

impl Default for Token<'_> {
    fn default() -> Self {
        Self::new(Lexeme::Bad, "", Position::UNKNOWN, Position::UNKNOWN)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literal.is_empty() {
            if self.begin.is_valid() {
                write!(f, "token ({}) at {}", self.lexeme, self.begin)
            } else {
                write!(f, "token ({})", self.lexeme)
            }
        } else {
            write!(
                f,
                "token {} ({}) at {}",
                Quoted(&*self.literal),
                self.lexeme,
                self.begin
            )
        }
    }
}

/// Displays a string in double quotes, escaping non-printable code points as
/// `\xNN`, `\uNNNN` or `\UNNNNNNNN`
pub(crate) struct Quoted<'s>(pub &'s str);

fn is_printable(c: char) -> bool {
    c == ' '
        || !matches!(
            get_general_category(c),
            GeneralCategory::SpaceSeparator
                | GeneralCategory::LineSeparator
                | GeneralCategory::ParagraphSeparator
                | GeneralCategory::Control
                | GeneralCategory::Format
                | GeneralCategory::Surrogate
                | GeneralCategory::PrivateUse
                | GeneralCategory::Unassigned
        )
}

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('"')?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\u{7}' => f.write_str("\\a")?,
                '\u{8}' => f.write_str("\\b")?,
                '\u{c}' => f.write_str("\\f")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                '\u{b}' => f.write_str("\\v")?,
                c if is_printable(c) => f.write_char(c)?,
                c if c < ' ' || c == '\u{7f}' => write!(f, "\\x{:02x}", c as u32)?,
                c if (c as u32) < 0x10000 => write!(f, "\\u{:04x}", c as u32)?,
                c => write!(f, "\\U{:08x}", c as u32)?,
            }
        }
        f.write_char('"')
    }
}

/// A sequence of tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tokens<'a>(#[serde(borrow)] Vec<Token<'a>>);

impl<'a> Tokens<'a> {
    /// Creates an empty sequence
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a token
    pub fn push(&mut self, token: Token<'a>) {
        self.0.push(token);
    }

    /// Returns the lexeme of each token
    pub fn lexemes(&self) -> Lexemes {
        self.0.iter().map(|t| t.lexeme).collect()
    }

    /// Summarizes the sequence as its lexemes joined with `conjunction`, spanning
    /// from the beginning of the first token to the end of the last
    pub fn join(&self, conjunction: &str) -> String {
        match self.0.as_slice() {
            [] => "(NONE)".to_string(),
            [only] => only.to_string(),
            [first, .., last] => {
                let end = if last.end.is_valid() {
                    last.end
                } else {
                    last.begin
                };
                format!(
                    "{} from {} to {}",
                    self.lexemes().join(conjunction),
                    first.begin,
                    end
                )
            }
        }
    }

    /// Returns the underlying vector
    pub fn into_vec(self) -> Vec<Token<'a>> {
        self.0
    }
}

impl<'a> Deref for Tokens<'a> {
    type Target = [Token<'a>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> From<Vec<Token<'a>>> for Tokens<'a> {
    fn from(tokens: Vec<Token<'a>>) -> Self {
        Self(tokens)
    }
}

impl<'a> FromIterator<Token<'a>> for Tokens<'a> {
    fn from_iter<I: IntoIterator<Item = Token<'a>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for Tokens<'a> {
    type Item = Token<'a>;
    type IntoIter = std::vec::IntoIter<Token<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'t, 'a> IntoIterator for &'t Tokens<'a> {
    type Item = &'t Token<'a>;
    type IntoIter = std::slice::Iter<'t, Token<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Tokens<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(", "))
    }
}
