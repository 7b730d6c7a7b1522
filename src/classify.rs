//! Context free classification of code points
//!
//! ASCII code points are answered from a compile time lookup table, everything
//! else falls back to Unicode general categories.

use crate::token::Lexeme;
use unicode_general_category::{GeneralCategory, get_general_category};

/// The byte order marker, legal only at byte 0
pub const BOM: char = '\u{FEFF}';

/// A decoded unit of input along with the scanner sentinels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodePoint {
    /// Nothing has been read since the scanner was reset
    Reset,
    /// Input is exhausted or the scanner has failed
    Eof,
    /// A decoded character
    Char(char),
}

impl CodePoint {
    /// Returns the character, if this is not a sentinel
    pub const fn as_char(self) -> Option<char> {
        match self {
            CodePoint::Char(c) => Some(c),
            _ => None,
        }
    }

    /// Returns true if this is exactly `c`
    pub fn is(self, c: char) -> bool {
        self == CodePoint::Char(c)
    }

    /// Returns true if this is any of `set`
    pub fn is_any(self, set: &[char]) -> bool {
        self.as_char().is_some_and(|c| set.contains(&c))
    }

    /// Number of bytes the code point occupies when encoded, zero for sentinels
    pub fn len_utf8(self) -> usize {
        self.as_char().map_or(0, char::len_utf8)
    }
}

impl From<char> for CodePoint {
    fn from(c: char) -> Self {
        CodePoint::Char(c)
    }
}

/// Bitfield flags for ASCII classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterFlags(u8);

impl CharacterFlags {
    /// Space, tab, line feed and carriage return
    pub const WHITESPACE: Self = Self(1 << 0);
    /// `A` through `Z`
    pub const UPPER: Self = Self(1 << 1);
    /// Letters and `_`
    pub const IDENT_START: Self = Self(1 << 2);
    /// `0` through `9`
    pub const DIGIT: Self = Self(1 << 3);
    /// Anything allowed inside a path segment
    pub const SEGMENT: Self = Self(1 << 4);
    /// C0 controls and DEL
    pub const CONTROL: Self = Self(1 << 5);
    /// Characters with a dedicated terminal lexeme
    pub const TERMINAL: Self = Self(1 << 6);

    /// Creates empty flags
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Checks if any of the given flags are set
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Checks if all of the given flags are set
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Returns the union of two flag sets
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns true if no flags are set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for CharacterFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Character lookup table for O(1) ASCII classification
#[derive(Debug, Clone)]
pub struct CharacterTable([CharacterFlags; 128]);

impl CharacterTable {
    /// Creates the table at compile time
    pub const fn new() -> Self {
        let mut table = [CharacterFlags::empty(); 128];
        let mut i = 0;

        while i < 128 {
            let ch = i as u8;
            let mut flags = CharacterFlags::empty();

            match ch {
                b' ' | b'\t' | b'\n' | b'\r' => flags = flags.union(CharacterFlags::WHITESPACE),
                _ => {}
            }

            if ch.is_ascii_uppercase() {
                flags = flags.union(CharacterFlags::UPPER);
            }

            if ch.is_ascii_alphabetic() || ch == b'_' {
                flags = flags.union(CharacterFlags::IDENT_START);
            }

            if ch.is_ascii_digit() {
                flags = flags.union(CharacterFlags::DIGIT);
            }

            if ch < 32 || ch == 127 {
                flags = flags.union(CharacterFlags::CONTROL);
            }

            // NUL never reaches a scanner, it is still excluded for completeness
            if ch != 0 && ch != b'/' && !flags.intersects(CharacterFlags::WHITESPACE) {
                flags = flags.union(CharacterFlags::SEGMENT);
            }

            match ch {
                b'/' | b':' | b',' | b'-' | b'*' | b'`' | b'\\' | b'\'' | b'"' | b'(' | b')'
                | b'{' | b'}' | b'[' | b']' => flags = flags.union(CharacterFlags::TERMINAL),
                _ => {}
            }

            table[i] = flags;
            i += 1;
        }

        Self(table)
    }

    /// Returns the flags for an ASCII byte, empty for anything else
    #[inline(always)]
    pub const fn get_flags(&self, ch: u8) -> CharacterFlags {
        if ch < 128 {
            self.0[ch as usize]
        } else {
            CharacterFlags::empty()
        }
    }

    /// Tests if an ASCII byte has any of the given flags
    #[inline(always)]
    pub const fn test_character(&self, ch: u8, flags: CharacterFlags) -> bool {
        self.get_flags(ch).intersects(flags)
    }
}

impl Default for CharacterTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Global character table instance
pub static CHARACTER_TABLE: CharacterTable = CharacterTable::new();

#[inline(always)]
fn ascii_test(c: char, flags: CharacterFlags) -> Option<bool> {
    if c.is_ascii() {
        Some(CHARACTER_TABLE.test_character(c as u8, flags))
    } else {
        None
    }
}

/// Space, tab, line feed or carriage return
pub fn is_whitespace(cp: CodePoint) -> bool {
    match cp {
        CodePoint::Char(c) => ascii_test(c, CharacterFlags::WHITESPACE).unwrap_or(false),
        _ => false,
    }
}

/// `A` through `Z`
pub fn is_upper(cp: CodePoint) -> bool {
    match cp {
        CodePoint::Char(c) => ascii_test(c, CharacterFlags::UPPER).unwrap_or(false),
        _ => false,
    }
}

/// A Unicode decimal digit (category `Nd`)
///
/// Only ASCII digits start a `NUMBER`, see [`classify`], but a number or
/// identifier may continue with any decimal digit.
pub fn is_digit(cp: CodePoint) -> bool {
    match cp {
        CodePoint::Char(c) => ascii_test(c, CharacterFlags::DIGIT)
            .unwrap_or_else(|| get_general_category(c) == GeneralCategory::DecimalNumber),
        _ => false,
    }
}

/// A Unicode letter (category `L`) or `_`
pub fn is_ident_start(cp: CodePoint) -> bool {
    match cp {
        CodePoint::Char(c) => ascii_test(c, CharacterFlags::IDENT_START).unwrap_or_else(|| {
            matches!(
                get_general_category(c),
                GeneralCategory::UppercaseLetter
                    | GeneralCategory::LowercaseLetter
                    | GeneralCategory::TitlecaseLetter
                    | GeneralCategory::ModifierLetter
                    | GeneralCategory::OtherLetter
            )
        }),
        _ => false,
    }
}

/// A Unicode letter, `_` or decimal digit
pub fn is_ident(cp: CodePoint) -> bool {
    is_ident_start(cp) || is_digit(cp)
}

/// Not NUL, BOM or the replacement character
pub fn is_valid(cp: CodePoint) -> bool {
    match cp {
        CodePoint::Char(c) => c != '\0' && c != BOM && c != char::REPLACEMENT_CHARACTER,
        _ => false,
    }
}

/// A valid code point that is not a control character
pub fn is_lit(cp: CodePoint) -> bool {
    match cp {
        CodePoint::Char(c) => is_valid(cp) && !c.is_control(),
        _ => false,
    }
}

/// Anything but NUL, `/` and whitespace
pub fn is_segment(cp: CodePoint) -> bool {
    match cp {
        CodePoint::Char(c) => ascii_test(c, CharacterFlags::SEGMENT).unwrap_or(true),
        _ => false,
    }
}

/// True when `cp` is a backslash and the lookahead is one of `set`
pub fn is_escaped(cp: CodePoint, lookahead: CodePoint, set: &[char]) -> bool {
    cp.is('\\') && lookahead.is_any(set)
}

fn terminal(c: char) -> Lexeme {
    match c {
        '/' => Lexeme::FSlash,
        ':' => Lexeme::Colon,
        ',' => Lexeme::Comma,
        '-' => Lexeme::Minus,
        '*' => Lexeme::Wild,
        '`' => Lexeme::BQuote,
        '\\' => Lexeme::BSlash,
        '\'' => Lexeme::SQuote,
        '"' => Lexeme::DQuote,
        '(' => Lexeme::LParen,
        ')' => Lexeme::RParen,
        '{' => Lexeme::LBrace,
        '}' => Lexeme::RBrace,
        '[' => Lexeme::LBrack,
        ']' => Lexeme::RBrack,
        _ => Lexeme::Bad,
    }
}

/// Returns the lexeme a single code point belongs to, without regard to context
pub fn classify(cp: CodePoint) -> Lexeme {
    let c = match cp {
        CodePoint::Eof => return Lexeme::Eof,
        CodePoint::Reset => return Lexeme::Bad,
        CodePoint::Char(c) => c,
    };

    if c.is_ascii() {
        let flags = CHARACTER_TABLE.get_flags(c as u8);
        if flags.intersects(CharacterFlags::WHITESPACE) {
            return Lexeme::Whitespace;
        }
        if flags.intersects(CharacterFlags::TERMINAL) {
            return terminal(c);
        }
        if flags.intersects(CharacterFlags::DIGIT) {
            return Lexeme::Digit;
        }
    }

    if !is_valid(cp) {
        Lexeme::Bad
    } else if is_upper(cp) {
        Lexeme::Upper
    } else if is_ident_start(cp) {
        Lexeme::Ident
    } else if is_lit(cp) {
        Lexeme::Lit
    } else {
        Lexeme::Bad
    }
}

/// Classifies each character of `set`, in order
pub fn classify_all(set: &[char]) -> crate::token::Lexemes {
    set.iter().map(|&c| classify(CodePoint::Char(c))).collect()
}
