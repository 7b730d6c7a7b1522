//! Box drawn trace of a scan
//!
//! Every token produced while scanning a pattern becomes one row of a table
//! showing the scanner offsets, the pattern with a marker under the current
//! offset, and the token itself.

use crate::error::TraceError;
use crate::lexer::Scanner;
use crate::token::Tokens;
use crate::unibox;
use std::io::{self, Write};

/// Column widths of the trace table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceConfig {
    /// The pattern column is at least this many code points wide
    pub min_pattern_width: usize,
    /// Width the token column is padded to
    pub token_width: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            min_pattern_width: 12,
            token_width: 45,
        }
    }
}

/// Scans `pattern` like [`crate::scan`] while rendering each step to `writer`
///
/// On failure the error carries the tokens produced before it.
pub fn trace<W: Write>(writer: W, pattern: &str) -> Result<Tokens<'_>, TraceError<'_>> {
    trace_with_config(writer, pattern, &TraceConfig::default())
}

/// Like [`trace`] with custom column widths
pub fn trace_with_config<'a, W: Write>(
    mut writer: W,
    pattern: &'a str,
    config: &TraceConfig,
) -> Result<Tokens<'a>, TraceError<'a>> {
    let table = Table::new(pattern, config);
    let mut tokens = Tokens::new();

    if let Err(error) = table.write_header(&mut writer) {
        return Err(TraceError::Io { error, tokens });
    }

    let mut scanner = Scanner::new(pattern);
    while scanner.more() {
        let token = scanner.scan();
        let row = table.write_row(&mut writer, &scanner, &token.to_string());
        tokens.push(token);
        if let Err(error) = row {
            return Err(TraceError::Io { error, tokens });
        }
    }

    match scanner.err() {
        Some(error) => Err(TraceError::Scan {
            error: error.clone(),
            tokens,
        }),
        None => Ok(tokens),
    }
}

struct Table<'p> {
    pattern: &'p str,
    width: usize,
    bar: String,
    rule: usize,
    token_width: usize,
}

impl<'p> Table<'p> {
    fn new(pattern: &'p str, config: &TraceConfig) -> Self {
        let runes = pattern.chars().count();
        let width = runes.max(config.min_pattern_width);
        Self {
            pattern,
            width,
            bar: "─".repeat(width - runes),
            rule: config.token_width + 2,
            token_width: config.token_width,
        }
    }

    fn write_header<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let (width, rule) = (self.width, self.rule);
        writeln!(
            w,
            "╔═════╤═════╤═{}═╤{}╗",
            "═".repeat(width),
            "═".repeat(rule)
        )?;
        writeln!(
            w,
            "║ Off │ Pos │ {:<width$} │ {:<token$} ║",
            format!("Pattern ({width})"),
            "Token",
            token = self.token_width,
        )?;
        writeln!(
            w,
            "╠═════╪═════╪═{}═╪{}╣",
            "═".repeat(width),
            "═".repeat(rule)
        )
    }

    fn write_row<W: Write>(&self, w: &mut W, scanner: &Scanner<'_>, token: &str) -> io::Result<()> {
        writeln!(
            w,
            "║ {:>3} │ {:>3} │ {:<width$} │ {:<token$} ║",
            scanner.offset(),
            scanner.read_offset(),
            self.pattern,
            token,
            width = self.width,
            token = self.token_width,
        )?;

        let mark = unibox::mark_line_below(self.pattern, scanner.offset());
        let line = "─".repeat(self.rule);
        if scanner.more() {
            writeln!(w, "║─────┼─────┼─{mark}{}─┼{line}╢", self.bar)
        } else {
            writeln!(w, "╙─────┴─────┴─{mark}{}─┴{line}╜", self.bar)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lexeme;

    #[test]
    fn test_trace_returns_tokens() {
        let mut out = Vec::new();
        let tokens = trace(&mut out, "/teams/:team/users/:user").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!tokens.is_empty());
        for token in &tokens {
            assert!(text.contains(token.lexeme.name()), "{token} missing from trace");
        }
        assert_eq!(tokens.last().map(|t| t.lexeme), Some(Lexeme::Eof));
    }

    #[test]
    fn test_trace_widens_for_long_patterns() {
        let pattern = "/a/very/long/path/to/walk";
        let mut out = Vec::new();
        trace(&mut out, pattern).unwrap();
        let text = String::from_utf8(out).unwrap();
        let header = text.lines().nth(1).unwrap_or_default();
        assert!(header.contains("Pattern (25)"), "{header}");
        let width = text.lines().next().unwrap_or_default().chars().count();
        for line in text.lines() {
            assert_eq!(line.chars().count(), width, "{line}");
        }
    }

    #[test]
    fn test_long_tokens_overflow_only_their_row() {
        let mut out = Vec::new();
        trace(&mut out, "/a/very/long/pattern/here").unwrap();
        let text = String::from_utf8(out).unwrap();
        let width = text.lines().next().unwrap_or_default().chars().count();

        let (rows, rules): (Vec<&str>, Vec<&str>) =
            text.lines().partition(|l| l.starts_with("║ "));
        for rule in rules {
            assert_eq!(rule.chars().count(), width, "{rule}");
        }
        let wide: Vec<&str> = rows
            .into_iter()
            .filter(|row| row.chars().count() > width)
            .collect();
        assert_eq!(wide.len(), 1, "{text}");
        assert!(wide[0].contains(r#"token "pattern" (SEGMENT) at rune 13 (byte 13)"#));
    }

    #[test]
    fn test_trace_with_config() {
        let config = TraceConfig {
            min_pattern_width: 20,
            token_width: 30,
        };
        let mut out = Vec::new();
        trace_with_config(&mut out, "/a", &config).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Pattern (20)"));
        let first = text.lines().next().unwrap_or_default();
        assert_eq!(first.chars().count(), 1 + 5 + 1 + 5 + 1 + 22 + 1 + 32 + 1);
    }

    #[test]
    fn test_trace_reports_scan_errors() {
        let mut out = Vec::new();
        let err = trace(&mut out, "/a/:b(").unwrap_err();
        assert!(err.to_string().contains("unbalanced"));
        assert!(err.scan_error().is_some());
        assert_eq!(
            &*err.tokens().lexemes(),
            &[Lexeme::FSlash, Lexeme::Segment, Lexeme::FSlash, Lexeme::Colon, Lexeme::Ident, Lexeme::Regexp]
        );
    }
}
