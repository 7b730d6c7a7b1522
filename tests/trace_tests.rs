//! Tests for the box drawn trace renderer

use route_lexer::{Lexeme, Scanner, TraceError, scan, trace};
use std::io::{self, Write};

/// Accepts at most `limit` bytes, then fails every write
struct LimitedWriter {
    buf: Vec<u8>,
    limit: usize,
}

impl Write for LimitedWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let room = self.limit.saturating_sub(self.buf.len());
        if room == 0 {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "writer is full"));
        }
        let n = room.min(data.len());
        self.buf.extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_trace_table_layout() {
    let expected = "\
╔═════╤═════╤══════════════╤═══════════════════════════════════════════════╗
║ Off │ Pos │ Pattern (12) │ Token                                         ║
╠═════╪═════╪══════════════╪═══════════════════════════════════════════════╣
║   0 │   1 │ /:id([0-9])  │ token \"/\" (FSLASH) at rune 1                  ║
║─────┼─────┼─┵────────────┼───────────────────────────────────────────────╢
║   1 │   2 │ /:id([0-9])  │ token \":\" (COLON) at rune 1 (byte 1)          ║
║─────┼─────┼──┴───────────┼───────────────────────────────────────────────╢
║   3 │   4 │ /:id([0-9])  │ token \"id\" (IDENT) at rune 2 (byte 2)         ║
║─────┼─────┼────┴─────────┼───────────────────────────────────────────────╢
║  10 │  11 │ /:id([0-9])  │ token \"[0-9]\" (REGEXP) at rune 4 (byte 4)     ║
║─────┼─────┼───────────┴──┼───────────────────────────────────────────────╢
║  11 │  11 │ /:id([0-9])  │ token (EOF) at rune 11 (byte 11)              ║
╙─────┴─────┴───────────┺──┴───────────────────────────────────────────────╜
";

    let mut out = Vec::new();
    let tokens = trace(&mut out, "/:id([0-9])").unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), expected);
    assert_eq!(
        &*tokens.lexemes(),
        &[
            Lexeme::FSlash,
            Lexeme::Colon,
            Lexeme::Ident,
            Lexeme::Regexp,
            Lexeme::Eof
        ]
    );
}

#[test]
fn test_trace_failing_writer() {
    for limit in (0..400).step_by(24) {
        let mut writer = LimitedWriter {
            buf: Vec::new(),
            limit,
        };
        let result = trace(&mut writer, "GET ");
        assert!(result.is_err(), "limit {limit} should fail");
    }
}

#[test]
fn test_trace_io_error_keeps_partial_tokens() {
    let pattern = "/teams/:team/users/:user";
    let mut full = Vec::new();
    trace(&mut full, pattern).unwrap();

    // Header plus the first row and its separator.
    let text = String::from_utf8(full).unwrap();
    let limit: usize = text.lines().take(5).map(|l| l.len() + 1).sum();

    let mut writer = LimitedWriter {
        buf: Vec::new(),
        limit,
    };
    match trace(&mut writer, pattern) {
        Err(TraceError::Io { tokens, .. }) => {
            assert_eq!(
                &*tokens.lexemes(),
                &[Lexeme::FSlash, Lexeme::Segment],
                "{tokens}"
            );
        }
        other => panic!("expected an io failure, got {other:?}"),
    }
}

#[test]
fn test_trace_matches_scan() {
    let patterns = [
        "/",
        "GET /users/:user([a-zA-Z]{6,20})",
        "pre-{aaa}-and-{bbb}-post",
        ":aaa{'regex': .+?}",
        ":aaa*[3]",
        "/ÀＡ𝐀/:id",
    ];

    let mut reused = Scanner::new("");
    for pattern in patterns {
        let mut out = Vec::new();
        let traced = trace(&mut out, pattern).unwrap();
        let scanned = scan(pattern).unwrap();
        assert_eq!(traced, scanned, "{pattern:?}");

        reused.reset(pattern);
        let stepped: Vec<_> =
            std::iter::from_fn(|| reused.more().then(|| reused.scan())).collect();
        assert_eq!(&*scanned, &stepped[..], "{pattern:?}");

        let text = String::from_utf8(out).unwrap();
        let rows = text.lines().count();
        assert_eq!(rows, 3 + 2 * scanned.len(), "{pattern:?}\n{text}");
    }
}

#[test]
fn test_trace_scan_error_keeps_partial_tokens() {
    let mut out = Vec::new();
    let err = trace(&mut out, "/users/:name(`abc").unwrap_err();
    assert!(err.to_string().starts_with("unterminated BQUOTE"), "{err}");
    let tokens = err.into_tokens();
    assert_eq!(tokens.last().map(|t| t.lexeme), Some(Lexeme::Regexp));
}

#[test]
fn test_trace_rows_escape_control_characters() {
    let mut out = Vec::new();
    let tokens = trace(&mut out, "/a\u{1}b").unwrap();
    assert_eq!(tokens[1].lexeme, Lexeme::Segment);
    assert_eq!(&*tokens[1].literal, "a\u{1}b");

    let text = String::from_utf8(out).unwrap();
    assert!(
        text.contains(r#"token "a\x01b" (SEGMENT) at rune 1 (byte 1)"#),
        "{text}"
    );
}
