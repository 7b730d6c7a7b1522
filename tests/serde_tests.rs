use route_lexer::{Lexeme, Lexemes, Position, Token, Tokens, scan};
use serde_json::{Value, json};

#[test]
fn test_token_stream_to_json() {
    let tokens = scan("/:id").unwrap();
    let value = serde_json::to_value(&tokens).unwrap();
    assert_eq!(
        value,
        json!([
            {
                "lexeme": "FSLASH",
                "literal": "/",
                "begin": { "line": 1, "column": 1, "offset": 0 },
                "end": { "line": 1, "column": 1, "offset": 1 }
            },
            {
                "lexeme": "COLON",
                "literal": ":",
                "begin": { "line": 1, "column": 1, "offset": 1 },
                "end": { "line": 1, "column": 2, "offset": 2 }
            },
            {
                "lexeme": "IDENT",
                "literal": "id",
                "begin": { "line": 1, "column": 2, "offset": 2 },
                "end": { "line": 1, "column": 4, "offset": 4 }
            },
            {
                "lexeme": "EOF",
                "literal": "",
                "begin": { "line": 1, "column": 4, "offset": 4 },
                "end": { "line": 1, "column": 4, "offset": 4 }
            }
        ])
    );
}

#[test]
fn test_lexemes_serialize_by_name() {
    for lexeme in Lexeme::ALL {
        let value = serde_json::to_value(lexeme).unwrap();
        assert_eq!(value, Value::String(lexeme.name().to_string()));
    }

    let lexemes = Lexemes::from(&[Lexeme::Method, Lexeme::FSlash, Lexeme::Segment][..]);
    assert_eq!(
        serde_json::to_string(&lexemes).unwrap(),
        r#"["METHOD","FSLASH","SEGMENT"]"#
    );
}

#[test]
fn test_tokens_deserialize_borrowed() {
    let pattern = r#"GET /users/:user("[a-z]\"x")"#;
    let tokens = scan(pattern).unwrap();
    let json = serde_json::to_string(&tokens).unwrap();

    let decoded: Tokens<'_> = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, tokens);

    let regexp = decoded
        .iter()
        .find(|t| t.lexeme == Lexeme::Regexp)
        .map(|t| t.literal.to_string());
    assert_eq!(regexp.as_deref(), Some(r#"[a-z]"x"#));
}

#[test]
fn test_position_round_trips_through_json() {
    let pos = Position::at(3, 23, 23);
    let json = serde_json::to_string(&pos).unwrap();
    assert_eq!(json, r#"{"line":3,"column":23,"offset":23}"#);
    assert_eq!(serde_json::from_str::<Position>(&json).unwrap(), pos);

    let json = r#"{
        "lexeme": "NUMBER",
        "literal": "15",
        "begin": { "line": 1, "column": 5, "offset": 5 },
        "end": { "line": 1, "column": 7, "offset": 7 }
    }"#;
    let token: Token<'_> = serde_json::from_str(json).unwrap();
    assert_eq!(token.to_string(), r#"token "15" (NUMBER) at rune 5 (byte 5)"#);
}
