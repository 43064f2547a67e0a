use super::*;

fn terminated(src: &str) -> std::vec::Vec<u8> {
    let mut bytes = src.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

fn kinds(src: &str) -> std::vec::Vec<TokenKind> {
    let bytes = terminated(src);
    let mut lexer = Lexer::new(&bytes);
    let mut out = std::vec::Vec::new();
    loop {
        let tok = lexer.scan_token();
        out.push(tok.kind);
        if matches!(tok.kind, TokenKind::Eof | TokenKind::Error) {
            return out;
        }
    }
}

fn single(src: &str) -> (TokenKind, std::string::String) {
    let bytes = terminated(src);
    let mut lexer = Lexer::new(&bytes);
    let tok = lexer.scan_token();
    let payload = match tok.value {
        TokenValue::None => std::string::String::new(),
        TokenValue::Str(s) => s.to_string(),
        TokenValue::Int(i) => i.to_string(),
        TokenValue::Float(f) => format!("{f:?}"),
        TokenValue::Bool(b) => b.to_string(),
        TokenValue::Arity(n) => n.to_string(),
        TokenValue::Error(kind) => kind.code().to_string(),
    };
    (tok.kind, payload)
}

fn error_of(src: &str) -> (ErrorKind, u32, u32) {
    let bytes = terminated(src);
    let mut lexer = Lexer::new(&bytes);
    loop {
        let tok = lexer.scan_token();
        match tok.value {
            TokenValue::Error(kind) => return (kind, tok.line, tok.column),
            _ if tok.kind == TokenKind::Eof => panic!("no error token in {src:?}"),
            _ => {}
        }
    }
}

use TokenKind::*;

#[test]
fn punctuation() {
    assert_eq!(
        kinds("= { } [ ] ( ) ; ,"),
        [
            Equals,
            BraceLeft,
            BraceRight,
            BracketLeft,
            BracketRight,
            ParenLeft,
            ParenRight,
            Semicolon,
            Comma,
            Eof
        ]
    );
}

#[test]
fn field_statement() {
    assert_eq!(kinds("name = \"x\";"), [Key, Equals, String, Semicolon, Eof]);
    assert_eq!(kinds("v=vec2(1,2.5);"), [
        Key, Equals, Vec, ParenLeft, Int, Comma, Float, ParenRight, Semicolon, Eof
    ]);
}

#[test]
fn empty_and_trivia_only_input() {
    assert_eq!(kinds(""), [Eof]);
    assert_eq!(kinds("  \t\r\n  "), [Eof]);
    assert_eq!(kinds("// only a comment"), [Eof]);
    assert_eq!(kinds("/* block */ // line\n"), [Eof]);
}

#[test]
fn eof_is_sticky() {
    let bytes = terminated("a");
    let mut lexer = Lexer::new(&bytes);
    assert_eq!(lexer.scan_token().kind, Key);
    for _ in 0..3 {
        assert_eq!(lexer.scan_token().kind, Eof);
    }
}

#[test]
fn embedded_nul_ends_input() {
    assert_eq!(kinds("a\0= 1;"), [Key, Eof]);
}

#[test]
fn strings() {
    assert_eq!(single("\"hello world\""), (String, "hello world".into()));
    assert_eq!(single("\"\""), (String, "".into()));
    // No escape processing.
    assert_eq!(single(r#""a\nb""#), (String, r"a\nb".into()));
    assert_eq!(single("\"multi\nline\""), (String, "multi\nline".into()));
    assert_eq!(single("\"caf\u{e9}\""), (String, "caf\u{e9}".into()));
}

#[test]
fn string_payload_excludes_quotes_token_span_includes_them() {
    let bytes = terminated("  \"abc\"");
    let mut lexer = Lexer::new(&bytes);
    let tok = lexer.scan_token();
    assert_eq!(tok.span, Span::new(2, 7));
    let TokenValue::Str(s) = tok.value else {
        panic!("expected string payload");
    };
    assert_eq!(s, "abc");
    let (ptr, _) = s.as_raw_parts();
    assert_eq!(ptr.as_ptr() as usize - bytes.as_ptr() as usize, 3);
}

#[test]
fn unterminated_string() {
    assert_eq!(error_of("a = \"open"), (ErrorKind::UnterminatedString, 1, 10));
    assert_eq!(
        error_of("a = \"line one\nline two"),
        (ErrorKind::UnterminatedString, 2, 9)
    );
}

#[test]
fn integers() {
    assert_eq!(single("0"), (Int, "0".into()));
    assert_eq!(single("42"), (Int, "42".into()));
    assert_eq!(single("-2141"), (Int, "-2141".into()));
    assert_eq!(single("+7"), (Int, "7".into()));
    assert_eq!(single("007"), (Int, "7".into()));
    assert_eq!(single("999999999999999"), (Int, "999999999999999".into()));
    assert_eq!(single("9223372036854775807"), (Int, i64::MAX.to_string()));
    assert_eq!(single("-9223372036854775808"), (Int, i64::MIN.to_string()));
}

#[test]
fn integer_overflow_is_invalid_number() {
    assert_eq!(
        single("9223372036854775808"),
        (Error, "invalid-number".into())
    );
    assert_eq!(
        single("-9223372036854775809"),
        (Error, "invalid-number".into())
    );
    assert_eq!(
        single("99999999999999999999"),
        (Error, "invalid-number".into())
    );
}

#[test]
fn floats() {
    assert_eq!(single("3.14"), (Float, "3.14".into()));
    assert_eq!(single("-3.14"), (Float, "-3.14".into()));
    assert_eq!(single("+0.5"), (Float, "0.5".into()));
    assert_eq!(single("0.0"), (Float, "0.0".into()));
    assert_eq!(single("-0.0"), (Float, "-0.0".into()));
    assert_eq!(single("100.25"), (Float, "100.25".into()));
    assert_eq!(single("1.000001"), (Float, "1.000001".into()));
}

#[test]
fn float_conversion_matches_std_for_short_literals() {
    let cases = [
        "0.1", "0.2", "0.3", "1.5", "2.675", "123456.789", "98765.4321", "0.000001",
    ];
    for case in cases {
        let (kind, payload) = single(case);
        assert_eq!(kind, Float, "{case}");
        let expected: f64 = case.parse().unwrap();
        assert_eq!(payload, format!("{expected:?}"), "{case}");
    }
}

#[test]
fn long_float_mantissa_stays_close() {
    let (kind, payload) = single("123456789.123456789");
    assert_eq!(kind, Float);
    let got: f64 = payload.parse().unwrap();
    assert!((got - 123456789.123456789).abs() < 1e-6);
}

#[test]
fn dot_without_fraction_is_not_part_of_number() {
    assert_eq!(kinds("1."), [Int, Error]);
    assert_eq!(single("1.").0, Int);
    assert_eq!(kinds("1.2.3"), [Float, Error]);
}

#[test]
fn number_length_limit() {
    // 21 characters: accepted.
    assert_eq!(single("1234567890.1234567890").0, Float);
    assert_eq!(single("-1234567890.1234567890").0, Float);
    assert_eq!(single("000000000000000000001").0, Int);
    // 22 characters: rejected where the budget runs out.
    assert_eq!(
        error_of("x = 0000000000000000000001;"),
        (ErrorKind::InvalidNumber, 1, 26)
    );
    assert_eq!(
        error_of("big_float = 999999999.99999999999999;"),
        (ErrorKind::InvalidNumber, 1, 34)
    );
}

#[test]
fn sign_without_digit() {
    assert_eq!(error_of("-"), (ErrorKind::UnexpectedCharacter('-'), 1, 1));
    assert_eq!(error_of("+x"), (ErrorKind::UnexpectedCharacter('+'), 1, 1));
    assert_eq!(error_of("- 1"), (ErrorKind::UnexpectedCharacter('-'), 1, 1));
    assert_eq!(error_of("-.5"), (ErrorKind::UnexpectedCharacter('-'), 1, 1));
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(single("true"), (Bool, "true".into()));
    assert_eq!(single("false"), (Bool, "false".into()));
    assert_eq!(single("True"), (Key, "True".into()));
    assert_eq!(single("trueish"), (Key, "trueish".into()));
    assert_eq!(single("_private9"), (Key, "_private9".into()));
    assert_eq!(single("snake_case_Key"), (Key, "snake_case_Key".into()));
}

#[test]
fn vector_keywords() {
    assert_eq!(single("vec2"), (Vec, "2".into()));
    assert_eq!(single("vec3"), (Vec, "3".into()));
    assert_eq!(single("vec4"), (Vec, "4".into()));
    assert_eq!(single("vec"), (Key, "vec".into()));
    assert_eq!(single("vector"), (Key, "vector".into()));
    assert_eq!(single("vec2_ints"), (Key, "vec2_ints".into()));
    assert_eq!(single("vec10"), (Key, "vec10".into()));
    assert_eq!(single("Vec2"), (Key, "Vec2".into()));
}

#[test]
fn invalid_vector_sizes() {
    for src in ["vec0", "vec1", "vec5", "vec9"] {
        assert_eq!(error_of(src), (ErrorKind::InvalidVectorSize, 1, 1), "{src}");
    }
    assert_eq!(
        error_of("pos = vec5(1, 2);"),
        (ErrorKind::InvalidVectorSize, 1, 7)
    );
}

#[test]
fn unexpected_characters() {
    assert_eq!(error_of("a = 1; #"), (ErrorKind::UnexpectedCharacter('#'), 1, 8));
    assert_eq!(error_of("/ 2"), (ErrorKind::UnexpectedCharacter('/'), 1, 1));
    assert_eq!(error_of("a.b"), (ErrorKind::UnexpectedCharacter('.'), 1, 2));
    assert_eq!(error_of("\u{e9}"), (ErrorKind::UnexpectedCharacter('\u{e9}'), 1, 1));
    assert_eq!(error_of("'single'"), (ErrorKind::UnexpectedCharacter('\''), 1, 1));
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("a // trailing = ;\n= /* inline */ 1 /* multi\nline */;"),
        [Key, Equals, Int, Semicolon, Eof]
    );
    assert_eq!(kinds("/**/a"), [Key, Eof]);
    assert_eq!(kinds("/* ** / */a"), [Key, Eof]);
}

#[test]
fn unterminated_block_comment_reaches_eof() {
    assert_eq!(kinds("a /* never closed\n b = 1;"), [Key, Eof]);
    assert_eq!(kinds("/*"), [Eof]);
    assert_eq!(kinds("/*/"), [Eof]);
}

#[test]
fn positions_are_token_starts() {
    let src = "first = 1;\n  second = \"two\";\n/* c\n */ third=vec2(1,2);";
    let bytes = terminated(src);
    let mut lexer = Lexer::new(&bytes);
    let mut seen = std::vec::Vec::new();
    loop {
        let tok = lexer.scan_token();
        seen.push((tok.kind, tok.line, tok.column));
        if tok.kind == Eof {
            break;
        }
    }
    assert_eq!(&seen[..4], [
        (Key, 1, 1),
        (Equals, 1, 7),
        (Int, 1, 9),
        (Semicolon, 1, 10)
    ]);
    assert_eq!(&seen[4..8], [
        (Key, 2, 3),
        (Equals, 2, 10),
        (String, 2, 12),
        (Semicolon, 2, 17)
    ]);
    assert_eq!(&seen[8..11], [(Key, 4, 5), (Equals, 4, 10), (Vec, 4, 11)]);
    assert_eq!(seen.last(), Some(&(Eof, 4, 21)));
}

#[test]
fn spans_cover_lexemes() {
    let src = "key = -12.5;";
    let bytes = terminated(src);
    let mut lexer = Lexer::new(&bytes);
    let spans: std::vec::Vec<_> = std::iter::from_fn(|| {
        let tok = lexer.scan_token();
        (tok.kind != Eof).then_some(tok.span)
    })
    .map(|span| &src[span.start as usize..span.end as usize])
    .collect();
    assert_eq!(spans, ["key", "=", "-12.5", ";"]);
}

#[test]
fn snapshot_and_rewind() {
    let bytes = terminated("[1, 2, 3]");
    let mut lexer = Lexer::new(&bytes);
    assert_eq!(lexer.scan_token().kind, BracketLeft);
    let saved = lexer;
    let first_pass: std::vec::Vec<_> = (0..6).map(|_| lexer.scan_token().span).collect();
    lexer = saved;
    let second_pass: std::vec::Vec<_> = (0..6).map(|_| lexer.scan_token().span).collect();
    assert_eq!(first_pass, second_pass);
}

#[test]
fn random_input_never_panics() {
    const ALPHABET: &[u8] = b"abvec234 \t\n=;,{}[]()\"/*+-.0123456789_#tfrueals";
    let mut rng = oorandom::Rand32::new(0x5eed);
    for _ in 0..2000 {
        let len = rng.rand_range(0..64) as usize;
        let src: std::string::String = (0..len)
            .map(|_| ALPHABET[rng.rand_range(0..ALPHABET.len() as u32) as usize] as char)
            .collect();
        let bytes = terminated(&src);
        let mut lexer = Lexer::new(&bytes);
        let mut last_end = 0;
        // Every scan either makes progress or stops.
        for _ in 0..=src.len() + 1 {
            let tok = lexer.scan_token();
            assert!(tok.span.start as usize >= last_end || tok.kind == Error, "{src:?}");
            last_end = tok.span.end as usize;
            if matches!(tok.kind, Eof | Error) {
                break;
            }
        }
    }
}
