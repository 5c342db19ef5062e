use std::io::Read;
use std::mem;

use crate::ast::{DateLiteral, Field, Literal, Value};
use crate::lexer::{Lexer, Token};
use crate::SemiJsonError;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peek: Token,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Result<Self, SemiJsonError> {
        let mut lexer = Lexer::new(input);
        let peek = lexer.next_token()?;
        Ok(Self { lexer, peek })
    }

    fn bump(&mut self) -> Result<Token, SemiJsonError> {
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.peek, next))
    }

    fn peek(&self) -> &Token {
        &self.peek
    }

    fn expect_punct(&mut self, expected: char) -> Result<(), SemiJsonError> {
        match self.bump()? {
            Token::Punct(c) if c == expected => Ok(()),
            Token::Eof => Err(SemiJsonError::UnexpectedEof {
                message: format!("Expected '{}'", expected),
                line: self.lexer.line(),
                column: self.lexer.column(),
                hint: None,
                code: Some(202),
            }),
            token => Err(SemiJsonError::InvalidToken {
                token: format!("{:?}", token),
                expected: format!("'{}'", expected),
                line: self.lexer.line(),
                column: self.lexer.column(),
                hint: None,
                code: Some(201),
            }),
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<(), SemiJsonError> {
        match self.bump()? {
            Token::Ident(name) if name == expected => Ok(()),
            token => Err(SemiJsonError::InvalidToken {
                token: format!("{:?}", token),
                expected: format!("'{}'", expected),
                line: self.lexer.line(),
                column: self.lexer.column(),
                hint: Some("Date literals are written new Date(year, month, day, ...)".into()),
                code: Some(201),
            }),
        }
    }

    /// Parse one complete document: a single value followed by end of input.
    pub fn parse(&mut self) -> Result<Value, SemiJsonError> {
        let value = self.parse_value()?;
        let trailing = self.bump()?;
        if trailing != Token::Eof {
            return Err(SemiJsonError::SyntaxError {
                message: format!("Trailing input after the document value: {:?}", trailing),
                line: self.lexer.line(),
                column: self.lexer.column(),
                hint: Some("A document holds exactly one value".into()),
                code: Some(203),
            });
        }
        Ok(value)
    }

    /// One token of lookahead decides the production. Everything that is
    /// not an object, an array or a date falls through to the literal arm.
    fn parse_value(&mut self) -> Result<Value, SemiJsonError> {
        match self.peek() {
            Token::Punct('{') => self.parse_object(),
            Token::Punct('[') => self.parse_array(),
            Token::Ident(name) if name == "new" => self.parse_date(),
            _ => self.parse_literal(),
        }
    }

    fn parse_literal(&mut self) -> Result<Value, SemiJsonError> {
        match self.peek() {
            Token::Null => {
                self.bump()?;
                Ok(Value::Literal(Literal::Null))
            }
            Token::Ident(name) if name == "true" || name == "false" => {
                // Booleans are plain identifiers to the lexer. They become
                // values here, so `{true: 1}` still parses with key "true".
                if let Token::Ident(name) = self.bump()? {
                    Ok(Value::Literal(Literal::Bool(name == "true")))
                } else {
                    unreachable!()
                }
            }
            Token::String(_) => {
                if let Token::String(s) = self.bump()? {
                    Ok(Value::Literal(Literal::String(s)))
                } else {
                    unreachable!()
                }
            }
            Token::Digit(_) | Token::Punct('-') => self.parse_number(),
            Token::Eof => Err(SemiJsonError::UnexpectedEof {
                message: "Expected a value".into(),
                line: self.lexer.line(),
                column: self.lexer.column(),
                hint: None,
                code: Some(202),
            }),
            token => Err(SemiJsonError::InvalidToken {
                token: format!("{:?}", token),
                expected: "a value".into(),
                line: self.lexer.line(),
                column: self.lexer.column(),
                hint: Some("Values are null, booleans, numbers, strings, objects, arrays or new Date(...)".into()),
                code: Some(201),
            }),
        }
    }

    /// Assemble a number from digit tokens. An optional leading `-` and a
    /// `.` with a second digit run are part of the literal; the text is
    /// then handed to the std parsers so range failures surface as errors.
    fn parse_number(&mut self) -> Result<Value, SemiJsonError> {
        let mut literal = String::new();
        if matches!(self.peek(), Token::Punct('-')) {
            self.bump()?; // consume '-'
            literal.push('-');
        }
        self.read_digits(&mut literal)?;

        if matches!(self.peek(), Token::Punct('.')) {
            self.bump()?; // consume '.'
            literal.push('.');
            self.read_digits(&mut literal)?;
            match literal.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Value::Literal(Literal::Decimal(value))),
                _ => Err(SemiJsonError::NumberOutOfRange {
                    literal,
                    line: self.lexer.line(),
                    column: self.lexer.column(),
                    hint: Some("Decimals must fit a 64-bit float".into()),
                    code: Some(204),
                }),
            }
        } else {
            match literal.parse::<i64>() {
                Ok(value) => Ok(Value::Literal(Literal::Integer(value))),
                Err(_) => Err(SemiJsonError::NumberOutOfRange {
                    literal,
                    line: self.lexer.line(),
                    column: self.lexer.column(),
                    hint: Some("Integers must fit a signed 64-bit range".into()),
                    code: Some(204),
                }),
            }
        }
    }

    /// Read one or more digit tokens into `out`. Whitespace was elided by
    /// the lexer, so a run broken by spaces still reads as one number.
    fn read_digits(&mut self, out: &mut String) -> Result<(), SemiJsonError> {
        match self.bump()? {
            Token::Digit(c) => out.push(c),
            Token::Eof => {
                return Err(SemiJsonError::UnexpectedEof {
                    message: "Expected a digit".into(),
                    line: self.lexer.line(),
                    column: self.lexer.column(),
                    hint: None,
                    code: Some(202),
                });
            }
            token => {
                return Err(SemiJsonError::InvalidToken {
                    token: format!("{:?}", token),
                    expected: "a digit".into(),
                    line: self.lexer.line(),
                    column: self.lexer.column(),
                    hint: None,
                    code: Some(201),
                });
            }
        }
        while matches!(self.peek(), Token::Digit(_)) {
            if let Token::Digit(c) = self.bump()? {
                out.push(c);
            }
        }
        Ok(())
    }

    fn parse_object(&mut self) -> Result<Value, SemiJsonError> {
        self.expect_punct('{')?;
        let mut fields = Vec::new();
        if matches!(self.peek(), Token::Punct('}')) {
            self.bump()?; // consume '}'
            return Ok(Value::Object(fields));
        }
        loop {
            fields.push(self.parse_field()?);
            match self.bump()? {
                Token::Punct(',') => continue,
                Token::Punct('}') => break,
                Token::Eof => {
                    return Err(SemiJsonError::UnexpectedEof {
                        message: "Unterminated object".into(),
                        line: self.lexer.line(),
                        column: self.lexer.column(),
                        hint: None,
                        code: Some(202),
                    });
                }
                token => {
                    return Err(SemiJsonError::InvalidToken {
                        token: format!("{:?}", token),
                        expected: "',' or '}'".into(),
                        line: self.lexer.line(),
                        column: self.lexer.column(),
                        hint: Some("Fields are separated by commas".into()),
                        code: Some(201),
                    });
                }
            }
        }
        Ok(Value::Object(fields))
    }

    fn parse_field(&mut self) -> Result<Field, SemiJsonError> {
        let key = match self.bump()? {
            Token::Ident(key) => key,
            Token::Eof => {
                return Err(SemiJsonError::UnexpectedEof {
                    message: "Expected an object key".into(),
                    line: self.lexer.line(),
                    column: self.lexer.column(),
                    hint: None,
                    code: Some(202),
                });
            }
            token => {
                return Err(SemiJsonError::InvalidToken {
                    token: format!("{:?}", token),
                    expected: "an identifier key".into(),
                    line: self.lexer.line(),
                    column: self.lexer.column(),
                    hint: Some("Object keys are bare identifiers, not quoted".into()),
                    code: Some(201),
                });
            }
        };
        self.expect_punct(':')?;
        let value = self.parse_value()?;
        Ok(Field { key, value })
    }

    fn parse_array(&mut self) -> Result<Value, SemiJsonError> {
        self.expect_punct('[')?;
        let mut values = Vec::new();
        if matches!(self.peek(), Token::Punct(']')) {
            self.bump()?; // consume ']'
            return Ok(Value::Array(values));
        }
        loop {
            values.push(self.parse_value()?);
            match self.bump()? {
                Token::Punct(',') => continue,
                Token::Punct(']') => break,
                Token::Eof => {
                    return Err(SemiJsonError::UnexpectedEof {
                        message: "Unterminated array".into(),
                        line: self.lexer.line(),
                        column: self.lexer.column(),
                        hint: None,
                        code: Some(202),
                    });
                }
                token => {
                    return Err(SemiJsonError::InvalidToken {
                        token: format!("{:?}", token),
                        expected: "',' or ']'".into(),
                        line: self.lexer.line(),
                        column: self.lexer.column(),
                        hint: Some("Elements are separated by commas".into()),
                        code: Some(201),
                    });
                }
            }
        }
        Ok(Value::Array(values))
    }

    fn parse_date(&mut self) -> Result<Value, SemiJsonError> {
        self.expect_ident("new")?;
        self.expect_ident("Date")?;
        self.expect_punct('(')?;

        let year: u16 = self.date_field("year")?;
        self.expect_punct(',')?;
        let month: u8 = self.date_field("month")?;
        self.expect_punct(',')?;
        let day: u8 = self.date_field("day")?;

        let mut more: Vec<u64> = Vec::new();
        loop {
            match self.bump()? {
                Token::Punct(',') => more.push(self.date_field("argument")?),
                Token::Punct(')') => break,
                Token::Eof => {
                    return Err(SemiJsonError::UnexpectedEof {
                        message: "Unterminated date literal".into(),
                        line: self.lexer.line(),
                        column: self.lexer.column(),
                        hint: None,
                        code: Some(202),
                    });
                }
                token => {
                    return Err(SemiJsonError::InvalidToken {
                        token: format!("{:?}", token),
                        expected: "',' or ')'".into(),
                        line: self.lexer.line(),
                        column: self.lexer.column(),
                        hint: None,
                        code: Some(201),
                    });
                }
            }
        }

        // The fourth through sixth arguments become the time of day.
        // Anything past those is kept but never rendered.
        let mut date = DateLiteral::new(year, month, day);
        let mut args = more.into_iter();
        if let Some(hour) = args.next() {
            date.hour = hour;
        }
        if let Some(minute) = args.next() {
            date.minute = minute;
        }
        if let Some(second) = args.next() {
            date.second = second;
        }
        date.extra = args.collect();
        Ok(Value::Date(date))
    }

    /// Read a digit run and parse it into the field's integer type. No
    /// calendar check happens; only the type range limits the value.
    fn date_field<T: std::str::FromStr>(&mut self, what: &str) -> Result<T, SemiJsonError> {
        let mut digits = String::new();
        self.read_digits(&mut digits)?;
        match digits.parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) => Err(SemiJsonError::NumberOutOfRange {
                literal: digits,
                line: self.lexer.line(),
                column: self.lexer.column(),
                hint: Some(format!("The date {} does not fit its range", what)),
                code: Some(204),
            }),
        }
    }
}

/// Parse a complete semi-JSON document from a string slice.
pub fn parse_str(input: &str) -> Result<Value, SemiJsonError> {
    let mut parser = Parser::new(input)?;
    parser.parse()
}

/// Parse a complete semi-JSON document from a reader. The stream is read
/// to the end before lexing starts, and must hold valid UTF-8.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Value, SemiJsonError> {
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .map_err(|e| SemiJsonError::ReadError {
            message: format!("Failed to read input: {}", e),
            hint: Some("The stream must yield valid UTF-8".into()),
            code: Some(301),
        })?;
    parse_str(&input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<(&'static str, &'static str)> {
        vec![
            ("null", "null"),
            ("undefined", "undefined"),
            ("true", "true"),
            ("false", "false"),
            ("positive integer", "1234"),
            ("negative integer", "-1234"),
            ("decimal", "1234.56"),
            ("negative decimal", "-1234.56"),
            ("single quoted string", "'abcdefg'"),
            ("double quoted string", "\"abcdefg\""),
            ("date", "new Date(1970, 1, 1)"),
            ("date with time", "new Date(2021, 7, 27, 0, 28, 45)"),
            ("empty object", "{}"),
            ("spaced object", "{ }"),
            ("object", "{ key: \"value\" }"),
            ("nested object", "{ a: { b: [1, 2] } }"),
            ("empty list", "[]"),
            ("spaced list", "[ ]"),
            ("list", "[ 1, 0]"),
        ]
    }

    #[test]
    fn test_parse_basic_samples() {
        for (name, source) in samples() {
            let result = parse_str(source);
            println!("{}: {:?}", name, result); // debug output
            assert!(result.is_ok(), "sample '{}' failed: {:?}", name, result);
        }
    }

    #[test]
    fn test_parse_samples_inside_lists() {
        for (name, source) in samples() {
            let single = format!("[ {} ]", source);
            assert!(parse_str(&single).is_ok(), "sample '{}' failed in list", name);

            let double = format!("[{}, {}]", source, source);
            assert!(parse_str(&double).is_ok(), "sample '{}' failed in pair list", name);
        }
    }

    #[test]
    fn test_parse_samples_inside_objects() {
        for (name, source) in samples() {
            let single = format!("{{ key: {} }}", source);
            assert!(parse_str(&single).is_ok(), "sample '{}' failed as field", name);

            let double = format!("{{ key1: {}, key2: {} }}", source, source);
            assert!(parse_str(&double).is_ok(), "sample '{}' failed in pair object", name);
        }
    }

    #[test]
    fn test_literals_map_to_ast() {
        assert_eq!(parse_str("null"), Ok(Value::Literal(Literal::Null)));
        assert_eq!(parse_str("undefined"), Ok(Value::Literal(Literal::Null)));
        assert_eq!(parse_str("true"), Ok(Value::Literal(Literal::Bool(true))));
        assert_eq!(parse_str("false"), Ok(Value::Literal(Literal::Bool(false))));
        assert_eq!(parse_str("1234"), Ok(Value::Literal(Literal::Integer(1234))));
        assert_eq!(parse_str("-1234"), Ok(Value::Literal(Literal::Integer(-1234))));
        assert_eq!(parse_str("1234.56"), Ok(Value::Literal(Literal::Decimal(1234.56))));
        assert_eq!(
            parse_str("'abcdefg'"),
            Ok(Value::Literal(Literal::String("abcdefg".into())))
        );
    }

    #[test]
    fn test_integer_bounds() {
        assert_eq!(
            parse_str("9223372036854775807"),
            Ok(Value::Literal(Literal::Integer(i64::MAX)))
        );
        // the sign is part of the assembled literal, so i64::MIN parses
        assert_eq!(
            parse_str("-9223372036854775808"),
            Ok(Value::Literal(Literal::Integer(i64::MIN)))
        );

        match parse_str("9223372036854775808") {
            Err(SemiJsonError::NumberOutOfRange { literal, .. }) => {
                assert_eq!(literal, "9223372036854775808");
            }
            other => panic!("expected NumberOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_decimal_overflow_is_an_error() {
        let mut source = "9".repeat(400);
        source.push_str(".0");
        match parse_str(&source) {
            Err(SemiJsonError::NumberOutOfRange { .. }) => {}
            other => panic!("expected NumberOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_digit_runs_span_elided_whitespace() {
        // Digits are single tokens and whitespace never reaches the
        // parser, so a broken run still assembles into one number.
        assert_eq!(parse_str("1 2 3"), Ok(Value::Literal(Literal::Integer(123))));
        assert_eq!(parse_str("1 2.5 6"), Ok(Value::Literal(Literal::Decimal(12.56))));

        let value = parse_str("[1 2]").expect("Failed to parse");
        assert_eq!(value.get_index(0).and_then(Value::as_i64), Some(12));
    }

    #[test]
    fn test_decimal_requires_fraction_digits() {
        match parse_str("5.") {
            Err(SemiJsonError::UnexpectedEof { .. }) => {}
            other => panic!("expected UnexpectedEof, got {:?}", other),
        }
        match parse_str("[1., 2]") {
            Err(SemiJsonError::InvalidToken { .. }) => {}
            other => panic!("expected InvalidToken, got {:?}", other),
        }
    }

    #[test]
    fn test_date_argument_mapping() {
        let value = parse_str("new Date(1970, 1, 1)").expect("Failed to parse");
        assert_eq!(value.as_date(), Some(&DateLiteral::new(1970, 1, 1)));

        let value = parse_str("new Date(2021, 7, 27, 0, 28, 45)").expect("Failed to parse");
        let mut expected = DateLiteral::new(2021, 7, 27);
        expected.minute = 28;
        expected.second = 45;
        assert_eq!(value.as_date(), Some(&expected));

        // a seventh argument is kept but changes nothing visible
        let value = parse_str("new Date(2021,7,27,0,28,45,0)").expect("Failed to parse");
        expected.extra = vec![0];
        assert_eq!(value.as_date(), Some(&expected));
    }

    #[test]
    fn test_date_fields_are_not_validated() {
        let value = parse_str("new Date(2021, 13, 99)").expect("Failed to parse");
        let date = value.as_date().expect("not a date");
        assert_eq!(date.month, 13);
        assert_eq!(date.day, 99);
    }

    #[test]
    fn test_date_arity_and_range_errors() {
        assert!(parse_str("new Date()").is_err());
        assert!(parse_str("new Date(2021)").is_err());
        assert!(parse_str("new Date(2021, 7)").is_err());
        assert!(parse_str("new Date(2021, 7, 27,").is_err());
        assert!(parse_str("new Horse(1, 2, 3)").is_err());

        // each leading field has its own width
        match parse_str("new Date(70000, 1, 1)") {
            Err(SemiJsonError::NumberOutOfRange { literal, .. }) => assert_eq!(literal, "70000"),
            other => panic!("expected NumberOutOfRange, got {:?}", other),
        }
        assert!(matches!(
            parse_str("new Date(2021, 300, 1)"),
            Err(SemiJsonError::NumberOutOfRange { .. })
        ));
        assert!(matches!(
            parse_str("new Date(2021, 7, 999)"),
            Err(SemiJsonError::NumberOutOfRange { .. })
        ));
    }

    #[test]
    fn test_duplicate_keys_are_kept_in_order() {
        let value = parse_str("{a: 1, b: 2, a: 3}").expect("Failed to parse");
        let fields = value.as_object().expect("not an object");
        let keys: Vec<&str> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "a"]);
        // lookup still answers with the first occurrence
        assert_eq!(value.get("a").and_then(Value::as_i64), Some(1));
    }

    #[test]
    fn test_keywords_still_work_as_keys() {
        // `new` and `true` are ordinary identifiers in key position
        let value = parse_str("{new: 1, true: 2}").expect("Failed to parse");
        assert_eq!(value.get("new").and_then(Value::as_i64), Some(1));
        assert_eq!(value.get("true").and_then(Value::as_i64), Some(2));
    }

    #[test]
    fn test_null_prefixed_keys_are_rejected() {
        // `null` outranks the identifier rule, so these never lex as keys
        assert!(parse_str("{null: 1}").is_err());
        assert!(parse_str("{nullable: 1}").is_err());
    }

    #[test]
    fn test_malformed_documents_error() {
        let bad = vec![
            "",
            "   ",
            "{key: }",
            "{a: 1",
            "{a 1}",
            "{a: 1,}",
            "{\"a\": 1}",
            "[1, 2",
            "[1, 2,]",
            "a",
            "-",
            "--5",
            "{a: hello}",
        ];
        for source in bad {
            let result = parse_str(source);
            assert!(result.is_err(), "'{}' should not parse: {:?}", source, result);
        }
    }

    #[test]
    fn test_trailing_content_rejected() {
        for source in ["null extra", "nulll", "{} {}", "1 a", "12.5.6"] {
            let result = parse_str(source);
            assert!(result.is_err(), "'{}' should not parse: {:?}", source, result);
        }
    }

    #[test]
    fn test_lex_errors_bubble_up() {
        match parse_str("{a: ~}") {
            Err(SemiJsonError::UnexpectedCharacter { character, .. }) => {
                assert_eq!(character, '~');
            }
            other => panic!("expected UnexpectedCharacter, got {:?}", other),
        }
        assert!(matches!(
            parse_str("\u{e9}"),
            Err(SemiJsonError::UnexpectedCharacter { .. })
        ));
    }

    #[test]
    fn test_unterminated_string_is_a_parse_error() {
        // the opening quote lexes as punctuation, which no production accepts
        match parse_str("\"abc") {
            Err(SemiJsonError::InvalidToken { .. }) => {}
            other => panic!("expected InvalidToken, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_reader_matches_parse_str() {
        let input = "{key: 'value', n: [1, 2, 3]}";
        let from_reader = parse_reader(input.as_bytes()).expect("Failed to parse from reader");
        let from_str = parse_str(input).expect("Failed to parse from str");
        assert_eq!(from_reader, from_str);
    }

    #[test]
    fn test_parse_reader_from_file() {
        use std::io::{Seek, SeekFrom, Write};

        let mut file = tempfile::tempfile().expect("Failed to create temp file");
        write!(file, "{{success: true, count: 3}}").expect("Failed to write");
        file.seek(SeekFrom::Start(0)).expect("Failed to seek");

        let value = parse_reader(file).expect("Failed to parse from file");
        assert_eq!(value.get("success").and_then(Value::as_bool), Some(true));
        assert_eq!(value.get("count").and_then(Value::as_i64), Some(3));
    }

    #[test]
    fn test_parse_reader_rejects_invalid_utf8() {
        let bytes: &[u8] = &[0x7b, 0xff, 0x7d];
        match parse_reader(bytes) {
            Err(SemiJsonError::ReadError { .. }) => {}
            other => panic!("expected ReadError, got {:?}", other),
        }
    }
}
