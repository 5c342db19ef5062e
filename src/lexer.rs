use once_cell::sync::Lazy;
use regex::Regex;

use crate::SemiJsonError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `null` or `undefined`. Both spellings collapse into one token.
    Null,
    /// A single decimal digit. Numbers arrive one digit per token and the
    /// parser glues the runs back together.
    Digit(char),
    Ident(String),
    /// A quoted run with the outer quotes stripped and `\<quote>` decoded.
    String(String),
    Punct(char),
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Rule {
    Null,
    Digit,
    Ident,
    String,
    Punct,
    Whitespace,
}

/// Token rules in priority order. Every pattern is anchored at the cursor
/// and the first rule that matches wins, so `null` beats `Ident` even in
/// the middle of a longer word, and a quote that opens a malformed string
/// still lexes as `Punct`.
static RULES: Lazy<Vec<(Rule, Regex)>> = Lazy::new(|| {
    vec![
        (Rule::Null, Regex::new(r"\A(?:null|undefined)").unwrap()),
        (Rule::Digit, Regex::new(r"\A[0-9]").unwrap()),
        (Rule::Ident, Regex::new(r"\A[A-Za-z][0-9A-Za-z_]*").unwrap()),
        (
            Rule::String,
            Regex::new(r#"\A(?:"(?:\\"|[^"])*"|'(?:\\'|[^'])*')"#).unwrap(),
        ),
        (
            Rule::Punct,
            Regex::new(r#"\A[-\[!@#$%^&*()+_={}|:;"'<,>.?/\]]"#).unwrap(),
        ),
        (Rule::Whitespace, Regex::new(r"\A[ \t\n\r]+").unwrap()),
    ]
});

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    fn advance(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        self.pos += text.len();
    }

    /// Produce the next token, eliding whitespace. Returns `Token::Eof`
    /// forever once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Token, SemiJsonError> {
        loop {
            if self.pos >= self.input.len() {
                return Ok(Token::Eof);
            }
            let input = self.input;
            let rest = &input[self.pos..];

            let matched = RULES
                .iter()
                .find_map(|(rule, re)| re.find(rest).map(|m| (*rule, m.as_str())));

            let (rule, text) = match matched {
                Some(hit) => hit,
                None => {
                    let character = match rest.chars().next() {
                        Some(c) => c,
                        None => return Ok(Token::Eof),
                    };
                    self.advance(&rest[..character.len_utf8()]);
                    return Err(SemiJsonError::UnexpectedCharacter {
                        character,
                        line: self.line,
                        column: self.column,
                        hint: Some("Unexpected character in input".into()),
                        code: Some(101),
                    });
                }
            };

            self.advance(text);

            match rule {
                Rule::Whitespace => continue,
                Rule::Null => return Ok(Token::Null),
                // the digit and punct rules match exactly one character
                Rule::Digit => return Ok(Token::Digit(text.chars().next().unwrap_or('0'))),
                Rule::Punct => return Ok(Token::Punct(text.chars().next().unwrap_or(' '))),
                Rule::Ident => return Ok(Token::Ident(text.to_string())),
                Rule::String => return Ok(Token::String(unquote(text))),
            }
        }
    }
}

/// Strip the outer quotes from a raw string match and decode `\<quote>`
/// for the quote style in use. Everything else, backslashes included, is
/// kept verbatim.
fn unquote(raw: &str) -> String {
    let quote = raw.chars().next().unwrap_or('"');
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&quote) {
            out.push(quote);
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}


#[test]
fn test_whitespace_elision() {
    let mut lexer = Lexer::new("  null\t\r\n null ");

    let expected_tokens = vec![Token::Null, Token::Null, Token::Eof];
    for expected in expected_tokens {
        let tok = lexer.next_token();
        assert_eq!(tok, Ok(expected));
    }
}
