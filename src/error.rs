use std::fmt;

/// The main error type for semi-JSON lexing and parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum SemiJsonError {
    /// Raised when a character matches none of the lexer rules.
    UnexpectedCharacter {
        character: char,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a token appears where the grammar requires something else.
    InvalidToken {
        token: String,
        expected: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when the input ends in the middle of a production.
    UnexpectedEof {
        message: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    SyntaxError {
        message: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a numeric literal does not fit its target type.
    NumberOutOfRange {
        literal: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    ReadError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
}

impl fmt::Display for SemiJsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemiJsonError::UnexpectedCharacter { character, line, column, hint, code } =>
                write!(f, "[SEMIJSON] Unexpected character '{}' at {}:{}{}{}",
                    character, line, column,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            SemiJsonError::InvalidToken { token, expected, line, column, hint, code } =>
                write!(f, "[SEMIJSON] Invalid Token '{}' at {}:{}: expected {}{}{}",
                    token, line, column, expected,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            SemiJsonError::UnexpectedEof { message, line, column, hint, code } =>
                write!(f, "[SEMIJSON] Unexpected EOF at {}:{}: {}{}{}",
                    line, column, message,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            SemiJsonError::SyntaxError { message, line, column, hint, code } =>
                write!(f, "[SEMIJSON] Syntax Error at {}:{}: {}{}{}",
                    line, column, message,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            SemiJsonError::NumberOutOfRange { literal, line, column, hint, code } =>
                write!(f, "[SEMIJSON] Number '{}' out of range at {}:{}{}{}",
                    literal, line, column,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            SemiJsonError::ReadError { message, hint, code } =>
                write!(f, "[SEMIJSON] Read Error: {}{}{}",
                    message,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
        }
    }
}

impl std::error::Error for SemiJsonError {}
