//! Parse relaxed, JavaScript-flavored object notation and render it as
//! strict, canonical JSON.
//!
//! The notation allows unquoted object keys, single or double quoted
//! strings, `undefined` alongside `null`, and `new Date(...)` literals.
//! The renderer always emits compact JSON with double quoted strings and
//! ISO-style date stamps.
//!
//! ```
//! let value = semijson::parse_str("{greeting: 'hello', when: new Date(2021, 7, 27)}")?;
//! assert_eq!(value.to_json(), r#"{"greeting":"hello","when":"2021-07-27T00:00:00Z"}"#);
//! # Ok::<(), semijson::SemiJsonError>(())
//! ```

pub mod ast;
pub mod error;
pub mod json;
pub mod lexer;
pub mod parser;

pub use ast::{DateLiteral, Field, Literal, Value};
pub use error::SemiJsonError;
pub use parser::{parse_reader, parse_str};
