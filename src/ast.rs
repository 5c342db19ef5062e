use std::fmt;

/// A parsed semi-JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Literal(Literal),
    Object(Vec<Field>),
    Array(Vec<Value>),
    Date(DateLiteral),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    String(String),
    /// A number written with a fraction part.
    Decimal(f64),
    Integer(i64),
}

/// One `key: value` entry of an object. Objects keep their fields as a
/// list so duplicate keys and writing order survive parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

/// The arguments of a `new Date(...)` literal, stored exactly as written.
/// No calendar validation happens anywhere; a month of 13 stays 13.
/// Arguments past the sixth land in `extra` and never render.
#[derive(Debug, Clone, PartialEq)]
pub struct DateLiteral {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u64,
    pub minute: u64,
    pub second: u64,
    pub extra: Vec<u64>,
}

impl DateLiteral {
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        DateLiteral {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            extra: Vec::new(),
        }
    }
}

impl fmt::Display for DateLiteral {
    /// Zero-padded `YYYY-MM-DDThh:mm:ssZ`, unquoted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Literal(Literal::Null))
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Literal(Literal::Bool(b)) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        if let Value::Literal(Literal::Integer(n)) = self {
            Some(*n)
        } else {
            None
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        if let Value::Literal(Literal::Decimal(n)) = self {
            Some(*n)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::Literal(Literal::String(s)) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        if let Value::Array(values) = self {
            Some(values)
        } else {
            None
        }
    }

    pub fn as_object(&self) -> Option<&Vec<Field>> {
        if let Value::Object(fields) = self {
            Some(fields)
        } else {
            None
        }
    }

    pub fn as_date(&self) -> Option<&DateLiteral> {
        if let Value::Date(date) = self {
            Some(date)
        } else {
            None
        }
    }

    /// Look up a field by key. With duplicate keys the first match wins.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.iter().find(|f| f.key == key).map(|f| &f.value),
            _ => None,
        }
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(values) => values.get(index),
            _ => None,
        }
    }
}
