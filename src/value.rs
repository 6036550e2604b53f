//! The [`Value`] union over every TOML value form, and table [`Key`]s.

#[cfg(test)]
#[path = "./value_tests.rs"]
mod tests;

use crate::Span;
use crate::datetime::OffsetDatetime;
use crate::table::Table;
use std::fmt;

/// A TOML array: a dense sequence of values in source order.
pub type Array = Vec<Value>;

/// A parsed TOML value.
///
/// String content is owned: escape decoding rewrites bytes, so literals are
/// copied out of the input during the parse. Date-times without a UTC offset
/// have no absolute instant and are carried as their source lexeme.
#[derive(Clone, PartialEq)]
pub enum Value {
    /// A string, with escapes decoded.
    String(String),
    /// A signed 64-bit integer.
    Integer(i64),
    /// A 64-bit float, including `inf` and `nan`.
    Float(f64),
    /// A boolean.
    Boolean(bool),
    /// A date-time with a UTC offset: an absolute instant.
    OffsetDatetime(OffsetDatetime),
    /// A date-time without an offset, carried as its source lexeme.
    LocalDatetime(String),
    /// A calendar date, carried as its source lexeme.
    LocalDate(String),
    /// A wall-clock time, carried as its source lexeme.
    LocalTime(String),
    /// An array.
    Array(Array),
    /// A table.
    Table(Table),
}

impl Value {
    /// Gets the type of the value as a string.
    pub fn type_str(&self) -> &'static str {
        match self {
            Self::String(..) => "string",
            Self::Integer(..) => "integer",
            Self::Float(..) => "float",
            Self::Boolean(..) => "boolean",
            Self::OffsetDatetime(..) => "offset date-time",
            Self::LocalDatetime(..) => "local date-time",
            Self::LocalDate(..) => "local date",
            Self::LocalTime(..) => "local time",
            Self::Array(..) => "array",
            Self::Table(..) => "table",
        }
    }

    /// Returns the string content if this is a string value.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns an `i64` if this is an integer value.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns an `f64` if this is a float value.
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a `bool` if this is a boolean value.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the instant if this is an offset date-time.
    #[inline]
    pub fn as_offset_datetime(&self) -> Option<OffsetDatetime> {
        match self {
            Self::OffsetDatetime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Returns the source lexeme of a local date-time, date, or time.
    #[inline]
    pub fn as_local_lexeme(&self) -> Option<&str> {
        match self {
            Self::LocalDatetime(s) | Self::LocalDate(s) | Self::LocalTime(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a borrowed array if this is an array value.
    #[inline]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns a mutable array reference.
    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns a borrowed table if this is a table value.
    #[inline]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Returns a mutable table reference.
    #[inline]
    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => s.fmt(f),
            Self::Integer(i) => i.fmt(f),
            Self::Float(v) => v.fmt(f),
            Self::Boolean(b) => b.fmt(f),
            Self::OffsetDatetime(dt) => dt.fmt(f),
            Self::LocalDatetime(s) | Self::LocalDate(s) | Self::LocalTime(s) => s.fmt(f),
            Self::Array(a) => a.fmt(f),
            Self::Table(t) => t.fmt(f),
        }
    }
}

/// A TOML table key: the decoded name plus its span in the source.
///
/// Comparisons look at the name only, so trees parsed from different
/// documents compare equal when their content matches.
#[derive(Clone)]
pub struct Key {
    /// The decoded key name.
    pub name: String,
    /// The span of the key in the source document.
    pub span: Span,
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Key {}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}
