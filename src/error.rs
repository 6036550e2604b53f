//! Parse errors with source spans.

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;

use crate::Span;
use std::fmt::{self, Debug, Display};

/// Error produced when a TOML document fails to parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The error kind.
    pub kind: ErrorKind,
    /// The span where the error occurs.
    ///
    /// Some [`ErrorKind`]s carry additional span information, e.g. the
    /// location of the first binding of a redefined key.
    pub span: Span,
}

impl std::error::Error for Error {}

/// The different ways a parse can fail.
///
/// The parser records the first error it encounters and stops; no partial
/// tree is exposed.
#[derive(Clone, PartialEq)]
pub enum ErrorKind {
    /// A byte in `0x00..=0x1F` (other than tab and line feed), a `0x7F`, or
    /// a carriage return not followed by a line feed.
    ForbiddenControlChar(u8),

    /// Wanted one sort of token, but found another.
    Wanted {
        /// Expected token type.
        expected: &'static str,
        /// Actually found token type.
        found: &'static str,
    },

    /// A bare key with no characters.
    EmptyKey,

    /// `[]` or `[[]]` with no key path inside.
    EmptyTableHeader,

    /// Duplicate key in a table.
    DuplicateKey {
        /// The duplicate key.
        key: String,
        /// The span where the key was first bound.
        first: Span,
    },

    /// A table path was declared by more than one `[header]`.
    DuplicateTable {
        /// The dotted name of the duplicate table.
        name: String,
        /// The span of the first declaration.
        first: Span,
    },

    /// A `[header]` or `[[header]]` tried to extend an array that was not
    /// created by `[[...]]`.
    StaticArrayExtension,

    /// An invalid character was found as an escape.
    InvalidEscape(char),

    /// An invalid character was found inside a `\u`/`\U` hex run.
    InvalidHexEscape(char),

    /// A `\u`/`\U` escape named a surrogate or a codepoint above U+10FFFF.
    InvalidEscapeValue(u32),

    /// EOF (or a newline, for single-line strings) arrived before the
    /// closing quote.
    UnterminatedString,

    /// A number failed to parse.
    InvalidNumber,

    /// A date-shaped or time-shaped value failed structural or calendar
    /// validation.
    InvalidDatetime(&'static str),

    /// Inline tables and arrays were nested too deeply.
    RecursionLimitExceeded,

    /// The input is too large for 32-bit byte offsets.
    FileTooLarge,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ForbiddenControlChar(..) => "forbidden-control-char",
            Self::Wanted { .. } => "wanted",
            Self::EmptyKey => "empty-key",
            Self::EmptyTableHeader => "empty-table-header",
            Self::DuplicateKey { .. } => "duplicate-key",
            Self::DuplicateTable { .. } => "duplicate-table",
            Self::StaticArrayExtension => "static-array-extension",
            Self::InvalidEscape(..) => "invalid-escape",
            Self::InvalidHexEscape(..) => "invalid-hex-escape",
            Self::InvalidEscapeValue(..) => "invalid-escape-value",
            Self::UnterminatedString => "unterminated-string",
            Self::InvalidNumber => "invalid-number",
            Self::InvalidDatetime(..) => "invalid-datetime",
            Self::RecursionLimitExceeded => "recursion-limit-exceeded",
            Self::FileTooLarge => "file-too-large",
        };
        f.write_str(text)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

struct Escape(char);

impl fmt::Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        if self.0.is_whitespace() || self.0.is_control() {
            for esc in self.0.escape_default() {
                f.write_char(esc)?;
            }
            Ok(())
        } else {
            f.write_char(self.0)
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::ForbiddenControlChar(byte) => {
                write!(f, "control character `0x{byte:02X}` is not permitted")
            }
            ErrorKind::Wanted { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            ErrorKind::EmptyKey => f.write_str("empty bare key"),
            ErrorKind::EmptyTableHeader => f.write_str("empty table header"),
            ErrorKind::DuplicateKey { key, .. } => write!(f, "duplicate key: `{key}`"),
            ErrorKind::DuplicateTable { name, .. } => {
                write!(f, "redefinition of table `{name}`")
            }
            ErrorKind::StaticArrayExtension => {
                f.write_str("a table header cannot extend an array not created by `[[...]]`")
            }
            ErrorKind::InvalidEscape(c) => {
                write!(f, "invalid escape character in string: `{}`", Escape(*c))
            }
            ErrorKind::InvalidHexEscape(c) => {
                write!(f, "invalid hex escape character in string: `{}`", Escape(*c))
            }
            ErrorKind::InvalidEscapeValue(v) => write!(f, "invalid escape value: `{v}`"),
            ErrorKind::UnterminatedString => f.write_str("unterminated string"),
            ErrorKind::InvalidNumber => f.write_str("invalid number"),
            ErrorKind::InvalidDatetime(reason) => write!(f, "invalid date-time: {reason}"),
            ErrorKind::RecursionLimitExceeded => {
                f.write_str("maximum nesting depth exceeded")
            }
            ErrorKind::FileTooLarge => f.write_str("file is too large (maximum 4GiB)"),
        }
    }
}

#[cfg(feature = "reporting")]
impl Error {
    /// Converts this [`Error`] into a
    /// [`codespan_reporting::diagnostic::Diagnostic`].
    pub fn to_diagnostic<FileId: Copy + PartialEq>(
        &self,
        fid: FileId,
    ) -> codespan_reporting::diagnostic::Diagnostic<FileId> {
        use codespan_reporting::diagnostic::{Diagnostic, Label};

        let diag = Diagnostic::error()
            .with_code(self.kind.to_string())
            .with_message(self.to_string());

        match &self.kind {
            ErrorKind::DuplicateKey { first, .. } => diag.with_labels(vec![
                Label::secondary(fid, *first).with_message("first binding"),
                Label::primary(fid, self.span).with_message("duplicate key"),
            ]),
            ErrorKind::DuplicateTable { first, .. } => diag.with_labels(vec![
                Label::secondary(fid, *first).with_message("first declaration"),
                Label::primary(fid, self.span).with_message("duplicate table"),
            ]),
            ErrorKind::Wanted { expected, .. } => diag.with_labels(vec![
                Label::primary(fid, self.span).with_message(format!("expected {expected}")),
            ]),
            ErrorKind::UnterminatedString => diag.with_labels(vec![
                Label::primary(fid, self.span)
                    .with_message("string opened here is never closed"),
            ]),
            _ => diag.with_labels(vec![Label::primary(fid, self.span)]),
        }
    }
}
