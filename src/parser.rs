//! The document driver and literal parsers.
//!
//! A single forward pass over the input bytes. Errors are recorded into the
//! parser's first-error sink (`error_kind`/`error_span`) and unwound with
//! the zero-sized [`ParseError`] token; the first error always wins.

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;

use crate::Span;
use crate::builder::{self, Builder};
use crate::datetime::{self, LocalKind};
use crate::error::{Error, ErrorKind};
use crate::scanner;
use crate::table::Table;
use crate::value::{Array, Key, Value};

/// Nesting limit for inline tables and arrays.
const MAX_RECURSION_DEPTH: i16 = 256;

// When a method returns Err(ParseError), the full error details have already
// been written into Parser::error_kind / Parser::error_span.
#[derive(Copy, Clone)]
struct ParseError;

const fn build_hex_table() -> [i8; 256] {
    let mut table = [-1i8; 256];
    let mut ch = 0usize;
    while ch < 256 {
        table[ch] = match ch as u8 {
            b'0'..=b'9' => (ch as u8 - b'0') as i8,
            b'A'..=b'F' => (ch as u8 - b'A' + 10) as i8,
            b'a'..=b'f' => (ch as u8 - b'a' + 10) as i8,
            _ => -1,
        };
        ch += 1;
    }
    table
}

static HEX: [i8; 256] = build_hex_table();

struct Parser<'a> {
    input: &'a str,
    /// `input.as_bytes()`; the cursor only ever rests on an ASCII byte or
    /// the start of a UTF-8 sequence, so slicing `input` at cursor
    /// positions is always on a char boundary.
    bytes: &'a [u8],
    cursor: usize,

    // First-error sink, populated just before returning ParseError.
    error_span: Span,
    error_kind: Option<ErrorKind>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            input,
            bytes: input.as_bytes(),
            cursor: 0,
            error_span: Span::new(0, 0),
            error_kind: None,
        }
    }

    #[cold]
    fn set_error(&mut self, start: usize, end: Option<usize>, kind: ErrorKind) -> ParseError {
        self.error_span = Span::new(start as u32, end.unwrap_or(start + 1) as u32);
        self.error_kind = Some(kind);
        ParseError
    }

    /// Records an error produced by the builder.
    #[cold]
    fn fail(&mut self, err: Error) -> ParseError {
        self.error_span = err.span;
        self.error_kind = Some(err.kind);
        ParseError
    }

    fn take_error(&mut self) -> Error {
        let kind = self
            .error_kind
            .take()
            .expect("take_error called without a recorded error");
        Error {
            kind,
            span: self.error_span,
        }
    }

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.cursor).copied()
    }

    #[inline]
    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.cursor + offset).copied()
    }

    #[inline]
    fn eat_byte(&mut self, b: u8) -> bool {
        if self.peek_byte() == Some(b) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    #[cold]
    fn expected_error(&mut self, expected: &'static str) -> ParseError {
        let start = self.cursor;
        let (found, end) = self.scan_token_desc_and_end();
        self.set_error(start, Some(end), ErrorKind::Wanted { expected, found })
    }

    fn expect_byte(&mut self, b: u8) -> Result<(), ParseError> {
        if self.eat_byte(b) {
            Ok(())
        } else {
            Err(self.expected_error(byte_describe(b)))
        }
    }

    /// Skips spaces, tabs, and carriage returns. A lone CR cannot occur
    /// here: the control-character pre-pass rejects CR outside CR-LF.
    fn eat_whitespace(&mut self) {
        self.cursor = scanner::skip_whitespace_no_newline(self.bytes, self.cursor);
    }

    fn eat_newline_or_eof(&mut self) -> Result<(), ParseError> {
        match self.peek_byte() {
            None => Ok(()),
            Some(b'\n') => {
                self.cursor += 1;
                Ok(())
            }
            Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                self.cursor += 2;
                Ok(())
            }
            _ => Err(self.expected_error("a newline")),
        }
    }

    /// Consumes the rest of the line after a `#`. The cursor is left on the
    /// terminating newline (or at EOF).
    fn skip_line_comment(&mut self) {
        self.cursor = scanner::find_byte(self.bytes, self.cursor, b'\n');
    }

    /// Consumes a comment plus its line ending, if the cursor sits on `#`.
    fn eat_comment(&mut self) -> Result<bool, ParseError> {
        if !self.eat_byte(b'#') {
            return Ok(false);
        }
        self.skip_line_comment();
        self.eat_newline_or_eof()?;
        Ok(true)
    }

    /// Skips whitespace, newlines, and comments between array tokens.
    fn eat_array_whitespace(&mut self) -> Result<(), ParseError> {
        loop {
            self.cursor = scanner::skip_whitespace(self.bytes, self.cursor);
            if self.peek_byte() != Some(b'#') {
                return Ok(());
            }
            self.eat_comment()?;
        }
    }

    /// Scans forward from the cursor to describe the token sitting there,
    /// for error messages. Returns the description and the token's end.
    fn scan_token_desc_and_end(&self) -> (&'static str, usize) {
        let Some(b) = self.peek_byte() else {
            return ("eof", self.bytes.len());
        };
        match b {
            b'\n' => ("a newline", self.cursor + 1),
            b'\r' => ("a carriage return", self.cursor + 1),
            b' ' | b'\t' => {
                let mut end = self.cursor + 1;
                while matches!(self.bytes.get(end), Some(b' ' | b'\t')) {
                    end += 1;
                }
                ("whitespace", end)
            }
            b'#' => ("a comment", self.cursor + 1),
            b'\'' | b'"' => ("a string", self.cursor + 1),
            _ if is_keylike_byte(b) => {
                let mut end = self.cursor + 1;
                while end < self.bytes.len() && is_keylike_byte(self.bytes[end]) {
                    end += 1;
                }
                ("an identifier", end)
            }
            _ => (byte_describe(b), self.cursor + 1),
        }
    }

    fn next_char_for_error(&self) -> char {
        match self.input.get(self.cursor..) {
            Some(rest) => rest.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER),
            None => char::REPLACEMENT_CHARACTER,
        }
    }

    /// Rejects every forbidden byte up front: controls other than tab/LF,
    /// DEL, and CR outside a CR-LF pair. String bodies rely on this pass.
    fn check_control_chars(&mut self) -> Result<(), ParseError> {
        let bytes = self.bytes;
        for (i, &b) in bytes.iter().enumerate() {
            match b {
                0x09 | 0x0A => {}
                0x0D => {
                    if bytes.get(i + 1) != Some(&0x0A) {
                        return Err(self.set_error(i, None, ErrorKind::ForbiddenControlChar(b)));
                    }
                }
                0x00..=0x1F | 0x7F => {
                    return Err(self.set_error(i, None, ErrorKind::ForbiddenControlChar(b)));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn read_keylike(&mut self) -> &'a str {
        let start = self.cursor;
        while let Some(b) = self.peek_byte() {
            if !is_keylike_byte(b) {
                break;
            }
            self.cursor += 1;
        }
        &self.input[start..self.cursor]
    }

    /// Reads one key segment: bare, basic-string, or literal-string.
    fn read_table_key(&mut self) -> Result<Key, ParseError> {
        let Some(b) = self.peek_byte() else {
            return Err(self.set_error(
                self.bytes.len(),
                None,
                ErrorKind::Wanted {
                    expected: "a key",
                    found: "eof",
                },
            ));
        };
        match b {
            b'"' | b'\'' => {
                let start = self.cursor;
                self.cursor += 1;
                let (name, span, multiline) = self.read_string(start, b)?;
                if multiline {
                    return Err(self.set_error(
                        start,
                        Some(span.end as usize),
                        ErrorKind::Wanted {
                            expected: "a key",
                            found: "a multi-line string",
                        },
                    ));
                }
                Ok(Key { name, span })
            }
            b if is_keylike_byte(b) => {
                let start = self.cursor;
                let name = self.read_keylike().to_string();
                Ok(Key {
                    name,
                    span: Span::new(start as u32, self.cursor as u32),
                })
            }
            // Punctuation where a key segment was required: the segment is
            // empty, which TOML forbids.
            b'.' | b'=' | b']' | b'}' | b',' => {
                Err(self.set_error(self.cursor, None, ErrorKind::EmptyKey))
            }
            _ => Err(self.expected_error("a key")),
        }
    }

    /// Reads a string literal. `start` is the offset of the opening quote;
    /// the cursor must be just past it. Returns the decoded content, the
    /// content span, and whether the literal was multi-line.
    fn read_string(&mut self, start: usize, delim: u8) -> Result<(String, Span, bool), ParseError> {
        let mut multiline = false;
        if self.eat_byte(delim) {
            if self.eat_byte(delim) {
                multiline = true;
            } else {
                let at = (start + 1) as u32;
                return Ok((String::new(), Span::new(at, at), false));
            }
        }
        if multiline {
            // The first newline right after the opener is not content.
            match self.peek_byte() {
                Some(b'\n') => self.cursor += 1,
                Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => self.cursor += 2,
                _ => {}
            }
        }

        let content_start = self.cursor;
        let mut out = String::new();
        let mut flush_from = self.cursor;
        loop {
            // Scan to the next byte that needs handling; everything before
            // it is verbatim content.
            let i = match (delim, multiline) {
                (b'"', false) => scanner::find_byte3(self.bytes, self.cursor, b'"', b'\\', b'\n'),
                (b'"', true) => scanner::find_byte2(self.bytes, self.cursor, b'"', b'\\'),
                (_, false) => scanner::find_byte2(self.bytes, self.cursor, b'\'', b'\n'),
                (_, true) => scanner::find_byte(self.bytes, self.cursor, b'\''),
            };
            self.cursor = i;
            let Some(&b) = self.bytes.get(i) else {
                return Err(self.set_error(start, None, ErrorKind::UnterminatedString));
            };
            match b {
                b'\n' => {
                    return Err(self.set_error(start, Some(i), ErrorKind::UnterminatedString));
                }
                b'\\' => {
                    out.push_str(&self.input[flush_from..i]);
                    self.cursor = i + 1;
                    self.read_escape(&mut out, start, multiline)?;
                    flush_from = self.cursor;
                }
                _ => {
                    // The delimiter.
                    self.cursor = i + 1;
                    if !multiline {
                        out.push_str(&self.input[flush_from..i]);
                        return Ok((out, Span::new((start + 1) as u32, i as u32), false));
                    }
                    let mut run = 1usize;
                    while self.eat_byte(delim) {
                        run += 1;
                    }
                    if run < 3 {
                        // Fewer than three quotes are plain content; they
                        // stay in the pending flush region.
                        continue;
                    }
                    // A closing run: quotes beyond the final three are
                    // content. The close fires for exactly three quotes, or
                    // for a longer run at end-of-line / end-of-input.
                    let content_end = i + run - 3;
                    let closes =
                        run == 3 || matches!(self.peek_byte(), None | Some(b'\n' | b'\r'));
                    out.push_str(&self.input[flush_from..content_end]);
                    if closes {
                        let span = Span::new(content_start as u32, content_end as u32);
                        return Ok((out, span, true));
                    }
                    flush_from = self.cursor;
                }
            }
        }
    }

    fn read_escape(
        &mut self,
        out: &mut String,
        string_start: usize,
        multiline: bool,
    ) -> Result<(), ParseError> {
        let i = self.cursor;
        let Some(&b) = self.bytes.get(i) else {
            return Err(self.set_error(string_start, None, ErrorKind::UnterminatedString));
        };
        self.cursor = i + 1;
        let decoded = match b {
            b'"' => '"',
            b'\\' => '\\',
            b'b' => '\u{0008}',
            b'f' => '\u{000C}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => self.read_hex(4, string_start, i)?,
            b'U' => self.read_hex(8, string_start, i)?,
            // Line continuation: a backslash directly before the line
            // ending swallows the newline and all following whitespace.
            b'\n' if multiline => {
                self.skip_continuation_whitespace();
                return Ok(());
            }
            b'\r' if multiline && self.peek_byte() == Some(b'\n') => {
                self.cursor += 1;
                self.skip_continuation_whitespace();
                return Ok(());
            }
            _ => {
                self.cursor = i;
                let c = self.next_char_for_error();
                return Err(self.set_error(i, None, ErrorKind::InvalidEscape(c)));
            }
        };
        out.push(decoded);
        Ok(())
    }

    fn skip_continuation_whitespace(&mut self) {
        loop {
            match self.peek_byte() {
                Some(b' ' | b'\t' | b'\n') => self.cursor += 1,
                Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => self.cursor += 2,
                _ => break,
            }
        }
    }

    fn read_hex(
        &mut self,
        n: usize,
        string_start: usize,
        escape_start: usize,
    ) -> Result<char, ParseError> {
        let mut val: u32 = 0;
        for _ in 0..n {
            let Some(&byte) = self.bytes.get(self.cursor) else {
                return Err(self.set_error(string_start, None, ErrorKind::UnterminatedString));
            };
            let digit = HEX[byte as usize];
            if digit < 0 {
                let c = self.next_char_for_error();
                return Err(self.set_error(self.cursor, None, ErrorKind::InvalidHexEscape(c)));
            }
            val = (val << 4) | digit as u32;
            self.cursor += 1;
        }
        // from_u32 is None exactly for surrogates and values above U+10FFFF.
        match char::from_u32(val) {
            Some(ch) => Ok(ch),
            None => Err(self.set_error(
                escape_start,
                Some(escape_start + n),
                ErrorKind::InvalidEscapeValue(val),
            )),
        }
    }

    fn value(&mut self, depth_remaining: i16) -> Result<Value, ParseError> {
        let at = self.cursor;
        let Some(byte) = self.peek_byte() else {
            return Err(self.set_error(
                self.bytes.len(),
                None,
                ErrorKind::Wanted {
                    expected: "a value",
                    found: "eof",
                },
            ));
        };
        let sign: u8 = match byte {
            b'"' | b'\'' => {
                self.cursor += 1;
                let (text, _, _) = self.read_string(at, byte)?;
                return Ok(Value::String(text));
            }
            b'{' => {
                self.cursor += 1;
                let mut table = Table::new();
                self.inline_table_contents(&mut table, depth_remaining - 1)?;
                return Ok(Value::Table(table));
            }
            b'[' => {
                self.cursor += 1;
                let mut array = Array::new();
                self.array_contents(&mut array, depth_remaining - 1)?;
                return Ok(Value::Array(array));
            }
            b't' => {
                return if self.bytes[self.cursor..].starts_with(b"true") {
                    self.cursor += 4;
                    Ok(Value::Boolean(true))
                } else {
                    Err(self.expected_error("the literal `true`"))
                };
            }
            b'f' => {
                return if self.bytes[self.cursor..].starts_with(b"false") {
                    self.cursor += 5;
                    Ok(Value::Boolean(false))
                } else {
                    Err(self.expected_error("the literal `false`"))
                };
            }
            b'-' => {
                self.cursor += 1;
                0
            }
            b'+' => {
                self.cursor += 1;
                1
            }
            _ => 2,
        };

        // Date/time detection commits before validating; a date-shaped or
        // time-shaped prefix never falls back to a number parse.
        if sign == 2 && byte.is_ascii_digit() {
            match datetime::scan(&self.bytes[at..]) {
                datetime::Scan::None => {}
                datetime::Scan::Invalid(reason) => {
                    return Err(self.set_error(at, None, ErrorKind::InvalidDatetime(reason)));
                }
                datetime::Scan::Offset(len, value) => {
                    self.cursor = at + len;
                    return Ok(Value::OffsetDatetime(value));
                }
                datetime::Scan::Local(len, kind) => {
                    self.cursor = at + len;
                    let lexeme = self.input[at..at + len].to_string();
                    return Ok(match kind {
                        LocalKind::Datetime => Value::LocalDatetime(lexeme),
                        LocalKind::Date => Value::LocalDate(lexeme),
                        LocalKind::Time => Value::LocalTime(lexeme),
                    });
                }
            }
        }

        let token = self.read_keylike();
        let end = self.cursor;
        match token {
            "inf" => {
                return Ok(Value::Float(if sign != 0 {
                    f64::INFINITY
                } else {
                    f64::NEG_INFINITY
                }));
            }
            "nan" => {
                return Ok(Value::Float(if sign != 0 { f64::NAN } else { -f64::NAN }));
            }
            _ => {}
        }

        if let [b'0'..=b'9', ..] = token.as_bytes() {
            self.number(at, end, token, sign)
        } else if token.is_empty() && byte == b'.' {
            // Leading-dot numbers (`.5`) are not allowed.
            Err(self.set_error(at, None, ErrorKind::InvalidNumber))
        } else if token.is_empty() {
            Err(self.expected_error("a value"))
        } else {
            Err(self.set_error(
                at,
                Some(end),
                ErrorKind::Wanted {
                    expected: "a value",
                    found: "an identifier",
                },
            ))
        }
    }

    fn number(
        &mut self,
        start: usize,
        end: usize,
        token: &'a str,
        sign: u8,
    ) -> Result<Value, ParseError> {
        let span = Span::new(start as u32, end as u32);

        // Base-prefixed integers. TOML forbids signs on these, so only an
        // unsigned token qualifies; a signed one falls through and fails
        // the decimal parse.
        if sign == 2
            && let [b'0', format, rest @ ..] = token.as_bytes()
        {
            match format {
                b'x' => return self.integer_radix(rest, span, 16),
                b'o' => return self.integer_radix(rest, span, 8),
                b'b' => return self.integer_radix(rest, span, 2),
                _ => {}
            }
        }

        if self.eat_byte(b'.') {
            let frac_at = self.cursor;
            return match self.peek_byte() {
                Some(b) if is_keylike_byte(b) => {
                    let after = self.read_keylike();
                    let f = self.float(start, end, token, Some(after), sign)?;
                    if self.peek_byte() == Some(b'.') {
                        // A second dot (`1.2.3`).
                        return Err(self.set_error(start, Some(self.cursor), ErrorKind::InvalidNumber));
                    }
                    Ok(Value::Float(f))
                }
                _ => Err(self.set_error(frac_at, Some(end), ErrorKind::InvalidNumber)),
            };
        }

        if let Ok(v) = self.integer_decimal(token.as_bytes(), span, sign) {
            return Ok(v);
        }

        if token.bytes().any(|b| b == b'e' || b == b'E') {
            let f = self.float(start, end, token, None, sign)?;
            return Ok(Value::Float(f));
        }

        // integer_decimal recorded the error.
        Err(ParseError)
    }

    fn integer_decimal(&mut self, bytes: &[u8], span: Span, sign: u8) -> Result<Value, ParseError> {
        let mut acc: u64 = 0;
        let mut prev_underscore = false;
        let mut has_digit = false;
        let mut leading_zero = false;
        let negative = sign == 0;
        'error: {
            for &b in bytes {
                if b == b'_' {
                    if !has_digit || prev_underscore {
                        break 'error;
                    }
                    prev_underscore = true;
                    continue;
                }
                if !b.is_ascii_digit() {
                    break 'error;
                }
                if leading_zero {
                    break 'error;
                }
                if !has_digit && b == b'0' {
                    leading_zero = true;
                }
                has_digit = true;
                prev_underscore = false;
                let digit = (b - b'0') as u64;
                acc = match acc.checked_mul(10).and_then(|a| a.checked_add(digit)) {
                    Some(v) => v,
                    None => break 'error,
                };
            }

            if !has_digit || prev_underscore {
                break 'error;
            }

            let max = if negative {
                (i64::MAX as u64) + 1
            } else {
                i64::MAX as u64
            };
            if acc > max {
                break 'error;
            }

            let val = if negative {
                (acc as i64).wrapping_neg()
            } else {
                acc as i64
            };
            return Ok(Value::Integer(val));
        }
        self.error_span = span;
        self.error_kind = Some(ErrorKind::InvalidNumber);
        Err(ParseError)
    }

    /// Parses the digits after a `0x`/`0o`/`0b` prefix.
    fn integer_radix(&mut self, bytes: &[u8], span: Span, radix: u32) -> Result<Value, ParseError> {
        let mut acc: u64 = 0;
        let mut prev_underscore = false;
        let mut has_digit = false;
        'error: {
            if bytes.is_empty() {
                break 'error;
            }

            for &b in bytes {
                if b == b'_' {
                    if !has_digit || prev_underscore {
                        break 'error;
                    }
                    prev_underscore = true;
                    continue;
                }
                let digit = HEX[b as usize];
                if digit < 0 || digit as u32 >= radix {
                    break 'error;
                }
                has_digit = true;
                prev_underscore = false;
                acc = match acc
                    .checked_mul(u64::from(radix))
                    .and_then(|a| a.checked_add(digit as u64))
                {
                    Some(v) => v,
                    None => break 'error,
                };
            }

            if !has_digit || prev_underscore {
                break 'error;
            }

            if acc > i64::MAX as u64 {
                break 'error;
            }
            return Ok(Value::Integer(acc as i64));
        }
        self.error_span = span;
        self.error_kind = Some(ErrorKind::InvalidNumber);
        Err(ParseError)
    }

    fn float(
        &mut self,
        start: usize,
        end: usize,
        token: &'a str,
        after_decimal: Option<&'a str>,
        sign: u8,
    ) -> Result<f64, ParseError> {
        // Leading zeros in the integer part (e.g. 00.5, -01.0) are invalid.
        if let [b'0', b'0'..=b'9' | b'_', ..] = token.as_bytes() {
            return Err(self.set_error(start, Some(end), ErrorKind::InvalidNumber));
        }

        let mut buf = String::with_capacity(token.len() + 8);
        if sign == 0 {
            buf.push('-');
        }
        if !push_strip_underscores(&mut buf, token) {
            return Err(self.set_error(start, Some(end), ErrorKind::InvalidNumber));
        }

        let mut last = token;
        if let Some(after) = after_decimal {
            if !matches!(after.as_bytes().first(), Some(b'0'..=b'9')) {
                return Err(self.set_error(start, Some(end), ErrorKind::InvalidNumber));
            }
            buf.push('.');
            if !push_strip_underscores(&mut buf, after) {
                return Err(self.set_error(start, Some(end), ErrorKind::InvalidNumber));
            }
            last = after;
        }

        // When the token ends with e/E, the `+` and the exponent digits are
        // separate tokens in the stream (`-` is keylike, so `1e-5` arrives
        // whole and needs no special handling).
        if matches!(last.as_bytes().last(), Some(b'e' | b'E')) {
            self.eat_byte(b'+');
            match self.peek_byte() {
                Some(b) if is_keylike_byte(b) && b != b'-' => {
                    let exponent = self.read_keylike();
                    if !push_strip_underscores(&mut buf, exponent) {
                        return Err(self.set_error(start, Some(end), ErrorKind::InvalidNumber));
                    }
                }
                _ => {
                    return Err(self.set_error(start, Some(end), ErrorKind::InvalidNumber));
                }
            }
        }

        let n: f64 = match buf.parse() {
            Ok(n) => n,
            Err(_) => {
                return Err(self.set_error(start, Some(end), ErrorKind::InvalidNumber));
            }
        };
        // Overflow to infinity is a malformed literal, not a float value.
        if n.is_finite() {
            Ok(n)
        } else {
            Err(self.set_error(start, Some(end), ErrorKind::InvalidNumber))
        }
    }

    /// Parses `key = value, ...}` after the opening brace. Inline tables
    /// are single-line: no newlines between tokens, no trailing comma.
    fn inline_table_contents(
        &mut self,
        out: &mut Table,
        depth_remaining: i16,
    ) -> Result<(), ParseError> {
        if depth_remaining < 0 {
            return Err(self.set_error(self.cursor, None, ErrorKind::RecursionLimitExceeded));
        }
        self.eat_whitespace();
        if self.eat_byte(b'}') {
            return Ok(());
        }
        loop {
            let mut table: &mut Table = &mut *out;
            let mut key = self.read_table_key()?;
            self.eat_whitespace();
            while self.eat_byte(b'.') {
                self.eat_whitespace();
                table = match builder::navigate_dotted_key(table, &key) {
                    Ok(t) => t,
                    Err(e) => return Err(self.fail(e)),
                };
                key = self.read_table_key()?;
                self.eat_whitespace();
            }
            self.expect_byte(b'=')?;
            self.eat_whitespace();
            let value = self.value(depth_remaining)?;
            if let Err(e) = builder::insert_value(table, key, value) {
                return Err(self.fail(e));
            }

            self.eat_whitespace();
            if self.eat_byte(b'}') {
                return Ok(());
            }
            self.expect_byte(b',')?;
            self.eat_whitespace();
        }
    }

    /// Parses `value, ...]` after the opening bracket. Newlines, comments,
    /// and a trailing comma are all allowed.
    fn array_contents(&mut self, out: &mut Array, depth_remaining: i16) -> Result<(), ParseError> {
        if depth_remaining < 0 {
            return Err(self.set_error(self.cursor, None, ErrorKind::RecursionLimitExceeded));
        }
        loop {
            self.eat_array_whitespace()?;
            if self.eat_byte(b']') {
                return Ok(());
            }
            let value = self.value(depth_remaining)?;
            out.push(value);
            self.eat_array_whitespace()?;
            if !self.eat_byte(b',') {
                break;
            }
        }
        self.eat_array_whitespace()?;
        self.expect_byte(b']')
    }

    fn process_key_value(&mut self, builder: &mut Builder) -> Result<(), ParseError> {
        let mut table: &mut Table = builder.current_table();

        let mut key = self.read_table_key()?;
        self.eat_whitespace();
        while self.eat_byte(b'.') {
            self.eat_whitespace();
            table = match builder::navigate_dotted_key(table, &key) {
                Ok(t) => t,
                Err(e) => return Err(self.fail(e)),
            };
            key = self.read_table_key()?;
            self.eat_whitespace();
        }

        self.expect_byte(b'=')?;
        self.eat_whitespace();
        let value = self.value(MAX_RECURSION_DEPTH)?;

        self.eat_whitespace();
        if !self.eat_comment()? {
            self.eat_newline_or_eof()?;
        }

        match builder::insert_value(table, key, value) {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn process_table_header(&mut self, builder: &mut Builder) -> Result<(), ParseError> {
        self.expect_byte(b'[')?;
        let is_array = self.eat_byte(b'[');
        self.eat_whitespace();
        if matches!(self.peek_byte(), Some(b']')) {
            return Err(self.set_error(self.cursor, None, ErrorKind::EmptyTableHeader));
        }

        let mut path = vec![self.read_table_key()?];
        self.eat_whitespace();
        while self.eat_byte(b'.') {
            self.eat_whitespace();
            path.push(self.read_table_key()?);
            self.eat_whitespace();
        }

        self.expect_byte(b']')?;
        if is_array {
            self.expect_byte(b']')?;
        }
        self.eat_whitespace();
        if !self.eat_comment()? {
            self.eat_newline_or_eof()?;
        }

        let result = if is_array {
            builder.open_array_of_tables(&path)
        } else {
            builder.open_table(&path)
        };
        result.map_err(|e| self.fail(e))
    }

    fn parse_document(&mut self, builder: &mut Builder) -> Result<(), ParseError> {
        self.check_control_chars()?;
        loop {
            self.cursor = scanner::skip_whitespace(self.bytes, self.cursor);
            match self.peek_byte() {
                None => return Ok(()),
                Some(b'#') => self.skip_line_comment(),
                Some(b'[') => self.process_table_header(builder)?,
                Some(_) => self.process_key_value(builder)?,
            }
        }
    }
}

/// Parses a TOML document into a [`Table`].
///
/// The returned tree owns all of its data; nothing borrows from `input`.
/// On failure the first error encountered is returned and no tree is
/// produced.
pub fn parse(input: &str) -> Result<Table, Error> {
    // Spans are stored as u32 byte offsets.
    if input.len() >= u32::MAX as usize {
        return Err(Error {
            kind: ErrorKind::FileTooLarge,
            span: Span::new(0, 0),
        });
    }

    let mut builder = Builder::new();
    let mut parser = Parser::new(input);
    match parser.parse_document(&mut builder) {
        Ok(()) => Ok(builder.into_root()),
        Err(ParseError) => Err(parser.take_error()),
    }
}

#[inline]
fn is_keylike_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Pushes `token` onto `buf` with underscores removed. Returns `false` when
/// an underscore is not placed between two ASCII digits.
fn push_strip_underscores(buf: &mut String, token: &str) -> bool {
    let mut prev = 0u8;
    for &b in token.as_bytes() {
        if b == b'_' {
            if !prev.is_ascii_digit() {
                return false;
            }
        } else {
            if prev == b'_' && !b.is_ascii_digit() {
                return false;
            }
            buf.push(b as char);
        }
        prev = b;
    }
    prev != b'_'
}

fn byte_describe(b: u8) -> &'static str {
    match b {
        b'\n' => "a newline",
        b' ' | b'\t' => "whitespace",
        b'=' => "an equals",
        b'.' => "a period",
        b',' => "a comma",
        b':' => "a colon",
        b'+' => "a plus",
        b'{' => "a left brace",
        b'}' => "a right brace",
        b'[' => "a left bracket",
        b']' => "a right bracket",
        b'\'' | b'"' => "a string",
        _ if is_keylike_byte(b) => "an identifier",
        _ => "a character",
    }
}
