//! S-expression reader.
//!
//! Byte-oriented scanner over UTF-8 source. Delimiters are all ASCII, so
//! slicing at delimiter positions always lands on character boundaries.
//!
//! ```text
//! form   = atom | list | 'form | #'form
//! list   = ( form* ) | ( form+ . form )
//! atom   = integer | "string" | symbol
//! ```
//!
//! `;` starts a comment that runs to the end of the line.

use std::fmt;

use nsp_ir::{Form, StringInterner};
use nsp_stack::ensure_sufficient_stack;

/// What went wrong while reading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadErrorKind {
    /// `)` with no open list.
    UnexpectedClose,
    /// End of input inside a list.
    UnclosedList,
    /// End of input after `'` or `#'`.
    MissingQuoted,
    /// End of input inside a string.
    UnterminatedString,
    /// `.` with nothing before it, or not followed by exactly one form.
    BadDot,
    /// Backslash followed by an unsupported character.
    InvalidEscape(char),
}

/// A reader error at a byte offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadError {
    pub kind: ReadErrorKind,
    pub offset: usize,
    /// 1-based line of `offset`.
    pub line: usize,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ReadErrorKind::UnexpectedClose => f.write_str("unexpected `)`")?,
            ReadErrorKind::UnclosedList => f.write_str("list is never closed")?,
            ReadErrorKind::MissingQuoted => f.write_str("expected a form after the quote")?,
            ReadErrorKind::UnterminatedString => f.write_str("unterminated string literal")?,
            ReadErrorKind::BadDot => f.write_str("malformed dotted list")?,
            ReadErrorKind::InvalidEscape(ch) => write!(f, "invalid escape `\\{ch}` in string")?,
        }
        write!(f, " (line {})", self.line)
    }
}

impl std::error::Error for ReadError {}

/// Read every top-level form of `source`.
pub fn read_all(source: &str, interner: &StringInterner) -> Result<Vec<Form>, ReadError> {
    let mut reader = Reader {
        source,
        bytes: source.as_bytes(),
        pos: 0,
        interner,
    };
    let mut forms = Vec::new();
    loop {
        reader.skip_trivia();
        match reader.peek() {
            None => return Ok(forms),
            Some(b')') => return Err(reader.error(ReadErrorKind::UnexpectedClose, reader.pos)),
            Some(_) => forms.push(reader.read_form()?),
        }
    }
}

struct Reader<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    interner: &'a StringInterner,
}

#[inline]
fn is_delimiter(byte: u8) -> bool {
    matches!(byte, b'(' | b')' | b'"' | b'\'' | b';') || byte.is_ascii_whitespace()
}

impl Reader<'_> {
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[cold]
    fn error(&self, kind: ReadErrorKind, offset: usize) -> ReadError {
        let before = &self.bytes[..offset.min(self.bytes.len())];
        let line = 1 + memchr::memchr_iter(b'\n', before).count();
        ReadError { kind, offset, line }
    }

    fn skip_trivia(&mut self) {
        while let Some(byte) = self.peek() {
            if byte == b';' {
                match memchr::memchr(b'\n', &self.bytes[self.pos..]) {
                    Some(offset) => self.pos += offset + 1,
                    None => self.pos = self.bytes.len(),
                }
            } else if byte.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                return;
            }
        }
    }

    /// Read one form. The caller has skipped trivia and checked for input.
    fn read_form(&mut self) -> Result<Form, ReadError> {
        ensure_sufficient_stack(|| {
            let start = self.pos;
            match self.peek() {
                Some(b'(') => {
                    self.pos += 1;
                    self.read_list(start)
                }
                Some(b'\'') => {
                    self.pos += 1;
                    self.read_quoted("quote", start)
                }
                Some(b'#') if self.bytes.get(self.pos + 1) == Some(&b'\'') => {
                    self.pos += 2;
                    self.read_quoted("function", start)
                }
                Some(b'"') => {
                    self.pos += 1;
                    self.read_string(start)
                }
                Some(b')') => Err(self.error(ReadErrorKind::UnexpectedClose, start)),
                Some(_) => Ok(self.read_atom()),
                None => Err(self.error(ReadErrorKind::UnclosedList, start)),
            }
        })
    }

    fn read_quoted(&mut self, head: &str, start: usize) -> Result<Form, ReadError> {
        self.skip_trivia();
        match self.peek() {
            None | Some(b')') => Err(self.error(ReadErrorKind::MissingQuoted, start)),
            Some(_) => {
                let inner = self.read_form()?;
                Ok(Form::wrap(self.interner.intern(head), inner))
            }
        }
    }

    fn read_list(&mut self, open: usize) -> Result<Form, ReadError> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                None => return Err(self.error(ReadErrorKind::UnclosedList, open)),
                Some(b')') => {
                    self.pos += 1;
                    return Ok(Form::List(items));
                }
                Some(b'.') if self.is_lone_dot() => {
                    let dot = self.pos;
                    self.pos += 1;
                    return self.read_dotted_tail(items, open, dot);
                }
                Some(_) => items.push(self.read_form()?),
            }
        }
    }

    /// A `.` followed by a delimiter or end of input.
    fn is_lone_dot(&self) -> bool {
        match self.bytes.get(self.pos + 1) {
            Some(&next) => is_delimiter(next),
            None => true,
        }
    }

    fn read_dotted_tail(
        &mut self,
        items: Vec<Form>,
        open: usize,
        dot: usize,
    ) -> Result<Form, ReadError> {
        if items.is_empty() {
            return Err(self.error(ReadErrorKind::BadDot, dot));
        }
        self.skip_trivia();
        match self.peek() {
            None => return Err(self.error(ReadErrorKind::UnclosedList, open)),
            Some(b')') => return Err(self.error(ReadErrorKind::BadDot, dot)),
            Some(_) => {}
        }
        let tail = self.read_form()?;
        self.skip_trivia();
        match self.peek() {
            Some(b')') => {
                self.pos += 1;
                Ok(Form::Dotted(items, Box::new(tail)))
            }
            None => Err(self.error(ReadErrorKind::UnclosedList, open)),
            Some(_) => Err(self.error(ReadErrorKind::BadDot, dot)),
        }
    }

    fn read_string(&mut self, start: usize) -> Result<Form, ReadError> {
        let mut text = String::new();
        loop {
            let rest = &self.bytes[self.pos..];
            let Some(offset) = memchr::memchr2(b'"', b'\\', rest) else {
                return Err(self.error(ReadErrorKind::UnterminatedString, start));
            };
            text.push_str(&self.source[self.pos..self.pos + offset]);
            self.pos += offset;
            if self.bytes[self.pos] == b'"' {
                self.pos += 1;
                return Ok(Form::Str(text));
            }
            // Backslash: the escaped character may be multi-byte.
            let escape_at = self.pos;
            let Some(escaped) = self.source[self.pos + 1..].chars().next() else {
                return Err(self.error(ReadErrorKind::UnterminatedString, start));
            };
            let ch = match escaped {
                '"' => '"',
                '\\' => '\\',
                'n' => '\n',
                't' => '\t',
                other => return Err(self.error(ReadErrorKind::InvalidEscape(other), escape_at)),
            };
            text.push(ch);
            self.pos += 1 + escaped.len_utf8();
        }
    }

    fn read_atom(&mut self) -> Form {
        let start = self.pos;
        while self.peek().is_some_and(|byte| !is_delimiter(byte)) {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        match parse_int(text) {
            Some(value) => Form::Int(value),
            None => Form::Symbol(self.interner.intern(text)),
        }
    }
}

/// Integers are an optional sign followed by ASCII digits only.
fn parse_int(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
