//! Lazy content stream tokenizer.
//!
//! [`Operations`] walks raw content stream bytes and yields one
//! [`Operation`] at a time, each carrying the operands that preceded it.
//! Nothing is materialized ahead of the caller. Inline images are skipped,
//! and dictionaries (from `BDC` and friends) are parsed only to be stepped
//! over.

use std::borrow::Cow;

use crate::error::BackendError;

/// A content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    /// Name without the leading `/`.
    Name(String),
    /// Literal or hex string, as raw bytes.
    Bytes(Vec<u8>),
    Array(Vec<Operand>),
    /// Booleans, null, dictionaries: values no text operator consumes.
    Other,
}

impl Operand {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Operand::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Operand::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// An operator with its operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub operator: String,
    pub operands: Vec<Operand>,
}

impl Operation {
    /// The last `N` operands as numbers, if they all are numbers.
    pub fn numbers<const N: usize>(&self) -> Option<[f64; N]> {
        let start = self.operands.len().checked_sub(N)?;
        let mut out = [0.0; N];
        for (slot, operand) in out.iter_mut().zip(&self.operands[start..]) {
            *slot = operand.as_number()?;
        }
        Some(out)
    }
}

/// Iterator over the operations of a content stream.
///
/// After the first error the iterator is exhausted.
pub struct Operations<'a> {
    input: Cow<'a, [u8]>,
    pos: usize,
    failed: bool,
}

impl<'a> Operations<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input: Cow::Borrowed(input),
            pos: 0,
            failed: false,
        }
    }

    /// Tokenize a decoded stream the iterator takes ownership of.
    pub fn owned(input: Vec<u8>) -> Operations<'static> {
        Operations {
            input: Cow::Owned(input),
            pos: 0,
            failed: false,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(b) = self.peek() {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'%' {
                while self.peek().is_some_and(|b| b != b'\n' && b != b'\r') {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn next_operation(&mut self) -> Result<Option<Operation>, BackendError> {
        let mut operands = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let Some(b) = self.peek() else {
                // Trailing operands without an operator are dropped.
                return Ok(None);
            };
            match b {
                b'a'..=b'z' | b'A'..=b'Z' | b'*' | b'\'' | b'"' => {
                    let keyword = self.keyword();
                    match keyword.as_str() {
                        "true" | "false" | "null" => operands.push(Operand::Other),
                        "BI" => {
                            self.skip_inline_image()?;
                            operands.clear();
                        }
                        _ => {
                            return Ok(Some(Operation {
                                operator: keyword,
                                operands,
                            }));
                        }
                    }
                }
                b']' | b')' | b'>' | b'{' | b'}' => {
                    return Err(BackendError::Interpreter(format!(
                        "unexpected '{}' at offset {}",
                        b as char, self.pos
                    )));
                }
                _ => operands.push(self.operand()?),
            }
        }
    }

    fn operand(&mut self) -> Result<Operand, BackendError> {
        match self.peek() {
            Some(b'(') => Ok(Operand::Bytes(self.literal_string()?)),
            Some(b'<') if self.peek_at(1) == Some(b'<') => {
                self.dictionary()?;
                Ok(Operand::Other)
            }
            Some(b'<') => Ok(Operand::Bytes(self.hex_string()?)),
            Some(b'[') => {
                self.pos += 1;
                Ok(Operand::Array(self.array()?))
            }
            Some(b'/') => Ok(Operand::Name(self.name())),
            Some(b'0'..=b'9' | b'+' | b'-' | b'.') => self.number(),
            Some(b'a'..=b'z' | b'A'..=b'Z') => {
                // Bare keywords inside arrays and dictionaries.
                let keyword = self.keyword();
                Ok(match keyword.as_str() {
                    "true" | "false" | "null" => Operand::Other,
                    _ => Operand::Name(keyword),
                })
            }
            Some(b) => Err(BackendError::Interpreter(format!(
                "unexpected byte 0x{b:02X} at offset {}",
                self.pos
            ))),
            None => Err(BackendError::Interpreter(
                "unexpected end of content stream".to_string(),
            )),
        }
    }

    fn literal_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut out = Vec::new();
        let mut depth = 1u32;
        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'(' => {
                    depth += 1;
                    out.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                    out.push(b);
                }
                b'\\' => self.escape(&mut out)?,
                _ => out.push(b),
            }
        }
        Err(BackendError::Interpreter(
            "unterminated literal string".to_string(),
        ))
    }

    fn escape(&mut self, out: &mut Vec<u8>) -> Result<(), BackendError> {
        let Some(b) = self.peek() else {
            return Err(BackendError::Interpreter(
                "unterminated escape in literal string".to_string(),
            ));
        };
        self.pos += 1;
        match b {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            // Line continuation.
            b'\r' => {
                if self.peek() == Some(b'\n') {
                    self.pos += 1;
                }
            }
            b'\n' => {}
            b'0'..=b'7' => {
                let mut value = u32::from(b - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                out.push((value & 0xFF) as u8);
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn hex_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut digits = Vec::new();
        loop {
            match self.peek() {
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b) if is_whitespace(b) => self.pos += 1,
                Some(b) => {
                    digits.push(hex_value(b)?);
                    self.pos += 1;
                }
                None => {
                    return Err(BackendError::Interpreter(
                        "unterminated hex string".to_string(),
                    ));
                }
            }
        }
        if digits.len() % 2 == 1 {
            digits.push(0);
        }
        Ok(digits.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
    }

    fn array(&mut self) -> Result<Vec<Operand>, BackendError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                Some(b']') => {
                    self.pos += 1;
                    return Ok(items);
                }
                Some(_) => items.push(self.operand()?),
                None => return Err(BackendError::Interpreter("unterminated array".to_string())),
            }
        }
    }

    fn dictionary(&mut self) -> Result<(), BackendError> {
        self.pos += 2;
        loop {
            self.skip_whitespace_and_comments();
            match (self.peek(), self.peek_at(1)) {
                (Some(b'>'), Some(b'>')) => {
                    self.pos += 2;
                    return Ok(());
                }
                (Some(_), _) => {
                    self.operand()?;
                }
                (None, _) => {
                    return Err(BackendError::Interpreter(
                        "unterminated dictionary".to_string(),
                    ));
                }
            }
        }
    }

    fn name(&mut self) -> String {
        self.pos += 1;
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| !is_whitespace(b) && !is_delimiter(b))
        {
            self.pos += 1;
        }
        let raw = &self.input[start..self.pos];
        let mut name = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'#' && i + 2 < raw.len() {
                if let (Ok(hi), Ok(lo)) = (hex_value(raw[i + 1]), hex_value(raw[i + 2])) {
                    name.push((hi << 4) | lo);
                    i += 3;
                    continue;
                }
            }
            name.push(raw[i]);
            i += 1;
        }
        String::from_utf8_lossy(&name).into_owned()
    }

    fn number(&mut self) -> Result<Operand, BackendError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut seen_dot = false;
        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => self.pos += 1,
                b'.' if !seen_dot => {
                    seen_dot = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        let token = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| BackendError::Interpreter("invalid number token".to_string()))?;
        match token {
            // Lone sign or dot: treat as zero the way most readers do.
            "+" | "-" | "." | "-." | "+." => Ok(Operand::Number(0.0)),
            _ => token
                .parse::<f64>()
                .map(Operand::Number)
                .map_err(|_| BackendError::Interpreter(format!("invalid number: {token}"))),
        }
    }

    fn keyword(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || matches!(b, b'*' | b'\'' | b'"'))
        {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    /// Skip `BI ... ID <data> EI`. Called after `BI`.
    fn skip_inline_image(&mut self) -> Result<(), BackendError> {
        loop {
            self.skip_whitespace_and_comments();
            match (self.peek(), self.peek_at(1), self.peek_at(2)) {
                (Some(b'I'), Some(b'D'), next) if next.is_none_or(is_whitespace) => {
                    self.pos += 3;
                    break;
                }
                (Some(_), _, _) => {
                    self.operand()?;
                }
                (None, _, _) => {
                    return Err(BackendError::Interpreter(
                        "unterminated inline image (missing ID)".to_string(),
                    ));
                }
            }
        }
        let data_start = self.pos;
        while self.pos + 1 < self.input.len() {
            let preceded = self.pos == data_start || is_whitespace(self.input[self.pos - 1]);
            let followed = self
                .input
                .get(self.pos + 2)
                .is_none_or(|&b| is_whitespace(b) || is_delimiter(b));
            if preceded && followed && &self.input[self.pos..self.pos + 2] == b"EI" {
                self.pos += 2;
                return Ok(());
            }
            self.pos += 1;
        }
        Err(BackendError::Interpreter(
            "unterminated inline image (missing EI)".to_string(),
        ))
    }
}

impl Iterator for Operations<'_> {
    type Item = Result<Operation, BackendError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_operation() {
            Ok(op) => op.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn hex_value(b: u8) -> Result<u8, BackendError> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        _ => Err(BackendError::Interpreter(format!(
            "invalid hex digit: {:?}",
            b as char
        ))),
    }
}
