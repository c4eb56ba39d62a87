//! ToUnicode CMap parser for mapping character codes to Unicode strings.
//!
//! CMaps are PostScript fragments whose syntax is close enough to content
//! streams that the content [`Operations`] lexer tokenizes them. The
//! operands collected before `endbfchar` and `endbfrange` carry the
//! mappings; everything else in the CMap program is ignored.

use std::collections::HashMap;

use tracing::debug;

use crate::tokenizer::{Operand, Operations};

/// Largest source range a single `bfrange` entry may expand to.
const MAX_RANGE_LEN: u32 = 0x1_0000;

/// A parsed ToUnicode CMap.
#[derive(Debug, Clone, Default)]
pub struct CMap {
    mappings: HashMap<u32, String>,
}

impl CMap {
    /// Parse a ToUnicode CMap from its raw stream content.
    ///
    /// Malformed input stops parsing; mappings read before the fault are
    /// kept.
    pub fn parse(data: &[u8]) -> Self {
        let mut mappings = HashMap::new();
        for op in Operations::new(data) {
            let op = match op {
                Ok(op) => op,
                Err(err) => {
                    debug!(%err, "ToUnicode CMap truncated at malformed token");
                    break;
                }
            };
            match op.operator.as_str() {
                "endbfchar" => parse_bfchar(&op.operands, &mut mappings),
                "endbfrange" => parse_bfrange(&op.operands, &mut mappings),
                _ => {}
            }
        }
        CMap { mappings }
    }

    /// Unicode string mapped to `code`, if any.
    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// `<src> <dst>` pairs.
fn parse_bfchar(operands: &[Operand], mappings: &mut HashMap<u32, String>) {
    for pair in operands.chunks_exact(2) {
        if let (Some(src), Some(dst)) = (pair[0].as_bytes(), pair[1].as_bytes()) {
            mappings.insert(code_value(src), utf16be_to_string(dst));
        }
    }
}

/// `<lo> <hi> <dst>` or `<lo> <hi> [<dst0> <dst1> ...]` triples.
fn parse_bfrange(operands: &[Operand], mappings: &mut HashMap<u32, String>) {
    for triple in operands.chunks_exact(3) {
        let (Some(lo), Some(hi)) = (triple[0].as_bytes(), triple[1].as_bytes()) else {
            continue;
        };
        let (lo, hi) = (code_value(lo), code_value(hi));
        let Some(span) = hi.checked_sub(lo) else {
            continue;
        };
        let span = span.min(MAX_RANGE_LEN - 1);
        match &triple[2] {
            Operand::Bytes(dst) => {
                let base = utf16_units(dst);
                for offset in 0..=span {
                    let mut units = base.clone();
                    if let Some(last) = units.last_mut() {
                        *last = last.wrapping_add(offset as u16);
                    }
                    mappings.insert(lo + offset, String::from_utf16_lossy(&units));
                }
            }
            Operand::Array(items) => {
                for (offset, item) in (0..=span).zip(items) {
                    if let Some(dst) = item.as_bytes() {
                        mappings.insert(lo + offset, utf16be_to_string(dst));
                    }
                }
            }
            _ => {}
        }
    }
}

/// Big-endian integer value of a source code.
fn code_value(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take(4)
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

fn utf16_units(bytes: &[u8]) -> Vec<u16> {
    // A lone byte is a one-byte code point, as some producers write `<41>`.
    if bytes.len() == 1 {
        return vec![u16::from(bytes[0])];
    }
    bytes
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            [hi] => u16::from(*hi) << 8,
            _ => 0,
        })
        .collect()
}

fn utf16be_to_string(bytes: &[u8]) -> String {
    String::from_utf16_lossy(&utf16_units(bytes))
}
