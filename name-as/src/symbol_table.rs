/// Symbol table + the pass-1 builder. Seeded with the two reserved
/// segment-base entries, which can never be redefined or shifted by
/// pseudo-instruction expansion.
use std::collections::HashMap;

use name_core::error::{AssembleError, ErrorKind};

use crate::directive::DirectiveRecord;
use crate::lexer::{LexedLine, RawLine};

pub const TEXT_SEGMENT_SYMBOL: &str = ".text";
pub const DATA_SEGMENT_SYMBOL: &str = ".data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Text,
    Data,
}

pub struct SymbolTable {
    map: HashMap<String, u32>,
}

impl SymbolTable {
    pub fn new(text_base: u32, data_base: u32) -> Self {
        let mut map = HashMap::new();
        map.insert(TEXT_SEGMENT_SYMBOL.to_string(), text_base);
        map.insert(DATA_SEGMENT_SYMBOL.to_string(), data_base);
        SymbolTable { map }
    }

    pub fn insert(&mut self, name: &str, address: u32) -> Result<(), ErrorKind> {
        if self.map.contains_key(name) {
            return Err(ErrorKind::DuplicateSymbol(name.to_string()));
        }
        self.map.insert(name.to_string(), address);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.map.get(name).copied()
    }

    /// Adds `delta` to every user-defined label strictly past `threshold`
    /// and in the given segment. The two reserved segment-base entries are
    /// never touched. Snapshots the affected names before mutating so the
    /// shift order doesn't depend on hash-map iteration order.
    pub fn shift_labels_after(&mut self, threshold: u32, segment: Segment, data_base: u32, delta: i64) {
        let names: Vec<String> = self
            .map
            .iter()
            .filter(|(name, addr)| {
                if name.as_str() == TEXT_SEGMENT_SYMBOL || name.as_str() == DATA_SEGMENT_SYMBOL {
                    return false;
                }
                let in_segment = if **addr < data_base {
                    segment == Segment::Text
                } else {
                    segment == Segment::Data
                };
                in_segment && **addr > threshold
            })
            .map(|(name, _)| name.clone())
            .collect();

        for name in names {
            if let Some(addr) = self.map.get_mut(&name) {
                *addr = (*addr as i64 + delta) as u32;
            }
        }
    }
}

struct Counters {
    text: u32,
    data: u32,
    segment: Segment,
}

impl Counters {
    fn new(text_base: u32, data_base: u32) -> Self {
        Counters {
            text: text_base,
            data: data_base,
            segment: Segment::Text,
        }
    }

    fn position(&self) -> u32 {
        match self.segment {
            Segment::Text => self.text,
            Segment::Data => self.data,
        }
    }

    fn advance(&mut self, bytes: u32) {
        match self.segment {
            Segment::Text => self.text += bytes,
            Segment::Data => self.data += bytes,
        }
    }
}

/// Pass 1: walks every logical line once, charging every pseudo-instruction
/// a flat 4 bytes (stage A in `resolver.rs` corrects this once real
/// expansion lengths are known) and recording every label at the current
/// location counter.
pub fn build_symbol_table(
    lines: &[LexedLine],
    text_base: u32,
    data_base: u32,
) -> Result<SymbolTable, AssembleError> {
    let mut table = SymbolTable::new(text_base, data_base);
    let mut counters = Counters::new(text_base, data_base);

    for line in lines {
        match &line.line {
            RawLine::Directive(name, _) if name == TEXT_SEGMENT_SYMBOL => {
                counters.segment = Segment::Text;
            }
            RawLine::Directive(name, _) if name == DATA_SEGMENT_SYMBOL => {
                counters.segment = Segment::Data;
            }
            RawLine::Directive(name, args) => {
                let record = DirectiveRecord {
                    name,
                    raw_args: args,
                    address: counters.position(),
                    line_number: line.line_number,
                };
                let offset = record.forward_offset()?;
                counters.advance(offset);
            }
            RawLine::Label(name) => {
                table
                    .insert(name, counters.position())
                    .map_err(|e| AssembleError::new(line.line_number, e))?;
            }
            RawLine::Instruction(_, _) => {
                counters.advance(4);
            }
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::normalize;
    use pretty_assertions::assert_eq;

    #[test]
    fn records_label_at_current_counter() {
        let lines = normalize("nop\nloop:\nnop\n").unwrap();
        let table = build_symbol_table(&lines, 0x1000, 0x2000).unwrap();
        assert_eq!(table.get("loop"), Some(0x1004));
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let lines = normalize("foo:\nfoo:\n").unwrap();
        assert!(build_symbol_table(&lines, 0x1000, 0x2000).is_err());
    }

    #[test]
    fn data_segment_labels_use_data_counter() {
        let lines = normalize(".data\nvalues:\n.word 1, 2\n").unwrap();
        let table = build_symbol_table(&lines, 0x1000, 0x2000).unwrap();
        assert_eq!(table.get("values"), Some(0x2000));
    }

    #[test]
    fn reserved_segment_symbols_are_seeded() {
        let table = SymbolTable::new(0x400000, 0x10010000);
        assert_eq!(table.get(".text"), Some(0x400000));
        assert_eq!(table.get(".data"), Some(0x10010000));
    }
}
