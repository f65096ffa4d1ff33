/// Pass 2: stage A corrects pass 1's flat pseudo-instruction
/// charge now that real expansion lengths are known and shifts every label
/// that landed after a pseudo; stage B walks the program again, executing
/// directives, substituting register aliases and label references with
/// concrete numbers, and separating real instructions from pseudos still
/// awaiting expansion; stage C expands those pseudos into real instructions
/// once every operand is a concrete number.
use std::str::FromStr;

use name_core::error::{AssembleError, ErrorKind};
use name_core::instruction::{lookup_pseudo, InstructionClass, INSTRUCTION_TABLE};
use name_core::memory::Memory;
use name_core::registers::Register;

use crate::directive::DirectiveRecord;
use crate::lexer::{LexedLine, RawLine};
use crate::operand::{Imm, Operand};
use crate::pseudo;
use crate::resolved::{ResolvedInstruction, ResolvedLine, ResolvedOperand};
use crate::symbol_table::{Segment, SymbolTable, DATA_SEGMENT_SYMBOL, TEXT_SEGMENT_SYMBOL};

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

pub fn stage_a_fixup(
    lines: &[LexedLine],
    table: &mut SymbolTable,
    text_base: u32,
    data_base: u32,
) -> Result<(), AssembleError> {
    let mut counters = Counters::new(text_base, data_base);

    for line in lines {
        match &line.line {
            RawLine::Directive(name, _) if name == TEXT_SEGMENT_SYMBOL => counters.segment = Segment::Text,
            RawLine::Directive(name, _) if name == DATA_SEGMENT_SYMBOL => counters.segment = Segment::Data,
            RawLine::Directive(name, args) => {
                let record = DirectiveRecord {
                    name,
                    raw_args: args,
                    address: counters.position(),
                    line_number: line.line_number,
                };
                counters.advance(record.forward_offset()?);
            }
            RawLine::Label(_) => {}
            RawLine::Instruction(mnemonic, _) => {
                let lc_before = counters.position();
                if let Some(k) = pseudo::expansion_length(mnemonic) {
                    let expanded_bytes = 4 * k;
                    let delta = expanded_bytes as i64 - 4;
                    if delta != 0 {
                        table.shift_labels_after(lc_before, counters.segment, data_base, delta);
                    }
                    counters.advance(expanded_bytes);
                } else {
                    counters.advance(4);
                }
            }
        }
    }

    Ok(())
}

pub fn stage_b(
    lines: &[LexedLine],
    table: &SymbolTable,
    memory: &mut Memory,
    text_base: u32,
    data_base: u32,
) -> Result<Vec<ResolvedLine>, AssembleError> {
    let mut counters = Counters::new(text_base, data_base);
    let mut out = Vec::new();

    for line in lines {
        match &line.line {
            RawLine::Directive(name, _) if name == TEXT_SEGMENT_SYMBOL => counters.segment = Segment::Text,
            RawLine::Directive(name, _) if name == DATA_SEGMENT_SYMBOL => counters.segment = Segment::Data,
            RawLine::Directive(name, args) => {
                let record = DirectiveRecord {
                    name,
                    raw_args: args,
                    address: counters.position(),
                    line_number: line.line_number,
                };
                let offset = record.forward_offset()?;
                record.execute(memory)?;
                counters.advance(offset);
            }
            RawLine::Label(_) => {}
            RawLine::Instruction(mnemonic, args) => {
                let operands = crate::operand::tokenize_operands(args, line.line_number)?;
                let resolved = resolve_operands(&operands, table, line.line_number)?;

                if let Some(info) = INSTRUCTION_TABLE.get(mnemonic.as_str()) {
                    let normalized = if info.class == InstructionClass::ILoadStore {
                        normalize_load_store(&resolved, line.line_number)?
                    } else {
                        resolved
                    };
                    out.push(ResolvedLine::Real(ResolvedInstruction {
                        mnemonic: mnemonic.clone(),
                        operands: normalized,
                    }));
                    counters.advance(4);
                } else if lookup_pseudo(mnemonic).is_some() {
                    out.push(ResolvedLine::Pseudo {
                        mnemonic: mnemonic.clone(),
                        operands: resolved,
                    });
                    let k = pseudo::expansion_length(mnemonic).unwrap_or(1);
                    counters.advance(4 * k);
                } else {
                    return Err(AssembleError::new(
                        line.line_number,
                        ErrorKind::UnknownInstruction(mnemonic.clone()),
                    ));
                }
            }
        }
    }

    Ok(out)
}

/// `[rt, Memory{offset,base}]` (or the degenerate `[rt, offset]` two-token
/// form, base defaulting to `$0`) both normalize to the three-operand
/// `[rt, base, offset]` form the encoder expects.
fn normalize_load_store(
    operands: &[ResolvedOperand],
    line_number: u32,
) -> Result<Vec<ResolvedOperand>, AssembleError> {
    match operands {
        [rt, base, offset] => Ok(vec![*rt, *base, *offset]),
        [rt, offset] => Ok(vec![*rt, ResolvedOperand::Register(0), *offset]),
        _ => Err(AssembleError::new(
            line_number,
            ErrorKind::BadArguments("load/store instruction needs a register and a memory operand".into()),
        )),
    }
}

fn resolve_operands(
    operands: &[Operand],
    table: &SymbolTable,
    line_number: u32,
) -> Result<Vec<ResolvedOperand>, AssembleError> {
    let mut out = Vec::new();
    for operand in operands {
        match operand {
            Operand::Register(text) => out.push(ResolvedOperand::Register(resolve_register(text, line_number)?)),
            Operand::Immediate(imm) => out.push(ResolvedOperand::Immediate(resolve_imm(imm, table, line_number)?)),
            Operand::Memory { offset, base } => {
                out.push(ResolvedOperand::Register(resolve_register(base, line_number)?));
                out.push(ResolvedOperand::Immediate(resolve_imm(offset, table, line_number)?));
            }
        }
    }
    Ok(out)
}

fn resolve_register(text: &str, line_number: u32) -> Result<u32, AssembleError> {
    Register::from_str(text)
        .map(|r| r.number())
        .map_err(|_| AssembleError::new(line_number, ErrorKind::UnknownRegister(text.to_string())))
}

fn resolve_imm(imm: &Imm, table: &SymbolTable, line_number: u32) -> Result<i64, AssembleError> {
    match imm {
        Imm::Number(n) => Ok(*n),
        Imm::Label(name) => table
            .get(name)
            .map(|addr| addr as i64)
            .ok_or_else(|| AssembleError::new(line_number, ErrorKind::UnknownLabel(name.clone()))),
    }
}

/// Stage C: expands every still-pending pseudo into real instructions,
/// tracking the address each one will be emitted at.
pub fn stage_c(lines: Vec<ResolvedLine>, text_base: u32) -> Result<Vec<ResolvedInstruction>, AssembleError> {
    let mut out = Vec::new();
    let mut pc = text_base;

    for line in lines {
        match line {
            ResolvedLine::Real(instr) => {
                out.push(instr);
                pc += 4;
            }
            ResolvedLine::Pseudo { mnemonic, operands } => {
                let expanded = pseudo::expand(&mnemonic, &operands, pc)?;
                pc += 4 * expanded.len() as u32;
                out.extend(expanded);
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::normalize;
    use crate::symbol_table::build_symbol_table;
    use name_core::constants::{MIPS_DATA_START_ADDR, MIPS_TEXT_START_ADDR};
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> (Vec<ResolvedInstruction>, Memory) {
        let lines = normalize(source).unwrap();
        let mut table = build_symbol_table(&lines, MIPS_TEXT_START_ADDR, MIPS_DATA_START_ADDR).unwrap();
        stage_a_fixup(&lines, &mut table, MIPS_TEXT_START_ADDR, MIPS_DATA_START_ADDR).unwrap();
        let mut memory = Memory::new(1 << 20);
        let resolved = stage_b(&lines, &table, &mut memory, MIPS_TEXT_START_ADDR, MIPS_DATA_START_ADDR).unwrap();
        let real = stage_c(resolved, MIPS_TEXT_START_ADDR).unwrap();
        (real, memory)
    }

    #[test]
    fn forward_label_reference_resolves_after_pseudo_shift() {
        let (instrs, _) = run("li $t0, 1\ntarget:\nnop\nb_use:\nbeq $t0,$0,target\n");
        // li expands to 2 real instructions, so target must be text_base + 8.
        let beq = instrs.iter().find(|i| i.mnemonic == "beq").unwrap();
        assert_eq!(
            beq.operands[2],
            ResolvedOperand::Immediate((MIPS_TEXT_START_ADDR + 8) as i64)
        );
    }

    #[test]
    fn load_store_normalizes_to_three_operands() {
        let (instrs, _) = run("lw $t0, 4($sp)\n");
        assert_eq!(instrs[0].mnemonic, "lw");
        assert_eq!(instrs[0].operands.len(), 3);
    }

    #[test]
    fn degenerate_load_defaults_base_to_zero() {
        let (instrs, _) = run("lw $t0, 4\n");
        assert_eq!(instrs[0].operands[1], ResolvedOperand::Register(0));
        assert_eq!(instrs[0].operands[2], ResolvedOperand::Immediate(4));
    }

    #[test]
    fn data_directive_writes_into_data_segment() {
        let (_, memory) = run(".data\nvalues:\n.word 0x0A0B0C0D\n");
        assert_eq!(memory.read_word(MIPS_DATA_START_ADDR).unwrap(), 0x0A0B0C0D);
    }

    #[test]
    fn unknown_label_is_an_error() {
        let lines = normalize("beq $t0,$0,nowhere\n").unwrap();
        let mut table = build_symbol_table(&lines, MIPS_TEXT_START_ADDR, MIPS_DATA_START_ADDR).unwrap();
        stage_a_fixup(&lines, &mut table, MIPS_TEXT_START_ADDR, MIPS_DATA_START_ADDR).unwrap();
        let mut memory = Memory::new(1 << 16);
        assert!(stage_b(&lines, &table, &mut memory, MIPS_TEXT_START_ADDR, MIPS_DATA_START_ADDR).is_err());
    }
}
