/// Top-level assembler entry point. Runs the full pipeline -- normalize,
/// validate, build the symbol table, fix it up for pseudo expansion,
/// resolve every operand, expand pseudos, encode -- and writes the
/// resulting machine words into `memory` starting at `base_address`.
/// `.data` content lands at the fixed data-segment base independent of
/// `base_address`.
use name_core::constants::MIPS_DATA_START_ADDR;
use name_core::error::AssembleError;
use name_core::memory::Memory;

use crate::encoder;
use crate::lexer;
use crate::resolver;
use crate::symbol_table;
use crate::validator;

pub fn assemble(source: &str, base_address: u32, memory: &mut Memory) -> Result<u32, AssembleError> {
    let lines = lexer::normalize(source)?;
    validator::validate(&lines)?;

    let data_base = MIPS_DATA_START_ADDR;
    let mut table = symbol_table::build_symbol_table(&lines, base_address, data_base)?;
    resolver::stage_a_fixup(&lines, &mut table, base_address, data_base)?;
    let resolved = resolver::stage_b(&lines, &table, memory, base_address, data_base)?;
    let real_instructions = resolver::stage_c(resolved, base_address)?;

    let mut address = base_address;
    for instr in &real_instructions {
        let raw = encoder::encode(instr, 0)?;
        memory.write(address, &raw.to_be_bytes()).map_err(|e| AssembleError::new(0, e))?;
        address += 4;
    }

    Ok(base_address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use name_core::constants::MIPS_TEXT_START_ADDR;

    #[test]
    fn assembles_add_instruction() {
        let mut memory = Memory::new(1 << 20);
        assemble("add $t2, $t0, $t1\n", MIPS_TEXT_START_ADDR, &mut memory).unwrap();
        assert_eq!(memory.read_word(MIPS_TEXT_START_ADDR).unwrap(), 0x0109_5020);
    }

    #[test]
    fn assembles_data_segment_independent_of_base_address() {
        let mut memory = Memory::new(1 << 24);
        assemble(".data\n.word 0xCAFEBABE\n", MIPS_TEXT_START_ADDR, &mut memory).unwrap();
        assert_eq!(memory.read_word(MIPS_DATA_START_ADDR).unwrap(), 0xCAFE_BABE);
    }

    #[test]
    fn assembles_li_and_branch_with_label() {
        let mut memory = Memory::new(1 << 20);
        assemble("li $t0, 1\ntarget:\nnop\nbeq $t0, $zero, target\n", MIPS_TEXT_START_ADDR, &mut memory).unwrap();
        // li -> lui, ori (2 words); target label now at base+8; nop at
        // base+8; beq at base+12 referencing target (base+8).
        let beq_word = memory.read_word(MIPS_TEXT_START_ADDR + 12).unwrap();
        assert_eq!(beq_word & 0xFFFF, 0x0008);
    }

    #[test]
    fn rejects_unknown_instruction() {
        let mut memory = Memory::new(1 << 16);
        assert!(assemble("bogus $t0, $t1\n", MIPS_TEXT_START_ADDR, &mut memory).is_err());
    }
}
