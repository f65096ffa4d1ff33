const NUM_OF_REGISTERS: usize = 32; // Number of general purpose registers.

// Base addresses for the two segments this assembler supports, matching
// conventional MIPS segment layout.
pub const MIPS_TEXT_START_ADDR: u32 = 0x00400000;
pub const MIPS_DATA_START_ADDR: u32 = 0x10010000;

/// MIPS is aligned by 4-byte word; every real instruction occupies exactly
/// this many bytes.
pub const MIPS_ADDRESS_ALIGNMENT: u32 = 4;

pub const REGISTERS: [&str; NUM_OF_REGISTERS] = [
    "$zero", "$at", "$v0", "$v1", "$a0", "$a1", "$a2", "$a3", "$t0", "$t1", "$t2", "$t3", "$t4",
    "$t5", "$t6", "$t7", "$s0", "$s1", "$s2", "$s3", "$s4", "$s5", "$s6", "$s7", "$t8", "$t9",
    "$k0", "$k1", "$gp", "$sp", "$fp", "$ra",
];

/// `$1`, the assembler-reserved temporary used by pseudo-instruction expansions.
pub const ASSEMBLER_TEMPORARY: u32 = 1;
