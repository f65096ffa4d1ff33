//! `InstructionSplitter`: decomposes a 32-bit instruction wire into its
//! MIPS-I fields. Combinational -- every field is a pure function of the
//! instruction word, recomputed each `update()`.
use name_core::instruction::RawInstruction;

use crate::component::Component;
use crate::wire::Wire;

pub struct InstructionSplitter {
    pub instruction: Wire<32>,
    pub opcode: Wire<6>,
    pub rs: Wire<5>,
    pub rt: Wire<5>,
    pub rd: Wire<5>,
    pub shamt: Wire<5>,
    pub funct: Wire<6>,
    pub imm: Wire<16>,
    pub addr: Wire<26>,
}

impl InstructionSplitter {
    pub fn new(instruction: Wire<32>) -> Self {
        InstructionSplitter {
            instruction,
            opcode: Wire::new(0),
            rs: Wire::new(0),
            rt: Wire::new(0),
            rd: Wire::new(0),
            shamt: Wire::new(0),
            funct: Wire::new(0),
            imm: Wire::new(0),
            addr: Wire::new(0),
        }
    }
}

impl Component for InstructionSplitter {
    fn update(&mut self) -> bool {
        let raw = RawInstruction::new(self.instruction.get());

        let mut changed = false;

        macro_rules! apply {
            ($field:expr, $value:expr) => {
                let before = $field.get();
                $field.set($value);
                changed |= $field.get() != before;
            };
        }

        apply!(self.opcode, raw.get_opcode());
        apply!(self.rs, raw.get_rs());
        apply!(self.rt, raw.get_rt());
        apply!(self.rd, raw.get_rd());
        apply!(self.shamt, raw.get_shamt());
        apply!(self.funct, raw.get_funct());
        apply!(self.imm, raw.get_imm16());
        apply!(self.addr, raw.get_target());

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_r_type_fields() {
        let instruction: Wire<32> = Wire::new(0x0109_5020);
        let mut splitter = InstructionSplitter::new(instruction);
        splitter.update();
        assert_eq!(splitter.opcode.get(), 0);
        assert_eq!(splitter.rs.get(), 8);
        assert_eq!(splitter.rt.get(), 9);
        assert_eq!(splitter.rd.get(), 10);
        assert_eq!(splitter.funct.get(), 0x20);
    }

    #[test]
    fn splits_i_type_immediate() {
        let instruction: Wire<32> = Wire::new(0x2008_000A);
        let mut splitter = InstructionSplitter::new(instruction);
        splitter.update();
        assert_eq!(splitter.opcode.get(), 0x08);
        assert_eq!(splitter.imm.get(), 10);
    }
}
