/// The I-Type (Immediate) instruction is defined as:
/// | opcode | rs | rt | immediate |
use crate::instruction::raw::RawInstruction;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IArgs {
    pub opcode: u32,
    pub rs: u32,
    pub rt: u32,
    pub imm: u32,
}

impl From<IArgs> for RawInstruction {
    fn from(i: IArgs) -> Self {
        RawInstruction::new((i.opcode << 26) | (i.rs << 21) | (i.rt << 16) | (i.imm & 0xFFFF))
    }
}

impl From<RawInstruction> for IArgs {
    fn from(raw: RawInstruction) -> IArgs {
        IArgs {
            opcode: raw.get_opcode(),
            rs: raw.get_rs(),
            rt: raw.get_rt(),
            imm: raw.get_imm16(),
        }
    }
}
