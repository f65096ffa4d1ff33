/// The R-Type (Register) instruction is defined as:
/// | opcode | rs | rt | rd | shamt | funct |
use crate::instruction::raw::RawInstruction;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RArgs {
    pub rs: u32,
    pub rt: u32,
    pub rd: u32,
    pub shamt: u32,
    pub funct: u32,
}

impl From<RArgs> for RawInstruction {
    fn from(r: RArgs) -> Self {
        RawInstruction::new(
            (r.rs << 21) | (r.rt << 16) | (r.rd << 11) | (r.shamt << 6) | r.funct,
        )
    }
}

impl From<RawInstruction> for RArgs {
    fn from(raw: RawInstruction) -> RArgs {
        RArgs {
            rs: raw.get_rs(),
            rt: raw.get_rt(),
            rd: raw.get_rd(),
            shamt: raw.get_shamt(),
            funct: raw.get_funct(),
        }
    }
}
