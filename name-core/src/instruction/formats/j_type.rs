/// The J-Type (jump) instruction is defined as:
/// | opcode | target |
use crate::instruction::raw::RawInstruction;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JArgs {
    pub opcode: u32,
    pub target: u32,
}

impl From<JArgs> for RawInstruction {
    fn from(j: JArgs) -> Self {
        RawInstruction::new((j.opcode << 26) | (j.target & 0x03FF_FFFF))
    }
}

impl From<RawInstruction> for JArgs {
    fn from(raw: RawInstruction) -> JArgs {
        JArgs {
            opcode: raw.get_opcode(),
            target: raw.get_target(),
        }
    }
}
