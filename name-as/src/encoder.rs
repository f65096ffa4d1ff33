/// Encoder: packs a fully-resolved real instruction into its 32-bit
/// machine word. Branch and jump targets are packed as the raw numeric
/// value the resolver supplied -- this dialect treats them as absolute
/// addresses, not PC-relative offsets, so the encoder never pre-scales
/// them.
use name_core::error::{AssembleError, ErrorKind};
use name_core::instruction::formats::{IArgs, JArgs, RArgs};
use name_core::instruction::{InstructionClass, RawInstruction, INSTRUCTION_TABLE};

use crate::resolved::{ResolvedInstruction, ResolvedOperand};

pub fn encode(instr: &ResolvedInstruction, line_number: u32) -> Result<RawInstruction, AssembleError> {
    let info = INSTRUCTION_TABLE.get(instr.mnemonic.as_str()).ok_or_else(|| {
        AssembleError::new(line_number, ErrorKind::UnknownInstruction(instr.mnemonic.clone()))
    })?;

    let ops = &instr.operands;
    let reg = |o: &ResolvedOperand| -> u32 {
        match o {
            ResolvedOperand::Register(n) => *n,
            ResolvedOperand::Immediate(n) => *n as u32,
        }
    };
    let imm = |o: &ResolvedOperand| -> i64 {
        match o {
            ResolvedOperand::Immediate(n) => *n,
            ResolvedOperand::Register(n) => *n as i64,
        }
    };

    let raw = match info.class {
        InstructionClass::RArithLogCompare => {
            let [rd, rs, rt] = take3(ops, line_number)?;
            RArgs {
                rs: reg(rs),
                rt: reg(rt),
                rd: reg(rd),
                shamt: 0,
                funct: info.funct,
            }
            .into()
        }
        InstructionClass::RShiftConst => {
            let [rd, rt, shamt] = take3(ops, line_number)?;
            RArgs {
                rs: 0,
                rt: reg(rt),
                rd: reg(rd),
                shamt: imm(shamt) as u32 & 0x1F,
                funct: info.funct,
            }
            .into()
        }
        InstructionClass::RJumpRegister => match ops {
            [rs] => RArgs {
                rs: reg(rs),
                rt: 0,
                rd: 31,
                shamt: 0,
                funct: info.funct,
            }
            .into(),
            [rd, rs] => RArgs {
                rs: reg(rs),
                rt: 0,
                rd: reg(rd),
                shamt: 0,
                funct: info.funct,
            }
            .into(),
            _ => return Err(arity_error(line_number, &instr.mnemonic)),
        },
        InstructionClass::IArithCompareImm => {
            let [rt, rs, immediate] = take3(ops, line_number)?;
            IArgs {
                opcode: info.opcode,
                rs: reg(rs),
                rt: reg(rt),
                imm: fits16(imm(immediate), line_number)?,
            }
            .into()
        }
        InstructionClass::ILoadStore => {
            let [rt, base, offset] = take3(ops, line_number)?;
            IArgs {
                opcode: info.opcode,
                rs: reg(base),
                rt: reg(rt),
                imm: fits16(imm(offset), line_number)?,
            }
            .into()
        }
        InstructionClass::IBranchTwoReg => {
            let [rs, rt, target] = take3(ops, line_number)?;
            IArgs {
                opcode: info.opcode,
                rs: reg(rs),
                rt: reg(rt),
                imm: imm(target) as u32 & 0xFFFF,
            }
            .into()
        }
        InstructionClass::IBranchOneReg => {
            let [rs, target] = take2(ops, line_number)?;
            IArgs {
                opcode: info.opcode,
                rs: reg(rs),
                rt: info.funct,
                imm: imm(target) as u32 & 0xFFFF,
            }
            .into()
        }
        InstructionClass::IUpperImmediate => {
            let [rt, immediate] = take2(ops, line_number)?;
            IArgs {
                opcode: info.opcode,
                rs: 0,
                rt: reg(rt),
                imm: imm(immediate) as u32 & 0xFFFF,
            }
            .into()
        }
        InstructionClass::JFormat => {
            let [target] = take1(ops, line_number)?;
            JArgs {
                opcode: info.opcode,
                target: imm(target) as u32 & 0x03FF_FFFF,
            }
            .into()
        }
        InstructionClass::NoOperand => RArgs {
            rs: 0,
            rt: 0,
            rd: 0,
            shamt: 0,
            funct: info.funct,
        }
        .into(),
    };

    Ok(raw)
}

/// MIPS I-type immediates accept either a signed 16-bit value or an
/// unsigned one under 2^16, matching how a user naturally writes e.g.
/// `ori $t0, $t0, 0xFFFF` alongside `addi $t0, $t0, -1`.
fn fits16(v: i64, line_number: u32) -> Result<u32, AssembleError> {
    if v < i16::MIN as i64 || v > u16::MAX as i64 {
        return Err(AssembleError::new(line_number, ErrorKind::ImmediateOverflow(v)));
    }
    Ok(v as u32 & 0xFFFF)
}

fn take1<'a>(ops: &'a [ResolvedOperand], line_number: u32) -> Result<[&'a ResolvedOperand; 1], AssembleError> {
    match ops {
        [a] => Ok([a]),
        _ => Err(AssembleError::new(
            line_number,
            ErrorKind::BadArguments("expected 1 operand at encode time".into()),
        )),
    }
}

fn take2<'a>(ops: &'a [ResolvedOperand], line_number: u32) -> Result<[&'a ResolvedOperand; 2], AssembleError> {
    match ops {
        [a, b] => Ok([a, b]),
        _ => Err(AssembleError::new(
            line_number,
            ErrorKind::BadArguments("expected 2 operands at encode time".into()),
        )),
    }
}

fn take3<'a>(ops: &'a [ResolvedOperand], line_number: u32) -> Result<[&'a ResolvedOperand; 3], AssembleError> {
    match ops {
        [a, b, c] => Ok([a, b, c]),
        _ => Err(AssembleError::new(
            line_number,
            ErrorKind::BadArguments("expected 3 operands at encode time".into()),
        )),
    }
}

fn arity_error(line_number: u32, mnemonic: &str) -> AssembleError {
    AssembleError::new(
        line_number,
        ErrorKind::BadArguments(format!("'{mnemonic}' has an unexpected operand count at encode time")),
    )
}
