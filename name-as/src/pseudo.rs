/// Stage C: pseudo-instruction expansion. Every label has already been
/// substituted with a numeric constant by stage B, so these expansions
/// work purely on resolved operands and the real-instruction addresses
/// they end up at.
use name_core::constants::ASSEMBLER_TEMPORARY;
use name_core::error::{AssembleError, ErrorKind};

use crate::resolved::{ResolvedInstruction, ResolvedOperand};

const ZERO: ResolvedOperand = ResolvedOperand::Register(0);
const AT: ResolvedOperand = ResolvedOperand::Register(ASSEMBLER_TEMPORARY);

/// Number of real instructions a pseudo mnemonic expands to, used by stage
/// A (`resolver.rs`) to correct pass 1's flat 4-byte charge. `abs` nests a
/// `bge`, whose own two real instructions are counted here too.
pub fn expansion_length(mnemonic: &str) -> Option<u32> {
    Some(match mnemonic {
        "abs" => 4,
        "neg" | "negu" | "not" | "move" | "beqz" | "sgt" => 1,
        "li" | "la" | "blt" | "bgt" | "ble" | "bge" | "sge" => 2,
        _ => return None,
    })
}

fn real(mnemonic: &str, operands: Vec<ResolvedOperand>) -> ResolvedInstruction {
    ResolvedInstruction {
        mnemonic: mnemonic.to_string(),
        operands,
    }
}

fn op2(mnemonic: &str, operands: &[ResolvedOperand]) -> Result<(ResolvedOperand, ResolvedOperand), AssembleError> {
    match operands {
        [a, b] => Ok((*a, *b)),
        _ => Err(AssembleError::new(
            0,
            ErrorKind::BadArguments(format!("'{mnemonic}' pseudo expansion needs 2 operands")),
        )),
    }
}

fn op3(
    mnemonic: &str,
    operands: &[ResolvedOperand],
) -> Result<(ResolvedOperand, ResolvedOperand, ResolvedOperand), AssembleError> {
    match operands {
        [a, b, c] => Ok((*a, *b, *c)),
        _ => Err(AssembleError::new(
            0,
            ErrorKind::BadArguments(format!("'{mnemonic}' pseudo expansion needs 3 operands")),
        )),
    }
}

/// Expands one pseudo-instruction, given the address its first real
/// instruction will be emitted at (`pc`, needed only by `abs`'s internal
/// forward branch).
pub fn expand(mnemonic: &str, operands: &[ResolvedOperand], pc: u32) -> Result<Vec<ResolvedInstruction>, AssembleError> {
    match mnemonic {
        "neg" => {
            let (d, s) = op2(mnemonic, operands)?;
            Ok(vec![real("sub", vec![d, ZERO, s])])
        }
        "negu" => {
            let (d, s) = op2(mnemonic, operands)?;
            Ok(vec![real("subu", vec![d, ZERO, s])])
        }
        "not" => {
            let (d, s) = op2(mnemonic, operands)?;
            Ok(vec![real("nor", vec![d, s, ZERO])])
        }
        "move" => {
            let (d, s) = op2(mnemonic, operands)?;
            Ok(vec![real("add", vec![d, s, ZERO])])
        }
        "li" | "la" => {
            let (d, imm) = op2(mnemonic, operands)?;
            let ResolvedOperand::Immediate(v) = imm else {
                return Err(AssembleError::new(
                    0,
                    ErrorKind::BadArguments(format!("'{mnemonic}' needs an immediate second operand")),
                ));
            };
            let v = v as u32;
            let upper = (v >> 16) & 0xFFFF;
            let lower = v & 0xFFFF;
            Ok(vec![
                real("lui", vec![d, ResolvedOperand::Immediate(upper as i64)]),
                real("ori", vec![d, d, ResolvedOperand::Immediate(lower as i64)]),
            ])
        }
        "blt" => {
            let (a0, a1, lbl) = op3(mnemonic, operands)?;
            Ok(vec![real("slt", vec![AT, a0, a1]), real("bne", vec![AT, ZERO, lbl])])
        }
        "bgt" => {
            let (a0, a1, lbl) = op3(mnemonic, operands)?;
            Ok(vec![real("slt", vec![AT, a1, a0]), real("bne", vec![AT, ZERO, lbl])])
        }
        "ble" => {
            let (a0, a1, lbl) = op3(mnemonic, operands)?;
            Ok(vec![real("slt", vec![AT, a1, a0]), real("beq", vec![AT, ZERO, lbl])])
        }
        "bge" => {
            let (a0, a1, lbl) = op3(mnemonic, operands)?;
            Ok(vec![real("slt", vec![AT, a1, a0]), real("beq", vec![AT, ZERO, lbl])])
        }
        "beqz" => {
            let (a0, lbl) = op2(mnemonic, operands)?;
            Ok(vec![real("beq", vec![a0, ZERO, lbl])])
        }
        "sge" => {
            let (d, a0, a1) = op3(mnemonic, operands)?;
            Ok(vec![
                real("slt", vec![AT, a1, a0]),
                real("xori", vec![d, AT, ResolvedOperand::Immediate(1)]),
            ])
        }
        "sgt" => {
            let (d, a0, a1) = op3(mnemonic, operands)?;
            Ok(vec![real("slt", vec![d, a1, a0])])
        }
        "abs" => {
            let (d, s) = op2(mnemonic, operands)?;
            // sub d,$0,s ; bge s,$0,<skip the trailing sub> ; sub d,$0,s
            // (the trailing sub is redundant with the first when taken --
            // both leave d = -s -- so either path yields the same result)
            let skip_target = pc + 16;
            Ok(vec![
                real("sub", vec![d, ZERO, s]),
                real("slt", vec![AT, ZERO, s]),
                real("beq", vec![AT, ZERO, ResolvedOperand::Immediate(skip_target as i64)]),
                real("sub", vec![d, ZERO, s]),
            ])
        }
        other => Err(AssembleError::new(
            0,
            ErrorKind::UnknownInstruction(other.to_string()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_expands_to_single_add() {
        let expanded = expand("move", &[ResolvedOperand::Register(8), ResolvedOperand::Register(9)], 0).unwrap();
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].mnemonic, "add");
    }

    #[test]
    fn li_splits_into_lui_and_ori() {
        let expanded = expand(
            "li",
            &[ResolvedOperand::Register(8), ResolvedOperand::Immediate(0x1234_5678)],
            0,
        )
        .unwrap();
        assert_eq!(expanded[0].mnemonic, "lui");
        assert_eq!(expanded[0].operands[1], ResolvedOperand::Immediate(0x1234));
        assert_eq!(expanded[1].mnemonic, "ori");
        assert_eq!(expanded[1].operands[2], ResolvedOperand::Immediate(0x5678));
    }

    #[test]
    fn abs_expands_to_four_real_instructions() {
        let expanded = expand("abs", &[ResolvedOperand::Register(8), ResolvedOperand::Register(9)], 0x400000).unwrap();
        assert_eq!(expanded.len(), 4);
        assert_eq!(expansion_length("abs"), Some(4));
    }

    #[test]
    fn expansion_length_matches_real_instruction_counts() {
        assert_eq!(expansion_length("li"), Some(2));
        assert_eq!(expansion_length("move"), Some(1));
        assert_eq!(expansion_length("bge"), Some(2));
        assert_eq!(expansion_length("frobnicate"), None);
    }
}
