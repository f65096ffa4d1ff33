/// Operand Tokenizer. Classifies each raw argument string produced by the
/// lexer into a `Register`, `Immediate`, or `Memory` operand. Register
/// tokens are validated immediately (the alias table is closed and needs
/// no forward knowledge); labels are left unresolved for pass 2 to settle.
use name_core::error::{AssembleError, ErrorKind};
use name_core::registers::Register;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imm {
    Number(i64),
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Register(String),
    Immediate(Imm),
    Memory { offset: Imm, base: String },
}

pub fn tokenize_operands(args: &[String], line_number: u32) -> Result<Vec<Operand>, AssembleError> {
    args.iter().map(|a| classify(a, line_number)).collect()
}

fn classify(raw: &str, line_number: u32) -> Result<Operand, AssembleError> {
    if let Some(lparen) = raw.find('(') {
        if !raw.ends_with(')') {
            return Err(syntax_error(line_number, raw));
        }
        let offset_text = raw[..lparen].trim();
        let base_text = raw[lparen + 1..raw.len() - 1].trim();

        if !base_text.starts_with('$') {
            return Err(syntax_error(line_number, raw));
        }
        check_register(base_text, line_number)?;

        let offset = if offset_text.is_empty() {
            Imm::Number(0)
        } else {
            parse_imm(offset_text)
        };

        return Ok(Operand::Memory {
            offset,
            base: base_text.to_string(),
        });
    }

    if raw.starts_with('$') {
        check_register(raw, line_number)?;
        return Ok(Operand::Register(raw.to_string()));
    }

    Ok(Operand::Immediate(parse_imm(raw)))
}

fn check_register(token: &str, line_number: u32) -> Result<(), AssembleError> {
    Register::from_str(token)
        .map(|_| ())
        .map_err(|_| syntax_error(line_number, token))
}

fn syntax_error(line_number: u32, text: &str) -> AssembleError {
    AssembleError::new(
        line_number,
        ErrorKind::InstructionSyntax(format!("malformed operand '{text}'")),
    )
}

fn parse_imm(text: &str) -> Imm {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        if let Ok(n) = i64::from_str_radix(hex, 16) {
            return Imm::Number(n);
        }
    } else if let Some(hex) = text.strip_prefix("-0x").or_else(|| text.strip_prefix("-0X")) {
        if let Ok(n) = i64::from_str_radix(hex, 16) {
            return Imm::Number(-n);
        }
    } else if let Ok(n) = text.parse::<i64>() {
        return Imm::Number(n);
    }
    Imm::Label(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_register() {
        let ops = tokenize_operands(&["$t0".to_string()], 1).unwrap();
        assert_eq!(ops[0], Operand::Register("$t0".to_string()));
    }

    #[test]
    fn classifies_decimal_and_hex_immediate() {
        let ops = tokenize_operands(&["10".to_string(), "0x10".to_string()], 1).unwrap();
        assert_eq!(ops[0], Operand::Immediate(Imm::Number(10)));
        assert_eq!(ops[1], Operand::Immediate(Imm::Number(16)));
    }

    #[test]
    fn classifies_label_immediate() {
        let ops = tokenize_operands(&["loop".to_string()], 1).unwrap();
        assert_eq!(ops[0], Operand::Immediate(Imm::Label("loop".to_string())));
    }

    #[test]
    fn classifies_memory_operand() {
        let ops = tokenize_operands(&["4($sp)".to_string()], 1).unwrap();
        assert_eq!(
            ops[0],
            Operand::Memory {
                offset: Imm::Number(4),
                base: "$sp".to_string()
            }
        );
    }

    #[test]
    fn degenerate_memory_operand_defaults_offset_to_zero() {
        let ops = tokenize_operands(&["($sp)".to_string()], 1).unwrap();
        assert_eq!(
            ops[0],
            Operand::Memory {
                offset: Imm::Number(0),
                base: "$sp".to_string()
            }
        );
    }

    #[test]
    fn rejects_unmatched_parens() {
        assert!(tokenize_operands(&["4($sp".to_string()], 1).is_err());
    }

    #[test]
    fn rejects_unknown_register() {
        assert!(tokenize_operands(&["$bogus".to_string()], 1).is_err());
    }
}
