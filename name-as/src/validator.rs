/// Validator. Runs once over every logical line before pass 1 even starts:
/// every label is a syntactically valid identifier, every
/// directive is recognized with an argument count/shape its table allows,
/// and every instruction mnemonic (real or pseudo) is known with an arity
/// one of its accepted forms matches. Unknown registers and unknown labels
/// are deliberately NOT caught here -- they need the symbol table pass 2
/// builds, and labels may be forward references.
use name_core::error::{AssembleError, ErrorKind};
use name_core::instruction::{lookup_pseudo, INSTRUCTION_TABLE};

use crate::lexer::{LexedLine, RawLine};

pub fn validate(lines: &[LexedLine]) -> Result<(), AssembleError> {
    for line in lines {
        match &line.line {
            RawLine::Label(name) => validate_label(name, line.line_number)?,
            RawLine::Directive(name, args) => validate_directive(name, args, line.line_number)?,
            RawLine::Instruction(mnemonic, args) => {
                validate_instruction(mnemonic, args, line.line_number)?
            }
        }
    }
    Ok(())
}

fn validate_label(name: &str, line_number: u32) -> Result<(), AssembleError> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(AssembleError::new(
            line_number,
            ErrorKind::UnrecognizedLine(format!("'{name}' is not a valid label")),
        ))
    }
}

fn validate_directive(name: &str, args: &[String], line_number: u32) -> Result<(), AssembleError> {
    let arity_ok = match name {
        ".align" | ".space" => args.len() == 1,
        ".ascii" | ".asciiz" | ".byte" | ".half" | ".word" | ".float" | ".double" => {
            !args.is_empty()
        }
        ".text" | ".data" => args.is_empty(),
        _ => {
            return Err(AssembleError::new(
                line_number,
                ErrorKind::DirectiveSyntax(format!("unknown directive '{name}'")),
            ))
        }
    };

    if arity_ok {
        Ok(())
    } else {
        Err(AssembleError::new(
            line_number,
            ErrorKind::DirectiveSyntax(format!(
                "'{name}' given {} argument(s), which doesn't match its accepted shape",
                args.len()
            )),
        ))
    }
}

fn validate_instruction(mnemonic: &str, args: &[String], line_number: u32) -> Result<(), AssembleError> {
    if let Some(info) = INSTRUCTION_TABLE.get(mnemonic) {
        if info.accepts_arity(args.len()) {
            return Ok(());
        }
        return Err(AssembleError::new(
            line_number,
            ErrorKind::BadArguments(format!(
                "'{mnemonic}' does not accept {} operand(s)",
                args.len()
            )),
        ));
    }

    if let Some(pseudo) = lookup_pseudo(mnemonic) {
        if pseudo.arity == args.len() {
            return Ok(());
        }
        return Err(AssembleError::new(
            line_number,
            ErrorKind::BadArguments(format!(
                "'{mnemonic}' does not accept {} operand(s)",
                args.len()
            )),
        ));
    }

    Err(AssembleError::new(
        line_number,
        ErrorKind::UnknownInstruction(mnemonic.to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::normalize;

    #[test]
    fn accepts_well_formed_program() {
        let lines = normalize("main:\n    addi $t0, $zero, 10\n    .data\n    .word 1, 2\n").unwrap();
        assert!(validate(&lines).is_ok());
    }

    #[test]
    fn rejects_unknown_mnemonic() {
        let lines = normalize("frobnicate $t0, $t1").unwrap();
        assert!(validate(&lines).is_err());
    }

    #[test]
    fn rejects_bad_arity() {
        let lines = normalize("add $t0, $t1").unwrap();
        assert!(matches!(
            validate(&lines).unwrap_err().kind,
            ErrorKind::BadArguments(_)
        ));
    }

    #[test]
    fn rejects_malformed_label() {
        let lines = normalize("9bad:\nnop").unwrap();
        assert!(validate(&lines).is_err());
    }

    #[test]
    fn pseudo_arity_is_checked_too() {
        let lines = normalize("li $t0, 5, 6").unwrap();
        assert!(validate(&lines).is_err());
    }
}
