use std::collections::HashMap;
use std::sync::LazyLock;

use crate::instruction::information::InstructionInformation;
use crate::instruction::instruction_set::INSTRUCTION_SET;

/// Mnemonic -> metadata lookup used by the validator and encoder.
pub static INSTRUCTION_TABLE: LazyLock<HashMap<&'static str, &'static InstructionInformation>> =
    LazyLock::new(|| {
        let mut map = HashMap::new();
        for info in INSTRUCTION_SET.iter() {
            map.insert(info.mnemonic, info);
        }
        map
    });
