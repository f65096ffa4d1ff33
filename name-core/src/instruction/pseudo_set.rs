/// The closed set of pseudo-instructions this assembler understands.
/// `arity` is the operand count the validator checks before pass 1 even
/// runs; the expansion itself lives in `name-as`, since it needs the
/// fully-resolved operand values a pseudo's real-instruction expansion is
/// built from.
pub struct PseudoInfo {
    pub mnemonic: &'static str,
    pub arity: usize,
}

pub const PSEUDO_SET: &[PseudoInfo] = &[
    PseudoInfo { mnemonic: "abs", arity: 2 },
    PseudoInfo { mnemonic: "neg", arity: 2 },
    PseudoInfo { mnemonic: "negu", arity: 2 },
    PseudoInfo { mnemonic: "not", arity: 2 },
    PseudoInfo { mnemonic: "move", arity: 2 },
    PseudoInfo { mnemonic: "li", arity: 2 },
    PseudoInfo { mnemonic: "la", arity: 2 },
    PseudoInfo { mnemonic: "blt", arity: 3 },
    PseudoInfo { mnemonic: "bgt", arity: 3 },
    PseudoInfo { mnemonic: "ble", arity: 3 },
    PseudoInfo { mnemonic: "bge", arity: 3 },
    PseudoInfo { mnemonic: "beqz", arity: 2 },
    PseudoInfo { mnemonic: "sge", arity: 3 },
    PseudoInfo { mnemonic: "sgt", arity: 3 },
];

pub fn lookup_pseudo(mnemonic: &str) -> Option<&'static PseudoInfo> {
    PSEUDO_SET.iter().find(|p| p.mnemonic == mnemonic)
}
