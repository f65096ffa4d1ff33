use crate::instruction::information::{InstructionClass, InstructionFormat, InstructionInformation};

/// The MIPS-I core integer ISA this assembler targets.
/// No floating point, no coprocessor/TLB instructions.
pub const INSTRUCTION_SET: &[InstructionInformation] = &[
    // --- R arithmetic/logical/compare: rs, rt, rd; shamt=0 ---
    r(
        "add",
        0x20,
    ),
    r("addu", 0x21),
    r("and", 0x24),
    r("nor", 0x27),
    r("or", 0x25),
    r("slt", 0x2A),
    r("sltu", 0x2B),
    r("sub", 0x22),
    r("subu", 0x23),
    r("xor", 0x26),
    r("sllv", 0x04),
    r("srlv", 0x06),
    r("srav", 0x07),
    // --- R shift-by-constant: rt, rd, shamt ---
    shift("sll", 0x00),
    shift("srl", 0x02),
    shift("sra", 0x03),
    // --- R jump-register ---
    InstructionInformation {
        mnemonic: "jr",
        format: InstructionFormat::R,
        class: InstructionClass::RJumpRegister,
        opcode: 0,
        funct: 0x08,
        accepted_arities: &[1],
    },
    InstructionInformation {
        mnemonic: "jalr",
        format: InstructionFormat::R,
        class: InstructionClass::RJumpRegister,
        opcode: 0,
        funct: 0x09,
        accepted_arities: &[1, 2],
    },
    // --- I arithmetic/compare-immediate: rt, rs, imm16 ---
    i_arith("addi", 0x08),
    i_arith("addiu", 0x09),
    i_arith("andi", 0x0C),
    i_arith("ori", 0x0D),
    i_arith("xori", 0x0E),
    i_arith("slti", 0x0A),
    i_arith("sltiu", 0x0B),
    // --- I load/store: rs=base, rt, imm16=offset ---
    load_store("lb", 0x20),
    load_store("lh", 0x21),
    load_store("lw", 0x23),
    load_store("lbu", 0x24),
    load_store("lhu", 0x25),
    load_store("ll", 0x30),
    load_store("sb", 0x28),
    load_store("sh", 0x29),
    load_store("sw", 0x2B),
    load_store("sc", 0x38),
    // --- I branch-two-register: rs, rt, imm16 ---
    InstructionInformation {
        mnemonic: "beq",
        format: InstructionFormat::I,
        class: InstructionClass::IBranchTwoReg,
        opcode: 0x04,
        funct: 0,
        accepted_arities: &[3],
    },
    InstructionInformation {
        mnemonic: "bne",
        format: InstructionFormat::I,
        class: InstructionClass::IBranchTwoReg,
        opcode: 0x05,
        funct: 0,
        accepted_arities: &[3],
    },
    // --- I branch-one-register: rs, [rt from `funct` as REGIMM sub-opcode], imm16 ---
    branch_one_reg("bgtz", 0x07, 0),
    branch_one_reg("blez", 0x06, 0),
    branch_one_reg("bltz", 0x01, 0x00),
    branch_one_reg("bgez", 0x01, 0x01),
    branch_one_reg("bltzal", 0x01, 0x10),
    branch_one_reg("bgezal", 0x01, 0x11),
    // --- I upper-immediate: rt, imm16 ---
    InstructionInformation {
        mnemonic: "lui",
        format: InstructionFormat::I,
        class: InstructionClass::IUpperImmediate,
        opcode: 0x0F,
        funct: 0,
        accepted_arities: &[2],
    },
    // --- J: target ---
    InstructionInformation {
        mnemonic: "j",
        format: InstructionFormat::J,
        class: InstructionClass::JFormat,
        opcode: 0x02,
        funct: 0,
        accepted_arities: &[1],
    },
    InstructionInformation {
        mnemonic: "jal",
        format: InstructionFormat::J,
        class: InstructionClass::JFormat,
        opcode: 0x03,
        funct: 0,
        accepted_arities: &[1],
    },
    // --- No-operand ---
    InstructionInformation {
        mnemonic: "nop",
        format: InstructionFormat::R,
        class: InstructionClass::NoOperand,
        opcode: 0,
        funct: 0,
        accepted_arities: &[0],
    },
    InstructionInformation {
        mnemonic: "syscall",
        format: InstructionFormat::R,
        class: InstructionClass::NoOperand,
        opcode: 0,
        funct: 0x0C,
        accepted_arities: &[0],
    },
    InstructionInformation {
        mnemonic: "break",
        format: InstructionFormat::R,
        class: InstructionClass::NoOperand,
        opcode: 0,
        funct: 0x0D,
        accepted_arities: &[0],
    },
];

const fn r(mnemonic: &'static str, funct: u32) -> InstructionInformation {
    InstructionInformation {
        mnemonic,
        format: InstructionFormat::R,
        class: InstructionClass::RArithLogCompare,
        opcode: 0,
        funct,
        accepted_arities: &[3],
    }
}

const fn shift(mnemonic: &'static str, funct: u32) -> InstructionInformation {
    InstructionInformation {
        mnemonic,
        format: InstructionFormat::R,
        class: InstructionClass::RShiftConst,
        opcode: 0,
        funct,
        accepted_arities: &[3],
    }
}

const fn i_arith(mnemonic: &'static str, opcode: u32) -> InstructionInformation {
    InstructionInformation {
        mnemonic,
        format: InstructionFormat::I,
        class: InstructionClass::IArithCompareImm,
        opcode,
        funct: 0,
        accepted_arities: &[3],
    }
}

const fn load_store(mnemonic: &'static str, opcode: u32) -> InstructionInformation {
    InstructionInformation {
        mnemonic,
        format: InstructionFormat::I,
        class: InstructionClass::ILoadStore,
        opcode,
        funct: 0,
        accepted_arities: &[2],
    }
}

const fn branch_one_reg(mnemonic: &'static str, opcode: u32, regimm_subcode: u32) -> InstructionInformation {
    InstructionInformation {
        mnemonic,
        format: InstructionFormat::I,
        class: InstructionClass::IBranchOneReg,
        opcode,
        funct: regimm_subcode,
        accepted_arities: &[2],
    }
}
