//! `PCU` (opcode -> control lines) and `ALUControl` (funct + ALUOp -> ALU
//! operation). Both are pure combinational lookups, so their `update()`
//! just recomputes every output from the current instruction fields.
use crate::component::Component;
use crate::wire::Wire;

/// 4-bit ALU operation codes `ALUControl` produces and `Alu` consumes.
pub mod alu_op {
    pub const ADD: u32 = 0b0010;
    pub const SUB: u32 = 0b0110;
    pub const AND: u32 = 0b0000;
    pub const OR: u32 = 0b0001;
    pub const XOR: u32 = 0b0011;
    pub const NOR: u32 = 0b1100;
    pub const SLT: u32 = 0b0111;
    pub const SLTU: u32 = 0b1101;
    pub const SLL: u32 = 0b1000;
    pub const SRL: u32 = 0b1001;
    pub const SRA: u32 = 0b1010;
}

/// Main control unit. Decodes `opcode` into the datapath's IF/ID/EX/MEM/WB
/// steering signals. `alu_op` is a
/// coarse 2-bit hint (`00` = memory add, `01` = branch subtract, `10` =
/// defer to `funct` via `ALUControl`, `11` = immediate arithmetic decoded
/// directly from `opcode`) rather than the final 4-bit ALU operation.
pub struct Pcu {
    pub opcode: Wire<6>,
    pub funct: Wire<6>,

    /// `0` = `rt`, `1` = `rd`, `2` = `$ra` (the `jal` case), feeds a `Mux3`.
    pub reg_dst: Wire<2>,
    /// Selects the ALU's first operand: `0` = `rs`'s read value, `1` =
    /// `rt`'s read value. Only the shift-by-constant class (`sll`/`srl`/
    /// `sra`) needs `rt`, since those pack `rs = 0` and shift `rt` instead.
    pub alu_a_src: Wire<1>,
    /// Selects the ALU's second operand: `0` = `rt`'s read value, `1` =
    /// the sign-extended immediate, `2` = the zero-extended `shamt` field
    /// (the shift-by-constant class), feeds a `Mux3`.
    pub alu_b_src: Wire<2>,
    /// `0` = ALU result, `1` = memory read data, `2` = `pc+4` (the `jal`
    /// case), feeds a `Mux3`.
    pub mem_to_reg: Wire<2>,
    pub reg_write: Wire<1>,
    pub mem_read: Wire<1>,
    pub mem_write: Wire<1>,
    pub branch_eq: Wire<1>,
    pub branch_ne: Wire<1>,
    pub alu_op: Wire<2>,
    pub jump: Wire<1>,
    /// Set for `jr`/`jalr`: the next PC comes straight from `rs`'s read
    /// port rather than the branch/jump-immediate paths.
    pub jump_register: Wire<1>,
}

impl Pcu {
    pub fn new(opcode: Wire<6>, funct: Wire<6>) -> Self {
        Pcu {
            opcode,
            funct,
            reg_dst: Wire::new(0),
            alu_a_src: Wire::new(0),
            alu_b_src: Wire::new(0),
            mem_to_reg: Wire::new(0),
            reg_write: Wire::new(0),
            mem_read: Wire::new(0),
            mem_write: Wire::new(0),
            branch_eq: Wire::new(0),
            branch_ne: Wire::new(0),
            alu_op: Wire::new(0),
            jump: Wire::new(0),
            jump_register: Wire::new(0),
        }
    }
}

impl Component for Pcu {
    fn update(&mut self) -> bool {
        let (reg_dst, alu_a_src, alu_b_src, mem_to_reg, reg_write, mem_read, mem_write, branch_eq, branch_ne, alu_op, jump, jump_register) =
            match (self.opcode.get(), self.funct.get()) {
                (0x00, 0x08) => (0, 0, 0, 0, 0, 0, 0, 0, 0, 0b10, 0, 1), // jr: no write, pc <- rs
                (0x00, 0x09) => (1, 0, 0, 2, 1, 0, 0, 0, 0, 0b10, 0, 1), // jalr: rd <- pc+4, pc <- rs
                (0x00, 0x00 | 0x02 | 0x03) => (1, 1, 2, 0, 1, 0, 0, 0, 0, 0b10, 0, 0), // sll/srl/sra: shift rt by shamt
                (0x00, _) => (1, 0, 0, 0, 1, 0, 0, 0, 0, 0b10, 0, 0), // other R-type (incl. sllv/srlv/srav)
                (0x23, _) => (0, 0, 1, 1, 1, 1, 0, 0, 0, 0b00, 0, 0), // lw
                (0x2B, _) => (0, 0, 1, 0, 0, 0, 1, 0, 0, 0b00, 0, 0), // sw
                (0x04, _) => (0, 0, 0, 0, 0, 0, 0, 1, 0, 0b01, 0, 0), // beq
                (0x05, _) => (0, 0, 0, 0, 0, 0, 0, 0, 1, 0b01, 0, 0), // bne
                (0x08 | 0x09 | 0x0A | 0x0B | 0x0C | 0x0D | 0x0E | 0x0F, _) => {
                    (0, 0, 1, 0, 1, 0, 0, 0, 0, 0b11, 0, 0) // addi/addiu/slti/sltiu/andi/ori/xori/lui
                }
                (0x02, _) => (0, 0, 0, 0, 0, 0, 0, 0, 0, 0b00, 1, 0), // j
                (0x03, _) => (2, 0, 0, 2, 1, 0, 0, 0, 0, 0b00, 1, 0), // jal: rd=$ra, wb=pc+4
                _ => (0, 0, 0, 0, 0, 0, 0, 0, 0, 0b00, 0, 0),
            };

        let mut changed = false;
        macro_rules! apply {
            ($field:expr, $value:expr) => {
                let before = $field.get();
                $field.set($value);
                changed |= $field.get() != before;
            };
        }
        apply!(self.reg_dst, reg_dst);
        apply!(self.alu_a_src, alu_a_src);
        apply!(self.alu_b_src, alu_b_src);
        apply!(self.mem_to_reg, mem_to_reg);
        apply!(self.reg_write, reg_write);
        apply!(self.mem_read, mem_read);
        apply!(self.mem_write, mem_write);
        apply!(self.branch_eq, branch_eq);
        apply!(self.branch_ne, branch_ne);
        apply!(self.alu_op, alu_op);
        apply!(self.jump, jump);
        apply!(self.jump_register, jump_register);
        changed
    }
}

/// Resolves the 4-bit ALU operation from the coarse `alu_op` hint, the
/// R-type `funct` field, and (for immediate instructions, where `alu_op`
/// is `0b11`) the opcode itself.
pub struct AluControl {
    pub alu_op: Wire<2>,
    pub funct: Wire<6>,
    pub opcode: Wire<6>,
    pub out: Wire<4>,
}

impl AluControl {
    pub fn new(alu_op: Wire<2>, funct: Wire<6>, opcode: Wire<6>) -> Self {
        AluControl {
            alu_op,
            funct,
            opcode,
            out: Wire::new(alu_op::ADD),
        }
    }
}

impl Component for AluControl {
    fn update(&mut self) -> bool {
        let next = match self.alu_op.get() {
            0b00 => alu_op::ADD,
            0b01 => alu_op::SUB,
            0b10 => match self.funct.get() {
                0x20 | 0x21 => alu_op::ADD,
                0x22 | 0x23 => alu_op::SUB,
                0x24 => alu_op::AND,
                0x25 => alu_op::OR,
                0x26 => alu_op::XOR,
                0x27 => alu_op::NOR,
                0x2A => alu_op::SLT,
                0x2B => alu_op::SLTU,
                0x00 | 0x04 => alu_op::SLL,
                0x02 | 0x06 => alu_op::SRL,
                0x03 | 0x07 => alu_op::SRA,
                _ => alu_op::ADD,
            },
            // immediate arithmetic: opcode itself picks the operation.
            _ => match self.opcode.get() {
                0x0C => alu_op::AND,  // andi
                0x0D => alu_op::OR,   // ori
                0x0E => alu_op::XOR,  // xori
                0x0A => alu_op::SLT,  // slti
                0x0B => alu_op::SLTU, // sltiu
                _ => alu_op::ADD,     // addi/addiu/lui
            },
        };
        let before = self.out.get();
        self.out.set(next);
        self.out.get() != before
    }
}
