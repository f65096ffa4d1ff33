//! `ALU`: 32-bit arithmetic/logic output plus a `zero` flag the
//! `branch AND zero` gate reads off of.
use crate::component::Component;
use crate::components::control::alu_op;
use crate::wire::Wire;

pub struct Alu {
    pub a: Wire<32>,
    pub b: Wire<32>,
    pub operation: Wire<4>,
    pub result: Wire<32>,
    pub zero: Wire<1>,
}

impl Alu {
    pub fn new(a: Wire<32>, b: Wire<32>, operation: Wire<4>) -> Self {
        Alu {
            a,
            b,
            operation,
            result: Wire::new(0),
            zero: Wire::new(0),
        }
    }
}

impl Component for Alu {
    fn update(&mut self) -> bool {
        let a = self.a.get() as i32;
        let b = self.b.get() as i32;
        let next = match self.operation.get() {
            alu_op::ADD => a.wrapping_add(b) as u32,
            alu_op::SUB => a.wrapping_sub(b) as u32,
            alu_op::AND => (self.a.get()) & (self.b.get()),
            alu_op::OR => (self.a.get()) | (self.b.get()),
            alu_op::XOR => (self.a.get()) ^ (self.b.get()),
            alu_op::NOR => !((self.a.get()) | (self.b.get())),
            alu_op::SLT => u32::from(a < b),
            alu_op::SLTU => u32::from(self.a.get() < self.b.get()),
            alu_op::SLL => self.a.get().wrapping_shl(self.b.get() & 0x1F),
            alu_op::SRL => self.a.get().wrapping_shr(self.b.get() & 0x1F),
            alu_op::SRA => a.wrapping_shr(self.b.get() & 0x1F) as u32,
            _ => 0,
        };

        let mut changed = false;
        let before_result = self.result.get();
        self.result.set(next);
        changed |= self.result.get() != before_result;

        let before_zero = self.zero.get();
        self.zero.set(u32::from(self.result.get() == 0));
        changed |= self.zero.get() != before_zero;

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sets_result() {
        let mut alu = Alu::new(Wire::new(2), Wire::new(3), Wire::new(alu_op::ADD));
        alu.update();
        assert_eq!(alu.result.get(), 5);
        assert_eq!(alu.zero.get(), 0);
    }

    #[test]
    fn sub_to_zero_sets_zero_flag() {
        let mut alu = Alu::new(Wire::new(7), Wire::new(7), Wire::new(alu_op::SUB));
        alu.update();
        assert_eq!(alu.result.get(), 0);
        assert_eq!(alu.zero.get(), 1);
    }

    #[test]
    fn slt_compares_as_signed() {
        let mut alu = Alu::new(Wire::new((-1i32) as u32), Wire::new(1), Wire::new(alu_op::SLT));
        alu.update();
        assert_eq!(alu.result.get(), 1);
    }

    #[test]
    fn sltu_compares_as_unsigned() {
        // -1 as u32 is the largest unsigned value, so it is never less than 1.
        let mut alu = Alu::new(Wire::new((-1i32) as u32), Wire::new(1), Wire::new(alu_op::SLTU));
        alu.update();
        assert_eq!(alu.result.get(), 0);
    }

    #[test]
    fn sll_shifts_left_by_shamt() {
        let mut alu = Alu::new(Wire::new(1), Wire::new(4), Wire::new(alu_op::SLL));
        alu.update();
        assert_eq!(alu.result.get(), 16);
    }

    #[test]
    fn srl_shifts_right_logically() {
        let mut alu = Alu::new(Wire::new(0x8000_0000), Wire::new(4), Wire::new(alu_op::SRL));
        alu.update();
        assert_eq!(alu.result.get(), 0x0800_0000);
    }

    #[test]
    fn sra_shifts_right_preserving_sign() {
        let mut alu = Alu::new(Wire::new((-16i32) as u32), Wire::new(2), Wire::new(alu_op::SRA));
        alu.update();
        assert_eq!(alu.result.get(), (-4i32) as u32);
    }
}
