//! The single-cycle MIPS datapath and its simulator: wiring is built
//! explicitly here, once, at graph-build time -- there is no process-wide
//! component registry the way the reference project relies on constructor
//! side effects. The simulator owns every component in
//! `Vec<Box<dyn Component>>`, in registration order, and iterates
//! `update()` to a fixpoint each tick before latching state-holding
//! components.
use std::cell::RefCell;
use std::rc::Rc;

use name_core::error::ErrorKind;
use name_core::memory::Memory;

use crate::component::Component;
use crate::components::{
    Adder, Alu, AluControl, AndGate, InstructionMemory, InstructionSplitter, MemoryFile, Mux2, Mux3, NotGate, OrGate,
    Pcu, Register, RegisterFile, SignExtender, ZeroExtender,
};
use crate::wire::Wire;

/// A non-converging tick is capped here; real single-cycle MIPS hardware
/// settles in a handful of gate delays, so any reasonable iteration count
/// well above the graph's depth is a generous bound.
const MAX_FIXPOINT_ITERATIONS: u32 = 64;

/// Adapts a shared, individually-addressable component (one the simulator
/// also wants to reach into directly, e.g. to inspect the register file
/// or seed the PC) into the flat `Component` list the tick loop drives.
struct Shared<C>(Rc<RefCell<C>>);

impl<C: Component> Component for Shared<C> {
    fn update(&mut self) -> bool {
        self.0.borrow_mut().update()
    }

    fn latch(&mut self) {
        self.0.borrow_mut().latch();
    }
}

pub struct Simulator {
    components: Vec<Box<dyn Component>>,
    memory: Rc<RefCell<Memory>>,
    pc: Rc<RefCell<Register<32>>>,
    register_file: Rc<RefCell<RegisterFile>>,
    instruction_memory: Rc<RefCell<InstructionMemory>>,
    memory_file: Rc<RefCell<MemoryFile>>,
}

impl Simulator {
    /// Builds the datapath graph around `memory` (already loaded by the
    /// assembler) and seeds the PC at `entry_point`.
    pub fn new(memory: Rc<RefCell<Memory>>, entry_point: u32) -> Self {
        let mut components: Vec<Box<dyn Component>> = Vec::new();

        // --- IF ---
        let pc = Rc::new(RefCell::new(Register::<32>::new(entry_point)));
        let pc_q = pc.borrow().q.clone();
        components.push(Box::new(Shared(pc.clone())));

        let instruction_memory = Rc::new(RefCell::new(InstructionMemory::new(memory.clone(), pc_q.clone())));
        let instruction_wire = instruction_memory.borrow().instruction.clone();
        components.push(Box::new(Shared(instruction_memory.clone())));

        let pc_plus4 = Adder::<32> {
            a: pc_q,
            b: Wire::new(4),
            out: Wire::new(0),
        };
        let pc_plus4_out = pc_plus4.out.clone();
        components.push(Box::new(pc_plus4));

        // --- ID: split + register reads + control ---
        let splitter = InstructionSplitter::new(instruction_wire);
        let (opcode, rs, rt, rd, shamt, funct, imm, addr) = (
            splitter.opcode.clone(),
            splitter.rs.clone(),
            splitter.rt.clone(),
            splitter.rd.clone(),
            splitter.shamt.clone(),
            splitter.funct.clone(),
            splitter.imm.clone(),
            splitter.addr.clone(),
        );
        components.push(Box::new(splitter));

        let pcu = Pcu::new(opcode.clone(), funct.clone());
        let (
            reg_dst,
            alu_a_src,
            alu_b_src,
            mem_to_reg,
            reg_write,
            mem_read,
            mem_write,
            branch_eq,
            branch_ne,
            pcu_alu_op,
            jump,
            jump_register,
        ) = (
            pcu.reg_dst.clone(),
            pcu.alu_a_src.clone(),
            pcu.alu_b_src.clone(),
            pcu.mem_to_reg.clone(),
            pcu.reg_write.clone(),
            pcu.mem_read.clone(),
            pcu.mem_write.clone(),
            pcu.branch_eq.clone(),
            pcu.branch_ne.clone(),
            pcu.alu_op.clone(),
            pcu.jump.clone(),
            pcu.jump_register.clone(),
        );
        components.push(Box::new(pcu));

        let register_file = Rc::new(RefCell::new(RegisterFile::new()));
        {
            let mut rf = register_file.borrow_mut();
            rf.read_addr_1 = rs.clone();
            rf.read_addr_2 = rt.clone();
        }
        let (read_data_1, read_data_2) = {
            let rf = register_file.borrow();
            (rf.read_data_1.clone(), rf.read_data_2.clone())
        };
        components.push(Box::new(Shared(register_file.clone())));

        let sign_ext = SignExtender::<16, 32> {
            input: imm.clone(),
            out: Wire::new(0),
        };
        let sign_ext_imm = sign_ext.out.clone();
        components.push(Box::new(sign_ext));

        let shamt_ext = ZeroExtender::<5, 32> {
            input: shamt,
            out: Wire::new(0),
        };
        let shamt_ext_out = shamt_ext.out.clone();
        components.push(Box::new(shamt_ext));

        // --- EX ---
        let alu_control = AluControl::new(pcu_alu_op, funct, opcode);
        let alu_operation = alu_control.out.clone();
        components.push(Box::new(alu_control));

        // `sll`/`srl`/`sra` pack `rs = 0`, so the ALU's first operand has
        // to come from `rt` instead for that class.
        let alu_a_mux = Mux2::<32> {
            sel: alu_a_src,
            a: read_data_1.clone(),
            b: read_data_2.clone(),
            out: Wire::new(0),
        };
        let alu_a = alu_a_mux.out.clone();
        components.push(Box::new(alu_a_mux));

        let alu_b_mux = Mux3::<32> {
            sel: alu_b_src,
            a: read_data_2.clone(),
            b: sign_ext_imm.clone(),
            c: shamt_ext_out,
            out: Wire::new(0),
        };
        let alu_b = alu_b_mux.out.clone();
        components.push(Box::new(alu_b_mux));

        let alu = Alu::new(alu_a, alu_b, alu_operation);
        let (alu_result, alu_zero) = (alu.result.clone(), alu.zero.clone());
        components.push(Box::new(alu));

        let write_register_mux = Mux3::<5> {
            sel: reg_dst,
            a: rt,
            b: rd,
            c: Wire::new(31),
            out: Wire::new(0),
        };
        let write_register = write_register_mux.out.clone();
        components.push(Box::new(write_register_mux));

        // --- MEM ---
        let memory_file = Rc::new(RefCell::new(MemoryFile::new(memory.clone())));
        {
            let mut mf = memory_file.borrow_mut();
            mf.address = alu_result.clone();
            mf.write_data = read_data_2;
            mf.mem_read = mem_read;
            mf.mem_write = mem_write;
        }
        let mem_read_data = memory_file.borrow().read_data.clone();
        components.push(Box::new(Shared(memory_file.clone())));

        // --- branch target computation ---
        // This dialect's resolver bakes the *absolute* destination address
        // into the 16-bit immediate rather than a PC-relative word count
        // (`loop:` at address 0 encodes as `imm=0`), so a taken branch
        // jumps straight to this field's low 16 bits -- no
        // `pc+4 + (imm << 2)` the way standard MIPS does it. The high 16
        // bits don't fit in the field, so they're reconstructed from the
        // current `pc+4` the same way the jump decode below reconstructs
        // its missing high 6 bits.
        let branch_target_extender = ZeroExtender::<16, 32> {
            input: imm,
            out: Wire::new(0),
        };
        let branch_target_low = branch_target_extender.out.clone();
        components.push(Box::new(branch_target_extender));

        let branch_pc_high_bits = AndGate::<32> {
            a: pc_plus4_out.clone(),
            b: Wire::new(0xFFFF_0000),
            out: Wire::new(0),
        };
        let branch_pc_high_bits_out = branch_pc_high_bits.out.clone();
        components.push(Box::new(branch_pc_high_bits));

        let branch_target_gate = OrGate::<32> {
            a: branch_pc_high_bits_out,
            b: branch_target_low,
            out: Wire::new(0),
        };
        let branch_target = branch_target_gate.out.clone();
        components.push(Box::new(branch_target_gate));

        let eq_and = AndGate::<1> {
            a: branch_eq,
            b: alu_zero.clone(),
            out: Wire::new(0),
        };
        let eq_taken = eq_and.out.clone();
        components.push(Box::new(eq_and));

        let not_zero = NotGate::<1> {
            a: alu_zero,
            out: Wire::new(0),
        };
        let not_zero_out = not_zero.out.clone();
        components.push(Box::new(not_zero));

        let ne_and = AndGate::<1> {
            a: branch_ne,
            b: not_zero_out,
            out: Wire::new(0),
        };
        let ne_taken = ne_and.out.clone();
        components.push(Box::new(ne_and));

        let branch_taken = OrGate::<1> {
            a: eq_taken,
            b: ne_taken,
            out: Wire::new(0),
        };
        let branch_taken_out = branch_taken.out.clone();
        components.push(Box::new(branch_taken));

        let pc_after_branch = Mux2::<32> {
            sel: branch_taken_out,
            a: pc_plus4_out.clone(),
            b: branch_target,
            out: Wire::new(0),
        };
        let pc_after_branch_out = pc_after_branch.out.clone();
        components.push(Box::new(pc_after_branch));

        // Like the branch path, `j`/`jal`'s 26-bit target field holds the
        // low bits of an absolute address the resolver already computed --
        // not a word-aligned offset -- so there's no `<< 2` here; the high
        // 6 bits come from the current `pc+4` the way the standard MIPS
        // jump decode reconstructs them.
        let addr_extended = ZeroExtender::<26, 32> {
            input: addr,
            out: Wire::new(0),
        };
        let addr_extended_out = addr_extended.out.clone();
        components.push(Box::new(addr_extended));

        let pc_high_bits = AndGate::<32> {
            a: pc_plus4_out.clone(),
            b: Wire::new(0xFC00_0000),
            out: Wire::new(0),
        };
        let pc_high_bits_out = pc_high_bits.out.clone();
        components.push(Box::new(pc_high_bits));

        let jump_target = OrGate::<32> {
            a: pc_high_bits_out,
            b: addr_extended_out,
            out: Wire::new(0),
        };
        let jump_target_out = jump_target.out.clone();
        components.push(Box::new(jump_target));

        let next_pc_mux = Mux2::<32> {
            sel: jump,
            a: pc_after_branch_out,
            b: jump_target_out,
            out: Wire::new(0),
        };
        let next_pc_out = next_pc_mux.out.clone();
        components.push(Box::new(next_pc_mux));

        // `jr`/`jalr` bypass the branch/jump-immediate paths entirely: the
        // next PC is whatever `rs`'s read port holds.
        let jump_register_mux = Mux2::<32> {
            sel: jump_register,
            a: next_pc_out,
            b: read_data_1,
            out: Wire::new(0),
        };
        let next_pc = jump_register_mux.out.clone();
        components.push(Box::new(jump_register_mux));

        // --- WB ---
        let write_back_mux = Mux3::<32> {
            sel: mem_to_reg,
            a: alu_result,
            b: mem_read_data,
            c: pc_plus4_out,
            out: Wire::new(0),
        };
        let write_back_data = write_back_mux.out.clone();
        components.push(Box::new(write_back_mux));

        {
            let mut rf = register_file.borrow_mut();
            rf.write_addr = write_register;
            rf.write_data = write_back_data;
            rf.write_enable = reg_write;
        }

        pc.borrow_mut().d = next_pc;

        Simulator {
            components,
            memory,
            pc,
            register_file,
            instruction_memory,
            memory_file,
        }
    }

    /// Runs one clock edge: iterates `update()` across every component (in
    /// registration order, for deterministic results) until a full pass
    /// changes nothing, then `latch()`es every component.
    /// Returns an error if the combinational layer fails to settle within
    /// the iteration cap, or if a memory access faulted this tick.
    pub fn tick(&mut self) -> Result<(), ErrorKind> {
        let mut iterations = 0;
        loop {
            let mut any_changed = false;
            for component in &mut self.components {
                if component.update() {
                    any_changed = true;
                }
            }
            if !any_changed {
                break;
            }
            iterations += 1;
            if iterations > MAX_FIXPOINT_ITERATIONS {
                return Err(ErrorKind::NonConvergingTick);
            }
        }

        if let Some(fault) = self.instruction_memory.borrow_mut().take_fault() {
            return Err(fault);
        }
        if let Some(fault) = self.memory_file.borrow_mut().take_fault() {
            return Err(fault);
        }

        for component in &mut self.components {
            component.latch();
        }

        Ok(())
    }

    /// Drives ticks until either `max_ticks` is reached or the PC leaves
    /// `text_range` -- this crate has no syscall/exception layer, so
    /// "falling off the end of `.text`" is the halt condition a
    /// freestanding single-cycle simulation actually has. Returns the
    /// number of ticks actually run.
    pub fn run_until_halt(&mut self, text_range: std::ops::Range<u32>, max_ticks: u32) -> Result<u32, ErrorKind> {
        let mut ticks = 0;
        while text_range.contains(&self.pc_value()) && ticks < max_ticks {
            self.tick()?;
            ticks += 1;
        }
        Ok(ticks)
    }

    pub fn pc_value(&self) -> u32 {
        self.pc.borrow().q.get()
    }

    pub fn register(&self, index: u32) -> u32 {
        self.register_file.borrow().read(index)
    }

    pub fn seed_register(&mut self, index: u32, value: u32) {
        self.register_file.borrow_mut().write_direct(index, value);
    }

    pub fn memory(&self) -> Rc<RefCell<Memory>> {
        self.memory.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use name_core::constants::MIPS_TEXT_START_ADDR;
    use pretty_assertions::assert_eq;

    fn simulator_with(words: &[u32]) -> Simulator {
        let memory = Rc::new(RefCell::new(Memory::new(1 << 16)));
        {
            let mut mem = memory.borrow_mut();
            let mut addr = MIPS_TEXT_START_ADDR;
            for word in words {
                mem.write(addr, &word.to_be_bytes()).unwrap();
                addr += 4;
            }
        }
        Simulator::new(memory, MIPS_TEXT_START_ADDR)
    }

    #[test]
    fn addi_writes_register_and_advances_pc() {
        // addi $t0, $zero, 10
        let mut sim = simulator_with(&[0x2008_000A]);
        sim.tick().unwrap();
        assert_eq!(sim.register(8), 10);
        assert_eq!(sim.pc_value(), MIPS_TEXT_START_ADDR + 4);
    }

    #[test]
    fn add_reads_both_source_registers() {
        // add $t2, $t0, $t1 with $t0=3, $t1=4 preloaded
        let mut sim = simulator_with(&[0x0109_5020]);
        sim.seed_register(8, 3);
        sim.seed_register(9, 4);
        sim.tick().unwrap();
        assert_eq!(sim.register(10), 7);
    }

    #[test]
    fn beq_taken_jumps_to_absolute_target() {
        // beq $t0,$t0,0x00400010 (always taken, dialect's absolute-address convention)
        let mut sim = simulator_with(&[0x1108_0010]);
        sim.tick().unwrap();
        assert_eq!(sim.pc_value(), MIPS_TEXT_START_ADDR + 0x10);
    }

    #[test]
    fn sw_then_lw_round_trips_through_memory() {
        // sw $t0, 0($zero); lw $t1, 0($zero)
        let mut sim = simulator_with(&[0xAC08_0000, 0x8C09_0000]);
        sim.seed_register(8, 0xDEAD_BEEF);
        sim.tick().unwrap();
        sim.tick().unwrap();
        assert_eq!(sim.register(9), 0xDEAD_BEEF);
    }

    #[test]
    fn jalr_writes_return_address_and_jr_returns_to_it() {
        // jalr $t1, $t0 (jump to $t0, save pc+4 in $t1); ...; jr $t1
        let mut sim = simulator_with(&[0x0100_4809, 0, 0, 0x0120_0008]);
        sim.seed_register(8, MIPS_TEXT_START_ADDR + 12);
        sim.tick().unwrap();
        assert_eq!(sim.register(9), MIPS_TEXT_START_ADDR + 4);
        assert_eq!(sim.pc_value(), MIPS_TEXT_START_ADDR + 12);
        sim.tick().unwrap();
        assert_eq!(sim.pc_value(), MIPS_TEXT_START_ADDR + 4);
    }

    #[test]
    fn sll_shifts_rt_by_constant_shamt() {
        // sll $t0, $t1, 4
        let mut sim = simulator_with(&[0x0009_4100]);
        sim.seed_register(9, 1);
        sim.tick().unwrap();
        assert_eq!(sim.register(8), 16);
    }

    #[test]
    fn srl_shifts_rt_logically_by_constant_shamt() {
        // srl $t0, $t1, 4
        let mut sim = simulator_with(&[0x0009_4102]);
        sim.seed_register(9, 0x8000_0000);
        sim.tick().unwrap();
        assert_eq!(sim.register(8), 0x0800_0000);
    }

    #[test]
    fn sllv_shifts_rs_by_variable_amount_in_rt() {
        // sllv $t0, $t2, $t1 ($t2 << ($t1 & 0x1F), this dialect's rs/rt convention)
        let mut sim = simulator_with(&[0x0149_4004]);
        sim.seed_register(10, 2); // rs: value to shift
        sim.seed_register(9, 3); // rt: shift amount
        sim.tick().unwrap();
        assert_eq!(sim.register(8), 2 << 3);
    }

    #[test]
    fn run_until_halt_stops_past_text_range() {
        let mut sim = simulator_with(&[0x2008_0001, 0x2008_0002]);
        let start = MIPS_TEXT_START_ADDR;
        let ticks = sim.run_until_halt(start..(start + 8), 10).unwrap();
        assert_eq!(ticks, 2);
        assert_eq!(sim.register(8), 2);
    }
}
