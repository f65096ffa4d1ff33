//! End-to-end tests exercising `name-as` and `name-emu` together: assemble
//! a small program into a shared `Memory`, then drive the datapath and
//! check register/memory state. Unit tests for each pipeline stage live
//! alongside their code in `name-as`/`name-core`/`name-emu`; this crate
//! only covers behavior that spans the assemble -> simulate boundary.
use std::cell::RefCell;
use std::rc::Rc;

use name_core::constants::{MIPS_DATA_START_ADDR, MIPS_TEXT_START_ADDR};
use name_core::memory::Memory;
use name_emu::Simulator;

fn assemble_and_run(source: &str, ticks: u32) -> (Simulator, Rc<RefCell<Memory>>) {
    let mut memory = Memory::new(1 << 20);
    name_as::assemble(source, MIPS_TEXT_START_ADDR, &mut memory).expect("assembly should succeed");
    let memory = Rc::new(RefCell::new(memory));
    let mut simulator = Simulator::new(memory.clone(), MIPS_TEXT_START_ADDR);
    let end = MIPS_TEXT_START_ADDR + ticks * 4;
    simulator
        .run_until_halt(MIPS_TEXT_START_ADDR..end, ticks)
        .expect("simulation should not fault");
    (simulator, memory)
}

#[test]
fn addi_and_add_chain_computes_expected_sum() {
    let (sim, _mem) = assemble_and_run(
        "addi $t0, $zero, 10\n\
         addi $t1, $zero, 20\n\
         add  $t2, $t0, $t1\n",
        3,
    );
    assert_eq!(sim.register(8), 10);
    assert_eq!(sim.register(9), 20);
    assert_eq!(sim.register(10), 30);
}

#[test]
fn forward_branch_lands_past_expanded_li() {
    // `li` expands to 2 real instructions, so `target` must resolve to
    // text_base + 8 (spec.md §8 scenario 6), and the branch (always taken,
    // comparing $t0 to itself) must actually land there.
    let (sim, _mem) = assemble_and_run(
        "li $t0, 7\n\
         beq $t0, $t0, target\n\
         addi $t1, $zero, 999\n\
         target:\n\
         addi $t2, $zero, 42\n",
        4,
    );
    assert_eq!(sim.register(8), 7);
    assert_eq!(sim.register(9), 0, "the skipped instruction must not execute");
    assert_eq!(sim.register(10), 42);
}

#[test]
fn sw_then_lw_round_trips_through_the_datapath() {
    let (sim, _mem) = assemble_and_run(
        "addi $t0, $zero, 0x55\n\
         sw   $t0, 0($zero)\n\
         lw   $t1, 0($zero)\n",
        3,
    );
    assert_eq!(sim.register(9), 0x55);
}

#[test]
fn asciiz_directive_writes_expected_bytes_to_data_segment() {
    let mut memory = Memory::new(1 << 16);
    name_as::assemble(".data\nmsg: .asciiz \"hi\"\n", MIPS_TEXT_START_ADDR, &mut memory).unwrap();
    assert_eq!(memory.read_byte(MIPS_DATA_START_ADDR).unwrap(), b'h');
    assert_eq!(memory.read_byte(MIPS_DATA_START_ADDR + 1).unwrap(), b'i');
    assert_eq!(memory.read_byte(MIPS_DATA_START_ADDR + 2).unwrap(), 0);
}

#[test]
fn register_alias_and_canonical_form_assemble_identically() {
    let mut by_alias = Memory::new(1 << 16);
    let mut by_number = Memory::new(1 << 16);
    name_as::assemble("add $t2, $t0, $t1\n", MIPS_TEXT_START_ADDR, &mut by_alias).unwrap();
    name_as::assemble("add $10, $8, $9\n", MIPS_TEXT_START_ADDR, &mut by_number).unwrap();
    assert_eq!(
        by_alias.read_word(MIPS_TEXT_START_ADDR).unwrap(),
        by_number.read_word(MIPS_TEXT_START_ADDR).unwrap()
    );
}

#[test]
fn unknown_label_reference_is_rejected_before_simulation() {
    let mut memory = Memory::new(1 << 16);
    let result = name_as::assemble("beq $t0, $zero, nowhere\n", MIPS_TEXT_START_ADDR, &mut memory);
    assert!(result.is_err());
}

#[test]
fn jal_then_jr_returns_to_caller() {
    // jal callee; addi $t5,$zero,1 (skipped on the way in, hit on return);
    // callee: addi $t0,$zero,9; jr $ra
    let (sim, _mem) = assemble_and_run(
        "jal callee\n\
         addi $t5, $zero, 1\n\
         j done\n\
         callee:\n\
         addi $t0, $zero, 9\n\
         jr $ra\n\
         done:\n\
         addi $t6, $zero, 2\n",
        6,
    );
    assert_eq!(sim.register(8), 9, "callee body must run");
    assert_eq!(sim.register(31) & 0xFFFF, (MIPS_TEXT_START_ADDR + 4) & 0xFFFF, "$ra holds the return address");
}
