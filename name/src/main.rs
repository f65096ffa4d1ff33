//! Thin top-level entrypoint: assemble a source file into a shared memory
//! image, then hand that image straight to the datapath simulator. No
//! linker and no multi-file assembly -- both are explicit Non-goals
//! (spec.md §1) -- so `name-as`'s output is simulated directly rather than
//! going through an object-file/link step.
use std::cell::RefCell;
use std::fs;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use name_core::constants::MIPS_TEXT_START_ADDR;
use name_core::memory::Memory;
use name_core::registers::canonical_to_alias;

#[derive(Parser, Debug)]
#[command(name = "name", about = "Assemble and run a MIPS-I assembly source file")]
struct Cli {
    /// Assembly source file to assemble and run.
    source: std::path::PathBuf,

    /// Size in bytes of the memory image to assemble and run against.
    #[arg(long, default_value_t = 1 << 24)]
    memory_size: usize,

    /// Upper bound on clock ticks before giving up.
    #[arg(long, default_value_t = 1_000_000)]
    max_ticks: u32,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.source) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("name: couldn't read {}: {e}", cli.source.display());
            return ExitCode::FAILURE;
        }
    };

    let mut memory = Memory::new(cli.memory_size);
    let entry = match name_as::assemble(&source, MIPS_TEXT_START_ADDR, &mut memory) {
        Ok(entry) => entry,
        Err(e) => {
            eprintln!("name: assembly failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    // `assemble()`'s contract (spec.md §6) only returns the entry point, not
    // the final instruction count, so this over-estimates the halt window
    // generously (worst-case pseudo expansion is 4 real instructions) rather
    // than trying to recover an exact bound.
    let text_len = (source.lines().count() as u32 + 1) * 16;
    let memory = Rc::new(RefCell::new(memory));
    let mut simulator = name_emu::Simulator::new(memory, entry);

    match simulator.run_until_halt(entry..(entry + text_len), cli.max_ticks) {
        Ok(ticks) => {
            println!("ran {ticks} tick(s); halted at pc 0x{:08x}", simulator.pc_value());
            for n in 1..32u32 {
                let value = simulator.register(n);
                if value != 0 {
                    let alias = canonical_to_alias(n).unwrap_or("?");
                    println!("  {alias:<6} (${n:<2}) = 0x{value:08x}");
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("name: simulation failed: {e}");
            ExitCode::FAILURE
        }
    }
}
