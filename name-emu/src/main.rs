use std::cell::RefCell;
use std::fs;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use name_core::memory::Memory;
use name_core::registers::canonical_to_alias;

use name_emu::args::Cli;
use name_emu::Simulator;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let bytes = match fs::read(&cli.image) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("name-emu: couldn't read {}: {e}", cli.image.display());
            return ExitCode::FAILURE;
        }
    };

    let mut memory = Memory::new(cli.memory_size);
    if let Err(e) = memory.write(cli.base_address, &bytes) {
        eprintln!("name-emu: couldn't load image: {e}");
        return ExitCode::FAILURE;
    }

    let memory = Rc::new(RefCell::new(memory));
    let mut simulator = Simulator::new(memory, cli.base_address);

    let text_range = cli.base_address..(cli.base_address + bytes.len() as u32);
    match simulator.run_until_halt(text_range, cli.max_ticks) {
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
            eprintln!("name-emu: {e}");
            ExitCode::FAILURE
        }
    }
}
