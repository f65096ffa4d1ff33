use std::fs;
use std::process::ExitCode;

use clap::Parser;
use name_core::memory::Memory;

use name_as::args::Cli;
use name_as::assemble;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.source) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("name-as: couldn't read {}: {e}", cli.source.display());
            return ExitCode::FAILURE;
        }
    };

    let mut memory = Memory::new(cli.memory_size);
    match assemble(&source, cli.base_address, &mut memory) {
        Ok(entry) => {
            println!("assembled {} ({} byte(s) of memory); entry point 0x{entry:08x}", cli.source.display(), cli.memory_size);
            if let Some(output) = &cli.output {
                let bytes: Vec<u8> = (0..cli.memory_size as u32)
                    .map(|addr| memory.read_byte(addr).unwrap())
                    .collect();
                if let Err(e) = fs::write(output, bytes) {
                    eprintln!("name-as: couldn't write {}: {e}", output.display());
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("name-as: {e}");
            ExitCode::FAILURE
        }
    }
}
