use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "name-as", about = "Two-pass assembler for the MIPS-I core integer ISA")]
pub struct Cli {
    /// Assembly source file to assemble.
    pub source: PathBuf,

    /// Address the encoded `.text` segment is written at.
    #[arg(long, default_value_t = name_core::constants::MIPS_TEXT_START_ADDR)]
    pub base_address: u32,

    /// Size in bytes of the memory image to assemble into.
    #[arg(long, default_value_t = 1 << 24)]
    pub memory_size: usize,

    /// Write the assembled image's raw bytes to this file instead of just
    /// reporting success.
    #[arg(long)]
    pub output: Option<PathBuf>,
}
