use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "name-emu", about = "Single-cycle MIPS datapath simulator")]
pub struct Cli {
    /// Assembled machine-code image to load before simulating.
    pub image: PathBuf,

    /// Address the image's bytes were assembled to start at.
    #[arg(long, default_value_t = name_core::constants::MIPS_TEXT_START_ADDR)]
    pub base_address: u32,

    /// Size in bytes of the memory image to allocate.
    #[arg(long, default_value_t = 1 << 24)]
    pub memory_size: usize,

    /// Upper bound on clock ticks before giving up (guards against a
    /// program that never leaves its `.text` range).
    #[arg(long, default_value_t = 1_000_000)]
    pub max_ticks: u32,
}
