//! The single-cycle MIPS datapath simulator: a wired graph of fixed-width
//! components driven to a combinational fixpoint on every clock tick,
//! with one sequential component (the PC register). Reads and writes the
//! same `name_core::Memory` image `name-as` loaded.

pub mod args;
pub mod component;
pub mod components;
pub mod datapath;
pub mod wire;

pub use component::Component;
pub use datapath::Simulator;
