pub mod alu;
pub mod control;
pub mod gates;
pub mod memory;
pub mod register;
pub mod register_file;
pub mod splitter;

pub use alu::Alu;
pub use control::{AluControl, Pcu};
pub use gates::{Adder, AndGate, Mux2, Mux3, NotGate, OrGate, ShiftLeft, SignExtender, ZeroExtender};
pub use memory::{InstructionMemory, MemoryFile};
pub use register::Register;
pub use register_file::RegisterFile;
pub use splitter::InstructionSplitter;
