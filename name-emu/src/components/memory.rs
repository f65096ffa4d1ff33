//! `InstructionMemory` and `MemoryFile`: the two datapath components that
//! front the shared `name_core::Memory` image. Both take an
//! `Rc<RefCell<Memory>>` rather than owning it, since the assembler wrote
//! into the same buffer before simulation started: only one of
//! assembler/datapath touches memory at a time, but both need a reference
//! to the same instance.
use std::cell::RefCell;
use std::rc::Rc;

use name_core::error::ErrorKind;
use name_core::memory::Memory;

use crate::component::Component;
use crate::wire::Wire;

/// IF-stage instruction fetch: combinational read of the word at `pc`.
pub struct InstructionMemory {
    memory: Rc<RefCell<Memory>>,
    pub pc: Wire<32>,
    pub instruction: Wire<32>,
    fault: Option<ErrorKind>,
}

impl InstructionMemory {
    pub fn new(memory: Rc<RefCell<Memory>>, pc: Wire<32>) -> Self {
        InstructionMemory {
            memory,
            pc,
            instruction: Wire::new(0),
            fault: None,
        }
    }

    pub fn take_fault(&mut self) -> Option<ErrorKind> {
        self.fault.take()
    }
}

impl Component for InstructionMemory {
    fn update(&mut self) -> bool {
        match self.memory.borrow().read_word(self.pc.get()) {
            Ok(word) => {
                let before = self.instruction.get();
                self.instruction.set(word);
                self.instruction.get() != before
            }
            Err(e) => {
                self.fault = Some(e);
                false
            }
        }
    }
}

/// MEM-stage data memory: reads when `mem_read` is asserted, writes the
/// 32-bit word at `address` when `mem_write` is asserted. The write
/// itself happens in `latch()` so it lands at the tick boundary like the
/// register file's write port, not mid-fixpoint.
pub struct MemoryFile {
    memory: Rc<RefCell<Memory>>,
    pub address: Wire<32>,
    pub write_data: Wire<32>,
    pub mem_read: Wire<1>,
    pub mem_write: Wire<1>,
    pub read_data: Wire<32>,
    fault: Option<ErrorKind>,
}

impl MemoryFile {
    pub fn new(memory: Rc<RefCell<Memory>>) -> Self {
        MemoryFile {
            memory,
            address: Wire::new(0),
            write_data: Wire::new(0),
            mem_read: Wire::new(0),
            mem_write: Wire::new(0),
            read_data: Wire::new(0),
            fault: None,
        }
    }

    pub fn take_fault(&mut self) -> Option<ErrorKind> {
        self.fault.take()
    }
}

impl Component for MemoryFile {
    fn update(&mut self) -> bool {
        if self.mem_read.get() != 1 {
            return false;
        }
        match self.memory.borrow().read_word(self.address.get()) {
            Ok(word) => {
                let before = self.read_data.get();
                self.read_data.set(word);
                self.read_data.get() != before
            }
            Err(e) => {
                self.fault = Some(e);
                false
            }
        }
    }

    fn latch(&mut self) {
        if self.mem_write.get() == 1 {
            let bytes = self.write_data.get().to_be_bytes();
            if let Err(e) = self.memory.borrow_mut().write(self.address.get(), &bytes) {
                self.fault = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_memory_fetches_word_at_pc() {
        let mut mem = Memory::new(16);
        mem.write(0, &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        let memory = Rc::new(RefCell::new(mem));
        let mut im = InstructionMemory::new(memory, Wire::new(0));
        im.update();
        assert_eq!(im.instruction.get(), 0xDEAD_BEEF);
    }

    #[test]
    fn memory_file_write_lands_only_after_latch() {
        let memory = Rc::new(RefCell::new(Memory::new(16)));
        let mut mf = MemoryFile::new(memory.clone());
        mf.address.set(0);
        mf.write_data.set(0x0102_0304);
        mf.mem_write.set(1);
        assert_eq!(memory.borrow().read_word(0).unwrap(), 0);
        mf.latch();
        assert_eq!(memory.borrow().read_word(0).unwrap(), 0x0102_0304);
    }

    #[test]
    fn out_of_bounds_fetch_surfaces_as_fault() {
        let memory = Rc::new(RefCell::new(Memory::new(4)));
        let mut im = InstructionMemory::new(memory, Wire::new(0x1000));
        im.update();
        assert!(im.take_fault().is_some());
    }
}
