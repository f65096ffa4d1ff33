//! `RegisterFile`: two combinational read ports and one write port gated
//! by `regWrite`. Reads see the register values from *before* this tick's
//! write lands -- the write only takes effect at `latch()`, matching
//! single-cycle MIPS's same-cycle read/write-then-see-next-cycle
//! semantics. `$0` is hard-wired: writes targeting it are silently
//! dropped.
use crate::component::Component;
use crate::wire::Wire;

pub struct RegisterFile {
    regs: [u32; 32],

    pub read_addr_1: Wire<5>,
    pub read_addr_2: Wire<5>,
    pub read_data_1: Wire<32>,
    pub read_data_2: Wire<32>,

    pub write_addr: Wire<5>,
    pub write_data: Wire<32>,
    pub write_enable: Wire<1>,
}

impl RegisterFile {
    pub fn new() -> Self {
        RegisterFile {
            regs: [0; 32],
            read_addr_1: Wire::new(0),
            read_addr_2: Wire::new(0),
            read_data_1: Wire::new(0),
            read_data_2: Wire::new(0),
            write_addr: Wire::new(0),
            write_data: Wire::new(0),
            write_enable: Wire::new(0),
        }
    }

    pub fn read(&self, index: u32) -> u32 {
        self.regs[index as usize]
    }

    /// Bypasses the wiring to set a register directly; used by the
    /// simulator to seed `$sp`/`$gp` before execution starts.
    pub fn write_direct(&mut self, index: u32, value: u32) {
        if index != 0 {
            self.regs[index as usize] = value;
        }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for RegisterFile {
    fn update(&mut self) -> bool {
        let d1 = self.regs[self.read_addr_1.get() as usize];
        let d2 = self.regs[self.read_addr_2.get() as usize];

        let mut changed = false;
        let before1 = self.read_data_1.get();
        self.read_data_1.set(d1);
        changed |= self.read_data_1.get() != before1;

        let before2 = self.read_data_2.get();
        self.read_data_2.set(d2);
        changed |= self.read_data_2.get() != before2;

        changed
    }

    fn latch(&mut self) {
        if self.write_enable.get() == 1 {
            let index = self.write_addr.get() as usize;
            if index != 0 {
                self.regs[index] = self.write_data.get();
            }
        }
    }
}
