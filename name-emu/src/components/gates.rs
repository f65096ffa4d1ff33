//! Generic combinational primitives: `MUX<W>`, `Adder<W>`,
//! `AndGate/OrGate/NotGate<W>`, `ZeroExtender<Win,Wout>`, `ShiftLeft<W,k>`.
//! Each caches the output value it last wrote so `update()` can report
//! whether this tick's recomputation actually changed anything.
use crate::component::Component;
use crate::wire::Wire;

/// Two-input multiplexer: `out = if sel == 0 { a } else { b }`.
pub struct Mux2<const W: u32> {
    pub sel: Wire<1>,
    pub a: Wire<W>,
    pub b: Wire<W>,
    pub out: Wire<W>,
}

impl<const W: u32> Component for Mux2<W> {
    fn update(&mut self) -> bool {
        let next = if self.sel.get() == 0 { self.a.get() } else { self.b.get() };
        write_if_changed(&self.out, next)
    }
}

/// Three-input multiplexer, selected by a 2-bit line. Used where a 2-input
/// `Mux2` isn't enough -- e.g. `jal`'s write-register (`rt`/`rd`/`$ra`) and
/// write-back data (`alu result`/`memory`/`pc+4`) selection.
pub struct Mux3<const W: u32> {
    pub sel: Wire<2>,
    pub a: Wire<W>,
    pub b: Wire<W>,
    pub c: Wire<W>,
    pub out: Wire<W>,
}

impl<const W: u32> Component for Mux3<W> {
    fn update(&mut self) -> bool {
        let next = match self.sel.get() {
            0 => self.a.get(),
            1 => self.b.get(),
            _ => self.c.get(),
        };
        write_if_changed(&self.out, next)
    }
}

/// Binary adder: `out = a + b`, wrapping on overflow (matches `Wire`'s own
/// masking rather than panicking).
pub struct Adder<const W: u32> {
    pub a: Wire<W>,
    pub b: Wire<W>,
    pub out: Wire<W>,
}

impl<const W: u32> Component for Adder<W> {
    fn update(&mut self) -> bool {
        let next = self.a.get().wrapping_add(self.b.get());
        write_if_changed(&self.out, next)
    }
}

pub struct AndGate<const W: u32> {
    pub a: Wire<W>,
    pub b: Wire<W>,
    pub out: Wire<W>,
}

impl<const W: u32> Component for AndGate<W> {
    fn update(&mut self) -> bool {
        write_if_changed(&self.out, self.a.get() & self.b.get())
    }
}

pub struct OrGate<const W: u32> {
    pub a: Wire<W>,
    pub b: Wire<W>,
    pub out: Wire<W>,
}

impl<const W: u32> Component for OrGate<W> {
    fn update(&mut self) -> bool {
        write_if_changed(&self.out, self.a.get() | self.b.get())
    }
}

pub struct NotGate<const W: u32> {
    pub a: Wire<W>,
    pub out: Wire<W>,
}

impl<const W: u32> Component for NotGate<W> {
    fn update(&mut self) -> bool {
        write_if_changed(&self.out, !self.a.get())
    }
}

/// Widens a `Win`-bit value into a `Wout`-bit wire with zero-extension.
/// Since every `Wire` already masks to its own width on write, this is a
/// pass-through: the interesting behavior is that `Wout`'s extra high bits
/// are zero rather than sign-copied, which is what distinguishes this from
/// `SignExtender`.
pub struct ZeroExtender<const WIN: u32, const WOUT: u32> {
    pub input: Wire<WIN>,
    pub out: Wire<WOUT>,
}

impl<const WIN: u32, const WOUT: u32> Component for ZeroExtender<WIN, WOUT> {
    fn update(&mut self) -> bool {
        write_if_changed(&self.out, self.input.get())
    }
}

/// Sign-extends a `Win`-bit two's-complement value into a `Wout`-bit wire.
/// Used for the branch/immediate path.
pub struct SignExtender<const WIN: u32, const WOUT: u32> {
    pub input: Wire<WIN>,
    pub out: Wire<WOUT>,
}

impl<const WIN: u32, const WOUT: u32> Component for SignExtender<WIN, WOUT> {
    fn update(&mut self) -> bool {
        let v = self.input.get();
        let sign_bit = 1u32 << (WIN - 1);
        let extended = if v & sign_bit != 0 {
            v | !((sign_bit << 1) - 1)
        } else {
            v
        };
        write_if_changed(&self.out, extended)
    }
}

/// Logical left shift by a fixed constant `K`, used for `imm << 2` on the
/// branch-target path.
pub struct ShiftLeft<const W: u32, const K: u32> {
    pub input: Wire<W>,
    pub out: Wire<W>,
}

impl<const W: u32, const K: u32> Component for ShiftLeft<W, K> {
    fn update(&mut self) -> bool {
        write_if_changed(&self.out, self.input.get() << K)
    }
}

fn write_if_changed<const W: u32>(wire: &Wire<W>, next: u32) -> bool {
    let before = wire.get();
    wire.set(next);
    wire.get() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mux_selects_b_when_sel_set() {
        let mut mux = Mux2::<32> {
            sel: Wire::new(1),
            a: Wire::new(10),
            b: Wire::new(20),
            out: Wire::new(0),
        };
        mux.update();
        assert_eq!(mux.out.get(), 20);
    }

    #[test]
    fn adder_wraps_on_overflow() {
        let mut adder = Adder::<32> {
            a: Wire::new(u32::MAX),
            b: Wire::new(1),
            out: Wire::new(0),
        };
        adder.update();
        assert_eq!(adder.out.get(), 0);
    }

    #[test]
    fn sign_extender_propagates_negative_immediate() {
        let mut ext = SignExtender::<16, 32> {
            input: Wire::new(0xFFFF),
            out: Wire::new(0),
        };
        ext.update();
        assert_eq!(ext.out.get(), 0xFFFF_FFFF);
    }

    #[test]
    fn sign_extender_leaves_positive_immediate_alone() {
        let mut ext = SignExtender::<16, 32> {
            input: Wire::new(0x1234),
            out: Wire::new(0),
        };
        ext.update();
        assert_eq!(ext.out.get(), 0x1234);
    }

    #[test]
    fn shift_left_by_two_for_branch_scaling() {
        let mut shift = ShiftLeft::<32, 2> {
            input: Wire::new(0b101),
            out: Wire::new(0),
        };
        shift.update();
        assert_eq!(shift.out.get(), 0b10100);
    }
}
