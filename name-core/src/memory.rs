/// The byte-addressable memory image. Both the assembler (writer during
/// assembly) and the datapath (reader/writer during simulation) share this
/// type, but never concurrently -- one owns it at a time.
///
/// Absolute addresses are translated into an offset within one of three
/// growable segments rather than indexing one giant flat buffer: `.text`
/// starts at `MIPS_TEXT_START_ADDR`, `.data` at `MIPS_DATA_START_ADDR`, and
/// everything below `.text` (address 0 and up -- where small test programs
/// and ad hoc stack/heap-style addresses land) is a third "low" segment
/// based at 0. Without this translation a `Memory` sized for a modest
/// program would need to pre-allocate out past `MIPS_DATA_START_ADDR`
/// (268 MB) just to hold a handful of `.data` bytes.
use crate::constants::{MIPS_DATA_START_ADDR, MIPS_TEXT_START_ADDR};
use crate::error::ErrorKind;

type Listener = Box<dyn FnMut(u32, &[u8]) + Send>;

/// One segment of the address space: a base address and a lazily-growing
/// buffer capped at `cap` bytes. The buffer only grows as far as the
/// highest address actually written, so a short program doesn't pay for
/// the distance between 0 and its segment's base.
struct Segment {
    base: u32,
    cap: usize,
    bytes: Vec<u8>,
}

impl Segment {
    fn new(base: u32, cap: usize) -> Self {
        Segment {
            base,
            cap,
            bytes: Vec::new(),
        }
    }

    /// `address`'s offset within this segment, or `None` if it falls below
    /// the segment's base (the caller picked the wrong segment).
    fn offset(&self, address: u32) -> Option<usize> {
        address.checked_sub(self.base).map(|o| o as usize)
    }

    fn read_byte(&self, offset: usize) -> Result<u8, ErrorKind> {
        if offset >= self.cap {
            return Err(ErrorKind::MemoryAccess(format!(
                "read out of bounds at segment offset 0x{offset:x} (segment base 0x{:x}, size {})",
                self.base, self.cap
            )));
        }
        Ok(self.bytes.get(offset).copied().unwrap_or(0))
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), ErrorKind> {
        let end = offset
            .checked_add(data.len())
            .ok_or_else(|| ErrorKind::MemoryAccess(format!("offset overflow at 0x{offset:x}")))?;

        if end > self.cap {
            return Err(ErrorKind::MemoryAccess(format!(
                "write of {} byte(s) at segment offset 0x{offset:x} exceeds segment of size {} (base 0x{:x})",
                data.len(),
                self.cap,
                self.base
            )));
        }

        if end > self.bytes.len() {
            self.bytes.resize(end, 0);
        }
        self.bytes[offset..end].copy_from_slice(data);
        Ok(())
    }

    fn clear(&mut self) {
        self.bytes.clear();
    }
}

pub struct Memory {
    text: Segment,
    data: Segment,
    low: Segment,
    listeners: Vec<(u32, Listener)>,
}

impl Memory {
    /// `size` bounds how far each of the three segments may grow past its
    /// own base, independently -- it is not a single flat address-space
    /// size the way it would be without segment translation.
    pub fn new(size: usize) -> Self {
        Memory {
            text: Segment::new(MIPS_TEXT_START_ADDR, size),
            data: Segment::new(MIPS_DATA_START_ADDR, size),
            low: Segment::new(0, size),
            listeners: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.low.cap
    }

    fn segment(&self, address: u32) -> &Segment {
        if address >= self.data.base {
            &self.data
        } else if address >= self.text.base {
            &self.text
        } else {
            &self.low
        }
    }

    fn segment_mut(&mut self, address: u32) -> &mut Segment {
        if address >= self.data.base {
            &mut self.data
        } else if address >= self.text.base {
            &mut self.text
        } else {
            &mut self.low
        }
    }

    /// Writes `data` starting at `address`, then fires any listener
    /// registered at exactly `address` with the written slice.
    pub fn write(&mut self, address: u32, data: &[u8]) -> Result<(), ErrorKind> {
        let segment = self.segment_mut(address);
        let offset = segment
            .offset(address)
            .expect("segment() always picks a segment whose base is <= address");
        segment.write(offset, data)?;

        for (listen_addr, callback) in self.listeners.iter_mut() {
            if *listen_addr == address {
                callback(address, data);
            }
        }

        Ok(())
    }

    pub fn read_byte(&self, address: u32) -> Result<u8, ErrorKind> {
        let segment = self.segment(address);
        let offset = segment
            .offset(address)
            .expect("segment() always picks a segment whose base is <= address");
        segment.read_byte(offset)
    }

    /// Big-endian interpretation of the four consecutive bytes starting at
    /// `address`.
    pub fn read_word(&self, address: u32) -> Result<u32, ErrorKind> {
        let mut buf = [0u8; 4];
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.read_byte(address + i as u32)?;
        }
        Ok(u32::from_be_bytes(buf))
    }

    /// Registers `callback` to fire on every `write()` that starts exactly
    /// at `address`.
    pub fn add_listener<F>(&mut self, address: u32, callback: F)
    where
        F: FnMut(u32, &[u8]) + Send + 'static,
    {
        self.listeners.push((address, Box::new(callback)));
    }

    /// Zeroes all bytes and drops all listeners.
    pub fn clear(&mut self) {
        self.text.clear();
        self.data.clear();
        self.low.clear();
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn write_then_read_word_is_big_endian() {
        let mut mem = Memory::new(16);
        mem.write(0, &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        assert_eq!(mem.read_word(0).unwrap(), 0xDEADBEEF);
    }

    #[test]
    fn out_of_bounds_write_errors() {
        let mut mem = Memory::new(4);
        assert!(mem.write(2, &[1, 2, 3]).is_err());
    }

    #[test]
    fn listener_fires_only_on_exact_start_address() {
        let mut mem = Memory::new(16);
        let hits = std::sync::Arc::new(std::sync::Mutex::new(0u32));
        let hits_clone = hits.clone();
        mem.add_listener(4, move |_addr, _data| {
            *hits_clone.lock().unwrap() += 1;
        });

        mem.write(0, &[1, 2, 3, 4]).unwrap();
        assert_eq!(*hits.lock().unwrap(), 0);

        mem.write(4, &[9]).unwrap();
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn clear_zeroes_and_drops_listeners() {
        let mut mem = Memory::new(4);
        mem.write(0, &[1, 2, 3, 4]).unwrap();
        mem.clear();
        assert_eq!(mem.read_word(0).unwrap(), 0);
    }

    #[test]
    fn text_and_data_segments_coexist_with_a_small_cap_each() {
        // A modest per-segment cap must not force the buffer out to cover
        // the distance between the two realistic MIPS segment bases.
        let mut mem = Memory::new(1 << 12);
        mem.write(MIPS_TEXT_START_ADDR, &[0x01, 0x02, 0x03, 0x04]).unwrap();
        mem.write(MIPS_DATA_START_ADDR, &[0xAA, 0xBB, 0xCC, 0xDD]).unwrap();
        assert_eq!(mem.read_word(MIPS_TEXT_START_ADDR).unwrap(), 0x0102_0304);
        assert_eq!(mem.read_word(MIPS_DATA_START_ADDR).unwrap(), 0xAABB_CCDD);
    }

    #[test]
    fn unwritten_bytes_within_a_segment_read_as_zero() {
        let mut mem = Memory::new(1 << 12);
        mem.write(MIPS_TEXT_START_ADDR, &[0xFF]).unwrap();
        assert_eq!(mem.read_byte(MIPS_TEXT_START_ADDR + 8).unwrap(), 0);
    }

    #[test]
    fn write_past_a_segments_cap_is_out_of_bounds() {
        let mut mem = Memory::new(8);
        assert!(mem.write(MIPS_TEXT_START_ADDR + 8, &[1]).is_err());
    }

    #[test]
    fn low_segment_covers_ad_hoc_addresses_below_text_base() {
        // Exercised by the datapath's `sw $t0, 0($zero)` style tests, which
        // address memory directly rather than through a segment base.
        let mut mem = Memory::new(1 << 12);
        mem.write(0, &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        assert_eq!(mem.read_word(0).unwrap(), 0xDEAD_BEEF);
    }
}
