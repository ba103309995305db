use crate::error::{Chip8Error, Result};
use std::io;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents the addressable memory of the machine
pub trait MemoryMap {
    /// write a chunk of bytes into "RAM"
    fn write(&mut self, data: &[u8], addr: u16) -> Result<()> {
        self.get_rw_slice(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// get a big-endian two-byte word (instruction fetch)
    fn get_word(&self, addr: u16) -> Result<u16> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8]>;

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8]>;
}

/// Defines the CHIP-8 standard 4K memory map:
///   0x0000-0x004f  hexadecimal digit sprites, 5 bytes each
///   0x0050-0x01ff  reserved for the interpreter
///   0x0200-0x0fff  program and data
#[derive(Clone)]
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
    pub program_addr: u16,
}

impl MemoryMap for Chip8MemoryMap {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8]> {
        let range = checked_range(addr, len)?;
        Ok(&mut self.bytes[range])
    }
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8]> {
        let range = checked_range(addr, len)?;
        Ok(&self.bytes[range])
    }
}

fn checked_range(addr: u16, len: usize) -> Result<std::ops::Range<usize>> {
    let a = addr as usize;
    let end = a + len;
    if end > RAM_SIZE_BYTES {
        // report the first byte that falls outside memory
        return Err(Chip8Error::OutOfBounds {
            what: "memory",
            at: a.max(RAM_SIZE_BYTES),
        });
    }
    Ok(a..end)
}

/// how much RAM we have
pub const RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const PROGRAM_ADDR: u16 = 0x0200;

/// where the digit sprites live, and how big each one is
pub const DIGIT_SPRITES_ADDR: u16 = 0x000;
pub const DIGIT_SPRITE_LEN: u16 = 5;

impl Chip8MemoryMap {
    /// zeroed memory with the digit sprites baked in
    pub fn new() -> Self {
        let mut bytes = vec![0u8; RAM_SIZE_BYTES].into_boxed_slice();
        let font = DIGIT_SPRITES_ADDR as usize;
        bytes[font..font + DIGIT_SPRITES.len()].copy_from_slice(&DIGIT_SPRITES);
        Chip8MemoryMap {
            bytes,
            program_addr: PROGRAM_ADDR,
        }
    }

    /// load a CHIP-8 program at 0x200, returning how many bytes it took up
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        let max = RAM_SIZE_BYTES - self.program_addr as usize;
        if buf.len() > max {
            return Err(Chip8Error::ProgramTooLarge {
                size: buf.len(),
                max,
            });
        }
        self.write(&buf, self.program_addr)?;
        Ok(buf.len())
    }

    /// address of the sprite for hex digit `digit`
    pub fn digit_sprite_addr(digit: u8) -> u16 {
        DIGIT_SPRITES_ADDR + DIGIT_SPRITE_LEN * digit as u16
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

const DIGIT_SPRITES: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed() {
        let m = Chip8MemoryMap::new();
        // NB. only the digit sprites are baked in below 0x200
        assert_eq!(m.bytes[80..], [0; 4016]);
    }

    #[test]
    fn test_digit_sprites_baked_in() -> Result<()> {
        let m = Chip8MemoryMap::new();
        assert_eq!(m.get_ro_slice(0, 5)?, &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        let f = Chip8MemoryMap::digit_sprite_addr(0xF);
        assert_eq!(f, 75);
        assert_eq!(m.get_ro_slice(f, 5)?, &[0xF0, 0x80, 0xF0, 0x80, 0x80]);
        Ok(())
    }

    #[test]
    fn test_write_data_ok() -> Result<()> {
        let mut dst = Chip8MemoryMap::new();
        dst.write(&[0, 1, 2, 3, 4, 5, 6, 7], 0x300)?;
        assert_eq!(
            dst.bytes[0x2f8..0x308],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7]
        );
        Ok(())
    }

    #[test]
    fn test_read_word() -> Result<()> {
        let mut m = Chip8MemoryMap::new();
        m.write(&[0, 1, 2, 3, 4, 5, 6, 7], 0x400)?;
        assert_eq!(m.get_word(0x404)?, 0x0405);
        Ok(())
    }

    #[test]
    fn test_read_word_at_top_of_memory() {
        let m = Chip8MemoryMap::new();
        assert!(m.get_word(0xffe).is_ok());
        assert!(matches!(
            m.get_word(0xfff),
            Err(Chip8Error::OutOfBounds { at: 0x1000, .. })
        ));
    }

    #[test]
    fn test_write_too_much_rejected() {
        let mut dst = Chip8MemoryMap::new();
        assert!(matches!(
            dst.write(&[0xff; 8], 4089),
            Err(Chip8Error::OutOfBounds { at: 4096, .. })
        ));
        // nothing written
        assert_eq!(dst.bytes[4089..], [0; 7]);
    }

    #[test]
    fn test_program_load_ok() -> Result<()> {
        let mut dst = Chip8MemoryMap::new();
        let mut prog: &[u8] = &[0x00, 0xe0]; // clear screen
        assert_eq!(dst.load_program(&mut prog)?, 2);
        assert_eq!(dst.get_ro_slice(0x200, 2)?, &[0x00, 0xe0]);
        Ok(())
    }

    #[test]
    fn test_program_fills_memory() -> Result<()> {
        let mut dst = Chip8MemoryMap::new();
        let prog = vec![0xaa; 0xe00];
        assert_eq!(dst.load_program(&mut prog.as_slice())?, 0xe00);
        assert_eq!(dst.get_ro_slice(0xfff, 1)?, &[0xaa]);
        Ok(())
    }

    #[test]
    fn test_program_too_large() {
        let mut dst = Chip8MemoryMap::new();
        let prog = vec![0; 0xe01];
        assert!(matches!(
            dst.load_program(&mut prog.as_slice()),
            Err(Chip8Error::ProgramTooLarge {
                size: 0xe01,
                max: 0xe00
            })
        ));
    }
}
