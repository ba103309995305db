use crate::error::{Chip8Error, Result};

/// One decoded CHIP-8 instruction, with its operands pulled out of the word.
/// `x`/`y` are register indices, `kk` an immediate byte, `nnn` an address
/// and `n` a nibble.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearDisplay,
    /// 00EE
    Return,
    /// 1nnn
    Jump { nnn: u16 },
    /// 2nnn
    Call { nnn: u16 },
    /// 3xkk
    SkipEqImm { x: u8, kk: u8 },
    /// 4xkk
    SkipNeImm { x: u8, kk: u8 },
    /// 5xy0
    SkipEqReg { x: u8, y: u8 },
    /// 6xkk
    LoadImm { x: u8, kk: u8 },
    /// 7xkk
    AddImm { x: u8, kk: u8 },
    /// 8xy0
    LoadReg { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    AddReg { x: u8, y: u8 },
    /// 8xy5
    Sub { x: u8, y: u8 },
    /// 8xy6
    ShiftRight { x: u8 },
    /// 8xy7
    SubReverse { x: u8, y: u8 },
    /// 8xyE
    ShiftLeft { x: u8 },
    /// 9xy0
    SkipNeReg { x: u8, y: u8 },
    /// Annn
    LoadIndex { nnn: u16 },
    /// Bnnn
    JumpOffset { nnn: u16 },
    /// Cxkk
    Random { x: u8, kk: u8 },
    /// Dxyn
    Draw { x: u8, y: u8, n: u8 },
    /// Ex9E
    SkipKeyPressed { x: u8 },
    /// ExA1
    SkipKeyNotPressed { x: u8 },
    /// Fx07
    LoadDelay { x: u8 },
    /// Fx0A
    WaitKey { x: u8 },
    /// Fx15
    SetDelay { x: u8 },
    /// Fx18
    SetSound { x: u8 },
    /// Fx1E
    AddIndex { x: u8 },
    /// Fx29
    LoadDigit { x: u8 },
    /// Fx33
    StoreBcd { x: u8 },
    /// Fx55
    StoreRegisters { x: u8 },
    /// Fx65
    LoadRegisters { x: u8 },
}

// bit-fields of an instruction word
fn nnn(word: u16) -> u16 {
    word & 0x0fff
}

fn kk(word: u16) -> u8 {
    (word & 0x00ff) as u8
}

fn n(word: u16) -> u8 {
    (word & 0x000f) as u8
}

fn x(word: u16) -> u8 {
    ((word & 0x0f00) >> 8) as u8
}

fn y(word: u16) -> u8 {
    ((word & 0x00f0) >> 4) as u8
}

impl Instruction {
    /// decode a raw instruction word; anything not in the instruction set
    /// comes back as `UnsupportedInstruction`
    pub fn decode(word: u16) -> Result<Instruction> {
        use Instruction::*;
        let (x, y, n, kk, nnn) = (x(word), y(word), n(word), kk(word), nnn(word));
        let op = match word >> 12 {
            0x0 => match word {
                0x00e0 => ClearDisplay,
                0x00ee => Return,
                _ => return Err(Chip8Error::UnsupportedInstruction { word }),
            },
            0x1 => Jump { nnn },
            0x2 => Call { nnn },
            0x3 => SkipEqImm { x, kk },
            0x4 => SkipNeImm { x, kk },
            // NB. the low nibble of 5xy_ and 9xy_ is not checked
            0x5 => SkipEqReg { x, y },
            0x6 => LoadImm { x, kk },
            0x7 => AddImm { x, kk },
            0x8 => match n {
                0x0 => LoadReg { x, y },
                0x1 => Or { x, y },
                0x2 => And { x, y },
                0x3 => Xor { x, y },
                0x4 => AddReg { x, y },
                0x5 => Sub { x, y },
                0x6 => ShiftRight { x },
                0x7 => SubReverse { x, y },
                0xe => ShiftLeft { x },
                _ => return Err(Chip8Error::UnsupportedInstruction { word }),
            },
            0x9 => SkipNeReg { x, y },
            0xa => LoadIndex { nnn },
            0xb => JumpOffset { nnn },
            0xc => Random { x, kk },
            0xd => Draw { x, y, n },
            0xe => match kk {
                0x9e => SkipKeyPressed { x },
                0xa1 => SkipKeyNotPressed { x },
                _ => return Err(Chip8Error::UnsupportedInstruction { word }),
            },
            0xf => match kk {
                0x07 => LoadDelay { x },
                0x0a => WaitKey { x },
                0x15 => SetDelay { x },
                0x18 => SetSound { x },
                0x1e => AddIndex { x },
                0x29 => LoadDigit { x },
                0x33 => StoreBcd { x },
                0x55 => StoreRegisters { x },
                0x65 => LoadRegisters { x },
                _ => return Err(Chip8Error::UnsupportedInstruction { word }),
            },
            _ => unreachable!("a u16 shifted right by 12 fits in a nibble"),
        };
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    fn decode(word: u16) -> Instruction {
        Instruction::decode(word).unwrap()
    }

    #[test]
    fn test_decode_every_pattern() {
        let table = [
            (0x00e0, ClearDisplay),
            (0x00ee, Return),
            (0x1abc, Jump { nnn: 0xabc }),
            (0x2def, Call { nnn: 0xdef }),
            (0x3a12, SkipEqImm { x: 0xa, kk: 0x12 }),
            (0x4b34, SkipNeImm { x: 0xb, kk: 0x34 }),
            (0x5120, SkipEqReg { x: 1, y: 2 }),
            (0x6c56, LoadImm { x: 0xc, kk: 0x56 }),
            (0x7d78, AddImm { x: 0xd, kk: 0x78 }),
            (0x8340, LoadReg { x: 3, y: 4 }),
            (0x8341, Or { x: 3, y: 4 }),
            (0x8342, And { x: 3, y: 4 }),
            (0x8343, Xor { x: 3, y: 4 }),
            (0x8344, AddReg { x: 3, y: 4 }),
            (0x8345, Sub { x: 3, y: 4 }),
            (0x8346, ShiftRight { x: 3 }),
            (0x8347, SubReverse { x: 3, y: 4 }),
            (0x834e, ShiftLeft { x: 3 }),
            (0x9560, SkipNeReg { x: 5, y: 6 }),
            (0xa123, LoadIndex { nnn: 0x123 }),
            (0xb456, JumpOffset { nnn: 0x456 }),
            (0xc7f0, Random { x: 7, kk: 0xf0 }),
            (0xd12f, Draw { x: 1, y: 2, n: 0xf }),
            (0xe89e, SkipKeyPressed { x: 8 }),
            (0xe9a1, SkipKeyNotPressed { x: 9 }),
            (0xf107, LoadDelay { x: 1 }),
            (0xf20a, WaitKey { x: 2 }),
            (0xf315, SetDelay { x: 3 }),
            (0xf418, SetSound { x: 4 }),
            (0xf51e, AddIndex { x: 5 }),
            (0xf629, LoadDigit { x: 6 }),
            (0xf733, StoreBcd { x: 7 }),
            (0xf855, StoreRegisters { x: 8 }),
            (0xf965, LoadRegisters { x: 9 }),
        ];
        for (word, op) in table {
            assert_eq!(decode(word), op, "decoding {:#06x}", word);
        }
    }

    #[test]
    fn test_bit_fields() {
        assert_eq!(nnn(0xdabc), 0xabc);
        assert_eq!(kk(0xdabc), 0xbc);
        assert_eq!(n(0xdabc), 0xc);
        assert_eq!(x(0xdabc), 0xa);
        assert_eq!(y(0xdabc), 0xb);
    }

    #[test]
    fn test_unsupported_words() {
        for word in [0x0000, 0x0123, 0x00e1, 0x00ef, 0x8008, 0x800f, 0xe09f, 0xe0a2, 0xf000, 0xf066, 0xf0ff] {
            match Instruction::decode(word) {
                Err(Chip8Error::UnsupportedInstruction { word: w }) => assert_eq!(w, word),
                other => panic!("{:#06x} decoded to {:?}", word, other),
            }
        }
    }

    #[test]
    fn test_every_word_decodes_or_fails_cleanly() {
        let supported = (0..=u16::MAX)
            .filter(|w| Instruction::decode(*w).is_ok())
            .count();
        // 0x0: 2 words, 0x8: 9 suffixes, 0xE: 2 and 0xF: 9 trailing bytes,
        // the other 12 families take any operands
        let expected = 2 + 12 * 0x1000 + 9 * 0x100 + 2 * 0x10 + 9 * 0x10;
        assert_eq!(supported, expected);
    }
}
