use crate::memory::Chip8MemoryMap;

pub const REGISTER_COUNT: usize = 16;
pub const STACK_DEPTH: usize = 16;
pub const KEY_COUNT: usize = 16;
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// register used as the implicit carry/borrow/collision output
pub const FLAG: usize = 0xF;

/// 32 scan lines, one bit per column, MSB is the leftmost column
pub type ScanLines = [u64; DISPLAY_HEIGHT];

/// is pixel (x, y) lit on these scan lines
pub fn pixel_lit(lines: &ScanLines, x: usize, y: usize) -> bool {
    x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT && lines[y] & (1 << (DISPLAY_WIDTH - 1 - x)) != 0
}

/// Whether the machine will execute the next step, or is parked on Fx0A
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecState {
    Running,
    /// waiting for any key-down; the key value goes into this register
    AwaitingKey(u8),
}

/// Complete mutable state of the virtual computer. Plain data; the
/// interpreter is the only thing that should be changing it.
#[derive(Clone)]
pub struct Machine {
    pub registers: [u8; REGISTER_COUNT],
    pub index: u16,
    pub program_counter: u16,
    pub stack: [u16; STACK_DEPTH],
    /// next free stack slot
    pub stack_pointer: usize,
    pub memory: Chip8MemoryMap,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub keys: [bool; KEY_COUNT],
    pub display: ScanLines,
    pub state: ExecState,
}

impl Machine {
    pub fn new() -> Self {
        let memory = Chip8MemoryMap::new();
        Machine {
            registers: [0; REGISTER_COUNT],
            index: 0,
            program_counter: memory.program_addr,
            stack: [0; STACK_DEPTH],
            stack_pointer: 0,
            memory,
            delay_timer: 0,
            sound_timer: 0,
            keys: [false; KEY_COUNT],
            display: [0; DISPLAY_HEIGHT],
            state: ExecState::Running,
        }
    }

    /// is pixel (x, y) lit
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        pixel_lit(&self.display, x, y)
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryMap;

    #[test]
    fn test_initial_state() {
        let m = Machine::new();
        assert_eq!(m.program_counter, 0x200);
        assert_eq!(m.registers, [0; 16]);
        assert_eq!(m.index, 0);
        assert_eq!(m.stack_pointer, 0);
        assert_eq!(m.display, [0; 32]);
        assert_eq!(m.keys, [false; 16]);
        assert_eq!(m.state, ExecState::Running);
        assert_eq!(m.memory.get_ro_slice(5, 5).unwrap(), &[0x20, 0x60, 0x20, 0x20, 0x70]);
    }

    #[test]
    fn test_pixel() {
        let mut m = Machine::new();
        m.display[3] = 0x8000_0000_0000_0001;
        assert!(m.pixel(0, 3));
        assert!(m.pixel(63, 3));
        assert!(!m.pixel(1, 3));
        assert!(!m.pixel(64, 3));
        assert!(!m.pixel(0, 32));
    }
}
