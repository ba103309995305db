/// # interpreter
///
/// Owns the machine state and drives it one instruction at a time:
///  * `step()` fetches the word at PC, decodes it, moves PC on by 2 and
///    executes; a word that won't decode leaves PC pointing at it
///  * `tick_timers()` counts both timers down towards zero
///  * `key_down()`/`key_up()` latch the keypad
///
/// Fx0A parks the interpreter in `ExecState::AwaitingKey`; whilst parked,
/// `step()` does nothing at all and the next key-down lands in the waiting
/// register.
///
/// Nothing in here knows about wall clocks, terminals or speakers; the
/// environment decides how often each of these gets called.
use crate::error::{Chip8Error, Result};
use crate::instruction::Instruction;
use crate::machine::{ExecState, Machine, ScanLines, DISPLAY_HEIGHT, FLAG, KEY_COUNT, STACK_DEPTH};
use crate::memory::{Chip8MemoryMap, MemoryMap};
use crate::random::RandomSource;
use log::{debug, trace};
use std::io;

pub struct Chip8Interpreter {
    machine: Machine,
    random: Box<dyn RandomSource>,
}

/// registers are addressed by nibble
fn reg(r: u8) -> usize {
    (r & 0x0f) as usize
}

/// hundreds, tens and ones of a byte
pub fn bcd(n: u8) -> (u8, u8, u8) {
    (n / 100, n / 10 % 10, n % 10)
}

/// place an 8-pixel sprite row on a 64-bit scan line with its leftmost pixel
/// at column `x`. Anything pushed past column 63 falls off the end; it does
/// not reappear on the left.
pub fn scan_line_for(sprite_row: u8, x: u8) -> u64 {
    let row = sprite_row as u64;
    if x <= 56 {
        row << (56 - x)
    } else {
        row.checked_shr((x - 56) as u32).unwrap_or(0)
    }
}

fn key_index(key: u8) -> Result<usize> {
    let k = key as usize;
    if k >= KEY_COUNT {
        return Err(Chip8Error::InvalidKey { key });
    }
    Ok(k)
}

impl Chip8Interpreter {
    pub fn new(random: Box<dyn RandomSource>) -> Self {
        Chip8Interpreter {
            machine: Machine::new(),
            random,
        }
    }

    /// load a chip8 program into a fresh machine; on failure the current
    /// machine is left as it was
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize> {
        let mut machine = Machine::new();
        let len = machine.memory.load_program(reader)?;
        debug!("loaded {} byte program at {:#05x}", len, machine.memory.program_addr);
        self.machine = machine;
        Ok(len)
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn display(&self) -> &ScanLines {
        &self.machine.display
    }

    pub fn state(&self) -> ExecState {
        self.machine.state
    }

    /// should the buzzer be sounding
    pub fn sound_active(&self) -> bool {
        self.machine.sound_timer > 0
    }

    /// execute one instruction, unless waiting on a key
    pub fn step(&mut self) -> Result<()> {
        if let ExecState::AwaitingKey(_) = self.machine.state {
            return Ok(());
        }
        let pc = self.machine.program_counter;
        let word = self.machine.memory.get_word(pc)?;
        let op = Instruction::decode(word)?;
        trace!("{:#05x}: {:04x} {:?}", pc, word, op);
        self.machine.program_counter = pc.wrapping_add(2);
        self.execute(op)
    }

    /// count both timers down, stopping at zero
    pub fn tick_timers(&mut self) {
        let m = &mut self.machine;
        m.delay_timer = m.delay_timer.saturating_sub(1);
        m.sound_timer = m.sound_timer.saturating_sub(1);
    }

    /// latch a key as held; also satisfies a pending Fx0A
    pub fn key_down(&mut self, key: u8) -> Result<()> {
        let k = key_index(key)?;
        let m = &mut self.machine;
        m.keys[k] = true;
        if let ExecState::AwaitingKey(r) = m.state {
            debug!("key {:x} resumes execution into V{:X}", key, r);
            m.registers[reg(r)] = key;
            m.state = ExecState::Running;
        }
        Ok(())
    }

    pub fn key_up(&mut self, key: u8) -> Result<()> {
        let k = key_index(key)?;
        self.machine.keys[k] = false;
        Ok(())
    }

    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.machine.program_counter = self.machine.program_counter.wrapping_add(2);
        }
    }

    /// result goes in Vx, then the flag in VF; when x is F the flag wins
    fn set_with_flag(&mut self, x: u8, value: u8, flag: bool) {
        self.machine.registers[reg(x)] = value;
        self.machine.registers[FLAG] = flag as u8;
    }

    /// apply a single decoded instruction to the machine. PC is expected to
    /// already point past it.
    pub fn execute(&mut self, op: Instruction) -> Result<()> {
        use Instruction::*;
        let v = self.machine.registers;
        match op {
            ClearDisplay => self.machine.display = [0; DISPLAY_HEIGHT],
            Return => {
                let m = &mut self.machine;
                if m.stack_pointer == 0 {
                    return Err(Chip8Error::StackUnderflow);
                }
                m.stack_pointer -= 1;
                m.program_counter = m.stack[m.stack_pointer];
            }
            Jump { nnn } => self.machine.program_counter = nnn,
            Call { nnn } => {
                let m = &mut self.machine;
                if m.stack_pointer >= STACK_DEPTH {
                    return Err(Chip8Error::StackOverflow);
                }
                m.stack[m.stack_pointer] = m.program_counter;
                m.stack_pointer += 1;
                m.program_counter = nnn;
            }
            SkipEqImm { x, kk } => self.skip_if(v[reg(x)] == kk),
            SkipNeImm { x, kk } => self.skip_if(v[reg(x)] != kk),
            SkipEqReg { x, y } => self.skip_if(v[reg(x)] == v[reg(y)]),
            SkipNeReg { x, y } => self.skip_if(v[reg(x)] != v[reg(y)]),
            LoadImm { x, kk } => self.machine.registers[reg(x)] = kk,
            AddImm { x, kk } => self.machine.registers[reg(x)] = v[reg(x)].wrapping_add(kk),
            LoadReg { x, y } => self.machine.registers[reg(x)] = v[reg(y)],
            Or { x, y } => self.machine.registers[reg(x)] = v[reg(x)] | v[reg(y)],
            And { x, y } => self.machine.registers[reg(x)] = v[reg(x)] & v[reg(y)],
            Xor { x, y } => self.machine.registers[reg(x)] = v[reg(x)] ^ v[reg(y)],
            AddReg { x, y } => {
                let (sum, carry) = v[reg(x)].overflowing_add(v[reg(y)]);
                self.set_with_flag(x, sum, carry);
            }
            Sub { x, y } => {
                let (a, b) = (v[reg(x)], v[reg(y)]);
                self.set_with_flag(x, a.wrapping_sub(b), a > b);
            }
            SubReverse { x, y } => {
                let (a, b) = (v[reg(x)], v[reg(y)]);
                self.set_with_flag(x, b.wrapping_sub(a), b > a);
            }
            ShiftRight { x } => {
                let a = v[reg(x)];
                self.set_with_flag(x, a >> 1, a & 0x01 != 0);
            }
            ShiftLeft { x } => {
                let a = v[reg(x)];
                self.set_with_flag(x, a << 1, a & 0x80 != 0);
            }
            LoadIndex { nnn } => self.machine.index = nnn,
            JumpOffset { nnn } => self.machine.program_counter = nnn.wrapping_add(v[0] as u16),
            Random { x, kk } => self.machine.registers[reg(x)] = self.random.next_byte() & kk,
            Draw { x, y, n } => self.draw(v[reg(x)], v[reg(y)], n)?,
            SkipKeyPressed { x } => {
                let k = key_index(v[reg(x)])?;
                self.skip_if(self.machine.keys[k]);
            }
            SkipKeyNotPressed { x } => {
                let k = key_index(v[reg(x)])?;
                self.skip_if(!self.machine.keys[k]);
            }
            LoadDelay { x } => self.machine.registers[reg(x)] = self.machine.delay_timer,
            WaitKey { x } => {
                debug!("waiting for a key into V{:X}", x);
                self.machine.state = ExecState::AwaitingKey(x);
            }
            SetDelay { x } => self.machine.delay_timer = v[reg(x)],
            SetSound { x } => self.machine.sound_timer = v[reg(x)],
            AddIndex { x } => self.machine.index = self.machine.index.wrapping_add(v[reg(x)] as u16),
            LoadDigit { x } => self.machine.index = Chip8MemoryMap::digit_sprite_addr(v[reg(x)]),
            StoreBcd { x } => {
                let (h, t, o) = bcd(v[reg(x)]);
                let m = &mut self.machine;
                m.memory.write(&[h, t, o], m.index)?;
            }
            StoreRegisters { x } => {
                let m = &mut self.machine;
                m.memory.write(&v[..=reg(x)], m.index)?;
            }
            LoadRegisters { x } => {
                let m = &mut self.machine;
                let src = m.memory.get_ro_slice(m.index, reg(x) + 1)?;
                m.registers[..=reg(x)].copy_from_slice(src);
            }
        }
        Ok(())
    }

    /// XOR `n` sprite rows from I onto the display at (x0, y0), setting VF
    /// if any lit pixel gets switched off
    fn draw(&mut self, x0: u8, y0: u8, n: u8) -> Result<()> {
        let m = &mut self.machine;
        let sprite = m.memory.get_ro_slice(m.index, n as usize)?;
        if sprite.is_empty() {
            m.registers[FLAG] = 0;
            return Ok(());
        }
        // rows below the screen are an error, not wrapped; check before
        // touching anything
        let bottom = y0 as usize + sprite.len();
        if bottom > DISPLAY_HEIGHT {
            return Err(Chip8Error::OutOfBounds {
                what: "display row",
                at: bottom - 1,
            });
        }
        let mut collision = false;
        for (line, row) in m.display[y0 as usize..bottom].iter_mut().zip(sprite) {
            let old = *line;
            *line ^= scan_line_for(*row, x0);
            collision |= old & !*line != 0;
        }
        m.registers[FLAG] = collision as u8;
        Ok(())
    }
}
