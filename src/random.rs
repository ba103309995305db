/// Supplies the bytes for Cxkk. Injected into the interpreter so tests can
/// pin the sequence down.
pub trait RandomSource {
    fn next_byte(&mut self) -> u8;
}

/// any `FnMut() -> u8` will do as a source
impl<F: FnMut() -> u8> RandomSource for F {
    fn next_byte(&mut self) -> u8 {
        self()
    }
}

/// bytes from the thread-local RNG
#[derive(Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_byte(&mut self) -> u8 {
        rand::random()
    }
}

/// cycles through a fixed sequence of bytes, forever
pub struct FixedRandom {
    bytes: Vec<u8>,
    next: usize,
}

impl FixedRandom {
    pub fn new(bytes: &[u8]) -> Self {
        assert!(!bytes.is_empty(), "FixedRandom needs at least one byte");
        FixedRandom {
            bytes: Vec::from(bytes),
            next: 0,
        }
    }
}

impl RandomSource for FixedRandom {
    fn next_byte(&mut self) -> u8 {
        let b = self.bytes[self.next];
        self.next = (self.next + 1) % self.bytes.len();
        b
    }
}
