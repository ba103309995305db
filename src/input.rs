use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::warn;
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

/// left-hand side of a qwerty keyboard, laid out like the COSMAC keypad
///   |1|2|3|4| -> |1|2|3|C|
///   |q|w|e|r| -> |4|5|6|D|
///   |a|s|d|f| -> |7|8|9|E|
///   |z|x|c|v| -> |A|0|B|F|
const CHIP8_QWERTY_KEYMAP: [(char, u8); 16] = [
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('4', 0x0c),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('r', 0x0d),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('f', 0x0e),
    ('z', 0x0a),
    ('x', 0x00),
    ('c', 0x0b),
    ('v', 0x0f),
];

/// ditto for dvorak
///   |1|2|3|4| -> |1|2|3|C|
///   |'|,|.|p| -> |4|5|6|D|
///   |a|o|e|u| -> |7|8|9|E|
///   |;|q|j|k| -> |A|0|B|F|
const CHIP8_DVORAK_KEYMAP: [(char, u8); 16] = [
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('4', 0x0c),
    ('\'', 0x04),
    (',', 0x05),
    ('.', 0x06),
    ('p', 0x0d),
    ('a', 0x07),
    ('o', 0x08),
    ('e', 0x09),
    ('u', 0x0e),
    (';', 0x0a),
    ('q', 0x00),
    ('j', 0x0b),
    ('k', 0x0f),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum KeyboardLayout {
    Qwerty,
    Dvorak,
}

impl KeyboardLayout {
    pub fn keymap(&self) -> HashMap<char, u8> {
        match self {
            KeyboardLayout::Qwerty => HashMap::from(CHIP8_QWERTY_KEYMAP),
            KeyboardLayout::Dvorak => HashMap::from(CHIP8_DVORAK_KEYMAP),
        }
    }
}

/// what the keyboard has to say to the environment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    Down(u8),
    Up(u8),
    Quit,
}

/// reads keypresses
pub trait Input {
    /// everything that happened since the last call, oldest first
    fn poll_events(&mut self, now: Instant) -> Result<Vec<KeyEvent>, io::Error>;
}

/// Terminals only tell us about presses, so a key counts as held until
/// `hold` has passed since it was last pressed. Auto-repeat keeps pushing
/// the release back while the key is physically down.
pub struct KeyReleaseTimer {
    hold: Duration,
    release_at: [Option<Instant>; 16],
}

impl KeyReleaseTimer {
    pub fn new(hold: Duration) -> Self {
        KeyReleaseTimer {
            hold,
            release_at: [None; 16],
        }
    }

    pub fn press(&mut self, key: u8, now: Instant) {
        self.release_at[(key & 0x0f) as usize] = Some(now + self.hold);
    }

    /// keys due for release at `now`; each is reported once
    pub fn expired(&mut self, now: Instant) -> Vec<u8> {
        let mut keys = Vec::new();
        for (key, at) in self.release_at.iter_mut().enumerate() {
            if matches!(at, Some(t) if *t <= now) {
                *at = None;
                keys.push(key as u8);
            }
        }
        keys
    }
}

/// simple implementation of Input, reading the terminal via crossterm
pub struct StdinInput {
    keymap: HashMap<char, u8>,
    releases: KeyReleaseTimer,
}

impl StdinInput {
    pub fn new(layout: KeyboardLayout, hold: Duration) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(StdinInput {
            keymap: layout.keymap(),
            releases: KeyReleaseTimer::new(hold),
        })
    }

    fn read_stdin(&mut self, now: Instant, events: &mut Vec<KeyEvent>) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                match evt.code {
                    // raw mode swallows ^C, so honour it here
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        events.push(KeyEvent::Quit)
                    }
                    KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                        Some(mapped_key) => {
                            self.releases.press(*mapped_key, now);
                            events.push(KeyEvent::Down(*mapped_key));
                        }
                        None => warn!("can't map {:?} to a CHIP-8 key", key),
                    },
                    KeyCode::Esc => events.push(KeyEvent::Quit),
                    other => warn!("unmapped key event {:?}", other),
                }
            }
        }
        Ok(())
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for StdinInput {
    fn poll_events(&mut self, now: Instant) -> Result<Vec<KeyEvent>, io::Error> {
        let mut events = Vec::new();
        self.read_stdin(now, &mut events)?;
        events.extend(self.releases.expired(now).into_iter().map(KeyEvent::Up));
        Ok(events)
    }
}

/// dummy Input implementation for testing: hands out a script of events,
/// a batch per poll
pub struct DummyInput {
    script: Vec<Vec<KeyEvent>>,
}

impl DummyInput {
    pub fn new(script: &[&[KeyEvent]]) -> Self {
        DummyInput {
            script: script.iter().rev().map(|batch| Vec::from(*batch)).collect(),
        }
    }
}

impl Input for DummyInput {
    fn poll_events(&mut self, _now: Instant) -> Result<Vec<KeyEvent>, io::Error> {
        Ok(self.script.pop().unwrap_or_default())
    }
}
