/// # environment
///
/// Sets everything up around the interpreter and runs the main loop. Three
/// cadences run independently, each one catching up with where it should be
/// given how long we've been running:
///
///  * timers -- `timer_hz` ticks per second
///  * CPU    -- `cpu_hz` instructions per second
///  * frames -- `frame_hz` redraws per second; a late frame is drawn once,
///    not once per missed refresh
///
/// Keyboard events are applied first, so a key-down lands before the CPU
/// catches up. Wallclock timing will look good, but a burst of instructions
/// will happen slightly too quickly after each sleep.
use crate::config::Config;
use crate::display::Display;
use crate::error::Result;
use crate::input::{Input, KeyEvent};
use crate::interpreter::Chip8Interpreter;
use crate::sound::Sound;
use log::{debug, warn};
use std::time::{Duration, Instant};

/// how long to nap between loop iterations
const LOOP_INTERVAL: Duration = Duration::from_millis(2);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rates {
    pub cpu_hz: u32,
    pub timer_hz: u32,
    pub frame_hz: u32,
}

impl Default for Rates {
    fn default() -> Self {
        Rates {
            cpu_hz: 500,
            timer_hz: 60,
            frame_hz: 60,
        }
    }
}

impl From<&Config> for Rates {
    fn from(config: &Config) -> Self {
        Rates {
            cpu_hz: config.cpu_hz,
            timer_hz: config.timer_hz,
            frame_hz: config.frame_hz,
        }
    }
}

/// whether the main loop should keep going
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// how many updates at `hz` should have happened after `run_time`
fn target_updates(run_time: Duration, hz: u32) -> u64 {
    (run_time.as_nanos() * hz as u128 / Duration::from_secs(1).as_nanos()) as u64
}

#[derive(Default)]
struct Counts {
    timer: u64,
    cpu: u64,
    frames: u64,
}

pub struct Environment<'a> {
    interpreter: Chip8Interpreter,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    rates: Rates,
    counts: Counts,
}

impl<'a> Environment<'a> {
    pub fn new(
        interpreter: Chip8Interpreter,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        rates: Rates,
    ) -> Self {
        Environment {
            interpreter,
            display,
            input,
            sound,
            rates,
            counts: Counts::default(),
        }
    }

    pub fn interpreter(&self) -> &Chip8Interpreter {
        &self.interpreter
    }

    /// run until the user quits or the interpreter hits an error
    pub fn main_loop(&mut self) -> Result<()> {
        let start = Instant::now();
        let result = loop {
            let now = Instant::now();
            match self.advance(now, now - start) {
                Ok(Flow::Continue) => spin_sleep::sleep(LOOP_INTERVAL),
                Ok(Flow::Quit) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        // the buzzer goes quiet however the run ended
        if self.sound.is_beeping() {
            self.set_beeping(false);
        }
        result
    }

    /// bring everything up to date for `run_time` since the start
    pub fn advance(&mut self, now: Instant, run_time: Duration) -> Result<Flow> {
        for event in self.input.poll_events(now)? {
            match event {
                KeyEvent::Down(key) => self.interpreter.key_down(key)?,
                KeyEvent::Up(key) => self.interpreter.key_up(key)?,
                KeyEvent::Quit => {
                    debug!("quit after {} instructions", self.counts.cpu);
                    return Ok(Flow::Quit);
                }
            }
        }

        let timer_target = target_updates(run_time, self.rates.timer_hz);
        while self.counts.timer < timer_target {
            self.interpreter.tick_timers();
            self.counts.timer += 1;
        }

        let cpu_target = target_updates(run_time, self.rates.cpu_hz);
        while self.counts.cpu < cpu_target {
            self.interpreter.step()?;
            self.counts.cpu += 1;
        }

        let frame_target = target_updates(run_time, self.rates.frame_hz);
        if self.counts.frames < frame_target {
            self.display.draw(self.interpreter.display())?;
            self.counts.frames = frame_target;
        }

        let active = self.interpreter.sound_active();
        if active != self.sound.is_beeping() {
            self.set_beeping(active);
        }
        Ok(Flow::Continue)
    }

    // a broken buzzer isn't worth stopping the program for
    fn set_beeping(&mut self, on: bool) {
        let result = if on { self.sound.beep() } else { self.sound.stop() };
        if let Err(e) = result {
            warn!("sound: {}", e);
        }
    }
}
