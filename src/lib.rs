//!
//! ## Design
//!
//! * the interpreter core is pure: no clocks, no terminal, no speaker
//! * fetch/decode/execute is one `step()`; timers are one `tick_timers()`;
//!   the caller picks how often to call each
//! * abstract display so can plug alternatives; starting with TUI in-console
//! * errors come back as values, never panics, so a bad ROM can be reported
//!
//! Enums to represent:
//!
//! * the instruction set -- one variant per instruction, operands decoded
//! * the interpreter's run state -- running, or parked waiting for a key
//! * what went wrong -- unsupported instruction, stack over/underflow, out of
//!   bounds draw or memory access, bad key
//!
//! Model
//!
//! Environment
//!  |-- display, input, sound, config
//!  |-- interpreter(random source)
//!  |    `-- machine(memory map, registers, stack, timers, keys, scan lines)
//!  `-- main loop
//!       |-- input.poll_events() -> interpreter.key_down()/key_up()
//!       |-- while timers behind:  interpreter.tick_timers()
//!       |-- while cpu behind:     interpreter.step()
//!       |-- if frame behind:      display.draw(interpreter.display())
//!       `-- spin_sleep a couple of ms

pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod machine;
pub mod memory;
pub mod random;
pub mod sound;

pub use error::{Chip8Error, Result};
pub use interpreter::Chip8Interpreter;
