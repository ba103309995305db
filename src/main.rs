use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use chip8vm::config::Config;
use chip8vm::display::MonoTermDisplay;
use chip8vm::environment::{Environment, Rates};
use chip8vm::input::StdinInput;
use chip8vm::interpreter::Chip8Interpreter;
use chip8vm::random::ThreadRandom;
use chip8vm::sound::{Mute, SimpleBeep, Sound};

fn main() -> Result<()> {
    let env = env_logger::Env::default().filter_or("CHIP8_LOG", "warn");
    env_logger::init_from_env(env);

    let config = Config::parse();

    // load a program
    let mut interpreter = Chip8Interpreter::new(Box::new(ThreadRandom));
    let mut f = File::open(&config.rom).with_context(|| format!("failed to open {:?}", config.rom))?;
    let len = interpreter
        .load_program(&mut f)
        .with_context(|| format!("failed to load {:?}", config.rom))?;
    info!("loaded {} bytes from {:?}", len, config.rom);

    // initialise
    let mut sound: Box<dyn Sound> = if config.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };
    let mut input = StdinInput::new(config.layout, config.key_press())?;
    let mut display = MonoTermDisplay::new(&config.rom_name())?;

    let mut environment = Environment::new(
        interpreter,
        &mut display,
        &mut input,
        sound.as_mut(),
        Rates::from(&config),
    );
    let result = environment.main_loop();
    let pc = environment.interpreter().machine().program_counter;
    drop(environment);

    // put the terminal back before saying anything
    drop(display);
    drop(input);
    if let Err(e) = &result {
        error!("stopped at {:#05x}: {}", pc, e);
    }
    result.with_context(|| format!("emulation of {:?} failed at {:#05x}", config.rom, pc))
}
