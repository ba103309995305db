use crate::input::KeyboardLayout;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// CHIP-8 emulator for the terminal
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// ROM to load and execute
    pub rom: PathBuf,

    /// Keyboard layout used to map keys onto the hex keypad
    #[arg(long, value_enum, default_value_t = KeyboardLayout::Qwerty)]
    pub layout: KeyboardLayout,

    /// Instructions executed per second
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..))]
    pub cpu_hz: u32,

    /// Delay and sound timer ticks per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    pub timer_hz: u32,

    /// Screen refreshes per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    pub frame_hz: u32,

    /// How long a key stays held after it was last pressed, in milliseconds
    #[arg(long, default_value_t = 100)]
    pub key_press_ms: u64,

    /// Don't beep
    #[arg(long)]
    pub mute: bool,
}

impl Config {
    pub fn key_press(&self) -> Duration {
        Duration::from_millis(self.key_press_ms)
    }

    /// file name of the ROM, for the display title
    pub fn rom_name(&self) -> String {
        self.rom
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.rom.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = Config::try_parse_from(["chip8vm", "roms/TETRIS"]).unwrap();
        assert_eq!(c.rom, PathBuf::from("roms/TETRIS"));
        assert_eq!(c.layout, KeyboardLayout::Qwerty);
        assert_eq!((c.cpu_hz, c.timer_hz, c.frame_hz), (500, 60, 60));
        assert_eq!(c.key_press(), Duration::from_millis(100));
        assert!(!c.mute);
        assert_eq!(c.rom_name(), "TETRIS");
    }

    #[test]
    fn test_overrides() {
        let c = Config::try_parse_from([
            "chip8vm",
            "--layout",
            "dvorak",
            "--cpu-hz",
            "1000",
            "--mute",
            "pong.ch8",
        ])
        .unwrap();
        assert_eq!(c.layout, KeyboardLayout::Dvorak);
        assert_eq!(c.cpu_hz, 1000);
        assert!(c.mute);
    }

    #[test]
    fn test_rejects_zero_frequency() {
        assert!(Config::try_parse_from(["chip8vm", "--timer-hz", "0", "x.ch8"]).is_err());
    }

    #[test]
    fn test_needs_rom() {
        assert!(Config::try_parse_from(["chip8vm"]).is_err());
    }
}
