use crate::machine::{pixel_lit, ScanLines, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// Display is used by the environment to put the machine's screen in front of
/// someone. It should abstract the implementation details, so a variety of
/// kinds of screen would work.
pub trait Display {
    /// draw one frame of scan lines
    fn draw(&mut self, lines: &ScanLines) -> Result<(), io::Error>;
}

// store useful metadata about the screen
struct Resolution(usize, usize);

impl Resolution {
    fn pixel_count(&self) -> usize {
        self.0 * self.1
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coords of every pixel that is `lit` (or not)
    fn bitplane_from_lines<'a>(
        &self,
        lines: &'a ScanLines,
        lit: bool,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let w = self.0;
        (0..self.pixel_count()).filter_map(move |count| {
            let (x, y) = (count % w, count / w);
            if pixel_lit(lines, x, y) == lit {
                Some((x as f64, -1.0 * y as f64))
            } else {
                None
            }
        })
    }
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
    title: String,
}

impl MonoTermDisplay {
    pub fn new(title: &str) -> Result<MonoTermDisplay, io::Error> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(DISPLAY_WIDTH, DISPLAY_HEIGHT),
            title: format!("CHIP-8: {}", title),
        })
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        // best effort; there is nowhere left to report a failure to
        let _ = self.terminal.show_cursor();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, lines: &ScanLines) -> Result<(), io::Error> {
        // for now this assumes a 1:1 ratio between terminal, chip8 and the
        // internal TUI canvas
        self.terminal.draw(|f| {
            let size = Rect::new(
                0,
                0,
                2 + self.resolution.0 as u16,
                2 + self.resolution.1 as u16,
            );

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title(self.title.as_str())
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(self.resolution.x_bounds())
                .y_bounds(self.resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    // expand each bitplane into x, y float coords, suitable for
                    // rendering with TUI. this just prints blocky points for now
                    ctx.draw(&Points {
                        coords: &self
                            .resolution
                            .bitplane_from_lines(lines, false)
                            .collect::<Vec<_>>(),
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &self
                            .resolution
                            .bitplane_from_lines(lines, true)
                            .collect::<Vec<_>>(),
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for testing the environment without a terminal; keeps the last
/// frame it was given
#[derive(Default)]
pub struct DummyDisplay {
    pub frames: usize,
    pub last: ScanLines,
}

impl DummyDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, lines: &ScanLines) -> Result<(), io::Error> {
        self.frames += 1;
        self.last = *lines;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Resolution tests
    #[test]
    fn test_pixel_count() {
        let r = Resolution(64, 32);
        assert_eq!(r.pixel_count(), 2048)
    }

    #[test]
    fn test_x_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.x_bounds(), [0.0, 63.0]);
    }

    #[test]
    fn test_y_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.y_bounds(), [-31.0, 0.0]);
    }

    #[test]
    fn test_bitplanes() {
        let r = Resolution(64, 32);
        let mut lines = [0u64; 32];
        lines[0] = 1 << 63;
        lines[2] = 1;
        let lit: Vec<_> = r.bitplane_from_lines(&lines, true).collect();
        assert_eq!(lit, [(0.0, 0.0), (63.0, -2.0)]);
        assert_eq!(r.bitplane_from_lines(&lines, false).count(), 2046);
    }

    #[test]
    fn test_blank_screen_is_all_dark() {
        let r = Resolution(64, 32);
        assert_eq!(r.bitplane_from_lines(&[0; 32], true).count(), 0);
    }

    #[test]
    fn test_dummy_keeps_last_frame() -> Result<(), io::Error> {
        let mut d = DummyDisplay::new();
        d.draw(&[1; 32])?;
        d.draw(&[2; 32])?;
        assert_eq!(d.frames, 2);
        assert_eq!(d.last, [2; 32]);
        Ok(())
    }

    #[test]
    #[ignore]
    // NB. figure out how to stop rendering during tests
    fn test_draw_to_terminal() -> Result<(), io::Error> {
        let mut d = MonoTermDisplay::new("test")?;
        d.draw(&[0xaaaa_aaaa_aaaa_aaaa; 32])
    }
}
