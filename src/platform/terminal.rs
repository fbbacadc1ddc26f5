//! Terminal graphics subsystem
//!
//! The terminal is a process-wide resource: raw mode and the alternate
//! screen are global state. [`Terminal::acquire`] sets it up and
//! [`Terminal::release`] restores it in a fixed order:
//!
//! 1. presenter state (cell buffers, colors)
//! 2. the "window": keyboard flags, cursor, line wrap, alternate screen
//! 3. raw mode
//!
//! Frames are drawn into a logical-resolution [`Framebuffer`] and
//! rasterized into half-block cells (two pixels per character cell),
//! letterboxed to keep the playfield's aspect ratio. Only changed cells are
//! written.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, BeginSynchronizedUpdate, DisableLineWrap, EnableLineWrap, EndSynchronizedUpdate,
    EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute, queue};

use super::InputSource;
use super::input::KeyTracker;
use crate::error::GameError;
use crate::renderer::{Display, Framebuffer};
use crate::sim::{Rect, Rgba, TickInput};

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '▀';

/// One character cell: colors of its top and bottom pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    top: Rgba,
    bottom: Rgba,
}

/// Never produced by rasterization, forces a redraw of every cell
const DIRTY: Cell = Cell {
    top: Rgba::new(1, 2, 3, 0),
    bottom: Rgba::new(3, 2, 1, 0),
};

fn to_color(c: Rgba) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Letterboxed placement of the playfield inside the terminal, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Viewport {
    col: u16,
    row: u16,
    cols: u16,
    /// Half-cell pixel rows
    sub_rows: u16,
}

impl Viewport {
    fn fit(term_cols: u16, term_rows: u16, width: u32, height: u32) -> Self {
        let sub_rows_available = term_rows as f32 * 2.0;
        let scale = (term_cols as f32 / width as f32).min(sub_rows_available / height as f32);
        let cols = ((width as f32 * scale).floor() as u16).clamp(1, term_cols.max(1));
        let sub_rows = ((height as f32 * scale).floor() as u16).clamp(1, (term_rows * 2).max(1));
        let rows = sub_rows.div_ceil(2);
        Self {
            col: term_cols.saturating_sub(cols) / 2,
            row: term_rows.saturating_sub(rows) / 2,
            cols,
            sub_rows,
        }
    }

    fn rows(&self) -> u16 {
        self.sub_rows.div_ceil(2)
    }
}

/// Color of the block of framebuffer pixels covered by one half cell: the
/// first pixel that differs from the background, so thin features survive
/// downscaling.
fn sample_block(frame: &Framebuffer, background: Rgba, x0: u32, x1: u32, y0: u32, y1: u32) -> Rgba {
    let width = frame.width();
    let pixels = frame.pixels();
    for y in y0..y1.max(y0 + 1).min(frame.height()) {
        let row = (y * width) as usize;
        for x in x0..x1.max(x0 + 1).min(width) {
            let p = pixels[row + x as usize];
            if p != background {
                return p;
            }
        }
    }
    background
}

/// The acquired terminal
pub struct Terminal {
    out: Stdout,
    frame: Framebuffer,
    background: Rgba,
    term_size: (u16, u16),
    viewport: Viewport,
    cells: Vec<Cell>,
    prev: Vec<Cell>,
    keyboard_enhanced: bool,
    active: bool,
}

impl Terminal {
    /// Take over the terminal for a `width` x `height` logical playfield
    pub fn acquire(width: u32, height: u32) -> Result<Self, GameError> {
        log::info!("Acquiring terminal...");
        let frame = Framebuffer::new(width, height)?;
        terminal::enable_raw_mode()
            .map_err(|e| GameError::Backend(format!("raw mode unavailable: {e}")))?;

        let mut out = io::stdout();
        if let Err(e) = execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(terminal::ClearType::All)
        ) {
            let _ = terminal::disable_raw_mode();
            return Err(GameError::Backend(format!("alternate screen unavailable: {e}")));
        }

        let keyboard_enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true))
            && execute!(
                out,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )
            .is_ok();
        if !keyboard_enhanced {
            log::warn!("Terminal does not report key releases, using hold timers");
        }

        let term_size = match terminal::size() {
            Ok(size) => size,
            Err(e) => {
                let _ = execute!(out, cursor::Show, EnableLineWrap, LeaveAlternateScreen);
                let _ = terminal::disable_raw_mode();
                return Err(GameError::Backend(format!("terminal size unavailable: {e}")));
            }
        };

        let mut term = Self {
            out,
            frame,
            background: Rgba::default(),
            term_size,
            viewport: Viewport::fit(term_size.0, term_size.1, width, height),
            cells: Vec::new(),
            prev: Vec::new(),
            keyboard_enhanced,
            active: true,
        };
        term.resize(term_size);
        log::info!(
            "Terminal OK ({}x{} cells, key releases: {})",
            term_size.0,
            term_size.1,
            keyboard_enhanced
        );
        Ok(term)
    }

    /// Keyboard input bound to this terminal's capabilities
    pub fn keyboard(&self) -> TerminalKeys {
        TerminalKeys {
            keys: KeyTracker::new(self.keyboard_enhanced),
        }
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn release(&mut self) -> Result<(), GameError> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        log::info!("Releasing terminal...");

        // Presenter first
        self.cells.clear();
        self.prev.clear();
        let presenter = execute!(self.out, ResetColor);

        // Then the "window"
        if self.keyboard_enhanced {
            let _ = execute!(self.out, PopKeyboardEnhancementFlags);
        }
        let screen = execute!(self.out, cursor::Show, EnableLineWrap, LeaveAlternateScreen);

        // Global state last
        let raw = terminal::disable_raw_mode();

        presenter?;
        screen?;
        raw?;
        log::info!("Terminal released");
        Ok(())
    }

    fn resize(&mut self, term_size: (u16, u16)) {
        self.term_size = term_size;
        self.viewport = Viewport::fit(
            term_size.0,
            term_size.1,
            self.frame.width(),
            self.frame.height(),
        );
        let len = self.viewport.cols as usize * self.viewport.rows() as usize;
        self.cells = vec![DIRTY; len];
        self.prev = vec![DIRTY; len];
    }

    /// Downscale the framebuffer into cells
    fn rasterize(&mut self) {
        let vp = self.viewport;
        let (w, h) = (self.frame.width(), self.frame.height());
        let cols = vp.cols as u32;
        let sub_rows = vp.sub_rows as u32;

        let sub_pixel = |sub_row: u32, col: u32| -> Rgba {
            if sub_row >= sub_rows {
                return self.background;
            }
            let x0 = col * w / cols;
            let x1 = (col + 1) * w / cols;
            let y0 = sub_row * h / sub_rows;
            let y1 = (sub_row + 1) * h / sub_rows;
            sample_block(&self.frame, self.background, x0, x1, y0, y1)
        };

        let mut cells = std::mem::take(&mut self.cells);
        for row in 0..vp.rows() as u32 {
            for col in 0..cols {
                cells[(row * cols + col) as usize] = Cell {
                    top: sub_pixel(row * 2, col),
                    bottom: sub_pixel(row * 2 + 1, col),
                };
            }
        }
        self.cells = cells;
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;
        let cols = self.viewport.cols as usize;
        let mut current: Option<Cell> = None;

        for (i, cell) in self.cells.iter().enumerate() {
            if *cell == self.prev[i] {
                continue;
            }
            let x = self.viewport.col + (i % cols) as u16;
            let y = self.viewport.row + (i / cols) as u16;
            queue!(self.out, cursor::MoveTo(x, y))?;
            if current.map(|c| c.top) != Some(cell.top) {
                queue!(self.out, SetForegroundColor(to_color(cell.top)))?;
            }
            if current.map(|c| c.bottom) != Some(cell.bottom) {
                queue!(self.out, SetBackgroundColor(to_color(cell.bottom)))?;
            }
            current = Some(*cell);
            queue!(self.out, Print(HALF_BLOCK))?;
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.copy_from_slice(&self.cells);
        Ok(())
    }
}

impl Display for Terminal {
    fn size(&self) -> (u32, u32) {
        self.frame.size()
    }

    fn clear(&mut self, color: Rgba) {
        self.background = color;
        self.frame.clear(color);
    }

    fn draw_rect(&mut self, rect: &Rect, color: Rgba) -> Result<(), GameError> {
        self.frame.draw_rect(rect, color)
    }

    fn present(&mut self) -> Result<(), GameError> {
        if !self.active {
            return Err(GameError::Draw("terminal already released".into()));
        }
        let size = terminal::size()?;
        if size != self.term_size {
            log::info!("Terminal resized to {}x{}", size.0, size.1);
            execute!(
                self.out,
                ResetColor,
                terminal::Clear(terminal::ClearType::All)
            )?;
            self.resize(size);
        }
        self.rasterize();
        self.flush_diff()
            .map_err(|e| GameError::Draw(format!("terminal write failed: {e}")))?;
        self.frame.present()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::error!("Failed to restore terminal: {e}");
        }
    }
}

/// Keyboard input read from the terminal event stream
#[derive(Debug, Clone)]
pub struct TerminalKeys {
    keys: KeyTracker,
}

impl InputSource for TerminalKeys {
    fn poll(&mut self) -> Result<TickInput, GameError> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.keys.handle_key(&key);
            }
        }
        Ok(self.keys.sample())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_keeps_aspect() {
        // 100x40 terminal = 100x80 half-cell pixels, width bound for 4:3
        let vp = Viewport::fit(100, 40, 800, 600);
        assert_eq!(vp.cols, 100);
        assert_eq!(vp.sub_rows, 75);
        assert_eq!(vp.rows(), 38);
        assert_eq!((vp.col, vp.row), (0, 1));

        // Wide terminal: height bound, centered horizontally
        let vp = Viewport::fit(200, 30, 800, 600);
        assert_eq!(vp.sub_rows, 60);
        assert_eq!(vp.cols, 80);
        assert_eq!(vp.col, 60);
        assert_eq!(vp.row, 0);
    }

    #[test]
    fn test_sample_block_prefers_foreground() {
        let mut fb = Framebuffer::new(16, 16).unwrap();
        let bg = Rgba::rgb(0, 0, 0);
        let fg = Rgba::rgb(0, 255, 0);
        fb.clear(bg);
        fb.draw_rect(&Rect::new(5, 5, 1, 1), fg).unwrap();
        assert_eq!(sample_block(&fb, bg, 0, 8, 0, 8), fg);
        assert_eq!(sample_block(&fb, bg, 8, 16, 0, 8), bg);
    }
}
