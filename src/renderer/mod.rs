//! Rendering module
//!
//! The simulation only ever draws through [`Display`]: filled rectangles on a
//! logical pixel surface. [`Framebuffer`] is the in-memory implementation used
//! by tests and rasterized by the terminal backend.

pub mod scene;
pub mod text;

pub use scene::SceneRenderer;
pub use text::{TextCache, TextSurface, render_text};

use crate::consts::MAX_SCREEN_SIDE;
use crate::error::GameError;
use crate::sim::{Rect, Rgba};

/// Drawing surface consumed by the game
pub trait Display {
    /// Logical size in pixels
    fn size(&self) -> (u32, u32);
    /// Fill the whole surface
    fn clear(&mut self, color: Rgba);
    /// Fill a rectangle, clipped to the surface
    fn draw_rect(&mut self, rect: &Rect, color: Rgba) -> Result<(), GameError>;
    /// Show the finished frame
    fn present(&mut self) -> Result<(), GameError>;
}

/// In-memory RGBA surface
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    frames_presented: u64,
}

impl Framebuffer {
    /// Blank surface, at most `MAX_SCREEN_SIDE` pixels on each side
    pub fn new(width: u32, height: u32) -> Result<Self, GameError> {
        let too_large = || GameError::Draw(format!("framebuffer too large: {width}x{height}"));
        if width > MAX_SCREEN_SIDE as u32 || height > MAX_SCREEN_SIDE as u32 {
            return Err(too_large());
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(too_large)?;
        Ok(Self {
            width,
            height,
            pixels: vec![Rgba::default(); len],
            frames_presented: 0,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Number of pixels with exactly this color
    pub fn count_color(&self, color: Rgba) -> usize {
        self.pixels.iter().filter(|p| **p == color).count()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Display for Framebuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    fn draw_rect(&mut self, rect: &Rect, color: Rgba) -> Result<(), GameError> {
        let x0 = rect.left().max(0);
        let y0 = rect.top().max(0);
        let x1 = rect.right().min(self.width as i32);
        let y1 = rect.bottom().min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }

        let stride = self.width as usize;
        for y in y0 as usize..y1 as usize {
            let row = y * stride;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
        Ok(())
    }

    fn present(&mut self) -> Result<(), GameError> {
        self.frames_presented += 1;
        Ok(())
    }
}
