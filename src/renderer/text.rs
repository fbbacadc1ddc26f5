//! Bitmap text
//!
//! A built-in 3x5 pixel font, rendered into a [`TextSurface`]: a list of
//! filled rectangles with a known pixel size. Surfaces are cached by the
//! value they display and only rebuilt when that value changes.

use crate::error::GameError;
use crate::renderer::Display;
use crate::sim::{Rect, Rgba};

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;
/// Horizontal advance, glyph plus one column gap
const ADVANCE: i32 = GLYPH_WIDTH + 1;
/// Vertical advance, glyph plus one row gap
const LINE_HEIGHT: i32 = GLYPH_HEIGHT + 1;

/// Rows of a glyph, three bits each, most significant bit on the left
fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b110],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ' ' => [0; 5],
        _ => [0b110, 0b001, 0b010, 0b000, 0b010],
    }
}

/// Rendered text: filled runs relative to the surface's top-left corner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSurface {
    pub width: i32,
    pub height: i32,
    pub color: Rgba,
    runs: Vec<Rect>,
}

impl TextSurface {
    /// Filled rectangles, relative to the surface origin
    pub fn runs(&self) -> &[Rect] {
        &self.runs
    }

    /// Draw with the top-left corner at `(x, y)`
    pub fn draw<D: Display + ?Sized>(&self, display: &mut D, x: i32, y: i32) -> Result<(), GameError> {
        for run in &self.runs {
            let mut rect = *run;
            rect.translate(glam::IVec2::new(x, y));
            display.draw_rect(&rect, self.color)?;
        }
        Ok(())
    }
}

/// Render `text` at `scale` logical pixels per font pixel.
///
/// Lines split on `\n` and are centered within the widest line.
pub fn render_text(text: &str, scale: i32, color: Rgba) -> TextSurface {
    let scale = scale.max(1);
    let lines: Vec<&str> = text.split('\n').collect();
    let widest = lines.iter().map(|l| l.chars().count() as i32).max().unwrap_or(0);

    let width = ((widest * ADVANCE - 1).max(1)) * scale;
    let height = ((lines.len() as i32 * LINE_HEIGHT - 1).max(1)) * scale;

    let mut runs = Vec::new();
    for (line_index, line) in lines.iter().enumerate() {
        let chars = line.chars().count() as i32;
        let line_width = chars * ADVANCE - 1;
        let x_offset = (widest * ADVANCE - 1 - line_width) / 2;
        let y_offset = line_index as i32 * LINE_HEIGHT;

        for (char_index, c) in line.chars().enumerate() {
            let gx = x_offset + char_index as i32 * ADVANCE;
            for (row, bits) in glyph(c).iter().enumerate() {
                push_row_runs(&mut runs, *bits, gx, y_offset + row as i32, scale);
            }
        }
    }

    TextSurface {
        width,
        height,
        color,
        runs,
    }
}

/// Merge horizontally adjacent set bits of one glyph row into single rects
fn push_row_runs(runs: &mut Vec<Rect>, bits: u8, gx: i32, gy: i32, scale: i32) {
    let mut col = 0;
    while col < GLYPH_WIDTH {
        if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
            col += 1;
            continue;
        }
        let start = col;
        while col < GLYPH_WIDTH && bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
            col += 1;
        }
        runs.push(Rect::new(
            (gx + start) * scale,
            gy * scale,
            (col - start) * scale,
            scale,
        ));
    }
}

/// A text surface cached against the value it shows
#[derive(Debug, Clone)]
pub struct TextCache<K> {
    entry: Option<(K, TextSurface)>,
    renders: u64,
}

impl<K> Default for TextCache<K> {
    fn default() -> Self {
        Self {
            entry: None,
            renders: 0,
        }
    }
}

impl<K: PartialEq + Clone> TextCache<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached surface for `key`, rendering only if the key changed
    pub fn get_or_render<F>(&mut self, key: &K, render: F) -> &TextSurface
    where
        F: FnOnce(&K) -> TextSurface,
    {
        if !matches!(&self.entry, Some((cached, _)) if cached == key) {
            self.entry = None;
        }
        let renders = &mut self.renders;
        let (_, surface) = self.entry.get_or_insert_with(|| {
            *renders += 1;
            (key.clone(), render(key))
        });
        surface
    }

    /// Drop the cached surface
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// How many times a surface has been rendered
    pub fn renders(&self) -> u64 {
        self.renders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Framebuffer;

    const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    #[test]
    fn test_surface_size() {
        let s = render_text("AB", 1, WHITE);
        assert_eq!((s.width, s.height), (7, 5));

        let s = render_text("AB\n\nC", 2, WHITE);
        assert_eq!((s.width, s.height), (14, 34));
    }

    #[test]
    fn test_glyph_pixels_drawn() {
        // 'I' at scale 1: full top row, center column, full bottom row = 9 pixels
        let s = render_text("I", 1, WHITE);
        let mut fb = Framebuffer::new(10, 10).unwrap();
        s.draw(&mut fb, 2, 3).unwrap();
        assert_eq!(fb.count_color(WHITE), 9);
        assert_eq!(fb.pixel(2, 3), Some(WHITE));
        assert_eq!(fb.pixel(3, 5), Some(WHITE));
        assert_eq!(fb.pixel(2, 5), Some(Rgba::default()));
    }

    #[test]
    fn test_lines_are_centered() {
        // "I" is narrower than "III", so it is shifted right by one advance
        let s = render_text("III\nI", 1, WHITE);
        let second_line: Vec<_> = s.runs().iter().filter(|r| r.y >= 6).collect();
        assert!(second_line.iter().all(|r| r.x >= 4 && r.right() <= 7));
    }

    #[test]
    fn test_lowercase_matches_uppercase() {
        assert_eq!(render_text("score", 2, WHITE), render_text("SCORE", 2, WHITE));
    }

    #[test]
    fn test_cache_renders_only_on_change() {
        let mut cache = TextCache::new();
        let render = |k: &(u32, i32)| render_text(&format!("{} {}", k.0, k.1), 1, WHITE);

        cache.get_or_render(&(0, 3), render);
        cache.get_or_render(&(0, 3), render);
        assert_eq!(cache.renders(), 1);

        let surface = cache.get_or_render(&(10, 3), render).clone();
        assert_eq!(cache.renders(), 2);
        assert_eq!(surface, render(&(10, 3)));

        cache.invalidate();
        cache.get_or_render(&(10, 3), render);
        assert_eq!(cache.renders(), 3);
    }
}
