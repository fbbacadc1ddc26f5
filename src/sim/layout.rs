//! Brick layout strategies
//!
//! A layout is a settings-only factory: it produces a fresh brick sequence
//! every time it is asked and keeps no reference to what it created.

use super::rect::Rect;
use super::state::Brick;
use crate::settings::{RowLayoutSettings, Tier};

/// Produces the initial brick set for a field
pub trait LayoutStrategy {
    fn create_bricks(&self) -> Vec<Brick>;
}

/// Rectangular grid of bricks; even rows use the low tier, odd rows the high tier
#[derive(Debug, Clone)]
pub struct RowLayout {
    settings: RowLayoutSettings,
}

impl RowLayout {
    pub fn new(settings: &RowLayoutSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    pub fn settings(&self) -> &RowLayoutSettings {
        &self.settings
    }

    fn tier_for_row(&self, row: u32) -> &Tier {
        if row % 2 == 0 {
            &self.settings.low_tier
        } else {
            &self.settings.high_tier
        }
    }
}

impl LayoutStrategy for RowLayout {
    fn create_bricks(&self) -> Vec<Brick> {
        let s = &self.settings;
        let capacity = s
            .brick_rows
            .checked_mul(s.brick_cols)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        let mut bricks = Vec::with_capacity(capacity);

        for row in 0..s.brick_rows {
            let tier = self.tier_for_row(row);
            let Some(y) = grid_offset(s.starting_row.checked_add(row), s.brick_height) else {
                log::warn!("Brick row {row} is out of range, layout truncated");
                break;
            };
            for col in 0..s.brick_cols {
                let Some(x) = grid_offset(Some(col), s.brick_width) else {
                    log::warn!("Brick column {col} is out of range, row truncated");
                    break;
                };
                let rect = Rect::new(
                    x,
                    y,
                    s.brick_width - s.brick_spacing,
                    s.brick_height - s.brick_spacing,
                );
                bricks.push(Brick::new(rect, tier.points, tier.color));
            }
        }

        log::debug!(
            "Row layout created {} bricks ({}x{})",
            bricks.len(),
            s.brick_rows,
            s.brick_cols
        );
        bricks
    }
}

/// Pixel offset of grid cell `index`, if it fits in an `i32`
fn grid_offset(index: Option<u32>, cell: i32) -> Option<i32> {
    i32::try_from(index?).ok()?.checked_mul(cell)
}

/// Any closure returning bricks is a layout too
impl<F> LayoutStrategy for F
where
    F: Fn() -> Vec<Brick>,
{
    fn create_bricks(&self) -> Vec<Brick> {
        self()
    }
}
