//! Pixel art panel with border and fill.

use macroquad::prelude::*;

use super::Rect2;
use crate::theme::{draw_label, palette, text_width};

/// Draw a panel with pixel art borders.
pub fn draw_panel(area: &Rect2) {
    super::double_bordered_rect(
        area.x,
        area.y,
        area.w,
        area.h,
        palette::DARK_BLUE,
        palette::LIGHT_GRAY,
    );
}

/// Draw a panel with a title inside the top area.
///
/// The title occupies the first 12px inside the panel. Content should
/// start at `area.y + 16.0`.
pub fn draw_panel_titled(area: &Rect2, title: &str) {
    draw_panel(area);
    draw_rectangle(area.x + 2.0, area.y + 2.0, area.w - 4.0, 12.0, palette::BLACK);
    let title_x = area.x + (area.w - text_width(title)) / 2.0;
    draw_label(title, title_x, area.y + 3.0, palette::WHITE);
}
