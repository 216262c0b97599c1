//! Stat bar widget for HP, stamina and hunger.

use macroquad::prelude::*;

use super::Rect2;
use crate::theme::{draw_label, palette, text_width};

/// Draw a labeled bar filled to `current / max`.
pub fn draw_bar(label: &str, current: f64, max: f64, area: &Rect2, fill_color: Color) {
    draw_label(label, area.x, area.y, palette::LIGHT_GRAY);

    let bar_x = area.x;
    let bar_y = area.y + 10.0;
    let bar_w = area.w;
    let bar_h = area.h - 10.0;
    super::bordered_rect(bar_x, bar_y, bar_w, bar_h, palette::BLACK, palette::DARK_GRAY);

    let fraction = if max > 0.0 {
        (current / max).clamp(0.0, 1.0) as f32
    } else {
        0.0
    };
    let fill_w = (bar_w - 2.0) * fraction;
    if fill_w > 0.0 {
        draw_rectangle(bar_x + 1.0, bar_y + 1.0, fill_w, bar_h - 2.0, fill_color);
    }

    let value_text = format!("{current:.0}/{max:.0}");
    let text_x = bar_x + (bar_w - text_width(&value_text)) / 2.0;
    draw_label(&value_text, text_x, bar_y, palette::WHITE);
}
