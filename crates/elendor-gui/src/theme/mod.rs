//! Visual theme: color palette, text helpers, and virtual canvas scaling.

use elendor_core::GameClock;
use macroquad::prelude::*;

/// Virtual canvas width in pixels. The window scales this up.
pub const CANVAS_W: f32 = 480.0;
/// Virtual canvas height in pixels. The window scales this up.
pub const CANVAS_H: f32 = 270.0;

/// Font size for all canvas text.
pub const TEXT_SIZE: u16 = 10;
/// Line height for stacked labels.
pub const LINE_H: f32 = 11.0;

/// 16-color PICO-8-inspired palette.
pub mod palette {
    use macroquad::prelude::Color;

    /// Black background.
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    /// Dark blue for deep backgrounds.
    pub const DARK_BLUE: Color = Color::new(0.114, 0.169, 0.326, 1.0);
    /// Dark green for stamina.
    pub const DARK_GREEN: Color = Color::new(0.0, 0.529, 0.320, 1.0);
    /// Brown for hunger.
    pub const BROWN: Color = Color::new(0.671, 0.322, 0.212, 1.0);
    /// Dark gray for inactive elements.
    pub const DARK_GRAY: Color = Color::new(0.373, 0.341, 0.310, 1.0);
    /// Light gray for borders and secondary text.
    pub const LIGHT_GRAY: Color = Color::new(0.761, 0.765, 0.780, 1.0);
    /// White for primary text.
    pub const WHITE: Color = Color::new(1.0, 0.945, 0.910, 1.0);
    /// Red for HP and danger.
    pub const RED: Color = Color::new(1.0, 0.0, 0.302, 1.0);
    /// Orange for warnings.
    pub const ORANGE: Color = Color::new(1.0, 0.639, 0.0, 1.0);
    /// Yellow for highlights.
    pub const YELLOW: Color = Color::new(1.0, 0.925, 0.153, 1.0);
    /// Blue for info.
    pub const BLUE: Color = Color::new(0.161, 0.678, 1.0, 1.0);
    /// Peach for the player.
    pub const PEACH: Color = Color::new(1.0, 0.800, 0.667, 1.0);
    /// Translucent black for overlays.
    pub const SHADE: Color = Color::new(0.0, 0.0, 0.0, 0.6);
}

/// Draw text with its top-left corner at `(x, y)`.
pub fn draw_label(text: &str, x: f32, y: f32, color: Color) {
    draw_text(text, x, y + f32::from(TEXT_SIZE) * 0.8, f32::from(TEXT_SIZE), color);
}

/// Width of `text` at the canvas font size.
pub fn text_width(text: &str) -> f32 {
    measure_text(text, None, TEXT_SIZE, 1.0).width
}

/// Draw text centered horizontally on the canvas.
pub fn draw_label_centered(text: &str, y: f32, color: Color) {
    draw_label(text, (CANVAS_W - text_width(text)) / 2.0, y, color);
}

/// Night tint laid over the world, or `None` during the day.
pub fn night_tint(clock: &GameClock) -> Option<Color> {
    clock
        .is_night()
        .then_some(Color::new(0.05, 0.05, 0.2, 0.45))
}

/// Set up a `Camera2D` that maps the virtual canvas to the current window.
pub fn setup_virtual_canvas() {
    let scale_x = screen_width() / CANVAS_W;
    let scale_y = screen_height() / CANVAS_H;
    let scale = scale_x.min(scale_y);

    let viewport_w = CANVAS_W * scale;
    let viewport_h = CANVAS_H * scale;
    let offset_x = (screen_width() - viewport_w) / 2.0;
    let offset_y = (screen_height() - viewport_h) / 2.0;

    set_camera(&Camera2D {
        zoom: vec2(2.0 / CANVAS_W, 2.0 / CANVAS_H),
        target: vec2(CANVAS_W / 2.0, CANVAS_H / 2.0),
        viewport: Some((
            offset_x as i32,
            offset_y as i32,
            viewport_w as i32,
            viewport_h as i32,
        )),
        ..Default::default()
    });
}
