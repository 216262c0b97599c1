//! Pixel art window for Elendor: macroquad entry point.
//!
//! Manages the screen stack and main render loop. The virtual canvas
//! (480x270) is scaled to fit the window, giving pixel-perfect rendering.

use macroquad::prelude::*;
use tracing::{Level, error};
use tracing_subscriber::EnvFilter;

use elendor_gui::app::{AppState, LaunchOptions};
use elendor_gui::screen::play::PlayScreen;
use elendor_gui::screen::title::TitleScreen;
use elendor_gui::screen::{Screen, ScreenId, Transition};
use elendor_gui::theme::palette;
use elendor_gui::theme::{CANVAS_H, CANVAS_W, setup_virtual_canvas};

/// Create a screen instance for a given screen id.
fn make_screen(id: ScreenId) -> Box<dyn Screen> {
    match id {
        ScreenId::Title => Box::new(TitleScreen::new()),
        ScreenId::Play => Box::new(PlayScreen::new()),
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Elendor".to_owned(),
        window_width: (CANVAS_W * 2.0) as i32,
        window_height: (CANVAS_H * 2.0) as i32,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let options = LaunchOptions::from_args(&args);

    let mut app = match AppState::load(&options) {
        Ok(app) => app,
        Err(e) => {
            error!(assets = %options.assets_dir.display(), "startup failed: {e}");
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let mut screens: Vec<Box<dyn Screen>> = vec![make_screen(ScreenId::Title)];

    loop {
        // Letterbox bars
        clear_background(palette::BLACK);
        setup_virtual_canvas();
        draw_rectangle(0.0, 0.0, CANVAS_W, CANVAS_H, palette::DARK_BLUE);

        if let Some(screen) = screens.last_mut() {
            match screen.update(&mut app) {
                Transition::Replace(id) => {
                    screens.pop();
                    screens.push(make_screen(id));
                }
                Transition::None => {}
            }
        }

        // The top screen may have changed after the transition.
        if let Some(screen) = screens.last() {
            screen.draw(&app);
        }

        if app.should_quit || screens.is_empty() {
            app.quit_session();
            break;
        }

        next_frame().await;
    }
}
