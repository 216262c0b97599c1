//! The running session: world view, HUD, pause menu and map overlay.

use elendor_core::animation::Animator;
use elendor_core::motion::Direction;
use elendor_core::survival::ItemEffect;
use elendor_core::{PauseReason, Point, Session, SimEventKind};
use macroquad::prelude::*;

use crate::app::{AppState, player_center};
use crate::input::KeyboardInput;
use crate::theme::{
    CANVAS_H, CANVAS_W, LINE_H, draw_label, draw_label_centered, night_tint, palette, text_width,
};
use crate::widget::Rect2;
use crate::widget::bar::draw_bar;
use crate::widget::panel::{draw_panel, draw_panel_titled};

use super::{Screen, ScreenId, Transition};

/// Frames further apart than this are treated as a hidden or stalled window.
const STALL_MS: f64 = 500.0;
const BANNER_SECS: f32 = 2.5;
const MESSAGE_SECS: f32 = 2.0;

/// Play screen state.
pub struct PlayScreen {
    input: KeyboardInput,
    animator: Animator,
    frame: u32,
    banner: Option<(String, f32)>,
    message: Option<(String, f32)>,
    last_frame_ms: Option<f64>,
}

impl Default for PlayScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayScreen {
    /// Create a new play screen.
    pub fn new() -> Self {
        Self {
            input: KeyboardInput::new(),
            animator: Animator::default(),
            frame: 0,
            banner: None,
            message: None,
            last_frame_ms: None,
        }
    }

    fn say(&mut self, text: impl Into<String>) {
        self.message = Some((text.into(), MESSAGE_SECS));
    }

    fn handle_overlay_keys(&mut self, app: &mut AppState) -> Transition {
        let Some(session) = app.session.as_mut() else {
            return Transition::Replace(ScreenId::Title);
        };

        if crate::input::map_pressed() && !session.is_paused_for(PauseReason::Menu) {
            if session.is_paused_for(PauseReason::Map) {
                session.resume_from(PauseReason::Map);
            } else {
                session.pause(PauseReason::Map);
                self.input.release();
            }
        }

        if crate::input::escape_pressed() {
            if session.is_paused_for(PauseReason::Map) {
                session.resume_from(PauseReason::Map);
            } else if session.is_paused_for(PauseReason::Menu) {
                session.resume_from(PauseReason::Menu);
            } else {
                session.pause(PauseReason::Menu);
                self.input.release();
            }
        }

        if session.is_paused_for(PauseReason::Menu) {
            if is_key_pressed(KeyCode::S) {
                match app.save() {
                    Ok(slot) => self.say(format!("Saved to slot {slot}")),
                    Err(e) => self.say(format!("Save failed: {e}")),
                }
            }
            if is_key_pressed(KeyCode::Q) {
                app.quit_session();
                return Transition::Replace(ScreenId::Title);
            }
        }
        Transition::None
    }

    fn handle_actions(&mut self, app: &mut AppState) {
        let Some(session) = app.session.as_mut() else {
            return;
        };
        if session.is_paused() {
            return;
        }

        if session.is_collapsed() {
            if crate::input::enter_pressed() {
                session.respawn();
                session.rest();
                session.apply_item(ItemEffect::Feed(50.0));
                app.snap_camera();
            }
            return;
        }

        if is_key_pressed(KeyCode::Key1) {
            match session.use_item("Small Potion") {
                Some(_) => self.say("Drank a small potion"),
                None => self.say("No potions"),
            }
        }
        if is_key_pressed(KeyCode::Key2) {
            match session.use_item("Rations") {
                Some(_) => self.say("Ate some rations"),
                None => self.say("No rations"),
            }
        }
    }

    fn handle_events(&mut self, session: &mut Session) {
        for event in session.drain_events() {
            match event.kind {
                SimEventKind::ZoneChanged { to: Some(zone), .. } => {
                    self.banner = Some((zone, BANNER_SECS));
                }
                SimEventKind::SprintExhausted
                | SimEventKind::SprintRecovered
                | SimEventKind::Starving
                | SimEventKind::Collapsed
                | SimEventKind::NightFell
                | SimEventKind::DayBroke
                | SimEventKind::RelicCollected { .. } => self.say(event.description),
                _ => {}
            }
        }
    }
}

impl Screen for PlayScreen {
    fn update(&mut self, app: &mut AppState) -> Transition {
        let transition = self.handle_overlay_keys(app);
        if !matches!(transition, Transition::None) {
            return transition;
        }
        self.handle_actions(app);

        let Some(session) = app.session.as_mut() else {
            return Transition::Replace(ScreenId::Title);
        };

        let now_ms = get_time() * 1000.0;
        if self
            .last_frame_ms
            .is_some_and(|last| now_ms - last > STALL_MS)
        {
            session.suspend();
        }
        let dt_ms = self.last_frame_ms.map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_frame_ms = Some(now_ms);

        if !session.is_paused() && !session.is_collapsed() {
            self.input.poll();
        } else {
            self.input.release();
        }
        session.frame_at(now_ms, &mut self.input);
        self.handle_events(session);

        let render = session.render_state();
        self.frame = self
            .animator
            .update(render.movement, render.direction, dt_ms.min(STALL_MS));
        if let Some(camera) = app.camera.as_mut() {
            camera.follow(player_center(session, render.position), dt_ms.min(STALL_MS));
        }

        let dt = dt_ms as f32 / 1000.0;
        for timed in [&mut self.banner, &mut self.message] {
            *timed = timed.take().and_then(|(text, remaining)| {
                let remaining = remaining - dt;
                (remaining > 0.0).then_some((text, remaining))
            });
        }

        Transition::None
    }

    fn draw(&self, app: &AppState) {
        let (Some(session), Some(camera)) = (&app.session, &app.camera) else {
            return;
        };
        let viewport = camera.viewport();
        let scale = (f64::from(CANVAS_W) / viewport.width) as f32;
        let top_left = camera.top_left();

        draw_texture_ex(
            &app.map,
            -(top_left.x as f32) * scale,
            -(top_left.y as f32) * scale,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(
                    app.map.width() * scale,
                    app.map.height() * scale,
                )),
                ..Default::default()
            },
        );

        let view = camera.world_to_view(session.render_state().position);
        draw_player(session, view, scale, self.frame);

        if let Some(tint) = night_tint(session.game_clock()) {
            draw_rectangle(0.0, 0.0, CANVAS_W, CANVAS_H, tint);
        }

        draw_hud(session);

        if let Some((zone, _)) = &self.banner {
            let w = text_width(zone) + 20.0;
            let area = Rect2::new((CANVAS_W - w) / 2.0, 24.0, w, 18.0);
            draw_panel(&area);
            draw_label_centered(zone, area.y + 4.0, palette::YELLOW);
        }
        if let Some((message, _)) = &self.message {
            draw_label_centered(message, CANVAS_H - 16.0, palette::WHITE);
        }

        if session.is_collapsed() {
            draw_rectangle(0.0, 0.0, CANVAS_W, CANVAS_H, palette::SHADE);
            draw_label_centered("You collapsed.", 120.0, palette::RED);
            draw_label_centered("Enter: wake at a spawn point", 134.0, palette::LIGHT_GRAY);
        }

        if session.is_paused_for(PauseReason::Map) {
            draw_map_overlay(app, session);
        } else if session.is_paused_for(PauseReason::Menu) {
            draw_pause_menu(session);
        }
    }
}

fn draw_player(session: &Session, view: Point, scale: f32, frame: u32) {
    let sprite = session.config().motion.sprite;
    let x = view.x as f32 * scale;
    let y = view.y as f32 * scale;
    let w = sprite.width as f32 * scale;
    let h = sprite.height as f32 * scale;

    // Alternate the feet on odd frames.
    let stride = if frame % 2 == 1 { 2.0 * scale } else { 0.0 };
    let foot_y = y + h - 4.0 * scale;
    let foot_w = w / 3.0;
    let foot_h = 4.0 * scale;
    draw_rectangle(x + 2.0 * scale, foot_y, foot_w, foot_h, palette::BROWN);
    draw_rectangle(
        x + w - foot_w - 2.0 * scale + stride,
        foot_y,
        foot_w,
        foot_h,
        palette::BROWN,
    );
    draw_rectangle(x, y, w, h - 4.0 * scale, palette::PEACH);

    let (fx, fy) = match session.direction() {
        Direction::Up => (w / 2.0, 2.0 * scale),
        Direction::Down => (w / 2.0, h / 2.0),
        Direction::Left => (2.0 * scale, h / 3.0),
        Direction::Right => (w - 2.0 * scale, h / 3.0),
    };
    draw_circle(x + fx, y + fy, 2.0 * scale, palette::BLACK);
}

fn draw_hud(session: &Session) {
    let stats = session.stats();
    let area = Rect2::new(4.0, 4.0, 110.0, 76.0);
    draw_panel(&area);
    let inner = area.inset(5.0);
    let row = |i: f32| Rect2::new(inner.x, inner.y + i * 22.0, inner.w, 20.0);
    draw_bar("HP", stats.hp(), stats.max_hp(), &row(0.0), palette::RED);
    let stamina_color = if stats.is_sprint_cooling_down() {
        palette::DARK_GRAY
    } else {
        palette::DARK_GREEN
    };
    draw_bar(
        "Stamina",
        stats.stamina(),
        stats.max_stamina(),
        &row(1.0),
        stamina_color,
    );
    draw_bar(
        "Hunger",
        stats.hunger(),
        stats.max_hunger(),
        &row(2.0),
        palette::BROWN,
    );

    let clock = session.game_clock().to_string();
    let zone = session.current_zone().unwrap_or("Wilds");
    let right = CANVAS_W - 6.0;
    draw_label(&clock, right - text_width(&clock), 6.0, palette::WHITE);
    draw_label(zone, right - text_width(zone), 6.0 + LINE_H, palette::LIGHT_GRAY);
    let relics = format!("Relics {}/8", session.relics().count());
    draw_label(
        &relics,
        right - text_width(&relics),
        6.0 + LINE_H * 2.0,
        palette::YELLOW,
    );
    if session.sprint_toggled() {
        draw_label("RUN", right - text_width("RUN"), 6.0 + LINE_H * 3.0, palette::BLUE);
    }
}

fn draw_pause_menu(session: &Session) {
    draw_rectangle(0.0, 0.0, CANVAS_W, CANVAS_H, palette::SHADE);
    let area = Rect2::centered(200.0, 96.0);
    draw_panel_titled(&area, "Paused");
    let profile = session.profile();
    let mut y = area.y + 20.0;
    let x = area.x + 12.0;
    draw_label(
        &format!("{} the {}", profile.name, profile.archetype),
        x,
        y,
        palette::WHITE,
    );
    y += LINE_H;
    draw_label(
        &format!(
            "Gold {}  ATK {:.0}  DEF {:.1}",
            session.gold(),
            session.attack_rating(),
            session.defense_rating()
        ),
        x,
        y,
        palette::LIGHT_GRAY,
    );
    y += LINE_H;
    draw_label(
        &format!("Visited {} zones", session.visited_zones().len()),
        x,
        y,
        palette::LIGHT_GRAY,
    );
    y += LINE_H * 1.5;
    draw_label("Esc: resume   S: save   Q: quit", x, y, palette::YELLOW);
}

fn draw_map_overlay(app: &AppState, session: &Session) {
    draw_rectangle(0.0, 0.0, CANVAS_W, CANVAS_H, palette::BLACK);
    let world = session.world();
    let scale = ((f64::from(CANVAS_W) - 20.0) / world.width)
        .min((f64::from(CANVAS_H) - 30.0) / world.height) as f32;
    let w = world.width as f32 * scale;
    let h = world.height as f32 * scale;
    let x0 = (CANVAS_W - w) / 2.0;
    let y0 = 20.0;

    draw_label_centered("World Map  (M or Esc to close)", 4.0, palette::LIGHT_GRAY);
    draw_texture_ex(
        &app.map,
        x0,
        y0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(w, h)),
            ..Default::default()
        },
    );

    let p = player_center(session, session.position());
    draw_circle(
        x0 + p.x as f32 * scale,
        y0 + p.y as f32 * scale,
        3.0,
        palette::RED,
    );
}
