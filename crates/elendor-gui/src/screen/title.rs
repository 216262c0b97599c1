//! Title screen: name entry, class choice and continue.

use elendor_core::{Archetype, PlayerProfile};
use macroquad::prelude::*;

use crate::app::AppState;
use crate::theme::{LINE_H, draw_label, draw_label_centered, palette};
use crate::widget::Rect2;
use crate::widget::panel::draw_panel_titled;

use super::{Screen, ScreenId, Transition};

const MAX_NAME_LEN: usize = 16;

/// Title screen state.
pub struct TitleScreen {
    /// Name typed so far.
    pub name: String,
    /// Index into [`Archetype::ALL`].
    pub class_index: usize,
    /// Error message to display.
    pub error: Option<String>,
    can_continue: Option<bool>,
}

impl Default for TitleScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleScreen {
    /// Create a new title screen.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            class_index: Archetype::ALL.len() - 1,
            error: None,
            can_continue: None,
        }
    }

    fn archetype(&self) -> Archetype {
        Archetype::ALL[self.class_index % Archetype::ALL.len()]
    }
}

impl Screen for TitleScreen {
    fn update(&mut self, app: &mut AppState) -> Transition {
        if self.can_continue.is_none() {
            self.can_continue = Some(app.latest_save().is_some());
        }
        if crate::input::escape_pressed() {
            app.should_quit = true;
            return Transition::None;
        }

        for ch in crate::input::typed_chars() {
            if self.name.len() < MAX_NAME_LEN {
                self.name.push(ch);
            }
        }
        if crate::input::backspace_pressed() {
            self.name.pop();
        }

        let count = Archetype::ALL.len();
        if is_key_pressed(KeyCode::Left) {
            self.class_index = (self.class_index + count - 1) % count;
        }
        if is_key_pressed(KeyCode::Right) {
            self.class_index = (self.class_index + 1) % count;
        }

        if is_key_pressed(KeyCode::Tab) {
            match app.latest_save() {
                Some(slot) => match app.continue_from(slot) {
                    Ok(()) => return Transition::Replace(ScreenId::Play),
                    Err(e) => self.error = Some(e),
                },
                None => self.error = Some("no saved game to continue".into()),
            }
        }

        if crate::input::enter_pressed() {
            let name = self.name.trim();
            let name = if name.is_empty() { "Wanderer" } else { name };
            app.start(PlayerProfile::new(name, self.archetype()));
            return Transition::Replace(ScreenId::Play);
        }

        Transition::None
    }

    fn draw(&self, _app: &AppState) {
        draw_label_centered("ELENDOR", 30.0, palette::YELLOW);
        draw_label_centered("Recover the eight relics", 44.0, palette::LIGHT_GRAY);

        let area = Rect2::centered(240.0, 110.0);
        draw_panel_titled(&area, "New Journey");
        let inner = area.inset(10.0);
        let mut y = area.y + 20.0;

        let name = if self.name.is_empty() {
            "Wanderer"
        } else {
            &self.name
        };
        draw_label("Name:", inner.x, y, palette::LIGHT_GRAY);
        draw_label(name, inner.x + 50.0, y, palette::WHITE);
        y += LINE_H * 1.5;

        let archetype = self.archetype();
        let stats = archetype.stats();
        draw_label("Class:", inner.x, y, palette::LIGHT_GRAY);
        draw_label(
            &format!("< {archetype} >"),
            inner.x + 50.0,
            y,
            palette::YELLOW,
        );
        y += LINE_H;
        draw_label(archetype.bonus(), inner.x + 50.0, y, palette::BLUE);
        y += LINE_H;
        draw_label(
            &format!(
                "HP {:.0}  STA {:.0}  ATK {:.0}  DEF {:.1}",
                stats.hp, stats.stamina, stats.damage, stats.armor
            ),
            inner.x + 50.0,
            y,
            palette::LIGHT_GRAY,
        );

        let hint = if self.can_continue == Some(true) {
            "Enter: start   Tab: continue   Esc: quit"
        } else {
            "Enter: start   Esc: quit"
        };
        draw_label_centered(hint, area.y + area.h + 12.0, palette::DARK_GRAY);

        if let Some(error) = &self.error {
            draw_label_centered(error, area.y + area.h + 26.0, palette::RED);
        }
    }
}
