use std::collections::BTreeSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::archetype::PlayerProfile;
use crate::assets::SessionAssets;
use crate::clock::{Cadence, ClockChange, GameClock, SimulationClock};
use crate::config::SessionConfig;
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::geom::{Point, Size};
use crate::input::{InputIntent, InputSource};
use crate::inventory::{Equipment, Inventory, ItemKind, RELIC_NAMES, Relics, find_item};
use crate::motion::{Direction, MotionConfig, MotionController, MovementState};
use crate::snapshot::{PlayerSnapshot, SessionSnapshot, WorldSnapshot};
use crate::survival::{ItemEffect, SurvivalConfig, SurvivalModel, SurvivalStats};

/// Why the simulation is paused. Ticks run only while no reason is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PauseReason {
    /// Pause menu open.
    Menu,
    /// World map overlay open.
    Map,
    /// A location dialog, shop or quest is open.
    Dialog,
}

/// What one render frame did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Fixed ticks run during the frame.
    pub ticks: u32,
    /// Interpolation factor for rendering.
    pub alpha: f64,
}

/// Player state as seen by the render layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    /// Position interpolated between the last two ticks.
    pub position: Point,
    /// Facing.
    pub direction: Direction,
    /// Movement state from the last tick.
    pub movement: MovementState,
}

/// Read-only view of the player after the latest tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// Ticks run so far.
    pub tick: u64,
    /// Sprite position.
    pub position: Point,
    /// Facing.
    pub direction: Direction,
    /// Movement state.
    pub movement: MovementState,
    /// HP, stamina and hunger.
    pub stats: SurvivalStats,
    /// In-game time.
    pub clock: GameClock,
    /// Zone under the player's feet.
    pub zone: Option<String>,
}

/// One play session: the single owner and tick driver of all mutable
/// simulation state.
///
/// Each fixed tick runs motion, the zone check, survival and the game clock,
/// in that order. Mutators such as [`Session::heal`] apply between ticks.
pub struct Session {
    config: SessionConfig,
    profile: PlayerProfile,
    assets: SessionAssets,
    clock: SimulationClock,
    game_clock: GameClock,
    minute: Cadence,
    motion: MotionController,
    survival: SurvivalModel,
    previous_position: Point,
    zone: Option<String>,
    visited: BTreeSet<String>,
    events: EventLog,
    rng: StdRng,
    pauses: BTreeSet<PauseReason>,
    gold: u32,
    damage: f64,
    armor: f64,
    inventory: Inventory,
    equipment: Equipment,
    relics: Relics,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("player", &self.profile.name)
            .field("tick", &self.clock.tick())
            .field("position", &self.motion.position())
            .field("zone", &self.zone)
            .field("events", &self.events.len())
            .finish()
    }
}

fn motion_config_for(config: &SessionConfig, profile: &PlayerProfile) -> MotionConfig {
    let mut motion = config.motion.clone();
    motion.run_multiplier *= profile.archetype.run_speed_factor();
    motion
}

fn survival_config_for(config: &SessionConfig, profile: &PlayerProfile) -> SurvivalConfig {
    let mut survival = config.survival.clone();
    survival.stamina_regen_per_sec *= profile.archetype.stamina_regen_factor();
    survival
}

impl Session {
    /// Start a session: pick a spawn and build fresh state for `profile`.
    ///
    /// Spawn picks, here and on respawn, draw from an rng seeded with
    /// `config.seed`.
    pub fn start(assets: SessionAssets, config: SessionConfig, profile: PlayerProfile) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let spawn = assets.spawns.random_spawn(&mut rng);
        let tick_ms = config.clock.tick_ms();

        let base = profile.archetype.stats();
        let stats = SurvivalStats::new(base.hp, base.stamina, base.hunger);
        let motion = MotionController::new(
            motion_config_for(&config, &profile),
            assets.world,
            spawn,
        );
        let survival = SurvivalModel::new(survival_config_for(&config, &profile), stats, tick_ms);

        let mut session = Self {
            clock: SimulationClock::new(tick_ms, config.clock.max_frame_delta_ms),
            game_clock: GameClock::new(
                config.clock.start_day,
                config.clock.start_hour,
                config.clock.start_minute,
            ),
            minute: Cadence::from_period_ms(config.clock.minute_period_ms, tick_ms),
            previous_position: motion.position(),
            motion,
            survival,
            zone: None,
            visited: BTreeSet::new(),
            events: EventLog::new(config.max_events),
            rng,
            pauses: BTreeSet::new(),
            gold: base.gold,
            damage: base.damage,
            armor: base.armor,
            inventory: Inventory::new(),
            equipment: Equipment::default(),
            relics: Relics::default(),
            assets,
            config,
            profile,
        };
        session.zone = session.zone_under_feet();
        if let Some(zone) = &session.zone {
            session.visited.insert(zone.clone());
        }

        let p = session.motion.position();
        info!(
            player = %session.profile.name,
            class = %session.profile.archetype,
            x = p.x,
            y = p.y,
            "session started"
        );
        session
    }

    /// Start a session and immediately restore a snapshot into it.
    pub fn resume(assets: SessionAssets, config: SessionConfig, snapshot: &SessionSnapshot) -> Self {
        let mut session = Self::start(assets, config, snapshot.player.profile.clone());
        session.apply_snapshot(snapshot);
        session
    }

    // -----------------------------------------------------------------------
    // Tick driving
    // -----------------------------------------------------------------------

    /// Feed a render frame's delta. Runs every fixed tick that became due,
    /// sampling `input` once per tick.
    pub fn frame(&mut self, delta_ms: f64, input: &mut impl InputSource) -> FrameReport {
        let mut clock = std::mem::take(&mut self.clock);
        let ticks = clock.advance(delta_ms, |tick| {
            let intent = input.sample(tick);
            self.step(tick, &intent);
        });
        self.clock = clock;
        FrameReport {
            ticks,
            alpha: self.clock.alpha(),
        }
    }

    /// Feed an absolute frame timestamp instead of a delta.
    pub fn frame_at(&mut self, now_ms: f64, input: &mut impl InputSource) -> FrameReport {
        let mut clock = std::mem::take(&mut self.clock);
        let ticks = clock.frame(now_ms, |tick| {
            let intent = input.sample(tick);
            self.step(tick, &intent);
        });
        self.clock = clock;
        FrameReport {
            ticks,
            alpha: self.clock.alpha(),
        }
    }

    /// Run a single tick outside frame pacing. Returns `false` while paused.
    pub fn tick_once(&mut self, input: &mut impl InputSource) -> bool {
        let mut clock = std::mem::take(&mut self.clock);
        let ran = clock.tick_once(|tick| {
            let intent = input.sample(tick);
            self.step(tick, &intent);
        });
        self.clock = clock;
        ran
    }

    /// Run `n` ticks back to back (one tick-length frame each). Does nothing
    /// while paused.
    pub fn run_ticks(&mut self, n: u64, input: &mut impl InputSource) -> u64 {
        let tick_ms = self.clock.tick_ms();
        (0..n)
            .map(|_| u64::from(self.frame(tick_ms, input).ticks))
            .sum()
    }

    fn step(&mut self, tick: u64, intent: &InputIntent) {
        self.previous_position = self.motion.position();

        let outcome = self.motion.step(
            intent,
            self.survival.can_sprint(),
            &self.assets.collision,
            &self.assets.terrain,
        );
        if outcome.moved {
            self.update_zone(tick);
        }

        if self.survival.tick(outcome.running, tick, &mut self.events) {
            self.motion.stop_sprint();
        }

        if self.minute.tick() {
            let change = self.game_clock.advance_minute();
            self.emit_clock_events(tick, change);
        }
    }

    fn zone_under_feet(&self) -> Option<String> {
        let feet = self.motion.feet();
        self.assets
            .locations
            .resolve(feet.x, feet.y)
            .map(str::to_string)
    }

    fn update_zone(&mut self, tick: u64) {
        let zone = self.zone_under_feet();
        if zone == self.zone {
            return;
        }
        let description = match (&zone, &self.zone) {
            (Some(to), _) => format!("entered {to}"),
            (None, Some(from)) => format!("left {from}"),
            (None, None) => String::new(),
        };
        if let Some(name) = &zone {
            self.visited.insert(name.clone());
        }
        debug!(tick, from = ?self.zone, to = ?zone, "zone changed");
        let from = std::mem::replace(&mut self.zone, zone.clone());
        self.events
            .emit(tick, SimEventKind::ZoneChanged { from, to: zone }, description);
    }

    fn emit_clock_events(&mut self, tick: u64, change: ClockChange) {
        if change.hour_changed {
            let hour = self.game_clock.hours();
            self.events.emit(
                tick,
                SimEventKind::HourChanged { hour },
                format!("it is now {hour:02}:00"),
            );
        }
        match change.night_changed {
            Some(true) => self.events.emit(tick, SimEventKind::NightFell, "night falls"),
            Some(false) => self.events.emit(tick, SimEventKind::DayBroke, "the sun rises"),
            None => {}
        }
        if change.new_day {
            let day = self.game_clock.day();
            self.events
                .emit(tick, SimEventKind::NewDay { day }, format!("day {day} begins"));
        }
    }

    // -----------------------------------------------------------------------
    // Pausing
    // -----------------------------------------------------------------------

    /// Pause for a reason. Any backlog is dropped.
    pub fn pause(&mut self, reason: PauseReason) {
        self.pauses.insert(reason);
        self.clock.pause();
    }

    /// Clear a pause reason. Ticks resume once no reason remains.
    pub fn resume_from(&mut self, reason: PauseReason) {
        self.pauses.remove(&reason);
        if self.pauses.is_empty() && self.clock.is_paused() {
            self.clock.resume();
        }
    }

    /// Whether any pause reason is active.
    pub fn is_paused(&self) -> bool {
        !self.pauses.is_empty()
    }

    /// Whether a specific pause reason is active.
    pub fn is_paused_for(&self, reason: PauseReason) -> bool {
        self.pauses.contains(&reason)
    }

    /// The window lost visibility: forget frame timing without a catch-up burst.
    pub fn suspend(&mut self) {
        self.clock.suspend();
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Ticks run so far.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Tick length in milliseconds.
    pub fn tick_ms(&self) -> f64 {
        self.clock.tick_ms()
    }

    /// Current sprite position.
    pub fn position(&self) -> Point {
        self.motion.position()
    }

    /// Current facing.
    pub fn direction(&self) -> Direction {
        self.motion.direction()
    }

    /// Movement state from the last tick.
    pub fn movement_state(&self) -> MovementState {
        self.motion.state()
    }

    /// Whether the sprint toggle is on.
    pub fn sprint_toggled(&self) -> bool {
        self.motion.sprint_toggled()
    }

    /// HP, stamina and hunger.
    pub fn stats(&self) -> &SurvivalStats {
        self.survival.stats()
    }

    /// In-game time.
    pub fn game_clock(&self) -> &GameClock {
        &self.game_clock
    }

    /// Zone under the player's feet.
    pub fn current_zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// Zones entered at least once.
    pub fn visited_zones(&self) -> &BTreeSet<String> {
        &self.visited
    }

    /// Name and class.
    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    /// Gold carried.
    pub fn gold(&self) -> u32 {
        self.gold
    }

    /// Attack rating including the equipped weapon.
    pub fn attack_rating(&self) -> f64 {
        self.damage + equipped_bonus(self.equipment.weapon.as_deref())
    }

    /// Armor rating including equipped armor.
    pub fn defense_rating(&self) -> f64 {
        self.armor + equipped_bonus(self.equipment.armor.as_deref())
    }

    /// Carried items.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Equipped items.
    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    /// Relic progress.
    pub fn relics(&self) -> &Relics {
        &self.relics
    }

    /// World size.
    pub fn world(&self) -> Size {
        self.assets.world
    }

    /// The world indexes.
    pub fn assets(&self) -> &SessionAssets {
        &self.assets
    }

    /// Active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Interpolation factor toward the next tick.
    pub fn alpha(&self) -> f64 {
        self.clock.alpha()
    }

    /// Player state after the latest tick.
    pub fn state(&self) -> PlayerState {
        PlayerState {
            tick: self.tick(),
            position: self.position(),
            direction: self.direction(),
            movement: self.movement_state(),
            stats: self.stats().clone(),
            clock: self.game_clock,
            zone: self.zone.clone(),
        }
    }

    /// State for drawing, interpolated between the last two ticks.
    pub fn render_state(&self) -> RenderState {
        RenderState {
            position: self.previous_position.lerp(self.position(), self.alpha()),
            direction: self.direction(),
            movement: self.movement_state(),
        }
    }

    /// Pending events, oldest first.
    pub fn events(&self) -> &[SimEvent] {
        self.events.events()
    }

    /// Take all pending events.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    /// Events discarded because nobody drained the log in time.
    pub fn dropped_events(&self) -> u64 {
        self.events.dropped()
    }

    /// Whether every relic has been collected.
    pub fn has_won(&self) -> bool {
        self.relics.is_complete()
    }

    /// Whether HP has run out.
    pub fn is_collapsed(&self) -> bool {
        self.stats().hp() <= 0.0
    }

    // -----------------------------------------------------------------------
    // Mutators (between ticks)
    // -----------------------------------------------------------------------

    /// Restore HP.
    pub fn heal(&mut self, amount: f64) {
        self.survival.heal(amount);
    }

    /// Apply a consumable effect directly.
    pub fn apply_item(&mut self, effect: ItemEffect) {
        self.survival.apply_effect(effect);
    }

    /// Consume one of a carried consumable. Returns its effect, or `None` if
    /// the item is unknown, not consumable, or not carried.
    pub fn use_item(&mut self, name: &str) -> Option<ItemEffect> {
        let item = find_item(name)?;
        let ItemKind::Consumable(effect) = item.kind else {
            return None;
        };
        if !self.inventory.remove(item.name, 1) {
            return None;
        }
        self.survival.apply_effect(effect);
        Some(effect)
    }

    /// Add catalog items to the inventory under their catalog spelling.
    /// Returns `false` for unknown names.
    pub fn add_item(&mut self, name: &str, count: u32) -> bool {
        let Some(item) = find_item(name) else {
            return false;
        };
        self.inventory.add(item.name, count);
        true
    }

    /// Add gold.
    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Buy one item from the catalog. Fails if unknown or unaffordable.
    pub fn buy(&mut self, name: &str) -> bool {
        let Some(item) = find_item(name) else {
            return false;
        };
        if self.gold < item.price {
            return false;
        }
        self.gold -= item.price;
        self.inventory.add(item.name, 1);
        true
    }

    /// Equip a carried weapon or armor. Returns whether it was equipped.
    pub fn equip(&mut self, name: &str) -> bool {
        let Some(item) = find_item(name) else {
            return false;
        };
        if self.inventory.count(item.name) == 0 {
            return false;
        }
        match item.kind {
            ItemKind::Weapon { .. } => self.equipment.weapon = Some(item.name.to_string()),
            ItemKind::Armor { .. } => self.equipment.armor = Some(item.name.to_string()),
            ItemKind::Consumable(_) => return false,
        }
        true
    }

    /// Sleep: HP and stamina to max.
    pub fn rest(&mut self) {
        self.survival.rest();
    }

    /// Turn the sprint toggle on or off.
    pub fn set_sprint_toggle(&mut self, on: bool) {
        self.motion.set_sprint_toggle(on);
    }

    /// Move the player directly, clamped into the world. Fires a zone event
    /// if the zone changes.
    pub fn teleport(&mut self, target: Point) {
        self.motion.teleport(target);
        self.previous_position = self.motion.position();
        self.update_zone(self.tick());
    }

    /// Move to a fresh random spawn point.
    pub fn respawn(&mut self) -> Point {
        let spawn = self.assets.spawns.random_spawn(&mut self.rng);
        self.teleport(spawn);
        let p = self.position();
        self.events.emit(
            self.tick(),
            SimEventKind::Respawned,
            format!("respawned at ({:.0}, {:.0})", p.x, p.y),
        );
        p
    }

    /// Mark a relic collected. Returns `true` if it was newly collected.
    pub fn collect_relic(&mut self, index: usize) -> bool {
        if self.relics.collect(index) != Some(true) {
            return false;
        }
        let collected = self.relics.count();
        self.events.emit(
            self.tick(),
            SimEventKind::RelicCollected { index, collected },
            format!("found the {} ({collected}/8)", RELIC_NAMES[index]),
        );
        true
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Capture everything needed to resume. Reads state only.
    pub fn export_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            player: PlayerSnapshot {
                profile: self.profile.clone(),
                position: self.position(),
                direction: self.direction(),
                stats: self.stats().clone(),
                gold: self.gold,
                damage: self.damage,
                armor: self.armor,
                inventory: self.inventory.clone(),
                equipment: self.equipment.clone(),
                relics: self.relics,
                hunger_progress: self.survival.hunger_progress(),
            },
            world: WorldSnapshot {
                clock: self.game_clock,
                visited_zones: self.visited.clone(),
                minute_progress: self.minute.elapsed(),
            },
        }
    }

    /// Overwrite session state from a snapshot. The tick counter, pause
    /// state and pending events are left alone.
    pub fn apply_snapshot(&mut self, snapshot: &SessionSnapshot) {
        let player = &snapshot.player;
        self.profile = player.profile.clone();

        let tick_ms = self.clock.tick_ms();
        let mut motion = MotionController::new(
            motion_config_for(&self.config, &self.profile),
            self.assets.world,
            player.position,
        );
        motion.face(player.direction);
        self.motion = motion;
        self.survival = SurvivalModel::new(
            survival_config_for(&self.config, &self.profile),
            player.stats.clone(),
            tick_ms,
        );
        self.survival.set_hunger_progress(player.hunger_progress);
        self.previous_position = self.motion.position();

        self.gold = player.gold;
        self.damage = player.damage;
        self.armor = player.armor;
        self.inventory = player.inventory.clone();
        self.equipment = player.equipment.clone();
        self.relics = player.relics;

        self.game_clock = snapshot.world.clock;
        self.minute.reset();
        self.minute.set_elapsed(snapshot.world.minute_progress);
        self.visited = snapshot.world.visited_zones.clone();
        self.zone = self.zone_under_feet();
        if let Some(zone) = &self.zone {
            self.visited.insert(zone.clone());
        }
    }

    /// End the session, returning its final snapshot.
    pub fn end(self) -> SessionSnapshot {
        info!(player = %self.profile.name, tick = self.tick(), "session ended");
        self.export_snapshot()
    }
}

fn equipped_bonus(name: Option<&str>) -> f64 {
    match name.and_then(find_item).map(|item| item.kind) {
        Some(ItemKind::Weapon { damage }) => damage,
        Some(ItemKind::Armor { defense }) => defense,
        _ => 0.0,
    }
}
