use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::Cadence;
use crate::event::{EventLog, SimEventKind};

/// Rates and thresholds for stamina, hunger and HP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalConfig {
    /// Stamina lost per second of sprinting.
    pub stamina_drain_per_sec: f64,
    /// Stamina regained per second while not sprinting.
    pub stamina_regen_per_sec: f64,
    /// Floor stamina drains to; sprinting requires stamina above it.
    pub stamina_threshold: f64,
    /// Lockout after exhaustion before sprinting is allowed again.
    pub sprint_cooldown_ms: f64,
    /// Hunger lost per hunger period.
    pub hunger_decay: f64,
    /// Simulated time between hunger decrements.
    pub hunger_period_ms: f64,
    /// HP lost per hunger period while hunger is empty.
    pub starvation_damage: f64,
}

impl Default for SurvivalConfig {
    fn default() -> Self {
        Self {
            stamina_drain_per_sec: 5.0,
            stamina_regen_per_sec: 3.0,
            stamina_threshold: 0.0,
            sprint_cooldown_ms: 3000.0,
            hunger_decay: 0.75,
            hunger_period_ms: 30_000.0,
            starvation_damage: 2.0,
        }
    }
}

impl SurvivalConfig {
    /// Set the stamina drain while sprinting.
    pub fn with_stamina_drain(mut self, per_sec: f64) -> Self {
        self.stamina_drain_per_sec = per_sec;
        self
    }

    /// Set the stamina regeneration rate.
    pub fn with_stamina_regen(mut self, per_sec: f64) -> Self {
        self.stamina_regen_per_sec = per_sec;
        self
    }

    /// Set the sprint lockout duration.
    pub fn with_sprint_cooldown(mut self, ms: f64) -> Self {
        self.sprint_cooldown_ms = ms;
        self
    }

    /// Set hunger decay amount and period.
    pub fn with_hunger(mut self, decay: f64, period_ms: f64) -> Self {
        self.hunger_decay = decay;
        self.hunger_period_ms = period_ms;
        self
    }

    /// Set HP lost per hunger period while starving.
    pub fn with_starvation_damage(mut self, damage: f64) -> Self {
        self.starvation_damage = damage;
        self
    }
}

/// HP, stamina and hunger of the player, each kept within `0..=max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalStats {
    hp: f64,
    max_hp: f64,
    stamina: f64,
    max_stamina: f64,
    hunger: f64,
    max_hunger: f64,
    is_sprint_cooling_down: bool,
    cooldown_elapsed_ms: f64,
}

/// Upper bound for hunger.
pub const MAX_HUNGER: f64 = 100.0;

impl SurvivalStats {
    /// Fresh stats: HP and stamina full, hunger at `hunger`.
    pub fn new(max_hp: f64, max_stamina: f64, hunger: f64) -> Self {
        let max_hp = max_hp.max(0.0);
        let max_stamina = max_stamina.max(0.0);
        Self {
            hp: max_hp,
            max_hp,
            stamina: max_stamina,
            max_stamina,
            hunger: hunger.clamp(0.0, MAX_HUNGER),
            max_hunger: MAX_HUNGER,
            is_sprint_cooling_down: false,
            cooldown_elapsed_ms: 0.0,
        }
    }

    /// Overwrite the current values, clamped into range.
    pub fn with_current(mut self, hp: f64, stamina: f64, hunger: f64) -> Self {
        self.hp = hp.clamp(0.0, self.max_hp);
        self.stamina = stamina.clamp(0.0, self.max_stamina);
        self.hunger = hunger.clamp(0.0, self.max_hunger);
        self
    }

    /// Current HP.
    pub fn hp(&self) -> f64 {
        self.hp
    }

    /// Maximum HP.
    pub fn max_hp(&self) -> f64 {
        self.max_hp
    }

    /// Current stamina.
    pub fn stamina(&self) -> f64 {
        self.stamina
    }

    /// Maximum stamina.
    pub fn max_stamina(&self) -> f64 {
        self.max_stamina
    }

    /// Current hunger (100 is sated).
    pub fn hunger(&self) -> f64 {
        self.hunger
    }

    /// Maximum hunger.
    pub fn max_hunger(&self) -> f64 {
        self.max_hunger
    }

    /// Whether the post-exhaustion sprint lockout is active.
    pub fn is_sprint_cooling_down(&self) -> bool {
        self.is_sprint_cooling_down
    }

    /// Time spent in the current lockout.
    pub fn cooldown_elapsed_ms(&self) -> f64 {
        self.cooldown_elapsed_ms
    }

    /// The same stats forced back into range. Maxima become finite and
    /// non-negative, current values land in `0..=max`, and a cooldown only
    /// carries elapsed time while it is active.
    pub fn sanitized(self) -> Self {
        let max_hp = non_negative(self.max_hp);
        let max_stamina = non_negative(self.max_stamina);
        let max_hunger = if self.max_hunger.is_finite() && self.max_hunger > 0.0 {
            self.max_hunger.min(MAX_HUNGER)
        } else {
            MAX_HUNGER
        };
        let cooldown_elapsed_ms = if self.is_sprint_cooling_down {
            non_negative(self.cooldown_elapsed_ms)
        } else {
            0.0
        };
        Self {
            hp: bounded(self.hp, max_hp),
            max_hp,
            stamina: bounded(self.stamina, max_stamina),
            max_stamina,
            hunger: bounded(self.hunger, max_hunger),
            max_hunger,
            is_sprint_cooling_down: self.is_sprint_cooling_down,
            cooldown_elapsed_ms,
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

// NaN and infinities read as empty.
fn bounded(value: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        0.0
    }
}

/// A consumable's effect on the stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "amount")]
pub enum ItemEffect {
    /// Restore HP.
    Heal(f64),
    /// Restore hunger.
    Feed(f64),
    /// Restore stamina.
    Refresh(f64),
}

/// Advances [`SurvivalStats`] once per fixed tick.
///
/// All periodic effects run on tick counts derived from the tick length at
/// construction, so they stay in lockstep with the simulation clock.
#[derive(Debug, Clone)]
pub struct SurvivalModel {
    config: SurvivalConfig,
    stats: SurvivalStats,
    tick_ms: f64,
    hunger: Cadence,
    cooldown: Cadence,
    cooldown_ticks: u64,
}

impl SurvivalModel {
    /// Create a model ticking every `tick_ms`. Out-of-range stats are
    /// clamped first.
    pub fn new(config: SurvivalConfig, stats: SurvivalStats, tick_ms: f64) -> Self {
        let stats = stats.sanitized();
        let hunger = Cadence::from_period_ms(config.hunger_period_ms, tick_ms);
        let cooldown = Cadence::from_period_ms(config.sprint_cooldown_ms, tick_ms);
        let cooldown_ticks = cooldown.period();
        let mut model = Self {
            config,
            stats,
            tick_ms,
            hunger,
            cooldown,
            cooldown_ticks,
        };
        model.sync_cooldown_cadence();
        model
    }

    /// Current stats.
    pub fn stats(&self) -> &SurvivalStats {
        &self.stats
    }

    /// Active configuration.
    pub fn config(&self) -> &SurvivalConfig {
        &self.config
    }

    /// Length of the sprint lockout in ticks.
    pub fn cooldown_ticks(&self) -> u64 {
        self.cooldown_ticks
    }

    /// Whether a sprint may start or continue this tick.
    pub fn can_sprint(&self) -> bool {
        self.stats.stamina > self.config.stamina_threshold && !self.stats.is_sprint_cooling_down
    }

    /// Advance one tick. `sprinting` is this tick's resolved movement state.
    /// Returns `true` if sprinting was forced off by exhaustion.
    pub fn tick(&mut self, sprinting: bool, tick: u64, events: &mut EventLog) -> bool {
        let exhausted = self.tick_stamina(sprinting, tick, events);
        self.tick_hunger(tick, events);
        exhausted
    }

    fn tick_stamina(&mut self, sprinting: bool, tick: u64, events: &mut EventLog) -> bool {
        let seconds = self.tick_ms / 1000.0;
        let threshold = self.config.stamina_threshold;
        let stats = &mut self.stats;

        if stats.is_sprint_cooling_down {
            stats.cooldown_elapsed_ms += self.tick_ms;
            if self.cooldown.tick() {
                stats.is_sprint_cooling_down = false;
                stats.cooldown_elapsed_ms = 0.0;
                events.emit(tick, SimEventKind::SprintRecovered, "sprint available again");
            }
        }

        if sprinting && stats.stamina > threshold && !stats.is_sprint_cooling_down {
            let drain = self.config.stamina_drain_per_sec * seconds;
            stats.stamina = (stats.stamina - drain).max(threshold);
            if stats.stamina <= threshold {
                stats.is_sprint_cooling_down = true;
                stats.cooldown_elapsed_ms = 0.0;
                self.cooldown.reset();
                debug!(tick, "stamina exhausted, sprint locked out");
                events.emit(tick, SimEventKind::SprintExhausted, "too exhausted to keep running");
                return true;
            }
        } else {
            let regen = self.config.stamina_regen_per_sec * seconds;
            stats.stamina = (stats.stamina + regen).min(stats.max_stamina);
        }
        false
    }

    fn tick_hunger(&mut self, tick: u64, events: &mut EventLog) {
        if !self.hunger.tick() {
            return;
        }
        let stats = &mut self.stats;
        let was_fed = stats.hunger > 0.0;
        stats.hunger = (stats.hunger - self.config.hunger_decay).max(0.0);
        if was_fed && stats.hunger <= 0.0 {
            events.emit(tick, SimEventKind::Starving, "starving: HP will drain until you eat");
        }

        if stats.hunger <= 0.0 && stats.hp > 0.0 {
            stats.hp = (stats.hp - self.config.starvation_damage).max(0.0);
            if stats.hp <= 0.0 {
                events.emit(tick, SimEventKind::Collapsed, "collapsed from starvation");
            }
        }
    }

    /// Restore HP, capped at max. Negative amounts are ignored.
    pub fn heal(&mut self, amount: f64) {
        if amount > 0.0 {
            self.stats.hp = (self.stats.hp + amount).min(self.stats.max_hp);
        }
    }

    /// Apply a consumable's effect.
    pub fn apply_effect(&mut self, effect: ItemEffect) {
        match effect {
            ItemEffect::Heal(amount) => self.heal(amount),
            ItemEffect::Feed(amount) if amount > 0.0 => {
                self.stats.hunger = (self.stats.hunger + amount).min(self.stats.max_hunger);
            }
            ItemEffect::Refresh(amount) if amount > 0.0 => {
                self.stats.stamina = (self.stats.stamina + amount).min(self.stats.max_stamina);
            }
            ItemEffect::Feed(_) | ItemEffect::Refresh(_) => {}
        }
    }

    /// Sleep at an inn: HP and stamina to max, lockout cleared.
    pub fn rest(&mut self) {
        self.stats.hp = self.stats.max_hp;
        self.stats.stamina = self.stats.max_stamina;
        self.stats.is_sprint_cooling_down = false;
        self.stats.cooldown_elapsed_ms = 0.0;
        self.cooldown.reset();
    }

    /// Ticks counted toward the next hunger drop.
    pub fn hunger_progress(&self) -> u64 {
        self.hunger.elapsed()
    }

    /// Resume partway toward the next hunger drop.
    pub fn set_hunger_progress(&mut self, ticks: u64) {
        self.hunger.set_elapsed(ticks);
    }

    /// Replace the stats wholesale, e.g. from a snapshot.
    pub fn restore(&mut self, stats: SurvivalStats) {
        self.stats = stats.sanitized();
        self.hunger.reset();
        self.sync_cooldown_cadence();
    }

    fn sync_cooldown_cadence(&mut self) {
        self.cooldown.reset();
        if self.stats.is_sprint_cooling_down {
            let done = (self.stats.cooldown_elapsed_ms / self.tick_ms).round() as u64;
            for _ in 0..done.min(self.cooldown_ticks.saturating_sub(1)) {
                self.cooldown.tick();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK_MS: f64 = 1000.0 / 60.0;

    fn model(stats: SurvivalStats) -> SurvivalModel {
        SurvivalModel::new(SurvivalConfig::default(), stats, TICK_MS)
    }

    #[test]
    fn config_default_values() {
        let config = SurvivalConfig::default();
        assert!((config.stamina_drain_per_sec - 5.0).abs() < f64::EPSILON);
        assert!((config.stamina_regen_per_sec - 3.0).abs() < f64::EPSILON);
        assert!((config.hunger_decay - 0.75).abs() < f64::EPSILON);
        assert!((config.hunger_period_ms - 30_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn config_builder_chain() {
        let config = SurvivalConfig::default()
            .with_stamina_drain(10.0)
            .with_stamina_regen(1.0)
            .with_sprint_cooldown(500.0)
            .with_hunger(5.0, 1000.0)
            .with_starvation_damage(7.0);
        assert!((config.stamina_drain_per_sec - 10.0).abs() < f64::EPSILON);
        assert!((config.sprint_cooldown_ms - 500.0).abs() < f64::EPSILON);
        assert!((config.hunger_period_ms - 1000.0).abs() < f64::EPSILON);
        assert!((config.starvation_damage - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stats_clamp_on_construction() {
        let stats = SurvivalStats::new(100.0, 50.0, 150.0).with_current(-5.0, 80.0, -1.0);
        assert_eq!(stats.hp(), 0.0);
        assert_eq!(stats.stamina(), 50.0);
        assert_eq!(stats.hunger(), 0.0);
    }

    #[test]
    fn loaded_stats_are_clamped() {
        let json = r#"{
            "hp": 5000.0, "max_hp": 90.0,
            "stamina": -3.0, "max_stamina": 90.0,
            "hunger": 250.0, "max_hunger": 100.0,
            "is_sprint_cooling_down": false, "cooldown_elapsed_ms": 12.0
        }"#;
        let stats: SurvivalStats = serde_json::from_str(json).unwrap();
        let m = model(stats);
        assert_eq!(m.stats().hp(), 90.0);
        assert_eq!(m.stats().stamina(), 0.0);
        assert_eq!(m.stats().hunger(), 100.0);
        assert_eq!(m.stats().cooldown_elapsed_ms(), 0.0);

        let mut restored = model(SurvivalStats::new(50.0, 50.0, 50.0));
        let broken = SurvivalStats::new(f64::NAN, 40.0, 80.0);
        restored.restore(broken);
        assert_eq!(restored.stats().max_hp(), 0.0);
        assert_eq!(restored.stats().hp(), 0.0);
        assert_eq!(restored.stats().stamina(), 40.0);
    }

    #[test]
    fn hunger_progress_carries_over() {
        let mut log = EventLog::new(0);
        let mut first = model(SurvivalStats::new(100.0, 100.0, 100.0));
        for t in 1..=1000 {
            first.tick(false, t, &mut log);
        }
        assert_eq!(first.hunger_progress(), 1000);

        let mut resumed = model(first.stats().clone());
        resumed.set_hunger_progress(first.hunger_progress());
        for t in 1..800 {
            resumed.tick(false, t, &mut log);
        }
        assert_eq!(resumed.stats().hunger(), 100.0);
        resumed.tick(false, 800, &mut log);
        assert!((resumed.stats().hunger() - 99.25).abs() < 1e-9);
    }

    #[test]
    fn sprint_drains_to_threshold_then_locks_out() {
        // 0.95 stamina at 5/s runs out on the 12th tick.
        let stats = SurvivalStats::new(100.0, 100.0, 100.0).with_current(100.0, 0.95, 100.0);
        let mut m = model(stats);
        let mut log = EventLog::new(0);
        let mut exhausted_at = None;
        for tick in 1..=20 {
            if m.tick(true, tick, &mut log) {
                exhausted_at = Some(tick);
                break;
            }
            assert!(m.stats().stamina() > 0.0);
        }
        assert_eq!(exhausted_at, Some(12));
        assert_eq!(m.stats().stamina(), 0.0);
        assert!(m.stats().is_sprint_cooling_down());
        assert!(!m.can_sprint());
        assert_eq!(log.events()[0].kind, SimEventKind::SprintExhausted);
    }

    #[test]
    fn cooldown_lasts_three_seconds() {
        let stats = SurvivalStats::new(100.0, 100.0, 100.0).with_current(100.0, 0.01, 100.0);
        let mut m = model(stats);
        let mut log = EventLog::new(0);
        assert!(m.tick(true, 1, &mut log));
        assert_eq!(m.cooldown_ticks(), 180);

        let mut locked = 0;
        let mut tick = 2;
        while !m.can_sprint() {
            // Requests to sprint during cooldown resolve as walking.
            m.tick(false, tick, &mut log);
            locked += 1;
            tick += 1;
            assert!(locked <= 200, "cooldown never ended");
        }
        assert!((179..=181).contains(&locked));
        assert!(log.events().iter().any(|e| e.kind == SimEventKind::SprintRecovered));
    }

    #[test]
    fn stamina_regenerates_during_cooldown() {
        let stats = SurvivalStats::new(100.0, 100.0, 100.0).with_current(100.0, 0.01, 100.0);
        let mut m = model(stats);
        let mut log = EventLog::new(0);
        m.tick(true, 1, &mut log);
        for t in 2..62 {
            m.tick(false, t, &mut log);
        }
        assert!((m.stats().stamina() - 3.0).abs() < 1e-9);
        assert!(m.stats().is_sprint_cooling_down());
    }

    #[test]
    fn regen_caps_at_max() {
        let stats = SurvivalStats::new(100.0, 10.0, 100.0).with_current(100.0, 9.99, 100.0);
        let mut m = model(stats);
        let mut log = EventLog::new(0);
        for t in 1..=100 {
            m.tick(false, t, &mut log);
        }
        assert_eq!(m.stats().stamina(), 10.0);
    }

    #[test]
    fn hunger_decays_every_thirty_seconds() {
        let mut m = model(SurvivalStats::new(100.0, 100.0, 100.0));
        let mut log = EventLog::new(0);
        for t in 1..1800 {
            m.tick(false, t, &mut log);
        }
        assert_eq!(m.stats().hunger(), 100.0);
        m.tick(false, 1800, &mut log);
        assert!((m.stats().hunger() - 99.25).abs() < 1e-9);
    }

    #[test]
    fn hunger_floors_at_zero_and_hp_drains_after() {
        let config = SurvivalConfig::default().with_hunger(0.75, 100.0);
        let stats = SurvivalStats::new(10.0, 100.0, 100.0).with_current(10.0, 100.0, 1.0);
        let mut m = SurvivalModel::new(config, stats, 100.0);
        let mut log = EventLog::new(0);

        // Period 1: hunger 1.0 -> 0.25, HP untouched.
        m.tick(false, 1, &mut log);
        assert!((m.stats().hunger() - 0.25).abs() < 1e-9);
        assert_eq!(m.stats().hp(), 10.0);

        // Period 2: hunger floors at 0 and HP starts draining.
        m.tick(false, 2, &mut log);
        assert_eq!(m.stats().hunger(), 0.0);
        assert_eq!(m.stats().hp(), 8.0);

        for t in 3..20 {
            m.tick(false, t, &mut log);
            assert_eq!(m.stats().hunger(), 0.0);
        }
        assert_eq!(m.stats().hp(), 0.0);

        let starving = log.events().iter().filter(|e| e.kind == SimEventKind::Starving).count();
        let collapsed = log.events().iter().filter(|e| e.kind == SimEventKind::Collapsed).count();
        assert_eq!((starving, collapsed), (1, 1));
    }

    #[test]
    fn heal_is_capped_and_ignores_negatives() {
        let stats = SurvivalStats::new(100.0, 100.0, 100.0).with_current(40.0, 100.0, 100.0);
        let mut m = model(stats);
        m.heal(-20.0);
        assert_eq!(m.stats().hp(), 40.0);
        m.apply_effect(ItemEffect::Heal(50.0));
        assert_eq!(m.stats().hp(), 90.0);
        m.apply_effect(ItemEffect::Heal(100.0));
        assert_eq!(m.stats().hp(), 100.0);
    }

    #[test]
    fn feed_and_refresh() {
        let stats = SurvivalStats::new(100.0, 100.0, 100.0).with_current(100.0, 20.0, 30.0);
        let mut m = model(stats);
        m.apply_effect(ItemEffect::Feed(80.0));
        m.apply_effect(ItemEffect::Refresh(15.0));
        assert_eq!(m.stats().hunger(), 100.0);
        assert_eq!(m.stats().stamina(), 35.0);
    }

    #[test]
    fn rest_restores_and_clears_lockout() {
        let stats = SurvivalStats::new(100.0, 100.0, 100.0).with_current(5.0, 0.01, 100.0);
        let mut m = model(stats);
        let mut log = EventLog::new(0);
        m.tick(true, 1, &mut log);
        assert!(!m.can_sprint());
        m.rest();
        assert!(m.can_sprint());
        assert_eq!(m.stats().hp(), 100.0);
        assert_eq!(m.stats().stamina(), 100.0);
    }

    #[test]
    fn restore_resumes_partial_cooldown() {
        let stats = SurvivalStats::new(100.0, 100.0, 100.0).with_current(100.0, 0.01, 100.0);
        let mut m = model(stats);
        let mut log = EventLog::new(0);
        m.tick(true, 1, &mut log);
        for t in 2..92 {
            m.tick(false, t, &mut log);
        }
        let saved = m.stats().clone();

        let mut restored = model(SurvivalStats::new(100.0, 100.0, 100.0));
        restored.restore(saved);
        let mut remaining = 0;
        while !restored.can_sprint() {
            restored.tick(false, 0, &mut log);
            remaining += 1;
        }
        assert!((89..=91).contains(&remaining));
    }

    #[test]
    fn item_effect_serde() {
        let json = serde_json::to_string(&ItemEffect::Heal(20.0)).unwrap();
        assert_eq!(json, r#"{"kind":"heal","amount":20.0}"#);
    }
}
