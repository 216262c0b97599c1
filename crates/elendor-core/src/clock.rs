use std::fmt;

use serde::{Deserialize, Serialize};

/// Default simulation rate in ticks per second.
pub const DEFAULT_TICK_RATE: f64 = 60.0;
/// Frame deltas above this are clamped to avoid a spiral of catch-up ticks.
pub const DEFAULT_MAX_FRAME_DELTA_MS: f64 = 250.0;
/// Shortest allowed tick. Shorter (or non-finite) lengths are raised to it.
pub const MIN_TICK_MS: f64 = 1.0;

// Absorbs float drift when the accumulator lands a hair under a tick boundary.
const TICK_EPSILON: f64 = 1e-9;

/// Fixed-timestep accumulator.
///
/// Render frames feed variable deltas in; the clock hands out a whole number
/// of fixed-length ticks and keeps the remainder for the next frame. The
/// fraction of a tick left over is exposed as [`SimulationClock::alpha`] for
/// render interpolation.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    tick: u64,
    tick_ms: f64,
    max_frame_delta_ms: f64,
    accumulator: f64,
    last_frame_ms: Option<f64>,
    paused: bool,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(1000.0 / DEFAULT_TICK_RATE, DEFAULT_MAX_FRAME_DELTA_MS)
    }
}

impl SimulationClock {
    /// Create a clock with the given tick length and frame-delta clamp.
    /// The tick length is raised to at least [`MIN_TICK_MS`].
    pub fn new(tick_ms: f64, max_frame_delta_ms: f64) -> Self {
        let tick_ms = if tick_ms.is_finite() {
            tick_ms.max(MIN_TICK_MS)
        } else {
            MIN_TICK_MS
        };
        Self {
            tick: 0,
            tick_ms,
            max_frame_delta_ms,
            accumulator: 0.0,
            last_frame_ms: None,
            paused: false,
        }
    }

    /// Feed a frame delta and run `on_tick` once per whole tick that became
    /// due. Returns the number of ticks run. Does nothing while paused.
    pub fn advance(&mut self, frame_delta_ms: f64, mut on_tick: impl FnMut(u64)) -> u32 {
        if self.paused {
            return 0;
        }
        let delta = if frame_delta_ms.is_finite() {
            frame_delta_ms.clamp(0.0, self.max_frame_delta_ms)
        } else {
            0.0
        };
        self.accumulator += delta;

        let mut ran = 0;
        while self.accumulator + TICK_EPSILON >= self.tick_ms {
            self.accumulator = (self.accumulator - self.tick_ms).max(0.0);
            self.tick += 1;
            ran += 1;
            on_tick(self.tick);
        }
        ran
    }

    /// Run exactly one tick, ignoring the accumulator. Returns `false`
    /// while paused.
    pub fn tick_once(&mut self, on_tick: impl FnOnce(u64)) -> bool {
        if self.paused {
            return false;
        }
        self.tick += 1;
        on_tick(self.tick);
        true
    }

    /// Feed an absolute frame timestamp. The first frame after creation,
    /// [`suspend`](Self::suspend) or [`resume`](Self::resume) only records
    /// the reference time.
    pub fn frame(&mut self, now_ms: f64, on_tick: impl FnMut(u64)) -> u32 {
        match self.last_frame_ms.replace(now_ms) {
            Some(previous) => self.advance(now_ms - previous, on_tick),
            None => 0,
        }
    }

    /// Stop dispatching ticks and drop any backlog.
    pub fn pause(&mut self) {
        self.paused = true;
        self.accumulator = 0.0;
    }

    /// Resume dispatching. The next [`frame`](Self::frame) re-establishes
    /// the reference time.
    pub fn resume(&mut self) {
        self.paused = false;
        self.last_frame_ms = None;
    }

    /// Forget the frame reference and backlog, e.g. when the window loses
    /// visibility.
    pub fn suspend(&mut self) {
        self.last_frame_ms = None;
        self.accumulator = 0.0;
    }

    /// Whether tick dispatch is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of ticks run so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Tick length in milliseconds.
    pub fn tick_ms(&self) -> f64 {
        self.tick_ms
    }

    /// Progress toward the next tick, in `0.0..1.0`.
    pub fn alpha(&self) -> f64 {
        (self.accumulator / self.tick_ms).clamp(0.0, 1.0)
    }

    /// Number of whole ticks closest to `period_ms`, at least one.
    pub fn ticks_for(&self, period_ms: f64) -> u64 {
        Cadence::from_period_ms(period_ms, self.tick_ms).period()
    }
}

/// Fires every `period` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    period: u64,
    elapsed: u64,
}

impl Cadence {
    /// A cadence firing every `period` ticks (minimum one).
    pub fn every(period: u64) -> Self {
        Self {
            period: period.max(1),
            elapsed: 0,
        }
    }

    /// A cadence for a period given in milliseconds, rounded to whole ticks.
    pub fn from_period_ms(period_ms: f64, tick_ms: f64) -> Self {
        let ticks = if tick_ms > 0.0 && period_ms.is_finite() {
            (period_ms / tick_ms).round().max(1.0) as u64
        } else {
            1
        };
        Self::every(ticks)
    }

    /// Count one tick. Returns `true` when the cadence fires.
    pub fn tick(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed >= self.period {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }

    /// Restart counting from zero.
    pub fn reset(&mut self) {
        self.elapsed = 0;
    }

    /// Resume partway through a period. Stops one tick short of firing.
    pub fn set_elapsed(&mut self, ticks: u64) {
        self.elapsed = ticks.min(self.period - 1);
    }

    /// Ticks between firings.
    pub fn period(&self) -> u64 {
        self.period
    }

    /// Ticks counted since the last firing.
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }
}

/// Hour at which night begins.
pub const NIGHT_START_HOUR: u8 = 18;
/// Hour at which day begins.
pub const DAY_START_HOUR: u8 = 6;

/// In-game calendar time.
///
/// Deserialization goes through [`GameClock::new`], so loaded hours and
/// minutes are always wrapped into range and `is_night` is recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ClockParts", into = "ClockParts")]
pub struct GameClock {
    day: u32,
    hours: u8,
    minutes: u8,
    is_night: bool,
}

#[derive(Serialize, Deserialize)]
struct ClockParts {
    day: u32,
    hours: u8,
    minutes: u8,
}

impl From<ClockParts> for GameClock {
    fn from(parts: ClockParts) -> Self {
        Self::new(parts.day, parts.hours, parts.minutes)
    }
}

impl From<GameClock> for ClockParts {
    fn from(clock: GameClock) -> Self {
        Self {
            day: clock.day,
            hours: clock.hours,
            minutes: clock.minutes,
        }
    }
}

/// What changed when the game clock advanced one minute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockChange {
    /// The hour rolled over.
    pub hour_changed: bool,
    /// The day rolled over at midnight.
    pub new_day: bool,
    /// Night started (`Some(true)`) or ended (`Some(false)`).
    pub night_changed: Option<bool>,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(1, DAY_START_HOUR, 0)
    }
}

impl GameClock {
    /// Create a clock; hours and minutes wrap into range.
    pub fn new(day: u32, hours: u8, minutes: u8) -> Self {
        let hours = hours % 24;
        Self {
            day: day.max(1),
            hours,
            minutes: minutes % 60,
            is_night: is_night_hour(hours),
        }
    }

    /// Current day, starting at 1.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Current hour, 0-23.
    pub fn hours(&self) -> u8 {
        self.hours
    }

    /// Current minute, 0-59.
    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    /// Whether it is night.
    pub fn is_night(&self) -> bool {
        self.is_night
    }

    /// Minutes since midnight.
    pub fn minute_of_day(&self) -> u32 {
        u32::from(self.hours) * 60 + u32::from(self.minutes)
    }

    /// Advance one in-game minute.
    pub fn advance_minute(&mut self) -> ClockChange {
        let mut change = ClockChange::default();
        self.minutes += 1;
        if self.minutes < 60 {
            return change;
        }

        self.minutes = 0;
        self.hours += 1;
        change.hour_changed = true;
        if self.hours >= 24 {
            self.hours = 0;
            self.day = self.day.saturating_add(1);
            change.new_day = true;
        }

        let night = is_night_hour(self.hours);
        if night != self.is_night {
            self.is_night = night;
            change.night_changed = Some(night);
        }
        change
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Day {} {:02}:{:02}", self.day, self.hours, self.minutes)
    }
}

/// Whether an hour of the day counts as night.
pub fn is_night_hour(hours: u8) -> bool {
    hours >= NIGHT_START_HOUR || hours < DAY_START_HOUR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_ms() -> f64 {
        1000.0 / 60.0
    }

    #[test]
    fn clock_initial_state() {
        let clock = SimulationClock::default();
        assert_eq!(clock.tick(), 0);
        assert!(!clock.is_paused());
        assert!((clock.tick_ms() - tick_ms()).abs() < 1e-12);
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn one_second_of_frames_is_sixty_ticks() {
        let mut clock = SimulationClock::default();
        let mut seen = Vec::new();
        for _ in 0..60 {
            clock.advance(tick_ms(), |t| seen.push(t));
        }
        assert_eq!(clock.tick(), 60);
        assert_eq!(seen, (1..=60).collect::<Vec<_>>());
    }

    #[test]
    fn pacing_does_not_change_tick_count() {
        let mut fast = SimulationClock::default();
        let mut slow = SimulationClock::default();
        for _ in 0..120 {
            fast.advance(tick_ms(), |_| {});
        }
        for _ in 0..40 {
            slow.advance(tick_ms() * 3.0, |_| {});
        }
        assert_eq!(fast.tick(), 120);
        assert_eq!(slow.tick(), 120);
    }

    #[test]
    fn huge_delta_is_clamped() {
        let mut clock = SimulationClock::default();
        let ran = clock.advance(10_000.0, |_| {});
        assert_eq!(ran, 15);
    }

    #[test]
    fn negative_and_nan_deltas_run_nothing() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.advance(-100.0, |_| {}), 0);
        assert_eq!(clock.advance(f64::NAN, |_| {}), 0);
        assert_eq!(clock.tick(), 0);
    }

    #[test]
    fn alpha_reports_remainder() {
        let mut clock = SimulationClock::new(10.0, 250.0);
        clock.advance(25.0, |_| {});
        assert_eq!(clock.tick(), 2);
        assert!((clock.alpha() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn pause_drops_backlog() {
        let mut clock = SimulationClock::new(10.0, 250.0);
        clock.advance(5.0, |_| {});
        clock.pause();
        assert_eq!(clock.advance(100.0, |_| {}), 0);
        clock.resume();
        assert_eq!(clock.alpha(), 0.0);
        assert_eq!(clock.advance(9.0, |_| {}), 0);
        assert_eq!(clock.advance(1.0, |_| {}), 1);
    }

    #[test]
    fn tiny_tick_length_still_terminates() {
        let mut clock = SimulationClock::new(1e-12, 250.0);
        assert_eq!(clock.tick_ms(), MIN_TICK_MS);
        assert_eq!(clock.advance(100.0, |_| {}), 100);
        assert_eq!(SimulationClock::new(f64::NAN, 250.0).tick_ms(), MIN_TICK_MS);
    }

    #[test]
    fn tick_once_ignores_accumulator() {
        let mut clock = SimulationClock::new(10.0, 250.0);
        clock.advance(5.0, |_| {});
        let mut seen = Vec::new();
        assert!(clock.tick_once(|t| seen.push(t)));
        assert_eq!(seen, vec![1]);
        assert!((clock.alpha() - 0.5).abs() < 1e-9);
        clock.pause();
        assert!(!clock.tick_once(|_| {}));
        assert_eq!(clock.tick(), 1);
    }

    #[test]
    fn frame_first_call_sets_reference() {
        let mut clock = SimulationClock::new(10.0, 250.0);
        assert_eq!(clock.frame(5_000.0, |_| {}), 0);
        assert_eq!(clock.frame(5_030.0, |_| {}), 3);
    }

    #[test]
    fn suspend_prevents_catch_up_burst() {
        let mut clock = SimulationClock::new(10.0, 250.0);
        clock.frame(0.0, |_| {});
        clock.frame(10.0, |_| {});
        clock.suspend();
        // Hidden for a minute; no burst when frames resume.
        assert_eq!(clock.frame(60_010.0, |_| {}), 0);
        assert_eq!(clock.frame(60_020.0, |_| {}), 1);
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn ticks_for_rounds_period() {
        let clock = SimulationClock::default();
        assert_eq!(clock.ticks_for(3000.0), 180);
        assert_eq!(clock.ticks_for(30_000.0), 1800);
        assert_eq!(clock.ticks_for(1000.0), 60);
        assert_eq!(clock.ticks_for(0.0), 1);
    }

    #[test]
    fn cadence_fires_on_period() {
        let mut c = Cadence::every(3);
        let fired: Vec<bool> = (0..7).map(|_| c.tick()).collect();
        assert_eq!(fired, [false, false, true, false, false, true, false]);
        assert_eq!(c.elapsed(), 1);
        c.reset();
        assert_eq!(c.elapsed(), 0);
    }

    #[test]
    fn game_clock_starts_at_six() {
        let clock = GameClock::default();
        assert_eq!((clock.day(), clock.hours(), clock.minutes()), (1, 6, 0));
        assert!(!clock.is_night());
        assert_eq!(clock.to_string(), "Day 1 06:00");
    }

    #[test]
    fn full_day_rolls_over() {
        let mut clock = GameClock::default();
        let mut new_days = 0;
        for _ in 0..1440 {
            if clock.advance_minute().new_day {
                new_days += 1;
            }
        }
        assert_eq!(new_days, 1);
        assert_eq!((clock.day(), clock.hours(), clock.minutes()), (2, 6, 0));
        assert!(!clock.is_night());
    }

    #[test]
    fn night_toggles_only_at_boundaries() {
        let mut clock = GameClock::default();
        let mut toggles = Vec::new();
        for _ in 0..1440 {
            if let Some(night) = clock.advance_minute().night_changed {
                toggles.push((clock.hours(), night));
            }
        }
        assert_eq!(toggles, [(18, true), (6, false)]);
    }

    #[test]
    fn new_wraps_out_of_range() {
        let clock = GameClock::new(0, 25, 61);
        assert_eq!((clock.day(), clock.hours(), clock.minutes()), (1, 1, 1));
        assert!(clock.is_night());
    }

    #[test]
    fn loaded_clock_is_wrapped_into_range() {
        let json = r#"{"day": 3, "hours": 255, "minutes": 59, "is_night": true}"#;
        let mut clock: GameClock = serde_json::from_str(json).unwrap();
        assert_eq!((clock.day(), clock.hours(), clock.minutes()), (3, 15, 59));
        assert!(!clock.is_night());
        for _ in 0..3600 {
            clock.advance_minute();
        }
        assert_eq!((clock.day(), clock.hours(), clock.minutes()), (6, 3, 59));
        let round_trip: GameClock =
            serde_json::from_str(&serde_json::to_string(&clock).unwrap()).unwrap();
        assert_eq!(round_trip, clock);
    }

    #[test]
    fn cadence_resumes_partway() {
        let mut cadence = Cadence::every(4);
        cadence.set_elapsed(3);
        assert!(cadence.tick());
        cadence.set_elapsed(99);
        assert_eq!(cadence.elapsed(), 3);
    }

    #[test]
    fn is_night_hours() {
        assert!(is_night_hour(0));
        assert!(is_night_hour(5));
        assert!(!is_night_hour(6));
        assert!(!is_night_hour(17));
        assert!(is_night_hour(18));
        assert!(is_night_hour(23));
    }
}
