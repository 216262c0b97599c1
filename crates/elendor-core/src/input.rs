//! Player input as per-tick intents, and sources that produce them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScriptError;

/// Buttons held (or pressed) during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputIntent {
    /// Move up.
    pub up: bool,
    /// Move down.
    pub down: bool,
    /// Move left.
    pub left: bool,
    /// Move right.
    pub right: bool,
    /// Sprint while held.
    pub sprint_held: bool,
    /// Flip the sprint toggle. An edge, not a level.
    pub sprint_toggle: bool,
}

impl InputIntent {
    /// No buttons.
    pub const IDLE: InputIntent = InputIntent {
        up: false,
        down: false,
        left: false,
        right: false,
        sprint_held: false,
        sprint_toggle: false,
    };

    /// Horizontal and vertical axes in `-1..=1`. Opposite buttons cancel.
    pub fn axes(&self) -> (i8, i8) {
        let dx = i8::from(self.right) - i8::from(self.left);
        let dy = i8::from(self.down) - i8::from(self.up);
        (dx, dy)
    }

    /// Whether any axis is nonzero.
    pub fn is_moving(&self) -> bool {
        self.axes() != (0, 0)
    }
}

/// Produces the intent for each fixed tick.
///
/// Sessions sample exactly once per tick, so a source that depends only on
/// the tick number makes a run fully reproducible.
pub trait InputSource {
    /// Intent for the given tick (ticks count from 1).
    fn sample(&mut self, tick: u64) -> InputIntent;
}

impl InputSource for InputIntent {
    fn sample(&mut self, _tick: u64) -> InputIntent {
        *self
    }
}

impl<F: FnMut(u64) -> InputIntent> InputSource for F {
    fn sample(&mut self, tick: u64) -> InputIntent {
        self(tick)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    intent: InputIntent,
    ticks: u64,
}

/// A scripted input sequence such as `right*60,up+right+sprint*30,idle*10`.
///
/// Each comma-separated segment is a `+`-joined key set and a tick count.
/// Keys: `up`, `down`, `left`, `right`, `sprint` (held), `toggle` (pressed on
/// the segment's first tick) and `idle`. A missing count means one tick.
/// Ticks past the end of the script are idle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputScript {
    segments: Vec<Segment>,
}

impl InputScript {
    /// Total scripted ticks.
    pub fn duration(&self) -> u64 {
        self.segments.iter().map(|s| s.ticks).sum()
    }

    /// Whether the script has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a segment.
    pub fn then(mut self, intent: InputIntent, ticks: u64) -> Self {
        if ticks > 0 {
            self.segments.push(Segment { intent, ticks });
        }
        self
    }

    fn intent_at(&self, index: u64) -> InputIntent {
        let mut start = 0;
        for segment in &self.segments {
            if index < start + segment.ticks {
                let mut intent = segment.intent;
                intent.sprint_toggle &= index == start;
                return intent;
            }
            start += segment.ticks;
        }
        InputIntent::IDLE
    }
}

impl InputSource for InputScript {
    fn sample(&mut self, tick: u64) -> InputIntent {
        self.intent_at(tick.saturating_sub(1))
    }
}

impl FromStr for InputScript {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut script = InputScript::default();
        if s.trim().is_empty() {
            return Ok(script);
        }
        for (index, raw) in s.split(',').enumerate() {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(ScriptError::EmptySegment { index });
            }
            let (keys, count) = match raw.split_once('*') {
                Some((keys, count)) => (keys.trim(), Some(count.trim())),
                None => (raw, None),
            };
            let ticks = match count {
                Some(c) => c.parse::<u64>().map_err(|_| ScriptError::BadCount {
                    index,
                    count: c.to_string(),
                })?,
                None => 1,
            };
            let intent = parse_keys(keys, index)?;
            script = script.then(intent, ticks);
        }
        Ok(script)
    }
}

fn parse_keys(keys: &str, index: usize) -> Result<InputIntent, ScriptError> {
    let mut intent = InputIntent::IDLE;
    if keys.is_empty() {
        return Err(ScriptError::EmptySegment { index });
    }
    for key in keys.split('+').map(str::trim) {
        match key.to_ascii_lowercase().as_str() {
            "up" | "w" => intent.up = true,
            "down" | "s" => intent.down = true,
            "left" | "a" => intent.left = true,
            "right" | "d" => intent.right = true,
            "sprint" | "shift" => intent.sprint_held = true,
            "toggle" | "r" => intent.sprint_toggle = true,
            "idle" | "wait" => {}
            _ => {
                return Err(ScriptError::UnknownKey {
                    index,
                    key: key.to_string(),
                });
            }
        }
    }
    Ok(intent)
}

impl fmt::Display for InputScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            let intent = seg.intent;
            let keys: Vec<&str> = [
                (intent.up, "up"),
                (intent.down, "down"),
                (intent.left, "left"),
                (intent.right, "right"),
                (intent.sprint_held, "sprint"),
                (intent.sprint_toggle, "toggle"),
            ]
            .into_iter()
            .filter_map(|(on, name)| on.then_some(name))
            .collect();
            if keys.is_empty() {
                write!(f, "idle*{}", seg.ticks)?;
            } else {
                write!(f, "{}*{}", keys.join("+"), seg.ticks)?;
            }
        }
        Ok(())
    }
}
