/// What kind of session event occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEventKind {
    // Zones
    /// The zone under the player changed. `None` is open country.
    ZoneChanged {
        /// The zone left, if any.
        from: Option<String>,
        /// The zone entered, if any.
        to: Option<String>,
    },

    // Survival
    /// Stamina hit its floor and sprinting was forced off.
    SprintExhausted,
    /// The sprint cooldown ended.
    SprintRecovered,
    /// Hunger reached zero.
    Starving,
    /// HP reached zero.
    Collapsed,

    // Time
    /// A new in-game hour began.
    HourChanged {
        /// The new hour, 0-23.
        hour: u8,
    },
    /// Night began.
    NightFell,
    /// Day began.
    DayBroke,
    /// Midnight passed.
    NewDay {
        /// The new day number.
        day: u32,
    },

    // Progress
    /// A relic was collected.
    RelicCollected {
        /// Relic slot index.
        index: usize,
        /// Relics collected so far.
        collected: usize,
    },
    /// The player was moved to a fresh spawn point.
    Respawned,
}

impl SimEventKind {
    /// Short label used when listing events.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ZoneChanged { .. } => "zone",
            Self::SprintExhausted | Self::SprintRecovered => "sprint",
            Self::Starving | Self::Collapsed => "survival",
            Self::HourChanged { .. } | Self::NightFell | Self::DayBroke | Self::NewDay { .. } => {
                "time"
            }
            Self::RelicCollected { .. } | Self::Respawned => "progress",
        }
    }
}

/// A record of something that happened during a session.
#[derive(Debug, Clone)]
pub struct SimEvent {
    /// The tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Events raised since the last drain, oldest first.
///
/// A nonzero capacity bounds the backlog when nobody drains: the oldest
/// pending event is discarded to make room and counted in
/// [`EventLog::dropped`].
#[derive(Debug, Default)]
pub struct EventLog {
    pending: Vec<SimEvent>,
    capacity: usize,
    dropped: u64,
}

impl EventLog {
    /// A log holding at most `capacity` pending events (0 keeps everything).
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: Vec::new(),
            capacity,
            dropped: 0,
        }
    }

    /// Record an event raised at `tick`.
    pub fn emit(&mut self, tick: u64, kind: SimEventKind, description: impl Into<String>) {
        if self.capacity > 0 && self.pending.len() >= self.capacity {
            self.pending.remove(0);
            self.dropped += 1;
        }
        self.pending.push(SimEvent::new(tick, kind, description));
    }

    /// Pending events.
    pub fn events(&self) -> &[SimEvent] {
        &self.pending
    }

    /// Take the pending events. The dropped count is kept.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Events discarded because the log was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(to: &str) -> SimEventKind {
        SimEventKind::ZoneChanged {
            from: None,
            to: Some(to.into()),
        }
    }

    #[test]
    fn full_log_discards_oldest() {
        let mut log = EventLog::new(2);
        log.emit(10, zone("Lakers City"), "entered Lakers City");
        log.emit(11, SimEventKind::SprintExhausted, "winded");
        log.emit(12, SimEventKind::SprintRecovered, "recovered");
        let ticks: Vec<_> = log.events().iter().map(|e| e.tick).collect();
        assert_eq!(ticks, [11, 12]);
        assert_eq!(log.dropped(), 1);
    }

    #[test]
    fn drain_keeps_dropped_count() {
        let mut log = EventLog::new(1);
        log.emit(1, SimEventKind::NightFell, "night");
        log.emit(2, SimEventKind::DayBroke, "day");
        let drained = log.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].kind, SimEventKind::DayBroke);
        assert!(log.is_empty());
        assert_eq!(log.dropped(), 1);

        log.emit(3, SimEventKind::Starving, "hungry");
        assert_eq!(log.len(), 1);
        assert_eq!(log.dropped(), 1);
    }

    #[test]
    fn zero_capacity_keeps_everything() {
        let mut log = EventLog::new(0);
        for tick in 0..50 {
            log.emit(tick, SimEventKind::HourChanged { hour: 0 }, "tick");
        }
        assert_eq!(log.len(), 50);
        assert_eq!(log.dropped(), 0);
    }

    #[test]
    fn labels_group_kinds() {
        assert_eq!(zone("x").label(), "zone");
        assert_eq!(SimEventKind::SprintRecovered.label(), "sprint");
        assert_eq!(SimEventKind::NewDay { day: 2 }.label(), "time");
        assert_eq!(SimEventKind::Collapsed.label(), "survival");
        assert_eq!(
            SimEventKind::RelicCollected {
                index: 0,
                collected: 1
            }
            .label(),
            "progress"
        );
    }
}
