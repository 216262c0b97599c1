use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::archetype::PlayerProfile;
use crate::clock::GameClock;
use crate::geom::Point;
use crate::inventory::{Equipment, Inventory, Relics};
use crate::motion::Direction;
use crate::survival::SurvivalStats;

/// Player half of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Name and class.
    pub profile: PlayerProfile,
    /// Sprite position.
    pub position: Point,
    /// Facing.
    pub direction: Direction,
    /// HP, stamina, hunger.
    pub stats: SurvivalStats,
    /// Gold carried.
    pub gold: u32,
    /// Attack rating.
    pub damage: f64,
    /// Armor rating.
    pub armor: f64,
    /// Carried items.
    pub inventory: Inventory,
    /// Equipped items.
    pub equipment: Equipment,
    /// Relic progress.
    pub relics: Relics,
    /// Ticks counted toward the next hunger drop.
    #[serde(default)]
    pub hunger_progress: u64,
}

/// World half of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// In-game time.
    pub clock: GameClock,
    /// Zones entered at least once.
    pub visited_zones: BTreeSet<String>,
    /// Ticks counted toward the next in-game minute.
    #[serde(default)]
    pub minute_progress: u64,
}

/// Everything needed to resume a session. Produced and consumed as a pure
/// assignment pair by [`crate::session::Session`]; the save timestamp lives
/// on the slot record instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Player state.
    pub player: PlayerSnapshot,
    /// World state.
    pub world: WorldSnapshot,
}

impl SessionSnapshot {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
