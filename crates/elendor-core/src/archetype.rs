use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Playable character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    /// Fragile caster with a large HP bonus.
    Mage,
    /// Heavily armored sellsword.
    Mercenary,
    /// Fast scout.
    Ranger,
    /// Hardy fighter who recovers stamina quickly.
    Soldier,
}

/// Starting stats of an archetype before its class bonus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseStats {
    /// Maximum hit points.
    pub hp: f64,
    /// Maximum hunger.
    pub hunger: f64,
    /// Maximum stamina.
    pub stamina: f64,
    /// Base attack damage.
    pub damage: f64,
    /// Base armor.
    pub armor: f64,
    /// Starting purse.
    pub gold: u32,
}

impl Archetype {
    /// Every archetype, in menu order.
    pub const ALL: [Archetype; 4] = [Self::Mage, Self::Mercenary, Self::Ranger, Self::Soldier];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Mage => "Mage",
            Self::Mercenary => "Mercenary",
            Self::Ranger => "Ranger",
            Self::Soldier => "Soldier",
        }
    }

    /// One-line description of the class bonus.
    pub fn bonus(self) -> &'static str {
        match self {
            Self::Mage => "+25 max HP",
            Self::Mercenary => "+15% armor",
            Self::Ranger => "+10% running speed",
            Self::Soldier => "+20% stamina regeneration",
        }
    }

    /// Stats before the class bonus.
    pub fn base_stats(self) -> BaseStats {
        let (hp, hunger, stamina, damage, armor, gold) = match self {
            Self::Mage => (70.0, 80.0, 80.0, 18.0, 10.0, 50),
            Self::Mercenary => (100.0, 75.0, 85.0, 22.0, 25.0, 100),
            Self::Ranger => (80.0, 90.0, 100.0, 16.0, 15.0, 75),
            Self::Soldier => (90.0, 100.0, 90.0, 25.0, 20.0, 60),
        };
        BaseStats {
            hp,
            hunger,
            stamina,
            damage,
            armor,
            gold,
        }
    }

    /// Stats with the class bonus applied.
    pub fn stats(self) -> BaseStats {
        let mut stats = self.base_stats();
        match self {
            Self::Mage => stats.hp += 25.0,
            Self::Mercenary => stats.armor *= 1.15,
            Self::Ranger | Self::Soldier => {}
        }
        stats
    }

    /// Factor applied to the run multiplier.
    pub fn run_speed_factor(self) -> f64 {
        match self {
            Self::Ranger => 1.1,
            _ => 1.0,
        }
    }

    /// Factor applied to stamina regeneration.
    pub fn stamina_regen_factor(self) -> f64 {
        match self {
            Self::Soldier => 1.2,
            _ => 1.0,
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Archetype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown class '{s}' (expected mage, mercenary, ranger or soldier)")
            })
    }
}

/// Who is playing: a name and a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Character name.
    pub name: String,
    /// Character class.
    pub archetype: Archetype,
}

impl PlayerProfile {
    /// Create a profile.
    pub fn new(name: impl Into<String>, archetype: Archetype) -> Self {
        Self {
            name: name.into(),
            archetype,
        }
    }
}
