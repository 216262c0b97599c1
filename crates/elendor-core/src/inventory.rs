//! Items, equipment and relic progress carried by the player.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::survival::ItemEffect;

/// Number of relics; collecting all of them wins the game.
pub const RELIC_COUNT: usize = 8;

/// Relic names by slot.
pub const RELIC_NAMES: [&str; RELIC_COUNT] = [
    "Celurit",
    "Gambus",
    "Keris",
    "Kujang",
    "Parang",
    "Topeng Barong",
    "Topeng Ondel",
    "Wayang Gunungan",
];

/// What an item does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemKind {
    /// Equippable in the weapon slot.
    Weapon {
        /// Damage bonus.
        damage: f64,
    },
    /// Equippable in the armor slot.
    Armor {
        /// Defense bonus.
        defense: f64,
    },
    /// Used up on use.
    Consumable(ItemEffect),
}

/// A shop item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemDef {
    /// Display name and inventory key.
    pub name: &'static str,
    /// Shop price in gold.
    pub price: u32,
    /// Behavior.
    pub kind: ItemKind,
}

const CATALOG: [ItemDef; 10] = [
    ItemDef {
        name: "Wooden Sword",
        price: 50,
        kind: ItemKind::Weapon { damage: 5.0 },
    },
    ItemDef {
        name: "Iron Sword",
        price: 150,
        kind: ItemKind::Weapon { damage: 10.0 },
    },
    ItemDef {
        name: "Golden Sword",
        price: 500,
        kind: ItemKind::Weapon { damage: 20.0 },
    },
    ItemDef {
        name: "Wooden Armor",
        price: 50,
        kind: ItemKind::Armor { defense: 5.0 },
    },
    ItemDef {
        name: "Iron Armor",
        price: 150,
        kind: ItemKind::Armor { defense: 10.0 },
    },
    ItemDef {
        name: "Golden Armor",
        price: 500,
        kind: ItemKind::Armor { defense: 20.0 },
    },
    ItemDef {
        name: "Small Potion",
        price: 20,
        kind: ItemKind::Consumable(ItemEffect::Heal(20.0)),
    },
    ItemDef {
        name: "Medium Potion",
        price: 50,
        kind: ItemKind::Consumable(ItemEffect::Heal(50.0)),
    },
    ItemDef {
        name: "Large Potion",
        price: 100,
        kind: ItemKind::Consumable(ItemEffect::Heal(100.0)),
    },
    ItemDef {
        name: "Rations",
        price: 15,
        kind: ItemKind::Consumable(ItemEffect::Feed(30.0)),
    },
];

/// Every known item.
pub fn catalog() -> &'static [ItemDef] {
    &CATALOG
}

/// Look up an item by name, ignoring case.
pub fn find_item(name: &str) -> Option<&'static ItemDef> {
    CATALOG.iter().find(|item| item.name.eq_ignore_ascii_case(name.trim()))
}

/// Item counts keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    /// An empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` of an item. Counts saturate at `u32::MAX`.
    pub fn add(&mut self, name: impl Into<String>, count: u32) {
        if count > 0 {
            let held = self.items.entry(name.into()).or_insert(0);
            *held = held.saturating_add(count);
        }
    }

    /// Remove `count` of an item. Fails without change if there are fewer.
    pub fn remove(&mut self, name: &str, count: u32) -> bool {
        let Some(have) = self.items.get_mut(name) else {
            return false;
        };
        if *have < count {
            return false;
        }
        *have -= count;
        if *have == 0 {
            self.items.remove(name);
        }
        true
    }

    /// How many of an item are held.
    pub fn count(&self, name: &str) -> u32 {
        self.items.get(name).copied().unwrap_or(0)
    }

    /// Whether nothing is held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items and counts, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Equipped item names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    /// Weapon slot.
    pub weapon: Option<String>,
    /// Armor slot.
    pub armor: Option<String>,
}

/// Which relics have been found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Relics {
    found: [bool; RELIC_COUNT],
}

impl Relics {
    /// Mark a relic found. Returns `Some(true)` if it was newly found,
    /// `None` if the index is out of range.
    pub fn collect(&mut self, index: usize) -> Option<bool> {
        let slot = self.found.get_mut(index)?;
        let newly = !*slot;
        *slot = true;
        Some(newly)
    }

    /// Whether a relic is found.
    pub fn is_found(&self, index: usize) -> bool {
        self.found.get(index).copied().unwrap_or(false)
    }

    /// Number found.
    pub fn count(&self) -> usize {
        self.found.iter().filter(|f| **f).count()
    }

    /// Whether all relics are found.
    pub fn is_complete(&self) -> bool {
        self.found.iter().all(|f| *f)
    }

    /// Per-slot flags.
    pub fn flags(&self) -> [bool; RELIC_COUNT] {
        self.found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_item_ignores_case() {
        let potion = find_item("small potion").unwrap();
        assert_eq!(potion.price, 20);
        assert_eq!(potion.kind, ItemKind::Consumable(ItemEffect::Heal(20.0)));
        assert!(find_item("Excalibur").is_none());
        assert_eq!(catalog().len(), 10);
    }

    #[test]
    fn inventory_add_remove() {
        let mut inv = Inventory::new();
        inv.add("Small Potion", 2);
        inv.add("Small Potion", 1);
        inv.add("Nothing", 0);
        assert_eq!(inv.count("Small Potion"), 3);
        assert_eq!(inv.count("Nothing"), 0);
        assert!(!inv.remove("Small Potion", 4));
        assert!(inv.remove("Small Potion", 3));
        assert!(inv.is_empty());
        assert!(!inv.remove("Small Potion", 1));
    }

    #[test]
    fn inventory_counts_saturate() {
        let mut inv = Inventory::new();
        inv.add("Rations", u32::MAX - 1);
        inv.add("Rations", 5);
        assert_eq!(inv.count("Rations"), u32::MAX);
    }

    #[test]
    fn inventory_serializes_as_map() {
        let mut inv = Inventory::new();
        inv.add("Rations", 2);
        assert_eq!(serde_json::to_string(&inv).unwrap(), r#"{"Rations":2}"#);
    }

    #[test]
    fn relics_progress() {
        let mut relics = Relics::default();
        assert_eq!(relics.collect(3), Some(true));
        assert_eq!(relics.collect(3), Some(false));
        assert_eq!(relics.collect(8), None);
        assert_eq!(relics.count(), 1);
        assert!(relics.is_found(3));
        assert!(!relics.is_found(99));
        for i in 0..RELIC_COUNT {
            relics.collect(i);
        }
        assert!(relics.is_complete());
    }
}
