use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ColorParseError;
use crate::raster::{RasterMask, Rgb};

/// Maps exact zone-raster colors to zone names.
///
/// Serialized as an object of `"rrggbb": "Zone Name"` entries; keys may carry
/// a leading `#` and either case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct ZoneTable {
    zones: HashMap<Rgb, String>,
}

impl ZoneTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The zones of the Elendor world map.
    pub fn elendor() -> Self {
        const ZONES: [(Rgb, &str); 11] = [
            (Rgb::new(0xed, 0x20, 0x24), "Lakers City"),
            (Rgb::new(0xad, 0x14, 0x16), "Woodville City"),
            (Rgb::new(0xad, 0x2d, 0x2f), "Managarmr Central City"),
            (Rgb::new(0x00, 0x15, 0xff), "Wheatlived Village"),
            (Rgb::new(0x2a, 0x2a, 0x2e), "Fishmell Village"),
            (Rgb::new(0x55, 0x5e, 0xc6), "Stonedust Castle"),
            (Rgb::new(0x0e, 0x0e, 0x15), "Beautiful Harbor"),
            (Rgb::new(0x0a, 0x0d, 0x2f), "Wizard Tower"),
            (Rgb::new(0x67, 0x6b, 0x97), "Stronghold Maul"),
            (Rgb::new(0x20, 0x21, 0x33), "Dwarf Kingdom"),
            (Rgb::new(0x1f, 0x22, 0x48), "Elven Kingdom"),
        ];
        Self {
            zones: ZONES
                .iter()
                .map(|&(color, name)| (color, name.to_string()))
                .collect(),
        }
    }

    /// Add or replace a zone, returning the previous name for that color.
    pub fn insert(&mut self, color: Rgb, name: impl Into<String>) -> Option<String> {
        self.zones.insert(color, name.into())
    }

    /// Builder form of [`ZoneTable::insert`].
    pub fn with_zone(mut self, color: Rgb, name: impl Into<String>) -> Self {
        self.insert(color, name);
        self
    }

    /// Zone name for an exact color.
    pub fn zone_for(&self, color: Rgb) -> Option<&str> {
        self.zones.get(&color).map(String::as_str)
    }

    /// Zone name for a hex key such as `"#ED2024"` or `"ed2024"`.
    pub fn get(&self, key: &str) -> Option<&str> {
        Rgb::from_hex(key).ok().and_then(|c| self.zone_for(c))
    }

    /// Number of zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether the table has no zones.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Entries sorted by color key.
    pub fn entries(&self) -> Vec<(Rgb, &str)> {
        let mut entries: Vec<_> = self
            .zones
            .iter()
            .map(|(&c, name)| (c, name.as_str()))
            .collect();
        entries.sort_by_key(|&(c, _)| c);
        entries
    }
}

impl TryFrom<BTreeMap<String, String>> for ZoneTable {
    type Error = ColorParseError;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let zones = map
            .into_iter()
            .map(|(key, name)| Ok((Rgb::from_hex(&key)?, name)))
            .collect::<Result<_, ColorParseError>>()?;
        Ok(Self { zones })
    }
}

impl From<ZoneTable> for BTreeMap<String, String> {
    fn from(table: ZoneTable) -> Self {
        table
            .zones
            .into_iter()
            .map(|(c, name)| (c.hex_key(), name))
            .collect()
    }
}

/// Resolves world positions to named zones through a color-coded raster.
#[derive(Debug, Clone)]
pub struct LocationIndex {
    mask: Option<Arc<RasterMask>>,
    table: ZoneTable,
}

impl LocationIndex {
    /// Pair a zone raster with its color table.
    pub fn new(mask: Arc<RasterMask>, table: ZoneTable) -> Self {
        Self {
            mask: Some(mask),
            table,
        }
    }

    /// An index without a raster. Every position resolves to no zone.
    pub fn unloaded(table: ZoneTable) -> Self {
        Self { mask: None, table }
    }

    /// Whether a zone raster is attached.
    pub fn is_loaded(&self) -> bool {
        self.mask.is_some()
    }

    /// The color table.
    pub fn table(&self) -> &ZoneTable {
        &self.table
    }

    /// Zone name at a position, or `None` for unmapped colors.
    pub fn resolve(&self, x: f64, y: f64) -> Option<&str> {
        let mask = self.mask.as_ref()?;
        self.table.zone_for(mask.sample(x, y))
    }

    /// Pixel count per zone name, plus the count of unmapped pixels.
    pub fn coverage(&self) -> (BTreeMap<String, u64>, u64) {
        let mut zones = BTreeMap::new();
        let mut unmapped = 0;
        let Some(mask) = &self.mask else {
            return (zones, unmapped);
        };
        for (_, _, color) in mask.pixels() {
            match self.table.zone_for(color) {
                Some(name) => *zones.entry(name.to_string()).or_insert(0) += 1,
                None => unmapped += 1,
            }
        }
        (zones, unmapped)
    }
}
