//! Save slots on top of a key-value blob store.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::archetype::Archetype;
use crate::error::{SaveError, SaveResult};
use crate::snapshot::SessionSnapshot;

/// Number of save slots.
pub const SLOT_COUNT: usize = 5;
/// Key prefix for slot blobs.
pub const SLOT_PREFIX: &str = "elendor_save_";

/// Byte blobs addressed by string keys.
pub trait BlobStore {
    /// Fetch a blob, `None` if absent.
    fn get(&self, key: &str) -> SaveResult<Option<Vec<u8>>>;
    /// Store a blob, replacing any previous one.
    fn put(&mut self, key: &str, bytes: &[u8]) -> SaveResult<()>;
    /// Delete a blob. Returns whether it existed.
    fn remove(&mut self, key: &str) -> SaveResult<bool>;
}

/// In-memory store, mainly for tests and tools.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> SaveResult<Option<Vec<u8>>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> SaveResult<()> {
        self.blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> SaveResult<bool> {
        Ok(self.blobs.remove(key).is_some())
    }
}

/// One `<key>.json` file per blob inside a directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Use `root`, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> SaveResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The backing directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl BlobStore for DirStore {
    fn get(&self, key: &str) -> SaveResult<Option<Vec<u8>>> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> SaveResult<()> {
        std::fs::write(self.path_for(key), bytes)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> SaveResult<bool> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SaveRecord {
    name: String,
    saved_at: DateTime<Utc>,
    snapshot: SessionSnapshot,
}

/// Summary of an occupied slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotInfo {
    /// Slot index.
    pub slot: usize,
    /// Label given when saving.
    pub name: String,
    /// Character name.
    pub player: String,
    /// Character class.
    pub archetype: Archetype,
    /// In-game day.
    pub day: u32,
    /// When the save was written.
    pub saved_at: DateTime<Utc>,
}

/// Fixed set of numbered save slots.
#[derive(Debug)]
pub struct SaveSlots<S> {
    store: S,
}

impl<S: BlobStore> SaveSlots<S> {
    /// Manage slots in `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn key(slot: usize) -> SaveResult<String> {
        if slot >= SLOT_COUNT {
            return Err(SaveError::InvalidSlot {
                slot,
                max: SLOT_COUNT,
            });
        }
        Ok(format!("{SLOT_PREFIX}{slot}"))
    }

    /// Write a snapshot under a label, stamped with the current time.
    pub fn save(&mut self, slot: usize, name: &str, snapshot: &SessionSnapshot) -> SaveResult<()> {
        let key = Self::key(slot)?;
        let record = SaveRecord {
            name: name.to_string(),
            saved_at: Utc::now(),
            snapshot: snapshot.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&record)?;
        self.store.put(&key, &bytes)?;
        debug!(slot, name, "game saved");
        Ok(())
    }

    /// Read a slot's snapshot.
    pub fn load(&self, slot: usize) -> SaveResult<SessionSnapshot> {
        let key = Self::key(slot)?;
        let bytes = self.store.get(&key)?.ok_or(SaveError::EmptySlot(slot))?;
        let record: SaveRecord = serde_json::from_slice(&bytes)?;
        Ok(record.snapshot)
    }

    /// Clear a slot. Returns whether it held a save.
    pub fn delete(&mut self, slot: usize) -> SaveResult<bool> {
        let key = Self::key(slot)?;
        self.store.remove(&key)
    }

    /// Whether a slot holds a save. Out-of-range slots are empty.
    pub fn has(&self, slot: usize) -> bool {
        Self::key(slot)
            .ok()
            .and_then(|key| self.store.get(&key).ok().flatten())
            .is_some()
    }

    /// Occupied slots in order. Unreadable saves are skipped with a warning.
    pub fn list(&self) -> SaveResult<Vec<SlotInfo>> {
        let mut infos = Vec::new();
        for slot in 0..SLOT_COUNT {
            let key = Self::key(slot)?;
            let Some(bytes) = self.store.get(&key)? else {
                continue;
            };
            match serde_json::from_slice::<SaveRecord>(&bytes) {
                Ok(record) => infos.push(SlotInfo {
                    slot,
                    name: record.name,
                    player: record.snapshot.player.profile.name,
                    archetype: record.snapshot.player.profile.archetype,
                    day: record.snapshot.world.clock.day(),
                    saved_at: record.saved_at,
                }),
                Err(e) => warn!(slot, error = %e, "skipping unreadable save"),
            }
        }
        Ok(infos)
    }

    /// First empty slot, if any.
    pub fn next_available(&self) -> Option<usize> {
        (0..SLOT_COUNT).find(|&slot| !self.has(slot))
    }

    /// Delete every slot.
    pub fn clear_all(&mut self) -> SaveResult<()> {
        for slot in 0..SLOT_COUNT {
            self.delete(slot)?;
        }
        Ok(())
    }
}
