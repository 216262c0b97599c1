use std::path::PathBuf;

/// Alias for `Result<T, LoadError>`.
pub type LoadResult<T> = Result<T, LoadError>;
/// Alias for `Result<T, SaveError>`.
pub type SaveResult<T> = Result<T, SaveError>;
/// Alias for `Result<T, ConfigError>`.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failure to turn an image on disk into a [`crate::raster::RasterMask`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read or decoded as an image.
    #[error("failed to decode raster {}: {source}", .path.display())]
    Decode {
        /// The image path.
        path: PathBuf,
        /// The decoder's error.
        #[source]
        source: image::ImageError,
    },

    /// The image decoded to zero pixels.
    #[error("raster {} has no pixels", .path.display())]
    Empty {
        /// The image path.
        path: PathBuf,
    },

    /// A raw pixel buffer does not match its stated dimensions.
    #[error("raster buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        /// Stated width in pixels.
        width: u32,
        /// Stated height in pixels.
        height: u32,
        /// Bytes needed for the stated size.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },

    /// The background decode task panicked or was cancelled.
    #[error("raster decode task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Errors from the save slot store.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The slot index is outside the store.
    #[error("invalid save slot {slot} (expected 0..{max})")]
    InvalidSlot {
        /// The requested slot.
        slot: usize,
        /// Number of slots in the store.
        max: usize,
    },

    /// Nothing has been saved in the slot.
    #[error("no save data found in slot {0}")]
    EmptySlot(usize),

    /// The slot file is not a valid save record.
    #[error("save data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Reading or writing the slot file failed.
    #[error("save store I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors loading a [`crate::config::SessionConfig`] file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        /// The config path.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid config JSON.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors parsing an input script.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    /// A segment has no content.
    #[error("segment {index} is empty")]
    EmptySegment {
        /// Zero-based segment position.
        index: usize,
    },

    /// A segment names a key the script does not know.
    #[error("unknown key '{key}' in segment {index}")]
    UnknownKey {
        /// Zero-based segment position.
        index: usize,
        /// The unrecognized key.
        key: String,
    },

    /// A segment's tick count is not a whole number.
    #[error("invalid tick count '{count}' in segment {index}")]
    BadCount {
        /// Zero-based segment position.
        index: usize,
        /// The count as written.
        count: String,
    },
}

/// A color string that is not `#RRGGBB` hex.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}': expected six hex digits")]
pub struct ColorParseError(pub String);
