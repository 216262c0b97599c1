use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ColorParseError, LoadError, LoadResult};

/// An opaque 8-bit color. Alpha is ignored by every raster convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Mean of the three channels.
    pub fn average(self) -> f64 {
        (f64::from(self.r) + f64::from(self.g) + f64::from(self.b)) / 3.0
    }

    /// Canonical lookup key: six lowercase hex digits, no `#`.
    pub fn hex_key(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `rrggbb`, optionally prefixed with `#`, in either case.
    pub fn from_hex(input: &str) -> Result<Self, ColorParseError> {
        let digits = input.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError(input.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError(input.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex_key())
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.hex_key()
    }
}

/// An immutable RGBA pixel buffer decoded from an image.
///
/// Every query clamps its coordinates into the raster, so callers never have
/// to bounds-check positions near the world edge.
#[derive(Clone)]
pub struct RasterMask {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl fmt::Debug for RasterMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterMask")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl RasterMask {
    /// Wrap an RGBA8 buffer of `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> LoadResult<Self> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(LoadError::BufferSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a raster by evaluating `paint` for every pixel. Zero dimensions
    /// are bumped to one pixel.
    pub fn from_fn(width: u32, height: u32, mut paint: impl FnMut(u32, u32) -> Rgb) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                let c = paint(x, y);
                pixels.extend_from_slice(&[c.r, c.g, c.b, 255]);
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A raster of a single color.
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        Self::from_fn(width, height, |_, _| color)
    }

    /// Decode an image file synchronously.
    pub fn open(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| LoadError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(LoadError::Empty {
                path: path.to_path_buf(),
            });
        }
        debug!(path = %path.display(), width, height, "decoded raster");
        Self::from_rgba(width, height, image.into_raw())
    }

    /// Decode an image file on the blocking pool.
    pub async fn load(path: impl Into<PathBuf>) -> LoadResult<Self> {
        let path = path.into();
        tokio::task::spawn_blocking(move || Self::open(&path)).await?
    }

    /// Raster width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    /// Color at integer coordinates, clamped into the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let i = (y * self.width as usize + x) * 4;
        Rgb::new(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2])
    }

    /// Color at world coordinates. Coordinates are floored then clamped;
    /// NaN samples the top-left pixel.
    pub fn sample(&self, x: f64, y: f64) -> Rgb {
        // Float-to-int casts saturate and map NaN to zero.
        let xi = x.floor().clamp(0.0, f64::from(self.width - 1)) as u32;
        let yi = y.floor().clamp(0.0, f64::from(self.height - 1)) as u32;
        self.pixel(xi, yi)
    }

    /// Iterate over every pixel as `(x, y, color)` in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, Rgb)> + '_ {
        let width = self.width;
        self.pixels.chunks_exact(4).enumerate().map(move |(i, px)| {
            let i = i as u32;
            (i % width, i / width, Rgb::new(px[0], px[1], px[2]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> RasterMask {
        RasterMask::from_fn(4, 3, |x, y| Rgb::new(x as u8 * 10, y as u8 * 10, 0))
    }

    #[test]
    fn hex_key_is_lowercase_without_hash() {
        assert_eq!(Rgb::new(0xED, 0x20, 0x24).hex_key(), "ed2024");
        assert_eq!(Rgb::new(0, 0x15, 0xFF).to_string(), "#0015ff");
    }

    #[test]
    fn from_hex_accepts_hash_and_upper_case() {
        assert_eq!(Rgb::from_hex("#ED2024"), Ok(Rgb::new(0xed, 0x20, 0x24)));
        assert_eq!(Rgb::from_hex("0a0d2f"), Ok(Rgb::new(0x0a, 0x0d, 0x2f)));
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("zzzzzz").is_err());
    }

    #[test]
    fn average_of_channels() {
        assert!((Rgb::new(30, 60, 90).average() - 60.0).abs() < f64::EPSILON);
        assert!((Rgb::WHITE.average() - 255.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sample_floors_coordinates() {
        let mask = gradient();
        assert_eq!(mask.sample(2.9, 1.1), Rgb::new(20, 10, 0));
    }

    #[test]
    fn sample_clamps_out_of_range() {
        let mask = gradient();
        assert_eq!(mask.sample(-50.0, -1.0), Rgb::new(0, 0, 0));
        assert_eq!(mask.sample(1e9, 1e9), Rgb::new(30, 20, 0));
        assert_eq!(mask.sample(f64::NAN, f64::INFINITY), Rgb::new(0, 20, 0));
        assert_eq!(mask.sample(f64::NEG_INFINITY, 1.0), Rgb::new(0, 10, 0));
    }

    #[test]
    fn from_rgba_rejects_wrong_size() {
        let err = RasterMask::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, LoadError::BufferSize { expected: 16, .. }));
        assert!(RasterMask::from_rgba(0, 2, Vec::new()).is_err());
    }

    #[test]
    fn pixels_iterates_row_major() {
        let mask = gradient();
        let all: Vec<_> = mask.pixels().collect();
        assert_eq!(all.len(), 12);
        assert_eq!(all[5], (1, 1, Rgb::new(10, 10, 0)));
    }

    #[test]
    fn rgb_serializes_as_hex_string() {
        let json = serde_json::to_string(&Rgb::new(0x55, 0x5e, 0xc6)).unwrap();
        assert_eq!(json, "\"555ec6\"");
        let back: Rgb = serde_json::from_str("\"#555EC6\"").unwrap();
        assert_eq!(back, Rgb::new(0x55, 0x5e, 0xc6));
    }

    #[test]
    fn open_missing_file_is_decode_error() {
        let err = RasterMask::open("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[test]
    fn open_round_trips_png() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("mask.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();
        let mask = RasterMask::open(&path).unwrap();
        assert_eq!((mask.width(), mask.height()), (3, 2));
        assert_eq!(mask.sample(2.0, 1.0), Rgb::new(1, 2, 3));
    }

    #[tokio::test]
    async fn load_decodes_off_thread() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("mask.png");
        image::RgbaImage::from_pixel(5, 5, image::Rgba([9, 9, 9, 255]))
            .save(&path)
            .unwrap();
        let mask = RasterMask::load(path).await.unwrap();
        assert_eq!(mask.width(), 5);
    }
}
