//! Card color model.
//!
//! # Responsibility
//! - Hold the RGB fill of a note card.
//! - Generate random pastel colors for freshly created notes.
//! - Encode/decode the `#RRGGBB` persisted form.
//!
//! # Invariants
//! - Pastel channels are always in `128..=255`.
//! - `to_hex()` output is always accepted by `from_hex()`.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?([0-9A-Fa-f]{6})$").expect("valid hex color regex"));

const PASTEL_FLOOR: u8 = 128;

/// Error returned when a persisted color string cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    pub value: String,
}

impl Display for ColorParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid hex color `{}`; expected #RRGGBB", self.value)
    }
}

impl Error for ColorParseError {}

/// Opaque 8-bit RGB color of a note card.
///
/// Serialized as its `#RRGGBB` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl NoteColor {
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Generates a random light color from the thread-local RNG.
    pub fn random_pastel() -> Self {
        Self::random_pastel_with(&mut rand::thread_rng())
    }

    /// Draws each channel uniformly from the upper half of its range.
    pub fn random_pastel_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::rgb(
            rng.gen_range(PASTEL_FLOOR..=u8::MAX),
            rng.gen_range(PASTEL_FLOOR..=u8::MAX),
            rng.gen_range(PASTEL_FLOOR..=u8::MAX),
        )
    }

    /// Returns whether every channel lies in the pastel range.
    pub fn is_pastel(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|channel| *channel >= PASTEL_FLOOR)
    }

    /// Encodes as uppercase `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Decodes `#RRGGBB` (leading `#` optional, case-insensitive,
    /// surrounding whitespace ignored).
    pub fn from_hex(value: &str) -> Result<Self, ColorParseError> {
        let invalid = || ColorParseError {
            value: value.to_string(),
        };
        let digits = HEX_COLOR_RE
            .captures(value.trim())
            .and_then(|caps| caps.get(1))
            .ok_or_else(invalid)?;
        let packed = u32::from_str_radix(digits.as_str(), 16).map_err(|_| invalid())?;

        Ok(Self::rgb(
            ((packed >> 16) & 0xFF) as u8,
            ((packed >> 8) & 0xFF) as u8,
            (packed & 0xFF) as u8,
        ))
    }
}

impl Default for NoteColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Display for NoteColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<NoteColor> for String {
    fn from(value: NoteColor) -> Self {
        value.to_hex()
    }
}

impl TryFrom<String> for NoteColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(value.as_str())
    }
}
