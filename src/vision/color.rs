/// RGB color values as stored in the catalog
///
/// The catalog keeps colors as text in the canonical form `rgb(R,G,B)`.
/// This module owns parsing and formatting of that form so the validator,
/// the row mapper and the recommender all agree on what is well formed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Mean channel value below which a garment counts as dark
pub const DARKNESS_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unweighted mean of the three channels.
    ///
    /// Deliberately not luma: stored outfits were matched with this formula.
    pub fn darkness(&self) -> f64 {
        (f64::from(self.r) + f64::from(self.g) + f64::from(self.b)) / 3.0
    }

    pub fn is_dark(&self) -> bool {
        self.darkness() < DARKNESS_THRESHOLD
    }

    /// Build from floating point channels, rounding and clamping to 0..=255
    pub fn from_channels(channels: [f64; 3]) -> Self {
        let [r, g, b] = channels.map(|c| c.round().clamp(0.0, 255.0) as u8);
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseRgbError {
    #[error("expected rgb(R,G,B)")]
    Shape,
    #[error("expected exactly three components, found {0}")]
    ComponentCount(usize),
    #[error("component '{0}' is not an integer in 0..=255")]
    Component(String),
}

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or(ParseRgbError::Shape)?;

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ParseRgbError::ComponentCount(parts.len()));
        }

        let mut channels = [0u8; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            // u8 parsing rejects negatives and anything above 255
            *slot = part
                .parse::<u8>()
                .map_err(|_| ParseRgbError::Component(part.to_string()))?;
        }

        let [r, g, b] = channels;
        Ok(Rgb { r, g, b })
    }
}
