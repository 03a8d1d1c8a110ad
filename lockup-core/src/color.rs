//! Display color value type and its byte codec.
//!
//! The core never interprets a color; it only carries it around and
//! encodes it. The wire form is 16 bytes: four little-endian `f32`
//! channels in RGBA order, each normalized to `[0, 1]`.

use crate::ColorCodecError;
use serde::{Deserialize, Serialize};

/// Length in bytes of an encoded [`Color`].
pub const COLOR_BLOB_LEN: usize = 16;

/// An opaque display color with normalized channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color {
    pub const RED: Color = Color::opaque(1.0, 0.231, 0.188);
    pub const YELLOW: Color = Color::opaque(1.0, 0.8, 0.0);
    pub const ORANGE: Color = Color::opaque(1.0, 0.584, 0.0);
    pub const BLUE: Color = Color::opaque(0.0, 0.478, 1.0);
    pub const GREEN: Color = Color::opaque(0.204, 0.78, 0.349);
    pub const GRAY: Color = Color::opaque(0.557, 0.557, 0.576);

    /// Color used when an encoded blob cannot be decoded.
    pub const FALLBACK: Color = Color::BLUE;

    pub const fn opaque(red: f32, green: f32, blue: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    pub fn from_rgba8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red: f32::from(red) / 255.0,
            green: f32::from(green) / 255.0,
            blue: f32::from(blue) / 255.0,
            alpha: f32::from(alpha) / 255.0,
        }
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            quantize(self.red),
            quantize(self.green),
            quantize(self.blue),
            quantize(self.alpha),
        ]
    }

    /// Encode to the 16-byte RGBA blob.
    pub fn to_bytes(&self) -> [u8; COLOR_BLOB_LEN] {
        let mut out = [0u8; COLOR_BLOB_LEN];
        for (chunk, channel) in out
            .chunks_exact_mut(4)
            .zip([self.red, self.green, self.blue, self.alpha])
        {
            chunk.copy_from_slice(&channel.to_le_bytes());
        }
        out
    }

    /// Decode a blob produced by [`Color::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ColorCodecError> {
        if bytes.len() != COLOR_BLOB_LEN {
            return Err(ColorCodecError::InvalidLength {
                expected: COLOR_BLOB_LEN,
                got: bytes.len(),
            });
        }

        let mut channels = [0f32; 4];
        for (slot, chunk) in channels.iter_mut().zip(bytes.chunks_exact(4)) {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(chunk);
            *slot = f32::from_le_bytes(raw);
        }

        for (name, value) in ["red", "green", "blue", "alpha"].into_iter().zip(channels) {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ColorCodecError::ChannelOutOfRange {
                    channel: name,
                    value,
                });
            }
        }

        let [red, green, blue, alpha] = channels;
        Ok(Self {
            red,
            green,
            blue,
            alpha,
        })
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Serde adapter that embeds a [`Color`] as its byte blob.
///
/// Use with `#[serde(with = "crate::color::blob")]`. A blob that fails to
/// decode is replaced by [`Color::FALLBACK`] instead of failing the whole
/// entity.
pub mod blob {
    use super::Color;
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::warn;

    pub fn serialize<S>(color: &Color, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&color.to_bytes())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        Ok(Color::from_bytes(&bytes).unwrap_or_else(|err| {
            warn!(error = %err, "Undecodable color blob, using fallback");
            Color::FALLBACK
        }))
    }
}
