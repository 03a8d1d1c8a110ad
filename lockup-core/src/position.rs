//! Storage space bounds and the position validator.
//!
//! A storage space spans the half-open ranges `[0, width)`, `[0, height)`
//! and `[0, depth)`. Positions outside those ranges are pulled back in by
//! saturating each axis independently.

use crate::ValidationError;
use serde::{Deserialize, Serialize};

/// Bounding dimensions of a storage space. Every axis is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDimensions")]
pub struct Dimensions {
    width: u32,
    height: u32,
    depth: u32,
}

#[derive(Deserialize)]
struct RawDimensions {
    width: u32,
    height: u32,
    depth: u32,
}

impl TryFrom<RawDimensions> for Dimensions {
    type Error = ValidationError;

    fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
        Dimensions::new(raw.width, raw.height, raw.depth)
    }
}

impl Dimensions {
    pub fn new(width: u32, height: u32, depth: u32) -> Result<Self, ValidationError> {
        for (axis, value) in [("width", width), ("height", height), ("depth", depth)] {
            if value == 0 {
                return Err(ValidationError::InvalidDimension {
                    axis,
                    value: i64::from(value),
                });
            }
        }
        Ok(Self {
            width,
            height,
            depth,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of addressable cells.
    pub fn volume(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height) * u64::from(self.depth)
    }

    pub fn contains(&self, position: Position) -> bool {
        axis_contains(position.x, self.width)
            && axis_contains(position.y, self.height)
            && axis_contains(position.z, self.depth)
    }

    /// Top-view `(x, z)` cells in picker order: one row per depth slice,
    /// each row running across the width. Coordinates use the same `i32`
    /// axes as [`Position`].
    pub fn grid_cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let width = i32::try_from(self.width).unwrap_or(i32::MAX);
        let depth = i32::try_from(self.depth).unwrap_or(i32::MAX);
        (0..depth).flat_map(move |z| (0..width).map(move |x| (x, z)))
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}×{}×{}", self.width, self.height, self.depth)
    }
}

/// A 3D cell coordinate inside a storage space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Move one level up, staying below the ceiling.
    pub fn step_up(self, dimensions: Dimensions) -> Self {
        let y = self.y.saturating_add(1);
        clamp_position(dimensions, Self { y, ..self })
    }

    /// Move one level down, staying on or above the floor.
    pub fn step_down(self, dimensions: Dimensions) -> Self {
        let y = self.y.saturating_sub(1);
        clamp_position(dimensions, Self { y, ..self })
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{},{}]", self.x, self.y, self.z)
    }
}

fn axis_contains(value: i32, dim: u32) -> bool {
    value >= 0 && i64::from(value) < i64::from(dim)
}

/// Saturate one coordinate into `[0, dim)`: `max(0, min(v, dim - 1))`.
pub fn clamp_axis(value: i32, dim: u32) -> i32 {
    let upper = i64::from(dim) - 1;
    // Result is within [0, max(value, 0)], so the cast is lossless.
    i64::from(value).min(upper).max(0) as i32
}

/// Clamp a position into the bounds of a storage space.
pub fn clamp_position(dimensions: Dimensions, position: Position) -> Position {
    Position {
        x: clamp_axis(position.x, dimensions.width),
        y: clamp_axis(position.y, dimensions.height),
        z: clamp_axis(position.z, dimensions.depth),
    }
}


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
