use serde::{Deserialize, Serialize};

use super::faction::FactionId;

/// A tile coordinate on the shared map.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Distance in tiles ignoring terrain (Chebyshev metric).
    pub fn aerial_distance(self, other: TilePos) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }
}

/// Category of a map resource. Bonus resources are never quest targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Bonus,
    Luxury,
    Strategic,
}

/// World-wide construction state of one wonder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wonder {
    /// Restricted to a single faction's roster; never a quest target.
    pub exclusive: bool,
    pub built_by: Option<FactionId>,
    /// Best completion fraction anywhere on the map, `0.0..=1.0`.
    pub progress: f64,
}

impl Wonder {
    pub fn unbuilt() -> Self {
        Self {
            exclusive: false,
            built_by: None,
            progress: 0.0,
        }
    }
}
