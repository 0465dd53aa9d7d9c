//! Level data: platform segments and bat spawn definitions
//!
//! A level is an ordered sequence of platform records plus an ordered
//! sequence of bat records. It is validated once at load time and immutable
//! afterwards; the chest sits centered on top of the last platform, so a
//! level without platforms is a hard error, not a playable state.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::collision::Rect;
use crate::consts::{BLOCK_SIZE, CHEST_HEIGHT, CHEST_WIDTH};

/// Platform surface kind; danger is a property of the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Safe landing area at the level start
    Spawn,
    /// Ordinary stone platform
    Brick,
    /// Lethal on contact
    Magma,
}

impl PlatformKind {
    /// Landing on a dangerous platform resets the run
    pub fn is_dangerous(self) -> bool {
        matches!(self, PlatformKind::Magma)
    }
}

/// One platform segment. `y` is the top surface; the solid body is one
/// block tall.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, kind: PlatformKind) -> Self {
        Self { x, y, width, kind }
    }

    /// The solid body used for ceiling and side checks
    pub fn body(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, BLOCK_SIZE)
    }
}

/// Bat spawn record: a vertical patrol around `y` with the given speed
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BatSpawn {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Initial vertical speed per tick (sign = initial direction)
    pub speed: f32,
    /// Maximum deviation from the patrol origin before reflecting
    pub range: f32,
}

/// Level load/parse failures
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    /// A level needs at least one platform for spawn and chest placement
    NoPlatforms,
    ZeroWidthPlatform { index: usize },
    /// Platform widths must tile into whole blocks
    MisalignedWidth { index: usize, width: f32 },
    Parse(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::NoPlatforms => {
                write!(f, "level has no platforms; chest placement needs at least one")
            }
            LevelError::ZeroWidthPlatform { index } => {
                write!(f, "platform {index} has zero or negative width")
            }
            LevelError::MisalignedWidth { index, width } => {
                write!(
                    f,
                    "platform {index} width {width} is not a multiple of the block size {BLOCK_SIZE}"
                )
            }
            LevelError::Parse(msg) => write!(f, "malformed level document: {msg}"),
        }
    }
}

impl std::error::Error for LevelError {}

/// Immutable level: validated platform and bat tables
#[derive(Debug, Clone, Serialize)]
pub struct Level {
    platforms: Vec<Platform>,
    bats: Vec<BatSpawn>,
}

/// Deserialization routes through `Level::new` so no load path can produce
/// an unvalidated level.
impl<'de> Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            platforms: Vec<Platform>,
            #[serde(default)]
            bats: Vec<BatSpawn>,
        }
        let raw = Raw::deserialize(deserializer)?;
        Level::new(raw.platforms, raw.bats).map_err(serde::de::Error::custom)
    }
}

impl Level {
    /// Validate and seal a level. Fails fast on data the simulation cannot
    /// run with.
    pub fn new(platforms: Vec<Platform>, bats: Vec<BatSpawn>) -> Result<Self, LevelError> {
        if platforms.is_empty() {
            return Err(LevelError::NoPlatforms);
        }
        for (index, plat) in platforms.iter().enumerate() {
            if plat.width <= 0.0 {
                return Err(LevelError::ZeroWidthPlatform { index });
            }
            if plat.width % BLOCK_SIZE != 0.0 {
                return Err(LevelError::MisalignedWidth { index, width: plat.width });
            }
        }
        Ok(Self { platforms, bats })
    }

    /// Parse a level from its JSON wire format
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        #[derive(Deserialize)]
        struct Doc {
            platforms: Vec<Platform>,
            #[serde(default)]
            bats: Vec<BatSpawn>,
        }
        let doc: Doc =
            serde_json::from_str(json).map_err(|e| LevelError::Parse(e.to_string()))?;
        Self::new(doc.platforms, doc.bats)
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn bats(&self) -> &[BatSpawn] {
        &self.bats
    }

    /// Chest rest position: centered on top of the final platform
    pub fn chest_rect(&self) -> Rect {
        // Validated non-empty in `new`
        let last = self.platforms.last().expect("level has platforms");
        Rect::new(
            last.x + (last.width - CHEST_WIDTH) / 2.0,
            last.y - CHEST_HEIGHT,
            CHEST_WIDTH,
            CHEST_HEIGHT,
        )
    }
}

/// The built-in dungeon level: five brick/magma challenges, a bat gauntlet
/// near the end, and the chest platform.
pub fn dungeon_level() -> Level {
    use PlatformKind::{Brick, Magma, Spawn};
    let platforms = vec![
        // Spawn area
        Platform::new(0.0, 400.0, 104.0, Spawn),
        Platform::new(150.0, 400.0, 80.0, Brick),
        // First challenge - small height changes
        Platform::new(280.0, 380.0, 64.0, Brick),
        Platform::new(390.0, 400.0, 64.0, Brick),
        // First magma challenge
        Platform::new(500.0, 380.0, 64.0, Magma),
        Platform::new(610.0, 400.0, 104.0, Brick),
        // Second challenge - gentle ups and downs
        Platform::new(760.0, 420.0, 64.0, Brick),
        Platform::new(870.0, 400.0, 64.0, Brick),
        // Second magma challenge
        Platform::new(980.0, 380.0, 64.0, Magma),
        Platform::new(1090.0, 400.0, 104.0, Brick),
        // Third challenge
        Platform::new(1240.0, 420.0, 64.0, Brick),
        Platform::new(1350.0, 400.0, 64.0, Brick),
        // Third magma challenge
        Platform::new(1460.0, 380.0, 64.0, Magma),
        Platform::new(1570.0, 400.0, 104.0, Brick),
        // Fourth challenge
        Platform::new(1720.0, 420.0, 64.0, Brick),
        Platform::new(1830.0, 400.0, 64.0, Brick),
        // Fourth magma challenge
        Platform::new(1940.0, 380.0, 64.0, Magma),
        Platform::new(2050.0, 400.0, 104.0, Brick),
        // Fifth challenge
        Platform::new(2200.0, 420.0, 64.0, Brick),
        Platform::new(2310.0, 400.0, 64.0, Brick),
        // Fifth magma challenge
        Platform::new(2420.0, 380.0, 64.0, Magma),
        Platform::new(2530.0, 400.0, 104.0, Brick),
        // Final approach
        Platform::new(2680.0, 400.0, 64.0, Brick),
        // Final platform carries the chest
        Platform::new(2790.0, 400.0, 104.0, Brick),
    ];
    let bats = vec![
        BatSpawn { x: 2000.0, y: 300.0, width: 16.0, height: 12.0, speed: 2.0, range: 100.0 },
        BatSpawn { x: 2200.0, y: 350.0, width: 16.0, height: 12.0, speed: 1.5, range: 80.0 },
        BatSpawn { x: 2400.0, y: 320.0, width: 16.0, height: 12.0, speed: 2.5, range: 120.0 },
    ];
    Level::new(platforms, bats).expect("built-in level is valid")
}
