//! Ball tiers and the merge chain
//!
//! Each tier is a colour with a fixed radius and score value. Two touching
//! balls of the same tier merge into the tier's `next`; the last tier is
//! terminal.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Ranked colour category, ordered smallest to largest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Yellow,
    Orange,
    Red,
    Blue,
    Purple,
    Green,
    DarkGreen,
    DarkBlue,
    Pink,
    Lavender,
    Crimson,
    Gold,
}

impl Tier {
    pub const COUNT: usize = 12;

    pub const ALL: [Tier; Tier::COUNT] = [
        Tier::Yellow,
        Tier::Orange,
        Tier::Red,
        Tier::Blue,
        Tier::Purple,
        Tier::Green,
        Tier::DarkGreen,
        Tier::DarkBlue,
        Tier::Pink,
        Tier::Lavender,
        Tier::Crimson,
        Tier::Gold,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Display colour (RGB)
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Tier::Yellow => [255, 255, 186],
            Tier::Orange => [255, 223, 186],
            Tier::Red => [255, 179, 186],
            Tier::Blue => [186, 225, 255],
            Tier::Purple => [195, 177, 225],
            Tier::Green => [186, 255, 201],
            Tier::DarkGreen => [184, 216, 190],
            Tier::DarkBlue => [62, 71, 114],
            Tier::Pink => [248, 200, 220],
            Tier::Lavender => [230, 230, 250],
            Tier::Crimson => [220, 20, 60],
            Tier::Gold => [255, 215, 0],
        }
    }
}

/// Attributes of a single tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierSpec {
    pub radius: f32,
    /// Points awarded when two balls of this tier merge
    pub score: u64,
    /// Merge result, `None` for the terminal tier
    pub next: Option<Tier>,
}

/// Lookup table indexed by [`Tier`], validated on construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TierSpec>", into = "Vec<TierSpec>")]
pub struct TierTable {
    specs: [TierSpec; Tier::COUNT],
}

impl TierTable {
    /// Build a table from one entry per tier, in tier order
    pub fn new(specs: Vec<TierSpec>) -> Result<Self, ConfigError> {
        let specs: [TierSpec; Tier::COUNT] = specs.try_into().map_err(|v: Vec<TierSpec>| {
            ConfigError::TierCount {
                expected: Tier::COUNT,
                found: v.len(),
            }
        })?;

        for (tier, spec) in Tier::ALL.iter().zip(specs.iter()) {
            if !spec.radius.is_finite() || spec.radius <= 0.0 {
                return Err(ConfigError::InvalidRadius {
                    tier: *tier,
                    radius: spec.radius,
                });
            }
            if spec.score == 0 {
                return Err(ConfigError::ZeroScore { tier: *tier });
            }
        }

        let table = Self { specs };
        if let Some(tier) = table.find_cycle() {
            return Err(ConfigError::TierCycle { tier });
        }
        Ok(table)
    }

    /// First tier that can reach itself through `next`, if any
    fn find_cycle(&self) -> Option<Tier> {
        Tier::ALL.into_iter().find(|&start| {
            let mut current = self.next(start);
            // A chain longer than the tier count must revisit something
            for _ in 0..Tier::COUNT {
                match current {
                    Some(t) if t == start => return true,
                    Some(t) => current = self.next(t),
                    None => return false,
                }
            }
            false
        })
    }

    #[inline]
    pub fn spec(&self, tier: Tier) -> &TierSpec {
        &self.specs[tier.index()]
    }

    #[inline]
    pub fn radius(&self, tier: Tier) -> f32 {
        self.spec(tier).radius
    }

    #[inline]
    pub fn score(&self, tier: Tier) -> u64 {
        self.spec(tier).score
    }

    #[inline]
    pub fn next(&self, tier: Tier) -> Option<Tier> {
        self.spec(tier).next
    }

    /// Largest radius in the table
    pub fn max_radius(&self) -> f32 {
        self.specs.iter().map(|s| s.radius).fold(0.0, f32::max)
    }
}

impl Default for TierTable {
    fn default() -> Self {
        const RADII: [f32; Tier::COUNT] = [
            10.0, 20.0, 40.0, 50.0, 60.0, 70.0, 80.0, 100.0, 120.0, 130.0, 150.0, 180.0,
        ];
        let specs = std::array::from_fn(|i| TierSpec {
            radius: RADII[i],
            score: 10 * (i as u64 + 1),
            next: Tier::from_index(i + 1),
        });
        Self { specs }
    }
}

impl TryFrom<Vec<TierSpec>> for TierTable {
    type Error = ConfigError;

    fn try_from(specs: Vec<TierSpec>) -> Result<Self, Self::Error> {
        Self::new(specs)
    }
}

impl From<TierTable> for Vec<TierSpec> {
    fn from(table: TierTable) -> Self {
        table.specs.to_vec()
    }
}
