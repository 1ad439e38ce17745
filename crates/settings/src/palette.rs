//! The fixed set of named background colors.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedColor {
    Blue,
    Red,
    Green,
    Orange,
    Purple,
    Pink,
    Yellow,
    Indigo,
    Teal,
    Cyan,
    Brown,
    Mint,
    Gray,
    Black,
    White,
    Custom,
}

impl NamedColor {
    pub const ALL: [NamedColor; 16] = [
        NamedColor::Blue,
        NamedColor::Red,
        NamedColor::Green,
        NamedColor::Orange,
        NamedColor::Purple,
        NamedColor::Pink,
        NamedColor::Yellow,
        NamedColor::Indigo,
        NamedColor::Teal,
        NamedColor::Cyan,
        NamedColor::Brown,
        NamedColor::Mint,
        NamedColor::Gray,
        NamedColor::Black,
        NamedColor::White,
        NamedColor::Custom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Yellow => "yellow",
            Self::Indigo => "indigo",
            Self::Teal => "teal",
            Self::Cyan => "cyan",
            Self::Brown => "brown",
            Self::Mint => "mint",
            Self::Gray => "gray",
            Self::Black => "black",
            Self::White => "white",
            Self::Custom => "custom",
        }
    }

    /// Stored representation. `custom` has no color of its own and resolves
    /// to fully transparent.
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Blue => "#007AFF",
            Self::Red => "#FF3B30",
            Self::Green => "#34C759",
            Self::Orange => "#FF9500",
            Self::Purple => "#AF52DE",
            Self::Pink => "#FF2D55",
            Self::Yellow => "#FFCC00",
            Self::Indigo => "#5856D6",
            Self::Teal => "#30B0C7",
            Self::Cyan => "#32ADE6",
            Self::Brown => "#A2845E",
            Self::Mint => "#00C7BE",
            Self::Gray => "#8E8E93",
            Self::Black => "#000000",
            Self::White => "#FFFFFF",
            Self::Custom => "#00000000",
        }
    }

    /// Comma-separated list of every name, for user-facing constraint text.
    pub fn catalogue() -> String {
        Self::ALL.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a palette color: {0}")]
pub struct NotInPalette(pub String);

impl FromStr for NamedColor {
    type Err = NotInPalette;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == lowered)
            .ok_or_else(|| NotInPalette(s.to_string()))
    }
}
