//! Canvas appearance presets.

use serde::{Deserialize, Serialize};

/// Canvas background gradient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundPreset {
    #[default]
    PurpleBlue,
    GreenTeal,
    RedOrange,
    Graphite,
}

/// Block fill gradient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockColorPreset {
    #[default]
    GreenTeal,
    YellowOrange,
    BluePurple,
    PinkRed,
}

impl BackgroundPreset {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PurpleBlue => "purple_blue",
            Self::GreenTeal => "green_teal",
            Self::RedOrange => "red_orange",
            Self::Graphite => "graphite",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "purple_blue" => Some(Self::PurpleBlue),
            "green_teal" => Some(Self::GreenTeal),
            "red_orange" => Some(Self::RedOrange),
            "graphite" => Some(Self::Graphite),
            _ => None,
        }
    }
}

impl BlockColorPreset {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GreenTeal => "green_teal",
            Self::YellowOrange => "yellow_orange",
            Self::BluePurple => "blue_purple",
            Self::PinkRed => "pink_red",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "green_teal" => Some(Self::GreenTeal),
            "yellow_orange" => Some(Self::YellowOrange),
            "blue_purple" => Some(Self::BluePurple),
            "pink_red" => Some(Self::PinkRed),
            _ => None,
        }
    }
}

/// User-selected look of the canvas. Never affects block state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub background: BackgroundPreset,
    pub block_color: BlockColorPreset,
}
