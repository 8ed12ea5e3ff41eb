use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// The seven classifier labels.
///
/// Declaration order is the chart ordinal order: `Disgusted` sits at the
/// bottom of the axis and `Angry` at the top. The same mapping is used when a
/// capture is labeled and when a timeline is projected onto a numeric axis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum Emotion {
    Disgusted,
    Fearful,
    Sad,
    Neutral,
    Happy,
    Surprised,
    Angry,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Disgusted,
        Emotion::Fearful,
        Emotion::Sad,
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Surprised,
        Emotion::Angry,
    ];

    pub const MAX_ORDINAL: u8 = 6;

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Disgusted => "Disgusted",
            Emotion::Fearful => "Fearful",
            Emotion::Sad => "Sad",
            Emotion::Neutral => "Neutral",
            Emotion::Happy => "Happy",
            Emotion::Surprised => "Surprised",
            Emotion::Angry => "Angry",
        }
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            Emotion::Disgusted => 0,
            Emotion::Fearful => 1,
            Emotion::Sad => 2,
            Emotion::Neutral => 3,
            Emotion::Happy => 4,
            Emotion::Surprised => 5,
            Emotion::Angry => 6,
        }
    }

    pub fn from_ordinal(value: u8) -> Option<Emotion> {
        Self::ALL.get(usize::from(value)).copied()
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = anyhow::Error;

    /// Accepts the display labels in any case, plus the base forms some
    /// classifier backends emit (`disgust`, `fear`, `surprise`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "disgusted" | "disgust" => Ok(Emotion::Disgusted),
            "fearful" | "fear" => Ok(Emotion::Fearful),
            "sad" => Ok(Emotion::Sad),
            "neutral" => Ok(Emotion::Neutral),
            "happy" => Ok(Emotion::Happy),
            "surprised" | "surprise" => Ok(Emotion::Surprised),
            "angry" => Ok(Emotion::Angry),
            other => Err(anyhow!("unknown emotion label '{other}'")),
        }
    }
}

impl TryFrom<String> for Emotion {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
