use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

pub const CABINET_V1: &str = include_str!("../data/prompts/cabinet_v1.txt");
pub const CABINET_V2: &str = include_str!("../data/prompts/cabinet_v2.txt");

/// Reply the prompts ask for when no slot is empty.
pub const ALL_FILLED_MARKER: &str = "NONE";

/// Selects which cabinet instruction is sent with every image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptVersion {
    V1,
    /// Adds role framing, a step-by-step scaffold and a glare caveat.
    #[default]
    V2,
}

impl PromptVersion {
    pub fn text(self) -> &'static str {
        match self {
            Self::V1 => CABINET_V1,
            Self::V2 => CABINET_V2,
        }
    }
}

impl FromStr for PromptVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" => Ok(Self::V2),
            other => Err(Error::Configuration(format!(
                "Unknown prompt version '{}'. Expected 'v1' or 'v2'",
                other
            ))),
        }
    }
}

impl fmt::Display for PromptVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("v1"),
            Self::V2 => f.write_str("v2"),
        }
    }
}
