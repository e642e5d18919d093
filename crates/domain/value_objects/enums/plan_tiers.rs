use std::fmt::Display;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    #[default]
    Free,
    Premium,
    Business,
}

impl Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tier = match self {
            PlanTier::Free => "free",
            PlanTier::Premium => "premium",
            PlanTier::Business => "business",
        };
        write!(f, "{}", tier)
    }
}

impl TryFrom<&str> for PlanTier {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(PlanTier::Free),
            "premium" => Ok(PlanTier::Premium),
            "business" => Ok(PlanTier::Business),
            other => Err(anyhow!("Unknown plan id: {}", other)),
        }
    }
}

impl PlanTier {
    pub const ALL: [PlanTier; 3] = [PlanTier::Free, PlanTier::Premium, PlanTier::Business];

    pub fn display_name(&self) -> &'static str {
        match self {
            PlanTier::Free => "Free",
            PlanTier::Premium => "Premium",
            PlanTier::Business => "Business",
        }
    }
}
