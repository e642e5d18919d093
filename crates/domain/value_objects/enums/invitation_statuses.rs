use std::fmt::Display;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            InvitationStatus::Draft => "draft",
            InvitationStatus::Published => "published",
            InvitationStatus::Archived => "archived",
        };
        write!(f, "{}", status)
    }
}

impl TryFrom<&str> for InvitationStatus {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "draft" => Ok(InvitationStatus::Draft),
            "published" => Ok(InvitationStatus::Published),
            "archived" => Ok(InvitationStatus::Archived),
            other => Err(anyhow!("Unknown invitation status: {}", other)),
        }
    }
}
