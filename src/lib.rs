//! Cinema library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod core;
pub mod search;
pub mod storage;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// How the host platform gates writes to the downloads directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// No explicit permission model: downloads start immediately.
    #[default]
    Unrestricted,
    /// Storage access must be requested before every download.
    Permissioned,
}

impl Platform {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unrestricted" => Some(Platform::Unrestricted),
            "permissioned" => Some(Platform::Permissioned),
            _ => None,
        }
    }
}
