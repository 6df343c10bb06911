use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What the user sees when the lookup request or its stream fails
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupErrorPolicy {
    /// Log only; the loading state is cleared and nothing else happens
    #[default]
    Silent,
    /// Log and emit an error notice
    Notify,
}

impl FromStr for LookupErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" => Ok(Self::Silent),
            "notify" => Ok(Self::Notify),
            other => Err(format!(
                "unknown lookup error policy '{other}', expected 'silent' or 'notify'"
            )),
        }
    }
}

impl fmt::Display for LookupErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Silent => f.write_str("silent"),
            Self::Notify => f.write_str("notify"),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LookupConfig {
    pub on_error: LookupErrorPolicy,
}
