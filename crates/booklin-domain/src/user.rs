//! User domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Marketplace side a user belongs to.
///
/// Wire and storage format: `"CLIENT"` / `"PRO"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Client,
    Pro,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "CLIENT",
            Self::Pro => "PRO",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role string is neither `CLIENT` nor `PRO`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("role must be either CLIENT or PRO")]
pub struct InvalidUserRole;

impl FromStr for UserRole {
    type Err = InvalidUserRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLIENT" => Ok(Self::Client),
            "PRO" => Ok(Self::Pro),
            _ => Err(InvalidUserRole),
        }
    }
}
