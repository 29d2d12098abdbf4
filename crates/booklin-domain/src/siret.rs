//! French business registration number (SIRET).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const SIRET_LEN: usize = 14;

/// A SIRET: exactly 14 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Siret(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("SIRET must be 14 digits")]
pub struct InvalidSiret;

impl Siret {
    pub fn parse(raw: &str) -> Result<Self, InvalidSiret> {
        if raw.len() != SIRET_LEN || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidSiret);
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Siret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Siret {
    type Err = InvalidSiret;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Siret {
    type Error = InvalidSiret;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Siret> for String {
    fn from(siret: Siret) -> Self {
        siret.0
    }
}
