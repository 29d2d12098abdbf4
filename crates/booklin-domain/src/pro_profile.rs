//! Professional profile lifecycle enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Onboarding step of a professional profile.
///
/// Steps are totally ordered; variants are declared in onboarding order so the
/// derived `Ord` matches it. Wire and storage format: `SCREAMING_SNAKE_CASE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnboardingStep {
    EnterpriseInfo,
    ProfessionalInfo,
    Location,
    Media,
    Completed,
}

impl OnboardingStep {
    /// Every step, in onboarding order.
    pub const ALL: [Self; 5] = [
        Self::EnterpriseInfo,
        Self::ProfessionalInfo,
        Self::Location,
        Self::Media,
        Self::Completed,
    ];

    pub const FIRST: Self = Self::EnterpriseInfo;

    /// Zero-based position in [`Self::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The following step, or `None` at [`OnboardingStep::Completed`].
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Completion percentage once this step is reached:
    /// `round((index + 1) / total * 100)`.
    pub fn progress(self) -> u8 {
        let total = Self::ALL.len();
        (((self.index() + 1) * 100 + total / 2) / total) as u8
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Completed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnterpriseInfo => "ENTERPRISE_INFO",
            Self::ProfessionalInfo => "PROFESSIONAL_INFO",
            Self::Location => "LOCATION",
            Self::Media => "MEDIA",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid onboarding step")]
pub struct InvalidOnboardingStep;

impl FromStr for OnboardingStep {
    type Err = InvalidOnboardingStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or(InvalidOnboardingStep)
    }
}

/// Admin review status of a professional profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ValidationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid validation status")]
pub struct InvalidValidationStatus;

impl FromStr for ValidationStatus {
    type Err = InvalidValidationStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(InvalidValidationStatus),
        }
    }
}
