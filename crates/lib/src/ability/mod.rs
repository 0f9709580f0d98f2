//! Build eligibility of a binary.
//!
//! [`BuildAbility`] is the outcome; [`BuildAbilityProbe`] implementations
//! compute it from the environment; [`AbilityCell`] memoizes the outcome for
//! one binary and applies explicit overrides.
//!
//! Not being buildable is an ordinary result. Probe errors never escape this
//! module: they are folded into [`BuildAbility::NotBuildable`].

mod probe;
mod resolve;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::EXPLICITLY_DISABLED;

pub use probe::{BuildAbilityProbe, CompositeProbe, FixedProbe, PlatformProbe, ProbeError, ToolchainProbe};
pub use resolve::{AbilityCell, BuildableOverride};

/// Whether a binary can be built in the current environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BuildAbility {
  Buildable,
  NotBuildable { reason: String },
}

impl BuildAbility {
  pub fn not_buildable(reason: impl Into<String>) -> Self {
    Self::NotBuildable { reason: reason.into() }
  }

  pub fn explicitly_disabled() -> Self {
    Self::not_buildable(EXPLICITLY_DISABLED)
  }

  pub fn is_buildable(&self) -> bool {
    matches!(self, Self::Buildable)
  }

  /// Diagnostic for a non-buildable outcome.
  pub fn reason(&self) -> Option<&str> {
    match self {
      Self::Buildable => None,
      Self::NotBuildable { reason } => Some(reason),
    }
  }

  /// Combines two outcomes. The first `NotBuildable` wins.
  pub fn and(self, other: BuildAbility) -> BuildAbility {
    match self {
      Self::Buildable => other,
      not_buildable => not_buildable,
    }
  }
}

impl fmt::Display for BuildAbility {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Buildable => write!(f, "buildable"),
      Self::NotBuildable { reason } => write!(f, "not buildable: {}", reason),
    }
  }
}
