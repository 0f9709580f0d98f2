use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use tracing::{debug, warn};

use super::{BuildAbility, BuildAbilityProbe};
use crate::binary::BinarySpec;

/// Explicit buildability configured for a binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildableOverride {
  /// Ask the probe.
  #[default]
  Unset,
  ForcedTrue,
  ForcedFalse,
}

impl From<bool> for BuildableOverride {
  fn from(buildable: bool) -> Self {
    if buildable { Self::ForcedTrue } else { Self::ForcedFalse }
  }
}

/// Memoized [`BuildAbility`] of one binary.
///
/// The cell starts *unresolved*. The first call to [`AbilityCell::resolve`]
/// moves it to *probing* and then to *resolved*; the value never changes
/// after that. Concurrent first callers block until the single resolution
/// finishes and then all observe the same value.
#[derive(Debug, Default)]
pub struct AbilityCell {
  buildable: BuildableOverride,
  resolved: OnceLock<BuildAbility>,
}

impl AbilityCell {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn buildable_override(&self) -> BuildableOverride {
    self.buildable
  }

  /// Sets the override. Returns `false` and changes nothing if the cell is
  /// already resolved.
  pub fn set_override(&mut self, buildable: BuildableOverride) -> bool {
    if self.is_resolved() {
      return false;
    }
    self.buildable = buildable;
    true
  }

  pub fn is_resolved(&self) -> bool {
    self.resolved.get().is_some()
  }

  pub fn get(&self) -> Option<&BuildAbility> {
    self.resolved.get()
  }

  /// Resolves the ability, probing at most once over the cell's lifetime.
  ///
  /// The probe must not query the ability of `binary` itself.
  pub fn resolve(&self, binary: &BinarySpec, probe: &dyn BuildAbilityProbe) -> &BuildAbility {
    self.resolved.get_or_init(|| match self.buildable {
      BuildableOverride::ForcedFalse => {
        debug!(binary = %binary.name(), "binary explicitly disabled, skipping probe");
        BuildAbility::explicitly_disabled()
      }
      BuildableOverride::ForcedTrue => {
        debug!(binary = %binary.name(), "binary explicitly enabled, skipping probe");
        BuildAbility::Buildable
      }
      BuildableOverride::Unset => run_probe(binary, probe),
    })
  }
}

fn run_probe(binary: &BinarySpec, probe: &dyn BuildAbilityProbe) -> BuildAbility {
  debug!(binary = %binary.name(), "probing build ability");

  let outcome = panic::catch_unwind(AssertUnwindSafe(|| probe.probe(binary)));
  let ability = match outcome {
    Ok(Ok(ability)) => ability,
    Ok(Err(err)) => {
      warn!(binary = %binary.name(), error = %err, "build ability probe failed");
      BuildAbility::not_buildable(format!("probe failed: {}", err))
    }
    Err(payload) => {
      let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
      warn!(binary = %binary.name(), panic = %message, "build ability probe panicked");
      BuildAbility::not_buildable(format!("probe panicked: {}", message))
    }
  };

  debug!(binary = %binary.name(), ability = %ability, "build ability resolved");
  ability
}
