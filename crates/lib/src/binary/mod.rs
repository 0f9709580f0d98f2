//! Binaries: the buildable outputs of a component.
//!
//! A [`BinarySpec`] is configured through `&mut self` methods (owned sources,
//! borrowed sources, buildable override) and afterwards only read. Its
//! [`BuildAbility`] is resolved on first query and cached.

mod container;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::ability::{AbilityCell, BuildAbility, BuildAbilityProbe, BuildableOverride};
use crate::platform::Platform;
use crate::source::{SourceAggregator, SourceRef, SourceSetGroup};

pub use container::{BinaryContainer, ContainerError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BinaryError {
  /// `set_binary_sources` was called on a binary that already owns a group.
  #[error("sources of binary '{binary}' are already configured")]
  AlreadyConfigured { binary: String },

  /// The buildable override was changed after the ability was resolved.
  #[error("build ability of binary '{binary}' is already resolved")]
  AbilityAlreadyResolved { binary: String },
}

/// What kind of output a binary produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BinaryKind {
  SharedLibrary,
  StaticLibrary,
  Executable,
  TestSuite,
}

impl fmt::Display for BinaryKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::SharedLibrary => write!(f, "shared library"),
      Self::StaticLibrary => write!(f, "static library"),
      Self::Executable => write!(f, "executable"),
      Self::TestSuite => write!(f, "test suite"),
    }
  }
}

/// A single buildable output.
pub struct BinarySpec {
  name: String,
  kind: BinaryKind,
  legacy: bool,
  target_platform: Option<Platform>,
  sources: SourceAggregator,
  ability: AbilityCell,
  probe: Arc<dyn BuildAbilityProbe>,
}

impl BinarySpec {
  /// Creates an explicitly declared binary.
  pub fn new(name: impl Into<String>, kind: BinaryKind, probe: Arc<dyn BuildAbilityProbe>) -> Self {
    Self {
      name: name.into(),
      kind,
      legacy: false,
      target_platform: None,
      sources: SourceAggregator::new(),
      ability: AbilityCell::new(),
      probe,
    }
  }

  /// Creates a binary synthesized by the single-binary-per-component path.
  pub fn new_legacy(name: impl Into<String>, kind: BinaryKind, probe: Arc<dyn BuildAbilityProbe>) -> Self {
    Self {
      legacy: true,
      ..Self::new(name, kind, probe)
    }
  }

  pub fn with_target_platform(mut self, platform: Platform) -> Self {
    self.target_platform = Some(platform);
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn kind(&self) -> BinaryKind {
    self.kind
  }

  pub fn target_platform(&self) -> Option<Platform> {
    self.target_platform
  }

  /// e.g. `shared library 'helloShared'`
  pub fn display_name(&self) -> String {
    format!("{} '{}'", self.kind, self.name)
  }

  /// Whether this binary came from the implicit single-binary-per-component
  /// path rather than an explicit declaration. Fixed at construction.
  pub fn is_legacy_binary(&self) -> bool {
    self.legacy
  }

  /// Assigns the group of source sets this binary owns. Only the first call
  /// succeeds; later calls leave the original group in place.
  pub fn set_binary_sources(&mut self, group: SourceSetGroup) -> Result<(), BinaryError> {
    self.sources.assign(group).map_err(|_rejected| BinaryError::AlreadyConfigured {
      binary: self.name.clone(),
    })
  }

  /// The owned group, if assigned.
  pub fn binary_sources(&self) -> Option<&SourceSetGroup> {
    self.sources.owned()
  }

  /// Borrows a source set owned elsewhere. Attaching the same set again has
  /// no effect.
  pub fn source(&mut self, source: SourceRef) {
    if !self.sources.borrow(source.clone()) {
      debug!(binary = %self.name, source = %source.display_name(), "source set already attached");
    }
  }

  pub fn borrowed_sources(&self) -> &[SourceRef] {
    self.sources.borrowed()
  }

  /// Owned and borrowed source sets, deduplicated by identity. Unordered.
  pub fn all_sources(&self) -> HashSet<SourceRef> {
    self.sources.all_sources()
  }

  /// Forces the binary buildable or not, bypassing the probe. Must be called
  /// before the ability is first queried.
  pub fn set_buildable(&mut self, buildable: bool) -> Result<(), BinaryError> {
    if self.ability.set_override(BuildableOverride::from(buildable)) {
      Ok(())
    } else {
      Err(BinaryError::AbilityAlreadyResolved {
        binary: self.name.clone(),
      })
    }
  }

  pub fn buildable_override(&self) -> BuildableOverride {
    self.ability.buildable_override()
  }

  /// Resolves the build ability on first call and returns the cached value
  /// afterwards. Safe to call from many threads at once; the probe runs once.
  pub fn build_ability(&self) -> &BuildAbility {
    self.ability.resolve(self, self.probe.as_ref())
  }

  pub fn is_buildable(&self) -> bool {
    self.build_ability().is_buildable()
  }

  pub fn is_ability_resolved(&self) -> bool {
    self.ability.is_resolved()
  }
}

impl fmt::Debug for BinarySpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BinarySpec")
      .field("name", &self.name)
      .field("kind", &self.kind)
      .field("legacy", &self.legacy)
      .field("target_platform", &self.target_platform)
      .field("sources", &self.sources)
      .field("ability", &self.ability)
      .finish_non_exhaustive()
  }
}

impl fmt::Display for BinarySpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.display_name())
  }
}
