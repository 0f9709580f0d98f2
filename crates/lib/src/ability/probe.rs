use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::BuildAbility;
use crate::binary::BinarySpec;
use crate::platform::Platform;
use crate::platform::toolchain::{ToolchainConfig, ToolchainError};

/// Errors raised while probing. Never surfaced past
/// [`AbilityCell`](super::AbilityCell); they become `NotBuildable`.
#[derive(Debug, Error)]
pub enum ProbeError {
  #[error("host platform ({}/{}) is not supported", std::env::consts::OS, std::env::consts::ARCH)]
  UnsupportedHost,

  #[error(transparent)]
  Toolchain(#[from] ToolchainError),

  #[error("{0}")]
  Other(String),
}

/// Environment check deciding whether a binary can be built.
///
/// Called at most once per binary. Implementations may be slow.
pub trait BuildAbilityProbe: Send + Sync {
  fn probe(&self, binary: &BinarySpec) -> Result<BuildAbility, ProbeError>;
}

impl<F> BuildAbilityProbe for F
where
  F: Fn(&BinarySpec) -> Result<BuildAbility, ProbeError> + Send + Sync,
{
  fn probe(&self, binary: &BinarySpec) -> Result<BuildAbility, ProbeError> {
    self(binary)
  }
}

/// Always answers the same outcome.
#[derive(Debug, Clone)]
pub struct FixedProbe(BuildAbility);

impl FixedProbe {
  pub fn new(ability: BuildAbility) -> Self {
    Self(ability)
  }

  pub fn buildable() -> Self {
    Self(BuildAbility::Buildable)
  }
}

impl BuildAbilityProbe for FixedProbe {
  fn probe(&self, _binary: &BinarySpec) -> Result<BuildAbility, ProbeError> {
    Ok(self.0.clone())
  }
}

/// Rejects binaries that target a platform other than the host.
///
/// Binaries without a target platform are built for the host and pass.
#[derive(Debug, Clone, Default)]
pub struct PlatformProbe {
  host: Option<Platform>,
}

impl PlatformProbe {
  /// Probe against the detected host platform.
  pub fn new() -> Self {
    Self::default()
  }

  /// Probe against a fixed host platform.
  pub fn with_host(host: Platform) -> Self {
    Self { host: Some(host) }
  }

  fn host(&self) -> Result<Platform, ProbeError> {
    self.host.or_else(Platform::current).ok_or(ProbeError::UnsupportedHost)
  }
}

impl BuildAbilityProbe for PlatformProbe {
  fn probe(&self, binary: &BinarySpec) -> Result<BuildAbility, ProbeError> {
    let Some(target) = binary.target_platform() else {
      return Ok(BuildAbility::Buildable);
    };
    let host = self.host()?;
    if target == host {
      Ok(BuildAbility::Buildable)
    } else {
      Ok(BuildAbility::not_buildable(format!(
        "target platform '{}' cannot be built on host '{}'",
        target, host
      )))
    }
  }
}

/// Requires a toolchain for every language among the binary's sources.
#[derive(Debug, Clone)]
pub struct ToolchainProbe {
  config: ToolchainConfig,
}

impl ToolchainProbe {
  pub fn new(config: ToolchainConfig) -> Self {
    Self { config }
  }
}

impl BuildAbilityProbe for ToolchainProbe {
  fn probe(&self, binary: &BinarySpec) -> Result<BuildAbility, ProbeError> {
    let languages: BTreeSet<_> = binary.all_sources().iter().map(|s| s.language()).collect();
    if languages.is_empty() {
      return Ok(BuildAbility::Buildable);
    }

    for language in languages {
      match self.config.locate(language)? {
        Some(tool) => {
          debug!(binary = %binary.name(), language = %language, tool = ?tool.path, "toolchain available");
        }
        None => {
          let tried = self.config.tools_for(language).join(", ");
          return Ok(BuildAbility::not_buildable(format!(
            "no {} toolchain found (tried {})",
            language, tried
          )));
        }
      }
    }
    Ok(BuildAbility::Buildable)
  }
}

/// Runs probes in order and stops at the first one that is not `Buildable`.
#[derive(Clone, Default)]
pub struct CompositeProbe {
  probes: Vec<Arc<dyn BuildAbilityProbe>>,
}

impl CompositeProbe {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, probe: impl BuildAbilityProbe + 'static) -> Self {
    self.probes.push(Arc::new(probe));
    self
  }

  /// Host platform check followed by toolchain lookup.
  pub fn standard(toolchains: ToolchainConfig) -> Self {
    Self::new()
      .with(PlatformProbe::new())
      .with(ToolchainProbe::new(toolchains))
  }

  pub fn len(&self) -> usize {
    self.probes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.probes.is_empty()
  }
}

impl BuildAbilityProbe for CompositeProbe {
  fn probe(&self, binary: &BinarySpec) -> Result<BuildAbility, ProbeError> {
    let mut ability = BuildAbility::Buildable;
    for probe in &self.probes {
      ability = ability.and(probe.probe(binary)?);
      if !ability.is_buildable() {
        break;
      }
    }
    Ok(ability)
  }
}

impl std::fmt::Debug for CompositeProbe {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CompositeProbe").field("probes", &self.probes.len()).finish()
  }
}
