use rayon::prelude::*;
use thiserror::Error;
use tracing::info;

use super::BinarySpec;
use crate::ability::BuildAbility;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
  #[error("binary '{0}' is already registered")]
  DuplicateBinaryName(String),
}

/// The binaries of one model, in registration order.
#[derive(Debug, Default)]
pub struct BinaryContainer {
  binaries: Vec<BinarySpec>,
}

impl BinaryContainer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(&mut self, binary: BinarySpec) -> Result<&mut BinarySpec, ContainerError> {
    if self.get(binary.name()).is_some() {
      return Err(ContainerError::DuplicateBinaryName(binary.name().to_string()));
    }
    self.binaries.push(binary);
    let last = self.binaries.len() - 1;
    Ok(&mut self.binaries[last])
  }

  pub fn get(&self, name: &str) -> Option<&BinarySpec> {
    self.binaries.iter().find(|b| b.name() == name)
  }

  pub fn get_mut(&mut self, name: &str) -> Option<&mut BinarySpec> {
    self.binaries.iter_mut().find(|b| b.name() == name)
  }

  pub fn iter(&self) -> impl Iterator<Item = &BinarySpec> {
    self.binaries.iter()
  }

  pub fn len(&self) -> usize {
    self.binaries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.binaries.is_empty()
  }

  /// Resolves every binary's ability on the rayon pool. Results are in
  /// registration order.
  pub fn resolve_all(&self) -> Vec<(&str, &BuildAbility)> {
    let resolved: Vec<_> = self
      .binaries
      .par_iter()
      .map(|binary| (binary.name(), binary.build_ability()))
      .collect();

    let buildable = resolved.iter().filter(|(_, ability)| ability.is_buildable()).count();
    info!(
      binaries = resolved.len(),
      buildable,
      skipped = resolved.len() - buildable,
      "resolved build abilities"
    );
    resolved
  }

  /// Binaries that can be built, resolving abilities as needed.
  pub fn buildable(&self) -> impl Iterator<Item = &BinarySpec> {
    self.binaries.iter().filter(|b| b.is_buildable())
  }
}

impl<'a> IntoIterator for &'a BinaryContainer {
  type Item = &'a BinarySpec;
  type IntoIter = std::slice::Iter<'a, BinarySpec>;

  fn into_iter(self) -> Self::IntoIter {
    self.binaries.iter()
  }
}
