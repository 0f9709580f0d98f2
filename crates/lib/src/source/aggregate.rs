use std::collections::HashSet;

use super::{SourceRef, SourceSetGroup};

#[derive(Debug, Default)]
enum OwnedSources {
  #[default]
  Unassigned,
  Assigned(SourceSetGroup),
}

/// Owned and borrowed sources of a single binary.
///
/// The owned group can be assigned once. Borrowed sets are kept as shared
/// handles and may be attached before or after the group is assigned.
#[derive(Debug, Default)]
pub struct SourceAggregator {
  owned: OwnedSources,
  borrowed: Vec<SourceRef>,
}

impl SourceAggregator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Assigns the owned group. A second assignment hands the rejected group
  /// back and leaves the first one in place.
  pub fn assign(&mut self, group: SourceSetGroup) -> Result<(), SourceSetGroup> {
    match self.owned {
      OwnedSources::Unassigned => {
        self.owned = OwnedSources::Assigned(group);
        Ok(())
      }
      OwnedSources::Assigned(_) => Err(group),
    }
  }

  pub fn owned(&self) -> Option<&SourceSetGroup> {
    match &self.owned {
      OwnedSources::Unassigned => None,
      OwnedSources::Assigned(group) => Some(group),
    }
  }

  /// Attaches a borrowed source set. Returns `false` if it was already
  /// attached.
  pub fn borrow(&mut self, source: SourceRef) -> bool {
    if self.borrowed.contains(&source) {
      return false;
    }
    self.borrowed.push(source);
    true
  }

  pub fn borrowed(&self) -> &[SourceRef] {
    &self.borrowed
  }

  /// Union of owned and borrowed sets, deduplicated by identity.
  ///
  /// Recomputed on every call. Iteration order is unspecified.
  pub fn all_sources(&self) -> HashSet<SourceRef> {
    self
      .owned()
      .into_iter()
      .flat_map(|group| group.iter())
      .chain(self.borrowed.iter())
      .cloned()
      .collect()
  }
}
