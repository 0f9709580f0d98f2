//! Source sets and the ways a binary collects them.
//!
//! A [`SourceSet`] is a named, language-tagged list of source directories.
//! Source sets are always handled through a [`SourceRef`], a shared handle
//! whose equality is the identity of the underlying set, never its contents.
//!
//! # Ownership
//!
//! - A [`SourceSetGroup`] owns the sets created in it and is itself moved into
//!   exactly one binary.
//! - Other binaries may *borrow* a set by cloning its [`SourceRef`]; nothing is
//!   copied, so later additions to the set's directories are visible to every
//!   borrower.
//!
//! [`SourceAggregator`] combines both kinds into the set of sources a binary
//! compiles.

mod aggregate;
mod group;
mod set;

use thiserror::Error;

pub use aggregate::SourceAggregator;
pub use group::SourceSetGroup;
pub use set::{Language, SourceRef, SourceSet};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
  /// Two source sets with the same name were added to one group.
  #[error("source set '{name}' already exists in group '{group}'")]
  DuplicateSourceSetName { group: String, name: String },
}
