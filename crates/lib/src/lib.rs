//! binspec-lib: source aggregation and build eligibility for binaries
//!
//! This crate provides the model a build tool uses to decide what a binary
//! compiles and whether it can be built here:
//! - `SourceSet` / `SourceSetGroup`: named, language-tagged source collections
//! - `BinarySpec`: owned plus borrowed sources and a memoized `BuildAbility`
//! - Probes: host platform and toolchain checks behind `BuildAbilityProbe`
//! - `Model`: binaries configured from a TOML model file

pub mod ability;
pub mod binary;
pub mod consts;
pub mod model;
pub mod platform;
pub mod source;

#[cfg(test)]
pub(crate) mod testutil;

pub use ability::{BuildAbility, BuildAbilityProbe};
pub use binary::{BinaryContainer, BinaryError, BinaryKind, BinarySpec};
pub use model::{Model, ModelError, ModelLoader};
pub use source::{Language, SourceError, SourceRef, SourceSet, SourceSetGroup};
