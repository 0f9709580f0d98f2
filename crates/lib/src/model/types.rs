use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::binary::BinaryKind;
use crate::platform::Platform;
use crate::source::Language;

/// Top level of a model file.
///
/// # Example
///
/// ```toml
/// [toolchains]
/// cpp = ["clang++", "g++"]
///
/// [[components]]
/// name = "hello"
/// sources = [{ name = "cpp", language = "cpp", dirs = ["src/hello/cpp"] }]
///
/// [[components.binaries]]
/// name = "helloShared"
/// kind = "shared-library"
///
/// [[test_suites]]
/// name = "helloTest"
/// tests = "hello"
/// sources = [{ name = "cpp", language = "cpp", dirs = ["src/helloTest/cpp"] }]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelFile {
  /// Language name to candidate executables, replacing the defaults.
  #[serde(default)]
  pub toolchains: BTreeMap<String, Vec<String>>,
  #[serde(default)]
  pub components: Vec<ComponentDecl>,
  #[serde(default)]
  pub test_suites: Vec<TestSuiteDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSetDecl {
  pub name: String,
  pub language: Language,
  #[serde(default)]
  pub dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentDecl {
  pub name: String,
  /// Kind of the implicit binary created when `binaries` is empty.
  #[serde(default = "default_component_kind")]
  pub kind: BinaryKind,
  /// Target platform of the implicit binary.
  #[serde(default)]
  pub platform: Option<Platform>,
  /// Explicit override for the implicit binary.
  #[serde(default)]
  pub buildable: Option<bool>,
  #[serde(default)]
  pub sources: Vec<SourceSetDecl>,
  #[serde(default)]
  pub binaries: Vec<BinaryDecl>,
}

fn default_component_kind() -> BinaryKind {
  BinaryKind::Executable
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BinaryDecl {
  pub name: String,
  pub kind: BinaryKind,
  #[serde(default)]
  pub platform: Option<Platform>,
  /// Explicit override; probe decides when absent.
  #[serde(default)]
  pub buildable: Option<bool>,
  /// Sources owned by this binary only.
  #[serde(default)]
  pub sources: Vec<SourceSetDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestSuiteDecl {
  pub name: String,
  /// Component whose sources the suite borrows.
  pub tests: String,
  #[serde(default)]
  pub platform: Option<Platform>,
  #[serde(default)]
  pub buildable: Option<bool>,
  #[serde(default)]
  pub sources: Vec<SourceSetDecl>,
}
