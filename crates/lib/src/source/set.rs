use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// Source languages understood by the toolchain probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Language {
  C,
  Cpp,
  ObjectiveC,
  ObjectiveCpp,
  Assembler,
  WindowsResources,
}

impl Language {
  pub const ALL: [Language; 6] = [
    Self::C,
    Self::Cpp,
    Self::ObjectiveC,
    Self::ObjectiveCpp,
    Self::Assembler,
    Self::WindowsResources,
  ];

  /// Human readable name used in display names and diagnostics
  pub fn display_name(&self) -> &'static str {
    match self {
      Self::C => "C",
      Self::Cpp => "C++",
      Self::ObjectiveC => "Objective-C",
      Self::ObjectiveCpp => "Objective-C++",
      Self::Assembler => "Assembler",
      Self::WindowsResources => "Windows resource",
    }
  }

  /// Executables tried, in order, when no toolchain override is configured
  pub fn default_tools(&self) -> &'static [&'static str] {
    match self {
      Self::C => &["cc", "gcc", "clang"],
      Self::Cpp => &["c++", "g++", "clang++"],
      Self::ObjectiveC => &["clang", "gcc"],
      Self::ObjectiveCpp => &["clang++", "g++"],
      Self::Assembler => &["as", "clang"],
      Self::WindowsResources => &["windres", "rc"],
    }
  }
}

impl FromStr for Language {
  type Err = String;

  /// Accepts the kebab-case names used in model files plus common aliases.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "c" => Ok(Self::C),
      "cpp" | "c++" => Ok(Self::Cpp),
      "objective-c" | "objc" => Ok(Self::ObjectiveC),
      "objective-cpp" | "objcpp" => Ok(Self::ObjectiveCpp),
      "assembler" | "asm" => Ok(Self::Assembler),
      "windows-resources" | "rc" => Ok(Self::WindowsResources),
      other => Err(other.to_string()),
    }
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.display_name())
  }
}

/// A named, language-tagged collection of source directories.
///
/// Name, language and owning component never change after creation. The
/// directory list can still grow while the model is being configured; it sits
/// behind a lock so that shared handles stay `Sync`.
#[derive(Debug)]
pub struct SourceSet {
  name: String,
  language: Language,
  component: Option<String>,
  source_dirs: RwLock<Vec<PathBuf>>,
}

impl SourceSet {
  pub fn new(name: impl Into<String>, language: Language) -> Self {
    Self {
      name: name.into(),
      language,
      component: None,
      source_dirs: RwLock::new(Vec::new()),
    }
  }

  /// Record the component (or binary) this set was declared in.
  pub fn with_component(mut self, component: impl Into<String>) -> Self {
    self.component = Some(component.into());
    self
  }

  pub fn with_source_dir(self, dir: impl Into<PathBuf>) -> Self {
    self.add_source_dir(dir);
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn language(&self) -> Language {
    self.language
  }

  pub fn component(&self) -> Option<&str> {
    self.component.as_deref()
  }

  /// Appends a source directory. Duplicate directories are ignored.
  ///
  /// Only the configuration layer should call this, and only before the
  /// model is handed to consumers.
  pub fn add_source_dir(&self, dir: impl Into<PathBuf>) {
    let dir = dir.into();
    let mut dirs = self.source_dirs.write().unwrap_or_else(PoisonError::into_inner);
    if !dirs.contains(&dir) {
      dirs.push(dir);
    }
  }

  /// Snapshot of the source directories in declaration order.
  pub fn source_dirs(&self) -> Vec<PathBuf> {
    self
      .source_dirs
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  /// e.g. `C++ source 'hello:cpp'`
  pub fn display_name(&self) -> String {
    match &self.component {
      Some(component) => format!("{} source '{}:{}'", self.language, component, self.name),
      None => format!("{} source '{}'", self.language, self.name),
    }
  }

  pub fn into_ref(self) -> SourceRef {
    SourceRef::new(self)
  }
}

/// Shared handle to a [`SourceSet`].
///
/// Two handles are equal only when they point at the same set. Sets that
/// happen to share a name and contents but were created separately are
/// distinct.
#[derive(Clone)]
pub struct SourceRef(Arc<SourceSet>);

impl SourceRef {
  pub fn new(set: SourceSet) -> Self {
    Self(Arc::new(set))
  }

  pub fn ptr_eq(&self, other: &SourceRef) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Deref for SourceRef {
  type Target = SourceSet;

  fn deref(&self) -> &SourceSet {
    &self.0
  }
}

impl PartialEq for SourceRef {
  fn eq(&self, other: &Self) -> bool {
    self.ptr_eq(other)
  }
}

impl Eq for SourceRef {}

impl Hash for SourceRef {
  fn hash<H: Hasher>(&self, state: &mut H) {
    Arc::as_ptr(&self.0).hash(state);
  }
}

impl fmt::Debug for SourceRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("SourceRef").field(&self.display_name()).finish()
  }
}

impl From<SourceSet> for SourceRef {
  fn from(set: SourceSet) -> Self {
    SourceRef::new(set)
  }
}
