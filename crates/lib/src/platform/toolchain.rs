//! Locating compiler executables on the search path.

use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::consts::TOOLCHAIN_PATH_ENV;
use crate::source::Language;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolchainError {
  #[error("no toolchain search path: neither BINSPEC_TOOLCHAIN_PATH nor PATH is set")]
  NoSearchPath,
}

/// An executable found for a language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tool {
  pub name: String,
  pub path: PathBuf,
}

/// Where to look for toolchains and which executables count as one.
#[derive(Debug, Clone, Default)]
pub struct ToolchainConfig {
  search_path: Option<OsString>,
  tools: BTreeMap<Language, Vec<String>>,
}

impl ToolchainConfig {
  /// Empty config: no search path, default tool names.
  pub fn new() -> Self {
    Self::default()
  }

  /// Reads the search path from `BINSPEC_TOOLCHAIN_PATH`, falling back to `PATH`.
  pub fn from_env() -> Self {
    Self {
      search_path: env::var_os(TOOLCHAIN_PATH_ENV)
        .filter(|path| !path.is_empty())
        .or_else(|| env::var_os("PATH")),
      tools: BTreeMap::new(),
    }
  }

  pub fn with_search_path(mut self, path: impl Into<OsString>) -> Self {
    self.search_path = Some(path.into());
    self
  }

  /// Replaces the candidate executables for `language`.
  pub fn with_tools(mut self, language: Language, tools: Vec<String>) -> Self {
    self.tools.insert(language, tools);
    self
  }

  /// Candidate executables for `language`, in lookup order.
  pub fn tools_for(&self, language: Language) -> Vec<String> {
    match self.tools.get(&language) {
      Some(tools) => tools.clone(),
      None => language.default_tools().iter().map(|t| t.to_string()).collect(),
    }
  }

  pub fn search_dirs(&self) -> Result<Vec<PathBuf>, ToolchainError> {
    let path = self.search_path.as_ref().ok_or(ToolchainError::NoSearchPath)?;
    let dirs: Vec<PathBuf> = env::split_paths(path)
      .filter(|dir| !dir.as_os_str().is_empty())
      .collect();
    if dirs.is_empty() {
      return Err(ToolchainError::NoSearchPath);
    }
    Ok(dirs)
  }

  /// Finds the first candidate executable for `language`.
  pub fn locate(&self, language: Language) -> Result<Option<Tool>, ToolchainError> {
    let dirs = self.search_dirs()?;
    Ok(locate_in(&self.tools_for(language), &dirs))
  }
}

/// First of `candidates` present in `dirs`.
pub fn locate_in(candidates: &[String], dirs: &[PathBuf]) -> Option<Tool> {
  candidates.iter().find_map(|name| {
    find_executable(name, dirs).map(|path| Tool {
      name: name.clone(),
      path,
    })
  })
}

/// Looks `name` up in `dirs`. Names containing a path separator are checked
/// as given.
pub fn find_executable(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
  let file_name = format!("{}{}", name, env::consts::EXE_SUFFIX);

  if name.contains(std::path::MAIN_SEPARATOR) || name.contains('/') {
    let path = PathBuf::from(name);
    return is_executable(&path).then_some(path);
  }

  let found = dirs
    .iter()
    .map(|dir| dir.join(&file_name))
    .find(|candidate| is_executable(candidate));
  debug!(tool = %name, found = ?found, "toolchain lookup");
  found
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
  use std::os::unix::fs::PermissionsExt;

  path
    .metadata()
    .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
    .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
  path.is_file()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testutil::fake_tool;
  use serial_test::serial;
  use tempfile::TempDir;

  #[test]
  fn locates_first_matching_candidate() {
    let temp = TempDir::new().unwrap();
    let clang = fake_tool(temp.path(), "clang++");
    let config = ToolchainConfig::new().with_search_path(temp.path());

    let tool = config.locate(Language::Cpp).unwrap().unwrap();

    assert_eq!(tool.name, "clang++");
    assert_eq!(tool.path, clang);
  }

  #[test]
  fn missing_tool_is_none() {
    let temp = TempDir::new().unwrap();
    let config = ToolchainConfig::new().with_search_path(temp.path());

    assert_eq!(config.locate(Language::Assembler).unwrap(), None);
  }

  #[cfg(unix)]
  #[test]
  fn non_executable_files_are_skipped() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("cc"), "").unwrap();
    let config = ToolchainConfig::new().with_search_path(temp.path());

    assert_eq!(config.locate(Language::C).unwrap(), None);
  }

  #[test]
  fn configured_tools_replace_defaults() {
    let temp = TempDir::new().unwrap();
    fake_tool(temp.path(), "gcc");
    fake_tool(temp.path(), "tcc");
    let config = ToolchainConfig::new()
      .with_search_path(temp.path())
      .with_tools(Language::C, vec!["tcc".to_string()]);

    assert_eq!(config.locate(Language::C).unwrap().unwrap().name, "tcc");
    assert_eq!(config.tools_for(Language::Cpp), vec!["c++", "g++", "clang++"]);
  }

  #[test]
  fn empty_search_path_is_an_error() {
    let config = ToolchainConfig::new().with_search_path("");
    assert_eq!(config.search_dirs(), Err(ToolchainError::NoSearchPath));
    assert_eq!(ToolchainConfig::new().locate(Language::C), Err(ToolchainError::NoSearchPath));
  }

  #[test]
  #[serial]
  fn env_override_takes_precedence_over_path() {
    let temp = TempDir::new().unwrap();
    temp_env::with_vars(
      [
        (TOOLCHAIN_PATH_ENV, Some(temp.path().as_os_str())),
        ("PATH", Some(std::ffi::OsStr::new("/nonexistent"))),
      ],
      || {
        let config = ToolchainConfig::from_env();
        assert_eq!(config.search_dirs().unwrap(), vec![temp.path().to_path_buf()]);
      },
    );
  }

  #[test]
  #[serial]
  fn falls_back_to_path() {
    temp_env::with_vars(
      [
        (TOOLCHAIN_PATH_ENV, None),
        ("PATH", Some(std::ffi::OsStr::new("/opt/tools/bin"))),
      ],
      || {
        let config = ToolchainConfig::from_env();
        assert_eq!(config.search_dirs().unwrap(), vec![PathBuf::from("/opt/tools/bin")]);
      },
    );
  }

  #[test]
  #[serial]
  fn empty_override_falls_back_to_path() {
    temp_env::with_vars(
      [
        (TOOLCHAIN_PATH_ENV, Some(std::ffi::OsStr::new(""))),
        ("PATH", Some(std::ffi::OsStr::new("/opt/tools/bin"))),
      ],
      || {
        let config = ToolchainConfig::from_env();
        assert_eq!(config.search_dirs().unwrap(), vec![PathBuf::from("/opt/tools/bin")]);
      },
    );
  }
}
