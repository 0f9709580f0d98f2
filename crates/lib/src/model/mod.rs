//! Declarative model files.
//!
//! A model file declares components, their binaries and test suites (see
//! [`ModelFile`] for the format). [`ModelLoader`] turns it into a [`Model`]:
//!
//! - every binary owns a group built from its own `sources`;
//! - every binary borrows the source sets of its component;
//! - a component without `binaries` gets one implicit legacy binary named
//!   after it;
//! - a test suite borrows the source sets of the component it tests.

mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::ability::{BuildAbilityProbe, CompositeProbe};
use crate::binary::{BinaryContainer, BinaryError, BinaryKind, BinarySpec, ContainerError};
use crate::platform::Platform;
use crate::platform::toolchain::ToolchainConfig;
use crate::source::{Language, SourceError, SourceSetGroup};

pub use types::{BinaryDecl, ComponentDecl, ModelFile, SourceSetDecl, TestSuiteDecl};

#[derive(Debug, Error)]
pub enum ModelError {
  #[error("failed to read model file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse model: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("unknown language '{0}' in [toolchains]")]
  UnknownLanguage(String),

  #[error("component '{0}' is declared more than once")]
  DuplicateComponent(String),

  #[error("test suite '{suite}' tests unknown component '{component}'")]
  UnknownComponent { suite: String, component: String },

  #[error(transparent)]
  Source(#[from] SourceError),

  #[error(transparent)]
  Binary(#[from] BinaryError),

  #[error(transparent)]
  Container(#[from] ContainerError),
}

/// A component and the source sets its binaries borrow.
#[derive(Debug)]
pub struct Component {
  name: String,
  sources: SourceSetGroup,
}

impl Component {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn sources(&self) -> &SourceSetGroup {
    &self.sources
  }
}

/// A fully configured model.
#[derive(Debug)]
pub struct Model {
  components: Vec<Component>,
  binaries: BinaryContainer,
  toolchains: ToolchainConfig,
}

impl Model {
  pub fn components(&self) -> &[Component] {
    &self.components
  }

  pub fn component(&self, name: &str) -> Option<&Component> {
    self.components.iter().find(|c| c.name == name)
  }

  pub fn binaries(&self) -> &BinaryContainer {
    &self.binaries
  }

  pub fn binary(&self, name: &str) -> Option<&BinarySpec> {
    self.binaries.get(name)
  }

  /// Toolchain settings after applying the model's `[toolchains]` table.
  pub fn toolchains(&self) -> &ToolchainConfig {
    &self.toolchains
  }
}

/// Builds [`Model`]s from model files.
pub struct ModelLoader {
  toolchains: ToolchainConfig,
  probe: Option<Arc<dyn BuildAbilityProbe>>,
}

impl ModelLoader {
  /// Binaries are probed with [`CompositeProbe::standard`] over `toolchains`
  /// plus the model's own `[toolchains]` table.
  pub fn new(toolchains: ToolchainConfig) -> Self {
    Self { toolchains, probe: None }
  }

  /// Uses `probe` for every binary instead of the standard probe.
  pub fn with_probe(mut self, probe: Arc<dyn BuildAbilityProbe>) -> Self {
    self.probe = Some(probe);
    self
  }

  /// Loads a model file. Relative source directories are resolved against
  /// the file's directory.
  pub fn load_file(&self, path: &Path) -> Result<Model, ModelError> {
    let content = std::fs::read_to_string(path).map_err(|source| ModelError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    info!(model = ?path, "loading model");
    let file: ModelFile = toml::from_str(&content)?;
    self.build(file, path.parent())
  }

  /// Loads a model from TOML text. Source directories are kept as written.
  pub fn load_str(&self, content: &str) -> Result<Model, ModelError> {
    let file: ModelFile = toml::from_str(content)?;
    self.build(file, None)
  }

  pub fn build(&self, file: ModelFile, base_dir: Option<&Path>) -> Result<Model, ModelError> {
    let toolchains = self.toolchains_for(&file)?;
    let probe: Arc<dyn BuildAbilityProbe> = match &self.probe {
      Some(probe) => probe.clone(),
      None => Arc::new(CompositeProbe::standard(toolchains.clone())),
    };
    let builder = Builder { probe, base_dir };

    let mut components: Vec<Component> = Vec::new();
    let mut binaries = BinaryContainer::new();

    for decl in &file.components {
      if components.iter().any(|c| c.name == decl.name) {
        return Err(ModelError::DuplicateComponent(decl.name.clone()));
      }
      let component = Component {
        name: decl.name.clone(),
        sources: builder.group(&decl.name, &decl.sources)?,
      };

      if decl.binaries.is_empty() {
        let mut binary = builder.binary(&decl.name, decl.kind, true, decl.platform);
        binary.set_binary_sources(SourceSetGroup::new(&decl.name))?;
        borrow_all(&mut binary, &component);
        if let Some(buildable) = decl.buildable {
          binary.set_buildable(buildable)?;
        }
        binaries.register(binary)?;
      }

      for binary_decl in &decl.binaries {
        let mut binary = builder.binary(&binary_decl.name, binary_decl.kind, false, binary_decl.platform);
        binary.set_binary_sources(builder.group(&binary_decl.name, &binary_decl.sources)?)?;
        borrow_all(&mut binary, &component);
        if let Some(buildable) = binary_decl.buildable {
          binary.set_buildable(buildable)?;
        }
        binaries.register(binary)?;
      }

      components.push(component);
    }

    for suite in &file.test_suites {
      let tested = components
        .iter()
        .find(|c| c.name == suite.tests)
        .ok_or_else(|| ModelError::UnknownComponent {
          suite: suite.name.clone(),
          component: suite.tests.clone(),
        })?;

      let mut binary = builder.binary(&suite.name, BinaryKind::TestSuite, false, suite.platform);
      binary.set_binary_sources(builder.group(&suite.name, &suite.sources)?)?;
      borrow_all(&mut binary, tested);
      if let Some(buildable) = suite.buildable {
        binary.set_buildable(buildable)?;
      }
      binaries.register(binary)?;
    }

    info!(
      components = components.len(),
      binaries = binaries.len(),
      "model configured"
    );

    Ok(Model {
      components,
      binaries,
      toolchains,
    })
  }

  fn toolchains_for(&self, file: &ModelFile) -> Result<ToolchainConfig, ModelError> {
    let mut toolchains = self.toolchains.clone();
    for (language, tools) in &file.toolchains {
      let language: Language = language.parse().map_err(ModelError::UnknownLanguage)?;
      toolchains = toolchains.with_tools(language, tools.clone());
    }
    Ok(toolchains)
  }
}

impl Default for ModelLoader {
  fn default() -> Self {
    Self::new(ToolchainConfig::from_env())
  }
}

struct Builder<'a> {
  probe: Arc<dyn BuildAbilityProbe>,
  base_dir: Option<&'a Path>,
}

impl Builder<'_> {
  fn group(&self, name: &str, decls: &[SourceSetDecl]) -> Result<SourceSetGroup, ModelError> {
    let mut group = SourceSetGroup::new(name);
    for decl in decls {
      let set = group.create(&decl.name, decl.language)?;
      for dir in &decl.dirs {
        match self.base_dir {
          Some(base) => set.add_source_dir(base.join(dir)),
          None => set.add_source_dir(dir),
        }
      }
    }
    Ok(group)
  }

  fn binary(&self, name: &str, kind: BinaryKind, legacy: bool, platform: Option<Platform>) -> BinarySpec {
    let binary = if legacy {
      BinarySpec::new_legacy(name, kind, self.probe.clone())
    } else {
      BinarySpec::new(name, kind, self.probe.clone())
    };
    match platform {
      Some(platform) => binary.with_target_platform(platform),
      None => binary,
    }
  }
}

fn borrow_all(binary: &mut BinarySpec, component: &Component) {
  for set in component.sources() {
    binary.source(set.clone());
  }
  debug!(
    binary = %binary.name(),
    component = %component.name(),
    borrowed = component.sources().len(),
    "borrowed component sources"
  );
}
