mod check;
mod info;
mod sources;

use std::path::Path;

use anyhow::{Context, Result};
use binspec_lib::{Model, ModelLoader};
use tracing::debug;

pub use check::cmd_check;
pub use info::cmd_info;
pub use sources::cmd_sources;

fn load_model(path: &Path) -> Result<Model> {
  let model = ModelLoader::default()
    .load_file(path)
    .with_context(|| format!("Failed to load model {}", path.display()))?;
  debug!(
    path = %path.display(),
    components = model.components().len(),
    binaries = model.binaries().len(),
    "model loaded"
  );
  Ok(model)
}
