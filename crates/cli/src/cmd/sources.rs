//! Sources command implementation.

use std::path::Path;

use anyhow::{Result, bail};
use binspec_lib::SourceRef;

use super::load_model;
use crate::output::{OutputFormat, pluralize, print_info, print_json, print_stat, symbols};

fn source_json(set: &SourceRef) -> serde_json::Value {
  serde_json::json!({
    "name": set.name(),
    "language": set.language(),
    "component": set.component(),
    "dirs": set.source_dirs(),
  })
}

pub fn cmd_sources(model_path: &Path, name: &str, format: OutputFormat) -> Result<()> {
  let model = load_model(model_path)?;
  let Some(binary) = model.binary(name) else {
    bail!("unknown binary '{}'", name);
  };

  let mut all: Vec<SourceRef> = binary.all_sources().into_iter().collect();
  // Display order only; the aggregated set itself is unordered.
  all.sort_by_key(|set| set.display_name());

  let owned: Vec<&SourceRef> = binary.binary_sources().into_iter().flat_map(|g| g.iter()).collect();

  if format.is_json() {
    return print_json(&serde_json::json!({
      "binary": binary.name(),
      "legacy": binary.is_legacy_binary(),
      "owned": owned.iter().map(|s| s.name()).collect::<Vec<_>>(),
      "borrowed": binary.borrowed_sources().iter().map(|s| s.display_name()).collect::<Vec<_>>(),
      "sources": all.iter().map(source_json).collect::<Vec<_>>(),
    }));
  }

  print_info(&format!(
    "{} compiles {}",
    binary.display_name(),
    pluralize(all.len(), "source set", "source sets")
  ));
  for set in &all {
    let origin = if owned.iter().any(|o| o.ptr_eq(set)) { "owned" } else { "borrowed" };
    println!("  {} {} ({})", symbols::INFO, set.display_name(), origin);
    for dir in set.source_dirs() {
      print_stat("dir", &dir.display().to_string());
    }
  }
  Ok(())
}
