//! Check command implementation.
//!
//! Resolves every binary in the model and reports build eligibility. Binaries
//! that cannot be built are reported as skipped; the command still succeeds.

use std::path::Path;

use anyhow::Result;
use binspec_lib::BuildAbility;
use tracing::debug;

use super::load_model;
use crate::output::{OutputFormat, pluralize, print_info, print_json, print_skip, print_success};

pub fn cmd_check(model_path: &Path, format: OutputFormat) -> Result<()> {
  let model = load_model(model_path)?;
  let binaries = model.binaries();
  let resolved = binaries.resolve_all();
  let buildable = resolved.iter().filter(|(_, ability)| ability.is_buildable()).count();

  if format.is_json() {
    let binary_list: Vec<_> = binaries
      .iter()
      .map(|binary| {
        serde_json::json!({
          "name": binary.name(),
          "kind": binary.kind(),
          "legacy": binary.is_legacy_binary(),
          "platform": binary.target_platform(),
          "ability": binary.build_ability(),
        })
      })
      .collect();
    return print_json(&serde_json::json!({
      "binaries": binary_list,
      "buildable": buildable,
      "skipped": resolved.len() - buildable,
    }));
  }

  if binaries.is_empty() {
    print_info("No binaries declared.");
    return Ok(());
  }

  for binary in binaries {
    match binary.build_ability() {
      BuildAbility::Buildable => print_success(&binary.display_name()),
      BuildAbility::NotBuildable { reason } => {
        debug!(binary = %binary.name(), reason = %reason, "skipping binary");
        print_skip(&binary.display_name(), reason)
      }
    }
  }

  println!();
  print_info(&format!(
    "{} buildable, {} skipped",
    pluralize(buildable, "binary", "binaries"),
    resolved.len() - buildable
  ));
  Ok(())
}
