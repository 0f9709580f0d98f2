//! Info command implementation.
//!
//! Shows the host platform and which executable would serve each language.

use std::path::Path;

use anyhow::Result;
use binspec_lib::Language;
use binspec_lib::platform::platform_triple;
use binspec_lib::platform::toolchain::ToolchainConfig;

use super::load_model;
use crate::output::{OutputFormat, print_info, print_json, print_stat};

pub fn cmd_info(model_path: &Path, format: OutputFormat) -> Result<()> {
  // Toolchain overrides from the model apply when one is present.
  let toolchains = if model_path.exists() {
    load_model(model_path)?.toolchains().clone()
  } else {
    ToolchainConfig::from_env()
  };

  let search_error = toolchains.search_dirs().err();
  let mut tools = Vec::new();
  for language in Language::ALL {
    let tool = match search_error {
      Some(_) => None,
      None => toolchains.locate(language)?,
    };
    tools.push((language, tool));
  }

  if format.is_json() {
    let toolchain_list: Vec<_> = tools
      .iter()
      .map(|(language, tool)| serde_json::json!({ "language": language, "tool": tool }))
      .collect();
    return print_json(&serde_json::json!({
      "platform": platform_triple(),
      "toolchains": toolchain_list,
      "search_path_error": search_error.map(|e| e.to_string()),
    }));
  }

  match platform_triple() {
    Some(triple) => print_info(&format!("Platform: {}", triple)),
    None => print_info("Platform: unsupported host"),
  }
  if let Some(err) = &search_error {
    print_info(&err.to_string());
  }
  println!();
  println!("Toolchains:");
  for (language, tool) in &tools {
    let value = match tool {
      Some(tool) => tool.path.display().to_string(),
      None => "not found".to_string(),
    };
    print_stat(language.display_name(), &value);
  }
  Ok(())
}
