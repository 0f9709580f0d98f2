//! Test utilities for binspec-lib.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ability::{BuildAbility, BuildAbilityProbe, ProbeError};
use crate::binary::BinarySpec;

/// Creates an executable stub named `name` in `dir`.
pub fn fake_tool(dir: &Path, name: &str) -> PathBuf {
  let path = dir.join(format!("{}{}", name, env::consts::EXE_SUFFIX));
  std::fs::write(&path, "#!/bin/sh\n").unwrap();
  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }
  path
}

/// Probe returning a fixed outcome and counting its invocations.
pub struct CountingProbe {
  outcome: BuildAbility,
  calls: AtomicUsize,
}

impl CountingProbe {
  pub fn new(outcome: BuildAbility) -> Arc<Self> {
    Arc::new(Self {
      outcome,
      calls: AtomicUsize::new(0),
    })
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

impl BuildAbilityProbe for CountingProbe {
  fn probe(&self, _binary: &BinarySpec) -> Result<BuildAbility, ProbeError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Ok(self.outcome.clone())
  }
}
