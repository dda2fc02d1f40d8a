use crate::error::ModuleError;
use std::collections::BTreeSet;

/// Mutable record threaded through the resolution of one file's imports.
///
/// `paths` collects filesystem paths that were probed but did not exist;
/// they become the file's phantom dependents, invalidating it if one of
/// them later materializes. `errors` collects structured messages for the
/// user.
#[derive(Debug, Default)]
pub struct ResolutionAcc {
  pub paths: BTreeSet<String>,
  pub errors: Vec<ModuleError>,
}

impl ResolutionAcc {
  pub fn new() -> ResolutionAcc {
    ResolutionAcc::default()
  }

  pub fn record_path(&mut self, path: &str) {
    self.paths.insert(path.to_string());
  }

  pub fn record_error(&mut self, error: ModuleError) {
    self.errors.push(error);
  }
}
