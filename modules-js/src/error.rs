use heaps_js::{FileKey, ModuleName};
use thiserror::Error;

/// Recoverable, per-file structured errors surfaced to the user.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ModuleError {
  /// A package manifest was consulted during resolution but never made it
  /// into the manifest heap, despite being inside the project.
  #[error("no manifest entry for package at `{relative_path}`")]
  PackageHeapNotFound { relative_path: String },
  /// Resolution walked into a package outside the project root that was not
  /// on the included list.
  #[error("package at `{relative_path}` is outside the project root")]
  ModuleOutsideRoot { relative_path: String },
  /// Another file already provides this module; attached to the losing file.
  #[error("duplicate provider for module `{module}`: `{conflict}` loses to `{provider}`")]
  DuplicateProvider {
    module: ModuleName,
    provider: FileKey,
    conflict: FileKey,
  },
}

/// Errors that abort the whole pass. No partial results survive one.
#[derive(Debug, Error)]
pub enum FatalError {
  /// Transport failure talking to the external resolver process.
  #[error("external module resolver failed: {0}")]
  ExternalResolver(String),
  /// The external resolver answered with an unrecognized shape.
  #[error("external module resolver returned an invalid resolution")]
  InvalidResolution,
  /// Internal invariant violation.
  #[error("internal error: {0}")]
  Ice(String),
}
