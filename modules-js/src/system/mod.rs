//! The pluggable module system seam.
//!
//! Two implementations interpret references and elect providers: [`path`]
//! walks the filesystem and identifies modules by file, [`flat`] keeps a
//! flat namespace of declared names. One is selected at startup and held
//! behind the environment for the life of the process.

pub(crate) mod flat;
pub(crate) mod path;

use crate::acc::ResolutionAcc;
use crate::election::ProviderErrorMap;
use crate::env::ModuleEnv;
use crate::error::FatalError;
use crate::options::Options;
use ahash::AHashSet;
use heaps_js::{Docblock, FileKey, ModuleHeaps, ModuleName};

pub(crate) trait ModuleSystem: Send + Sync {
  /// The module name this file exports.
  fn exported_module(&self, env: &ModuleEnv, file: &FileKey, docblock: &Docblock) -> ModuleName;

  /// Resolve one reference appearing in `importer`, recording phantom paths
  /// and structured errors in `acc`.
  fn imported_module(
    &self,
    env: &ModuleEnv,
    heaps: &ModuleHeaps,
    importer: &FileKey,
    reference: &str,
    acc: &mut ResolutionAcc,
  ) -> Result<ModuleName, FatalError>;

  /// Elect one provider among the files claiming `module`.
  fn choose_provider(
    &self,
    env: &ModuleEnv,
    module: &ModuleName,
    candidates: &AHashSet<FileKey>,
    errmap: &mut ProviderErrorMap,
  ) -> Result<FileKey, FatalError>;
}

/// The module a file implicitly provides by its own name. Chops the
/// declaration suffix, so a declaration file names the file it shadows.
pub(crate) fn eponymous_module(options: &Options, file: &FileKey) -> ModuleName {
  match file.path() {
    Some(path) => ModuleName::file(file.with_path(options.chop_declaration_ext(path))),
    None => ModuleName::file(file.clone()),
  }
}
