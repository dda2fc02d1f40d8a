use crate::acc::ResolutionAcc;
use crate::candidates::CandidateCache;
use crate::election::ProviderErrorMap;
use crate::error::FatalError;
use crate::external::ExternalResolver;
use crate::fsprobe::{FsProbe, ProbeFs, RealFs};
use crate::options::{ModuleSystemKind, Options};
use crate::system::{flat::FlatSystem, path::PathSystem, ModuleSystem};
use ahash::AHashSet;
use heaps_js::{Docblock, FileKey, ModuleHeaps, ModuleName};
use std::sync::Arc;

/// Everything resolution needs that is not a heap: configuration, the
/// filesystem probe, the candidate memo table, the optional external
/// resolver, and the selected module system.
///
/// One environment serves a whole checker instance. All of its state is
/// behind fine-grained locks, so batch phases share it by reference; tests
/// construct fresh ones freely.
pub struct ModuleEnv {
  options: Arc<Options>,
  probe: FsProbe,
  candidates: CandidateCache,
  external: Option<ExternalResolver>,
  system: Box<dyn ModuleSystem>,
  node_modules_containers: AHashSet<String>,
}

impl ModuleEnv {
  /// Environment over the real filesystem.
  pub fn new(options: Options) -> ModuleEnv {
    let probe = FsProbe::new(RealFs);
    ModuleEnv::with_probe(options, probe)
  }

  /// Environment over a custom filesystem (hermetic tests, virtual hosts).
  pub fn with_fs(options: Options, fs: impl ProbeFs + 'static) -> ModuleEnv {
    ModuleEnv::with_probe(options, FsProbe::new(fs))
  }

  pub fn with_probe(options: Options, probe: FsProbe) -> ModuleEnv {
    let external = options
      .module_resolver
      .clone()
      .map(ExternalResolver::new);
    let system: Box<dyn ModuleSystem> = match options.module_system {
      ModuleSystemKind::Path => Box::new(PathSystem),
      ModuleSystemKind::Flat => Box::new(FlatSystem),
    };
    ModuleEnv {
      options: Arc::new(options),
      probe,
      candidates: CandidateCache::new(),
      external,
      system,
      node_modules_containers: AHashSet::new(),
    }
  }

  pub fn options(&self) -> &Options {
    &self.options
  }

  pub fn probe(&self) -> &FsProbe {
    &self.probe
  }

  pub(crate) fn external(&self) -> Option<&ExternalResolver> {
    self.external.as_ref()
  }

  pub(crate) fn node_modules_containers(&self) -> &AHashSet<String> {
    &self.node_modules_containers
  }

  /// Record which directories contain a node-modules entry; the ancestor
  /// walk only descends into listed directories.
  pub fn set_node_modules_containers(&mut self, containers: impl IntoIterator<Item = String>) {
    self.node_modules_containers = containers.into_iter().collect();
  }

  /// Drop the directory-listing cache and the candidate memo table. Called
  /// at the top of each typecheck pass.
  pub fn clear_caches(&self) {
    self.probe.clear();
    self.candidates.clear();
    tracing::debug!("cleared module resolution caches");
  }

  pub fn module_name_candidates(&self, reference: &str) -> Arc<Vec<String>> {
    self.candidates.module_name_candidates(&self.options, reference)
  }

  /// The module name `file` exports under the active module system.
  pub fn exported_module(&self, file: &FileKey, docblock: &Docblock) -> ModuleName {
    self.system.exported_module(self, file, docblock)
  }

  /// Resolve one reference from `importer` under the active module system.
  pub fn imported_module(
    &self,
    heaps: &ModuleHeaps,
    importer: &FileKey,
    reference: &str,
    acc: &mut ResolutionAcc,
  ) -> Result<ModuleName, FatalError> {
    self
      .system
      .imported_module(self, heaps, importer, reference, acc)
  }

  /// Elect one provider for `module` among `candidates`.
  pub fn choose_provider(
    &self,
    module: &ModuleName,
    candidates: &AHashSet<FileKey>,
    errmap: &mut ProviderErrorMap,
  ) -> Result<FileKey, FatalError> {
    self.system.choose_provider(self, module, candidates, errmap)
  }
}

impl std::fmt::Debug for ModuleEnv {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ModuleEnv")
      .field("module_system", &self.options.module_system)
      .field("external", &self.external)
      .finish_non_exhaustive()
  }
}
