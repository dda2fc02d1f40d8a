//! Batch-scoped write handles for the module heaps.
//!
//! Each phase of a pass gets its own mutator, created from the owning
//! [`ModuleHeaps`] and dropped when the batch ends. The raw write methods on
//! the heaps are crate-private, so a phase can only perform the writes its
//! mutator exposes.

use crate::{FileInfo, FileKey, ModuleHeaps, ModuleName, ResolvedRequires};
use ahash::AHashSet;

/// Writes performed while introducing new or changed files.
pub struct IntroduceFilesMutator<'a> {
  heaps: &'a mut ModuleHeaps,
}

impl<'a> IntroduceFilesMutator<'a> {
  pub fn add_info(&mut self, file: FileKey, info: FileInfo) {
    self.heaps.info.add_info(file, info);
  }

  pub fn add_provider(&mut self, file: FileKey, module: ModuleName) {
    self.heaps.all_providers.add_provider(file, module);
  }
}

/// Writes performed while retiring deleted files.
pub struct RetireFilesMutator<'a> {
  heaps: &'a mut ModuleHeaps,
}

impl<'a> RetireFilesMutator<'a> {
  pub fn remove_provider(&mut self, file: &FileKey, module: &ModuleName) {
    self.heaps.all_providers.remove_provider(file, module);
  }

  pub fn remove_info(&mut self, file: &FileKey) {
    self.heaps.info.remove_info(file);
  }

  pub fn remove_resolved_requires(&mut self, file: &FileKey) {
    self.heaps.requires.remove_resolved_requires(file);
  }
}

/// The single write the commit step performs against the name index.
pub struct CommitModulesMutator<'a> {
  heaps: &'a mut ModuleHeaps,
}

impl<'a> CommitModulesMutator<'a> {
  /// Apply the commit's removals and replacements as one batch. Removals go
  /// first so a module that is both removed and re-elected ends up elected.
  pub fn remove_and_replace(
    &mut self,
    to_remove: &AHashSet<ModuleName>,
    to_replace: &[(ModuleName, FileKey)],
  ) {
    self.heaps.names.remove_and_replace(to_remove, to_replace);
  }
}

/// Writes performed by the per-file import driver.
pub struct ResolvedRequiresMutator<'a> {
  heaps: &'a mut ModuleHeaps,
}

impl<'a> ResolvedRequiresMutator<'a> {
  /// Returns whether the record content changed.
  pub fn add_resolved_requires(&mut self, file: FileKey, requires: ResolvedRequires) -> bool {
    self.heaps.requires.add_resolved_requires(file, requires)
  }
}

impl ModuleHeaps {
  pub fn introduce_files_mutator(&mut self) -> IntroduceFilesMutator<'_> {
    IntroduceFilesMutator { heaps: self }
  }

  pub fn retire_files_mutator(&mut self) -> RetireFilesMutator<'_> {
    RetireFilesMutator { heaps: self }
  }

  pub fn commit_modules_mutator(&mut self) -> CommitModulesMutator<'_> {
    CommitModulesMutator { heaps: self }
  }

  pub fn resolved_requires_mutator(&mut self) -> ResolvedRequiresMutator<'_> {
    ResolvedRequiresMutator { heaps: self }
  }
}
