//! File introduction and retirement: maintaining the all-providers index as
//! files enter and leave the graph.
//!
//! Per-file work (exported-name computation) is parallel; all index writes
//! happen serially afterwards, since the index is the one write target the
//! workers would otherwise share.

use crate::env::ModuleEnv;
use ahash::AHashSet;
use heaps_js::{Docblock, FileInfo, FileKey, ModuleHeaps, ModuleName};
use rayon::prelude::*;

/// Dirty input for the next commit: each claimed module paired with its
/// currently elected provider at introduction time.
pub type DirtyModules = Vec<(ModuleName, Option<FileKey>)>;

/// Introduce parsed and unparsed files, writing their info records and
/// registering their module claims. Returns the dirty modules the next
/// commit must re-elect.
pub fn introduce_files(
  env: &ModuleEnv,
  heaps: &mut ModuleHeaps,
  parsed: &[(FileKey, Docblock)],
  unparsed: &[(FileKey, Docblock)],
) -> DirtyModules {
  let force_check = env.options().force_check;
  let parsed_infos: Vec<(FileKey, FileInfo)> = parsed
    .par_iter()
    .map(|(file, docblock)| {
      let module = env.exported_module(file, docblock);
      let checked = force_check || docblock.is_typed();
      (file.clone(), FileInfo { module, checked, parsed: true })
    })
    .collect();
  let unparsed_infos: Vec<(FileKey, FileInfo)> = unparsed
    .par_iter()
    .map(|(file, docblock)| {
      let module = env.exported_module(file, docblock);
      let checked = force_check || unparsed_is_checked(env, file, docblock);
      (file.clone(), FileInfo { module, checked, parsed: false })
    })
    .collect();

  let mut dirty: DirtyModules = Vec::new();
  let mut dirtied: AHashSet<ModuleName> = AHashSet::new();
  let mut claims: Vec<(FileKey, ModuleName)> = Vec::new();
  for (file, info) in parsed_infos.iter().chain(unparsed_infos.iter()) {
    for name in claimed_names(file, &info.module) {
      let prev = heaps.names.get_provider(&name).cloned();
      if dirtied.insert(name.clone()) {
        dirty.push((name.clone(), prev));
      }
      claims.push((file.clone(), name));
    }
  }

  let mut mutator = heaps.introduce_files_mutator();
  for (file, info) in parsed_infos.into_iter().chain(unparsed_infos) {
    mutator.add_info(file, info);
  }
  for (file, name) in claims {
    mutator.add_provider(file, name);
  }
  dirty
}

/// Retire deleted files: drop their claims, info, and resolved requires.
/// Returns dirty modules with the retired file as previous provider where it
/// actually was the provider.
pub fn retire_files(heaps: &mut ModuleHeaps, files: &[FileKey]) -> DirtyModules {
  let mut dirty: DirtyModules = Vec::new();
  let mut dirtied: AHashSet<ModuleName> = AHashSet::new();
  let mut drops: Vec<(FileKey, ModuleName)> = Vec::new();
  for file in files {
    let Some(info) = heaps.info.get_info(file) else {
      continue;
    };
    for name in claimed_names(file, &info.module) {
      let prev = match heaps.names.get_provider(&name) {
        Some(provider) if provider == file => Some(provider.clone()),
        _ => None,
      };
      if dirtied.insert(name.clone()) {
        dirty.push((name.clone(), prev));
      }
      drops.push((file.clone(), name));
    }
  }

  let mut mutator = heaps.retire_files_mutator();
  for (file, name) in drops {
    mutator.remove_provider(&file, &name);
  }
  for file in files {
    mutator.remove_info(file);
    mutator.remove_resolved_requires(file);
  }
  dirty
}

/// The module names a file claims: its exported module and, when different,
/// its raw eponymous name.
fn claimed_names(file: &FileKey, exported: &ModuleName) -> Vec<ModuleName> {
  let eponymous = ModuleName::file(file.clone());
  if eponymous == *exported {
    vec![exported.clone()]
  } else {
    vec![exported.clone(), eponymous]
  }
}

fn unparsed_is_checked(env: &ModuleEnv, file: &FileKey, docblock: &Docblock) -> bool {
  file.is_lib()
    || docblock.is_declaration_file()
    || file
      .path()
      .is_some_and(|path| env.options().is_declaration_path(path))
}
