//! Flat-namespace resolution.
//!
//! Exported names come from the file itself (mock location, name reducer,
//! or docblock directive) rather than its path alone. Import resolution
//! commits to a single candidate up front: the authoritative name set is
//! not known until every file has been scanned, so filtering candidates by
//! on-disk validity here would change meaning between scans.

use crate::acc::ResolutionAcc;
use crate::election::{self, ProviderErrorMap};
use crate::env::ModuleEnv;
use crate::error::FatalError;
use crate::paths;
use crate::system::{eponymous_module, path, ModuleSystem};
use ahash::AHashSet;
use heaps_js::{Docblock, FileKey, ModuleHeaps, ModuleName};
use once_cell::sync::Lazy;
use regex::Regex;

static MOCK_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r".*/__mocks__/.*").unwrap());

pub(crate) struct FlatSystem;

impl ModuleSystem for FlatSystem {
  fn exported_module(&self, env: &ModuleEnv, file: &FileKey, docblock: &Docblock) -> ModuleName {
    let options = env.options();
    match file {
      FileKey::Source(path) => {
        if is_mock_path(path) {
          ModuleName::string(short_module_name(options.chop_declaration_ext(path)))
        } else if options.flat_use_name_reducers && reducers_apply(env, path) {
          ModuleName::string(reduce_module_name(env, path))
        } else if let Some(name) = docblock.provides_module() {
          ModuleName::string(name)
        } else {
          eponymous_module(options, file)
        }
      }
      _ => eponymous_module(options, file),
    }
  }

  fn imported_module(
    &self,
    env: &ModuleEnv,
    heaps: &ModuleHeaps,
    importer: &FileKey,
    reference: &str,
    acc: &mut ResolutionAcc,
  ) -> Result<ModuleName, FatalError> {
    let candidates = env.module_name_candidates(reference);
    let chosen = candidates
      .first()
      .cloned()
      .unwrap_or_else(|| reference.to_string());
    match resolve_import(env, heaps, importer, &chosen, acc)? {
      Some(hit) => Ok(ModuleName::file(env.options().eponymous_key(&hit))),
      // An unresolved reference is still a module identity; the checker
      // reports it as missing only if nothing ever provides the name.
      None => Ok(ModuleName::string(chosen)),
    }
  }

  fn choose_provider(
    &self,
    env: &ModuleEnv,
    module: &ModuleName,
    candidates: &AHashSet<FileKey>,
    errmap: &mut ProviderErrorMap,
  ) -> Result<FileKey, FatalError> {
    let mut sorted = election::sorted_candidates(candidates);
    if sorted.is_empty() {
      return Err(FatalError::Ice(format!(
        "no candidate providers for module `{module}`"
      )));
    }
    if sorted.len() == 1 {
      return Ok(sorted.remove(0));
    }

    // Non-mocks outrank mocks; a set that is all mocks elects its first.
    let (mocks, non_mocks): (Vec<FileKey>, Vec<FileKey>) =
      sorted.into_iter().partition(is_mock_key);
    election::choose_with_duplicates(env.options(), module, non_mocks, errmap, move || {
      mocks.into_iter().next().ok_or_else(|| {
        FatalError::Ice(format!("no candidate providers for module `{module}`"))
      })
    })
  }
}

fn resolve_import(
  env: &ModuleEnv,
  heaps: &ModuleHeaps,
  importer: &FileKey,
  reference: &str,
  acc: &mut ResolutionAcc,
) -> Result<Option<String>, FatalError> {
  if let Some(external) = env.external() {
    if let Some(hit) = external.resolve(reference, importer)? {
      let hit = paths::normalize(&hit);
      if !env.options().is_ignored(&hit) {
        return Ok(Some(hit));
      }
    }
  }

  let importer_dir = path::importer_dir(importer);
  if let Some(hit) = path::resolve_import(env, heaps, importer_dir, reference, acc) {
    return Ok(Some(hit));
  }

  // Package-relative expansion: `pkg/rest` resolved against the directory of
  // the manifest that declared `pkg`.
  if let Some((package, rest)) = reference.split_once('/') {
    if let Some(package_dir) = heaps.manifests.get_package_directory(package) {
      if let Some(hit) = path::resolve_relative(env, heaps, package_dir, rest, acc) {
        return Ok(Some(hit));
      }
    }
  }

  Ok(None)
}

pub(crate) fn is_mock_path(path: &str) -> bool {
  MOCK_PATH.is_match(&paths::normalize(path))
}

fn is_mock_key(file: &FileKey) -> bool {
  file.path().is_some_and(is_mock_path)
}

/// Basename without its extension: the flat name a mock exports.
fn short_module_name(path: &str) -> &str {
  let base = paths::basename(path);
  match base.rsplit_once('.') {
    Some((stem, _)) if !stem.is_empty() => stem,
    _ => base,
  }
}

fn reducers_apply(env: &ModuleEnv, path: &str) -> bool {
  let options = env.options();
  options.flat_paths_allowed.iter().any(|re| re.is_match(path))
    && !options.flat_paths_blocked.iter().any(|re| re.is_match(path))
}

fn reduce_module_name(env: &ModuleEnv, path: &str) -> String {
  let options = env.options();
  let mut name = path.to_string();
  for reducer in &options.flat_name_reducers {
    name = reducer.replace_all(&name, &options.root);
  }
  name
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mock_detection_normalizes_first() {
    assert!(is_mock_path("/r/__mocks__/Foo.js"));
    assert!(is_mock_path("/r/a/../__mocks__/Foo.js"));
    assert!(!is_mock_path("/r/mocks/Foo.js"));
  }

  #[test]
  fn short_names_drop_one_extension() {
    assert_eq!(short_module_name("/r/__mocks__/Foo.js"), "Foo");
    assert_eq!(short_module_name("/r/__mocks__/Foo.worker.js"), "Foo.worker");
    assert_eq!(short_module_name("/r/__mocks__/README"), "README");
  }
}
