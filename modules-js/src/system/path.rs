//! Filesystem-walking resolution in the style of the node algorithm.
//!
//! Candidate probing order is observable (it fixes which of several on-disk
//! candidates wins), so every step here tries alternatives strictly in
//! sequence and stops at the first hit. Probes of missing paths are recorded
//! as phantom dependents as a side effect, which is also why alternatives
//! after a hit must never run.

use crate::acc::ResolutionAcc;
use crate::election::{self, ProviderErrorMap};
use crate::env::ModuleEnv;
use crate::error::{FatalError, ModuleError};
use crate::paths;
use crate::system::{eponymous_module, ModuleSystem};
use ahash::AHashSet;
use heaps_js::{Docblock, FileKey, ModuleHeaps, ModuleName, PackageManifest};

pub(crate) struct PathSystem;

impl ModuleSystem for PathSystem {
  fn exported_module(&self, env: &ModuleEnv, file: &FileKey, _docblock: &Docblock) -> ModuleName {
    eponymous_module(env.options(), file)
  }

  fn imported_module(
    &self,
    env: &ModuleEnv,
    heaps: &ModuleHeaps,
    importer: &FileKey,
    reference: &str,
    acc: &mut ResolutionAcc,
  ) -> Result<ModuleName, FatalError> {
    let importer_dir = importer_dir(importer);
    let candidates = env.module_name_candidates(reference);
    for candidate in candidates.iter() {
      if let Some(path) = resolve_import(env, heaps, importer_dir, candidate, acc) {
        return Ok(ModuleName::file(env.options().eponymous_key(&path)));
      }
    }
    Ok(ModuleName::string(reference))
  }

  fn choose_provider(
    &self,
    env: &ModuleEnv,
    module: &ModuleName,
    candidates: &AHashSet<FileKey>,
    errmap: &mut ProviderErrorMap,
  ) -> Result<FileKey, FatalError> {
    let sorted = election::sorted_candidates(candidates);
    election::choose_with_duplicates(env.options(), module, sorted, errmap, || {
      Err(FatalError::Ice(format!(
        "no candidate providers for module `{module}`"
      )))
    })
  }
}

pub(crate) fn importer_dir(importer: &FileKey) -> &str {
  importer.path().map(paths::parent_dir).unwrap_or("/")
}

/// Resolve a single candidate reference from `importer_dir`.
pub(crate) fn resolve_import(
  env: &ModuleEnv,
  heaps: &ModuleHeaps,
  importer_dir: &str,
  reference: &str,
  acc: &mut ResolutionAcc,
) -> Option<String> {
  if paths::is_explicit_relative(reference) || paths::is_absolute(reference) {
    resolve_relative(env, heaps, importer_dir, reference, acc)
  } else {
    node_module(env, heaps, importer_dir, reference, acc)
  }
}

/// Resolve `rel` against `root_dir`: the path itself if it carries a
/// recognized extension, otherwise extension probing, then the package
/// manifest, then the directory index.
pub(crate) fn resolve_relative(
  env: &ModuleEnv,
  heaps: &ModuleHeaps,
  root_dir: &str,
  rel: &str,
  acc: &mut ResolutionAcc,
) -> Option<String> {
  let path = paths::normalize_join(root_dir, rel);
  if env.options().is_source_file(&path) {
    return path_if_exists(env, &path, acc);
  }
  if let Some(hit) = path_if_exists_with_file_exts(env, &path, acc) {
    return Some(hit);
  }
  if let Some(hit) = resolve_package_main(env, heaps, &format!("{path}/package.json"), acc) {
    return Some(hit);
  }
  path_if_exists_with_file_exts(env, &paths::normalize_join(&path, "index"), acc)
}

/// The declaration-shadow check: `path` is present if it or its declaration
/// twin exists on disk. Every probe of a missing path is recorded.
fn path_if_exists(env: &ModuleEnv, path: &str, acc: &mut ResolutionAcc) -> Option<String> {
  let declaration = format!("{path}{}", env.options().declaration_ext);
  if checked_exists(env, path, acc) || checked_exists(env, &declaration, acc) {
    Some(path.to_string())
  } else {
    None
  }
}

fn checked_exists(env: &ModuleEnv, path: &str, acc: &mut ResolutionAcc) -> bool {
  let exists = env.probe().file_exists(path);
  if !exists {
    acc.record_path(path);
  }
  exists && !env.options().is_ignored(path) && !env.probe().dir_exists(path)
}

fn path_if_exists_with_file_exts(
  env: &ModuleEnv,
  path: &str,
  acc: &mut ResolutionAcc,
) -> Option<String> {
  for ext in &env.options().module_file_exts {
    if let Some(hit) = path_if_exists(env, &format!("{path}{ext}"), acc) {
      return Some(hit);
    }
  }
  None
}

/// Resolve through a package manifest's `main` entry.
fn resolve_package_main(
  env: &ModuleEnv,
  heaps: &ModuleHeaps,
  manifest_path: &str,
  acc: &mut ResolutionAcc,
) -> Option<String> {
  let manifest_path = env.probe().resolve_symlinks(manifest_path)?;
  if !env.probe().file_exists(&manifest_path) || env.options().is_ignored(&manifest_path) {
    return None;
  }

  let manifest = match heaps.manifests.get_manifest(&manifest_path) {
    Some(Ok(manifest)) => manifest.clone(),
    // A manifest that failed to parse resolves like an empty one; the parse
    // error was already surfaced when the manifest itself was checked.
    Some(Err(())) => PackageManifest::empty(),
    None => {
      let options = env.options();
      let relative_path = options.relative_to_root(&manifest_path).to_string();
      let error = if options.is_within_root(&manifest_path) || options.is_included(&manifest_path)
      {
        ModuleError::PackageHeapNotFound { relative_path }
      } else {
        ModuleError::ModuleOutsideRoot { relative_path }
      };
      acc.record_error(error);
      PackageManifest::empty()
    }
  };

  let main = manifest.main.as_deref()?;
  let path = paths::normalize_join(paths::parent_dir(&manifest_path), main);
  if let Some(hit) = path_if_exists(env, &path, acc) {
    return Some(hit);
  }
  if let Some(hit) = path_if_exists_with_file_exts(env, &path, acc) {
    return Some(hit);
  }
  path_if_exists_with_file_exts(env, &paths::normalize_join(&path, "index"), acc)
}

/// Walk ancestor directories, trying each configured node-modules dirname in
/// the directories known to contain one.
fn node_module(
  env: &ModuleEnv,
  heaps: &ModuleHeaps,
  importer_dir: &str,
  reference: &str,
  acc: &mut ResolutionAcc,
) -> Option<String> {
  let mut dir = importer_dir;
  loop {
    if env.node_modules_containers().contains(dir) {
      for dirname in &env.options().node_resolver_dirnames {
        let rel = format!("{dirname}/{reference}");
        if let Some(hit) = resolve_relative(env, heaps, dir, &rel, acc) {
          return Some(hit);
        }
      }
    }
    let parent = paths::parent_dir(dir);
    if parent == dir {
      return None;
    }
    dir = parent;
  }
}
