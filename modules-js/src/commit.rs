//! Single-threaded reconciliation of the name index against a dirty set.

use crate::election::ProviderErrorMap;
use crate::env::ModuleEnv;
use crate::error::FatalError;
use ahash::AHashSet;
use heaps_js::{FileKey, ModuleHeaps, ModuleName};

/// What a commit decided, beyond the name-index writes it applied.
#[derive(Debug, Default)]
pub struct CommitOutcome {
  /// Newly elected providers, in dirty order.
  pub providers: Vec<FileKey>,
  /// Modules whose provider (or provider contents) effectively changed;
  /// importers of these need re-resolution.
  pub changed_modules: AHashSet<ModuleName>,
  /// Per-file provider errors. Files whose module was re-elected cleanly
  /// carry an empty entry, which downstream replaces their stale errors.
  pub errmap: ProviderErrorMap,
}

/// Re-elect providers for `dirty_modules` and apply the result to the name
/// index transactionally.
///
/// Callers guarantee that every file in `new_or_changed` has been
/// introduced, and that every module whose provider may have been
/// invalidated appears in `dirty_modules` with its previously elected
/// provider (or `None`).
pub fn commit_modules(
  env: &ModuleEnv,
  heaps: &mut ModuleHeaps,
  new_or_changed: &AHashSet<FileKey>,
  dirty_modules: &[(ModuleName, Option<FileKey>)],
) -> Result<CommitOutcome, FatalError> {
  debug_assert!(
    new_or_changed.iter().all(|file| heaps.info.contains(file)),
    "new_or_changed files must be introduced before commit"
  );

  let mut to_remove: AHashSet<ModuleName> = AHashSet::new();
  let mut to_replace: Vec<(ModuleName, FileKey)> = Vec::new();
  let mut outcome = CommitOutcome::default();

  for (module, prev) in dirty_modules {
    let Some(candidates) = heaps.all_providers.find_in_all_providers(module) else {
      // Nothing claims the module any more.
      to_remove.insert(module.clone());
      outcome.changed_modules.insert(module.clone());
      continue;
    };

    // Seed empty error lists for files about to be re-elected, preserving
    // errors already accumulated earlier in this same commit.
    for file in candidates {
      outcome.errmap.entry(file.clone()).or_default();
    }

    let provider = env.choose_provider(module, candidates, &mut outcome.errmap)?;
    match prev {
      Some(prev_file) if *prev_file == provider => {
        // Same election; the module still changed if its provider's
        // contents did.
        if new_or_changed.contains(&provider) {
          outcome.changed_modules.insert(module.clone());
        }
      }
      _ => {
        outcome.providers.push(provider.clone());
        to_replace.push((module.clone(), provider));
        outcome.changed_modules.insert(module.clone());
      }
    }
  }

  tracing::debug!(
    removed = to_remove.len(),
    replaced = to_replace.len(),
    changed = outcome.changed_modules.len(),
    "committed modules"
  );
  heaps
    .commit_modules_mutator()
    .remove_and_replace(&to_remove, &to_replace);
  Ok(outcome)
}
