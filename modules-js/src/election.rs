//! Deterministic election of a single provider for a contested module name.

use crate::error::{FatalError, ModuleError};
use crate::options::Options;
use ahash::{AHashMap, AHashSet};
use heaps_js::{FileKey, ModuleName};
use itertools::Itertools;

/// Per-file error lists accumulated during a commit.
pub type ProviderErrorMap = AHashMap<FileKey, Vec<ModuleError>>;

/// Fix the iteration order of a candidate set before partitioning, so
/// election is reproducible across runs.
pub(crate) fn sorted_candidates(candidates: &AHashSet<FileKey>) -> Vec<FileKey> {
  candidates
    .iter()
    .cloned()
    .sorted_by_cached_key(|file| file.to_string())
    .collect()
}

/// Pick a winner among `candidates`, warning about the rest.
///
/// Declaration files (definitions) outrank implementations. When a
/// definition wins over implementations, the leading implementation is not
/// flagged as a duplicate: a declaration legitimately shadows it. `fallback`
/// decides the winner when `candidates` is empty.
pub(crate) fn choose_with_duplicates(
  options: &Options,
  module: &ModuleName,
  candidates: Vec<FileKey>,
  errmap: &mut ProviderErrorMap,
  fallback: impl FnOnce() -> Result<FileKey, FatalError>,
) -> Result<FileKey, FatalError> {
  let (definitions, implementations): (Vec<FileKey>, Vec<FileKey>) = candidates
    .into_iter()
    .partition(|file| is_definition(options, file));

  match (definitions.split_first(), implementations.split_first()) {
    (None, None) => fallback(),
    (None, Some((winner, losers))) => {
      warn_duplicates(module, winner, losers, errmap);
      Ok(winner.clone())
    }
    (Some((winner, losers)), None) => {
      warn_duplicates(module, winner, losers, errmap);
      Ok(winner.clone())
    }
    (Some((winner, losing_definitions)), Some((_shadowed, losing_implementations))) => {
      warn_duplicates(module, winner, losing_definitions, errmap);
      warn_duplicates(module, winner, losing_implementations, errmap);
      Ok(winner.clone())
    }
  }
}

fn is_definition(options: &Options, file: &FileKey) -> bool {
  file
    .path()
    .is_some_and(|path| options.is_declaration_path(path))
}

fn warn_duplicates(
  module: &ModuleName,
  winner: &FileKey,
  losers: &[FileKey],
  errmap: &mut ProviderErrorMap,
) {
  for loser in losers {
    errmap
      .entry(loser.clone())
      .or_default()
      .push(ModuleError::DuplicateProvider {
        module: module.clone(),
        provider: winner.clone(),
        conflict: loser.clone(),
      });
  }
}
