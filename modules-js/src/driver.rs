//! Per-file import driver: resolve every reference a file makes, write its
//! resolved-requires record, and report what changed.

use crate::acc::ResolutionAcc;
use crate::env::ModuleEnv;
use crate::error::{FatalError, ModuleError};
use ahash::{AHashMap, AHashSet};
use heaps_js::{FileKey, ModuleHeaps, ResolvedRequires};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Outcome of resolving one file's imports.
#[derive(Debug)]
pub struct FileResolution {
  /// Whether the stored resolved-requires record changed.
  pub changed: bool,
  pub errors: Vec<ModuleError>,
}

/// Outcome of resolving a batch of files.
#[derive(Debug, Default)]
pub struct BatchResolution {
  /// Files whose resolved-requires record changed; their dependents need
  /// rechecking.
  pub changed: AHashSet<FileKey>,
  pub errors: AHashMap<FileKey, Vec<ModuleError>>,
}

/// Resolve every reference in `file` and store the record.
pub fn resolve_requires(
  env: &ModuleEnv,
  heaps: &mut ModuleHeaps,
  file: &FileKey,
  references: &[String],
) -> Result<FileResolution, FatalError> {
  let (requires, errors) = compute_requires(env, heaps, file, references)?;
  let changed = heaps
    .resolved_requires_mutator()
    .add_resolved_requires(file.clone(), requires);
  Ok(FileResolution { changed, errors })
}

/// Resolve a batch of files in parallel, then apply the heap writes in
/// input order on the calling thread.
pub fn resolve_requires_batch(
  env: &ModuleEnv,
  heaps: &mut ModuleHeaps,
  jobs: &[(FileKey, Vec<String>)],
) -> Result<BatchResolution, FatalError> {
  let computed: Vec<(FileKey, ResolvedRequires, Vec<ModuleError>)> = {
    let heaps: &ModuleHeaps = heaps;
    jobs
      .par_iter()
      .map(|(file, references)| {
        let (requires, errors) = compute_requires(env, heaps, file, references)?;
        Ok((file.clone(), requires, errors))
      })
      .collect::<Result<_, FatalError>>()?
  };

  let mut batch = BatchResolution::default();
  let mut mutator = heaps.resolved_requires_mutator();
  for (file, requires, errors) in computed {
    if mutator.add_resolved_requires(file.clone(), requires) {
      batch.changed.insert(file.clone());
    }
    if !errors.is_empty() {
      batch.errors.insert(file, errors);
    }
  }
  Ok(batch)
}

fn compute_requires(
  env: &ModuleEnv,
  heaps: &ModuleHeaps,
  file: &FileKey,
  references: &[String],
) -> Result<(ResolvedRequires, Vec<ModuleError>), FatalError> {
  let mut acc = ResolutionAcc::new();
  let mut resolved = BTreeMap::new();
  for reference in references {
    let module = env.imported_module(heaps, file, reference, &mut acc)?;
    resolved.insert(reference.clone(), module);
  }
  Ok((
    ResolvedRequires {
      resolved,
      phantom_dependents: acc.paths,
    },
    acc.errors,
  ))
}
