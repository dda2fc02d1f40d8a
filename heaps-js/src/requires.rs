use crate::{FileKey, ModuleName};
use ahash::AHashMap;
use std::collections::{BTreeMap, BTreeSet};

/// A file's resolved imports plus the paths whose absence shaped them.
///
/// `resolved` maps each reference string appearing in the file to the module
/// it resolved to. `phantom_dependents` are filesystem paths that were probed
/// during resolution but did not exist; if one of them later materializes the
/// file must be re-resolved. Both use ordered containers so equality (and the
/// changed flag derived from it) is independent of resolution order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedRequires {
  pub resolved: BTreeMap<String, ModuleName>,
  pub phantom_dependents: BTreeSet<String>,
}

/// `FileKey -> ResolvedRequires`, one record per resolved file.
#[derive(Debug, Default)]
pub struct ResolvedRequiresHeap {
  records: AHashMap<FileKey, ResolvedRequires>,
}

impl ResolvedRequiresHeap {
  pub fn new() -> ResolvedRequiresHeap {
    ResolvedRequiresHeap::default()
  }

  pub fn get_resolved_requires(&self, file: &FileKey) -> Option<&ResolvedRequires> {
    self.records.get(file)
  }

  /// Store `requires` for `file`. Returns whether the stored record differs
  /// from what was there before; callers use the flag to decide which
  /// dependents need rechecking.
  pub(crate) fn add_resolved_requires(&mut self, file: FileKey, requires: ResolvedRequires) -> bool {
    match self.records.get(&file) {
      Some(existing) if *existing == requires => false,
      _ => {
        self.records.insert(file, requires);
        true
      }
    }
  }

  pub(crate) fn remove_resolved_requires(&mut self, file: &FileKey) {
    self.records.remove(file);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn changed_flag_tracks_content() {
    let mut heap = ResolvedRequiresHeap::new();
    let file = FileKey::source("/r/a.js");
    let mut requires = ResolvedRequires::default();
    requires
      .resolved
      .insert("./b".to_string(), ModuleName::file(FileKey::source("/r/b.js")));

    assert!(heap.add_resolved_requires(file.clone(), requires.clone()));
    assert!(!heap.add_resolved_requires(file.clone(), requires.clone()));

    requires.phantom_dependents.insert("/r/c.js".to_string());
    assert!(heap.add_resolved_requires(file, requires));
  }
}
