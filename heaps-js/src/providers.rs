use crate::{FileKey, ModuleName};
use ahash::{AHashMap, AHashSet};

/// Reverse index `ModuleName -> set of files claiming that name`.
///
/// A file appears under exactly the names it claims: its exported module
/// name and, when different, its eponymous name. Entries with empty sets are
/// dropped eagerly so `find_in_all_providers` doubles as an emptiness check.
#[derive(Debug, Default)]
pub struct AllProvidersIndex {
  providers: AHashMap<ModuleName, AHashSet<FileKey>>,
}

impl AllProvidersIndex {
  pub fn new() -> AllProvidersIndex {
    AllProvidersIndex::default()
  }

  pub fn find_in_all_providers(&self, module: &ModuleName) -> Option<&AHashSet<FileKey>> {
    self.providers.get(module)
  }

  pub(crate) fn add_provider(&mut self, file: FileKey, module: ModuleName) {
    self.providers.entry(module).or_default().insert(file);
  }

  pub(crate) fn remove_provider(&mut self, file: &FileKey, module: &ModuleName) {
    if let Some(files) = self.providers.get_mut(module) {
      files.remove(file);
      if files.is_empty() {
        self.providers.remove(module);
      }
    }
  }

  pub fn is_empty(&self) -> bool {
    self.providers.is_empty()
  }

  /// Every module name with at least one claimant.
  pub fn modules(&self) -> impl Iterator<Item = &ModuleName> {
    self.providers.keys()
  }
}

/// The persistent `ModuleName -> elected provider` map.
///
/// Only the commit step writes it, through
/// [`remove_and_replace`](NameIndex::remove_and_replace), which applies the
/// whole batch before any reader can observe it again.
#[derive(Debug, Default)]
pub struct NameIndex {
  providers: AHashMap<ModuleName, FileKey>,
}

impl NameIndex {
  pub fn new() -> NameIndex {
    NameIndex::default()
  }

  pub fn get_provider(&self, module: &ModuleName) -> Option<&FileKey> {
    self.providers.get(module)
  }

  pub fn len(&self) -> usize {
    self.providers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.providers.is_empty()
  }

  pub fn entries(&self) -> impl Iterator<Item = (&ModuleName, &FileKey)> {
    self.providers.iter()
  }

  pub(crate) fn remove_and_replace(
    &mut self,
    to_remove: &AHashSet<ModuleName>,
    to_replace: &[(ModuleName, FileKey)],
  ) {
    for module in to_remove {
      self.providers.remove(module);
    }
    for (module, provider) in to_replace {
      self.providers.insert(module.clone(), provider.clone());
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_claim_sets_are_dropped() {
    let mut index = AllProvidersIndex::new();
    let module = ModuleName::string("Foo");
    let file = FileKey::source("/r/x.js");
    index.add_provider(file.clone(), module.clone());
    assert!(index.find_in_all_providers(&module).is_some());
    index.remove_provider(&file, &module);
    assert!(index.find_in_all_providers(&module).is_none());
    assert!(index.is_empty());
  }

  #[test]
  fn remove_and_replace_applies_removals_first() {
    let mut names = NameIndex::new();
    let foo = ModuleName::string("Foo");
    let bar = ModuleName::string("Bar");
    names.remove_and_replace(&AHashSet::new(), &[
      (foo.clone(), FileKey::source("/r/x.js")),
      (bar.clone(), FileKey::source("/r/y.js")),
    ]);

    let mut to_remove = AHashSet::new();
    to_remove.insert(bar.clone());
    names.remove_and_replace(&to_remove, &[(foo.clone(), FileKey::source("/r/z.js"))]);
    assert_eq!(names.get_provider(&foo), Some(&FileKey::source("/r/z.js")));
    assert_eq!(names.get_provider(&bar), None);
    assert_eq!(names.len(), 1);
  }
}
