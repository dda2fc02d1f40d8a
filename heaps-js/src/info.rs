use crate::{FileKey, ModuleName};
use ahash::AHashMap;

/// Per-file record written when a file is introduced to the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
  /// The module this file exports.
  pub module: ModuleName,
  /// Whether the file participates in checking (pragma, lib, or forced).
  pub checked: bool,
  /// Whether the file was introduced with a parse result.
  pub parsed: bool,
}

/// `FileKey -> FileInfo`, replaced wholesale when a file is re-introduced.
#[derive(Debug, Default)]
pub struct InfoHeap {
  infos: AHashMap<FileKey, FileInfo>,
}

impl InfoHeap {
  pub fn new() -> InfoHeap {
    InfoHeap::default()
  }

  pub fn get_info(&self, file: &FileKey) -> Option<&FileInfo> {
    self.infos.get(file)
  }

  pub fn contains(&self, file: &FileKey) -> bool {
    self.infos.contains_key(file)
  }

  pub(crate) fn add_info(&mut self, file: FileKey, info: FileInfo) {
    self.infos.insert(file, info);
  }

  pub(crate) fn remove_info(&mut self, file: &FileKey) {
    self.infos.remove(file);
  }
}
