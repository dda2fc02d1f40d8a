use std::fmt;
use std::sync::Arc;

/// Identity of a file in the program, tagged by how the file entered it.
///
/// Equality and ordering are by tag plus path. The string form (via
/// [`fmt::Display`]) is stable and is what elections sort by, so it must not
/// change between runs.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileKey {
  /// The synthetic file holding ambient builtin declarations.
  Builtins,
  /// A source file of the checked language.
  Source(Arc<str>),
  /// A library declaration file supplied through the lib configuration.
  Lib(Arc<str>),
  /// A JSON module.
  Json(Arc<str>),
  /// An asset file importable for its URL (images, stylesheets, ...).
  Resource(Arc<str>),
}

impl FileKey {
  pub fn source(path: impl Into<Arc<str>>) -> FileKey {
    FileKey::Source(path.into())
  }

  pub fn lib(path: impl Into<Arc<str>>) -> FileKey {
    FileKey::Lib(path.into())
  }

  pub fn json(path: impl Into<Arc<str>>) -> FileKey {
    FileKey::Json(path.into())
  }

  pub fn resource(path: impl Into<Arc<str>>) -> FileKey {
    FileKey::Resource(path.into())
  }

  /// The on-disk path, or `None` for [`FileKey::Builtins`].
  pub fn path(&self) -> Option<&str> {
    match self {
      FileKey::Builtins => None,
      FileKey::Source(p) | FileKey::Lib(p) | FileKey::Json(p) | FileKey::Resource(p) => Some(p),
    }
  }

  pub fn is_lib(&self) -> bool {
    matches!(self, FileKey::Builtins | FileKey::Lib(_))
  }

  /// Rebuild the key with a different path, keeping the tag.
  pub fn with_path(&self, path: impl Into<Arc<str>>) -> FileKey {
    match self {
      FileKey::Builtins => FileKey::Builtins,
      FileKey::Source(_) => FileKey::Source(path.into()),
      FileKey::Lib(_) => FileKey::Lib(path.into()),
      FileKey::Json(_) => FileKey::Json(path.into()),
      FileKey::Resource(_) => FileKey::Resource(path.into()),
    }
  }
}

impl fmt::Display for FileKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FileKey::Builtins => f.write_str("(builtins)"),
      FileKey::Source(p) | FileKey::Lib(p) | FileKey::Json(p) | FileKey::Resource(p) => {
        f.write_str(p)
      }
    }
  }
}

impl fmt::Debug for FileKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FileKey::Builtins => f.write_str("Builtins"),
      FileKey::Source(p) => f.debug_tuple("Source").field(p).finish(),
      FileKey::Lib(p) => f.debug_tuple("Lib").field(p).finish(),
      FileKey::Json(p) => f.debug_tuple("Json").field(p).finish(),
      FileKey::Resource(p) => f.debug_tuple("Resource").field(p).finish(),
    }
  }
}
