use crate::FileKey;
use std::fmt;
use std::sync::Arc;

/// Name under which a module can be imported.
///
/// Flat-namespace modules are identified by a declared string; everything
/// else is identified by the file that defines it (its eponymous module).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleName {
  String(Arc<str>),
  File(FileKey),
}

impl ModuleName {
  pub fn string(name: impl Into<Arc<str>>) -> ModuleName {
    ModuleName::String(name.into())
  }

  pub fn file(key: FileKey) -> ModuleName {
    ModuleName::File(key)
  }
}

impl fmt::Display for ModuleName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ModuleName::String(s) => f.write_str(s),
      ModuleName::File(key) => write!(f, "{key}"),
    }
  }
}

impl fmt::Debug for ModuleName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ModuleName::String(s) => f.debug_tuple("String").field(s).finish(),
      ModuleName::File(key) => f.debug_tuple("File").field(key).finish(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn structural_equality() {
    assert_eq!(ModuleName::string("Foo"), ModuleName::string("Foo"));
    assert_ne!(
      ModuleName::string("/r/a.js"),
      ModuleName::file(FileKey::source("/r/a.js"))
    );
  }
}
