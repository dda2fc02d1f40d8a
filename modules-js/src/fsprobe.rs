//! Case-correct existence probing with a per-pass directory cache.
//!
//! On case-insensitive filesystems a plain `exists` check lies: `a.JS` and
//! `a.js` both "exist". Resolution instead lists the parent directory once,
//! caches the listing, and checks membership by exact-case basename. The
//! cache is process-wide for a pass and must be cleared at the top of the
//! next one, before any files can have changed underneath it.

use crate::paths;
use ahash::{AHashMap, AHashSet};
use std::sync::{Arc, Mutex};

/// Filesystem queries the probe is built on. Implemented by [`RealFs`] for
/// disk and by [`MemoryFs`] for hermetic tests.
pub trait ProbeFs: Send + Sync {
  /// Whether anything exists at `path`, following symlinks.
  fn path_exists(&self, path: &str) -> bool;
  fn is_dir(&self, path: &str) -> bool;
  /// Entry names of `dir`. Unreadable or missing directories yield the
  /// empty list.
  fn read_dir_names(&self, dir: &str) -> Vec<String>;
  /// Resolve through all symlinks to an absolute path.
  fn canonicalize(&self, path: &str) -> std::io::Result<String>;
  fn current_dir(&self) -> std::io::Result<String>;
}

/// Probe backed by the real filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct RealFs;

impl ProbeFs for RealFs {
  fn path_exists(&self, path: &str) -> bool {
    std::fs::metadata(path).is_ok()
  }

  fn is_dir(&self, path: &str) -> bool {
    std::fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
  }

  fn read_dir_names(&self, dir: &str) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
      return Vec::new();
    };
    entries
      .filter_map(|entry| Some(entry.ok()?.file_name().to_string_lossy().into_owned()))
      .collect()
  }

  fn canonicalize(&self, path: &str) -> std::io::Result<String> {
    let canonical = std::fs::canonicalize(path)?;
    Ok(canonical.to_string_lossy().into_owned())
  }

  fn current_dir(&self) -> std::io::Result<String> {
    Ok(std::env::current_dir()?.to_string_lossy().into_owned())
  }
}

/// In-memory filesystem for tests: a set of file paths, with directories
/// implied by prefixes and an optional symlink table.
#[derive(Clone, Debug, Default)]
pub struct MemoryFs {
  files: AHashSet<String>,
  symlinks: AHashMap<String, String>,
}

impl MemoryFs {
  pub fn new() -> MemoryFs {
    MemoryFs::default()
  }

  pub fn insert(&mut self, path: &str) -> &mut MemoryFs {
    self.files.insert(paths::normalize(path));
    self
  }

  pub fn insert_symlink(&mut self, link: &str, target: &str) -> &mut MemoryFs {
    self
      .symlinks
      .insert(paths::normalize(link), paths::normalize(target));
    self
  }
}

impl ProbeFs for MemoryFs {
  fn path_exists(&self, path: &str) -> bool {
    let path = paths::normalize(path);
    self.files.contains(&path) || self.symlinks.contains_key(&path) || self.is_dir(&path)
  }

  fn is_dir(&self, path: &str) -> bool {
    let path = paths::normalize(path);
    if path == "/" {
      return true;
    }
    let prefix = format!("{path}/");
    self.files.iter().any(|f| f.starts_with(&prefix))
  }

  fn read_dir_names(&self, dir: &str) -> Vec<String> {
    let dir = paths::normalize(dir);
    let prefix = if dir == "/" { "/".to_string() } else { format!("{dir}/") };
    let mut names = AHashSet::new();
    for path in self.files.iter().chain(self.symlinks.keys()) {
      if let Some(rest) = path.strip_prefix(&prefix) {
        if let Some(first) = rest.split('/').next() {
          if !first.is_empty() {
            names.insert(first.to_string());
          }
        }
      }
    }
    names.into_iter().collect()
  }

  fn canonicalize(&self, path: &str) -> std::io::Result<String> {
    let path = paths::normalize(path);
    if let Some(target) = self.symlinks.get(&path) {
      return Ok(target.clone());
    }
    if self.files.contains(&path) || self.is_dir(&path) {
      return Ok(path);
    }
    Err(std::io::Error::new(
      std::io::ErrorKind::NotFound,
      format!("no such path: {path}"),
    ))
  }

  fn current_dir(&self) -> std::io::Result<String> {
    Ok("/mem".to_string())
  }
}

/// Case-correct existence checks over a cached directory listing.
pub struct FsProbe {
  fs: Box<dyn ProbeFs>,
  case_sensitive: bool,
  dir_cache: Mutex<AHashMap<String, Arc<AHashSet<String>>>>,
}

impl FsProbe {
  /// Build a probe, determining case sensitivity by testing whether the
  /// current directory still exists when its path is upper-cased.
  pub fn new(fs: impl ProbeFs + 'static) -> FsProbe {
    let case_sensitive = match fs.current_dir() {
      Ok(cwd) => !fs.path_exists(&cwd.to_uppercase()),
      Err(_) => true,
    };
    FsProbe::with_case_sensitivity(fs, case_sensitive)
  }

  pub fn with_case_sensitivity(fs: impl ProbeFs + 'static, case_sensitive: bool) -> FsProbe {
    FsProbe {
      fs: Box::new(fs),
      case_sensitive,
      dir_cache: Mutex::new(AHashMap::new()),
    }
  }

  pub fn case_sensitive(&self) -> bool {
    self.case_sensitive
  }

  /// Drop all cached listings. Call at the top of each pass.
  pub fn clear(&self) {
    self.dir_cache.lock().unwrap().clear();
  }

  /// Case-correct existence. On case-insensitive filesystems this consults
  /// the parent directory's cached listing instead of trusting `exists`.
  pub fn file_exists(&self, path: &str) -> bool {
    let dir = paths::parent_dir(path);
    if self.case_sensitive || path == "." || path == ".." || dir == path {
      self.fs.path_exists(path)
    } else {
      self.listing(dir).contains(paths::basename(path))
    }
  }

  /// True only for an existing directory whose basename is case-correct.
  pub fn dir_exists(&self, path: &str) -> bool {
    self.fs.is_dir(path) && self.file_exists(path)
  }

  /// Resolve through all symlinks; `None` when the path cannot be resolved.
  pub fn resolve_symlinks(&self, path: &str) -> Option<String> {
    self.fs.canonicalize(path).ok().map(|p| paths::normalize(&p))
  }

  fn listing(&self, dir: &str) -> Arc<AHashSet<String>> {
    {
      let cache = self.dir_cache.lock().unwrap();
      if let Some(listing) = cache.get(dir) {
        return Arc::clone(listing);
      }
    }

    // List outside the lock; a racing worker's identical listing wins.
    let names: AHashSet<String> = self.fs.read_dir_names(dir).into_iter().collect();
    let listing = Arc::new(names);
    let mut cache = self.dir_cache.lock().unwrap();
    let entry = cache
      .entry(dir.to_string())
      .or_insert_with(|| Arc::clone(&listing));
    Arc::clone(entry)
  }
}

impl std::fmt::Debug for FsProbe {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FsProbe")
      .field("case_sensitive", &self.case_sensitive)
      .finish_non_exhaustive()
  }
}
