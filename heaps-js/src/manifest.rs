use ahash::AHashMap;
use serde::Deserialize;

/// The fields of a package manifest the module graph cares about.
///
/// Everything else in the manifest is ignored at parse time. Equality is
/// structural so a re-parse can be compared against the stored outcome to
/// decide whether dependents of the package need rechecking.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PackageManifest {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub main: Option<String>,
}

impl PackageManifest {
  pub fn empty() -> PackageManifest {
    PackageManifest::default()
  }

  /// Parse manifest text. The unit error keeps parse failures comparable in
  /// the heap; the parser surfaces the detailed error to the user itself.
  pub fn parse(text: &str) -> Result<PackageManifest, ()> {
    serde_json::from_str(text).map_err(|_| ())
  }
}

/// Parsed package manifests keyed by manifest path.
///
/// The stored value is the parse *outcome*, so a manifest that failed to
/// parse still occupies its slot and later edits can be detected as changes.
#[derive(Debug, Default)]
pub struct PackageManifestHeap {
  by_path: AHashMap<String, Result<PackageManifest, ()>>,
  dir_by_name: AHashMap<String, String>,
}

impl PackageManifestHeap {
  pub fn new() -> PackageManifestHeap {
    PackageManifestHeap::default()
  }

  /// Parse outcome for the manifest at `path`, if one was ever observed.
  pub fn get_manifest(&self, path: &str) -> Option<&Result<PackageManifest, ()>> {
    self.by_path.get(path)
  }

  /// Record the parse outcome for the manifest at `path`.
  pub fn add_package_json(&mut self, path: &str, outcome: Result<PackageManifest, ()>) {
    if let Ok(manifest) = &outcome {
      if let Some(name) = &manifest.name {
        self
          .dir_by_name
          .insert(name.clone(), parent_dir(path).to_string());
      }
    }
    self.by_path.insert(path.to_string(), outcome);
  }

  /// Directory of the manifest that declared `name`, for package-relative
  /// import expansion.
  pub fn get_package_directory(&self, name: &str) -> Option<&str> {
    self.dir_by_name.get(name).map(String::as_str)
  }
}

fn parent_dir(path: &str) -> &str {
  match path.rfind('/') {
    Some(0) => "/",
    Some(idx) => &path[..idx],
    None => ".",
  }
}
