use crate::paths;
use heaps_js::FileKey;
use regex::Regex;
use std::path::PathBuf;

/// Sentinel replaced by the absolute project root in mapper templates and
/// path-regex configuration.
pub const PROJECT_ROOT_TOKEN: &str = "<<PROJECT_ROOT>>";

/// Which module system interprets references and elects providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModuleSystemKind {
  /// Filesystem-walking resolution; module identity is the file path.
  Path,
  /// Flat namespace resolution; module identity may be a declared name.
  Flat,
}

/// A configured `(regex, template)` rewrite applied to module references
/// (name mappers) or file paths (name reducers).
///
/// The root token is expanded in two different ways depending on position:
/// inside the *pattern* it becomes the regex-escaped root before compilation;
/// inside the *template* it is substituted literally after replacement, by
/// splitting on the token, so backreference-looking text in the root (`\1`,
/// `$1`) is never re-interpreted.
#[derive(Clone, Debug)]
pub struct NameMapper {
  regex: Regex,
  template: String,
}

impl NameMapper {
  pub fn new(pattern: &str, template: &str, root: &str) -> Result<NameMapper, regex::Error> {
    let pattern = expand_token(pattern, &regex::escape(root));
    Ok(NameMapper {
      regex: Regex::new(&pattern)?,
      template: template.to_string(),
    })
  }

  /// Rewrite `name` if this mapper matches and the rewrite changes it.
  pub(crate) fn rewrite(&self, name: &str, root: &str) -> Option<String> {
    if !self.regex.is_match(name) {
      return None;
    }
    let replaced = self.regex.replace_all(name, self.template.as_str());
    let expanded = expand_token(&replaced, root);
    if expanded == name {
      None
    } else {
      Some(expanded)
    }
  }

  /// Unconditional rewrite, used by name reducers which apply in sequence.
  pub(crate) fn replace_all(&self, name: &str, root: &str) -> String {
    let replaced = self.regex.replace_all(name, self.template.as_str());
    expand_token(&replaced, root)
  }
}

/// Literal split-and-join substitution of the root token.
pub(crate) fn expand_token(text: &str, root: &str) -> String {
  if !text.contains(PROJECT_ROOT_TOKEN) {
    return text.to_string();
  }
  text.split(PROJECT_ROOT_TOKEN).collect::<Vec<_>>().join(root)
}

/// Compile a path-position regex, expanding the root token first.
pub fn compile_path_regex(pattern: &str, root: &str) -> Result<Regex, regex::Error> {
  Regex::new(&expand_token(pattern, &regex::escape(root)))
}

/// Everything the module graph reads from configuration.
#[derive(Debug)]
pub struct Options {
  pub module_system: ModuleSystemKind,
  pub module_name_mappers: Vec<NameMapper>,
  /// External resolver binary consulted by the Flat system before built-in
  /// resolution.
  pub module_resolver: Option<PathBuf>,
  pub flat_use_name_reducers: bool,
  pub flat_name_reducers: Vec<NameMapper>,
  /// Paths eligible for name reduction. A path must match one of these...
  pub flat_paths_allowed: Vec<Regex>,
  /// ...and none of these.
  pub flat_paths_blocked: Vec<Regex>,
  pub node_resolver_dirnames: Vec<String>,
  /// Extensions appended when probing an extension-less candidate, in
  /// probing order. Ordering is observable.
  pub module_file_exts: Vec<String>,
  pub json_exts: Vec<String>,
  pub resource_exts: Vec<String>,
  /// Suffix appended to a full filename to form its declaration file.
  pub declaration_ext: String,
  /// Normalized absolute project root, no trailing slash.
  pub root: String,
  /// Path prefixes on the included list (outside-root trees opted in).
  pub includes: Vec<String>,
  pub ignores: Vec<Regex>,
  /// Check every file regardless of pragma.
  pub force_check: bool,
}

impl Default for Options {
  fn default() -> Options {
    Options {
      module_system: ModuleSystemKind::Path,
      module_name_mappers: Vec::new(),
      module_resolver: None,
      flat_use_name_reducers: false,
      flat_name_reducers: Vec::new(),
      flat_paths_allowed: Vec::new(),
      flat_paths_blocked: Vec::new(),
      node_resolver_dirnames: vec!["node_modules".to_string()],
      module_file_exts: vec![
        ".js".to_string(),
        ".jsx".to_string(),
        ".mjs".to_string(),
        ".json".to_string(),
      ],
      json_exts: vec![".json".to_string()],
      resource_exts: vec![
        ".css".to_string(),
        ".png".to_string(),
        ".svg".to_string(),
      ],
      declaration_ext: ".decl".to_string(),
      root: "/".to_string(),
      includes: Vec::new(),
      ignores: Vec::new(),
      force_check: false,
    }
  }
}

impl Options {
  /// Strip the declaration suffix, if present.
  pub fn chop_declaration_ext<'a>(&self, path: &'a str) -> &'a str {
    path.strip_suffix(&self.declaration_ext).unwrap_or(path)
  }

  pub fn is_declaration_path(&self, path: &str) -> bool {
    path.ends_with(&self.declaration_ext)
  }

  /// Whether the path carries a recognized source, JSON, or resource
  /// extension (a declaration suffix on top is allowed).
  pub fn is_source_file(&self, path: &str) -> bool {
    let path = self.chop_declaration_ext(path);
    self
      .module_file_exts
      .iter()
      .chain(self.json_exts.iter())
      .chain(self.resource_exts.iter())
      .any(|ext| path.ends_with(ext.as_str()))
  }

  pub fn is_ignored(&self, path: &str) -> bool {
    self.ignores.iter().any(|re| re.is_match(path))
  }

  pub fn is_within_root(&self, path: &str) -> bool {
    in_prefix(&self.root, path)
  }

  pub fn is_included(&self, path: &str) -> bool {
    self.includes.iter().any(|prefix| in_prefix(prefix, path))
  }

  /// Path relative to the project root, for user-facing messages.
  pub fn relative_to_root<'a>(&self, path: &'a str) -> &'a str {
    if self.root == "/" {
      return path.strip_prefix('/').unwrap_or(path);
    }
    match path.strip_prefix(self.root.as_str()) {
      Some(rest) => rest.strip_prefix('/').unwrap_or(rest),
      None => path,
    }
  }

  /// Classify a resolved on-disk path into a [`FileKey`].
  pub fn file_key_of_path(&self, path: &str) -> FileKey {
    if self.json_exts.iter().any(|ext| path.ends_with(ext.as_str())) {
      FileKey::json(path)
    } else if self
      .resource_exts
      .iter()
      .any(|ext| path.ends_with(ext.as_str()))
    {
      FileKey::resource(path)
    } else {
      FileKey::source(path)
    }
  }

  /// The file key a resolution hit is known by: declaration suffix chopped,
  /// then classified.
  pub fn eponymous_key(&self, path: &str) -> FileKey {
    self.file_key_of_path(self.chop_declaration_ext(&paths::normalize(path)))
  }
}

fn in_prefix(prefix: &str, path: &str) -> bool {
  if prefix == "/" {
    return path.starts_with('/');
  }
  match path.strip_prefix(prefix) {
    Some("") => true,
    Some(rest) => rest.starts_with('/'),
    None => false,
  }
}
