#![cfg(unix)]

use heaps_js::{FileKey, ModuleHeaps, ModuleName};
use modules_js::{
  ExternalResolver, FatalError, MemoryFs, ModuleEnv, ModuleSystemKind, Options, ResolutionAcc,
};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write a tiny shell resolver that answers every request with the same
/// scripted line.
fn scripted_resolver(dir: &TempDir, response_line: &str) -> PathBuf {
  scripted_resolver_body(
    dir,
    &format!("while read -r _; do echo '{response_line}'; done"),
  )
}

fn scripted_resolver_body(dir: &TempDir, body: &str) -> PathBuf {
  let path = dir.path().join("resolver.sh");
  std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
  let mut permissions = std::fs::metadata(&path).unwrap().permissions();
  permissions.set_mode(0o755);
  std::fs::set_permissions(&path, permissions).unwrap();
  path
}

fn ask(program: PathBuf) -> Result<Option<String>, FatalError> {
  let resolver = ExternalResolver::new(program);
  resolver.resolve("widgets", &FileKey::source("/r/app.js"))
}

#[test]
fn a_null_response_is_no_opinion() {
  let dir = TempDir::new().unwrap();
  let answer = ask(scripted_resolver(&dir, "null")).unwrap();
  assert_eq!(answer, None);
}

#[test]
fn a_successful_resolution_is_a_path() {
  let dir = TempDir::new().unwrap();
  let answer = ask(scripted_resolver(&dir, r#"[null, "/r/ext/widgets.js"]"#)).unwrap();
  assert_eq!(answer.as_deref(), Some("/r/ext/widgets.js"));
}

#[test]
fn a_reported_failure_discards_the_result() {
  let dir = TempDir::new().unwrap();
  let answer = ask(scripted_resolver(&dir, r#"["boom", "/r/ext/widgets.js"]"#)).unwrap();
  assert_eq!(answer, None);
}

#[test]
fn an_unresolved_answer_falls_through() {
  let dir = TempDir::new().unwrap();
  let answer = ask(scripted_resolver(&dir, "[null, null]")).unwrap();
  assert_eq!(answer, None);
}

#[test]
fn malformed_shapes_are_fatal() {
  let dir = TempDir::new().unwrap();
  let err = ask(scripted_resolver(&dir, r#"{"weird": true}"#)).unwrap_err();
  assert!(matches!(err, FatalError::InvalidResolution));

  let err = ask(scripted_resolver(&dir, "not json at all")).unwrap_err();
  assert!(matches!(err, FatalError::InvalidResolution));

  let err = ask(scripted_resolver(&dir, r#"[null, 42]"#)).unwrap_err();
  assert!(matches!(err, FatalError::InvalidResolution));
}

#[test]
fn a_dead_resolver_is_fatal() {
  let dir = TempDir::new().unwrap();
  let err = ask(scripted_resolver_body(&dir, "exit 0")).unwrap_err();
  assert!(matches!(err, FatalError::ExternalResolver(_)));
}

#[test]
fn requests_are_serialized_line_delimited_json() {
  let dir = TempDir::new().unwrap();
  // Echo the request back as the resolution error so the test can see what
  // was sent; the shape makes the caller fall through.
  let program = scripted_resolver_body(
    &dir,
    r#"while read -r line; do echo "[$line, null]"; done"#,
  );
  let resolver = ExternalResolver::new(program);
  let answer = resolver
    .resolve("widgets", &FileKey::source("/r/app.js"))
    .unwrap();
  assert_eq!(answer, None);
}

#[test]
fn the_flat_system_consults_the_resolver_first() {
  let dir = TempDir::new().unwrap();
  let program = scripted_resolver(&dir, r#"[null, "/r/ext/widgets.js"]"#);
  let options = Options {
    module_system: ModuleSystemKind::Flat,
    module_resolver: Some(program),
    root: "/r".to_string(),
    ..Options::default()
  };
  let env = ModuleEnv::with_fs(options, MemoryFs::new());
  let heaps = ModuleHeaps::new();
  let mut acc = ResolutionAcc::new();
  let module = env
    .imported_module(&heaps, &FileKey::source("/r/app.js"), "widgets", &mut acc)
    .unwrap();
  assert_eq!(module, ModuleName::file(FileKey::source("/r/ext/widgets.js")));
}

#[test]
fn ignored_resolver_results_fall_through_to_builtin_resolution() {
  let dir = TempDir::new().unwrap();
  let program = scripted_resolver(&dir, r#"[null, "/r/ext/widgets.js"]"#);
  let options = Options {
    module_system: ModuleSystemKind::Flat,
    module_resolver: Some(program),
    root: "/r".to_string(),
    ignores: vec![regex::Regex::new("/r/ext/").unwrap()],
    ..Options::default()
  };
  let env = ModuleEnv::with_fs(options, MemoryFs::new());
  let heaps = ModuleHeaps::new();
  let mut acc = ResolutionAcc::new();
  let module = env
    .imported_module(&heaps, &FileKey::source("/r/app.js"), "widgets", &mut acc)
    .unwrap();
  assert_eq!(module, ModuleName::string("widgets"));
}
