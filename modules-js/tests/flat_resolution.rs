use heaps_js::{Docblock, FileKey, ModuleHeaps, ModuleName, PackageManifest};
use modules_js::{
  compile_path_regex, MemoryFs, ModuleEnv, ModuleSystemKind, NameMapper, Options, ResolutionAcc,
};

fn flat_options() -> Options {
  Options {
    module_system: ModuleSystemKind::Flat,
    root: "/r".to_string(),
    ..Options::default()
  }
}

fn env_with(files: &[&str], options: Options) -> ModuleEnv {
  let mut fs = MemoryFs::new();
  for file in files {
    fs.insert(file);
  }
  ModuleEnv::with_fs(options, fs)
}

fn resolve(
  env: &ModuleEnv,
  heaps: &ModuleHeaps,
  importer: &str,
  reference: &str,
) -> (ModuleName, ResolutionAcc) {
  let mut acc = ResolutionAcc::new();
  let module = env
    .imported_module(heaps, &FileKey::source(importer), reference, &mut acc)
    .expect("no external resolver configured");
  (module, acc)
}

#[test]
fn relative_imports_resolve_through_the_builtin_walk() {
  let env = env_with(&["/r/a.js", "/r/b.js"], flat_options());
  let heaps = ModuleHeaps::new();
  let (module, acc) = resolve(&env, &heaps, "/r/b.js", "./a");
  assert_eq!(module, ModuleName::file(FileKey::source("/r/a.js")));
  assert!(acc.paths.is_empty());
}

#[test]
fn unresolved_bare_references_stay_valid_module_identities() {
  let env = env_with(&["/r/b.js"], flat_options());
  let heaps = ModuleHeaps::new();
  let (module, acc) = resolve(&env, &heaps, "/r/b.js", "Foo");
  assert_eq!(module, ModuleName::string("Foo"));
  assert!(acc.errors.is_empty());
}

#[test]
fn the_first_candidate_is_chosen_before_any_disk_check() {
  // The mapped candidate points at a real file, but Flat commits to the
  // first candidate of the reference rather than the first that resolves.
  let root = "/r";
  let options = Options {
    module_name_mappers: vec![
      NameMapper::new("^app$", "<<PROJECT_ROOT>>/src/app", root).unwrap(),
    ],
    ..flat_options()
  };
  let env = env_with(&["/r/src/app.js", "/r/b.js"], options);
  let heaps = ModuleHeaps::new();
  let (module, _) = resolve(&env, &heaps, "/r/b.js", "app");
  assert_eq!(module, ModuleName::string("app"));
}

#[test]
fn package_relative_references_expand_through_the_manifest_heap() {
  let env = env_with(
    &["/r/node_modules/widgets/lib/button.js", "/r/app.js"],
    flat_options(),
  );
  let mut heaps = ModuleHeaps::new();
  heaps.manifests.add_package_json(
    "/r/node_modules/widgets/package.json",
    PackageManifest::parse(r#"{"name": "widgets"}"#),
  );
  let (module, _) = resolve(&env, &heaps, "/r/app.js", "widgets/lib/button");
  assert_eq!(
    module,
    ModuleName::file(FileKey::source("/r/node_modules/widgets/lib/button.js"))
  );
}

#[test]
fn mocks_export_their_short_name() {
  let env = env_with(&["/r/__mocks__/Foo.js"], flat_options());
  let file = FileKey::source("/r/__mocks__/Foo.js");
  let module = env.exported_module(&file, &Docblock::default());
  assert_eq!(module, ModuleName::string("Foo"));
}

#[test]
fn mocks_ignore_their_docblock_name() {
  let env = env_with(&["/r/__mocks__/Foo.js"], flat_options());
  let file = FileKey::source("/r/__mocks__/Foo.js");
  let docblock = Docblock::new(Some("Other".to_string()), true, false);
  assert_eq!(
    env.exported_module(&file, &docblock),
    ModuleName::string("Foo")
  );
}

#[test]
fn docblock_directives_name_the_module() {
  let env = env_with(&["/r/x.js"], flat_options());
  let file = FileKey::source("/r/x.js");
  let docblock = Docblock::new(Some("Foo".to_string()), true, false);
  assert_eq!(env.exported_module(&file, &docblock), ModuleName::string("Foo"));
}

#[test]
fn undirected_files_are_eponymous() {
  let env = env_with(&["/r/x.js"], flat_options());
  let file = FileKey::source("/r/x.js");
  assert_eq!(
    env.exported_module(&file, &Docblock::default()),
    ModuleName::file(file.clone())
  );
}

#[test]
fn declaration_files_export_the_shadowed_name() {
  let env = env_with(&["/r/a.js.decl"], flat_options());
  let file = FileKey::source("/r/a.js.decl");
  assert_eq!(
    env.exported_module(&file, &Docblock::default()),
    ModuleName::file(FileKey::source("/r/a.js"))
  );
}

#[test]
fn name_reducers_rewrite_allowed_paths() {
  let root = "/r";
  let options = Options {
    flat_use_name_reducers: true,
    flat_name_reducers: vec![
      NameMapper::new(r"^<<PROJECT_ROOT>>/src/(.*)\.js$", "$1", root).unwrap(),
    ],
    flat_paths_allowed: vec![compile_path_regex("^<<PROJECT_ROOT>>/src/.*$", root).unwrap()],
    flat_paths_blocked: vec![
      compile_path_regex("^<<PROJECT_ROOT>>/src/vendor/.*$", root).unwrap(),
    ],
    ..flat_options()
  };
  let env = env_with(&[], options);

  let reduced = FileKey::source("/r/src/ui/Button.js");
  assert_eq!(
    env.exported_module(&reduced, &Docblock::default()),
    ModuleName::string("ui/Button")
  );

  // Blocked paths keep their ordinary naming.
  let blocked = FileKey::source("/r/src/vendor/lib.js");
  assert_eq!(
    env.exported_module(&blocked, &Docblock::default()),
    ModuleName::file(blocked.clone())
  );
}

#[test]
fn lib_and_json_files_are_always_eponymous() {
  let env = env_with(&[], flat_options());
  let lib = FileKey::lib("/libs/core.js");
  let docblock = Docblock::new(Some("Ignored".to_string()), false, true);
  assert_eq!(env.exported_module(&lib, &docblock), ModuleName::file(lib.clone()));

  let json = FileKey::json("/r/data.json");
  assert_eq!(
    env.exported_module(&json, &Docblock::default()),
    ModuleName::file(json.clone())
  );
}
