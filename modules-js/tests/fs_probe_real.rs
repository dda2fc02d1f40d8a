#![cfg(unix)]

use modules_js::{FsProbe, RealFs};
use tempfile::TempDir;

fn touch(dir: &TempDir, name: &str) -> String {
  let path = dir.path().join(name);
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(&path, b"").unwrap();
  path.to_string_lossy().into_owned()
}

#[test]
fn the_real_probe_sees_real_files() {
  let dir = TempDir::new().unwrap();
  let file = touch(&dir, "App.js");
  let probe = FsProbe::new(RealFs);
  assert!(probe.file_exists(&file));
  assert!(!probe.file_exists(&format!("{file}.missing")));
  assert!(probe.dir_exists(&dir.path().to_string_lossy()));
  assert!(!probe.dir_exists(&file));
}

#[test]
fn forced_case_insensitive_mode_lists_the_parent_directory() {
  let dir = TempDir::new().unwrap();
  let file = touch(&dir, "App.js");
  let probe = FsProbe::with_case_sensitivity(RealFs, false);
  assert!(probe.file_exists(&file));
  // Exact-case membership: a wrong-case basename misses even where the OS
  // would happily open it.
  let wrong_case = dir.path().join("app.js");
  assert!(!probe.file_exists(&wrong_case.to_string_lossy()));
}

#[test]
fn stale_listings_survive_until_cleared() {
  let dir = TempDir::new().unwrap();
  touch(&dir, "first.js");
  let probe = FsProbe::with_case_sensitivity(RealFs, false);
  let late = dir.path().join("late.js");
  let late_str = late.to_string_lossy().into_owned();

  assert!(!probe.file_exists(&late_str));
  std::fs::write(&late, b"").unwrap();
  assert!(!probe.file_exists(&late_str));
  probe.clear();
  assert!(probe.file_exists(&late_str));
}

#[test]
fn symlinks_normalize_to_their_target() {
  let dir = TempDir::new().unwrap();
  let target = touch(&dir, "real/target.js");
  let link = dir.path().join("link.js");
  std::os::unix::fs::symlink(&target, &link).unwrap();

  let probe = FsProbe::new(RealFs);
  let via_link = probe.resolve_symlinks(&link.to_string_lossy()).unwrap();
  let direct = probe.resolve_symlinks(&target).unwrap();
  // The temp dir itself may sit behind symlinks, so compare resolved forms.
  assert_eq!(via_link, direct);
  assert_eq!(probe.resolve_symlinks("/definitely/not/here.js"), None);
}

#[test]
fn unreadable_directories_probe_as_empty() {
  let probe = FsProbe::with_case_sensitivity(RealFs, false);
  // A file used as a directory cannot be listed; membership checks under it
  // simply miss.
  let dir = TempDir::new().unwrap();
  let file = touch(&dir, "plain.js");
  assert!(!probe.file_exists(&format!("{file}/child.js")));
}
