use heaps_js::PackageManifest;

/// Whether dependents of a package must be rechecked after its manifest was
/// re-observed.
///
/// | old      | new    | incompatible |
/// |----------|--------|--------------|
/// | none     | Ok     | yes          |
/// | none     | Err    | no           |
/// | Err      | Ok     | yes          |
/// | Err      | Err    | no           |
/// | Ok(a)    | Ok(b)  | a != b       |
/// | Ok       | Err    | yes          |
///
/// A manifest that was broken and stays broken changes nothing for
/// dependents; they resolved against the empty manifest both times.
pub fn package_incompatible(
  old: Option<&Result<PackageManifest, ()>>,
  new: &Result<PackageManifest, ()>,
) -> bool {
  match (old, new) {
    (None, Ok(_)) => true,
    (None, Err(())) => false,
    (Some(Err(())), Ok(_)) => true,
    (Some(Err(())), Err(())) => false,
    (Some(Ok(a)), Ok(b)) => a != b,
    (Some(Ok(_)), Err(())) => true,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn manifest(main: &str) -> Result<PackageManifest, ()> {
    PackageManifest::parse(&format!(r#"{{"main": "{main}"}}"#))
  }

  #[test]
  fn covers_the_truth_table() {
    let a = manifest("a.js");
    let b = manifest("b.js");
    let broken: Result<PackageManifest, ()> = Err(());

    assert!(package_incompatible(None, &a));
    assert!(!package_incompatible(None, &broken));
    assert!(package_incompatible(Some(&broken), &a));
    assert!(!package_incompatible(Some(&broken), &broken));
    assert!(!package_incompatible(Some(&a), &a.clone()));
    assert!(package_incompatible(Some(&a), &b));
    assert!(package_incompatible(Some(&a), &broken));
  }
}
