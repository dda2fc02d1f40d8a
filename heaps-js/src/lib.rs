//! Shared heaps for the whole-program module graph.
//!
//! Workers persist three kinds of per-file information across a typecheck
//! pass: which module a file exports ([`FileInfo`]), which files claim a
//! given module name ([`AllProvidersIndex`]), and which single file is the
//! currently elected provider for each name ([`NameIndex`]). A fourth heap
//! records each file's resolved imports ([`ResolvedRequiresHeap`]) and a
//! fifth caches parsed package manifests ([`PackageManifestHeap`]).
//!
//! The heaps themselves are plain in-memory maps. All mutation during a
//! commit batch goes through the mutator handles in [`mutator`], which scope
//! writes to a single batch and keep the write surface narrow; readers use
//! the inherent accessors directly.

mod docblock;
mod file_key;
mod info;
mod manifest;
mod module_name;
pub mod mutator;
mod providers;
mod requires;

pub use docblock::Docblock;
pub use file_key::FileKey;
pub use info::{FileInfo, InfoHeap};
pub use manifest::{PackageManifest, PackageManifestHeap};
pub use module_name::ModuleName;
pub use providers::{AllProvidersIndex, NameIndex};
pub use requires::{ResolvedRequires, ResolvedRequiresHeap};

/// The full set of module-graph heaps owned by a checker instance.
///
/// Batch phases hand workers shared references for reads; the single-threaded
/// commit step takes the whole struct mutably and drives writes through the
/// mutators in [`mutator`].
#[derive(Debug, Default)]
pub struct ModuleHeaps {
  pub info: InfoHeap,
  pub all_providers: AllProvidersIndex,
  pub names: NameIndex,
  pub requires: ResolvedRequiresHeap,
  pub manifests: PackageManifestHeap,
}

impl ModuleHeaps {
  pub fn new() -> ModuleHeaps {
    ModuleHeaps::default()
  }
}
