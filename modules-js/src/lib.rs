//! Module resolution and provider election for a whole-program checker.
//!
//! Before inference can run, every textual import in every file has to be
//! turned into a concrete module identity, and for every module name claimed
//! by several files a single authoritative *provider* has to be elected.
//! This crate owns that machinery: the pluggable module systems (Path and
//! Flat), the per-file import driver, provider election, and the incremental
//! commit that reconciles the persistent name index as files are added,
//! changed, and deleted. The heaps themselves live in `heaps-js`.
//!
//! # Example: resolving a relative import
//!
//! ```rust
//! use heaps_js::{FileKey, ModuleHeaps};
//! use modules_js::{MemoryFs, ModuleEnv, Options, ResolutionAcc};
//!
//! let mut fs = MemoryFs::new();
//! fs.insert("/proj/src/app.js");
//! fs.insert("/proj/src/util.js");
//!
//! let options = Options {
//!   root: "/proj".to_string(),
//!   ..Options::default()
//! };
//! let env = ModuleEnv::with_fs(options, fs);
//! let heaps = ModuleHeaps::new();
//!
//! let app = FileKey::source("/proj/src/app.js");
//! let mut acc = ResolutionAcc::new();
//! let module = env.imported_module(&heaps, &app, "./util", &mut acc).unwrap();
//! assert_eq!(module.to_string(), "/proj/src/util.js");
//! assert!(acc.errors.is_empty());
//! ```
//!
//! A typical pass over a changed fileset runs [`ModuleEnv::clear_caches`],
//! [`retire_files`] for deletions, [`introduce_files`] for new and changed
//! files, [`resolve_requires_batch`] over every file whose imports may have
//! changed, and finally [`commit_modules`] with the dirty modules the first
//! two steps produced.

mod acc;
mod candidates;
mod commit;
mod driver;
mod election;
mod env;
mod error;
mod external;
mod fsprobe;
mod introduce;
mod manifest;
mod options;
mod paths;
mod system;

pub use acc::ResolutionAcc;
pub use candidates::CandidateCache;
pub use commit::{commit_modules, CommitOutcome};
pub use driver::{resolve_requires, resolve_requires_batch, BatchResolution, FileResolution};
pub use election::ProviderErrorMap;
pub use env::ModuleEnv;
pub use error::{FatalError, ModuleError};
pub use external::ExternalResolver;
pub use fsprobe::{FsProbe, MemoryFs, ProbeFs, RealFs};
pub use introduce::{introduce_files, retire_files, DirtyModules};
pub use manifest::package_incompatible;
pub use options::{
  compile_path_regex, ModuleSystemKind, NameMapper, Options, PROJECT_ROOT_TOKEN,
};
