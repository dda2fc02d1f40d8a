use crate::options::Options;
use ahash::AHashMap;
use std::sync::{Arc, Mutex};

/// Memoized expansion of a raw module reference into its rewritten
/// candidates: the raw reference first, then one entry per configured
/// mapper that matches and changes it, in mapper order.
///
/// The memo table is process-wide for a pass; entries are append-only and
/// dropped at the pass boundary together with the directory cache.
#[derive(Debug, Default)]
pub struct CandidateCache {
  memo: Mutex<AHashMap<String, Arc<Vec<String>>>>,
}

impl CandidateCache {
  pub fn new() -> CandidateCache {
    CandidateCache::default()
  }

  pub fn clear(&self) {
    self.memo.lock().unwrap().clear();
  }

  pub fn module_name_candidates(&self, options: &Options, reference: &str) -> Arc<Vec<String>> {
    {
      let memo = self.memo.lock().unwrap();
      if let Some(candidates) = memo.get(reference) {
        return Arc::clone(candidates);
      }
    }

    let mut candidates = vec![reference.to_string()];
    for mapper in &options.module_name_mappers {
      if let Some(rewritten) = mapper.rewrite(reference, &options.root) {
        candidates.push(rewritten);
      }
    }
    let candidates = Arc::new(candidates);

    let mut memo = self.memo.lock().unwrap();
    memo.insert(reference.to_string(), Arc::clone(&candidates));
    candidates
  }
}
