//! A process-local, populate-once cache mapping a keypair file path to the
//! `Keypair` loaded from it. Never evicts, the same way `bridge-routes`'
//! route-adapter cache treats a built adapter as immutable once inserted.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use solana_keypair::Keypair;

use crate::error::SvmEngineError;

#[derive(Default)]
pub struct KeypairCache {
    by_path: DashMap<PathBuf, Arc<Keypair>>,
}

impl KeypairCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached keypair for `path`, loading and inserting it on
    /// first use. Concurrent misses for the same path are fine: whichever
    /// insert wins, `DashMap::entry` makes every caller observe the same
    /// final value.
    pub fn load(&self, path: &Path) -> Result<Arc<Keypair>, SvmEngineError> {
        if let Some(existing) = self.by_path.get(path) {
            return Ok(Arc::clone(&existing));
        }
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SvmEngineError::Base58(format!("failed to read keypair file {}: {e}", path.display()))
        })?;
        let bytes: Vec<u8> = serde_json::from_str(&raw)
            .map_err(|e| SvmEngineError::Base58(format!("invalid keypair JSON: {e}")))?;
        let keypair = Keypair::from_bytes(&bytes)
            .map_err(|e| SvmEngineError::Base58(format!("invalid keypair bytes: {e}")))?;
        let entry = self
            .by_path
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(keypair));
        Ok(Arc::clone(&entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_and_caches_by_path() {
        let keypair = Keypair::new();
        let bytes = keypair.to_bytes().to_vec();
        let json = serde_json::to_string(&bytes).unwrap();
        let mut file = tempfile_for_test(&json);

        let cache = KeypairCache::new();
        let first = cache.load(file.as_path()).unwrap();
        let second = cache.load(file.as_path()).unwrap();
        assert_eq!(first.pubkey(), second.pubkey());
        assert!(Arc::ptr_eq(&first, &second));

        drop_tempfile(&mut file);
    }

    use solana_signer::Signer;

    // Minimal scratch-file helpers so this test doesn't pull in a tempfile
    // dependency just for one unit test.
    struct ScratchFile(PathBuf);
    impl ScratchFile {
        fn as_path(&self) -> &Path {
            &self.0
        }
    }

    fn tempfile_for_test(contents: &str) -> ScratchFile {
        let path = std::env::temp_dir().join(format!(
            "bridge-engine-svm-test-{}-{}.json",
            std::process::id(),
            contents.len()
        ));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        ScratchFile(path)
    }

    fn drop_tempfile(file: &mut ScratchFile) {
        let _ = std::fs::remove_file(&file.0);
    }
}
