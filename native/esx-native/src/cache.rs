use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

use crate::options::TransformOptions;
use crate::transform::TransformResult;
use crate::validate::CompilerError;

#[derive(Serialize, Deserialize)]
pub struct CacheEntry {
    pub hash: String,
    pub result: TransformResult,
}

/// On-disk cache of lowered units, one JSON file per source path.
pub struct TransformCache {
    cache_dir: PathBuf,
}

impl TransformCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self, CompilerError> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir).map_err(|e| {
            CompilerError::io(
                &format!("Cannot create cache directory: {}", e),
                &cache_dir.to_string_lossy(),
            )
        })?;
        Ok(Self { cache_dir })
    }

    /// Hash over the options fingerprint and the source text.
    pub fn compute_hash(source: &str, options: &TransformOptions) -> String {
        let mut hasher = Sha256::new();
        hasher.update(options.fingerprint().as_bytes());
        hasher.update([0u8]);
        hasher.update(source.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn get_cache_path(&self, file_path: &str) -> PathBuf {
        let safe_name = file_path
            .replace("/", "_")
            .replace("\\", "_")
            .replace(":", "_");
        self.cache_dir.join(format!("{}.json", safe_name))
    }

    pub fn get(
        &self,
        file_path: &str,
        source: &str,
        options: &TransformOptions,
    ) -> Option<TransformResult> {
        let cache_path = self.get_cache_path(file_path);
        if !cache_path.exists() {
            return None;
        }

        let data = fs::read_to_string(&cache_path).ok()?;

        let entry: CacheEntry = match serde_json::from_str(&data) {
            Ok(e) => e,
            Err(e) => {
                eprintln!(
                    "[EsxNative] Cache deserialization failed for {}: {}",
                    file_path, e
                );
                fs::remove_file(cache_path).ok();
                return None;
            }
        };

        if entry.hash == Self::compute_hash(source, options) {
            Some(entry.result)
        } else {
            None
        }
    }

    pub fn set(
        &self,
        file_path: &str,
        source: &str,
        options: &TransformOptions,
        result: &TransformResult,
    ) {
        let cache_path = self.get_cache_path(file_path);
        let entry = CacheEntry {
            hash: Self::compute_hash(source, options),
            result: result.clone(),
        };

        if let Ok(data) = serde_json::to_string(&entry) {
            fs::write(cache_path, data).ok();
        }
    }
}
