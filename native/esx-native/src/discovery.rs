//! Source discovery.
//!
//! Recursively scans a directory for JS/TS units that may contain markup.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "ts", "tsx"];

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| name == "node_modules" || name.starts_with('.'))
            .unwrap_or(false)
}

fn is_source_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if name.ends_with(".d.ts") {
        return false;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Every source unit under `dir`, sorted by path. `node_modules` and hidden
/// directories are not entered.
pub fn discover_sources(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && is_source_file(entry.path()))
        .map(DirEntry::into_path)
        .collect();
    files.sort();
    files
}
