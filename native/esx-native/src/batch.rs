//! Parallel lowering of many units.
//!
//! Units are independent; each one gets its own reference counter and its
//! own support module decision. Results come back in input order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::cache::TransformCache;
use crate::discovery::discover_sources;
use crate::options::TransformOptions;
use crate::transform::{transform_source, TransformResult};
use crate::validate::CompilerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceUnit {
    pub file_path: String,
    pub source: String,
}

#[derive(Debug)]
pub struct UnitOutcome {
    pub file_path: String,
    pub result: Result<TransformResult, CompilerError>,
}

pub fn transform_units(
    units: &[SourceUnit],
    options: &TransformOptions,
) -> Vec<Result<TransformResult, CompilerError>> {
    units
        .par_iter()
        .map(|unit| transform_source(&unit.source, &unit.file_path, options))
        .collect()
}

fn transform_cached(
    unit: &SourceUnit,
    options: &TransformOptions,
    cache: Option<&TransformCache>,
) -> Result<TransformResult, CompilerError> {
    if let Some(hit) = cache.and_then(|c| c.get(&unit.file_path, &unit.source, options)) {
        if options.debug {
            eprintln!("[EsxNative] {}: cache hit", unit.file_path);
        }
        return Ok(hit);
    }
    if options.debug && cache.is_some() {
        eprintln!("[EsxNative] {}: cache miss", unit.file_path);
    }
    let result = transform_source(&unit.source, &unit.file_path, options)?;
    if let Some(cache) = cache {
        cache.set(&unit.file_path, &unit.source, options, &result);
    }
    Ok(result)
}

/// Discovers and lowers every unit under `root`. A unit that fails to read
/// or lower reports its own error; the others are unaffected.
pub fn transform_directory(
    root: &Path,
    options: &TransformOptions,
    cache: Option<&TransformCache>,
) -> Result<Vec<UnitOutcome>, CompilerError> {
    options.validate()?;

    let files = discover_sources(root);
    if options.debug {
        eprintln!(
            "[EsxNative] Found {} source unit(s) under {}",
            files.len(),
            root.display()
        );
    }

    let outcomes = files
        .par_iter()
        .map(|path| {
            let file_path = path.to_string_lossy().to_string();
            let result = fs::read_to_string(path)
                .map_err(|e| CompilerError::io(&format!("Failed to read file: {}", e), &file_path))
                .and_then(|source| {
                    let unit = SourceUnit {
                        file_path: file_path.clone(),
                        source,
                    };
                    transform_cached(&unit, options, cache)
                });
            if options.debug {
                if let Err(e) = &result {
                    eprintln!("[EsxNative] Failed to lower {}: {}", file_path, e);
                }
            }
            UnitOutcome { file_path, result }
        })
        .collect();
    Ok(outcomes)
}
