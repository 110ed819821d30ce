use std::path::Path;

use esx_native::{transform_directory, transform_source, TransformCache, TransformOptions};

/// Usage: `lower <file-or-dir> [options-json]`
fn main() {
    let mut args = std::env::args().skip(1);
    let Some(target) = args.next() else {
        eprintln!("usage: lower <file-or-dir> [options-json]");
        std::process::exit(2);
    };

    let options = match args.next() {
        Some(json) => match TransformOptions::from_json(&json) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(2);
            }
        },
        None => TransformOptions::default(),
    };

    let path = Path::new(&target);
    if path.is_dir() {
        let cache = TransformCache::new(path.join(".esx-cache")).ok();
        match transform_directory(path, &options, cache.as_ref()) {
            Ok(outcomes) => {
                for outcome in outcomes {
                    match outcome.result {
                        Ok(result) => println!(
                            "{}: {} reference(s)",
                            outcome.file_path,
                            result.references.len()
                        ),
                        Err(e) => eprintln!("{}", e),
                    }
                }
            }
            Err(e) => eprintln!("{}", e),
        }
        return;
    }

    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read {}: {}", target, e);
            std::process::exit(1);
        }
    };
    match transform_source(&source, &target, &options) {
        Ok(result) => print!("{}", result.code),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
