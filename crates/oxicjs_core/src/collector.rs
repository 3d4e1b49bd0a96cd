use anyhow::{Result, anyhow};
use ignore::WalkBuilder;
use log::{debug, trace};
use path_clean::clean;
use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use crate::{constants::JS_TS_EXTENSIONS, resolver::normalize_slashes};

pub struct CollectorConfig {
    pub root: PathBuf,
    /// Files or directories, relative to `root` unless absolute.
    pub targets: Vec<PathBuf>,
}

fn is_module_file(p: &Path) -> bool {
    p.extension().and_then(|e| e.to_str()).is_some_and(|ext| JS_TS_EXTENSIONS.contains(&ext))
}

/// Expands the dynamic-require targets into the set of normalized absolute
/// module paths that may be loaded through a runtime `require`.
pub fn collect_dynamic_modules(cfg: &CollectorConfig) -> Result<BTreeSet<String>> {
    debug!("Collecting dynamic require targets");
    let mut modules = BTreeSet::new();

    for target in &cfg.targets {
        let abs = clean(cfg.root.join(target));
        if abs.is_file() {
            trace!("Dynamic target file: {}", abs.display());
            modules.insert(normalize_slashes(&abs.to_string_lossy()));
            continue;
        }
        if !abs.is_dir() {
            return Err(anyhow!("Dynamic require target does not exist: {}", abs.display()));
        }

        debug!("Walking dynamic target directory: {}", abs.display());
        let walker = WalkBuilder::new(&abs).hidden(false).ignore(true).git_ignore(true).build();
        for res in walker {
            let dent = res?;
            let p = dent.path();
            if p.is_file() && is_module_file(p) {
                trace!("Found dynamic module: {}", p.display());
                modules.insert(normalize_slashes(&p.to_string_lossy()));
            }
        }
    }

    debug!("Collected {} dynamic modules", modules.len());
    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, path: &str) -> String {
        let file_path = dir.join(path);
        fs::create_dir_all(file_path.parent().unwrap()).unwrap();
        fs::write(&file_path, "").unwrap();
        file_path.to_string_lossy().to_string()
    }

    #[test]
    fn test_collects_files_and_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let a = touch(root, "lib/a.js");
        let data = touch(root, "lib/nested/data.json");
        touch(root, "lib/readme.md");
        let single = touch(root, "single.cjs");

        let cfg = CollectorConfig {
            root: root.to_path_buf(),
            targets: vec![PathBuf::from("lib"), PathBuf::from("./single.cjs")],
        };
        let modules = collect_dynamic_modules(&cfg).unwrap();
        assert_eq!(modules.len(), 3);
        assert!(modules.contains(&a));
        assert!(modules.contains(&data));
        assert!(modules.contains(&single));
    }

    #[test]
    fn test_missing_target_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let cfg = CollectorConfig {
            root: temp_dir.path().to_path_buf(),
            targets: vec![PathBuf::from("nope")],
        };
        assert!(collect_dynamic_modules(&cfg).is_err());
    }
}
