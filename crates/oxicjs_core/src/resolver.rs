use anyhow::{Result, anyhow};
use dashmap::DashMap;
use log::{debug, trace};
use path_clean::clean;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::constants::{INDEX_FILES, REQUIRE_CONDITIONS, RESOLVE_EXTENSIONS};

/// Replaces Windows separators so paths compare equal across platforms.
pub fn normalize_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// True for `./x`, `../x`, `/x`, `.\x` and drive-rooted `C:\x` specifiers.
pub fn is_path_like(specifier: &str) -> bool {
    let bytes = specifier.as_bytes();
    let is_sep = |b: u8| b == b'/' || b == b'\\';

    let dots = bytes.iter().take_while(|&&b| b == b'.').count();
    if dots <= 2 && bytes.get(dots).copied().is_some_and(is_sep) {
        return true;
    }

    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && is_sep(bytes[2])
}

/// Module resolver for CommonJS requests: relative paths, tsconfig path
/// aliases and `node_modules` packages. Results are memoised per
/// `(importing directory, request)`.
pub struct Resolver {
    root: PathBuf,
    tsconfig_paths: HashMap<String, Vec<String>>,
    extensions: Vec<String>,
    cache: DashMap<(PathBuf, String), Option<PathBuf>>,
}

impl Resolver {
    pub fn new(root: PathBuf, tsconfig_paths: HashMap<String, Vec<String>>) -> Self {
        Self {
            root,
            tsconfig_paths,
            extensions: RESOLVE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            cache: DashMap::new(),
        }
    }

    /// Overrides the extension probe order. Extensions carry their dot.
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Resolves `request` as seen from `from_file`.
    pub fn resolve(&self, from_file: &Path, request: &str) -> Option<PathBuf> {
        let basedir = from_file.parent().unwrap_or(&self.root);
        self.resolve_from_dir(request, basedir)
    }

    /// Resolves `request` relative to `basedir`, failing when nothing matches.
    pub fn resolve_sync(&self, request: &str, basedir: &Path) -> Result<PathBuf> {
        self.resolve_from_dir(request, basedir).ok_or_else(|| {
            anyhow!("Cannot find module '{}' from '{}'", request, basedir.display())
        })
    }

    fn resolve_from_dir(&self, request: &str, basedir: &Path) -> Option<PathBuf> {
        let key = (basedir.to_path_buf(), request.to_string());
        if let Some(v) = self.cache.get(&key) {
            trace!("Cache hit for resolve: '{}' from {}", request, basedir.display());
            return v.clone();
        }
        trace!("Resolving: '{}' from {}", request, basedir.display());

        let resolved = if is_path_like(request) {
            let p = clean(basedir.join(request).to_string_lossy().to_string());
            let result = self.resolve_file(&p);
            if result.is_none() {
                trace!("Failed to resolve relative request '{}'", request);
            }
            result
        } else if let Some(aliased) = self.resolve_alias(request) {
            Some(aliased)
        } else {
            trace!("Resolving as node_modules package: '{}'", request);
            self.resolve_node_module_from_dir(basedir, request)
        };

        self.cache.insert(key, resolved.clone());
        if let Some(path) = &resolved {
            debug!("Resolved '{}' from {} to {}", request, basedir.display(), path.display());
        }
        resolved
    }

    fn resolve_alias(&self, request: &str) -> Option<PathBuf> {
        for (alias, targets) in &self.tsconfig_paths {
            let Some(remainder) = request.strip_prefix(alias.as_str()) else {
                continue;
            };
            if !remainder.is_empty() && !remainder.starts_with('/') {
                continue;
            }
            trace!("Matched alias '{}' for request '{}'", alias, request);
            let remainder = remainder.trim_start_matches('/');
            for target in targets {
                let candidate = if remainder.is_empty() {
                    PathBuf::from(target)
                } else {
                    PathBuf::from(target).join(remainder)
                };
                if let Some(resolved) = self.resolve_file(&candidate) {
                    return Some(resolved);
                }
            }
        }
        None
    }

    fn resolve_file(&self, p: &Path) -> Option<PathBuf> {
        if p.is_file() {
            return Some(p.to_path_buf());
        }

        for ext in &self.extensions {
            let candidate = PathBuf::from(format!("{}{}", p.display(), ext));
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if p.is_dir() {
            if let Some(main) = self.resolve_package_main(p) {
                return Some(main);
            }
            for index_file in INDEX_FILES {
                let candidate = p.join(index_file);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }

        None
    }

    fn resolve_node_module_from_dir(&self, start_dir: &Path, pkg: &str) -> Option<PathBuf> {
        let mut current_dir = Some(start_dir);
        while let Some(dir) = current_dir {
            let candidate = dir.join("node_modules").join(pkg);
            if let Some(resolved) = self.resolve_file(&candidate) {
                return Some(resolved);
            }
            current_dir = dir.parent();
        }
        None
    }

    /// Entry point of a package directory under `require` semantics:
    /// `exports["."]` (or a string `exports`), then `main`.
    fn resolve_package_main(&self, dir: &Path) -> Option<PathBuf> {
        let txt = fs::read_to_string(dir.join("package.json")).ok()?;
        let manifest = serde_json::from_str::<serde_json::Value>(&txt).ok()?;

        let mut entries: Vec<&str> = Vec::new();
        if let Some(exports) = manifest.get("exports") {
            let dot = exports.as_object().and_then(|o| o.get(".")).unwrap_or(exports);
            if let Some(s) = dot.as_str() {
                entries.push(s);
            } else if let Some(conditions) = dot.as_object() {
                entries.extend(
                    REQUIRE_CONDITIONS
                        .iter()
                        .filter_map(|key| conditions.get(*key).and_then(|x| x.as_str())),
                );
            }
        }
        if let Some(main) = manifest.get("main").and_then(|x| x.as_str()) {
            entries.push(main);
        }

        entries.into_iter().find_map(|entry| {
            let p = PathBuf::from(clean(dir.join(entry).to_string_lossy().to_string()));
            if p == dir { None } else { self.resolve_file(&p) }
        })
    }
}

/// Extension fallback for relative requests the resolver missed: tries
/// `resolved`, then `resolved + ext` and `resolved/index + ext` per extension.
pub fn resolve_extensions(
    importee: &str,
    importer: Option<&Path>,
    extensions: &[String],
) -> Option<PathBuf> {
    let importer = importer?;
    if !importee.starts_with('.') {
        return None;
    }

    let base = importer.parent().unwrap_or(Path::new("."));
    let resolved = clean(base.join(importee).to_string_lossy().to_string());

    let mut candidates = vec![resolved.clone()];
    for ext in extensions {
        candidates.push(PathBuf::from(format!("{}{}", resolved.display(), ext)));
        candidates.push(resolved.join(format!("index{}", ext)));
    }

    candidates.into_iter().find(|c| c.is_file())
}
