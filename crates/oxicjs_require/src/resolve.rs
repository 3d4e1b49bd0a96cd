use anyhow::{Result, anyhow};
use log::{debug, trace};
use oxicjs_core::{ResolvedId, Resolver, VirtualId, is_path_like, resolve_id};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::types::ResolvedSource;

/// Batch resolution of the raw specifiers required by one module.
///
/// The result holds one entry per requested specifier; any entry that cannot
/// be resolved fails the whole batch.
pub trait ResolveSources {
    fn resolve_sources(&self, importer: &str, sources: &[String]) -> Result<Vec<ResolvedSource>>;
}

/// Node-style package resolution from a base directory.
pub trait ResolveSync {
    fn resolve_sync(&self, specifier: &str, basedir: &Path) -> Result<PathBuf>;
}

/// Resolves against the files of one project, fanning batches out over rayon.
pub struct ProjectResolver {
    inner: Resolver,
}

impl ProjectResolver {
    pub fn new(inner: Resolver) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Resolver {
        &self.inner
    }

    fn resolve_one(&self, importer: &str, source: &str) -> Result<ResolvedSource> {
        match resolve_id(source, Some(importer), &self.inner)? {
            Some(ResolvedId { id, external }) => {
                trace!("Resolved '{}' from {} to {}", source, importer, id.escape_debug());
                Ok(ResolvedSource { source: source.to_string(), id, external })
            }
            // Bare specifiers nobody provides are left to the runtime.
            None if !is_path_like(source) && !source.starts_with('.') => {
                debug!("Treating '{}' as external", source);
                Ok(ResolvedSource {
                    source: source.to_string(),
                    id: VirtualId::External(source.to_string()).to_string(),
                    external: true,
                })
            }
            None => Err(anyhow!("Could not resolve '{}' from {}", source, importer)),
        }
    }
}

impl ResolveSources for ProjectResolver {
    fn resolve_sources(&self, importer: &str, sources: &[String]) -> Result<Vec<ResolvedSource>> {
        sources.par_iter().map(|source| self.resolve_one(importer, source)).collect()
    }
}

impl ResolveSync for ProjectResolver {
    fn resolve_sync(&self, specifier: &str, basedir: &Path) -> Result<PathBuf> {
        self.inner.resolve_sync(specifier, basedir)
    }
}

impl ResolveSync for Resolver {
    fn resolve_sync(&self, specifier: &str, basedir: &Path) -> Result<PathBuf> {
        Resolver::resolve_sync(self, specifier, basedir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashMap, fs};
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str) -> PathBuf {
        let file_path = dir.join(path);
        fs::create_dir_all(file_path.parent().unwrap()).unwrap();
        fs::write(&file_path, "").unwrap();
        file_path
    }

    fn fixture() -> (TempDir, ProjectResolver, String) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();
        let main = create_test_file(&root, "src/main.js");
        create_test_file(&root, "src/a.js");
        create_test_file(&root, "src/b/index.js");
        create_test_file(&root, "node_modules/pkg/index.js");
        let resolver = ProjectResolver::new(Resolver::new(root, HashMap::new()));
        (temp_dir, resolver, main.to_string_lossy().to_string())
    }

    #[test]
    fn test_batch_keeps_request_order() {
        let (dir, resolver, main) = fixture();
        let sources = vec!["./b".to_string(), "pkg".to_string(), "./a".to_string()];
        let resolved = resolver.resolve_sources(&main, &sources).unwrap();

        let got: Vec<&str> = resolved.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(got, vec!["./b", "pkg", "./a"]);
        assert!(resolved[0].id.ends_with("src/b/index.js"));
        assert!(resolved[1].id.ends_with("node_modules/pkg/index.js"));
        assert!(resolved[2].id.starts_with(&*dir.path().to_string_lossy()));
        assert!(resolved.iter().all(|r| !r.external));
    }

    #[test]
    fn test_unknown_bare_specifier_is_external() {
        let (_dir, resolver, main) = fixture();
        let resolved = resolver.resolve_sources(&main, &["fs".to_string()]).unwrap();
        assert_eq!(resolved[0].id, "\0fs?commonjs-external");
        assert!(resolved[0].external);
    }

    #[test]
    fn test_missing_relative_fails_batch() {
        let (_dir, resolver, main) = fixture();
        let sources = vec!["./a".to_string(), "./missing".to_string()];
        let err = resolver.resolve_sources(&main, &sources).unwrap_err();
        assert!(err.to_string().contains("./missing"));
    }
}
