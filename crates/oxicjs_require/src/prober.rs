use log::trace;
use oxicjs_core::{PROBE_EXTENSIONS, is_path_like, normalize_slashes};
use path_clean::clean;
use std::{collections::BTreeSet, path::Path};

use crate::resolve::ResolveSync;

/// Would `specifier`, required from `importer`, load one of the modules that
/// are registered for runtime `require`?
///
/// Bare specifiers go through package resolution; a failure there means a
/// builtin or missing package and counts as no match. Path specifiers are
/// probed with the plain name, `.js` and `.json` only.
pub fn has_dynamic_counterpart(
    specifier: &str,
    importer: &Path,
    dynamic_modules: &BTreeSet<String>,
    resolver: &(impl ResolveSync + ?Sized),
) -> bool {
    let basedir = importer.parent().unwrap_or(Path::new("."));

    if !is_path_like(specifier) {
        return match resolver.resolve_sync(specifier, basedir) {
            Ok(path) => dynamic_modules.contains(&normalize_slashes(&path.to_string_lossy())),
            Err(e) => {
                trace!("Probe for '{}' found nothing: {}", specifier, e);
                false
            }
        };
    }

    PROBE_EXTENSIONS.iter().any(|ext| {
        let candidate = clean(basedir.join(format!("{}{}", specifier, ext)));
        let candidate = normalize_slashes(&candidate.to_string_lossy());
        let hit = dynamic_modules.contains(&candidate);
        if hit {
            trace!("'{}' has dynamic counterpart {}", specifier, candidate);
        }
        hit
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use std::path::PathBuf;

    struct FakeResolver;

    impl ResolveSync for FakeResolver {
        fn resolve_sync(&self, specifier: &str, _basedir: &Path) -> Result<PathBuf> {
            match specifier {
                "pkg" => Ok(PathBuf::from("/proj/node_modules/pkg/index.js")),
                _ => Err(anyhow!("Cannot find module '{}'", specifier)),
            }
        }
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extension_probe_finds_js() {
        let modules = set(&["/proj/lib/foo.js"]);
        let importer = Path::new("/proj/lib/main.js");
        assert!(has_dynamic_counterpart("./foo", importer, &modules, &FakeResolver));
        assert!(has_dynamic_counterpart("./foo.js", importer, &modules, &FakeResolver));
        assert!(has_dynamic_counterpart("../lib/foo", importer, &modules, &FakeResolver));
        assert!(!has_dynamic_counterpart("./bar", importer, &modules, &FakeResolver));
    }

    #[test]
    fn test_no_index_probing() {
        let modules = set(&["/proj/lib/foo/index.js"]);
        let importer = Path::new("/proj/lib/main.js");
        assert!(!has_dynamic_counterpart("./foo", importer, &modules, &FakeResolver));
    }

    #[test]
    fn test_json_probe() {
        let modules = set(&["/proj/data.json"]);
        let importer = Path::new("/proj/lib/main.js");
        assert!(has_dynamic_counterpart("../data", importer, &modules, &FakeResolver));
    }

    #[test]
    fn test_bare_specifier_uses_resolver() {
        let modules = set(&["/proj/node_modules/pkg/index.js"]);
        let importer = Path::new("/proj/lib/main.js");
        assert!(has_dynamic_counterpart("pkg", importer, &modules, &FakeResolver));
        assert!(!has_dynamic_counterpart("fs", importer, &modules, &FakeResolver));
    }
}
