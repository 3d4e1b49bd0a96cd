//! Extension tables shared by resolution, probing and target collection.
//!
//! ## Module System Extensions
//!
//! - `.mts` and `.mjs`: ES Module files (use `import`/`export`)
//! - `.cts` and `.cjs`: CommonJS files (use `require`/`module.exports`)
//! - `.json`: loadable through `require` and registered for dynamic requires

/// File extensions (without the dot) of files that may take part in a
/// CommonJS dependency graph.
pub const JS_TS_EXTENSIONS: &[&str] = &[
    "js",   // JavaScript
    "cjs",  // JavaScript CommonJS
    "mjs",  // JavaScript module
    "jsx",  // JavaScript with JSX
    "ts",   // TypeScript
    "tsx",  // TypeScript with JSX
    "cts",  // TypeScript CommonJS
    "mts",  // TypeScript module
    "json", // JSON data
];

/// Extensions to try when resolving module requests (in priority order).
pub const RESOLVE_EXTENSIONS: &[&str] =
    &[".js", ".json", ".cjs", ".mjs", ".jsx", ".ts", ".tsx", ".cts", ".mts"];

/// Index file names to try when resolving directory requests.
pub const INDEX_FILES: &[&str] = &[
    "index.js",
    "index.json",
    "index.cjs",
    "index.mjs",
    "index.jsx",
    "index.ts",
    "index.tsx",
    "index.cts",
    "index.mts",
];

/// Suffixes tried by the dynamic-module prober. Index files are left to the
/// resolver.
pub const PROBE_EXTENSIONS: &[&str] = &["", ".js", ".json"];

/// `package.json` export conditions honoured for `require`, in priority order.
pub const REQUIRE_CONDITIONS: &[&str] = &["require", "node", "default"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_extensions_are_dotted_js_ts_extensions() {
        assert_eq!(RESOLVE_EXTENSIONS.len(), JS_TS_EXTENSIONS.len());
        for ext in RESOLVE_EXTENSIONS {
            let bare = ext.trim_start_matches('.');
            assert!(
                JS_TS_EXTENSIONS.contains(&bare),
                "RESOLVE_EXTENSIONS contains '{}' which is not in JS_TS_EXTENSIONS",
                ext
            );
        }
    }

    #[test]
    fn test_index_files_follow_resolve_order() {
        assert_eq!(INDEX_FILES.len(), RESOLVE_EXTENSIONS.len());
        for (index, ext) in INDEX_FILES.iter().zip(RESOLVE_EXTENSIONS) {
            assert_eq!(*index, format!("index{}", ext));
        }
    }

    #[test]
    fn test_probe_extensions_try_exact_path_first() {
        assert_eq!(PROBE_EXTENSIONS, &["", ".js", ".json"]);
    }
}
