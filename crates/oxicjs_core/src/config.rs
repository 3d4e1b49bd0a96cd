use anyhow::{Result, anyhow};
use ignore::WalkBuilder;
use log::{debug, trace};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// Walks up from `start` to the first directory containing `.git`.
pub fn find_git_root(start: &Path) -> Result<PathBuf> {
    debug!("Searching for git root from {}", start.display());

    for dir in start.ancestors() {
        trace!("Checking for .git in: {:?}", dir);
        if dir.join(".git").exists() {
            debug!("Found git root at: {:?}", dir);
            return Ok(dir.to_path_buf());
        }
    }

    Err(anyhow!("Could not find .git directory above {}", start.display()))
}

/// Drops `//` line comments that sit outside string literals.
fn strip_line_comments(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            let mut in_string = false;
            let mut escaped = false;
            let bytes = line.as_bytes();
            for (i, &b) in bytes.iter().enumerate() {
                match b {
                    _ if escaped => escaped = false,
                    b'\\' if in_string => escaped = true,
                    b'"' => in_string = !in_string,
                    b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => return &line[..i],
                    _ => {}
                }
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collects `compilerOptions.paths` aliases from every `tsconfig.json` under
/// `root`, outside `node_modules`. Aliases and targets lose their trailing
/// `/*`; targets become absolute against the tsconfig's `baseUrl`.
pub fn read_tsconfig_paths(root: &Path) -> HashMap<String, Vec<String>> {
    debug!("Reading tsconfig paths from root: {:?}", root);
    let mut paths = HashMap::new();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .filter_entry(|e| e.file_name() != "node_modules")
        .build();

    let tsconfig_files: Vec<PathBuf> = walker
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name() == "tsconfig.json")
        .map(|e| e.into_path())
        .collect();
    debug!("Found {} tsconfig.json files", tsconfig_files.len());

    for tsconfig_path in &tsconfig_files {
        let Ok(content) = fs::read_to_string(tsconfig_path) else {
            trace!("Unreadable tsconfig at: {:?}", tsconfig_path);
            continue;
        };

        let Ok(json) = serde_json::from_str::<serde_json::Value>(&strip_line_comments(&content))
        else {
            debug!("Skipping malformed tsconfig at: {:?}", tsconfig_path);
            continue;
        };

        let Some(compiler_options) = json.get("compilerOptions") else {
            continue;
        };
        let Some(paths_obj) = compiler_options.get("paths").and_then(|p| p.as_object()) else {
            continue;
        };

        let base_url = compiler_options.get("baseUrl").and_then(|b| b.as_str()).unwrap_or(".");
        let base_path = tsconfig_path.parent().unwrap_or(root).join(base_url);

        for (alias, targets) in paths_obj {
            let resolved_targets: Vec<String> = targets
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|t| t.as_str())
                .map(|t| base_path.join(t.trim_end_matches("/*")).to_string_lossy().to_string())
                .collect();

            if !resolved_targets.is_empty() {
                let alias_key = alias.trim_end_matches("/*").to_string();
                trace!("Found tsconfig path alias: '{}' -> {:?}", alias_key, resolved_targets);
                paths.insert(alias_key, resolved_targets);
            }
        }
    }

    debug!("Loaded {} tsconfig path aliases", paths.len());
    paths
}
