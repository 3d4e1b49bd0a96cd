use anyhow::{Context, Result, anyhow};
use ignore::WalkBuilder;
use log::{debug, info, trace, warn};
use oxicjs_core::{CollectorConfig, Resolver, VirtualId, collect_dynamic_modules};
use path_clean::clean;
use rayon::prelude::*;
use std::{
    collections::{BTreeSet, HashSet},
    fs,
    path::{Path, PathBuf},
    thread,
};

use crate::{
    config::Config,
    resolve::ProjectResolver,
    transform::{TransformOptions, transform_module},
    types::{ModuleReport, ModuleStatus, TransformReport},
};

/// Source extensions the transform parses; JSON is only ever a require target.
const SOURCE_EXTENSIONS: &[&str] = &["js", "cjs", "mjs", "jsx", "ts", "tsx", "cts", "mts"];

fn is_source_file(p: &Path) -> bool {
    p.extension().and_then(|e| e.to_str()).is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Expands the requested files and directories into the sorted set of
/// source files under them.
pub(crate) fn collect_inputs(root: &Path, inputs: &[PathBuf]) -> Result<BTreeSet<PathBuf>> {
    debug!("Collecting input files");
    let mut files = BTreeSet::new();

    for input in inputs {
        let abs = clean(root.join(input));
        if abs.is_file() {
            files.insert(abs);
            continue;
        }
        if !abs.is_dir() {
            return Err(anyhow!("Input does not exist: {}", abs.display()));
        }

        let walker = WalkBuilder::new(&abs)
            .hidden(false)
            .git_ignore(true)
            .filter_entry(|e| e.file_name() != "node_modules")
            .build();
        for res in walker {
            let dent = res?;
            let p = dent.path();
            if p.is_file() && is_source_file(p) {
                trace!("Found input file: {}", p.display());
                files.insert(p.to_path_buf());
            }
        }
    }

    debug!("Collected {} input files", files.len());
    Ok(files)
}

fn output_path(root: &Path, out_dir: &Path, file: &Path) -> PathBuf {
    match file.strip_prefix(root) {
        Ok(rel) => out_dir.join(rel),
        Err(_) => out_dir.join(file.file_name().unwrap_or(file.as_os_str())),
    }
}

fn write_output(path: &Path, code: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, code).with_context(|| format!("Failed to write {}", path.display()))
}

fn process_file(
    file: &Path,
    options: &TransformOptions,
    resolver: &ProjectResolver,
    root: &Path,
    out_dir: Option<&Path>,
) -> Result<ModuleStatus> {
    let src =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let status = match transform_module(&src, file, options, resolver)? {
        Some(output) => {
            if let Some(dir) = out_dir {
                write_output(&output_path(root, dir, file), &output.code)?;
            }
            ModuleStatus::Transformed(output)
        }
        None => {
            if let Some(dir) = out_dir {
                write_output(&output_path(root, dir, file), &src)?;
            }
            ModuleStatus::Unchanged
        }
    };
    Ok(status)
}

/// Transforms every input file in parallel. A failing module is reported
/// and does not stop the others.
pub fn run_transform(mut cfg: Config) -> Result<TransformReport> {
    info!("Starting CommonJS transform");
    let root = cfg.initialize()?;

    let files = collect_inputs(&root, &cfg.files)?;
    if files.is_empty() {
        warn!("No source files found in {:?}", cfg.files);
        return Err(anyhow!("No source files found in {:?}", cfg.files));
    }
    info!("Found {} source files", files.len());

    let dynamic_modules = if cfg.dynamic_require_targets.is_empty() {
        BTreeSet::new()
    } else {
        collect_dynamic_modules(&CollectorConfig {
            root: root.clone(),
            targets: cfg.dynamic_require_targets.clone(),
        })?
    };

    let resolver = ProjectResolver::new(
        Resolver::new(root.clone(), cfg.tsconfig_paths.clone())
            .with_extensions(cfg.extensions.clone()),
    );

    let options = TransformOptions {
        ignore: TransformOptions::ignore_list(cfg.ignore.clone()),
        dynamic_register_sources: Vec::new(),
        transform_mixed_es_modules: cfg.transform_mixed_es_modules,
        dynamic_modules,
    };
    let entry_options = TransformOptions {
        dynamic_register_sources: options
            .dynamic_modules
            .iter()
            .map(|m| VirtualId::DynamicRegister(m.clone()).to_string())
            .collect(),
        ..options.clone()
    };
    let entries: HashSet<PathBuf> = cfg.entry.iter().map(|e| clean(root.join(e))).collect();

    let out_dir = cfg.out_dir.as_ref().map(|d| clean(root.join(d)));
    let files: Vec<PathBuf> = files.into_iter().collect();

    info!("Processing {} files in parallel", files.len());
    let modules: Vec<ModuleReport> = files
        .par_iter()
        .map(|file| {
            debug!("Thread {:?} processing: {}", thread::current().id(), file.display());
            let options = if entries.contains(file) { &entry_options } else { &options };
            let status = match process_file(file, options, &resolver, &root, out_dir.as_deref()) {
                Ok(status) => status,
                Err(e) => {
                    warn!("Failed to transform {}: {:#}", file.display(), e);
                    ModuleStatus::Failed { error: format!("{:#}", e) }
                }
            };
            ModuleReport { file: file.clone(), status }
        })
        .collect();

    debug!("Resolver cache holds {} entries", resolver.inner().cache_len());
    Ok(TransformReport { files_analyzed: files.len(), modules })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        fs::create_dir_all(file_path.parent().unwrap()).unwrap();
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn config(root: &Path, extra: &[&str]) -> Config {
        let root_arg = root.to_string_lossy().to_string();
        let mut args = vec!["transform", "--root", root_arg.as_str()];
        args.extend_from_slice(extra);
        Config::try_parse_from(args).unwrap()
    }

    fn status_of<'r>(report: &'r TransformReport, suffix: &str) -> &'r ModuleStatus {
        &report.modules.iter().find(|m| m.file.ends_with(suffix)).unwrap().status
    }

    #[test]
    fn test_collect_inputs_skips_node_modules_and_json() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/a.js", "");
        create_test_file(root, "src/b.cjs", "");
        create_test_file(root, "src/data.json", "{}");
        create_test_file(root, "src/node_modules/dep/index.js", "");

        let files = collect_inputs(root, &[PathBuf::from("src")]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(collect_inputs(root, &[PathBuf::from("missing")]).is_err());
    }

    #[test]
    fn test_transforms_project() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        create_test_file(&root, "src/main.js", "const a = require('./a');\nmodule.exports = a;\n");
        create_test_file(&root, "src/a.js", "exports.x = 1;\n");
        create_test_file(&root, "src/plain.js", "const x = 1;\n");
        create_test_file(&root, "src/broken.js", "require('./nope');\n");

        let report = run_transform(config(&root, &["src"])).unwrap();
        assert_eq!(report.files_analyzed, 4);
        assert_eq!(report.transformed(), 2);
        assert_eq!(report.failed(), 1);

        match status_of(&report, "main.js") {
            ModuleStatus::Transformed(out) => {
                let a = root.join("src/a.js");
                assert!(out.code.contains(&format!(
                    "import require$$0 from \"\\u0000{}?commonjs-proxy\";",
                    a.to_string_lossy()
                )));
            }
            other => panic!("unexpected status {:?}", other),
        }
        assert!(matches!(status_of(&report, "plain.js"), ModuleStatus::Unchanged));
        match status_of(&report, "broken.js") {
            ModuleStatus::Failed { error } => assert!(error.contains("./nope")),
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_out_dir_receives_every_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        create_test_file(&root, "src/main.js", "require('./a');\n");
        create_test_file(&root, "src/a.js", "const x = 1;\n");

        let report = run_transform(config(&root, &["src", "--out-dir", "dist"])).unwrap();
        assert_eq!(report.failed(), 0);

        let main = fs::read_to_string(root.join("dist/src/main.js")).unwrap();
        assert!(main.starts_with("import * as commonjsHelpers from"));
        let a = fs::read_to_string(root.join("dist/src/a.js")).unwrap();
        assert_eq!(a, "const x = 1;\n");
    }

    #[test]
    fn test_entry_registers_dynamic_targets() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        create_test_file(&root, "src/main.js", "const x = 1;\n");
        create_test_file(&root, "src/other.js", "const y = 2;\n");
        create_test_file(&root, "lib/foo.js", "module.exports = 1;\n");

        let report = run_transform(config(
            &root,
            &["src", "--dynamic-require-targets", "lib", "--entry", "src/main.js"],
        ))
        .unwrap();

        match status_of(&report, "src/main.js") {
            ModuleStatus::Transformed(out) => {
                assert!(out.code.contains("?commonjs-dynamic-register\";"));
            }
            other => panic!("unexpected status {:?}", other),
        }
        assert!(matches!(status_of(&report, "src/other.js"), ModuleStatus::Unchanged));
    }
}
