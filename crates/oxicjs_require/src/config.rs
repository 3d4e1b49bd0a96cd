use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use oxicjs_core::{RESOLVE_EXTENSIONS, find_git_root, read_tsconfig_paths};
use std::{collections::HashMap, env, path::PathBuf};

fn default_extensions() -> Vec<String> {
    RESOLVE_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

#[derive(Debug, Clone, Parser)]
#[command(name = "transform")]
#[command(about = "Rewrite CommonJS require calls into static ES imports")]
pub struct Config {
    /// Files or directories to transform
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Root directory of the project (defaults to git root)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Specifier to leave as a runtime require (repeatable)
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Extensions tried when resolving, in priority order
    #[arg(long, value_delimiter = ',', default_values_t = default_extensions())]
    pub extensions: Vec<String>,

    /// File or directory whose modules may be loaded by a runtime require (repeatable)
    #[arg(long = "dynamic-require-targets")]
    pub dynamic_require_targets: Vec<PathBuf>,

    /// File that registers the dynamic require targets (repeatable)
    #[arg(long)]
    pub entry: Vec<PathBuf>,

    /// Also rewrite requires in files that use import/export
    #[arg(long)]
    pub transform_mixed_es_modules: bool,

    /// Write transformed files here instead of printing them
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print a JSON report
    #[arg(long)]
    pub json: bool,

    #[clap(skip)]
    pub tsconfig_paths: HashMap<String, Vec<String>>,
}

impl Config {
    /// Settles the project root and loads tsconfig path aliases.
    pub fn initialize(&mut self) -> Result<PathBuf> {
        let root = match self.root.take() {
            Some(r) => {
                debug!("Using provided root directory: {:?}", r);
                r.canonicalize().unwrap_or(r)
            }
            None => {
                debug!("No root provided, searching for git root");
                find_git_root(&env::current_dir()?)?
            }
        };
        info!("Using root directory: {}", root.display());
        self.root = Some(root.clone());

        self.tsconfig_paths = read_tsconfig_paths(&root);
        debug!("Found {} tsconfig path aliases", self.tsconfig_paths.len());
        Ok(root)
    }
}
