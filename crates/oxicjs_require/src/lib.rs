//! CommonJS to ES module rewriting for JavaScript/TypeScript projects.
//!
//! This crate finds `require(...)` calls in a module, hoists the statically
//! known ones into `import` declarations with collision-free bindings, and
//! bridges the module's own `module` / `exports` objects so a bundler that
//! only understands static imports can consume CommonJS files.
//!
//! The engine is split into:
//! - [`classifier`]: is this call a require, and is its argument static?
//! - [`prober`]: could this specifier also be loaded by a runtime require?
//! - [`registry`]: require sites grouped by source, in discovery order
//! - [`synthesizer`]: batch resolution, naming, rewriting and the import block
//!
//! # Examples
//!
//! ```no_run
//! use oxicjs_require::{ProjectResolver, TransformOptions, transform_module};
//! use oxicjs_core::Resolver;
//! use std::{collections::HashMap, path::{Path, PathBuf}};
//!
//! # fn main() -> anyhow::Result<()> {
//! let resolver = ProjectResolver::new(Resolver::new(PathBuf::from("/project"), HashMap::new()));
//! let file = Path::new("/project/src/main.js");
//! let source = "const a = require('./a');\nmodule.exports = a;\n";
//!
//! if let Some(output) = transform_module(source, file, &TransformOptions::default(), &resolver)? {
//!     println!("{}", output.code);
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
mod config;
mod editor;
mod parser;
pub mod prober;
pub mod registry;
mod reporter;
mod resolve;
mod runner;
pub mod scope;
pub mod synthesizer;
mod transform;
mod types;

// Re-export public API
pub use config::Config;
pub use editor::{SourceEditor, TextEditor};
pub use reporter::{print_code, print_json, print_modules, print_summary};
pub use resolve::{ProjectResolver, ResolveSources, ResolveSync};
pub use runner::run_transform;
pub use transform::{IgnorePredicate, TransformOptions, transform_module};
pub use types::{
    CallId, ExportMode, ModuleReport, ModuleStatus, RequireSite, ResolvedSource, TransformOutput,
    TransformReport,
};
