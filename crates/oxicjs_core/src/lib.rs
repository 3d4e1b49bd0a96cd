//! Core utilities for oxicjs tools.
//!
//! This crate provides the parser-independent plumbing shared by the
//! CommonJS rewriting tools:
//! - Resolving module requests (relative, node_modules, tsconfig paths)
//! - The virtual module id scheme used for synthetic bridge modules
//! - The `resolve_id` hook answering requests for those ids
//! - Collecting dynamic-require targets and project configuration

mod collector;
mod config;
mod constants;
mod resolve_id;
mod resolver;
mod types;
pub mod virtual_id;

// Re-export public API
pub use collector::{CollectorConfig, collect_dynamic_modules};
pub use config::{find_git_root, read_tsconfig_paths};
pub use constants::{
    INDEX_FILES, JS_TS_EXTENSIONS, PROBE_EXTENSIONS, REQUIRE_CONDITIONS, RESOLVE_EXTENSIONS,
};
pub use resolve_id::resolve_id;
pub use resolver::{Resolver, is_path_like, normalize_slashes, resolve_extensions};
pub use types::ResolvedId;
pub use virtual_id::VirtualId;
