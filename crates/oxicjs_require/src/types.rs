use oxc_span::Span;
use serde::Serialize;
use std::{fmt, path::PathBuf};

/// How a module's own `module` / `exports` objects are bridged into the
/// static import graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// The module touches `module`; import both the module and exports objects.
    Module,
    /// The module only touches `exports`.
    Exports,
    #[default]
    None,
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportMode::Module => f.write_str("module"),
            ExportMode::Exports => f.write_str("exports"),
            ExportMode::None => f.write_str("none"),
        }
    }
}

/// Position of a call expression in discovery order within one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallId(pub u32);

/// One statically analyzable require call.
#[derive(Debug, Clone)]
pub struct RequireSite<S> {
    pub call: CallId,
    pub call_span: Span,
    /// Scope active at the call, used for binding-name collision checks.
    pub scope: S,
    pub uses_return_value: bool,
    /// Whole statement to drop when the return value is unused.
    pub removal_span: Span,
}

/// A require request after batch resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSource {
    /// The specifier as written in the require call.
    pub source: String,
    pub id: String,
    pub external: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransformOutput {
    #[serde(skip)]
    pub code: String,
    pub export_mode: ExportMode,
    pub static_requires: usize,
    pub dynamic_requires: usize,
    pub ignored_requires: usize,
    pub dynamic_counterparts: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ModuleStatus {
    Transformed(TransformOutput),
    Unchanged,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleReport {
    pub file: PathBuf,
    #[serde(flatten)]
    pub status: ModuleStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransformReport {
    pub modules: Vec<ModuleReport>,
    pub files_analyzed: usize,
}

impl TransformReport {
    pub fn failed(&self) -> usize {
        self.modules.iter().filter(|m| matches!(m.status, ModuleStatus::Failed { .. })).count()
    }

    pub fn transformed(&self) -> usize {
        self.modules.iter().filter(|m| matches!(m.status, ModuleStatus::Transformed(_))).count()
    }
}
