use anyhow::{Context, Result};
use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_syntax::identifier::{is_identifier_part, is_identifier_start};
use oxicjs_core::normalize_slashes;
use std::{
    collections::{BTreeSet, HashSet},
    path::Path,
    sync::Arc,
};

use crate::{
    classifier::{is_ignored_require, is_require_call, is_static_require_call, static_specifier},
    editor::{SourceEditor, TextEditor},
    parser::parse,
    prober::has_dynamic_counterpart,
    registry::RequireRegistry,
    resolve::{ResolveSources, ResolveSync},
    scope::{BridgeName, analyze},
    synthesizer::{ImportBlockOptions, synthesize},
    types::{CallId, ExportMode, RequireSite, TransformOutput},
};

pub type IgnorePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

const HELPERS_NAME: &str = "commonjsHelpers";

const RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let", "new",
    "null", "package", "private", "protected", "public", "return", "static", "super", "switch",
    "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while", "with", "yield",
];

#[derive(Clone, Default)]
pub struct TransformOptions {
    /// Static specifiers for which this returns true stay runtime requires.
    pub ignore: Option<IgnorePredicate>,
    /// Normalized absolute paths of modules loadable through runtime `require`.
    pub dynamic_modules: BTreeSet<String>,
    /// Registration modules imported for their side effects.
    pub dynamic_register_sources: Vec<String>,
    /// Rewrite requires in files that also use `import` / `export`.
    pub transform_mixed_es_modules: bool,
}

impl TransformOptions {
    /// An ignore predicate matching the given specifiers exactly.
    pub fn ignore_list(specifiers: Vec<String>) -> Option<IgnorePredicate> {
        if specifiers.is_empty() {
            return None;
        }
        let set: HashSet<String> = specifiers.into_iter().collect();
        Some(Arc::new(move |spec: &str| set.contains(spec)))
    }
}

/// Turns a file name into an identifier: `foo-bar.js` gives `fooBar`,
/// `lib/index.js` gives `lib`.
fn name_base(file: &Path) -> String {
    let stem = file.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let stem = if stem == "index" {
        file.parent().and_then(|p| p.file_name()).and_then(|s| s.to_str()).unwrap_or(stem)
    } else {
        stem
    };
    make_legal_identifier(stem)
}

fn make_legal_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut upper_next = false;
    for c in raw.chars() {
        if c == '-' {
            upper_next = true;
            continue;
        }
        if upper_next && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
        } else if upper_next {
            out.push('_');
            out.push(if is_identifier_part(c) { c } else { '_' });
        } else {
            out.push(if is_identifier_part(c) { c } else { '_' });
        }
        upper_next = false;
    }
    if upper_next {
        out.push('_');
    }

    let starts_ok = out.chars().next().is_some_and(is_identifier_start);
    if !starts_ok || RESERVED_WORDS.contains(&out.as_str()) {
        out.insert(0, '_');
    }
    out
}

/// Returns `base`, or `base_1`, `base_2`, ... whichever is not yet taken,
/// and marks it as taken.
fn deconflict(base: &str, taken: &mut HashSet<String>) -> String {
    let mut name = base.to_string();
    let mut index = 1;
    while taken.contains(&name) {
        name = format!("{base}_{index}");
        index += 1;
    }
    taken.insert(name.clone());
    name
}

fn quote(s: &str) -> Result<String> {
    Ok(serde_json::to_string(s)?)
}

/// Rewrites the CommonJS `require` calls and `module` / `exports` uses of one
/// module into static imports.
///
/// Returns `Ok(None)` when there is nothing to rewrite, or when the file is
/// an ES module and mixed modules are not being transformed.
pub fn transform_module<R>(
    source: &str,
    file: &Path,
    options: &TransformOptions,
    resolver: &R,
) -> Result<Option<TransformOutput>>
where
    R: ResolveSources + ResolveSync + ?Sized,
{
    let allocator = Allocator::default();
    let program = parse(&allocator, source, file)?;
    let facts = analyze(&program);

    let is_esm = facts.has_module_syntax;
    if is_esm && !options.transform_mixed_es_modules {
        debug!("Skipping ES module {}", file.display());
        return Ok(None);
    }

    let module_id = normalize_slashes(&file.to_string_lossy());
    let mut taken: HashSet<String> =
        facts.scopes.binding_names().into_iter().map(str::to_string).collect();
    taken.extend(facts.free_names.iter().cloned());
    let helpers_name = deconflict(HELPERS_NAME, &mut taken);
    let base = name_base(file);
    let exports_name = deconflict(&base, &mut taken);
    let module_name = deconflict(&format!("{base}Module"), &mut taken);

    let mut editor = SourceEditor::new(source);
    let mut registry = RequireRegistry::new();
    let mut output = TransformOutput {
        code: String::new(),
        export_mode: ExportMode::None,
        static_requires: 0,
        dynamic_requires: 0,
        ignored_requires: 0,
        dynamic_counterparts: 0,
    };
    let mut uses_helpers = false;

    for (index, candidate) in facts.calls.iter().enumerate() {
        let call = candidate.call;
        let scope = facts.scopes.get(candidate.scope);
        if !is_require_call(call, &scope) {
            continue;
        }
        if candidate.reserved_access {
            trace!("Keeping require at {} read through a loader property", call.span.start);
            output.ignored_requires += 1;
            continue;
        }
        if !is_static_require_call(call, &scope) {
            trace!("Dynamic require at {} in {}", call.span.start, file.display());
            output.dynamic_requires += 1;
            continue;
        }
        if let Some(ignore) = &options.ignore
            && is_ignored_require(call, &**ignore)
        {
            output.ignored_requires += 1;
            continue;
        }
        let Some(specifier) = static_specifier(call) else {
            continue;
        };

        if !options.dynamic_modules.is_empty()
            && has_dynamic_counterpart(&specifier, file, &options.dynamic_modules, resolver)
        {
            let dir = file.parent().map(|d| normalize_slashes(&d.to_string_lossy()));
            let replacement = format!(
                "{}.commonjsRequire({}, {})",
                helpers_name,
                quote(&specifier)?,
                quote(dir.as_deref().unwrap_or("."))?
            );
            editor.overwrite(call.span, &replacement)?;
            uses_helpers = true;
            output.dynamic_counterparts += 1;
            continue;
        }

        let (uses_return_value, removal_span) = match candidate.statement {
            Some(statement) => (false, statement),
            None => (true, call.span),
        };
        registry.record(
            &specifier,
            RequireSite {
                call: CallId(index as u32),
                call_span: call.span,
                scope: facts.naming_scope(candidate.scope),
                uses_return_value,
                removal_span,
            },
        );
        output.static_requires += 1;
    }

    let bridge_refs: Vec<_> =
        if is_esm { Vec::new() } else { facts.free_bridge_refs().copied().collect() };
    output.export_mode = if bridge_refs.iter().any(|r| r.name == BridgeName::Module) {
        ExportMode::Module
    } else if bridge_refs.iter().any(|r| r.name == BridgeName::Exports) {
        ExportMode::Exports
    } else {
        ExportMode::None
    };

    if registry.is_empty()
        && bridge_refs.is_empty()
        && !uses_helpers
        && options.dynamic_register_sources.is_empty()
    {
        debug!("Nothing to rewrite in {}", file.display());
        return Ok(None);
    }

    for bridge in &bridge_refs {
        let name = match bridge.name {
            BridgeName::Module => &module_name,
            BridgeName::Exports => &exports_name,
        };
        if bridge.shorthand {
            editor.overwrite(bridge.span, &format!("{}: {}", bridge.original(), name))?;
        } else {
            editor.overwrite(bridge.span, name)?;
        }
    }

    let block_options = ImportBlockOptions {
        helpers_name: &helpers_name,
        uses_helpers,
        export_mode: output.export_mode,
        module_name: &module_name,
        exports_name: &exports_name,
        module_id: &module_id,
        dynamic_register_sources: &options.dynamic_register_sources,
    };
    let block = synthesize(registry, &block_options, resolver, &mut editor)
        .with_context(|| format!("Failed to rewrite requires in {}", file.display()))?;
    editor.prepend(&block);

    match output.export_mode {
        ExportMode::Module => editor.append(&format!("\nexport default {module_name}.exports;\n")),
        ExportMode::Exports => editor.append(&format!("\nexport default {exports_name};\n")),
        ExportMode::None => {}
    }

    output.code = editor.finish();
    debug!(
        "Rewrote {} ({} static, {} dynamic, {} ignored, export mode {})",
        file.display(),
        output.static_requires,
        output.dynamic_requires,
        output.ignored_requires,
        output.export_mode
    );
    Ok(Some(output))
}
