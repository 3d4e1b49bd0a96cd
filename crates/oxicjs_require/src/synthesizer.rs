use anyhow::{Result, anyhow};
use indexmap::IndexMap;
use log::{debug, trace};
use oxicjs_core::{VirtualId, virtual_id::is_virtual};
use std::collections::HashMap;

use crate::{
    editor::TextEditor,
    registry::{RequireRegistry, SourceGroup},
    resolve::ResolveSources,
    scope::Scope,
    types::{ExportMode, ResolvedSource},
};

/// Everything the import block needs besides the recorded require sites.
#[derive(Debug, Clone, Copy)]
pub struct ImportBlockOptions<'o> {
    pub helpers_name: &'o str,
    /// Some rewritten site calls into the helpers module.
    pub uses_helpers: bool,
    pub export_mode: ExportMode,
    pub module_name: &'o str,
    pub exports_name: &'o str,
    /// Id of the module being rewritten; resolution runs relative to it.
    pub module_id: &'o str,
    pub dynamic_register_sources: &'o [String],
}

fn quote(s: &str) -> Result<String> {
    Ok(serde_json::to_string(s)?)
}

/// Resolves every recorded source, rewrites the call sites through `editor`
/// and returns the import block to prepend to the module.
///
/// The whole batch is resolved before any name is assigned or any text is
/// touched, so a resolution failure leaves the editor unchanged. Line order
/// is fixed: helpers, the module/exports bridge, dynamic registrations, then
/// one import per resolved source in the order it was first required.
pub fn synthesize<S: Scope>(
    registry: RequireRegistry<S>,
    options: &ImportBlockOptions<'_>,
    resolver: &(impl ResolveSources + ?Sized),
    editor: &mut (impl TextEditor + ?Sized),
) -> Result<String> {
    let groups = resolve_groups(registry, options.module_id, resolver)?;

    let mut uid = 0usize;
    let mut source_imports = Vec::with_capacity(groups.len());
    for mut group in groups.into_values() {
        let binding = if group.uses_return_value() {
            Some(group.assign_binding_name(&mut uid).to_string())
        } else {
            None
        };

        for site in &group.sites {
            match (&binding, site.uses_return_value) {
                (Some(name), true) => editor.overwrite(site.call_span, name)?,
                _ => editor.remove(site.removal_span)?,
            }
        }

        let target = if is_virtual(&group.source) {
            group.source.clone()
        } else {
            VirtualId::Proxy(group.source.clone()).to_string()
        };
        let line = match &binding {
            Some(name) => format!("import {} from {};", name, quote(&target)?),
            None => format!("import {};", quote(&target)?),
        };
        trace!("Synthesized import: {}", line.escape_debug());
        source_imports.push(line);
    }

    let mut imports = Vec::new();
    match options.export_mode {
        ExportMode::Module => imports.push(format!(
            "import {{ __module as {}, exports as {} }} from {};",
            options.module_name,
            options.exports_name,
            quote(&VirtualId::Module(options.module_id.to_string()).to_string())?
        )),
        ExportMode::Exports => imports.push(format!(
            "import {{ __exports as {} }} from {};",
            options.exports_name,
            quote(&VirtualId::Exports(options.module_id.to_string()).to_string())?
        )),
        ExportMode::None => {}
    }
    for source in options.dynamic_register_sources {
        imports.push(format!("import {};", quote(source)?));
    }
    imports.extend(source_imports);

    if imports.is_empty() && !options.uses_helpers {
        return Ok(String::new());
    }
    let helpers_id = quote(&VirtualId::Helpers.to_string())?;
    imports.insert(0, format!("import * as {} from {};", options.helpers_name, helpers_id));

    debug!("Import block for {} has {} lines", options.module_id, imports.len());
    Ok(format!("{}\n\n", imports.join("\n")))
}

/// Resolves the raw sources in one batch and merges groups that turn out to
/// load the same module, keeping first-discovery order.
fn resolve_groups<S: Scope>(
    registry: RequireRegistry<S>,
    importer: &str,
    resolver: &(impl ResolveSources + ?Sized),
) -> Result<IndexMap<String, SourceGroup<S>>> {
    if registry.is_empty() {
        return Ok(IndexMap::new());
    }

    let sources = registry.sources();
    let resolved: HashMap<String, ResolvedSource> = resolver
        .resolve_sources(importer, &sources)?
        .into_iter()
        .map(|r| (r.source.clone(), r))
        .collect();

    let mut merged: IndexMap<String, SourceGroup<S>> = IndexMap::new();
    for group in registry.into_groups() {
        let id = resolved
            .get(&group.source)
            .map(|r| r.id.clone())
            .ok_or_else(|| anyhow!("No resolution returned for '{}'", group.source))?;
        trace!("Source '{}' resolved to {}", group.source, id.escape_debug());
        merged.entry(id.clone()).or_insert_with(|| SourceGroup::new(id)).sites.extend(group.sites);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        editor::SourceEditor,
        types::{CallId, RequireSite},
    };
    use oxc_span::Span;

    #[derive(Debug, Clone, Copy)]
    struct Names(&'static [&'static str]);

    impl Scope for Names {
        fn contains(&self, name: &str) -> bool {
            self.0.iter().any(|n| *n == name)
        }
    }

    /// Maps `./x` and `./x.js` to `/p/x.js` and answers in reverse order.
    struct FakeResolver;

    impl ResolveSources for FakeResolver {
        fn resolve_sources(&self, _importer: &str, sources: &[String]) -> Result<Vec<ResolvedSource>> {
            let mut out = Vec::new();
            for source in sources.iter().rev() {
                let id = match source.as_str() {
                    "virtual" => "\0virtual-thing".to_string(),
                    s if s.starts_with("./") => {
                        format!("/p/{}.js", s.trim_start_matches("./").trim_end_matches(".js"))
                    }
                    s => return Err(anyhow!("Could not resolve '{}'", s)),
                };
                out.push(ResolvedSource { source: source.clone(), id, external: false });
            }
            Ok(out)
        }
    }

    fn site(call: Span, statement: Span, uses: bool, scope: Names) -> RequireSite<Names> {
        RequireSite {
            call: CallId(call.start),
            call_span: call,
            scope,
            uses_return_value: uses,
            removal_span: statement,
        }
    }

    fn options<'o>(register: &'o [String]) -> ImportBlockOptions<'o> {
        ImportBlockOptions {
            helpers_name: "commonjsHelpers",
            uses_helpers: false,
            export_mode: ExportMode::None,
            module_name: "mainModule",
            exports_name: "mainExports",
            module_id: "/p/main.js",
            dynamic_register_sources: register,
        }
    }

    const HELPERS_LINE: &str = "import * as commonjsHelpers from \"\\u0000commonjsHelpers.js\";";
    const NONE: Names = Names(&[]);

    #[test]
    fn test_empty_registry_yields_empty_block() {
        let mut editor = SourceEditor::new("");
        let block =
            synthesize(RequireRegistry::<Names>::new(), &options(&[]), &FakeResolver, &mut editor)
                .unwrap();
        assert_eq!(block, "");
        assert!(!editor.has_changes());
    }

    #[test]
    fn test_helpers_alone_when_used() {
        let mut editor = SourceEditor::new("");
        let opts = ImportBlockOptions { uses_helpers: true, ..options(&[]) };
        let block =
            synthesize(RequireRegistry::<Names>::new(), &opts, &FakeResolver, &mut editor).unwrap();
        assert_eq!(block, format!("{HELPERS_LINE}\n\n"));
    }

    #[test]
    fn test_shared_source_gets_one_import() {
        let src = "const a = require('./a');\nrequire('./a');\nconst b = require('./b');\n";
        let mut registry = RequireRegistry::new();
        registry.record("./a", site(Span::new(10, 24), Span::new(0, 25), true, NONE));
        registry.record("./a", site(Span::new(26, 40), Span::new(26, 41), false, NONE));
        registry.record("./b", site(Span::new(52, 66), Span::new(42, 67), true, NONE));

        let mut editor = SourceEditor::new(src);
        let block = synthesize(registry, &options(&[]), &FakeResolver, &mut editor).unwrap();

        assert_eq!(
            block,
            format!(
                "{HELPERS_LINE}\n\
                 import require$$0 from \"\\u0000/p/a.js?commonjs-proxy\";\n\
                 import require$$1 from \"\\u0000/p/b.js?commonjs-proxy\";\n\n"
            )
        );
        assert_eq!(editor.finish(), "const a = require$$0;\n\nconst b = require$$1;\n");
    }

    #[test]
    fn test_sources_resolving_to_same_id_are_merged() {
        let src = "x(require('./a'));\ny(require('./a.js'));\n";
        let mut registry = RequireRegistry::new();
        registry.record("./a", site(Span::new(2, 16), Span::new(0, 18), true, NONE));
        registry.record("./a.js", site(Span::new(21, 38), Span::new(19, 40), true, NONE));

        let mut editor = SourceEditor::new(src);
        let block = synthesize(registry, &options(&[]), &FakeResolver, &mut editor).unwrap();

        assert_eq!(block.lines().filter(|l| l.contains("/p/a.js")).count(), 1);
        assert_eq!(editor.finish(), "x(require$$0);\ny(require$$0);\n");
    }

    #[test]
    fn test_binding_name_avoids_scope_collision() {
        let src = "f(require('./a'));";
        let mut registry = RequireRegistry::new();
        registry.record("./a", site(Span::new(2, 16), Span::new(0, 18), true, Names(&["require$$0"])));

        let mut editor = SourceEditor::new(src);
        let block = synthesize(registry, &options(&[]), &FakeResolver, &mut editor).unwrap();

        assert!(block.contains("import require$$1 from"));
        assert_eq!(editor.finish(), "f(require$$1);");
    }

    #[test]
    fn test_side_effect_only_import() {
        let src = "require('./a');";
        let mut registry = RequireRegistry::new();
        registry.record("./a", site(Span::new(0, 14), Span::new(0, 15), false, NONE));

        let mut editor = SourceEditor::new(src);
        let block = synthesize(registry, &options(&[]), &FakeResolver, &mut editor).unwrap();

        assert!(block.contains("\nimport \"\\u0000/p/a.js?commonjs-proxy\";\n"));
        assert_eq!(editor.finish(), "");
    }

    #[test]
    fn test_virtual_ids_are_imported_verbatim() {
        let src = "f(require('virtual'));";
        let mut registry = RequireRegistry::new();
        registry.record("virtual", site(Span::new(2, 20), Span::new(0, 22), true, NONE));

        let mut editor = SourceEditor::new(src);
        let block = synthesize(registry, &options(&[]), &FakeResolver, &mut editor).unwrap();
        assert!(block.contains("import require$$0 from \"\\u0000virtual-thing\";"));
    }

    #[test]
    fn test_line_order() {
        let src = "f(require('./b'));";
        let mut registry = RequireRegistry::new();
        registry.record("./b", site(Span::new(2, 16), Span::new(0, 18), true, NONE));
        let register = vec!["/p/x.js".to_string(), "/p/y.js".to_string()];
        let opts = ImportBlockOptions { export_mode: ExportMode::Module, ..options(&register) };

        let mut editor = SourceEditor::new(src);
        let block = synthesize(registry, &opts, &FakeResolver, &mut editor).unwrap();

        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(
            lines,
            vec![
                HELPERS_LINE,
                "import { __module as mainModule, exports as mainExports } from \"\\u0000/p/main.js?commonjs-module\";",
                "import \"/p/x.js\";",
                "import \"/p/y.js\";",
                "import require$$0 from \"\\u0000/p/b.js?commonjs-proxy\";",
                "",
            ]
        );
    }

    #[test]
    fn test_exports_mode_bridge() {
        let mut editor = SourceEditor::new("");
        let opts = ImportBlockOptions { export_mode: ExportMode::Exports, ..options(&[]) };
        let block =
            synthesize(RequireRegistry::<Names>::new(), &opts, &FakeResolver, &mut editor).unwrap();
        assert_eq!(
            block,
            format!(
                "{HELPERS_LINE}\nimport {{ __exports as mainExports }} from \"\\u0000/p/main.js?commonjs-exports\";\n\n"
            )
        );
    }

    #[test]
    fn test_resolution_failure_leaves_source_untouched() {
        let src = "f(require('./a'));\ng(require('pkg'));";
        let mut registry = RequireRegistry::new();
        registry.record("./a", site(Span::new(2, 16), Span::new(0, 18), true, NONE));
        registry.record("pkg", site(Span::new(21, 35), Span::new(19, 37), true, NONE));

        let mut editor = SourceEditor::new(src);
        let err = synthesize(registry, &options(&[]), &FakeResolver, &mut editor).unwrap_err();
        assert!(err.to_string().contains("pkg"));
        assert!(!editor.has_changes());
    }
}
