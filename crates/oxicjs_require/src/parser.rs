use anyhow::{Result, anyhow};
use log::trace;
use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use std::path::Path;

pub(crate) fn source_type_for(path: &Path) -> SourceType {
    let ext = path.extension().and_then(|e| e.to_str());

    let mut st = SourceType::default()
        .with_jsx(matches!(ext, Some("tsx") | Some("jsx")))
        .with_typescript(matches!(ext, Some("ts") | Some("tsx") | Some("mts") | Some("cts")));

    // .mjs, .mts are always ES modules; .cjs, .cts never are
    if matches!(ext, Some("mjs") | Some("mts")) {
        st = st.with_module(true);
    } else if matches!(ext, Some("cjs") | Some("cts")) {
        st = st.with_module(false);
    }

    st
}

/// Parses `source`, failing on any syntax error.
pub(crate) fn parse<'a>(
    allocator: &'a Allocator,
    source: &'a str,
    path: &Path,
) -> Result<Program<'a>> {
    trace!("Parsing {}", path.display());
    let ParserReturn { program, errors, panicked, .. } =
        OxcParser::new(allocator, source, source_type_for(path)).parse();

    if panicked || !errors.is_empty() {
        let detail =
            errors.first().map(|e| e.to_string()).unwrap_or_else(|| "parser panicked".into());
        return Err(anyhow!("Failed to parse {}: {}", path.display(), detail));
    }
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_by_extension() {
        assert!(source_type_for(Path::new("a.ts")).is_typescript());
        assert!(source_type_for(Path::new("a.tsx")).is_jsx());
        assert!(source_type_for(Path::new("a.mjs")).is_module());
        assert!(source_type_for(Path::new("a.cjs")).is_script());
        assert!(source_type_for(Path::new("a.cts")).is_script());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let allocator = Allocator::default();
        let err = parse(&allocator, "const = ;", Path::new("/p/bad.js")).unwrap_err();
        assert!(err.to_string().contains("/p/bad.js"));
    }

    #[test]
    fn test_parse_ok() {
        let allocator = Allocator::default();
        let program = parse(&allocator, "const a = require('a');", Path::new("a.js")).unwrap();
        assert_eq!(program.body.len(), 1);
    }
}
