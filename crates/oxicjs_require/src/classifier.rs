use log::trace;
use oxc_ast::ast::*;

use crate::scope::Scope;

/// Properties of `require` that belong to the runtime loader and are left alone.
const RESERVED_PROPERTIES: [&str; 3] = ["resolve", "cache", "main"];

/// `require(...)` or `module.require(...)` with at least one argument, where
/// neither `require` nor `module` is shadowed by a local binding.
pub fn is_require_call(call: &CallExpression, scope: &impl Scope) -> bool {
    // `require()` without arguments loads nothing
    if call.arguments.is_empty() {
        return false;
    }

    match &call.callee {
        Expression::Identifier(ident) => {
            ident.name.as_str() == "require" && !scope.contains("require")
        }
        Expression::StaticMemberExpression(member) => is_module_require(member, scope),
        _ => false,
    }
}

fn is_module_require(member: &StaticMemberExpression, scope: &impl Scope) -> bool {
    matches!(&member.object, Expression::Identifier(obj) if obj.name.as_str() == "module")
        && member.property.name.as_str() == "require"
        && !scope.contains("module")
}

/// A require call with exactly one argument whose value is known at build time.
pub fn is_static_require_call(call: &CallExpression, scope: &impl Scope) -> bool {
    is_require_call(call, scope) && call.arguments.len() == 1 && static_specifier(call).is_some()
}

/// The build-time value of the first argument: a literal, or a template
/// literal without interpolations.
///
/// Big integer and regular expression literals do not name modules and
/// yield `None`, as does a template whose escapes cannot be cooked.
pub fn static_specifier(call: &CallExpression) -> Option<String> {
    let arg = call.arguments.first()?.as_expression()?;
    match arg {
        Expression::StringLiteral(lit) => Some(lit.value.to_string()),
        Expression::NumericLiteral(lit) => Some(format_number(lit.value)),
        Expression::BooleanLiteral(lit) => Some(lit.value.to_string()),
        Expression::NullLiteral(_) => Some("null".to_string()),
        Expression::TemplateLiteral(tpl) if tpl.expressions.is_empty() => {
            tpl.quasis.first()?.value.cooked.as_ref().map(|c| c.to_string())
        }
        _ => None,
    }
}

fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// `x.resolve`, `x.cache` or `x.main`.
pub fn is_reserved_property_access(member: &StaticMemberExpression) -> bool {
    RESERVED_PROPERTIES.contains(&member.property.name.as_str())
}

/// Asks the caller-supplied predicate whether the static specifier of this
/// call should be left as a runtime require.
pub fn is_ignored_require(call: &CallExpression, ignore: &dyn Fn(&str) -> bool) -> bool {
    match static_specifier(call) {
        Some(spec) => {
            let ignored = ignore(&spec);
            if ignored {
                trace!("Ignoring require('{}')", spec);
            }
            ignored
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;
    use std::collections::HashSet;

    struct FakeScope(HashSet<&'static str>);

    impl Scope for FakeScope {
        fn contains(&self, name: &str) -> bool {
            self.0.contains(name)
        }
    }

    fn empty() -> FakeScope {
        FakeScope(HashSet::new())
    }

    fn bound(names: &[&'static str]) -> FakeScope {
        FakeScope(names.iter().copied().collect())
    }

    /// Parses a single expression statement and hands its call to `check`.
    fn with_call(src: &str, check: impl FnOnce(&CallExpression)) {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, src, SourceType::default()).parse();
        assert!(ret.errors.is_empty(), "parse errors in test source");
        let Some(Statement::ExpressionStatement(es)) = ret.program.body.first() else {
            panic!("expected an expression statement");
        };
        let Expression::CallExpression(call) = &es.expression else {
            panic!("expected a call expression");
        };
        check(call);
    }

    #[test]
    fn test_zero_argument_calls_are_not_requires() {
        with_call("require()", |call| assert!(!is_require_call(call, &empty())));
        with_call("module.require()", |call| assert!(!is_require_call(call, &empty())));
    }

    #[test]
    fn test_require_and_module_require() {
        with_call("require('a')", |call| assert!(is_require_call(call, &empty())));
        with_call("module.require('a')", |call| assert!(is_require_call(call, &empty())));
        with_call("foo.require('a')", |call| assert!(!is_require_call(call, &empty())));
        with_call("requireX('a')", |call| assert!(!is_require_call(call, &empty())));
    }

    #[test]
    fn test_shadowing_disables_detection() {
        with_call("require('a')", |call| assert!(!is_require_call(call, &bound(&["require"]))));
        with_call("module.require('a')", |call| {
            assert!(!is_require_call(call, &bound(&["module"])));
            assert!(is_require_call(call, &bound(&["require"])));
        });
    }

    #[test]
    fn test_static_string_literal() {
        with_call("require('./foo')", |call| {
            assert!(is_static_require_call(call, &empty()));
            assert_eq!(static_specifier(call).as_deref(), Some("./foo"));
        });
    }

    #[test]
    fn test_static_template_literal() {
        with_call("require(`./f\\u006fo`)", |call| {
            assert!(is_static_require_call(call, &empty()));
            assert_eq!(static_specifier(call).as_deref(), Some("./foo"));
        });
        with_call("require(`./${name}`)", |call| {
            assert!(is_require_call(call, &empty()));
            assert!(!is_static_require_call(call, &empty()));
        });
    }

    #[test]
    fn test_other_literals() {
        with_call("require(42)", |call| assert_eq!(static_specifier(call).as_deref(), Some("42")));
        with_call("require(null)", |call| {
            assert_eq!(static_specifier(call).as_deref(), Some("null"))
        });
        with_call("require(/x/)", |call| assert!(!is_static_require_call(call, &empty())));
    }

    #[test]
    fn test_large_whole_numbers_print_like_js() {
        with_call("require(1e20)", |call| {
            assert_eq!(static_specifier(call).as_deref(), Some("100000000000000000000"))
        });
        with_call("require(1.5)", |call| {
            assert_eq!(static_specifier(call).as_deref(), Some("1.5"))
        });
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_multiple_arguments_are_dynamic() {
        with_call("require('a', 'b')", |call| {
            assert!(is_require_call(call, &empty()));
            assert!(!is_static_require_call(call, &empty()));
        });
        with_call("require(name)", |call| assert!(!is_static_require_call(call, &empty())));
    }

    #[test]
    fn test_ignore_predicate_receives_specifier() {
        let ignore = |spec: &str| spec == "fs";
        with_call("require('fs')", |call| assert!(is_ignored_require(call, &ignore)));
        with_call("require('path')", |call| assert!(!is_ignored_require(call, &ignore)));
    }

    #[test]
    fn test_reserved_properties() {
        let allocator = Allocator::default();
        let src = "require.resolve; require.cache; require.main; require.other;";
        let ret = Parser::new(&allocator, src, SourceType::default()).parse();
        let reserved: Vec<bool> = ret
            .program
            .body
            .iter()
            .filter_map(|stmt| match stmt {
                Statement::ExpressionStatement(es) => match &es.expression {
                    Expression::StaticMemberExpression(m) => Some(is_reserved_property_access(m)),
                    _ => None,
                },
                _ => None,
            })
            .collect();
        assert_eq!(reserved, vec![true, true, true, false]);
    }
}
