//! Lexical scope analysis over an oxc [`Program`].
//!
//! One depth-first walk builds an arena of scopes and records, in source
//! order, every call expression together with the scope it appears in.
//! Bindings are looked up only after the walk has finished, so hoisted
//! `var` and function declarations are visible from anywhere in their
//! function, as are block-scoped bindings declared later in the block.

use log::trace;
use oxc_ast::ast::*;
use oxc_span::Span;
use std::collections::HashSet;

use crate::classifier::is_reserved_property_access;

/// Lexical membership test: does this scope (or any enclosing one) bind `name`?
pub trait Scope {
    fn contains(&self, name: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

#[derive(Debug)]
struct ScopeData {
    parent: Option<ScopeId>,
    is_function: bool,
    bindings: HashSet<String>,
}

#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<ScopeData>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            scopes: vec![ScopeData { parent: None, is_function: true, bindings: HashSet::new() }],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn get(&self, id: ScopeId) -> ScopeRef<'_> {
        ScopeRef { tree: self, id }
    }

    pub fn add_scope(&mut self, parent: ScopeId, is_function: bool) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeData { parent: Some(parent), is_function, bindings: HashSet::new() });
        id
    }

    pub fn declare(&mut self, id: ScopeId, name: &str) {
        self.scopes[id.0 as usize].bindings.insert(name.to_string());
    }

    /// Nearest enclosing function (or module) scope; `var` lands here.
    pub fn function_scope(&self, mut id: ScopeId) -> ScopeId {
        loop {
            let data = &self.scopes[id.0 as usize];
            match data.parent {
                Some(parent) if !data.is_function => id = parent,
                _ => return id,
            }
        }
    }

    pub fn contains(&self, id: ScopeId, name: &str) -> bool {
        let mut current = Some(id);
        while let Some(scope) = current {
            let data = &self.scopes[scope.0 as usize];
            if data.bindings.contains(name) {
                return true;
            }
            current = data.parent;
        }
        false
    }

    /// Every name bound anywhere in the module.
    pub fn binding_names(&self) -> HashSet<&str> {
        self.scopes.iter().flat_map(|s| s.bindings.iter().map(String::as_str)).collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScopeRef<'t> {
    tree: &'t ScopeTree,
    id: ScopeId,
}

impl Scope for ScopeRef<'_> {
    fn contains(&self, name: &str) -> bool {
        self.tree.contains(self.id, name)
    }
}

/// A call expression found during the walk.
pub struct CallCandidate<'p, 'a> {
    pub call: &'p CallExpression<'a>,
    pub scope: ScopeId,
    /// Span of the enclosing expression statement when the call is its
    /// entire expression and the statement sits in a statement list, so it
    /// can be dropped without leaving an empty branch.
    pub statement: Option<Span>,
    /// The result is read through `.resolve`, `.cache` or `.main`.
    pub reserved_access: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeName {
    Module,
    Exports,
}

/// A reference to the identifier `module` or `exports`.
#[derive(Debug, Clone, Copy)]
pub struct BridgeRef {
    pub name: BridgeName,
    pub span: Span,
    pub scope: ScopeId,
    /// Written as a shorthand property, `{ module }`.
    pub shorthand: bool,
}

impl BridgeRef {
    pub fn original(&self) -> &'static str {
        match self.name {
            BridgeName::Module => "module",
            BridgeName::Exports => "exports",
        }
    }
}

pub struct ModuleFacts<'p, 'a> {
    pub scopes: ScopeTree,
    pub calls: Vec<CallCandidate<'p, 'a>>,
    pub bridge_refs: Vec<BridgeRef>,
    /// The program contains `import` / `export` declarations.
    pub has_module_syntax: bool,
    /// Names referenced somewhere without any binding in scope (globals).
    pub free_names: HashSet<String>,
}

impl ModuleFacts<'_, '_> {
    /// References to `module` / `exports` that no local binding shadows.
    pub fn free_bridge_refs(&self) -> impl Iterator<Item = &BridgeRef> {
        self.bridge_refs.iter().filter(|r| !self.scopes.contains(r.scope, r.original()))
    }

    /// `id` as seen by a new binding name: taken if bound there or read as a
    /// global anywhere in the module.
    pub fn naming_scope(&self, id: ScopeId) -> NamingScope<'_> {
        NamingScope { scope: self.scopes.get(id), free_names: &self.free_names }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NamingScope<'f> {
    scope: ScopeRef<'f>,
    free_names: &'f HashSet<String>,
}

impl Scope for NamingScope<'_> {
    fn contains(&self, name: &str) -> bool {
        self.free_names.contains(name) || self.scope.contains(name)
    }
}

fn is_module_require_callee(callee: &Expression) -> bool {
    matches!(callee, Expression::StaticMemberExpression(member)
        if member.property.name.as_str() == "require"
            && matches!(&member.object, Expression::Identifier(obj) if obj.name.as_str() == "module"))
}

pub fn analyze<'p, 'a>(program: &'p Program<'a>) -> ModuleFacts<'p, 'a> {
    let scopes = ScopeTree::new();
    let current = scopes.root();
    let mut walker = Walker {
        scopes,
        current,
        calls: Vec::new(),
        bridge_refs: Vec::new(),
        references: Vec::new(),
        has_module_syntax: false,
    };
    walker.visit_statements(&program.body);
    let free_names: HashSet<String> = walker
        .references
        .iter()
        .filter(|(name, scope)| !walker.scopes.contains(*scope, name))
        .map(|(name, _)| name.clone())
        .collect();
    trace!(
        "Scope analysis: {} scopes, {} calls, {} module/exports references",
        walker.scopes.len(),
        walker.calls.len(),
        walker.bridge_refs.len()
    );

    ModuleFacts {
        scopes: walker.scopes,
        calls: walker.calls,
        bridge_refs: walker.bridge_refs,
        has_module_syntax: walker.has_module_syntax,
        free_names,
    }
}

struct Walker<'p, 'a> {
    scopes: ScopeTree,
    current: ScopeId,
    calls: Vec<CallCandidate<'p, 'a>>,
    bridge_refs: Vec<BridgeRef>,
    references: Vec<(String, ScopeId)>,
    has_module_syntax: bool,
}

impl<'p, 'a> Walker<'p, 'a> {
    fn enter(&mut self, is_function: bool) -> ScopeId {
        let parent = self.current;
        self.current = self.scopes.add_scope(parent, is_function);
        parent
    }

    fn leave(&mut self, parent: ScopeId) {
        self.current = parent;
    }

    fn declare_here(&mut self, name: &str) {
        self.scopes.declare(self.current, name);
    }

    fn declare_hoisted(&mut self, name: &str) {
        let target = self.scopes.function_scope(self.current);
        self.scopes.declare(target, name);
    }

    fn record_identifier(&mut self, name: &str, span: Span, shorthand: bool) {
        self.references.push((name.to_string(), self.current));
        let name = match name {
            "module" => BridgeName::Module,
            "exports" => BridgeName::Exports,
            _ => return,
        };
        self.bridge_refs.push(BridgeRef { name, span, scope: self.current, shorthand });
    }

    fn visit_statements(&mut self, statements: &'p [Statement<'a>]) {
        for stmt in statements {
            self.visit_statement(stmt, true);
        }
    }

    fn visit_block(&mut self, statements: &'p [Statement<'a>]) {
        let parent = self.enter(false);
        self.visit_statements(statements);
        self.leave(parent);
    }

    /// `in_list` is false for the lone body of `if`, loops, labels and
    /// `with`, where dropping the statement would leave an empty branch.
    fn visit_statement(&mut self, stmt: &'p Statement<'a>, in_list: bool) {
        match stmt {
            Statement::BlockStatement(block) => self.visit_block(&block.body),
            Statement::ExpressionStatement(es) => match &es.expression {
                Expression::CallExpression(call) => {
                    self.visit_call(call, in_list.then_some(es.span), false)
                }
                expr => self.visit_expression(expr),
            },
            Statement::VariableDeclaration(decl) => self.visit_variable_declaration(decl),
            Statement::FunctionDeclaration(func) => self.visit_function(func, true),
            Statement::ClassDeclaration(class) => self.visit_class(class, true),
            Statement::IfStatement(s) => {
                self.visit_expression(&s.test);
                self.visit_statement(&s.consequent, false);
                if let Some(alternate) = &s.alternate {
                    self.visit_statement(alternate, false);
                }
            }
            Statement::ForStatement(s) => {
                let parent = self.enter(false);
                match &s.init {
                    Some(ForStatementInit::VariableDeclaration(decl)) => {
                        self.visit_variable_declaration(decl)
                    }
                    Some(init) => {
                        if let Some(expr) = init.as_expression() {
                            self.visit_expression(expr);
                        }
                    }
                    None => {}
                }
                if let Some(test) = &s.test {
                    self.visit_expression(test);
                }
                if let Some(update) = &s.update {
                    self.visit_expression(update);
                }
                self.visit_statement(&s.body, false);
                self.leave(parent);
            }
            Statement::ForInStatement(s) => {
                let parent = self.enter(false);
                if let ForStatementLeft::VariableDeclaration(decl) = &s.left {
                    self.visit_variable_declaration(decl);
                }
                self.visit_expression(&s.right);
                self.visit_statement(&s.body, false);
                self.leave(parent);
            }
            Statement::ForOfStatement(s) => {
                let parent = self.enter(false);
                if let ForStatementLeft::VariableDeclaration(decl) = &s.left {
                    self.visit_variable_declaration(decl);
                }
                self.visit_expression(&s.right);
                self.visit_statement(&s.body, false);
                self.leave(parent);
            }
            Statement::WhileStatement(s) => {
                self.visit_expression(&s.test);
                self.visit_statement(&s.body, false);
            }
            Statement::DoWhileStatement(s) => {
                self.visit_statement(&s.body, false);
                self.visit_expression(&s.test);
            }
            Statement::LabeledStatement(s) => self.visit_statement(&s.body, false),
            Statement::ReturnStatement(s) => {
                if let Some(argument) = &s.argument {
                    self.visit_expression(argument);
                }
            }
            Statement::ThrowStatement(s) => self.visit_expression(&s.argument),
            Statement::WithStatement(s) => {
                self.visit_expression(&s.object);
                self.visit_statement(&s.body, false);
            }
            Statement::SwitchStatement(s) => {
                self.visit_expression(&s.discriminant);
                let parent = self.enter(false);
                for case in &s.cases {
                    if let Some(test) = &case.test {
                        self.visit_expression(test);
                    }
                    self.visit_statements(&case.consequent);
                }
                self.leave(parent);
            }
            Statement::TryStatement(s) => {
                self.visit_block(&s.block.body);
                if let Some(handler) = &s.handler {
                    let parent = self.enter(false);
                    if let Some(param) = &handler.param {
                        self.declare_pattern(&param.pattern, false);
                        self.visit_pattern(&param.pattern);
                    }
                    self.visit_block(&handler.body.body);
                    self.leave(parent);
                }
                if let Some(finalizer) = &s.finalizer {
                    self.visit_block(&finalizer.body);
                }
            }
            Statement::ImportDeclaration(decl) => {
                self.has_module_syntax = true;
                for spec in decl.specifiers.iter().flatten() {
                    let local = match spec {
                        ImportDeclarationSpecifier::ImportSpecifier(s) => &s.local,
                        ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => &s.local,
                        ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => &s.local,
                    };
                    self.declare_here(local.name.as_str());
                }
            }
            Statement::ExportNamedDeclaration(decl) => {
                self.has_module_syntax = true;
                if let Some(declaration) = &decl.declaration {
                    self.visit_declaration(declaration);
                }
            }
            Statement::ExportDefaultDeclaration(decl) => {
                self.has_module_syntax = true;
                match &decl.declaration {
                    ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                        self.visit_function(func, true)
                    }
                    ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                        self.visit_class(class, true)
                    }
                    kind => {
                        if let Some(expr) = kind.as_expression() {
                            self.visit_expression(expr);
                        }
                    }
                }
            }
            Statement::ExportAllDeclaration(_) => self.has_module_syntax = true,
            _ => {}
        }
    }

    fn visit_declaration(&mut self, declaration: &'p Declaration<'a>) {
        match declaration {
            Declaration::VariableDeclaration(decl) => self.visit_variable_declaration(decl),
            Declaration::FunctionDeclaration(func) => self.visit_function(func, true),
            Declaration::ClassDeclaration(class) => self.visit_class(class, true),
            _ => {}
        }
    }

    fn visit_variable_declaration(&mut self, decl: &'p VariableDeclaration<'a>) {
        let hoisted = matches!(decl.kind, VariableDeclarationKind::Var);
        for declarator in &decl.declarations {
            self.declare_pattern(&declarator.id, hoisted);
            self.visit_pattern(&declarator.id);
            if let Some(init) = &declarator.init {
                self.visit_expression(init);
            }
        }
    }

    fn declare_pattern(&mut self, pattern: &'p BindingPattern<'a>, hoisted: bool) {
        match &pattern.kind {
            BindingPatternKind::BindingIdentifier(ident) => {
                if hoisted {
                    self.declare_hoisted(ident.name.as_str());
                } else {
                    self.declare_here(ident.name.as_str());
                }
            }
            BindingPatternKind::ObjectPattern(obj) => {
                for prop in &obj.properties {
                    self.declare_pattern(&prop.value, hoisted);
                }
                if let Some(rest) = &obj.rest {
                    self.declare_pattern(&rest.argument, hoisted);
                }
            }
            BindingPatternKind::ArrayPattern(arr) => {
                for element in arr.elements.iter().flatten() {
                    self.declare_pattern(element, hoisted);
                }
                if let Some(rest) = &arr.rest {
                    self.declare_pattern(&rest.argument, hoisted);
                }
            }
            BindingPatternKind::AssignmentPattern(assign) => {
                self.declare_pattern(&assign.left, hoisted)
            }
        }
    }

    /// Walks default values and computed keys inside a binding pattern.
    fn visit_pattern(&mut self, pattern: &'p BindingPattern<'a>) {
        match &pattern.kind {
            BindingPatternKind::BindingIdentifier(_) => {}
            BindingPatternKind::ObjectPattern(obj) => {
                for prop in &obj.properties {
                    if let Some(key) = prop.key.as_expression() {
                        self.visit_expression(key);
                    }
                    self.visit_pattern(&prop.value);
                }
                if let Some(rest) = &obj.rest {
                    self.visit_pattern(&rest.argument);
                }
            }
            BindingPatternKind::ArrayPattern(arr) => {
                for element in arr.elements.iter().flatten() {
                    self.visit_pattern(element);
                }
                if let Some(rest) = &arr.rest {
                    self.visit_pattern(&rest.argument);
                }
            }
            BindingPatternKind::AssignmentPattern(assign) => {
                self.visit_pattern(&assign.left);
                self.visit_expression(&assign.right);
            }
        }
    }

    fn visit_params(&mut self, params: &'p FormalParameters<'a>) {
        for param in &params.items {
            self.declare_pattern(&param.pattern, false);
            self.visit_pattern(&param.pattern);
        }
        if let Some(rest) = &params.rest {
            self.declare_pattern(&rest.argument, false);
            self.visit_pattern(&rest.argument);
        }
    }

    fn visit_function(&mut self, func: &'p Function<'a>, is_declaration: bool) {
        if is_declaration && let Some(id) = &func.id {
            self.declare_hoisted(id.name.as_str());
        }
        let parent = self.enter(true);
        if !is_declaration && let Some(id) = &func.id {
            self.declare_here(id.name.as_str());
        }
        self.visit_params(&func.params);
        if let Some(body) = &func.body {
            self.visit_statements(&body.statements);
        }
        self.leave(parent);
    }

    fn visit_arrow(&mut self, arrow: &'p ArrowFunctionExpression<'a>) {
        let parent = self.enter(true);
        self.visit_params(&arrow.params);
        if arrow.expression {
            // Concise bodies hold their expression in a synthetic statement
            // whose value is returned, not discarded.
            if let Some(Statement::ExpressionStatement(es)) = arrow.body.statements.first() {
                self.visit_expression(&es.expression);
            }
        } else {
            self.visit_statements(&arrow.body.statements);
        }
        self.leave(parent);
    }

    fn visit_class(&mut self, class: &'p Class<'a>, is_declaration: bool) {
        if is_declaration && let Some(id) = &class.id {
            self.declare_here(id.name.as_str());
        }
        if let Some(super_class) = &class.super_class {
            self.visit_expression(super_class);
        }
        let parent = self.enter(false);
        if !is_declaration && let Some(id) = &class.id {
            self.declare_here(id.name.as_str());
        }
        for element in &class.body.body {
            match element {
                ClassElement::MethodDefinition(method) => {
                    self.visit_property_key(&method.key);
                    self.visit_function(&method.value, false);
                }
                ClassElement::PropertyDefinition(prop) => {
                    self.visit_property_key(&prop.key);
                    if let Some(value) = &prop.value {
                        self.visit_expression(value);
                    }
                }
                ClassElement::AccessorProperty(prop) => {
                    self.visit_property_key(&prop.key);
                    if let Some(value) = &prop.value {
                        self.visit_expression(value);
                    }
                }
                ClassElement::StaticBlock(block) => {
                    let inner = self.enter(true);
                    self.visit_statements(&block.body);
                    self.leave(inner);
                }
                _ => {}
            }
        }
        self.leave(parent);
    }

    fn visit_property_key(&mut self, key: &'p PropertyKey<'a>) {
        if let Some(expr) = key.as_expression() {
            self.visit_expression(expr);
        }
    }

    fn visit_call(
        &mut self,
        call: &'p CallExpression<'a>,
        statement: Option<Span>,
        reserved_access: bool,
    ) {
        self.calls.push(CallCandidate { call, scope: self.current, statement, reserved_access });

        // `module.require(...)` is a require call, not a use of `module`.
        if call.arguments.is_empty() || !is_module_require_callee(&call.callee) {
            self.visit_expression(&call.callee);
        }
        self.visit_arguments(&call.arguments);
    }

    fn visit_arguments(&mut self, arguments: &'p [Argument<'a>]) {
        for arg in arguments {
            match arg {
                Argument::SpreadElement(spread) => self.visit_expression(&spread.argument),
                _ => {
                    if let Some(expr) = arg.as_expression() {
                        self.visit_expression(expr);
                    }
                }
            }
        }
    }

    fn visit_member(&mut self, member: &'p MemberExpression<'a>) {
        match member {
            MemberExpression::ComputedMemberExpression(m) => {
                self.visit_expression(&m.object);
                self.visit_expression(&m.expression);
            }
            MemberExpression::StaticMemberExpression(m) => self.visit_expression(&m.object),
            MemberExpression::PrivateFieldExpression(m) => self.visit_expression(&m.object),
        }
    }

    fn visit_assignment_target(&mut self, target: &'p AssignmentTarget<'a>) {
        match target {
            AssignmentTarget::AssignmentTargetIdentifier(ident) => {
                self.record_identifier(ident.name.as_str(), ident.span, false)
            }
            AssignmentTarget::StaticMemberExpression(member) => {
                self.visit_expression(&member.object)
            }
            AssignmentTarget::ComputedMemberExpression(member) => {
                self.visit_expression(&member.object);
                self.visit_expression(&member.expression);
            }
            AssignmentTarget::PrivateFieldExpression(member) => {
                self.visit_expression(&member.object)
            }
            _ => {}
        }
    }

    fn visit_expression(&mut self, expr: &'p Expression<'a>) {
        match expr {
            Expression::Identifier(ident) => {
                self.record_identifier(ident.name.as_str(), ident.span, false)
            }
            Expression::CallExpression(call) => self.visit_call(call, None, false),
            Expression::NewExpression(new) => {
                self.visit_expression(&new.callee);
                self.visit_arguments(&new.arguments);
            }
            Expression::StaticMemberExpression(member) => {
                if is_reserved_property_access(member) {
                    match &member.object {
                        Expression::Identifier(obj) if obj.name.as_str() == "require" => {
                            trace!("Leaving require.{} untouched", member.property.name);
                            return;
                        }
                        Expression::CallExpression(call) => {
                            self.visit_call(call, None, true);
                            return;
                        }
                        _ => {}
                    }
                }
                self.visit_expression(&member.object);
            }
            Expression::ComputedMemberExpression(member) => {
                self.visit_expression(&member.object);
                self.visit_expression(&member.expression);
            }
            Expression::PrivateFieldExpression(member) => self.visit_expression(&member.object),
            Expression::ChainExpression(chain) => match &chain.expression {
                ChainElement::CallExpression(call) => self.visit_call(call, None, false),
                element => {
                    if let Some(member) = element.as_member_expression() {
                        self.visit_member(member);
                    }
                }
            },
            Expression::ArrayExpression(array) => {
                for element in &array.elements {
                    match element {
                        ArrayExpressionElement::SpreadElement(spread) => {
                            self.visit_expression(&spread.argument)
                        }
                        _ => {
                            if let Some(e) = element.as_expression() {
                                self.visit_expression(e);
                            }
                        }
                    }
                }
            }
            Expression::ObjectExpression(obj) => {
                for prop in &obj.properties {
                    match prop {
                        ObjectPropertyKind::ObjectProperty(p) => {
                            if p.shorthand
                                && let Expression::Identifier(ident) = &p.value
                            {
                                self.record_identifier(ident.name.as_str(), ident.span, true);
                            } else {
                                self.visit_property_key(&p.key);
                                self.visit_expression(&p.value);
                            }
                        }
                        ObjectPropertyKind::SpreadProperty(spread) => {
                            self.visit_expression(&spread.argument)
                        }
                    }
                }
            }
            Expression::FunctionExpression(func) => self.visit_function(func, false),
            Expression::ArrowFunctionExpression(arrow) => self.visit_arrow(arrow),
            Expression::ClassExpression(class) => self.visit_class(class, false),
            Expression::AssignmentExpression(assign) => {
                self.visit_assignment_target(&assign.left);
                self.visit_expression(&assign.right);
            }
            Expression::UpdateExpression(update) => match &update.argument {
                SimpleAssignmentTarget::AssignmentTargetIdentifier(ident) => {
                    self.record_identifier(ident.name.as_str(), ident.span, false)
                }
                SimpleAssignmentTarget::StaticMemberExpression(member) => {
                    self.visit_expression(&member.object)
                }
                SimpleAssignmentTarget::ComputedMemberExpression(member) => {
                    self.visit_expression(&member.object);
                    self.visit_expression(&member.expression);
                }
                _ => {}
            },
            Expression::ConditionalExpression(cond) => {
                self.visit_expression(&cond.test);
                self.visit_expression(&cond.consequent);
                self.visit_expression(&cond.alternate);
            }
            Expression::LogicalExpression(logical) => {
                self.visit_expression(&logical.left);
                self.visit_expression(&logical.right);
            }
            Expression::BinaryExpression(binary) => {
                self.visit_expression(&binary.left);
                self.visit_expression(&binary.right);
            }
            Expression::SequenceExpression(seq) => {
                for e in &seq.expressions {
                    self.visit_expression(e);
                }
            }
            Expression::UnaryExpression(unary) => self.visit_expression(&unary.argument),
            Expression::AwaitExpression(await_expr) => self.visit_expression(&await_expr.argument),
            Expression::YieldExpression(yield_expr) => {
                if let Some(argument) = &yield_expr.argument {
                    self.visit_expression(argument);
                }
            }
            Expression::ParenthesizedExpression(paren) => self.visit_expression(&paren.expression),
            Expression::TemplateLiteral(template) => {
                for e in &template.expressions {
                    self.visit_expression(e);
                }
            }
            Expression::TaggedTemplateExpression(tagged) => {
                self.visit_expression(&tagged.tag);
                for e in &tagged.quasi.expressions {
                    self.visit_expression(e);
                }
            }
            Expression::ImportExpression(import) => self.visit_expression(&import.source),
            Expression::TSAsExpression(e) => self.visit_expression(&e.expression),
            Expression::TSSatisfiesExpression(e) => self.visit_expression(&e.expression),
            Expression::TSNonNullExpression(e) => self.visit_expression(&e.expression),
            Expression::TSTypeAssertion(e) => self.visit_expression(&e.expression),
            _ => {}
        }
    }
}
