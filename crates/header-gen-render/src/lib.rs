// crates/header-gen-render/src/lib.rs
// ============================================================================
// Module: Header Generator Library
// Description: Deterministic generator for normalized C++ class headers.
// Purpose: Render a header file from a parsed header model and configuration.
// Dependencies: header-gen-core, header-gen-config, thiserror
// ============================================================================

//! ## Overview
//! This crate regenerates a C++ class header from a [`HeaderFileModel`]. The
//! output carries a generated banner, normalized include blocks, forward
//! declarations for every type the class reaches through a pointer or
//! reference, the namespace-scope declarations of the source wrapped in their
//! preprocessor conditions, and the class itself with every method declared
//! `virtual` (or `static`) and a generated `className()` accessor.
//!
//! ### Design Notes
//! - Output is deterministic: blocks follow a fixed order and declarations
//!   keep source order.
//! - Type spellings are rewritten only through the configured whole-word
//!   aliases; all other text is emitted in its canonical parsed form.
//! - Types that resolve through the configured include map are included, not
//!   forward declared.
//!
//! ## Index
//! - Public API: [`HeaderGenerator`], [`RenderError`], [`GENERATED_BANNER`]
//! - Helpers: [`apply_type_aliases`]

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use header_gen_config::GeneratorConfig;
use header_gen_core::AccessSpecifier;
use header_gen_core::BaseClass;
use header_gen_core::ClassModel;
use header_gen_core::Condition;
use header_gen_core::Declaration;
use header_gen_core::DeclarationKind;
use header_gen_core::EnumModel;
use header_gen_core::ForwardDeclaration;
use header_gen_core::FunctionModel;
use header_gen_core::HeaderFileModel;
use header_gen_core::MethodKind;
use header_gen_core::MethodModel;
use header_gen_core::Parameter;
use header_gen_core::VariableModel;
use header_gen_core::is_fundamental_type;
use thiserror::Error;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// First line of every generated header.
pub const GENERATED_BANNER: &str = "// This file is @generated by header-gen. DO NOT EDIT.";

/// Errors raised by the header generator.
///
/// # Invariants
/// - Variant meanings are stable for automation and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The header model has no class definition to render.
    #[error("header {header} has no class definition")]
    MissingClass {
        /// Header display name.
        header: String,
    },
}

/// Header generator bound to one header model.
///
/// # Invariants
/// - Rendering is deterministic for a fixed model and configuration.
///
/// # Examples
/// ```
/// use header_gen_config::GeneratorConfig;
/// use header_gen_core::ParseOptions;
/// use header_gen_core::parse_header;
/// use header_gen_render::HeaderGenerator;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let model = parse_header("class Widget { public: int size() const; };", &ParseOptions::default())?;
/// let config = GeneratorConfig::default();
/// let header = HeaderGenerator::new(&model, &config).generate_header()?;
/// assert!(header.contains("\tvirtual int size() const;"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HeaderGenerator<'a> {
    /// Parsed header being rendered.
    model: &'a HeaderFileModel,
    /// Generator configuration.
    config: &'a GeneratorConfig,
}

impl<'a> HeaderGenerator<'a> {
    /// Creates a generator for `model`.
    #[must_use]
    pub const fn new(model: &'a HeaderFileModel, config: &'a GeneratorConfig) -> Self {
        Self {
            model,
            config,
        }
    }

    /// Generates the header text.
    ///
    /// # Errors
    /// Returns [`RenderError::MissingClass`] when the model has no class.
    pub fn generate_header(&self) -> Result<String, RenderError> {
        let class = self.model.class_model().ok_or_else(|| RenderError::MissingClass {
            header: self.model.name.clone(),
        })?;

        let mut blocks = Vec::new();
        blocks.push(self.render_preamble());
        push_block(&mut blocks, self.system_includes().join("\n"));
        push_block(&mut blocks, self.project_includes(class).join("\n"));

        let forward = self.class_forward_declarations(class);
        push_block(
            &mut blocks,
            forward.iter().map(|declaration| declaration.render()).collect::<Vec<_>>().join("\n"),
        );
        let emitted: BTreeSet<String> =
            forward.iter().map(|declaration| declaration.qualified_name()).collect();

        let declarations = self.model.declarations.iter().filter(|declaration| {
            match &declaration.kind {
                DeclarationKind::Function(_) => false,
                DeclarationKind::ForwardDeclaration(forward) => {
                    !emitted.contains(&forward.qualified_name())
                }
                _ => true,
            }
        });
        for (conditions, group) in group_by_conditions(declarations) {
            push_block(&mut blocks, wrap_conditions(conditions, &render_scoped(&group)));
        }

        let class_block = self.render_class(class);
        blocks.push(wrap_conditions(&class.conditions, &wrap_namespaces(&class.scope, &class_block)));

        let functions = self
            .model
            .declarations
            .iter()
            .filter(|declaration| matches!(declaration.kind, DeclarationKind::Function(_)));
        for (conditions, group) in group_by_conditions(functions) {
            push_block(&mut blocks, wrap_conditions(conditions, &render_scoped(&group)));
        }

        let mut out = blocks.join("\n\n");
        out.push('\n');
        Ok(out)
    }

    // ------------------------------------------------------------------------
    // Preamble and includes
    // ------------------------------------------------------------------------

    /// Renders the banner lines and `#pragma once`.
    fn render_preamble(&self) -> String {
        if !self.config.output.banner {
            return "#pragma once".to_string();
        }
        format!("{GENERATED_BANNER}\n// Source: {}\n#pragma once", self.model.name)
    }

    /// Returns the `<...>` include lines, configured defaults first.
    fn system_includes(&self) -> Vec<String> {
        let mut includes = IncludeSet::default();
        let present: BTreeSet<&str> = self
            .model
            .includes()
            .iter()
            .filter(|include| include.system)
            .map(|include| include.path.as_str())
            .collect();
        for path in &self.config.output.default_system_includes {
            if !present.contains(path.as_str()) {
                includes.push_system(path);
            }
        }
        for include in self.model.includes().iter().filter(|include| include.system) {
            includes.push_system(&include.path);
        }
        includes.lines
    }

    /// Returns the `"..."` include lines.
    ///
    /// Order: source includes, then mapped forward-declared types, then mapped
    /// return types, then mapped parameter types, then one include per base.
    fn project_includes(&self, class: &ClassModel) -> Vec<String> {
        let mut includes = IncludeSet::default();
        for include in self.model.includes().iter().filter(|include| !include.system) {
            includes.push_project(&include.path);
        }
        for declaration in &class.forward_declarations {
            if let Some(path) = self.config.types.include_for(&declaration.qualified_name()) {
                includes.push_project(path);
            }
        }
        for method in &class.methods {
            for word in type_words(&method.return_type) {
                if let Some(path) = self.config.types.include_for(word) {
                    includes.push_project(path);
                }
            }
        }
        for method in &class.methods {
            for parameter in &method.parameters {
                for word in type_words(&parameter.type_name) {
                    if let Some(path) = self.config.types.include_for(word) {
                        includes.push_project(path);
                    }
                }
            }
        }
        for base in &class.base_classes {
            includes.push_project(&base_include(base));
        }
        includes.lines
    }

    /// Returns the class forward declarations not satisfied by an include.
    fn class_forward_declarations(&self, class: &'a ClassModel) -> Vec<&'a ForwardDeclaration> {
        class
            .forward_declarations
            .iter()
            .filter(|declaration| {
                self.config.types.include_for(&declaration.qualified_name()).is_none()
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // Class
    // ------------------------------------------------------------------------

    /// Renders the class definition.
    fn render_class(&self, class: &ClassModel) -> String {
        let aliases = &self.config.types.aliases;
        let mut out = String::new();
        out.push_str(class.keyword.as_str());
        out.push(' ');
        out.push_str(&class.name);
        if class.is_final {
            out.push_str(" final");
        }
        if !class.base_classes.is_empty() {
            out.push_str(" : ");
            out.push_str(&class.base_classes.iter().map(render_base).collect::<Vec<_>>().join(", "));
        }
        out.push_str("\n{\n");
        out.push_str(AccessSpecifier::Public.label());
        out.push('\n');

        let mut sections: Vec<String> = Vec::new();
        let friends: Vec<String> =
            class.friend_declarations.iter().map(|friend| format!("\t{friend}")).collect();
        push_block(&mut sections, friends.join("\n"));
        let class_aliases: Vec<String> =
            class.aliases.iter().map(|alias| format!("\t{alias}")).collect();
        push_block(&mut sections, class_aliases.join("\n"));
        let enums: Vec<String> = class.enums.iter().map(|model| indent(&render_enum(model))).collect();
        push_block(&mut sections, enums.join("\n"));
        if !class.methods.iter().any(|method| method.name == "className") {
            let specifier = if class.base_classes.is_empty() { "" } else { " override" };
            sections.push(format!(
                "\tvirtual std::string className() const{specifier} {{return \"{}\";}}",
                class.name
            ));
        }

        let mut access = AccessSpecifier::Public;
        let mut methods = Vec::new();
        for method in &class.methods {
            if method.access != access {
                access = method.access;
                methods.push(access.label().to_string());
            }
            methods.push(render_method(class, method, aliases));
        }
        push_block(&mut sections, methods.join("\n"));

        let mut members = Vec::new();
        for level in AccessSpecifier::ALL {
            for variable in class.member_variables_with(level) {
                if level != access {
                    access = level;
                    members.push(access.label().to_string());
                }
                members.push(format!("\t{}", render_variable(variable, aliases)));
            }
        }
        push_block(&mut sections, members.join("\n"));

        if !sections.is_empty() {
            out.push_str(&sections.join("\n\n"));
            out.push('\n');
        }
        out.push_str("};");
        out
    }
}

// ============================================================================
// SECTION: Include Helpers
// ============================================================================

/// Ordered, deduplicated include lines.
#[derive(Debug, Default)]
struct IncludeSet {
    /// Paths already emitted.
    seen: BTreeSet<String>,
    /// Rendered directives in insertion order.
    lines: Vec<String>,
}

impl IncludeSet {
    /// Adds `#include <path>` unless already present.
    fn push_system(&mut self, path: &str) {
        if self.seen.insert(path.to_string()) {
            self.lines.push(format!("#include <{path}>"));
        }
    }

    /// Adds `#include "path"` unless already present.
    fn push_project(&mut self, path: &str) {
        if self.seen.insert(path.to_string()) {
            self.lines.push(format!("#include \"{path}\""));
        }
    }
}

/// Returns the include path for a base class: its unqualified name plus `.h`.
fn base_include(base: &BaseClass) -> String {
    let name = base.name.rsplit("::").next().unwrap_or(&base.name);
    format!("{name}.h")
}

/// Splits type text into its (possibly qualified) name words.
fn type_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_' || ch == ':'))
        .map(|word| word.trim_matches(':'))
        .filter(|word| !word.is_empty())
}

// ============================================================================
// SECTION: Declaration Rendering
// ============================================================================

/// Appends `block` unless it is empty.
fn push_block(blocks: &mut Vec<String>, block: String) {
    if !block.is_empty() {
        blocks.push(block);
    }
}

/// Groups consecutive declarations that share a condition stack.
fn group_by_conditions<'d>(
    declarations: impl Iterator<Item = &'d Declaration>,
) -> Vec<(&'d [Condition], Vec<&'d Declaration>)> {
    let mut groups: Vec<(&'d [Condition], Vec<&'d Declaration>)> = Vec::new();
    for declaration in declarations {
        match groups.last_mut() {
            Some((conditions, members)) if *conditions == declaration.conditions.as_slice() => {
                members.push(declaration);
            }
            _ => groups.push((declaration.conditions.as_slice(), vec![declaration])),
        }
    }
    groups
}

/// Namespace path a declaration must be wrapped in when rendered.
///
/// Forward declarations render their own namespaces inline.
fn render_scope(declaration: &Declaration) -> &[String] {
    match &declaration.kind {
        DeclarationKind::ForwardDeclaration(_) => &[],
        _ => &declaration.scope,
    }
}

/// Renders declarations, wrapping consecutive runs in their namespaces.
fn render_scoped(declarations: &[&Declaration]) -> String {
    let mut runs: Vec<(&[String], Vec<String>)> = Vec::new();
    for declaration in declarations {
        let scope = render_scope(declaration);
        let text = render_declaration(&declaration.kind);
        match runs.last_mut() {
            Some((current, lines)) if *current == scope => lines.push(text),
            _ => runs.push((scope, vec![text])),
        }
    }
    runs.iter()
        .map(|(scope, lines)| wrap_namespaces(scope, &lines.join("\n")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a namespace-scope declaration.
fn render_declaration(kind: &DeclarationKind) -> String {
    match kind {
        DeclarationKind::ForwardDeclaration(forward) => forward.render(),
        DeclarationKind::Enum(model) => render_enum(model),
        DeclarationKind::Using(text) | DeclarationKind::Typedef(text) => text.clone(),
        DeclarationKind::Variable(variable) => render_variable(variable, &BTreeMap::new()),
        DeclarationKind::Function(function) => render_function(function),
    }
}

/// Wraps `body` in `namespace` blocks for `scope`.
fn wrap_namespaces(scope: &[String], body: &str) -> String {
    if scope.is_empty() {
        return body.to_string();
    }
    let mut out = String::new();
    for namespace in scope {
        out.push_str("namespace ");
        out.push_str(namespace);
        out.push_str(" {\n");
    }
    out.push_str(body);
    for namespace in scope.iter().rev() {
        out.push_str("\n}  // namespace ");
        out.push_str(namespace);
    }
    out
}

/// Wraps `body` in the directives of a condition stack.
fn wrap_conditions(conditions: &[Condition], body: &str) -> String {
    if conditions.is_empty() {
        return body.to_string();
    }
    let mut out = String::new();
    for condition in conditions {
        out.push_str(&condition.opening);
        out.push('\n');
        if let Some(branch) = &condition.branch {
            out.push_str(branch);
            out.push('\n');
        }
    }
    out.push_str(body);
    for _ in conditions {
        out.push_str("\n#endif");
    }
    out
}

/// Renders an enum definition.
fn render_enum(model: &EnumModel) -> String {
    let mut out = String::from("enum ");
    if model.scoped {
        out.push_str("class ");
    }
    out.push_str(&model.name);
    if let Some(underlying) = &model.underlying {
        out.push_str(" : ");
        out.push_str(underlying);
    }
    out.push_str("\n{\n");
    let enumerators: Vec<String> = model
        .enumerators
        .iter()
        .map(|enumerator| match &enumerator.value {
            Some(value) => format!("\t{} = {value}", enumerator.name),
            None => format!("\t{}", enumerator.name),
        })
        .collect();
    out.push_str(&enumerators.join(",\n"));
    if !enumerators.is_empty() {
        out.push('\n');
    }
    out.push_str("};");
    out
}

/// Renders a variable declaration with aliases applied to its type.
fn render_variable(variable: &VariableModel, aliases: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    if variable.is_static {
        out.push_str("static ");
    }
    if variable.is_const {
        out.push_str("const ");
    }
    out.push_str(&apply_type_aliases(&variable.type_name, aliases));
    out.push(' ');
    out.push_str(&variable.name);
    if let Some(initializer) = &variable.initializer {
        if initializer.starts_with('=') {
            out.push(' ');
        }
        out.push_str(initializer);
    }
    out.push(';');
    out
}

/// Renders a namespace-scope function declaration.
fn render_function(function: &FunctionModel) -> String {
    let mut out = String::new();
    for specifier in &function.specifiers {
        out.push_str(specifier);
        out.push(' ');
    }
    if !function.return_type.is_empty() {
        out.push_str(&function.return_type);
        out.push(' ');
    }
    out.push_str(&function.name);
    out.push('(');
    out.push_str(&function.argument_list());
    out.push(')');
    if function.is_noexcept {
        out.push_str(" noexcept");
    }
    out.push(';');
    out
}

// ============================================================================
// SECTION: Class Member Rendering
// ============================================================================

/// Renders one base-specifier.
fn render_base(base: &BaseClass) -> String {
    if base.is_virtual {
        format!("{} virtual {}", base.access.keyword(), base.name)
    } else {
        format!("{} {}", base.access.keyword(), base.name)
    }
}

/// Returns whether the generated declaration carries `override`.
///
/// `init` is overridden whenever the class has a base, unless it takes
/// parameters the source did not mark as an override.
fn method_override(class: &ClassModel, method: &MethodModel) -> bool {
    if method.name == "init" {
        if !method.parameters.is_empty() && !method.has_override {
            return false;
        }
        return !class.base_classes.is_empty();
    }
    method.has_override
}

/// Renders a method declaration line.
fn render_method(
    class: &ClassModel,
    method: &MethodModel,
    aliases: &BTreeMap<String, String>,
) -> String {
    let mut out = String::from("\t");
    for annotation in &method.annotations {
        out.push_str(annotation);
        out.push(' ');
    }
    if method.is_static {
        out.push_str("static ");
    } else if method.kind != MethodKind::Constructor {
        out.push_str("virtual ");
    }
    if method.is_explicit {
        out.push_str("explicit ");
    }
    if !method.return_type.is_empty() {
        out.push_str(&apply_type_aliases(&method.return_type, aliases));
        out.push(' ');
    }
    out.push_str(&method.name);
    out.push('(');
    let parameters: Vec<String> = method
        .parameters
        .iter()
        .map(|parameter| {
            Parameter {
                type_name: apply_type_aliases(&parameter.type_name, aliases),
                ..parameter.clone()
            }
            .render()
        })
        .collect();
    out.push_str(&parameters.join(", "));
    out.push(')');
    if method.is_const {
        out.push_str(" const");
    }
    if method.is_noexcept {
        out.push_str(" noexcept");
    }
    if method_override(class, method) {
        out.push_str(" override");
    }
    if method.is_final {
        out.push_str(" final");
    }
    if let Some(specifier) = method.body_specifier {
        out.push_str(" = ");
        out.push_str(specifier.as_str());
    }
    out.push(';');
    out
}

/// Prefixes every line of `text` with a tab.
fn indent(text: &str) -> String {
    text.lines().map(|line| format!("\t{line}")).collect::<Vec<_>>().join("\n")
}

// ============================================================================
// SECTION: Type Aliases
// ============================================================================

/// Applies whole-word type aliases to canonical type text.
///
/// A word is replaced only when it is not namespace qualified and the next
/// word in the same type is not already a fundamental type, so `long` becomes
/// `long int` while `long double` and `long long` stay unchanged.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
///
/// use header_gen_render::apply_type_aliases;
///
/// let aliases = BTreeMap::from([("long".to_string(), "long int".to_string())]);
/// assert_eq!(apply_type_aliases("const long&", &aliases), "const long int&");
/// assert_eq!(apply_type_aliases("long double", &aliases), "long double");
/// ```
#[must_use]
pub fn apply_type_aliases(text: &str, aliases: &BTreeMap<String, String>) -> String {
    if aliases.is_empty() {
        return text.to_string();
    }
    let words = word_spans(text);
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (index, &(start, end)) in words.iter().enumerate() {
        let word = &text[start .. end];
        let Some(replacement) = aliases.get(word) else {
            continue;
        };
        if text[.. start].ends_with("::") {
            continue;
        }
        let followed_by_fundamental = words.get(index + 1).is_some_and(|&(next_start, next_end)| {
            text[end .. next_start].chars().all(char::is_whitespace)
                && is_fundamental_type(&text[next_start .. next_end])
        });
        if followed_by_fundamental {
            continue;
        }
        out.push_str(&text[cursor .. start]);
        out.push_str(replacement);
        cursor = end;
    }
    out.push_str(&text[cursor ..]);
    out
}

/// Returns the byte ranges of identifier words in `text`.
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (offset, ch) in text.char_indices() {
        let word_char = ch.is_ascii_alphanumeric() || ch == '_';
        match (start, word_char) {
            (None, true) => start = Some(offset),
            (Some(begin), false) => {
                spans.push((begin, offset));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(begin) = start {
        spans.push((begin, text.len()));
    }
    spans
}
