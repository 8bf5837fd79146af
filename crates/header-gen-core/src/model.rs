// crates/header-gen-core/src/model.rs
// ============================================================================
// Module: Header Model
// Description: Serializable description of one parsed C++ header.
// Purpose: Carry includes, directives, top-level declarations, and the class
//          definition from the parser to the generator.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The header model is the contract between the parser and the header
//! generator. It records declarations in source order together with the
//! namespace scope and preprocessor conditions that were active when each one
//! was read. Exactly zero or one class definition is held per header.
//!
//! ### Invariants
//! - Class forward declarations are unique and keep first-occurrence order.
//! - Methods and member variables keep source order.
//! - Type and argument text is canonical (see `render_tokens` in the parser),
//!   not the raw whitespace of the input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Access and Keywords
// ============================================================================

/// Member access level inside a class body.
///
/// # Invariants
/// - Serialized labels (`PUBLIC`, `PROTECTED`, `PRIVATE`) are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessSpecifier {
    /// `public:` members.
    Public,
    /// `protected:` members.
    Protected,
    /// `private:` members.
    Private,
}

impl AccessSpecifier {
    /// Access levels in rendering order.
    pub const ALL: [Self; 3] = [Self::Public, Self::Protected, Self::Private];

    /// Returns the stable upper-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Protected => "PROTECTED",
            Self::Private => "PRIVATE",
        }
    }

    /// Returns the C++ keyword for the access level.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }

    /// Returns the access label line content, e.g. `public:`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Public => "public:",
            Self::Protected => "protected:",
            Self::Private => "private:",
        }
    }

    /// Parses a C++ access keyword.
    #[must_use]
    pub fn from_keyword(value: &str) -> Option<Self> {
        match value {
            "public" => Some(Self::Public),
            "protected" => Some(Self::Protected),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

impl fmt::Display for AccessSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword used to introduce a class-like type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKeyword {
    /// `class`, private by default.
    Class,
    /// `struct`, public by default.
    Struct,
}

impl ClassKeyword {
    /// Returns the C++ keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
        }
    }

    /// Returns the implicit member and base access for this keyword.
    #[must_use]
    pub const fn default_access(self) -> AccessSpecifier {
        match self {
            Self::Class => AccessSpecifier::Private,
            Self::Struct => AccessSpecifier::Public,
        }
    }

    /// Parses `class` or `struct`.
    #[must_use]
    pub fn from_keyword(value: &str) -> Option<Self> {
        match value {
            "class" => Some(Self::Class),
            "struct" => Some(Self::Struct),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Type Names
// ============================================================================

/// Built-in and standard fixed-width type names.
const FUNDAMENTAL_TYPES: &[&str] = &[
    "void", "bool", "char", "wchar_t", "char8_t", "char16_t", "char32_t", "short", "int", "long",
    "float", "double", "signed", "unsigned", "auto", "size_t", "ptrdiff_t", "nullptr_t", "int8_t",
    "int16_t", "int32_t", "int64_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t", "intptr_t",
    "uintptr_t",
];

/// Returns true when `word` names a fundamental type.
#[must_use]
pub fn is_fundamental_type(word: &str) -> bool {
    FUNDAMENTAL_TYPES.contains(&word)
}

// ============================================================================
// SECTION: Preprocessor
// ============================================================================

/// `#include` directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Include {
    /// Included path without delimiters.
    pub path: String,
    /// True for `<...>` includes, false for `"..."` includes.
    pub system: bool,
}

impl Include {
    /// Returns the normalized directive text.
    #[must_use]
    pub fn directive(&self) -> String {
        if self.system {
            format!("#include <{}>", self.path)
        } else {
            format!("#include \"{}\"", self.path)
        }
    }
}

/// Preprocessor directive other than `#include`, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessorDirective {
    /// Directive keyword (`ifdef`, `define`, `pragma`, ...).
    pub keyword: String,
    /// Trimmed directive text starting with `#`.
    pub text: String,
    /// 1-based source line.
    pub line: usize,
}

/// Active conditional-compilation frame for a declaration.
///
/// # Invariants
/// - `opening` is an `#if`, `#ifdef`, or `#ifndef` directive.
/// - `branch` is the `#elif`/`#else` directive when inside a later branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    /// Opening directive text.
    pub opening: String,
    /// Branch directive text when not in the first branch.
    pub branch: Option<String>,
}

// ============================================================================
// SECTION: Declarations
// ============================================================================

/// Forward declaration of a class-like type, possibly namespace qualified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForwardDeclaration {
    /// Class keyword used in the declaration.
    pub keyword: ClassKeyword,
    /// Enclosing namespaces, outermost first.
    pub scope: Vec<String>,
    /// Unqualified type name.
    pub name: String,
}

impl ForwardDeclaration {
    /// Builds a `class` forward declaration from a `a::b::Name` spelling.
    #[must_use]
    pub fn from_qualified(keyword: ClassKeyword, qualified: &str) -> Self {
        let mut segments: Vec<String> = qualified
            .split("::")
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        let name = segments.pop().unwrap_or_default();
        Self {
            keyword,
            scope: segments,
            name,
        }
    }

    /// Returns the `a::b::Name` spelling.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        let mut parts = self.scope.clone();
        parts.push(self.name.clone());
        parts.join("::")
    }

    /// Renders the declaration on a single line, wrapped in its namespaces.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for namespace in &self.scope {
            out.push_str("namespace ");
            out.push_str(namespace);
            out.push_str(" { ");
        }
        out.push_str(self.keyword.as_str());
        out.push(' ');
        out.push_str(&self.name);
        out.push(';');
        for _ in &self.scope {
            out.push_str(" }");
        }
        out
    }
}

/// Single enumerator of an enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumerator {
    /// Enumerator name.
    pub name: String,
    /// Explicit value expression, if any.
    pub value: Option<String>,
}

/// Enum definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumModel {
    /// Enum name.
    pub name: String,
    /// True for `enum class` / `enum struct`.
    pub scoped: bool,
    /// Underlying type, if declared.
    pub underlying: Option<String>,
    /// Enumerators in source order.
    pub enumerators: Vec<Enumerator>,
}

/// Function or method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Canonical parameter type.
    pub type_name: String,
    /// Parameter name, absent for unnamed parameters.
    pub name: Option<String>,
    /// Default argument expression, if any.
    pub default_value: Option<String>,
}

impl Parameter {
    /// Renders the parameter as `type name = default`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = self.type_name.clone();
        if let Some(name) = &self.name {
            out.push(' ');
            out.push_str(name);
        }
        if let Some(default) = &self.default_value {
            out.push_str(" = ");
            out.push_str(default);
        }
        out
    }
}

/// Renders a parameter list without the surrounding parentheses.
#[must_use]
pub fn render_parameters(parameters: &[Parameter]) -> String {
    parameters.iter().map(Parameter::render).collect::<Vec<_>>().join(", ")
}

/// Variable declaration (class member or namespace-scope).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableModel {
    /// Access level; namespace-scope variables are `Public`.
    pub access: AccessSpecifier,
    /// True when declared `static`.
    pub is_static: bool,
    /// True when declared with a leading `const`.
    pub is_const: bool,
    /// Canonical type without leading `static`/`const`.
    pub type_name: String,
    /// Variable name, including any array suffix.
    pub name: String,
    /// Initializer text: `= value` or a braced list.
    pub initializer: Option<String>,
}

/// Namespace-scope function declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionModel {
    /// Leading specifiers (`inline`, `static`, `extern`, `constexpr`).
    pub specifiers: Vec<String>,
    /// Canonical return type.
    pub return_type: String,
    /// Function name, possibly qualified or an `operator` name.
    pub name: String,
    /// Parameters in order.
    pub parameters: Vec<Parameter>,
    /// True when declared `noexcept`.
    pub is_noexcept: bool,
}

impl FunctionModel {
    /// Returns the comma-separated parameter list.
    #[must_use]
    pub fn argument_list(&self) -> String {
        render_parameters(&self.parameters)
    }
}

/// Kind of a top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DeclarationKind {
    /// `class X;` / `struct X;`.
    ForwardDeclaration(ForwardDeclaration),
    /// Enum definition.
    Enum(EnumModel),
    /// `using` declaration text.
    Using(String),
    /// `typedef` declaration text.
    Typedef(String),
    /// Namespace-scope variable or constant.
    Variable(VariableModel),
    /// Namespace-scope function declaration.
    Function(FunctionModel),
}

/// Top-level declaration with its namespace scope and active conditions.
///
/// # Invariants
/// - For forward declarations, `scope` equals the forward declaration's own scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Enclosing namespaces, outermost first.
    pub scope: Vec<String>,
    /// Active conditional frames, outermost first.
    pub conditions: Vec<Condition>,
    /// Declaration payload.
    pub kind: DeclarationKind,
}

// ============================================================================
// SECTION: Class Members
// ============================================================================

/// Kind of a class member function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    /// Ordinary member function.
    Method,
    /// Constructor.
    Constructor,
    /// Destructor.
    Destructor,
}

/// Trailing `= ...` specifier on a member function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySpecifier {
    /// `= 0`.
    Pure,
    /// `= default`.
    Default,
    /// `= delete`.
    Delete,
}

impl BodySpecifier {
    /// Returns the C++ spelling without the leading `= `.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pure => "0",
            Self::Default => "default",
            Self::Delete => "delete",
        }
    }
}

/// Class member function declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodModel {
    /// Marker identifiers preceding the declaration (`Unsafe`, `Nowrapper`).
    pub annotations: Vec<String>,
    /// Canonical return type; empty for constructors and destructors.
    pub return_type: String,
    /// Method name.
    pub name: String,
    /// Access level in effect at the declaration.
    pub access: AccessSpecifier,
    /// Member function kind.
    pub kind: MethodKind,
    /// True when declared `static`.
    pub is_static: bool,
    /// True when declared `virtual`.
    pub is_virtual: bool,
    /// True when declared `explicit`.
    pub is_explicit: bool,
    /// True when declared `const`.
    pub is_const: bool,
    /// True when declared `noexcept`.
    pub is_noexcept: bool,
    /// True when declared `override`.
    pub has_override: bool,
    /// True when declared `final`.
    pub is_final: bool,
    /// True when the declaration carried an inline body.
    pub has_inline_body: bool,
    /// Trailing `= 0`, `= default`, or `= delete`.
    pub body_specifier: Option<BodySpecifier>,
    /// Parameters in order.
    pub parameters: Vec<Parameter>,
}

impl MethodModel {
    /// Returns the comma-separated parameter list.
    #[must_use]
    pub fn argument_list(&self) -> String {
        render_parameters(&self.parameters)
    }
}

/// Base class entry in a class head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseClass {
    /// Inheritance access.
    pub access: AccessSpecifier,
    /// True for `virtual` inheritance.
    pub is_virtual: bool,
    /// Canonical base class name.
    pub name: String,
}

/// Class definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassModel {
    /// Class name.
    pub name: String,
    /// `class` or `struct`.
    pub keyword: ClassKeyword,
    /// Enclosing namespaces, outermost first.
    pub scope: Vec<String>,
    /// Active conditional frames at the class head.
    pub conditions: Vec<Condition>,
    /// True when declared `final`.
    pub is_final: bool,
    /// Base classes in declaration order.
    pub base_classes: Vec<BaseClass>,
    /// Member functions in source order.
    pub methods: Vec<MethodModel>,
    /// Member variables in source order.
    pub member_variables: Vec<VariableModel>,
    /// Types referenced through pointers or references, deduplicated.
    pub forward_declarations: Vec<ForwardDeclaration>,
    /// `friend` declaration text.
    pub friend_declarations: Vec<String>,
    /// Member `using` / `typedef` text.
    pub aliases: Vec<String>,
    /// Nested enums.
    pub enums: Vec<EnumModel>,
}

impl ClassModel {
    /// Creates an empty class model.
    #[must_use]
    pub const fn new(name: String, keyword: ClassKeyword) -> Self {
        Self {
            name,
            keyword,
            scope: Vec::new(),
            conditions: Vec::new(),
            is_final: false,
            base_classes: Vec::new(),
            methods: Vec::new(),
            member_variables: Vec::new(),
            forward_declarations: Vec::new(),
            friend_declarations: Vec::new(),
            aliases: Vec::new(),
            enums: Vec::new(),
        }
    }

    /// Appends a member function.
    pub fn add_method(&mut self, method: MethodModel) {
        self.methods.push(method);
    }

    /// Appends a member variable.
    pub fn add_member_variable(&mut self, variable: VariableModel) {
        self.member_variables.push(variable);
    }

    /// Records a referenced type unless it is already present.
    pub fn add_forward_declaration(&mut self, declaration: ForwardDeclaration) {
        if !self.forward_declarations.contains(&declaration) {
            self.forward_declarations.push(declaration);
        }
    }

    /// Appends a friend declaration.
    pub fn add_friend_declaration(&mut self, declaration: String) {
        self.friend_declarations.push(declaration);
    }

    /// Returns the first base class name, if any.
    #[must_use]
    pub fn base_class(&self) -> Option<&str> {
        self.base_classes.first().map(|base| base.name.as_str())
    }

    /// Returns true when the class declares an `init` method.
    #[must_use]
    pub fn has_init_method(&self) -> bool {
        self.methods.iter().any(|method| method.name == "init")
    }

    /// Returns the member variables declared with `access`.
    pub fn member_variables_with(
        &self,
        access: AccessSpecifier,
    ) -> impl Iterator<Item = &VariableModel> {
        self.member_variables.iter().filter(move |variable| variable.access == access)
    }
}

// ============================================================================
// SECTION: Header Model
// ============================================================================

/// Parsed header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFileModel {
    /// Header display name (usually the file name).
    pub name: String,
    /// Include guard macro when the header uses `#ifndef`/`#define` guards.
    pub include_guard: Option<String>,
    /// `#include` directives in source order.
    pub includes: Vec<Include>,
    /// Other preprocessor directives in source order.
    pub statements: Vec<PreprocessorDirective>,
    /// Top-level declarations in source order.
    pub declarations: Vec<Declaration>,
    /// The class definition, if the header has one.
    pub class: Option<ClassModel>,
}

impl HeaderFileModel {
    /// Creates an empty model for the named header.
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            name,
            include_guard: None,
            includes: Vec::new(),
            statements: Vec::new(),
            declarations: Vec::new(),
            class: None,
        }
    }

    /// Returns the class definition, if any.
    #[must_use]
    pub const fn class_model(&self) -> Option<&ClassModel> {
        self.class.as_ref()
    }

    /// Returns the includes in source order.
    #[must_use]
    pub fn includes(&self) -> &[Include] {
        &self.includes
    }

    /// Returns the non-include directives in source order.
    #[must_use]
    pub fn statements(&self) -> &[PreprocessorDirective] {
        &self.statements
    }

    /// Returns the top-level `typedef` texts.
    pub fn typedefs(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().filter_map(|declaration| match &declaration.kind {
            DeclarationKind::Typedef(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Returns the top-level `using` texts.
    pub fn using_declarations(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().filter_map(|declaration| match &declaration.kind {
            DeclarationKind::Using(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Returns the top-level forward declarations.
    pub fn forward_declarations(&self) -> impl Iterator<Item = &ForwardDeclaration> {
        self.declarations.iter().filter_map(|declaration| match &declaration.kind {
            DeclarationKind::ForwardDeclaration(forward) => Some(forward),
            _ => None,
        })
    }

    /// Returns the top-level enums.
    pub fn enums(&self) -> impl Iterator<Item = &EnumModel> {
        self.declarations.iter().filter_map(|declaration| match &declaration.kind {
            DeclarationKind::Enum(model) => Some(model),
            _ => None,
        })
    }

    /// Returns the namespace-scope variables and constants.
    pub fn constants(&self) -> impl Iterator<Item = &VariableModel> {
        self.declarations.iter().filter_map(|declaration| match &declaration.kind {
            DeclarationKind::Variable(variable) => Some(variable),
            _ => None,
        })
    }

    /// Returns the namespace-scope functions.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionModel> {
        self.declarations.iter().filter_map(|declaration| match &declaration.kind {
            DeclarationKind::Function(function) => Some(function),
            _ => None,
        })
    }
}
