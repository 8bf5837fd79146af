// crates/header-gen-core/tests/parser.rs
// ============================================================================
// Module: Header Parser Tests
// Description: Declaration coverage and structured failures for the parser.
// Purpose: Pin parse results for each supported form and every error path.
// Dependencies: header-gen-core
// ============================================================================

//! ## Overview
//! Integration tests for [`header_gen_core::parse_header`]. Each supported
//! declaration form is parsed from a small snippet, and each unsupported or
//! malformed form is checked for the exact [`ParseError`] it raises.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use header_gen_core::AccessSpecifier;
use header_gen_core::BodySpecifier;
use header_gen_core::ClassKeyword;
use header_gen_core::DeclarationKind;
use header_gen_core::HeaderFileModel;
use header_gen_core::MAX_NESTING;
use header_gen_core::MethodKind;
use header_gen_core::ParseError;
use header_gen_core::ParseOptions;
use header_gen_core::parse_header;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn parse(input: &str) -> Result<HeaderFileModel, ParseError> {
    parse_header(input, &ParseOptions::default())
}

// ============================================================================
// SECTION: Declarations
// ============================================================================

#[test]
fn include_guard_is_recorded_separately() -> Result<(), ParseError> {
    let model = parse("#ifndef WIDGET_H\n#define WIDGET_H\nclass Widget {};\n#endif\n")?;
    assert_eq!(model.include_guard.as_deref(), Some("WIDGET_H"));
    assert!(model.statements().is_empty());
    let class = model.class_model().expect("class");
    assert!(class.conditions.is_empty());
    Ok(())
}

#[test]
fn includes_are_normalized() -> Result<(), ParseError> {
    let model = parse("#  include   < vector >\n#include \"local.h\"\n#include MACRO_PATH\n")?;
    let includes: Vec<String> = model.includes().iter().map(|include| include.directive()).collect();
    assert_eq!(includes, vec!["#include <vector>", "#include \"local.h\""]);
    assert_eq!(model.statements().len(), 1);
    assert_eq!(model.statements()[0].keyword, "include");
    Ok(())
}

#[test]
fn nested_namespace_syntax_sets_scope() -> Result<(), ParseError> {
    let model = parse("namespace a::b { class Inner; int counter = 0; }")?;
    assert_eq!(model.declarations.len(), 2);
    for declaration in &model.declarations {
        assert_eq!(declaration.scope, vec!["a".to_string(), "b".to_string()]);
    }
    Ok(())
}

#[test]
fn else_branch_is_recorded_on_condition() -> Result<(), ParseError> {
    let model = parse("#if A\nint first = 1;\n#else\nint second = 2;\n#endif\n")?;
    assert_eq!(model.declarations[0].conditions[0].branch, None);
    assert_eq!(model.declarations[1].conditions[0].opening, "#if A");
    assert_eq!(model.declarations[1].conditions[0].branch.as_deref(), Some("#else"));
    Ok(())
}

#[test]
fn struct_members_default_to_public_and_class_to_private() -> Result<(), ParseError> {
    let model = parse("struct Point { int x; };")?;
    let class = model.class_model().expect("class");
    assert_eq!(class.keyword, ClassKeyword::Struct);
    assert_eq!(class.member_variables[0].access, AccessSpecifier::Public);

    let model = parse("class Secret { int x; protected: int y; };")?;
    let class = model.class_model().expect("class");
    assert_eq!(class.member_variables[0].access, AccessSpecifier::Private);
    assert_eq!(class.member_variables[1].access, AccessSpecifier::Protected);
    Ok(())
}

#[test]
fn constructors_destructors_and_body_specifiers() -> Result<(), ParseError> {
    let input = "class Widget : public virtual Base, private Mixin {\n\
                 public:\n\
                 explicit Widget(int size) : size_(size), items_{} { grow(); }\n\
                 virtual ~Widget() = default;\n\
                 Widget(const Widget&) = delete;\n\
                 virtual void draw() const noexcept = 0;\n\
                 void init() override;\n\
                 int size() const { return size_; }\n\
                 private:\n\
                 int size_;\n\
                 };";
    let model = parse(input)?;
    let class = model.class_model().expect("class");
    assert_eq!(class.base_classes.len(), 2);
    assert!(class.base_classes[0].is_virtual);
    assert_eq!(class.base_classes[1].access, AccessSpecifier::Private);

    let kinds: Vec<MethodKind> = class.methods.iter().map(|method| method.kind).collect();
    assert_eq!(
        kinds,
        vec![
            MethodKind::Constructor,
            MethodKind::Destructor,
            MethodKind::Constructor,
            MethodKind::Method,
            MethodKind::Method,
            MethodKind::Method,
        ]
    );
    assert!(class.methods[0].is_explicit);
    assert!(class.methods[0].has_inline_body);
    assert_eq!(class.methods[1].name, "~Widget");
    assert_eq!(class.methods[1].body_specifier, Some(BodySpecifier::Default));
    assert_eq!(class.methods[2].body_specifier, Some(BodySpecifier::Delete));
    assert_eq!(class.methods[2].argument_list(), "const Widget&");
    assert_eq!(class.methods[3].body_specifier, Some(BodySpecifier::Pure));
    assert!(class.methods[3].is_noexcept);
    assert!(class.methods[4].has_override);
    assert!(class.has_init_method());
    assert!(class.methods[5].has_inline_body);
    assert_eq!(class.member_variables[0].access, AccessSpecifier::Private);
    assert!(class.forward_declarations.is_empty());
    Ok(())
}

#[test]
fn member_variables_keep_arrays_initializers_and_qualifiers() -> Result<(), ParseError> {
    let model = parse(
        "struct Table { static const int rows = 4; char name[32]; std::vector<int> cells{1, 2}; };",
    )?;
    let class = model.class_model().expect("class");
    let rows = &class.member_variables[0];
    assert!(rows.is_static);
    assert!(rows.is_const);
    assert_eq!(rows.type_name, "int");
    assert_eq!(rows.initializer.as_deref(), Some("= 4"));
    assert_eq!(class.member_variables[1].name, "name[32]");
    assert_eq!(class.member_variables[2].type_name, "std::vector<int>");
    assert_eq!(class.member_variables[2].initializer.as_deref(), Some("{1, 2}"));
    Ok(())
}

#[test]
fn class_scope_aliases_enums_and_forward_declarations() -> Result<(), ParseError> {
    let model = parse(
        "class Holder {\n\
         using Map = std::map<int, int>;\n\
         typedef int Id;\n\
         enum Color : unsigned char { Red = 1, Green };\n\
         class Detail;\n\
         Detail* detail;\n\
         };",
    )?;
    let class = model.class_model().expect("class");
    assert_eq!(class.aliases, vec!["using Map = std::map<int, int>;", "typedef int Id;"]);
    assert_eq!(class.enums[0].underlying.as_deref(), Some("unsigned char"));
    assert!(!class.enums[0].scoped);
    assert_eq!(class.enums[0].enumerators[0].value.as_deref(), Some("1"));
    assert_eq!(class.enums[0].enumerators[1].value, None);
    let names: Vec<String> =
        class.forward_declarations.iter().map(|forward| forward.qualified_name()).collect();
    assert_eq!(names, vec!["Detail"]);
    Ok(())
}

#[test]
fn referenced_types_skip_std_templates_fundamentals_and_self() -> Result<(), ParseError> {
    let model = parse(
        "class Node {\n\
         void link(Node* next, std::string& name, int* raw, Pool<Node>* pool, const ns::Peer& peer);\n\
         Node& self();\n\
         };",
    )?;
    let class = model.class_model().expect("class");
    let names: Vec<String> =
        class.forward_declarations.iter().map(|forward| forward.qualified_name()).collect();
    assert_eq!(names, vec!["ns::Peer"]);
    Ok(())
}

#[test]
fn annotations_are_only_configured_markers() -> Result<(), ParseError> {
    let options = ParseOptions {
        annotations: vec!["Exported".to_string()],
        ..ParseOptions::default()
    };
    let model = parse_header("class A { Exported int run(); Unsafe int stop(); };", &options)?;
    let class = model.class_model().expect("class");
    assert_eq!(class.methods[0].annotations, vec!["Exported".to_string()]);
    assert_eq!(class.methods[0].return_type, "int");
    assert!(class.methods[1].annotations.is_empty());
    assert_eq!(class.methods[1].return_type, "Unsafe int");
    Ok(())
}

#[test]
fn free_functions_keep_specifiers_and_operators() -> Result<(), ParseError> {
    let model = parse(
        "inline int twice(int value) { return value * 2; }\n\
         bool operator==(const A& lhs, const A& rhs) noexcept;\n\
         void variadic(const char* format, ...);\n\
         void nothing(void);",
    )?;
    let functions: Vec<_> = model.functions().collect();
    assert_eq!(functions.len(), 4);
    assert_eq!(functions[0].specifiers, vec!["inline".to_string()]);
    assert_eq!(functions[1].name, "operator==");
    assert!(functions[1].is_noexcept);
    assert_eq!(functions[2].argument_list(), "const char* format, ...");
    assert!(functions[3].parameters.is_empty());
    Ok(())
}

#[test]
fn unnamed_parameters_and_qualified_types() -> Result<(), ParseError> {
    let model = parse("struct S { void f(int, const std::string&, unsigned count, std::size_t); };")?;
    let class = model.class_model().expect("class");
    let parameters = &class.methods[0].parameters;
    assert_eq!(parameters[0].name, None);
    assert_eq!(parameters[1].type_name, "const std::string&");
    assert_eq!(parameters[1].name, None);
    assert_eq!(parameters[2].name.as_deref(), Some("count"));
    assert_eq!(parameters[3].type_name, "std::size_t");
    assert_eq!(parameters[3].name, None);
    Ok(())
}

#[test]
fn forward_declaration_with_qualified_name() -> Result<(), ParseError> {
    let model = parse("namespace outer { class inner::Type; }")?;
    match &model.declarations[0].kind {
        DeclarationKind::ForwardDeclaration(forward) => {
            assert_eq!(forward.qualified_name(), "outer::inner::Type");
            assert_eq!(model.declarations[0].scope, forward.scope);
        }
        other => panic!("unexpected declaration: {other:?}"),
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

#[test]
fn rejects_second_class_definition() {
    let err = parse("class A {};\nclass B {};").unwrap_err();
    assert_eq!(
        err,
        ParseError::MultipleClasses {
            name: "B".to_string(),
            line: 2,
            column: 7,
        }
    );
}

#[test]
fn rejects_nested_class_definition() {
    let err = parse("class Outer {\n  struct Inner { int x; };\n};").unwrap_err();
    assert_eq!(
        err,
        ParseError::NestedClass {
            name: "Inner".to_string(),
            line: 2,
            column: 10,
        }
    );
}

#[test]
fn rejects_method_without_return_type() {
    let err = parse("class A {\n  compute(int x);\n};").unwrap_err();
    assert_eq!(
        err,
        ParseError::MissingReturnType {
            name: "compute".to_string(),
            line: 2,
            column: 3,
        }
    );
}

#[test]
fn rejects_unsupported_constructs() {
    let cases = [
        ("template <typename T> class Box {};", "template declaration"),
        ("namespace { int hidden; }", "anonymous namespace"),
        ("int a, b;", "multiple declarators"),
        ("struct Flags { unsigned bit : 1; };", "bit-field"),
        ("auto run() -> int;", "trailing return type"),
        ("void (*callback)(int);", "function pointer declarator"),
        ("extern \"C\" { void c_api(); }", "linkage specification"),
        ("namespace fs = std::filesystem;", "namespace alias"),
        (
            "class W {\npublic:\n#ifdef WITH_DEBUG\n  int debugDump() const;\n#endif\n};",
            "conditional compilation in a class body",
        ),
    ];
    for (input, expected) in cases {
        match parse(input) {
            Err(ParseError::Unsupported {
                construct, ..
            }) => assert_eq!(construct, expected, "input: {input}"),
            other => panic!("expected unsupported `{expected}` for {input}, got {other:?}"),
        }
    }
}

#[test]
fn rejects_unbalanced_and_unterminated_conditionals() {
    let err = parse("int a;\n#endif\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnbalancedConditional {
            directive: "#endif".to_string(),
            line: 2,
            column: 1,
        }
    );
    let err = parse("#ifdef FEATURE\nint a;\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnterminatedConditional {
            directive: "#ifdef FEATURE".to_string(),
            line: 1,
            column: 1,
        }
    );
}

#[test]
fn class_body_conditionals_are_rejected_with_position() {
    let input = "class W {\npublic:\n  #ifdef WITH_DEBUG\n  int debugDump() const;\n  #endif\n  int \
                 size() const;\n};";
    let err = parse(input).unwrap_err();
    assert_eq!(
        err,
        ParseError::Unsupported {
            construct: "conditional compilation in a class body",
            line: 3,
            column: 3,
        }
    );
    assert_eq!(
        err.to_string(),
        "unsupported construct: conditional compilation in a class body at 3:3"
    );
}

#[test]
fn class_body_keeps_non_conditional_directives() -> Result<(), ParseError> {
    let model = parse("class W {\n#pragma pack(1)\n  int size;\n};\n")?;
    let class = model.class_model().unwrap();
    assert_eq!(class.member_variables.len(), 1);
    assert_eq!(model.statements().len(), 1);
    assert_eq!(model.statements()[0].text, "#pragma pack(1)");
    Ok(())
}

#[test]
fn positioned_errors_end_with_line_and_column() {
    let cases = [
        ("int a;\n#endif\n", "`#endif` has no matching `#if` at 2:1"),
        ("int a;\n  #ifdef FEATURE\nint b;\n", "`#ifdef FEATURE` is never closed at 2:3"),
        ("class A {\n  compute();\n};", "function `compute` has no return type at 2:3"),
    ];
    for (input, expected) in cases {
        assert_eq!(parse(input).unwrap_err().to_string(), expected, "input: {input}");
    }
    let err = ParseError::UnexpectedToken {
        expected: "parameter",
        found: ";".to_string(),
        line: 2,
        column: 11,
    };
    assert_eq!(err.to_string(), "unexpected token `;`, expected parameter at 2:11");
}

#[test]
fn reports_unexpected_tokens_and_end_of_input() {
    let err = parse("class A {\n  int run(;\n};").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { line: 2, .. }), "got {err:?}");
    let err = parse("namespace a {\nint x;").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEof { .. }), "got {err:?}");
    let message = err.to_string();
    assert!(message.starts_with("unexpected end of input, expected "), "message: {message}");
    assert!(message.contains(" at 2:"), "message: {message}");
}

#[test]
fn rejects_excessive_nesting() {
    let depth = MAX_NESTING + 1;
    let input = format!("{}int x;{}", "namespace n { ".repeat(depth), "}".repeat(depth));
    let err = parse(&input).unwrap_err();
    assert!(
        matches!(err, ParseError::NestingTooDeep { max_depth, .. } if max_depth == MAX_NESTING),
        "got {err:?}"
    );
}

#[test]
fn rejects_input_over_size_limit() {
    let options = ParseOptions {
        max_input_bytes: 8,
        ..ParseOptions::default()
    };
    let err = parse_header("int value = 1;", &options).unwrap_err();
    assert_eq!(
        err,
        ParseError::InputTooLarge {
            max_bytes: 8,
            actual_bytes: 14,
        }
    );
}
