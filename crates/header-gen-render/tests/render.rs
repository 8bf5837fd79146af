// crates/header-gen-render/tests/render.rs
// ============================================================================
// Module: Header Rendering Tests
// Description: Behavior tests for includes, class layout, and method rules.
// Purpose: Pin the generator's ordering and formatting decisions.
// Dependencies: header-gen-core, header-gen-config, header-gen-render
// ============================================================================

//! ## Overview
//! Each test parses a small header, renders it, and asserts on the output.

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

use std::collections::BTreeMap;

use header_gen_config::GeneratorConfig;
use header_gen_core::HeaderFileModel;
use header_gen_core::ParseError;
use header_gen_core::ParseOptions;
use header_gen_core::parse_header;
use header_gen_render::GENERATED_BANNER;
use header_gen_render::HeaderGenerator;
use header_gen_render::RenderError;
use header_gen_render::apply_type_aliases;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn parse(input: &str) -> HeaderFileModel {
    let mut model = parse_header(input, &ParseOptions::default()).expect("parse");
    model.name = "Input.h".to_string();
    model
}

fn render_with(input: &str, config: &GeneratorConfig) -> String {
    let model = parse(input);
    HeaderGenerator::new(&model, config).generate_header().expect("render")
}

fn render(input: &str) -> String {
    render_with(input, &GeneratorConfig::default())
}

fn without_banner() -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.output.banner = false;
    config
}

// ============================================================================
// SECTION: Layout
// ============================================================================

#[test]
fn renders_namespaced_class_layout() {
    let input = "#include <string>\n\
                 namespace app {\n\
                 class Widget : public Base\n\
                 {\n\
                 public:\n\
                 \tWidget();\n\
                 \texplicit Widget(int size);\n\
                 \t~Widget();\n\
                 \tvoid init();\n\
                 protected:\n\
                 \tlong double total() const noexcept;\n\
                 private:\n\
                 \tstatic int count;\n\
                 \tGadget* gadget;\n\
                 };\n\
                 }\n";
    let expected = "#pragma once\n\
                    \n\
                    #include <string>\n\
                    \n\
                    #include \"Base.h\"\n\
                    \n\
                    class Gadget;\n\
                    \n\
                    namespace app {\n\
                    class Widget : public Base\n\
                    {\n\
                    public:\n\
                    \tvirtual std::string className() const override {return \"Widget\";}\n\
                    \n\
                    \tWidget();\n\
                    \texplicit Widget(int size);\n\
                    \tvirtual ~Widget();\n\
                    \tvirtual void init() override;\n\
                    protected:\n\
                    \tvirtual long double total() const noexcept;\n\
                    private:\n\
                    \tstatic int count;\n\
                    \tGadget* gadget;\n\
                    };\n\
                    }  // namespace app\n";
    assert_eq!(render_with(input, &without_banner()), expected);
}

#[test]
fn banner_names_source_header() {
    let rendered = render("class Empty {};");
    let mut lines = rendered.lines();
    assert_eq!(lines.next(), Some(GENERATED_BANNER));
    assert_eq!(lines.next(), Some("// Source: Input.h"));
    assert_eq!(lines.next(), Some("#pragma once"));
}

#[test]
fn class_without_base_has_no_override_accessor() {
    let rendered = render("struct Plain { int value; };");
    assert!(rendered.contains("\tvirtual std::string className() const {return \"Plain\";}\n"));
    assert!(rendered.contains("struct Plain\n{\npublic:\n"));
}

#[test]
fn declared_class_name_accessor_is_not_duplicated() {
    let rendered = render("class Named { public: std::string className() const; };");
    assert_eq!(rendered.matches("className()").count(), 1);
}

#[test]
fn member_variables_are_grouped_by_access() {
    let input = "class Mixed {\n\
                 public:\n\
                 \tint first;\n\
                 private:\n\
                 \tint hidden;\n\
                 public:\n\
                 \tint second;\n\
                 protected:\n\
                 \tint shared;\n\
                 };";
    let rendered = render(input);
    assert!(rendered.contains(
        "\tint first;\n\tint second;\nprotected:\n\tint shared;\nprivate:\n\tint hidden;\n};"
    ));
}

#[test]
fn class_enums_and_aliases_are_indented() {
    let input = "class Holder {\n\
                 public:\n\
                 \tusing Size = unsigned;\n\
                 \tenum Mode { Fast = 1, Slow };\n\
                 \tMode mode() const;\n\
                 };";
    let rendered = render(input);
    assert!(rendered.contains("\tusing Size = unsigned;\n\n\tenum Mode\n\t{\n\t\tFast = 1,\n\t\tSlow\n\t};\n"));
}

// ============================================================================
// SECTION: Includes and Forward Declarations
// ============================================================================

#[test]
fn default_system_include_is_not_repeated() {
    let rendered = render("#include <vector>\n#include <string>\nclass A {};");
    assert!(rendered.contains("#pragma once\n\n#include <vector>\n#include <string>\n\n"));
    assert_eq!(rendered.matches("#include <string>").count(), 1);
}

#[test]
fn missing_default_system_include_is_prepended() {
    let rendered = render("#include <vector>\nclass A {};");
    assert!(rendered.contains("#include <string>\n#include <vector>\n"));
}

#[test]
fn mapped_types_are_included_not_forward_declared() {
    let mut config = GeneratorConfig::default();
    config.types.includes = BTreeMap::from([
        ("ui::Panel".to_string(), "ui/panel.h".to_string()),
        ("Color".to_string(), "gfx/color.h".to_string()),
    ]);
    let input = "#include \"local.h\"\n\
                 class View : public Widget {\n\
                 public:\n\
                 \tColor color() const;\n\
                 \tvoid attach(ui::Panel* panel, Other* other);\n\
                 };";
    let rendered = render_with(input, &config);
    assert!(rendered.contains(
        "#include \"local.h\"\n#include \"ui/panel.h\"\n#include \"gfx/color.h\"\n#include \"Widget.h\"\n"
    ));
    assert!(rendered.contains("\nclass Other;\n"));
    assert!(!rendered.contains("class Panel;"));
}

#[test]
fn top_level_forward_declaration_is_not_repeated() {
    let input = "class Engine;\nclass Car { public: Engine* engine(); };";
    let rendered = render(input);
    assert_eq!(rendered.matches("class Engine;").count(), 1);
}

// ============================================================================
// SECTION: Conditions
// ============================================================================

#[test]
fn conditional_declarations_keep_their_branch() {
    let input = "#if defined(FAST)\n\
                 const int LIMIT = 10;\n\
                 #else\n\
                 const int LIMIT = 1;\n\
                 #endif\n\
                 class Gate {};";
    let rendered = render(input);
    assert!(rendered.contains("#if defined(FAST)\nconst int LIMIT = 10;\n#endif\n\n"));
    assert!(rendered.contains("#if defined(FAST)\n#else\nconst int LIMIT = 1;\n#endif\n\n"));
}

#[test]
fn conditional_class_is_wrapped_as_a_whole() {
    let input = "#ifdef WITH_DEBUG\nclass Tracer { public: int debugDump() const; };\n#endif\n";
    let rendered = render(input);
    let opening = rendered.find("#ifdef WITH_DEBUG\nclass Tracer").expect("opening");
    let method = rendered.find("\tvirtual int debugDump() const;").expect("method");
    assert!(opening < method);
    assert!(rendered.ends_with("};\n#endif\n"), "rendered: {rendered}");
}

#[test]
fn conditional_members_never_reach_the_generator() {
    let input = "class W { public:\n#ifdef WITH_DEBUG\n int debugDump() const;\n#endif\n int size() \
                 const; };";
    let err = parse_header(input, &ParseOptions::default()).unwrap_err();
    assert!(
        matches!(&err, ParseError::Unsupported { construct, .. }
            if *construct == "conditional compilation in a class body"),
        "got {err:?}"
    );
}

#[test]
fn free_functions_follow_class() {
    let input = "int helper(int value);\nclass Gate {};\nnamespace util { void reset() noexcept; }";
    let rendered = render(input);
    let class_end = rendered.find("};").expect("class end");
    let helper = rendered.find("int helper(int value);").expect("helper");
    assert!(helper > class_end);
    assert!(rendered.ends_with(
        "int helper(int value);\nnamespace util {\nvoid reset() noexcept;\n}  // namespace util\n"
    ));
}

// ============================================================================
// SECTION: Method Rules
// ============================================================================

#[test]
fn init_override_depends_on_parameters_and_base() {
    let with_base = render(
        "class Derived : public Base { public: void init(int level); void start() override; };",
    );
    assert!(with_base.contains("\tvirtual void init(int level);\n"));
    assert!(with_base.contains("\tvirtual void start() override;\n"));

    let explicit = render("class Derived : public Base { public: void init(int level) override; };");
    assert!(explicit.contains("\tvirtual void init(int level) override;\n"));

    let no_base = render("class Root { public: void init(); };");
    assert!(no_base.contains("\tvirtual void init();\n"));
}

#[test]
fn pure_and_deleted_specifiers_are_kept() {
    let rendered =
        render("class Shape { public: double area() const = 0; Shape(const Shape& other) = delete; };");
    assert!(rendered.contains("\tvirtual double area() const = 0;\n"));
    assert!(rendered.contains("\tShape(const Shape& other) = delete;\n"));
}

#[test]
fn annotations_precede_static_keyword() {
    let rendered = render("class Api { public: Unsafe static long count(); };");
    assert!(rendered.contains("\tUnsafe static long int count();\n"));
}

// ============================================================================
// SECTION: Errors and Helpers
// ============================================================================

#[test]
fn model_without_class_is_rejected() {
    let model = parse("int value;");
    let err = HeaderGenerator::new(&model, &GeneratorConfig::default()).generate_header().unwrap_err();
    assert_eq!(
        err,
        RenderError::MissingClass {
            header: "Input.h".to_string(),
        }
    );
    assert_eq!(err.to_string(), "header Input.h has no class definition");
}

#[test]
fn aliases_replace_whole_unqualified_words() {
    let aliases = BTreeMap::from([("long".to_string(), "long int".to_string())]);
    assert_eq!(apply_type_aliases("long", &aliases), "long int");
    assert_eq!(apply_type_aliases("unsigned long*", &aliases), "unsigned long int*");
    assert_eq!(apply_type_aliases("long long", &aliases), "long long int");
    assert_eq!(apply_type_aliases("long int", &aliases), "long int");
    assert_eq!(apply_type_aliases("longer", &aliases), "longer");
    assert_eq!(apply_type_aliases("ns::long", &aliases), "ns::long");
    assert_eq!(apply_type_aliases("std::vector<long>", &aliases), "std::vector<long int>");
}
