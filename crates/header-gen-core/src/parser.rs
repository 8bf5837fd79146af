// crates/header-gen-core/src/parser.rs
// ============================================================================
// Module: Header Parser
// Description: Recursive-descent reader for C++ header declarations.
// Purpose: Build a header model from tokenized header text.
// Dependencies: crate::lexer, crate::model, crate::error
// ============================================================================

//! ## Overview
//! The parser reads the declaration subset of C++ found in plain class
//! headers: includes and other directives, namespaces, forward declarations,
//! enums, aliases, global variables, free functions, and one class
//! definition. Anything outside that subset fails with a positioned
//! [`ParseError`] instead of being guessed at.
//!
//! Security posture: header text is untrusted input. Input size and
//! namespace/class nesting are bounded before and during parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::lexer::Token;
use crate::lexer::TokenKind;
use crate::lexer::render_tokens;
use crate::model::AccessSpecifier;
use crate::model::BaseClass;
use crate::model::BodySpecifier;
use crate::model::ClassKeyword;
use crate::model::ClassModel;
use crate::model::Condition;
use crate::model::Declaration;
use crate::model::DeclarationKind;
use crate::model::EnumModel;
use crate::model::Enumerator;
use crate::model::ForwardDeclaration;
use crate::model::FunctionModel;
use crate::model::HeaderFileModel;
use crate::model::Include;
use crate::model::MethodKind;
use crate::model::MethodModel;
use crate::model::Parameter;
use crate::model::PreprocessorDirective;
use crate::model::VariableModel;
use crate::model::is_fundamental_type;

// ============================================================================
// SECTION: Limits and Options
// ============================================================================

/// Default maximum header size accepted by the parser (4 MiB).
pub const MAX_HEADER_BYTES: usize = 4 * 1024 * 1024;
/// Maximum namespace/class nesting depth.
pub const MAX_NESTING: usize = 32;

/// Specifiers stripped from the front of function declarations.
const FUNCTION_SPECIFIERS: [&str; 6] =
    ["static", "virtual", "inline", "explicit", "constexpr", "extern"];
/// Words that qualify a type without naming it.
const QUALIFIER_WORDS: [&str; 6] = ["const", "volatile", "struct", "class", "enum", "typename"];

/// Parser options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Marker identifiers recognized in front of method declarations.
    pub annotations: Vec<String>,
    /// Maximum accepted input size in bytes.
    pub max_input_bytes: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            annotations: vec!["Unsafe".to_string(), "Nowrapper".to_string()],
            max_input_bytes: MAX_HEADER_BYTES,
        }
    }
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Parses header text into a [`HeaderFileModel`].
///
/// The returned model has an empty name; [`crate::parse_header_file`] names
/// it after the file.
///
/// # Errors
///
/// Returns [`ParseError`] when the input is too large, cannot be tokenized,
/// or contains a declaration outside the supported subset.
pub fn parse_header(input: &str, options: &ParseOptions) -> Result<HeaderFileModel, ParseError> {
    if input.len() > options.max_input_bytes {
        return Err(ParseError::InputTooLarge {
            max_bytes: options.max_input_bytes,
            actual_bytes: input.len(),
        });
    }
    parse_unbounded(input, options)
}

/// Parses header text whose size was already bounded by the caller.
///
/// [`crate::parse_header_file`] limits the raw file bytes; the decoded text
/// may be longer because Latin-1 bytes above 0x7f take two UTF-8 bytes.
pub(crate) fn parse_unbounded(
    input: &str,
    options: &ParseOptions,
) -> Result<HeaderFileModel, ParseError> {
    let tokens = Lexer::new(input).lex()?;
    let mut parser = Parser::new(&tokens, options);
    parser.parse_items(false)?;
    parser.finish()
}

// ============================================================================
// SECTION: Parser State
// ============================================================================

/// Open conditional-compilation frame.
struct ConditionFrame {
    /// Directive texts of the frame.
    condition: Condition,
    /// True for the `#ifndef`/`#define` include guard frame.
    include_guard: bool,
    /// Line of the opening directive.
    line: usize,
    /// Column of the opening directive.
    column: usize,
}

/// Declaration head split into specifiers, type, and name.
struct Head<'t, 'a> {
    /// Recognized annotation markers.
    annotations: Vec<String>,
    /// Leading specifier keywords.
    specifiers: Vec<String>,
    /// Remaining type tokens.
    type_tokens: &'t [Token<'a>],
    /// Declared name, possibly qualified.
    name: String,
    /// Token carrying the unqualified name.
    name_token: Token<'a>,
    /// True for `~Name`.
    is_destructor: bool,
}

/// Parameter list and trailing qualifiers of a function declarator.
#[derive(Default)]
struct Signature<'t, 'a> {
    /// Parsed parameters.
    parameters: Vec<Parameter>,
    /// Type tokens of each parameter.
    parameter_types: Vec<&'t [Token<'a>]>,
    /// Trailing `const`.
    is_const: bool,
    /// Trailing `noexcept`.
    is_noexcept: bool,
    /// Trailing `override`.
    has_override: bool,
    /// Trailing `final`.
    is_final: bool,
    /// Declaration carried a body.
    has_inline_body: bool,
    /// Trailing `= 0|default|delete`.
    body_specifier: Option<BodySpecifier>,
}

/// Recursive-descent parser over a token slice.
struct Parser<'t, 'a> {
    /// Token stream terminated by an end marker.
    tokens: &'t [Token<'a>],
    /// Current token index.
    index: usize,
    /// End-of-input token returned past the end.
    eof: Token<'a>,
    /// Parser options.
    options: &'t ParseOptions,
    /// Model under construction.
    model: HeaderFileModel,
    /// Current namespace path.
    scope: Vec<String>,
    /// Open conditional frames.
    frames: Vec<ConditionFrame>,
    /// Current namespace/class nesting depth.
    nesting: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    /// Creates a parser over the given tokens.
    fn new(tokens: &'t [Token<'a>], options: &'t ParseOptions) -> Self {
        let eof = tokens.last().copied().unwrap_or(Token {
            kind: TokenKind::Eof,
            text: "",
            line: 1,
            column: 1,
        });
        Self {
            tokens,
            index: 0,
            eof,
            options,
            model: HeaderFileModel::new(String::new()),
            scope: Vec::new(),
            frames: Vec::new(),
            nesting: 0,
        }
    }

    /// Verifies every conditional is closed and returns the model.
    fn finish(self) -> Result<HeaderFileModel, ParseError> {
        if let Some(frame) = self.frames.last() {
            return Err(ParseError::UnterminatedConditional {
                directive: frame.condition.opening.clone(),
                line: frame.line,
                column: frame.column,
            });
        }
        Ok(self.model)
    }

    // ------------------------------------------------------------------------
    // Token access
    // ------------------------------------------------------------------------

    /// Returns the current token.
    fn current(&self) -> Token<'a> {
        self.peek(0)
    }

    /// Returns the token `distance` positions ahead.
    fn peek(&self, distance: usize) -> Token<'a> {
        self.tokens.get(self.index + distance).copied().unwrap_or(self.eof)
    }

    /// Returns the token before the current one.
    fn previous(&self) -> Option<Token<'a>> {
        self.index.checked_sub(1).and_then(|index| self.tokens.get(index).copied())
    }

    /// Advances to the next token.
    const fn advance(&mut self) {
        if self.index < self.tokens.len() {
            self.index += 1;
        }
    }

    /// Returns the tokens in `start .. end`.
    fn slice(&self, start: usize, end: usize) -> &'t [Token<'a>] {
        self.tokens.get(start .. end).unwrap_or(&[])
    }

    /// Builds an error for the current token.
    fn unexpected(&self, expected: &'static str) -> ParseError {
        let token = self.current();
        if token.kind == TokenKind::Eof {
            ParseError::UnexpectedEof {
                expected,
                line: token.line,
                column: token.column,
            }
        } else {
            ParseError::UnexpectedToken {
                expected,
                found: token.describe(),
                line: token.line,
                column: token.column,
            }
        }
    }

    /// Consumes the punctuation `value` or fails.
    fn expect_punct(&mut self, value: &str, expected: &'static str) -> Result<(), ParseError> {
        if self.current().is_punct(value) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Consumes an identifier or fails.
    fn expect_ident(&mut self, expected: &'static str) -> Result<Token<'a>, ParseError> {
        let token = self.current();
        if token.kind == TokenKind::Ident {
            self.advance();
            Ok(token)
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Consumes `A::B::C` and returns the last name token and the full spelling.
    fn qualified_name(&mut self) -> Result<(Token<'a>, String), ParseError> {
        let mut token = self.expect_ident("name")?;
        let mut qualified = token.text.to_string();
        while self.current().kind == TokenKind::Scope && self.peek(1).kind == TokenKind::Ident {
            self.advance();
            token = self.current();
            self.advance();
            qualified.push_str("::");
            qualified.push_str(token.text);
        }
        Ok((token, qualified))
    }

    /// Increments nesting depth, failing past [`MAX_NESTING`].
    fn enter_nesting(&mut self) -> Result<(), ParseError> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING {
            let token = self.current();
            return Err(ParseError::NestingTooDeep {
                max_depth: MAX_NESTING,
                line: token.line,
                column: token.column,
            });
        }
        Ok(())
    }

    /// Decrements nesting depth.
    const fn exit_nesting(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    /// Skips a balanced `(...)`, `[...]`, or `{...}` group starting at the
    /// current token and returns it, brackets included.
    ///
    /// A `;` is only accepted inside a brace group, so a missing `)` is
    /// reported where the statement ends.
    fn skip_group(&mut self) -> Result<&'t [Token<'a>], ParseError> {
        let start = self.index;
        let mut closers: Vec<&'static str> = Vec::new();
        loop {
            let token = self.current();
            if token.kind == TokenKind::Eof {
                return Err(self.unexpected(describe_closer(closers.last().copied())));
            }
            if token.kind == TokenKind::Punct {
                match token.text {
                    "(" => closers.push(")"),
                    "[" => closers.push("]"),
                    "{" => closers.push("}"),
                    ")" | "]" | "}" => {
                        if closers.last().copied() != Some(token.text) {
                            return Err(self.unexpected(describe_closer(closers.last().copied())));
                        }
                        closers.pop();
                        if closers.is_empty() {
                            self.advance();
                            return Ok(self.slice(start, self.index));
                        }
                    }
                    ";" if !closers.contains(&"}") => {
                        return Err(self.unexpected(describe_closer(closers.last().copied())));
                    }
                    _ => {}
                }
            }
            self.advance();
        }
    }

    /// Skips `[[...]]` attribute lists.
    fn skip_attributes(&mut self) -> Result<(), ParseError> {
        while self.current().is_punct("[") && self.peek(1).is_punct("[") {
            self.skip_group()?;
        }
        Ok(())
    }

    /// Collects tokens through the next top-level `;` and renders them.
    fn collect_statement(&mut self) -> Result<String, ParseError> {
        let start = self.index;
        let mut depth = 0usize;
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Eof => return Err(self.unexpected("`;`")),
                TokenKind::Directive => return Err(directive_in_declaration(token)),
                TokenKind::Punct => match token.text {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" => depth = depth.saturating_sub(1),
                    ";" if depth == 0 => {
                        self.advance();
                        return Ok(render_tokens(self.slice(start, self.index)));
                    }
                    _ => {}
                },
                _ => {}
            }
            self.advance();
        }
    }

    /// Collects tokens up to a top-level terminator, leaving it current.
    fn collect_until(
        &mut self,
        terminators: &[&str],
        expected: &'static str,
    ) -> Result<&'t [Token<'a>], ParseError> {
        let start = self.index;
        let mut depth = 0usize;
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Eof => return Err(self.unexpected(expected)),
                TokenKind::Directive => return Err(directive_in_declaration(token)),
                TokenKind::Punct => {
                    if depth == 0 && terminators.contains(&token.text) {
                        break;
                    }
                    match token.text {
                        "(" | "[" | "{" => depth += 1,
                        ")" | "]" | "}" => depth = depth.saturating_sub(1),
                        _ => {}
                    }
                }
                _ => {}
            }
            self.advance();
        }
        Ok(self.slice(start, self.index))
    }

    // ------------------------------------------------------------------------
    // Preprocessor
    // ------------------------------------------------------------------------

    /// Returns the non-guard condition stack.
    fn active_conditions(&self) -> Vec<Condition> {
        self.frames
            .iter()
            .filter(|frame| !frame.include_guard)
            .map(|frame| frame.condition.clone())
            .collect()
    }

    /// Handles the current directive token.
    fn directive(&mut self) -> Result<(), ParseError> {
        let token = self.current();
        self.advance();
        let (keyword, rest) = split_directive(token.text);
        let text = token.text.trim().to_string();
        match keyword {
            "include" => {
                if let Some(include) = parse_include(rest) {
                    self.model.includes.push(include);
                    return Ok(());
                }
            }
            "ifndef" if self.is_include_guard(rest) => {
                self.advance();
                self.model.include_guard = Some(rest.to_string());
                self.frames.push(ConditionFrame {
                    condition: Condition {
                        opening: text,
                        branch: None,
                    },
                    include_guard: true,
                    line: token.line,
                    column: token.column,
                });
                return Ok(());
            }
            "if" | "ifdef" | "ifndef" => self.frames.push(ConditionFrame {
                condition: Condition {
                    opening: text.clone(),
                    branch: None,
                },
                include_guard: false,
                line: token.line,
                column: token.column,
            }),
            "elif" | "elifdef" | "elifndef" | "else" => match self.frames.last_mut() {
                Some(frame) => frame.condition.branch = Some(text.clone()),
                None => {
                    return Err(ParseError::UnbalancedConditional {
                        directive: text,
                        line: token.line,
                        column: token.column,
                    });
                }
            },
            "endif" => match self.frames.pop() {
                Some(frame) if frame.include_guard => return Ok(()),
                Some(_) => {}
                None => {
                    return Err(ParseError::UnbalancedConditional {
                        directive: text,
                        line: token.line,
                        column: token.column,
                    });
                }
            },
            _ => {}
        }
        self.model.statements.push(PreprocessorDirective {
            keyword: keyword.to_string(),
            text,
            line: token.line,
        });
        Ok(())
    }

    /// Returns true when `#ifndef name` opens an include guard.
    fn is_include_guard(&self, name: &str) -> bool {
        if self.model.include_guard.is_some()
            || !self.frames.is_empty()
            || !self.model.includes.is_empty()
            || !self.model.statements.is_empty()
            || !self.model.declarations.is_empty()
            || self.model.class.is_some()
            || !is_identifier(name)
        {
            return false;
        }
        let next = self.current();
        if next.kind != TokenKind::Directive {
            return false;
        }
        let (keyword, rest) = split_directive(next.text);
        keyword == "define" && rest == name
    }

    // ------------------------------------------------------------------------
    // Top level
    // ------------------------------------------------------------------------

    /// Parses declarations until end of input or the closing `}` of a namespace.
    fn parse_items(&mut self, in_namespace: bool) -> Result<(), ParseError> {
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Eof if in_namespace => {
                    return Err(self.unexpected("`}` closing the namespace"));
                }
                TokenKind::Eof => return Ok(()),
                TokenKind::Directive => self.directive()?,
                TokenKind::Punct if token.text == ";" => self.advance(),
                TokenKind::Punct if token.text == "}" && in_namespace => {
                    self.advance();
                    return Ok(());
                }
                _ => self.top_level_declaration()?,
            }
        }
    }

    /// Records a top-level declaration in the current scope.
    fn push_declaration(&mut self, kind: DeclarationKind) {
        let declaration = Declaration {
            scope: self.scope.clone(),
            conditions: self.active_conditions(),
            kind,
        };
        self.model.declarations.push(declaration);
    }

    /// Dispatches one namespace-scope declaration.
    fn top_level_declaration(&mut self) -> Result<(), ParseError> {
        self.skip_attributes()?;
        let token = self.current();
        if token.kind == TokenKind::Ident {
            match token.text {
                "namespace" => return self.namespace(),
                "inline" if self.peek(1).is_word("namespace") => {
                    self.advance();
                    return self.namespace();
                }
                "class" | "struct" if self.is_class_head() => return self.top_level_class(),
                "enum" => {
                    let model = self.parse_enum()?;
                    self.push_declaration(DeclarationKind::Enum(model));
                    return Ok(());
                }
                "using" => {
                    let text = self.collect_statement()?;
                    self.push_declaration(DeclarationKind::Using(text));
                    return Ok(());
                }
                "typedef" => {
                    let text = self.collect_statement()?;
                    self.push_declaration(DeclarationKind::Typedef(text));
                    return Ok(());
                }
                "template" => return Err(unsupported(token, "template declaration")),
                "union" => return Err(unsupported(token, "union")),
                "static_assert" => return Err(unsupported(token, "static_assert")),
                "extern" if self.peek(1).kind == TokenKind::Str => {
                    return Err(unsupported(token, "linkage specification"));
                }
                _ => {}
            }
        }
        self.free_declaration()
    }

    /// Parses `namespace a[::b] { ... }`.
    fn namespace(&mut self) -> Result<(), ParseError> {
        let keyword = self.current();
        self.advance();
        if self.current().is_punct("{") {
            return Err(unsupported(keyword, "anonymous namespace"));
        }
        let mut names = vec![self.expect_ident("namespace name")?.text.to_string()];
        while self.current().kind == TokenKind::Scope {
            self.advance();
            if self.current().is_word("inline") {
                self.advance();
            }
            names.push(self.expect_ident("namespace name")?.text.to_string());
        }
        if self.current().is_punct("=") {
            return Err(unsupported(keyword, "namespace alias"));
        }
        self.expect_punct("{", "`{` opening the namespace")?;
        self.enter_nesting()?;
        let depth = self.scope.len();
        self.scope.extend(names);
        let result = self.parse_items(true);
        self.scope.truncate(depth);
        self.exit_nesting();
        result
    }

    /// Returns true when `class`/`struct` at the current token starts a
    /// forward declaration or a definition rather than an elaborated type.
    fn is_class_head(&self) -> bool {
        let mut offset = 1;
        if self.peek(offset).kind != TokenKind::Ident {
            return false;
        }
        while self.peek(offset + 1).kind == TokenKind::Scope
            && self.peek(offset + 2).kind == TokenKind::Ident
        {
            offset += 2;
        }
        let next = self.peek(offset + 1);
        next.is_punct(";") || next.is_punct("{") || next.is_punct(":") || next.is_word("final")
    }

    /// Parses a top-level forward declaration or the class definition.
    fn top_level_class(&mut self) -> Result<(), ParseError> {
        let keyword_token = self.current();
        let keyword = ClassKeyword::from_keyword(keyword_token.text)
            .ok_or_else(|| self.unexpected("`class` or `struct`"))?;
        self.advance();
        let (name_token, qualified) = self.qualified_name()?;
        let qualified_decl = ForwardDeclaration::from_qualified(keyword, &qualified);
        let mut scope = self.scope.clone();
        scope.extend(qualified_decl.scope.iter().cloned());

        if self.current().is_punct(";") {
            self.advance();
            let forward = ForwardDeclaration {
                keyword,
                scope: scope.clone(),
                name: qualified_decl.name,
            };
            self.model.declarations.push(Declaration {
                scope,
                conditions: self.active_conditions(),
                kind: DeclarationKind::ForwardDeclaration(forward),
            });
            return Ok(());
        }

        if self.model.class.is_some() {
            return Err(ParseError::MultipleClasses {
                name: qualified,
                line: name_token.line,
                column: name_token.column,
            });
        }
        let mut class = ClassModel::new(qualified_decl.name, keyword);
        class.scope = scope;
        class.conditions = self.active_conditions();
        self.class_body(&mut class)?;
        self.model.class = Some(class);
        Ok(())
    }

    /// Parses a namespace-scope variable or function.
    fn free_declaration(&mut self) -> Result<(), ParseError> {
        let head = self.collect_head()?;
        let next = self.current();
        if next.is_punct("(") {
            self.reject_function_pointer()?;
            let head = self.split_head(head, true, false)?;
            let signature = self.function_signature()?;
            if head.type_tokens.is_empty() && !head.name.starts_with("operator") {
                return Err(missing_return_type(&head));
            }
            self.push_declaration(DeclarationKind::Function(FunctionModel {
                specifiers: head.specifiers,
                return_type: render_tokens(head.type_tokens),
                name: head.name,
                parameters: signature.parameters,
                is_noexcept: signature.is_noexcept,
            }));
            return Ok(());
        }
        self.reject_declarator_list()?;
        let head = self.split_head(head, false, false)?;
        let variable = self.variable(&head, AccessSpecifier::Public)?;
        self.push_declaration(DeclarationKind::Variable(variable));
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Class body
    // ------------------------------------------------------------------------

    /// Parses `[final] [: bases] { members };` into `class`.
    fn class_body(&mut self, class: &mut ClassModel) -> Result<(), ParseError> {
        if self.current().is_word("final") {
            class.is_final = true;
            self.advance();
        }
        if self.current().is_punct(":") {
            self.advance();
            class.base_classes = self.base_list(class.keyword)?;
        }
        self.expect_punct("{", "`{` opening the class body")?;
        self.enter_nesting()?;
        let mut access = class.keyword.default_access();

        loop {
            self.skip_attributes()?;
            let token = self.current();
            match token.kind {
                TokenKind::Eof => return Err(self.unexpected("`}` closing the class body")),
                TokenKind::Directive => {
                    if is_conditional_directive(split_directive(token.text).0) {
                        return Err(unsupported(token, "conditional compilation in a class body"));
                    }
                    self.directive()?;
                    continue;
                }
                TokenKind::Punct if token.text == "}" => {
                    self.advance();
                    break;
                }
                TokenKind::Punct if token.text == ";" => {
                    self.advance();
                    continue;
                }
                TokenKind::Ident => {
                    if let Some(level) = AccessSpecifier::from_keyword(token.text)
                        && self.peek(1).is_punct(":")
                    {
                        access = level;
                        self.advance();
                        self.advance();
                        continue;
                    }
                    match token.text {
                        "friend" => {
                            let text = self.collect_statement()?;
                            class.add_friend_declaration(text);
                            continue;
                        }
                        "using" | "typedef" => {
                            let text = self.collect_statement()?;
                            class.aliases.push(text);
                            continue;
                        }
                        "enum" => {
                            let model = self.parse_enum()?;
                            class.enums.push(model);
                            continue;
                        }
                        "template" => return Err(unsupported(token, "member template")),
                        "union" => return Err(unsupported(token, "union")),
                        "static_assert" => return Err(unsupported(token, "static_assert")),
                        "class" | "struct" if self.is_class_head() => {
                            self.nested_class(class)?;
                            continue;
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
            self.member(class, access)?;
        }

        self.exit_nesting();
        let after = self.current();
        if after.kind == TokenKind::Ident {
            return Err(unsupported(after, "declarator after class definition"));
        }
        self.expect_punct(";", "`;` after the class definition")
    }

    /// Parses the base-specifier list after `:`.
    fn base_list(&mut self, keyword: ClassKeyword) -> Result<Vec<BaseClass>, ParseError> {
        let mut bases = Vec::new();
        loop {
            let mut access = keyword.default_access();
            let mut is_virtual = false;
            loop {
                let token = self.current();
                if token.is_word("virtual") {
                    is_virtual = true;
                } else if let Some(level) = AccessSpecifier::from_keyword(token.text)
                    && token.kind == TokenKind::Ident
                {
                    access = level;
                } else {
                    break;
                }
                self.advance();
            }
            let name = self.collect_until(&[",", "{"], "`{` opening the class body")?;
            if name.is_empty() {
                return Err(self.unexpected("base class name"));
            }
            bases.push(BaseClass {
                access,
                is_virtual,
                name: render_tokens(name),
            });
            if self.current().is_punct(",") {
                self.advance();
            } else {
                return Ok(bases);
            }
        }
    }

    /// Handles `class X;` inside a class body; nested definitions are rejected.
    fn nested_class(&mut self, class: &mut ClassModel) -> Result<(), ParseError> {
        let keyword = ClassKeyword::from_keyword(self.current().text)
            .ok_or_else(|| self.unexpected("`class` or `struct`"))?;
        self.advance();
        let (name_token, qualified) = self.qualified_name()?;
        if self.current().is_punct(";") {
            self.advance();
            class.add_forward_declaration(ForwardDeclaration::from_qualified(keyword, &qualified));
            return Ok(());
        }
        Err(ParseError::NestedClass {
            name: qualified,
            line: name_token.line,
            column: name_token.column,
        })
    }

    /// Parses one member function or member variable.
    fn member(&mut self, class: &mut ClassModel, access: AccessSpecifier) -> Result<(), ParseError> {
        let head = self.collect_head()?;
        if self.current().is_punct("(") {
            self.reject_function_pointer()?;
            let head = self.split_head(head, true, true)?;
            let signature = self.function_signature()?;
            let kind = if head.is_destructor {
                MethodKind::Destructor
            } else if head.type_tokens.is_empty() && head.name == class.name {
                MethodKind::Constructor
            } else if head.type_tokens.is_empty() && !head.name.starts_with("operator") {
                return Err(missing_return_type(&head));
            } else {
                MethodKind::Method
            };
            note_reference(class, head.type_tokens);
            for tokens in &signature.parameter_types {
                note_reference(class, tokens);
            }
            let has = |word: &str| head.specifiers.iter().any(|specifier| specifier == word);
            let method = MethodModel {
                annotations: head.annotations.clone(),
                return_type: render_tokens(head.type_tokens),
                name: head.name.clone(),
                access,
                kind,
                is_static: has("static"),
                is_virtual: has("virtual"),
                is_explicit: has("explicit"),
                is_const: signature.is_const,
                is_noexcept: signature.is_noexcept,
                has_override: signature.has_override,
                is_final: signature.is_final,
                has_inline_body: signature.has_inline_body,
                body_specifier: signature.body_specifier,
                parameters: signature.parameters,
            };
            class.add_method(method);
            return Ok(());
        }
        self.reject_declarator_list()?;
        let head = self.split_head(head, false, false)?;
        note_reference(class, head.type_tokens);
        let variable = self.variable(&head, access)?;
        class.add_member_variable(variable);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Declarators
    // ------------------------------------------------------------------------

    /// Collects a declaration head up to its declarator boundary.
    ///
    /// The boundary is the first `(`, `;`, `=`, `{`, `[`, `,`, or `:` outside
    /// template angle brackets. An `operator` name is consumed whole.
    fn collect_head(&mut self) -> Result<&'t [Token<'a>], ParseError> {
        let start = self.index;
        let mut angle = 0usize;
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Eof => return Err(self.unexpected("declaration")),
                TokenKind::Directive => return Err(directive_in_declaration(token)),
                TokenKind::Ident if token.text == "operator" && angle == 0 => {
                    self.operator_name()?;
                    break;
                }
                TokenKind::Punct if angle > 0 => match token.text {
                    "<" => angle += 1,
                    ">" => angle -= 1,
                    ";" | "{" | "}" => {
                        return Err(self.unexpected("`>` closing the template argument list"));
                    }
                    _ => {}
                },
                TokenKind::Punct => match token.text {
                    "<" => angle += 1,
                    "(" | ";" | "=" | "{" | "[" | "," | ":" | "}" => break,
                    _ => {}
                },
                _ => {}
            }
            self.advance();
        }
        Ok(self.slice(start, self.index))
    }

    /// Consumes `operator` and its symbol, stopping before the parameter list.
    fn operator_name(&mut self) -> Result<(), ParseError> {
        self.advance();
        if self.current().is_punct("(") && self.peek(1).is_punct(")") {
            self.advance();
            self.advance();
        }
        loop {
            let token = self.current();
            if token.is_punct("(") {
                return Ok(());
            }
            if token.kind == TokenKind::Eof || token.is_punct(";") || token.is_punct("{") {
                return Err(self.unexpected("`(` after the operator name"));
            }
            self.advance();
        }
    }

    /// Splits a declaration head into specifiers, type tokens, and name.
    fn split_head(
        &self,
        head: &'t [Token<'a>],
        is_function: bool,
        allow_annotations: bool,
    ) -> Result<Head<'t, 'a>, ParseError> {
        let (mut rest, name, name_token, is_destructor) =
            split_name(head).ok_or_else(|| self.unexpected("declaration name"))?;
        let mut annotations = Vec::new();
        let mut specifiers = Vec::new();
        while let Some((first, tail)) = rest.split_first() {
            if first.kind != TokenKind::Ident {
                break;
            }
            if allow_annotations
                && !tail.is_empty()
                && self.options.annotations.iter().any(|annotation| annotation == first.text)
            {
                annotations.push(first.text.to_string());
            } else if (is_function && FUNCTION_SPECIFIERS.contains(&first.text))
                || (!is_function && first.text == "static")
            {
                specifiers.push(first.text.to_string());
            } else {
                break;
            }
            rest = tail;
        }
        Ok(Head {
            annotations,
            specifiers,
            type_tokens: rest,
            name,
            name_token,
            is_destructor,
        })
    }

    /// Rejects `R (*name)(...)` declarators.
    fn reject_function_pointer(&self) -> Result<(), ParseError> {
        let next = self.peek(1);
        if next.is_punct("*") || next.is_punct("&") || next.is_punct("^") {
            return Err(unsupported(self.current(), "function pointer declarator"));
        }
        Ok(())
    }

    /// Rejects `a, b;` declarator lists and bit-fields.
    fn reject_declarator_list(&self) -> Result<(), ParseError> {
        let next = self.current();
        if next.is_punct(",") {
            return Err(unsupported(next, "multiple declarators"));
        }
        if next.is_punct(":") {
            return Err(unsupported(next, "bit-field"));
        }
        Ok(())
    }

    /// Parses `(params) qualifiers (; | = spec; | body)`.
    fn function_signature(&mut self) -> Result<Signature<'t, 'a>, ParseError> {
        let group = self.skip_group()?;
        let inner = group.get(1 .. group.len().saturating_sub(1)).unwrap_or(&[]);
        let mut signature = Signature::default();
        for (parameter, type_tokens) in parse_parameters(inner)? {
            signature.parameters.push(parameter);
            signature.parameter_types.push(type_tokens);
        }

        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Ident => match token.text {
                    "const" => signature.is_const = true,
                    "volatile" => {}
                    "override" => signature.has_override = true,
                    "final" => signature.is_final = true,
                    "noexcept" | "throw" => {
                        signature.is_noexcept |= token.text == "noexcept";
                        self.advance();
                        if self.current().is_punct("(") {
                            self.skip_group()?;
                        }
                        continue;
                    }
                    _ => break,
                },
                TokenKind::Punct if token.text == "&" => {}
                TokenKind::Arrow => return Err(unsupported(token, "trailing return type")),
                _ => break,
            }
            self.advance();
        }

        let token = self.current();
        if token.is_punct("=") {
            self.advance();
            let specifier = self.current();
            signature.body_specifier = Some(match (specifier.kind, specifier.text) {
                (TokenKind::Number, "0") => BodySpecifier::Pure,
                (TokenKind::Ident, "default") => BodySpecifier::Default,
                (TokenKind::Ident, "delete") => BodySpecifier::Delete,
                _ => return Err(self.unexpected("`0`, `default`, or `delete`")),
            });
            self.advance();
            self.expect_punct(";", "`;`")?;
        } else if token.is_punct(";") {
            self.advance();
        } else if token.is_punct(":") {
            self.advance();
            self.skip_initializers()?;
            signature.has_inline_body = true;
        } else if token.is_punct("{") {
            self.skip_group()?;
            signature.has_inline_body = true;
        } else {
            return Err(self.unexpected("`;` or a function body"));
        }
        Ok(signature)
    }

    /// Skips a constructor's member-initializer list and body.
    fn skip_initializers(&mut self) -> Result<(), ParseError> {
        loop {
            let token = self.current();
            if token.kind == TokenKind::Eof {
                return Err(self.unexpected("constructor body"));
            }
            if token.is_punct("{") {
                let braced_init = self
                    .previous()
                    .is_some_and(|prev| prev.kind == TokenKind::Ident || prev.is_punct(">"));
                self.skip_group()?;
                if !braced_init {
                    return Ok(());
                }
            } else if token.is_punct("(") {
                self.skip_group()?;
            } else {
                self.advance();
            }
        }
    }

    /// Parses the remainder of a variable declaration after its name.
    fn variable(
        &mut self,
        head: &Head<'t, 'a>,
        access: AccessSpecifier,
    ) -> Result<VariableModel, ParseError> {
        let mut type_tokens = head.type_tokens;
        let is_static = head.specifiers.iter().any(|specifier| specifier == "static");
        let mut is_const = false;
        if let Some((first, tail)) = type_tokens.split_first()
            && first.is_word("const")
        {
            is_const = true;
            type_tokens = tail;
        }
        if type_tokens.is_empty() {
            return Err(ParseError::UnexpectedToken {
                expected: "type name",
                found: head.name.clone(),
                line: head.name_token.line,
                column: head.name_token.column,
            });
        }

        let mut name = head.name.clone();
        while self.current().is_punct("[") {
            let group = self.skip_group()?;
            name.push_str(&render_tokens(group));
        }

        let initializer = if self.current().is_punct("=") {
            self.advance();
            let value = self.collect_until(&[";", ","], "`;`")?;
            if value.is_empty() {
                return Err(self.unexpected("initializer"));
            }
            Some(format!("= {}", render_tokens(value)))
        } else if self.current().is_punct("{") {
            Some(render_tokens(self.skip_group()?))
        } else {
            None
        };

        self.reject_declarator_list()?;
        self.expect_punct(";", "`;`")?;
        Ok(VariableModel {
            access,
            is_static,
            is_const,
            type_name: render_tokens(type_tokens),
            name,
            initializer,
        })
    }

    /// Parses `enum [class|struct] Name [: T] { A, B = v };`.
    fn parse_enum(&mut self) -> Result<EnumModel, ParseError> {
        self.advance();
        let scoped = self.current().is_word("class") || self.current().is_word("struct");
        if scoped {
            self.advance();
        }
        self.skip_attributes()?;
        if self.current().is_punct("{") {
            return Err(unsupported(self.current(), "anonymous enum"));
        }
        let name = self.expect_ident("enum name")?.text.to_string();
        let underlying = if self.current().is_punct(":") {
            self.advance();
            let tokens = self.collect_until(&["{", ";"], "`{` opening the enum body")?;
            if tokens.is_empty() {
                return Err(self.unexpected("underlying type"));
            }
            Some(render_tokens(tokens))
        } else {
            None
        };
        if self.current().is_punct(";") {
            return Err(unsupported(self.current(), "opaque enum declaration"));
        }
        self.expect_punct("{", "`{` opening the enum body")?;

        let mut enumerators = Vec::new();
        while !self.current().is_punct("}") {
            let enumerator = self.expect_ident("enumerator")?;
            let value = if self.current().is_punct("=") {
                self.advance();
                let tokens = self.collect_until(&[",", "}"], "`}` closing the enum body")?;
                if tokens.is_empty() {
                    return Err(self.unexpected("enumerator value"));
                }
                Some(render_tokens(tokens))
            } else {
                None
            };
            enumerators.push(Enumerator {
                name: enumerator.text.to_string(),
                value,
            });
            if self.current().is_punct(",") {
                self.advance();
            } else if !self.current().is_punct("}") {
                return Err(self.unexpected("`,` or `}`"));
            }
        }
        self.advance();
        let after = self.current();
        if after.kind == TokenKind::Ident {
            return Err(unsupported(after, "declarator after enum definition"));
        }
        self.expect_punct(";", "`;` after the enum definition")?;
        Ok(EnumModel {
            name,
            scoped,
            underlying,
            enumerators,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds an unsupported-construct error at `token`.
const fn unsupported(token: Token<'_>, construct: &'static str) -> ParseError {
    ParseError::Unsupported {
        construct,
        line: token.line,
        column: token.column,
    }
}

/// Builds the error for a directive that interrupts a declaration.
const fn directive_in_declaration(token: Token<'_>) -> ParseError {
    unsupported(token, "preprocessor directive inside a declaration")
}

/// Describes the bracket expected to close the innermost group.
fn describe_closer(closer: Option<&str>) -> &'static str {
    match closer {
        Some(")") => "`)`",
        Some("]") => "`]`",
        Some("}") => "`}`",
        _ => "closing bracket",
    }
}

/// Builds the missing-return-type error for `head`.
fn missing_return_type(head: &Head<'_, '_>) -> ParseError {
    ParseError::MissingReturnType {
        name: head.name.clone(),
        line: head.name_token.line,
        column: head.name_token.column,
    }
}

/// Returns true for directives that open, switch, or close a conditional.
fn is_conditional_directive(keyword: &str) -> bool {
    matches!(
        keyword,
        "if" | "ifdef" | "ifndef" | "elif" | "elifdef" | "elifndef" | "else" | "endif"
    )
}

/// Splits a directive into its keyword and trimmed argument text.
fn split_directive(text: &str) -> (&str, &str) {
    let body = text.trim_start_matches('#').trim_start();
    let end = body.find(|c: char| !c.is_ascii_alphanumeric() && c != '_').unwrap_or(body.len());
    let (keyword, rest) = body.split_at(end);
    (keyword, rest.trim())
}

/// Parses the argument of `#include`.
fn parse_include(rest: &str) -> Option<Include> {
    let (system, close) = match rest.chars().next()? {
        '<' => (true, '>'),
        '"' => (false, '"'),
        _ => return None,
    };
    let inner = rest.get(1 ..)?;
    let end = inner.find(close)?;
    let path = inner.get(.. end)?.trim();
    if path.is_empty() {
        return None;
    }
    Some(Include {
        path: path.to_string(),
        system,
    })
}

/// Returns true for a valid C++ identifier.
fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Walks back from `index` over `A::` qualifiers.
fn qualified_start(head: &[Token<'_>], mut index: usize) -> usize {
    while index >= 2
        && head.get(index - 1).is_some_and(|token| token.kind == TokenKind::Scope)
        && head.get(index - 2).is_some_and(|token| token.kind == TokenKind::Ident)
    {
        index -= 2;
    }
    index
}

/// Finds the declared name at the end of a head.
///
/// Returns the remaining type tokens, the rendered name, the name token, and
/// whether the name is a destructor.
fn split_name<'t, 'a>(
    head: &'t [Token<'a>],
) -> Option<(&'t [Token<'a>], String, Token<'a>, bool)> {
    if let Some(position) = head.iter().position(|token| token.is_word("operator")) {
        let start = qualified_start(head, position);
        let mut name = render_tokens(head.get(start .. position)?);
        name.push_str("operator");
        for token in head.get(position + 1 ..)? {
            if token.kind == TokenKind::Ident {
                name.push(' ');
            }
            name.push_str(token.text);
        }
        return Some((head.get(.. start)?, name, *head.get(position)?, false));
    }

    let last_index = head.len().checked_sub(1)?;
    let last = *head.get(last_index)?;
    if last.kind != TokenKind::Ident {
        return None;
    }
    let mut start = last_index;
    let mut is_destructor = false;
    if start > 0 && head.get(start - 1).is_some_and(|token| token.is_punct("~")) {
        start -= 1;
        is_destructor = true;
    }
    let start = qualified_start(head, start);
    let name = render_tokens(head.get(start ..)?);
    Some((head.get(.. start)?, name, last, is_destructor))
}

/// Splits `tokens` at top-level commas, returning each piece and the comma
/// that ended it.
fn split_top_level<'t, 'a>(
    tokens: &'t [Token<'a>],
) -> Vec<(&'t [Token<'a>], Option<Token<'a>>)> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Punct {
            continue;
        }
        match token.text {
            "(" | "[" | "{" | "<" => depth += 1,
            ")" | "]" | "}" | ">" => depth = depth.saturating_sub(1),
            "," if depth == 0 => {
                pieces.push((tokens.get(start .. index).unwrap_or(&[]), Some(*token)));
                start = index + 1;
            }
            _ => {}
        }
    }
    pieces.push((tokens.get(start ..).unwrap_or(&[]), None));
    pieces
}

/// Parses the tokens between a parameter list's parentheses.
fn parse_parameters<'t, 'a>(
    tokens: &'t [Token<'a>],
) -> Result<Vec<(Parameter, &'t [Token<'a>])>, ParseError> {
    if tokens.is_empty() || (tokens.len() == 1 && tokens.iter().all(|token| token.is_word("void"))) {
        return Ok(Vec::new());
    }
    let mut parameters = Vec::new();
    for (piece, comma) in split_top_level(tokens) {
        if piece.is_empty() {
            let token = comma.or_else(|| tokens.last().copied());
            return Err(ParseError::UnexpectedToken {
                expected: "parameter",
                found: token.map_or_else(String::new, |token| token.describe()),
                line: token.map_or(0, |token| token.line),
                column: token.map_or(0, |token| token.column),
            });
        }
        parameters.push(parse_parameter(piece)?);
    }
    Ok(parameters)
}

/// Parses one parameter declaration.
fn parse_parameter<'t, 'a>(
    piece: &'t [Token<'a>],
) -> Result<(Parameter, &'t [Token<'a>]), ParseError> {
    if piece.len() == 3 && piece.iter().all(|token| token.is_punct(".")) {
        let parameter = Parameter {
            type_name: "...".to_string(),
            name: None,
            default_value: None,
        };
        return Ok((parameter, &[]));
    }

    let mut depth = 0usize;
    let mut split = None;
    for (index, token) in piece.iter().enumerate() {
        match token.text {
            "(" | "[" | "{" | "<" if token.kind == TokenKind::Punct => depth += 1,
            ")" | "]" | "}" | ">" if token.kind == TokenKind::Punct => {
                depth = depth.saturating_sub(1);
            }
            "=" if token.kind == TokenKind::Punct && depth == 0 => {
                split = Some(index);
                break;
            }
            _ => {}
        }
    }
    let (declarator, default_value) = match split {
        Some(index) => {
            let value = piece.get(index + 1 ..).unwrap_or(&[]);
            if value.is_empty() {
                let token = piece.get(index).copied().unwrap_or(Token {
                    kind: TokenKind::Eof,
                    text: "",
                    line: 0,
                    column: 0,
                });
                return Err(ParseError::UnexpectedToken {
                    expected: "default argument",
                    found: token.describe(),
                    line: token.line,
                    column: token.column,
                });
            }
            (piece.get(.. index).unwrap_or(&[]), Some(render_tokens(value)))
        }
        None => (piece, None),
    };

    let (declarator, suffix) = match declarator.iter().position(|token| token.is_punct("[")) {
        Some(index) if declarator.last().is_some_and(|token| token.is_punct("]")) => (
            declarator.get(.. index).unwrap_or(&[]),
            render_tokens(declarator.get(index ..).unwrap_or(&[])),
        ),
        _ => (declarator, String::new()),
    };

    let (type_tokens, name) = match declarator.split_last() {
        Some((last, rest)) if is_parameter_name(last, rest) => (rest, Some(last.text.to_string())),
        _ => (declarator, None),
    };
    let (type_name, name) = match name {
        Some(name) => (render_tokens(type_tokens), Some(format!("{name}{suffix}"))),
        None => (format!("{}{suffix}", render_tokens(type_tokens)), None),
    };
    if type_name.is_empty() {
        let token = piece.first().copied().unwrap_or(Token {
            kind: TokenKind::Eof,
            text: "",
            line: 0,
            column: 0,
        });
        return Err(ParseError::UnexpectedToken {
            expected: "parameter type",
            found: token.describe(),
            line: token.line,
            column: token.column,
        });
    }
    Ok((
        Parameter {
            type_name,
            name,
            default_value,
        },
        type_tokens,
    ))
}

/// Returns true when `last` names the parameter declared by `rest last`.
fn is_parameter_name(last: &Token<'_>, rest: &[Token<'_>]) -> bool {
    last.kind == TokenKind::Ident
        && !is_fundamental_type(last.text)
        && !QUALIFIER_WORDS.contains(&last.text)
        && rest.last().is_some_and(|previous| previous.kind != TokenKind::Scope)
        && !rest.iter().all(|token| QUALIFIER_WORDS.contains(&token.text))
}

/// Returns the class type named through a pointer or reference in `tokens`.
///
/// Fundamental types, `std::` types, template instantiations, and the class
/// itself are skipped.
fn referenced_type(tokens: &[Token<'_>], class_name: &str) -> Option<String> {
    let mut depth = 0usize;
    let mut indirect = false;
    for token in tokens.iter().filter(|token| token.kind == TokenKind::Punct) {
        match token.text {
            "<" | "(" | "[" => depth += 1,
            ">" | ")" | "]" => depth = depth.saturating_sub(1),
            "*" | "&" if depth == 0 => indirect = true,
            _ => {}
        }
    }
    if !indirect {
        return None;
    }

    let start = tokens
        .iter()
        .position(|token| !(token.kind == TokenKind::Ident && QUALIFIER_WORDS.contains(&token.text)))?;
    let mut end = start;
    let mut segments = Vec::new();
    while let Some(token) = tokens.get(end) {
        if token.kind != TokenKind::Ident {
            break;
        }
        segments.push(token.text);
        end += 1;
        if tokens.get(end).is_some_and(|token| token.kind == TokenKind::Scope) {
            end += 1;
        } else {
            break;
        }
    }
    let first = *segments.first()?;
    let templated = tokens.get(end).is_some_and(|token| token.is_punct("<"));
    if templated
        || first == "std"
        || (segments.len() == 1 && (is_fundamental_type(first) || first == class_name))
    {
        return None;
    }
    Some(segments.join("::"))
}

/// Records the pointer/reference type in `tokens` on `class`.
fn note_reference(class: &mut ClassModel, tokens: &[Token<'_>]) {
    if let Some(name) = referenced_type(tokens, &class.name) {
        class.add_forward_declaration(ForwardDeclaration::from_qualified(ClassKeyword::Class, &name));
    }
}
