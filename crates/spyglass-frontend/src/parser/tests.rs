use std::cell::RefCell;
use std::sync::Arc;

use super::*;
use crate::ast_display::AstPrinter;
use crate::context::{EvalContext, ParserOptions, TypeHandle, ValueHandle};
use spyglass_identity::{BasicType, TargetLayout};

/// Resolver-side payload for types minted by the fake target.
#[derive(Debug)]
struct FakeType {
    is_reference: bool,
}

/// Resolver-side payload for values, recording what the parser asked for.
#[derive(Debug, PartialEq)]
enum FakeValue {
    Int {
        magnitude: u64,
        is_signed: bool,
        ty: String,
    },
    Float {
        value: f64,
        ty: String,
    },
    Bool(bool),
    Nullptr,
    Binding(String),
}

/// Test double for the debugger runtime: a fixed set of known type names and
/// identifier bindings, plus a log of every type-resolution query.
struct FakeTarget {
    types: Vec<(String, bool)>,
    bindings: Vec<String>,
    resolve_log: RefCell<Vec<String>>,
}

const BUILTIN_TYPES: &[&str] = &[
    "void",
    "bool",
    "char",
    "signed char",
    "unsigned char",
    "wchar_t",
    "char16_t",
    "char32_t",
    "short",
    "unsigned short",
    "int",
    "unsigned int",
    "long",
    "unsigned long",
    "long long",
    "unsigned long long",
    "float",
    "double",
    "signed",
    "unsigned",
];

impl FakeTarget {
    fn new() -> Self {
        Self {
            types: BUILTIN_TYPES
                .iter()
                .map(|n| (n.to_string(), false))
                .collect(),
            bindings: Vec::new(),
            resolve_log: RefCell::new(Vec::new()),
        }
    }

    fn with_type(mut self, name: &str) -> Self {
        self.types.push((name.to_string(), false));
        self
    }

    fn with_reference_type(mut self, name: &str) -> Self {
        self.types.push((name.to_string(), true));
        self
    }

    fn with_binding(mut self, name: &str) -> Self {
        self.bindings.push(name.to_string());
        self
    }

    fn handle(name: &str, is_reference: bool) -> TypeHandle {
        TypeHandle::new(name, Arc::new(FakeType { is_reference }))
    }

    fn resolved(&self) -> Vec<String> {
        self.resolve_log.borrow().clone()
    }
}

impl EvalContext for FakeTarget {
    fn resolve_type(&self, name: &str) -> Option<TypeHandle> {
        self.resolve_log.borrow_mut().push(name.to_string());
        self.types
            .iter()
            .find(|(n, _)| n == name)
            .map(|(n, is_reference)| Self::handle(n, *is_reference))
    }

    fn pointer_to(&self, ty: &TypeHandle) -> Option<TypeHandle> {
        if ty.payload::<FakeType>().is_some_and(|t| t.is_reference) {
            return None;
        }
        let name = if ty.name().ends_with('*') {
            format!("{}*", ty.name())
        } else {
            format!("{} *", ty.name())
        };
        Some(Self::handle(&name, false))
    }

    fn reference_to(&self, ty: &TypeHandle) -> Option<TypeHandle> {
        if ty.payload::<FakeType>().is_some_and(|t| t.is_reference) {
            return None;
        }
        Some(Self::handle(&format!("{} &", ty.name()), true))
    }

    fn lookup_identifier(&self, name: &str) -> Option<ValueHandle> {
        self.bindings
            .iter()
            .any(|b| b == name)
            .then(|| ValueHandle::new(Arc::new(FakeValue::Binding(name.to_string()))))
    }

    fn basic_type(&self, kind: BasicType) -> TypeHandle {
        Self::handle(kind.as_str(), false)
    }

    fn value_from_int(&self, magnitude: u64, is_signed: bool, ty: &TypeHandle) -> ValueHandle {
        ValueHandle::new(Arc::new(FakeValue::Int {
            magnitude,
            is_signed,
            ty: ty.name().to_string(),
        }))
    }

    fn value_from_float(&self, value: f64, ty: &TypeHandle) -> ValueHandle {
        ValueHandle::new(Arc::new(FakeValue::Float {
            value,
            ty: ty.name().to_string(),
        }))
    }

    fn value_from_bool(&self, value: bool) -> ValueHandle {
        ValueHandle::new(Arc::new(FakeValue::Bool(value)))
    }

    fn value_nullptr(&self) -> ValueHandle {
        ValueHandle::new(Arc::new(FakeValue::Nullptr))
    }
}

fn parse(source: &str, target: &FakeTarget) -> Result<Expr, EvalError> {
    Parser::new(source, target).parse()
}

fn shape(source: &str, target: &FakeTarget) -> String {
    let expr = parse(source, target).expect(source);
    AstPrinter::print(&expr)
}

fn literal_payload(expr: &Expr) -> &FakeValue {
    match &expr.kind {
        ExprKind::Literal(lit) => lit.value.payload::<FakeValue>().expect("fake payload"),
        other => panic!("expected literal, got {:?}", other),
    }
}

// ---- literals --------------------------------------------------------------

#[test]
fn parse_int_literal() {
    let target = FakeTarget::new();
    let expr = parse("42", &target).unwrap();
    assert_eq!(
        literal_payload(&expr),
        &FakeValue::Int {
            magnitude: 42,
            is_signed: true,
            ty: "int".to_string(),
        }
    );
}

#[test]
fn parse_float_literal() {
    let target = FakeTarget::new();
    let expr = parse("3.25", &target).unwrap();
    assert_eq!(
        literal_payload(&expr),
        &FakeValue::Float {
            value: 3.25,
            ty: "double".to_string(),
        }
    );
    let expr = parse("3.25f", &target).unwrap();
    assert_eq!(
        literal_payload(&expr),
        &FakeValue::Float {
            value: 3.25,
            ty: "float".to_string(),
        }
    );
}

#[test]
fn parse_bool_and_nullptr_literals() {
    let target = FakeTarget::new();
    assert_eq!(
        literal_payload(&parse("true", &target).unwrap()),
        &FakeValue::Bool(true)
    );
    assert_eq!(
        literal_payload(&parse("false", &target).unwrap()),
        &FakeValue::Bool(false)
    );
    assert_eq!(
        literal_payload(&parse("nullptr", &target).unwrap()),
        &FakeValue::Nullptr
    );
}

#[test]
fn hex_literal_goes_unsigned_to_fit() {
    // On a 32-bit-int target, 0xFFFFFFFF does not fit a signed int but the
    // non-decimal radix allows the unsigned fallback.
    let target = FakeTarget::new();
    let expr = parse("0xFFFFFFFF", &target).unwrap();
    assert_eq!(
        literal_payload(&expr),
        &FakeValue::Int {
            magnitude: 0xFFFF_FFFF,
            is_signed: false,
            ty: "unsigned int".to_string(),
        }
    );
}

#[test]
fn decimal_literal_widens_to_long_instead() {
    let target = FakeTarget::new();
    let expr = parse("4294967295", &target).unwrap();
    assert_eq!(
        literal_payload(&expr),
        &FakeValue::Int {
            magnitude: 4294967295,
            is_signed: true,
            ty: "long".to_string(),
        }
    );
}

#[test]
fn literal_typing_respects_injected_layout() {
    let target = FakeTarget::new();
    let options = ParserOptions {
        layout: TargetLayout {
            int_bits: 32,
            long_bits: 32,
            long_long_bits: 64,
        },
        ..ParserOptions::default()
    };
    let expr = Parser::with_options("4294967295", &target, options)
        .parse()
        .unwrap();
    // With a 32-bit long, an unsuffixed decimal skips both signed 32-bit
    // types and lands on long long.
    assert_eq!(
        literal_payload(&expr),
        &FakeValue::Int {
            magnitude: 4294967295,
            is_signed: true,
            ty: "long long".to_string(),
        }
    );
}

#[test]
fn malformed_literals_fail_the_parse() {
    let target = FakeTarget::new();
    for source in ["0x", "1e", "1lL", "18446744073709551616", "1e999"] {
        let err = parse(source, &target).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidNumericLiteral, "{source}");
    }
}

// ---- precedence and associativity ------------------------------------------

#[test]
fn multiplication_binds_tighter_than_addition() {
    let target = FakeTarget::new();
    assert_eq!(shape("1 + 2 * 3", &target), "(+ (lit) (* (lit) (lit)))");
}

#[test]
fn same_precedence_operators_are_left_associative() {
    let target = FakeTarget::new();
    assert_eq!(shape("1 - 2 - 3", &target), "(- (- (lit) (lit)) (lit))");
    assert_eq!(shape("1 / 2 % 3", &target), "(% (/ (lit) (lit)) (lit))");
    assert_eq!(shape("1 << 2 >> 3", &target), "(>> (<< (lit) (lit)) (lit))");
}

#[test]
fn the_whole_ladder_nests_correctly() {
    let target = FakeTarget::new()
        .with_binding("a")
        .with_binding("b")
        .with_binding("c");
    assert_eq!(shape("a || b && c", &target), "(|| a (&& b c))");
    assert_eq!(shape("a | b ^ c", &target), "(| a (^ b c))");
    assert_eq!(shape("a ^ b & c", &target), "(^ a (& b c))");
    // The classic C surprise: == binds tighter than &.
    assert_eq!(shape("a & b == c", &target), "(& a (== b c))");
    assert_eq!(shape("a == b < c", &target), "(== a (< b c))");
    assert_eq!(shape("a < b << c", &target), "(< a (<< b c))");
    assert_eq!(shape("1 << 2 + 3", &target), "(<< (lit) (+ (lit) (lit)))");
}

#[test]
fn ternary_else_arm_is_right_recursive() {
    let target = FakeTarget::new()
        .with_binding("a")
        .with_binding("b")
        .with_binding("c")
        .with_binding("d")
        .with_binding("e");
    assert_eq!(shape("a ? b : c ? d : e", &target), "(? a b (? c d e))");
    assert_eq!(shape("a ? b ? c : d : e", &target), "(? a (? b c d) e)");
}

#[test]
fn unary_operators_chain() {
    let target = FakeTarget::new().with_binding("x").with_binding("p");
    assert_eq!(shape("!~-x", &target), "(u! (u~ (u- x)))");
    assert_eq!(shape("*p", &target), "(u* p)");
    assert_eq!(shape("&x", &target), "(u& x)");
    assert_eq!(shape("++x", &target), "(u++ x)");
    assert_eq!(shape("--x", &target), "(u-- x)");
    assert_eq!(shape("-x + 1", &target), "(+ (u- x) (lit))");
}

#[test]
fn parenthesized_grouping_has_no_node() {
    let target = FakeTarget::new();
    assert_eq!(shape("(1 + 2) * 3", &target), "(* (+ (lit) (lit)) (lit))");
}

#[test]
fn expression_span_covers_the_input() {
    let target = FakeTarget::new();
    let expr = parse("1 + 2", &target).unwrap();
    assert_eq!((expr.span.start, expr.span.end), (0, 5));
}

// ---- postfix ---------------------------------------------------------------

#[test]
fn subscript_is_a_binary_node() {
    let target = FakeTarget::new().with_binding("a");
    let expr = parse("a[1]", &target).unwrap();
    match &expr.kind {
        ExprKind::Binary(bin) => assert_eq!(bin.op, BinaryOp::Subscript),
        other => panic!("expected subscript binary, got {:?}", other),
    }
    assert_eq!(shape("a[1][2]", &target), "([] ([] a (lit)) (lit))");
}

#[test]
fn member_access_chain_records_the_access_kind() {
    let target = FakeTarget::new().with_binding("obj");
    assert_eq!(
        shape("obj->field.sub", &target),
        "(. (-> obj field) sub)"
    );
    let expr = parse("obj->field.sub", &target).unwrap();
    match &expr.kind {
        ExprKind::MemberOf(outer) => {
            assert_eq!(outer.kind, MemberOfKind::OfObject);
            assert_eq!(outer.member, "sub");
            match &outer.base.kind {
                ExprKind::MemberOf(inner) => {
                    assert_eq!(inner.kind, MemberOfKind::OfPointer);
                    assert_eq!(inner.member, "field");
                }
                other => panic!("expected inner member access, got {:?}", other),
            }
        }
        other => panic!("expected member access, got {:?}", other),
    }
}

#[test]
fn postfix_increment_is_not_implemented() {
    let target = FakeTarget::new().with_binding("x");
    let err = parse("x++", &target).unwrap_err();
    assert_eq!(err.code, ErrorCode::NotImplemented);
    let err = parse("x--", &target).unwrap_err();
    assert_eq!(err.code, ErrorCode::NotImplemented);
}

// ---- identifiers -----------------------------------------------------------

#[test]
fn qualified_identifiers_resolve_as_one_name() {
    let target = FakeTarget::new()
        .with_binding("ns::counter")
        .with_binding("::global");
    assert_eq!(shape("ns::counter", &target), "ns::counter");
    assert_eq!(shape("::global", &target), "::global");
}

#[test]
fn looked_up_identifiers_are_lvalues() {
    let target = FakeTarget::new().with_binding("x");
    let expr = parse("x", &target).unwrap();
    match &expr.kind {
        ExprKind::Identifier(id) => {
            assert_eq!(id.name, "x");
            assert!(!id.is_rvalue);
        }
        other => panic!("expected identifier, got {:?}", other),
    }
}

#[test]
fn this_is_an_rvalue() {
    let target = FakeTarget::new().with_binding("this");
    let expr = parse("this", &target).unwrap();
    match &expr.kind {
        ExprKind::Identifier(id) => {
            assert_eq!(id.name, "this");
            assert!(id.is_rvalue);
        }
        other => panic!("expected identifier, got {:?}", other),
    }
}

#[test]
fn this_outside_a_member_function_is_an_error() {
    let target = FakeTarget::new();
    let err = parse("this", &target).unwrap_err();
    assert_eq!(err.code, ErrorCode::UndeclaredIdentifier);
    assert!(err.message.contains("invalid use of 'this'"), "{}", err);
}

#[test]
fn undeclared_identifier_reports_the_name() {
    let target = FakeTarget::new();
    let err = parse("nope", &target).unwrap_err();
    assert_eq!(err.code, ErrorCode::UndeclaredIdentifier);
    assert!(
        err.message.contains("use of undeclared identifier 'nope'"),
        "{}",
        err
    );
}

// ---- casts and the parenthesis ambiguity -----------------------------------

#[test]
fn cast_of_a_builtin_type() {
    let target = FakeTarget::new().with_binding("x");
    assert_eq!(shape("(int)x + 1", &target), "(+ (cast 'int' x) (lit))");
}

#[test]
fn cast_with_declarators() {
    let target = FakeTarget::new().with_type("MyType").with_binding("ptr");
    assert_eq!(
        shape("((MyType*)ptr)->field", &target),
        "(-> (cast 'MyType *' ptr) field)"
    );
    assert_eq!(shape("(MyType**)ptr", &target), "(cast 'MyType **' ptr)");
    assert_eq!(shape("(long&)ptr", &target), "(cast 'long &' ptr)");
}

#[test]
fn cv_qualifiers_are_parsed_and_discarded() {
    let target = FakeTarget::new().with_binding("x");
    assert_eq!(
        shape("(const volatile int* const)x", &target),
        "(cast 'int *' x)"
    );
}

#[test]
fn casts_chain_right() {
    let target = FakeTarget::new().with_binding("x");
    assert_eq!(
        shape("(int)(long)x", &target),
        "(cast 'int' (cast 'long' x))"
    );
}

#[test]
fn multi_token_base_names_are_canonicalized_for_the_resolver() {
    let target = FakeTarget::new().with_binding("x");
    assert_eq!(
        shape("(unsigned long int)x", &target),
        "(cast 'unsigned long' x)"
    );
    assert!(
        target.resolved().contains(&"unsigned long".to_string()),
        "{:?}",
        target.resolved()
    );
    assert_eq!(shape("(short int)x", &target), "(cast 'short' x)");
    assert_eq!(shape("(long long int)x", &target), "(cast 'long long' x)");
}

#[test]
fn known_type_without_operand_is_an_error() {
    // `(foo)` where foo names a type: the cast commits and then wants a
    // cast_expression, which the input does not have.
    let target = FakeTarget::new().with_type("foo");
    let err = parse("(foo)", &target).unwrap_err();
    assert_eq!(err.code, ErrorCode::Unknown);
    assert!(err.message.contains("unexpected token"), "{}", err);
}

#[test]
fn unknown_type_falls_back_to_parenthesized_expression() {
    // Same spelling, but foo only resolves as a value: the tentative cast
    // rolls back and the parenthesized expression wins.
    let target = FakeTarget::new().with_binding("foo");
    assert_eq!(shape("(foo)", &target), "foo");
}

#[test]
fn rollback_restores_the_token_position_exactly() {
    let target = FakeTarget::new().with_binding("value");
    let mut parser = Parser::new("(value) + 1", &target);
    let before = parser.kind();
    let snapshot = parser.tentative();
    parser.consume_token();
    parser.consume_token();
    parser.rollback(snapshot);
    assert_eq!(parser.kind(), before);
    // And the full parse still sees the same tokens.
    assert_eq!(shape("(value) + 1", &target), "(+ value (lit))");
}

#[test]
fn rollback_clears_errors_raised_during_speculation() {
    let target = FakeTarget::new();
    let mut parser = Parser::new("1", &target);
    let snapshot = parser.tentative();
    let span = parser.current_span();
    parser.bail_out(ErrorCode::Unknown, "speculative".to_string(), span);
    assert!(parser.error.is_some());
    parser.rollback(snapshot);
    assert!(parser.error.is_none());
    assert_eq!(parser.kind(), TokenKind::NumericConstant);
}

#[test]
#[should_panic(expected = "tentative snapshot dropped")]
fn dropping_an_unconsumed_snapshot_panics() {
    let target = FakeTarget::new();
    let mut parser = Parser::new("1", &target);
    let snapshot = parser.tentative();
    drop(snapshot);
}

// ---- templates and qualified type names ------------------------------------

#[test]
fn nested_qualified_template_type_resolves_as_one_base_name() {
    let target = FakeTarget::new()
        .with_type("T")
        .with_type("ns::Outer<T>::Inner")
        .with_binding("x");
    assert_eq!(
        shape("(ns::Outer<T>::Inner)x", &target),
        "(cast 'ns::Outer<T>::Inner' x)"
    );
    assert!(
        target
            .resolved()
            .contains(&"ns::Outer<T>::Inner".to_string()),
        "{:?}",
        target.resolved()
    );
}

#[test]
fn nested_template_arguments_keep_the_disambiguating_space() {
    let target = FakeTarget::new()
        .with_type("Bar<int>")
        .with_type("Foo<Bar<int> >")
        .with_binding("x");
    assert_eq!(
        shape("(Foo<Bar<int> >)x", &target),
        "(cast 'Foo<Bar<int> >' x)"
    );
}

#[test]
fn empty_template_argument_lists_are_legal() {
    let target = FakeTarget::new().with_type("Foo<>").with_binding("x");
    assert_eq!(shape("(Foo<>)x", &target), "(cast 'Foo<>' x)");
}

#[test]
fn template_arguments_may_mix_types_and_identifiers() {
    let target = FakeTarget::new()
        .with_type("Pair<int, tag>")
        .with_binding("x");
    assert_eq!(shape("(Pair<int, tag>)x", &target), "(cast 'Pair<int, tag>' x)");
}

#[test]
fn pointer_template_arguments_render_with_declarators() {
    let target = FakeTarget::new().with_type("Vec<int *>").with_binding("x");
    assert_eq!(shape("(Vec<int *>)x", &target), "(cast 'Vec<int *>' x)");
}

#[test]
fn numeric_template_arguments_are_rejected() {
    // `Foo<1>` never parses as a template-id; the tentative cast collapses
    // and the leftover spelling fails to parse as anything else.
    let target = FakeTarget::new().with_type("Foo").with_binding("x");
    assert!(parse("(Foo<1>)x", &target).is_err());
}

// ---- declarator rejection --------------------------------------------------

#[test]
fn pointer_to_reference_is_rejected() {
    let target = FakeTarget::new()
        .with_reference_type("IntRef")
        .with_binding("x");
    let err = parse("(IntRef*)x", &target).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidOperandType);
    assert!(err.message.contains("pointer to a reference"), "{}", err);
}

#[test]
fn reference_to_reference_is_rejected() {
    let target = FakeTarget::new()
        .with_reference_type("IntRef")
        .with_binding("x");
    let err = parse("(IntRef&)x", &target).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidOperandType);
    assert!(
        err.message.contains("reference to a reference"),
        "{}",
        err
    );
}

// ---- errors and diagnostics ------------------------------------------------

#[test]
fn truncated_input_points_the_caret_past_the_end() {
    let target = FakeTarget::new();
    let err = parse("1 <<", &target).unwrap_err();
    assert_eq!(err.code, ErrorCode::Unknown);
    assert_eq!(
        err.message,
        "<expr>:1:5: unexpected token: <'' (end of expression)>\n1 <<\n    ^"
    );
}

#[test]
fn assignment_is_not_supported() {
    let target = FakeTarget::new().with_binding("x");
    let err = parse("x = 1", &target).unwrap_err();
    assert_eq!(err.code, ErrorCode::Unknown);
}

#[test]
fn comma_expressions_are_not_supported() {
    let target = FakeTarget::new();
    let err = parse("1, 2", &target).unwrap_err();
    assert_eq!(err.code, ErrorCode::Unknown);
}

#[test]
fn empty_input_is_an_error() {
    let target = FakeTarget::new();
    let err = parse("", &target).unwrap_err();
    assert_eq!(err.code, ErrorCode::Unknown);
}

#[test]
fn missing_closing_paren_is_reported() {
    let target = FakeTarget::new();
    let err = parse("(1 + 2", &target).unwrap_err();
    assert_eq!(err.code, ErrorCode::Unknown);
    assert!(err.message.contains("expected ')'"), "{}", err);
}

#[test]
fn missing_ternary_colon_is_reported() {
    let target = FakeTarget::new().with_binding("a");
    let err = parse("a ? 1 2", &target).unwrap_err();
    assert_eq!(err.code, ErrorCode::Unknown);
    assert!(err.message.contains("expected ':'"), "{}", err);
}

#[test]
fn only_the_first_error_is_reported() {
    let target = FakeTarget::new();
    // Both operands are undeclared; only the first is diagnosed.
    let err = parse("nope1 + nope2", &target).unwrap_err();
    assert_eq!(err.code, ErrorCode::UndeclaredIdentifier);
    assert!(err.message.contains("nope1"), "{}", err);
    assert!(!err.message.contains("nope2"), "{}", err);
}

#[test]
fn custom_file_name_appears_in_diagnostics() {
    let target = FakeTarget::new();
    let options = ParserOptions {
        file_name: "watch:0".to_string(),
        ..ParserOptions::default()
    };
    let err = Parser::with_options("@", &target, options).parse().unwrap_err();
    assert!(err.message.starts_with("watch:0:1:1: "), "{}", err);
}
