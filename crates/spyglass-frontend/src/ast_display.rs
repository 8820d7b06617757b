// ast_display.rs
//
// Compact structural rendering of expression trees, mainly for tests and
// trace output. Values stay opaque; identifiers, member names, operators,
// and cast target names are shown.

use crate::ast::{
    BinaryExpr, CStyleCastExpr, Expr, IdentifierExpr, LiteralExpr, MemberOfExpr, MemberOfKind,
    TernaryExpr, UnaryExpr, Visitor,
};
use crate::Span;

pub struct AstPrinter;

impl AstPrinter {
    pub fn print(expr: &Expr) -> String {
        expr.accept(&mut AstPrinter)
    }
}

impl Visitor for AstPrinter {
    type Output = String;

    fn visit_literal(&mut self, _node: &LiteralExpr, _span: Span) -> String {
        "(lit)".to_string()
    }

    fn visit_identifier(&mut self, node: &IdentifierExpr, _span: Span) -> String {
        node.name.clone()
    }

    fn visit_unary(&mut self, node: &UnaryExpr, _span: Span) -> String {
        format!("(u{} {})", node.op.as_str(), Self::print(&node.operand))
    }

    fn visit_binary(&mut self, node: &BinaryExpr, _span: Span) -> String {
        format!(
            "({} {} {})",
            node.op.as_str(),
            Self::print(&node.lhs),
            Self::print(&node.rhs)
        )
    }

    fn visit_ternary(&mut self, node: &TernaryExpr, _span: Span) -> String {
        format!(
            "(? {} {} {})",
            Self::print(&node.cond),
            Self::print(&node.then_expr),
            Self::print(&node.else_expr)
        )
    }

    fn visit_member_of(&mut self, node: &MemberOfExpr, _span: Span) -> String {
        let arrow = match node.kind {
            MemberOfKind::OfObject => ".",
            MemberOfKind::OfPointer => "->",
        };
        format!("({} {} {})", arrow, Self::print(&node.base), node.member)
    }

    fn visit_cstyle_cast(&mut self, node: &CStyleCastExpr, _span: Span) -> String {
        format!("(cast '{}' {})", node.ty.name(), Self::print(&node.operand))
    }

    fn visit_error(&mut self, _span: Span) -> String {
        "<error>".to_string()
    }
}
