// parser/mod.rs
//
// Recursive-descent parser for the C++ expression subset. The grammar is the
// standard conditional/binary/cast/unary/postfix/primary ladder; binary
// operators run through one Pratt loop driven by `TokenKind::precedence()`.
//
// Error handling is first-error-wins: `bail_out` records the diagnostic once
// and forces the token cursor to end-of-input, so every enclosing loop
// unwinds without touching the error again. Speculative paths run under
// `TentativeSnapshot`s; rolling one back restores both the cursor and the
// error slot.

use crate::ast::{
    BinaryExpr, BinaryOp, CStyleCastExpr, Expr, ExprKind, IdentifierExpr, LiteralExpr,
    MemberOfExpr, MemberOfKind, TernaryExpr, UnaryExpr, UnaryOp,
};
use crate::context::{EvalContext, ParserOptions, TypeHandle};
use crate::diagnostics::format_diagnostics;
use crate::errors::{ErrorCode, EvalError};
use crate::literal::{self, LiteralValue};
use crate::stream::{StreamPos, TokenStream};
use crate::type_decl::{PtrOperator, TypeDeclaration};
use crate::{Span, TokenKind};

#[cfg(test)]
mod tests;

/// A scoped save point for speculative parsing. Captures the token cursor and
/// the error slot; must be consumed by exactly one of [`Parser::commit`] or
/// [`Parser::rollback`].
#[must_use]
struct TentativeSnapshot {
    pos: StreamPos,
    saved_error: Option<EvalError>,
    armed: bool,
}

impl Drop for TentativeSnapshot {
    fn drop(&mut self) {
        if self.armed && !std::thread::panicking() {
            panic!("tentative snapshot dropped without commit or rollback");
        }
    }
}

pub struct Parser<'src, 'ctx> {
    source: &'src str,
    stream: TokenStream<'src>,
    ctx: &'ctx dyn EvalContext,
    options: ParserOptions,
    error: Option<EvalError>,
}

impl<'src, 'ctx> Parser<'src, 'ctx> {
    pub fn new(source: &'src str, ctx: &'ctx dyn EvalContext) -> Self {
        Self::with_options(source, ctx, ParserOptions::default())
    }

    pub fn with_options(
        source: &'src str,
        ctx: &'ctx dyn EvalContext,
        options: ParserOptions,
    ) -> Self {
        Self {
            source,
            stream: TokenStream::new(source),
            ctx,
            options,
            error: None,
        }
    }

    /// Parse the whole input as one expression. On failure the tree that was
    /// built so far is discarded and the first recorded error is returned.
    pub fn parse(mut self) -> Result<Expr, EvalError> {
        let expr = self.expression();
        self.expect(TokenKind::Eof);
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(expr),
        }
    }

    // ---- token plumbing ----------------------------------------------------

    fn kind(&self) -> TokenKind {
        self.stream.current().kind
    }

    fn current_span(&self) -> Span {
        self.stream.current().span
    }

    /// Span of the last consumed token, for merging into node spans.
    fn previous_span(&self) -> Span {
        self.stream
            .previous()
            .map_or_else(|| self.current_span(), |t| t.span)
    }

    fn consume_token(&mut self) {
        self.stream.advance();
    }

    fn token_description(&self) -> String {
        self.stream.current().description()
    }

    /// Require the current token to be `kind`; bail out otherwise. The
    /// caller consumes the token afterwards, which is a no-op in bail-out
    /// mode.
    fn expect(&mut self, kind: TokenKind) {
        if self.kind() != kind {
            self.bail_out(
                ErrorCode::Unknown,
                format!(
                    "expected '{}', got: {}",
                    kind.as_str(),
                    self.token_description()
                ),
                self.current_span(),
            );
        }
    }

    fn bail_out(&mut self, code: ErrorCode, message: String, span: Span) {
        if self.error.is_some() {
            // Already unwinding; the first error wins.
            return;
        }
        tracing::debug!(code = ?code, %message, "parse error");
        let rendered = format_diagnostics(self.source, &self.options.file_name, &message, span);
        self.error = Some(EvalError::new(code, rendered, span));
        self.stream.force_eof();
    }

    fn error_expr(&self, span: Span) -> Expr {
        Expr::new(ExprKind::Error, span)
    }

    // ---- tentative parsing -------------------------------------------------

    fn tentative(&mut self) -> TentativeSnapshot {
        TentativeSnapshot {
            pos: self.stream.mark(),
            saved_error: self.error.clone(),
            armed: true,
        }
    }

    /// Keep everything consumed since the snapshot.
    fn commit(&mut self, mut snapshot: TentativeSnapshot) {
        snapshot.armed = false;
    }

    /// Rewind to the snapshot: the cursor moves back and any error raised
    /// during the speculation is discarded.
    fn rollback(&mut self, mut snapshot: TentativeSnapshot) {
        snapshot.armed = false;
        self.stream.restore(snapshot.pos);
        self.error = snapshot.saved_error.take();
    }

    // ---- grammar -----------------------------------------------------------

    //  expression:
    //    assignment_expression
    fn expression(&mut self) -> Expr {
        self.assignment_expression()
    }

    //  assignment_expression:
    //    conditional_expression
    //
    // Assignment operators are not implemented; the rule exists so the
    // ternary's else arm binds the way C++ says it does.
    fn assignment_expression(&mut self) -> Expr {
        self.conditional_expression()
    }

    //  conditional_expression:
    //    logical_or_expression
    //    logical_or_expression "?" expression ":" assignment_expression
    fn conditional_expression(&mut self) -> Expr {
        let cond = self.binary_expression(0);

        if self.kind() != TokenKind::Question {
            return cond;
        }
        self.consume_token();
        let then_expr = self.expression();
        self.expect(TokenKind::Colon);
        self.consume_token();
        let else_expr = self.assignment_expression();

        let span = cond.span.merge(else_expr.span);
        Expr::new(
            ExprKind::Ternary(Box::new(TernaryExpr {
                cond,
                then_expr,
                else_expr,
            })),
            span,
        )
    }

    //  The `||` .. `* / %` ladder as one precedence-climbing loop. Every
    //  operator here is left-associative: the loop accumulates on the left
    //  and recurses with the operator's own precedence for the right side.
    fn binary_expression(&mut self, min_prec: u8) -> Expr {
        let mut lhs = self.cast_expression();

        while self.kind().precedence() > min_prec {
            let op_kind = self.kind();
            let op = match op_kind {
                TokenKind::PipePipe => BinaryOp::LogicalOr,
                TokenKind::AmpAmp => BinaryOp::LogicalAnd,
                TokenKind::Pipe => BinaryOp::BitOr,
                TokenKind::Caret => BinaryOp::BitXor,
                TokenKind::Ampersand => BinaryOp::BitAnd,
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::BangEq => BinaryOp::Ne,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::LtEq => BinaryOp::Le,
                TokenKind::GtEq => BinaryOp::Ge,
                TokenKind::LessLess => BinaryOp::Shl,
                TokenKind::GreaterGreater => BinaryOp::Shr,
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => break,
            };

            let prec = op_kind.precedence();
            self.consume_token();
            let rhs = self.binary_expression(prec);
            let span = lhs.span.merge(rhs.span);
            lhs = Expr::new(ExprKind::Binary(Box::new(BinaryExpr { op, lhs, rhs })), span);
        }

        lhs
    }

    //  cast_expression:
    //    unary_expression
    //    "(" type_id ")" cast_expression
    //
    // The classic C ambiguity: `(foo)` opens either a cast or a
    // parenthesized expression. Parse the type-id speculatively and let the
    // symbol resolver decide — if the base name resolves to a type, this is
    // a cast; otherwise rewind and let `primary_expression` have the `(`.
    fn cast_expression(&mut self) -> Expr {
        if self.kind() == TokenKind::LParen {
            let start_span = self.current_span();
            let snapshot = self.tentative();
            self.consume_token();

            let type_decl = self.type_id();
            match self.resolve_type_decl(&type_decl) {
                Some(base) => {
                    self.commit(snapshot);

                    let Some(ty) = self.apply_declarators(base, &type_decl) else {
                        return self.error_expr(start_span);
                    };

                    self.expect(TokenKind::RParen);
                    self.consume_token();
                    let operand = self.cast_expression();
                    let span = start_span.merge(operand.span);
                    return Expr::new(
                        ExprKind::CStyleCast(Box::new(CStyleCastExpr { ty, operand })),
                        span,
                    );
                }
                None => self.rollback(snapshot),
            }
        }

        self.unary_expression()
    }

    //  unary_expression:
    //    postfix_expression
    //    ("++" | "--" | "&" | "*" | "+" | "-" | "~" | "!") cast_expression
    fn unary_expression(&mut self) -> Expr {
        let op = match self.kind() {
            TokenKind::PlusPlus => UnaryOp::PreInc,
            TokenKind::MinusMinus => UnaryOp::PreDec,
            TokenKind::Ampersand => UnaryOp::AddrOf,
            TokenKind::Star => UnaryOp::Deref,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Minus,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::Bang => UnaryOp::LogicalNot,
            _ => return self.postfix_expression(),
        };

        let op_span = self.current_span();
        self.consume_token();
        let operand = self.cast_expression();
        let span = op_span.merge(operand.span);
        Expr::new(ExprKind::Unary(Box::new(UnaryExpr { op, operand })), span)
    }

    //  postfix_expression:
    //    primary_expression {"[" expression "]"}
    //    primary_expression {"." id_expression}
    //    primary_expression {"->" id_expression}
    //    primary_expression {"++" | "--"}
    fn postfix_expression(&mut self) -> Expr {
        let mut lhs = self.primary_expression();

        loop {
            match self.kind() {
                TokenKind::Dot | TokenKind::Arrow => {
                    let kind = if self.kind() == TokenKind::Dot {
                        MemberOfKind::OfObject
                    } else {
                        MemberOfKind::OfPointer
                    };
                    self.consume_token();
                    let member = self.id_expression();
                    let span = lhs.span.merge(self.previous_span());
                    lhs = Expr::new(
                        ExprKind::MemberOf(Box::new(MemberOfExpr {
                            kind,
                            base: lhs,
                            member,
                        })),
                        span,
                    );
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let span = self.current_span();
                    self.bail_out(
                        ErrorCode::NotImplemented,
                        format!(
                            "postfix increment/decrement is not supported: {}",
                            self.token_description()
                        ),
                        span,
                    );
                    return self.error_expr(span);
                }
                TokenKind::LBracket => {
                    self.consume_token();
                    let rhs = self.expression();
                    self.expect(TokenKind::RBracket);
                    self.consume_token();
                    let span = lhs.span.merge(self.previous_span());
                    lhs = Expr::new(
                        ExprKind::Binary(Box::new(BinaryExpr {
                            op: BinaryOp::Subscript,
                            lhs,
                            rhs,
                        })),
                        span,
                    );
                }
                _ => break,
            }
        }

        lhs
    }

    //  primary_expression:
    //    numeric_literal
    //    boolean_literal
    //    pointer_literal
    //    id_expression
    //    "this"
    //    "(" expression ")"
    fn primary_expression(&mut self) -> Expr {
        let span = self.current_span();
        match self.kind() {
            TokenKind::NumericConstant => self.numeric_literal(),
            TokenKind::KwTrue | TokenKind::KwFalse => self.boolean_literal(),
            TokenKind::KwNullptr => self.pointer_literal(),
            TokenKind::ColonColon | TokenKind::Identifier => {
                let name = self.id_expression();
                tracing::trace!(identifier = %name, "looking up identifier");
                match self.ctx.lookup_identifier(&name) {
                    Some(value) => Expr::new(
                        ExprKind::Identifier(IdentifierExpr {
                            name,
                            value,
                            is_rvalue: false,
                        }),
                        span.merge(self.previous_span()),
                    ),
                    None => {
                        self.bail_out(
                            ErrorCode::UndeclaredIdentifier,
                            format!("use of undeclared identifier '{}'", name),
                            span,
                        );
                        self.error_expr(span)
                    }
                }
            }
            TokenKind::KwThis => {
                self.consume_token();
                // As per the C++ standard, `this` is a prvalue.
                match self.ctx.lookup_identifier("this") {
                    Some(value) => Expr::new(
                        ExprKind::Identifier(IdentifierExpr {
                            name: "this".to_string(),
                            value,
                            is_rvalue: true,
                        }),
                        span,
                    ),
                    None => {
                        self.bail_out(
                            ErrorCode::UndeclaredIdentifier,
                            "invalid use of 'this' outside of a non-static member function"
                                .to_string(),
                            span,
                        );
                        self.error_expr(span)
                    }
                }
            }
            TokenKind::LParen => {
                self.consume_token();
                let expr = self.expression();
                self.expect(TokenKind::RParen);
                self.consume_token();
                expr
            }
            _ => {
                self.bail_out(
                    ErrorCode::Unknown,
                    format!("unexpected token: {}", self.token_description()),
                    span,
                );
                self.error_expr(span)
            }
        }
    }

    // ---- literals ----------------------------------------------------------

    //  numeric_literal: a whole pp-number spelling, validated and typed
    //  against the target's integer widths.
    fn numeric_literal(&mut self) -> Expr {
        let span = self.current_span();
        let spelling = self.stream.current().lexeme.to_string();

        let literal = match literal::scan_numeric_literal(&spelling) {
            Ok(literal) => literal,
            Err(error) => {
                self.bail_out(
                    ErrorCode::InvalidNumericLiteral,
                    format!("{}: {}", error, self.token_description()),
                    span,
                );
                return self.error_expr(span);
            }
        };
        self.consume_token();

        let value = match literal.value {
            LiteralValue::Integer(magnitude) => {
                let kind = literal::pick_integer_type(&literal, magnitude, &self.options.layout);
                let ty = self.ctx.basic_type(kind);
                self.ctx.value_from_int(magnitude, !kind.is_unsigned(), &ty)
            }
            LiteralValue::Floating(v) => {
                let kind = literal::pick_float_type(&literal);
                let ty = self.ctx.basic_type(kind);
                self.ctx.value_from_float(v, &ty)
            }
        };
        Expr::new(ExprKind::Literal(LiteralExpr { value }), span)
    }

    //  boolean_literal: "true" | "false"
    fn boolean_literal(&mut self) -> Expr {
        let span = self.current_span();
        let value = self.kind() == TokenKind::KwTrue;
        self.consume_token();
        Expr::new(
            ExprKind::Literal(LiteralExpr {
                value: self.ctx.value_from_bool(value),
            }),
            span,
        )
    }

    //  pointer_literal: "nullptr"
    fn pointer_literal(&mut self) -> Expr {
        let span = self.current_span();
        self.consume_token();
        Expr::new(
            ExprKind::Literal(LiteralExpr {
                value: self.ctx.value_nullptr(),
            }),
            span,
        )
    }

    // ---- type-ids ----------------------------------------------------------

    //  type_id:
    //    type_specifier_seq {abstract_declarator}
    //
    //  abstract_declarator:
    //    ptr_operator {abstract_declarator}
    fn type_id(&mut self) -> TypeDeclaration {
        let mut type_decl = TypeDeclaration::default();
        self.type_specifier_seq(&mut type_decl);
        while matches!(self.kind(), TokenKind::Star | TokenKind::Ampersand) {
            self.ptr_operator(&mut type_decl);
        }
        type_decl
    }

    //  type_specifier_seq:
    //    type_specifier {type_specifier_seq}
    fn type_specifier_seq(&mut self, type_decl: &mut TypeDeclaration) {
        while self.type_specifier(type_decl) {}
    }

    //  type_specifier:
    //    simple_type_specifier
    //    cv_qualifier
    //
    //  simple_type_specifier:
    //    {"::"} {nested_name_specifier} type_name
    //    "void" | "bool" | "char" | "char16_t" | "char32_t" | "wchar_t"
    //    "short" | "int" | "long" | "signed" | "unsigned" | "float" | "double"
    //
    // Returns true if a type_specifier was parsed at this position. A failed
    // attempt consumes nothing: the user-defined-name form runs under its
    // own snapshot.
    fn type_specifier(&mut self, type_decl: &mut TypeDeclaration) -> bool {
        if self.is_cv_qualifier() {
            // cv-qualifiers are irrelevant to casting; parse and discard.
            self.consume_token();
            return true;
        }

        if self.is_simple_type_keyword() {
            type_decl
                .typenames
                .push(self.stream.current().lexeme.to_string());
            self.consume_token();
            return true;
        }

        if !matches!(self.kind(), TokenKind::ColonColon | TokenKind::Identifier) {
            return false;
        }

        let snapshot = self.tentative();
        let mut global_scope = false;
        if self.kind() == TokenKind::ColonColon {
            global_scope = true;
            self.consume_token();
        }
        let nested_name_specifier = self.nested_name_specifier();
        let type_name = self.type_name();

        if type_name.is_empty() {
            self.rollback(snapshot);
            return false;
        }
        self.commit(snapshot);
        type_decl.typenames.push(format!(
            "{}{}{}",
            if global_scope { "::" } else { "" },
            nested_name_specifier,
            type_name
        ));
        true
    }

    //  nested_name_specifier:
    //    identifier "::" {nested_name_specifier}
    //    simple_template_id "::" {nested_name_specifier}
    fn nested_name_specifier(&mut self) -> String {
        if self.kind() != TokenKind::Identifier {
            return String::new();
        }

        if self.stream.look_ahead(1).kind == TokenKind::ColonColon {
            let identifier = self.stream.current().lexeme.to_string();
            self.consume_token();
            self.expect(TokenKind::ColonColon);
            self.consume_token();
            return format!("{}::{}", identifier, self.nested_name_specifier());
        }

        if self.stream.look_ahead(1).kind == TokenKind::Lt {
            // Could be a simple_template_id qualifying a deeper name, or just
            // a type_name. Only the "::" after it tells them apart.
            let snapshot = self.tentative();
            let type_name = self.type_name();
            if !type_name.is_empty() && self.kind() == TokenKind::ColonColon {
                self.commit(snapshot);
                self.consume_token();
                return format!("{}::{}", type_name, self.nested_name_specifier());
            }
            self.rollback(snapshot);
        }

        String::new()
    }

    //  type_name:
    //    identifier
    //    identifier "<" {template_argument_list} ">"
    //
    // Returns the empty string when no type_name starts here.
    fn type_name(&mut self) -> String {
        if self.kind() != TokenKind::Identifier {
            return String::new();
        }

        if self.stream.look_ahead(1).kind == TokenKind::Lt {
            let template_name = self.stream.current().lexeme.to_string();
            self.consume_token();
            self.consume_token(); // '<'

            if self.kind() == TokenKind::Gt {
                self.consume_token();
                return format!("{}<>", template_name);
            }

            let arguments = self.template_argument_list();
            if self.kind() == TokenKind::Gt {
                self.consume_token();
                return format!("{}<{}>", template_name, arguments);
            }
            return String::new();
        }

        let identifier = self.stream.current().lexeme.to_string();
        self.consume_token();
        identifier
    }

    //  template_argument_list:
    //    template_argument {"," template_argument}
    fn template_argument_list(&mut self) -> String {
        let mut arguments: Vec<String> = Vec::new();

        loop {
            if !arguments.is_empty() {
                self.consume_token(); // ','
            }
            let argument = self.template_argument();
            if argument.is_empty() {
                return String::new();
            }
            arguments.push(argument);
            if self.kind() != TokenKind::Comma {
                break;
            }
        }

        // Nested template names keep a space before the closing ">" so the
        // rendered name never contains ">>".
        if let Some(last) = arguments.last_mut() {
            if last.ends_with('>') {
                last.push(' ');
            }
        }
        arguments.join(", ")
    }

    //  template_argument:
    //    type_id
    //    id_expression
    //
    // Per [temp.arg], an ambiguity between a type-id and an expression is
    // resolved to a type-id; try that first. Non-type constant arguments are
    // rejected outright.
    fn template_argument(&mut self) -> String {
        {
            let snapshot = self.tentative();
            let type_decl = self.type_id();
            if self.resolve_type_decl(&type_decl).is_some()
                && matches!(self.kind(), TokenKind::Comma | TokenKind::Gt)
            {
                self.commit(snapshot);
                return type_decl.name();
            }
            self.rollback(snapshot);
        }

        {
            let snapshot = self.tentative();
            let id_expression = self.id_expression();
            if !id_expression.is_empty()
                && matches!(self.kind(), TokenKind::Comma | TokenKind::Gt)
            {
                self.commit(snapshot);
                return id_expression;
            }
            self.rollback(snapshot);
        }

        if self.kind() == TokenKind::NumericConstant {
            let span = self.current_span();
            self.bail_out(
                ErrorCode::InvalidExpressionSyntax,
                format!(
                    "numeric template arguments are not supported: {}",
                    self.token_description()
                ),
                span,
            );
        }

        String::new()
    }

    //  ptr_operator:
    //    "*" {cv_qualifier}
    //    "&"
    fn ptr_operator(&mut self, type_decl: &mut TypeDeclaration) {
        if self.kind() == TokenKind::Star {
            type_decl.ptr_operators.push(PtrOperator::Pointer);
            self.consume_token();
            while self.is_cv_qualifier() {
                self.consume_token();
            }
        } else if self.kind() == TokenKind::Ampersand {
            type_decl.ptr_operators.push(PtrOperator::Reference);
            self.consume_token();
        }
    }

    fn resolve_type_decl(&self, type_decl: &TypeDeclaration) -> Option<TypeHandle> {
        if !type_decl.is_valid() {
            return None;
        }
        let name = type_decl.base_name();
        tracing::trace!(%name, "resolving type");
        self.ctx.resolve_type(&name)
    }

    /// Apply the pointer/reference declarators to a resolved base type.
    /// Bails out with `InvalidOperandType` when the target rejects a
    /// combination.
    fn apply_declarators(
        &mut self,
        base: TypeHandle,
        type_decl: &TypeDeclaration,
    ) -> Option<TypeHandle> {
        let mut ty = base;
        for op in &type_decl.ptr_operators {
            match op {
                PtrOperator::Pointer => match self.ctx.pointer_to(&ty) {
                    Some(next) => ty = next,
                    None => {
                        let span = self.current_span();
                        self.bail_out(
                            ErrorCode::InvalidOperandType,
                            format!(
                                "'type name' declared as a pointer to a reference of type '{}'",
                                ty.name()
                            ),
                            span,
                        );
                        return None;
                    }
                },
                PtrOperator::Reference => match self.ctx.reference_to(&ty) {
                    Some(next) => ty = next,
                    None => {
                        let span = self.current_span();
                        self.bail_out(
                            ErrorCode::InvalidOperandType,
                            "type name declared as a reference to a reference".to_string(),
                            span,
                        );
                        return None;
                    }
                },
            }
        }
        Some(ty)
    }

    fn is_cv_qualifier(&self) -> bool {
        matches!(self.kind(), TokenKind::KwConst | TokenKind::KwVolatile)
    }

    fn is_simple_type_keyword(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::KwVoid
                | TokenKind::KwBool
                | TokenKind::KwChar
                | TokenKind::KwChar16T
                | TokenKind::KwChar32T
                | TokenKind::KwWcharT
                | TokenKind::KwShort
                | TokenKind::KwInt
                | TokenKind::KwLong
                | TokenKind::KwSigned
                | TokenKind::KwUnsigned
                | TokenKind::KwFloat
                | TokenKind::KwDouble
        )
    }

    // ---- id-expressions ----------------------------------------------------

    //  id_expression:
    //    unqualified_id
    //    {"::"} {nested_name_specifier} unqualified_id
    //    {"::"} identifier
    fn id_expression(&mut self) -> String {
        let mut global_scope = false;
        if self.kind() == TokenKind::ColonColon {
            global_scope = true;
            self.consume_token();
        }

        let nested_name_specifier = self.nested_name_specifier();

        if !nested_name_specifier.is_empty() {
            let unqualified_id = self.unqualified_id();
            return format!(
                "{}{}{}",
                if global_scope { "::" } else { "" },
                nested_name_specifier,
                unqualified_id
            );
        }

        if global_scope {
            self.expect(TokenKind::Identifier);
            let identifier = self.stream.current().lexeme.to_string();
            self.consume_token();
            return format!("::{}", identifier);
        }

        self.unqualified_id()
    }

    //  unqualified_id:
    //    identifier
    fn unqualified_id(&mut self) -> String {
        self.expect(TokenKind::Identifier);
        // In bail-out mode the current token is Eof with an empty lexeme, so
        // this degrades to the empty string.
        let identifier = self.stream.current().lexeme.to_string();
        self.consume_token();
        identifier
    }
}
