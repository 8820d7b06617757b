// errors.rs
//! Parse errors. One error per parse: the first bail-out wins and everything
//! after it unwinds.

use std::fmt;

use miette::{Diagnostic, LabeledSpan, Severity};
use thiserror::Error;

use crate::Span;

/// The closed set of failure categories surfaced to the embedder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Unknown,
    InvalidExpressionSyntax,
    InvalidNumericLiteral,
    InvalidOperandType,
    UndeclaredIdentifier,
    NotImplemented,
}

impl ErrorCode {
    /// Stable code string for diagnostics tooling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "spyglass::unknown",
            Self::InvalidExpressionSyntax => "spyglass::invalid_expression_syntax",
            Self::InvalidNumericLiteral => "spyglass::invalid_numeric_literal",
            Self::InvalidOperandType => "spyglass::invalid_operand_type",
            Self::UndeclaredIdentifier => "spyglass::undeclared_identifier",
            Self::NotImplemented => "spyglass::not_implemented",
        }
    }
}

/// A parse failure: the category, the fully rendered three-line diagnostic
/// (`file:line:col: message`, source excerpt, caret), and the offending span.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct EvalError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl EvalError {
    pub fn new(code: ErrorCode, message: String, span: Span) -> Self {
        Self {
            code,
            message,
            span,
        }
    }
}

// Hand-implemented: the code is data, which the derive cannot express.
impl Diagnostic for EvalError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code.as_str()))
    }

    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            None,
            miette::SourceSpan::from(self.span),
        ))))
    }
}
