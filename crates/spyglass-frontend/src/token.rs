// token.rs

/// Single source of truth for keyword-to-token mapping.
///
/// Each entry `"text" => Variant` generates:
/// - A match arm in `TokenKind::keyword_kind`: `"text" => Some(TokenKind::Variant)`
/// - A match arm in `TokenKind::as_str`:       `Self::Variant => "text"`
macro_rules! define_keywords {
    ( $( $text:literal => $variant:ident ),+ $(,)? ) => {
        impl TokenKind {
            /// Check if a string is a keyword and return its token kind.
            pub fn keyword_kind(text: &str) -> Option<TokenKind> {
                match text {
                    $( $text => Some(TokenKind::$variant), )+
                    _ => None,
                }
            }

            /// String representation for keyword tokens (used by `as_str`).
            fn keyword_as_str(&self) -> Option<&'static str> {
                match self {
                    $( Self::$variant => Some($text), )+
                    _ => None,
                }
            }
        }
    };
}

define_keywords! {
    // Literal keywords
    "true"     => KwTrue,
    "false"    => KwFalse,
    "nullptr"  => KwNullptr,
    "this"     => KwThis,
    // cv-qualifiers (parsed and discarded in type-ids)
    "const"    => KwConst,
    "volatile" => KwVolatile,
    // Simple type specifiers
    "void"     => KwVoid,
    "bool"     => KwBool,
    "char"     => KwChar,
    "char16_t" => KwChar16T,
    "char32_t" => KwChar32T,
    "wchar_t"  => KwWcharT,
    "short"    => KwShort,
    "int"      => KwInt,
    "long"     => KwLong,
    "signed"   => KwSigned,
    "unsigned" => KwUnsigned,
    "float"    => KwFloat,
    "double"   => KwDouble,
}

/// All token kinds in the C++ expression subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals and names
    NumericConstant,
    Identifier,

    // Keywords
    KwTrue,
    KwFalse,
    KwNullptr,
    KwThis,
    KwConst,
    KwVolatile,

    // Simple type specifier keywords
    KwVoid,
    KwBool,
    KwChar,
    KwChar16T,
    KwChar32T,
    KwWcharT,
    KwShort,
    KwInt,
    KwLong,
    KwSigned,
    KwUnsigned,
    KwFloat,
    KwDouble,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,   // ++
    MinusMinus, // --
    EqEq,
    BangEq,
    Bang,     // !
    AmpAmp,   // &&
    PipePipe, // ||
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq, // = (recognized so the parser can reject assignment cleanly)

    // Bitwise operators
    Ampersand,      // &
    Pipe,           // |
    Caret,          // ^
    Tilde,          // ~
    LessLess,       // <<
    GreaterGreater, // >>
    Question,       // ?

    // Delimiters
    LParen,
    RParen,
    LBracket, // [
    RBracket, // ]
    Comma,
    Colon,
    ColonColon, // ::
    Dot,
    Arrow, // ->

    // Special
    Eof,
    Unknown,
}

impl TokenKind {
    /// Get string representation for error messages
    pub fn as_str(&self) -> &'static str {
        // Keywords are defined once in `define_keywords!`; delegate to the
        // generated helper so they never diverge from `keyword_kind()`.
        if let Some(s) = self.keyword_as_str() {
            return s;
        }
        match self {
            Self::NumericConstant => "numeric constant",
            Self::Identifier => "identifier",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::EqEq => "==",
            Self::BangEq => "!=",
            Self::Bang => "!",
            Self::AmpAmp => "&&",
            Self::PipePipe => "||",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Eq => "=",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::Tilde => "~",
            Self::LessLess => "<<",
            Self::GreaterGreater => ">>",
            Self::Question => "?",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::ColonColon => "::",
            Self::Dot => ".",
            Self::Arrow => "->",
            Self::Eof => "end of expression",
            Self::Unknown => "unknown",
            // All keyword variants are handled by `keyword_as_str()` above.
            _ => unreachable!("keyword variant not covered by define_keywords! macro"),
        }
    }

    /// Precedence for binary operators (the C++ ladder from `||` up to
    /// `* / %`). Zero means "not a binary operator"; the Pratt loop in the
    /// parser stops there.
    pub fn precedence(&self) -> u8 {
        match self {
            Self::PipePipe => 1,
            Self::AmpAmp => 2,
            Self::Pipe => 3,
            Self::Caret => 4,
            Self::Ampersand => 5,
            Self::EqEq | Self::BangEq => 6,
            Self::Lt | Self::Gt | Self::LtEq | Self::GtEq => 7,
            Self::LessLess | Self::GreaterGreater => 8,
            Self::Plus | Self::Minus => 9,
            Self::Star | Self::Slash | Self::Percent => 10,
            _ => 0,
        }
    }
}

// Re-export Span from spyglass-identity (canonical definition)
pub use spyglass_identity::Span;

/// A token with its location in the expression source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: std::borrow::Cow<'src, str>,
    pub span: Span,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, lexeme: impl Into<std::borrow::Cow<'src, str>>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// Token rendering used in diagnostics: `<'spelling' (kind)>`.
    pub fn description(&self) -> String {
        format!("<'{}' ({})>", self.lexeme, self.kind.as_str())
    }
}
