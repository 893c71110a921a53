//! Syntax factory: builds C# green trees from semantic intent.
//!
//! Every generator assembles its output through these functions instead of
//! concatenating strings. Each wrapper type ([`TypeSyntax`],
//! [`ExpressionSyntax`], [`StatementSyntax`], [`MemberSyntax`], ...) is a
//! newtype over a [`GreenNode`], so values are immutable, cheap to clone and
//! structurally comparable. Layout is decided later by
//! [`render`](crate::syntax::render).

mod declarations;
mod expressions;
mod signature;
mod statements;
mod trivia;
mod types;

pub use declarations::{
    AccessorSyntax, AttributeListSyntax, AttributeSyntax, Body, CompilationUnitSyntax,
    ConstructorDeclarationSyntax, ConversionOperatorDeclarationSyntax, EnumDeclarationSyntax,
    EnumMemberSyntax, FieldDeclarationSyntax, IndexerDeclarationSyntax, MemberSyntax,
    MethodDeclarationSyntax, OperatorDeclarationSyntax, ParameterSyntax, PropertyDeclarationSyntax,
    TypeDeclarationKind, TypeDeclarationSyntax,
};
pub use expressions::{ArgumentSyntax, ExpressionSyntax, LambdaBody, PatternSyntax, SwitchArmSyntax};
pub use statements::StatementSyntax;
pub use trivia::{TriviaSyntax, xml_escape};
pub use types::TypeSyntax;

use rowan::{GreenNode, GreenNodeData, GreenToken, GreenTokenData, NodeOrToken};

use super::SyntaxKind;

/// A child of a green node.
pub type Element = NodeOrToken<GreenNode, GreenToken>;

pub(crate) fn token(kind: SyntaxKind, text: &str) -> Element {
    NodeOrToken::Token(GreenToken::new(kind.into(), text))
}

pub(crate) fn node(kind: SyntaxKind, children: Vec<Element>) -> GreenNode {
    GreenNode::new(kind.into(), children)
}

/// Clones a borrowed child into an owned element.
pub(crate) fn owned(child: NodeOrToken<&GreenNodeData, &GreenTokenData>) -> Element {
    match child {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.to_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.to_owned()),
    }
}

pub(crate) fn ident(text: &str) -> Element {
    token(SyntaxKind::Identifier, text)
}

pub(crate) fn keyword(text: &str) -> Element {
    token(SyntaxKind::Keyword, text)
}

pub(crate) fn punct(kind: SyntaxKind) -> Element {
    token(kind, punct_text(kind))
}

/// Fixed spelling of a punctuation kind.
pub fn punct_text(kind: SyntaxKind) -> &'static str {
    use SyntaxKind::*;
    match kind {
        LBrace => "{",
        RBrace => "}",
        LParen => "(",
        RParen => ")",
        LBracket => "[",
        RBracket => "]",
        LAngle | Lt => "<",
        RAngle | Gt => ">",
        LtEq => "<=",
        GtEq => ">=",
        Semicolon => ";",
        Comma => ",",
        Dot => ".",
        Colon => ":",
        ColonColon => "::",
        Question => "?",
        QuestionQuestion => "??",
        QuestionQuestionEq => "??=",
        Eq => "=",
        EqEq => "==",
        NotEq => "!=",
        FatArrow => "=>",
        Plus => "+",
        Minus => "-",
        Star => "*",
        Amp => "&",
        AmpAmp => "&&",
        PipePipe => "||",
        Pipe => "|",
        Bang => "!",
        PlusPlus => "++",
        MinusMinus => "--",
        _ => "",
    }
}

/// Pushes `items` separated by commas.
pub(crate) fn push_separated<T: Into<Element>>(children: &mut Vec<Element>, items: Vec<T>) {
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            children.push(punct(SyntaxKind::Comma));
        }
        children.push(item.into());
    }
}

/// Declares newtype wrappers over green nodes.
macro_rules! syntax_wrapper {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Debug, PartialEq, Eq, Hash)]
            pub struct $name(pub(crate) rowan::GreenNode);

            impl $name {
                pub fn green(&self) -> &rowan::GreenNode {
                    &self.0
                }

                pub fn into_green(self) -> rowan::GreenNode {
                    self.0
                }

                pub fn kind(&self) -> $crate::syntax::SyntaxKind {
                    self.0.kind().into()
                }
            }

            impl From<$name> for $crate::syntax::factory::Element {
                fn from(syntax: $name) -> Self {
                    rowan::NodeOrToken::Node(syntax.0)
                }
            }
        )*
    };
}

pub(crate) use syntax_wrapper;

/// Declaration modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Internal,
    File,
    Static,
    Readonly,
    Partial,
    Abstract,
    Sealed,
    Override,
    Virtual,
    Extern,
    Unsafe,
    Const,
    Implicit,
    Explicit,
    This,
    Params,
    Ref,
    Out,
    In,
    Scoped,
    Required,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Internal => "internal",
            Modifier::File => "file",
            Modifier::Static => "static",
            Modifier::Readonly => "readonly",
            Modifier::Partial => "partial",
            Modifier::Abstract => "abstract",
            Modifier::Sealed => "sealed",
            Modifier::Override => "override",
            Modifier::Virtual => "virtual",
            Modifier::Extern => "extern",
            Modifier::Unsafe => "unsafe",
            Modifier::Const => "const",
            Modifier::Implicit => "implicit",
            Modifier::Explicit => "explicit",
            Modifier::This => "this",
            Modifier::Params => "params",
            Modifier::Ref => "ref",
            Modifier::Out => "out",
            Modifier::In => "in",
            Modifier::Scoped => "scoped",
            Modifier::Required => "required",
        }
    }
}

pub(crate) fn modifiers(list: &[Modifier]) -> Element {
    NodeOrToken::Node(node(
        SyntaxKind::Modifiers,
        list.iter().map(|m| keyword(m.as_str())).collect(),
    ))
}

/// Escapes `value` as a regular C# string literal, quotes included.
pub fn string_literal_text(value: &str) -> String {
    let mut text = String::with_capacity(value.len() + 2);
    text.push('"');
    for c in value.chars() {
        match c {
            '"' => text.push_str("\\\""),
            '\\' => text.push_str("\\\\"),
            '\n' => text.push_str("\\n"),
            '\r' => text.push_str("\\r"),
            '\t' => text.push_str("\\t"),
            '\0' => text.push_str("\\0"),
            c if c.is_control() => text.push_str(&format!("\\u{:04X}", c as u32)),
            c => text.push(c),
        }
    }
    text.push('"');
    text
}
