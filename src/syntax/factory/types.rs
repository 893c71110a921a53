//! Type syntax.

use rowan::NodeOrToken;

use super::{Element, keyword, node, owned, punct, push_separated, syntax_wrapper, token};
use crate::syntax::SyntaxKind;
use crate::syntax::lexer::significant_tokens;

syntax_wrapper! {
    /// A type reference such as `global::System.Int32?` or `List<T>`.
    TypeSyntax,
}

impl TypeSyntax {
    /// Tokenizes a type display string.
    pub fn parse(text: &str) -> Self {
        let children = significant_tokens(text)
            .into_iter()
            .map(|t| token(t.kind, t.text))
            .collect();
        Self(node(SyntaxKind::Type, children))
    }

    pub fn keyword(name: &str) -> Self {
        Self(node(SyntaxKind::Type, vec![keyword(name)]))
    }

    pub fn void() -> Self {
        Self::keyword("void")
    }

    pub fn string() -> Self {
        Self::keyword("string")
    }

    pub fn object() -> Self {
        Self::keyword("object")
    }

    pub fn bool() -> Self {
        Self::keyword("bool")
    }

    pub fn uint() -> Self {
        Self::keyword("uint")
    }

    /// `name<args>`, where `name` may be qualified.
    pub fn generic(name: &str, args: Vec<TypeSyntax>) -> Self {
        let mut children: Vec<Element> = significant_tokens(name)
            .into_iter()
            .map(|t| token(t.kind, t.text))
            .collect();
        children.push(punct(SyntaxKind::LAngle));
        push_separated(&mut children, args);
        children.push(punct(SyntaxKind::RAngle));
        Self(node(SyntaxKind::Type, children))
    }

    /// Appends `?` unless the type is already annotated.
    pub fn nullable(self) -> Self {
        if self.is_nullable() {
            return self;
        }
        self.with_suffix(&[SyntaxKind::Question])
    }

    pub fn array(self) -> Self {
        self.with_suffix(&[SyntaxKind::LBracket, SyntaxKind::RBracket])
    }

    pub fn pointer(self) -> Self {
        self.with_suffix(&[SyntaxKind::Star])
    }

    pub fn is_nullable(&self) -> bool {
        matches!(
            self.0.children().last(),
            Some(NodeOrToken::Token(t)) if SyntaxKind::from(t.kind()) == SyntaxKind::Question
        )
    }

    /// The type written as source text.
    pub fn text(&self) -> String {
        crate::syntax::render::render_inline(&self.0)
    }

    fn with_suffix(self, kinds: &[SyntaxKind]) -> Self {
        let mut children: Vec<Element> = self.0.children().map(owned).collect();
        children.extend(kinds.iter().map(|k| punct(*k)));
        Self(node(SyntaxKind::Type, children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_text() {
        let ty = TypeSyntax::parse("global::System.Collections.Generic.List<global::Foo.Bar?>");
        assert_eq!(ty.text(), "global::System.Collections.Generic.List<global::Foo.Bar?>");
    }

    #[test]
    fn test_nullable_is_idempotent() {
        let ty = TypeSyntax::string().nullable().nullable();
        assert_eq!(ty.text(), "string?");
    }

    #[test]
    fn test_params_array() {
        let ty = TypeSyntax::object().nullable().array().nullable();
        assert_eq!(ty.text(), "object?[]?");
    }

    #[test]
    fn test_generic_with_multiple_arguments() {
        let ty = TypeSyntax::generic(
            "global::System.Numerics.IEqualityOperators",
            vec![TypeSyntax::parse("Id"), TypeSyntax::uint(), TypeSyntax::bool()],
        );
        assert_eq!(ty.text(), "global::System.Numerics.IEqualityOperators<Id, uint, bool>");
    }

    #[test]
    fn test_pointer() {
        assert_eq!(TypeSyntax::uint().pointer().text(), "uint*");
    }
}
