//! Statement syntax.

use rowan::NodeOrToken;

use super::{
    ExpressionSyntax, TypeSyntax, ident, keyword, node, punct, syntax_wrapper, token,
};
use crate::syntax::SyntaxKind;

syntax_wrapper! {
    /// A statement, or a block of statements.
    StatementSyntax,
}

impl StatementSyntax {
    /// `expression;`
    pub fn expression(expression: ExpressionSyntax) -> Self {
        Self(node(
            SyntaxKind::ExpressionStatement,
            vec![expression.into(), punct(SyntaxKind::Semicolon)],
        ))
    }

    /// `return expression;`
    pub fn ret(expression: ExpressionSyntax) -> Self {
        Self(node(
            SyntaxKind::ReturnStatement,
            vec![
                keyword("return"),
                expression.into(),
                punct(SyntaxKind::Semicolon),
            ],
        ))
    }

    /// `return;`
    pub fn ret_void() -> Self {
        Self(node(
            SyntaxKind::ReturnStatement,
            vec![keyword("return"), punct(SyntaxKind::Semicolon)],
        ))
    }

    /// `Type name = value;`
    pub fn local(ty: TypeSyntax, name: &str, value: ExpressionSyntax) -> Self {
        let declarator = node(
            SyntaxKind::VariableDeclarator,
            vec![
                ident(name),
                NodeOrToken::Node(node(
                    SyntaxKind::EqualsValue,
                    vec![punct(SyntaxKind::Eq), value.into()],
                )),
            ],
        );
        Self(node(
            SyntaxKind::LocalDeclarationStatement,
            vec![
                ty.into(),
                NodeOrToken::Node(declarator),
                punct(SyntaxKind::Semicolon),
            ],
        ))
    }

    /// `if (condition) { statements }`
    pub fn if_then(condition: ExpressionSyntax, statements: Vec<StatementSyntax>) -> Self {
        Self(node(
            SyntaxKind::IfStatement,
            vec![
                keyword("if"),
                punct(SyntaxKind::LParen),
                condition.into(),
                punct(SyntaxKind::RParen),
                Self::block_node(statements).into(),
            ],
        ))
    }

    /// `throw expression;`
    pub fn throw(expression: ExpressionSyntax) -> Self {
        Self(node(
            SyntaxKind::ThrowStatement,
            vec![
                keyword("throw"),
                expression.into(),
                punct(SyntaxKind::Semicolon),
            ],
        ))
    }

    /// `; // comment`
    pub fn empty_with_comment(comment: &str) -> Self {
        Self(node(
            SyntaxKind::EmptyStatement,
            vec![
                punct(SyntaxKind::Semicolon),
                token(SyntaxKind::LineComment, &format!("// {comment}")),
            ],
        ))
    }

    /// `{ statements }`
    pub fn block_node(statements: Vec<StatementSyntax>) -> Self {
        let mut children = Vec::with_capacity(statements.len() + 2);
        children.push(punct(SyntaxKind::LBrace));
        children.extend(statements.into_iter().map(Into::into));
        children.push(punct(SyntaxKind::RBrace));
        Self(node(SyntaxKind::Block, children))
    }
}
