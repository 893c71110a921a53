//! Expression syntax.

use rowan::NodeOrToken;

use super::{
    Element, Modifier, StatementSyntax, TypeSyntax, ident, keyword, modifiers, node, punct,
    push_separated, string_literal_text, syntax_wrapper, token,
};
use crate::syntax::SyntaxKind;

syntax_wrapper! {
    /// An expression.
    ExpressionSyntax,
    /// One argument of an invocation, object creation or attribute.
    ArgumentSyntax,
    /// A pattern in a switch arm or `is` expression.
    PatternSyntax,
    /// `pattern => expression` inside a switch expression.
    SwitchArmSyntax,
}

/// Body of a lambda.
pub enum LambdaBody {
    Expression(ExpressionSyntax),
    Block(Vec<StatementSyntax>),
}

fn argument_list(kind: SyntaxKind, args: Vec<ArgumentSyntax>) -> Element {
    let (open, close) = match kind {
        SyntaxKind::BracketedArgumentList => (SyntaxKind::LBracket, SyntaxKind::RBracket),
        _ => (SyntaxKind::LParen, SyntaxKind::RParen),
    };
    let mut children = vec![punct(open)];
    push_separated(&mut children, args);
    children.push(punct(close));
    NodeOrToken::Node(node(kind, children))
}

fn type_argument_list(args: Vec<TypeSyntax>) -> Element {
    let mut children = vec![punct(SyntaxKind::LAngle)];
    push_separated(&mut children, args);
    children.push(punct(SyntaxKind::RAngle));
    NodeOrToken::Node(node(SyntaxKind::TypeArgumentList, children))
}

impl ExpressionSyntax {
    pub fn ident(name: &str) -> Self {
        Self(node(SyntaxKind::IdentifierName, vec![ident(name)]))
    }

    /// A generic name such as `GetRequiredService<T>`.
    pub fn generic_name(name: &str, args: Vec<TypeSyntax>) -> Self {
        Self(node(
            SyntaxKind::GenericName,
            vec![ident(name), type_argument_list(args)],
        ))
    }

    /// A keyword used as an expression: `this`, `base`, `field`, `value`.
    pub fn keyword(word: &str) -> Self {
        Self(node(SyntaxKind::IdentifierName, vec![keyword(word)]))
    }

    pub fn this() -> Self {
        Self::keyword("this")
    }

    pub fn field() -> Self {
        Self::keyword("field")
    }

    /// A type in expression position, e.g. the receiver of a static call.
    pub fn from_type(ty: TypeSyntax) -> Self {
        Self(ty.0)
    }

    /// Parses a dotted name like `global::System.Enum` as an expression.
    pub fn qualified(name: &str) -> Self {
        Self::from_type(TypeSyntax::parse(name))
    }

    pub fn member(self, name: &str) -> Self {
        Self(node(
            SyntaxKind::MemberAccess,
            vec![
                self.into(),
                punct(SyntaxKind::Dot),
                ExpressionSyntax::ident(name).into(),
            ],
        ))
    }

    pub fn generic_member(self, name: &str, args: Vec<TypeSyntax>) -> Self {
        Self(node(
            SyntaxKind::MemberAccess,
            vec![
                self.into(),
                punct(SyntaxKind::Dot),
                ExpressionSyntax::generic_name(name, args).into(),
            ],
        ))
    }

    pub fn invoke(self, args: Vec<ArgumentSyntax>) -> Self {
        Self(node(
            SyntaxKind::Invocation,
            vec![self.into(), argument_list(SyntaxKind::ArgumentList, args)],
        ))
    }

    /// `self(arg0, arg1, ...)` with plain expression arguments.
    pub fn call(self, args: Vec<ExpressionSyntax>) -> Self {
        self.invoke(args.into_iter().map(ArgumentSyntax::new).collect())
    }

    pub fn element_access(self, args: Vec<ArgumentSyntax>) -> Self {
        Self(node(
            SyntaxKind::ElementAccess,
            vec![
                self.into(),
                argument_list(SyntaxKind::BracketedArgumentList, args),
            ],
        ))
    }

    fn literal(kind: SyntaxKind, text: &str) -> Self {
        Self(node(SyntaxKind::Literal, vec![token(kind, text)]))
    }

    pub fn string(value: &str) -> Self {
        Self::literal(SyntaxKind::StringLiteral, &string_literal_text(value))
    }

    /// A numeric literal spelled exactly as `text`.
    pub fn number(text: &str) -> Self {
        Self::literal(SyntaxKind::NumericLiteral, text)
    }

    /// `1.5F`, or `float.NaN` and the infinities.
    pub fn float(value: f32) -> Self {
        non_finite("float", value.into()).unwrap_or_else(|| Self::number(&format!("{value:?}F")))
    }

    /// `1.5D`, or `double.NaN` and the infinities. The suffix keeps the type
    /// when the value is boxed.
    pub fn double(value: f64) -> Self {
        non_finite("double", value).unwrap_or_else(|| Self::number(&format!("{value:?}D")))
    }

    pub fn char(text: &str) -> Self {
        Self::literal(SyntaxKind::CharLiteral, text)
    }

    pub fn bool(value: bool) -> Self {
        Self(node(
            SyntaxKind::Literal,
            vec![keyword(if value { "true" } else { "false" })],
        ))
    }

    pub fn null() -> Self {
        Self(node(SyntaxKind::Literal, vec![keyword("null")]))
    }

    /// The `default` literal.
    pub fn default_literal() -> Self {
        Self(node(SyntaxKind::Literal, vec![keyword("default")]))
    }

    /// `$"..."` with `template` copied verbatim between the quotes.
    pub fn interpolated(template: &str) -> Self {
        Self::literal(SyntaxKind::InterpolatedString, &format!("$\"{template}\""))
    }

    pub fn type_of(ty: TypeSyntax) -> Self {
        Self(node(
            SyntaxKind::TypeOf,
            vec![
                keyword("typeof"),
                punct(SyntaxKind::LParen),
                ty.into(),
                punct(SyntaxKind::RParen),
            ],
        ))
    }

    pub fn default_of(ty: TypeSyntax) -> Self {
        Self(node(
            SyntaxKind::DefaultExpr,
            vec![
                keyword("default"),
                punct(SyntaxKind::LParen),
                ty.into(),
                punct(SyntaxKind::RParen),
            ],
        ))
    }

    pub fn name_of(name: &str) -> Self {
        Self::ident("nameof").call(vec![Self::ident(name)])
    }

    /// Target-typed `new(args)`.
    pub fn new_implicit(args: Vec<ArgumentSyntax>) -> Self {
        Self(node(
            SyntaxKind::ObjectCreation,
            vec![keyword("new"), argument_list(SyntaxKind::ArgumentList, args)],
        ))
    }

    pub fn new_object(ty: TypeSyntax, args: Vec<ArgumentSyntax>) -> Self {
        Self(node(
            SyntaxKind::ObjectCreation,
            vec![
                keyword("new"),
                ty.into(),
                argument_list(SyntaxKind::ArgumentList, args),
            ],
        ))
    }

    pub fn cast(ty: TypeSyntax, operand: ExpressionSyntax) -> Self {
        Self(node(
            SyntaxKind::Cast,
            vec![
                punct(SyntaxKind::LParen),
                ty.into(),
                punct(SyntaxKind::RParen),
                operand.into(),
            ],
        ))
    }

    pub fn parenthesized(self) -> Self {
        Self(node(
            SyntaxKind::Parenthesized,
            vec![
                punct(SyntaxKind::LParen),
                self.into(),
                punct(SyntaxKind::RParen),
            ],
        ))
    }

    /// `op operand`, e.g. `-1`, `!x`, `*p`, `&value`, `++x`.
    pub fn prefix(op: SyntaxKind, operand: ExpressionSyntax) -> Self {
        Self(node(SyntaxKind::PrefixUnary, vec![punct(op), operand.into()]))
    }

    /// `operand op`, e.g. `x!`, `i++`.
    pub fn postfix(self, op: SyntaxKind) -> Self {
        Self(node(SyntaxKind::PostfixUnary, vec![self.into(), punct(op)]))
    }

    /// `operand!`
    pub fn suppress_nullable(self) -> Self {
        self.postfix(SyntaxKind::Bang)
    }

    pub fn binary(self, op: SyntaxKind, right: ExpressionSyntax) -> Self {
        Self(node(
            SyntaxKind::Binary,
            vec![self.into(), punct(op), right.into()],
        ))
    }

    pub fn assign(self, value: ExpressionSyntax) -> Self {
        Self(node(
            SyntaxKind::Assignment,
            vec![self.into(), punct(SyntaxKind::Eq), value.into()],
        ))
    }

    /// `self ??= value`
    pub fn coalesce_assign(self, value: ExpressionSyntax) -> Self {
        Self(node(
            SyntaxKind::Assignment,
            vec![
                self.into(),
                punct(SyntaxKind::QuestionQuestionEq),
                value.into(),
            ],
        ))
    }

    /// `self ?? value`
    pub fn coalesce(self, value: ExpressionSyntax) -> Self {
        self.binary(SyntaxKind::QuestionQuestion, value)
    }

    /// A lambda; one parameter is written bare, others are parenthesized.
    pub fn lambda(mods: &[Modifier], parameters: &[&str], body: LambdaBody) -> Self {
        let mut children = Vec::new();
        if !mods.is_empty() {
            children.push(modifiers(mods));
        }
        if let [parameter] = parameters {
            children.push(ident(parameter));
        } else {
            let mut list = vec![punct(SyntaxKind::LParen)];
            push_separated(
                &mut list,
                parameters
                    .iter()
                    .map(|p| NodeOrToken::Node(node(SyntaxKind::Parameter, vec![ident(p)])))
                    .collect::<Vec<Element>>(),
            );
            list.push(punct(SyntaxKind::RParen));
            children.push(NodeOrToken::Node(node(SyntaxKind::ParameterList, list)));
        }
        children.push(punct(SyntaxKind::FatArrow));
        match body {
            LambdaBody::Expression(expression) => children.push(expression.into()),
            LambdaBody::Block(statements) => {
                children.push(StatementSyntax::block_node(statements).into())
            }
        }
        Self(node(SyntaxKind::Lambda, children))
    }

    /// `self switch { arms }`
    pub fn switch(self, arms: Vec<SwitchArmSyntax>) -> Self {
        let mut list = vec![punct(SyntaxKind::LBrace)];
        push_separated(&mut list, arms);
        list.push(punct(SyntaxKind::RBrace));
        Self(node(
            SyntaxKind::SwitchExpression,
            vec![
                self.into(),
                keyword("switch"),
                NodeOrToken::Node(node(SyntaxKind::SwitchArmList, list)),
            ],
        ))
    }

    /// `self is pattern`
    pub fn is_pattern(self, pattern: PatternSyntax) -> Self {
        Self(node(
            SyntaxKind::IsPattern,
            vec![self.into(), keyword("is"), pattern.into()],
        ))
    }

    pub fn throw(expression: ExpressionSyntax) -> Self {
        Self(node(
            SyntaxKind::ThrowExpression,
            vec![keyword("throw"), expression.into()],
        ))
    }

    /// `[a, b]`
    pub fn collection(items: Vec<ExpressionSyntax>) -> Self {
        let mut children = vec![punct(SyntaxKind::LBracket)];
        push_separated(&mut children, items);
        children.push(punct(SyntaxKind::RBracket));
        Self(node(SyntaxKind::CollectionExpression, children))
    }

    /// The expression written as source text on one line.
    pub fn text(&self) -> String {
        crate::syntax::render::render_inline(&self.0)
    }
}

impl ArgumentSyntax {
    pub fn new(expression: ExpressionSyntax) -> Self {
        Self(node(SyntaxKind::Argument, vec![expression.into()]))
    }

    /// `name = expression`, as used by attribute arguments.
    pub fn name_equals(name: &str, expression: ExpressionSyntax) -> Self {
        Self(node(
            SyntaxKind::Argument,
            vec![ident(name), punct(SyntaxKind::Eq), expression.into()],
        ))
    }
}

impl From<ExpressionSyntax> for ArgumentSyntax {
    fn from(expression: ExpressionSyntax) -> Self {
        Self::new(expression)
    }
}

impl PatternSyntax {
    pub fn constant(expression: ExpressionSyntax) -> Self {
        Self(node(SyntaxKind::Pattern, vec![expression.into()]))
    }

    /// `_`
    pub fn discard() -> Self {
        Self(node(SyntaxKind::Pattern, vec![ident("_")]))
    }

    /// `Type name`
    pub fn declaration(ty: TypeSyntax, name: &str) -> Self {
        Self(node(SyntaxKind::Pattern, vec![ty.into(), ident(name)]))
    }

    /// `not pattern`
    pub fn not(pattern: PatternSyntax) -> Self {
        Self(node(SyntaxKind::Pattern, vec![keyword("not"), pattern.into()]))
    }
}

impl SwitchArmSyntax {
    pub fn new(pattern: PatternSyntax, expression: ExpressionSyntax) -> Self {
        Self(node(
            SyntaxKind::SwitchArm,
            vec![pattern.into(), punct(SyntaxKind::FatArrow), expression.into()],
        ))
    }

    /// `_ => expression`
    pub fn discard(expression: ExpressionSyntax) -> Self {
        Self::new(PatternSyntax::discard(), expression)
    }
}

/// Values without a literal spelling, as members of the predefined type.
fn non_finite(keyword: &str, value: f64) -> Option<ExpressionSyntax> {
    let member = if value.is_nan() {
        "NaN"
    } else if value == f64::INFINITY {
        "PositiveInfinity"
    } else if value == f64::NEG_INFINITY {
        "NegativeInfinity"
    } else {
        return None;
    };
    Some(ExpressionSyntax::keyword(keyword).member(member))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ExpressionSyntax::double(0.25), "0.25D")]
    #[case(ExpressionSyntax::double(f64::NAN), "double.NaN")]
    #[case(ExpressionSyntax::double(f64::INFINITY), "double.PositiveInfinity")]
    #[case(ExpressionSyntax::double(f64::NEG_INFINITY), "double.NegativeInfinity")]
    #[case(ExpressionSyntax::float(0.1), "0.1F")]
    #[case(ExpressionSyntax::float(f32::INFINITY), "float.PositiveInfinity")]
    fn test_real_literals(#[case] expression: ExpressionSyntax, #[case] expected: &str) {
        assert_eq!(expression.text(), expected);
    }

    #[test]
    fn test_generic_member_invocation() {
        let expression = ExpressionSyntax::ident("serviceProvider")
            .generic_member(
                "GetRequiredService",
                vec![TypeSyntax::parse("global::Foo.IBar")],
            )
            .invoke(vec![]);
        assert_eq!(
            expression.text(),
            "serviceProvider.GetRequiredService<global::Foo.IBar>()"
        );
    }

    #[test]
    fn test_negative_enum_cast() {
        let expression = ExpressionSyntax::cast(
            TypeSyntax::parse("global::Foo.Level"),
            ExpressionSyntax::prefix(SyntaxKind::Minus, ExpressionSyntax::number("1"))
                .parenthesized(),
        );
        assert_eq!(expression.text(), "(global::Foo.Level)(-1)");
    }

    #[test]
    fn test_pointer_increment() {
        let expression = ExpressionSyntax::prefix(
            SyntaxKind::PlusPlus,
            ExpressionSyntax::prefix(
                SyntaxKind::Star,
                ExpressionSyntax::cast(
                    TypeSyntax::uint().pointer(),
                    ExpressionSyntax::prefix(SyntaxKind::Amp, ExpressionSyntax::ident("value")),
                ),
            ),
        );
        assert_eq!(expression.text(), "++*(uint*)&value");
    }

    #[rstest]
    #[case(ExpressionSyntax::type_of(TypeSyntax::parse("Foo")), "typeof(Foo)")]
    #[case(ExpressionSyntax::default_of(TypeSyntax::object()), "default(object)")]
    #[case(ExpressionSyntax::name_of("Value"), "nameof(Value)")]
    #[case(ExpressionSyntax::new_implicit(vec![]), "new()")]
    #[case(ExpressionSyntax::ident("x").suppress_nullable(), "x!")]
    #[case(ExpressionSyntax::string("a\"b"), "\"a\\\"b\"")]
    #[case(ExpressionSyntax::interpolated("{a}/b"), "$\"{a}/b\"")]
    fn test_simple_forms(#[case] expression: ExpressionSyntax, #[case] expected: &str) {
        assert_eq!(expression.text(), expected);
    }

    #[test]
    fn test_lambda_forms() {
        let simple = ExpressionSyntax::lambda(
            &[Modifier::Static],
            &["instance"],
            LambdaBody::Expression(ExpressionSyntax::ident("instance").member("Name")),
        );
        assert_eq!(simple.text(), "static instance => instance.Name");

        let pair = ExpressionSyntax::lambda(
            &[],
            &["handler", "serviceProvider"],
            LambdaBody::Expression(ExpressionSyntax::null()),
        );
        assert_eq!(pair.text(), "(handler, serviceProvider) => null");
    }

    #[test]
    fn test_is_declaration_pattern() {
        let expression = ExpressionSyntax::ident("obj")
            .is_pattern(PatternSyntax::declaration(TypeSyntax::parse("Id"), "other"))
            .binary(
                SyntaxKind::AmpAmp,
                ExpressionSyntax::ident("Equals").call(vec![ExpressionSyntax::ident("other")]),
            );
        assert_eq!(expression.text(), "obj is Id other && Equals(other)");
    }

    #[test]
    fn test_field_coalesce_assign() {
        let expression = ExpressionSyntax::field().coalesce_assign(ExpressionSyntax::new_implicit(
            vec![ExpressionSyntax::ident("Run").into()],
        ));
        assert_eq!(expression.text(), "field ??= new(Run)");
    }
}
