//! Syntax fragments shared by several stages.

use crate::base::names::global;
use crate::syntax::{SyntaxKind, SyntaxNode};
use crate::syntax::factory::{
    ArgumentSyntax, AttributeListSyntax, AttributeSyntax, ExpressionSyntax, TypeSyntax,
};

/// `: global::System.Attribute`
pub(crate) fn system_attribute_base() -> Vec<TypeSyntax> {
    vec![TypeSyntax::parse("global::System.Attribute")]
}

/// `global::System.AttributeTargets.{member}`
pub(crate) fn attribute_targets(member: &str) -> ExpressionSyntax {
    ExpressionSyntax::qualified("global::System.AttributeTargets").member(member)
}

/// `[global::System.AttributeUsage(targets, AllowMultiple = true, Inherited = false)]`,
/// writing only the named arguments that differ from the defaults.
pub(crate) fn attribute_usage(
    targets: ExpressionSyntax,
    allow_multiple: bool,
    inherited: bool,
) -> AttributeListSyntax {
    let mut arguments = vec![ArgumentSyntax::new(targets)];
    if allow_multiple {
        arguments.push(ArgumentSyntax::name_equals("AllowMultiple", ExpressionSyntax::bool(true)));
    }
    if !inherited {
        arguments.push(ArgumentSyntax::name_equals("Inherited", ExpressionSyntax::bool(false)));
    }
    AttributeListSyntax::single(AttributeSyntax::with_arguments(
        "global::System.AttributeUsage",
        arguments,
    ))
}

/// `a | b`
pub(crate) fn bitwise_or(left: ExpressionSyntax, right: ExpressionSyntax) -> ExpressionSyntax {
    left.binary(SyntaxKind::Pipe, right)
}

/// `provider.GetRequiredService<T>()`
pub(crate) fn get_required_service(provider: ExpressionSyntax, ty: TypeSyntax) -> ExpressionSyntax {
    provider
        .generic_member("GetRequiredService", vec![ty])
        .invoke(Vec::new())
}

/// `provider.GetRequiredKeyedService<T>(key)`
pub(crate) fn get_required_keyed_service(
    provider: ExpressionSyntax,
    ty: TypeSyntax,
    key: ExpressionSyntax,
) -> ExpressionSyntax {
    provider
        .generic_member("GetRequiredKeyedService", vec![ty])
        .call(vec![key])
}

/// `global::System.ArgumentNullException.ThrowIfNull(argument)`
pub(crate) fn throw_if_null(argument: ExpressionSyntax) -> ExpressionSyntax {
    ExpressionSyntax::qualified(global::ARGUMENT_NULL_EXCEPTION)
        .member("ThrowIfNull")
        .call(vec![argument])
}

/// `throw new global::System.NotSupportedException()`
pub(crate) fn throw_not_supported() -> ExpressionSyntax {
    ExpressionSyntax::throw(ExpressionSyntax::new_object(
        TypeSyntax::parse(global::NOT_SUPPORTED_EXCEPTION),
        Vec::new(),
    ))
}

/// Type declarations written with a base list, e.g. `class A : B`.
pub(crate) fn type_has_base_list(node: &SyntaxNode) -> bool {
    node.kind().is_type_declaration() && node.children().any(|child| child.kind() == SyntaxKind::BaseList)
}
