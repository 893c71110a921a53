//! `IBindableCustomPropertyImplementation` for XAML bindings.
//!
//! Types marked `[BindableCustomPropertyProvider]` get the two `GetProperty`
//! lookups, covering every public property and command of the type and its
//! base types. Accessors go through `Unsafe.As`/`Unsafe.Unbox` instead of
//! casts.

use tokio_util::sync::CancellationToken;

use super::command::{CommandMethod, command_type};
use super::{Collected, EmitContext, GeneratedFile, GeneratorKind, Stage};
use crate::base::StructuralArray;
use crate::base::names::{self, global};
use crate::error::{Cancelled, Result};
use crate::host::{Accessibility, AttributeCandidate, Compilation, MemberSymbol};
use crate::model::{
    AttributeDescriptor, AttributedMethodDescriptor, HierarchyDescriptor, MethodDescriptor,
    PropertyDescriptor,
};
use crate::syntax::SyntaxKind;
use crate::syntax::factory::{
    ArgumentSyntax, Body, ExpressionSyntax, LambdaBody, MemberSyntax, MethodDeclarationSyntax,
    Modifier, ParameterSyntax, PatternSyntax, StatementSyntax, SwitchArmSyntax, TypeSyntax,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BindableContext {
    pub hierarchy: HierarchyDescriptor,
    /// Fully qualified name of the annotated type.
    pub owner: smol_str::SmolStr,
    /// Public properties, the type's own first, then each base type's.
    pub properties: StructuralArray<PropertyDescriptor>,
    pub commands: StructuralArray<CommandMethod>,
}

pub fn collect(
    compilation: &Compilation,
    cancel: &CancellationToken,
) -> std::result::Result<Collected<BindableContext>, Cancelled> {
    let candidates = compilation.candidates_with_attribute(
        names::BINDABLE_CUSTOM_PROPERTY_PROVIDER_ATTRIBUTE,
        |node| node.kind() == SyntaxKind::ClassDecl,
        cancel,
    )?;

    let mut contexts = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        Cancelled::check(cancel)?;
        match snapshot(candidate, cancel)? {
            Ok(Some(context)) => contexts.push(context),
            Ok(None) => tracing::trace!(tree = candidate.tree, "bindable candidate rejected"),
            Err(error) => tracing::trace!(%error, "bindable candidate not snapshotted"),
        }
    }

    tracing::debug!(stage = GeneratorKind::Bindable.name(), contexts = contexts.len());
    Ok(Collected::contexts(contexts))
}

fn snapshot(
    candidate: &AttributeCandidate,
    cancel: &CancellationToken,
) -> std::result::Result<Result<Option<BindableContext>>, Cancelled> {
    let Some(ty) = candidate.symbol.as_type() else {
        return Ok(Ok(None));
    };

    let mut properties = Vec::new();
    let mut commands = Vec::new();
    let mut current = Some(ty.clone());
    while let Some(symbol) = current {
        Cancelled::check(cancel)?;
        for member in &symbol.members {
            match member {
                MemberSymbol::Property(property) if property.accessibility == Accessibility::Public => {
                    match PropertyDescriptor::from_symbol(property) {
                        Ok(property) => properties.push(property),
                        Err(error) => return Ok(Err(error)),
                    }
                }
                MemberSymbol::Method(method)
                    if method.attributes.iter().any(|attribute| {
                        attribute.class.fully_qualified_metadata_name() == names::COMMAND_ATTRIBUTE
                    }) =>
                {
                    let attributes = match AttributeDescriptor::all_from(&method.attributes) {
                        Ok(attributes) => attributes,
                        Err(error) => return Ok(Err(error)),
                    };
                    commands.push(CommandMethod {
                        is_async: method.return_type.has_or_inherits_metadata_name(names::TASK),
                        method: AttributedMethodDescriptor {
                            attributes,
                            method: MethodDescriptor::from_symbol(method),
                        },
                    });
                }
                _ => {}
            }
        }
        current = symbol.base_type.clone();
    }

    Ok(Ok(Some(BindableContext {
        hierarchy: HierarchyDescriptor::from_symbol(ty),
        owner: ty.fully_qualified().into(),
        properties: properties.into(),
        commands: commands.into(),
    })))
}

pub struct BindableStage;

impl Stage for BindableStage {
    const KIND: GeneratorKind = GeneratorKind::Bindable;
    type Context = BindableContext;

    fn emit(context: &BindableContext, cx: &EmitContext<'_>) -> Result<Vec<GeneratedFile>> {
        let owner = TypeSyntax::parse(&context.owner);
        let property_type = || TypeSyntax::parse(global::BINDABLE_CUSTOM_PROPERTY).nullable();

        let mut arms = Vec::new();
        for property in context.properties.iter().filter(|property| !property.is_indexer()) {
            cx.check()?;
            arms.push(property_arm(&owner, property));
        }
        for command in context.commands.iter() {
            cx.check()?;
            arms.extend(command_arms(&owner, command));
        }
        arms.push(SwitchArmSyntax::discard(ExpressionSyntax::default_literal()));

        let mut indexers = Vec::new();
        for property in context.properties.iter() {
            cx.check()?;
            if let Some(statement) = indexer_statement(&owner, property) {
                indexers.push(statement);
            }
        }
        indexers.push(StatementSyntax::ret(ExpressionSyntax::default_literal()));

        let members: Vec<MemberSyntax> = vec![
            MethodDeclarationSyntax::new(property_type(), "GetProperty")
                .modifiers(&[Modifier::Public])
                .parameters(vec![ParameterSyntax::new(TypeSyntax::string(), "name")])
                .body(Body::Block(vec![StatementSyntax::ret(
                    ExpressionSyntax::ident("name").switch(arms),
                )]))
                .build(),
            MethodDeclarationSyntax::new(property_type(), "GetProperty")
                .modifiers(&[Modifier::Public])
                .parameters(vec![ParameterSyntax::new(
                    TypeSyntax::parse(global::TYPE),
                    "indexParameterType",
                )])
                .body(Body::Block(indexers))
                .build(),
        ];

        let unit = context.hierarchy.compilation_unit(
            members,
            vec![TypeSyntax::parse(global::BINDABLE_CUSTOM_PROPERTY_IMPLEMENTATION)],
        );
        Ok(vec![cx.document(context.hierarchy.hint(".Bindable.g.cs"), &unit)])
    }
}

/// `global::System.Runtime.CompilerServices.Unsafe.{method}<T>(expression)`
fn unsafe_call(method: &str, ty: TypeSyntax, expression: ExpressionSyntax) -> ExpressionSyntax {
    ExpressionSyntax::qualified(global::UNSAFE)
        .generic_member(method, vec![ty])
        .call(vec![expression])
}

fn unsafe_as(ty: TypeSyntax, expression: ExpressionSyntax) -> ExpressionSyntax {
    unsafe_call("As", ty, expression)
}

/// `Unsafe.Unbox<T>` for value types, `Unsafe.As<T>` otherwise.
fn unsafe_unbox_or_as(ty: TypeSyntax, expression: ExpressionSyntax, is_value_type: bool) -> ExpressionSyntax {
    unsafe_call(if is_value_type { "Unbox" } else { "As" }, ty, expression)
}

/// `T typedInstance = Unsafe.As<T>(instance);` followed by the unloaded-view guard.
fn typed_instance_prelude(owner: &TypeSyntax) -> Vec<StatementSyntax> {
    vec![
        StatementSyntax::local(
            owner.clone(),
            "typedInstance",
            unsafe_as(owner.clone(), ExpressionSyntax::ident("instance")),
        ),
        StatementSyntax::if_then(
            ExpressionSyntax::ident("typedInstance")
                .member("IsViewUnloaded")
                .member("Value"),
            vec![StatementSyntax::ret_void()],
        ),
    ]
}

/// `new(canRead, canWrite, name, type, getValue, setValue, getIndexedValue, setIndexedValue)`
fn bindable_property(arguments: [ExpressionSyntax; 8]) -> ExpressionSyntax {
    ExpressionSyntax::new_implicit(arguments.into_iter().map(ArgumentSyntax::new).collect())
}

fn is_public(accessibility: Option<Accessibility>) -> bool {
    accessibility == Some(Accessibility::Public)
}

fn property_arm(owner: &TypeSyntax, property: &PropertyDescriptor) -> SwitchArmSyntax {
    let can_read = is_public(property.getter_accessibility);
    let can_write = is_public(property.setter_accessibility);
    let property_type = || TypeSyntax::parse(&property.fully_qualified_type_name);
    let receiver = |instance: ExpressionSyntax| {
        if property.is_static {
            ExpressionSyntax::from_type(owner.clone())
        } else {
            instance
        }
    };

    let get_value = if can_read {
        ExpressionSyntax::lambda(
            &[Modifier::Static],
            &["instance"],
            LambdaBody::Expression(
                receiver(unsafe_as(owner.clone(), ExpressionSyntax::ident("instance"))).member(&property.name),
            ),
        )
    } else {
        ExpressionSyntax::default_literal()
    };

    let set_value = if can_write {
        let mut statements = typed_instance_prelude(owner);
        statements.push(StatementSyntax::expression(
            receiver(ExpressionSyntax::ident("typedInstance"))
                .member(&property.name)
                .assign(unsafe_unbox_or_as(
                    property_type(),
                    ExpressionSyntax::ident("value"),
                    property.type_is_value_type,
                )),
        ));
        ExpressionSyntax::lambda(&[Modifier::Static], &["instance", "value"], LambdaBody::Block(statements))
    } else {
        ExpressionSyntax::default_literal()
    };

    SwitchArmSyntax::new(
        PatternSyntax::constant(ExpressionSyntax::name_of(&property.name)),
        bindable_property([
            ExpressionSyntax::bool(can_read),
            ExpressionSyntax::bool(can_write),
            ExpressionSyntax::name_of(&property.name),
            ExpressionSyntax::type_of(property_type()),
            get_value,
            set_value,
            ExpressionSyntax::default_literal(),
            ExpressionSyntax::default_literal(),
        ]),
    )
}

fn command_arms(owner: &TypeSyntax, command: &CommandMethod) -> Vec<SwitchArmSyntax> {
    let method = &command.method.method;
    command
        .method
        .attributes
        .iter()
        .filter(|attribute| attribute.fully_qualified_metadata_name == names::COMMAND_ATTRIBUTE)
        .filter_map(|attribute| attribute.constructor_string(0))
        .map(|name| {
            let receiver = if method.is_static {
                ExpressionSyntax::from_type(owner.clone())
            } else {
                unsafe_as(owner.clone(), ExpressionSyntax::ident("instance"))
            };
            SwitchArmSyntax::new(
                PatternSyntax::constant(ExpressionSyntax::name_of(name)),
                bindable_property([
                    ExpressionSyntax::bool(true),
                    ExpressionSyntax::bool(false),
                    ExpressionSyntax::name_of(name),
                    ExpressionSyntax::type_of(command_type(command.is_async, method)),
                    ExpressionSyntax::lambda(
                        &[Modifier::Static],
                        &["instance"],
                        LambdaBody::Expression(receiver.member(name)),
                    ),
                    ExpressionSyntax::default_literal(),
                    ExpressionSyntax::default_literal(),
                    ExpressionSyntax::default_literal(),
                ]),
            )
        })
        .collect()
}

/// `if (indexParameterType == typeof(TIndex)) { return new(...); }`
fn indexer_statement(owner: &TypeSyntax, property: &PropertyDescriptor) -> Option<StatementSyntax> {
    let index = property.indexer_parameter.as_ref()?;
    let can_read = is_public(property.getter_accessibility);
    let can_write = is_public(property.setter_accessibility);
    let property_type = || TypeSyntax::parse(&property.fully_qualified_type_name);
    let index_type = || TypeSyntax::parse(&index.fully_qualified_type_name);
    let index_argument = || {
        vec![ArgumentSyntax::new(unsafe_unbox_or_as(
            index_type(),
            ExpressionSyntax::ident("index"),
            index.is_value_type,
        ))]
    };

    let get_indexed_value = if can_read {
        ExpressionSyntax::lambda(
            &[Modifier::Static],
            &["instance", "index"],
            LambdaBody::Expression(
                unsafe_as(owner.clone(), ExpressionSyntax::ident("instance")).element_access(index_argument()),
            ),
        )
    } else {
        ExpressionSyntax::null()
    };

    let set_indexed_value = if can_write {
        let mut statements = typed_instance_prelude(owner);
        statements.push(StatementSyntax::expression(
            ExpressionSyntax::ident("typedInstance")
                .element_access(index_argument())
                .assign(unsafe_unbox_or_as(
                    property_type(),
                    ExpressionSyntax::ident("value"),
                    property.type_is_value_type,
                )),
        ));
        ExpressionSyntax::lambda(
            &[Modifier::Static],
            &["instance", "value", "index"],
            LambdaBody::Block(statements),
        )
    } else {
        ExpressionSyntax::null()
    };

    Some(StatementSyntax::if_then(
        ExpressionSyntax::ident("indexParameterType")
            .binary(SyntaxKind::EqEq, ExpressionSyntax::type_of(index_type())),
        vec![StatementSyntax::ret(bindable_property([
            ExpressionSyntax::bool(can_read),
            ExpressionSyntax::bool(can_write),
            ExpressionSyntax::string("Item"),
            ExpressionSyntax::type_of(property_type()),
            ExpressionSyntax::default_literal(),
            ExpressionSyntax::default_literal(),
            get_indexed_value,
            set_indexed_value,
        ]))],
    ))
}
