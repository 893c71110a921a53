//! Relay command properties.
//!
//! Methods marked `[Command("NameCommand")]` are grouped by their containing
//! type; each gets a lazily created `RelayCommand` (or `AsyncRelayCommand`
//! for task-returning methods) property.

use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;

use super::{Collected, EmitContext, GeneratedFile, GeneratorKind, Stage};
use crate::base::StructuralArray;
use crate::base::names::{self, global};
use crate::error::{Cancelled, Result};
use crate::host::{AttributeCandidate, Compilation};
use crate::model::{AttributeDescriptor, AttributedMethodDescriptor, HierarchyDescriptor, MethodDescriptor};
use crate::syntax::SyntaxKind;
use crate::syntax::factory::{
    AccessorSyntax, ArgumentSyntax, AttributeListSyntax, AttributeSyntax, Body, ExpressionSyntax,
    MemberSyntax, Modifier, PropertyDeclarationSyntax, TypeSyntax,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommandMethod {
    /// Returns `Task` or a type deriving from it.
    pub is_async: bool,
    pub method: AttributedMethodDescriptor,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommandContext {
    pub hierarchy: HierarchyDescriptor,
    /// Sorted by method name.
    pub methods: StructuralArray<CommandMethod>,
}

pub fn collect(
    compilation: &Compilation,
    cancel: &CancellationToken,
) -> std::result::Result<Collected<CommandContext>, Cancelled> {
    let candidates = compilation.candidates_with_attribute(
        names::COMMAND_ATTRIBUTE,
        |node| node.kind() == SyntaxKind::MethodDecl,
        cancel,
    )?;

    let mut groups: IndexMap<HierarchyDescriptor, Vec<CommandMethod>> = IndexMap::new();
    for candidate in &candidates {
        Cancelled::check(cancel)?;
        match snapshot(candidate) {
            Ok(Some((hierarchy, method))) => groups.entry(hierarchy).or_default().push(method),
            Ok(None) => tracing::trace!(tree = candidate.tree, "command candidate rejected"),
            Err(error) => tracing::trace!(%error, "command candidate not snapshotted"),
        }
    }

    let mut contexts: Vec<CommandContext> = groups
        .into_iter()
        .map(|(hierarchy, mut methods)| {
            methods.sort_by(|left, right| left.method.method.name.cmp(&right.method.method.name));
            CommandContext {
                hierarchy,
                methods: methods.into(),
            }
        })
        .collect();
    contexts.sort_by(|left, right| left.hierarchy.file_name_hint.cmp(&right.hierarchy.file_name_hint));

    tracing::debug!(stage = GeneratorKind::Command.name(), contexts = contexts.len());
    Ok(Collected::contexts(contexts))
}

fn snapshot(candidate: &AttributeCandidate) -> Result<Option<(HierarchyDescriptor, CommandMethod)>> {
    let (Some(method), Some(ty)) = (candidate.symbol.as_method(), &candidate.containing_type) else {
        return Ok(None);
    };
    Ok(Some((
        HierarchyDescriptor::from_symbol(ty),
        CommandMethod {
            is_async: method.return_type.has_or_inherits_metadata_name(names::TASK),
            method: AttributedMethodDescriptor {
                attributes: AttributeDescriptor::all_from(&candidate.attributes)?,
                method: MethodDescriptor::from_symbol(method),
            },
        },
    )))
}

/// `RelayCommand`, `AsyncRelayCommand<T>` and so on, taking the type
/// argument from the first method parameter.
pub(crate) fn command_type(is_async: bool, method: &MethodDescriptor) -> TypeSyntax {
    let name = if is_async {
        global::ASYNC_RELAY_COMMAND
    } else {
        global::RELAY_COMMAND
    };
    match method.parameters.first() {
        Some(parameter) => TypeSyntax::generic(
            name,
            vec![TypeSyntax::parse(&parameter.fully_qualified_type_name)],
        ),
        None => TypeSyntax::parse(name),
    }
}

pub struct CommandStage;

impl Stage for CommandStage {
    const KIND: GeneratorKind = GeneratorKind::Command;
    type Context = CommandContext;

    fn emit(context: &CommandContext, cx: &EmitContext<'_>) -> Result<Vec<GeneratedFile>> {
        let mut members = Vec::new();
        for command in context.methods.iter() {
            cx.check()?;
            for attribute in command.method.attributes.iter() {
                if attribute.fully_qualified_metadata_name != names::COMMAND_ATTRIBUTE {
                    continue;
                }
                if let Some(member) = command_property(command, attribute) {
                    members.push(member);
                }
            }
        }
        let unit = context.hierarchy.compilation_unit(members, Vec::new());
        Ok(vec![cx.document(context.hierarchy.hint(".Command.g.cs"), &unit)])
    }
}

/// `public XCommand Name { get => field ??= new(Method); }`
fn command_property(command: &CommandMethod, attribute: &AttributeDescriptor) -> Option<MemberSyntax> {
    let name = attribute.constructor_string(0)?;
    let method = &command.method.method;

    let mut arguments = vec![ArgumentSyntax::new(ExpressionSyntax::ident(&method.name))];
    if let Some(can_execute) = attribute.constructor_string(1) {
        arguments.push(ArgumentSyntax::new(ExpressionSyntax::ident(can_execute)));
    }
    if attribute.has_named_argument("AllowConcurrentExecutions", true) {
        arguments.push(ArgumentSyntax::new(
            ExpressionSyntax::qualified(global::ASYNC_RELAY_COMMAND_OPTIONS).member("AllowConcurrentExecutions"),
        ));
    }

    let modifiers: &[Modifier] = if method.is_static {
        &[Modifier::Public, Modifier::Static]
    } else {
        &[Modifier::Public]
    };
    let lazy = ExpressionSyntax::field().coalesce_assign(ExpressionSyntax::new_implicit(arguments));
    Some(
        PropertyDeclarationSyntax::new(command_type(command.is_async, method), name)
            .attribute_list(AttributeListSyntax::targeted(
                "field",
                vec![AttributeSyntax::new(global::MAYBE_NULL)],
            ))
            .modifiers(modifiers)
            .accessors(vec![AccessorSyntax::get(Body::Expression(lazy))])
            .build(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{body, compilation, emit_all, marker, special};
    use crate::host::{ConstantValue, MethodSymbol, ParameterSymbol, SpecialType, TypeSymbol};

    fn task() -> TypeSymbol {
        TypeSymbol::class("System.Threading.Tasks", "Task").not_partial().build()
    }

    fn command(name: &str) -> crate::host::AttributeData {
        marker(names::COMMAND_ATTRIBUTE).arg(ConstantValue::string(name))
    }

    fn view_model() -> TypeSymbol {
        let value_task_like = TypeSymbol::class("App", "DerivedTask").base(&task()).not_partial().build();
        TypeSymbol::class("App.ViewModels", "ShellViewModel")
            .method(
                MethodSymbol::new("Refresh", &task())
                    .accessibility(crate::host::Accessibility::Private)
                    .attribute(command("RefreshCommand").named("AllowConcurrentExecutions", ConstantValue::bool(true)))
                    .build(),
            )
            .method(
                MethodSymbol::new("Open", &special(SpecialType::Void))
                    .parameter(ParameterSymbol::new("path", &special(SpecialType::String)))
                    .attribute(command("OpenCommand").arg(ConstantValue::string("CanOpen")))
                    .build(),
            )
            .method(
                MethodSymbol::new("Save", &value_task_like)
                    .static_method()
                    .attribute(command("SaveCommand"))
                    .build(),
            )
            .build()
    }

    #[test]
    fn test_command_properties() {
        let collected = collect(&compilation(vec![view_model()]), &CancellationToken::new()).unwrap();
        let files = emit_all::<CommandStage>(&collected);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].hint, "App.ViewModels.ShellViewModel.Command.g.cs");
        let expected = "\
namespace App.ViewModels;

#nullable enable
partial class ShellViewModel
{
    [field: global::System.Diagnostics.CodeAnalysis.MaybeNull]
    public global::CommunityToolkit.Mvvm.Input.RelayCommand<string> OpenCommand
    {
        get => field ??= new(Open, CanOpen);
    }

    [field: global::System.Diagnostics.CodeAnalysis.MaybeNull]
    public global::CommunityToolkit.Mvvm.Input.AsyncRelayCommand RefreshCommand
    {
        get => field ??= new(Refresh, global::CommunityToolkit.Mvvm.Input.AsyncRelayCommandOptions.AllowConcurrentExecutions);
    }

    [field: global::System.Diagnostics.CodeAnalysis.MaybeNull]
    public static global::CommunityToolkit.Mvvm.Input.AsyncRelayCommand SaveCommand
    {
        get => field ??= new(Save);
    }
}
";
        assert_eq!(body(&files[0]), expected);
    }

    #[test]
    fn test_groups_by_containing_type() {
        let other = TypeSymbol::class("App.ViewModels", "AViewModel")
            .method(MethodSymbol::new("Run", &special(SpecialType::Void)).attribute(command("RunCommand")).build())
            .build();
        let collected = collect(&compilation(vec![view_model(), other]), &CancellationToken::new()).unwrap();
        let hints: Vec<String> = collected
            .contexts
            .iter()
            .map(|context| context.hierarchy.hint(".Command.g.cs"))
            .collect();
        assert_eq!(
            hints,
            [
                "App.ViewModels.AViewModel.Command.g.cs",
                "App.ViewModels.ShellViewModel.Command.g.cs",
            ]
        );
        assert_eq!(collected.contexts[1].methods.len(), 3);
    }
}
