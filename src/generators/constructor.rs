//! Dependency-injected constructors.
//!
//! A partial constructor marked `[GeneratedConstructor]` gets a body that
//! pulls every readonly field and partial get-only property out of the
//! service provider, registers the type for its `IRecipient<T>` messages and
//! calls the `PreConstruct`/`PostConstruct` hooks.

use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use super::well_known::{get_required_keyed_service, get_required_service};
use super::{Collected, EmitContext, GeneratedFile, GeneratorKind, Stage};
use crate::base::StructuralArray;
use crate::base::names::{self, global};
use crate::error::{Cancelled, Result};
use crate::host::{Accessibility, AttributeCandidate, Compilation, MemberSymbol};
use crate::model::{
    AttributeDescriptor, FieldDescriptor, HierarchyDescriptor, ParameterDescriptor,
    PropertyDescriptor,
};
use crate::syntax::SyntaxKind;
use crate::syntax::factory::{
    AccessorSyntax, ArgumentSyntax, Body, ConstructorDeclarationSyntax, ExpressionSyntax,
    MemberSyntax, MethodDeclarationSyntax, Modifier, ParameterSyntax, PropertyDeclarationSyntax,
    StatementSyntax, TypeSyntax,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstructorField {
    /// Declared with an initializer, so left alone.
    pub skipped: bool,
    pub field: FieldDescriptor,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstructorContext {
    pub hierarchy: HierarchyDescriptor,
    pub accessibility: Accessibility,
    pub call_base_constructor: bool,
    pub initialize_component: bool,
    pub parameters: StructuralArray<ParameterDescriptor>,
    /// Name of the `IServiceProvider` parameter.
    pub service_provider: SmolStr,
    pub fields: StructuralArray<ConstructorField>,
    pub properties: StructuralArray<PropertyDescriptor>,
    /// Message types of the directly implemented `IRecipient<T>` interfaces.
    pub messages: StructuralArray<SmolStr>,
}

pub fn collect(
    compilation: &Compilation,
    cancel: &CancellationToken,
) -> std::result::Result<Collected<ConstructorContext>, Cancelled> {
    let candidates = compilation.candidates_with_attribute(
        names::GENERATED_CONSTRUCTOR_ATTRIBUTE,
        |node| node.kind() == SyntaxKind::ConstructorDecl,
        cancel,
    )?;

    let mut contexts = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        Cancelled::check(cancel)?;
        match snapshot(candidate) {
            Ok(Some(context)) => contexts.push(context),
            Ok(None) => tracing::trace!(tree = candidate.tree, "constructor candidate rejected"),
            Err(error) => tracing::trace!(%error, "constructor candidate not snapshotted"),
        }
    }

    tracing::debug!(stage = GeneratorKind::Constructor.name(), contexts = contexts.len());
    Ok(Collected::contexts(contexts))
}

fn snapshot(candidate: &AttributeCandidate) -> Result<Option<ConstructorContext>> {
    let (Some(constructor), Some(ty)) = (candidate.symbol.as_method(), &candidate.containing_type)
    else {
        return Ok(None);
    };
    let Some(attribute) = candidate.attributes.first() else {
        return Ok(None);
    };
    let attribute = AttributeDescriptor::from_data(attribute)?;

    let parameters: StructuralArray<ParameterDescriptor> = constructor
        .parameters
        .iter()
        .map(ParameterDescriptor::from_symbol)
        .collect();
    let providers: Vec<&ParameterDescriptor> = parameters
        .iter()
        .filter(|parameter| parameter.fully_qualified_type_metadata_name == names::SERVICE_PROVIDER)
        .collect();
    let [provider] = providers.as_slice() else {
        return Ok(None);
    };
    let service_provider = provider.name.clone();

    let mut fields = Vec::new();
    let mut properties = Vec::new();
    for member in &ty.members {
        match member {
            MemberSymbol::Field(field) => {
                if field.is_implicitly_declared || field.is_const || field.is_static || !field.is_readonly {
                    continue;
                }
                fields.push(ConstructorField {
                    skipped: field.has_initializer,
                    field: FieldDescriptor::from_symbol(field)?,
                });
            }
            MemberSymbol::Property(property) => {
                if property.is_static
                    || property.is_implicitly_declared
                    || !property.is_partial_definition
                    || !property.is_readonly()
                {
                    continue;
                }
                properties.push(PropertyDescriptor::from_symbol(property)?);
            }
            MemberSymbol::Method(_) => {}
        }
    }

    let messages = ty
        .interfaces
        .iter()
        .filter(|interface| interface.fully_qualified_metadata_name() == names::RECIPIENT_INTERFACE)
        .filter_map(|interface| match interface.type_arguments.as_slice() {
            [message] => Some(SmolStr::from(message.fully_qualified_with_nullability())),
            _ => None,
        })
        .collect();

    Ok(Some(ConstructorContext {
        hierarchy: HierarchyDescriptor::from_symbol(ty),
        accessibility: constructor.accessibility,
        call_base_constructor: attribute.has_named_argument("CallBaseConstructor", true),
        initialize_component: attribute.has_named_argument("InitializeComponent", true),
        parameters,
        service_provider,
        fields: fields.into(),
        properties: properties.into(),
        messages,
    }))
}

pub struct ConstructorStage;

impl Stage for ConstructorStage {
    const KIND: GeneratorKind = GeneratorKind::Constructor;
    type Context = ConstructorContext;

    fn emit(context: &ConstructorContext, cx: &EmitContext<'_>) -> Result<Vec<GeneratedFile>> {
        let mut members = vec![constructor_declaration(context, cx)?];
        for property in context.properties.iter() {
            cx.check()?;
            members.push(partial_property(property));
        }
        members.push(hook_declaration("PreConstruct"));
        members.push(hook_declaration("PostConstruct"));

        let unit = context.hierarchy.compilation_unit(members, Vec::new());
        Ok(vec![cx.document(context.hierarchy.hint(".g.cs"), &unit)])
    }
}

fn constructor_declaration(context: &ConstructorContext, cx: &EmitContext<'_>) -> Result<MemberSyntax> {
    let provider = || ExpressionSyntax::ident(&context.service_provider);
    let hook = |name: &str| StatementSyntax::expression(ExpressionSyntax::ident(name).call(vec![provider()]));

    let mut statements = vec![hook("PreConstruct")];
    for ConstructorField { skipped, field } in context.fields.iter() {
        cx.check()?;
        if *skipped {
            statements.push(StatementSyntax::empty_with_comment(&format!(
                "Skipped field with initializer: {}",
                field.name
            )));
            continue;
        }
        statements.push(member_assignment(
            context,
            &field.name,
            &field.fully_qualified_type_name_with_nullability,
            field.attribute(names::FROM_KEYED_SERVICES_ATTRIBUTE),
        ));
    }
    for property in context.properties.iter() {
        cx.check()?;
        statements.push(member_assignment(
            context,
            &property.name,
            &property.fully_qualified_type_name_with_nullability,
            property.attribute(names::FROM_KEYED_SERVICES_ATTRIBUTE),
        ));
    }
    for message in context.messages.iter() {
        let register = ExpressionSyntax::qualified(global::MESSENGER_EXTENSIONS)
            .generic_member("Register", vec![TypeSyntax::parse(message)])
            .call(vec![
                get_required_service(provider(), TypeSyntax::parse(global::MESSENGER)),
                ExpressionSyntax::this(),
            ]);
        statements.push(StatementSyntax::expression(register));
    }
    if context.initialize_component {
        statements.push(StatementSyntax::expression(
            ExpressionSyntax::ident("InitializeComponent").call(Vec::new()),
        ));
    }
    statements.push(hook("PostConstruct"));

    let mut modifiers = context.accessibility.modifiers().to_vec();
    modifiers.push(Modifier::Partial);
    let mut declaration = ConstructorDeclarationSyntax::new(context.hierarchy.name())
        .modifiers(&modifiers)
        .parameters(context.parameters.iter().map(ParameterDescriptor::to_syntax).collect());
    if context.call_base_constructor {
        declaration = declaration.base_initializer(vec![ArgumentSyntax::new(provider())]);
    }
    Ok(declaration.body(Body::Block(statements)).build())
}

/// `this.member = <value>;` resolving the value from the constructor
/// parameters or the service provider.
fn member_assignment(
    context: &ConstructorContext,
    member: &str,
    fully_qualified_type: &str,
    from_keyed: Option<&AttributeDescriptor>,
) -> StatementSyntax {
    let provider = ExpressionSyntax::ident(&context.service_provider);
    let parameter_named = |predicate: &dyn Fn(&ParameterDescriptor) -> bool| {
        let mut matching = context.parameters.iter().filter(|parameter| predicate(parameter));
        match (matching.next(), matching.next()) {
            (Some(parameter), None) => Some(ExpressionSyntax::ident(&parameter.name)),
            _ => None,
        }
    };

    let value = if fully_qualified_type == global::HTTP_CLIENT {
        parameter_named(&|parameter| parameter.fully_qualified_type_metadata_name == names::HTTP_CLIENT)
            .unwrap_or_else(|| {
                get_required_service(provider, TypeSyntax::parse(global::HTTP_CLIENT_FACTORY))
                    .member("CreateClient")
                    .call(vec![ExpressionSyntax::name_of(context.hierarchy.name())])
            })
    } else if let Some(parameter) =
        parameter_named(&|parameter| parameter.fully_qualified_type_name == fully_qualified_type)
    {
        parameter
    } else {
        let ty = TypeSyntax::parse(fully_qualified_type);
        match from_keyed.and_then(|attribute| attribute.constructor_argument(0)) {
            Some(key) => get_required_keyed_service(provider, ty, key.to_expression()),
            None => get_required_service(provider, ty),
        }
    };

    StatementSyntax::expression(ExpressionSyntax::this().member(member).assign(value))
}

/// `{accessibility} partial T Name { get => field; }`
fn partial_property(property: &PropertyDescriptor) -> MemberSyntax {
    let mut modifiers = property.declared_accessibility.modifiers().to_vec();
    modifiers.push(Modifier::Partial);
    PropertyDeclarationSyntax::new(property.type_syntax(), &property.name)
        .modifiers(&modifiers)
        .accessors(vec![AccessorSyntax::get(Body::Expression(ExpressionSyntax::field()))])
        .build()
}

/// `partial void Name(global::System.IServiceProvider serviceProvider);`
fn hook_declaration(name: &str) -> MemberSyntax {
    MethodDeclarationSyntax::new(TypeSyntax::void(), name)
        .modifiers(&[Modifier::Partial])
        .parameters(vec![ParameterSyntax::new(
            TypeSyntax::parse(global::SERVICE_PROVIDER),
            "serviceProvider",
        )])
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{body, compilation, emit_all, marker, service_provider};
    use crate::host::{
        ConstantValue, FieldSymbol, MethodSymbol, ParameterSymbol, PropertySymbol, TypeSymbol,
    };

    fn interface(namespace: &str, name: &str) -> TypeSymbol {
        TypeSymbol::interface(namespace, name).not_partial().build()
    }

    fn view_model(attribute: crate::host::AttributeData) -> TypeSymbol {
        let recipient = TypeSymbol::interface("CommunityToolkit.Mvvm.Messaging", "IRecipient")
            .type_parameters(&["TMessage"])
            .not_partial()
            .build()
            .construct(vec![TypeSymbol::class("App.Messages", "Refreshed").build()]);
        let store = interface("App", "IStore");
        let logger = interface("App", "ILogger");
        let constructor = MethodSymbol::constructor("HomeViewModel")
            .partial_definition()
            .parameter(ParameterSymbol::new("serviceProvider", &service_provider()))
            .attribute(attribute)
            .build();
        TypeSymbol::class("App.ViewModels", "HomeViewModel")
            .interface(&recipient)
            .field(FieldSymbol::new("store", &store).readonly().build())
            .field(
                FieldSymbol::new("cache", &store)
                    .readonly()
                    .attribute(marker(names::FROM_KEYED_SERVICES_ATTRIBUTE).arg(ConstantValue::string("Cloud")))
                    .build(),
            )
            .field(FieldSymbol::new("pending", &store).readonly().with_initializer().build())
            .field(FieldSymbol::new("mutable", &store).build())
            .property(PropertySymbol::new("Logger", &logger).get_only().partial_definition().build())
            .property(PropertySymbol::new("Settable", &logger).partial_definition().build())
            .method(constructor)
            .build()
    }

    #[test]
    fn test_constructor_body_order() {
        let attribute = marker(names::GENERATED_CONSTRUCTOR_ATTRIBUTE)
            .named("InitializeComponent", ConstantValue::bool(true));
        let compilation = compilation(vec![view_model(attribute)]);
        let collected = collect(&compilation, &CancellationToken::new()).unwrap();
        let files = emit_all::<ConstructorStage>(&collected);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].hint, "App.ViewModels.HomeViewModel.g.cs");

        let expected = "\
namespace App.ViewModels;

#nullable enable
partial class HomeViewModel
{
    public partial HomeViewModel(global::System.IServiceProvider serviceProvider)
    {
        PreConstruct(serviceProvider);
        this.store = serviceProvider.GetRequiredService<global::App.IStore>();
        this.cache = serviceProvider.GetRequiredKeyedService<global::App.IStore>(\"Cloud\");
        ; // Skipped field with initializer: pending
        this.Logger = serviceProvider.GetRequiredService<global::App.ILogger>();
        global::CommunityToolkit.Mvvm.Messaging.IMessengerExtensions.Register<global::App.Messages.Refreshed>(serviceProvider.GetRequiredService<global::CommunityToolkit.Mvvm.Messaging.IMessenger>(), this);
        InitializeComponent();
        PostConstruct(serviceProvider);
    }

    public partial global::App.ILogger Logger
    {
        get => field;
    }

    partial void PreConstruct(global::System.IServiceProvider serviceProvider);

    partial void PostConstruct(global::System.IServiceProvider serviceProvider);
}
";
        assert_eq!(body(&files[0]), expected);
    }

    #[test]
    fn test_base_call_and_parameter_reuse() {
        let store = interface("App", "IStore");
        let http = TypeSymbol::class("System.Net.Http", "HttpClient").not_partial().build();
        let constructor = MethodSymbol::constructor("Client")
            .accessibility(Accessibility::Internal)
            .partial_definition()
            .parameter(ParameterSymbol::new("provider", &service_provider()))
            .parameter(ParameterSymbol::new("injected", &store))
            .attribute(
                marker(names::GENERATED_CONSTRUCTOR_ATTRIBUTE)
                    .named("CallBaseConstructor", ConstantValue::bool(true)),
            )
            .build();
        let client = TypeSymbol::class("App.Web", "Client")
            .field(FieldSymbol::new("store", &store).readonly().build())
            .field(FieldSymbol::new("httpClient", &http).readonly().build())
            .method(constructor)
            .build();
        let collected = collect(&compilation(vec![client]), &CancellationToken::new()).unwrap();
        let files = emit_all::<ConstructorStage>(&collected);
        let text = body(&files[0]);
        assert!(text.contains(
            "internal partial Client(global::System.IServiceProvider provider, global::App.IStore injected) : base(provider)\n"
        ));
        assert!(text.contains("        this.store = injected;\n"));
        assert!(text.contains(
            "        this.httpClient = provider.GetRequiredService<global::System.Net.Http.IHttpClientFactory>().CreateClient(nameof(Client));\n"
        ));
    }

    #[test]
    fn test_rejects_without_service_provider() {
        let constructor = MethodSymbol::constructor("Plain")
            .attribute(marker(names::GENERATED_CONSTRUCTOR_ATTRIBUTE))
            .build();
        let plain = TypeSymbol::class("App", "Plain").method(constructor).build();
        let collected = collect(&compilation(vec![plain]), &CancellationToken::new()).unwrap();
        assert!(collected.contexts.is_empty());
    }

    #[test]
    fn test_snapshots_compare_equal_across_compilations() {
        let attribute = || marker(names::GENERATED_CONSTRUCTOR_ATTRIBUTE);
        let first = collect(&compilation(vec![view_model(attribute())]), &CancellationToken::new()).unwrap();
        let second = collect(&compilation(vec![view_model(attribute())]), &CancellationToken::new()).unwrap();
        assert_eq!(first, second);
    }
}
