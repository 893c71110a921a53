//! Typed `HttpClient` registration.
//!
//! `[HttpClient(HttpClientConfiguration.X[, typeof(IClient)])]` becomes
//! `services.AddHttpClient<IClient, Client>(XConfiguration)`, optionally
//! configuring the primary `SocketsHttpHandler` from the named arguments of
//! `[PrimaryHttpMessageHandler]`.

use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use super::service::{EXTENSION_CLASS, extension_unit};
use super::{Collected, EmitContext, GeneratedFile, GeneratorKind, Stage};
use crate::base::StructuralArray;
use crate::base::names::{self, global};
use crate::error::{Cancelled, Result};
use crate::host::{AttributeCandidate, Compilation, ConstantValue};
use crate::model::{AttributeDescriptor, TypeDescriptor, TypedConstant, find_attribute};
use crate::syntax::SyntaxKind;
use crate::syntax::factory::{ExpressionSyntax, LambdaBody, StatementSyntax, TypeSyntax};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HttpClientEntry {
    pub implementation: TypeDescriptor,
    pub service_type: Option<SmolStr>,
    /// Name of the static configuration delegate, e.g. `XRpcConfiguration`.
    pub configuration_name: SmolStr,
    /// Handler properties set by `[PrimaryHttpMessageHandler]`.
    pub primary_handler: StructuralArray<(SmolStr, TypedConstant)>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HttpClientContext {
    /// Sorted by implementation name.
    pub clients: StructuralArray<HttpClientEntry>,
}

pub fn collect(
    compilation: &Compilation,
    cancel: &CancellationToken,
) -> std::result::Result<Collected<HttpClientContext>, Cancelled> {
    let candidates = compilation.candidates_with_attribute(
        names::HTTP_CLIENT_ATTRIBUTE,
        |node| node.kind() == SyntaxKind::ClassDecl,
        cancel,
    )?;

    let mut clients = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        Cancelled::check(cancel)?;
        match snapshot(candidate) {
            Ok(Some(entry)) => clients.push(entry),
            Ok(None) => tracing::trace!(tree = candidate.tree, "http client candidate rejected"),
            Err(error) => tracing::trace!(%error, "http client candidate not snapshotted"),
        }
    }
    clients.sort_by(|left, right| {
        left.implementation
            .fully_qualified_name
            .cmp(&right.implementation.fully_qualified_name)
    });

    tracing::debug!(stage = GeneratorKind::HttpClient.name(), clients = clients.len());
    Ok(Collected::contexts(vec![HttpClientContext {
        clients: clients.into(),
    }]))
}

fn snapshot(candidate: &AttributeCandidate) -> Result<Option<HttpClientEntry>> {
    let Some(ty) = candidate.symbol.as_type() else {
        return Ok(None);
    };
    let [data] = candidate.attributes.as_slice() else {
        return Ok(None);
    };
    // The configuration is referenced by member name, which only the live
    // enum type knows.
    let Some(ConstantValue::Enum { ty: configuration, value }) = data.constructor_arguments.first()
    else {
        return Ok(None);
    };
    if configuration.fully_qualified_metadata_name() != names::HTTP_CLIENT_CONFIGURATION {
        return Ok(None);
    }
    let Some(member) = configuration.enum_member_name(*value) else {
        return Ok(None);
    };

    let attribute = AttributeDescriptor::from_data(data)?;
    let service_type = attribute
        .constructor_argument(1)
        .and_then(TypedConstant::as_type_name)
        .map(SmolStr::from);

    let attributes = AttributeDescriptor::all_from(&ty.attributes)?;
    let primary_handler = find_attribute(&attributes, names::PRIMARY_HTTP_MESSAGE_HANDLER_ATTRIBUTE)
        .map(|handler| handler.named_arguments.clone())
        .unwrap_or_default();

    Ok(Some(HttpClientEntry {
        implementation: TypeDescriptor::from_symbol(ty),
        service_type,
        configuration_name: format!("{member}Configuration").into(),
        primary_handler,
    }))
}

pub struct HttpClientStage;

impl Stage for HttpClientStage {
    const KIND: GeneratorKind = GeneratorKind::HttpClient;
    type Context = HttpClientContext;

    fn emit(context: &HttpClientContext, cx: &EmitContext<'_>) -> Result<Vec<GeneratedFile>> {
        let mut statements = Vec::with_capacity(context.clients.len() + 1);
        for entry in context.clients.iter() {
            cx.check()?;
            statements.push(StatementSyntax::expression(registration(entry)));
        }
        statements.push(StatementSyntax::ret(ExpressionSyntax::ident("services")));

        let unit = extension_unit("System.Net.Http", "AddHttpClients", statements);
        Ok(vec![cx.document(format!("{EXTENSION_CLASS}.HttpClients.g.cs"), &unit)])
    }
}

fn registration(entry: &HttpClientEntry) -> ExpressionSyntax {
    let mut type_arguments: Vec<TypeSyntax> = entry
        .service_type
        .iter()
        .map(|service| TypeSyntax::parse(service))
        .collect();
    type_arguments.push(TypeSyntax::parse(&entry.implementation.fully_qualified_name));

    let registration = ExpressionSyntax::ident("services")
        .generic_member("AddHttpClient", type_arguments)
        .call(vec![ExpressionSyntax::ident(&entry.configuration_name)]);
    if entry.primary_handler.is_empty() {
        return registration;
    }

    let handler = || TypeSyntax::parse(global::SOCKETS_HTTP_HANDLER);
    let mut statements = vec![StatementSyntax::local(
        handler(),
        "typedHandler",
        ExpressionSyntax::cast(handler(), ExpressionSyntax::ident("handler")),
    )];
    for (name, value) in entry.primary_handler.iter() {
        statements.push(StatementSyntax::expression(
            ExpressionSyntax::ident("typedHandler")
                .member(name)
                .assign(value.to_expression()),
        ));
    }
    registration
        .member("ConfigurePrimaryHttpMessageHandler")
        .call(vec![ExpressionSyntax::lambda(
            &[],
            &["handler", "serviceProvider"],
            LambdaBody::Block(statements),
        )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{body, compilation, emit_all, marker};
    use crate::host::{AttributeData, TypeSymbol};

    fn configuration(value: i64) -> ConstantValue {
        let configuration = TypeSymbol::enumeration(
            "Snap.Hutao.Core.DependencyInjection.Annotation.HttpClient",
            "HttpClientConfiguration",
        )
        .enum_member("Default", 0)
        .enum_member("XRpc", 1)
        .build();
        ConstantValue::enum_value(&configuration, value)
    }

    fn client(name: &str, attributes: Vec<AttributeData>) -> TypeSymbol {
        attributes
            .into_iter()
            .fold(TypeSymbol::class("App.Web", name), |builder, attribute| {
                builder.attribute(attribute)
            })
            .build()
    }

    fn emitted(types: Vec<TypeSymbol>) -> String {
        let collected = collect(&compilation(types), &CancellationToken::new()).unwrap();
        let files = emit_all::<HttpClientStage>(&collected);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].hint, "ServiceCollectionExtension.HttpClients.g.cs");
        body(&files[0]).to_string()
    }

    #[test]
    fn test_registrations_sorted_by_name() {
        let api = TypeSymbol::interface("App.Web", "IGameClient").build();
        let text = emitted(vec![
            client(
                "GameClient",
                vec![
                    marker(names::HTTP_CLIENT_ATTRIBUTE)
                        .arg(configuration(1))
                        .arg(ConstantValue::type_of(&api)),
                ],
            ),
            client("AccountClient", vec![marker(names::HTTP_CLIENT_ATTRIBUTE).arg(configuration(0))]),
        ]);
        assert!(text.starts_with("using System.Net.Http;\n"));
        let account = text
            .find("services.AddHttpClient<global::App.Web.AccountClient>(DefaultConfiguration);")
            .unwrap();
        let game = text
            .find("services.AddHttpClient<global::App.Web.IGameClient, global::App.Web.GameClient>(XRpcConfiguration);")
            .unwrap();
        assert!(account < game);
        assert!(text.contains("AddHttpClients(this global::Microsoft.Extensions.DependencyInjection.IServiceCollection services)"));
    }

    #[test]
    fn test_primary_handler_configuration() {
        let text = emitted(vec![client(
            "UpdateClient",
            vec![
                marker(names::HTTP_CLIENT_ATTRIBUTE).arg(configuration(0)),
                marker(names::PRIMARY_HTTP_MESSAGE_HANDLER_ATTRIBUTE)
                    .named("MaxConnectionsPerServer", ConstantValue::int(8))
                    .named("UseCookies", ConstantValue::bool(false)),
            ],
        )]);
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        assert!(lines.contains(
            &"services.AddHttpClient<global::App.Web.UpdateClient>(DefaultConfiguration).ConfigurePrimaryHttpMessageHandler((handler, serviceProvider) =>"
        ));
        assert!(lines.contains(
            &"global::System.Net.Http.SocketsHttpHandler typedHandler = (global::System.Net.Http.SocketsHttpHandler)handler;"
        ));
        assert!(lines.contains(&"typedHandler.MaxConnectionsPerServer = 8;"));
        assert!(lines.contains(&"typedHandler.UseCookies = false;"));
        assert!(lines.contains(&"});"));
    }

    #[test]
    fn test_unknown_configuration_member_is_rejected() {
        let text = emitted(vec![client(
            "Broken",
            vec![marker(names::HTTP_CLIENT_ATTRIBUTE).arg(configuration(7))],
        )]);
        assert!(!text.contains("AddHttpClient<"));
    }
}
