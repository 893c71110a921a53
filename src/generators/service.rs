//! Dependency-injection registration.
//!
//! Every class marked `[Service(lifetime[, typeof(IService)])]` becomes one
//! `services.Add{Lifetime}` call in `ServiceCollectionExtension.AddServices`.

use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use super::{Collected, EmitContext, GeneratedFile, GeneratorKind, Stage};
use crate::base::StructuralArray;
use crate::base::names::{self, global};
use crate::error::{Cancelled, Result};
use crate::host::{AttributeCandidate, Compilation};
use crate::model::{AttributeDescriptor, TypeDescriptor, TypedConstant};
use crate::syntax::SyntaxKind;
use crate::syntax::factory::{
    Body, CompilationUnitSyntax, ExpressionSyntax, MemberSyntax, MethodDeclarationSyntax, Modifier,
    ParameterSyntax, StatementSyntax, TriviaSyntax, TypeDeclarationKind, TypeDeclarationSyntax,
    TypeSyntax,
};

pub(crate) const EXTENSION_NAMESPACE: &str = "Snap.Hutao.Core.DependencyInjection";
pub(crate) const EXTENSION_CLASS: &str = "ServiceCollectionExtension";

/// Declaration order is registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceLifetime {
    Singleton,
    Scoped,
    Transient,
}

impl ServiceLifetime {
    /// Maps a `Microsoft.Extensions.DependencyInjection.ServiceLifetime` value.
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(ServiceLifetime::Singleton),
            1 => Some(ServiceLifetime::Scoped),
            2 => Some(ServiceLifetime::Transient),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceLifetime::Singleton => "Singleton",
            ServiceLifetime::Scoped => "Scoped",
            ServiceLifetime::Transient => "Transient",
        }
    }
}

/// The `typeof(...)` service argument of a registration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceType {
    pub fully_qualified_name: SmolStr,
    pub is_unbound_generic: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceEntry {
    pub lifetime: ServiceLifetime,
    pub implementation: TypeDescriptor,
    pub service_type: Option<ServiceType>,
    pub key: Option<TypedConstant>,
}

impl ServiceEntry {
    fn sort_key(&self) -> (ServiceLifetime, &str) {
        (self.lifetime, self.implementation.fully_qualified_name.as_str())
    }
}

/// All registrations of the compilation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceContext {
    pub entries: StructuralArray<ServiceEntry>,
}

pub fn collect(
    compilation: &Compilation,
    cancel: &CancellationToken,
) -> std::result::Result<Collected<ServiceContext>, Cancelled> {
    let candidates = compilation.candidates_with_attribute(
        names::SERVICE_ATTRIBUTE,
        |node| node.kind() == SyntaxKind::ClassDecl,
        cancel,
    )?;

    let mut entries = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        Cancelled::check(cancel)?;
        match snapshot(candidate) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => tracing::trace!(tree = candidate.tree, "service candidate rejected"),
            Err(error) => tracing::trace!(%error, "service candidate not snapshotted"),
        }
    }
    entries.sort_by(|left, right| left.sort_key().cmp(&right.sort_key()));

    tracing::debug!(stage = GeneratorKind::Service.name(), entries = entries.len());
    Ok(Collected::contexts(vec![ServiceContext {
        entries: entries.into(),
    }]))
}

fn snapshot(candidate: &AttributeCandidate) -> Result<Option<ServiceEntry>> {
    let Some(ty) = candidate.symbol.as_type() else {
        return Ok(None);
    };
    let [attribute] = candidate.attributes.as_slice() else {
        return Ok(None);
    };
    let attribute = AttributeDescriptor::from_data(attribute)?;
    let Some(lifetime) = attribute
        .constructor_argument(0)
        .and_then(TypedConstant::as_enum_value)
        .and_then(ServiceLifetime::from_value)
    else {
        return Ok(None);
    };

    let service_type = match attribute.constructor_argument(1) {
        Some(TypedConstant::Type {
            fully_qualified_name,
            is_unbound_generic,
        }) => Some(ServiceType {
            fully_qualified_name: fully_qualified_name.clone(),
            is_unbound_generic: *is_unbound_generic,
        }),
        _ => None,
    };

    Ok(Some(ServiceEntry {
        lifetime,
        implementation: TypeDescriptor::from_symbol(ty),
        service_type,
        key: attribute.named_argument("Key").cloned(),
    }))
}

pub struct ServiceStage;

impl Stage for ServiceStage {
    const KIND: GeneratorKind = GeneratorKind::Service;
    type Context = ServiceContext;

    fn emit(context: &ServiceContext, cx: &EmitContext<'_>) -> Result<Vec<GeneratedFile>> {
        let mut statements = Vec::with_capacity(context.entries.len() + 1);
        for entry in context.entries.iter() {
            cx.check()?;
            statements.push(StatementSyntax::expression(registration(entry)));
        }
        statements.push(StatementSyntax::ret(ExpressionSyntax::ident("services")));

        let unit = extension_unit("Microsoft.Extensions.DependencyInjection", "AddServices", statements);
        Ok(vec![cx.document(format!("{EXTENSION_CLASS}.g.cs"), &unit)])
    }
}

/// `services.Add{Lifetime}<TService, TImplementation>()`, or the `typeof`
/// form when the service is an open generic.
fn registration(entry: &ServiceEntry) -> ExpressionSyntax {
    let keyed = if entry.key.is_some() { "Keyed" } else { "" };
    let method = format!("Add{keyed}{}", entry.lifetime.as_str());
    let services = ExpressionSyntax::ident("services");
    let key = entry.key.as_ref().map(TypedConstant::to_expression);

    match &entry.service_type {
        Some(service) if service.is_unbound_generic => {
            let mut arguments = vec![ExpressionSyntax::type_of(TypeSyntax::parse(
                &service.fully_qualified_name,
            ))];
            arguments.extend(key);
            arguments.push(ExpressionSyntax::type_of(entry.implementation.type_syntax(false)));
            services.member(&method).call(arguments)
        }
        service => {
            let mut type_arguments: Vec<TypeSyntax> = service
                .iter()
                .map(|service| TypeSyntax::parse(&service.fully_qualified_name))
                .collect();
            type_arguments.push(entry.implementation.type_syntax(true));
            services
                .generic_member(&method, type_arguments)
                .call(key.into_iter().collect())
        }
    }
}

/// `ServiceCollectionExtension` with one `IServiceCollection` extension
/// method running `statements`.
pub(crate) fn extension_unit(
    using: &str,
    method: &str,
    statements: Vec<StatementSyntax>,
) -> rowan::GreenNode {
    let collection = || TypeSyntax::parse(global::SERVICE_COLLECTION);
    let method: MemberSyntax = MethodDeclarationSyntax::new(collection(), method)
        .modifiers(&[Modifier::Public, Modifier::Static, Modifier::Partial])
        .parameters(vec![
            ParameterSyntax::new(collection(), "services").modifiers(&[Modifier::This]),
        ])
        .body(Body::Block(statements))
        .build();
    let class = TypeDeclarationSyntax::new(TypeDeclarationKind::Class, EXTENSION_CLASS)
        .modifiers(&[Modifier::Internal, Modifier::Static, Modifier::Partial])
        .members(vec![method])
        .build();
    CompilationUnitSyntax::new()
        .using(using)
        .leading_trivia(TriviaSyntax::nullable_enable())
        .namespace(EXTENSION_NAMESPACE)
        .member(class)
        .build()
}
