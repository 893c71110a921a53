//! Region-specific API endpoints from `*Endpoints.csv` files.
//!
//! Every row names a method signature and one URL template per server
//! region. The stage emits the shared interface plus one abstract
//! implementation per region; a blank template makes that region's method
//! throw `NotSupportedException`.

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::well_known::throw_not_supported;
use super::{Collected, EmitContext, GeneratedFile, GeneratorKind, Stage};
use crate::base::StructuralArray;
use crate::diagnostics::{Diagnostic, Location, descriptors};
use crate::error::{Cancelled, Result};
use crate::host::AdditionalText;
use crate::syntax::factory::{
    Body, CompilationUnitSyntax, ExpressionSyntax, MemberSyntax, MethodDeclarationSyntax, Modifier,
    TriviaSyntax, TypeDeclarationKind, TypeDeclarationSyntax, TypeSyntax,
};

const FILE_SUFFIX: &str = "Endpoints.csv";
const HEADER: &str = "Name,CN,OS";
const EXTRA_PREFIX: &str = "Extra:";
const DEFAULT_NAMESPACE: &str = "Snap.Hutao.Web";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EndpointEntry {
    pub method: String,
    pub chinese: String,
    pub oversea: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EndpointsContext {
    /// File name without extension, e.g. `HutaoEndpoints`.
    pub name: String,
    pub namespace: Option<String>,
    pub endpoints: StructuralArray<EndpointEntry>,
}

#[derive(Debug, Deserialize)]
struct ExtraInfo {
    #[serde(rename = "Namespace")]
    namespace: Option<String>,
}

pub fn is_endpoints(text: &AdditionalText) -> bool {
    text.ends_with_ignore_case(FILE_SUFFIX)
}

/// Splits one CSV record. `""` inside a quoted field is a literal quote.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Reads one endpoints file. `Ok(None)` when it declares no endpoints.
pub fn read_file(text: &AdditionalText) -> std::result::Result<Option<EndpointsContext>, Diagnostic> {
    let file_name = text.file_name();
    let name = file_name.rsplit_once('.').map_or(file_name, |(stem, _)| stem);

    let mut namespace = None;
    let mut endpoints = Vec::new();
    for line in text.text.lines() {
        if line.is_empty() || line == HEADER {
            continue;
        }

        if line
            .get(..EXTRA_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(EXTRA_PREFIX))
        {
            let extra: ExtraInfo = serde_json::from_str(&line[EXTRA_PREFIX.len()..]).map_err(|error| {
                tracing::warn!(path = %text.path, %error, "endpoints metadata not parsed");
                let message = error.to_string();
                descriptors::ENDPOINTS_EXTRA.create(
                    Some(Location::file(text.path.clone())),
                    &[text.path.as_str(), message.as_str()],
                )
            })?;
            namespace = extra.namespace;
            continue;
        }

        let mut columns = parse_csv_line(line).into_iter();
        let method = columns.next().unwrap_or_default();
        if method.is_empty() {
            continue;
        }
        endpoints.push(EndpointEntry {
            method,
            chinese: columns.next().unwrap_or_default(),
            oversea: columns.next().unwrap_or_default(),
        });
    }

    if endpoints.is_empty() {
        tracing::trace!(path = %text.path, "endpoints file is empty");
        return Ok(None);
    }
    Ok(Some(EndpointsContext {
        name: name.to_string(),
        namespace,
        endpoints: endpoints.into(),
    }))
}

pub fn collect(
    files: &[AdditionalText],
    cancel: &CancellationToken,
) -> std::result::Result<Collected<EndpointsContext>, Cancelled> {
    let mut read = Vec::new();
    for text in files.iter().filter(|text| is_endpoints(text)) {
        Cancelled::check(cancel)?;
        read.push(read_file(text));
    }
    Ok(assemble(read))
}

/// Splits per-file results into contexts and diagnostics.
pub fn assemble(
    read: Vec<std::result::Result<Option<EndpointsContext>, Diagnostic>>,
) -> Collected<EndpointsContext> {
    let mut contexts = Vec::new();
    let mut diagnostics = Vec::new();
    for result in read {
        match result {
            Ok(context) => contexts.extend(context),
            Err(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    tracing::debug!(stage = GeneratorKind::Endpoints.name(), contexts = contexts.len());
    Collected::new(contexts, diagnostics)
}

pub struct EndpointsStage;

impl Stage for EndpointsStage {
    const KIND: GeneratorKind = GeneratorKind::Endpoints;
    type Context = EndpointsContext;

    fn emit(context: &EndpointsContext, cx: &EmitContext<'_>) -> Result<Vec<GeneratedFile>> {
        let interface_name = format!("I{}", context.name);

        let mut interface_members = Vec::with_capacity(context.endpoints.len());
        for entry in context.endpoints.iter() {
            cx.check()?;
            let Some(method) = signature(entry) else {
                continue;
            };
            let chinese = format!("<code>CN: {}</code>", entry.chinese.replace('&', "&amp;"));
            let oversea = format!("<code>OS: {}</code>", entry.oversea.replace('&', "&amp;"));
            let doc = TriviaSyntax::new().doc_summary(&[chinese.as_str(), oversea.as_str()]);
            interface_members.push(method.leading_trivia(doc).build());
        }

        let interface = TypeDeclarationSyntax::new(TypeDeclarationKind::Interface, &interface_name)
            .modifiers(&[Modifier::Internal, Modifier::Partial])
            .members(interface_members)
            .build();
        let chinese = implementation(context, &interface_name, "Chinese", |entry| &entry.chinese);
        let oversea = implementation(context, &interface_name, "Oversea", |entry| &entry.oversea);

        let unit = CompilationUnitSyntax::new()
            .leading_trivia(TriviaSyntax::nullable_enable())
            .namespace(context.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE))
            .members(vec![interface, chinese, oversea])
            .build();
        Ok(vec![cx.document(format!("{}.g.cs", context.name), &unit)])
    }
}

fn signature(entry: &EndpointEntry) -> Option<MethodDeclarationSyntax> {
    let method = MethodDeclarationSyntax::parse_signature(&entry.method);
    if method.is_none() {
        tracing::trace!(method = %entry.method, "endpoint signature not parsed");
    }
    method
}

fn implementation(
    context: &EndpointsContext,
    interface_name: &str,
    region: &str,
    template: impl Fn(&EndpointEntry) -> &String,
) -> MemberSyntax {
    let methods = context
        .endpoints
        .iter()
        .filter_map(|entry| {
            let body = match template(entry).as_str() {
                "" => throw_not_supported(),
                url => ExpressionSyntax::interpolated(url),
            };
            let method = signature(entry)?
                .modifiers(&[Modifier::Public])
                .body(Body::Expression(body));
            Some(method.build())
        })
        .collect();

    TypeDeclarationSyntax::new(
        TypeDeclarationKind::Class,
        &format!("{}ImplementationFor{region}", context.name),
    )
    .modifiers(&[Modifier::Internal, Modifier::Abstract])
    .base_list(vec![TypeSyntax::parse(interface_name)])
    .members(methods)
    .build()
}
