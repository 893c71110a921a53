//! Strongly typed accessors for `.resx` string tables.
//!
//! Files are read one at a time ([`read_file`]) and then grouped by
//! `(namespace, class, resource)`, so `Strings.resx` and `Strings.zh-Hans.resx`
//! make one class. Each group emits:
//! - `{Resource}.cs`: `ResourceManager` plumbing, one property per entry and a
//!   `Format{Entry}` method for entries whose neutral value has format holes
//! - `{Resource}Name.cs`: an enum of the entry names

mod composite_format;
mod file;

pub use composite_format::{CompositeFormat, Segment};
pub use file::{NEUTRAL, ResxData, ResxFile, is_culture_name, read_file, split_culture};

use std::cmp::Ordering;

use indexmap::IndexMap;
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use super::{Collected, EmitContext, GeneratedFile, GeneratorKind, Stage};
use crate::base::StructuralArray;
use crate::base::names::global;
use crate::diagnostics::{Diagnostic, descriptors};
use crate::error::{Cancelled, Result};
use crate::host::{AdditionalText, AnalyzerConfigOptions};
use crate::syntax::factory::{
    AccessorSyntax, ArgumentSyntax, AttributeListSyntax, AttributeSyntax, Body,
    CompilationUnitSyntax, EnumDeclarationSyntax, EnumMemberSyntax, ExpressionSyntax,
    MemberSyntax, MethodDeclarationSyntax, Modifier, ParameterSyntax, PatternSyntax,
    PropertyDeclarationSyntax, StatementSyntax, TriviaSyntax, TypeDeclarationKind,
    TypeDeclarationSyntax, TypeSyntax, xml_escape,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResxValue {
    pub locale: SmolStr,
    pub value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResxEntry {
    pub name: SmolStr,
    pub type_name: Option<SmolStr>,
    pub comment: Option<String>,
    /// Neutral first, then by locale.
    pub values: StructuralArray<ResxValue>,
    /// Arguments the `Format{Name}` overload takes; `0` means no overload.
    pub format_arguments: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResxContext {
    pub namespace: SmolStr,
    pub class_name: SmolStr,
    pub resource_name: SmolStr,
    pub entries: StructuralArray<ResxEntry>,
}

type GroupKey = (SmolStr, SmolStr, SmolStr);

pub fn is_resx(text: &AdditionalText) -> bool {
    text.ends_with_ignore_case(".resx")
}

/// Reads every `.resx` file and groups them.
pub fn collect(
    files: &[AdditionalText],
    options: &AnalyzerConfigOptions,
    assembly_name: Option<&str>,
    cancel: &CancellationToken,
) -> std::result::Result<Collected<ResxContext>, Cancelled> {
    let mut read = Vec::new();
    for text in files.iter().filter(|text| is_resx(text)) {
        Cancelled::check(cancel)?;
        read.push(read_file(text, &options.for_file(&text.path), assembly_name));
    }
    group(read, cancel)
}

/// Merges read files into one context per generated class.
pub fn group(
    files: Vec<std::result::Result<ResxFile, Diagnostic>>,
    cancel: &CancellationToken,
) -> std::result::Result<Collected<ResxContext>, Cancelled> {
    let mut diagnostics = Vec::new();
    let mut groups: IndexMap<GroupKey, Vec<ResxFile>> = IndexMap::new();
    for file in files {
        match file {
            Ok(file) => groups
                .entry((file.namespace.clone(), file.class_name.clone(), file.resource_name.clone()))
                .or_default()
                .push(file),
            Err(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    let mut contexts = Vec::with_capacity(groups.len());
    for ((namespace, class_name, resource_name), mut files) in groups {
        Cancelled::check(cancel)?;
        // Neutral data decides an entry's type and comment.
        files.sort_by(|left, right| {
            compare_locales(&left.locale, &right.locale).then_with(|| left.path.cmp(&right.path))
        });
        let entries = merge_entries(&files, &mut diagnostics);
        if entries.is_empty() {
            tracing::trace!(resource = %resource_name, "resx group has no entries");
            continue;
        }
        contexts.push(ResxContext {
            namespace,
            class_name,
            resource_name,
            entries: entries.into(),
        });
    }
    contexts.sort_by(|left, right| left.resource_name.cmp(&right.resource_name));

    tracing::debug!(stage = GeneratorKind::Resx.name(), contexts = contexts.len(), diagnostics = diagnostics.len());
    Ok(Collected::new(contexts, diagnostics))
}

/// `Neutral` first, then ordinal.
pub fn compare_locales(left: &str, right: &str) -> Ordering {
    match (left == NEUTRAL, right == NEUTRAL) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => left.cmp(right),
    }
}

fn merge_entries(files: &[ResxFile], diagnostics: &mut Vec<Diagnostic>) -> Vec<ResxEntry> {
    let mut merged: IndexMap<SmolStr, (&ResxData, Vec<ResxValue>)> = IndexMap::new();
    for file in files {
        for data in file.data.iter() {
            merged
                .entry(data.name.clone())
                .or_insert_with(|| (data, Vec::new()))
                .1
                .push(ResxValue {
                    locale: file.locale.clone(),
                    value: data.value.clone(),
                });
        }
    }

    let mut entries: Vec<ResxEntry> = merged
        .into_iter()
        .map(|(name, (first, mut values))| {
            values.sort_by(|left, right| compare_locales(&left.locale, &right.locale));
            let format_arguments = format_arguments(values.first());
            if format_arguments > 0 && ends_with_format(&name) {
                diagnostics.push(descriptors::RESX_FORMAT_SUFFIX.create(None, &[&name]));
            }
            ResxEntry {
                name,
                type_name: first.type_name.clone(),
                comment: first.comment.clone(),
                values: values.into(),
                format_arguments,
            }
        })
        .collect();
    entries.sort_by(|left, right| left.name.cmp(&right.name));
    entries
}

/// Holes in the first value; unparsable or empty values take none.
fn format_arguments(first: Option<&ResxValue>) -> usize {
    let Some(value) = first.and_then(|first| first.value.as_deref()).filter(|value| !value.is_empty()) else {
        return 0;
    };
    CompositeFormat::parse(value).map_or(0, |format| format.minimum_argument_count())
}

fn ends_with_format(name: &str) -> bool {
    let suffix = "format";
    name.len() >= suffix.len()
        && name.is_char_boundary(name.len() - suffix.len())
        && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

// ============================================================================
// EMISSION
// ============================================================================

pub struct ResxStage;

impl Stage for ResxStage {
    const KIND: GeneratorKind = GeneratorKind::Resx;
    type Context = ResxContext;

    fn emit(context: &ResxContext, cx: &EmitContext<'_>) -> Result<Vec<GeneratedFile>> {
        let mut members = shared_members(context);
        for entry in context.entries.iter() {
            cx.check()?;
            members.extend(entry_members(entry));
        }
        let class = TypeDeclarationSyntax::new(TypeDeclarationKind::Class, &context.class_name)
            .modifiers(&[Modifier::Internal, Modifier::Abstract, Modifier::Partial])
            .members(members)
            .build();
        let resources = unit(&context.namespace, class);

        let names = EnumDeclarationSyntax::new(&format!("{}Name", context.class_name))
            .modifiers(&[Modifier::Internal])
            .members(
                context
                    .entries
                    .iter()
                    .map(|entry| EnumMemberSyntax::new(&entry.name).leading_trivia(entry_documentation(entry)))
                    .collect(),
            )
            .build();
        let names = unit(&context.namespace, names);

        Ok(vec![
            cx.document(format!("{}.cs", context.resource_name), &resources),
            cx.document(format!("{}Name.cs", context.resource_name), &names),
        ])
    }
}

fn unit(namespace: &str, member: MemberSyntax) -> rowan::GreenNode {
    CompilationUnitSyntax::new()
        .leading_trivia(TriviaSyntax::nullable_enable())
        .namespace(namespace)
        .member(member)
        .build()
}

fn ident(name: &str) -> ExpressionSyntax {
    ExpressionSyntax::ident(name)
}

fn culture_parameter() -> ParameterSyntax {
    ParameterSyntax::new(TypeSyntax::parse(global::CULTURE_INFO).nullable(), "culture")
}

fn name_parameter() -> ParameterSyntax {
    ParameterSyntax::new(TypeSyntax::string(), "name")
}

fn editor_browsable_advanced() -> AttributeListSyntax {
    AttributeListSyntax::single(AttributeSyntax::with_arguments(
        global::EDITOR_BROWSABLE,
        vec![ArgumentSyntax::new(ExpressionSyntax::qualified(global::EDITOR_BROWSABLE_STATE).member("Advanced"))],
    ))
}

/// `[return: NotNullIfNotNull(nameof(parameter))]`
fn returns_not_null_if_not_null(parameter: &str) -> AttributeListSyntax {
    AttributeListSyntax::targeted(
        "return",
        vec![AttributeSyntax::with_arguments(
            global::NOT_NULL_IF_NOT_NULL,
            vec![ArgumentSyntax::new(ExpressionSyntax::name_of(parameter))],
        )],
    )
}

fn public_static_method(
    return_type: TypeSyntax,
    name: &str,
    parameters: Vec<ParameterSyntax>,
    statements: Vec<StatementSyntax>,
) -> MethodDeclarationSyntax {
    MethodDeclarationSyntax::new(return_type, name)
        .modifiers(&[Modifier::Public, Modifier::Static])
        .parameters(parameters)
        .body(Body::Block(statements))
}

/// `culture ?? Culture`
fn culture_or_default() -> ExpressionSyntax {
    ident("culture").coalesce(ident("Culture"))
}

fn shared_members(context: &ResxContext) -> Vec<MemberSyntax> {
    let nullable_object = || TypeSyntax::object().nullable();
    let nullable_string = || TypeSyntax::string().nullable();
    let nullable_stream = || TypeSyntax::parse(global::STREAM).nullable();
    let args_parameter = || {
        ParameterSyntax::new(TypeSyntax::object().nullable().array().nullable(), "args").modifiers(&[Modifier::Params])
    };
    let resource_manager = |method: &str, culture: ExpressionSyntax| {
        ident("ResourceManager").member(method).call(vec![ident("name"), culture])
    };
    let default = ExpressionSyntax::default_literal;

    vec![
        // get => field ??= new("Resource", typeof(Class).Assembly);
        PropertyDeclarationSyntax::new(TypeSyntax::parse(global::RESOURCE_MANAGER), "ResourceManager")
            .attribute_list(AttributeListSyntax::targeted("field", vec![AttributeSyntax::new(global::MAYBE_NULL)]))
            .attribute_list(editor_browsable_advanced())
            .modifiers(&[Modifier::Public, Modifier::Static])
            .accessors(vec![AccessorSyntax::get(Body::Expression(ExpressionSyntax::field().coalesce_assign(
                ExpressionSyntax::new_implicit(vec![
                    ArgumentSyntax::new(ExpressionSyntax::string(&context.resource_name)),
                    ArgumentSyntax::new(
                        ExpressionSyntax::type_of(TypeSyntax::parse(&context.class_name)).member("Assembly"),
                    ),
                ]),
            )))])
            .build(),
        PropertyDeclarationSyntax::new(TypeSyntax::parse(global::CULTURE_INFO).nullable(), "Culture")
            .attribute_list(editor_browsable_advanced())
            .modifiers(&[Modifier::Public, Modifier::Static])
            .accessors(vec![AccessorSyntax::get(Body::None), AccessorSyntax::set(Body::None)])
            .build(),
        public_static_method(
            nullable_object(),
            "GetObject",
            vec![
                name_parameter(),
                culture_parameter(),
                ParameterSyntax::new(nullable_object(), "defaultValue"),
            ],
            vec![StatementSyntax::ret(
                resource_manager("GetObject", culture_or_default()).coalesce(ident("defaultValue")),
            )],
        )
        .attribute_list(returns_not_null_if_not_null("defaultValue"))
        .build(),
        public_static_method(
            nullable_object(),
            "GetObject",
            vec![name_parameter(), culture_parameter()],
            vec![StatementSyntax::ret(
                ident("GetObject").call(vec![ident("name"), ident("culture"), default()]),
            )],
        )
        .build(),
        public_static_method(
            nullable_object(),
            "GetObject",
            vec![name_parameter()],
            vec![StatementSyntax::ret(ident("GetObject").call(vec![ident("name"), default(), default()]))],
        )
        .build(),
        public_static_method(
            nullable_object(),
            "GetObject",
            vec![name_parameter(), ParameterSyntax::new(nullable_object(), "defaultValue")],
            vec![StatementSyntax::ret(
                ident("GetObject").call(vec![ident("name"), default(), ident("defaultValue")]),
            )],
        )
        .attribute_list(returns_not_null_if_not_null("defaultValue"))
        .build(),
        public_static_method(
            nullable_stream(),
            "GetStream",
            vec![name_parameter(), culture_parameter()],
            vec![StatementSyntax::ret(resource_manager("GetStream", culture_or_default()))],
        )
        .build(),
        public_static_method(
            nullable_stream(),
            "GetStream",
            vec![name_parameter()],
            vec![StatementSyntax::ret(ident("GetStream").call(vec![ident("name"), default()]))],
        )
        .build(),
        public_static_method(
            nullable_string(),
            "GetString",
            vec![name_parameter(), culture_parameter(), args_parameter()],
            vec![
                StatementSyntax::expression(ident("culture").coalesce_assign(ident("Culture"))),
                StatementSyntax::local(nullable_string(), "str", resource_manager("GetString", ident("culture"))),
                StatementSyntax::if_then(
                    ident("str").is_pattern(PatternSyntax::constant(ExpressionSyntax::null())),
                    vec![StatementSyntax::ret(default())],
                ),
                StatementSyntax::if_then(
                    ident("args").is_pattern(PatternSyntax::constant(ExpressionSyntax::null())),
                    vec![StatementSyntax::ret(ident("str"))],
                ),
                StatementSyntax::ret(
                    ExpressionSyntax::from_type(TypeSyntax::string())
                        .member("Format")
                        .call(vec![ident("culture"), ident("str"), ident("args")]),
                ),
            ],
        )
        .build(),
        public_static_method(
            nullable_string(),
            "GetString",
            vec![name_parameter(), args_parameter()],
            vec![StatementSyntax::ret(
                ident("GetString").call(vec![ident("name"), default(), ident("args")]),
            )],
        )
        .build(),
        public_static_method(
            nullable_string(),
            "GetString",
            vec![name_parameter(), culture_parameter()],
            vec![StatementSyntax::ret(resource_manager("GetString", culture_or_default()))],
        )
        .build(),
        public_static_method(
            nullable_string(),
            "GetString",
            vec![name_parameter()],
            vec![StatementSyntax::ret(resource_manager("GetString", ident("Culture")))],
        )
        .build(),
    ]
}

fn entry_members(entry: &ResxEntry) -> Vec<MemberSyntax> {
    let get_string = |extra: Vec<ExpressionSyntax>| {
        let mut args = vec![ExpressionSyntax::string(&entry.name)];
        args.extend(extra);
        ident("GetString").call(args).suppress_nullable()
    };

    let mut members = vec![
        PropertyDeclarationSyntax::new(TypeSyntax::string(), &entry.name)
            .leading_trivia(entry_documentation(entry))
            .modifiers(&[Modifier::Public, Modifier::Static])
            .expression_body(get_string(Vec::new()))
            .build(),
    ];

    if entry.format_arguments > 0 {
        let names: Vec<String> = (0..entry.format_arguments).map(|index| format!("arg{index}")).collect();
        members.push(
            MethodDeclarationSyntax::new(TypeSyntax::string(), &format!("Format{}", entry.name))
                .leading_trivia(TriviaSyntax::new().doc(&format!("<inheritdoc cref=\"{}\"/>", entry.name)))
                .modifiers(&[Modifier::Public, Modifier::Static])
                .parameters(
                    names
                        .iter()
                        .map(|name| ParameterSyntax::new(TypeSyntax::object().nullable(), name))
                        .collect(),
                )
                .body(Body::Expression(get_string(names.iter().map(|name| ident(name)).collect())))
                .build(),
        );
    }
    members
}

/// `<summary><para>Looks up ...</para><para>comment</para><code>...</code></summary>`
fn entry_documentation(entry: &ResxEntry) -> TriviaSyntax {
    let mut summary = format!(
        "<summary><para>Looks up a localized string for \"{}\".</para>",
        xml_escape(&entry.name)
    );
    if let Some(comment) = entry.comment.as_deref().filter(|comment| !comment.trim().is_empty()) {
        summary.push_str(&format!("<para>{}</para>", xml_escape(comment)));
    }
    for value in entry.values.iter() {
        let line = format!("{:<8} Value: \"{}\"", value.locale.as_str(), value.value.as_deref().unwrap_or_default());
        summary.push_str(&format!("<code>{}</code>", xml_escape(&line)));
    }
    summary.push_str("</summary>");
    TriviaSyntax::new().doc(&summary)
}
