//! Marker attribute declarations.
//!
//! The other stages look for these attributes by metadata name, so the
//! declarations are emitted into every compilation once.

use super::well_known::{attribute_targets, attribute_usage, bitwise_or, system_attribute_base};
use super::{Collected, EmitContext, GeneratedFile, GeneratorKind, Stage};
use crate::error::Result;
use crate::syntax::factory::{
    AccessorSyntax, AttributeListSyntax, AttributeSyntax, Body, CompilationUnitSyntax,
    ConstructorDeclarationSyntax, MemberSyntax, Modifier, ParameterSyntax,
    PropertyDeclarationSyntax, TriviaSyntax, TypeDeclarationKind, TypeDeclarationSyntax,
    TypeSyntax,
};

/// One `internal sealed class X : global::System.Attribute`.
struct MarkerClass {
    name: &'static str,
    type_parameters: &'static [&'static str],
    targets: &'static [&'static str],
    allow_multiple: bool,
    inherited: bool,
    means_implicit_use: bool,
    /// Parameter lists, each `(type, name)`.
    constructors: &'static [&'static [(&'static str, &'static str)]],
    /// `(type, name)` with `{ get; set; }`.
    properties: &'static [(&'static str, &'static str)],
}

impl MarkerClass {
    const fn new(name: &'static str, targets: &'static [&'static str]) -> Self {
        Self {
            name,
            type_parameters: &[],
            targets,
            allow_multiple: false,
            inherited: true,
            means_implicit_use: false,
            constructors: &[],
            properties: &[],
        }
    }

    const fn not_inherited(mut self) -> Self {
        self.inherited = false;
        self
    }

    const fn allow_multiple(mut self) -> Self {
        self.allow_multiple = true;
        self
    }

    const fn means_implicit_use(mut self) -> Self {
        self.means_implicit_use = true;
        self
    }

    const fn type_parameters(mut self, names: &'static [&'static str]) -> Self {
        self.type_parameters = names;
        self
    }

    const fn constructors(mut self, lists: &'static [&'static [(&'static str, &'static str)]]) -> Self {
        self.constructors = lists;
        self
    }

    const fn properties(mut self, properties: &'static [(&'static str, &'static str)]) -> Self {
        self.properties = properties;
        self
    }

    fn declaration(&self) -> MemberSyntax {
        let targets = self
            .targets
            .iter()
            .map(|target| attribute_targets(target))
            .reduce(bitwise_or)
            .unwrap_or_else(|| attribute_targets("All"));

        let mut declaration = TypeDeclarationSyntax::new(TypeDeclarationKind::Class, self.name);
        if self.means_implicit_use {
            declaration = declaration.attribute_list(AttributeListSyntax::single(
                AttributeSyntax::new("global::JetBrains.Annotations.MeansImplicitUse"),
            ));
        }

        let constructors = self.constructors.iter().map(|parameters| {
            ConstructorDeclarationSyntax::new(self.name)
                .modifiers(&[Modifier::Public])
                .parameters(
                    parameters
                        .iter()
                        .map(|(ty, name)| ParameterSyntax::new(TypeSyntax::parse(ty), name))
                        .collect(),
                )
                .build()
        });
        let properties = self.properties.iter().map(|(ty, name)| {
            PropertyDeclarationSyntax::new(TypeSyntax::parse(ty), name)
                .modifiers(&[Modifier::Public])
                .accessors(vec![AccessorSyntax::get(Body::None), AccessorSyntax::set(Body::None)])
                .build()
        });

        let type_parameters: Vec<String> =
            self.type_parameters.iter().map(|name| name.to_string()).collect();
        declaration
            .attribute_list(attribute_usage(targets, self.allow_multiple, self.inherited))
            .modifiers(&[Modifier::Internal, Modifier::Sealed])
            .type_parameters(&type_parameters)
            .base_list(system_attribute_base())
            .members(constructors.chain(properties).collect())
            .build()
    }
}

struct MarkerFile {
    hint: &'static str,
    namespace: &'static str,
    classes: &'static [MarkerClass],
}

const CORE_ANNOTATION: MarkerFile = MarkerFile {
    hint: "Snap.Hutao.Core.Annotation.Attributes.g.cs",
    namespace: "Snap.Hutao.Core.Annotation",
    classes: &[
        MarkerClass::new("CommandAttribute", &["Method"])
            .not_inherited()
            .constructors(&[
                &[("string", "commandName")],
                &[("string", "commandName"), ("string", "canExecuteName")],
            ])
            .properties(&[("bool", "AllowConcurrentExecutions")]),
        MarkerClass::new("GeneratedConstructorAttribute", &["Constructor"])
            .not_inherited()
            .properties(&[("bool", "CallBaseConstructor"), ("bool", "InitializeComponent")]),
        MarkerClass::new("BindableCustomPropertyProviderAttribute", &["Class"]).not_inherited(),
        MarkerClass::new("DependencyPropertyAttribute", &["Class"])
            .type_parameters(&["T"])
            .allow_multiple()
            .not_inherited()
            .constructors(&[&[("string", "name")]])
            .properties(&[
                ("bool", "IsAttached"),
                ("global::System.Type?", "TargetType"),
                ("object?", "DefaultValue"),
                ("string?", "CreateDefaultValueCallbackName"),
                ("string?", "PropertyChangedCallbackName"),
                ("bool", "NotNull"),
            ]),
        MarkerClass::new("FieldAccessorAttribute", &["Property"]).not_inherited(),
    ],
};

const HTTP_CLIENT_ANNOTATION: MarkerFile = MarkerFile {
    hint: "Snap.Hutao.Core.DependencyInjection.Annotation.HttpClient.Attributes.g.cs",
    namespace: "Snap.Hutao.Core.DependencyInjection.Annotation.HttpClient",
    classes: &[
        MarkerClass::new("HttpClientAttribute", &["Class"])
            .means_implicit_use()
            .not_inherited()
            .constructors(&[
                &[("HttpClientConfiguration", "configuration")],
                &[("HttpClientConfiguration", "configuration"), ("global::System.Type", "serviceType")],
            ]),
        MarkerClass::new("PrimaryHttpMessageHandlerAttribute", &["Class"])
            .not_inherited()
            .properties(&[
                ("int", "MaxAutomaticRedirections"),
                ("int", "MaxConnectionsPerServer"),
                ("int", "MaxResponseDrainSize"),
                ("int", "MaxResponseHeadersLength"),
                ("bool", "PreAuthenticate"),
                ("global::System.Net.Http.HttpKeepAlivePingPolicy", "KeepAlivePingPolicy"),
                ("bool", "AllowAutoRedirect"),
                ("global::System.Net.DecompressionMethods", "AutomaticDecompression"),
                ("bool", "UseCookies"),
                ("bool", "EnableMultipleHttp2Connections"),
                ("bool", "EnableMultipleHttp3Connections"),
                ("int", "InitialHttp2StreamWindowSize"),
                ("bool", "UseProxy"),
            ]),
    ],
};

const DEPENDENCY_INJECTION_ANNOTATION: MarkerFile = MarkerFile {
    hint: "Snap.Hutao.Core.DependencyInjection.Annotation.Attributes.g.cs",
    namespace: "Snap.Hutao.Core.DependencyInjection.Annotation",
    classes: &[
        MarkerClass::new("ServiceAttribute", &["Class"])
            .not_inherited()
            .constructors(&[
                &[("global::Microsoft.Extensions.DependencyInjection.ServiceLifetime", "serviceLifetime")],
                &[
                    ("global::Microsoft.Extensions.DependencyInjection.ServiceLifetime", "serviceLifetime"),
                    ("global::System.Type", "serviceType"),
                ],
            ])
            .properties(&[("object?", "Key")]),
        MarkerClass::new("FromKeyedServicesAttribute", &["Field", "Property"])
            .constructors(&[&[("object", "key")]]),
    ],
};

const LOCALIZATION_ANNOTATION: MarkerFile = MarkerFile {
    hint: "Snap.Hutao.Resource.Localization.Attributes.g.cs",
    namespace: "Snap.Hutao.Resource.Localization",
    classes: &[
        MarkerClass::new("ExtendedEnumAttribute", &["Enum"]),
        MarkerClass::new("LocalizationKeyAttribute", &["Field"]).constructors(&[&[("string", "key")]]),
    ],
};

const INTERCEPTS_LOCATION: MarkerFile = MarkerFile {
    hint: "System.Runtime.CompilerServices.InterceptsLocationAttribute.g.cs",
    namespace: "System.Runtime.CompilerServices",
    classes: &[MarkerClass::new("InterceptsLocationAttribute", &["Method"])
        .allow_multiple()
        .constructors(&[&[("int", "version"), ("string", "data")]])],
};

const MARKER_FILES: [&MarkerFile; 5] = [
    &CORE_ANNOTATION,
    &HTTP_CLIENT_ANNOTATION,
    &DEPENDENCY_INJECTION_ANNOTATION,
    &LOCALIZATION_ANNOTATION,
    &INTERCEPTS_LOCATION,
];

/// A single unit of work when marker emission is enabled.
pub fn collect(emit_marker_attributes: bool) -> Collected<()> {
    if emit_marker_attributes {
        Collected::contexts(vec![()])
    } else {
        Collected::default()
    }
}

pub struct AttributeStage;

impl Stage for AttributeStage {
    const KIND: GeneratorKind = GeneratorKind::Attributes;
    type Context = ();

    fn emit(_: &(), cx: &EmitContext<'_>) -> Result<Vec<GeneratedFile>> {
        MARKER_FILES
            .iter()
            .map(|file| {
                cx.check()?;
                let unit = CompilationUnitSyntax::new()
                    .leading_trivia(TriviaSyntax::nullable_enable())
                    .namespace(file.namespace)
                    .members(file.classes.iter().map(MarkerClass::declaration).collect())
                    .build();
                Ok(cx.document(file.hint, &unit))
            })
            .collect()
    }
}
