//! Fixtures shared by the stage unit tests.

use tokio_util::sync::CancellationToken;

use super::{Collected, EmitContext, GeneratedFile, Stage};
use crate::config::RenderOptions;
use crate::host::{AttributeData, Compilation, CompilationBuilder, SpecialType, TypeSymbol};

/// The class named by a metadata name such as `Ns.FooAttribute` or `Ns.Bar`1`.
pub(crate) fn type_from_metadata_name(metadata_name: &str) -> TypeSymbol {
    let (path, arity) = match metadata_name.split_once('`') {
        Some((path, arity)) => (path, arity.parse::<usize>().unwrap()),
        None => (metadata_name, 0),
    };
    let (namespace, name) = path.rsplit_once('.').unwrap_or(("", path));
    let parameters: Vec<String> = (0..arity).map(|index| format!("T{index}")).collect();
    let parameters: Vec<&str> = parameters.iter().map(String::as_str).collect();
    TypeSymbol::class(namespace, name)
        .type_parameters(&parameters)
        .sealed()
        .not_partial()
        .build()
}

/// An application of the marker named `metadata_name`.
pub(crate) fn marker(metadata_name: &str) -> AttributeData {
    AttributeData::new(&type_from_metadata_name(metadata_name))
}

pub(crate) fn special(special: SpecialType) -> TypeSymbol {
    TypeSymbol::special(special)
}

pub(crate) fn service_provider() -> TypeSymbol {
    TypeSymbol::interface("System", "IServiceProvider")
        .accessibility(crate::host::Accessibility::Public)
        .not_partial()
        .build()
}

/// A compilation with one file declaring `types`.
pub(crate) fn compilation(types: Vec<TypeSymbol>) -> Compilation {
    CompilationBuilder::new("Snap.Hutao").file("Test.cs", types).build()
}

/// Emits every collected context and concatenates the files.
pub(crate) fn emit_all<S: Stage>(collected: &Collected<S::Context>) -> Vec<GeneratedFile> {
    let render = RenderOptions::default();
    let cancel = CancellationToken::new();
    let cx = EmitContext::new(&render, &cancel);
    collected
        .contexts
        .iter()
        .flat_map(|context| S::emit(context, &cx).unwrap())
        .collect()
}

/// Body of a generated file with the fixed header removed.
pub(crate) fn body(file: &GeneratedFile) -> &str {
    let marker = "SA1649\n\n";
    let start = file.text.find(marker).map_or(0, |index| index + marker.len());
    &file.text[start..]
}
