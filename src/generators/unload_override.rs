//! `UnloadObjectOverride` for pages deriving directly from `ScopedPage`.

use indexmap::IndexSet;
use tokio_util::sync::CancellationToken;

use super::well_known::type_has_base_list;
use super::{Collected, EmitContext, GeneratedFile, GeneratorKind, Stage};
use crate::base::names::{self, global};
use crate::error::{Cancelled, Result};
use crate::host::Compilation;
use crate::model::HierarchyDescriptor;
use crate::syntax::factory::{
    Body, ExpressionSyntax, MethodDeclarationSyntax, Modifier, ParameterSyntax, StatementSyntax,
    TypeSyntax,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnloadOverrideContext {
    pub hierarchy: HierarchyDescriptor,
}

pub fn collect(
    compilation: &Compilation,
    cancel: &CancellationToken,
) -> std::result::Result<Collected<UnloadOverrideContext>, Cancelled> {
    let candidates = compilation.syntax_candidates(type_has_base_list, cancel)?;

    // A partial page declared in several files is one context.
    let mut contexts = IndexSet::new();
    for candidate in &candidates {
        Cancelled::check(cancel)?;
        let Some(ty) = candidate.symbol.as_ref().and_then(|symbol| symbol.as_type()) else {
            continue;
        };
        if ty
            .base_type
            .as_ref()
            .is_some_and(|base| base.fully_qualified_metadata_name() == names::SCOPED_PAGE)
        {
            contexts.insert(UnloadOverrideContext {
                hierarchy: HierarchyDescriptor::from_symbol(ty),
            });
        }
    }

    tracing::debug!(stage = GeneratorKind::UnloadOverride.name(), contexts = contexts.len());
    Ok(Collected::contexts(contexts.into_iter().collect()))
}

pub struct UnloadOverrideStage;

impl Stage for UnloadOverrideStage {
    const KIND: GeneratorKind = GeneratorKind::UnloadOverride;
    type Context = UnloadOverrideContext;

    fn emit(context: &UnloadOverrideContext, cx: &EmitContext<'_>) -> Result<Vec<GeneratedFile>> {
        cx.check()?;
        let method = MethodDeclarationSyntax::new(TypeSyntax::void(), "UnloadObjectOverride")
            .modifiers(&[Modifier::Public, Modifier::Override])
            .parameters(vec![ParameterSyntax::new(
                TypeSyntax::parse(global::DEPENDENCY_OBJECT),
                "unloadableObject",
            )])
            .body(Body::Block(vec![StatementSyntax::expression(
                ExpressionSyntax::ident("UnloadObject").call(vec![ExpressionSyntax::ident("unloadableObject")]),
            )]))
            .build();
        let unit = context.hierarchy.compilation_unit(vec![method], Vec::new());
        Ok(vec![cx.document(context.hierarchy.hint(".UnloadObjectOverride.g.cs"), &unit)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{body, compilation, emit_all, type_from_metadata_name};
    use crate::host::TypeSymbol;

    #[test]
    fn test_direct_scoped_page_subclass() {
        let scoped_page = type_from_metadata_name(names::SCOPED_PAGE);
        let page = TypeSymbol::class("App.UI.Xaml.View.Page", "AchievementPage").base(&scoped_page).build();
        let derived = TypeSymbol::class("App.UI.Xaml.View.Page", "SpecialAchievementPage").base(&page).build();
        let plain = TypeSymbol::class("App.UI.Xaml.View.Page", "Unrelated").build();

        let collected = collect(&compilation(vec![page, derived, plain]), &CancellationToken::new()).unwrap();
        let files = emit_all::<UnloadOverrideStage>(&collected);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].hint, "App.UI.Xaml.View.Page.AchievementPage.UnloadObjectOverride.g.cs");
        let expected = "\
namespace App.UI.Xaml.View.Page;

#nullable enable
partial class AchievementPage
{
    public override void UnloadObjectOverride(global::Microsoft.UI.Xaml.DependencyObject unloadableObject)
    {
        UnloadObject(unloadableObject);
    }
}
";
        assert_eq!(body(&files[0]), expected);
    }
}
