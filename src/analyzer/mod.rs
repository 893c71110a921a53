//! Analyzer rules over the syntax trees of a compilation.
//!
//! | Id    | Reports                                                   |
//! |-------|-----------------------------------------------------------|
//! | SH001 | Type declarations without `internal`, `private` or `file` |
//! | SH003 | Methods returning `Task` (overrides and commands exempt)  |
//! | SH007 | The null-forgiving operator, except on `default`          |
//! | SH008 | Casts where either side may be a reference type           |
//!
//! Every rule reports at [`Severity::Info`](crate::diagnostics::Severity::Info).
//! Trees are checked independently, in parallel unless configured otherwise.

mod rules;

use rayon::prelude::*;
use tokio_util::sync::CancellationToken;

pub use rules::TreeChecker;

use crate::config::GeneratorOptions;
use crate::diagnostics::Diagnostic;
use crate::error::Cancelled;
use crate::host::{Compilation, SyntaxTree};

/// Runs every rule over `compilation`.
///
/// Generated trees (`*.g.cs`) are skipped unless
/// [`GeneratorOptions::analyze_generated_code`] is set. Results are ordered by
/// path, position and id regardless of how the trees were scheduled.
pub fn analyze(
    compilation: &Compilation,
    options: &GeneratorOptions,
    cancel: &CancellationToken,
) -> Result<Vec<Diagnostic>, Cancelled> {
    let trees: Vec<(usize, &SyntaxTree)> = compilation
        .trees()
        .iter()
        .enumerate()
        .filter(|(_, tree)| options.analyze_generated_code || !tree.is_generated())
        .collect();

    let check_tree = |&(index, tree): &(usize, &SyntaxTree)| -> Result<Vec<Diagnostic>, Cancelled> {
        Cancelled::check(cancel)?;
        let diagnostics = TreeChecker::new(compilation, index, tree)
            .check(&tree.syntax())
            .into_vec();
        tracing::trace!(path = %tree.path, count = diagnostics.len(), "analyzed tree");
        Ok(diagnostics)
    };

    let per_tree: Vec<Vec<Diagnostic>> = if options.parallel_analysis {
        trees.par_iter().map(check_tree).collect::<Result<_, _>>()?
    } else {
        trees.iter().map(check_tree).collect::<Result<_, _>>()?
    };

    let mut diagnostics: Vec<Diagnostic> = per_tree.into_iter().flatten().collect();
    diagnostics.sort_by(|a, b| {
        let key = |d: &Diagnostic| {
            d.location
                .as_ref()
                .map(|location| (location.path.clone(), location.range.start()))
        };
        key(a).cmp(&key(b)).then_with(|| a.id.cmp(b.id))
    });
    tracing::debug!(trees = trees.len(), diagnostics = diagnostics.len(), "analysis finished");
    Ok(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Accessibility, CompilationBuilder, TypeSymbol};

    fn public_type(name: &str) -> TypeSymbol {
        TypeSymbol::class("App", name)
            .accessibility(Accessibility::Public)
            .build()
    }

    fn sample() -> Compilation {
        CompilationBuilder::new("App")
            .file("B.cs", vec![public_type("Second"), public_type("Third")])
            .file("A.cs", vec![public_type("First")])
            .file("Marker.g.cs", vec![public_type("Generated")])
            .build()
    }

    fn messages(diagnostics: &[Diagnostic]) -> Vec<String> {
        diagnostics.iter().map(|d| d.message.to_string()).collect()
    }

    #[test]
    fn test_results_are_ordered() {
        let diagnostics = analyze(&sample(), &GeneratorOptions::default(), &CancellationToken::new()).unwrap();
        assert_eq!(
            messages(&diagnostics),
            vec![
                "Type [First] should be internal or private",
                "Type [Second] should be internal or private",
                "Type [Third] should be internal or private",
            ]
        );
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let compilation = sample();
        let cancel = CancellationToken::new();
        let parallel = analyze(&compilation, &GeneratorOptions::default(), &cancel).unwrap();
        let sequential = GeneratorOptions {
            parallel_analysis: false,
            ..GeneratorOptions::default()
        };
        assert_eq!(analyze(&compilation, &sequential, &cancel).unwrap(), parallel);
    }

    #[test]
    fn test_generated_code_opt_in() {
        let options = GeneratorOptions {
            analyze_generated_code: true,
            ..GeneratorOptions::default()
        };
        let diagnostics = analyze(&sample(), &options, &CancellationToken::new()).unwrap();
        assert_eq!(diagnostics.len(), 4);
        assert!(
            diagnostics
                .iter()
                .any(|d| d.location.as_ref().unwrap().path == "Marker.g.cs")
        );
    }

    #[test]
    fn test_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert_eq!(
            analyze(&sample(), &GeneratorOptions::default(), &cancel),
            Err(Cancelled)
        );
    }
}
