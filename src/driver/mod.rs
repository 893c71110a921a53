//! Host integration: runs every stage over a compilation and its additional
//! files and hands back the generated sources.
//!
//! ## Usage
//!
//! ```ignore
//! let mut driver = GeneratorDriver::new(GeneratorOptions::default());
//! driver.set_compilation(compilation);
//! driver.set_additional_files(files, &config);
//!
//! let result = driver.run(&CancellationToken::new())?;
//! for source in &result.sources {
//!     println!("{}: {}", source.generator.name(), source.hint_name);
//! }
//! ```
//!
//! Collection is memoized by salsa per input. Emission is cached per stage by
//! context equality: a context equal to one emitted by the previous run reuses
//! its files. Neither cache is touched by a cancelled run.

mod cache;
pub mod db;

pub use cache::{EmissionCache, StageCache};
pub use db::{AdditionalFileInput, AdditionalFilesInput, CompilationInput, Db, RootDatabase};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use salsa::Setter;
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::analyzer;
use crate::config::GeneratorOptions;
use crate::diagnostics::Diagnostic;
use crate::error::{Cancelled, GeneratorError, Result};
use crate::generators::attributes::{self, AttributeStage};
use crate::generators::bindable::BindableStage;
use crate::generators::command::CommandStage;
use crate::generators::constructor::ConstructorStage;
use crate::generators::dependency_property::DependencyPropertyStage;
use crate::generators::endpoints::EndpointsStage;
use crate::generators::extended_enum::ExtendedEnumStage;
use crate::generators::field_accessor::FieldAccessorStage;
use crate::generators::http_client::HttpClientStage;
use crate::generators::identity::IdentityStage;
use crate::generators::property_values::PropertyValuesStage;
use crate::generators::resx::ResxStage;
use crate::generators::service::ServiceStage;
use crate::generators::unload_override::UnloadOverrideStage;
use crate::generators::{Collected, EmitContext, GeneratedFile, GeneratorKind, Stage};
use crate::host::{AdditionalText, AnalyzerConfigOptions, Compilation};

// ============================================================================
// RUN RESULTS
// ============================================================================

/// A source added to the compilation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeneratedSource {
    pub generator: GeneratorKind,
    pub hint_name: String,
    pub text: String,
}

/// How many units of work were emitted and how many reused cached output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub emitted: usize,
    pub reused: usize,
}

/// Everything one run produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunResult {
    /// Ordered by generator, then hint.
    pub sources: Vec<GeneratedSource>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: RunStats,
}

impl RunResult {
    pub fn source(&self, hint_name: &str) -> Option<&GeneratedSource> {
        self.sources.iter().find(|source| source.hint_name == hint_name)
    }

    pub fn sources_of(&self, generator: GeneratorKind) -> impl Iterator<Item = &GeneratedSource> {
        self.sources.iter().filter(move |source| source.generator == generator)
    }

    /// Sources written in place of output a stage failed to produce.
    pub fn error_sources(&self) -> impl Iterator<Item = &GeneratedSource> {
        self.sources
            .iter()
            .filter(|source| source.hint_name.starts_with("Error-"))
    }
}

// ============================================================================
// DRIVER
// ============================================================================

/// Owns the inputs and caches across runs.
///
/// Apply changes with [`set_compilation`](Self::set_compilation) and
/// [`set_additional_files`](Self::set_additional_files), then call
/// [`run`](Self::run) or [`analyze`](Self::analyze).
pub struct GeneratorDriver {
    db: RootDatabase,
    options: GeneratorOptions,
    compilation: Option<CompilationInput>,
    assembly_name: Option<SmolStr>,
    files: Option<AdditionalFilesInput>,
    /// Additional file inputs by path, kept so unchanged files keep their memos.
    file_inputs: FxHashMap<SmolStr, AdditionalFileInput>,
    cache: EmissionCache,
}

impl GeneratorDriver {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            db: RootDatabase::new(),
            options,
            compilation: None,
            assembly_name: None,
            files: None,
            file_inputs: FxHashMap::default(),
            cache: EmissionCache::default(),
        }
    }

    /// A driver configured from the global build properties.
    pub fn from_analyzer_config(config: &AnalyzerConfigOptions) -> Self {
        Self::new(GeneratorOptions::from_analyzer_config(config))
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Replaces the compilation.
    pub fn set_compilation(&mut self, compilation: Compilation) {
        let assembly_name = SmolStr::from(compilation.assembly_name());
        let compilation = Arc::new(compilation);
        match self.compilation {
            Some(input) => {
                input.set_compilation(&mut self.db).to(compilation);
            }
            None => self.compilation = Some(CompilationInput::new(&self.db, compilation)),
        }

        if self.assembly_name.as_ref() != Some(&assembly_name) {
            self.assembly_name = Some(assembly_name);
            for input in self.file_inputs.values() {
                input
                    .set_assembly_name(&mut self.db)
                    .to(self.assembly_name.clone());
            }
        }
    }

    /// Replaces the additional files. Files whose text and metadata are
    /// unchanged keep their parse results.
    pub fn set_additional_files(&mut self, files: Vec<AdditionalText>, config: &AnalyzerConfigOptions) {
        let mut previous = std::mem::take(&mut self.file_inputs);
        let mut inputs = Vec::with_capacity(files.len());
        for text in files {
            let options = config.for_file(&text.path);
            let path = text.path.clone();
            let input = match previous.remove(&path) {
                Some(input) => {
                    if input.text(&self.db) != &text {
                        input.set_text(&mut self.db).to(text);
                    }
                    if input.options(&self.db) != &options {
                        input.set_options(&mut self.db).to(options);
                    }
                    input
                }
                None => AdditionalFileInput::new(&self.db, text, options, self.assembly_name.clone()),
            };
            self.file_inputs.insert(path, input);
            inputs.push(input);
        }
        tracing::debug!(files = inputs.len(), dropped = previous.len(), "additional files updated");

        match self.files {
            Some(list) => {
                list.set_files(&mut self.db).to(inputs);
            }
            None => self.files = Some(AdditionalFilesInput::new(&self.db, inputs)),
        }
    }

    /// Runs every stage.
    ///
    /// Returns [`GeneratorError::Cancelled`] once `cancel` fires; nothing from
    /// such a run is reported or cached.
    pub fn run(&mut self, cancel: &CancellationToken) -> Result<RunResult> {
        self.db.set_cancellation(cancel.clone());
        let result = self.run_stages(cancel);
        match result {
            Ok((result, cache)) => {
                self.cache = cache;
                tracing::debug!(
                    sources = result.sources.len(),
                    diagnostics = result.diagnostics.len(),
                    emitted = result.stats.emitted,
                    reused = result.stats.reused,
                    "generator run finished"
                );
                Ok(result)
            }
            Err(error) => {
                if error.is_cancelled() {
                    tracing::debug!("generator run cancelled");
                    self.invalidate_collection();
                }
                Err(error)
            }
        }
    }

    /// Runs the analyzer rules over the current compilation.
    pub fn analyze(&self, cancel: &CancellationToken) -> Result<Vec<Diagnostic>> {
        let Some(input) = self.compilation else {
            return Ok(Vec::new());
        };
        Ok(analyzer::analyze(input.compilation(&self.db), &self.options, cancel)?)
    }

    fn run_stages(&self, cancel: &CancellationToken) -> Result<(RunResult, EmissionCache)> {
        let db = &self.db;
        let mut run = Run::new(&self.cache, EmitContext::new(&self.options.render, cancel));

        let markers = self.options.emit_marker_attributes;
        run.stage::<AttributeStage>(|| Ok(attributes::collect(markers)))?;
        if let Some(input) = self.compilation {
            run.stage::<ConstructorStage>(|| db::constructor_contexts(db, input))?;
            run.stage::<ServiceStage>(|| db::service_contexts(db, input))?;
            run.stage::<HttpClientStage>(|| db::http_client_contexts(db, input))?;
            run.stage::<DependencyPropertyStage>(|| db::dependency_property_contexts(db, input))?;
            run.stage::<CommandStage>(|| db::command_contexts(db, input))?;
            run.stage::<BindableStage>(|| db::bindable_contexts(db, input))?;
            run.stage::<FieldAccessorStage>(|| db::field_accessor_contexts(db, input))?;
            run.stage::<ExtendedEnumStage>(|| db::extended_enum_contexts(db, input))?;
            run.stage::<UnloadOverrideStage>(|| db::unload_override_contexts(db, input))?;
            run.stage::<PropertyValuesStage>(|| db::property_values_contexts(db, input))?;
        }
        if let Some(files) = self.files {
            run.stage::<ResxStage>(|| db::resx_contexts(db, files))?;
            run.stage::<EndpointsStage>(|| db::endpoints_contexts(db, files))?;
            run.stage::<IdentityStage>(|| db::identity_contexts(db, files))?;
        }
        Ok(run.finish())
    }

    /// Re-sets every input to its current value, so memos computed while the
    /// token was cancelled are recomputed by the next run.
    fn invalidate_collection(&mut self) {
        if let Some(input) = self.compilation {
            let compilation = input.compilation(&self.db).clone();
            input.set_compilation(&mut self.db).to(compilation);
        }
        if let Some(list) = self.files {
            let files = list.files(&self.db).clone();
            list.set_files(&mut self.db).to(files);
        }
    }
}

// ============================================================================
// ONE RUN
// ============================================================================

struct Run<'a> {
    previous: &'a EmissionCache,
    next: EmissionCache,
    cx: EmitContext<'a>,
    result: RunResult,
}

impl<'a> Run<'a> {
    fn new(previous: &'a EmissionCache, cx: EmitContext<'a>) -> Self {
        Self {
            previous,
            next: EmissionCache::default(),
            cx,
            result: RunResult::default(),
        }
    }

    /// Collects and emits one stage. A panic during collection fails only this
    /// stage.
    fn stage<S: Stage>(
        &mut self,
        collect: impl FnOnce() -> std::result::Result<Collected<S::Context>, Cancelled>,
    ) -> Result<()> {
        let collected = match collect_guarded::<S>(collect) {
            Ok(collected) => collected,
            Err(error) if error.is_cancelled() => return Err(error),
            Err(error) => {
                self.fail(S::KIND, &error);
                return Ok(());
            }
        };
        self.result
            .diagnostics
            .extend(collected.diagnostics.iter().cloned());

        let previous = self.previous.stage::<S::Context>(S::KIND);
        let mut cache = StageCache::default();
        let mut hints = FxHashSet::default();
        let (mut emitted, mut reused) = (0, 0);
        for context in collected.contexts.iter() {
            self.cx.check()?;
            if let Some(files) = previous.and_then(|previous| previous.get(context)) {
                reused += 1;
                self.register(S::KIND, files, &mut hints);
                cache.insert(context.clone(), files.clone());
                continue;
            }

            match emit_guarded::<S>(context, &self.cx) {
                Ok(files) => {
                    emitted += 1;
                    let files: Arc<[GeneratedFile]> = files.into();
                    self.register(S::KIND, &files, &mut hints);
                    cache.insert(context.clone(), files);
                }
                Err(error) if error.is_cancelled() => return Err(error),
                Err(error) => self.fail(S::KIND, &error),
            }
        }

        tracing::debug!(
            stage = S::KIND.name(),
            contexts = collected.contexts.len(),
            emitted,
            reused,
            diagnostics = collected.diagnostics.len()
        );
        self.result.stats.emitted += emitted;
        self.result.stats.reused += reused;
        self.next.insert_stage(S::KIND, cache);
        Ok(())
    }

    /// Adds `files`; a hint already added by the same stage is a failure.
    fn register(&mut self, generator: GeneratorKind, files: &[GeneratedFile], hints: &mut FxHashSet<String>) {
        for file in files {
            if !hints.insert(file.hint.clone()) {
                let error = GeneratorError::emit(generator.name(), format!("duplicate hint name '{}'", file.hint));
                self.fail(generator, &error);
                continue;
            }
            self.result.sources.push(GeneratedSource {
                generator,
                hint_name: file.hint.clone(),
                text: file.text.clone(),
            });
        }
    }

    fn fail(&mut self, generator: GeneratorKind, error: &GeneratorError) {
        tracing::warn!(stage = generator.name(), %error, "emission failed");
        self.result.sources.push(error_source(generator, error));
    }

    fn finish(mut self) -> (RunResult, EmissionCache) {
        self.result
            .sources
            .sort_by(|left, right| (left.generator, &left.hint_name).cmp(&(right.generator, &right.hint_name)));
        (self.result, self.next)
    }
}

/// Runs a stage's collection, turning a panic into an error. Salsa's own
/// cancellation unwinds too and maps to [`GeneratorError::Cancelled`].
fn collect_guarded<S: Stage>(
    collect: impl FnOnce() -> std::result::Result<Collected<S::Context>, Cancelled>,
) -> Result<Collected<S::Context>> {
    match panic::catch_unwind(AssertUnwindSafe(collect)) {
        Ok(collected) => Ok(collected?),
        Err(payload) if payload.is::<salsa::Cancelled>() => Err(GeneratorError::Cancelled),
        Err(payload) => Err(GeneratorError::emit(
            S::KIND.name(),
            format!("collection failed: {}", panic_message(payload.as_ref())),
        )),
    }
}

/// Emits one context, turning a panic into an error.
fn emit_guarded<S: Stage>(context: &S::Context, cx: &EmitContext<'_>) -> Result<Vec<GeneratedFile>> {
    match panic::catch_unwind(AssertUnwindSafe(|| S::emit(context, cx))) {
        Ok(result) => result,
        Err(payload) => Err(GeneratorError::emit(S::KIND.name(), panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panicked".to_string()
    }
}

/// `Error-{uuid}.g.cs` carrying the error text.
fn error_source(generator: GeneratorKind, error: &GeneratorError) -> GeneratedSource {
    GeneratedSource {
        generator,
        hint_name: format!("Error-{}.g.cs", Uuid::new_v4()),
        text: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderOptions;

    struct Failing;

    impl Stage for Failing {
        const KIND: GeneratorKind = GeneratorKind::ExtendedEnum;
        type Context = u32;

        fn emit(context: &u32, _: &EmitContext<'_>) -> Result<Vec<GeneratedFile>> {
            match context {
                0 => Err(GeneratorError::invalid_symbol("no members")),
                1 => panic!("index out of range"),
                _ => Ok(vec![GeneratedFile::new(format!("{context}.g.cs"), "")]),
            }
        }
    }

    #[test]
    fn test_failures_become_error_sources() {
        let render = RenderOptions::default();
        let cancel = CancellationToken::new();
        let previous = EmissionCache::default();
        let mut run = Run::new(&previous, EmitContext::new(&render, &cancel));
        run.stage::<Failing>(|| Ok(Collected::contexts(vec![0, 1, 2]))).unwrap();
        let (result, _) = run.finish();

        assert_eq!(result.stats, RunStats { emitted: 1, reused: 0 });
        let errors: Vec<_> = result.error_sources().collect();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|source| source.hint_name.ends_with(".g.cs")));
        assert!(errors.iter().any(|source| source.text.contains("no members")));
        assert!(errors.iter().any(|source| source.text.contains("index out of range")));
        assert!(result.source("2.g.cs").is_some());
    }

    #[test]
    fn test_duplicate_hint_is_a_failure() {
        let render = RenderOptions::default();
        let cancel = CancellationToken::new();
        let previous = EmissionCache::default();
        let mut run = Run::new(&previous, EmitContext::new(&render, &cancel));
        let mut hints = FxHashSet::default();
        let file = GeneratedFile::new("Same.g.cs", "x");
        run.register(GeneratorKind::Resx, &[file.clone(), file], &mut hints);
        let (result, _) = run.finish();
        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.error_sources().count(), 1);
    }

    #[test]
    fn test_previous_output_reused() {
        let render = RenderOptions::default();
        let cancel = CancellationToken::new();
        let mut previous = EmissionCache::default();
        let mut stage = StageCache::default();
        stage.insert(7u32, Arc::from(vec![GeneratedFile::new("Cached.g.cs", "cached")]));
        previous.insert_stage(GeneratorKind::ExtendedEnum, stage);

        let mut run = Run::new(&previous, EmitContext::new(&render, &cancel));
        run.stage::<Failing>(|| Ok(Collected::contexts(vec![7, 8]))).unwrap();
        let (result, next) = run.finish();

        assert_eq!(result.stats, RunStats { emitted: 1, reused: 1 });
        assert_eq!(result.source("Cached.g.cs").unwrap().text, "cached");
        assert_eq!(next.stage::<u32>(GeneratorKind::ExtendedEnum).unwrap().len(), 2);
    }

    #[test]
    fn test_cancelled_stage() {
        let render = RenderOptions::default();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let previous = EmissionCache::default();
        let mut run = Run::new(&previous, EmitContext::new(&render, &cancel));
        let error = run.stage::<Failing>(|| Ok(Collected::contexts(vec![2]))).unwrap_err();
        assert!(error.is_cancelled());
    }

    #[test]
    fn test_collection_panic_fails_only_its_stage() {
        let render = RenderOptions::default();
        let cancel = CancellationToken::new();
        let previous = EmissionCache::default();
        let mut run = Run::new(&previous, EmitContext::new(&render, &cancel));
        run.stage::<Failing>(|| panic!("malformed input")).unwrap();
        run.stage::<IdentityStage>(|| {
            Ok(Collected::contexts(vec![crate::generators::identity::IdentityContext {
                name: "AvatarId".into(),
                documentation: String::new(),
            }]))
        })
        .unwrap();
        let (result, next) = run.finish();

        let errors: Vec<_> = result.error_sources().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].generator, GeneratorKind::ExtendedEnum);
        assert!(errors[0].text.contains("malformed input"));
        assert!(result.source("AvatarId.g.cs").is_some());
        assert!(next.stage::<u32>(GeneratorKind::ExtendedEnum).is_none());
    }

    #[test]
    fn test_cancelled_collection() {
        let render = RenderOptions::default();
        let cancel = CancellationToken::new();
        let previous = EmissionCache::default();
        let mut run = Run::new(&previous, EmitContext::new(&render, &cancel));
        let error = run.stage::<Failing>(|| Err(Cancelled)).unwrap_err();
        assert!(error.is_cancelled());
    }
}
