//! Salsa database, inputs and the per-stage collection queries.
//!
//! Every stage's `collect` runs as a tracked query, so a stage whose inputs did
//! not change since the last run is not re-walked. Additional files get one
//! input each; their parse results are memoized per file.

use std::sync::Arc;

use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use crate::diagnostics::Diagnostic;
use crate::error::Cancelled;
use crate::generators::endpoints::{self, EndpointsContext};
use crate::generators::identity::{self, IdentityContext};
use crate::generators::resx::{self, ResxContext, ResxFile};
use crate::generators::{
    Collected, bindable, command, constructor, dependency_property, extended_enum, field_accessor,
    http_client, property_values, service, unload_override,
};
use crate::host::{AdditionalText, Compilation, FileOptions};

// ============================================================================
// INPUTS
// ============================================================================

/// Input: the compilation being generated for.
#[salsa::input]
pub struct CompilationInput {
    #[return_ref]
    pub compilation: Arc<Compilation>,
}

/// Input: one additional file with the build metadata it sees.
#[salsa::input]
pub struct AdditionalFileInput {
    #[return_ref]
    pub text: AdditionalText,
    #[return_ref]
    pub options: FileOptions,
    /// Fallback root namespace for resource files.
    #[return_ref]
    pub assembly_name: Option<SmolStr>,
}

/// Input: every additional file, in host order.
#[salsa::input]
pub struct AdditionalFilesInput {
    #[return_ref]
    pub files: Vec<AdditionalFileInput>,
}

// ============================================================================
// DATABASE
// ============================================================================

/// Database view the queries need: salsa storage plus the token of the run in
/// progress.
#[salsa::db]
pub trait Db: salsa::Database {
    fn cancellation(&self) -> &CancellationToken;
}

#[salsa::db]
#[derive(Default, Clone)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
    cancel: CancellationToken,
}

#[salsa::db]
impl salsa::Database for RootDatabase {
    fn salsa_event(&self, _event: &dyn Fn() -> salsa::Event) {}
}

#[salsa::db]
impl Db for RootDatabase {
    fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}

impl RootDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token polled by queries executed from now on.
    pub fn set_cancellation(&mut self, cancel: CancellationToken) {
        self.cancel = cancel;
    }
}

// ============================================================================
// COMPILATION QUERIES
// ============================================================================

/// Declares a tracked query running a stage's `collect` over the compilation.
macro_rules! compilation_query {
    ($(#[$meta:meta])* $name:ident => $stage:ident :: $context:ident) => {
        $(#[$meta])*
        #[salsa::tracked]
        pub fn $name(
            db: &dyn Db,
            input: CompilationInput,
        ) -> Result<Collected<$stage::$context>, Cancelled> {
            $stage::collect(input.compilation(db), db.cancellation())
        }
    };
}

compilation_query!(constructor_contexts => constructor::ConstructorContext);
compilation_query!(
    /// Every `[Service]` class, grouped into one registration context.
    service_contexts => service::ServiceContext
);
compilation_query!(http_client_contexts => http_client::HttpClientContext);
compilation_query!(dependency_property_contexts => dependency_property::DependencyPropertyContext);
compilation_query!(command_contexts => command::CommandContext);
compilation_query!(bindable_contexts => bindable::BindableContext);
compilation_query!(field_accessor_contexts => field_accessor::FieldAccessorContext);
compilation_query!(extended_enum_contexts => extended_enum::ExtendedEnumContext);
compilation_query!(unload_override_contexts => unload_override::UnloadOverrideContext);
compilation_query!(property_values_contexts => property_values::PropertyValuesContext);

// ============================================================================
// ADDITIONAL FILE QUERIES
// ============================================================================

/// Parse one resource file. `None` for files of other kinds.
#[salsa::tracked]
pub fn resx_file(db: &dyn Db, file: AdditionalFileInput) -> Option<Result<ResxFile, Diagnostic>> {
    let text = file.text(db);
    if !resx::is_resx(text) {
        return None;
    }
    let assembly_name = file.assembly_name(db).as_deref();
    Some(resx::read_file(text, file.options(db), assembly_name))
}

#[salsa::tracked]
pub fn endpoints_file(
    db: &dyn Db,
    file: AdditionalFileInput,
) -> Option<Result<Option<EndpointsContext>, Diagnostic>> {
    let text = file.text(db);
    endpoints::is_endpoints(text).then(|| endpoints::read_file(text))
}

#[salsa::tracked]
pub fn identity_file(
    db: &dyn Db,
    file: AdditionalFileInput,
) -> Option<Result<Vec<IdentityContext>, Diagnostic>> {
    let text = file.text(db);
    identity::is_identity_structs(text).then(|| identity::read_file(text))
}

/// All resource files, grouped into one context per generated class.
#[salsa::tracked]
pub fn resx_contexts(db: &dyn Db, input: AdditionalFilesInput) -> Result<Collected<ResxContext>, Cancelled> {
    let cancel = db.cancellation();
    let mut read = Vec::new();
    for file in input.files(db) {
        Cancelled::check(cancel)?;
        read.extend(resx_file(db, *file));
    }
    resx::group(read, cancel)
}

#[salsa::tracked]
pub fn endpoints_contexts(
    db: &dyn Db,
    input: AdditionalFilesInput,
) -> Result<Collected<EndpointsContext>, Cancelled> {
    let mut read = Vec::new();
    for file in input.files(db) {
        Cancelled::check(db.cancellation())?;
        read.extend(endpoints_file(db, *file));
    }
    Ok(endpoints::assemble(read))
}

#[salsa::tracked]
pub fn identity_contexts(
    db: &dyn Db,
    input: AdditionalFilesInput,
) -> Result<Collected<IdentityContext>, Cancelled> {
    let mut read = Vec::new();
    for file in input.files(db) {
        Cancelled::check(db.cancellation())?;
        read.extend(identity_file(db, *file));
    }
    Ok(identity::assemble(read))
}
