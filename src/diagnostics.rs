//! Diagnostics reported by generator stages and analyzer rules.

use std::sync::Arc;

use smol_str::SmolStr;
use text_size::TextRange;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hidden,
}

/// Where a diagnostic points: a syntax tree or additional file, and a range in it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub path: SmolStr,
    pub range: TextRange,
}

impl Location {
    pub fn new(path: impl Into<SmolStr>, range: TextRange) -> Self {
        Self {
            path: path.into(),
            range,
        }
    }

    /// A location covering a whole additional file.
    pub fn file(path: impl Into<SmolStr>) -> Self {
        Self::new(path, TextRange::default())
    }
}

/// A diagnostic message with an optional location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    /// Rule id (e.g., "SH401").
    pub id: &'static str,
    pub severity: Severity,
    pub message: Arc<str>,
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn new(id: &'static str, severity: Severity, message: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            severity,
            message: message.into(),
            location: None,
        }
    }

    /// Set the location for this diagnostic.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Hidden => "hidden",
        };
        match &self.location {
            Some(location) => write!(
                f,
                "{}({:?}): {severity} {}: {}",
                location.path,
                location.range,
                self.id,
                self.message
            ),
            None => write!(f, "{severity} {}: {}", self.id, self.message),
        }
    }
}

/// Static description of a rule: id, category, severity and message template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub message_format: &'static str,
    pub category: &'static str,
    pub severity: Severity,
}

impl DiagnosticDescriptor {
    /// Instantiate the template, replacing `{0}`, `{1}`, ... with `args`.
    pub fn create(&self, location: Option<Location>, args: &[&str]) -> Diagnostic {
        let mut message = self.message_format.to_string();
        for (index, arg) in args.iter().enumerate() {
            message = message.replace(&format!("{{{index}}}"), arg);
        }
        Diagnostic {
            id: self.id,
            severity: self.severity,
            message: message.into(),
            location,
        }
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Rule ids.
///
/// ## Ranges
///
/// - **SH0xx**: Style and performance advisories (analyzer)
/// - **SH4xx**: Resource table generation
/// - **SH5xx**: Other additional-file inputs
pub mod codes {
    pub const TYPE_INTERNAL_OR_PRIVATE: &str = "SH001";
    pub const USE_VALUE_TASK: &str = "SH003";
    pub const USE_ARGUMENT_NULL_EXCEPTION_THROW_IF_NULL: &str = "SH007";
    pub const CAST_CAN_BE_SLOW: &str = "SH008";

    pub const RESX_PARSE: &str = "SH401";
    pub const RESX_NAMESPACE: &str = "SH402";
    pub const RESX_RESOURCE_NAME: &str = "SH403";
    pub const RESX_INCONSISTENT_PROPERTY: &str = "SH404";
    pub const RESX_FORMAT_SUFFIX: &str = "SH405";

    pub const ENDPOINTS_EXTRA: &str = "SH501";
    pub const IDENTITY_STRUCTS: &str = "SH502";
}

/// The full rule catalogue.
pub mod descriptors {
    use super::{DiagnosticDescriptor, Severity, codes};

    pub const TYPE_INTERNAL_OR_PRIVATE: DiagnosticDescriptor = DiagnosticDescriptor {
        id: codes::TYPE_INTERNAL_OR_PRIVATE,
        title: "Type should be internal or private",
        message_format: "Type [{0}] should be internal or private",
        category: "Quality",
        severity: Severity::Info,
    };

    pub const USE_VALUE_TASK: DiagnosticDescriptor = DiagnosticDescriptor {
        id: codes::USE_VALUE_TASK,
        title: "Use ValueTask instead of Task",
        message_format: "Use ValueTask instead of Task",
        category: "Performance",
        severity: Severity::Info,
    };

    pub const USE_ARGUMENT_NULL_EXCEPTION_THROW_IF_NULL: DiagnosticDescriptor =
        DiagnosticDescriptor {
            id: codes::USE_ARGUMENT_NULL_EXCEPTION_THROW_IF_NULL,
            title: "Use \"ArgumentNullException.ThrowIfNull()\"",
            message_format: "Use \"ArgumentNullException.ThrowIfNull()\"",
            category: "Quality",
            severity: Severity::Info,
        };

    pub const CAST_CAN_BE_SLOW: DiagnosticDescriptor = DiagnosticDescriptor {
        id: codes::CAST_CAN_BE_SLOW,
        title: "Cast can be slow",
        message_format: "Cast can be slow, consider use Unsafe.As or Unsafe.Unbox",
        category: "Performance",
        severity: Severity::Info,
    };

    pub const RESX_PARSE: DiagnosticDescriptor = DiagnosticDescriptor {
        id: codes::RESX_PARSE,
        title: "Couldn't parse Resx file",
        message_format: "Couldn't parse Resx file '{0}'",
        category: "ResxGenerator",
        severity: Severity::Warning,
    };

    pub const RESX_NAMESPACE: DiagnosticDescriptor = DiagnosticDescriptor {
        id: codes::RESX_NAMESPACE,
        title: "Couldn't compute namespace",
        message_format: "Couldn't compute namespace for file '{0}'",
        category: "ResxGenerator",
        severity: Severity::Warning,
    };

    pub const RESX_RESOURCE_NAME: DiagnosticDescriptor = DiagnosticDescriptor {
        id: codes::RESX_RESOURCE_NAME,
        title: "Couldn't compute resource name",
        message_format: "Couldn't compute resource name for file '{0}'",
        category: "ResxGenerator",
        severity: Severity::Warning,
    };

    pub const RESX_INCONSISTENT_PROPERTY: DiagnosticDescriptor = DiagnosticDescriptor {
        id: codes::RESX_INCONSISTENT_PROPERTY,
        title: "Inconsistent properties",
        message_format: "Property '{0}' values for '{1}' are inconsistent",
        category: "ResxGenerator",
        severity: Severity::Warning,
    };

    pub const RESX_FORMAT_SUFFIX: DiagnosticDescriptor = DiagnosticDescriptor {
        id: codes::RESX_FORMAT_SUFFIX,
        title: "Resource data should not ends with 'Format'",
        message_format: "Resource data '{0}' should not ends with 'Format'",
        category: "ResxGenerator",
        severity: Severity::Warning,
    };

    pub const ENDPOINTS_EXTRA: DiagnosticDescriptor = DiagnosticDescriptor {
        id: codes::ENDPOINTS_EXTRA,
        title: "Couldn't parse endpoints metadata",
        message_format: "Couldn't parse 'Extra' metadata in endpoints file '{0}': {1}",
        category: "EndpointsGenerator",
        severity: Severity::Warning,
    };

    pub const IDENTITY_STRUCTS: DiagnosticDescriptor = DiagnosticDescriptor {
        id: codes::IDENTITY_STRUCTS,
        title: "Couldn't parse identity structs",
        message_format: "Couldn't parse identity structs file '{0}': {1}",
        category: "IdentityGenerator",
        severity: Severity::Warning,
    };
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics while a stage runs.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Report a descriptor at `location` with template arguments.
    pub fn report(
        &mut self,
        descriptor: &DiagnosticDescriptor,
        location: Option<Location>,
        args: &[&str],
    ) {
        self.add(descriptor.create(location, args));
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Extend<Diagnostic> for DiagnosticCollector {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.diagnostics.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_substitutes_arguments() {
        let diagnostic = descriptors::RESX_INCONSISTENT_PROPERTY.create(None, &["Name", "Main"]);
        assert_eq!(
            &*diagnostic.message,
            "Property 'Name' values for 'Main' are inconsistent"
        );
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.id, "SH404");
    }

    #[test]
    fn test_analyzer_rules_are_informational() {
        for descriptor in [
            descriptors::TYPE_INTERNAL_OR_PRIVATE,
            descriptors::USE_VALUE_TASK,
            descriptors::USE_ARGUMENT_NULL_EXCEPTION_THROW_IF_NULL,
            descriptors::CAST_CAN_BE_SLOW,
        ] {
            assert_eq!(descriptor.severity, Severity::Info, "{}", descriptor.id);
        }
    }

    #[test]
    fn test_display_includes_path() {
        let diagnostic = descriptors::RESX_PARSE
            .create(Some(Location::file("Strings.resx")), &["Strings.resx"]);
        let text = diagnostic.to_string();
        assert!(text.starts_with("Strings.resx"), "{text}");
        assert!(text.contains("warning SH401"), "{text}");
    }
}
