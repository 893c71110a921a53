//! Error types for generator stages.

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors raised while snapshotting, parsing additional files or emitting.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The run was cancelled through its token.
    #[error("operation was cancelled")]
    Cancelled,

    /// A single element was required.
    #[error("sequence contains {count} elements, expected exactly one")]
    NotSingle { count: usize },

    /// A symbol does not have the shape a stage requires.
    #[error("Invalid {kind}: {message}")]
    InvalidSymbol { kind: &'static str, message: String },

    /// A constant value cannot be expressed in emitted code.
    #[error("Unsupported constant: {0}")]
    UnsupportedConstant(String),

    /// Composite format string could not be parsed.
    #[error("Invalid format string '{text}': {message}")]
    Format { text: String, message: String },

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML parsing error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A document parsed but does not have the expected structure.
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// Malformed XML attribute.
    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// A stage failed while assembling its output.
    #[error("{generator} failed: {message}")]
    Emit {
        generator: &'static str,
        message: String,
    },
}

impl GeneratorError {
    /// Create an invalid symbol error.
    pub fn invalid_symbol(message: impl Into<String>) -> Self {
        Self::InvalidSymbol {
            kind: "symbol",
            message: message.into(),
        }
    }

    /// Create an invalid attribute error.
    pub fn invalid_attribute(message: impl Into<String>) -> Self {
        Self::InvalidSymbol {
            kind: "attribute",
            message: message.into(),
        }
    }

    /// Create a format error.
    pub fn format(text: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            text: text.into(),
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Create an emission error.
    pub fn emit(generator: &'static str, message: impl Into<String>) -> Self {
        Self::Emit {
            generator,
            message: message.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Marker returned by cancellable queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cancelled;

impl Cancelled {
    /// `Err(Cancelled)` once `token` has been cancelled.
    pub fn check(token: &CancellationToken) -> std::result::Result<(), Cancelled> {
        if token.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

impl From<Cancelled> for GeneratorError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}
