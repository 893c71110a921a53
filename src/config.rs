//! Generator configuration.
//!
//! Options have defaults matching the reference build and can be overlaid
//! from global analyzer config keys (`build_property.SnapGen*`).

use crate::host::AnalyzerConfigOptions;

/// Line terminator used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NewLine {
    #[default]
    Lf,
    CrLf,
}

impl NewLine {
    pub fn as_str(self) -> &'static str {
        match self {
            NewLine::Lf => "\n",
            NewLine::CrLf => "\r\n",
        }
    }
}

/// Options for turning syntax trees into text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderOptions {
    /// Number of spaces per indentation level (or tab width if using tabs)
    pub tab_size: usize,
    /// Use spaces for indentation (false = use tabs)
    pub insert_spaces: bool,
    pub newline: NewLine,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            insert_spaces: true,
            newline: NewLine::Lf,
        }
    }
}

impl RenderOptions {
    /// Generate indentation string for the given level
    pub fn indent(&self, level: usize) -> String {
        if self.insert_spaces {
            " ".repeat(self.tab_size * level)
        } else {
            "\t".repeat(level)
        }
    }
}

/// Driver-wide options.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratorOptions {
    pub render: RenderOptions,
    /// Run analyzer rules over `*.g.cs` trees too.
    pub analyze_generated_code: bool,
    /// Analyze syntax trees on the rayon pool.
    pub parallel_analysis: bool,
    /// Emit the marker attribute declarations.
    pub emit_marker_attributes: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            analyze_generated_code: false,
            parallel_analysis: true,
            emit_marker_attributes: true,
        }
    }
}

pub const INDENT_SIZE_KEY: &str = "build_property.SnapGenIndentSize";
pub const NEW_LINE_KEY: &str = "build_property.SnapGenNewLine";
pub const ANALYZE_GENERATED_CODE_KEY: &str = "build_property.SnapGenAnalyzeGeneratedCode";
pub const EMIT_MARKER_ATTRIBUTES_KEY: &str = "build_property.SnapGenEmitMarkerAttributes";

impl GeneratorOptions {
    /// Overlay global analyzer config values on the defaults.
    pub fn from_analyzer_config(options: &AnalyzerConfigOptions) -> Self {
        let mut result = Self::default();

        if let Some(value) = options.global_value(INDENT_SIZE_KEY) {
            match value.trim().parse::<usize>() {
                Ok(size) if size > 0 => result.render.tab_size = size,
                _ => tracing::warn!(key = INDENT_SIZE_KEY, value, "ignoring invalid indent size"),
            }
        }

        if let Some(value) = options.global_value(NEW_LINE_KEY) {
            match value.trim().to_ascii_lowercase().as_str() {
                "lf" => result.render.newline = NewLine::Lf,
                "crlf" => result.render.newline = NewLine::CrLf,
                _ => tracing::warn!(key = NEW_LINE_KEY, value, "ignoring invalid newline"),
            }
        }

        if let Some(flag) = parse_flag(options, ANALYZE_GENERATED_CODE_KEY) {
            result.analyze_generated_code = flag;
        }
        if let Some(flag) = parse_flag(options, EMIT_MARKER_ATTRIBUTES_KEY) {
            result.emit_marker_attributes = flag;
        }

        result
    }
}

fn parse_flag(options: &AnalyzerConfigOptions, key: &'static str) -> Option<bool> {
    let value = options.global_value(key)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => {
            tracing::warn!(key, value, "ignoring invalid boolean");
            None
        }
    }
}
