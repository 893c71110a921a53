//! Additional files and build metadata.

use std::collections::BTreeMap;
use std::sync::Arc;

use smol_str::SmolStr;

/// A non-source file handed to the generators.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AdditionalText {
    pub path: SmolStr,
    pub text: Arc<str>,
}

impl AdditionalText {
    pub fn new(path: impl Into<SmolStr>, text: impl Into<Arc<str>>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Final path component.
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.path.as_str())
    }

    /// Case-insensitive suffix match on the path.
    pub fn ends_with_ignore_case(&self, suffix: &str) -> bool {
        let path = self.path.as_bytes();
        path.len() >= suffix.len()
            && path[path.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
    }
}

/// Key/value build metadata: global `build_property.*` keys plus per-file
/// `build_metadata.AdditionalFiles.*` keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalyzerConfigOptions {
    global: BTreeMap<String, String>,
    files: BTreeMap<String, BTreeMap<String, String>>,
}

impl AnalyzerConfigOptions {
    pub fn set_global(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.global.insert(key.into(), value.into());
    }

    pub fn set_for_file(
        &mut self,
        path: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.files
            .entry(path.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    pub fn global_value(&self, key: &str) -> Option<&str> {
        self.global.get(key).map(String::as_str)
    }

    /// Per-file value, falling back to the global one.
    pub fn try_get_value(&self, path: &str, key: &str) -> Option<&str> {
        self.files
            .get(path)
            .and_then(|values| values.get(key))
            .map(String::as_str)
            .or_else(|| self.global_value(key))
    }

    /// The options one additional file sees.
    pub fn for_file(&self, path: &str) -> FileOptions {
        let mut values = self.global.clone();
        if let Some(file) = self.files.get(path) {
            values.extend(file.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        FileOptions { values }
    }
}

/// Options visible to a single additional file, file keys shadowing globals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FileOptions {
    values: BTreeMap<String, String>,
}

impl FileOptions {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value for `key` unless it is missing or empty.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_values_shadow_globals() {
        let mut options = AnalyzerConfigOptions::default();
        options.set_global("build_property.RootNamespace", "Snap.Hutao");
        options.set_for_file("a.resx", "build_property.RootNamespace", "Other");
        assert_eq!(options.try_get_value("a.resx", "build_property.RootNamespace"), Some("Other"));
        assert_eq!(options.try_get_value("b.resx", "build_property.RootNamespace"), Some("Snap.Hutao"));
        assert_eq!(options.for_file("a.resx").get("build_property.RootNamespace"), Some("Other"));
    }

    #[test]
    fn test_empty_values_are_skipped_by_non_empty() {
        let mut options = AnalyzerConfigOptions::default();
        options.set_global("build_property.ProjectDir", "");
        assert_eq!(options.for_file("x").non_empty("build_property.ProjectDir"), None);
    }

    #[test]
    fn test_suffix_match_ignores_case() {
        let text = AdditionalText::new("Web/ApiEndpoints.CSV", "");
        assert!(text.ends_with_ignore_case("endpoints.csv"));
        assert_eq!(text.file_name(), "ApiEndpoints.CSV");
    }
}
