//! Import scanning for the layering suite.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Every `.rs` file under `root`, or `root` itself when it is a file.
pub fn rust_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "rs"))
        .collect()
}

pub fn read_required_file(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|error| panic!("cannot read {}: {error}", path.display()))
}

/// Top-level modules named by the `use crate::` lines of `source`, with their
/// line numbers. Scanning stops at the unit test module.
pub fn crate_imports(source: &str) -> Vec<(usize, String)> {
    let mut imports = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let line = line.trim();
        if line == "mod tests {" {
            break;
        }
        let Some(path) = use_path(line) else {
            continue;
        };
        let Some(rest) = path.strip_prefix("crate::") else {
            continue;
        };
        if let Some(group) = rest.strip_prefix('{') {
            for item in group.split(',') {
                if let Some(module) = first_segment(item) {
                    imports.push((index + 1, module));
                }
            }
        } else if let Some(module) = first_segment(rest) {
            imports.push((index + 1, module));
        }
    }
    imports
}

fn use_path(line: &str) -> Option<&str> {
    let line = line
        .strip_prefix("pub(crate) ")
        .or_else(|| line.strip_prefix("pub "))
        .unwrap_or(line);
    line.strip_prefix("use ")
}

fn first_segment(path: &str) -> Option<String> {
    let segment: String = path
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    (!segment.is_empty()).then_some(segment)
}

/// Imports of modules outside `allowed` by files under `root`. Imports of
/// `layer` itself are always allowed.
pub fn collect_layer_violations(root: &Path, allowed: &[&str], layer: &str) -> Vec<String> {
    let mut violations = Vec::new();
    for path in rust_files(root) {
        let source = read_required_file(&path);
        for (line, module) in crate_imports(&source) {
            if module != layer && !allowed.contains(&module.as_str()) {
                violations.push(format!("  {}:{line} imports crate::{module}", path.display()));
            }
        }
    }
    violations
}

pub fn format_violation_list<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_imports() {
        let source = "use crate::base::names;\npub use crate::{host::Compilation, error};\nuse std::sync::Arc;\n#[cfg(test)]\nmod tests {\n    use crate::driver;\n}\n";
        assert_eq!(
            crate_imports(source),
            vec![(1, "base".to_string()), (2, "host".to_string()), (2, "error".to_string())]
        );
    }
}
