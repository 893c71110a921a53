//! Reading one `.resx` file: its `/root/data` entries, its culture and the
//! names the generated class is emitted under.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use smol_str::SmolStr;

use crate::base::StructuralArray;
use crate::diagnostics::{Diagnostic, Location, descriptors};
use crate::error::{GeneratorError, Result};
use crate::host::{AdditionalText, FileOptions};
use crate::syntax::naming::to_csharp_identifier;

/// Locale of a file without a culture suffix.
pub const NEUTRAL: &str = "Neutral";

const METADATA_PREFIX: &str = "build_metadata.AdditionalFiles.";

/// One `<data>` element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResxData {
    pub name: SmolStr,
    pub type_name: Option<SmolStr>,
    pub comment: Option<String>,
    pub value: Option<String>,
}

/// A parsed resx file with its resolved names.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResxFile {
    pub path: SmolStr,
    /// Path without extension and culture suffix.
    pub resource_path: String,
    pub locale: SmolStr,
    pub data: StructuralArray<ResxData>,
    pub namespace: SmolStr,
    pub class_name: SmolStr,
    pub resource_name: SmolStr,
}

/// Parses `text` and resolves its names, or the warning explaining why the
/// file is skipped.
pub fn read_file(
    text: &AdditionalText,
    options: &FileOptions,
    assembly_name: Option<&str>,
) -> std::result::Result<ResxFile, Diagnostic> {
    let location = || Some(Location::file(text.path.clone()));
    let data = match parse_data(&text.text) {
        Ok(data) => data,
        Err(error) => {
            tracing::warn!(path = %text.path, %error, "resx file not parsed");
            return Err(descriptors::RESX_PARSE.create(location(), &[&text.path]));
        }
    };

    let (resource_path, locale) = split_culture(&text.path);
    let root_namespace = metadata(options, "RootNamespace", Some("RootNamespace"))
        .or(assembly_name)
        .unwrap_or_default();
    let project_dir = metadata(options, "ProjectDir", Some("ProjectDir"))
        .or(assembly_name)
        .unwrap_or_default();

    let namespace = metadata(options, "Namespace", Some("DefaultResourcesNamespace"))
        .map(SmolStr::from)
        .or_else(|| compute_namespace(root_namespace, project_dir, &resource_path));
    let Some(namespace) = namespace else {
        return Err(descriptors::RESX_NAMESPACE.create(location(), &[&text.path]));
    };

    let resource_name = metadata(options, "ResourceName", None)
        .map(SmolStr::from)
        .or_else(|| compute_resource_name(root_namespace, project_dir, &resource_path));
    let Some(resource_name) = resource_name else {
        return Err(descriptors::RESX_RESOURCE_NAME.create(location(), &[&text.path]));
    };

    let class_name = metadata(options, "ClassName", None)
        .map(SmolStr::from)
        .unwrap_or_else(|| to_csharp_identifier(file_name(&resource_path)).into());

    Ok(ResxFile {
        path: text.path.clone(),
        resource_path,
        locale,
        data: data.into(),
        namespace,
        class_name,
        resource_name,
    })
}

/// Per-file `build_metadata.AdditionalFiles.{name}`, then the global
/// `build_property.{global}`. Empty values count as missing.
fn metadata<'a>(options: &'a FileOptions, name: &str, global: Option<&str>) -> Option<&'a str> {
    options
        .non_empty(&format!("{METADATA_PREFIX}{name}"))
        .or_else(|| global.and_then(|global| options.non_empty(&format!("build_property.{global}"))))
}

// ============================================================================
// XML
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum Capture {
    Value,
    Comment,
}

/// A `<data>` element that has been opened but not closed yet.
#[derive(Default)]
struct PendingData {
    name: Option<SmolStr>,
    type_name: Option<SmolStr>,
    comment: Option<String>,
    value: Option<String>,
}

impl PendingData {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let mut pending = Self::default();
        for attribute in start.attributes() {
            let attribute = attribute?;
            match attribute.key.as_ref() {
                b"name" => pending.name = Some(attribute.unescape_value()?.as_ref().into()),
                b"type" => pending.type_name = Some(attribute.unescape_value()?.as_ref().into()),
                _ => {}
            }
        }
        Ok(pending)
    }

    fn slot(&mut self, capture: Capture) -> &mut Option<String> {
        match capture {
            Capture::Value => &mut self.value,
            Capture::Comment => &mut self.comment,
        }
    }

    /// Unnamed elements are dropped.
    fn finish(self) -> Option<ResxData> {
        Some(ResxData {
            name: self.name?,
            type_name: self.type_name,
            comment: self.comment,
            value: self.value,
        })
    }
}

fn at(path: &[String], expected: &[&str]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(name, expected)| name == expected)
}

fn capture_kind(path: &[String]) -> Option<Capture> {
    if at(path, &["root", "data", "value"]) {
        Some(Capture::Value)
    } else if at(path, &["root", "data", "comment"]) {
        Some(Capture::Comment)
    } else {
        None
    }
}

/// The `<data>` elements directly under `<root>`.
pub fn parse_data(text: &str) -> Result<Vec<ResxData>> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut path: Vec<String> = Vec::new();
    let mut seen_root = false;
    let mut data = Vec::new();
    let mut current: Option<PendingData> = None;
    // Kind, depth of the captured element and the text so far.
    let mut capture: Option<(Capture, usize, String)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                open_element(&mut path, &mut seen_root, &start)?;
                if at(&path, &["root", "data"]) {
                    current = Some(PendingData::from_start(&start)?);
                } else if let (Some(kind), Some(_)) = (capture_kind(&path), &current) {
                    capture.get_or_insert((kind, path.len(), String::new()));
                }
            }
            Event::Empty(start) => {
                open_element(&mut path, &mut seen_root, &start)?;
                if at(&path, &["root", "data"]) {
                    data.extend(PendingData::from_start(&start)?.finish());
                } else if let (Some(kind), Some(pending)) = (capture_kind(&path), current.as_mut()) {
                    pending.slot(kind).get_or_insert_with(String::new);
                }
                path.pop();
            }
            Event::End(_) => {
                match capture.take() {
                    Some((kind, depth, text)) if depth == path.len() => {
                        if let Some(pending) = current.as_mut() {
                            // The first child element wins.
                            pending.slot(kind).get_or_insert(text);
                        }
                    }
                    other => capture = other,
                }
                if at(&path, &["root", "data"]) {
                    data.extend(current.take().and_then(PendingData::finish));
                }
                path.pop();
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                if let Some((_, _, buffer)) = capture.as_mut() {
                    buffer.push_str(&text);
                } else if path.is_empty() && !text.trim().is_empty() {
                    return Err(GeneratorError::malformed("text outside the root element"));
                }
            }
            Event::CData(cdata) => {
                if let Some((_, _, buffer)) = capture.as_mut() {
                    buffer.push_str(&String::from_utf8_lossy(&cdata));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !path.is_empty() {
        return Err(GeneratorError::malformed(format!("unclosed element <{}>", path.join("/"))));
    }
    if !seen_root {
        return Err(GeneratorError::malformed("no root element"));
    }
    Ok(data)
}

fn open_element(path: &mut Vec<String>, seen_root: &mut bool, start: &BytesStart<'_>) -> Result<()> {
    if path.is_empty() {
        if *seen_root {
            return Err(GeneratorError::malformed("multiple root elements"));
        }
        *seen_root = true;
    }
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|error| GeneratorError::malformed(format!("element name: {error}")))?
        .to_string();
    path.push(name);
    Ok(())
}

// ============================================================================
// PATHS
// ============================================================================

/// `Dir/Strings.zh-Hans.resx` => (`Dir/Strings`, `zh-Hans`);
/// `Dir/Strings.resx` => (`Dir/Strings`, `Neutral`).
pub fn split_culture(path: &str) -> (String, SmolStr) {
    let without_extension = match path.rfind('.') {
        Some(dot) if dot > separator_end(path) => &path[..dot],
        _ => path,
    };
    let stem_start = separator_end(without_extension);
    match without_extension.rfind('.') {
        Some(dot) if dot >= stem_start && is_culture_name(&without_extension[dot + 1..]) => (
            without_extension[..dot].to_string(),
            without_extension[dot + 1..].into(),
        ),
        _ => (without_extension.to_string(), SmolStr::new_static(NEUTRAL)),
    }
}

/// Index just past the last path separator.
fn separator_end(path: &str) -> usize {
    path.rfind(['/', '\\']).map_or(0, |index| index + 1)
}

fn file_name(path: &str) -> &str {
    &path[separator_end(path)..]
}

/// Language tags such as `en`, `zh-Hans`, `zh-Hant-TW` or `pt-BR`.
pub fn is_culture_name(text: &str) -> bool {
    let mut subtags = text.split('-');
    let language = subtags.next().unwrap_or_default();
    (2..=3).contains(&language.len())
        && language.chars().all(|c| c.is_ascii_alphabetic())
        && subtags.all(|subtag| {
            (2..=8).contains(&subtag.len()) && subtag.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

/// Lexical normalization: `/` separators, `.` dropped and `..` folded.
fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." if parts.last().is_some_and(|last| *last != "..") => {
                parts.pop();
            }
            part => parts.push(part),
        }
    }
    let joined = parts.join("/");
    if absolute { format!("/{joined}") } else { joined }
}

fn with_end_separator(mut path: String) -> String {
    if !path.ends_with('/') {
        path.push('/');
    }
    path
}

fn parent(path: &str) -> &str {
    path.rfind('/').map_or("", |index| &path[..index])
}

pub fn compute_resource_name(root_namespace: &str, project_dir: &str, resource_path: &str) -> Option<SmolStr> {
    let project_dir = with_end_separator(normalize(project_dir));
    let resource_path = normalize(resource_path);
    if project_dir == resource_path {
        return Some(root_namespace.into());
    }
    let relative = resource_path.strip_prefix(&project_dir)?;
    Some(format!("{root_namespace}.{}", relative.replace('/', ".")).into())
}

pub fn compute_namespace(root_namespace: &str, project_dir: &str, resource_path: &str) -> Option<SmolStr> {
    let project_dir = with_end_separator(normalize(project_dir));
    let resource_dir = with_end_separator(parent(&normalize(resource_path)).to_string());
    if project_dir == resource_dir {
        return Some(root_namespace.into());
    }
    let relative = resource_dir.strip_prefix(&project_dir)?;
    let namespace = format!("{root_namespace}.{}", relative.replace('/', "."));
    Some(namespace.trim_end_matches('.').into())
}
