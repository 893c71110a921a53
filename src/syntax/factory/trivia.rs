//! Leading trivia: documentation comments, line comments and directives.

use super::{Element, node, owned, syntax_wrapper, token};
use crate::syntax::SyntaxKind;

syntax_wrapper! {
    /// Lines written before a declaration, one token per line.
    TriviaSyntax,
}

impl Default for TriviaSyntax {
    fn default() -> Self {
        Self(node(SyntaxKind::LeadingTrivia, Vec::new()))
    }
}

impl TriviaSyntax {
    pub fn new() -> Self {
        Self::default()
    }

    /// `#nullable enable`
    pub fn nullable_enable() -> Self {
        Self::new().directive("#nullable enable")
    }

    fn push(self, kind: SyntaxKind, text: &str) -> Self {
        let mut children: Vec<Element> = self.0.children().map(owned).collect();
        children.push(token(kind, text));
        Self(node(SyntaxKind::LeadingTrivia, children))
    }

    pub fn directive(self, text: &str) -> Self {
        self.push(SyntaxKind::Directive, text)
    }

    /// `// text`
    pub fn comment(self, text: &str) -> Self {
        self.push(SyntaxKind::LineComment, &format!("// {text}"))
    }

    /// `/// text`; multi-line text continues on further `///` lines.
    pub fn doc(self, text: &str) -> Self {
        text.split('\n').fold(self, |trivia, line| {
            let line = line.trim_end_matches('\r');
            trivia.push(SyntaxKind::DocComment, &format!("/// {line}"))
        })
    }

    /// `/// <summary>`, the lines, `/// </summary>`.
    pub fn doc_summary(self, lines: &[&str]) -> Self {
        let trivia = self.doc("<summary>");
        let trivia = lines.iter().fold(trivia, |t, line| t.doc(line));
        trivia.doc("</summary>")
    }

    /// This trivia followed by `other`.
    pub fn concat(self, other: &TriviaSyntax) -> Self {
        let mut children: Vec<Element> = self.0.children().map(owned).collect();
        children.extend(other.0.children().map(owned));
        Self(node(SyntaxKind::LeadingTrivia, children))
    }

    pub fn is_empty(&self) -> bool {
        self.0.children().len() == 0
    }
}

/// Escapes text for an XML documentation text node. Quotes are left as is.
pub fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}
