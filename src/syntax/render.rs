//! Whitespace normalization for generated C#.
//!
//! Factory trees carry no trivia besides comments and directives, so layout
//! is decided here from node kinds alone:
//! - declarations, statements, switch arms and usings start a new line
//! - blocks put their braces on their own lines and indent their contents
//! - accessor lists without bodies stay inline (`{ get; set; }`)
//! - members of a type or namespace are separated by one blank line
//! - tokens on a line are separated by single spaces, except where C#
//!   convention glues them (`Foo<T>()`, `x!`, `(int)value`, `a.b`)

use rowan::GreenNode;
use smol_str::SmolStr;

use super::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
use crate::base::PooledBuilder;
use crate::config::RenderOptions;

/// Lines written at the top of every generated file.
pub const GENERATED_HEADER: &[&str] = &[
    "// Copyright (c) DGP Studio. All rights reserved.",
    "// Licensed under the MIT license.",
    "",
    "#pragma warning disable CS1591",
    "#pragma warning disable SA1003, SA1009, SA1010, SA1013, SA1027, SA1028",
    "#pragma warning disable SA1101, SA1106, SA1117, SA1122, SA1128",
    "#pragma warning disable SA1201, SA1202, SA1205",
    "#pragma warning disable SA1413",
    "#pragma warning disable SA1514, SA1516",
    "#pragma warning disable SA1623, SA1629, SA1649",
];

/// Keywords directly followed by `(` without a space.
const CALL_LIKE_KEYWORDS: &[&str] = &["typeof", "default", "new", "base", "this", "sizeof", "checked"];

const PREDEFINED_TYPES: &[&str] = &[
    "bool", "byte", "sbyte", "char", "decimal", "double", "float", "int", "uint", "long", "ulong",
    "short", "ushort", "object", "string", "nint", "nuint", "void",
];

/// Renders a tree as multi-line source text ending with a newline.
pub fn render(root: &GreenNode, options: &RenderOptions) -> String {
    let mut renderer = Renderer::new(options, false);
    renderer.node(&SyntaxNode::new_root(root.clone()));
    let mut text = renderer.out.to_string();
    let newline = options.newline.as_str();
    if !text.ends_with(newline) {
        text.push_str(newline);
    }
    text
}

/// Renders a tree on a single line, e.g. a type or an expression.
pub fn render_inline(root: &GreenNode) -> String {
    let options = RenderOptions::default();
    let mut renderer = Renderer::new(&options, true);
    renderer.node(&SyntaxNode::new_root(root.clone()));
    renderer.out.to_string()
}

/// Prepends [`GENERATED_HEADER`] and a blank line to `body`.
pub fn with_generated_header(body: &str, options: &RenderOptions) -> String {
    let newline = options.newline.as_str();
    let mut text = String::with_capacity(body.len() + 512);
    for line in GENERATED_HEADER {
        text.push_str(line);
        text.push_str(newline);
    }
    text.push_str(newline);
    text.push_str(body);
    text
}

/// A complete generated file: header followed by the rendered unit.
pub fn render_document(root: &GreenNode, options: &RenderOptions) -> String {
    with_generated_header(&render(root, options), options)
}

struct Renderer<'a> {
    options: &'a RenderOptions,
    inline: bool,
    out: PooledBuilder<u8>,
    indent: usize,
    at_line_start: bool,
    pending_newline: bool,
    pending_blank: bool,
    glue_next: bool,
    prev: Option<(SyntaxKind, SmolStr)>,
}

impl<'a> Renderer<'a> {
    fn new(options: &'a RenderOptions, inline: bool) -> Self {
        Self {
            options,
            inline,
            out: PooledBuilder::rent(),
            indent: 0,
            at_line_start: true,
            pending_newline: false,
            pending_blank: false,
            glue_next: false,
            prev: None,
        }
    }

    fn node(&mut self, node: &SyntaxNode) {
        let kind = node.kind();
        if starts_line(node) {
            self.request_newline();
        }

        let mut previous_line_child: Option<SyntaxKind> = None;
        let first_token = node.first_child_or_token().and_then(SyntaxElement::into_token);
        let last_token = node.last_child_or_token().and_then(SyntaxElement::into_token);

        for child in node.children_with_tokens() {
            match child {
                rowan::NodeOrToken::Node(child) => {
                    let child_kind = child.kind();
                    if separates_members(kind) && starts_line(&child) {
                        let blank = match previous_line_child {
                            Some(previous) => {
                                !(previous == SyntaxKind::UsingDirective
                                    && child_kind == SyntaxKind::UsingDirective)
                            }
                            None => kind == SyntaxKind::FileScopedNamespace,
                        };
                        self.pending_blank |= blank;
                        previous_line_child = Some(child_kind);
                    }
                    if child_kind == SyntaxKind::ParameterList
                        && matches!(
                            kind,
                            SyntaxKind::OperatorDecl | SyntaxKind::ConversionOperatorDecl
                        )
                    {
                        self.glue_next = true;
                    }
                    self.node(&child);
                    if child_kind == SyntaxKind::AttributeList && kind.is_member_declaration() {
                        self.request_newline();
                    }
                }
                rowan::NodeOrToken::Token(token) => {
                    let is_first = first_token.as_ref() == Some(&token);
                    let is_last = last_token.as_ref() == Some(&token);
                    self.token(&token, node, is_first, is_last);
                }
            }
        }
    }

    fn token(&mut self, token: &SyntaxToken, parent: &SyntaxNode, is_first: bool, is_last: bool) {
        let kind = token.kind();
        let parent_kind = parent.kind();

        match kind {
            SyntaxKind::LBrace if is_block(parent) => {
                self.request_newline();
                self.write(kind, token.text());
                self.indent += 1;
                return;
            }
            SyntaxKind::RBrace if is_block(parent) => {
                self.indent = self.indent.saturating_sub(1);
                self.request_newline();
                self.write(kind, token.text());
                return;
            }
            SyntaxKind::LineComment | SyntaxKind::DocComment | SyntaxKind::Directive => {
                if parent_kind == SyntaxKind::LeadingTrivia {
                    self.request_newline();
                }
                self.write(kind, token.text());
                self.request_newline();
                return;
            }
            _ => {}
        }

        let glue_before = (parent_kind == SyntaxKind::PostfixUnary && is_last)
            || (parent_kind == SyntaxKind::Type && kind == SyntaxKind::Star)
            || (parent_kind == SyntaxKind::AttributeTarget && kind == SyntaxKind::Colon);
        if glue_before {
            self.glue_next = true;
        }

        self.write(kind, token.text());

        let glue_after = (parent_kind == SyntaxKind::PrefixUnary && is_first)
            || (parent_kind == SyntaxKind::Cast && kind == SyntaxKind::RParen);
        if glue_after {
            self.glue_next = true;
        }
    }

    fn request_newline(&mut self) {
        if !self.inline {
            self.pending_newline = true;
        }
    }

    fn write(&mut self, kind: SyntaxKind, text: &str) {
        if self.pending_newline && !self.out.is_empty() {
            self.out.push_str(self.options.newline.as_str());
            if self.pending_blank {
                self.out.push_str(self.options.newline.as_str());
            }
            self.at_line_start = true;
        }
        self.pending_newline = false;
        self.pending_blank = false;

        if self.at_line_start {
            if !self.inline {
                self.out.push_str(&self.options.indent(self.indent));
            }
        } else if !self.glue_next && needs_space(self.prev.as_ref(), kind) {
            self.out.push_str(" ");
        }

        self.out.push_str(text);
        self.prev = Some((kind, SmolStr::new(text)));
        self.glue_next = false;
        self.at_line_start = false;
    }
}

fn needs_space(prev: Option<&(SyntaxKind, SmolStr)>, current: SyntaxKind) -> bool {
    use SyntaxKind::*;

    let Some((prev, prev_text)) = prev else {
        return false;
    };
    if matches!(
        current,
        Comma | Semicolon | RParen | RBracket | Dot | ColonColon | Question | LAngle | RAngle
    ) {
        return false;
    }
    if matches!(prev, LParen | LBracket | LAngle | Dot | ColonColon) {
        return false;
    }
    let keyword_in = |words: &[&str]| *prev == Keyword && words.contains(&prev_text.as_str());
    match current {
        LParen => !(matches!(prev, Identifier | RAngle) || keyword_in(CALL_LIKE_KEYWORDS)),
        LBracket => {
            !(matches!(prev, Identifier | Question | RAngle | RBracket | RParen)
                || keyword_in(PREDEFINED_TYPES)
                || keyword_in(&["this"]))
        }
        _ => true,
    }
}

fn separates_members(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::CompilationUnit | SyntaxKind::FileScopedNamespace | SyntaxKind::MemberList
    )
}

fn starts_line(node: &SyntaxNode) -> bool {
    let kind = node.kind();
    if kind.is_member_declaration() || kind.is_statement() {
        return true;
    }
    match kind {
        SyntaxKind::UsingDirective
        | SyntaxKind::FileScopedNamespace
        | SyntaxKind::NamespaceDecl
        | SyntaxKind::SwitchArm
        | SyntaxKind::LeadingTrivia => true,
        SyntaxKind::AccessorDecl => node
            .parent()
            .is_some_and(|list| !is_simple_accessor_list(&list)),
        SyntaxKind::AttributeList => node
            .parent()
            .is_some_and(|parent| parent.kind().is_member_declaration()),
        _ => false,
    }
}

fn is_block(node: &SyntaxNode) -> bool {
    match node.kind() {
        SyntaxKind::Block
        | SyntaxKind::MemberList
        | SyntaxKind::SwitchArmList
        | SyntaxKind::EnumMemberList => true,
        SyntaxKind::AccessorList => !is_simple_accessor_list(node),
        _ => false,
    }
}

/// `{ get; set; }`: every accessor ends in `;` without a body.
fn is_simple_accessor_list(node: &SyntaxNode) -> bool {
    node.kind() == SyntaxKind::AccessorList
        && node.children().all(|accessor| {
            accessor.children().all(|child| {
                !matches!(
                    child.kind(),
                    SyntaxKind::Block | SyntaxKind::ArrowExpressionClause
                )
            })
        })
}
