//! The compilation the generators read: syntax trees plus what the compiler
//! bound them to.
//!
//! Bindings are keyed by tree index, node kind and range, so a red node from
//! any traversal of the same tree finds its symbol.

use std::fmt;

use indexmap::IndexMap;
use rowan::GreenNode;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use text_size::TextRange;
use tokio_util::sync::CancellationToken;

use super::symbols::{AttributeData, SpecialType, Symbol, TypeSymbol};
use crate::error::Cancelled;
use crate::syntax::{SyntaxKind, SyntaxNode, render_inline};

/// One source file.
#[derive(Clone, Debug)]
pub struct SyntaxTree {
    pub path: SmolStr,
    pub root: GreenNode,
}

impl SyntaxTree {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.root.clone())
    }

    /// Output of a source generator, by naming convention.
    pub fn is_generated(&self) -> bool {
        self.path.ends_with(".g.cs")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeKey {
    tree: usize,
    kind: SyntaxKind,
    range: TextRange,
}

impl NodeKey {
    pub(crate) fn new(tree: usize, node: &SyntaxNode) -> Self {
        Self {
            tree,
            kind: node.kind(),
            range: node.text_range(),
        }
    }
}

/// A declaration carrying a requested attribute.
pub struct AttributeCandidate {
    pub tree: usize,
    pub node: SyntaxNode,
    pub symbol: Symbol,
    /// Applications of the requested attribute only, in source order.
    pub attributes: Vec<AttributeData>,
    /// Type declaring the member, or containing the type.
    pub containing_type: Option<TypeSymbol>,
}

/// A node accepted by a syntax predicate.
pub struct SyntaxCandidate {
    pub tree: usize,
    pub node: SyntaxNode,
    pub symbol: Option<Symbol>,
}

/// Immutable program snapshot.
pub struct Compilation {
    pub(crate) assembly_name: SmolStr,
    pub(crate) trees: Vec<SyntaxTree>,
    pub(crate) bindings: FxHashMap<NodeKey, Symbol>,
    pub(crate) expression_types: FxHashMap<NodeKey, TypeSymbol>,
    /// Known types by fully qualified metadata name.
    pub(crate) types: IndexMap<String, TypeSymbol>,
}

impl fmt::Debug for Compilation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compilation")
            .field("assembly_name", &self.assembly_name)
            .field("trees", &self.trees.iter().map(|t| &t.path).collect::<Vec<_>>())
            .field("types", &self.types.len())
            .finish()
    }
}

impl Compilation {
    pub fn assembly_name(&self) -> &str {
        &self.assembly_name
    }

    pub fn trees(&self) -> &[SyntaxTree] {
        &self.trees
    }

    pub fn tree(&self, index: usize) -> Option<&SyntaxTree> {
        self.trees.get(index)
    }

    pub fn root(&self, index: usize) -> Option<SyntaxNode> {
        self.tree(index).map(SyntaxTree::syntax)
    }

    /// Symbol declared by `node`.
    pub fn symbol_for(&self, tree: usize, node: &SyntaxNode) -> Option<&Symbol> {
        self.bindings.get(&NodeKey::new(tree, node))
    }

    /// Type of a type reference or bound expression.
    pub fn type_of(&self, tree: usize, node: &SyntaxNode) -> Option<TypeSymbol> {
        if node.kind() == SyntaxKind::Type {
            return self.resolve_type(&render_inline(&node.green().into_owned()));
        }
        self.expression_types.get(&NodeKey::new(tree, node)).cloned()
    }

    pub fn get_type_by_metadata_name(&self, metadata_name: &str) -> Option<&TypeSymbol> {
        self.types.get(metadata_name)
    }

    /// Resolves type text such as `int`, `global::App.Foo` or `App.Foo?`.
    pub fn resolve_type(&self, text: &str) -> Option<TypeSymbol> {
        let (text, nullable) = match text.strip_suffix('?') {
            Some(inner) => (inner, true),
            None => (text, false),
        };
        let resolved = match SpecialType::from_keyword(text) {
            Some(special) => Some(TypeSymbol::special(special)),
            None => {
                let display = if text.starts_with("global::") {
                    text.to_string()
                } else {
                    format!("global::{text}")
                };
                self.types
                    .values()
                    .find(|ty| ty.fully_qualified() == display)
                    .cloned()
            }
        }?;
        Some(if nullable { resolved.annotated() } else { resolved })
    }

    /// Declarations passing `predicate` whose symbol carries an attribute of
    /// class `metadata_name`.
    pub fn candidates_with_attribute(
        &self,
        metadata_name: &str,
        predicate: impl Fn(&SyntaxNode) -> bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<AttributeCandidate>, Cancelled> {
        let mut candidates = Vec::new();
        for (index, tree) in self.trees.iter().enumerate() {
            Cancelled::check(cancel)?;
            for node in tree.syntax().descendants() {
                if !node.kind().is_member_declaration() || !predicate(&node) {
                    continue;
                }
                let Some(symbol) = self.symbol_for(index, &node) else {
                    continue;
                };
                let attributes: Vec<AttributeData> = symbol
                    .attributes()
                    .iter()
                    .filter(|a| a.class.fully_qualified_metadata_name() == metadata_name)
                    .cloned()
                    .collect();
                if attributes.is_empty() {
                    continue;
                }
                candidates.push(AttributeCandidate {
                    tree: index,
                    containing_type: self.containing_type(index, &node),
                    symbol: symbol.clone(),
                    node,
                    attributes,
                });
            }
        }
        Ok(candidates)
    }

    /// Every node in every tree accepted by `predicate`.
    pub fn syntax_candidates(
        &self,
        predicate: impl Fn(&SyntaxNode) -> bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<SyntaxCandidate>, Cancelled> {
        let mut candidates = Vec::new();
        for (index, tree) in self.trees.iter().enumerate() {
            Cancelled::check(cancel)?;
            for node in tree.syntax().descendants().filter(|n| predicate(n)) {
                candidates.push(SyntaxCandidate {
                    tree: index,
                    symbol: self.symbol_for(index, &node).cloned(),
                    node,
                });
            }
        }
        Ok(candidates)
    }

    /// Innermost type declaration enclosing `node`.
    pub fn containing_type(&self, tree: usize, node: &SyntaxNode) -> Option<TypeSymbol> {
        node.ancestors()
            .skip(1)
            .filter(|ancestor| ancestor.kind().is_type_declaration())
            .find_map(|ancestor| match self.symbol_for(tree, &ancestor) {
                Some(Symbol::Type(ty)) => Some(ty.clone()),
                _ => None,
            })
    }
}
