//! The narrow syntax-tree interface every extractor programs against (spec
//! §4.1).
//!
//! Deliberately excludes compiled query patterns and attribute queries:
//! extractors only ever walk by positional child, by field name, or by
//! parent, which keeps them portable across whatever concrete parser a
//! language backend happens to use. For every tree-sitter-backed language in
//! this crate the concrete backend is `tree_sitter::Node`, implemented below;
//! nothing downstream of this trait knows that.

/// A single node in a parsed syntax tree.
pub trait SyntaxNode<'tree>: Copy {
    /// The language-specific node kind tag, e.g. `"class_declaration"`.
    fn kind(&self) -> &'static str;
    fn child_count(&self) -> usize;
    fn child(&self, i: usize) -> Option<Self>
    where
        Self: Sized;
    fn named_child_count(&self) -> usize;
    fn named_child(&self, i: usize) -> Option<Self>
    where
        Self: Sized;
    fn child_by_field(&self, name: &str) -> Option<Self>
    where
        Self: Sized;
    /// The byte slice of `source` this node spans.
    fn text<'a>(&self, source: &'a [u8]) -> &'a str;
    fn start_line(&self) -> u32;
    fn end_line(&self) -> u32;
    fn parent(&self) -> Option<Self>
    where
        Self: Sized;
}

impl<'tree> SyntaxNode<'tree> for tree_sitter::Node<'tree> {
    fn kind(&self) -> &'static str {
        tree_sitter::Node::kind(self)
    }

    fn child_count(&self) -> usize {
        tree_sitter::Node::child_count(self)
    }

    fn child(&self, i: usize) -> Option<Self> {
        tree_sitter::Node::child(self, i)
    }

    fn named_child_count(&self) -> usize {
        tree_sitter::Node::named_child_count(self)
    }

    fn named_child(&self, i: usize) -> Option<Self> {
        tree_sitter::Node::named_child(self, i)
    }

    fn child_by_field(&self, name: &str) -> Option<Self> {
        tree_sitter::Node::child_by_field_name(self, name)
    }

    fn text<'a>(&self, source: &'a [u8]) -> &'a str {
        tree_sitter::Node::utf8_text(self, source).unwrap_or("")
    }

    fn start_line(&self) -> u32 {
        tree_sitter::Node::start_position(self).row as u32 + 1
    }

    fn end_line(&self) -> u32 {
        tree_sitter::Node::end_position(self).row as u32 + 1
    }

    fn parent(&self) -> Option<Self> {
        tree_sitter::Node::parent(self)
    }
}

/// Depth-first walk over every descendant of `node` (including `node`
/// itself), in source order. Extractors use this instead of compiled query
/// patterns to find definitions/calls/imports anywhere in the tree.
pub fn walk<'tree, N: SyntaxNode<'tree>>(node: N, visit: &mut impl FnMut(N)) {
    visit(node);
    let mut i = 0;
    while let Some(child) = node.child(i) {
        walk(child, visit);
        i += 1;
    }
}
