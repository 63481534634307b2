//! Parses the comma-joined property strings an extractor writes into a
//! node's `properties` map into the lists the role/reclassify/pattern rules
//! match against.

use codegraph_core::model::Node;
use codegraph_core::properties::split_csv;

pub struct Evidence {
    pub annotations: Vec<String>,
    pub decorators: Vec<String>,
    pub bases: Vec<String>,
    pub extends: Vec<String>,
    pub implements: Vec<String>,
    pub methods: Vec<String>,
}

impl Evidence {
    pub fn from_node(node: &Node) -> Self {
        Evidence {
            annotations: prop_list(node, "annotations"),
            decorators: prop_list(node, "decorators"),
            bases: prop_list(node, "bases"),
            extends: prop_list(node, "extends"),
            implements: prop_list(node, "implements"),
            methods: prop_list(node, "methods"),
        }
    }

    /// Bases and extends are both "immediate supertype" evidence; most rules
    /// don't care which keyword the source language used for it.
    pub fn supertypes(&self) -> impl Iterator<Item = &str> {
        self.bases.iter().chain(self.extends.iter()).map(|s| s.as_str())
    }

    pub fn has_annotation(&self, wanted: &str) -> bool {
        self.annotations.iter().any(|a| a == wanted)
    }

    pub fn has_decorator_containing(&self, needle: &str) -> bool {
        self.decorators.iter().any(|d| d.to_ascii_lowercase().contains(needle))
    }

    pub fn has_base(&self, wanted: &str) -> bool {
        self.supertypes().any(|b| b == wanted)
    }
}

fn prop_list(node: &Node, key: &str) -> Vec<String> {
    node.prop(key).map(split_csv).unwrap_or_default()
}

/// The immediate directory component of a file path, lower-cased — the
/// fallback package signal for languages without a declared package.
pub fn effective_package(node: &Node) -> Option<String> {
    if let Some(pkg) = &node.package {
        return Some(pkg.to_ascii_lowercase());
    }
    let path = std::path::Path::new(&node.file_path);
    let parent = path.parent()?;
    let dir = parent.file_name()?.to_str()?;
    Some(dir.to_ascii_lowercase())
}
