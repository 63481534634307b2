//! Language-agnostic architectural classification for a parsed code graph.
//!
//! Every extractor in `codegraph-parsers` writes structural facts straight
//! from syntax (annotations, base classes, decorators, method names) into a
//! node's `properties` map. This crate runs a second, purely graph-local
//! pass over that output: it reads those properties back out (see
//! [`evidence`]), and from them derives an architectural role, a possibly
//! new node kind, a set of design-pattern tags, and a layer tag. No syntax
//! tree is touched here — only what the extractors already recorded.

pub mod evidence;
pub mod layer;
pub mod pattern;
pub mod reclassify;
pub mod role;

use codegraph_core::model::{Node, NodeKind};
use codegraph_core::properties::join_csv;
use codegraph_parsers::extractor::ExtractionResult;

use evidence::Evidence;

/// Classifies every node in `result` in place. Edges are never touched, and
/// no node's `id` is ever rewritten — only `kind` and `properties` change.
///
/// Idempotent: running this twice on the same result produces the same
/// output as running it once, since every rule re-derives its answer from
/// `properties` rather than accumulating onto a prior classification.
pub fn classify(result: &mut ExtractionResult) {
    for node in &mut result.nodes {
        classify_node(node);
    }
}

fn classify_node(node: &mut Node) {
    let evidence = Evidence::from_node(node);

    let arch_role = if node.kind.is_class_like() {
        role::assign_role(node, &evidence)
    } else if matches!(node.kind, NodeKind::Function | NodeKind::Method) && role::is_middleware(node, &evidence) {
        Some("middleware")
    } else {
        None
    };

    let outcome = reclassify::reclassify(node, &evidence, arch_role);
    let final_kind = outcome.kind.unwrap_or(node.kind);
    let final_role = if outcome.domain_model_role { Some("domain_model") } else { arch_role };

    if let Some(kind) = outcome.kind {
        node.kind = kind;
    }

    let patterns = pattern::detect_patterns(node, &evidence, final_role);
    let layer = layer::derive_layer(&Node { kind: final_kind, ..node.clone() }, final_role);

    if let Some(role) = final_role {
        node.properties.insert("arch_role".to_string(), role.to_string());
    } else {
        node.properties.remove("arch_role");
    }

    if patterns.is_empty() {
        node.properties.remove("design_pattern");
    } else {
        node.properties.insert("design_pattern".to_string(), join_csv(&patterns));
    }

    if let Some(layer) = layer {
        node.properties.insert("layer_tag".to_string(), layer.to_string());
    } else {
        node.properties.remove("layer_tag");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codegraph_core::model::Language;

    fn java_class(name: &str, package: &str) -> Node {
        let mut node = Node::new("id".to_string(), NodeKind::Class, name, "src/file.java", Language::Java);
        node.package = Some(package.to_string());
        node
    }

    /// Scenario: a Spring `@RestController` gets a controller role and a
    /// presentation layer, while keeping its original `Class` kind.
    #[test]
    fn rest_controller_gets_controller_role_and_presentation_layer() {
        let mut node = java_class("UserController", "com.example.controller");
        node.properties.insert("annotations".to_string(), "RestController".to_string());
        let mut result = ExtractionResult { nodes: vec![node], edges: vec![] };
        classify(&mut result);
        let classified = &result.nodes[0];
        assert_eq!(classified.kind, NodeKind::Class);
        assert_eq!(classified.prop("arch_role"), Some("controller"));
        assert_eq!(classified.prop("layer_tag"), Some("presentation"));
    }

    /// Scenario: a JPA `@Entity`/`@Table` class is reclassified to `DbModel`
    /// and tagged for the data-access layer.
    #[test]
    fn entity_annotation_reclassifies_to_db_model_with_data_access_layer() {
        let mut node = java_class("Order", "com.example.model");
        node.properties.insert("annotations".to_string(), "Entity, Table".to_string());
        let mut result = ExtractionResult { nodes: vec![node], edges: vec![] };
        classify(&mut result);
        let classified = &result.nodes[0];
        assert_eq!(classified.kind, NodeKind::DbModel);
        assert_eq!(classified.prop("layer_tag"), Some("data_access"));
    }

    #[test]
    fn node_id_is_never_rewritten() {
        let node = java_class("Order", "com.example.model");
        let original_id = node.id.clone();
        let mut result = ExtractionResult { nodes: vec![node], edges: vec![] };
        classify(&mut result);
        assert_eq!(result.nodes[0].id, original_id);
    }

    #[test]
    fn classifying_twice_is_idempotent() {
        let mut node = java_class("UserController", "com.example.controller");
        node.properties.insert("annotations".to_string(), "RestController".to_string());
        let mut result = ExtractionResult { nodes: vec![node], edges: vec![] };
        classify(&mut result);
        let once = result.clone();
        classify(&mut result);
        assert_eq!(result.nodes[0].kind, once.nodes[0].kind);
        assert_eq!(result.nodes[0].properties, once.nodes[0].properties);
    }

    #[test]
    fn repository_by_method_majority_adds_repository_pattern_tag() {
        let mut node = Node::new("id".to_string(), NodeKind::Class, "Thing", "src/thing.ts", Language::TypeScript);
        node.properties.insert("methods".to_string(), "find, save, delete, render".to_string());
        let mut result = ExtractionResult { nodes: vec![node], edges: vec![] };
        classify(&mut result);
        let classified = &result.nodes[0];
        assert_eq!(classified.prop("arch_role"), Some("repository"));
        assert_eq!(classified.prop("design_pattern"), Some("repository"));
    }
}
