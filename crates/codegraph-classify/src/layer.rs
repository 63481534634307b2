//! Layer tag derivation: role wins, then the node's (possibly reclassified)
//! kind, then a package-name fallback table. The first matching rule wins;
//! nothing is forced, so a node can end up with no layer tag at all.

use codegraph_core::model::{Node, NodeKind};

use crate::evidence::effective_package;

const PRESENTATION_PACKAGES: &[&str] = &["controller", "controllers", "handler", "handlers", "view", "views", "template", "templates", "api"];
const BUSINESS_PACKAGES: &[&str] = &["service", "services", "domain", "model", "entity", "core", "use_case", "usecase"];
const DATA_ACCESS_PACKAGES: &[&str] = &["repository", "repositories", "dao", "store", "persistence", "migration", "migrations"];
const INFRASTRUCTURE_PACKAGES: &[&str] = &["config", "middleware", "util", "utils", "adapter", "adapters", "infrastructure", "infra"];

pub fn derive_layer(node: &Node, arch_role: Option<&str>) -> Option<&'static str> {
    if let Some(layer) = layer_for_role(arch_role) {
        return Some(layer);
    }
    if let Some(layer) = layer_for_kind(node.kind) {
        return Some(layer);
    }
    layer_for_package(node)
}

fn layer_for_role(role: Option<&str>) -> Option<&'static str> {
    match role {
        Some("controller") => Some("presentation"),
        Some("service") | Some("domain_model") => Some("business"),
        Some("repository") => Some("data_access"),
        Some("middleware") => Some("infrastructure"),
        _ => None,
    }
}

fn layer_for_kind(kind: NodeKind) -> Option<&'static str> {
    match kind {
        NodeKind::DbModel => Some("data_access"),
        NodeKind::DomainModel => Some("business"),
        NodeKind::ViewModel | NodeKind::Dto => Some("presentation"),
        _ => None,
    }
}

fn layer_for_package(node: &Node) -> Option<&'static str> {
    let package = effective_package(node)?;
    let package = package.as_str();
    if PRESENTATION_PACKAGES.contains(&package) {
        Some("presentation")
    } else if BUSINESS_PACKAGES.contains(&package) {
        Some("business")
    } else if DATA_ACCESS_PACKAGES.contains(&package) {
        Some("data_access")
    } else if INFRASTRUCTURE_PACKAGES.contains(&package) {
        Some("infrastructure")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codegraph_core::model::Language;

    fn node_with(kind: NodeKind, package: Option<&str>) -> Node {
        let mut node = Node::new("id".to_string(), kind, "Thing", "src/file", Language::Java);
        node.package = package.map(|p| p.to_string());
        node
    }

    #[test]
    fn role_wins_over_kind_and_package() {
        let node = node_with(NodeKind::Class, Some("repositories"));
        assert_eq!(derive_layer(&node, Some("controller")), Some("presentation"));
    }

    #[test]
    fn kind_wins_over_package_when_no_role() {
        let node = node_with(NodeKind::DbModel, Some("controller"));
        assert_eq!(derive_layer(&node, None), Some("data_access"));
    }

    #[test]
    fn package_fallback_applies_when_no_role_or_kind_match() {
        let node = node_with(NodeKind::Class, Some("util"));
        assert_eq!(derive_layer(&node, None), Some("infrastructure"));
    }

    #[test]
    fn unmatched_package_yields_no_layer() {
        let node = node_with(NodeKind::Class, Some("whatever"));
        assert_eq!(derive_layer(&node, None), None);
    }
}
